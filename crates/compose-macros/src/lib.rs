use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, ItemFn, ReturnType, Type};

/// Whether `ty` mentions `impl Trait` anywhere a closure return annotation
/// could not repeat it.
fn contains_impl_trait(ty: &Type) -> bool {
    match ty {
        Type::ImplTrait(_) => true,
        Type::Paren(inner) => contains_impl_trait(&inner.elem),
        Type::Group(inner) => contains_impl_trait(&inner.elem),
        Type::Reference(reference) => contains_impl_trait(&reference.elem),
        Type::Tuple(tuple) => tuple.elems.iter().any(contains_impl_trait),
        Type::Array(array) => contains_impl_trait(&array.elem),
        Type::Slice(slice) => contains_impl_trait(&slice.elem),
        Type::Path(path) => path.path.segments.iter().any(|segment| {
            let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
                return false;
            };
            args.args.iter().any(|arg| match arg {
                syn::GenericArgument::Type(ty) => contains_impl_trait(ty),
                _ => false,
            })
        }),
        _ => false,
    }
}

/// Marks a function as a composable call site.
///
/// The body runs inside a transparent group keyed by the function's source
/// location, so hooks called in it get storage of their own that is dropped
/// when the function stops being called. The signature is left untouched.
#[proc_macro_attribute]
pub fn composable(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr_tokens = TokenStream2::from(attr);
    if !attr_tokens.is_empty() {
        return syn::Error::new_spanned(attr_tokens, "composable takes no arguments")
            .to_compile_error()
            .into();
    }

    let mut func = parse_macro_input!(item as ItemFn);
    if let Some(asyncness) = &func.sig.asyncness {
        return syn::Error::new_spanned(asyncness, "composable functions cannot be async")
            .to_compile_error()
            .into();
    }

    let key_expr = quote! { compose_core::location_key(file!(), line!(), column!()) };
    let original_block = &func.block;
    let closure = match &func.sig.output {
        ReturnType::Type(_, ty) if !contains_impl_trait(ty) => {
            quote! { move || -> #ty #original_block }
        }
        ReturnType::Type(..) => quote! { move || #original_block },
        ReturnType::Default => quote! { move || -> () #original_block },
    };

    func.block = syn::parse_quote!({
        compose_core::with_group(#key_expr, #closure)
    });

    TokenStream::from(quote! { #func })
}
