use core::hash::Hash;
use std::hash::Hasher;
use std::panic::Location;

use crate::Key;

#[cfg(feature = "std-hash")]
mod default {
    pub use std::collections::hash_map::DefaultHasher;

    #[inline]
    pub fn new() -> DefaultHasher {
        DefaultHasher::new()
    }
}

#[cfg(not(feature = "std-hash"))]
mod default {
    pub use ahash::AHasher as DefaultHasher;

    #[inline]
    pub fn new() -> DefaultHasher {
        DefaultHasher::default()
    }
}

/// Hashes a single value with whichever hasher the `std-hash` feature selects.
#[inline]
pub fn hash_one<T: Hash + ?Sized>(value: &T) -> Key {
    let mut hasher = default::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Group key for a source position. Stable for the lifetime of the process.
pub fn location_key(file: &str, line: u32, column: u32) -> Key {
    hash_one(&(file, line, column))
}

/// Group key for the caller of the nearest `#[track_caller]` frame.
#[track_caller]
pub fn caller_key() -> Key {
    let location = Location::caller();
    location_key(location.file(), location.line(), location.column())
}
