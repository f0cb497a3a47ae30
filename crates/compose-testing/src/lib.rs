//! Testing utilities and harness for Compose-RS

pub mod testing;

pub use testing::*;

pub mod prelude {
    pub use crate::testing::*;
}
