mod cents;
mod secret;

pub use cents::{Cents, CentsConversionError, DEFAULT_CURRENCY};
pub use secret::Secret;
