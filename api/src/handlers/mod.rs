pub mod error;

pub use error::{handle_domain_error, unauthorized, validation_error};
