//! Command implementations for ext-cli

pub mod layout;
pub mod validate;

pub use layout::run_layout;
pub use validate::{run_validate, ValidateOptions};
