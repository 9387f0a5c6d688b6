//! Git collaborator for the extensions index
//!
//! Makes repository contents available to the engine's repository-backed
//! rules by shallow-cloning into a scoped temporary directory, bounded by
//! explicit timeouts.

pub mod clone;

pub use clone::{GitInspector, DEFAULT_CHECKOUT_TIMEOUT, DEFAULT_CLONE_TIMEOUT};
