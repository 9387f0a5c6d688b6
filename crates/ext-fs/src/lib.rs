//! Filesystem collaborator for the extensions index
//!
//! Corpus discovery (candidate listing, name derivation) and index layout
//! policing. The validation engine consumes these through narrow value
//! interfaces; all filesystem I/O stays here.

pub mod discover;
pub mod error;
pub mod layout;

pub use discover::{discover_manifests, is_manifest_file, manifest_name};
pub use error::{Error, Result};
pub use layout::{scan_layout, LayoutPolicy};
