//! In-memory CIL metadata modules loaded from YAML descriptions.
//!
//! A [`Module`] answers the decoder's token lookups, and each
//! [`MethodEntry`] supplies a method descriptor, IL bytes and sequence
//! points, so a method can be decoded without a PE reader.

pub mod error;
pub mod module;
pub mod schema;
pub mod types;

pub use error::{Error, Result};
pub use module::{MethodEntry, Module, ModuleStats};
pub use types::TypeExpr;
