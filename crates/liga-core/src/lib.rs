//! `liga-core`: configuration, shared domain types and payload validation
//! for the league statistics service.

pub mod config;
pub mod error;
pub mod types;
pub mod validate;

pub use config::LigaConfig;
pub use error::{LigaError, Result};
pub use types::StatKind;
pub use validate::{Validate, ValidationErrors};
