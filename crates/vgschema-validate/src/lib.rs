//! # vgschema-validate — Registry Validation
//!
//! Compiles a [`Registry`](vgschema_core::Registry) into a single JSON
//! Schema document and validates JSON instances against any of its named
//! fragments using the `jsonschema` crate.
//!
//! Key functions:
//!
//! - [`SchemaValidator::validate_document`] — validates a JSON value against
//!   one `refs`/`defs` entry, reporting every violation with its instance
//!   path and schema path.
//! - [`SchemaValidator::check_all_targets`] — compiles every named fragment,
//!   proving the document has no reference the engine cannot resolve.
//!
//! ## Crate Policy
//!
//! - Depends only on `vgschema-core` internally.
//! - Never fetches remote schemas: every `$ref` must resolve inside the
//!   compiled document.

pub mod validate;

pub use validate::{
    SchemaValidationError, SchemaValidator, ValidationViolations, ValidatorOptions, Violation,
};
