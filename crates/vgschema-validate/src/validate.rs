//! # Schema Validation
//!
//! Runtime validation of JSON documents against a compiled fragment
//! registry (JSON Schema Draft 2020-12 by default).
//!
//! ## Document Layout
//!
//! The registry is rendered once as `{"refs": {...}, "defs": {...}}`.
//! Validating against a named fragment compiles that document with a root
//! `"$ref": "#/<space>/<name>"`, so references between fragments, including
//! cyclic ones such as nested field lookups, resolve as JSON Pointers into
//! the same document.
//!
//! ## Failure Reporting
//!
//! Documents that fail validation are rejected with every violation the
//! engine reports: the instance path, the schema path, and a message.

use std::fmt;

use jsonschema::{Draft, Retrieve, Uri, ValidationOptions, Validator};
use serde_json::Value;
use thiserror::Error;
use vgschema_core::{Registry, Space};

/// Retriever that refuses every external `$ref`.
///
/// A compiled registry is self-contained; a lookup reaching this retriever
/// means the document references something it does not define.
struct LocalOnlyRetriever;

impl Retrieve for LocalOnlyRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("external schema '{}' is not available", uri.as_str()).into())
    }
}

/// Error during schema validation.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The document did not conform to the target fragment.
    #[error("validation failed against '{target}':\n{violations}")]
    ValidationFailed {
        /// Qualified target name, e.g. `defs/encode`.
        target: String,
        /// Structured list of individual violations.
        violations: ValidationViolations,
    },

    /// The target name is not registered.
    #[error("no fragment named '{target}'")]
    UnknownTarget {
        /// Qualified target name.
        target: String,
    },

    /// The compiled validator could not be built (e.g., invalid schema).
    #[error("validator build error for '{target}': {reason}")]
    ValidatorBuildError {
        /// Qualified target name.
        target: String,
        /// Reason the validator could not be built.
        reason: String,
    },

    /// The document text could not be parsed.
    #[error("document load error: {reason}")]
    DocumentLoadError {
        /// Reason the document could not be parsed.
        reason: String,
    },
}

/// A single validation violation with structured context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// JSON Pointer path to the violating value in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Number of violations the engine reported.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// True when the engine reported nothing.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations in the order the engine reported them.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Take ownership of the reported violations.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Compilation settings for [`SchemaValidator`].
#[derive(Debug, Clone)]
pub struct ValidatorOptions {
    /// JSON Schema draft the compiled document is interpreted as.
    pub draft: Draft,
    /// `$id` placed on the compiled document, if any.
    pub schema_id: Option<String>,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            draft: Draft::Draft202012,
            schema_id: None,
        }
    }
}

/// A validator over one registry, backed by the `jsonschema` crate.
///
/// The registry is rendered to JSON once at construction. Each call to
/// [`build_validator`](Self::build_validator) compiles a fresh
/// [`Validator`]; callers validating many documents against the same
/// target should build once and reuse it.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    document: Value,
    names: Vec<(Space, String)>,
    options: ValidatorOptions,
}

impl SchemaValidator {
    pub fn new(registry: &Registry) -> Self {
        Self::with_options(registry, ValidatorOptions::default())
    }

    pub fn with_options(registry: &Registry, options: ValidatorOptions) -> Self {
        let names = registry
            .names()
            .into_iter()
            .map(|(space, name)| (space, name.to_string()))
            .collect();
        Self {
            document: registry.to_json(),
            names,
            options,
        }
    }

    /// The rendered registry document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Qualified names (`refs/<name>`, `defs/<name>`) of every target.
    pub fn target_names(&self) -> Vec<String> {
        self.names
            .iter()
            .map(|(space, name)| space.qualify(name))
            .collect()
    }

    fn has_target(&self, space: Space, name: &str) -> bool {
        self.names.iter().any(|(s, n)| *s == space && n == name)
    }

    fn build_options(&self) -> ValidationOptions {
        let mut opts = jsonschema::options();
        opts.with_draft(self.options.draft);
        opts.with_retriever(LocalOnlyRetriever);
        opts
    }

    /// Root schema for `space`/`name`: the whole document plus a root `$ref`.
    fn root_schema(&self, space: Space, name: &str) -> Value {
        let mut root = self.document.clone();
        if let Value::Object(map) = &mut root {
            map.insert("$ref".into(), Value::String(space.pointer(name)));
            if let Some(id) = &self.options.schema_id {
                map.insert("$id".into(), Value::String(id.clone()));
            }
        }
        root
    }

    /// Build a compiled `Validator` for one named fragment.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::UnknownTarget` if the name is not registered.
    /// Returns `SchemaValidationError::ValidatorBuildError` if the engine rejects
    /// the compiled document.
    pub fn build_validator(
        &self,
        space: Space,
        name: &str,
    ) -> Result<Validator, SchemaValidationError> {
        let target = space.qualify(name);
        if !self.has_target(space, name) {
            return Err(SchemaValidationError::UnknownTarget { target });
        }
        tracing::trace!(target = %target, "compiling validator");
        self.build_options()
            .build(&self.root_schema(space, name))
            .map_err(|e| SchemaValidationError::ValidatorBuildError {
                target,
                reason: e.to_string(),
            })
    }

    /// Validate a JSON value against a named fragment.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::ValidationFailed` with structured
    /// violation details if the document is invalid.
    pub fn validate_document(
        &self,
        instance: &Value,
        space: Space,
        name: &str,
    ) -> Result<(), SchemaValidationError> {
        let validator = self.build_validator(space, name)?;

        let errors: Vec<Violation> = validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaValidationError::ValidationFailed {
                target: space.qualify(name),
                violations: ValidationViolations { violations: errors },
            })
        }
    }

    /// Parse `text` as JSON and validate it against a named fragment.
    pub fn validate_json_str(
        &self,
        text: &str,
        space: Space,
        name: &str,
    ) -> Result<(), SchemaValidationError> {
        let instance: Value =
            serde_json::from_str(text).map_err(|e| SchemaValidationError::DocumentLoadError {
                reason: format!("invalid JSON: {e}"),
            })?;
        self.validate_document(&instance, space, name)
    }

    /// Whether `instance` conforms to a named fragment. Unknown or
    /// uncompilable targets count as non-conforming.
    pub fn is_valid(&self, instance: &Value, space: Space, name: &str) -> bool {
        self.build_validator(space, name)
            .map(|v| v.is_valid(instance))
            .unwrap_or(false)
    }

    /// Compile every named fragment, collecting the ones that fail.
    pub fn check_all_targets(&self) -> Vec<SchemaValidationError> {
        self.names
            .iter()
            .filter_map(|(space, name)| self.build_validator(*space, name).err())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vgschema_core::{
        definition, number, object, one_of, pattern, reference, string, RegistryBuilder,
    };

    fn sample_registry() -> Registry {
        let mut builder = RegistryBuilder::new();
        builder
            .add_ref(
                "field",
                one_of([
                    string(),
                    object().required("parent", reference("field")).closed(),
                ]),
            )
            .unwrap();
        builder
            .add_def(
                "entry",
                object()
                    .optional("x", number())
                    .optional("f", reference("field"))
                    .closed(),
            )
            .unwrap();
        builder
            .add_def("block", pattern([("^.+$", definition("entry"))]))
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_target_names_are_qualified() {
        let validator = SchemaValidator::new(&sample_registry());
        assert_eq!(
            validator.target_names(),
            vec!["refs/field", "defs/block", "defs/entry"]
        );
    }

    #[test]
    fn test_all_targets_compile() {
        let validator = SchemaValidator::new(&sample_registry());
        let failures = validator.check_all_targets();
        assert!(failures.is_empty(), "failures: {failures:?}");
    }

    #[test]
    fn test_validate_valid_document() {
        let validator = SchemaValidator::new(&sample_registry());
        validator
            .validate_document(
                &json!({"enter": {"x": 1, "f": {"parent": {"parent": "a"}}}}),
                Space::Defs,
                "block",
            )
            .unwrap();
    }

    #[test]
    fn test_validate_reports_instance_path() {
        let validator = SchemaValidator::new(&sample_registry());
        let err = validator
            .validate_document(&json!({"enter": {"x": "wide"}}), Space::Defs, "block")
            .unwrap_err();
        match &err {
            SchemaValidationError::ValidationFailed { target, violations } => {
                assert_eq!(target, "defs/block");
                assert!(!violations.is_empty());
                assert!(
                    violations
                        .violations()
                        .iter()
                        .any(|v| v.instance_path == "/enter/x"),
                    "got: {violations}"
                );
            }
            other => panic!("Expected ValidationFailed, got: {other}"),
        }
    }

    #[test]
    fn test_additional_properties_rejected() {
        let validator = SchemaValidator::new(&sample_registry());
        assert!(!validator.is_valid(&json!({"y": 1}), Space::Defs, "entry"));
        assert!(validator.is_valid(&json!({"x": 1}), Space::Defs, "entry"));
    }

    #[test]
    fn test_recursive_reference_rejects_bad_leaf() {
        let validator = SchemaValidator::new(&sample_registry());
        assert!(!validator.is_valid(&json!({"parent": {"parent": 3}}), Space::Refs, "field"));
    }

    #[test]
    fn test_unknown_target() {
        let validator = SchemaValidator::new(&sample_registry());
        let err = validator
            .validate_document(&json!({}), Space::Refs, "entry")
            .unwrap_err();
        assert!(
            matches!(err, SchemaValidationError::UnknownTarget { ref target } if target == "refs/entry"),
            "Expected UnknownTarget, got: {err}"
        );
    }

    #[test]
    fn test_validate_json_str() {
        let validator = SchemaValidator::new(&sample_registry());
        validator
            .validate_json_str(r#"{"update": {"f": "price"}}"#, Space::Defs, "block")
            .unwrap();
        let err = validator
            .validate_json_str("{not json", Space::Defs, "block")
            .unwrap_err();
        assert!(matches!(err, SchemaValidationError::DocumentLoadError { .. }));
    }

    #[test]
    fn test_schema_id_option() {
        let options = ValidatorOptions {
            schema_id: Some("https://example.org/schema/encode.json".into()),
            ..ValidatorOptions::default()
        };
        let validator = SchemaValidator::with_options(&sample_registry(), options);
        assert!(validator.is_valid(&json!({"a": {"x": 2}}), Space::Defs, "block"));
        assert!(validator.document().get("$id").is_none());

        let root = validator.root_schema(Space::Defs, "block");
        assert_eq!(root["$id"], "https://example.org/schema/encode.json");
        assert_eq!(root["$ref"], "#/defs/block");

        let plain = SchemaValidator::new(&sample_registry());
        let root = plain.root_schema(Space::Defs, "block");
        assert!(root.get("$id").is_none());
        assert_eq!(root["$ref"], "#/defs/block");
    }

    #[test]
    fn test_violations_accessors_agree() {
        let validator = SchemaValidator::new(&sample_registry());
        let err = validator
            .validate_document(&json!({"enter": {"x": "wide", "y": 1}}), Space::Defs, "block")
            .unwrap_err();
        let violations = match err {
            SchemaValidationError::ValidationFailed { violations, .. } => violations,
            other => panic!("Expected ValidationFailed, got: {other}"),
        };
        assert!(!violations.is_empty());
        let count = violations.len();
        assert_eq!(violations.violations().len(), count);
        assert_eq!(violations.to_string().lines().count(), count);
        let owned = violations.into_inner();
        assert_eq!(owned.len(), count);
        assert!(owned.iter().all(|v| v.instance_path.starts_with("/enter")));
    }

    #[test]
    fn test_violation_display_root() {
        let v = Violation {
            instance_path: String::new(),
            schema_path: "/additionalProperties".to_string(),
            message: "Additional properties are not allowed ('foo' was unexpected)".to_string(),
        };
        assert!(v.to_string().contains("(root)"));
    }

    #[test]
    fn test_violation_display_path() {
        let v = Violation {
            instance_path: "/enter/fill".to_string(),
            schema_path: "/oneOf".to_string(),
            message: "not valid under any of the schemas".to_string(),
        };
        let display = v.to_string();
        assert!(display.contains("/enter/fill"));
        assert!(display.contains("not valid"));
    }
}
