//! Schema registry
//!
//! Maps schema names to shared schemas. Built once at startup
//! (`register`, `load_all`), then shared read-only, usually behind an
//! `Arc<SchemaRegistry>`, by whatever evaluates `SchemaName(...)` calls.
//!
//! Schema documents are `*.json` files in the schema directory, one
//! [`SchemaDefinition`] per file. A malformed or invalid document is fatal.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};

use super::definition::SchemaDefinition;
use super::errors::{SchemaError, SchemaResult};
use super::types::Schema;
use crate::error::UnifiedError;
use crate::observability::{log_event_with_fields, Event};
use crate::record::Record;

#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schema_dir: Option<PathBuf>,
    schemas: HashMap<String, Arc<Schema>>,
}

impl SchemaRegistry {
    /// Empty registry with no backing directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty registry that loads documents from `schema_dir`
    pub fn with_dir(schema_dir: impl Into<PathBuf>) -> Self {
        Self {
            schema_dir: Some(schema_dir.into()),
            schemas: HashMap::new(),
        }
    }

    pub fn schema_dir(&self) -> Option<&Path> {
        self.schema_dir.as_deref()
    }

    /// Loads every `*.json` document in the schema directory.
    ///
    /// A missing directory loads nothing. Files are read in name order so
    /// duplicate-name failures are reproducible.
    pub fn load_all(&mut self) -> SchemaResult<usize> {
        let dir = match &self.schema_dir {
            Some(dir) => dir.clone(),
            None => return Ok(0),
        };
        if !dir.exists() {
            return Ok(0);
        }

        let entries = fs::read_dir(&dir).map_err(|e| {
            SchemaError::malformed_schema(
                dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed_schema(
                    dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            if let Err(err) = self.load_schema_file(path) {
                log_event_with_fields(
                    Event::SchemaRejected,
                    &[("code", err.code().code()), ("path", &path.display().to_string())],
                );
                return Err(err);
            }
        }

        let count = paths.len().to_string();
        log_event_with_fields(
            Event::SchemasLoaded,
            &[("count", &count), ("schema_dir", &dir.display().to_string())],
        );
        Ok(paths.len())
    }

    fn load_schema_file(&mut self, path: &Path) -> SchemaResult<Arc<Schema>> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to read file: {}", e),
            )
        })?;

        let definition: SchemaDefinition = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed_schema(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        self.register(definition.into_schema()?)
    }

    /// Registers a schema. Names are write-once.
    pub fn register(&mut self, schema: Schema) -> SchemaResult<Arc<Schema>> {
        if self.schemas.contains_key(schema.name()) {
            return Err(SchemaError::duplicate_schema(schema.name()));
        }

        let name = schema.name().to_string();
        let schema = Arc::new(schema);
        self.schemas.insert(name.clone(), Arc::clone(&schema));

        let fields = schema.fields().len().to_string();
        log_event_with_fields(
            Event::SchemaRegistered,
            &[("fields", &fields), ("schema", &name)],
        );
        Ok(schema)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Schema>> {
        self.schemas.get(name).cloned()
    }

    /// Like [`get`](Self::get), failing with `SCHEMA-0008`
    pub fn require(&self, name: &str) -> SchemaResult<Arc<Schema>> {
        self.get(name).ok_or_else(|| SchemaError::unknown_schema(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// `SchemaName(input)`: an unvalidated record of the named schema.
    ///
    /// # Errors
    ///
    /// Unknown names are an undefined-class error.
    pub fn construct(&self, name: &str, input: &Map<String, Value>) -> Result<Record, UnifiedError> {
        let schema = self.require(name)?;
        Ok(schema.record(input))
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use crate::schema::{FieldSpec, SchemaErrorCode};
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_schema() -> Schema {
        Schema::define(
            "User",
            vec![FieldSpec::string("name").required(), FieldSpec::integer("age")],
        )
        .unwrap()
    }

    fn write(dir: &Path, file: &str, value: Value) {
        fs::write(dir.join(file), serde_json::to_string_pretty(&value).unwrap()).unwrap();
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = SchemaRegistry::new();
        let registered = registry.register(sample_schema()).unwrap();

        let fetched = registry.get("User").unwrap();
        assert!(Arc::ptr_eq(&registered, &fetched));
        assert!(registry.contains("User"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_names_are_write_once() {
        let mut registry = SchemaRegistry::new();
        registry.register(sample_schema()).unwrap();

        let err = registry.register(sample_schema()).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::DuplicateSchema);
    }

    #[test]
    fn test_construct_whitelists_input() {
        let mut registry = SchemaRegistry::new();
        registry.register(sample_schema()).unwrap();

        let input = json!({"name": "Ann", "admin": true});
        let record = registry.construct("User", input.as_object().unwrap()).unwrap();
        assert_eq!(record.data().len(), 1);
        assert!(!record.is_validated());
    }

    #[test]
    fn test_construct_unknown_schema() {
        let registry = SchemaRegistry::new();
        let err = registry.construct("Ghost", &Map::new()).unwrap_err();
        assert_eq!(err.code(), "SCHEMA-0008");
        assert_eq!(err.class(), ErrorClass::Undefined);
    }

    #[test]
    fn test_load_all_from_directory() {
        let temp_dir = TempDir::new().unwrap();
        write(
            temp_dir.path(),
            "task.json",
            json!({"name": "Task", "fields": [
                {"name": "title", "type": "string", "required": true},
                {"name": "status", "type": "enum", "enum": ["open", "closed"], "default": "open"}
            ]}),
        );
        write(
            temp_dir.path(),
            "tag.json",
            json!({"name": "Tag", "fields": [{"name": "label", "type": "string"}]}),
        );
        fs::write(temp_dir.path().join("README.md"), "not a schema").unwrap();

        let mut registry = SchemaRegistry::with_dir(temp_dir.path());
        assert_eq!(registry.load_all().unwrap(), 2);
        assert_eq!(registry.names(), vec!["Tag", "Task"]);
    }

    #[test]
    fn test_load_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut registry = SchemaRegistry::with_dir(temp_dir.path().join("absent"));
        assert_eq!(registry.load_all().unwrap(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_malformed_document_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("bad.json"), "{ not json").unwrap();

        let mut registry = SchemaRegistry::with_dir(temp_dir.path());
        let err = registry.load_all().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::MalformedSchema);
        assert!(err.is_fatal());
    }

    #[test]
    fn test_invalid_definition_in_document() {
        let temp_dir = TempDir::new().unwrap();
        write(
            temp_dir.path(),
            "broken.json",
            json!({"name": "Broken", "fields": [{"name": "s", "type": "enum"}]}),
        );

        let mut registry = SchemaRegistry::with_dir(temp_dir.path());
        assert_eq!(registry.load_all().unwrap_err().code(), SchemaErrorCode::EmptyEnum);
    }
}
