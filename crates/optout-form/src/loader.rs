//! Form definition loading from TOML files.
//!
//! This module handles loading form definitions from the `form-definitions/`
//! directory.

use crate::{
    definition::FormDefinition,
    error::{FormError, Result},
};
use optout_core::FormId;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Loader for form definitions from TOML files.
pub struct FormLoader {
    /// Base directory containing form definitions
    definitions_dir: PathBuf,
}

impl FormLoader {
    /// Create a new loader with the given definitions directory.
    ///
    /// # Errors
    /// Returns error if the directory doesn't exist.
    pub fn new(definitions_dir: impl Into<PathBuf>) -> Result<Self> {
        let definitions_dir = definitions_dir.into();

        if !definitions_dir.is_dir() {
            return Err(FormError::DirectoryNotFound {
                path: definitions_dir.display().to_string(),
            });
        }

        Ok(Self { definitions_dir })
    }

    /// Create a loader using the default definitions directory.
    ///
    /// Looks for `form-definitions/` relative to the workspace root.
    ///
    /// # Errors
    /// Returns error if the default directory doesn't exist.
    pub fn with_default_dir() -> Result<Self> {
        // Find workspace root by looking for Cargo.toml with [workspace]
        let mut current_dir = std::env::current_dir()?;

        loop {
            let cargo_toml = current_dir.join("Cargo.toml");
            if cargo_toml.exists() {
                if let Ok(contents) = std::fs::read_to_string(&cargo_toml) {
                    if contents.contains("[workspace]") {
                        let definitions_dir = current_dir.join("form-definitions");
                        return Self::new(definitions_dir);
                    }
                }
            }

            if let Some(parent) = current_dir.parent() {
                current_dir = parent.to_path_buf();
            } else {
                break;
            }
        }

        // Fallback: try relative path
        Self::new(PathBuf::from("form-definitions"))
    }

    /// Load a single form definition by ID.
    ///
    /// # Errors
    /// Returns error if the definition file doesn't exist, can't be read, or is invalid.
    pub fn load(&self, form_id: &FormId) -> Result<FormDefinition> {
        let filename = format!("{}.toml", form_id.as_str());
        let path = self.definitions_dir.join(&filename);

        if !path.exists() {
            return Err(FormError::NotFound {
                form_id: form_id.to_string(),
            });
        }

        let definition = Self::load_from_path(&path)?;
        definition.validate()?;

        debug!(
            form_id = %form_id,
            name = %definition.name(),
            "loaded form definition"
        );

        Ok(definition)
    }

    /// Load all form definitions from the definitions directory.
    ///
    /// Invalid definitions are logged as warnings and skipped.
    ///
    /// # Errors
    /// Returns error if the directory can't be read.
    pub fn load_all(&self) -> Result<Vec<FormDefinition>> {
        let mut definitions = Vec::new();

        for entry in std::fs::read_dir(&self.definitions_dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                continue;
            }

            match Self::load_from_path(&path) {
                Ok(definition) => {
                    if let Err(e) = definition.validate() {
                        warn!(
                            path = %path.display(),
                            error = %e,
                            "skipping invalid form definition"
                        );
                        continue;
                    }
                    definitions.push(definition);
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to load form definition"
                    );
                }
            }
        }

        info!(
            count = definitions.len(),
            dir = %self.definitions_dir.display(),
            "loaded form definitions"
        );

        Ok(definitions)
    }

    /// Load a form definition from a specific file path.
    fn load_from_path(path: &Path) -> Result<FormDefinition> {
        let contents = std::fs::read_to_string(path).map_err(|e| FormError::LoadError {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;

        toml::from_str(&contents).map_err(|e| FormError::ParseError {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::Audience;
    use tempfile::TempDir;

    fn create_test_definition_file(dir: &Path, form_id: &str) -> PathBuf {
        let file_path = dir.join(format!("{form_id}.toml"));

        let content = format!(
            r##"
[form]
id = "{form_id}"
name = "Test form"
url = "https://privacyportal.example.com/request"
audience = "parent"
region = "domestic"
last_verified = "2026-08-01"

[[fields]]
name = "first_name"
column = "First Name"
selectors = ["input[name='firstName']", "#first-name"]
default = "John"

[request_type]
column = "Request_type"
default = "Request to delete my data"

[acknowledgment]
text_patterns = ["I acknowledge"]
"##
        );

        std::fs::write(&file_path, content).expect("write test file");
        file_path
    }

    #[test]
    fn test_loader_new_with_existing_dir() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let loader = FormLoader::new(temp_dir.path());
        assert!(loader.is_ok());
    }

    #[test]
    fn test_loader_new_with_nonexistent_dir() {
        let loader = FormLoader::new("/nonexistent/path/to/definitions");
        assert!(loader.is_err());
    }

    #[test]
    fn test_load_single_form() {
        let temp_dir = TempDir::new().expect("create temp dir");
        create_test_definition_file(temp_dir.path(), "test-form");

        let loader = FormLoader::new(temp_dir.path()).expect("create loader");
        let form_id = FormId::new("test-form").expect("valid form ID");
        let definition = loader.load(&form_id).expect("load form definition");

        assert_eq!(definition.id(), &form_id);
        assert_eq!(definition.name(), "Test form");
        assert_eq!(definition.form.audience, Audience::Parent);
    }

    #[test]
    fn test_load_nonexistent_form() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let loader = FormLoader::new(temp_dir.path()).expect("create loader");
        let form_id = FormId::new("nonexistent").expect("valid form ID");

        let result = loader.load(&form_id);
        assert!(matches!(result, Err(FormError::NotFound { .. })));
    }

    #[test]
    fn test_load_all_forms() {
        let temp_dir = TempDir::new().expect("create temp dir");

        create_test_definition_file(temp_dir.path(), "form-1");
        create_test_definition_file(temp_dir.path(), "form-2");
        create_test_definition_file(temp_dir.path(), "form-3");

        let loader = FormLoader::new(temp_dir.path()).expect("create loader");
        let definitions = loader.load_all().expect("load all definitions");

        assert_eq!(definitions.len(), 3);

        let ids: std::collections::HashSet<_> =
            definitions.iter().map(FormDefinition::id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_load_all_skips_invalid() {
        let temp_dir = TempDir::new().expect("create temp dir");

        create_test_definition_file(temp_dir.path(), "valid-form");

        let invalid_path = temp_dir.path().join("invalid.toml");
        std::fs::write(&invalid_path, "invalid toml content [[[").expect("write invalid file");

        let loader = FormLoader::new(temp_dir.path()).expect("create loader");
        let definitions = loader.load_all().expect("load all definitions");

        assert_eq!(definitions.len(), 1);
    }
}
