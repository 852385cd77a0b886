//! In-memory form definition registry with query support.

use crate::{
    definition::{Audience, FormDefinition, Region},
    error::{FormError, Result},
    loader::FormLoader,
};
use optout_core::FormId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::info;

/// In-memory cache of form definitions with query capabilities.
///
/// The registry loads definitions from disk and caches them in memory
/// for fast lookups. It supports queries by ID, audience, and region.
#[derive(Clone)]
pub struct FormRegistry {
    /// Cached form definitions, indexed by form ID
    definitions: Arc<RwLock<HashMap<FormId, FormDefinition>>>,
}

impl FormRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            definitions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a registry and load all definitions from the given loader.
    ///
    /// # Errors
    /// Returns error if loading fails.
    pub fn load_from(loader: &FormLoader) -> Result<Self> {
        let registry = Self::new();
        registry.reload(loader)?;
        Ok(registry)
    }

    /// Reload all form definitions from the loader.
    ///
    /// This replaces the current cache with freshly loaded definitions.
    ///
    /// # Errors
    /// Returns error if loading fails.
    pub fn reload(&self, loader: &FormLoader) -> Result<()> {
        let definitions = loader.load_all()?;

        let mut cache = self
            .definitions
            .write()
            .expect("acquire write lock on definitions");

        cache.clear();

        for definition in definitions {
            let form_id = definition.id().clone();
            cache.insert(form_id, definition);
        }

        info!(count = cache.len(), "reloaded form definitions");

        Ok(())
    }

    /// Get a form definition by ID.
    ///
    /// # Errors
    /// Returns error if the form is not found.
    pub fn get(&self, form_id: &FormId) -> Result<FormDefinition> {
        let cache = self
            .definitions
            .read()
            .expect("acquire read lock on definitions");

        cache
            .get(form_id)
            .cloned()
            .ok_or_else(|| FormError::NotFound {
                form_id: form_id.to_string(),
            })
    }

    /// Get all form definitions, sorted by ID.
    #[must_use]
    pub fn get_all(&self) -> Vec<FormDefinition> {
        let cache = self
            .definitions
            .read()
            .expect("acquire read lock on definitions");

        let mut all: Vec<_> = cache.values().cloned().collect();
        all.sort_by(|a, b| a.id().as_str().cmp(b.id().as_str()));
        all
    }

    /// Query forms by target audience.
    #[must_use]
    pub fn get_by_audience(&self, audience: Audience) -> Vec<FormDefinition> {
        let cache = self
            .definitions
            .read()
            .expect("acquire read lock on definitions");

        cache
            .values()
            .filter(|def| def.form.audience == audience)
            .cloned()
            .collect()
    }

    /// Query forms by region.
    #[must_use]
    pub fn get_by_region(&self, region: Region) -> Vec<FormDefinition> {
        let cache = self
            .definitions
            .read()
            .expect("acquire read lock on definitions");

        cache
            .values()
            .filter(|def| def.form.region == region)
            .cloned()
            .collect()
    }

    /// Number of cached definitions.
    #[must_use]
    pub fn count(&self) -> usize {
        self.definitions
            .read()
            .expect("acquire read lock on definitions")
            .len()
    }
}

impl Default for FormRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_definition(dir: &Path, form_id: &str, audience: &str, region: &str) {
        let content = format!(
            r#"
[form]
id = "{form_id}"
name = "Test form {form_id}"
url = "https://privacyportal.example.com/request"
audience = "{audience}"
region = "{region}"
last_verified = "2026-08-01"

[[fields]]
name = "email"
column = "Email"
selectors = ["input[type='email']"]

[request_type]
column = "Request_type"
default = "Request to delete my data"

[acknowledgment]
text_patterns = ["I acknowledge"]
"#
        );
        std::fs::write(dir.join(format!("{form_id}.toml")), content).expect("write test file");
    }

    fn populated_registry(temp_dir: &TempDir) -> FormRegistry {
        write_definition(temp_dir.path(), "parent-request", "parent", "domestic");
        write_definition(temp_dir.path(), "myself-request", "myself", "domestic");
        write_definition(
            temp_dir.path(),
            "international-request",
            "myself",
            "international",
        );

        let loader = FormLoader::new(temp_dir.path()).expect("create loader");
        FormRegistry::load_from(&loader).expect("load registry")
    }

    #[test]
    fn test_empty_registry() {
        let registry = FormRegistry::new();
        assert_eq!(registry.count(), 0);
        assert!(registry.get_all().is_empty());
    }

    #[test]
    fn test_get_by_id() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let registry = populated_registry(&temp_dir);

        let form_id = FormId::new("parent-request").expect("valid form ID");
        let definition = registry.get(&form_id).expect("get definition");
        assert_eq!(definition.form.audience, Audience::Parent);

        let missing = FormId::new("no-such-form").expect("valid form ID");
        assert!(matches!(
            registry.get(&missing),
            Err(FormError::NotFound { .. })
        ));
    }

    #[test]
    fn test_get_all_sorted() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let registry = populated_registry(&temp_dir);

        let all = registry.get_all();
        assert_eq!(all.len(), 3);
        let ids: Vec<_> = all.iter().map(|d| d.id().as_str().to_string()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_query_by_audience_and_region() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let registry = populated_registry(&temp_dir);

        assert_eq!(registry.get_by_audience(Audience::Myself).len(), 2);
        assert_eq!(registry.get_by_audience(Audience::Parent).len(), 1);
        assert_eq!(registry.get_by_audience(Audience::Educator).len(), 0);

        assert_eq!(registry.get_by_region(Region::Domestic).len(), 2);
        assert_eq!(registry.get_by_region(Region::International).len(), 1);
    }

    #[test]
    fn test_reload_replaces_cache() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let registry = populated_registry(&temp_dir);
        assert_eq!(registry.count(), 3);

        write_definition(temp_dir.path(), "educator-request", "educator", "domestic");
        let loader = FormLoader::new(temp_dir.path()).expect("create loader");
        registry.reload(&loader).expect("reload");
        assert_eq!(registry.count(), 4);
    }
}
