use super::{RegistryMap, RegistryStore};
use crate::error::{CodaError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const REGISTRY_FILE: &str = "templates.json";

/// JSON-file registry store.
///
/// A missing file is an empty registry. A file that cannot be parsed is also treated
/// as empty (with a warning) so a damaged registry never blocks raw document ids.
pub struct FsRegistry {
    path: PathBuf,
}

impl FsRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store `templates.json` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(REGISTRY_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RegistryStore for FsRegistry {
    fn load(&self) -> Result<RegistryMap> {
        if !self.path.exists() {
            return Ok(RegistryMap::new());
        }
        let content = fs::read_to_string(&self.path).map_err(CodaError::Io)?;
        match serde_json::from_str(&content) {
            Ok(map) => Ok(map),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "template registry is unreadable, starting empty"
                );
                Ok(RegistryMap::new())
            }
        }
    }

    fn save(&self, map: &RegistryMap) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(CodaError::Io)?;
        }

        let content = serde_json::to_string_pretty(map).map_err(CodaError::Serialization)?;

        // Atomic write
        let tmp_file = dir.join(format!(".templates-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(CodaError::Io)?;
        fs::rename(&tmp_file, &self.path).map_err(CodaError::Io)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TemplateRegistry;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FsRegistry::in_dir(dir.path());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = FsRegistry::in_dir(&dir.path().join("nested"));

        let mut map = RegistryMap::new();
        map.insert("kickoff".into(), "doc-1".into());
        store.save(&map).unwrap();

        assert_eq!(store.load().unwrap(), map);
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = FsRegistry::in_dir(dir.path());
        store.save(&RegistryMap::new()).unwrap();
        store.save(&RegistryMap::new()).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![REGISTRY_FILE.to_string()]);
    }

    #[test]
    fn test_file_is_a_flat_json_object() {
        let dir = TempDir::new().unwrap();
        let store = FsRegistry::in_dir(dir.path());
        let mut map = RegistryMap::new();
        map.insert("weekly".into(), "doc-w".into());
        store.save(&map).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, serde_json::json!({"weekly": "doc-w"}));
    }

    #[test]
    fn test_corrupt_file_is_treated_as_empty() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(REGISTRY_FILE), "{ not json").unwrap();

        let store = FsRegistry::in_dir(dir.path());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_registry_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let mut reg = TemplateRegistry::open(FsRegistry::in_dir(dir.path())).unwrap();
            reg.register("weekly", "doc-w").unwrap();
        }
        let reg = TemplateRegistry::open(FsRegistry::in_dir(dir.path())).unwrap();
        assert_eq!(reg.lookup("weekly"), Some("doc-w"));
    }
}
