//! Schematic persistence: JSON files and a directory-based catalog.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use rasterlogic_core::Schematic;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write a schematic as pretty-printed JSON.
pub fn save_schematic(path: &Path, schematic: &Schematic) -> Result<(), CatalogError> {
    let json = schematic.to_json()?;
    fs::write(path, json)?;
    log::info!("wrote schematic '{}' to {}", schematic.name, path.display());
    Ok(())
}

/// Read a schematic back from a JSON file.
pub fn load_schematic(path: &Path) -> Result<Schematic, CatalogError> {
    let json = fs::read_to_string(path)?;
    Ok(Schematic::from_json(&json)?)
}

/// A registered schematic as seen by the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub path: PathBuf,
    pub name: String,
    pub pair_count: usize,
    pub width: u32,
    pub height: u32,
}

/// A directory of registered schematics, one JSON file each.
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
}

impl Catalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Register a schematic: write it under a unique, name-derived file stem
    /// and return the path.
    pub fn register(&self, schematic: &Schematic) -> Result<PathBuf, CatalogError> {
        fs::create_dir_all(&self.root)?;
        let id = schematic.id.simple().to_string();
        let path = self
            .root
            .join(format!("{}-{}.json", sanitize(&schematic.name), &id[..8]));
        save_schematic(&path, schematic)?;
        Ok(path)
    }

    /// Enumerate registered schematics, sorted by file name. Non-JSON files
    /// are ignored; unreadable JSON files are an error.
    pub fn list(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let mut paths: Vec<PathBuf> = Vec::new();
        if self.root.is_dir() {
            for entry in fs::read_dir(&self.root)? {
                let path = entry?.path();
                if path.extension().is_some_and(|e| e == "json") {
                    paths.push(path);
                }
            }
        }
        paths.sort();

        let mut entries = Vec::with_capacity(paths.len());
        for path in paths {
            let schematic = load_schematic(&path)?;
            entries.push(CatalogEntry {
                path,
                name: schematic.name.clone(),
                pair_count: schematic.pair_count(),
                width: schematic.width,
                height: schematic.height,
            });
        }
        Ok(entries)
    }
}

/// Reduce a schematic name to a file-system-safe stem.
fn sanitize(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    stem.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("rasterlogic-catalog-{}", Uuid::new_v4()))
    }

    #[test]
    fn test_save_load_roundtrip() {
        let root = temp_root();
        fs::create_dir_all(&root).unwrap();
        let path = root.join("schem.json");

        let schem = Schematic::new("2x2 display grid");
        save_schematic(&path, &schem).unwrap();
        let back = load_schematic(&path).unwrap();
        assert_eq!(back, schem);

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_register_and_list() {
        let root = temp_root();
        let catalog = Catalog::new(&root);

        let a = Schematic::new("1x1 display grid");
        let b = Schematic::new("3x2 display grid");
        let path_a = catalog.register(&a).unwrap();
        catalog.register(&b).unwrap();

        assert!(path_a.starts_with(&root));
        assert!(path_a
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("1x1-display-grid-"));

        let entries = catalog.list().unwrap();
        assert_eq!(entries.len(), 2);
        let mut names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        names.sort();
        assert_eq!(names, ["1x1 display grid", "3x2 display grid"]);

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_list_missing_root_is_empty() {
        let catalog = Catalog::new(temp_root());
        assert!(catalog.list().unwrap().is_empty());
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("3x2 display grid"), "3x2-display-grid");
        assert_eq!(sanitize("  odd/name!  "), "odd-name");
    }
}
