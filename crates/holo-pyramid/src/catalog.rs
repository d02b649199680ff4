//! The list of models offered on the selection screen.

use clap::ValueEnum;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Models shipped in the assets directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum ModelId {
    UtahTeapot,
    Icosahedron,
    Spider,
}

impl ModelId {
    /// Bundled models in list order.
    pub const ALL: [ModelId; 3] = [ModelId::UtahTeapot, ModelId::Icosahedron, ModelId::Spider];

    pub fn display_name(self) -> &'static str {
        match self {
            ModelId::UtahTeapot => "Utah Teapot",
            ModelId::Icosahedron => "Icosahedron",
            ModelId::Spider => "Spider",
        }
    }

    pub fn asset_file(self) -> &'static str {
        match self {
            ModelId::UtahTeapot => "utah_teapot.obj",
            ModelId::Icosahedron => "icosahedron.obj",
            ModelId::Spider => "spider.obj",
        }
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub name: String,
    pub path: PathBuf,
    /// Set for the bundled models, `None` for files discovered on disk.
    pub bundled: Option<ModelId>,
}

#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    entries: Vec<CatalogEntry>,
}

impl ModelCatalog {
    /// Bundled models only, resolved against `assets_dir`.
    pub fn bundled(assets_dir: &Path) -> Self {
        let entries = ModelId::ALL
            .iter()
            .map(|&id| CatalogEntry {
                name: id.display_name().to_owned(),
                path: assets_dir.join(id.asset_file()),
                bundled: Some(id),
            })
            .collect();
        Self { entries }
    }

    /// Bundled models followed by every other `.obj` below `assets_dir`,
    /// sorted by file name.
    pub fn discover(assets_dir: &Path) -> Self {
        let mut catalog = Self::bundled(assets_dir);

        if !assets_dir.is_dir() {
            log::warn!(
                "Assets directory '{}' not found; only the bundled models are listed.",
                assets_dir.display()
            );
            return catalog;
        }

        let mut extra: Vec<PathBuf> = WalkDir::new(assets_dir)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .and_then(|s| s.to_str())
                    .map_or(false, |ext| ext.eq_ignore_ascii_case("obj"))
            })
            .map(|e| e.path().to_path_buf())
            .filter(|p| !catalog.entries.iter().any(|c| &c.path == p))
            .collect();

        extra.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));
        extra.dedup();

        log::info!(
            "Model catalog: {} bundled, {} discovered in '{}'.",
            catalog.entries.len(),
            extra.len(),
            assets_dir.display()
        );

        catalog.entries.extend(extra.into_iter().map(|path| CatalogEntry {
            name: display_name_for(&path),
            path,
            bundled: None,
        }));
        catalog
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn find(&self, id: ModelId) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.bundled == Some(id))
    }
}

/// "low_poly-fox.obj" -> "Low Poly Fox"
fn display_name_for(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    stem.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "holo_pyramid_catalog_{}_{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn bundled_models_keep_list_order() {
        let cat = ModelCatalog::bundled(Path::new("assets"));
        let names: Vec<_> = cat.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Utah Teapot", "Icosahedron", "Spider"]);
        assert_eq!(
            cat.find(ModelId::Spider).unwrap().path,
            Path::new("assets").join("spider.obj")
        );
    }

    #[test]
    fn missing_directory_yields_bundled_only() {
        let cat = ModelCatalog::discover(Path::new("/no/such/holo/assets"));
        assert_eq!(cat.entries().len(), 3);
        assert!(cat.entries().iter().all(|e| e.bundled.is_some()));
    }

    #[test]
    fn discovers_extra_obj_files_after_bundled() {
        let dir = scratch_dir("extra");
        fs::write(dir.join("icosahedron.obj"), "v 0 0 0\n").unwrap();
        fs::write(dir.join("zebra.obj"), "").unwrap();
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("nested").join("low_poly-fox.OBJ"), "").unwrap();
        fs::write(dir.join("notes.txt"), "").unwrap();

        let cat = ModelCatalog::discover(&dir);
        let names: Vec<_> = cat.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            ["Utah Teapot", "Icosahedron", "Spider", "Low Poly Fox", "Zebra"]
        );
        assert_eq!(cat.get(4).unwrap().bundled, None);
        assert!(cat.get(5).is_none());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn display_names_are_title_cased() {
        assert_eq!(display_name_for(Path::new("a/utah_teapot.obj")), "Utah Teapot");
        assert_eq!(display_name_for(Path::new("x.obj")), "X");
        assert_eq!(ModelId::UtahTeapot.to_string(), "Utah Teapot");
    }
}
