use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use super::catalog::CatalogDocument;

pub(super) fn get_cache_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".cache").join("mmcost").join("catalog.json"))
}

pub(super) fn load_cached(path: &Path) -> Option<CatalogDocument> {
    let file = File::open(path).ok()?;
    serde_json::from_reader(file).ok()
}

pub(super) fn load_cached_if_fresh(path: &Path, ttl: Duration) -> Option<(CatalogDocument, Duration)> {
    let meta = std::fs::metadata(path).ok()?;
    let modified = meta.modified().ok()?;
    let age = SystemTime::now().duration_since(modified).ok()?;
    if age > ttl {
        return None;
    }
    let doc = load_cached(path)?;
    Some((doc, age))
}

pub(super) fn save_cache(path: &Path, doc: &CatalogDocument) {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    match File::create(path) {
        Ok(mut file) => {
            if let Err(e) = serde_json::to_writer(&mut file, doc) {
                tracing::warn!(path = %path.display(), error = %e, "failed to write catalog cache");
            }
        }
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to create catalog cache"),
    }
}
