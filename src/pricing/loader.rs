use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::AppError;

use super::cache::{get_cache_path, load_cached, load_cached_if_fresh, save_cache};
use super::catalog::{Catalog, CatalogDocument};
use super::fetcher::fetch_catalog;

const CATALOG_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Where the catalog comes from, in priority order: file, remote URL, built-in
#[derive(Debug, Clone, Default)]
pub(crate) struct CatalogOptions {
    pub(crate) path: Option<PathBuf>,
    pub(crate) url: Option<String>,
    pub(crate) offline: bool,
}

impl Catalog {
    /// Load the catalog once at start-up.
    ///
    /// An explicit file must parse. A remote catalog degrades to the cache and
    /// then to the built-in table.
    pub(crate) fn load(options: &CatalogOptions) -> Result<Self, AppError> {
        if let Some(path) = &options.path {
            let catalog = Self::load_file(path)?;
            tracing::info!(path = %path.display(), models = catalog.len(), "using catalog file");
            return Ok(catalog);
        }

        let Some(url) = &options.url else {
            return Ok(Self::builtin());
        };
        let Some(cache_path) = get_cache_path() else {
            tracing::warn!("no home directory, catalog cache disabled");
            return Ok(Self::load_remote(url, None, options.offline));
        };
        Ok(Self::load_remote(url, Some(&cache_path), options.offline))
    }

    fn load_remote(url: &str, cache_path: Option<&Path>, offline: bool) -> Self {
        let start = Instant::now();

        if offline {
            if let Some(catalog) = cache_path.and_then(Self::from_cache) {
                tracing::info!(
                    elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "using cached catalog"
                );
                return catalog;
            }
            tracing::info!("no cached catalog, using built-in pricing");
            return Self::builtin();
        }

        if let Some((doc, age)) = cache_path.and_then(|p| load_cached_if_fresh(p, CATALOG_CACHE_TTL))
            && let Some(catalog) = Self::from_valid_document(doc)
        {
            tracing::info!(age_hours = age.as_secs_f64() / 3600.0, "using cached catalog");
            return catalog;
        }

        tracing::info!(%url, "fetching catalog");
        if let Some(doc) = fetch_catalog(url) {
            let fetched = doc.clone();
            if let Some(catalog) = Self::from_valid_document(doc) {
                if let Some(path) = cache_path {
                    save_cache(path, &fetched);
                }
                tracing::info!(
                    models = catalog.len(),
                    elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "fetched catalog"
                );
                return catalog;
            }
        }

        tracing::warn!(%url, "catalog fetch failed, trying cache");
        if let Some(catalog) = cache_path.and_then(Self::from_cache) {
            return catalog;
        }

        tracing::warn!("no usable catalog cache, using built-in pricing");
        Self::builtin()
    }

    fn from_cache(path: &Path) -> Option<Self> {
        Self::from_valid_document(load_cached(path)?)
    }

    fn from_valid_document(doc: CatalogDocument) -> Option<Self> {
        match Self::from_document(doc) {
            Ok(catalog) => Some(catalog),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring invalid catalog");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn no_options_uses_builtin() {
        let catalog = Catalog::load(&CatalogOptions::default()).unwrap();
        assert_eq!(catalog.len(), Catalog::builtin().len());
    }

    #[test]
    fn explicit_file_wins() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[[models]]\nid = \"only\"\nprovider = \"GOOGLE\"\n[models.standard]\noutput = 1.0"
        )
        .unwrap();
        let options = CatalogOptions {
            path: Some(file.path().to_path_buf()),
            url: Some("http://127.0.0.1:9/never".to_string()),
            offline: false,
        };
        let catalog = Catalog::load(&options).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("only").is_ok());
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let options = CatalogOptions {
            path: Some(PathBuf::from("/nonexistent/mmcost/catalog.json")),
            ..Default::default()
        };
        assert!(matches!(
            Catalog::load(&options),
            Err(AppError::Read { .. })
        ));
    }

    #[test]
    fn offline_remote_uses_cache_then_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("catalog.json");

        let catalog = Catalog::load_remote("http://127.0.0.1:9/x", Some(&cache), true);
        assert_eq!(catalog.len(), Catalog::builtin().len());

        save_cache(
            &cache,
            &CatalogDocument {
                models: Catalog::builtin().entries()[..3].to_vec(),
            },
        );
        let catalog = Catalog::load_remote("http://127.0.0.1:9/x", Some(&cache), true);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn fresh_cache_skips_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("catalog.json");
        save_cache(
            &cache,
            &CatalogDocument {
                models: Catalog::builtin().entries()[..2].to_vec(),
            },
        );
        let catalog = Catalog::load_remote("http://127.0.0.1:9/x", Some(&cache), false);
        assert_eq!(catalog.len(), 2);
    }
}
