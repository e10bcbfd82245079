//! Durable catalog of plugin descriptors.
//!
//! The catalog is a JSON document (`{"version": 1, "plugins": [...]}`)
//! rewritten after every mutation. Built-in descriptors are inserted on load
//! when missing, so catalogs written before a built-in existed pick it up.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use walkdir::WalkDir;

use crate::builtin::builtin_descriptors;
use crate::descriptor::{
    PluginDescriptor, PluginFormat, detect_format, display_name, is_bundle, slugify,
};
use crate::error::{RackError, RackResult};
use crate::paths;

const CATALOG_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    plugins: Vec<PluginDescriptor>,
}

fn default_version() -> u32 {
    CATALOG_VERSION
}

/// Optional overrides for [`PluginLibrary::register_path`].
#[derive(Debug, Clone, Default)]
pub struct RegisterOptions {
    /// Display name; defaults to the file name without its plugin suffix.
    pub name: Option<String>,
    /// Format; defaults to detection by suffix, then `unknown`.
    pub format: Option<PluginFormat>,
    /// Extra metadata stored with the descriptor.
    pub metadata: Map<String, Value>,
}

impl RegisterOptions {
    /// Set the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the format.
    pub fn format(mut self, format: PluginFormat) -> Self {
        self.format = Some(format);
        self
    }
}

/// Catalog of built-in and discovered plugins, keyed by slug.
#[derive(Debug, Clone)]
pub struct PluginLibrary {
    catalog_path: Option<PathBuf>,
    plugins: BTreeMap<String, PluginDescriptor>,
    scan_roots: Vec<PathBuf>,
}

impl PluginLibrary {
    /// A library that is never persisted. Holds only the built-ins and
    /// scans no default directories.
    pub fn in_memory() -> Self {
        let mut library = Self {
            catalog_path: None,
            plugins: BTreeMap::new(),
            scan_roots: Vec::new(),
        };
        library.ensure_builtins();
        library
    }

    /// Load the catalog at `path`, or start an empty one if the file does not
    /// exist yet. Mutations are written back to `path`.
    pub fn load(path: impl Into<PathBuf>) -> RackResult<Self> {
        let path = path.into();
        let mut plugins = BTreeMap::new();

        if path.exists() {
            let text =
                std::fs::read_to_string(&path).map_err(|e| RackError::read_file(&path, e))?;
            let file: CatalogFile =
                serde_json::from_str(&text).map_err(|e| RackError::json(&path, e))?;
            for descriptor in file.plugins {
                plugins.insert(descriptor.slug.clone(), descriptor);
            }
        }

        let mut library = Self {
            catalog_path: Some(path),
            plugins,
            scan_roots: paths::default_plugin_dirs(),
        };
        library.ensure_builtins();
        tracing::debug!(
            path = ?library.catalog_path,
            plugins = library.plugins.len(),
            "loaded plugin catalog"
        );
        Ok(library)
    }

    /// Load the catalog from the platform default location.
    pub fn open_default() -> RackResult<Self> {
        Self::load(paths::catalog_path())
    }

    /// Replace the directories walked by [`rescan`](Self::rescan).
    pub fn with_scan_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.scan_roots = roots;
        self
    }

    /// Directories walked by [`rescan`](Self::rescan) before any extra paths.
    pub fn scan_roots(&self) -> &[PathBuf] {
        &self.scan_roots
    }

    /// Where the catalog is persisted, if anywhere.
    pub fn catalog_path(&self) -> Option<&Path> {
        self.catalog_path.as_deref()
    }

    /// Look up a descriptor by slug.
    pub fn get(&self, slug: &str) -> Option<&PluginDescriptor> {
        self.plugins.get(slug)
    }

    /// All descriptors in slug order.
    pub fn list(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.plugins.values()
    }

    /// Number of known descriptors, built-ins included.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// True if the catalog holds nothing at all.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Register the plugin at `path`.
    ///
    /// Registering an already-known path returns the existing descriptor.
    ///
    /// # Errors
    ///
    /// [`RackError::NotFound`] if `path` does not exist; file errors if the
    /// catalog cannot be written, in which case nothing is registered.
    pub fn register_path(
        &mut self,
        path: impl AsRef<Path>,
        options: RegisterOptions,
    ) -> RackResult<PluginDescriptor> {
        let path = path.as_ref();
        let resolved = path
            .canonicalize()
            .map_err(|_| RackError::NotFound(path.to_path_buf()))?;

        if let Some(existing) = self.find_by_path(&resolved) {
            return Ok(existing.clone());
        }

        let descriptor = self.insert_resolved(resolved, options);
        if let Err(e) = self.save() {
            self.plugins.remove(&descriptor.slug);
            return Err(e);
        }
        tracing::info!(slug = %descriptor.slug, format = %descriptor.format, "registered plugin");
        Ok(descriptor)
    }

    /// Remove a registered plugin.
    ///
    /// Returns `Ok(false)` for unknown slugs and for built-ins, which can
    /// never be removed.
    pub fn remove(&mut self, slug: &str) -> RackResult<bool> {
        if !self.plugins.get(slug).is_some_and(|d| !d.is_builtin()) {
            return Ok(false);
        }
        let Some(removed) = self.plugins.remove(slug) else {
            return Ok(false);
        };
        if let Err(e) = self.save() {
            self.plugins.insert(removed.slug.clone(), removed);
            return Err(e);
        }
        tracing::info!(slug, "removed plugin");
        Ok(true)
    }

    /// Walk the scan roots plus `extra` and register every plugin not yet
    /// known. Returns only the newly added descriptors.
    ///
    /// Missing roots are skipped. Bundle directories are registered as a
    /// whole and not descended into. If the catalog cannot be written the
    /// new entries are dropped again.
    pub fn rescan(&mut self, extra: &[PathBuf]) -> RackResult<Vec<PluginDescriptor>> {
        let roots: Vec<PathBuf> = self.scan_roots.iter().chain(extra).cloned().collect();
        let mut added = Vec::new();

        for root in &roots {
            if !root.exists() {
                tracing::debug!(root = %root.display(), "scan root missing, skipping");
                continue;
            }
            for candidate in scan_candidates(root) {
                let Ok(resolved) = candidate.canonicalize() else {
                    continue;
                };
                if self.find_by_path(&resolved).is_some() {
                    continue;
                }
                added.push(self.insert_resolved(resolved, RegisterOptions::default()));
            }
        }

        if !added.is_empty() {
            if let Err(e) = self.save() {
                for descriptor in &added {
                    self.plugins.remove(&descriptor.slug);
                }
                return Err(e);
            }
        }
        tracing::info!(added = added.len(), roots = roots.len(), "plugin rescan complete");
        Ok(added)
    }

    /// Write the catalog to its path. No-op for in-memory libraries.
    pub fn save(&self) -> RackResult<()> {
        let Some(path) = &self.catalog_path else {
            return Ok(());
        };
        let file = CatalogFile {
            version: CATALOG_VERSION,
            plugins: self.plugins.values().cloned().collect(),
        };
        let text = serde_json::to_string_pretty(&file).map_err(|e| RackError::json(path, e))?;
        write_atomic(path, &text)
    }

    fn ensure_builtins(&mut self) {
        for descriptor in builtin_descriptors() {
            self.plugins
                .entry(descriptor.slug.clone())
                .or_insert(descriptor);
        }
    }

    fn find_by_path(&self, resolved: &Path) -> Option<&PluginDescriptor> {
        self.plugins
            .values()
            .find(|d| d.path.as_deref() == Some(resolved))
    }

    fn unique_slug(&self, name: &str) -> String {
        let base = slugify(name);
        if !self.plugins.contains_key(&base) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}-{n}");
            if !self.plugins.contains_key(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    fn insert_resolved(&mut self, resolved: PathBuf, options: RegisterOptions) -> PluginDescriptor {
        let name = options.name.unwrap_or_else(|| display_name(&resolved));
        let format = options
            .format
            .or_else(|| detect_format(&resolved))
            .unwrap_or(PluginFormat::Unknown);
        let slug = self.unique_slug(&name);
        let mut descriptor = PluginDescriptor::external(slug.clone(), name, format, resolved);
        descriptor.metadata = options.metadata;
        self.plugins.insert(slug, descriptor.clone());
        descriptor
    }
}

/// Plugin files and bundles below `root`.
fn scan_candidates(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut walker = WalkDir::new(root).follow_links(true).into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(root = %root.display(), error = %e, "unreadable scan entry");
                continue;
            }
        };
        let path = entry.path();
        if entry.file_type().is_dir() {
            if is_bundle(path) {
                found.push(path.to_path_buf());
                walker.skip_current_dir();
            }
        } else if detect_format(path).is_some() {
            found.push(path.to_path_buf());
        }
    }
    found
}

/// Write `text` to a uniquely named sibling temporary file, then rename it
/// over `path`.
pub(crate) fn write_atomic(path: &Path, text: &str) -> RackResult<()> {
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent).map_err(|e| RackError::create_dir(parent, e))?;
            parent
        }
        None => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".ambiance-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| RackError::write_file(dir, e))?;
    tmp.write_all(text.as_bytes())
        .map_err(|e| RackError::write_file(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| RackError::write_file(path, e.error))?;
    Ok(())
}
