//! Plugin descriptors and format detection.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// On-disk plugin format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginFormat {
    /// In-process DSP shipped with ambiance.
    Builtin,
    /// VST 2 (`.vst`, `.dll`).
    Vst,
    /// VST 3 (`.vst3`).
    Vst3,
    /// Audio Unit (`.component`).
    Au,
    /// Max multichannel SVT patch (`.mcsvt`, `.mc.svt`).
    Mcsvt,
    /// Anything else.
    Unknown,
}

impl PluginFormat {
    /// Lowercase tag used in catalogs and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            PluginFormat::Builtin => "builtin",
            PluginFormat::Vst => "vst",
            PluginFormat::Vst3 => "vst3",
            PluginFormat::Au => "au",
            PluginFormat::Mcsvt => "mcsvt",
            PluginFormat::Unknown => "unknown",
        }
    }

    /// Parse a format tag (case-insensitive).
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "builtin" => Some(PluginFormat::Builtin),
            "vst" | "vst2" => Some(PluginFormat::Vst),
            "vst3" => Some(PluginFormat::Vst3),
            "au" | "component" => Some(PluginFormat::Au),
            "mcsvt" | "mc.svt" => Some(PluginFormat::Mcsvt),
            "unknown" => Some(PluginFormat::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for PluginFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Whether a descriptor runs in-process or through an external backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginKind {
    /// Built-in DSP processor.
    Builtin,
    /// Native plugin driven by an external backend.
    External,
}

/// A known processor: built-in recipe or discovered plugin file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    /// Unique identity within a library.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Format tag.
    pub format: PluginFormat,
    /// Execution kind.
    pub kind: PluginKind,
    /// Filesystem location (external plugins only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Open key-value bag.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl PluginDescriptor {
    /// Descriptor for a built-in processor.
    pub fn builtin(slug: &str, name: &str) -> Self {
        Self {
            slug: slug.to_string(),
            name: name.to_string(),
            format: PluginFormat::Builtin,
            kind: PluginKind::Builtin,
            path: None,
            metadata: Map::new(),
        }
    }

    /// Descriptor for an external plugin at `path`.
    pub fn external(slug: String, name: String, format: PluginFormat, path: PathBuf) -> Self {
        Self {
            slug,
            name,
            format,
            kind: PluginKind::External,
            path: Some(path),
            metadata: Map::new(),
        }
    }

    /// True for built-in processors.
    pub fn is_builtin(&self) -> bool {
        self.kind == PluginKind::Builtin
    }
}

/// Suffixes recognized as plugins, longest first so `.mc.svt` wins over `.svt`.
const SUFFIXES: &[(&str, PluginFormat)] = &[
    (".component", PluginFormat::Au),
    (".mc.svt", PluginFormat::Mcsvt),
    (".mcsvt", PluginFormat::Mcsvt),
    (".vst3", PluginFormat::Vst3),
    (".vst", PluginFormat::Vst),
    (".dll", PluginFormat::Vst),
];

/// Suffixes that mark a directory as a plugin bundle.
const BUNDLE_SUFFIXES: &[&str] = &[".vst3", ".component", ".vst"];

fn lower_file_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().to_ascii_lowercase())
}

/// The recognized plugin suffix of `path`, if any.
pub fn plugin_suffix(path: &Path) -> Option<&'static str> {
    let name = lower_file_name(path)?;
    SUFFIXES
        .iter()
        .find(|(suffix, _)| name.ends_with(suffix))
        .map(|(suffix, _)| *suffix)
}

/// Detect a plugin format from the file or bundle name.
pub fn detect_format(path: &Path) -> Option<PluginFormat> {
    let name = lower_file_name(path)?;
    SUFFIXES
        .iter()
        .find(|(suffix, _)| name.ends_with(suffix))
        .map(|(_, format)| *format)
}

/// True if `path` is a directory named like a plugin bundle.
pub fn is_bundle(path: &Path) -> bool {
    path.is_dir()
        && lower_file_name(path)
            .is_some_and(|name| BUNDLE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)))
}

/// True if `path` looks like a plugin: a bundle directory or a file with a
/// plugin suffix.
pub fn looks_like_plugin(path: &Path) -> bool {
    if path.is_dir() {
        is_bundle(path)
    } else {
        detect_format(path).is_some()
    }
}

/// Display name for a plugin path: the file name without its plugin suffix.
pub fn display_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match plugin_suffix(path) {
        Some(suffix) if name.len() > suffix.len() => name[..name.len() - suffix.len()].to_string(),
        _ => path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or(name),
    }
}

/// Turn a display name into a slug: lowercase ASCII alphanumerics joined by
/// single dashes.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("plugin");
    }
    slug
}
