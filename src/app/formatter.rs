use crate::app::models::DirListing;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::{Component, Path, PathBuf};

pub const OUTPUT_DIR_NAME: &str = "outputs";

pub struct OutputGenerator;

impl OutputGenerator {
    /// Four-space indented JSON; non-ASCII text is written as-is.
    pub fn render_json(structure: &DirListing) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        structure
            .serialize(&mut ser)
            .context("Failed to serialize folder structure")?;
        Ok(String::from_utf8(buf)?)
    }

    /// `<exe dir>/outputs/<root name>.json`
    pub fn default_output_path(root: &Path) -> Result<PathBuf> {
        let exe = std::env::current_exe().context("Failed to locate the running executable")?;
        let exe_dir = exe
            .parent()
            .context("Executable path has no parent directory")?;
        Ok(exe_dir
            .join(OUTPUT_DIR_NAME)
            .join(format!("{}.json", folder_name(root))))
    }

    pub fn write(path: &Path, json: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// Base name of the scanned folder, resolving `.`/`..` through the filesystem.
pub fn folder_name(root: &Path) -> String {
    let last_normal = |p: &Path| match p.components().next_back() {
        Some(Component::Normal(name)) => Some(name.to_string_lossy().into_owned()),
        _ => None,
    };

    last_normal(root)
        .or_else(|| root.canonicalize().ok().as_deref().and_then(last_normal))
        .unwrap_or_else(|| "root".to_string())
}
