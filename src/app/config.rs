use crate::app::cli::Cli;
use crate::app::formatter::folder_name;
use crate::app::models::RuntimeConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const DEFAULT_DEPTH: usize = 3;
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_000_000;

#[derive(Deserialize, Debug)]
struct PresetsFile {
    #[serde(flatten)]
    presets: HashMap<String, PresetConfig>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PresetConfig {
    pub depth: Option<usize>,
    pub checkfile: Option<bool>,
    pub maxfilesize: Option<u64>,
    pub sort: Option<bool>,
    pub ignore: Option<Vec<String>>,
}

/// Reads `~/.config/folder_check/presets.toml`, empty when absent.
fn load_presets_file() -> Result<HashMap<String, PresetConfig>> {
    load_presets_from(dirs::home_dir().as_deref())
}

fn load_presets_from(home: Option<&Path>) -> Result<HashMap<String, PresetConfig>> {
    let Some(home) = home else {
        log::debug!("No home directory, skipping presets");
        return Ok(HashMap::new());
    };
    let config_path = home
        .join(".config")
        .join("folder_check")
        .join("presets.toml");

    if !config_path.exists() {
        return Ok(HashMap::new());
    }
    parse_presets_file(&config_path)
}

fn parse_presets_file(path: &Path) -> Result<HashMap<String, PresetConfig>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {:?}", path))?;

    let parsed: PresetsFile = toml::from_str(&content).context("Failed to parse presets.toml")?;
    Ok(parsed.presets)
}

/// Concatenates preset and CLI patterns, dropping repeats but keeping order.
pub fn merge_vecs(preset_vec: Option<Vec<String>>, cli_vec: Option<Vec<String>>) -> Vec<String> {
    let mut combined = preset_vec.unwrap_or_default();
    if let Some(mut cli_items) = cli_vec {
        combined.append(&mut cli_items);
    }
    let mut seen = std::collections::HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    combined
}

pub fn resolve_config(cli: Cli) -> Result<RuntimeConfig> {
    let presets = load_presets_file()?;
    Ok(resolve_with_presets(cli, &presets))
}

/// CLI value > preset value > default. Flags are on if either side sets them.
fn resolve_with_presets(cli: Cli, presets: &HashMap<String, PresetConfig>) -> RuntimeConfig {
    let project_name = folder_name(&cli.root);
    let preset_key = cli.preset.as_deref().unwrap_or(&project_name);
    let preset = presets.get(preset_key).cloned().unwrap_or_default();
    if presets.contains_key(preset_key) {
        log::info!("Using preset '{}'", preset_key);
    } else if let Some(name) = cli.preset.as_deref() {
        log::warn!("Preset '{}' not found, using defaults", name);
    }

    RuntimeConfig {
        max_depth: cli.depth.or(preset.depth).unwrap_or(DEFAULT_DEPTH),
        check_file: cli.checkfile || preset.checkfile.unwrap_or(false),
        max_file_size: cli
            .maxfilesize
            .or(preset.maxfilesize)
            .unwrap_or(DEFAULT_MAX_FILE_SIZE),
        extra_ignore: merge_vecs(preset.ignore, cli.ignore),
        sort: cli.sort || preset.sort.unwrap_or(false),
        output: cli.output,
        root: cli.root,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("folder_check").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_without_presets() {
        let config = resolve_with_presets(cli(&["some/dir"]), &HashMap::new());
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.max_file_size, 1_000_000);
        assert!(!config.check_file);
        assert!(!config.sort);
        assert!(config.extra_ignore.is_empty());
        assert!(config.output.is_none());
    }

    #[test]
    fn cli_values_are_used() {
        let config = resolve_with_presets(
            cli(&["dir", "--depth", "2", "--checkfile", "--maxfilesize", "500"]),
            &HashMap::new(),
        );
        assert_eq!(config.max_depth, 2);
        assert!(config.check_file);
        assert_eq!(config.max_file_size, 500);
    }

    #[test]
    fn preset_matched_by_folder_name_fills_gaps() {
        let mut presets = HashMap::new();
        presets.insert(
            "webapp".to_string(),
            PresetConfig {
                depth: Some(5),
                checkfile: Some(true),
                maxfilesize: Some(10),
                sort: None,
                ignore: Some(vec!["node_modules".into(), "*.log".into()]),
            },
        );

        let config = resolve_with_presets(
            cli(&["projects/webapp", "--depth", "1", "--ignore", "*.log", "dist"]),
            &presets,
        );
        assert_eq!(config.max_depth, 1);
        assert!(config.check_file);
        assert_eq!(config.max_file_size, 10);
        assert_eq!(config.extra_ignore, vec!["node_modules", "*.log", "dist"]);
    }

    #[test]
    fn explicit_preset_overrides_folder_name() {
        let mut presets = HashMap::new();
        presets.insert(
            "shallow".to_string(),
            PresetConfig {
                depth: Some(1),
                ..Default::default()
            },
        );
        presets.insert(
            "webapp".to_string(),
            PresetConfig {
                depth: Some(9),
                ..Default::default()
            },
        );

        let config =
            resolve_with_presets(cli(&["projects/webapp", "--preset", "shallow"]), &presets);
        assert_eq!(config.max_depth, 1);
    }

    #[test]
    fn parses_presets_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("presets.toml");
        fs::write(
            &path,
            "[webapp]\ndepth = 4\ncheckfile = true\nignore = [\"target\"]\n\n[docs]\nsort = true\n",
        )
        .unwrap();

        let presets = parse_presets_file(&path).unwrap();
        assert_eq!(presets["webapp"].depth, Some(4));
        assert_eq!(presets["webapp"].ignore, Some(vec!["target".to_string()]));
        assert_eq!(presets["docs"].sort, Some(true));
    }

    #[test]
    fn no_home_directory_means_no_presets() {
        assert!(load_presets_from(None).unwrap().is_empty());
    }

    #[test]
    fn home_without_presets_file_means_no_presets() {
        let tmp = TempDir::new().unwrap();
        assert!(load_presets_from(Some(tmp.path())).unwrap().is_empty());
    }

    #[test]
    fn malformed_presets_toml_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("presets.toml");
        fs::write(&path, "[webapp\ndepth = ").unwrap();
        assert!(parse_presets_file(&path).is_err());
    }

    #[test]
    fn merge_vecs_dedupes_in_order() {
        let merged = merge_vecs(
            Some(vec!["a".into(), "b".into()]),
            Some(vec!["b".into(), "c".into(), "a".into()]),
        );
        assert_eq!(merged, vec!["a", "b", "c"]);
    }
}
