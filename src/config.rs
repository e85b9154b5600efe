use crate::scanner::{self, ScanConfig};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "class-inspect.toml";

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub scan: ScanOptions,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    Directory { path: PathBuf },
    File { path: PathBuf },
    Glob { pattern: String },
}

#[derive(Debug, Deserialize)]
pub struct ScanOptions {
    #[serde(default = "default_include_declarations")]
    pub include_declarations: bool,
    /// Regex patterns matched against the file path
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            include_declarations: default_include_declarations(),
            exclude: Vec::new(),
        }
    }
}

fn default_include_declarations() -> bool {
    true
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Config built from command-line paths: directories are scanned, anything
    /// else is read as a single file.
    pub fn from_paths(paths: &[PathBuf]) -> Self {
        let sources = paths
            .iter()
            .map(|path| {
                if path.is_dir() {
                    SourceConfig::Directory { path: path.clone() }
                } else {
                    SourceConfig::File { path: path.clone() }
                }
            })
            .collect();

        Self {
            sources,
            scan: ScanOptions::default(),
        }
    }

    /// Every source file named by the config, relative paths taken from `root`.
    pub fn collect_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let scan_config = ScanConfig::from_options(&self.scan)?;
        let mut files = Vec::new();

        for source in &self.sources {
            match source {
                SourceConfig::Directory { path } => {
                    let resolved = resolve(root, path);
                    if !resolved.is_dir() {
                        anyhow::bail!("Source directory not found: {:?}", resolved);
                    }
                    files.extend(scanner::scan_directory(&resolved, &scan_config)?);
                }
                SourceConfig::File { path } => {
                    let resolved = resolve(root, path);
                    if !resolved.is_file() {
                        anyhow::bail!("Source file not found: {:?}", resolved);
                    }
                    files.push(resolved);
                }
                SourceConfig::Glob { pattern } => {
                    let resolved_pattern = if Path::new(pattern).is_absolute() {
                        pattern.clone()
                    } else {
                        root.join(pattern).to_string_lossy().to_string()
                    };
                    let matched = scanner::expand_glob(&resolved_pattern, &scan_config)
                        .with_context(|| format!("Failed to expand {:?}", pattern))?;
                    files.extend(matched);
                }
            }
        }

        files.sort();
        files.dedup();
        Ok(files)
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
