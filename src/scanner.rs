use crate::config::ScanOptions;
use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Compiled form of [`ScanOptions`].
#[derive(Debug, Default)]
pub struct ScanConfig {
    pub include_declarations: bool,
    pub exclude: Vec<Regex>,
}

impl ScanConfig {
    pub fn from_options(options: &ScanOptions) -> Result<Self> {
        let exclude = options
            .exclude
            .iter()
            .map(|pattern| {
                Regex::new(pattern).with_context(|| format!("Invalid exclude pattern {:?}", pattern))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            include_declarations: options.include_declarations,
            exclude,
        })
    }

    /// Whether a file path names a TypeScript source this scan should read.
    pub fn accepts(&self, path: &Path) -> bool {
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

        if !file_name.ends_with(".ts") && !file_name.ends_with(".tsx") {
            return false;
        }
        if file_name.ends_with(".d.ts") && !self.include_declarations {
            return false;
        }

        let display = path.to_string_lossy().replace('\\', "/");
        !self.exclude.iter().any(|re| re.is_match(&display))
    }
}

pub fn scan_directory(dir: &Path, config: &ScanConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        // The root itself is scanned even when it is a node_modules directory
        .filter_entry(|e| e.depth() == 0 || e.file_name() != "node_modules")
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && config.accepts(path) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// Expand a glob pattern into the TypeScript files it matches.
pub fn expand_glob(pattern: &str, config: &ScanConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in glob::glob(pattern).with_context(|| format!("Invalid glob pattern {:?}", pattern))? {
        let path = entry?;
        if path.is_file() && config.accepts(&path) {
            files.push(path);
        }
    }
    Ok(files)
}
