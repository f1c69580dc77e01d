//! Source file discovery
//!
//! Walks the input directory and yields the PHP files to scan, in a stable
//! order, minus the excluded ones.

mod config;

pub use config::ScanConfig;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Use forward slashes as path separators
pub fn normalize_path_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Finds the files a scan should visit
#[derive(Debug, Clone)]
pub struct SourceLocator {
    root: PathBuf,
    extension: String,
    /// Normalized literal path fragments
    exclude: Vec<String>,
}

impl SourceLocator {
    pub fn new(root: impl Into<PathBuf>, config: &ScanConfig) -> Self {
        Self {
            root: root.into(),
            extension: config.extension.trim_start_matches('.').to_string(),
            exclude: config
                .exclude
                .iter()
                .filter(|e| !e.is_empty())
                .map(|e| normalize_path_slashes(e))
                .collect(),
        }
    }

    /// Files to scan, sorted by path. Each call starts a new walk.
    ///
    /// A directory that cannot be read yields an error; callers treat it
    /// as fatal.
    pub fn files(&self) -> impl Iterator<Item = Result<PathBuf>> + '_ {
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) => {
                    let path = entry.path();
                    let wanted = entry.file_type().is_file()
                        && self.has_extension(path)
                        && !self.is_excluded(path);
                    wanted.then(|| Ok(entry.into_path()))
                }
                Err(err) => {
                    let location = err
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| self.root.display().to_string());
                    Some(
                        Err::<PathBuf, _>(err)
                            .with_context(|| format!("Failed to read directory {}", location)),
                    )
                }
            })
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == self.extension)
    }

    /// Whether the path contains any exclusion fragment
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path = normalize_path_slashes(&path.to_string_lossy());
        self.exclude.iter().any(|fragment| path.contains(fragment.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "<?php\n").unwrap();
    }

    fn relative_files(locator: &SourceLocator, root: &Path) -> Vec<String> {
        locator
            .files()
            .map(|f| f.unwrap())
            .map(|f| normalize_path_slashes(&f.strip_prefix(root).unwrap().to_string_lossy()))
            .collect()
    }

    #[test]
    fn test_normalize_path_slashes() {
        assert_eq!(normalize_path_slashes("C:\\wp\\load.php"), "C:/wp/load.php");
        assert_eq!(normalize_path_slashes("/already/fine"), "/already/fine");
    }

    #[test]
    fn test_files_are_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.php");
        touch(dir.path(), "a.php");
        touch(dir.path(), "readme.txt");
        touch(dir.path(), "inc/c.php");
        touch(dir.path(), "inc/style.css");

        let locator = SourceLocator::new(dir.path(), &ScanConfig::default());
        assert_eq!(relative_files(&locator, dir.path()), vec!["a.php", "b.php", "inc/c.php"]);
    }

    #[test]
    fn test_default_excludes_content_directory() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "wp-includes/load.php");
        touch(dir.path(), "wp-content/plugins/x.php");

        let locator = SourceLocator::new(dir.path(), &ScanConfig::default());
        assert_eq!(relative_files(&locator, dir.path()), vec!["wp-includes/load.php"]);
    }

    #[test]
    fn test_backslash_exclusions_are_normalized() {
        let config = ScanConfig {
            exclude: vec!["\\vendor\\".to_string()],
            ..ScanConfig::default()
        };
        let locator = SourceLocator::new("/srv/site", &config);

        assert!(locator.is_excluded(Path::new("/srv/site/vendor/autoload.php")));
        assert!(!locator.is_excluded(Path::new("/srv/site/vendors.php")));
    }

    #[test]
    fn test_files_can_be_walked_twice() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "one.php");

        let locator = SourceLocator::new(dir.path(), &ScanConfig::default());
        assert_eq!(locator.files().count(), 1);
        assert_eq!(locator.files().count(), 1);
    }

    #[test]
    fn test_custom_extension() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.php");
        touch(dir.path(), "b.inc");

        let config = ScanConfig {
            extension: ".inc".to_string(),
            ..ScanConfig::default()
        };
        let locator = SourceLocator::new(dir.path(), &config);
        assert_eq!(relative_files(&locator, dir.path()), vec!["b.inc"]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let locator = SourceLocator::new(dir.path().join("missing"), &ScanConfig::default());
        let results: Vec<_> = locator.files().collect();

        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
