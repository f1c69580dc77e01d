//! Scan pipeline
//!
//! locate files → read → parse → find hooks → export. Files that cannot be
//! read or parsed are skipped; only a failing directory walk stops the run.

use crate::docblock::DocBlockParser;
use crate::export::{DefaultFormatter, ExportedHook, Exporter};
use crate::extract::{HookDescriptor, HookVisitor};
use crate::source::{ScanConfig, SourceLocator};
use crate::syntax::{SyntaxError, SyntaxParser};
use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// The output file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookDocument {
    /// RFC 3339 UTC timestamp of the run
    pub generated_on: String,
    pub hooks: Vec<ExportedHook>,
}

impl HookDocument {
    pub fn new(hooks: Vec<ExportedHook>) -> Self {
        Self {
            generated_on: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            hooks,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize hooks")
    }
}

/// Counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub hooks: usize,
}

/// Runs a scan over a directory tree
pub struct Pipeline<P, D> {
    parser: P,
    doc_parser: D,
    config: ScanConfig,
}

impl<P: SyntaxParser, D: DocBlockParser> Pipeline<P, D> {
    pub fn new(parser: P, doc_parser: D, config: ScanConfig) -> Self {
        Self {
            parser,
            doc_parser,
            config,
        }
    }

    /// Scan every file under `root` and export the hooks found
    pub fn generate(&mut self, root: &Path) -> Result<(HookDocument, RunSummary)> {
        let locator = SourceLocator::new(root, &self.config);
        let exporter = Exporter::new(
            DefaultFormatter::new(),
            self.config.relative_paths.then_some(root),
        );

        let mut summary = RunSummary::default();
        let mut hooks = Vec::new();

        for file in locator.files() {
            let file = file?;

            let bytes = match std::fs::read(&file) {
                Ok(bytes) => bytes,
                Err(err) => {
                    warn!("Skipping unreadable file {:?}: {}", file, err);
                    summary.files_skipped += 1;
                    continue;
                }
            };
            let source = String::from_utf8_lossy(&bytes);

            match self.scan_source(&file.to_string_lossy(), &source) {
                Ok(found) => {
                    debug!("{:?}: {} hooks", file, found.len());
                    summary.files_scanned += 1;
                    hooks.extend(found.iter().map(|hook| exporter.export_hook(hook)));
                }
                Err(err) => {
                    warn!("Skipping {:?}: {}", file, err);
                    summary.files_skipped += 1;
                }
            }
        }

        summary.hooks = hooks.len();
        info!(
            "Scanned {} files ({} skipped), found {} hooks",
            summary.files_scanned, summary.files_skipped, summary.hooks
        );

        Ok((HookDocument::new(hooks), summary))
    }

    /// Find the documented hooks in one file's source
    pub fn scan_source(
        &mut self,
        path: &str,
        source: &str,
    ) -> std::result::Result<Vec<HookDescriptor>, SyntaxError> {
        let tree = self.parser.parse(source)?;
        let visitor = HookVisitor::new(&self.doc_parser)
            .with_ignore_reused_hooks(self.config.ignore_reused_hooks);
        Ok(visitor.extract(&tree, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docblock::PhpDocParser;
    use crate::syntax::{PhpParser, SyntaxTree};
    use std::fs;
    use tempfile::TempDir;

    /// Counts parse calls and returns empty trees
    #[derive(Default)]
    struct CountingParser {
        calls: usize,
    }

    impl SyntaxParser for CountingParser {
        fn parse(&mut self, _source: &str) -> std::result::Result<SyntaxTree, SyntaxError> {
            self.calls += 1;
            Ok(SyntaxTree { nodes: Vec::new() })
        }
    }

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn php_pipeline(config: ScanConfig) -> Pipeline<PhpParser, PhpDocParser> {
        Pipeline::new(PhpParser::new().unwrap(), PhpDocParser::new(), config)
    }

    #[test]
    fn test_excluded_files_are_never_parsed() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "wp-includes/a.php", "<?php\n");
        write(dir.path(), "wp-content/plugins/b.php", "<?php\n");
        write(dir.path(), "wp-content/themes/c.php", "<?php\n");

        let mut pipeline = Pipeline::new(
            CountingParser::default(),
            PhpDocParser::new(),
            ScanConfig::default(),
        );
        let (document, summary) = pipeline.generate(dir.path()).unwrap();

        assert_eq!(pipeline.parser.calls, 1);
        assert_eq!(summary.files_scanned, 1);
        assert!(document.hooks.is_empty());
    }

    #[test]
    fn test_end_to_end_scan() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "wp-includes/load.php",
            "<?php\n/**\n * Fires on event.\n *\n * @param int $a First.\n */\ndo_action( 'my_event', $a, $b );\n",
        );

        let mut pipeline = php_pipeline(ScanConfig::default());
        let (document, summary) = pipeline.generate(dir.path()).unwrap();

        assert_eq!(
            summary,
            RunSummary {
                files_scanned: 1,
                files_skipped: 0,
                hooks: 1
            }
        );

        let hook = &document.hooks[0];
        assert_eq!(hook.name, "my_event");
        assert_eq!(hook.num_args, 2);
        assert_eq!(hook.path, "/wp-includes/load.php");
        assert_eq!(hook.line, 7);
        assert_eq!(hook.doc.summary, "Fires on event.");
        assert_eq!(hook.doc.tags[0].variable.as_deref(), Some("a"));
    }

    #[test]
    fn test_templated_names_with_padded_arguments() {
        let source = "<?php
/** Fires for a getter. */
do_action( 'x_' . $this->get( 'a' ) );
/** Fires for a type. */
do_action( 'y_' . $args[ 'type' ] . '_z', $args );
";
        let mut pipeline = php_pipeline(ScanConfig::default());
        let hooks = pipeline.scan_source("a.php", source).unwrap();
        let names: Vec<&str> = hooks.iter().map(|h| h.name.as_str()).collect();

        assert_eq!(names, vec!["x_{$this->get('a')}", "y_{$args['type']}_z"]);
        assert_eq!(hooks[1].num_args, 1);
    }

    #[test]
    fn test_broken_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.php", "<?php\nfunction (\n");
        write(
            dir.path(),
            "b.php",
            "<?php\n/** Filters it. */\n$x = apply_filters( 'b', $x );\n",
        );

        let mut pipeline = php_pipeline(ScanConfig::default());
        let (document, summary) = pipeline.generate(dir.path()).unwrap();

        assert_eq!(summary.files_skipped, 1);
        assert_eq!(summary.files_scanned, 1);
        assert_eq!(document.hooks.len(), 1);
        assert_eq!(document.hooks[0].name, "b");
    }

    #[test]
    fn test_absolute_paths() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.php", "<?php\n/** Fires. */\ndo_action( 'a' );\n");

        let config = ScanConfig {
            relative_paths: false,
            ..ScanConfig::default()
        };
        let (document, _) = php_pipeline(config).generate(dir.path()).unwrap();

        let expected = dir.path().join("a.php");
        assert_eq!(document.hooks[0].path, expected.to_string_lossy());
    }

    #[test]
    fn test_reused_hooks_toggle() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "a.php",
            "<?php\n/** This filter is documented in wp-includes/post.php */\n$t = apply_filters( 'the_title', $t );\n",
        );

        let (document, _) = php_pipeline(ScanConfig::default()).generate(dir.path()).unwrap();
        assert!(document.hooks.is_empty());

        let config = ScanConfig {
            ignore_reused_hooks: false,
            ..ScanConfig::default()
        };
        let (document, _) = php_pipeline(config).generate(dir.path()).unwrap();
        assert_eq!(document.hooks.len(), 1);
    }

    #[test]
    fn test_document_json_shape() {
        let document = HookDocument::new(Vec::new());
        let json: serde_json::Value = serde_json::from_str(&document.to_json().unwrap()).unwrap();

        let generated = json["generatedOn"].as_str().unwrap();
        assert!(generated.ends_with("+00:00"), "{}", generated);
        assert!(json["hooks"].as_array().unwrap().is_empty());
    }
}
