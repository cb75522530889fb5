//! Ignore-file rule discovery
//!
//! Walks a root looking for ignore files (`.gitignore` and friends) and
//! turns every rule in them into a root-relative gitignore line. A rule
//! read from `sub/dir/.gitignore` only applies below `sub/dir`, so it is
//! rewritten with that prefix:
//!
//! | line in `sub/.gitignore` | root-relative rule |
//! |--------------------------|--------------------|
//! | `*.log`                  | `sub/**/*.log`     |
//! | `/build`                 | `sub/build`        |
//! | `out/tmp`                | `sub/out/tmp`      |
//! | `!keep.log`              | `!sub/**/keep.log` |
//!
//! Files are read shallowest first so rules from deeper files come later
//! and win under last-match-wins. Directories the root-independent
//! exclusions already prune (`node_modules/`, `.git/`, ...) are never
//! searched, and rule files are decoded lossily like git reads them.

use super::context::ScanContext;
use super::errors::{ScanError, ScanResult};
use super::matcher::{MatcherSet, slash_path};
use ignore::{WalkBuilder, WalkState};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Collects ignore rules beneath a root
#[derive(Debug, Clone)]
pub struct IgnoreRuleSource {
    filenames: HashSet<String>,
    threads: usize,
}

impl IgnoreRuleSource {
    pub fn new<S: AsRef<str>>(filenames: &[S], threads: usize) -> Self {
        Self {
            filenames: filenames.iter().map(|f| f.as_ref().to_string()).collect(),
            threads: threads.max(1),
        }
    }

    /// All rules found under `root`, scoped to the directory of the file
    /// they came from. Directories matched by `prune` are skipped.
    ///
    /// Any walk or read failure fails the whole root; the caller decides
    /// to skip it. An ended context stops the walk early with whatever was
    /// found so far.
    pub fn discover(
        &self,
        ctx: &ScanContext,
        root: &Path,
        prune: &MatcherSet,
    ) -> ScanResult<Vec<String>> {
        if self.filenames.is_empty() || !root.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = self.find_ignore_files(ctx, root, prune)?;
        files.sort_by(|a, b| {
            a.components()
                .count()
                .cmp(&b.components().count())
                .then_with(|| a.cmp(b))
        });

        let mut rules = Vec::new();
        for file in &files {
            let bytes = std::fs::read(file).map_err(|source| ScanError::RuleFile {
                path: file.clone(),
                source,
            })?;
            let content = String::from_utf8_lossy(&bytes);
            let scope = file
                .parent()
                .and_then(|dir| dir.strip_prefix(root).ok())
                .map(slash_path)
                .unwrap_or_default();

            let before = rules.len();
            rules.extend(content.lines().filter_map(|line| scope_rule(&scope, line)));
            tracing::trace!("Loaded {} rules from {}", rules.len() - before, file.display());
        }

        tracing::debug!(
            "Found {} ignore rules in {} files under {}",
            rules.len(),
            files.len(),
            root.display()
        );
        Ok(rules)
    }

    fn find_ignore_files(
        &self,
        ctx: &ScanContext,
        root: &Path,
        prune: &MatcherSet,
    ) -> ScanResult<Vec<PathBuf>> {
        let found = Arc::new(Mutex::new(Vec::new()));
        let failure: Arc<Mutex<Option<ignore::Error>>> = Arc::new(Mutex::new(None));

        let mut builder = WalkBuilder::new(root);
        builder.standard_filters(false).threads(self.threads);

        let prune = Arc::new(prune.clone());
        builder.filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            entry.depth() == 0 || !is_dir || !prune.matches(entry.path(), true)
        });

        builder.build_parallel().run(|| {
            let found = Arc::clone(&found);
            let failure = Arc::clone(&failure);
            let filenames = &self.filenames;

            Box::new(move |result| {
                if ctx.is_done() {
                    return WalkState::Quit;
                }
                match result {
                    Ok(entry) => {
                        let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
                        let wanted = entry
                            .file_name()
                            .to_str()
                            .is_some_and(|name| filenames.contains(name));
                        if is_file
                            && wanted
                            && let Ok(mut found) = found.lock()
                        {
                            found.push(entry.into_path());
                        }
                        WalkState::Continue
                    }
                    Err(err) => {
                        if let Ok(mut failure) = failure.lock() {
                            failure.get_or_insert(err);
                        }
                        WalkState::Quit
                    }
                }
            })
        });

        let failure = failure.lock().ok().and_then(|mut failure| failure.take());
        if let Some(source) = failure {
            return Err(ScanError::Walk {
                root: root.to_path_buf(),
                source,
            });
        }

        let files = found.lock().map(|mut found| std::mem::take(&mut *found)).unwrap_or_default();
        Ok(files)
    }
}

/// Rewrite one ignore-file line so it applies only below `scope`
/// (`/`-separated, empty for the root). Blank lines and comments yield
/// `None`.
pub fn scope_rule(scope: &str, line: &str) -> Option<String> {
    let line = line.trim_end();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    if scope.is_empty() {
        return Some(line.to_string());
    }

    let (negation, body) = match line.strip_prefix('!') {
        Some(rest) => ("!", rest),
        None => ("", line),
    };
    if body.is_empty() {
        return None;
    }

    let scoped = if let Some(anchored) = body.strip_prefix('/') {
        format!("{scope}/{anchored}")
    } else if body.trim_end_matches('/').contains('/') {
        format!("{scope}/{body}")
    } else {
        format!("{scope}/**/{body}")
    };
    Some(format!("{negation}{scoped}"))
}
