//! Exclusion rules compiled into per-root matchers
//!
//! A [`GlobExclusionSet`] holds the root-independent rules: the built-in
//! noise catalog, caller-supplied custom globs, and the expansion of user
//! exclusion names. Each discovery task combines it with the ignore rules
//! found under its own root into a [`MatcherSet`], compiled once before the
//! walk starts and read-only afterwards.
//!
//! Matching follows gitignore semantics: the last matching rule wins, `!`
//! re-includes, and a rule that matches a directory excludes everything
//! below it.

use super::errors::{ScanError, ScanResult};
use super::static_data::builtin_exclusion_rules;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Component, Path, PathBuf};

/// Validate bare exclusion names and expand each into two recursive globs.
///
/// `"name"` becomes `**/name` (the file or directory itself, anywhere) and
/// `**/name/**` (everything beneath such a directory). Blank entries are
/// skipped; any entry with a `/` or `\`, and the relative names `.` and
/// `..`, are rejected outright.
pub fn expand_exclude_names<S: AsRef<str>>(names: &[S]) -> ScanResult<Vec<String>> {
    let mut patterns = Vec::with_capacity(names.len() * 2);

    for name in names {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.contains(['/', '\\']) || trimmed == "." || trimmed == ".." {
            return Err(ScanError::PathNotAllowed {
                name: trimmed.to_string(),
            });
        }

        patterns.push(format!("**/{trimmed}"));
        patterns.push(format!("**/{trimmed}/**"));
    }

    Ok(patterns)
}

/// Root-independent exclusion rules, validated up front
#[derive(Debug, Clone)]
pub struct GlobExclusionSet {
    rules: Vec<String>,
}

impl GlobExclusionSet {
    /// Built-in catalog, then `custom` globs, then expanded user names
    pub fn compile<S: AsRef<str>>(custom: &[String], user_names: &[S]) -> ScanResult<Self> {
        let mut rules = builtin_exclusion_rules();
        rules.extend(custom.iter().cloned());
        rules.extend(expand_exclude_names(user_names)?);

        tracing::debug!("Exclusion set prepared with {} rules", rules.len());
        Ok(Self { rules })
    }

    /// Only the built-in catalog
    pub fn builtin() -> Self {
        Self {
            rules: builtin_exclusion_rules(),
        }
    }

    /// Exactly the given rules, without the built-in catalog
    pub fn from_rules(rules: Vec<String>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    /// Build the matcher for one root. Rules discovered in that root's
    /// ignore files go last so they can override the catalog.
    pub fn matcher_for(&self, root: &Path, discovered: &[String]) -> ScanResult<MatcherSet> {
        MatcherSet::compile(
            root,
            self.rules.iter().chain(discovered.iter()).map(String::as_str),
        )
    }
}

impl Default for GlobExclusionSet {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Compiled, immutable rule set for one root
#[derive(Debug, Clone)]
pub struct MatcherSet {
    root: PathBuf,
    gitignore: Gitignore,
}

impl MatcherSet {
    /// Compile `rules` relative to `root`. A single bad pattern fails the
    /// whole compilation.
    pub fn compile<'a, I>(root: &Path, rules: I) -> ScanResult<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let root = matcher_root(root);
        let mut builder = GitignoreBuilder::new(&root);

        for rule in rules {
            builder
                .add_line(None, rule)
                .map_err(|source| ScanError::InvalidPattern {
                    pattern: rule.to_string(),
                    source,
                })?;
        }

        let gitignore = builder.build().map_err(|source| ScanError::InvalidPattern {
            pattern: "<rule set>".to_string(),
            source,
        })?;

        tracing::trace!(
            "Compiled matcher for {}: {} ignore / {} whitelist rules",
            root.display(),
            gitignore.num_ignores(),
            gitignore.num_whitelists()
        );
        Ok(Self { root, gitignore })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.gitignore.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gitignore.is_empty()
    }

    /// Whether `path` (or any directory above it, up to the root) is
    /// excluded. Pure; safe to call from many threads.
    pub fn matches(&self, path: &Path, is_dir: bool) -> bool {
        let relative = self.relative(path);
        if relative.as_os_str().is_empty() {
            return false;
        }
        // Gitignore strips its own root back off; handing it the joined
        // path keeps a leading component equal to the root name intact.
        self.gitignore
            .matched_path_or_any_parents(self.root.join(relative), is_dir)
            .is_ignore()
    }

    /// `path` relative to the root. Paths outside the root fall back to
    /// their file name so they are still checked against name rules.
    fn relative<'p>(&self, path: &'p Path) -> &'p Path {
        match path.strip_prefix(&self.root) {
            Ok(relative) if !relative.has_root() => relative,
            _ => path
                .file_name()
                .map(Path::new)
                .unwrap_or_else(|| Path::new("")),
        }
    }
}

/// Directory the rules are anchored at. Files anchor at their parent.
fn matcher_root(root: &Path) -> PathBuf {
    if root.is_dir() {
        return root.to_path_buf();
    }
    match root.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// `/`-joined form of a relative path, used when scoping ignore rules
pub(crate) fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
