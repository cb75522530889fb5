//! Built-in exclusion catalogs
//!
//! Fixed data shared by every scan:
//! - [`binary_extensions`] - image/binary extensions never worth uploading
//! - [`noise_patterns`] - vendored dependencies, lockfiles, tooling metadata
//!
//! Both are plain `'static` slices; nothing here is mutable at runtime.

pub mod binary_extensions;
pub mod noise_patterns;

pub use binary_extensions::{BINARY_EXTENSIONS, binary_extension_globs};
pub use noise_patterns::{NOISE_GLOBS, NOISE_REGEXES};

/// Gitignore-style lines for the complete built-in catalog, extension
/// globs first.
pub fn builtin_exclusion_rules() -> Vec<String> {
    let mut rules = binary_extension_globs();
    rules.extend(NOISE_GLOBS.iter().map(|glob| glob.to_string()));
    rules
}
