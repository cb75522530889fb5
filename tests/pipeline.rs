//! End-to-end pipeline scenarios through the public API

use filesift::scan::{
    Candidate, ContextError, FileFilter, FilterDecision, Pipeline, PipelineState, ScanConfig,
    ScanContext, ScanError, ScanStats,
};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// A temporary tree to scan
struct ScanFixture {
    temp_dir: TempDir,
}

impl ScanFixture {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    fn write(&self, rel: &str, content: impl AsRef<[u8]>) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Scan `roots` and return accepted paths relative to the fixture root
    fn scan(&self, config: &ScanConfig, roots: &[PathBuf]) -> (BTreeSet<String>, ScanStats) {
        let pipeline = Pipeline::new(config).unwrap();
        let mut files = pipeline
            .filter(&ScanContext::background(), roots)
            .unwrap();
        let accepted = files.by_ref().map(|path| self.relative(&path)).collect();
        assert_eq!(files.state(), PipelineState::Closed);
        (accepted, files.stats())
    }

    fn scan_root(&self, config: &ScanConfig) -> BTreeSet<String> {
        self.scan(config, &[self.root().to_path_buf()]).0
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(self.root())
            .unwrap()
            .to_string_lossy()
            .replace('\\', "/")
    }
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn wait_for_idle(files: &filesift::scan::AcceptedFiles, limit: Duration) {
    let start = Instant::now();
    while files.active_tasks() > 0 {
        assert!(
            start.elapsed() < limit,
            "{} pipeline threads still running",
            files.active_tasks()
        );
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn test_gitignore_respected() {
    let fixture = ScanFixture::new();
    fixture.write(".gitignore", "*.secret\n");
    fixture.write("main.go", "package main\n");
    fixture.write("config.secret", "password=hunter2\n");
    fixture.write("src/utils.go", "package src\n");
    fixture.write("src/api.secret", "token\n");

    let (accepted, stats) = fixture.scan(&ScanConfig::default(), &[fixture.root().to_path_buf()]);

    assert_eq!(accepted, set(&[".gitignore", "main.go", "src/utils.go"]));
    assert_eq!(stats.files_excluded_by_rules, 2);
    assert_eq!(stats.files_accepted, 3);
}

#[test]
fn test_mixed_file_and_directory_inputs() {
    let fixture = ScanFixture::new();
    fixture.write("dir1/fileA.txt", "a\n");
    fixture.write("other/ignored.txt", "not an input\n");
    fixture.write("rootFile.txt", "root\n");

    let (accepted, stats) = fixture.scan(
        &ScanConfig::default(),
        &[fixture.path("dir1"), fixture.path("rootFile.txt")],
    );

    assert_eq!(accepted, set(&["dir1/fileA.txt", "rootFile.txt"]));
    assert_eq!(stats.roots_requested, 2);
    assert_eq!(stats.roots_failed, 0);
}

#[test]
fn test_multiple_directories() {
    let fixture = ScanFixture::new();
    fixture.write("a/x.txt", "x\n");
    fixture.write("a/deep/y.txt", "y\n");
    fixture.write("b/z.txt", "z\n");
    fixture.write("c/w.txt", "not requested\n");

    let (accepted, _) = fixture.scan(
        &ScanConfig::default(),
        &[fixture.path("a"), fixture.path("b")],
    );

    assert_eq!(accepted, set(&["a/x.txt", "a/deep/y.txt", "b/z.txt"]));
}

#[test]
fn test_nested_gitignore_is_scoped() {
    let fixture = ScanFixture::new();
    fixture.write(".gitignore", "*.log\n");
    fixture.write("sub/.gitignore", "*.tmp\n!keep.log\n");
    fixture.write("a.log", "log\n");
    fixture.write("c.tmp", "top-level tmp is fine\n");
    fixture.write("sub/b.tmp", "tmp\n");
    fixture.write("sub/keep.log", "kept\n");
    fixture.write("sub/deep/keep.log", "kept\n");
    fixture.write("sub/deep/other.log", "dropped\n");

    let accepted = fixture.scan_root(&ScanConfig::default());

    assert_eq!(
        accepted,
        set(&[
            ".gitignore",
            "c.tmp",
            "sub/.gitignore",
            "sub/deep/keep.log",
            "sub/keep.log",
        ])
    );
}

#[test]
fn test_custom_ignore_filenames() {
    let fixture = ScanFixture::new();
    fixture.write(".gitignore", "*.go\n");
    fixture.write(".scanignore", "*.txt\n");
    fixture.write("main.go", "package main\n");
    fixture.write("notes.txt", "notes\n");

    let config = ScanConfig {
        ignore_filenames: vec![".scanignore".to_string()],
        ..ScanConfig::default()
    };
    let accepted = fixture.scan_root(&config);

    assert_eq!(accepted, set(&[".gitignore", ".scanignore", "main.go"]));
}

#[test]
fn test_builtin_noise_is_excluded() {
    let fixture = ScanFixture::new();
    fixture.write("main.go", "package main\n");
    fixture.write("go.sum", "hash\n");
    fixture.write("package-lock.json", "{}\n");
    fixture.write("web/node_modules/react/index.js", "module.exports = {}\n");
    fixture.write("static/jquery-3.6.0.min.js", "jq\n");
    fixture.write("docs/diagram.svg", "<svg/>\n");
    fixture.write("vendor/github.com/pkg/errors/errors.go", "package errors\n");

    assert_eq!(fixture.scan_root(&ScanConfig::default()), set(&["main.go"]));
}

#[test]
fn test_exclude_names_cover_files_and_subtrees() {
    let fixture = ScanFixture::new();
    for name in ["generated", "fixtures"] {
        fixture.write(name, "top-level file\n");
        fixture.write(&format!("src/deep/{name}/api.rs"), "nested\n");
    }
    fixture.write("src/keep.rs", "fn main() {}\n");
    fixture.write("src/generated.rs", "similar name, different file\n");

    let config = ScanConfig {
        exclude: vec!["generated".to_string(), "fixtures".to_string()],
        ..ScanConfig::default()
    };

    assert_eq!(
        fixture.scan_root(&config),
        set(&["src/generated.rs", "src/keep.rs"])
    );
}

#[test]
fn test_path_excludes_rejected_before_scanning() {
    for bad in ["src/generated", "src\\generated", "../up", "..", "."] {
        let config = ScanConfig {
            exclude: vec![bad.to_string()],
            ..ScanConfig::default()
        };
        let err = Pipeline::new(&config).unwrap_err();
        assert!(err.is_validation(), "{bad}");
        assert!(matches!(err, ScanError::PathNotAllowed { .. }));
    }
}

#[test]
fn test_binary_empty_and_oversized_files_dropped() {
    let fixture = ScanFixture::new();
    fixture.write("ok.txt", "hello\n");
    fixture.write("empty.txt", "");
    fixture.write("big.txt", vec![b'a'; 101]);
    fixture.write("exact.txt", vec![b'a'; 100]);
    fixture.write("program.bin", [0x7F, b'E', b'L', b'F', 2, 1, 1, 0, 0, 0, 0, 0, 0, 0]);
    // UTF-16LE without a BOM is text
    fixture.write("utf16.txt", b"h\x00e\x00l\x00l\x00o\x00");

    let config = ScanConfig {
        max_file_size: 100,
        ..ScanConfig::default()
    };
    let (accepted, stats) = fixture.scan(&config, &[fixture.root().to_path_buf()]);

    assert_eq!(accepted, set(&["exact.txt", "ok.txt", "utf16.txt"]));
    assert_eq!(stats.files_filtered_out, 3);
    assert_eq!(stats.files_abandoned(), 0);
}

#[test]
fn test_no_data_loss_under_concurrency() {
    const N: usize = 300;
    let fixture = ScanFixture::new();
    for i in 0..N {
        fixture.write(&format!("d{}/file{i}.txt", i % 7), format!("content {i}\n"));
    }

    for concurrency in [1, 2, 8, 32] {
        let config = ScanConfig {
            concurrency: Some(concurrency),
            ..ScanConfig::default()
        };
        let pipeline = Pipeline::new(&config).unwrap();
        let accepted: Vec<PathBuf> = pipeline
            .filter(&ScanContext::background(), &[fixture.root().to_path_buf()])
            .unwrap()
            .collect();

        let unique: BTreeSet<&PathBuf> = accepted.iter().collect();
        assert_eq!(accepted.len(), N, "concurrency {concurrency}");
        assert_eq!(unique.len(), N, "duplicates at concurrency {concurrency}");
    }
}

#[test]
fn test_cancellation_closes_output_and_stops_threads() {
    let fixture = ScanFixture::new();
    for i in 0..2000 {
        fixture.write(&format!("d{}/f{i}.txt", i % 20), "x\n");
    }

    let ctx = ScanContext::background();
    let config = ScanConfig {
        concurrency: Some(4),
        ..ScanConfig::default()
    };
    let pipeline = Pipeline::new(&config).unwrap();
    let mut files = pipeline
        .filter(&ctx, &[fixture.root().to_path_buf()])
        .unwrap();

    assert!(files.next().is_some());
    ctx.cancel();

    let start = Instant::now();
    let rest = files.by_ref().count();
    assert!(start.elapsed() < Duration::from_secs(1));
    assert!(rest < 2000);

    wait_for_idle(&files, Duration::from_secs(1));
    assert_eq!(files.state(), PipelineState::Closed);
    assert_eq!(files.interrupted(), Some(ContextError::Cancelled));
}

#[test]
fn test_expired_deadline_yields_partial_result() {
    let fixture = ScanFixture::new();
    fixture.write("a.txt", "a\n");

    let ctx = ScanContext::with_deadline(Instant::now());
    let pipeline = Pipeline::new(&ScanConfig::default()).unwrap();
    let mut files = pipeline
        .filter(&ctx, &[fixture.root().to_path_buf()])
        .unwrap();

    assert_eq!(files.by_ref().count(), 0);
    wait_for_idle(&files, Duration::from_secs(1));
    assert_eq!(files.interrupted(), Some(ContextError::DeadlineExceeded));
}

#[test]
fn test_no_usable_roots() {
    let fixture = ScanFixture::new();
    let pipeline = Pipeline::new(&ScanConfig::default()).unwrap();

    let err = pipeline
        .filter(&ScanContext::background(), &[fixture.path("missing")])
        .unwrap_err();
    assert!(matches!(err, ScanError::NoUsableRoots));

    let err = pipeline
        .filter(&ScanContext::background(), &[])
        .unwrap_err();
    assert!(matches!(err, ScanError::NoUsableRoots));
}

#[test]
fn test_bad_root_does_not_starve_good_roots() {
    let fixture = ScanFixture::new();
    fixture.write("good/a.txt", "a\n");

    let (accepted, stats) = fixture.scan(
        &ScanConfig::default(),
        &[fixture.path("missing"), fixture.path("good")],
    );

    assert_eq!(accepted, set(&["good/a.txt"]));
    assert_eq!(stats.roots_failed, 1);
}

#[cfg(unix)]
#[test]
fn test_traversal_failure_fails_only_that_root() {
    use std::os::unix::fs::PermissionsExt;

    let fixture = ScanFixture::new();
    fixture.write("a/a.txt", "a\n");
    fixture.write("b/b.txt", "b\n");
    let locked = fixture.path("a/locked");
    fs::create_dir(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::read_dir(&locked).is_ok() {
        // running with permission checks disabled, nothing to fail
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let (accepted, stats) = fixture.scan(
        &ScanConfig::default(),
        &[fixture.path("a"), fixture.path("b")],
    );
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(accepted.contains("b/b.txt"));
    assert_eq!(stats.roots_failed, 1);
}

struct RejectRs;

impl FileFilter for RejectRs {
    fn name(&self) -> &'static str {
        "RejectRs"
    }

    fn filter(&self, candidate: &Candidate) -> FilterDecision {
        match candidate.path().extension() {
            Some(ext) if ext == "rs" => FilterDecision::Skip("rust"),
            _ => FilterDecision::Process,
        }
    }
}

#[test]
fn test_custom_filter_chain() {
    let fixture = ScanFixture::new();
    fixture.write("lib.rs", "pub fn f() {}\n");
    fixture.write("main.go", "package main\n");
    fixture.write("empty.go", "");

    let pipeline = Pipeline::new(&ScanConfig::default())
        .unwrap()
        .with_filters(vec![Arc::new(RejectRs)]);
    let accepted: BTreeSet<String> = pipeline
        .filter(&ScanContext::background(), &[fixture.root().to_path_buf()])
        .unwrap()
        .map(|path| fixture.relative(&path))
        .collect();

    // the size gate is not in this chain, so the empty file passes
    assert_eq!(accepted, set(&["empty.go", "main.go"]));
}
