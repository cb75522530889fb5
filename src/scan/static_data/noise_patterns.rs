//! Noise catalog: generated, vendored or tooling files that never carry
//! first-party source.
//!
//! `NOISE_GLOBS` is the gitignore-syntax form compiled into every root's
//! matcher. Entries containing an inner `/` are prefixed with `**/` so they
//! match at any depth, like the single-component entries do.
//!
//! `NOISE_REGEXES` is the same catalog expressed as path regexes, used by
//! `NoisePathFilter` for candidates that never went through a matcher
//! (explicit file roots, custom filter chains).

pub const NOISE_GLOBS: &[&str] = &[
    // Go modules & build
    "go.mod",
    "go.sum",
    "go.work",
    "go.work.sum",
    // Go vendor
    "**/vendor/modules.txt",
    "**/vendor/github.com/",
    "**/vendor/golang.org/x/",
    "**/vendor/google.golang.org/",
    "**/vendor/gopkg.in/",
    "**/vendor/istio.io/",
    "**/vendor/k8s.io/",
    "**/vendor/sigs.k8s.io/",
    // Node / JavaScript / web
    "node_modules/",
    "bower_components/",
    // Lockfiles
    "deno.lock",
    "npm-shrinkwrap.json",
    "package-lock.json",
    "pnpm-lock.yaml",
    "yarn.lock",
    // Vendored JS libraries (jquery also covers jquery-ui)
    "angular*.js",
    "angular*.js.map",
    "bootstrap*.js",
    "bootstrap*.js.map",
    "jquery*.js",
    "jquery*.js.map",
    "plotly*.js",
    "plotly*.js.map",
    "swagger-ui*.js",
    "swagger-ui*.js.map",
    // Python lockfiles
    "Pipfile.lock",
    "poetry.lock",
    // Virtual envs
    "**/venv/lib/",
    "**/venv/lib64/",
    "**/env/lib/",
    "**/env/lib64/",
    "**/virtualenv/lib/",
    "**/virtualenv/lib64/",
    // System libs
    "**/lib/python*/",
    "**/lib64/python*/",
    "**/python/*/lib/",
    "**/python/*/lib64/",
    // Dist info
    "*.dist-info/",
    // Ruby
    "**/vendor/bundle/",
    "**/vendor/ruby/",
    "*.gem",
    // Java / Gradle / Maven
    "gradle.lockfile",
    "gradlew",
    "gradlew.bat",
    "mvnw",
    "mvnw.cmd",
    "**/.mvn/wrapper/MavenWrapperDownloader.java",
    "verification-metadata.xml",
    // Configs & metadata
    ".git/",
    ".gitleaks/",
    "gitleaks.toml",
    "javascript.json",
    "Database.refactorlog",
];

pub const NOISE_REGEXES: &[&str] = &[
    // Go module files
    r"go\.(?:mod|sum|work(?:\.sum)?)$",
    r"(?:^|/)vendor/modules\.txt$",
    // Go vendored dependency trees
    r"(?:^|/)vendor/(?:github\.com|golang\.org/x|google\.golang\.org|gopkg\.in|istio\.io|k8s\.io|sigs\.k8s\.io)(?:/.*)?$",
    r"(?:^|/)node_modules(?:/.*)?$",
    r"(?:^|/)(?:deno\.lock|npm-shrinkwrap\.json|package-lock\.json|pnpm-lock\.yaml|yarn\.lock)$",
    r"(?:^|/)bower_components(?:/.*)?$",
    // Vendored JS libraries, minified or not
    r"(?:^|/)(?:angular|bootstrap|jquery(?:-?ui)?|plotly|swagger-?ui)[a-zA-Z0-9.-]*(?:\.min)?\.js(?:\.map)?$",
    r"(?:^|/)(?:Pipfile|poetry)\.lock$",
    r"(?i)(?:^|/)(?:v?env|virtualenv)/lib(?:64)?(?:/.*)?$",
    r"(?i)(?:^|/)(?:lib(?:64)?/python[23](?:\.\d{1,2})+|python/[23](?:\.\d{1,2})+/lib(?:64)?)(?:/.*)?$",
    r"(?i)(?:^|/)[a-z0-9_.]+-[0-9.]+\.dist-info(?:/.+)?$",
    r"(?:^|/)vendor/(?:bundle|ruby)(?:/.*?)?$",
    r"\.gem$",
    r"(?:^|/)gradle\.lockfile$",
    r"(?:^|/)\.git(?:/.*)?$",
    r"(?:^|/)\.gitleaks(?:/.*)?$",
    r"(?:^|/)gradlew(?:\.bat)?$",
    r"(?:^|/)mvnw(?:\.cmd)?$",
    r"(?:^|/)\.mvn/wrapper/MavenWrapperDownloader\.java$",
    r"gitleaks\.toml",
    r"(?:^|/)javascript\.json$",
    r"verification-metadata\.xml",
    r"Database\.refactorlog",
];
