//! Styled status messages on stderr

use console::style;

/// Output handler for consistent CLI formatting
#[derive(Debug, Clone, Copy)]
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("✔").green(), message);
        }
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("⚠").yellow(), message);
        }
    }

    /// A `count label` line, only with `-v`
    pub fn verbose_breakdown(&self, label: &str, count: usize) {
        if self.verbose && !self.quiet {
            eprintln!(
                "  {} {} {}",
                style("•").cyan(),
                style(count.to_string()).yellow().bold(),
                style(label).dim()
            );
        }
    }
}
