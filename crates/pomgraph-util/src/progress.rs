//! Terminal feedback for a resolution run.
//!
//! Everything here writes to stderr; stdout carries only the library list.

use std::io::Write;
use std::time::Duration;

use console::{Style, Term};
use indicatif::{ProgressBar, ProgressStyle};

/// How a resolution run ended, which decides the colour of its summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Resolved,
    Failed,
}

impl Outcome {
    fn style(self) -> Style {
        match self {
            Outcome::Resolved => Style::new().green().bold(),
            Outcome::Failed => Style::new().red().bold(),
        }
    }
}

/// Summary line such as `    Resolved 3 libraries from pom.xml`, label
/// right-aligned so successive runs line up.
pub fn summary_line(outcome: Outcome, label: &str, message: &str) -> String {
    format!("{:>12} {message}", outcome.style().apply_to(label))
}

/// Report a manifest whose libraries were printed.
pub fn status(label: &str, message: &str) {
    let _ = writeln!(
        std::io::stderr(),
        "{}",
        summary_line(Outcome::Resolved, label, message)
    );
}

/// Report a manifest that could not be resolved. The diagnostic itself
/// follows from the error handler.
pub fn status_error(label: &str, message: &str) {
    let _ = writeln!(
        std::io::stderr(),
        "{}",
        summary_line(Outcome::Failed, label, message)
    );
}

/// Spinner shown while parents, imports and modules are fetched.
///
/// Hidden unless stderr is a terminal, so redirected runs print nothing
/// but the summary.
pub fn spinner(message: &str) -> ProgressBar {
    if !Term::stderr().is_term() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
