//! Output formatting module

pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Kind of a printed line; selects its marker and style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Header,
    Step,
    Success,
    Warning,
    Error,
}

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var_os("NO_COLOR").is_none();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Render one line without printing it.
    #[must_use]
    pub fn line(&self, kind: LineKind, msg: &str) -> String {
        match kind {
            LineKind::Header => format!(
                "{} {}",
                "+".style(self.styles.header),
                msg.style(self.styles.header)
            ),
            LineKind::Step => format!(
                "  {} {}",
                "→".style(self.styles.dim),
                msg.style(self.styles.dim)
            ),
            LineKind::Success => format!("  {} {msg}", "✓".style(self.styles.success)),
            LineKind::Warning => format!("  {} {msg}", "⚠".style(self.styles.warning)),
            LineKind::Error => format!("  {} {msg}", "✗".style(self.styles.error)),
        }
    }

    /// Print a line. Errors go to stderr and are never suppressed; everything
    /// else is suppressed when `quiet`.
    pub fn print(&self, kind: LineKind, msg: &str) {
        match kind {
            LineKind::Error => eprintln!("{}", self.line(kind, msg)),
            _ if self.quiet => {}
            _ => println!("{}", self.line(kind, msg)),
        }
    }
}
