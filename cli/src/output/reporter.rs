//! `TerminalReporter` — Presentation-layer implementation of `LifecycleObserver`.
//!
//! Wraps `&OutputContext` so application services can report lifecycle
//! events without depending on any presentation type directly.

use crate::application::ports::LifecycleObserver;
use crate::domain::{LifecycleEvent, Operation, Phase};
use crate::output::{LineKind, OutputContext};

/// Terminal reporter that wraps an `OutputContext`.
///
/// - `Started` prints `"+ {operation} {domain}..."`
/// - `Progress` prints `"  → {detail}"`
/// - `Succeeded` prints `"  ✓ {domain}: {operation} finished"`
/// - `Skipped` prints `"  ⚠ {domain} {reason}"`
/// - `Failed` prints `"  ✗ {operation} {domain} failed"` to stderr; the
///   cause is printed once by the caller.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }
}

/// The line an event renders to.
#[must_use]
pub fn describe(event: &LifecycleEvent) -> (LineKind, String) {
    let LifecycleEvent {
        operation,
        domain,
        phase,
    } = event;
    match phase {
        Phase::Started => match operation {
            Operation::Clone => (LineKind::Header, format!("cloning into {domain}...")),
            _ => (LineKind::Header, format!("{operation} {domain}...")),
        },
        Phase::Progress(detail) => (LineKind::Step, detail.clone()),
        Phase::Succeeded => (LineKind::Success, format!("{domain}: {operation} finished")),
        Phase::Skipped(reason) => (LineKind::Warning, format!("{domain} {reason}")),
        Phase::Failed(_) => (LineKind::Error, format!("{operation} {domain} failed")),
    }
}

impl LifecycleObserver for TerminalReporter<'_> {
    fn notify(&self, event: &LifecycleEvent) {
        let (kind, msg) = describe(event);
        self.ctx.print(kind, &msg);
    }
}
