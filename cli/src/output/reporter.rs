//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use std::cell::RefCell;

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// On a TTY each step runs under a spinner that is ticked off when the next
/// step starts. Otherwise:
/// - `step()` prints `"  → {message}"`
/// - `success()` prints `"  ✓ {message}"`
/// - `warn()` prints `"  ! {message}"`
///
/// All output is suppressed when `ctx.quiet`.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    active: RefCell<Option<(ProgressBar, String)>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            active: RefCell::new(None),
        }
    }

    fn complete_active(&self) {
        if let Some((pb, message)) = self.active.borrow_mut().take() {
            progress::finish_ok(&pb, message.trim_end_matches("..."));
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        self.complete_active();
        if self.ctx.show_progress() {
            let pb = progress::spinner(message);
            *self.active.borrow_mut() = Some((pb, message.to_string()));
        } else {
            println!("  {} {message}", "→".style(self.ctx.styles.step));
        }
    }

    fn success(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        self.complete_active();
        println!("  {} {message}", "✓".style(self.ctx.styles.success));
    }

    fn warn(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        let line = format!("  {} {message}", "!".style(self.ctx.styles.warning));
        match self.active.borrow().as_ref() {
            Some((pb, _)) => pb.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }
}

impl Drop for TerminalReporter<'_> {
    /// A step still spinning here never completed.
    fn drop(&mut self) {
        if let Some((pb, message)) = self.active.get_mut().take() {
            progress::finish_failed(&pb, message.trim_end_matches("..."));
        }
    }
}
