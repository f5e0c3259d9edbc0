//! Debounced derived work.
//!
//! Each step has at most one pending deadline. Scheduling again restarts it,
//! so a burst of edits collapses into one run after the last edit.

use std::time::Duration;

use tokio::time::Instant;

/// Derived work that runs after edits settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Markdown,
    Highlight,
    /// Re-run trigger detection after an insertion.
    Retrigger,
}

impl Step {
    /// Order in which due steps run.
    pub const ORDER: [Step; 3] = [Step::Markdown, Step::Highlight, Step::Retrigger];

    fn slot(self) -> usize {
        match self {
            Step::Markdown => 0,
            Step::Highlight => 1,
            Step::Retrigger => 2,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    deadlines: [Option<Instant>; 3],
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)start `step` to run `delay` after `now`.
    pub fn schedule(&mut self, step: Step, now: Instant, delay: Duration) {
        self.deadlines[step.slot()] = Some(now + delay);
    }

    pub fn is_pending(&self, step: Step) -> bool {
        self.deadlines[step.slot()].is_some()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.iter().flatten().min().copied()
    }

    /// Remove and return every step due at `now`, in run order.
    pub fn take_due(&mut self, now: Instant) -> Vec<Step> {
        Step::ORDER
            .into_iter()
            .filter(|step| {
                let slot = &mut self.deadlines[step.slot()];
                match *slot {
                    Some(deadline) if deadline <= now => {
                        *slot = None;
                        true
                    }
                    _ => false,
                }
            })
            .collect()
    }

    /// Remove and return every pending step regardless of deadline.
    pub fn take_all(&mut self) -> Vec<Step> {
        Step::ORDER
            .into_iter()
            .filter(|step| self.deadlines[step.slot()].take().is_some())
            .collect()
    }
}
