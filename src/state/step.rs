//! Multi-step navigation state

use crate::error::StepError;

/// Position in a bounded linear sequence of steps
///
/// Invariant: `1 <= current <= total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepState {
    current: usize,
    total: usize,
}

impl StepState {
    pub fn new(total: usize) -> Result<Self, StepError> {
        if total == 0 {
            return Err(StepError::NoSteps);
        }
        Ok(Self { current: 1, total })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Fill fraction of the progress bar, `(current - 1) / (total - 1)`
    pub fn progress(&self) -> f32 {
        if self.total <= 1 {
            return 0.0;
        }
        ((self.current - 1) as f32 / (self.total - 1) as f32).clamp(0.0, 1.0)
    }

    /// Whether the marker for `step` is lit on the progress tracker
    pub fn is_reached(&self, step: usize) -> bool {
        (1..=self.current).contains(&step)
    }

    pub fn is_last(&self) -> bool {
        self.current == self.total
    }
}

/// A completed move between two steps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepTransition {
    pub from: usize,
    pub to: usize,
    pub progress: f32,
}

impl StepTransition {
    pub fn is_forward(&self) -> bool {
        self.to > self.from
    }
}

/// Moves a [`StepState`] around; out-of-range targets leave it untouched
#[derive(Debug, Clone)]
pub struct StepController {
    state: StepState,
}

impl StepController {
    pub fn new(total: usize) -> Result<Self, StepError> {
        Ok(Self {
            state: StepState::new(total)?,
        })
    }

    pub fn state(&self) -> StepState {
        self.state
    }

    pub fn current(&self) -> usize {
        self.state.current
    }

    pub fn progress(&self) -> f32 {
        self.state.progress()
    }

    /// Jump directly to `step`
    ///
    /// Navigation buttons carry their absolute target, so this is not limited
    /// to neighbouring steps. Re-entering the current step still counts as a
    /// transition and replays its entrance.
    pub fn go_to(&mut self, step: usize) -> Result<StepTransition, StepError> {
        if !(1..=self.state.total).contains(&step) {
            tracing::debug!(step, total = self.state.total, "Rejected step change");
            return Err(StepError::OutOfRange {
                requested: step,
                total: self.state.total,
            });
        }

        let from = self.state.current;
        self.state.current = step;
        Ok(StepTransition {
            from,
            to: step,
            progress: self.state.progress(),
        })
    }

    pub fn next(&mut self) -> Result<StepTransition, StepError> {
        self.go_to(self.state.current + 1)
    }

    pub fn prev(&mut self) -> Result<StepTransition, StepError> {
        self.go_to(self.state.current.saturating_sub(1))
    }

    pub fn reset(&mut self) {
        self.state.current = 1;
    }
}
