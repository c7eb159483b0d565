//! Step Wizard
//!
//! Sequences an ordered list of step panels, independent of what each panel
//! contains. Steps are 1-based; `total_steps + 1` is the terminal
//! "completed" pseudo-step.
//!
//! Every transition yields exactly one [`WizardEvent`] (step changed XOR
//! completed). No-op calls yield `None`. The wizard never reaches into the
//! capture flow; it reacts to [`FlowEvent`]s handed to it by the host.

use crate::flow::FlowEvent;

/// Direction of the last transition (drives the slide animation only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Emitted once per transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardEvent {
    StepChanged(usize),
    Completed,
}

/// Status of a single step indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Complete,
    Active,
    Upcoming,
}

#[derive(Debug, Clone)]
pub struct Wizard {
    current_step: usize,
    total_steps: usize,
    direction: Direction,
}

impl Wizard {
    /// Create a wizard positioned on step 1
    pub fn new(total_steps: usize) -> Self {
        Self::with_initial_step(total_steps, 1)
    }

    pub fn with_initial_step(total_steps: usize, initial_step: usize) -> Self {
        let total_steps = total_steps.max(1);
        Self {
            current_step: initial_step.clamp(1, total_steps + 1),
            total_steps,
            direction: Direction::Forward,
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_completed(&self) -> bool {
        self.current_step > self.total_steps
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step == self.total_steps
    }

    /// Move one step forward. On the last content step this completes the
    /// wizard instead; past completion it does nothing.
    pub fn advance(&mut self) -> Option<WizardEvent> {
        if self.current_step < self.total_steps {
            self.direction = Direction::Forward;
            Some(self.update_step(self.current_step + 1))
        } else if self.current_step == self.total_steps {
            self.complete()
        } else {
            None
        }
    }

    /// Move one step back; no-op on step 1
    pub fn retreat(&mut self) -> Option<WizardEvent> {
        if self.current_step > 1 {
            self.direction = Direction::Backward;
            Some(self.update_step(self.current_step - 1))
        } else {
            None
        }
    }

    /// Jump straight to the completion pseudo-step
    pub fn complete(&mut self) -> Option<WizardEvent> {
        if self.is_completed() {
            return None;
        }
        self.direction = Direction::Forward;
        Some(self.update_step(self.total_steps + 1))
    }

    /// Jump to step `n`, clamped into `1..=total_steps + 1`.
    ///
    /// Always fires: jumping to the current step still reports it.
    pub fn go_to_step(&mut self, n: usize) -> WizardEvent {
        let target = n.clamp(1, self.total_steps + 1);
        self.direction = if target > self.current_step {
            Direction::Forward
        } else {
            Direction::Backward
        };
        self.update_step(target)
    }

    /// Indicator status for `step`
    pub fn indicator(&self, step: usize) -> StepStatus {
        if self.current_step == step {
            StepStatus::Active
        } else if self.current_step < step {
            StepStatus::Upcoming
        } else {
            StepStatus::Complete
        }
    }

    /// Whether the connector to the right of `step` is filled
    pub fn connector_complete(&self, step: usize) -> bool {
        self.current_step > step
    }

    /// React to a message from the capture flow
    pub fn handle_flow_event(&mut self, event: &FlowEvent) -> Option<WizardEvent> {
        match event {
            FlowEvent::ProceedRequested | FlowEvent::SubmissionSucceeded => self.advance(),
            FlowEvent::RestartRequested => Some(self.go_to_step(1)),
        }
    }

    fn update_step(&mut self, new_step: usize) -> WizardEvent {
        self.current_step = new_step;
        tracing::debug!(step = new_step, direction = ?self.direction, "wizard step");
        if new_step > self.total_steps {
            WizardEvent::Completed
        } else {
            WizardEvent::StepChanged(new_step)
        }
    }
}
