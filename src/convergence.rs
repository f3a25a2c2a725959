use crate::assign::Assignment;

/// Controller state. `Converged` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Converged,
}

/// Tracks update/assignment cycles and decides when to stop.
///
/// Converged once a cycle reproduces the previous cycle's assignment
/// exactly. The initial assignment (against freshly initialized centroids)
/// has nothing to compare to, so the controller starts in `Running`.
#[derive(Debug, Clone)]
pub struct ConvergenceController {
    state: State,
    iterations: usize,
    max_iters: usize,
}

impl ConvergenceController {
    pub fn new(max_iters: usize) -> Self {
        Self {
            state: State::Running,
            iterations: 0,
            max_iters,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Completed update/assignment cycles.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// True when another cycle is needed but the cap forbids it.
    pub fn exhausted(&self) -> bool {
        self.state == State::Running && self.iterations >= self.max_iters
    }

    /// Record one finished cycle and compare its assignment to the previous one.
    pub fn record(&mut self, previous: &Assignment, current: &Assignment) -> State {
        if self.state == State::Converged {
            return self.state;
        }
        self.iterations += 1;
        if previous == current {
            self.state = State::Converged;
        }
        self.state
    }
}
