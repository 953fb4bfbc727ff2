//! Translator lifecycle state machine.
//!
//! `Constructed → Initialized → Running → Stopped` with guarded
//! transitions. Each operation on the translator is valid only in a
//! specific state; there is no restart after Stopped.

/// Lifecycle states of the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Constructed but not yet initialized; no joints claimed.
    #[default]
    Constructed,
    /// Directory built, command table populated, ready to start.
    Initialized,
    /// Ticking; the joint set is frozen.
    Running,
    /// Shut down; terminal.
    Stopped,
}

/// Event that can trigger a lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Claim joints and build the directory.
    Initialize,
    /// Begin ticking.
    Start,
    /// Shut down.
    Stop,
}

/// Result of a lifecycle transition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionResult {
    /// Transition succeeded — new state.
    Ok(Lifecycle),
    /// Transition rejected — reason.
    Rejected(&'static str),
}

/// Lifecycle manager holding the current state.
#[derive(Debug, Clone, Default)]
pub struct LifecycleMachine {
    state: Lifecycle,
}

impl LifecycleMachine {
    /// Create a new machine in the Constructed state.
    pub const fn new() -> Self {
        Self {
            state: Lifecycle::Constructed,
        }
    }

    /// Current state.
    #[inline]
    pub const fn state(&self) -> Lifecycle {
        self.state
    }

    /// Whether ticks are currently allowed.
    #[inline]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, Lifecycle::Running)
    }

    /// Attempt a transition given an event.
    pub fn handle_event(&mut self, event: LifecycleEvent) -> TransitionResult {
        use Lifecycle::*;
        use LifecycleEvent::*;

        let next = match (self.state, event) {
            (Constructed, Initialize) => Initialized,
            (Initialized, Start) => Running,
            (Running, Stop) => Stopped,
            _ => {
                return TransitionResult::Rejected(rejection_reason(self.state, event));
            }
        };

        self.state = next;
        TransitionResult::Ok(next)
    }
}

const fn rejection_reason(state: Lifecycle, event: LifecycleEvent) -> &'static str {
    use Lifecycle::*;
    use LifecycleEvent::*;
    match (state, event) {
        (Constructed, _) => "Constructed: only Initialize allowed",
        (Initialized, Initialize) => "already initialized",
        // Valid transition, consumed by handle_event before reaching here.
        (Initialized, Start) => "already running",
        (Initialized, Stop) => "Initialized: must start before stopping",
        (Running, _) => "Running: only Stop allowed",
        (Stopped, _) => "Stopped is terminal",
    }
}
