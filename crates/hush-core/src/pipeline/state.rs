//! Pipeline lifecycle state machine.
//!
//! ```text
//!          push/pull           flush (output filled)
//!   Idle ─────────────► Active ──────────────────────► Draining
//!    ▲                    │                               │
//!    └────────────────────┴─── reset / short flush ───────┘
//! ```

use crate::compat::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum PipelineState {
    /// Freshly constructed or reset. Nothing buffered.
    #[default]
    Idle = 0,
    /// Frames pushed and/or pulled since the last reset.
    Active = 1,
    /// A flush has started and residual output is still being handed out.
    Draining = 2,
}

impl PipelineState {
    #[inline]
    fn from_u8(value: u8) -> Self {
        match value {
            1 => PipelineState::Active,
            2 => PipelineState::Draining,
            _ => PipelineState::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineEvent {
    /// A push or pull touched the buffer.
    Io,
    /// A flush returned a full output buffer; more residue remains.
    DrainStarted,
    /// Buffer cleared and effect history dropped.
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionResult {
    None,
    Changed(PipelineState),
}

/// Next state for `event` in `state`.
pub fn next_state(state: PipelineState, event: PipelineEvent) -> PipelineState {
    use PipelineEvent::*;

    match (state, event) {
        (_, Reset) => PipelineState::Idle,
        (_, DrainStarted) => PipelineState::Draining,
        // Draining is left through a reset before new I/O is accepted.
        (PipelineState::Draining, Io) => PipelineState::Draining,
        (_, Io) => PipelineState::Active,
    }
}

/// Lock-free holder for the current [`PipelineState`].
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicPipelineState {
    value: AtomicU8,
}

impl AtomicPipelineState {
    pub fn new() -> Self {
        Self {
            value: AtomicU8::new(PipelineState::Idle as u8),
        }
    }

    #[inline]
    pub fn get(&self) -> PipelineState {
        PipelineState::from_u8(self.value.load(Ordering::Acquire))
    }

    /// Apply `event`. Concurrent `Io` events from the two roles may race;
    /// both compute the same successor, so the last store wins harmlessly.
    pub fn transition(&self, event: PipelineEvent) -> TransitionResult {
        let current = self.get();
        let next = next_state(current, event);
        if next == current {
            return TransitionResult::None;
        }
        self.value.store(next as u8, Ordering::Release);
        TransitionResult::Changed(next)
    }
}

impl Default for AtomicPipelineState {
    fn default() -> Self {
        Self::new()
    }
}
