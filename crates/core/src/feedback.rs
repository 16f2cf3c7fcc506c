use std::time::{Duration, Instant};

pub const DEFAULT_REVERT_AFTER: Duration = Duration::from_secs(3);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedbackState {
    Idle,
    Error { message: String, revert_at: Instant },
}

/// Error styling shown to the user after a failed calculation. It reverts to
/// idle once the revert deadline has passed.
#[derive(Clone, Debug)]
pub struct ErrorFeedback {
    revert_after: Duration,
    state: FeedbackState,
}

impl Default for ErrorFeedback {
    fn default() -> Self {
        Self::new(DEFAULT_REVERT_AFTER)
    }
}

impl ErrorFeedback {
    pub fn new(revert_after: Duration) -> Self {
        Self { revert_after, state: FeedbackState::Idle }
    }

    /// A new signal restarts the revert deadline.
    pub fn signal(&mut self, message: impl Into<String>, now: Instant) {
        self.state =
            FeedbackState::Error { message: message.into(), revert_at: now + self.revert_after };
    }

    pub fn tick(&mut self, now: Instant) -> &FeedbackState {
        if let FeedbackState::Error { revert_at, .. } = &self.state {
            if now >= *revert_at {
                self.state = FeedbackState::Idle;
            }
        }
        &self.state
    }

    pub fn revert_after(&self) -> Duration {
        self.revert_after
    }

    pub fn reset(&mut self) {
        self.state = FeedbackState::Idle;
    }

    pub fn state(&self) -> &FeedbackState {
        &self.state
    }

    pub fn active_message(&self) -> Option<&str> {
        match &self.state {
            FeedbackState::Error { message, .. } => Some(message),
            FeedbackState::Idle => None,
        }
    }
}
