//! Source state definitions for tracking crawl progress
//!
//! Every configured IPT walks one of two paths:
//! `Pending -> Fetched -> Parsed -> Reported` or `Pending -> Failed -> Reported`.

use crate::IptError;
use std::fmt;

/// Represents the current state of a source in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceState {
    // ===== Active States =====
    /// Fetch task spawned, no outcome received yet
    Pending,

    /// Raw rows received from the fetch task
    Fetched,

    /// Rows bound into resources
    Parsed,

    // ===== Error State =====
    /// Fetch, read, extraction or decode failed for the whole source
    Failed,

    // ===== Terminal State =====
    /// Outcome appended to the report
    Reported,
}

impl SourceState {
    /// Returns true if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Reported)
    }

    /// Returns true if the source has not yet been reported
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if this represents a source-level failure
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Returns true if moving from `self` to `next` is a legal step
    pub fn can_transition_to(&self, next: SourceState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Fetched)
                | (Self::Pending, Self::Failed)
                | (Self::Fetched, Self::Parsed)
                | (Self::Parsed, Self::Reported)
                | (Self::Failed, Self::Reported)
        )
    }

    /// Performs a transition, rejecting illegal steps
    pub fn transition(self, next: SourceState) -> Result<SourceState, IptError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(IptError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Short lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetched => "fetched",
            Self::Parsed => "parsed",
            Self::Failed => "failed",
            Self::Reported => "reported",
        }
    }
}

impl fmt::Display for SourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
