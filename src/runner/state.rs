use crate::core::{BizError, Result};
use serde::Serialize;
use std::fmt;

/// Lifecycle of a single runner invocation
///
/// ```text
/// Created -> Validating -> Rejected
///                       -> Executing -> Committing -> Committed
///                                   \-> Failed     \-> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    Created,
    Validating,
    Rejected,
    Executing,
    Committing,
    Committed,
    Failed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Committed | Self::Failed)
    }

    pub fn can_transition_to(&self, next: RunState) -> bool {
        use RunState::*;
        matches!(
            (self, next),
            (Created, Validating)
                | (Validating, Rejected)
                | (Validating, Executing)
                | (Executing, Committing)
                | (Executing, Failed)
                | (Committing, Committed)
                | (Committing, Failed)
        )
    }

    /// Checked transition
    pub fn advance(&mut self, next: RunState) -> Result<()> {
        if !self.can_transition_to(next) {
            return Err(BizError::TransactionError(format!(
                "invalid run transition {} -> {}",
                self, next
            )));
        }
        *self = next;
        Ok(())
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::Validating => "validating",
            Self::Rejected => "rejected",
            Self::Executing => "executing",
            Self::Committing => "committing",
            Self::Committed => "committed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut state = RunState::Created;
        for next in [
            RunState::Validating,
            RunState::Executing,
            RunState::Committing,
            RunState::Committed,
        ] {
            state.advance(next).unwrap();
        }
        assert!(state.is_terminal());
    }

    #[test]
    fn test_rejected_is_terminal() {
        let mut state = RunState::Created;
        state.advance(RunState::Validating).unwrap();
        state.advance(RunState::Rejected).unwrap();
        assert!(state.is_terminal());
        assert!(state.advance(RunState::Executing).is_err());
    }

    #[test]
    fn test_cannot_skip_validation() {
        let mut state = RunState::Created;
        assert!(state.advance(RunState::Executing).is_err());
        assert_eq!(state, RunState::Created);
        assert!(!RunState::Validating.can_transition_to(RunState::Committing));
    }
}
