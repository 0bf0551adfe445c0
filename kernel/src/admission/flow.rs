//! Submission state machine for a single booking or cancellation attempt.
//!
//! Viewing -> PendingConfirmation -> Submitting -> Succeeded | Failed.
//! A second confirm while Submitting is a no-op, failures are terminal for
//! the attempt (no automatic retry), and dismissing a terminal state puts
//! the page back into Viewing.

use super::BookingErrorKind;
use crate::model::id::SpaceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    Book,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPhase {
    Viewing,
    PendingConfirmation { space_id: SpaceId },
    Submitting { space_id: SpaceId },
    Succeeded { space_id: SpaceId },
    Failed { kind: BookingErrorKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingFlow {
    kind: FlowKind,
    phase: FlowPhase,
}

impl Default for BookingFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingFlow {
    pub fn new() -> Self {
        Self {
            kind: FlowKind::Book,
            phase: FlowPhase::Viewing,
        }
    }

    pub fn kind(&self) -> FlowKind {
        self.kind
    }

    pub fn phase(&self) -> FlowPhase {
        self.phase
    }

    /// Opens the confirmation step. Only legal from Viewing; a confirmation
    /// that is already open, or an attempt in flight, keeps its state.
    pub fn request(&mut self, kind: FlowKind, space_id: SpaceId) -> bool {
        match self.phase {
            FlowPhase::Viewing => {
                self.kind = kind;
                self.phase = FlowPhase::PendingConfirmation { space_id };
                true
            }
            _ => false,
        }
    }

    /// The user confirmed. Returns the target exactly once; a duplicate
    /// click while Submitting gets None and must not issue a second call.
    pub fn begin_submit(&mut self) -> Option<SpaceId> {
        match self.phase {
            FlowPhase::PendingConfirmation { space_id } => {
                self.phase = FlowPhase::Submitting { space_id };
                Some(space_id)
            }
            _ => None,
        }
    }

    pub fn complete(&mut self) {
        if let FlowPhase::Submitting { space_id } = self.phase {
            self.phase = FlowPhase::Succeeded { space_id };
        }
    }

    pub fn fail(&mut self, kind: BookingErrorKind) {
        if let FlowPhase::Submitting { .. } = self.phase {
            self.phase = FlowPhase::Failed { kind };
        }
    }

    /// Closing the confirmation dialog or a terminal modal returns to
    /// Viewing. A submission in flight cannot be dismissed.
    pub fn dismiss(&mut self) {
        match self.phase {
            FlowPhase::Submitting { .. } => {}
            _ => self.phase = FlowPhase::Viewing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_reaches_succeeded() {
        let space_id = SpaceId::new();
        let mut flow = BookingFlow::new();

        assert!(flow.request(FlowKind::Book, space_id));
        assert_eq!(flow.begin_submit(), Some(space_id));
        flow.complete();
        assert_eq!(flow.phase(), FlowPhase::Succeeded { space_id });

        flow.dismiss();
        assert_eq!(flow.phase(), FlowPhase::Viewing);
    }

    #[test]
    fn duplicate_confirm_click_is_suppressed() {
        let space_id = SpaceId::new();
        let mut flow = BookingFlow::new();
        flow.request(FlowKind::Book, space_id);

        assert_eq!(flow.begin_submit(), Some(space_id));
        // Second rapid click while the request is in flight.
        assert_eq!(flow.begin_submit(), None);
    }

    #[test]
    fn failure_is_terminal_until_dismissed() {
        let space_id = SpaceId::new();
        let mut flow = BookingFlow::new();
        flow.request(FlowKind::Book, space_id);
        flow.begin_submit();
        flow.fail(BookingErrorKind::SpaceAlreadyBooked);

        assert_eq!(
            flow.phase(),
            FlowPhase::Failed {
                kind: BookingErrorKind::SpaceAlreadyBooked
            }
        );
        // No automatic retry: the failed attempt cannot be resubmitted.
        assert_eq!(flow.begin_submit(), None);

        flow.dismiss();
        assert_eq!(flow.phase(), FlowPhase::Viewing);
        // A fresh user-initiated attempt starts over.
        assert!(flow.request(FlowKind::Book, space_id));
    }

    #[test]
    fn request_is_ignored_while_another_attempt_is_active() {
        let first = SpaceId::new();
        let second = SpaceId::new();
        let mut flow = BookingFlow::new();

        assert!(flow.request(FlowKind::Book, first));
        assert!(!flow.request(FlowKind::Book, second));
        assert_eq!(flow.phase(), FlowPhase::PendingConfirmation { space_id: first });
    }

    #[test]
    fn cancellation_uses_the_same_shape() {
        let space_id = SpaceId::new();
        let mut flow = BookingFlow::new();

        assert!(flow.request(FlowKind::Cancel, space_id));
        assert_eq!(flow.kind(), FlowKind::Cancel);
        assert_eq!(flow.begin_submit(), Some(space_id));
        flow.complete();
        assert_eq!(flow.phase(), FlowPhase::Succeeded { space_id });
    }

    #[test]
    fn submitting_cannot_be_dismissed() {
        let space_id = SpaceId::new();
        let mut flow = BookingFlow::new();
        flow.request(FlowKind::Book, space_id);
        flow.begin_submit();

        flow.dismiss();
        assert_eq!(flow.phase(), FlowPhase::Submitting { space_id });
    }
}
