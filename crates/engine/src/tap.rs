//! Double-tap delete coordinator.
//!
//! One explicit state machine replaces the per-screen timestamp comparison:
//! two rapid taps on the same record arm a delete confirmation, a modal
//! confirm triggers the remote call, and local state changes only after the
//! server acknowledged. Timestamps are passed in by the caller so the
//! machine is testable without sleeping.

use std::time::{Duration, Instant};

use crate::{CoreError, CoreResult, aggregate::RecordKey};

/// Window between the two taps.
pub const ARM_WINDOW: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapState {
    Idle,
    /// First tap registered; reverts to idle when the window elapses or a
    /// different record is tapped.
    Armed { key: RecordKey, at: Instant },
    /// Confirmation modal is up. Blocking: no record may arm while a
    /// confirmation is pending or a delete is in flight.
    ConfirmPending { key: RecordKey },
    Deleting { key: RecordKey },
}

/// What a tap did, so the caller knows whether to raise the modal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapOutcome {
    Ignored,
    Armed,
    ConfirmRequested(RecordKey),
}

#[derive(Debug)]
pub struct TapCoordinator {
    state: TapState,
}

impl Default for TapCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl TapCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: TapState::Idle,
        }
    }

    pub fn state(&self) -> TapState {
        self.state
    }

    /// Key of the record currently awaiting confirmation or being deleted.
    pub fn pending_key(&self) -> Option<RecordKey> {
        match self.state {
            TapState::ConfirmPending { key } | TapState::Deleting { key } => Some(key),
            _ => None,
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.pending_key().is_some()
    }

    /// Drives the machine with one tap on `key` at time `now`.
    pub fn on_item_tap(&mut self, key: RecordKey, now: Instant) -> TapOutcome {
        match self.state {
            TapState::Idle => {
                self.state = TapState::Armed { key, at: now };
                TapOutcome::Armed
            }
            TapState::Armed { key: armed, at } => {
                if armed == key && now.duration_since(at) <= ARM_WINDOW {
                    self.state = TapState::ConfirmPending { key };
                    TapOutcome::ConfirmRequested(key)
                } else {
                    // Different record or expired window: this tap starts a
                    // fresh window for its own record, it never confirms.
                    self.state = TapState::Armed { key, at: now };
                    TapOutcome::Armed
                }
            }
            TapState::ConfirmPending { .. } | TapState::Deleting { .. } => TapOutcome::Ignored,
        }
    }

    /// Reverts an expired arm; meant to be called from the event loop tick.
    pub fn tick(&mut self, now: Instant) {
        if let TapState::Armed { at, .. } = self.state {
            if now.duration_since(at) > ARM_WINDOW {
                self.state = TapState::Idle;
            }
        }
    }

    /// Moves to `Deleting` and returns the key to delete remotely.
    ///
    /// Only valid from `ConfirmPending`.
    pub fn begin_delete(&mut self) -> CoreResult<RecordKey> {
        match self.state {
            TapState::ConfirmPending { key } => {
                self.state = TapState::Deleting { key };
                Ok(key)
            }
            _ => Err(CoreError::Validation(
                "no deletion awaiting confirmation".to_string(),
            )),
        }
    }

    /// Ends the in-flight delete, success or failure. The caller removes the
    /// record from the aggregated sequence only on success.
    pub fn finish_delete(&mut self) {
        self.state = TapState::Idle;
    }

    /// Dismisses an armed or pending confirmation without any remote call.
    pub fn cancel(&mut self) {
        if !matches!(self.state, TapState::Deleting { .. }) {
            self.state = TapState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use crate::aggregate::TransactionKind;

    use super::*;

    fn key() -> RecordKey {
        RecordKey {
            kind: TransactionKind::Earning,
            id: Uuid::new_v4(),
        }
    }

    #[test]
    fn two_taps_within_window_request_confirmation() {
        let mut coordinator = TapCoordinator::new();
        let target = key();
        let start = Instant::now();

        assert_eq!(coordinator.on_item_tap(target, start), TapOutcome::Armed);
        assert_eq!(
            coordinator.on_item_tap(target, start + Duration::from_millis(200)),
            TapOutcome::ConfirmRequested(target)
        );
        assert_eq!(coordinator.state(), TapState::ConfirmPending { key: target });
    }

    #[test]
    fn second_tap_after_window_rearms_instead_of_confirming() {
        let mut coordinator = TapCoordinator::new();
        let target = key();
        let start = Instant::now();

        coordinator.on_item_tap(target, start);
        assert_eq!(
            coordinator.on_item_tap(target, start + Duration::from_millis(400)),
            TapOutcome::Armed
        );
    }

    #[test]
    fn tap_on_other_record_does_not_inherit_the_window() {
        let mut coordinator = TapCoordinator::new();
        let first = key();
        let second = key();
        let start = Instant::now();

        coordinator.on_item_tap(first, start);
        // Y restarts its own window from idle; it is not confirmed.
        assert_eq!(
            coordinator.on_item_tap(second, start + Duration::from_millis(100)),
            TapOutcome::Armed
        );
        assert_eq!(
            coordinator.state(),
            TapState::Armed {
                key: second,
                at: start + Duration::from_millis(100)
            }
        );
    }

    #[test]
    fn tick_reverts_expired_arm() {
        let mut coordinator = TapCoordinator::new();
        let target = key();
        let start = Instant::now();

        coordinator.on_item_tap(target, start);
        coordinator.tick(start + Duration::from_millis(200));
        assert!(matches!(coordinator.state(), TapState::Armed { .. }));

        coordinator.tick(start + Duration::from_millis(400));
        assert_eq!(coordinator.state(), TapState::Idle);
    }

    #[test]
    fn pending_confirmation_blocks_other_arming() {
        let mut coordinator = TapCoordinator::new();
        let target = key();
        let start = Instant::now();

        coordinator.on_item_tap(target, start);
        coordinator.on_item_tap(target, start + Duration::from_millis(100));
        assert!(coordinator.is_blocking());
        assert_eq!(
            coordinator.on_item_tap(key(), start + Duration::from_millis(150)),
            TapOutcome::Ignored
        );
    }

    #[test]
    fn begin_delete_only_from_confirm_pending() {
        let mut coordinator = TapCoordinator::new();
        assert!(coordinator.begin_delete().is_err());

        let target = key();
        let start = Instant::now();
        coordinator.on_item_tap(target, start);
        coordinator.on_item_tap(target, start + Duration::from_millis(100));

        assert_eq!(coordinator.begin_delete().unwrap(), target);
        assert_eq!(coordinator.state(), TapState::Deleting { key: target });

        // Failure path: the machine returns to idle, never stays deleting.
        coordinator.finish_delete();
        assert_eq!(coordinator.state(), TapState::Idle);
    }

    #[test]
    fn cancel_dismisses_without_delete() {
        let mut coordinator = TapCoordinator::new();
        let target = key();
        let start = Instant::now();

        coordinator.on_item_tap(target, start);
        coordinator.on_item_tap(target, start + Duration::from_millis(100));
        coordinator.cancel();
        assert_eq!(coordinator.state(), TapState::Idle);
        assert!(coordinator.begin_delete().is_err());
    }
}
