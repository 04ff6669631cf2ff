//! Slot bookkeeping: a reusable UI element that, at any instant, represents
//! at most one photo record.

use std::sync::Arc;

use tracing::debug;
use waypin_model::PhotoId;

use crate::image_service::{FetchHandle, FetchOutcome};

/// Owns at most one in-flight [`FetchHandle`] and the identity it was issued
/// for.
///
/// Rebinding the slot to a different record first requests cancellation of
/// (and drops ownership of) the previous handle. Cancellation is best-effort:
/// a stale completion may still arrive and is rejected by identity check in
/// [`Slot::apply`], never suppressed by the transport. This upholds the one
/// correctness-critical rule of the pipeline: a slot never displays the image
/// result of a fetch issued for a record it no longer represents.
#[derive(Debug, Default)]
pub struct Slot {
    bound: Option<PhotoId>,
    in_flight: Option<FetchHandle>,
    image: Option<Arc<Vec<u8>>>,
}

impl Slot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The record this slot currently represents, if any.
    pub fn bound(&self) -> Option<PhotoId> {
        self.bound
    }

    /// The displayed image bytes, if resolved.
    pub fn image(&self) -> Option<&Arc<Vec<u8>>> {
        self.image.as_ref()
    }

    /// Reassign the slot to a record (a reuse event).
    ///
    /// Cancels any previous in-flight fetch and clears the displayed image.
    pub fn bind(&mut self, photo_id: PhotoId) {
        if let Some(previous) = self.in_flight.take() {
            debug!(stale = %previous.photo_id(), new = %photo_id, "slot reused, cancelling stale fetch");
            previous.cancel();
        }
        self.bound = Some(photo_id);
        self.image = None;
    }

    /// Hand ownership of an in-flight fetch to the slot. Any handle already
    /// held is cancelled and dropped first.
    pub fn attach(&mut self, handle: FetchHandle) {
        if let Some(previous) = self.in_flight.replace(handle) {
            previous.cancel();
        }
    }

    /// Apply a fetch completion.
    ///
    /// Returns `true` and updates the displayed image only when the outcome
    /// was issued for the record the slot still represents; stale deliveries
    /// are no-ops.
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        if self.bound != Some(outcome.photo_id) {
            debug!(stale = %outcome.photo_id, "ignoring completion for reassigned slot");
            return false;
        }

        self.in_flight = None;
        if let Ok(bytes) = outcome.result {
            self.image = Some(bytes);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ImageCacheKey;
    use crate::image_service::FetchOutcome;

    fn outcome_for(photo_id: PhotoId, bytes: &[u8]) -> FetchOutcome {
        FetchOutcome {
            photo_id,
            key: ImageCacheKey::new("k.jpg".into()),
            result: Ok(Arc::new(bytes.to_vec())),
        }
    }

    #[test]
    fn matching_completion_is_applied() {
        let id = PhotoId::new();
        let mut slot = Slot::new();
        slot.bind(id);

        assert!(slot.apply(outcome_for(id, &[1, 2])));
        assert_eq!(slot.image().unwrap().as_slice(), &[1, 2]);
    }

    #[test]
    fn stale_completion_is_a_no_op_after_rebind() {
        let old = PhotoId::new();
        let new = PhotoId::new();
        let mut slot = Slot::new();
        slot.bind(old);
        slot.bind(new);

        assert!(!slot.apply(outcome_for(old, &[9])));
        assert!(slot.image().is_none());
        assert_eq!(slot.bound(), Some(new));
    }

    #[test]
    fn failed_completion_clears_nothing_but_counts_as_applied() {
        let id = PhotoId::new();
        let mut slot = Slot::new();
        slot.bind(id);

        let outcome = FetchOutcome {
            photo_id: id,
            key: ImageCacheKey::new("k.jpg".into()),
            result: Err(crate::error::Error::RequestFailed),
        };
        assert!(slot.apply(outcome));
        assert!(slot.image().is_none());
    }
}
