//! Child list management.
//!
//! One or two child rows, each with a nickname and a birth date. Saving is
//! a one-shot action: after a successful save the session stays completed
//! until it is reset, edits included.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, info, info_span, Instrument};

use mf_core::child::{age_from_input, ChildField, ChildId, ChildRecord, MAX_CHILDREN};
use mf_core::ports::{ChildProfilePort, ClockPort};
use mf_core::{OneShotLatch, SubmissionError};

use super::liveness::SessionLiveness;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChildListError {
    #[error("at most two children can be registered")]
    LimitReached,

    #[error("at least one child row must remain")]
    LastRow,

    #[error("no child row with id {0}")]
    UnknownChild(ChildId),
}

struct ChildListState {
    children: Vec<ChildRecord>,
    save_in_flight: bool,
    saved: OneShotLatch,
}

impl ChildListState {
    fn new() -> Self {
        Self {
            children: vec![ChildRecord::blank()],
            save_in_flight: false,
            saved: OneShotLatch::default(),
        }
    }

    fn row_mut(&mut self, id: ChildId) -> Result<&mut ChildRecord, ChildListError> {
        self.children
            .iter_mut()
            .find(|child| child.id == id)
            .ok_or(ChildListError::UnknownChild(id))
    }

    fn is_submittable(&self) -> bool {
        !self.saved.is_fired()
            && !self.save_in_flight
            && !self.children.is_empty()
            && self.children.iter().all(ChildRecord::is_complete)
    }
}

pub struct ChildManagementSession {
    state: Mutex<ChildListState>,
    liveness: SessionLiveness,
    clock: Arc<dyn ClockPort>,
    store: Arc<dyn ChildProfilePort>,
}

impl ChildManagementSession {
    pub fn new(clock: Arc<dyn ClockPort>, store: Arc<dyn ChildProfilePort>) -> Self {
        Self {
            state: Mutex::new(ChildListState::new()),
            liveness: SessionLiveness::mounted(),
            clock,
            store,
        }
    }

    /// Appends a blank row and returns its id.
    pub async fn add_child(&self) -> Result<ChildId, ChildListError> {
        let mut state = self.state.lock().await;
        if state.children.len() >= MAX_CHILDREN {
            return Err(ChildListError::LimitReached);
        }
        let child = ChildRecord::blank();
        let id = child.id;
        state.children.push(child);
        Ok(id)
    }

    pub async fn remove_child(&self, id: ChildId) -> Result<(), ChildListError> {
        let mut state = self.state.lock().await;
        if !state.children.iter().any(|child| child.id == id) {
            return Err(ChildListError::UnknownChild(id));
        }
        if state.children.len() <= 1 {
            return Err(ChildListError::LastRow);
        }
        state.children.retain(|child| child.id != id);
        Ok(())
    }

    /// Updates one row. A birth date also recomputes the age against
    /// today's date; an unparsable date leaves the age empty.
    pub async fn set_child_field(
        &self,
        id: ChildId,
        field: ChildField,
        value: &str,
    ) -> Result<(), ChildListError> {
        let today = self.clock.today();
        let mut state = self.state.lock().await;
        let child = state.row_mut(id)?;
        match field {
            ChildField::Nickname => child.nickname = value.to_string(),
            ChildField::BirthDate => {
                child.birth_date = value.to_string();
                child.age = age_from_input(value, today);
                debug!(child = %id, age = ?child.age, "birth date updated");
            }
        }
        Ok(())
    }

    pub async fn children(&self) -> Vec<ChildRecord> {
        self.state.lock().await.children.clone()
    }

    pub async fn is_submittable(&self) -> bool {
        self.state.lock().await.is_submittable()
    }

    pub async fn is_saved(&self) -> bool {
        self.state.lock().await.saved.is_fired()
    }

    pub async fn save(&self) -> Result<(), SubmissionError> {
        let children = {
            let mut state = self.state.lock().await;
            if !self.liveness.is_mounted() {
                return Err(SubmissionError::SessionClosed);
            }
            if state.saved.is_fired() {
                return Err(SubmissionError::AlreadyCompleted);
            }
            if state.save_in_flight {
                return Err(SubmissionError::InFlight);
            }
            if !state.is_submittable() {
                return Err(SubmissionError::NotSubmittable);
            }
            state.save_in_flight = true;
            state.children.clone()
        };

        let span = info_span!("usecase.child_management.save", count = children.len());
        let result = self.store.save_children(&children).instrument(span).await;

        let mut state = self.state.lock().await;
        state.save_in_flight = false;
        if !self.liveness.is_mounted() {
            debug!(saved = result.is_ok(), "save finished after the session closed");
            return Err(SubmissionError::SessionClosed);
        }
        match result {
            Ok(()) => {
                info!(count = children.len(), "children saved");
                state.saved.fire();
                Ok(())
            }
            Err(err) => {
                error!(error = ?err, "saving children failed");
                Err(SubmissionError::Gateway(err))
            }
        }
    }

    pub fn close(&self) {
        self.liveness.close();
    }

    /// Single blank row, save enabled again.
    pub async fn reset(&self) {
        *self.state.lock().await = ChildListState::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::forms::test_support::{FakeChildStore, FixedClock, Hold};
    use chrono::NaiveDate;

    fn session(store: Arc<FakeChildStore>) -> ChildManagementSession {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        ChildManagementSession::new(Arc::new(FixedClock(today)), store)
    }

    async fn first_id(session: &ChildManagementSession) -> ChildId {
        session.children().await[0].id
    }

    async fn fill(session: &ChildManagementSession, id: ChildId) {
        session
            .set_child_field(id, ChildField::Nickname, "첫째")
            .await
            .unwrap();
        session
            .set_child_field(id, ChildField::BirthDate, "2020-03-15")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rows_are_bounded_between_one_and_two() {
        let session = session(Arc::new(FakeChildStore::new()));
        let first = first_id(&session).await;

        assert_eq!(session.remove_child(first).await, Err(ChildListError::LastRow));

        let second = session.add_child().await.unwrap();
        assert_eq!(session.add_child().await, Err(ChildListError::LimitReached));

        session.remove_child(first).await.unwrap();
        let children = session.children().await;
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, second);
    }

    #[tokio::test]
    async fn birth_date_derives_age() {
        let session = session(Arc::new(FakeChildStore::new()));
        let id = first_id(&session).await;

        fill(&session, id).await;
        assert_eq!(session.children().await[0].age, Some(4));

        session
            .set_child_field(id, ChildField::BirthDate, "2020-06-16")
            .await
            .unwrap();
        assert_eq!(session.children().await[0].age, Some(3));

        session
            .set_child_field(id, ChildField::BirthDate, "not a date")
            .await
            .unwrap();
        assert_eq!(session.children().await[0].age, None);
    }

    #[tokio::test]
    async fn unknown_row_is_reported() {
        let session = session(Arc::new(FakeChildStore::new()));
        let stranger = ChildId::new();

        let err = session
            .set_child_field(stranger, ChildField::Nickname, "누구")
            .await
            .unwrap_err();

        assert_eq!(err, ChildListError::UnknownChild(stranger));
    }

    #[tokio::test]
    async fn every_row_must_be_complete() {
        let session = session(Arc::new(FakeChildStore::new()));
        let first = first_id(&session).await;
        fill(&session, first).await;
        assert!(session.is_submittable().await);

        let second = session.add_child().await.unwrap();
        session
            .set_child_field(second, ChildField::Nickname, "둘째")
            .await
            .unwrap();
        assert!(!session.is_submittable().await);
        assert!(matches!(
            session.save().await,
            Err(SubmissionError::NotSubmittable)
        ));
    }

    #[tokio::test]
    async fn save_latches_even_across_edits() {
        let store = Arc::new(FakeChildStore::new());
        let session = session(store.clone());
        let id = first_id(&session).await;
        fill(&session, id).await;

        session.save().await.unwrap();
        assert!(session.is_saved().await);
        assert_eq!(store.saved().len(), 1);

        session
            .set_child_field(id, ChildField::Nickname, "큰아이")
            .await
            .unwrap();
        assert!(!session.is_submittable().await);
        assert!(matches!(
            session.save().await,
            Err(SubmissionError::AlreadyCompleted)
        ));
        assert_eq!(store.saved().len(), 1);

        session.reset().await;
        assert!(!session.is_saved().await);
        assert_eq!(session.children().await.len(), 1);
    }

    #[tokio::test]
    async fn failed_save_can_be_retried() {
        let session = session(Arc::new(FakeChildStore::failing()));
        let id = first_id(&session).await;
        fill(&session, id).await;

        let err = session.save().await.unwrap_err();

        assert!(matches!(err, SubmissionError::Gateway(_)));
        assert!(!session.is_saved().await);
        assert!(session.is_submittable().await);
    }

    #[tokio::test]
    async fn save_in_flight_blocks_another() {
        let hold = Hold::new();
        let store = Arc::new(FakeChildStore::new().held(hold.clone()));
        let session = Arc::new(session(store.clone()));
        let id = first_id(&session).await;
        fill(&session, id).await;

        let first = tokio::spawn({
            let session = session.clone();
            async move { session.save().await }
        });
        hold.wait_started().await;

        assert!(!session.is_submittable().await);
        assert!(matches!(session.save().await, Err(SubmissionError::InFlight)));

        hold.release();
        first.await.unwrap().unwrap();
        assert_eq!(store.saved().len(), 1);
    }

    #[tokio::test]
    async fn closed_session_refuses_to_save() {
        let store = Arc::new(FakeChildStore::new());
        let session = session(store.clone());
        let id = first_id(&session).await;
        fill(&session, id).await;

        session.close();

        assert!(matches!(
            session.save().await,
            Err(SubmissionError::SessionClosed)
        ));
        assert!(store.saved().is_empty());
    }

    #[tokio::test]
    async fn save_resolving_after_close_does_not_latch() {
        let hold = Hold::new();
        let store = Arc::new(FakeChildStore::new().held(hold.clone()));
        let session = Arc::new(session(store.clone()));
        let id = first_id(&session).await;
        fill(&session, id).await;

        let pending = tokio::spawn({
            let session = session.clone();
            async move { session.save().await }
        });
        hold.wait_started().await;

        session.close();
        hold.release();

        let result = pending.await.unwrap();
        assert!(matches!(result, Err(SubmissionError::SessionClosed)));
        assert!(!session.is_saved().await);
    }
}
