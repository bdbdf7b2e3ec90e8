//! Detail view controller for a single record.

use std::sync::Arc;

use tracing::warn;

use rosterly_api::{Error, Student};

use crate::directory::StudentDirectory;

use super::{DeleteConfirmation, Generation, Notice, RequestToken};

const GONE_ERROR: &str = "Student not found.";
const LOAD_ERROR: &str = "Error loading student details. Please try again.";
const DELETE_ERROR: &str = "Error deleting student. Please try again.";
const DELETED_NOTICE: &str = "Student deleted successfully!";

/// Load state of the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailPhase {
    Loading,
    Ready(Student),
    LoadFailed { message: String },
}

/// Terminal outcome of a confirmed delete from this view.
#[derive(Debug)]
pub enum DeleteOutcome {
    /// The record is gone; hand the notice to the list view and leave.
    Deleted { notice: Notice },
    /// The delete failed; the view stays put with an error shown.
    Failed,
}

/// Fetches and displays one record, with the same confirm-then-delete
/// flow as the list view.
pub struct DetailController<D> {
    directory: Arc<D>,
    id: i64,
    phase: DetailPhase,
    error: Option<String>,
    generation: Generation,
    load_in_flight: bool,
    delete_in_flight: bool,
}

impl<D: StudentDirectory> DetailController<D> {
    pub fn new(directory: Arc<D>, id: i64) -> Self {
        Self {
            directory,
            id,
            phase: DetailPhase::Loading,
            error: None,
            generation: Generation::default(),
            load_in_flight: false,
            delete_in_flight: false,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn phase(&self) -> &DetailPhase {
        &self.phase
    }

    pub fn student(&self) -> Option<&Student> {
        match &self.phase {
            DetailPhase::Ready(student) => Some(student),
            _ => None,
        }
    }

    /// Delete-failure banner; load failures live in the phase instead.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_deleting(&self) -> bool {
        self.delete_in_flight
    }

    // ── Load ─────────────────────────────────────────────────────────

    /// Start the fetch. `None` while one is already in flight.
    pub fn begin_load(&mut self) -> Option<RequestToken> {
        if self.load_in_flight {
            return None;
        }
        self.load_in_flight = true;
        self.phase = DetailPhase::Loading;
        Some(self.generation.next())
    }

    /// Fold the fetch result in. Stale tokens and records whose id does
    /// not match the view's target are discarded.
    pub fn apply_load(&mut self, token: RequestToken, result: Result<Student, Error>) {
        if !self.generation.is_current(token) {
            return;
        }
        self.load_in_flight = false;
        match result {
            Ok(student) if student.id == self.id => {
                self.phase = DetailPhase::Ready(student);
            }
            Ok(student) => {
                warn!(expected = self.id, got = student.id, "detail answered with wrong record");
            }
            Err(e) => {
                let message = if e.is_not_found() {
                    GONE_ERROR
                } else {
                    warn!(error = %e, id = self.id, "student detail fetch failed");
                    LOAD_ERROR
                };
                self.phase = DetailPhase::LoadFailed {
                    message: message.into(),
                };
            }
        }
    }

    /// Issue the fetch and apply the result.
    pub async fn refresh(&mut self) {
        let Some(token) = self.begin_load() else {
            return;
        };
        let result = self.directory.get_by_id(self.id).await;
        self.apply_load(token, result);
    }

    // ── Delete ───────────────────────────────────────────────────────

    /// Ask for a delete confirmation token. Only available once the
    /// record is on screen and no delete is running.
    pub fn request_delete(&self) -> Option<DeleteConfirmation> {
        if self.delete_in_flight {
            return None;
        }
        let student = self.student()?;
        Some(DeleteConfirmation::new(self.id, student.full_name()))
    }

    /// Mark the confirmed delete in flight and hand back the id to send.
    pub fn begin_delete(&mut self, confirmation: &DeleteConfirmation) -> Option<i64> {
        if self.delete_in_flight || confirmation.id() != self.id {
            return None;
        }
        self.delete_in_flight = true;
        Some(confirmation.id())
    }

    /// Fold the delete result in. On success the view is done and the
    /// caller navigates back to the list with the notice.
    pub fn apply_delete(&mut self, result: Result<(), Error>) -> DeleteOutcome {
        self.delete_in_flight = false;
        match result {
            Ok(()) => DeleteOutcome::Deleted {
                notice: Notice::new(DELETED_NOTICE),
            },
            Err(e) => {
                warn!(error = %e, id = self.id, "student delete failed");
                self.error = Some(DELETE_ERROR.into());
                DeleteOutcome::Failed
            }
        }
    }

    /// Run the confirmed delete end to end.
    pub async fn confirm_delete(&mut self, confirmation: DeleteConfirmation) -> Option<DeleteOutcome> {
        let id = self.begin_delete(&confirmation)?;
        let result = self.directory.delete(id).await;
        Some(self.apply_delete(result))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use crate::test_support::{student, FakeDirectory};

    #[tokio::test]
    async fn refresh_loads_the_target_record() {
        let dir = Arc::new(FakeDirectory::new(vec![
            student(1, "Ann", "Ray", "ann@x.com", "Math"),
            student(2, "Bob", "Fox", "bob@x.com", "CompSci"),
        ]));
        let mut ctrl = DetailController::new(dir, 2);

        ctrl.refresh().await;

        assert_eq!(ctrl.student().unwrap().first_name, "Bob");
    }

    #[tokio::test]
    async fn missing_record_shows_gone_message() {
        let mut ctrl = DetailController::new(Arc::new(FakeDirectory::new(vec![])), 9);
        ctrl.refresh().await;

        assert_eq!(
            *ctrl.phase(),
            DetailPhase::LoadFailed {
                message: GONE_ERROR.into()
            }
        );
    }

    #[tokio::test]
    async fn transport_failure_shows_generic_message() {
        let dir = Arc::new(FakeDirectory::new(vec![]));
        dir.fail_next();
        let mut ctrl = DetailController::new(dir, 9);
        ctrl.refresh().await;

        assert_eq!(
            *ctrl.phase(),
            DetailPhase::LoadFailed {
                message: LOAD_ERROR.into()
            }
        );
    }

    #[test]
    fn response_for_another_id_is_discarded() {
        let mut ctrl = DetailController::new(Arc::new(FakeDirectory::new(vec![])), 2);
        let token = ctrl.begin_load().unwrap();

        ctrl.apply_load(token, Ok(student(7, "Wrong", "One", "w@x.com", "X")));

        assert!(ctrl.student().is_none());
    }

    #[test]
    fn stale_load_result_is_discarded() {
        let mut ctrl = DetailController::new(Arc::new(FakeDirectory::new(vec![])), 2);

        let stale = ctrl.begin_load().unwrap();
        ctrl.load_in_flight = false;
        let fresh = ctrl.begin_load().unwrap();

        ctrl.apply_load(fresh, Ok(student(2, "Ann", "Ray", "ann@x.com", "Math")));
        ctrl.apply_load(stale, Err(Error::NotFound));

        assert_eq!(ctrl.student().unwrap().first_name, "Ann");
    }

    #[tokio::test]
    async fn confirmed_delete_yields_notice_and_removes_record() {
        let dir = Arc::new(FakeDirectory::new(vec![student(
            1, "Ann", "Ray", "ann@x.com", "Math",
        )]));
        let mut ctrl = DetailController::new(Arc::clone(&dir), 1);
        ctrl.refresh().await;

        let confirmation = ctrl.request_delete().unwrap();
        assert_eq!(confirmation.label(), "Ann Ray");

        let outcome = ctrl.confirm_delete(confirmation).await.unwrap();
        let DeleteOutcome::Deleted { notice } = outcome else {
            panic!("expected Deleted");
        };
        assert_eq!(notice.message(), DELETED_NOTICE);
        assert!(dir.records().is_empty());

        // A subsequent fetch of the same id answers not-found.
        assert!(dir.get_by_id(1).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn failed_delete_keeps_view_with_error() {
        let dir = Arc::new(FakeDirectory::new(vec![student(
            1, "Ann", "Ray", "ann@x.com", "Math",
        )]));
        let mut ctrl = DetailController::new(Arc::clone(&dir), 1);
        ctrl.refresh().await;

        dir.fail_next();
        let confirmation = ctrl.request_delete().unwrap();
        let outcome = ctrl.confirm_delete(confirmation).await.unwrap();

        assert!(matches!(outcome, DeleteOutcome::Failed));
        assert_eq!(ctrl.error(), Some(DELETE_ERROR));
        assert!(ctrl.student().is_some(), "record stays on screen");
    }

    #[test]
    fn request_delete_before_load_is_refused() {
        let ctrl = DetailController::new(Arc::new(FakeDirectory::new(vec![])), 1);
        assert!(ctrl.request_delete().is_none());
    }
}
