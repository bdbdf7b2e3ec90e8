//! List view controller — the fetched collection, a local search
//! filter, and the delete flow.

use std::sync::Arc;

use tracing::warn;

use rosterly_api::{Error, Student};

use crate::directory::StudentDirectory;

use super::{DeleteConfirmation, Generation, Notice, RequestToken};

const LOAD_ERROR: &str = "Error loading students. Please try again.";
const DELETE_ERROR: &str = "Error deleting student. Please try again.";
const DELETED_NOTICE: &str = "Student deleted successfully!";

const EMPTY_COLLECTION: &str = "No students available. Add some students to get started!";
const EMPTY_SEARCH: &str = "No students found matching your search.";

/// Load state of the collection view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListPhase {
    Loading,
    Loaded,
    LoadFailed { message: String },
}

/// Owns the fetched collection and a derived filtered view.
///
/// The filter is purely local: recomputed synchronously on every search
/// or data change, never triggering a remote call.
pub struct ListController<D> {
    directory: Arc<D>,
    phase: ListPhase,
    students: Vec<Student>,
    visible: Vec<Student>,
    search: String,
    notice: Option<Notice>,
    error: Option<String>,
    load_generation: Generation,
    load_in_flight: bool,
    delete_in_flight: bool,
}

impl<D: StudentDirectory> ListController<D> {
    /// Starts in `Loading` with no request issued yet; callers kick off
    /// the first fetch on mount.
    pub fn new(directory: Arc<D>) -> Self {
        Self {
            directory,
            phase: ListPhase::Loading,
            students: Vec::new(),
            visible: Vec::new(),
            search: String::new(),
            notice: None,
            error: None,
            load_generation: Generation::default(),
            load_in_flight: false,
            delete_in_flight: false,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn phase(&self) -> &ListPhase {
        &self.phase
    }

    /// The filtered view, in server order.
    pub fn visible(&self) -> &[Student] {
        &self.visible
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Current transient success notice, if any.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Delete-failure banner. The list itself is left untouched by a
    /// failed delete.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.load_in_flight || matches!(self.phase, ListPhase::Loading)
    }

    pub fn is_deleting(&self) -> bool {
        self.delete_in_flight
    }

    /// Informational message when the visible view is empty: an empty
    /// collection and an empty search result are distinct states.
    pub fn empty_message(&self) -> Option<&'static str> {
        if self.phase != ListPhase::Loaded || !self.visible.is_empty() {
            return None;
        }
        if self.search.is_empty() {
            Some(EMPTY_COLLECTION)
        } else {
            Some(EMPTY_SEARCH)
        }
    }

    // ── Search ───────────────────────────────────────────────────────

    /// Update the free-text search term and recompute the view.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.recompute_visible();
    }

    fn recompute_visible(&mut self) {
        if self.search.is_empty() {
            self.visible = self.students.clone();
            return;
        }
        let needle = self.search.to_lowercase();
        self.visible = self
            .students
            .iter()
            .filter(|s| matches_search(s, &needle))
            .cloned()
            .collect();
    }

    // ── Load ─────────────────────────────────────────────────────────

    /// Start a (re)fetch. Returns `None` while one is already in
    /// flight.
    pub fn begin_load(&mut self) -> Option<RequestToken> {
        if self.load_in_flight {
            return None;
        }
        self.load_in_flight = true;
        self.phase = ListPhase::Loading;
        Some(self.load_generation.next())
    }

    /// Fold a fetch result back in. Results from a superseded request
    /// are discarded.
    pub fn apply_load(&mut self, token: RequestToken, result: Result<Vec<Student>, Error>) {
        if !self.load_generation.is_current(token) {
            return;
        }
        self.load_in_flight = false;
        match result {
            Ok(students) => {
                self.students = students;
                self.phase = ListPhase::Loaded;
                self.error = None;
            }
            Err(e) => {
                warn!(error = %e, "student list fetch failed");
                self.students.clear();
                self.phase = ListPhase::LoadFailed {
                    message: LOAD_ERROR.into(),
                };
            }
        }
        self.recompute_visible();
    }

    /// Issue the fetch and apply the result. Holding `&mut self` across
    /// the await keeps loads serialized.
    pub async fn refresh(&mut self) {
        let Some(token) = self.begin_load() else {
            return;
        };
        let result = self.directory.list_all().await;
        self.apply_load(token, result);
    }

    // ── Delete ───────────────────────────────────────────────────────

    /// Ask for a delete confirmation token. `None` if the id is not in
    /// the loaded collection or a delete is already running.
    pub fn request_delete(&self, id: i64) -> Option<DeleteConfirmation> {
        if self.delete_in_flight {
            return None;
        }
        let student = self.students.iter().find(|s| s.id == id)?;
        Some(DeleteConfirmation::new(id, student.full_name()))
    }

    /// Mark the confirmed delete as in flight and hand back the id to
    /// send. Pair with [`apply_delete`](Self::apply_delete).
    pub fn begin_delete(&mut self, confirmation: &DeleteConfirmation) -> Option<i64> {
        if self.delete_in_flight {
            return None;
        }
        self.delete_in_flight = true;
        Some(confirmation.id())
    }

    /// Fold a delete result back in. Returns `true` when the caller
    /// should re-fetch the collection — the list is never spliced
    /// locally; success means a full reload.
    pub fn apply_delete(&mut self, result: Result<(), Error>) -> bool {
        self.delete_in_flight = false;
        match result {
            Ok(()) => {
                self.notice = Some(Notice::new(DELETED_NOTICE));
                self.error = None;
                true
            }
            Err(e) => {
                warn!(error = %e, "student delete failed");
                self.error = Some(DELETE_ERROR.into());
                false
            }
        }
    }

    /// Run the confirmed delete end to end, re-fetching on success.
    pub async fn confirm_delete(&mut self, confirmation: DeleteConfirmation) {
        let Some(id) = self.begin_delete(&confirmation) else {
            return;
        };
        let result = self.directory.delete(id).await;
        if self.apply_delete(result) {
            self.refresh().await;
        }
    }

    // ── Notices ──────────────────────────────────────────────────────

    /// Show a success notice handed over by another view (form save,
    /// detail delete).
    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Drop the notice once its display window has passed. Frontends
    /// call this from their tick handler.
    pub fn dismiss_expired_notice(&mut self) {
        if self.notice.as_ref().is_some_and(Notice::is_expired) {
            self.notice = None;
        }
    }

    /// Hand the notice off to a frontend that displays notices globally.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}

/// Case-insensitive substring match against first name, last name,
/// email, or course. `needle` must already be lowercased.
pub fn matches_search(student: &Student, needle: &str) -> bool {
    student.first_name.to_lowercase().contains(needle)
        || student.last_name.to_lowercase().contains(needle)
        || student.email.to_lowercase().contains(needle)
        || student.course.to_lowercase().contains(needle)
}
