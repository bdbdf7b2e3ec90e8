//! Form view controller, shared between create and edit.

use std::sync::Arc;

use tracing::warn;

use rosterly_api::{Error, Student, StudentDraft};

use crate::directory::StudentDirectory;
use crate::validate::{self, Field, FieldErrors, StudentForm};

use super::{Generation, Notice, RequestToken};

const CONFLICT_ERROR: &str = "A student with this email already exists.";
const EDIT_GONE_ERROR: &str = "Student not found.";
const CREATE_ERROR: &str = "Error adding student. Please try again.";
const UPDATE_ERROR: &str = "Error updating student. Please try again.";
const PREFILL_ERROR: &str = "Error loading student. Please try again.";

const CREATED_NOTICE: &str = "Student added successfully!";
const UPDATED_NOTICE: &str = "Student updated successfully!";

/// Whether the form creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Edit { id: i64 },
}

/// Readiness of the form itself. Create forms are `Ready` immediately;
/// edit forms pass through `PageLoading` while the record is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase {
    PageLoading,
    Ready,
    LoadFailed { message: String },
}

/// What `begin_submit` hands the caller to send.
#[derive(Debug)]
pub struct SubmitRequest {
    pub token: RequestToken,
    pub op: SubmitOp,
}

/// The remote mutation a validated form resolves to.
#[derive(Debug)]
pub enum SubmitOp {
    Create(StudentDraft),
    Update(i64, StudentDraft),
}

/// Terminal outcome of one submission attempt. Exactly one is produced
/// per attempt that reaches the remote.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The record was saved; show the notice and leave the form.
    Saved { student: Student, notice: Notice },
    /// The remote refused; the form stays editable with an error shown.
    Rejected,
}

/// State machine behind the create/edit form.
///
/// Client-side validation gates every submission: `begin_submit`
/// refuses to produce a request while any field is invalid, so the only
/// rejections the remote can still answer are the email conflict and a
/// record deleted under an open edit form.
pub struct FormController<D> {
    directory: Arc<D>,
    mode: Mode,
    phase: FormPhase,
    form: StudentForm,
    errors: FieldErrors,
    error: Option<String>,
    submitting: bool,
    load_in_flight: bool,
    generation: Generation,
}

impl<D: StudentDirectory> FormController<D> {
    /// An empty create form, ready for input.
    pub fn new_create(directory: Arc<D>) -> Self {
        Self {
            directory,
            mode: Mode::Create,
            phase: FormPhase::Ready,
            form: StudentForm::default(),
            errors: FieldErrors::new(),
            error: None,
            submitting: false,
            load_in_flight: false,
            generation: Generation::default(),
        }
    }

    /// An edit form for `id`; fields stay empty until the prefill fetch
    /// lands.
    pub fn new_edit(directory: Arc<D>, id: i64) -> Self {
        Self {
            directory,
            mode: Mode::Edit { id },
            phase: FormPhase::PageLoading,
            form: StudentForm::default(),
            errors: FieldErrors::new(),
            error: None,
            submitting: false,
            load_in_flight: false,
            generation: Generation::default(),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn form(&self) -> &StudentForm {
        &self.form
    }

    pub fn field(&self, field: Field) -> &str {
        self.form.get(field)
    }

    /// Per-field validation errors from the last rejected submission.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Form-level error banner (conflict, network failure, record gone).
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    // ── Editing ──────────────────────────────────────────────────────

    /// Update one field. Clears that field's error so the message
    /// disappears as soon as the user starts correcting it.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.form.set(field, value.into());
        self.errors.remove(&field);
    }

    // ── Edit prefill ─────────────────────────────────────────────────

    /// Start the prefill fetch. `None` in create mode or when one is
    /// already running.
    pub fn begin_load(&mut self) -> Option<(RequestToken, i64)> {
        let Mode::Edit { id } = self.mode else {
            return None;
        };
        if self.phase == FormPhase::Ready || self.load_in_flight {
            return None;
        }
        self.load_in_flight = true;
        self.phase = FormPhase::PageLoading;
        Some((self.generation.next(), id))
    }

    /// Fold the prefill result in. Stale tokens and records whose id
    /// does not match the form's target are discarded.
    pub fn apply_load(&mut self, token: RequestToken, result: Result<Student, Error>) {
        if !self.generation.is_current(token) {
            return;
        }
        self.load_in_flight = false;
        let Mode::Edit { id } = self.mode else {
            return;
        };
        match result {
            Ok(student) if student.id == id => {
                self.form = StudentForm::from_student(&student);
                self.phase = FormPhase::Ready;
            }
            Ok(student) => {
                warn!(expected = id, got = student.id, "prefill answered with wrong record");
            }
            Err(e) => {
                let message = if e.is_not_found() {
                    EDIT_GONE_ERROR
                } else {
                    warn!(error = %e, id, "edit prefill failed");
                    PREFILL_ERROR
                };
                self.phase = FormPhase::LoadFailed {
                    message: message.into(),
                };
            }
        }
    }

    /// Run the prefill fetch end to end (edit mode only).
    pub async fn load(&mut self) {
        let Some((token, id)) = self.begin_load() else {
            return;
        };
        let result = self.directory.get_by_id(id).await;
        self.apply_load(token, result);
    }

    // ── Submission ───────────────────────────────────────────────────

    /// Validate and, if clean, produce the mutation to send. On
    /// validation failure the per-field errors are set and no request
    /// is produced; nothing leaves the process.
    pub fn begin_submit(&mut self) -> Option<SubmitRequest> {
        if self.submitting || self.phase != FormPhase::Ready {
            return None;
        }
        self.errors = validate::validate(&self.form);
        if !self.errors.is_empty() {
            return None;
        }
        // A clean validation pass guarantees the year parses.
        let draft = self.form.clone().into_draft()?;
        self.submitting = true;
        self.error = None;
        let token = self.generation.next();
        let op = match self.mode {
            Mode::Create => SubmitOp::Create(draft),
            Mode::Edit { id } => SubmitOp::Update(id, draft),
        };
        Some(SubmitRequest { token, op })
    }

    /// Fold the submission result in. Returns `None` for a stale token,
    /// otherwise exactly one [`SubmitOutcome`].
    pub fn apply_submit(
        &mut self,
        token: RequestToken,
        result: Result<Student, Error>,
    ) -> Option<SubmitOutcome> {
        if !self.generation.is_current(token) {
            return None;
        }
        self.submitting = false;
        match result {
            Ok(student) => {
                let notice = match self.mode {
                    Mode::Create => Notice::new(CREATED_NOTICE),
                    Mode::Edit { .. } => Notice::new(UPDATED_NOTICE),
                };
                Some(SubmitOutcome::Saved { student, notice })
            }
            Err(e) => {
                let message = if e.is_conflict() {
                    CONFLICT_ERROR
                } else if e.is_not_found() && matches!(self.mode, Mode::Edit { .. }) {
                    EDIT_GONE_ERROR
                } else {
                    warn!(error = %e, "student save failed");
                    match self.mode {
                        Mode::Create => CREATE_ERROR,
                        Mode::Edit { .. } => UPDATE_ERROR,
                    }
                };
                self.error = Some(message.into());
                Some(SubmitOutcome::Rejected)
            }
        }
    }

    /// Validate, send, and fold the result back in. `None` when
    /// validation already rejected the form locally.
    pub async fn submit(&mut self) -> Option<SubmitOutcome> {
        let SubmitRequest { token, op } = self.begin_submit()?;
        let result = match &op {
            SubmitOp::Create(draft) => self.directory.create(draft).await,
            SubmitOp::Update(id, draft) => self.directory.update(*id, draft).await,
        };
        self.apply_submit(token, result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use crate::test_support::{student, FakeDirectory};

    fn fill_valid(ctrl: &mut FormController<FakeDirectory>) {
        ctrl.set_field(Field::FirstName, "Ann");
        ctrl.set_field(Field::LastName, "Ray");
        ctrl.set_field(Field::Email, "ann@example.com");
        ctrl.set_field(Field::Phone, "+12025550100");
        ctrl.set_field(Field::Course, "Math");
        ctrl.set_field(Field::Year, "2");
    }

    #[tokio::test]
    async fn create_round_trip_assigns_id_and_notice() {
        let dir = Arc::new(FakeDirectory::new(vec![]));
        let mut ctrl = FormController::new_create(Arc::clone(&dir));
        fill_valid(&mut ctrl);

        let outcome = ctrl.submit().await.unwrap();
        let SubmitOutcome::Saved { student, notice } = outcome else {
            panic!("expected Saved");
        };
        assert_eq!(student.id, 1);
        assert_eq!(notice.message(), CREATED_NOTICE);
        assert_eq!(dir.records().len(), 1);
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_directory() {
        let dir = Arc::new(FakeDirectory::new(vec![]));
        let mut ctrl = FormController::new_create(Arc::clone(&dir));
        ctrl.set_field(Field::Email, "not-an-email");

        assert!(ctrl.submit().await.is_none());
        assert_eq!(
            ctrl.errors().get(&Field::Email).map(String::as_str),
            Some("Please enter a valid email address")
        );
        assert!(dir.records().is_empty(), "nothing may leave the process");
        assert!(!ctrl.is_submitting());
    }

    #[test]
    fn editing_a_field_clears_only_its_error() {
        let mut ctrl = FormController::new_create(Arc::new(FakeDirectory::new(vec![])));
        assert!(ctrl.begin_submit().is_none());
        assert!(ctrl.errors().contains_key(&Field::FirstName));
        assert!(ctrl.errors().contains_key(&Field::Email));

        ctrl.set_field(Field::FirstName, "Ann");
        assert!(!ctrl.errors().contains_key(&Field::FirstName));
        assert!(ctrl.errors().contains_key(&Field::Email), "other errors stay");
    }

    #[tokio::test]
    async fn conflict_keeps_form_editable_with_message() {
        let dir = Arc::new(FakeDirectory::new(vec![student(
            1, "Bob", "Fox", "ann@example.com", "CompSci",
        )]));
        let mut ctrl = FormController::new_create(Arc::clone(&dir));
        fill_valid(&mut ctrl);

        let outcome = ctrl.submit().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Rejected));
        assert_eq!(ctrl.error(), Some(CONFLICT_ERROR));
        assert_eq!(ctrl.field(Field::Email), "ann@example.com", "input preserved");
        assert_eq!(dir.records().len(), 1, "remote state unchanged");
        assert!(!ctrl.is_submitting());
    }

    #[tokio::test]
    async fn edit_prefill_populates_fields() {
        let dir = Arc::new(FakeDirectory::new(vec![student(
            7, "Ann", "Ray", "ann@example.com", "Math",
        )]));
        let mut ctrl = FormController::new_edit(dir, 7);
        assert_eq!(*ctrl.phase(), FormPhase::PageLoading);

        ctrl.load().await;

        assert_eq!(*ctrl.phase(), FormPhase::Ready);
        assert_eq!(ctrl.field(Field::FirstName), "Ann");
        assert_eq!(ctrl.field(Field::Year), "2");
    }

    #[test]
    fn second_begin_load_is_refused_while_in_flight() {
        let dir = Arc::new(FakeDirectory::new(vec![student(
            7, "Ann", "Ray", "ann@example.com", "Math",
        )]));
        let mut ctrl = FormController::new_edit(dir, 7);

        let (token, _) = ctrl.begin_load().unwrap();
        assert!(ctrl.begin_load().is_none(), "prefill already running");

        // A terminal result clears the guard so a retry can start.
        ctrl.apply_load(token, Err(Error::RemoteFailure { status: 500 }));
        assert!(ctrl.begin_load().is_some());
    }

    #[tokio::test]
    async fn edit_prefill_of_missing_record_fails_with_gone_message() {
        let mut ctrl = FormController::new_edit(Arc::new(FakeDirectory::new(vec![])), 7);
        ctrl.load().await;

        assert_eq!(
            *ctrl.phase(),
            FormPhase::LoadFailed {
                message: EDIT_GONE_ERROR.into()
            }
        );
    }

    #[tokio::test]
    async fn update_of_deleted_record_reports_gone() {
        let dir = Arc::new(FakeDirectory::new(vec![student(
            7, "Ann", "Ray", "ann@example.com", "Math",
        )]));
        let mut ctrl = FormController::new_edit(Arc::clone(&dir), 7);
        ctrl.load().await;

        // Deleted elsewhere while the form was open.
        dir.delete(7).await.unwrap();
        fill_valid(&mut ctrl);

        let outcome = ctrl.submit().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Rejected));
        assert_eq!(ctrl.error(), Some(EDIT_GONE_ERROR));
    }

    #[tokio::test]
    async fn update_failure_uses_update_message() {
        let dir = Arc::new(FakeDirectory::new(vec![student(
            7, "Ann", "Ray", "ann@example.com", "Math",
        )]));
        let mut ctrl = FormController::new_edit(Arc::clone(&dir), 7);
        ctrl.load().await;

        dir.fail_next();
        let outcome = ctrl.submit().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Rejected));
        assert_eq!(ctrl.error(), Some(UPDATE_ERROR));
    }

    #[test]
    fn second_begin_submit_is_refused_while_in_flight() {
        let mut ctrl = FormController::new_create(Arc::new(FakeDirectory::new(vec![])));
        fill_valid(&mut ctrl);

        assert!(ctrl.begin_submit().is_some());
        assert!(ctrl.begin_submit().is_none());
    }

    #[test]
    fn stale_submit_result_is_discarded() {
        let mut ctrl = FormController::new_create(Arc::new(FakeDirectory::new(vec![])));
        fill_valid(&mut ctrl);

        let stale = ctrl.begin_submit().unwrap();
        ctrl.submitting = false;
        let fresh = ctrl.begin_submit().unwrap();

        let late = ctrl.apply_submit(stale.token, Ok(student(1, "Old", "Old", "o@x.com", "X")));
        assert!(late.is_none(), "stale outcome must not surface");
        assert!(ctrl.is_submitting(), "fresh request still pending");

        let outcome = ctrl.apply_submit(fresh.token, Ok(student(2, "Ann", "Ray", "a@x.com", "Y")));
        assert!(matches!(outcome, Some(SubmitOutcome::Saved { .. })));
    }
}
