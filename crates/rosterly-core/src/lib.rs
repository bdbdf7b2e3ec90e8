//! View-model layer between `rosterly-api` and UI consumers (CLI / TUI).
//!
//! This crate owns the business logic of the student roster client:
//!
//! - **[`validate`]** — The client-side validation engine. Pure functions
//!   over [`StudentForm`]; a record that fails validation never produces
//!   a network request.
//!
//! - **[`StudentDirectory`]** — The injectable resource seam. Controllers
//!   are generic over it, so tests run against an in-memory fake while
//!   production wires in [`StudentsClient`](rosterly_api::StudentsClient).
//!
//! - **Controllers** ([`controller`]) — One state machine per view:
//!   [`ListController`] (collection + local search + delete flow),
//!   [`FormController`] (create/edit with validation gating), and
//!   [`DetailController`] (single record + delete flow). Each exposes a
//!   `begin_*`/`apply_*` pair for event-loop frontends and async driver
//!   methods for direct callers.

pub mod controller;
pub mod directory;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_support;

// ── Primary re-exports ──────────────────────────────────────────────
pub use controller::list::matches_search;
pub use controller::{
    DeleteConfirmation, DeleteOutcome, DetailController, DetailPhase, FormController, FormPhase,
    ListController, ListPhase, Mode, Notice, RequestToken, SubmitOp, SubmitOutcome, SubmitRequest,
    NOTICE_TTL,
};
pub use directory::StudentDirectory;
pub use validate::{validate, Field, FieldErrors, StudentForm};

// Re-export the wire types so frontends depend on one crate.
pub use rosterly_api::{Error, Student, StudentDraft};
