//! View-state controllers.
//!
//! Each controller is a synchronous state machine with a begin/apply
//! split: `begin_*` records that a request is in flight and hands the
//! caller what to send, `apply_*` folds the eventual result back in. An
//! event-loop frontend (the TUI) runs the network call between the two
//! and may deliver results late or never — stale deliveries are
//! discarded by a request-generation check. The `async` driver methods
//! (`refresh`, `submit`, `load`, …) run both halves back to back for
//! direct callers (CLI, tests); holding `&mut self` across the await
//! already rules out a second same-kind request.

use std::time::{Duration, Instant};

pub mod detail;
pub mod form;
pub mod list;

pub use detail::{DeleteOutcome, DetailController, DetailPhase};
pub use form::{FormController, FormPhase, Mode, SubmitOp, SubmitOutcome, SubmitRequest};
pub use list::{ListController, ListPhase};

/// How long a transient success notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Matches a `begin_*` call to its `apply_*`; results carrying an old
/// token are dropped instead of overwriting fresher state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Bump-on-begin generation counter backing [`RequestToken`].
#[derive(Debug, Default)]
pub(crate) struct Generation(u64);

impl Generation {
    pub(crate) fn next(&mut self) -> RequestToken {
        self.0 += 1;
        RequestToken(self.0)
    }

    pub(crate) fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.0
    }
}

/// A transient success message, self-expiring after [`NOTICE_TTL`].
#[derive(Debug, Clone)]
pub struct Notice {
    message: String,
    created: Instant,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            created: Instant::now(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_expired(&self) -> bool {
        self.created.elapsed() >= NOTICE_TTL
    }
}

/// A pending delete awaiting user confirmation.
///
/// `request_delete` hands one out; the confirmation mechanism (modal,
/// terminal prompt, `--yes` flag) is the frontend's business. Passing
/// the token back via `begin_delete`/`confirm_delete` performs the call.
#[derive(Debug)]
pub struct DeleteConfirmation {
    id: i64,
    label: String,
}

impl DeleteConfirmation {
    pub(crate) fn new(id: i64, label: String) -> Self {
        Self { id, label }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// Display name for the confirmation prompt.
    pub fn label(&self) -> &str {
        &self.label
    }
}
