//! All possible UI actions. Actions are the sole mechanism for state
//! mutation.
//!
//! Network results travel back into the action loop as actions carrying
//! the [`RequestToken`] of the request that produced them; the
//! controllers discard tokens from superseded requests.

use rosterly_api::{Error, Student};
use rosterly_core::{DeleteConfirmation, Notice, RequestToken};

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    OpenList,
    OpenDetail(i64),
    OpenCreate,
    OpenEdit(i64),
    Back,

    // ── Network results ───────────────────────────────────────────
    //
    // Each result names the screen that owns it; the app routes it to
    // that screen directly, not to whichever screen happens to be
    // active when the response lands.
    ListFetched(RequestToken, Result<Vec<Student>, Error>),
    DetailFetched(RequestToken, Result<Student, Error>),
    PrefillFetched(RequestToken, Result<Student, Error>),
    SubmitFinished(RequestToken, Result<Student, Error>),
    ListDeleteFinished(Result<(), Error>),
    DetailDeleteFinished(Result<(), Error>),

    // ── Confirm dialog ────────────────────────────────────────────
    ShowConfirm(DeleteConfirmation),
    ConfirmYes,
    ConfirmNo,
    /// Confirmation accepted; handed back to the screen that asked.
    DeleteConfirmed(DeleteConfirmation),

    // ── Overlays ──────────────────────────────────────────────────
    ToggleHelp,

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notice),
}
