//! Async Rust client for the student records resource API.
//!
//! One JSON record per student under `/api/students`, five CRUD
//! operations plus the server-side filtered reads. The crate holds no
//! state of its own — callers own consistency and retry policy.

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::StudentsClient;
pub use error::Error;
pub use transport::TransportConfig;
pub use types::{Student, StudentDraft};
