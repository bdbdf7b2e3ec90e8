//! Wire types for the student records API.
//!
//! JSON field names are camelCase on the wire (`firstName`, `lastName`);
//! `year` travels as a JSON number.

use serde::{Deserialize, Serialize};

/// One student record as held by the remote collection.
///
/// `id` is assigned by the server on create and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub course: String,
    pub year: i32,
}

impl Student {
    /// "First Last" display form.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A record without an identifier — the payload for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub course: String,
    pub year: i32,
}

impl From<Student> for StudentDraft {
    fn from(s: Student) -> Self {
        Self {
            first_name: s.first_name,
            last_name: s.last_name,
            email: s.email,
            phone: s.phone,
            course: s.course,
            year: s.year,
        }
    }
}
