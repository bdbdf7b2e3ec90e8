//! In-memory [`StudentDirectory`] fake shared by the controller tests.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use rosterly_api::{Error, Student, StudentDraft};

use crate::directory::StudentDirectory;

/// Build a record with the common test fields filled in.
pub fn student(id: i64, first: &str, last: &str, email: &str, course: &str) -> Student {
    Student {
        id,
        first_name: first.into(),
        last_name: last.into(),
        email: email.into(),
        phone: "+12025550100".into(),
        course: course.into(),
        year: 2,
    }
}

/// In-memory directory enforcing the remote's visible semantics:
/// missing ids answer `NotFound`, duplicate emails answer `Conflict`,
/// created records get server-assigned ids.
pub struct FakeDirectory {
    records: Mutex<Vec<Student>>,
    next_id: AtomicI64,
    fail_next: AtomicBool,
}

impl FakeDirectory {
    pub fn new(records: Vec<Student>) -> Self {
        let next_id = records.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        Self {
            records: Mutex::new(records),
            next_id: AtomicI64::new(next_id),
            fail_next: AtomicBool::new(false),
        }
    }

    /// Make the next operation fail with a 500-class error.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<Student> {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn check_failure(&self) -> Result<(), Error> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            Err(Error::RemoteFailure { status: 500 })
        } else {
            Ok(())
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Student>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl StudentDirectory for FakeDirectory {
    async fn list_all(&self) -> Result<Vec<Student>, Error> {
        self.check_failure()?;
        Ok(self.lock().clone())
    }

    async fn get_by_id(&self, id: i64) -> Result<Student, Error> {
        self.check_failure()?;
        self.lock()
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(Error::NotFound)
    }

    async fn create(&self, draft: &StudentDraft) -> Result<Student, Error> {
        self.check_failure()?;
        let mut records = self.lock();
        if records.iter().any(|s| s.email == draft.email) {
            return Err(Error::Conflict {
                message: "Email already exists".into(),
            });
        }
        let created = Student {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            course: draft.course.clone(),
            year: draft.year,
        };
        records.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, draft: &StudentDraft) -> Result<Student, Error> {
        self.check_failure()?;
        let mut records = self.lock();
        if records.iter().any(|s| s.id != id && s.email == draft.email) {
            return Err(Error::Conflict {
                message: "Email already exists".into(),
            });
        }
        let existing = records.iter_mut().find(|s| s.id == id).ok_or(Error::NotFound)?;
        existing.first_name = draft.first_name.clone();
        existing.last_name = draft.last_name.clone();
        existing.email = draft.email.clone();
        existing.phone = draft.phone.clone();
        existing.course = draft.course.clone();
        existing.year = draft.year;
        Ok(existing.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), Error> {
        self.check_failure()?;
        let mut records = self.lock();
        let before = records.len();
        records.retain(|s| s.id != id);
        if records.len() == before {
            return Err(Error::NotFound);
        }
        Ok(())
    }
}
