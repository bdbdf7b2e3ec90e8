//! The injectable resource seam between controllers and the network.
//!
//! Controllers are generic over [`StudentDirectory`] so tests can swap
//! the HTTP client for an in-memory fake. The trait mirrors the five
//! remote operations exactly; it carries no caching and no state.

use std::future::Future;

use rosterly_api::{Error, Student, StudentDraft, StudentsClient};

/// The five operations against the remote student collection.
pub trait StudentDirectory {
    fn list_all(&self) -> impl Future<Output = Result<Vec<Student>, Error>> + Send;

    fn get_by_id(&self, id: i64) -> impl Future<Output = Result<Student, Error>> + Send;

    fn create(&self, draft: &StudentDraft)
    -> impl Future<Output = Result<Student, Error>> + Send;

    fn update(
        &self,
        id: i64,
        draft: &StudentDraft,
    ) -> impl Future<Output = Result<Student, Error>> + Send;

    fn delete(&self, id: i64) -> impl Future<Output = Result<(), Error>> + Send;
}

impl StudentDirectory for StudentsClient {
    async fn list_all(&self) -> Result<Vec<Student>, Error> {
        StudentsClient::list_all(self).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Student, Error> {
        StudentsClient::get_by_id(self, id).await
    }

    async fn create(&self, draft: &StudentDraft) -> Result<Student, Error> {
        StudentsClient::create(self, draft).await
    }

    async fn update(&self, id: i64, draft: &StudentDraft) -> Result<Student, Error> {
        StudentsClient::update(self, id, draft).await
    }

    async fn delete(&self, id: i64) -> Result<(), Error> {
        StudentsClient::delete(self, id).await
    }
}
