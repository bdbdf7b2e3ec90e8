// Hand-crafted async HTTP client for the student records resource API.
//
// Base path: /api/students

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::transport::TransportConfig;
use crate::types::{Student, StudentDraft};
use crate::Error;

// ── Error response shape from the resource API ───────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the student records collection.
///
/// Stateless beyond the reqwest connection pool: every call is an
/// independent request and nothing is cached between them.
pub struct StudentsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl StudentsClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a server base URL and transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (used by tests).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Build the base URL ending in `/api/students/`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;

        // Strip trailing slash for uniform handling
        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/api/students") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/students/"));
        }

        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"42"` or `"search"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        // base_url always ends with `/api/students/`, so joining works.
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn delete_empty(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                // Truncate by characters, not bytes: a byte index could
                // land inside a multi-byte sequence and panic.
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    /// Map an error status to the crate taxonomy.
    ///
    /// The resource API answers 400 for a rejected mutation whether the
    /// cause is an email collision or a payload the server would not
    /// accept; both arrive here as `Conflict`, carrying the body message
    /// when one is present. Anything else in the 4xx range becomes
    /// `Rejected`, and 5xx becomes `RemoteFailure`.
    async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
        if status == StatusCode::NOT_FOUND {
            return Error::NotFound;
        }

        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                }
            });

        if status.is_server_error() {
            Error::RemoteFailure {
                status: status.as_u16(),
            }
        } else if status == StatusCode::BAD_REQUEST || status == StatusCode::CONFLICT {
            Error::Conflict { message }
        } else {
            Error::Rejected {
                status: status.as_u16(),
                message,
            }
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Collection reads ─────────────────────────────────────────────

    /// Fetch every record, in the order the server returns them.
    pub async fn list_all(&self) -> Result<Vec<Student>, Error> {
        self.get("").await
    }

    /// Fetch one record by id. Fails with [`Error::NotFound`] if absent.
    pub async fn get_by_id(&self, id: i64) -> Result<Student, Error> {
        self.get(&id.to_string()).await
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create a record; the server assigns and returns the id.
    pub async fn create(&self, draft: &StudentDraft) -> Result<Student, Error> {
        self.post("", draft).await
    }

    /// Replace the record with the given id.
    pub async fn update(&self, id: i64, draft: &StudentDraft) -> Result<Student, Error> {
        self.put(&id.to_string(), draft).await
    }

    /// Remove the record with the given id permanently.
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        self.delete_empty(&id.to_string()).await
    }

    // ── Server-side filtered reads ───────────────────────────────────
    //
    // Pass-through equivalents of `list_all` with the filter applied
    // remotely; no client-side re-filtering.

    /// Records whose first or last name contains `name`.
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Student>, Error> {
        self.get_with_params("search", &[("name", name.to_owned())])
            .await
    }

    /// Records enrolled in `course`.
    pub async fn by_course(&self, course: &str) -> Result<Vec<Student>, Error> {
        self.get(&format!("course/{course}")).await
    }

    /// Records in study year `year`.
    pub async fn by_year(&self, year: i32) -> Result<Vec<Student>, Error> {
        self.get(&format!("year/{year}")).await
    }

    /// The record holding `email`, if any (email is unique remotely).
    pub async fn by_email(&self, email: &str) -> Result<Student, Error> {
        self.get(&format!("email/{email}")).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_api_students_suffix() {
        let url = StudentsClient::normalize_base_url("http://localhost:8081").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8081/api/students/");
    }

    #[test]
    fn base_url_with_suffix_is_kept() {
        let url =
            StudentsClient::normalize_base_url("http://localhost:8081/api/students/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8081/api/students/");
    }

    #[test]
    fn url_joins_relative_segment_onto_base() {
        let client =
            StudentsClient::from_reqwest("http://localhost:8081", reqwest::Client::new()).unwrap();
        let url = client.url("email/ann@uni.edu").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8081/api/students/email/ann@uni.edu"
        );
    }
}
