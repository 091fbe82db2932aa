//! Typed HTTP client for the student registry REST surface.

use crate::api::{CreatedResponse, DetailResponse, ListResponse, StudentResponse};
use crate::students::{NewStudent, StudentPatch};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors returned while calling the student registry.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Base URL failed to parse or normalize.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The addressed student does not exist.
    #[error("Student not found")]
    NotFound,
    /// The server responded with an unexpected status code.
    #[error("Unexpected response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned by the server.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
}

/// Lightweight client wrapping one `reqwest::Client` for every call.
pub struct StudentsClient {
    client: Client,
    base_url: String,
}

impl StudentsClient {
    /// Build a client targeting the server at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .user_agent(concat!("students-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let base_url = normalize_base_url(base_url).map_err(ClientError::InvalidUrl)?;
        tracing::debug!(url = %base_url, "Initialized student registry client");
        Ok(Self { client, base_url })
    }

    /// Create a student and return the identifier assigned by the server.
    pub async fn create(&self, student: &NewStudent) -> Result<String, ClientError> {
        let response = self
            .request(Method::POST, "students")
            .json(student)
            .send()
            .await?;
        let created: CreatedResponse = decode(response).await?;
        Ok(created.id)
    }

    /// List students, optionally filtered by exact country and minimum age.
    pub async fn list(
        &self,
        country: Option<&str>,
        min_age: Option<i64>,
    ) -> Result<Vec<StudentResponse>, ClientError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(country) = country {
            query.push(("country", country.to_string()));
        }
        if let Some(min_age) = min_age {
            query.push(("age", min_age.to_string()));
        }
        let response = self
            .request(Method::GET, "students")
            .query(&query)
            .send()
            .await?;
        let list: ListResponse = decode(response).await?;
        Ok(list.data)
    }

    /// Fetch one student.
    pub async fn fetch(&self, id: &str) -> Result<StudentResponse, ClientError> {
        let response = self
            .request(Method::GET, &format!("students/{id}"))
            .send()
            .await?;
        decode(response).await
    }

    /// Set the supplied fields on one student.
    pub async fn update(&self, id: &str, patch: &StudentPatch) -> Result<(), ClientError> {
        let response = self
            .request(Method::PATCH, &format!("students/{id}"))
            .json(patch)
            .send()
            .await?;
        let _: serde_json::Value = decode(response).await?;
        Ok(())
    }

    /// Delete one student, returning the server's confirmation message.
    pub async fn delete(&self, id: &str) -> Result<String, ClientError> {
        let response = self
            .request(Method::DELETE, &format!("students/{id}"))
            .send()
            .await?;
        let detail: DetailResponse = decode(response).await?;
        Ok(detail.detail)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format_endpoint(&self.base_url, path))
    }
}

async fn decode<T>(response: reqwest::Response) -> Result<T, ClientError>
where
    T: DeserializeOwned,
{
    match response.status() {
        status if status.is_success() => Ok(response.json().await?),
        StatusCode::NOT_FOUND => Err(ClientError::NotFound),
        status => {
            let body = response.text().await.unwrap_or_default();
            let error = ClientError::UnexpectedStatus { status, body };
            tracing::error!(error = %error, "Student registry request failed");
            Err(error)
        }
    }
}

fn normalize_base_url(url: &str) -> Result<String, String> {
    let mut parsed = Url::parse(url).map_err(|err| err.to_string())?;
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);
    Ok(parsed.to_string())
}

fn format_endpoint(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}
