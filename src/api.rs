use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Url;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{Announcement, AnnouncementScope, GradeRecord};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("fetch failed: {0}")]
    FetchFailed(String),
    #[error("response carried no usable payload")]
    EmptyResult,
}

pub type FetchResult<T> = Result<T, FetchError>;

/// The two reads the dashboard depends on.
#[async_trait]
pub trait PortalApi: Send + Sync {
    async fn fetch_grade_record(&self, grade_id: &str, access_key: &str) -> FetchResult<GradeRecord>;

    async fn fetch_school_announcements(&self, access_key: &str) -> FetchResult<Vec<Announcement>>;
}

#[derive(Clone)]
pub struct HttpPortalApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPortalApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> FetchResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| FetchError::FetchFailed(format!("invalid API base url {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::FetchFailed(format!("API base url {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str], access_key: &str) -> FetchResult<T> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%url, "Portal API request");

        let resp = self
            .http
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", access_key))
            .send()
            .await
            .map_err(|e| FetchError::FetchFailed(format!("request to {} failed: {}", url, e)))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::FetchFailed(format!("response read failed: {}", e)))?;

        if !status.is_success() {
            return Err(FetchError::FetchFailed(format!("portal API error: {} - {}", status, body)));
        }

        decode_body(&body)
    }
}

fn decode_body<T: DeserializeOwned>(body: &str) -> FetchResult<T> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(FetchError::EmptyResult);
    }
    serde_json::from_str(trimmed).map_err(|e| FetchError::FetchFailed(format!("response parse failed: {}", e)))
}

#[async_trait]
impl PortalApi for HttpPortalApi {
    async fn fetch_grade_record(&self, grade_id: &str, access_key: &str) -> FetchResult<GradeRecord> {
        self.get_json(&["api", "grades", grade_id], access_key).await
    }

    async fn fetch_school_announcements(&self, access_key: &str) -> FetchResult<Vec<Announcement>> {
        let mut announcements: Vec<Announcement> =
            self.get_json(&["api", "announcements", "school"], access_key).await?;
        for announcement in &mut announcements {
            announcement.scope = AnnouncementScope::School;
        }
        Ok(announcements)
    }
}

pub mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use parking_lot::Mutex;
    use tokio::time::sleep;

    use super::*;

    struct Scripted<T> {
        result: FetchResult<T>,
        delay: Duration,
    }

    /// In-memory API used by tests. Every call returns a clone of the currently scripted
    /// result after the scripted delay, and is counted.
    pub struct MockPortalApi {
        grade: Mutex<Scripted<GradeRecord>>,
        school: Mutex<Scripted<Vec<Announcement>>>,
        grade_calls: AtomicUsize,
        school_calls: AtomicUsize,
    }

    impl MockPortalApi {
        pub fn new() -> Self {
            Self {
                grade: Mutex::new(Scripted {
                    result: Ok(GradeRecord::default()),
                    delay: Duration::ZERO,
                }),
                school: Mutex::new(Scripted {
                    result: Ok(Vec::new()),
                    delay: Duration::ZERO,
                }),
                grade_calls: AtomicUsize::new(0),
                school_calls: AtomicUsize::new(0),
            }
        }

        pub fn set_grade(&self, result: FetchResult<GradeRecord>, delay: Duration) {
            *self.grade.lock() = Scripted { result, delay };
        }

        pub fn set_school(&self, result: FetchResult<Vec<Announcement>>, delay: Duration) {
            *self.school.lock() = Scripted { result, delay };
        }

        pub fn grade_calls(&self) -> usize {
            self.grade_calls.load(Ordering::SeqCst)
        }

        pub fn school_calls(&self) -> usize {
            self.school_calls.load(Ordering::SeqCst)
        }
    }

    impl Default for MockPortalApi {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl PortalApi for MockPortalApi {
        async fn fetch_grade_record(&self, _grade_id: &str, _access_key: &str) -> FetchResult<GradeRecord> {
            self.grade_calls.fetch_add(1, Ordering::SeqCst);
            let (result, delay) = {
                let scripted = self.grade.lock();
                (scripted.result.clone(), scripted.delay)
            };
            if !delay.is_zero() {
                sleep(delay).await;
            }
            result
        }

        async fn fetch_school_announcements(&self, _access_key: &str) -> FetchResult<Vec<Announcement>> {
            self.school_calls.fetch_add(1, Ordering::SeqCst);
            let (result, delay) = {
                let scripted = self.school.lock();
                (scripted.result.clone(), scripted.delay)
            };
            if !delay.is_zero() {
                sleep(delay).await;
            }
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_null_bodies_are_empty_results() {
        assert_eq!(decode_body::<GradeRecord>(""), Err(FetchError::EmptyResult));
        assert_eq!(decode_body::<GradeRecord>("  null \n"), Err(FetchError::EmptyResult));
    }

    #[test]
    fn malformed_body_is_a_fetch_failure() {
        let result = decode_body::<Vec<Announcement>>("{not json");
        assert!(matches!(result, Err(FetchError::FetchFailed(_))));
    }

    #[test]
    fn school_list_decodes() {
        let list: Vec<Announcement> = decode_body(r#"[{"id":"s1","title":"Holiday"}]"#).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].title, "Holiday");
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let api = HttpPortalApi::new("http://localhost:3001/");
        assert_eq!(api.base_url, "http://localhost:3001");
    }

    #[test]
    fn grade_id_is_encoded_as_a_single_path_segment() {
        let api = HttpPortalApi::new("http://localhost:3001");
        let url = api.endpoint(&["api", "grades", "a/b?c#d"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3001/api/grades/a%2Fb%3Fc%23d");
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let api = HttpPortalApi::new("https://school.example/portal/");
        let url = api.endpoint(&["api", "announcements", "school"]).unwrap();
        assert_eq!(url.as_str(), "https://school.example/portal/api/announcements/school");
    }

    #[test]
    fn unusable_base_url_is_a_fetch_failure() {
        let api = HttpPortalApi::new("not a url");
        assert!(matches!(api.endpoint(&["api"]), Err(FetchError::FetchFailed(_))));
    }
}
