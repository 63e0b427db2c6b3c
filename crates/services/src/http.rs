use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use study_core::model::{Catalog, PlanEntry, ScoreDraft};
use tracing::instrument;

use crate::backend::{
    DashboardBackend, DeleteScoreRequest, PlannerReorderRequest, PlannerUpdateRequest,
    ProgressSnapshot, ToggleRequest, ToggleResponse, WeeklyUpdateRequest,
};
use crate::error::{ServiceError, TransportError};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Talks to a dashboard API over JSON. Every endpoint lives under `/api/`.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// # Errors
    ///
    /// Returns `ServiceError::Transport` if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Transport` if the HTTP client cannot be built.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api/{endpoint}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ServiceError> {
        let response = self.client.get(self.url(endpoint)).send().await?;
        let response = check_status(endpoint, response)?;
        Ok(response.json().await?)
    }

    async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ServiceError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.client.post(self.url(endpoint)).json(body).send().await?;
        let response = check_status(endpoint, response)?;
        Ok(response.json().await?)
    }

    /// Acknowledged writes; the response body is ignored.
    async fn post_ack<B>(&self, endpoint: &str, body: &B) -> Result<(), ServiceError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let response = self.client.post(self.url(endpoint)).json(body).send().await?;
        check_status(endpoint, response)?;
        Ok(())
    }
}

fn check_status(
    endpoint: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    tracing::warn!(endpoint, %status, "dashboard api rejected request");
    Err(TransportError::HttpStatus(status).into())
}

#[async_trait]
impl DashboardBackend for HttpBackend {
    #[instrument(skip(self))]
    async fn topics(&self) -> Result<Catalog, ServiceError> {
        self.get_json("topics").await
    }

    #[instrument(skip(self))]
    async fn progress(&self) -> Result<ProgressSnapshot, ServiceError> {
        self.get_json("progress").await
    }

    #[instrument(skip(self))]
    async fn scores(&self) -> Result<Vec<ScoreDraft>, ServiceError> {
        self.get_json("scores").await
    }

    #[instrument(skip(self))]
    async fn planner(&self) -> Result<Vec<PlanEntry>, ServiceError> {
        self.get_json("planner").await
    }

    #[instrument(skip(self))]
    async fn toggle(&self, request: &ToggleRequest) -> Result<ToggleResponse, ServiceError> {
        self.post_json("toggle", request).await
    }

    #[instrument(skip(self, score), fields(name = %score.name))]
    async fn add_score(&self, score: &ScoreDraft) -> Result<(), ServiceError> {
        self.post_ack("scores", score).await
    }

    #[instrument(skip(self))]
    async fn delete_score(&self, request: &DeleteScoreRequest) -> Result<(), ServiceError> {
        self.post_ack("scores/delete", request).await
    }

    #[instrument(skip(self))]
    async fn update_plan(
        &self,
        request: &PlannerUpdateRequest,
    ) -> Result<Vec<PlanEntry>, ServiceError> {
        self.post_json("planner/update", request).await
    }

    #[instrument(skip(self))]
    async fn reorder_plan(
        &self,
        request: &PlannerReorderRequest,
    ) -> Result<Vec<PlanEntry>, ServiceError> {
        self.post_json("planner/reorder", request).await
    }

    #[instrument(skip(self))]
    async fn update_weekly(&self, request: &WeeklyUpdateRequest) -> Result<(), ServiceError> {
        self.post_ack("weekly/update", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::model::{Category, Direction, PlanEntryId};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn loads_topics_with_prerequisites() {
        let server = MockServer::start().await;
        let body = serde_json::json!([
            {"name": "Quantitative Methods", "readings": ["Rates", "TVM"], "mm_prereqs": ["Math"]},
            {"name": "Economics", "readings": ["Firms"]}
        ]);
        Mock::given(method("GET"))
            .and(path("/api/topics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let backend = HttpBackend::new(&server.uri()).unwrap();
        let catalog = backend.topics().await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.topic(0).unwrap().prerequisite_count(), 1);
        assert_eq!(catalog.topic(1).unwrap().prerequisite_count(), 0);
    }

    #[tokio::test]
    async fn toggle_posts_key_and_category() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/toggle"))
            .and(body_json(serde_json::json!({"key": "0_0", "cat": "videos"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": true})),
            )
            .mount(&server)
            .await;

        let backend = HttpBackend::new(&format!("{}/", server.uri())).unwrap();
        let response = backend
            .toggle(&ToggleRequest {
                key: "0_0".into(),
                category: Category::Videos,
            })
            .await
            .unwrap();
        assert!(response.value);
    }

    #[tokio::test]
    async fn reorder_returns_updated_sequence() {
        let server = MockServer::start().await;
        let body = serde_json::json!([
            {"id": 2, "name": "Economics", "topic_idx": 1, "start": "2026-02-24", "days": 10},
            {"id": 1, "name": "Quant", "topic_idx": 0, "start": "2026-02-08", "days": 16}
        ]);
        Mock::given(method("POST"))
            .and(path("/api/planner/reorder"))
            .and(body_json(serde_json::json!({"id": 2, "direction": "up"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let backend = HttpBackend::new(&server.uri()).unwrap();
        let plan = backend
            .reorder_plan(&PlannerReorderRequest {
                id: PlanEntryId::new(2),
                direction: Direction::Up,
            })
            .await
            .unwrap();
        assert_eq!(plan[0].id(), PlanEntryId::new(2));
        assert_eq!(plan[1].days(), 16);
    }

    #[tokio::test]
    async fn error_status_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/scores/delete"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let backend = HttpBackend::new(&server.uri()).unwrap();
        let err = backend
            .delete_score(&DeleteScoreRequest { index: 0 })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Transport(TransportError::HttpStatus(status)) if status.as_u16() == 500
        ));
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() {
        let backend =
            HttpBackend::with_timeout("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        let err = backend.planner().await.unwrap_err();
        assert!(err.is_transport());
    }
}
