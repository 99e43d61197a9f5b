use crate::api::models::{ApiResponse, DeleteParams, FetchParams, RecordsParams};
use crate::api::{Connector, RecordBackend};
use crate::config::{AppConfig, CredentialSource, Credentials};
use crate::error::{CrmError, CrmResult};
use crate::utils::truncate_chars;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Serialize;
use std::sync::Arc;
use url::Url;

const PROJECT_HEADER: &str = "X-Apper-Project-Id";
const KEY_HEADER: &str = "X-Apper-Public-Key";
const MAX_ERROR_BODY_CHARS: usize = 500;

/// HTTP adapter for one set of credentials.
///
/// Cheap to build: the underlying `reqwest::Client` is shared.
pub struct ApperClient {
    http: HttpClient,
    base_url: Url,
    credentials: Credentials,
}

impl ApperClient {
    pub fn new(http: HttpClient, base_url: &str, credentials: Credentials) -> CrmResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| CrmError::Config(format!("invalid base url `{base_url}`: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(CrmError::Config(format!(
                "base url `{base_url}` cannot carry a path"
            )));
        }
        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    /// `{base}/projects/{project}/tables/{table}/{action...}`
    pub fn endpoint(&self, table: &str, action: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["projects", self.credentials.project_id.as_str(), "tables", table])
                .extend(action);
        }
        url
    }

    /// Builds the POST for one SDK call without sending it.
    pub fn prepare<B: Serialize + ?Sized>(
        &self,
        table: &str,
        action: &[&str],
        body: &B,
    ) -> CrmResult<reqwest::Request> {
        let request = self
            .http
            .post(self.endpoint(table, action))
            .header(PROJECT_HEADER, &self.credentials.project_id)
            .header(KEY_HEADER, &self.credentials.public_key)
            .json(body)
            .build()?;
        Ok(request)
    }

    async fn call<B: Serialize + ?Sized + Sync>(
        &self,
        table: &str,
        action: &[&str],
        body: &B,
    ) -> CrmResult<ApiResponse> {
        let request = self.prepare(table, action, body)?;
        let url = request.url().clone();
        log::debug!("POST {url}");
        let resp = self.http.execute(request).await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(CrmError::Http {
                status: status.as_u16(),
                body: truncate_chars(&text, MAX_ERROR_BODY_CHARS),
            });
        }
        serde_json::from_str::<ApiResponse>(&text).map_err(|e| {
            log::error!("undecodable response from {url}: {e}");
            CrmError::UnexpectedResponse {
                operation: action.first().copied().map(action_name).unwrap_or("call"),
            }
        })
    }
}

fn action_name(action: &str) -> &'static str {
    match action {
        "fetch" => "fetch",
        "get" => "get",
        "create" => "create",
        "update" => "update",
        "delete" => "delete",
        _ => "call",
    }
}

#[async_trait]
impl RecordBackend for ApperClient {
    async fn fetch_records(&self, table: &str, params: &FetchParams) -> CrmResult<ApiResponse> {
        self.call(table, &["fetch"], params).await
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        params: &FetchParams,
    ) -> CrmResult<ApiResponse> {
        let id = id.to_string();
        self.call(table, &["get", id.as_str()], params).await
    }

    async fn create_record(&self, table: &str, params: &RecordsParams) -> CrmResult<ApiResponse> {
        self.call(table, &["create"], params).await
    }

    async fn update_record(&self, table: &str, params: &RecordsParams) -> CrmResult<ApiResponse> {
        self.call(table, &["update"], params).await
    }

    async fn delete_record(&self, table: &str, params: &DeleteParams) -> CrmResult<ApiResponse> {
        self.call(table, &["delete"], params).await
    }
}

/// Builds an [`ApperClient`] per call from injected settings.
pub struct ApperConnector {
    http: HttpClient,
    base_url: String,
    credentials: CredentialSource,
}

impl ApperConnector {
    /// Credentials come from the environment, then `config`, on every call.
    pub fn from_config(config: &AppConfig) -> CrmResult<Self> {
        let config = config
            .clone()
            .with_env_overrides(|name| std::env::var(name).ok());
        Self::new(
            &config.base_url(),
            config.timeout(),
            CredentialSource::Environment(config.clone()),
        )
    }

    pub fn new(
        base_url: &str,
        timeout: std::time::Duration,
        credentials: CredentialSource,
    ) -> CrmResult<Self> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.to_string(),
            credentials,
        })
    }
}

impl Connector for ApperConnector {
    fn connect(&self) -> CrmResult<Arc<dyn RecordBackend>> {
        let credentials = self.credentials.resolve()?;
        let client = ApperClient::new(self.http.clone(), &self.base_url, credentials)?;
        Ok(Arc::new(client))
    }
}
