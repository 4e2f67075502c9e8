// HTTP adapter for the remote record store

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::StoreConfig;
use crate::entities::RecordId;
use crate::record_store::{
    CreateParams, CreateResponse, DeleteParams, FetchParams, FetchResponse, MutationResponse,
    RecordResponse, RecordStore, StoreError, UpdateParams,
};

pub struct HttpRecordStore {
    client: Client,
    config: StoreConfig,
}

impl HttpRecordStore {
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| StoreError::Other(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn table_url(&self, table: &str, suffix: &str) -> String {
        format!("{}/tables/{}/{}", self.config.base_url, table, suffix)
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.config.api_key)
    }

    fn transport_error(&self, err: reqwest::Error) -> StoreError {
        if err.is_timeout() {
            StoreError::Timeout(self.config.timeout_ms)
        } else {
            StoreError::Network(err.to_string())
        }
    }

    async fn send<T, B>(
        &self,
        method: Method,
        url: String,
        table: &str,
        id: Option<RecordId>,
        body: Option<&B>,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut request = self.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, %url, "record store request");
        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(status_error(status, table, id, message));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::InvalidRecord {
                table: table.to_string(),
                message: e.to_string(),
            })
    }
}

// Maps a non-success HTTP status onto the store taxonomy
pub fn status_error(
    status: StatusCode,
    table: &str,
    id: Option<RecordId>,
    message: String,
) -> StoreError {
    match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => StoreError::NotFound {
            table: table.to_string(),
            id,
        },
        _ => StoreError::Backend {
            status_code: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn fetch_records(
        &self,
        table: &str,
        params: FetchParams,
    ) -> Result<FetchResponse, StoreError> {
        let url = self.table_url(table, "query");
        self.send(Method::POST, url, table, None, Some(&params))
            .await
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        fields: &[String],
    ) -> Result<RecordResponse, StoreError> {
        let mut url = self.table_url(table, &format!("records/{}", id));
        if !fields.is_empty() {
            url = format!("{}?fields={}", url, fields.join(","));
        }
        match self
            .send::<RecordResponse, ()>(Method::GET, url, table, Some(id), None)
            .await
        {
            // Absence is a normal answer for a lookup
            Err(StoreError::NotFound { .. }) => Ok(RecordResponse { data: None }),
            other => other,
        }
    }

    async fn create_record(
        &self,
        table: &str,
        params: CreateParams,
    ) -> Result<CreateResponse, StoreError> {
        let url = self.table_url(table, "records");
        self.send(Method::POST, url, table, None, Some(&params))
            .await
    }

    async fn update_record(
        &self,
        table: &str,
        params: UpdateParams,
    ) -> Result<MutationResponse, StoreError> {
        let url = self.table_url(table, "records");
        self.send(Method::PATCH, url, table, None, Some(&params))
            .await
    }

    async fn delete_record(
        &self,
        table: &str,
        params: DeleteParams,
    ) -> Result<MutationResponse, StoreError> {
        let url = self.table_url(table, "records");
        self.send(Method::DELETE, url, table, None, Some(&params))
            .await
    }
}
