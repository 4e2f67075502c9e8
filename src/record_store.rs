// Record store boundary
// The remote store is a generic CRUD backend; everything above this module
// talks to it only through the `RecordStore` trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::entities::RecordId;

// An untyped record as the store returns it
pub type Record = Map<String, Value>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("Store error: {status_code} - {message}")]
    Backend { status_code: u16, message: String },

    #[error("Store rejected the request for {table}")]
    Rejected { table: String },

    #[error("Record {id} not found in {table}")]
    NotFound { table: String, id: RecordId },

    #[error("Invalid record in {table}: {message}")]
    InvalidRecord { table: String, message: String },

    #[error("Other error: {0}")]
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Contains,
    Equals,
    LessThanOrEqual,
    GreaterThanOrEqual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub operator: FilterOperator,
    pub value: Value,
}

impl Filter {
    pub fn new(field: &str, operator: FilterOperator, value: impl Into<Value>) -> Self {
        Self {
            field: field.to_string(),
            operator,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupOperator {
    And,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereGroup {
    pub operator: GroupOperator,
    #[serde(rename = "where")]
    pub conditions: Vec<Filter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingInfo {
    pub limit: usize,
    pub offset: usize,
}

// Lookup field to inline under `alias`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expand {
    pub name: String,
    pub alias: String,
}

// All `where` clauses and groups form one conjunction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchParams {
    pub fields: Vec<String>,
    #[serde(rename = "where", default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub where_groups: Vec<WhereGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging_info: Option<PagingInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expands: Vec<Expand>,
}

impl FetchParams {
    pub fn with_fields(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchResponse {
    #[serde(default)]
    pub data: Vec<Record>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordResponse {
    #[serde(default)]
    pub data: Option<Record>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateParams {
    pub records: Vec<Record>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateResult {
    pub data: Record,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateResponse {
    pub success: bool,
    #[serde(default)]
    pub results: Vec<CreateResult>,
}

impl CreateResponse {
    // First created record, if the store confirmed the create
    pub fn into_first(self) -> Option<Record> {
        if !self.success {
            return None;
        }
        self.results.into_iter().next().map(|r| r.data)
    }
}

// `{Id, ..changed fields}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPatch {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: Record,
}

impl RecordPatch {
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            fields: Record::new(),
        }
    }

    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateParams {
    pub records: Vec<RecordPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteParams {
    #[serde(rename = "RecordIds")]
    pub record_ids: Vec<RecordId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
}

// Generic CRUD client for the remote record store.
// Every call may fail; a `success: false` body is a valid, non-error response.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    async fn fetch_records(
        &self,
        table: &str,
        params: FetchParams,
    ) -> Result<FetchResponse, StoreError>;

    async fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        fields: &[String],
    ) -> Result<RecordResponse, StoreError>;

    async fn create_record(
        &self,
        table: &str,
        params: CreateParams,
    ) -> Result<CreateResponse, StoreError>;

    async fn update_record(
        &self,
        table: &str,
        params: UpdateParams,
    ) -> Result<MutationResponse, StoreError>;

    async fn delete_record(
        &self,
        table: &str,
        params: DeleteParams,
    ) -> Result<MutationResponse, StoreError>;
}
