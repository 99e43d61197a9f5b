//! The record API seam.
//!
//! [`RecordBackend`] mirrors the five SDK calls. [`Connector`] hands out a
//! backend adapter per service call so credentials are picked up fresh each
//! time.

pub mod client;
pub mod memory;
pub mod models;

use crate::error::CrmResult;
use async_trait::async_trait;
use models::{ApiResponse, DeleteParams, FetchParams, RecordsParams};
use std::sync::Arc;

#[async_trait]
pub trait RecordBackend: Send + Sync {
    async fn fetch_records(&self, table: &str, params: &FetchParams) -> CrmResult<ApiResponse>;

    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        params: &FetchParams,
    ) -> CrmResult<ApiResponse>;

    async fn create_record(&self, table: &str, params: &RecordsParams) -> CrmResult<ApiResponse>;

    async fn update_record(&self, table: &str, params: &RecordsParams) -> CrmResult<ApiResponse>;

    async fn delete_record(&self, table: &str, params: &DeleteParams) -> CrmResult<ApiResponse>;
}

pub trait Connector: Send + Sync {
    fn connect(&self) -> CrmResult<Arc<dyn RecordBackend>>;
}

impl<B: RecordBackend + 'static> Connector for Arc<B> {
    fn connect(&self) -> CrmResult<Arc<dyn RecordBackend>> {
        Ok(self.clone())
    }
}

pub use client::{ApperClient, ApperConnector};
pub use memory::MemoryBackend;
