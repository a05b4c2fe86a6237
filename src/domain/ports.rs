use crate::domain::model::{BookingClass, PriceEntry, PriceEntryUpsert, PriceQuery, Route, Season};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove_file(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn session_dir(&self) -> &str;
    fn output_path(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn export_format(&self) -> &str;
}

/// 定價表畫面需要的遠端操作
#[async_trait]
pub trait PricingApi: Send + Sync {
    async fn routes(&self) -> Result<Vec<Route>>;
    async fn seasons(&self) -> Result<Vec<Season>>;
    async fn booking_classes(&self, route_id: i64) -> Result<Vec<BookingClass>>;
    async fn query(&self, query: &PriceQuery) -> Result<Vec<PriceEntry>>;
    async fn bulk_upsert(&self, rows: &[PriceEntryUpsert]) -> Result<()>;
}
