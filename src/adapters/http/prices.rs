use super::{ApiClient, RouteService, SeasonService};
use crate::domain::model::{
    BookingClass, ListPayload, PriceEntry, PriceEntryUpsert, PriceQuery, Route, Season,
};
use crate::domain::ports::PricingApi;
use crate::utils::error::Result;
use async_trait::async_trait;

const PRICES_PATH: &str = "/api/priceentries";

/// 價格相關 API；定價表畫面也透過它讀路線、季節與艙等
#[derive(Debug, Clone)]
pub struct PriceEntryService {
    client: ApiClient,
}

impl PriceEntryService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn query_page(&self, query: &PriceQuery) -> Result<ListPayload<PriceEntry>> {
        self.client.get_json(PRICES_PATH, &query.to_params()).await
    }

    pub async fn create(&self, entry: &PriceEntryUpsert) -> Result<Option<PriceEntry>> {
        self.client.post_created(PRICES_PATH, entry).await
    }
}

#[async_trait]
impl PricingApi for PriceEntryService {
    async fn routes(&self) -> Result<Vec<Route>> {
        RouteService::new(self.client.clone()).list().await
    }

    async fn seasons(&self) -> Result<Vec<Season>> {
        SeasonService::new(self.client.clone()).list().await
    }

    async fn booking_classes(&self, route_id: i64) -> Result<Vec<BookingClass>> {
        RouteService::new(self.client.clone())
            .booking_classes(route_id)
            .await
    }

    async fn query(&self, query: &PriceQuery) -> Result<Vec<PriceEntry>> {
        Ok(self.query_page(query).await?.into_items())
    }

    async fn bulk_upsert(&self, rows: &[PriceEntryUpsert]) -> Result<()> {
        tracing::info!("💾 Upserting {} price entries", rows.len());
        self.client
            .post_unit(&format!("{}/bulk-upsert", PRICES_PATH), rows)
            .await
    }
}
