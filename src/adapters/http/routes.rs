use super::ApiClient;
use crate::domain::model::{BookingClass, Route, RouteInput};
use crate::utils::error::Result;

const ROUTES_PATH: &str = "/api/routes";

#[derive(Debug, Clone)]
pub struct RouteService {
    client: ApiClient,
}

impl RouteService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Route>> {
        self.client.get_list(ROUTES_PATH, &[]).await
    }

    pub async fn create(&self, input: &RouteInput) -> Result<Option<Route>> {
        self.client.post_created(ROUTES_PATH, input).await
    }

    pub async fn update(&self, id: i64, input: &RouteInput) -> Result<()> {
        self.client
            .put_unit(&format!("{}/{}", ROUTES_PATH, id), input)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client
            .delete_unit(&format!("{}/{}", ROUTES_PATH, id))
            .await
    }

    pub async fn booking_classes(&self, route_id: i64) -> Result<Vec<BookingClass>> {
        self.client
            .get_list(&format!("{}/{}/booking-classes", ROUTES_PATH, route_id), &[])
            .await
    }
}
