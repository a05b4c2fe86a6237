use super::ApiClient;
use crate::domain::model::{OperatorInput, TourOperator};
use crate::utils::error::Result;

const OPERATORS_PATH: &str = "/api/TourOperators";

#[derive(Debug, Clone)]
pub struct OperatorService {
    client: ApiClient,
}

impl OperatorService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<TourOperator>> {
        self.client.get_list(OPERATORS_PATH, &[]).await
    }

    pub async fn get(&self, id: i64) -> Result<TourOperator> {
        self.client
            .get_json(&format!("{}/{}", OPERATORS_PATH, id), &[])
            .await
    }

    pub async fn create(&self, input: &OperatorInput) -> Result<Option<TourOperator>> {
        self.client.post_created(OPERATORS_PATH, input).await
    }

    pub async fn update(&self, id: i64, input: &OperatorInput) -> Result<()> {
        self.client
            .put_unit(&format!("{}/{}", OPERATORS_PATH, id), input)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client
            .delete_unit(&format!("{}/{}", OPERATORS_PATH, id))
            .await
    }
}
