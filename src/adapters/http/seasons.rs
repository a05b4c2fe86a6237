use super::ApiClient;
use crate::domain::model::Season;
use crate::utils::error::Result;

const SEASONS_PATH: &str = "/api/seasons";

#[derive(Debug, Clone)]
pub struct SeasonService {
    client: ApiClient,
}

impl SeasonService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Season>> {
        self.client.get_list(SEASONS_PATH, &[]).await
    }

    pub async fn create(&self, season: &Season) -> Result<Option<Season>> {
        self.client.post_created(SEASONS_PATH, season).await
    }

    pub async fn update(&self, id: i64, season: &Season) -> Result<()> {
        self.client
            .put_unit(&format!("{}/{}", SEASONS_PATH, id), season)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client
            .delete_unit(&format!("{}/{}", SEASONS_PATH, id))
            .await
    }
}
