use super::notice::{Confirm, NoticeBoard};
use crate::adapters::http::SeasonService;
use crate::core::season::{season_payload, sort_seasons};
use crate::domain::model::{Season, SeasonType};
use crate::utils::error::{DeskError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonForm {
    pub year: i32,
    pub season_type: SeasonType,
}

pub struct SeasonScreen {
    service: SeasonService,
    seasons: Vec<Season>,
    notices: NoticeBoard,
}

impl SeasonScreen {
    pub fn new(service: SeasonService) -> Self {
        Self {
            service,
            seasons: Vec::new(),
            notices: NoticeBoard::default(),
        }
    }

    pub fn seasons(&self) -> &[Season] {
        &self.seasons
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub async fn fetch(&mut self) -> Result<()> {
        match self.service.list().await {
            Ok(mut seasons) => {
                sort_seasons(&mut seasons);
                self.seasons = seasons;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to fetch seasons: {}", e);
                self.notices.error("Failed to load seasons.");
                Err(e)
            }
        }
    }

    /// 有 edit_id 為更新，否則新建；成功後重新載入清單
    pub async fn submit(&mut self, form: SeasonForm, edit_id: Option<i64>) -> Result<Season> {
        let season = season_payload(edit_id, form.year, form.season_type).ok_or_else(|| {
            DeskError::ValidationError {
                message: format!("{} is not a supported year", form.year),
            }
        })?;

        let result = match edit_id {
            Some(id) => self.service.update(id, &season).await.map(|_| season.clone()),
            None => self
                .service
                .create(&season)
                .await
                .map(|created| created.unwrap_or_else(|| season.clone())),
        };

        match result {
            Ok(saved) => {
                tracing::info!("✅ Saved season {}", season.name);
                self.fetch().await?;
                Ok(saved)
            }
            Err(e) => {
                let fallback = if edit_id.is_some() {
                    "Update failed."
                } else {
                    "Creation failed."
                };
                self.notices.error(api_message_or(&e, fallback));
                Err(e)
            }
        }
    }

    /// 回傳是否真的刪除 (使用者取消時為 false)
    pub async fn delete(&mut self, id: i64, confirm: &dyn Confirm) -> Result<bool> {
        let label = self
            .seasons
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| format!("#{}", id));

        if !confirm.confirm(&format!("Delete season \"{}\"?", label)) {
            return Ok(false);
        }

        match self.service.delete(id).await {
            Ok(()) => {
                tracing::info!("🗑️ Deleted season {}", label);
                self.fetch().await?;
                Ok(true)
            }
            Err(e) => {
                tracing::error!("Delete failed: {}", e);
                self.notices.error(api_message_or(
                    &e,
                    "Failed to delete season. It might be in use.",
                ));
                Err(e)
            }
        }
    }
}

/// 伺服器有給訊息就用伺服器的，否則用畫面預設訊息
pub(crate) fn api_message_or(error: &DeskError, fallback: &str) -> String {
    match error {
        DeskError::ApiResponseError {
            message: Some(message),
            ..
        } => message.clone(),
        _ => fallback.to_string(),
    }
}
