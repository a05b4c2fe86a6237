use super::notice::{Confirm, NoticeBoard};
use super::seasons::api_message_or;
use crate::adapters::http::{OperatorService, SeasonService};
use crate::core::session::Session;
use crate::domain::model::{OperatorInput, Season, TourOperator};
use crate::utils::error::Result;
use crate::utils::validation::{validate_email, validate_min_length, validate_required};

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Operator 角色且有 operatorId 時只看得到自己
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorScope {
    All,
    Own(i64),
}

impl OperatorScope {
    pub fn for_session(session: Option<&Session>) -> Self {
        match session {
            Some(s) if s.role == "Operator" => s.operator_id.map_or(Self::All, Self::Own),
            _ => Self::All,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperatorForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub booking_class_ids: Vec<i64>,
    pub season_ids: Vec<i64>,
}

impl OperatorForm {
    /// 密碼只在新建時檢查並送出
    pub fn to_input(&self, creating: bool) -> Result<OperatorInput> {
        validate_required("name", &self.name)?;
        validate_email("email", &self.email)?;
        if creating {
            validate_min_length("password", &self.password, MIN_PASSWORD_LENGTH)?;
        }

        Ok(OperatorInput {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: creating.then(|| self.password.clone()),
            booking_class_ids: self.booking_class_ids.clone(),
            season_ids: self.season_ids.clone(),
        })
    }
}

pub struct OperatorScreen {
    operators_svc: OperatorService,
    seasons_svc: SeasonService,
    scope: OperatorScope,
    operators: Vec<TourOperator>,
    seasons: Vec<Season>,
    notices: NoticeBoard,
}

impl OperatorScreen {
    pub fn new(
        operators_svc: OperatorService,
        seasons_svc: SeasonService,
        scope: OperatorScope,
    ) -> Self {
        Self {
            operators_svc,
            seasons_svc,
            scope,
            operators: Vec::new(),
            seasons: Vec::new(),
            notices: NoticeBoard::default(),
        }
    }

    pub fn operators(&self) -> &[TourOperator] {
        &self.operators
    }

    pub fn seasons(&self) -> &[Season] {
        &self.seasons
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub async fn fetch(&mut self) -> Result<()> {
        let result = match self.scope {
            OperatorScope::Own(id) => self.operators_svc.get(id).await.map(|op| vec![op]),
            OperatorScope::All => self.operators_svc.list().await,
        };

        match result {
            Ok(operators) => {
                self.operators = operators;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to fetch operators: {}", e);
                let message = match self.scope {
                    OperatorScope::Own(_) => "Failed to load operator.",
                    OperatorScope::All => "Failed to load operators.",
                };
                self.notices.error(message);
                Err(e)
            }
        }
    }

    pub async fn load_seasons(&mut self) -> Result<()> {
        match self.seasons_svc.list().await {
            Ok(seasons) => {
                self.seasons = seasons;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to load seasons: {}", e);
                self.notices.error("Failed to load seasons.");
                Err(e)
            }
        }
    }

    /// 編輯時預先帶入既有資料 (密碼留空)
    pub fn form_for(operator: &TourOperator) -> OperatorForm {
        OperatorForm {
            name: operator.name.clone(),
            email: operator.email.clone(),
            password: String::new(),
            booking_class_ids: operator.booking_classes.iter().map(|b| b.id).collect(),
            season_ids: operator.seasons.iter().map(|s| s.id).collect(),
        }
    }

    pub async fn submit(&mut self, form: &OperatorForm, edit_id: Option<i64>) -> Result<()> {
        let input = form.to_input(edit_id.is_none())?;
        let result = match edit_id {
            Some(id) => self.operators_svc.update(id, &input).await,
            None => self.operators_svc.create(&input).await.map(|_| ()),
        };

        match result {
            Ok(()) => {
                tracing::info!("✅ Saved operator {}", input.name);
                self.fetch().await
            }
            Err(e) => {
                self.notices.error(if edit_id.is_some() {
                    "Update failed."
                } else {
                    "Creation failed."
                });
                Err(e)
            }
        }
    }

    pub async fn delete(&mut self, id: i64, confirm: &dyn Confirm) -> Result<bool> {
        let label = self
            .operators
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.name.clone())
            .unwrap_or_else(|| format!("#{}", id));

        if !confirm.confirm(&format!("Delete operator \"{}\"?", label)) {
            return Ok(false);
        }

        match self.operators_svc.delete(id).await {
            Ok(()) => {
                self.fetch().await?;
                Ok(true)
            }
            Err(e) => {
                tracing::error!("Delete failed: {}", e);
                self.notices
                    .error(api_message_or(&e, "Failed to delete operator."));
                Err(e)
            }
        }
    }

    pub fn booking_class_names(operator: &TourOperator) -> String {
        operator
            .booking_classes
            .iter()
            .map(|b| b.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> OperatorForm {
        OperatorForm {
            name: "Sun Tours".to_string(),
            email: "ops@sun.example".to_string(),
            password: "secret1".to_string(),
            booking_class_ids: vec![1, 2],
            season_ids: vec![5],
        }
    }

    #[test]
    fn test_form_validation() {
        assert!(form().to_input(true).is_ok());

        let short = OperatorForm {
            password: "123".to_string(),
            ..form()
        };
        assert!(short.to_input(true).is_err());
        // 更新時不檢查密碼，也不送出
        let input = short.to_input(false).unwrap();
        assert!(input.password.is_none());

        let bad_email = OperatorForm {
            email: "nope".to_string(),
            ..form()
        };
        assert!(bad_email.to_input(false).is_err());

        let no_name = OperatorForm {
            name: " ".to_string(),
            ..form()
        };
        assert!(no_name.to_input(true).is_err());
    }

    #[test]
    fn test_scope_from_session() {
        let operator = Session {
            token: "t".to_string(),
            role: "Operator".to_string(),
            user_id: None,
            operator_id: Some(12),
        };
        assert_eq!(OperatorScope::for_session(Some(&operator)), OperatorScope::Own(12));

        let admin = Session {
            role: "Admin".to_string(),
            ..operator.clone()
        };
        assert_eq!(OperatorScope::for_session(Some(&admin)), OperatorScope::All);

        let unlinked = Session {
            operator_id: None,
            ..operator
        };
        assert_eq!(OperatorScope::for_session(Some(&unlinked)), OperatorScope::All);
        assert_eq!(OperatorScope::for_session(None), OperatorScope::All);
    }
}
