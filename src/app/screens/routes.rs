use super::notice::{Confirm, NoticeBoard};
use super::seasons::api_message_or;
use crate::adapters::http::{RouteService, SeasonService};
use crate::domain::model::{BookingClass, Route, RouteInput, Season};
use crate::utils::error::Result;
use crate::utils::validation::validate_required;

/// 表單可選的艙等
pub const BOOKING_CLASS_CATALOGUE: [(i64, &str); 2] = [(1, "Economy"), (2, "Business")];

/// 依名稱對應到目錄中的艙等，找不到的名稱直接略過
pub fn resolve_booking_classes<S: AsRef<str>>(names: &[S]) -> Vec<BookingClass> {
    names
        .iter()
        .map(|n| n.as_ref().trim())
        .filter(|n| !n.is_empty())
        .filter_map(|name| {
            BOOKING_CLASS_CATALOGUE
                .iter()
                .find(|(_, known)| known.eq_ignore_ascii_case(name))
                .map(|(id, known)| BookingClass {
                    id: *id,
                    name: known.to_string(),
                })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteForm {
    pub origin: String,
    pub destination: String,
    pub booking_class_names: Vec<String>,
    pub season_id: Option<i64>,
}

impl RouteForm {
    pub fn to_input(&self) -> Result<RouteInput> {
        validate_required("origin", &self.origin)?;
        validate_required("destination", &self.destination)?;
        Ok(RouteInput {
            origin: self.origin.trim().to_string(),
            destination: self.destination.trim().to_string(),
            booking_class_ids: resolve_booking_classes(&self.booking_class_names)
                .into_iter()
                .map(|c| c.id)
                .collect(),
            season_id: self.season_id,
        })
    }
}

pub struct RouteScreen {
    routes_svc: RouteService,
    seasons_svc: SeasonService,
    routes: Vec<Route>,
    seasons: Vec<Season>,
    notices: NoticeBoard,
}

impl RouteScreen {
    pub fn new(routes_svc: RouteService, seasons_svc: SeasonService) -> Self {
        Self {
            routes_svc,
            seasons_svc,
            routes: Vec::new(),
            seasons: Vec::new(),
            notices: NoticeBoard::default(),
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn seasons(&self) -> &[Season] {
        &self.seasons
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub async fn refresh_routes(&mut self) -> Result<()> {
        match self.routes_svc.list().await {
            Ok(routes) => {
                self.routes = routes;
                Ok(())
            }
            Err(e) => {
                self.notices.error(api_message_or(&e, "Failed to load routes."));
                Err(e)
            }
        }
    }

    pub async fn load_seasons(&mut self) -> Result<()> {
        match self.seasons_svc.list().await {
            Ok(seasons) => {
                tracing::debug!("Loaded {} seasons", seasons.len());
                self.seasons = seasons;
                Ok(())
            }
            Err(e) => {
                self.notices.error(api_message_or(&e, "Failed to load seasons."));
                Err(e)
            }
        }
    }

    /// 季節涵蓋的年份，去重後由小到大
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.seasons.iter().map(|s| s.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    pub fn seasons_for_year(&self, year: Option<i32>) -> Vec<&Season> {
        self.seasons
            .iter()
            .filter(|s| year.map_or(true, |y| s.year == y))
            .collect()
    }

    pub fn booking_class_names(route: &Route) -> String {
        route
            .booking_classes
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub async fn save(&mut self, form: &RouteForm, edit_id: Option<i64>) -> Result<()> {
        let input = form.to_input()?;
        let result = match edit_id {
            Some(id) => self.routes_svc.update(id, &input).await,
            None => self.routes_svc.create(&input).await.map(|_| ()),
        };

        match result {
            Ok(()) => {
                tracing::info!("✅ Saved route {} → {}", input.origin, input.destination);
                self.refresh_routes().await
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

    pub async fn delete(&mut self, id: i64, confirm: &dyn Confirm) -> Result<bool> {
        if !confirm.confirm("Are you sure you want to delete this route?") {
            return Ok(false);
        }

        match self.routes_svc.delete(id).await {
            Ok(()) => {
                self.refresh_routes().await?;
                self.notices.info("Route deleted successfully");
                Ok(true)
            }
            Err(e) => {
                self.notices
                    .error(api_message_or(&e, "Failed to delete route."));
                Err(e)
            }
        }
    }

    pub async fn booking_classes(&mut self, route_id: i64) -> Result<Vec<BookingClass>> {
        self.routes_svc.booking_classes(route_id).await.map_err(|e| {
            self.notices
                .error(api_message_or(&e, "Failed to load booking classes."));
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_booking_classes() {
        let classes = resolve_booking_classes(&["Business", " economy ", "First", ""]);
        assert_eq!(
            classes,
            vec![
                BookingClass {
                    id: 2,
                    name: "Business".to_string()
                },
                BookingClass {
                    id: 1,
                    name: "Economy".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_route_form_requires_endpoints() {
        let form = RouteForm {
            origin: "VIE".to_string(),
            destination: "  ".to_string(),
            booking_class_names: vec![],
            season_id: None,
        };
        assert!(form.to_input().is_err());

        let form = RouteForm {
            destination: "PMI".to_string(),
            booking_class_names: vec!["Economy".to_string()],
            season_id: Some(3),
            ..form
        };
        let input = form.to_input().unwrap();
        assert_eq!(input.booking_class_ids, vec![1]);
        assert_eq!(input.season_id, Some(3));
    }
}
