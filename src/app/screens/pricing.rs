use super::notice::NoticeBoard;
use super::seasons::api_message_or;
use crate::core::calendar::{clamp_month, clamp_window, month_days_clamped, GridDay, YearMonth};
use crate::core::export::{build_sheet, write_export, ExportFormat, ExportSheet};
use crate::core::overlay::{parse_price_input, parse_seats_input, EditOverlay, PriceField, UpsertScope};
use crate::domain::model::{BookingClass, PriceEntry, PriceQuery, Route, Season};
use crate::domain::ports::{PricingApi, Storage};
use crate::utils::error::{DeskError, Result};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::str::FromStr;

/// 一次載入整個月份的價格
pub const GRID_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(usize),
    NothingToSave,
}

/// 由命令列給的單格編輯：`日期:艙等id:價格:座位`，價格或座位可留空
#[derive(Debug, Clone, PartialEq)]
pub struct CellInput {
    pub date: NaiveDate,
    pub class_id: i64,
    pub price: Option<String>,
    pub seats: Option<String>,
}

impl FromStr for CellInput {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| DeskError::ValidationError {
            message: format!("invalid cell '{}': {}", s, reason),
        };
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 4 {
            return Err(invalid("expected DATE:CLASS_ID:PRICE:SEATS"));
        }

        let date = NaiveDate::parse_from_str(parts[0].trim(), "%Y-%m-%d")
            .map_err(|_| invalid("date must be YYYY-MM-DD"))?;
        let class_id = parts[1]
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid("booking class id must be a number"))?;
        let optional = |p: &str| Some(p.to_string()).filter(|p| !p.trim().is_empty());

        Ok(Self {
            date,
            class_id,
            price: optional(parts[2]),
            seats: optional(parts[3]),
        })
    }
}

/// 月份定價表。選取變更時先更新衍生欄位 (季節、月份夾擠)，再觸發相依的載入
pub struct PricingScreen<A: PricingApi> {
    api: A,
    tour_operator_id: String,
    routes: Vec<Route>,
    seasons: Vec<Season>,
    booking_classes: Vec<BookingClass>,
    selected_route: Option<i64>,
    selected_season: Option<i64>,
    selected_month: YearMonth,
    overlay: EditOverlay,
    generation: u64,
    notices: NoticeBoard,
}

impl<A: PricingApi> PricingScreen<A> {
    pub fn new(api: A, tour_operator_id: impl Into<String>, month: YearMonth) -> Self {
        Self {
            api,
            tour_operator_id: tour_operator_id.into(),
            routes: Vec::new(),
            seasons: Vec::new(),
            booking_classes: Vec::new(),
            selected_route: None,
            selected_season: None,
            selected_month: month,
            overlay: EditOverlay::new(),
            generation: 0,
            notices: NoticeBoard::default(),
        }
    }

    /// 載入前指定路線與季節；清單中找不到時退回第一筆
    pub fn with_selection(mut self, route_id: Option<i64>, season_id: Option<i64>) -> Self {
        self.selected_route = route_id;
        self.selected_season = season_id;
        self
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn seasons(&self) -> &[Season] {
        &self.seasons
    }

    pub fn booking_classes(&self) -> &[BookingClass] {
        &self.booking_classes
    }

    pub fn selected_route(&self) -> Option<&Route> {
        self.selected_route
            .and_then(|id| self.routes.iter().find(|r| r.id == id))
    }

    pub fn selected_month(&self) -> YearMonth {
        self.selected_month
    }

    pub fn overlay(&self) -> &EditOverlay {
        &self.overlay
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn season(&self) -> Option<&Season> {
        self.selected_season
            .and_then(|id| self.seasons.iter().find(|s| s.id == id))
    }

    pub fn days(&self) -> Vec<GridDay> {
        match self.season() {
            Some(season) => month_days_clamped(self.selected_month, season.start, season.end),
            None => Vec::new(),
        }
    }

    /// 載入路線與季節；失敗時清單為空。未選取時預設第一筆
    pub async fn load_reference_data(&mut self) -> Result<()> {
        self.routes = self.api.routes().await.unwrap_or_else(|e| {
            tracing::warn!("Failed to load routes: {}", e);
            Vec::new()
        });
        self.seasons = self.api.seasons().await.unwrap_or_else(|e| {
            tracing::warn!("Failed to load seasons: {}", e);
            Vec::new()
        });

        let route = self
            .selected_route
            .filter(|id| self.routes.iter().any(|r| r.id == *id))
            .or_else(|| self.routes.first().map(|r| r.id));
        let season = self
            .selected_season
            .filter(|id| self.seasons.iter().any(|s| s.id == *id))
            .or_else(|| self.seasons.first().map(|s| s.id));
        if self.selected_route.is_some() && route != self.selected_route {
            tracing::warn!("Route {:?} not found, using {:?}", self.selected_route, route);
        }
        if self.selected_season.is_some() && season != self.selected_season {
            tracing::warn!("Season {:?} not found, using {:?}", self.selected_season, season);
        }

        self.selected_season = season;
        self.clamp_selected_month();
        self.selected_route = route;
        self.refresh_booking_classes().await;
        self.reload().await
    }

    pub async fn select_route(&mut self, route_id: Option<i64>) -> Result<()> {
        self.selected_route = route_id;
        self.refresh_booking_classes().await;
        self.reload().await
    }

    pub async fn select_season(&mut self, season_id: Option<i64>) -> Result<()> {
        self.selected_season = season_id;
        self.clamp_selected_month();
        self.reload().await
    }

    pub async fn select_month(&mut self, month: YearMonth) -> Result<()> {
        self.selected_month = month;
        self.clamp_selected_month();
        self.reload().await
    }

    fn clamp_selected_month(&mut self) {
        if let Some(season) = self.season() {
            let clamped = clamp_month(self.selected_month, season.start, season.end);
            if clamped != self.selected_month {
                tracing::debug!(
                    "Month {} outside season {}, using {}",
                    self.selected_month,
                    season.name,
                    clamped
                );
            }
            self.selected_month = clamped;
        }
    }

    async fn refresh_booking_classes(&mut self) {
        self.booking_classes = match self.selected_route {
            Some(route_id) => self.api.booking_classes(route_id).await.unwrap_or_else(|e| {
                tracing::warn!("Failed to load booking classes for route {}: {}", route_id, e);
                Vec::new()
            }),
            None => Vec::new(),
        };
    }

    /// 目前選取對應的查詢範圍：月份與季節的交集
    pub fn fetch_window(&self) -> Option<(i64, i64, NaiveDate, NaiveDate)> {
        let route_id = self.selected_route?;
        let season = self.season()?;
        let (from, to) = clamp_window(self.selected_month, season.start, season.end);
        (from <= to).then_some((route_id, season.id, from, to))
    }

    /// 發出新的載入序號，之前的回應都會被視為過期。
    ///
    /// `reload` 持有 `&mut self`，自己發出的載入一定是最新的；序號檢查是給
    /// 把查詢拆開執行的呼叫端用的：先 `begin_load`，在別處 `query`，再把結果交給
    /// `apply_load`。
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// 只接受最新序號的回應；成功套用時回傳 true
    pub fn apply_load(&mut self, ticket: u64, entries: Vec<PriceEntry>) -> bool {
        if ticket != self.generation {
            tracing::debug!(
                "Dropping stale price load #{} (latest #{})",
                ticket,
                self.generation
            );
            return false;
        }
        self.overlay.replace_baseline(entries);
        true
    }

    pub async fn reload(&mut self) -> Result<()> {
        let Some((route_id, season_id, from, to)) = self.fetch_window() else {
            return Ok(());
        };

        let ticket = self.begin_load();
        let query = PriceQuery {
            route_id: Some(route_id),
            season_id: Some(season_id),
            from: Some(from),
            to: Some(to),
            page: Some(1),
            page_size: Some(GRID_PAGE_SIZE),
            ..Default::default()
        };

        match self.api.query(&query).await {
            Ok(entries) => {
                tracing::debug!("Loaded {} price entries for {}..{}", entries.len(), from, to);
                self.apply_load(ticket, entries);
                Ok(())
            }
            Err(e) => {
                self.notices.error(api_message_or(&e, "Failed to load prices."));
                Err(e)
            }
        }
    }

    fn ensure_editable(&self, date: NaiveDate, class_id: i64) -> Result<()> {
        if !self.days().iter().any(|d| d.date == date) {
            return Err(DeskError::ValidationError {
                message: format!("{} is not part of the visible grid", date),
            });
        }
        if !self.booking_classes.iter().any(|c| c.id == class_id) {
            return Err(DeskError::ValidationError {
                message: format!("booking class {} is not offered on this route", class_id),
            });
        }
        Ok(())
    }

    pub fn edit_price(&mut self, date: NaiveDate, class_id: i64, value: &str) -> Result<()> {
        self.ensure_editable(date, class_id)?;
        let price = parse_price_input(value)?;
        self.overlay.patch_price(date, class_id, price);
        Ok(())
    }

    pub fn edit_seats(&mut self, date: NaiveDate, class_id: i64, value: &str) -> Result<()> {
        self.ensure_editable(date, class_id)?;
        let seats = parse_seats_input(value)?;
        self.overlay.patch_seats(date, class_id, seats);
        Ok(())
    }

    pub fn apply_cell(&mut self, cell: &CellInput) -> Result<()> {
        if let Some(price) = &cell.price {
            self.edit_price(cell.date, cell.class_id, price)?;
        }
        if let Some(seats) = &cell.seats {
            self.edit_seats(cell.date, cell.class_id, seats)?;
        }
        Ok(())
    }

    pub fn value_for(&self, date: NaiveDate, class_id: i64, field: PriceField) -> Option<f64> {
        self.overlay.value_for(date, class_id, field)
    }

    pub async fn save_all(&mut self) -> Result<SaveOutcome> {
        let (Some(route_id), Some(season_id)) = (self.selected_route, self.selected_season) else {
            return Err(DeskError::ValidationError {
                message: "Select a route and a season before saving".to_string(),
            });
        };

        let scope = UpsertScope {
            route_id,
            season_id,
            tour_operator_id: self.tour_operator_id.clone(),
        };
        let valid: HashSet<i64> = self.booking_classes.iter().map(|c| c.id).collect();
        let rows = self.overlay.build_upserts(&scope, &valid);

        if rows.is_empty() {
            self.notices.info("No changes to save.");
            return Ok(SaveOutcome::NothingToSave);
        }

        match self.api.bulk_upsert(&rows).await {
            Ok(()) => {
                // 資料已寫入；重新載入失敗只留下警告，不影響儲存結果
                if let Err(e) = self.reload().await {
                    tracing::warn!("Prices saved but the grid could not be refreshed: {}", e);
                }
                self.notices.info(format!("Saved {} price entries.", rows.len()));
                Ok(SaveOutcome::Saved(rows.len()))
            }
            Err(e) => {
                self.notices.error(api_message_or(&e, "Save failed"));
                Err(e)
            }
        }
    }

    pub fn export_sheet(&self) -> ExportSheet {
        let route_label = self.selected_route().map(Route::label).unwrap_or_default();
        let season_label = self.season().map(|s| s.name.clone()).unwrap_or_default();
        build_sheet(
            &self.days(),
            &route_label,
            &season_label,
            &self.booking_classes,
            &self.overlay,
        )
    }

    /// 回傳輸出的檔名
    pub async fn export<S: Storage>(&self, storage: &S, format: ExportFormat) -> Result<String> {
        let sheet = self.export_sheet();
        let file_name = write_export(storage, &sheet, self.selected_month, format).await?;
        tracing::info!("📁 Exported {} rows to {}", sheet.rows.len(), file_name);
        Ok(file_name)
    }
}
