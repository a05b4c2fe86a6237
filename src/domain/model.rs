use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeasonType {
    Winter,
    Summer,
}

impl fmt::Display for SeasonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonType::Winter => write!(f, "Winter"),
            SeasonType::Summer => write!(f, "Summer"),
        }
    }
}

impl FromStr for SeasonType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "winter" => Ok(SeasonType::Winter),
            "summer" => Ok(SeasonType::Summer),
            other => Err(format!("unknown season type '{}', expected Winter or Summer", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(deserialize_with = "api_date")]
    pub start: NaiveDate,
    #[serde(deserialize_with = "api_date")]
    pub end: NaiveDate,
    #[serde(default)]
    pub year: i32,
    // 舊版 API 的定價用季節資料沒有 type
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub season_type: Option<SeasonType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingClass {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: i64,
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub season_id: Option<i64>,
    #[serde(default)]
    pub booking_classes: Vec<BookingClass>,
}

impl Route {
    pub fn label(&self) -> String {
        format!("{} → {}", self.origin, self.destination)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteInput {
    pub origin: String,
    pub destination: String,
    pub booking_class_ids: Vec<i64>,
    pub season_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourOperator {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub booking_classes: Vec<BookingClass>,
    #[serde(default)]
    pub seasons: Vec<Season>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorInput {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub booking_class_ids: Vec<i64>,
    pub season_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceEntry {
    #[serde(default)]
    pub id: i64,
    #[serde(deserialize_with = "api_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub day_of_week: String,
    pub price: f64,
    pub seat_count: i64,
    pub route_id: i64,
    pub season_id: i64,
    #[serde(default, deserialize_with = "loose_string")]
    pub tour_operator_id: String,
    pub booking_class_id: i64,
    #[serde(default)]
    pub route_name: Option<String>,
    #[serde(default)]
    pub booking_class_name: Option<String>,
    #[serde(default)]
    pub operator_name: Option<String>,
}

/// 批次寫入 (bulk-upsert) 與單筆建立共用的請求格式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceEntryUpsert {
    pub route_id: i64,
    pub season_id: i64,
    pub tour_operator_id: String,
    pub booking_class_id: i64,
    pub date: NaiveDate,
    pub price: f64,
    pub seat_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceQuery {
    pub operator_id: Option<String>,
    pub route_id: Option<i64>,
    pub season_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PriceQuery {
    /// 轉成 query string 參數，空字串視為未設定
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(op) = self.operator_id.as_deref().filter(|s| !s.is_empty()) {
            params.push(("operatorId", op.to_string()));
        }
        if let Some(v) = self.route_id {
            params.push(("routeId", v.to_string()));
        }
        if let Some(v) = self.season_id {
            params.push(("seasonId", v.to_string()));
        }
        if let Some(v) = self.from {
            params.push(("from", v.format("%Y-%m-%d").to_string()));
        }
        if let Some(v) = self.to {
            params.push(("to", v.format("%Y-%m-%d").to_string()));
        }
        if let Some(v) = self.page {
            params.push(("page", v.to_string()));
        }
        if let Some(v) = self.page_size {
            params.push(("pageSize", v.to_string()));
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub page_size: i64,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// 清單端點可能回傳純陣列或分頁物件
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Items(Vec<T>),
    Page(Page<T>),
}

impl<T> ListPayload<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListPayload::Items(items) => items,
            ListPayload::Page(page) => page.items,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "loose_optional_string")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub operator_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// 後端日期可能帶時間部分 (2025-01-01T00:00:00)，只取日期
fn api_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let date_part = raw.get(..10).unwrap_or(&raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(serde::de::Error::custom)
}

fn loose_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(loose_optional_string(deserializer)?.unwrap_or_default())
}

fn loose_optional_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
