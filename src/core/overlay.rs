use crate::domain::model::{PriceEntry, PriceEntryUpsert};
use crate::utils::error::{DeskError, Result};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap, HashSet};

/// (日期, 艙等 id)
pub type GridKey = (NaiveDate, i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    Price,
    SeatCount,
}

/// 尚未儲存的編輯；兩個欄位可以只填一個
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CellEdit {
    pub price: Option<f64>,
    pub seat_count: Option<i64>,
}

impl CellEdit {
    pub fn is_empty(&self) -> bool {
        self.price.is_none() && self.seat_count.is_none()
    }
}

/// 新增或更新時共用的範圍：路線、季節、旅行社
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertScope {
    pub route_id: i64,
    pub season_id: i64,
    pub tour_operator_id: String,
}

/// 最近一次載入的價格 (baseline) 加上使用者的編輯
#[derive(Debug, Clone, Default)]
pub struct EditOverlay {
    baseline: HashMap<GridKey, PriceEntry>,
    edits: BTreeMap<GridKey, CellEdit>,
}

impl EditOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// 整批取代 baseline 並清掉所有編輯
    pub fn replace_baseline(&mut self, entries: Vec<PriceEntry>) {
        self.baseline = entries
            .into_iter()
            .map(|entry| ((entry.date, entry.booking_class_id), entry))
            .collect();
        self.edits.clear();
    }

    pub fn baseline_len(&self) -> usize {
        self.baseline.len()
    }

    pub fn edit(&self, date: NaiveDate, class_id: i64) -> Option<&CellEdit> {
        self.edits.get(&(date, class_id))
    }

    pub fn edit_count(&self) -> usize {
        self.edits.len()
    }

    pub fn patch_price(&mut self, date: NaiveDate, class_id: i64, price: Option<f64>) {
        self.edits.entry((date, class_id)).or_default().price = price;
    }

    pub fn patch_seats(&mut self, date: NaiveDate, class_id: i64, seat_count: Option<i64>) {
        self.edits.entry((date, class_id)).or_default().seat_count = seat_count;
    }

    /// 有編輯值用編輯值，否則用 baseline，兩者皆無回傳 None (顯示空白)
    pub fn value_for(&self, date: NaiveDate, class_id: i64, field: PriceField) -> Option<f64> {
        let key = (date, class_id);
        let edited = self.edits.get(&key).and_then(|edit| match field {
            PriceField::Price => edit.price,
            PriceField::SeatCount => edit.seat_count.map(|s| s as f64),
        });
        if edited.is_some() {
            return edited;
        }

        self.baseline.get(&key).map(|entry| match field {
            PriceField::Price => entry.price,
            PriceField::SeatCount => entry.seat_count as f64,
        })
    }

    /// 只收目前路線仍有效的艙等；缺的欄位依序補 baseline 值、0
    pub fn build_upserts(
        &self,
        scope: &UpsertScope,
        valid_class_ids: &HashSet<i64>,
    ) -> Vec<PriceEntryUpsert> {
        self.edits
            .iter()
            .filter(|((_, class_id), edit)| valid_class_ids.contains(class_id) && !edit.is_empty())
            .map(|(key, edit)| {
                let (date, class_id) = *key;
                let existing = self.baseline.get(key);
                PriceEntryUpsert {
                    route_id: scope.route_id,
                    season_id: scope.season_id,
                    tour_operator_id: scope.tour_operator_id.clone(),
                    booking_class_id: class_id,
                    date,
                    price: edit
                        .price
                        .or_else(|| existing.map(|e| e.price))
                        .unwrap_or(0.0),
                    seat_count: edit
                        .seat_count
                        .or_else(|| existing.map(|e| e.seat_count))
                        .unwrap_or(0),
                }
            })
            .collect()
    }
}

/// 表格輸入：空字串代表清除
pub fn parse_price_input(value: &str) -> Result<Option<f64>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    match value.parse::<f64>() {
        Ok(price) if price.is_finite() => Ok(Some(price)),
        _ => Err(DeskError::ValidationError {
            message: format!("'{}' is not a valid price", value),
        }),
    }
}

pub fn parse_seats_input(value: &str) -> Result<Option<i64>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<i64>()
        .map(Some)
        .map_err(|_| DeskError::ValidationError {
            message: format!("'{}' is not a valid seat count", value),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn entry(d: u32, class_id: i64, price: f64, seats: i64) -> PriceEntry {
        PriceEntry {
            id: d as i64 * 10 + class_id,
            date: date(d),
            day_of_week: String::new(),
            price,
            seat_count: seats,
            route_id: 1,
            season_id: 2,
            tour_operator_id: "op-1".to_string(),
            booking_class_id: class_id,
            route_name: None,
            booking_class_name: None,
            operator_name: None,
        }
    }

    fn scope() -> UpsertScope {
        UpsertScope {
            route_id: 1,
            season_id: 2,
            tour_operator_id: "op-1".to_string(),
        }
    }

    #[test]
    fn test_value_lookup_precedence() {
        let mut overlay = EditOverlay::new();
        overlay.replace_baseline(vec![entry(1, 1, 100.0, 20)]);

        assert_eq!(overlay.value_for(date(1), 1, PriceField::Price), Some(100.0));
        assert_eq!(overlay.value_for(date(2), 1, PriceField::Price), None);

        overlay.patch_price(date(1), 1, Some(150.0));
        assert_eq!(overlay.value_for(date(1), 1, PriceField::Price), Some(150.0));
        // 只改價格，座位仍取 baseline
        assert_eq!(overlay.value_for(date(1), 1, PriceField::SeatCount), Some(20.0));

        overlay.patch_price(date(1), 1, None);
        assert_eq!(overlay.value_for(date(1), 1, PriceField::Price), Some(100.0));
    }

    #[test]
    fn test_patch_preserves_other_field() {
        let mut overlay = EditOverlay::new();
        overlay.patch_price(date(3), 2, Some(80.0));
        overlay.patch_seats(date(3), 2, Some(12));
        assert_eq!(
            overlay.edit(date(3), 2),
            Some(&CellEdit {
                price: Some(80.0),
                seat_count: Some(12)
            })
        );

        overlay.patch_price(date(3), 2, Some(90.0));
        assert_eq!(overlay.edit(date(3), 2).unwrap().seat_count, Some(12));
    }

    #[test]
    fn test_replace_baseline_clears_edits() {
        let mut overlay = EditOverlay::new();
        overlay.patch_price(date(1), 1, Some(1.0));
        overlay.replace_baseline(vec![entry(2, 1, 5.0, 1)]);
        assert_eq!(overlay.edit_count(), 0);
        assert_eq!(overlay.baseline_len(), 1);
    }

    #[test]
    fn test_build_upserts_fills_from_baseline_then_zero() {
        let mut overlay = EditOverlay::new();
        overlay.replace_baseline(vec![entry(1, 1, 100.0, 20)]);
        overlay.patch_price(date(1), 1, Some(110.0));
        overlay.patch_seats(date(2), 1, Some(5));

        let rows = overlay.build_upserts(&scope(), &HashSet::from([1]));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, date(1));
        assert_eq!(rows[0].price, 110.0);
        assert_eq!(rows[0].seat_count, 20);
        assert_eq!(rows[1].date, date(2));
        assert_eq!(rows[1].price, 0.0);
        assert_eq!(rows[1].seat_count, 5);
        assert_eq!(rows[1].tour_operator_id, "op-1");
    }

    #[test]
    fn test_build_upserts_skips_empty_edits_and_foreign_classes() {
        let mut overlay = EditOverlay::new();
        overlay.patch_price(date(1), 1, None);
        overlay.patch_seats(date(1), 1, None);
        overlay.patch_price(date(2), 9, Some(70.0));
        overlay.patch_price(date(3), 2, Some(60.0));

        let rows = overlay.build_upserts(&scope(), &HashSet::from([1, 2]));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].booking_class_id, 2);
        assert_eq!(rows[0].date, date(3));
    }

    #[test]
    fn test_parse_inputs() {
        assert_eq!(parse_price_input("").unwrap(), None);
        assert_eq!(parse_price_input(" 99.5 ").unwrap(), Some(99.5));
        assert!(parse_price_input("abc").is_err());
        assert!(parse_price_input("NaN").is_err());
        assert_eq!(parse_seats_input("12").unwrap(), Some(12));
        assert!(parse_seats_input("1.5").is_err());
    }
}
