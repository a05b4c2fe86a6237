use crate::domain::model::{Season, SeasonType};
use chrono::NaiveDate;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedSeason {
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// 冬季 = 1/1–6/30，夏季 = 7/1–12/31
pub fn derive_season(year: i32, season_type: SeasonType) -> Option<DerivedSeason> {
    let (start, end) = match season_type {
        SeasonType::Winter => (
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year, 6, 30)?,
        ),
        SeasonType::Summer => (
            NaiveDate::from_ymd_opt(year, 7, 1)?,
            NaiveDate::from_ymd_opt(year, 12, 31)?,
        ),
    };

    Some(DerivedSeason {
        name: format!("{} {}", season_type, year),
        start,
        end,
    })
}

/// 建立或更新季節時送出的完整資料，新建時 id 為 0
pub fn season_payload(id: Option<i64>, year: i32, season_type: SeasonType) -> Option<Season> {
    let derived = derive_season(year, season_type)?;
    Some(Season {
        id: id.unwrap_or(0),
        name: derived.name,
        start: derived.start,
        end: derived.end,
        year,
        season_type: Some(season_type),
    })
}

/// 年份新到舊，同年依名稱排序
pub fn sort_seasons(seasons: &mut [Season]) {
    seasons.sort_by(|a, b| match b.year.cmp(&a.year) {
        Ordering::Equal => a.name.cmp(&b.name),
        other => other,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_summer() {
        let derived = derive_season(2025, SeasonType::Summer).unwrap();
        assert_eq!(derived.start, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert_eq!(derived.end, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
        assert_eq!(derived.name, "Summer 2025");
    }

    #[test]
    fn test_derive_winter() {
        let derived = derive_season(2026, SeasonType::Winter).unwrap();
        assert_eq!(derived.start, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(derived.end, NaiveDate::from_ymd_opt(2026, 6, 30).unwrap());
        assert_eq!(derived.name, "Winter 2026");
    }

    #[test]
    fn test_season_payload_defaults_id() {
        let season = season_payload(None, 2025, SeasonType::Winter).unwrap();
        assert_eq!(season.id, 0);
        assert_eq!(season.season_type, Some(SeasonType::Winter));
        assert_eq!(season_payload(Some(9), 2025, SeasonType::Winter).unwrap().id, 9);
    }

    #[test]
    fn test_sort_seasons() {
        let mut seasons: Vec<Season> = [
            (2024, SeasonType::Summer),
            (2025, SeasonType::Winter),
            (2025, SeasonType::Summer),
        ]
        .iter()
        .map(|(y, t)| season_payload(None, *y, *t).unwrap())
        .collect();

        sort_seasons(&mut seasons);
        let names: Vec<&str> = seasons.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Summer 2025", "Winter 2025", "Summer 2024"]);
    }
}
