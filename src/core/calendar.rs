use crate::utils::error::{DeskError, Result};
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

const WEEKDAY_LABELS: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// 年月 (YYYY-MM)，排序依時間先後
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(DeskError::ValidationError {
                message: format!("{}-{:02} is not a valid month", year, month),
            });
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || DeskError::ValidationError {
            message: format!("'{}' is not a month, expected YYYY-MM", s),
        };
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDay {
    pub date: NaiveDate,
    pub label: &'static str,
}

impl GridDay {
    pub fn iso(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

pub fn weekday_label(date: NaiveDate) -> &'static str {
    WEEKDAY_LABELS[date.weekday().num_days_from_sunday() as usize]
}

pub fn month_bounds(month: YearMonth) -> (NaiveDate, NaiveDate) {
    (month.first_day(), month.last_day())
}

/// 月份範圍與季節區間取交集；結果可能是 from > to 的空區間
pub fn clamp_window(
    month: YearMonth,
    season_start: NaiveDate,
    season_end: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    let (first, last) = month_bounds(month);
    (first.max(season_start), last.min(season_end))
}

pub fn month_days_clamped(
    month: YearMonth,
    season_start: NaiveDate,
    season_end: NaiveDate,
) -> Vec<GridDay> {
    let (from, to) = clamp_window(month, season_start, season_end);
    if from > to {
        return Vec::new();
    }

    from.iter_days()
        .take_while(|d| *d <= to)
        .map(|date| GridDay {
            date,
            label: weekday_label(date),
        })
        .collect()
}

/// 把選取的月份拉回季節涵蓋的月份範圍
pub fn clamp_month(month: YearMonth, season_start: NaiveDate, season_end: NaiveDate) -> YearMonth {
    let min = YearMonth::of(season_start);
    let max = YearMonth::of(season_end);
    if month < min {
        min
    } else if month > max {
        max
    } else {
        month
    }
}
