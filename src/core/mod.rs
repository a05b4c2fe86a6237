pub mod calendar;
pub mod export;
pub mod overlay;
pub mod season;
pub mod session;

pub use crate::domain::model::{BookingClass, PriceEntry, PriceEntryUpsert, Route, Season};
pub use crate::domain::ports::{ConfigProvider, PricingApi, Storage};
pub use crate::utils::error::Result;
