pub mod notice;
pub mod operators;
pub mod pricing;
pub mod routes;
pub mod seasons;

pub use notice::{Confirm, Notice, NoticeBoard, NoticeKind};
pub use operators::{OperatorForm, OperatorScope, OperatorScreen};
pub use pricing::{CellInput, PricingScreen, SaveOutcome};
pub use routes::{RouteForm, RouteScreen};
pub use seasons::{SeasonForm, SeasonScreen};
