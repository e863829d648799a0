pub mod analytics_models;
pub mod camera_models;
pub mod daily_models;
pub mod evidence_models;
pub mod status_models;

pub use analytics_models::{AnalyticsSummary, DailyAnalytics};
pub use camera_models::{Camera, NewCamera};
pub use daily_models::{CameraDailyData, CameraDailyRow, DailyUpdate};
pub use evidence_models::Evidence;
pub use status_models::{NewStatusEvent, StatusEvent};
