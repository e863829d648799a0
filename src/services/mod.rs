pub mod analytics;
pub mod document;
pub mod report;
pub mod uptime;

pub use analytics::DailyAnalyticsService;
pub use report::{PgStatusSource, ReportAssembler, StatusSource};
pub use uptime::{reconstruct_uptime, UptimeResult, UptimeWindow};
