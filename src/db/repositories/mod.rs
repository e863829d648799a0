pub mod analytics;
pub mod cameras;
pub mod daily_data;
pub mod evidence;
pub mod status;

pub use analytics::AnalyticsRepository;
pub use cameras::CamerasRepository;
pub use daily_data::DailyDataRepository;
pub use evidence::EvidenceRepository;
pub use status::StatusRepository;
