pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod services;

pub use error::Error;
pub use services::{reconstruct_uptime, UptimeResult, UptimeWindow};
