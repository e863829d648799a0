use crate::config::{ReportConfig, StorageConfig};
use crate::db::models::{Camera, Evidence, StatusEvent};
use crate::db::repositories::{CamerasRepository, EvidenceRepository, StatusRepository};
use crate::services::uptime::{reconstruct_uptime, UptimeWindow};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;

/// Read access to the camera roster and its status history
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Cameras to report on, in report order
    async fn roster(&self) -> Result<Vec<Camera>>;

    /// State of the latest event at or before `at`, if any
    async fn prior_status(&self, camera_id: i64, at: DateTime<Utc>) -> Result<Option<bool>>;

    /// Events within `[from, to]`, ascending by time
    async fn events_in_window(
        &self,
        camera_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<StatusEvent>>;

    /// Latest evidence captured within `[from, to]`
    async fn latest_evidence(
        &self,
        camera_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Option<Evidence>>;
}

/// PostgreSQL-backed status source
pub struct PgStatusSource {
    cameras: CamerasRepository,
    status: StatusRepository,
    evidence: EvidenceRepository,
}

impl PgStatusSource {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self {
            cameras: CamerasRepository::new(Arc::clone(&pool)),
            status: StatusRepository::new(Arc::clone(&pool)),
            evidence: EvidenceRepository::new(pool),
        }
    }
}

#[async_trait]
impl StatusSource for PgStatusSource {
    async fn roster(&self) -> Result<Vec<Camera>> {
        self.cameras.roster().await
    }

    async fn prior_status(&self, camera_id: i64, at: DateTime<Utc>) -> Result<Option<bool>> {
        let latest = self.status.latest_at_or_before(camera_id, at).await?;
        Ok(latest.map(|event| event.is_online))
    }

    async fn events_in_window(
        &self,
        camera_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<StatusEvent>> {
        self.status.in_window(camera_id, from, to).await
    }

    async fn latest_evidence(
        &self,
        camera_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Option<Evidence>> {
        self.evidence.latest_in_window(camera_id, from, to).await
    }
}

/// One camera's line in an uptime report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub camera_id: i64,
    pub code: String,
    pub offline_ms: i64,
    pub uptime_pct: f64,
    /// Prior status came from configuration, not from a recorded event
    pub prior_status_assumed: bool,
    pub evidence_url: Option<String>,
}

/// Uptime of every roster camera over one window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UptimeReport {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub total_ms: i64,
    pub cameras: Vec<ReportRow>,
}

/// Period-level rollup of an [`UptimeReport`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_cameras: usize,
    pub online: usize,
    pub offline: usize,
    pub avg_uptime: f64,
}

impl ReportRow {
    pub fn is_online(&self, threshold_pct: f64) -> bool {
        self.uptime_pct >= threshold_pct
    }
}

impl UptimeReport {
    pub fn summary(&self, threshold_pct: f64) -> ReportSummary {
        let online = self
            .cameras
            .iter()
            .filter(|row| row.is_online(threshold_pct))
            .count();
        let avg_uptime = if self.cameras.is_empty() {
            0.0
        } else {
            self.cameras.iter().map(|row| row.uptime_pct).sum::<f64>() / self.cameras.len() as f64
        };

        ReportSummary {
            total_cameras: self.cameras.len(),
            online,
            offline: self.cameras.len() - online,
            avg_uptime,
        }
    }
}

/// Builds uptime reports from a [`StatusSource`]
pub struct ReportAssembler {
    source: Arc<dyn StatusSource>,
    report: ReportConfig,
    storage: StorageConfig,
}

impl ReportAssembler {
    pub fn new(source: Arc<dyn StatusSource>, report: ReportConfig, storage: StorageConfig) -> Self {
        Self {
            source,
            report,
            storage,
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.report
    }

    /// Reconstruct uptime for every roster camera over `[from, to]`.
    /// Cameras are processed concurrently; the first failure aborts the report.
    pub async fn assemble(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<UptimeReport> {
        // reject a reversed window before touching the store
        UptimeWindow::new(0, from, to)?;

        let cameras = self.source.roster().await?;
        info!(
            "Assembling uptime report for {} cameras from {} to {}",
            cameras.len(),
            from,
            to
        );

        let rows = try_join_all(cameras.iter().map(|camera| self.camera_row(camera, from, to))).await?;

        Ok(UptimeReport {
            from,
            to,
            total_ms: (to - from).num_milliseconds(),
            cameras: rows,
        })
    }

    async fn camera_row(
        &self,
        camera: &Camera,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<ReportRow> {
        let window = UptimeWindow::new(camera.id, from, to)?;

        let prior = self.source.prior_status(camera.id, from).await?;
        let prior_status_assumed = prior.is_none();
        let prior_online = prior.unwrap_or(self.report.assume_online_without_history);
        if prior_status_assumed {
            debug!(
                "No status before {} for camera {}, assuming {}",
                from,
                camera.code,
                if prior_online { "online" } else { "offline" }
            );
        }

        let events = self.source.events_in_window(camera.id, from, to).await?;
        let uptime = reconstruct_uptime(&window, prior_online, &events)?;

        let evidence_url = self
            .source
            .latest_evidence(camera.id, from, to)
            .await?
            .map(|evidence| self.storage.public_url(&evidence.path));

        Ok(ReportRow {
            camera_id: camera.id,
            code: camera.code.clone(),
            offline_ms: uptime.offline_ms(),
            uptime_pct: uptime.uptime_pct,
            prior_status_assumed,
            evidence_url,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::Error;
    use chrono::TimeZone;
    use std::collections::HashMap;

    /// In-memory status source for tests
    #[derive(Default)]
    pub(crate) struct MemorySource {
        pub cameras: Vec<Camera>,
        pub events: HashMap<i64, Vec<StatusEvent>>,
        pub evidence: HashMap<i64, Vec<Evidence>>,
    }

    impl MemorySource {
        pub fn camera(mut self, id: i64, code: &str) -> Self {
            self.cameras.push(Camera {
                id,
                code: code.to_string(),
                name: None,
                location: None,
                is_active: Some(true),
            });
            self
        }

        pub fn status(mut self, camera_id: i64, at: DateTime<Utc>, is_online: bool) -> Self {
            let events = self.events.entry(camera_id).or_default();
            let id = events.len() as i64 + 1;
            events.push(StatusEvent {
                id,
                camera_id,
                is_online,
                at,
                source: Some("test".to_string()),
            });
            self
        }

        pub fn shot(mut self, camera_id: i64, captured_at: DateTime<Utc>, path: &str) -> Self {
            let shots = self.evidence.entry(camera_id).or_default();
            shots.push(Evidence {
                id: shots.len() as i64 + 1,
                camera_id,
                status_id: None,
                captured_at,
                path: path.to_string(),
                kind: "screenshot".to_string(),
                note: None,
            });
            self
        }
    }

    #[async_trait]
    impl StatusSource for MemorySource {
        async fn roster(&self) -> Result<Vec<Camera>> {
            Ok(self.cameras.clone())
        }

        async fn prior_status(&self, camera_id: i64, at: DateTime<Utc>) -> Result<Option<bool>> {
            Ok(self
                .events
                .get(&camera_id)
                .and_then(|events| events.iter().filter(|e| e.at <= at).last())
                .map(|e| e.is_online))
        }

        async fn events_in_window(
            &self,
            camera_id: i64,
            from: DateTime<Utc>,
            to: DateTime<Utc>,
        ) -> Result<Vec<StatusEvent>> {
            Ok(self
                .events
                .get(&camera_id)
                .map(|events| {
                    events
                        .iter()
                        .filter(|e| e.at >= from && e.at <= to)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default())
        }

        async fn latest_evidence(
            &self,
            camera_id: i64,
            from: DateTime<Utc>,
            to: DateTime<Utc>,
        ) -> Result<Option<Evidence>> {
            Ok(self.evidence.get(&camera_id).and_then(|shots| {
                shots
                    .iter()
                    .filter(|s| s.captured_at >= from && s.captured_at <= to)
                    .max_by_key(|s| s.captured_at)
                    .cloned()
            }))
        }
    }

    pub(crate) fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, minute, 0).unwrap()
    }

    fn storage() -> StorageConfig {
        StorageConfig {
            evidence_public_base_url: "https://files.example.com/evidence".to_string(),
        }
    }

    fn assembler(source: MemorySource, report: ReportConfig) -> ReportAssembler {
        ReportAssembler::new(Arc::new(source), report, storage())
    }

    #[tokio::test]
    async fn test_report_rows_follow_roster() -> Result<()> {
        let source = MemorySource::default()
            .camera(1, "CAM-01")
            .camera(2, "CAM-02")
            .status(1, at(7, 0), true)
            .status(1, at(8, 20), false)
            .status(1, at(8, 45), true)
            .status(2, at(6, 0), false)
            .shot(2, at(8, 10), "cam-2/a.png")
            .shot(2, at(8, 50), "cam-2/b.png")
            .shot(2, at(9, 30), "cam-2/late.png");

        let report = assembler(source, ReportConfig::default())
            .assemble(at(8, 0), at(9, 0))
            .await?;

        assert_eq!(report.total_ms, 3_600_000);
        assert_eq!(report.cameras.len(), 2);

        let first = &report.cameras[0];
        assert_eq!(first.code, "CAM-01");
        assert_eq!(first.offline_ms, 1_500_000);
        assert!(!first.prior_status_assumed);
        assert_eq!(first.evidence_url, None);

        let second = &report.cameras[1];
        assert_eq!(second.uptime_pct, 0.0);
        assert_eq!(
            second.evidence_url.as_deref(),
            Some("https://files.example.com/evidence/cam-2/b.png")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_history_uses_configured_default() -> Result<()> {
        let source = || MemorySource::default().camera(3, "CAM-03");

        let report = assembler(source(), ReportConfig::default())
            .assemble(at(8, 0), at(9, 0))
            .await?;
        assert_eq!(report.cameras[0].uptime_pct, 100.0);
        assert!(report.cameras[0].prior_status_assumed);

        let pessimistic = ReportConfig {
            assume_online_without_history: false,
            ..ReportConfig::default()
        };
        let report = assembler(source(), pessimistic)
            .assemble(at(8, 0), at(9, 0))
            .await?;
        assert_eq!(report.cameras[0].uptime_pct, 0.0);
        assert!(report.cameras[0].prior_status_assumed);

        Ok(())
    }

    #[tokio::test]
    async fn test_reversed_window_fails() {
        let source = MemorySource::default().camera(1, "CAM-01");
        let err = assembler(source, ReportConfig::default())
            .assemble(at(9, 0), at(8, 0))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::InvalidWindow { .. })
        ));
    }

    #[tokio::test]
    async fn test_summary_counts_against_threshold() -> Result<()> {
        let source = MemorySource::default()
            .camera(1, "CAM-01")
            .camera(2, "CAM-02")
            .status(2, at(8, 30), false);

        let report = assembler(source, ReportConfig::default())
            .assemble(at(8, 0), at(9, 0))
            .await?;
        let summary = report.summary(95.0);

        assert_eq!(summary.total_cameras, 2);
        assert_eq!(summary.online, 1);
        assert_eq!(summary.offline, 1);
        assert_eq!(summary.avg_uptime, 75.0);

        Ok(())
    }

    #[test]
    fn test_empty_report_summary() {
        let report = UptimeReport {
            from: at(8, 0),
            to: at(9, 0),
            total_ms: 3_600_000,
            cameras: vec![],
        };
        let summary = report.summary(95.0);
        assert_eq!(summary.total_cameras, 0);
        assert_eq!(summary.avg_uptime, 0.0);
    }
}
