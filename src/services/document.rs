use crate::services::report::{ReportRow, UptimeReport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const TITLE: &str = "DAILY CCTV MONITORING REPORT";
const EVIDENCE_TITLE: &str = "CCTV SCREENSHOT EVIDENCE";
/// Characters per line of the final notes block
const NOTE_LINE_WIDTH: usize = 166;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CameraState {
    Online,
    Offline,
}

/// Free-text usage note an operator attached to a camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraUsage {
    pub camera_id: i64,
    pub usage: String,
}

/// Caller-supplied parts of a report document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentRequest {
    pub company: String,
    pub monitoring: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub usages: Vec<CameraUsage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentLine {
    pub camera_id: i64,
    pub code: String,
    pub state: CameraState,
    pub uptime_pct: f64,
    /// Offline time in hours, two decimals
    pub offline_hours: String,
    pub usage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidencePage {
    pub title: String,
    pub camera_id: i64,
    pub code: String,
    pub state: CameraState,
    pub uptime_pct: f64,
    pub image_url: String,
}

/// Everything a renderer needs to lay out a report, in page order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub title: String,
    pub company: String,
    pub monitoring: String,
    pub period: String,
    pub status_line: String,
    pub cameras: Vec<DocumentLine>,
    pub final_notes: Vec<String>,
    pub evidence: Vec<EvidencePage>,
    pub generated_at: DateTime<Utc>,
}

fn state_of(row: &ReportRow, threshold_pct: f64) -> CameraState {
    if row.is_online(threshold_pct) {
        CameraState::Online
    } else {
        CameraState::Offline
    }
}

/// Pick up to `max` rows with evidence, offline cameras first, each group
/// keeping report order.
pub fn select_evidence(rows: &[ReportRow], threshold_pct: f64, max: usize) -> Vec<&ReportRow> {
    let with_evidence = || rows.iter().filter(|row| row.evidence_url.is_some());
    with_evidence()
        .filter(|row| !row.is_online(threshold_pct))
        .chain(with_evidence().filter(|row| row.is_online(threshold_pct)))
        .take(max)
        .collect()
}

/// Greedy word wrap. A single word longer than `width` gets its own line.
pub fn wrap_notes(notes: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in notes.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

pub fn build_document(
    report: &UptimeReport,
    request: &DocumentRequest,
    threshold_pct: f64,
    max_evidence: usize,
    generated_at: DateTime<Utc>,
) -> ReportDocument {
    let summary = report.summary(threshold_pct);

    let cameras = report
        .cameras
        .iter()
        .map(|row| {
            let usage = request
                .usages
                .iter()
                .find(|u| u.camera_id == row.camera_id)
                .map(|u| u.usage.trim())
                .filter(|u| !u.is_empty())
                .unwrap_or("-")
                .to_string();

            DocumentLine {
                camera_id: row.camera_id,
                code: row.code.clone(),
                state: state_of(row, threshold_pct),
                uptime_pct: row.uptime_pct,
                offline_hours: format!("{:.2}", row.offline_ms as f64 / 3_600_000.0),
                usage,
            }
        })
        .collect();

    let evidence = select_evidence(&report.cameras, threshold_pct, max_evidence)
        .into_iter()
        .filter_map(|row| {
            row.evidence_url.as_ref().map(|url| EvidencePage {
                title: EVIDENCE_TITLE.to_string(),
                camera_id: row.camera_id,
                code: row.code.clone(),
                state: state_of(row, threshold_pct),
                uptime_pct: row.uptime_pct,
                image_url: url.clone(),
            })
        })
        .collect();

    ReportDocument {
        title: TITLE.to_string(),
        company: request.company.clone(),
        monitoring: request.monitoring.clone(),
        period: format!("{} to {}", report.from.to_rfc3339(), report.to.to_rfc3339()),
        status_line: format!(
            "STATUS: {} cameras ONLINE | {} cameras OFFLINE",
            summary.online, summary.offline
        ),
        cameras,
        final_notes: request
            .notes
            .as_deref()
            .map(|notes| wrap_notes(notes, NOTE_LINE_WIDTH))
            .unwrap_or_default(),
        evidence,
        generated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::report::tests::at;

    fn row(camera_id: i64, uptime_pct: f64, evidence: bool) -> ReportRow {
        ReportRow {
            camera_id,
            code: format!("CAM-{:02}", camera_id),
            offline_ms: ((100.0 - uptime_pct) / 100.0 * 3_600_000.0) as i64,
            uptime_pct,
            prior_status_assumed: false,
            evidence_url: evidence.then(|| format!("https://files/{}.png", camera_id)),
        }
    }

    fn report(rows: Vec<ReportRow>) -> UptimeReport {
        UptimeReport {
            from: at(8, 0),
            to: at(9, 0),
            total_ms: 3_600_000,
            cameras: rows,
        }
    }

    #[test]
    fn test_evidence_prefers_offline_cameras() {
        let rows = vec![
            row(1, 100.0, true),
            row(2, 10.0, true),
            row(3, 50.0, false),
            row(4, 99.0, true),
            row(5, 0.0, true),
        ];

        let picked: Vec<i64> = select_evidence(&rows, 95.0, 3)
            .iter()
            .map(|r| r.camera_id)
            .collect();
        assert_eq!(picked, vec![2, 5, 1]);
    }

    #[test]
    fn test_evidence_respects_limit() {
        let rows: Vec<_> = (1..=10).map(|id| row(id, 0.0, true)).collect();
        assert_eq!(select_evidence(&rows, 95.0, 6).len(), 6);
        assert!(select_evidence(&rows, 95.0, 0).is_empty());
    }

    #[test]
    fn test_wrap_notes() {
        assert_eq!(
            wrap_notes("one two three four", 9),
            vec!["one two", "three", "four"]
        );
        assert_eq!(wrap_notes("  ", 10), Vec::<String>::new());
        assert_eq!(wrap_notes("unbreakableword", 4), vec!["unbreakableword"]);
    }

    #[test]
    fn test_build_document() {
        let request = DocumentRequest {
            company: "Acme Rail".to_string(),
            monitoring: "Night shift".to_string(),
            notes: Some("All platforms checked.".to_string()),
            usages: vec![CameraUsage {
                camera_id: 2,
                usage: "Platform 2".to_string(),
            }],
        };
        let doc = build_document(
            &report(vec![row(1, 100.0, false), row(2, 50.0, true)]),
            &request,
            95.0,
            6,
            at(10, 0),
        );

        assert_eq!(doc.title, TITLE);
        assert_eq!(doc.status_line, "STATUS: 1 cameras ONLINE | 1 cameras OFFLINE");
        assert_eq!(doc.cameras[0].usage, "-");
        assert_eq!(doc.cameras[0].state, CameraState::Online);
        assert_eq!(doc.cameras[1].usage, "Platform 2");
        assert_eq!(doc.cameras[1].offline_hours, "0.50");
        assert_eq!(doc.final_notes, vec!["All platforms checked."]);
        assert_eq!(doc.evidence.len(), 1);
        assert_eq!(doc.evidence[0].state, CameraState::Offline);
        assert_eq!(doc.evidence[0].image_url, "https://files/2.png");
    }

    #[test]
    fn test_state_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&CameraState::Offline).unwrap(),
            "\"OFFLINE\""
        );
    }
}
