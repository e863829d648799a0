use anyhow::Result;
use sqlx::{Executor, PgPool};
use tracing::info;

/// Migration scripts compiled into the binary, keyed by file name
const MIGRATIONS: &[(&str, &str)] = &[
    ("001_cameras.sql", include_str!("sql/001_cameras.sql")),
    ("002_camera_status.sql", include_str!("sql/002_camera_status.sql")),
    ("003_evidence.sql", include_str!("sql/003_evidence.sql")),
    ("004_camera_daily_data.sql", include_str!("sql/004_camera_daily_data.sql")),
    ("005_daily_analytics.sql", include_str!("sql/005_daily_analytics.sql")),
];

/// Numeric prefix of a migration file name; unnumbered files run last
fn order_value(name: &str) -> usize {
    name.split('_')
        .next()
        .and_then(|prefix| prefix.parse::<usize>().ok())
        .unwrap_or(usize::MAX)
}

fn ordered_migrations() -> Vec<(&'static str, &'static str)> {
    let mut entries = MIGRATIONS.to_vec();
    entries.sort_by(|(a, _), (b, _)| order_value(a).cmp(&order_value(b)).then(a.cmp(b)));
    entries
}

/// Apply every migration in order. Scripts are idempotent, so this is safe
/// to run on each startup.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    for (name, sql) in ordered_migrations() {
        pool.execute(sql).await?;
        info!("Applied migration: {}", name);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_value() {
        assert_eq!(order_value("004_camera_daily_data.sql"), 4);
        assert_eq!(order_value("seed.sql"), usize::MAX);
    }

    #[test]
    fn test_migrations_are_ordered() {
        let names: Vec<_> = ordered_migrations().into_iter().map(|(n, _)| n).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names.first(), Some(&"001_cameras.sql"));
    }

    #[test]
    fn test_status_table_precedes_evidence() {
        // evidence.status_id references camera_status
        let names: Vec<_> = ordered_migrations().into_iter().map(|(n, _)| n).collect();
        let status = names.iter().position(|n| n.contains("camera_status")).unwrap();
        let evidence = names.iter().position(|n| n.contains("evidence")).unwrap();
        assert!(status < evidence);
    }
}
