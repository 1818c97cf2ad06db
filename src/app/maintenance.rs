//! Schema maintenance use cases wrapping the migration engine.

use crate::infra::db::DbPool;
use crate::infra::migrations::{self, MigrationStatus};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceOutcome {
    pub success: bool,
    pub message: String,
}

pub fn run_migrations(pool: &DbPool) -> MaintenanceOutcome {
    match migrations::apply_all(pool) {
        Ok(0) => MaintenanceOutcome {
            success: true,
            message: "Schema is up to date.".into(),
        },
        Ok(n) => MaintenanceOutcome {
            success: true,
            message: format!("Applied {} migrations.", n),
        },
        Err(e) => MaintenanceOutcome {
            success: false,
            message: format!("Migration failed: {}", e),
        },
    }
}

pub fn migration_status(pool: &DbPool) -> MigrationStatus {
    migrations::status(pool)
}

/// Human-readable schema version summary.
pub fn migration_report(pool: &DbPool) -> String {
    let status = migrations::status(pool);
    let latest = status.latest_version.as_deref().unwrap_or("none");
    if status.is_up_to_date {
        format!(
            "Schema version {} ({} of {} migrations applied, up to date)",
            latest, status.applied_count, status.total_migrations
        )
    } else {
        format!(
            "Schema version {} ({} of {} migrations applied, pending: {})",
            latest,
            status.applied_count,
            status.total_migrations,
            status.pending_versions.join(", ")
        )
    }
}

/// Drop all data and rebuild the schema from scratch. Seeding is not part of
/// this; callers wanting sample data run the seeder afterwards.
pub fn reset_database(pool: &DbPool) -> MaintenanceOutcome {
    match migrations::reset(pool) {
        Ok(()) => MaintenanceOutcome {
            success: true,
            message: "Database reset complete.".into(),
        },
        Err(e) => MaintenanceOutcome {
            success: false,
            message: format!("Database reset failed: {}", e),
        },
    }
}
