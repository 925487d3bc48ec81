//! waypoint-audit: offline consistency check
//!
//! Loads every journey, phase and entry from the configured store, runs the
//! audit and prints the report as JSON on stdout. Nothing is written back.
//!
//! ## Usage
//! ```text
//! waypoint-audit [config.yaml]
//! ```
//!
//! ## Configuration
//! - WAYPOINT_CONFIG: config file path (alternative to the argument)
//! - WAYPOINT__AUDIT__FAIL_ON_ERROR: exit 1 when error findings exist (default: true)
//! - WAYPOINT__AUDIT__INCLUDE_PRIVATE: audit private records too (default: true)
//! - WAYPOINT_LOG: log filter (default: info)

use tracing::{error, info, warn};

use waypoint::audit::{audit_snapshot, Severity};
use waypoint::config::Config;
use waypoint::utils::bootstrap::{init_tracing, open_repository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config_path = std::env::args().nth(1);
    let config = Config::load(config_path.as_deref())?;
    let repo = open_repository(&config).await?;

    let mut snapshot = repo.load_snapshot().await?;
    if !config.audit.include_private {
        snapshot = snapshot.public_view();
    }

    let report = audit_snapshot(&snapshot);
    for finding in &report.findings {
        match finding.severity {
            Severity::Error => error!(kind = ?finding.kind, ids = ?finding.ids, "{}", finding.message),
            Severity::Warning => warn!(kind = ?finding.kind, ids = ?finding.ids, "{}", finding.message),
        }
    }

    let errors = report.errors().count();
    let warnings = report.warnings().count();
    info!(
        journeys = snapshot.journeys().len(),
        phases = snapshot.phases().len(),
        entries = snapshot.entries().len(),
        errors,
        warnings,
        "audit complete"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);

    if errors > 0 && config.audit.fail_on_error {
        std::process::exit(1);
    }
    Ok(())
}
