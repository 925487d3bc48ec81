//! waypoint-seed: import a YAML seed file
//!
//! Validates the whole seed first; nothing is written if any record is
//! invalid.
//!
//! ## Usage
//! ```text
//! waypoint-seed <seed.yaml> [config.yaml]
//! ```

use tracing::info;

use waypoint::config::Config;
use waypoint::seed::{self, SeedFile};
use waypoint::utils::bootstrap::{init_tracing, open_repository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let seed_path = args
        .next()
        .ok_or("usage: waypoint-seed <seed.yaml> [config.yaml]")?;
    let config_path = args.next();

    let config = Config::load(config_path.as_deref())?;
    let seed = SeedFile::load(&seed_path)?;
    info!(path = %seed_path, journeys = seed.journeys.len(), "seed file parsed");

    let repo = open_repository(&config).await?;
    let summary = seed::import(&repo, seed).await?;

    println!(
        "imported {} journeys, {} phases, {} entries",
        summary.journeys, summary.phases, summary.entries
    );
    Ok(())
}
