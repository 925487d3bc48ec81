//! Acceptance tests using Cucumber.
//!
//! Gherkin scenarios for progress roll-ups, audit findings, drill-down
//! navigation and repository deletes. All scenarios run against the
//! in-memory store.
//!
//! ```bash
//! cargo test --test interfaces
//! ```


use cucumber::writer::Stats as _;
use cucumber::World;
use steps::model::JourneyWorld;
use steps::repository::RepositoryWorld;

#[tokio::main]
async fn main() {
    let mut failed = Vec::new();

    for (name, feature) in [
        ("Progress", "tests/interfaces/features/progress.feature"),
        ("Audit", "tests/interfaces/features/audit.feature"),
        ("Navigation", "tests/interfaces/features/navigation.feature"),
    ] {
        println!("\n=== Running {name} Tests ===\n");
        let writer = JourneyWorld::cucumber().fail_on_skipped().run(feature).await;
        if writer.execution_has_failed() {
            failed.push(name);
        }
    }

    println!("\n=== Running Repository Tests ===\n");
    let writer = RepositoryWorld::cucumber()
        .fail_on_skipped()
        .run("tests/interfaces/features/repository.feature")
        .await;
    if writer.execution_has_failed() {
        failed.push("Repository");
    }

    assert!(failed.is_empty(), "failing features: {}", failed.join(", "));
}
