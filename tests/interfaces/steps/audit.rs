//! Audit step definitions.

use cucumber::{then, when};

use waypoint::audit::{audit_snapshot, Finding, Severity};

use super::model::JourneyWorld;

impl JourneyWorld {
    fn findings(&self) -> &[Finding] {
        &self.report.as_ref().expect("audit not run").findings
    }

    fn finding(&self, kind: &str) -> &Finding {
        self.findings()
            .iter()
            .find(|f| format!("{:?}", f.kind) == kind)
            .unwrap_or_else(|| panic!("no {kind} finding in {:?}", self.findings()))
    }
}

// --- When steps ---

#[when("I audit the data")]
async fn when_audit(world: &mut JourneyWorld) {
    let snapshot = world.snapshot();
    world.report = Some(audit_snapshot(&snapshot));
    world.audited = Some(snapshot);
}

// --- Then steps ---

#[then("the audit is clean")]
async fn then_clean(world: &mut JourneyWorld) {
    assert!(
        world.report.as_ref().expect("audit not run").is_clean(),
        "unexpected findings: {:?}",
        world.findings()
    );
}

#[then(expr = "there is an error {string}")]
async fn then_error(world: &mut JourneyWorld, kind: String) {
    assert_eq!(world.finding(&kind).severity, Severity::Error);
}

#[then(expr = "there is a warning {string}")]
async fn then_warning(world: &mut JourneyWorld, kind: String) {
    assert_eq!(world.finding(&kind).severity, Severity::Warning);
}

#[then(expr = "there are {int} findings")]
async fn then_count(world: &mut JourneyWorld, count: usize) {
    assert_eq!(world.findings().len(), count, "{:?}", world.findings());
}

#[then(expr = "the {string} finding mentions {string}")]
async fn then_mentions(world: &mut JourneyWorld, kind: String, text: String) {
    let message = &world.finding(&kind).message;
    assert!(message.contains(&text), "{message:?} does not mention {text:?}");
}

#[then(expr = "the {string} finding names {string}")]
async fn then_names(world: &mut JourneyWorld, kind: String, id: String) {
    assert!(world.finding(&kind).ids.contains(&id));
}

#[then("the audited data is unchanged")]
async fn then_unchanged(world: &mut JourneyWorld) {
    let audited = world.audited.as_ref().expect("audit not run");
    assert_eq!(audited, &world.snapshot());
}
