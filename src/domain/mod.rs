//! Journey domain model.
//!
//! Entities are tagged records with validating constructors:
//! - `Journey`: top-level learning track
//! - `Phase`: ordered stage within a journey, owning a set of focus areas
//! - `Entry`: a single artifact scoped to one phase and one focus area
//!
//! Ownership is by value of typed back-references (`journey_id`,
//! `phase_id`); the store does not enforce it.

mod entry;
mod ids;
mod journey;
mod kinds;
mod phase;

pub use entry::{Entry, EntryDraft, EntryPatch};
pub use ids::{EntryId, JourneyId, PhaseId};
pub use journey::{Journey, JourneyDraft, JourneyPatch};
pub use kinds::{Color, EntryType, Icon, Status};
pub use phase::{Phase, PhaseDraft, PhasePatch};

/// Records displayed in `order` sequence, ties broken by document id.
pub trait Ordered {
    fn order_key(&self) -> i64;
    fn id_key(&self) -> &str;
}

impl Ordered for Journey {
    fn order_key(&self) -> i64 {
        self.order
    }

    fn id_key(&self) -> &str {
        self.id.as_str()
    }
}

impl Ordered for Phase {
    fn order_key(&self) -> i64 {
        self.order
    }

    fn id_key(&self) -> &str {
        self.id.as_str()
    }
}

impl Ordered for Entry {
    fn order_key(&self) -> i64 {
        i64::from(self.order)
    }

    fn id_key(&self) -> &str {
        self.id.as_str()
    }
}

impl<T: Ordered + ?Sized> Ordered for &T {
    fn order_key(&self) -> i64 {
        (**self).order_key()
    }

    fn id_key(&self) -> &str {
        (**self).id_key()
    }
}
