//! Waypoint - engineering journey roadmaps
//!
//! Models journeys made of ordered phases, each scoped to focus areas and
//! holding learning entries. Progress figures are derived on read, never
//! stored. An offline audit reports records that break the model's
//! invariants.
//!
//! Data flows one way: [`repository::JourneyRepository::load_snapshot`]
//! reads the store once into a [`snapshot::JourneySnapshot`], and the pure
//! modules ([`progress`], [`query`], [`navigation`], [`audit`]) work on that
//! snapshot.

pub mod audit;
pub mod config;
pub mod domain;
pub mod navigation;
pub mod progress;
pub mod query;
pub mod repository;
pub mod seed;
pub mod snapshot;
pub mod storage;
pub mod utils;
pub mod validation;
