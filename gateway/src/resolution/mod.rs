//! Product resolution engine (component E): normalization, three-layer
//! matching, and brand find-or-create (the latter lives in
//! [`crate::db::repository::brand`] since it is itself an upsert against the
//! relational store).

pub mod matcher;
pub mod normalize;

pub use matcher::{resolve, IncomingMatchInput, MatchLayer, MatchOutcome, FUZZY_THRESHOLD, UNIT_TOLERANCE};
