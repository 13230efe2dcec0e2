//! Response shape normalization
//!
//! Backend list endpoints wrap their records in different envelopes:
//! a bare array, `{ "data": [...] }`, `{ "users": [...] }` and so on, with
//! pagination metadata under `meta`, `pagination` or at the top level.
//!
//! # Overview
//!
//! `ResponseNormalizer` turns any of these into a `NormalizedPage`: the
//! record list plus `PageMeta`. It never fails. An unrecognized envelope
//! yields an empty page, which also ends a paged fetch.

mod shapes;

pub use shapes::{lookup_path, NormalizedPage, PageMeta, ResponseNormalizer, ShapeAliases};
