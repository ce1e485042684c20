//! Caller-visible query failures.

use caravel_core::{Point, Range};
use thiserror::Error;

/// Rejection of a malformed path query at the API boundary.
///
/// Only genuinely malformed invocations are errors; an unreachable goal is
/// the normal `Ok(None)` outcome, and an illegal edge is the
/// [`ILLEGAL_MOVE`] value, never an error.
///
/// [`ILLEGAL_MOVE`]: crate::ILLEGAL_MOVE
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The query origin lies outside the map.
    #[error("path origin {origin} is outside the map bounds {bounds}")]
    OriginOffMap { origin: Point, bounds: Range },
}
