//! Search orchestrator: concurrent fan-out, de-duplication, ranking.
//!
//! This module issues a query to every enabled source concurrently, waits
//! for all of them to settle, merges whatever succeeded, and re-scores the
//! merged list with a single ranking formula.

pub mod dedup;
pub mod dispatch;
pub mod ranking;
