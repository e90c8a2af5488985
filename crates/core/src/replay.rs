//! Replay: re-resolving journaled rounds against a pre-round snapshot and
//! checking the result against the live run by snapshot hash.

use crate::content::ContentPack;
use crate::journal::{Journal, RoundRecord};
use crate::round::resolve_round;
use crate::state::RoundState;
use crate::types::{EngineError, OutcomeEvent};

pub struct ReplayOutcome {
    pub events: Vec<OutcomeEvent>,
    pub snapshot_hash: u64,
}

/// Re-resolve one recorded round. The caller supplies the same snapshot the
/// live round started from; equivalence holds when the returned events and
/// hash match the live ones.
pub fn replay_round(
    content: &ContentPack,
    state: &mut RoundState,
    record: &RoundRecord,
) -> Result<ReplayOutcome, EngineError> {
    state.floor = record.floor;
    let mut actions = record
        .actions
        .iter()
        .map(|recorded| recorded.to_action(content))
        .collect::<Result<Vec<_>, _>>()?;
    let events = resolve_round(content, state, &mut actions, record.seed)?;
    Ok(ReplayOutcome { events, snapshot_hash: state.snapshot_hash() })
}

/// Replay a whole journal in order, returning the final snapshot hash.
pub fn replay_to_end(
    content: &ContentPack,
    state: &mut RoundState,
    journal: &Journal,
) -> Result<u64, EngineError> {
    for record in &journal.rounds {
        replay_round(content, state, record)?;
    }
    Ok(state.snapshot_hash())
}
