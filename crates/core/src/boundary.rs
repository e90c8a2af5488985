//! Seams to the hosting layer: loading a hydrated round, committing the
//! resolved snapshot, and fanning events out to notifiers. The engine never
//! performs I/O itself; these traits are implemented by the web layer.

use thiserror::Error;

use crate::content::ContentPack;
use crate::round::resolve_round;
use crate::state::RoundState;
use crate::types::{EngineError, OutcomeEvent, RoundAction};

/// Loads a fully hydrated round: every referenced combatant, inventory, and
/// queued action must be present. "Maybe loaded" is not a state the engine
/// accepts.
pub trait ParticipantSource {
    type Error;

    fn load_round(&mut self) -> Result<(RoundState, Vec<RoundAction>), Self::Error>;
}

/// Commits the post-round snapshot atomically. A failed commit discards the
/// whole round; there is no partial persistence.
pub trait SnapshotCommitter {
    type Error;

    fn commit(&mut self, state: &RoundState, actions: &[RoundAction]) -> Result<(), Self::Error>;
}

/// Fire-and-forget event delivery. The engine does not await or retry.
pub trait OutcomeSink {
    fn emit(&mut self, event: &OutcomeEvent);
}

#[derive(Debug, Error)]
pub enum RoundDriveError<L, C> {
    #[error("failed to load round participants")]
    Load(#[source] L),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("failed to commit round snapshot")]
    Commit(#[source] C),
}

/// Load, resolve, commit, notify. Engine failures and commit failures both
/// leave the persisted state untouched; events are only emitted after the
/// commit succeeds.
pub fn drive_round<S, C, N>(
    content: &ContentPack,
    source: &mut S,
    committer: &mut C,
    sink: &mut N,
    seed: u64,
) -> Result<Vec<OutcomeEvent>, RoundDriveError<S::Error, C::Error>>
where
    S: ParticipantSource,
    C: SnapshotCommitter,
    N: OutcomeSink,
{
    let (mut state, mut actions) =
        source.load_round().map_err(RoundDriveError::Load)?;
    let events = resolve_round(content, &mut state, &mut actions, seed)?;
    committer.commit(&state, &actions).map_err(RoundDriveError::Commit)?;
    for event in &events {
        sink.emit(event);
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;
    use crate::content::keys;
    use crate::state::Combatant;
    use crate::types::ActionKind;

    struct FixedSource {
        state: Option<(RoundState, Vec<RoundAction>)>,
    }

    impl ParticipantSource for FixedSource {
        type Error = Infallible;

        fn load_round(&mut self) -> Result<(RoundState, Vec<RoundAction>), Self::Error> {
            Ok(self.state.take().expect("round loaded once"))
        }
    }

    #[derive(Default)]
    struct RecordingCommitter {
        committed_hash: Option<u64>,
    }

    impl SnapshotCommitter for RecordingCommitter {
        type Error = Infallible;

        fn commit(
            &mut self,
            state: &RoundState,
            _actions: &[RoundAction],
        ) -> Result<(), Self::Error> {
            self.committed_hash = Some(state.snapshot_hash());
            Ok(())
        }
    }

    #[derive(Default)]
    struct CollectingSink {
        events: Vec<OutcomeEvent>,
    }

    impl OutcomeSink for CollectingSink {
        fn emit(&mut self, event: &OutcomeEvent) {
            self.events.push(event.clone());
        }
    }

    fn loaded_round(content: &ContentPack) -> (RoundState, Vec<RoundAction>) {
        let mut state = RoundState::new(1);
        let raider = state.spawn(Combatant::raider("ada", 60));
        state.spawn_enemy(content, keys::ENEMY_TOWER_RAT).unwrap();
        (state, vec![RoundAction::new(raider, ActionKind::SearchHealth)])
    }

    #[test]
    fn drive_round_commits_then_emits_every_event() {
        let content = ContentPack::default();
        let mut source = FixedSource { state: Some(loaded_round(&content)) };
        let mut committer = RecordingCommitter::default();
        let mut sink = CollectingSink::default();

        let events =
            drive_round(&content, &mut source, &mut committer, &mut sink, 31).unwrap();

        assert!(committer.committed_hash.is_some());
        assert_eq!(sink.events, events);
        assert!(!events.is_empty());
    }

    #[test]
    fn engine_failure_reaches_neither_committer_nor_sink() {
        let content = ContentPack::default();
        let (mut state, mut actions) = loaded_round(&content);
        let ghost = state.spawn(Combatant::raider("ghost", 1));
        state.combatants.remove(ghost);
        actions.push(RoundAction::new(ghost, ActionKind::Hide));

        let mut source = FixedSource { state: Some((state, actions)) };
        let mut committer = RecordingCommitter::default();
        let mut sink = CollectingSink::default();

        let err =
            drive_round(&content, &mut source, &mut committer, &mut sink, 31).unwrap_err();
        assert!(matches!(err, RoundDriveError::Engine(EngineError::MissingCombatant)));
        assert!(committer.committed_hash.is_none());
        assert!(sink.events.is_empty());
    }
}
