//! Round journal: serializable records of what a round was asked to do.
//! A record plus the pre-round snapshot is enough to re-resolve the round
//! bit-for-bit; item ids travel as strings and are checked back against the
//! content pack on decode.

use serde::{Deserialize, Serialize};

use crate::content::ContentPack;
use crate::types::{ActionKind, CombatantId, EngineError, RoundAction};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordedActionKind {
    SearchWeapon,
    SearchArmor,
    SearchHealth,
    Hide,
    Revive { target: CombatantId },
    Hunt { weapon: Option<String>, pinned_target: Option<CombatantId> },
    Charge,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedAction {
    pub actor: CombatantId,
    pub kind: RecordedActionKind,
}

impl RecordedAction {
    pub fn from_action(action: &RoundAction) -> Self {
        let kind = match &action.kind {
            ActionKind::SearchWeapon => RecordedActionKind::SearchWeapon,
            ActionKind::SearchArmor => RecordedActionKind::SearchArmor,
            ActionKind::SearchHealth => RecordedActionKind::SearchHealth,
            ActionKind::Hide => RecordedActionKind::Hide,
            ActionKind::Revive { target } => RecordedActionKind::Revive { target: *target },
            ActionKind::Hunt { weapon, pinned_target } => RecordedActionKind::Hunt {
                weapon: weapon.map(str::to_string),
                pinned_target: *pinned_target,
            },
            ActionKind::Charge => RecordedActionKind::Charge,
        };
        Self { actor: action.actor, kind }
    }

    /// Rebuild the engine action, resolving item ids through the content
    /// pack. Unknown ids surface as configuration errors here, before any
    /// replay starts.
    pub fn to_action(&self, content: &ContentPack) -> Result<RoundAction, EngineError> {
        let kind = match &self.kind {
            RecordedActionKind::SearchWeapon => ActionKind::SearchWeapon,
            RecordedActionKind::SearchArmor => ActionKind::SearchArmor,
            RecordedActionKind::SearchHealth => ActionKind::SearchHealth,
            RecordedActionKind::Hide => ActionKind::Hide,
            RecordedActionKind::Revive { target } => ActionKind::Revive { target: *target },
            RecordedActionKind::Hunt { weapon, pinned_target } => {
                let weapon = match weapon {
                    Some(id) => Some(content.weapon(id)?.id),
                    None => None,
                };
                ActionKind::Hunt { weapon, pinned_target: *pinned_target }
            }
            RecordedActionKind::Charge => ActionKind::Charge,
        };
        Ok(RoundAction::new(self.actor, kind))
    }
}

/// Everything needed to re-resolve one round against its pre-round snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub seed: u64,
    pub floor: u32,
    pub actions: Vec<RecordedAction>,
}

impl RoundRecord {
    pub fn new(seed: u64, floor: u32, actions: &[RoundAction]) -> Self {
        Self { seed, floor, actions: actions.iter().map(RecordedAction::from_action).collect() }
    }
}

/// An ordered run of round records for one battlefield.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    pub rounds: Vec<RoundRecord>,
}

impl Journal {
    pub fn push_round(&mut self, record: RoundRecord) {
        self.rounds.push(record);
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(encoded: &str) -> serde_json::Result<Self> {
        serde_json::from_str(encoded)
    }
}
