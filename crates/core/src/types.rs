use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use thiserror::Error;

new_key_type! {
    pub struct CombatantId;
}

/// Item and perk power tier. Ordering matters: armor upgrades and loot bands
/// compare tiers with `>=`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [Rarity::Common, Rarity::Rare, Rarity::Epic, Rarity::Legendary];
}

/// Capability tag carried by weapons, armor, and enemy templates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CombatTrait {
    ArmorBreak,
    Blast2,
    Blast3,
    BlastAll,
    Detect,
    DualStrike,
    Piercing,
    Precision,
    Stealth,
    Unsearchable,
    Initial,
}

pub fn has_trait(traits: &[CombatTrait], wanted: CombatTrait) -> bool {
    traits.contains(&wanted)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PrizeCategory {
    Weapon,
    Armor,
    HealthKit,
    Perk,
}

/// One queued intent for a combatant in the current round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    SearchWeapon,
    SearchArmor,
    SearchHealth,
    Hide,
    Revive { target: CombatantId },
    Hunt { weapon: Option<&'static str>, pinned_target: Option<CombatantId> },
    Charge,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundAction {
    pub actor: CombatantId,
    pub kind: ActionKind,
    pub completed: bool,
}

impl RoundAction {
    pub fn new(actor: CombatantId, kind: ActionKind) -> Self {
        Self { actor, kind, completed: false }
    }
}

/// Armor details captured at the moment a strike was mitigated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ArmorReport {
    pub armor: &'static str,
    pub emoji: &'static str,
    pub rarity: Rarity,
    pub damage_after_armor: i32,
}

/// Structured result of a single strike. `new_damage` is only present when
/// armor or a perk modifier actually changed the raw roll; callers use the
/// distinction to decide how the hit is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DamageOutcome {
    pub original_damage: i32,
    pub new_damage: Option<i32>,
    pub armor: Option<ArmorReport>,
    pub originated_by_perk: bool,
}

impl DamageOutcome {
    pub fn applied_damage(&self) -> i32 {
        self.new_damage.unwrap_or(self.original_damage)
    }
}

/// Reason a queued action resolved to an explanatory no-op instead of its
/// normal effect. These replace mid-round failures: the action still
/// completes and still yields an event the caller can render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    ActorDown,
    TargetMissing,
    TargetAlreadyUp,
    WeaponNotOwned,
    NoHealthKit,
    HealthKitsFull,
    ArmorNotBetter,
    PhaseDisabled,
}

/// Semantic outcome of one resolved effect. The Slack layer renders these;
/// the engine never formats message text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum OutcomeEvent {
    FoundWeapon { actor: CombatantId, weapon: &'static str, rarity: Rarity },
    FoundArmor { actor: CombatantId, armor: &'static str, rarity: Rarity },
    FoundHealthKit { actor: CombatantId, kit: &'static str, rarity: Rarity },
    FoundPerk { actor: CombatantId, perk: &'static str, rarity: Rarity },
    FoundNothing { actor: CombatantId, category: PrizeCategory },
    Healed { actor: CombatantId, target: CombatantId, kit: &'static str, amount: i32 },
    Revived { actor: CombatantId, target: CombatantId, restored_health: i32 },
    Hid { actor: CombatantId },
    Charged { actor: CombatantId },
    ActionLost { actor: CombatantId },
    NobodyToHunt { actor: CombatantId },
    NeedsWeapon { actor: CombatantId, weapon: &'static str },
    Attacked { attacker: CombatantId, target: CombatantId, outcome: DamageOutcome },
    Evaded { attacker: CombatantId, target: CombatantId },
    ArmorBroken { attacker: CombatantId, target: CombatantId, armor: &'static str },
    Downed { target: CombatantId, by: CombatantId },
    ActionSkipped { actor: CombatantId, reason: SkipReason },
}

impl OutcomeEvent {
    /// Primary combatant the event should be attributed to when notifying.
    pub fn subject(&self) -> CombatantId {
        match *self {
            OutcomeEvent::FoundWeapon { actor, .. }
            | OutcomeEvent::FoundArmor { actor, .. }
            | OutcomeEvent::FoundHealthKit { actor, .. }
            | OutcomeEvent::FoundPerk { actor, .. }
            | OutcomeEvent::FoundNothing { actor, .. }
            | OutcomeEvent::Healed { actor, .. }
            | OutcomeEvent::Revived { actor, .. }
            | OutcomeEvent::Hid { actor }
            | OutcomeEvent::Charged { actor }
            | OutcomeEvent::ActionLost { actor }
            | OutcomeEvent::NobodyToHunt { actor }
            | OutcomeEvent::NeedsWeapon { actor, .. }
            | OutcomeEvent::ActionSkipped { actor, .. } => actor,
            OutcomeEvent::Attacked { attacker, .. }
            | OutcomeEvent::Evaded { attacker, .. }
            | OutcomeEvent::ArmorBroken { attacker, .. } => attacker,
            OutcomeEvent::Downed { target, .. } => target,
        }
    }
}

/// Fatal configuration failures. These indicate a content/data bug and abort
/// round resolution before any state mutation; recoverable problems (missing
/// target, spent weapon) are downgraded to [`SkipReason`] outcomes instead.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown weapon id `{0}`")]
    UnknownWeapon(String),
    #[error("unknown armor id `{0}`")]
    UnknownArmor(String),
    #[error("unknown health kit id `{0}`")]
    UnknownHealthKit(String),
    #[error("unknown perk id `{0}`")]
    UnknownPerk(String),
    #[error("unknown enemy template id `{0}`")]
    UnknownEnemy(String),
    #[error("enemy action pattern contains unknown symbol `{0}`")]
    UnknownPatternSymbol(char),
    #[error("queued action references a combatant missing from the snapshot")]
    MissingCombatant,
}
