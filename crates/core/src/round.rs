//! Round resolution: the phase machine that turns queued actions into
//! outcome events. Phase order is fixed; callers may disable phases but can
//! never reorder them.

use crate::abilities::Abilities;
use crate::content::ContentPack;
use crate::perks::{self, PerkContext};
use crate::rng::RoundRng;
use crate::state::{CombatantKind, RoundState};
use crate::types::{
    ActionKind, CombatantId, EngineError, OutcomeEvent, RoundAction, SkipReason,
};

mod hunt;
mod search;

pub mod damage;
pub mod initiative;
pub mod targeting;

/// Baseline success chance for every search action before ability bonuses.
pub const BASE_SEARCH_RATE: f64 = 0.6;
/// Baseline chance a hit combatant loses their action, before stun pressure
/// and stun-block adjustments.
pub const BASE_STUN_RATE: f64 = 0.35;
/// Persistent turn-order weight granted by a charge action.
pub const CHARGE_INITIATIVE_BONUS: f64 = 0.3;
/// Accuracy granted by the precision trait when contesting an evade.
pub const PRECISION_ACCURACY_BONUS: f64 = 0.15;
/// An evade roll can never exceed this, however slippery the defender.
pub const MAX_EVADE_CHANCE: f64 = 0.95;
/// Legendary search results only appear from this floor upward.
pub const LEGENDARY_SEARCH_MIN_FLOOR: u32 = 4;

/// The seven phases, in resolution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    SearchHealth,
    HealRevive,
    Hide,
    SearchArmor,
    SearchWeapons,
    Charge,
    Hunt,
}

pub const PHASE_ORDER: [RoundPhase; 7] = [
    RoundPhase::SearchHealth,
    RoundPhase::HealRevive,
    RoundPhase::Hide,
    RoundPhase::SearchArmor,
    RoundPhase::SearchWeapons,
    RoundPhase::Charge,
    RoundPhase::Hunt,
];

/// Which phases actually run. Disabled phases still complete their queued
/// actions, as explanatory skips, so every action yields exactly one event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseSet {
    pub search_health: bool,
    pub heal_revive: bool,
    pub hide: bool,
    pub search_armor: bool,
    pub search_weapons: bool,
    pub charge: bool,
    pub hunt: bool,
}

impl PhaseSet {
    pub fn all() -> Self {
        Self {
            search_health: true,
            heal_revive: true,
            hide: true,
            search_armor: true,
            search_weapons: true,
            charge: true,
            hunt: true,
        }
    }

    pub fn none() -> Self {
        Self {
            search_health: false,
            heal_revive: false,
            hide: false,
            search_armor: false,
            search_weapons: false,
            charge: false,
            hunt: false,
        }
    }

    pub fn enabled(&self, phase: RoundPhase) -> bool {
        match phase {
            RoundPhase::SearchHealth => self.search_health,
            RoundPhase::HealRevive => self.heal_revive,
            RoundPhase::Hide => self.hide,
            RoundPhase::SearchArmor => self.search_armor,
            RoundPhase::SearchWeapons => self.search_weapons,
            RoundPhase::Charge => self.charge,
            RoundPhase::Hunt => self.hunt,
        }
    }
}

impl Default for PhaseSet {
    fn default() -> Self {
        Self::all()
    }
}

fn phase_of(kind: &ActionKind) -> RoundPhase {
    match kind {
        ActionKind::SearchHealth => RoundPhase::SearchHealth,
        ActionKind::Revive { .. } => RoundPhase::HealRevive,
        ActionKind::Hide => RoundPhase::Hide,
        ActionKind::SearchArmor => RoundPhase::SearchArmor,
        ActionKind::SearchWeapon => RoundPhase::SearchWeapons,
        ActionKind::Charge => RoundPhase::Charge,
        ActionKind::Hunt { .. } => RoundPhase::Hunt,
    }
}

/// Resolve one round. Synthesizes actions for idle enemies from their
/// patterns, then runs the phases in order. Actions are marked completed in
/// place; `actions` grows by the synthesized enemy entries.
///
/// Configuration errors are surfaced before any state is touched, so a
/// caller that sees `Err` can discard the attempt without rollback.
pub fn resolve_round(
    content: &ContentPack,
    state: &mut RoundState,
    actions: &mut Vec<RoundAction>,
    seed: u64,
) -> Result<Vec<OutcomeEvent>, EngineError> {
    resolve_round_with_phases(content, state, actions, seed, PhaseSet::all())
}

pub fn resolve_round_with_phases(
    content: &ContentPack,
    state: &mut RoundState,
    actions: &mut Vec<RoundAction>,
    seed: u64,
    phases: PhaseSet,
) -> Result<Vec<OutcomeEvent>, EngineError> {
    validate(content, state, actions)?;
    synthesize_enemy_actions(content, state, actions)?;

    let mut sim = RoundSim {
        content,
        state,
        rng: RoundRng::seed_from_u64(seed),
        events: Vec::new(),
    };
    for phase in PHASE_ORDER {
        if phases.enabled(phase) {
            sim.run_phase(phase, actions)?;
        } else {
            sim.skip_phase(phase, actions);
        }
    }
    Ok(sim.events)
}

/// Reject data bugs up front: every queued action must reference live
/// content and a combatant present in the snapshot, every raider inventory
/// id must resolve against the content pack, and every enemy pattern must
/// parse. Nothing is mutated on failure.
fn validate(
    content: &ContentPack,
    state: &RoundState,
    actions: &[RoundAction],
) -> Result<(), EngineError> {
    for action in actions {
        if !state.combatants.contains_key(action.actor) {
            return Err(EngineError::MissingCombatant);
        }
        if let ActionKind::Hunt { weapon: Some(weapon), .. } = action.kind {
            content.weapon(weapon)?;
        }
    }
    for combatant in state.combatants.values() {
        match &combatant.kind {
            CombatantKind::Raider(raider) => {
                for stock in &raider.weapons {
                    content.weapon(stock.weapon)?;
                }
                if let Some(armor) = raider.armor {
                    content.armor(armor)?;
                }
                for kit in &raider.health_kits {
                    content.health_kit(kit)?;
                }
                for (perk, _) in &raider.perks {
                    content.perk(perk)?;
                }
            }
            CombatantKind::Enemy(enemy) => {
                let spec = content.enemy(enemy.template)?;
                for symbol in spec.pattern.chars() {
                    pattern_action(symbol)?;
                }
            }
        }
    }
    Ok(())
}

fn pattern_action(symbol: char) -> Result<ActionKind, EngineError> {
    match symbol {
        'A' => Ok(ActionKind::Hunt { weapon: None, pinned_target: None }),
        'H' => Ok(ActionKind::Hide),
        'C' => Ok(ActionKind::Charge),
        other => Err(EngineError::UnknownPatternSymbol(other)),
    }
}

/// Queue one pattern-driven action for every living enemy that has none,
/// advancing its cursor. Enemies with an explicitly queued action keep it and
/// hold their pattern position.
fn synthesize_enemy_actions(
    content: &ContentPack,
    state: &mut RoundState,
    actions: &mut Vec<RoundAction>,
) -> Result<(), EngineError> {
    let idle: Vec<CombatantId> = state
        .living_enemies()
        .filter(|(id, _)| !actions.iter().any(|action| action.actor == *id))
        .map(|(id, _)| id)
        .collect();
    for id in idle {
        let combatant = state.get_mut(id)?;
        let Some(enemy) = combatant.as_enemy_mut() else { continue };
        let pattern = content.enemy(enemy.template)?.pattern;
        let symbol = pattern
            .chars()
            .nth(enemy.pattern_cursor)
            .ok_or(EngineError::UnknownPatternSymbol('?'))?;
        enemy.pattern_cursor += 1;
        if enemy.pattern_cursor >= pattern.len() {
            enemy.pattern_cursor = 0;
            enemy.pattern_repeats += 1;
        }
        actions.push(RoundAction::new(id, pattern_action(symbol)?));
    }
    Ok(())
}

struct RoundSim<'a> {
    content: &'a ContentPack,
    state: &'a mut RoundState,
    rng: RoundRng,
    events: Vec<OutcomeEvent>,
}

impl RoundSim<'_> {
    fn run_phase(
        &mut self,
        phase: RoundPhase,
        actions: &mut Vec<RoundAction>,
    ) -> Result<(), EngineError> {
        if phase == RoundPhase::Hunt {
            return self.run_hunt(actions);
        }
        for index in 0..actions.len() {
            let action = actions[index];
            if action.completed || phase_of(&action.kind) != phase {
                continue;
            }
            match action.kind {
                ActionKind::SearchHealth => self.run_search_health(action.actor)?,
                ActionKind::Revive { target } => self.run_revive(action.actor, target)?,
                ActionKind::Hide => self.run_hide(action.actor)?,
                ActionKind::SearchArmor => self.run_search_armor(action.actor)?,
                ActionKind::SearchWeapon => self.run_search_weapon(action.actor)?,
                ActionKind::Charge => self.run_charge(action.actor)?,
                ActionKind::Hunt { .. } => unreachable!("hunt handled above"),
            }
            actions[index].completed = true;
        }
        Ok(())
    }

    /// Complete a disabled phase's actions as explanatory skips.
    fn skip_phase(&mut self, phase: RoundPhase, actions: &mut [RoundAction]) {
        for action in actions.iter_mut() {
            if !action.completed && phase_of(&action.kind) == phase {
                self.events.push(OutcomeEvent::ActionSkipped {
                    actor: action.actor,
                    reason: SkipReason::PhaseDisabled,
                });
                action.completed = true;
            }
        }
    }

    /// Effective abilities for an actor outside the hunt order.
    fn resolved_abilities(&self, id: CombatantId) -> Result<Abilities, EngineError> {
        let combatant = self.state.get(id)?;
        perks::resolve_abilities(self.content, combatant, PerkContext::default())
    }

    fn push(&mut self, event: OutcomeEvent) {
        self.events.push(event);
    }
}
