//! Perk resolution: folding a combatant's owned perks into an effective
//! ability bundle for one action. Pure and idempotent; nothing here mutates
//! combatant state.

use crate::abilities::Abilities;
use crate::content::{ContentPack, PerkGate, PerkSpec};
use crate::state::Combatant;
use crate::types::EngineError;

/// How strongly a conditional perk's gate fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateTier {
    None,
    /// Flat fields only, no rates.
    Flat,
    Full,
    /// Full bundle scaled by the perk's gate multiplier.
    Amplified,
}

/// Signals a gate evaluation needs beyond the combatant itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct PerkContext {
    /// Position of the combatant's action in the current hunt order, if it
    /// has one this round.
    pub turn_position: Option<usize>,
    pub total_actions: usize,
}

impl PerkContext {
    pub fn with_turn_order(position: usize, total: usize) -> Self {
        Self { turn_position: Some(position), total_actions: total }
    }
}

fn health_ratio(combatant: &Combatant) -> f64 {
    if combatant.max_health <= 0 {
        return 0.0;
    }
    f64::from(combatant.health) / f64::from(combatant.max_health)
}

/// Ascending cutoffs: the strongest tier the ratio clears wins.
fn high_health_tier(ratio: f64, tiers: [f64; 3]) -> GateTier {
    if ratio >= tiers[2] {
        GateTier::Amplified
    } else if ratio >= tiers[1] {
        GateTier::Full
    } else if ratio >= tiers[0] {
        GateTier::Flat
    } else {
        GateTier::None
    }
}

/// Descending cutoffs: the deeper the health has fallen, the stronger the
/// tier.
fn low_health_tier(ratio: f64, tiers: [f64; 3]) -> GateTier {
    if ratio <= tiers[2] {
        GateTier::Amplified
    } else if ratio <= tiers[1] {
        GateTier::Full
    } else if ratio <= tiers[0] {
        GateTier::Flat
    } else {
        GateTier::None
    }
}

/// Acting last is the strongest position; the bonus decays stepwise moving
/// earlier in the order.
fn last_to_act_tier(context: PerkContext) -> GateTier {
    let Some(position) = context.turn_position else {
        return GateTier::None;
    };
    if context.total_actions == 0 || position >= context.total_actions {
        return GateTier::None;
    }
    match context.total_actions - 1 - position {
        0 => GateTier::Amplified,
        1 => GateTier::Full,
        2 => GateTier::Flat,
        _ => GateTier::None,
    }
}

pub fn evaluate_gate(spec: &PerkSpec, combatant: &Combatant, context: PerkContext) -> GateTier {
    match spec.gate {
        PerkGate::Unconditional => GateTier::Full,
        PerkGate::HighHealth { tiers } => high_health_tier(health_ratio(combatant), tiers),
        PerkGate::LowHealth { tiers } => low_health_tier(health_ratio(combatant), tiers),
        PerkGate::LastToAct => last_to_act_tier(context),
    }
}

/// Contribution of one unit of a perk at the given tier.
fn tier_contribution(spec: &PerkSpec, tier: GateTier) -> Option<(Abilities, f64)> {
    match tier {
        GateTier::None => None,
        GateTier::Flat => Some((spec.abilities.flat_only(), 1.0)),
        GateTier::Full => Some((spec.abilities, 1.0)),
        GateTier::Amplified => Some((spec.abilities, spec.gate_multiplier)),
    }
}

/// Resolve the combatant's effective abilities for one action: baseline plus
/// every owned perk's gated contribution, repeated per unit owned. Enemies
/// own no perks and resolve to their baseline unchanged.
pub fn resolve_abilities(
    content: &ContentPack,
    combatant: &Combatant,
    context: PerkContext,
) -> Result<Abilities, EngineError> {
    let mut resolved = combatant.abilities;
    let Some(raider) = combatant.as_raider() else {
        return Ok(resolved);
    };
    for &(perk_id, quantity) in &raider.perks {
        let spec = content.perk(perk_id)?;
        let tier = evaluate_gate(spec, combatant, context);
        if let Some((bundle, multiplier)) = tier_contribution(spec, tier) {
            for _ in 0..quantity {
                resolved.compose(&bundle, multiplier);
            }
        }
    }
    Ok(resolved)
}
