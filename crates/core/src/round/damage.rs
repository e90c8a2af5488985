//! Damage resolution for one strike: raw roll, perk attack/defense
//! modifiers, and armor mitigation.

use crate::abilities::Abilities;
use crate::content::ArmorSpec;
use crate::rng::RoundRng;
use crate::types::{ArmorReport, DamageOutcome};

/// Uniform raw roll over the weapon or template damage range.
pub fn roll_base_damage(rng: &mut RoundRng, minor: i32, major: i32) -> i32 {
    rng.range_i32(minor, major)
}

pub struct StrikeModifiers<'a> {
    /// Attacker abilities after perk resolution.
    pub attacker: &'a Abilities,
    /// Defender abilities after perk resolution.
    pub defender: &'a Abilities,
    pub defender_armor: Option<&'a ArmorSpec>,
    /// Raiders defend with their own flat defense and armor; enemies only
    /// with their defense rate.
    pub raider_is_target: bool,
    /// Piercing strikes skip armor and rate-based mitigation entirely.
    pub ignores_armor: bool,
}

/// Apply modifiers to a raw roll.
///
/// `new_damage` is populated only when armor was present or a perk modifier
/// actually fired; an unmodified hit reports `original_damage` alone. Callers
/// depend on that distinction for accounting, so a zero-effect modifier path
/// must not set it. Flat adjustments clamp at zero before any rate applies,
/// and the final figure is never negative.
pub fn resolve_strike(base_roll: i32, modifiers: &StrikeModifiers<'_>) -> DamageOutcome {
    let mut damage = f64::from(base_roll.max(0));
    let mut perk_fired = false;

    if modifiers.attacker.has_attack_modifiers() {
        damage = (damage + modifiers.attacker.attack).max(0.0);
        damage *= 1.0 + modifiers.attacker.attack_rate;
        perk_fired = true;
    }

    // Armor and perk defense compound additively in one reduction rate.
    let mut reduction_rate = 0.0;
    if modifiers.raider_is_target {
        if modifiers.defender.has_flat_defense() {
            damage = (damage - modifiers.defender.defense).max(0.0);
            perk_fired = true;
        }
        if modifiers.defender.defense_rate != 0.0 {
            reduction_rate += modifiers.defender.defense_rate;
            perk_fired = true;
        }
    } else if !modifiers.ignores_armor && modifiers.defender.defense_rate != 0.0 {
        reduction_rate += modifiers.defender.defense_rate;
        perk_fired = true;
    }

    let armor = if modifiers.ignores_armor { None } else { modifiers.defender_armor };
    if let Some(spec) = armor {
        reduction_rate += spec.reduction_rate;
    }

    damage *= (1.0 - reduction_rate).max(0.0);
    let final_damage = (damage.round() as i32).max(0);

    let armor_report = armor.map(|spec| ArmorReport {
        armor: spec.id,
        emoji: spec.emoji,
        rarity: spec.rarity,
        damage_after_armor: final_damage,
    });

    DamageOutcome {
        original_damage: base_roll.max(0),
        new_damage: (armor_report.is_some() || perk_fired).then_some(final_damage),
        armor: armor_report,
        originated_by_perk: perk_fired,
    }
}
