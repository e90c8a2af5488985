//! Initiative momentum: strong hits shift persistent turn-order weight
//! toward the attacker and away from the struck target.

use crate::abilities::round2;
use crate::state::RoundState;
use crate::types::{CombatantId, EngineError};

pub const STRONG_HIT_ATTACKER_GAIN: f64 = 0.2;
pub const STRONG_HIT_TARGET_PENALTY: f64 = 0.1;

/// A hit counts as strong when it reaches 60% of the way up the damage
/// range, rounded up.
pub fn strong_hit_threshold(minor: i32, major: i32) -> i32 {
    minor + (0.6 * f64::from(major - minor)).ceil() as i32
}

/// Record a landed hit. Deltas accumulate into the persistent initiative
/// field; they are not reset between rounds.
pub fn register_hit(
    state: &mut RoundState,
    attacker: CombatantId,
    target: CombatantId,
    damage_dealt: i32,
    minor: i32,
    major: i32,
) -> Result<(), EngineError> {
    if damage_dealt < strong_hit_threshold(minor, major) {
        return Ok(());
    }
    let gainer = state.get_mut(attacker)?;
    gainer.abilities.initiative = round2(gainer.abilities.initiative + STRONG_HIT_ATTACKER_GAIN);
    let struck = state.get_mut(target)?;
    struck.abilities.initiative = round2(struck.abilities.initiative - STRONG_HIT_TARGET_PENALTY);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Combatant;

    fn two_combatants() -> (RoundState, CombatantId, CombatantId) {
        let mut state = RoundState::new(1);
        let a = state.spawn(Combatant::raider("ada", 50));
        let b = state.spawn(Combatant::raider("brin", 50));
        (state, a, b)
    }

    #[test]
    fn threshold_is_sixty_percent_of_range_rounded_up() {
        assert_eq!(strong_hit_threshold(10, 20), 16);
        assert_eq!(strong_hit_threshold(3, 6), 5, "ceil(0.6 * 3) = 2");
        assert_eq!(strong_hit_threshold(5, 5), 5, "degenerate range keeps the floor");
    }

    #[test]
    fn hit_exactly_at_threshold_shifts_both_sides() {
        let (mut state, attacker, target) = two_combatants();
        register_hit(&mut state, attacker, target, 16, 10, 20).unwrap();
        assert_eq!(state.get(attacker).unwrap().abilities.initiative, 0.2);
        assert_eq!(state.get(target).unwrap().abilities.initiative, -0.1);
    }

    #[test]
    fn hit_below_threshold_changes_nothing() {
        let (mut state, attacker, target) = two_combatants();
        register_hit(&mut state, attacker, target, 15, 10, 20).unwrap();
        assert_eq!(state.get(attacker).unwrap().abilities.initiative, 0.0);
        assert_eq!(state.get(target).unwrap().abilities.initiative, 0.0);
    }

    #[test]
    fn momentum_accumulates_across_hits_to_two_decimals() {
        let (mut state, attacker, target) = two_combatants();
        for _ in 0..3 {
            register_hit(&mut state, attacker, target, 20, 10, 20).unwrap();
        }
        let gained = state.get(attacker).unwrap().abilities.initiative;
        let lost = state.get(target).unwrap().abilities.initiative;
        assert_eq!(gained, 0.6);
        assert_eq!(lost, -0.3);
    }
}
