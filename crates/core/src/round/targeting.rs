//! Target selection for a strike: trait-driven blast fan-out plus the
//! dual-strike hit count.

use crate::rng::RoundRng;
use crate::types::{CombatTrait, CombatantId, has_trait};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetSelection {
    pub targets: Vec<CombatantId>,
    /// Strikes per selected target. 1, or 2 with dual-strike.
    pub hits: u32,
}

fn draw_from(rng: &mut RoundRng, pool: &mut Vec<CombatantId>) -> Option<CombatantId> {
    if pool.is_empty() {
        return None;
    }
    let index = rng.index(pool.len());
    Some(pool.swap_remove(index))
}

/// Pick the target set for one attack from an eligible pool.
///
/// A pinned target present in the pool is always included first. Blast traits
/// are mutually exclusive by priority (all > 3 > 2) and only add extra
/// targets; when no pin was established, one primary target is drawn last so
/// a non-empty pool always yields at least one target. An empty pool yields
/// an empty selection and the caller reports nobody to hunt.
pub fn select_targets(
    rng: &mut RoundRng,
    traits: &[CombatTrait],
    pool: &[CombatantId],
    pinned: Option<CombatantId>,
) -> TargetSelection {
    let mut remaining: Vec<CombatantId> = pool.to_vec();
    let mut targets = Vec::new();

    let pinned_established = match pinned {
        Some(id) if remaining.contains(&id) => {
            remaining.retain(|candidate| *candidate != id);
            targets.push(id);
            true
        }
        _ => false,
    };

    if has_trait(traits, CombatTrait::BlastAll) {
        targets.append(&mut remaining);
    } else if has_trait(traits, CombatTrait::Blast3) {
        for _ in 0..2 {
            if let Some(extra) = draw_from(rng, &mut remaining) {
                targets.push(extra);
            }
        }
    } else if has_trait(traits, CombatTrait::Blast2) {
        if let Some(extra) = draw_from(rng, &mut remaining) {
            targets.push(extra);
        }
    }

    if !pinned_established
        && let Some(primary) = draw_from(rng, &mut remaining)
    {
        targets.push(primary);
    }

    let hits = if has_trait(traits, CombatTrait::DualStrike) { 2 } else { 1 };
    TargetSelection { targets, hits }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    fn ids(count: usize) -> Vec<CombatantId> {
        let mut arena: SlotMap<CombatantId, ()> = SlotMap::with_key();
        (0..count).map(|_| arena.insert(())).collect()
    }

    #[test]
    fn empty_pool_selects_nothing() {
        let mut rng = RoundRng::seed_from_u64(1);
        let picked = select_targets(&mut rng, &[], &[], None);
        assert!(picked.targets.is_empty());
        assert_eq!(picked.hits, 1);
    }

    #[test]
    fn plain_attack_draws_exactly_one_target() {
        let mut rng = RoundRng::seed_from_u64(2);
        let pool = ids(5);
        let picked = select_targets(&mut rng, &[], &pool, None);
        assert_eq!(picked.targets.len(), 1);
        assert!(pool.contains(&picked.targets[0]));
    }

    #[test]
    fn pinned_target_in_pool_is_always_first() {
        let mut rng = RoundRng::seed_from_u64(3);
        let pool = ids(4);
        let picked = select_targets(&mut rng, &[], &pool, Some(pool[2]));
        assert_eq!(picked.targets, vec![pool[2]]);
    }

    #[test]
    fn stale_pinned_target_falls_back_to_a_random_draw() {
        let mut rng = RoundRng::seed_from_u64(4);
        let pool = ids(3);
        let gone = ids(1)[0];
        let picked = select_targets(&mut rng, &[], &pool, Some(gone));
        assert_eq!(picked.targets.len(), 1, "missing pin must not suppress the primary draw");
        assert!(pool.contains(&picked.targets[0]));
    }

    #[test]
    fn blast_all_takes_the_entire_pool_and_never_more() {
        let mut rng = RoundRng::seed_from_u64(5);
        for pool_size in 0..6 {
            let pool = ids(pool_size);
            let picked = select_targets(&mut rng, &[CombatTrait::BlastAll], &pool, None);
            assert_eq!(picked.targets.len(), pool_size);
        }
    }

    #[test]
    fn blast_three_selects_three_distinct_targets_when_available() {
        let mut rng = RoundRng::seed_from_u64(6);
        let pool = ids(6);
        let picked = select_targets(&mut rng, &[CombatTrait::Blast3], &pool, None);
        assert_eq!(picked.targets.len(), 3);
        let mut unique = picked.targets.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 3, "blast targets must be distinct");
    }

    #[test]
    fn blast_two_with_pin_hits_the_pin_plus_one_extra() {
        let mut rng = RoundRng::seed_from_u64(7);
        let pool = ids(4);
        let picked = select_targets(&mut rng, &[CombatTrait::Blast2], &pool, Some(pool[0]));
        assert_eq!(picked.targets.len(), 2);
        assert_eq!(picked.targets[0], pool[0]);
        assert_ne!(picked.targets[1], pool[0]);
    }

    #[test]
    fn blast_degrades_gracefully_on_a_small_pool() {
        let mut rng = RoundRng::seed_from_u64(8);
        let pool = ids(1);
        let picked = select_targets(&mut rng, &[CombatTrait::Blast3], &pool, None);
        assert_eq!(picked.targets, pool, "one-entry pool yields one target");
    }

    #[test]
    fn dual_strike_doubles_hits_and_nothing_else_does() {
        let mut rng = RoundRng::seed_from_u64(9);
        let pool = ids(3);
        let dual = select_targets(&mut rng, &[CombatTrait::DualStrike], &pool, None);
        assert_eq!(dual.hits, 2);
        let plain = select_targets(&mut rng, &[CombatTrait::Piercing], &pool, None);
        assert_eq!(plain.hits, 1);
    }

    #[test]
    fn blast_priority_is_all_over_three_over_two() {
        let mut rng = RoundRng::seed_from_u64(10);
        let pool = ids(6);
        let picked = select_targets(
            &mut rng,
            &[CombatTrait::Blast2, CombatTrait::Blast3, CombatTrait::BlastAll],
            &pool,
            None,
        );
        assert_eq!(picked.targets.len(), pool.len(), "blast-all must win the priority race");
    }

    #[test]
    fn identical_seeds_select_identical_target_sets() {
        let pool = ids(8);
        let mut left = RoundRng::seed_from_u64(77);
        let mut right = RoundRng::seed_from_u64(77);
        let a = select_targets(&mut left, &[CombatTrait::Blast3], &pool, None);
        let b = select_targets(&mut right, &[CombatTrait::Blast3], &pool, None);
        assert_eq!(a, b);
    }
}
