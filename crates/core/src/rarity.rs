//! Weighted-random selection and rarity tier rolling.

use crate::abilities::round2;
use crate::rng::RoundRng;
use crate::types::Rarity;

/// Draw over `(weight, value)` entries: a uniform roll in `[0, sum)` picks the
/// first entry whose cumulative weight exceeds it. Negative weights count as
/// zero. `default` is a type-safety fallback only; it is unreachable while
/// the positive weights sum above zero.
pub fn weighted_chance<T: Copy>(rng: &mut RoundRng, entries: &[(f64, T)], default: T) -> T {
    let total: f64 = entries.iter().map(|(weight, _)| weight.max(0.0)).sum();
    if total <= 0.0 {
        return default;
    }
    let draw = rng.fraction() * total;
    let mut cumulative = 0.0;
    for (weight, value) in entries {
        cumulative += weight.max(0.0);
        if draw < cumulative {
            return *value;
        }
    }
    default
}

/// Percent chances per tier before any boost is applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RarityTable {
    pub common: f64,
    pub rare: f64,
    pub epic: f64,
    pub legendary: f64,
}

pub const BASE_RARITY_TABLE: RarityTable =
    RarityTable { common: 60.0, rare: 25.0, epic: 10.0, legendary: 5.0 };

/// Roll a tier from `table`, shifted by `delta_boost` and restricted to
/// `available` tiers.
///
/// The boost split is deliberately asymmetric: half of the boost is added to
/// each of the two highest tiers and subtracted from each of the two lowest.
/// Game balance depends on this exact split; do not replace it with a uniform
/// redistribution.
pub fn roll_rarity(
    rng: &mut RoundRng,
    table: RarityTable,
    delta_boost: f64,
    available: &[Rarity],
) -> Rarity {
    let half = round2(delta_boost / 2.0);
    let shifted = [
        (round2(table.common - half), Rarity::Common),
        (round2(table.rare - half), Rarity::Rare),
        (round2(table.epic + half), Rarity::Epic),
        (round2(table.legendary + half), Rarity::Legendary),
    ];
    let entries: Vec<(f64, Rarity)> =
        shifted.into_iter().filter(|(_, tier)| available.contains(tier)).collect();
    let fallback = available.first().copied().unwrap_or(Rarity::Common);
    weighted_chance(rng, &entries, fallback)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn weighted_chance_returns_default_when_weights_sum_to_zero() {
        let mut rng = RoundRng::seed_from_u64(5);
        let picked = weighted_chance(&mut rng, &[(0.0, 'a'), (-3.0, 'b')], 'z');
        assert_eq!(picked, 'z');
    }

    #[test]
    fn weighted_chance_only_ever_picks_positive_weight_entries() {
        let mut rng = RoundRng::seed_from_u64(11);
        for _ in 0..500 {
            let picked = weighted_chance(&mut rng, &[(0.0, 'a'), (5.0, 'b'), (1.0, 'c')], 'z');
            assert_ne!(picked, 'a', "zero-weight entry must never win");
            assert_ne!(picked, 'z', "fallback must be unreachable with positive weights");
        }
    }

    #[test]
    fn weighted_chance_respects_weight_proportions() {
        let mut rng = RoundRng::seed_from_u64(2024);
        let mut counts: BTreeMap<char, u32> = BTreeMap::new();
        for _ in 0..10_000 {
            let picked = weighted_chance(&mut rng, &[(75.0, 'a'), (25.0, 'b')], 'z');
            *counts.entry(picked).or_default() += 1;
        }
        let share_a = f64::from(counts[&'a']) / 10_000.0;
        assert!((share_a - 0.75).abs() < 0.02, "share of 'a' was {share_a}");
    }

    #[test]
    fn boost_shifts_half_to_each_top_tier_and_away_from_each_bottom_tier() {
        // +120 boost: each bottom tier loses 60, so common hits exactly zero
        // and rare goes negative; both are weightless and only the top two
        // tiers can win.
        let mut rng = RoundRng::seed_from_u64(8);
        for _ in 0..200 {
            let tier = roll_rarity(&mut rng, BASE_RARITY_TABLE, 120.0, &Rarity::ALL);
            assert!(
                tier == Rarity::Epic || tier == Rarity::Legendary,
                "boost of 120 should exclude the bottom tiers, got {tier:?}"
            );
        }
    }

    #[test]
    fn boost_split_is_asymmetric_not_uniform() {
        // +10 boost: epic 10 -> 15, legendary 5 -> 10, rare 25 -> 20,
        // common 60 -> 55. A uniform redistribution would not double the
        // legendary weight; verify the doubled rate statistically.
        let mut rng = RoundRng::seed_from_u64(987);
        let trials = 20_000;
        let legendary_hits = (0..trials)
            .filter(|_| {
                roll_rarity(&mut rng, BASE_RARITY_TABLE, 10.0, &Rarity::ALL) == Rarity::Legendary
            })
            .count();
        let observed = legendary_hits as f64 / trials as f64;
        assert!((observed - 0.10).abs() < 0.015, "legendary rate was {observed}, expected ~0.10");
    }

    #[test]
    fn unavailable_tiers_are_never_rolled() {
        let mut rng = RoundRng::seed_from_u64(3);
        let band = [Rarity::Rare, Rarity::Epic];
        for _ in 0..500 {
            let tier = roll_rarity(&mut rng, BASE_RARITY_TABLE, 0.0, &band);
            assert!(band.contains(&tier), "rolled unavailable tier {tier:?}");
        }
    }

    proptest! {
        #[test]
        fn identical_seed_and_inputs_reproduce_the_same_tier(
            seed in any::<u64>(),
            boost in -20.0_f64..40.0,
        ) {
            let mut left = RoundRng::seed_from_u64(seed);
            let mut right = RoundRng::seed_from_u64(seed);
            let a = roll_rarity(&mut left, BASE_RARITY_TABLE, boost, &Rarity::ALL);
            let b = roll_rarity(&mut right, BASE_RARITY_TABLE, boost, &Rarity::ALL);
            prop_assert_eq!(a, b);
        }
    }
}
