//! Post-floor-clear rewards: rarity bands widen with depth, and loot applies
//! itself (auto-heal, armor upgrades, ammo stacking) instead of queueing
//! pickup actions.

use crate::content::ContentPack;
use crate::rarity::{BASE_RARITY_TABLE, roll_rarity, weighted_chance};
use crate::rng::RoundRng;
use crate::state::RoundState;
use crate::types::{CombatantId, EngineError, OutcomeEvent, PrizeCategory, Rarity};

pub const TOWER_HEIGHT: u32 = 10;

/// Two-tier rarity band for a floor's loot.
pub fn rarity_band(floor: u32) -> [Rarity; 2] {
    match floor {
        0..=3 => [Rarity::Common, Rarity::Rare],
        4..=6 => [Rarity::Rare, Rarity::Epic],
        _ => [Rarity::Epic, Rarity::Legendary],
    }
}

/// Chance a clear drops a second loot slot, scaling with depth.
pub fn large_loot_chance(floor: u32) -> f64 {
    f64::from(floor.min(TOWER_HEIGHT)) / f64::from(TOWER_HEIGHT)
}

const WEAPON_WEIGHT: f64 = 35.0;
const ARMOR_WEIGHT: f64 = 25.0;
const HEALTH_KIT_WEIGHT: f64 = 25.0;
const PERK_WEIGHT: f64 = 15.0;

/// Prize categories the raider can actually use right now, weighted.
fn eligible_categories(
    content: &ContentPack,
    state: &RoundState,
    raider: CombatantId,
    band: [Rarity; 2],
) -> Result<Vec<(f64, PrizeCategory)>, EngineError> {
    let combatant = state.get(raider)?;
    let Some(inventory) = combatant.as_raider() else {
        return Ok(Vec::new());
    };
    let mut categories = vec![(WEAPON_WEIGHT, PrizeCategory::Weapon)];

    let equipped_tier =
        inventory.armor.and_then(|id| content.armor(id).ok()).map(|spec| spec.rarity);
    let armor_upgradable =
        equipped_tier.is_none_or(|current| band.iter().any(|tier| *tier >= current));
    if armor_upgradable {
        categories.push((ARMOR_WEIGHT, PrizeCategory::Armor));
    }

    let kit_usable = combatant.health < combatant.max_health || !inventory.health_kits_full();
    if kit_usable {
        categories.push((HEALTH_KIT_WEIGHT, PrizeCategory::HealthKit));
    }

    categories.push((PERK_WEIGHT, PrizeCategory::Perk));
    Ok(categories)
}

fn roll_band_rarity(
    rng: &mut RoundRng,
    band: [Rarity; 2],
    luck_boost: f64,
    usable: impl Fn(Rarity) -> bool,
) -> Rarity {
    let available: Vec<Rarity> = band.into_iter().filter(|tier| usable(*tier)).collect();
    roll_rarity(rng, BASE_RARITY_TABLE, luck_boost, &available)
}

/// Generate and apply one raider's floor-clear loot. Every slot yields
/// exactly one event.
pub fn award_floor_loot(
    content: &ContentPack,
    state: &mut RoundState,
    rng: &mut RoundRng,
    raider: CombatantId,
) -> Result<Vec<OutcomeEvent>, EngineError> {
    let band = rarity_band(state.floor);
    let slots = if rng.chance(large_loot_chance(state.floor)) { 2 } else { 1 };
    let mut events = Vec::with_capacity(slots);
    for _ in 0..slots {
        events.push(award_slot(content, state, rng, raider, band)?);
    }
    Ok(events)
}

fn award_slot(
    content: &ContentPack,
    state: &mut RoundState,
    rng: &mut RoundRng,
    raider: CombatantId,
    band: [Rarity; 2],
) -> Result<OutcomeEvent, EngineError> {
    let categories = eligible_categories(content, state, raider, band)?;
    if categories.is_empty() {
        return Ok(OutcomeEvent::FoundNothing { actor: raider, category: PrizeCategory::Weapon });
    }
    let category = weighted_chance(rng, &categories, PrizeCategory::Weapon);
    let luck = state.get(raider)?.luck_boost;

    match category {
        PrizeCategory::Weapon => {
            let tier =
                roll_band_rarity(rng, band, luck, |t| !content.searchable_weapons(t).is_empty());
            let candidates = content.searchable_weapons(tier);
            if candidates.is_empty() {
                return Ok(OutcomeEvent::FoundNothing { actor: raider, category });
            }
            let spec = candidates[rng.index(candidates.len())];
            if let Some(inventory) = state.get_mut(raider)?.as_raider_mut() {
                inventory.stock_weapon(spec.id, spec.usage_limit);
            }
            Ok(OutcomeEvent::FoundWeapon { actor: raider, weapon: spec.id, rarity: spec.rarity })
        }
        PrizeCategory::Armor => {
            let equipped = state
                .get(raider)?
                .as_raider()
                .and_then(|inventory| inventory.armor)
                .and_then(|id| content.armor(id).ok())
                .map(|spec| spec.rarity);
            let tier = roll_band_rarity(rng, band, luck, |t| {
                equipped.is_none_or(|current| t >= current)
                    && !content.armors_of_rarity(t).is_empty()
            });
            let candidates = content.armors_of_rarity(tier);
            if candidates.is_empty() || equipped.is_some_and(|current| tier < current) {
                return Ok(OutcomeEvent::FoundNothing { actor: raider, category });
            }
            let spec = candidates[rng.index(candidates.len())];
            if let Some(inventory) = state.get_mut(raider)?.as_raider_mut() {
                inventory.armor = Some(spec.id);
            }
            Ok(OutcomeEvent::FoundArmor { actor: raider, armor: spec.id, rarity: spec.rarity })
        }
        PrizeCategory::HealthKit => {
            let tier =
                roll_band_rarity(rng, band, luck, |t| !content.health_kits_of_rarity(t).is_empty());
            let candidates = content.health_kits_of_rarity(tier);
            if candidates.is_empty() {
                return Ok(OutcomeEvent::FoundNothing { actor: raider, category });
            }
            let spec = candidates[rng.index(candidates.len())];
            let combatant = state.get_mut(raider)?;
            if combatant.health < combatant.max_health {
                let restored = combatant.heal(spec.heal_amount);
                return Ok(OutcomeEvent::Healed {
                    actor: raider,
                    target: raider,
                    kit: spec.id,
                    amount: restored,
                });
            }
            match combatant.as_raider_mut() {
                Some(inventory) if !inventory.health_kits_full() => {
                    inventory.health_kits.push(spec.id);
                    Ok(OutcomeEvent::FoundHealthKit {
                        actor: raider,
                        kit: spec.id,
                        rarity: spec.rarity,
                    })
                }
                _ => Ok(OutcomeEvent::FoundNothing { actor: raider, category }),
            }
        }
        PrizeCategory::Perk => {
            let tier =
                roll_band_rarity(rng, band, luck, |t| !content.perks_of_rarity(t).is_empty());
            let candidates = content.perks_of_rarity(tier);
            if candidates.is_empty() {
                return Ok(OutcomeEvent::FoundNothing { actor: raider, category });
            }
            let spec = candidates[rng.index(candidates.len())];
            if let Some(inventory) = state.get_mut(raider)?.as_raider_mut() {
                inventory.grant_perk(spec.id);
            }
            Ok(OutcomeEvent::FoundPerk { actor: raider, perk: spec.id, rarity: spec.rarity })
        }
    }
}
