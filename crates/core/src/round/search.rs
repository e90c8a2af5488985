//! Non-hunt phase handlers: searching, healing, reviving, hiding, and
//! charging.

use super::*;
use crate::abilities::round2;
use crate::rarity::{BASE_RARITY_TABLE, roll_rarity};
use crate::types::{PrizeCategory, Rarity};

/// Tiers a search can produce on the given floor.
pub(super) fn search_tiers(floor: u32) -> Vec<Rarity> {
    Rarity::ALL
        .into_iter()
        .filter(|tier| *tier != Rarity::Legendary || floor >= LEGENDARY_SEARCH_MIN_FLOOR)
        .collect()
}

impl RoundSim<'_> {
    fn actor_is_down(&mut self, id: CombatantId) -> Result<bool, EngineError> {
        if self.state.get(id)?.is_alive() {
            return Ok(false);
        }
        self.push(OutcomeEvent::ActionSkipped { actor: id, reason: SkipReason::ActorDown });
        Ok(true)
    }

    fn roll_search_tier(&mut self, actor: CombatantId, rarity_bonus: f64) -> Result<Rarity, EngineError> {
        let luck = self.state.get(actor)?.luck_boost;
        let tiers = search_tiers(self.state.floor);
        Ok(roll_rarity(&mut self.rng, BASE_RARITY_TABLE, luck + rarity_bonus, &tiers))
    }

    pub(super) fn run_search_health(&mut self, actor: CombatantId) -> Result<(), EngineError> {
        if self.actor_is_down(actor)? {
            return Ok(());
        }
        let content = self.content;
        let resolved = self.resolved_abilities(actor)?;
        if !self.rng.chance(BASE_SEARCH_RATE + resolved.health_kit_search_rate) {
            self.push(OutcomeEvent::FoundNothing { actor, category: PrizeCategory::HealthKit });
            return Ok(());
        }
        let tier = self.roll_search_tier(actor, resolved.rarity_rate)?;
        let candidates = content.health_kits_of_rarity(tier);
        if candidates.is_empty() {
            self.push(OutcomeEvent::FoundNothing { actor, category: PrizeCategory::HealthKit });
            return Ok(());
        }
        let spec = candidates[self.rng.index(candidates.len())];

        let combatant = self.state.get_mut(actor)?;
        if combatant.health < combatant.max_health {
            // Hurt finders use the kit on the spot instead of pocketing it.
            let boosted =
                (f64::from(spec.heal_amount) * (1.0 + resolved.healing_rate)).round() as i32;
            let restored = combatant.heal(boosted);
            self.push(OutcomeEvent::Healed {
                actor,
                target: actor,
                kit: spec.id,
                amount: restored,
            });
            return Ok(());
        }
        match combatant.as_raider_mut() {
            Some(raider) if raider.health_kits_full() => {
                self.push(OutcomeEvent::ActionSkipped {
                    actor,
                    reason: SkipReason::HealthKitsFull,
                });
            }
            Some(raider) => {
                raider.health_kits.push(spec.id);
                self.push(OutcomeEvent::FoundHealthKit {
                    actor,
                    kit: spec.id,
                    rarity: spec.rarity,
                });
            }
            None => {
                self.push(OutcomeEvent::FoundNothing { actor, category: PrizeCategory::HealthKit });
            }
        }
        Ok(())
    }

    pub(super) fn run_revive(
        &mut self,
        actor: CombatantId,
        target: CombatantId,
    ) -> Result<(), EngineError> {
        if self.actor_is_down(actor)? {
            return Ok(());
        }
        let Ok(target_combatant) = self.state.get(target) else {
            self.push(OutcomeEvent::ActionSkipped { actor, reason: SkipReason::TargetMissing });
            return Ok(());
        };
        if target_combatant.is_alive() {
            self.push(OutcomeEvent::ActionSkipped { actor, reason: SkipReason::TargetAlreadyUp });
            return Ok(());
        }
        let spent_kit = self
            .state
            .get_mut(actor)?
            .as_raider_mut()
            .and_then(|raider| raider.take_health_kit());
        if spent_kit.is_none() {
            self.push(OutcomeEvent::ActionSkipped { actor, reason: SkipReason::NoHealthKit });
            return Ok(());
        }
        let revived = self.state.get_mut(target)?;
        let restored = revived.max_health / 2;
        revived.health = restored;
        self.push(OutcomeEvent::Revived { actor, target, restored_health: restored });
        Ok(())
    }

    pub(super) fn run_hide(&mut self, actor: CombatantId) -> Result<(), EngineError> {
        if self.actor_is_down(actor)? {
            return Ok(());
        }
        self.state.get_mut(actor)?.visible = false;
        self.push(OutcomeEvent::Hid { actor });
        Ok(())
    }

    pub(super) fn run_search_armor(&mut self, actor: CombatantId) -> Result<(), EngineError> {
        if self.actor_is_down(actor)? {
            return Ok(());
        }
        let content = self.content;
        let resolved = self.resolved_abilities(actor)?;
        if !self.rng.chance(BASE_SEARCH_RATE + resolved.armor_search_rate) {
            self.push(OutcomeEvent::FoundNothing { actor, category: PrizeCategory::Armor });
            return Ok(());
        }
        let tier = self.roll_search_tier(actor, resolved.rarity_rate)?;
        let candidates = content.armors_of_rarity(tier);
        if candidates.is_empty() {
            self.push(OutcomeEvent::FoundNothing { actor, category: PrizeCategory::Armor });
            return Ok(());
        }
        let spec = candidates[self.rng.index(candidates.len())];

        let combatant = self.state.get_mut(actor)?;
        let Some(raider) = combatant.as_raider_mut() else {
            self.push(OutcomeEvent::FoundNothing { actor, category: PrizeCategory::Armor });
            return Ok(());
        };
        let equipped_tier = raider.armor.and_then(|id| content.armor(id).ok()).map(|a| a.rarity);
        if equipped_tier.is_some_and(|current| current > spec.rarity) {
            self.push(OutcomeEvent::ActionSkipped { actor, reason: SkipReason::ArmorNotBetter });
            return Ok(());
        }
        raider.armor = Some(spec.id);
        self.push(OutcomeEvent::FoundArmor { actor, armor: spec.id, rarity: spec.rarity });
        Ok(())
    }

    pub(super) fn run_search_weapon(&mut self, actor: CombatantId) -> Result<(), EngineError> {
        if self.actor_is_down(actor)? {
            return Ok(());
        }
        let content = self.content;
        let resolved = self.resolved_abilities(actor)?;
        if !self.rng.chance(BASE_SEARCH_RATE + resolved.weapon_search_rate) {
            self.push(OutcomeEvent::FoundNothing { actor, category: PrizeCategory::Weapon });
            return Ok(());
        }
        let tier = self.roll_search_tier(actor, resolved.rarity_rate)?;
        let candidates = content.searchable_weapons(tier);
        if candidates.is_empty() {
            self.push(OutcomeEvent::FoundNothing { actor, category: PrizeCategory::Weapon });
            return Ok(());
        }
        let spec = candidates[self.rng.index(candidates.len())];

        let combatant = self.state.get_mut(actor)?;
        let Some(raider) = combatant.as_raider_mut() else {
            self.push(OutcomeEvent::FoundNothing { actor, category: PrizeCategory::Weapon });
            return Ok(());
        };
        raider.stock_weapon(spec.id, spec.usage_limit);
        self.push(OutcomeEvent::FoundWeapon { actor, weapon: spec.id, rarity: spec.rarity });
        Ok(())
    }

    pub(super) fn run_charge(&mut self, actor: CombatantId) -> Result<(), EngineError> {
        if self.actor_is_down(actor)? {
            return Ok(());
        }
        let combatant = self.state.get_mut(actor)?;
        combatant.abilities.initiative_bonus =
            round2(combatant.abilities.initiative_bonus + CHARGE_INITIATIVE_BONUS);
        self.push(OutcomeEvent::Charged { actor });
        Ok(())
    }
}
