//! Hunt phase: initiative ordering with the raider-favoring tie break,
//! visibility, stun checks, and strike resolution.

use super::*;
use crate::content::keys;
use crate::round::damage::{StrikeModifiers, resolve_strike, roll_base_damage};
use crate::round::{initiative, targeting};
use crate::state::Combatant;
use crate::types::{CombatTrait, has_trait};

/// Odds a raider wins an initiative tie against an enemy.
const RAIDER_TIE_BREAK_ODDS: f64 = 0.6;

/// Everything a strike needs from the attacker's weapon or template.
struct AttackProfile {
    /// Raider weapon the attack spends ammo from, if any.
    weapon: Option<&'static str>,
    minor: i32,
    major: i32,
    traits: &'static [CombatTrait],
}

fn hunt_payload(kind: &ActionKind) -> (Option<&'static str>, Option<CombatantId>) {
    match kind {
        ActionKind::Hunt { weapon, pinned_target } => (*weapon, *pinned_target),
        _ => (None, None),
    }
}

impl RoundSim<'_> {
    pub(super) fn run_hunt(&mut self, actions: &mut [RoundAction]) -> Result<(), EngineError> {
        let hunt_indices: Vec<usize> = actions
            .iter()
            .enumerate()
            .filter(|(_, action)| {
                !action.completed && matches!(action.kind, ActionKind::Hunt { .. })
            })
            .map(|(index, _)| index)
            .collect();
        let ordered = self.order_by_initiative(&hunt_indices, actions)?;
        self.reveal_non_stealth_hunters(&ordered, actions)?;

        let total = ordered.len();
        for (position, &index) in ordered.iter().enumerate() {
            let actor = actions[index].actor;
            let (weapon, pinned) = hunt_payload(&actions[index].kind);
            self.resolve_hunt_turn(actor, weapon, pinned, position, total)?;
            actions[index].completed = true;
        }
        Ok(())
    }

    /// Descending initiative; ties break by weighted coin flip, 60/40 in the
    /// raider's favor against an enemy and even between same-side actors.
    fn order_by_initiative(
        &mut self,
        indices: &[usize],
        actions: &[RoundAction],
    ) -> Result<Vec<usize>, EngineError> {
        let mut pending: Vec<(usize, f64, bool)> = Vec::with_capacity(indices.len());
        for &index in indices {
            let combatant = self.state.get(actions[index].actor)?;
            // Perk-granted initiative counts toward ordering; turn-position
            // gates cannot fire yet because no order exists.
            let resolved =
                perks::resolve_abilities(self.content, combatant, PerkContext::default())?;
            pending.push((index, resolved.turn_order_weight(), combatant.is_raider()));
        }
        let mut ordered = Vec::with_capacity(pending.len());
        while !pending.is_empty() {
            let mut best = 0;
            for candidate in 1..pending.len() {
                let (_, candidate_weight, candidate_is_raider) = pending[candidate];
                let (_, best_weight, best_is_raider) = pending[best];
                if candidate_weight > best_weight {
                    best = candidate;
                } else if candidate_weight == best_weight {
                    let odds = match (candidate_is_raider, best_is_raider) {
                        (true, false) => RAIDER_TIE_BREAK_ODDS,
                        (false, true) => 1.0 - RAIDER_TIE_BREAK_ODDS,
                        _ => 0.5,
                    };
                    if self.rng.chance(odds) {
                        best = candidate;
                    }
                }
            }
            ordered.push(pending.remove(best).0);
        }
        Ok(ordered)
    }

    /// Visibility pass: everyone hunting without a stealth weapon steps into
    /// the open before any damage lands.
    fn reveal_non_stealth_hunters(
        &mut self,
        ordered: &[usize],
        actions: &[RoundAction],
    ) -> Result<(), EngineError> {
        for &index in ordered {
            let actor = actions[index].actor;
            let (weapon, _) = hunt_payload(&actions[index].kind);
            let traits = self.attack_traits(actor, weapon)?;
            if !has_trait(traits, CombatTrait::Stealth) {
                self.state.get_mut(actor)?.visible = true;
            }
        }
        Ok(())
    }

    /// Traits of the weapon or template this hunt would swing, independent of
    /// ammo or ownership.
    fn attack_traits(
        &self,
        actor: CombatantId,
        weapon: Option<&'static str>,
    ) -> Result<&'static [CombatTrait], EngineError> {
        let combatant = self.state.get(actor)?;
        if combatant.is_raider() {
            let id = weapon.unwrap_or(keys::WEAPON_BARE_FISTS);
            Ok(self.content.weapon(id)?.traits)
        } else {
            Ok(self.content.enemy(combatant.as_enemy().map_or("", |enemy| enemy.template))?.traits)
        }
    }

    fn attack_profile(
        &self,
        combatant: &Combatant,
        weapon: Option<&'static str>,
    ) -> Result<AttackProfile, EngineError> {
        if let Some(enemy) = combatant.as_enemy() {
            let spec = self.content.enemy(enemy.template)?;
            return Ok(AttackProfile {
                weapon: None,
                minor: spec.minor_damage,
                major: spec.major_damage,
                traits: spec.traits,
            });
        }
        let id = weapon.unwrap_or(keys::WEAPON_BARE_FISTS);
        let spec = self.content.weapon(id)?;
        Ok(AttackProfile {
            weapon: spec.usage_limit.map(|_| spec.id),
            minor: spec.minor_damage,
            major: spec.major_damage,
            traits: spec.traits,
        })
    }

    fn resolve_hunt_turn(
        &mut self,
        actor: CombatantId,
        weapon: Option<&'static str>,
        pinned: Option<CombatantId>,
        position: usize,
        total: usize,
    ) -> Result<(), EngineError> {
        if !self.state.get(actor)?.is_alive() {
            self.push(OutcomeEvent::ActionSkipped { actor, reason: SkipReason::ActorDown });
            return Ok(());
        }

        let resolved = perks::resolve_abilities(
            self.content,
            self.state.get(actor)?,
            PerkContext::with_turn_order(position, total),
        )?;

        // Stun check: damage taken since the last turn may cost this one.
        let combatant = self.state.get_mut(actor)?;
        if combatant.hit_since_last_turn {
            let pressure = combatant.drain_stun_pressure();
            let lose_odds =
                (BASE_STUN_RATE + pressure - resolved.stun_block_rate).clamp(0.0, 1.0);
            if self.rng.chance(lose_odds) {
                self.push(OutcomeEvent::ActionLost { actor });
                return Ok(());
            }
        }

        let attacker = self.state.get(actor)?;
        let profile = self.attack_profile(attacker, weapon)?;
        if attacker.is_raider()
            && let Some(weapon_id) = weapon
        {
            match attacker.as_raider().and_then(|raider| raider.weapon_stock(weapon_id)) {
                None => {
                    self.push(OutcomeEvent::ActionSkipped {
                        actor,
                        reason: SkipReason::WeaponNotOwned,
                    });
                    return Ok(());
                }
                Some(stock) if stock.remaining_uses == Some(0) => {
                    self.push(OutcomeEvent::NeedsWeapon { actor, weapon: weapon_id });
                    return Ok(());
                }
                Some(_) => {}
            }
        }

        let attacker_is_raider = attacker.is_raider();
        let can_see_hidden = has_trait(profile.traits, CombatTrait::Detect);
        let pool: Vec<CombatantId> = self
            .state
            .combatants
            .iter()
            .filter(|(_, candidate)| {
                candidate.is_raider() != attacker_is_raider
                    && candidate.is_alive()
                    && (candidate.visible || can_see_hidden)
            })
            .map(|(id, _)| id)
            .collect();
        if pool.is_empty() {
            self.push(OutcomeEvent::NobodyToHunt { actor });
            return Ok(());
        }

        let selection = targeting::select_targets(&mut self.rng, profile.traits, &pool, pinned);
        for &target in &selection.targets {
            self.resolve_strikes(actor, target, &resolved, &profile, selection.hits)?;
        }

        // Attacking without stealth leaves the actor exposed.
        if !has_trait(profile.traits, CombatTrait::Stealth) {
            self.state.get_mut(actor)?.visible = true;
        }
        if let Some(weapon_id) = profile.weapon
            && let Some(stock) = self
                .state
                .get_mut(actor)?
                .as_raider_mut()
                .and_then(|raider| raider.weapon_stock_mut(weapon_id))
            && let Some(uses) = stock.remaining_uses.as_mut()
        {
            *uses = uses.saturating_sub(1);
        }
        Ok(())
    }

    /// All strikes of one attacker against one target, death-checked before
    /// each swing, with armor break applied after the last landed strike.
    fn resolve_strikes(
        &mut self,
        actor: CombatantId,
        target: CombatantId,
        attacker_abilities: &Abilities,
        profile: &AttackProfile,
        hits: u32,
    ) -> Result<(), EngineError> {
        let ignores_armor = has_trait(profile.traits, CombatTrait::Piercing);
        let accuracy = attacker_abilities.accuracy_rate
            + if has_trait(profile.traits, CombatTrait::Precision) {
                PRECISION_ACCURACY_BONUS
            } else {
                0.0
            };

        let mut any_landed = false;
        for _ in 0..hits {
            let defender = self.state.get(target)?;
            if !defender.is_alive() {
                break;
            }
            let defender_abilities =
                perks::resolve_abilities(self.content, defender, PerkContext::default())?;
            let evade_odds =
                (defender_abilities.evade_rate - accuracy).clamp(0.0, MAX_EVADE_CHANCE);
            if self.rng.chance(evade_odds) {
                self.push(OutcomeEvent::Evaded { attacker: actor, target });
                continue;
            }

            let raider_is_target = defender.is_raider();
            let armor_spec = defender
                .as_raider()
                .and_then(|raider| raider.armor)
                .and_then(|id| self.content.armor(id).ok());
            let base_roll = roll_base_damage(&mut self.rng, profile.minor, profile.major);
            let outcome = resolve_strike(
                base_roll,
                &StrikeModifiers {
                    attacker: attacker_abilities,
                    defender: &defender_abilities,
                    defender_armor: armor_spec,
                    raider_is_target,
                    ignores_armor,
                },
            );
            let applied = outcome.applied_damage();

            let struck = self.state.get_mut(target)?;
            let downed = struck.apply_damage(applied);
            struck.note_hit_taken(attacker_abilities.stun_rate);
            any_landed = true;
            self.push(OutcomeEvent::Attacked { attacker: actor, target, outcome });
            initiative::register_hit(
                self.state,
                actor,
                target,
                applied,
                profile.minor,
                profile.major,
            )?;
            if downed {
                self.push(OutcomeEvent::Downed { target, by: actor });
            }
        }

        // Armor only shatters under a strike that actually connected.
        if any_landed && has_trait(profile.traits, CombatTrait::ArmorBreak) {
            let struck = self.state.get_mut(target)?;
            if let Some(raider) = struck.as_raider_mut()
                && let Some(armor_id) = raider.armor.take()
            {
                self.push(OutcomeEvent::ArmorBroken {
                    attacker: actor,
                    target,
                    armor: armor_id,
                });
            }
        }
        Ok(())
    }
}
