//! Mutable per-round participant state: combatants, inventories, and the
//! snapshot the engine resolves against. Persistence is the caller's job; the
//! engine only ever sees a fully hydrated [`RoundState`].

use std::hash::Hasher;

use slotmap::SlotMap;
use xxhash_rust::xxh3::Xxh3;

use crate::abilities::{Abilities, round2};
use crate::content::{ContentPack, EnemySpec};
use crate::types::{CombatTrait, CombatantId, EngineError};

pub const MAX_HEALTH_KITS: usize = 3;

/// One owned weapon plus its remaining uses. `None` means unlimited.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeaponStock {
    pub weapon: &'static str,
    pub remaining_uses: Option<u32>,
}

#[derive(Clone, Debug, Default)]
pub struct RaiderState {
    pub weapons: Vec<WeaponStock>,
    pub armor: Option<&'static str>,
    pub health_kits: Vec<&'static str>,
    /// Perk id to owned quantity. Quantity stacks the perk's contribution.
    pub perks: Vec<(&'static str, u32)>,
}

impl RaiderState {
    pub fn weapon_stock(&self, weapon: &str) -> Option<&WeaponStock> {
        self.weapons.iter().find(|stock| stock.weapon == weapon)
    }

    pub fn weapon_stock_mut(&mut self, weapon: &str) -> Option<&mut WeaponStock> {
        self.weapons.iter_mut().find(|stock| stock.weapon == weapon)
    }

    /// Add a weapon, stacking ammo onto an existing copy instead of holding
    /// duplicates.
    pub fn stock_weapon(&mut self, weapon: &'static str, uses: Option<u32>) {
        match self.weapon_stock_mut(weapon) {
            Some(stock) => {
                stock.remaining_uses = match (stock.remaining_uses, uses) {
                    (Some(have), Some(add)) => Some(have + add),
                    _ => None,
                };
            }
            None => self.weapons.push(WeaponStock { weapon, remaining_uses: uses }),
        }
    }

    pub fn health_kits_full(&self) -> bool {
        self.health_kits.len() >= MAX_HEALTH_KITS
    }

    pub fn take_health_kit(&mut self) -> Option<&'static str> {
        self.health_kits.pop()
    }

    pub fn grant_perk(&mut self, perk: &'static str) {
        match self.perks.iter_mut().find(|(id, _)| *id == perk) {
            Some((_, quantity)) => *quantity += 1,
            None => self.perks.push((perk, 1)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct EnemyState {
    pub template: &'static str,
    pub pattern_cursor: usize,
    pub pattern_repeats: u32,
}

#[derive(Clone, Debug)]
pub enum CombatantKind {
    Raider(RaiderState),
    Enemy(EnemyState),
}

#[derive(Clone, Debug)]
pub struct Combatant {
    pub name: String,
    pub health: i32,
    pub max_health: i32,
    pub visible: bool,
    /// Baseline modifiers. Perk contributions are resolved on top of this per
    /// action; only persistent effects (initiative momentum, charge) write
    /// back into it.
    pub abilities: Abilities,
    pub luck_boost: f64,
    pub kind: CombatantKind,
    /// Whether the combatant has been hit since they last took a turn. Only
    /// combatants with this set are stun-checked.
    pub hit_since_last_turn: bool,
    /// Attacker stun rates accumulated from hits taken since this combatant
    /// last acted. Drained by the stun check at their next turn.
    pub pending_stun_rate: f64,
}

impl Combatant {
    pub fn raider(name: impl Into<String>, max_health: i32) -> Self {
        Self {
            name: name.into(),
            health: max_health,
            max_health,
            visible: true,
            abilities: Abilities::default(),
            luck_boost: 0.0,
            kind: CombatantKind::Raider(RaiderState::default()),
            hit_since_last_turn: false,
            pending_stun_rate: 0.0,
        }
    }

    pub fn enemy_from_spec(spec: &EnemySpec) -> Self {
        Self {
            name: spec.name.to_string(),
            health: spec.max_health,
            max_health: spec.max_health,
            visible: true,
            abilities: spec.abilities,
            luck_boost: 0.0,
            kind: CombatantKind::Enemy(EnemyState {
                template: spec.id,
                pattern_cursor: 0,
                pattern_repeats: 0,
            }),
            hit_since_last_turn: false,
            pending_stun_rate: 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_raider(&self) -> bool {
        matches!(self.kind, CombatantKind::Raider(_))
    }

    pub fn as_raider(&self) -> Option<&RaiderState> {
        match &self.kind {
            CombatantKind::Raider(raider) => Some(raider),
            CombatantKind::Enemy(_) => None,
        }
    }

    pub fn as_raider_mut(&mut self) -> Option<&mut RaiderState> {
        match &mut self.kind {
            CombatantKind::Raider(raider) => Some(raider),
            CombatantKind::Enemy(_) => None,
        }
    }

    pub fn as_enemy(&self) -> Option<&EnemyState> {
        match &self.kind {
            CombatantKind::Enemy(enemy) => Some(enemy),
            CombatantKind::Raider(_) => None,
        }
    }

    pub fn as_enemy_mut(&mut self) -> Option<&mut EnemyState> {
        match &mut self.kind {
            CombatantKind::Enemy(enemy) => Some(enemy),
            CombatantKind::Raider(_) => None,
        }
    }

    /// Traits the combatant brings to a strike independent of any weapon.
    /// Raiders get traits from the weapon they swing; enemies from their
    /// template.
    pub fn innate_traits<'a>(&self, content: &'a ContentPack) -> &'a [CombatTrait] {
        match &self.kind {
            CombatantKind::Raider(_) => &[],
            CombatantKind::Enemy(enemy) => content
                .enemies
                .iter()
                .find(|spec| spec.id == enemy.template)
                .map_or(&[], |spec| spec.traits),
        }
    }

    /// Record a landed hit for the stun check at this combatant's next turn.
    pub fn note_hit_taken(&mut self, attacker_stun_rate: f64) {
        self.hit_since_last_turn = true;
        self.pending_stun_rate = round2(self.pending_stun_rate + attacker_stun_rate.max(0.0));
    }

    /// Consume the accumulated stun pressure when the combatant takes a turn.
    pub fn drain_stun_pressure(&mut self) -> f64 {
        let pressure = self.pending_stun_rate;
        self.hit_since_last_turn = false;
        self.pending_stun_rate = 0.0;
        pressure
    }

    /// Apply damage, clamping at zero. Returns true if this strike downed the
    /// combatant.
    pub fn apply_damage(&mut self, amount: i32) -> bool {
        let was_alive = self.is_alive();
        self.health = (self.health - amount.max(0)).max(0);
        was_alive && !self.is_alive()
    }

    /// Heal, clamping at max health. Returns the amount actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = (self.health + amount.max(0)).min(self.max_health);
        self.health - before
    }
}

#[derive(Clone)]
pub struct RoundState {
    pub combatants: SlotMap<CombatantId, Combatant>,
    pub floor: u32,
}

impl RoundState {
    pub fn new(floor: u32) -> Self {
        Self { combatants: SlotMap::with_key(), floor }
    }

    pub fn spawn(&mut self, combatant: Combatant) -> CombatantId {
        self.combatants.insert(combatant)
    }

    pub fn spawn_enemy(
        &mut self,
        content: &ContentPack,
        template: &str,
    ) -> Result<CombatantId, EngineError> {
        let spec = content.enemy(template)?;
        Ok(self.combatants.insert(Combatant::enemy_from_spec(spec)))
    }

    pub fn get(&self, id: CombatantId) -> Result<&Combatant, EngineError> {
        self.combatants.get(id).ok_or(EngineError::MissingCombatant)
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Result<&mut Combatant, EngineError> {
        self.combatants.get_mut(id).ok_or(EngineError::MissingCombatant)
    }

    pub fn living_raiders(&self) -> impl Iterator<Item = (CombatantId, &Combatant)> {
        self.combatants.iter().filter(|(_, c)| c.is_raider() && c.is_alive())
    }

    pub fn living_enemies(&self) -> impl Iterator<Item = (CombatantId, &Combatant)> {
        self.combatants.iter().filter(|(_, c)| !c.is_raider() && c.is_alive())
    }

    pub fn floor_cleared(&self) -> bool {
        self.living_enemies().next().is_none()
    }

    pub fn all_raiders_down(&self) -> bool {
        self.living_raiders().next().is_none()
    }

    /// Entering a new floor: full health, visible, baseline abilities, fresh
    /// enemy pattern cursors. Initiative momentum does not survive the climb.
    pub fn reset_for_floor(&mut self, content: &ContentPack, floor: u32) {
        self.floor = floor;
        for combatant in self.combatants.values_mut() {
            combatant.health = combatant.max_health;
            combatant.visible = true;
            combatant.hit_since_last_turn = false;
            combatant.pending_stun_rate = 0.0;
            match &mut combatant.kind {
                CombatantKind::Raider(_) => combatant.abilities = Abilities::default(),
                CombatantKind::Enemy(enemy) => {
                    enemy.pattern_cursor = 0;
                    enemy.pattern_repeats = 0;
                    if let Ok(spec) = content.enemy(enemy.template) {
                        combatant.abilities = spec.abilities;
                    }
                }
            }
        }
    }

    /// Stable hash over everything round resolution can mutate. Replay
    /// verification compares this across live and replayed rounds.
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u32(self.floor);
        hasher.write_u64(self.combatants.len() as u64);
        for (_, combatant) in &self.combatants {
            hasher.write(combatant.name.as_bytes());
            hasher.write_i32(combatant.health);
            hasher.write_i32(combatant.max_health);
            hasher.write_u8(u8::from(combatant.visible));
            hasher.write_u8(u8::from(combatant.hit_since_last_turn));
            hash_f64(&mut hasher, combatant.luck_boost);
            hash_f64(&mut hasher, combatant.pending_stun_rate);
            hash_abilities(&mut hasher, &combatant.abilities);
            match &combatant.kind {
                CombatantKind::Raider(raider) => {
                    hasher.write_u8(0);
                    // Sections and ids are length-prefixed; concatenation
                    // alone is ambiguous across section boundaries.
                    hasher.write_u64(raider.weapons.len() as u64);
                    for stock in &raider.weapons {
                        hasher.write_u64(stock.weapon.len() as u64);
                        hasher.write(stock.weapon.as_bytes());
                        hasher.write_u32(stock.remaining_uses.map_or(u32::MAX, |uses| uses));
                    }
                    hasher.write_u8(u8::from(raider.armor.is_some()));
                    if let Some(armor) = raider.armor {
                        hasher.write_u64(armor.len() as u64);
                        hasher.write(armor.as_bytes());
                    }
                    hasher.write_u64(raider.health_kits.len() as u64);
                    for kit in &raider.health_kits {
                        hasher.write_u64(kit.len() as u64);
                        hasher.write(kit.as_bytes());
                    }
                    hasher.write_u64(raider.perks.len() as u64);
                    for (perk, quantity) in &raider.perks {
                        hasher.write_u64(perk.len() as u64);
                        hasher.write(perk.as_bytes());
                        hasher.write_u32(*quantity);
                    }
                }
                CombatantKind::Enemy(enemy) => {
                    hasher.write_u8(1);
                    hasher.write(enemy.template.as_bytes());
                    hasher.write_u64(enemy.pattern_cursor as u64);
                    hasher.write_u32(enemy.pattern_repeats);
                }
            }
        }
        hasher.finish()
    }
}

fn hash_f64(hasher: &mut Xxh3, value: f64) {
    hasher.write_u64(value.to_bits());
}

fn hash_abilities(hasher: &mut Xxh3, abilities: &Abilities) {
    for value in [
        abilities.attack,
        abilities.defense,
        abilities.attack_rate,
        abilities.defense_rate,
        abilities.accuracy_rate,
        abilities.evade_rate,
        abilities.stun_block_rate,
        abilities.stun_rate,
        abilities.weapon_search_rate,
        abilities.armor_search_rate,
        abilities.health_kit_search_rate,
        abilities.initiative,
        abilities.initiative_bonus,
        abilities.healing_rate,
        abilities.rarity_rate,
    ] {
        hash_f64(hasher, value);
    }
}
