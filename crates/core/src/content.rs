//! Static content pack: weapon/armor/health-kit definitions, perks, and
//! enemy templates. Item definitions are immutable; only per-inventory
//! remaining-uses state lives on combatants.

use crate::abilities::Abilities;
use crate::types::{CombatTrait, EngineError, Rarity};

pub mod keys {
    pub const WEAPON_BARE_FISTS: &str = "weapon_bare_fists";
    pub const WEAPON_RUSTY_PIPE: &str = "weapon_rusty_pipe";
    pub const WEAPON_KITCHEN_KNIFE: &str = "weapon_kitchen_knife";
    pub const WEAPON_HUNTING_BOW: &str = "weapon_hunting_bow";
    pub const WEAPON_TWIN_DAGGERS: &str = "weapon_twin_daggers";
    pub const WEAPON_SLEDGEHAMMER: &str = "weapon_sledgehammer";
    pub const WEAPON_FRAG_GRENADE: &str = "weapon_frag_grenade";
    pub const WEAPON_SILENCED_PISTOL: &str = "weapon_silenced_pistol";
    pub const WEAPON_SMART_RIFLE: &str = "weapon_smart_rifle";
    pub const WEAPON_RAILGUN: &str = "weapon_railgun";
    pub const WEAPON_DRAGONFIRE_CANNON: &str = "weapon_dragonfire_cannon";

    pub const ARMOR_LEATHER_JACKET: &str = "armor_leather_jacket";
    pub const ARMOR_RIOT_SHIELD: &str = "armor_riot_shield";
    pub const ARMOR_COMBAT_PLATE: &str = "armor_combat_plate";
    pub const ARMOR_AEGIS_EXOSUIT: &str = "armor_aegis_exosuit";

    pub const KIT_BANDAGE: &str = "kit_bandage";
    pub const KIT_FIRST_AID: &str = "kit_first_aid";
    pub const KIT_TRAUMA_KIT: &str = "kit_trauma_kit";
    pub const KIT_NANO_INJECTOR: &str = "kit_nano_injector";

    pub const PERK_BRAWLER: &str = "perk_brawler";
    pub const PERK_BULWARK: &str = "perk_bulwark";
    pub const PERK_SCAVENGER: &str = "perk_scavenger";
    pub const PERK_SPRINTER: &str = "perk_sprinter";
    pub const PERK_VIGOR: &str = "perk_vigor";
    pub const PERK_ADRENALINE: &str = "perk_adrenaline";
    pub const PERK_OPPORTUNIST: &str = "perk_opportunist";

    pub const ENEMY_TOWER_RAT: &str = "enemy_tower_rat";
    pub const ENEMY_WARDEN_DRONE: &str = "enemy_warden_drone";
    pub const ENEMY_PHANTOM: &str = "enemy_phantom";
    pub const ENEMY_SIEGE_GOLEM: &str = "enemy_siege_golem";
    pub const ENEMY_FLOOR_TYRANT: &str = "enemy_floor_tyrant";
}

#[derive(Clone, Debug)]
pub struct WeaponSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub rarity: Rarity,
    pub minor_damage: i32,
    pub major_damage: i32,
    /// `None` means unlimited uses.
    pub usage_limit: Option<u32>,
    pub traits: &'static [CombatTrait],
}

#[derive(Clone, Debug)]
pub struct ArmorSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub rarity: Rarity,
    /// Fraction of incoming damage removed while equipped, unless pierced.
    pub reduction_rate: f64,
}

#[derive(Clone, Debug)]
pub struct HealthKitSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub rarity: Rarity,
    pub heal_amount: i32,
}

/// Conditional gate on a perk. Health tiers are ratios of max health, ordered
/// weakest to strongest; turn-order gating measures distance from the end of
/// the hunt order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PerkGate {
    Unconditional,
    HighHealth { tiers: [f64; 3] },
    LowHealth { tiers: [f64; 3] },
    LastToAct,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PerkArchetype {
    Offense,
    Defense,
    Utility,
}

#[derive(Clone, Debug)]
pub struct PerkSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub rarity: Rarity,
    pub archetype: PerkArchetype,
    pub abilities: Abilities,
    pub gate: PerkGate,
    /// Tier-3 scaling for conditional perks; ignored for unconditional ones.
    pub gate_multiplier: f64,
}

#[derive(Clone, Debug)]
pub struct EnemySpec {
    pub id: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub max_health: i32,
    pub minor_damage: i32,
    pub major_damage: i32,
    pub traits: &'static [CombatTrait],
    /// Cyclic action script: `A` hunt, `H` hide, `C` charge.
    pub pattern: &'static str,
    pub abilities: Abilities,
}

pub struct ContentPack {
    pub weapons: Vec<WeaponSpec>,
    pub armors: Vec<ArmorSpec>,
    pub health_kits: Vec<HealthKitSpec>,
    pub perks: Vec<PerkSpec>,
    pub enemies: Vec<EnemySpec>,
}

impl ContentPack {
    pub fn build_default() -> Self {
        Self {
            weapons: vec![
                WeaponSpec {
                    id: keys::WEAPON_BARE_FISTS,
                    name: "Bare Fists",
                    emoji: ":facepunch:",
                    rarity: Rarity::Common,
                    minor_damage: 3,
                    major_damage: 6,
                    usage_limit: None,
                    traits: &[CombatTrait::Initial, CombatTrait::Unsearchable],
                },
                WeaponSpec {
                    id: keys::WEAPON_RUSTY_PIPE,
                    name: "Rusty Pipe",
                    emoji: ":wrench:",
                    rarity: Rarity::Common,
                    minor_damage: 8,
                    major_damage: 14,
                    usage_limit: Some(6),
                    traits: &[],
                },
                WeaponSpec {
                    id: keys::WEAPON_KITCHEN_KNIFE,
                    name: "Kitchen Knife",
                    emoji: ":hocho:",
                    rarity: Rarity::Common,
                    minor_damage: 6,
                    major_damage: 12,
                    usage_limit: Some(8),
                    traits: &[CombatTrait::Precision],
                },
                WeaponSpec {
                    id: keys::WEAPON_HUNTING_BOW,
                    name: "Hunting Bow",
                    emoji: ":bow_and_arrow:",
                    rarity: Rarity::Rare,
                    minor_damage: 10,
                    major_damage: 18,
                    usage_limit: Some(5),
                    traits: &[CombatTrait::Precision],
                },
                WeaponSpec {
                    id: keys::WEAPON_TWIN_DAGGERS,
                    name: "Twin Daggers",
                    emoji: ":dagger_knife:",
                    rarity: Rarity::Rare,
                    minor_damage: 7,
                    major_damage: 12,
                    usage_limit: Some(6),
                    traits: &[CombatTrait::DualStrike],
                },
                WeaponSpec {
                    id: keys::WEAPON_SLEDGEHAMMER,
                    name: "Sledgehammer",
                    emoji: ":hammer:",
                    rarity: Rarity::Rare,
                    minor_damage: 12,
                    major_damage: 22,
                    usage_limit: Some(4),
                    traits: &[CombatTrait::ArmorBreak],
                },
                WeaponSpec {
                    id: keys::WEAPON_FRAG_GRENADE,
                    name: "Frag Grenade",
                    emoji: ":bomb:",
                    rarity: Rarity::Epic,
                    minor_damage: 12,
                    major_damage: 20,
                    usage_limit: Some(2),
                    traits: &[CombatTrait::Blast3],
                },
                WeaponSpec {
                    id: keys::WEAPON_SILENCED_PISTOL,
                    name: "Silenced Pistol",
                    emoji: ":gun:",
                    rarity: Rarity::Epic,
                    minor_damage: 11,
                    major_damage: 19,
                    usage_limit: Some(4),
                    traits: &[CombatTrait::Stealth],
                },
                WeaponSpec {
                    id: keys::WEAPON_SMART_RIFLE,
                    name: "Smart Rifle",
                    emoji: ":dart:",
                    rarity: Rarity::Epic,
                    minor_damage: 10,
                    major_damage: 17,
                    usage_limit: Some(5),
                    traits: &[CombatTrait::Detect, CombatTrait::Precision],
                },
                WeaponSpec {
                    id: keys::WEAPON_RAILGUN,
                    name: "Railgun",
                    emoji: ":zap:",
                    rarity: Rarity::Legendary,
                    minor_damage: 18,
                    major_damage: 30,
                    usage_limit: Some(3),
                    traits: &[CombatTrait::Piercing],
                },
                WeaponSpec {
                    id: keys::WEAPON_DRAGONFIRE_CANNON,
                    name: "Dragonfire Cannon",
                    emoji: ":fire:",
                    rarity: Rarity::Legendary,
                    minor_damage: 16,
                    major_damage: 28,
                    usage_limit: Some(2),
                    traits: &[CombatTrait::BlastAll],
                },
            ],
            armors: vec![
                ArmorSpec {
                    id: keys::ARMOR_LEATHER_JACKET,
                    name: "Leather Jacket",
                    emoji: ":coat:",
                    rarity: Rarity::Common,
                    reduction_rate: 0.15,
                },
                ArmorSpec {
                    id: keys::ARMOR_RIOT_SHIELD,
                    name: "Riot Shield",
                    emoji: ":shield:",
                    rarity: Rarity::Rare,
                    reduction_rate: 0.3,
                },
                ArmorSpec {
                    id: keys::ARMOR_COMBAT_PLATE,
                    name: "Combat Plate",
                    emoji: ":mechanical_arm:",
                    rarity: Rarity::Epic,
                    reduction_rate: 0.5,
                },
                ArmorSpec {
                    id: keys::ARMOR_AEGIS_EXOSUIT,
                    name: "Aegis Exosuit",
                    emoji: ":robot_face:",
                    rarity: Rarity::Legendary,
                    reduction_rate: 0.7,
                },
            ],
            health_kits: vec![
                HealthKitSpec {
                    id: keys::KIT_BANDAGE,
                    name: "Bandage",
                    emoji: ":adhesive_bandage:",
                    rarity: Rarity::Common,
                    heal_amount: 10,
                },
                HealthKitSpec {
                    id: keys::KIT_FIRST_AID,
                    name: "First Aid Kit",
                    emoji: ":medical_symbol:",
                    rarity: Rarity::Rare,
                    heal_amount: 25,
                },
                HealthKitSpec {
                    id: keys::KIT_TRAUMA_KIT,
                    name: "Trauma Kit",
                    emoji: ":ambulance:",
                    rarity: Rarity::Epic,
                    heal_amount: 50,
                },
                HealthKitSpec {
                    id: keys::KIT_NANO_INJECTOR,
                    name: "Nano Injector",
                    emoji: ":syringe:",
                    rarity: Rarity::Legendary,
                    heal_amount: 100,
                },
            ],
            perks: vec![
                PerkSpec {
                    id: keys::PERK_BRAWLER,
                    name: "Brawler",
                    emoji: ":boxing_glove:",
                    rarity: Rarity::Common,
                    archetype: PerkArchetype::Offense,
                    abilities: Abilities {
                        attack: 2.0,
                        attack_rate: 0.1,
                        ..Abilities::default()
                    },
                    gate: PerkGate::Unconditional,
                    gate_multiplier: 1.0,
                },
                PerkSpec {
                    id: keys::PERK_BULWARK,
                    name: "Bulwark",
                    emoji: ":bricks:",
                    rarity: Rarity::Common,
                    archetype: PerkArchetype::Defense,
                    abilities: Abilities {
                        defense: 2.0,
                        defense_rate: 0.1,
                        stun_block_rate: 0.05,
                        ..Abilities::default()
                    },
                    gate: PerkGate::Unconditional,
                    gate_multiplier: 1.0,
                },
                PerkSpec {
                    id: keys::PERK_SCAVENGER,
                    name: "Scavenger",
                    emoji: ":mag:",
                    rarity: Rarity::Rare,
                    archetype: PerkArchetype::Utility,
                    abilities: Abilities {
                        weapon_search_rate: 0.1,
                        armor_search_rate: 0.1,
                        health_kit_search_rate: 0.1,
                        rarity_rate: 5.0,
                        ..Abilities::default()
                    },
                    gate: PerkGate::Unconditional,
                    gate_multiplier: 1.0,
                },
                PerkSpec {
                    id: keys::PERK_SPRINTER,
                    name: "Sprinter",
                    emoji: ":athletic_shoe:",
                    rarity: Rarity::Rare,
                    archetype: PerkArchetype::Utility,
                    abilities: Abilities {
                        initiative_bonus: 0.5,
                        evade_rate: 0.05,
                        ..Abilities::default()
                    },
                    gate: PerkGate::Unconditional,
                    gate_multiplier: 1.0,
                },
                PerkSpec {
                    id: keys::PERK_VIGOR,
                    name: "Vigor",
                    emoji: ":muscle:",
                    rarity: Rarity::Epic,
                    archetype: PerkArchetype::Offense,
                    abilities: Abilities {
                        attack: 3.0,
                        attack_rate: 0.15,
                        accuracy_rate: 0.1,
                        ..Abilities::default()
                    },
                    gate: PerkGate::HighHealth { tiers: [0.5, 0.75, 0.9] },
                    gate_multiplier: 2.0,
                },
                PerkSpec {
                    id: keys::PERK_ADRENALINE,
                    name: "Adrenaline",
                    emoji: ":heartpulse:",
                    rarity: Rarity::Epic,
                    archetype: PerkArchetype::Offense,
                    abilities: Abilities {
                        attack: 4.0,
                        evade_rate: 0.1,
                        stun_block_rate: 0.1,
                        ..Abilities::default()
                    },
                    gate: PerkGate::LowHealth { tiers: [0.5, 0.25, 0.1] },
                    gate_multiplier: 2.0,
                },
                PerkSpec {
                    id: keys::PERK_OPPORTUNIST,
                    name: "Opportunist",
                    emoji: ":crossed_swords:",
                    rarity: Rarity::Legendary,
                    archetype: PerkArchetype::Offense,
                    abilities: Abilities {
                        attack: 2.0,
                        attack_rate: 0.2,
                        accuracy_rate: 0.05,
                        ..Abilities::default()
                    },
                    gate: PerkGate::LastToAct,
                    gate_multiplier: 2.0,
                },
            ],
            enemies: vec![
                EnemySpec {
                    id: keys::ENEMY_TOWER_RAT,
                    name: "Tower Rat",
                    emoji: ":rat:",
                    max_health: 20,
                    minor_damage: 4,
                    major_damage: 8,
                    traits: &[],
                    pattern: "AAH",
                    abilities: Abilities::default(),
                },
                EnemySpec {
                    id: keys::ENEMY_WARDEN_DRONE,
                    name: "Warden Drone",
                    emoji: ":satellite:",
                    max_health: 30,
                    minor_damage: 6,
                    major_damage: 12,
                    traits: &[CombatTrait::Detect],
                    pattern: "ACA",
                    abilities: Abilities { accuracy_rate: 0.1, ..Abilities::default() },
                },
                EnemySpec {
                    id: keys::ENEMY_PHANTOM,
                    name: "Phantom",
                    emoji: ":ghost:",
                    max_health: 26,
                    minor_damage: 8,
                    major_damage: 14,
                    traits: &[CombatTrait::Stealth],
                    pattern: "HAA",
                    abilities: Abilities { evade_rate: 0.15, ..Abilities::default() },
                },
                EnemySpec {
                    id: keys::ENEMY_SIEGE_GOLEM,
                    name: "Siege Golem",
                    emoji: ":moyai:",
                    max_health: 60,
                    minor_damage: 10,
                    major_damage: 20,
                    traits: &[CombatTrait::ArmorBreak],
                    pattern: "CAA",
                    abilities: Abilities { stun_block_rate: 0.2, ..Abilities::default() },
                },
                EnemySpec {
                    id: keys::ENEMY_FLOOR_TYRANT,
                    name: "Floor Tyrant",
                    emoji: ":dragon_face:",
                    max_health: 90,
                    minor_damage: 14,
                    major_damage: 24,
                    traits: &[CombatTrait::Blast2, CombatTrait::Piercing],
                    pattern: "ACAA",
                    abilities: Abilities { stun_rate: 0.1, ..Abilities::default() },
                },
            ],
        }
    }

    pub fn weapon(&self, id: &str) -> Result<&WeaponSpec, EngineError> {
        self.weapons
            .iter()
            .find(|spec| spec.id == id)
            .ok_or_else(|| EngineError::UnknownWeapon(id.to_string()))
    }

    pub fn armor(&self, id: &str) -> Result<&ArmorSpec, EngineError> {
        self.armors
            .iter()
            .find(|spec| spec.id == id)
            .ok_or_else(|| EngineError::UnknownArmor(id.to_string()))
    }

    pub fn health_kit(&self, id: &str) -> Result<&HealthKitSpec, EngineError> {
        self.health_kits
            .iter()
            .find(|spec| spec.id == id)
            .ok_or_else(|| EngineError::UnknownHealthKit(id.to_string()))
    }

    pub fn perk(&self, id: &str) -> Result<&PerkSpec, EngineError> {
        self.perks
            .iter()
            .find(|spec| spec.id == id)
            .ok_or_else(|| EngineError::UnknownPerk(id.to_string()))
    }

    pub fn enemy(&self, id: &str) -> Result<&EnemySpec, EngineError> {
        self.enemies
            .iter()
            .find(|spec| spec.id == id)
            .ok_or_else(|| EngineError::UnknownEnemy(id.to_string()))
    }

    /// Weapons a search or loot roll may produce at the given rarity.
    pub fn searchable_weapons(&self, rarity: Rarity) -> Vec<&WeaponSpec> {
        self.weapons
            .iter()
            .filter(|spec| {
                spec.rarity == rarity
                    && !spec.traits.contains(&CombatTrait::Unsearchable)
                    && !spec.traits.contains(&CombatTrait::Initial)
            })
            .collect()
    }

    pub fn armors_of_rarity(&self, rarity: Rarity) -> Vec<&ArmorSpec> {
        self.armors.iter().filter(|spec| spec.rarity == rarity).collect()
    }

    pub fn health_kits_of_rarity(&self, rarity: Rarity) -> Vec<&HealthKitSpec> {
        self.health_kits.iter().filter(|spec| spec.rarity == rarity).collect()
    }

    pub fn perks_of_rarity(&self, rarity: Rarity) -> Vec<&PerkSpec> {
        self.perks.iter().filter(|spec| spec.rarity == rarity).collect()
    }
}

impl Default for ContentPack {
    fn default() -> Self {
        Self::build_default()
    }
}
