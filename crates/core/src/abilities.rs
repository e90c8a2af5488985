//! Stat-modifier bundles and the rule for composing them.
//! A combatant's effective stats are always the sum of a baseline bundle and
//! any number of perk contributions folded in through [`Abilities::compose`].

/// Round to 2 decimal places. All rate accumulation in the engine is clamped
/// to this precision so composition order cannot leak float noise into
/// persisted state.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fixed schema of flat bonuses and rate (percentage) bonuses.
///
/// Flat fields: `attack`, `defense`, `initiative`, `initiative_bonus`.
/// Everything else is a rate in `[0, 1]`-ish space. Composition sums both
/// kinds; rates never multiply together.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Abilities {
    pub attack: f64,
    pub defense: f64,
    pub attack_rate: f64,
    pub defense_rate: f64,
    pub accuracy_rate: f64,
    pub evade_rate: f64,
    pub stun_block_rate: f64,
    pub stun_rate: f64,
    pub weapon_search_rate: f64,
    pub armor_search_rate: f64,
    pub health_kit_search_rate: f64,
    pub initiative: f64,
    pub initiative_bonus: f64,
    pub healing_rate: f64,
    pub rarity_rate: f64,
}

impl Abilities {
    /// Fold `other` into `self`, scaling the contribution by `multiplier`.
    /// Summation makes this associative and commutative for same-tier
    /// application order, which perk resolution relies on.
    pub fn compose(&mut self, other: &Abilities, multiplier: f64) {
        self.attack += other.attack * multiplier;
        self.defense += other.defense * multiplier;
        self.attack_rate += other.attack_rate * multiplier;
        self.defense_rate += other.defense_rate * multiplier;
        self.accuracy_rate += other.accuracy_rate * multiplier;
        self.evade_rate += other.evade_rate * multiplier;
        self.stun_block_rate += other.stun_block_rate * multiplier;
        self.stun_rate += other.stun_rate * multiplier;
        self.weapon_search_rate += other.weapon_search_rate * multiplier;
        self.armor_search_rate += other.armor_search_rate * multiplier;
        self.health_kit_search_rate += other.health_kit_search_rate * multiplier;
        self.initiative += other.initiative * multiplier;
        self.initiative_bonus += other.initiative_bonus * multiplier;
        self.healing_rate += other.healing_rate * multiplier;
        self.rarity_rate += other.rarity_rate * multiplier;
    }

    pub fn composed(&self, other: &Abilities, multiplier: f64) -> Abilities {
        let mut out = *self;
        out.compose(other, multiplier);
        out
    }

    /// Copy with every rate field zeroed. Tier-1 conditional perks contribute
    /// only their flat fields.
    pub fn flat_only(&self) -> Abilities {
        Abilities {
            attack: self.attack,
            defense: self.defense,
            initiative: self.initiative,
            initiative_bonus: self.initiative_bonus,
            ..Abilities::default()
        }
    }

    /// Whether this bundle would change an outgoing damage roll at all.
    pub fn has_attack_modifiers(&self) -> bool {
        self.attack != 0.0 || self.attack_rate != 0.0
    }

    pub fn has_flat_defense(&self) -> bool {
        self.defense != 0.0
    }

    /// Effective turn-order weight: persistent momentum plus granted bonus.
    pub fn turn_order_weight(&self) -> f64 {
        self.initiative + self.initiative_bonus
    }
}
