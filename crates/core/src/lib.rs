pub mod abilities;
pub mod boundary;
pub mod content;
pub mod journal;
pub mod loot;
pub mod perks;
pub mod rarity;
pub mod replay;
pub mod rng;
pub mod round;
pub mod state;
pub mod types;

pub use abilities::Abilities;
pub use content::{ContentPack, keys};
pub use journal::{Journal, RecordedAction, RoundRecord};
pub use replay::*;
pub use rng::RoundRng;
pub use round::{PhaseSet, resolve_round, resolve_round_with_phases};
pub use state::{Combatant, CombatantKind, RaiderState, RoundState};
pub use types::*;
