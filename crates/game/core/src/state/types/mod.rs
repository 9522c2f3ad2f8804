pub mod abilities;
pub mod common;
pub mod effect;
pub mod player;
pub mod stats;
pub mod unit;
pub mod vitals;

pub use abilities::{AbilityKind, AbilitySlot, AbilitySlots, Trigger};
pub use common::{Hex, PlayerId, Round, UnitId};
pub use effect::{Effect, EffectHook, EffectSet};
pub use player::Player;
pub use stats::{Alterations, StatKind, Stats, UnitFlags};
pub use unit::Unit;
pub use vitals::Vitals;
