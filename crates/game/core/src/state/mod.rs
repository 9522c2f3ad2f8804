//! Authoritative battle state.
//!
//! This module owns the data structures that describe units, players and the
//! board. Callers read this state freely but mutate it through
//! [`crate::engine::CombatEngine`].
pub mod types;

pub use types::{
    AbilityKind, AbilitySlot, AbilitySlots, Alterations, Effect, EffectHook, EffectSet, Hex,
    Player, PlayerId, Round, StatKind, Stats, Trigger, Unit, UnitFlags, UnitId, Vitals,
};

use crate::error::CombatError;
use crate::grid::{Cell, GridDimensions, GridLayout, HexGrid};

/// Canonical snapshot of a battle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    pub layout: GridLayout,
    /// Every unit ever summoned, dead ones included, in summoning order.
    pub units: Vec<Unit>,
    pub players: Vec<Player>,
    pub round: Round,
}

impl BattleState {
    /// Creates an empty battle on `layout`, starting at the first round.
    pub fn new(layout: GridLayout) -> Self {
        Self {
            layout,
            units: Vec::new(),
            players: Vec::new(),
            round: Round::FIRST,
        }
    }

    /// Registers a player seat, replacing any previous entry for the same id.
    pub fn add_player(&mut self, player: Player) {
        match self.players.iter_mut().find(|p| p.id == player.id) {
            Some(existing) => *existing = player,
            None => self.players.push(player),
        }
    }

    /// Places `unit` on the board.
    ///
    /// The unit inherits the facing of its player seat. Fails if the id is
    /// taken or the footprint is not free.
    pub fn add_unit(&mut self, unit: Unit) -> Result<UnitId, CombatError> {
        if self.unit(unit.id).is_some() {
            return Err(CombatError::DuplicateUnit(unit.id));
        }
        let player = self
            .player(unit.player)
            .ok_or(CombatError::PlayerNotFound(unit.player))?;
        if !self.is_walkable(unit.position, unit.size(), unit.id) {
            return Err(CombatError::Blocked {
                unit: unit.id,
                hex: unit.position,
            });
        }
        let unit = unit.facing(player.flipped);
        let id = unit.id;
        self.units.push(unit);
        Ok(id)
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn living_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.is_alive())
    }

    /// Living unit covering `hex`, if any.
    pub fn unit_at(&self, hex: Hex) -> Option<&Unit> {
        self.living_units().find(|u| u.occupies(hex))
    }

    /// Designated core unit of `player`, if it is still alive.
    pub fn core_unit_of(&self, player: PlayerId) -> Option<&Unit> {
        self.living_units().find(|u| u.core && u.player == player)
    }

    /// SHA-256 digest of the bincode encoding of the whole state.
    ///
    /// Identical battles produce identical roots, which is what replays and
    /// peers compare.
    #[cfg(feature = "serde")]
    pub fn state_root(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        // bincode encoding of plain data is deterministic and cannot fail here.
        if let Ok(bytes) = bincode::serialize(self) {
            hasher.update(&bytes);
        }
        hasher.finalize().into()
    }
}

impl HexGrid for BattleState {
    fn dimensions(&self) -> GridDimensions {
        self.layout.dimensions
    }

    fn cell(&self, hex: Hex) -> Option<Cell> {
        if !self.layout.dimensions.contains(hex) {
            return None;
        }
        Some(Cell {
            hex,
            occupant: self.unit_at(hex).map(|u| u.id),
            obstacle: self.layout.is_obstacle(hex),
        })
    }
}
