//! Battle roster loader.
//!
//! A roster describes one battle setup: board size and obstacles, the player
//! seats, and every unit with its stats and ability kit.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, bail};
use hexcombat_core::{
    AbilityKind, AbilitySlot, BattleState, CombatEngine, DamageMap, GridDimensions, GridLayout, Hex,
    Player, PlayerId, StatKind, Stats, Unit, UnitFlags, UnitId,
};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// Roster file layout.
///
/// ```ron
/// (
///     dimensions: (16, 9),
///     obstacles: [(7, 0), (7, 8)],
///     players: [(id: 0), (id: 1, plasma: 2)],
///     units: [
///         (
///             id: 1,
///             name: "Bruiser",
///             player: 0,
///             position: (3, 4),
///             size: 2,
///             stats: { health: 90, offense: 5, crush: 10 },
///             abilities: [
///                 (kind: StatBuff, title: "Bulk"),
///                 (kind: AreaStrike, title: "Mallet", damages: { "crush": 15 }, cost: 2),
///             ],
///         ),
///     ],
/// )
/// ```
#[derive(Debug, Clone, Deserialize)]
struct RosterRon {
    #[serde(default = "default_dimensions")]
    dimensions: (u32, u32),
    #[serde(default)]
    obstacles: Vec<(i32, i32)>,
    players: Vec<PlayerSpec>,
    units: Vec<UnitSpec>,
}

fn default_dimensions() -> (u32, u32) {
    let dimensions = GridDimensions::default();
    (dimensions.width, dimensions.height)
}

/// One player seat.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayerSpec {
    pub id: u8,
    #[serde(default)]
    pub plasma: u32,
}

/// One ability of a unit's kit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AbilitySpec {
    pub kind: AbilityKind,
    pub title: String,
    #[serde(default)]
    pub damages: DamageMap,
    #[serde(default)]
    pub cost: i32,
    #[serde(default)]
    pub upgraded: bool,
}

impl AbilitySpec {
    fn build(&self) -> AbilitySlot {
        let slot = AbilitySlot::new(self.kind, self.title.clone())
            .with_damages(self.damages.clone())
            .with_cost(self.cost);
        if self.upgraded { slot.upgraded() } else { slot }
    }
}

/// One unit as written in a roster file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnitSpec {
    pub id: u32,
    pub name: String,
    pub player: u8,
    pub position: (i32, i32),
    #[serde(default = "default_size")]
    pub size: u8,
    #[serde(default)]
    pub stats: BTreeMap<StatKind, i32>,
    #[serde(default)]
    pub abilities: Vec<AbilitySpec>,
    #[serde(default)]
    pub core: bool,
    /// Cannot be pushed.
    #[serde(default)]
    pub anchored: bool,
    #[serde(default)]
    pub fatigue_immune: bool,
    #[serde(default)]
    pub debuff_immune: bool,
}

fn default_size() -> u8 {
    1
}

impl UnitSpec {
    fn flags(&self) -> UnitFlags {
        let mut flags = UnitFlags::empty();
        flags.set(UnitFlags::MOVEABLE, !self.anchored);
        flags.set(UnitFlags::FATIGUE_IMMUNE, self.fatigue_immune);
        flags.set(UnitFlags::DEBUFF_IMMUNE, self.debuff_immune);
        flags
    }

    fn build(&self) -> LoadResult<Unit> {
        if !(1..=3).contains(&self.size) {
            bail!("unit {} has size {}, expected 1 to 3", self.id, self.size);
        }

        let stats = self
            .stats
            .iter()
            .fold(Stats::new(), |stats, (&kind, &value)| stats.with(kind, value))
            .with_flags(self.flags())
            .with_size(self.size);
        let mut unit = Unit::new(
            UnitId(self.id),
            self.name.clone(),
            PlayerId(self.player),
            Hex::new(self.position.0, self.position.1),
            stats,
        );
        for ability in &self.abilities {
            unit = unit
                .try_with_ability(ability.build())
                .with_context(|| format!("while adding ability {:?}", ability.title))?;
        }
        if self.core {
            unit = unit.as_core();
        }
        Ok(unit)
    }
}

/// A validated battle setup, ready to be deployed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    pub layout: GridLayout,
    pub players: Vec<Player>,
    pub units: Vec<Unit>,
}

impl Roster {
    /// Empty battle with the roster's board and seats, no units yet.
    pub fn battle(&self) -> BattleState {
        let mut state = BattleState::new(self.layout.clone());
        for player in &self.players {
            state.add_player(*player);
        }
        state
    }

    /// Summons every unit in file order so summon passives fire.
    pub fn deploy(self, engine: &mut CombatEngine<'_>) -> LoadResult<Vec<UnitId>> {
        self.units
            .into_iter()
            .map(|unit| {
                let id = unit.id;
                engine
                    .summon(unit)
                    .with_context(|| format!("Failed to deploy unit {id}"))
            })
            .collect()
    }
}

/// Loader for battle rosters from RON files.
pub struct RosterLoader;

impl RosterLoader {
    /// Load a roster from a RON file.
    pub fn load(path: &Path) -> LoadResult<Roster> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Parse and validate a roster from RON text.
    ///
    /// Seats must be unique, every unit must sit on a declared seat, and
    /// each seat may have at most one core unit.
    pub fn parse(content: &str) -> LoadResult<Roster> {
        let raw: RosterRon = ron::from_str(content).context("Failed to parse roster RON")?;

        let dimensions = GridDimensions::new(raw.dimensions.0, raw.dimensions.1);
        let mut layout = GridLayout::new(dimensions);
        for (x, y) in raw.obstacles {
            let hex = Hex::new(x, y);
            if !dimensions.contains(hex) {
                bail!(
                    "obstacle {hex} lies outside the {}x{} board",
                    dimensions.width,
                    dimensions.height
                );
            }
            layout = layout.with_obstacle(hex);
        }

        let mut seats = BTreeSet::new();
        for spec in &raw.players {
            if !seats.insert(spec.id) {
                bail!("player {} is declared twice", spec.id);
            }
        }
        let players = raw
            .players
            .iter()
            .map(|spec| Player::new(PlayerId(spec.id), spec.plasma))
            .collect();

        let mut cores = BTreeSet::new();
        let mut units = Vec::with_capacity(raw.units.len());
        for spec in &raw.units {
            if !seats.contains(&spec.player) {
                bail!("unit {} belongs to undeclared player {}", spec.id, spec.player);
            }
            if spec.core && !cores.insert(spec.player) {
                bail!("player {} has more than one core unit", spec.player);
            }
            units.push(spec.build()?);
        }

        tracing::debug!(
            players = seats.len(),
            units = units.len(),
            obstacles = layout.obstacles.len(),
            "roster parsed"
        );
        Ok(Roster {
            layout,
            players,
            units,
        })
    }
}
