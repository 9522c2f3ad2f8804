//! End-to-end activation scenarios driven through the public engine API.

use hexcombat_core::{
    AbilityKind, AbilitySlot, BattleLog, BattleState, CombatConfig, CombatEngine, CombatError,
    Damage, DamageKey, Direction, GridLayout, Hex, MoveOptions, Player, PlayerId, ScoreEvent,
    StatKind, Stats, TargetQuery, Trigger, Unit, UnitId, Vitals, damage_map,
};

const BLUE: PlayerId = PlayerId(0);
const RED: PlayerId = PlayerId(1);

fn battle() -> BattleState {
    battle_on(GridLayout::default())
}

fn battle_on(layout: GridLayout) -> BattleState {
    let mut state = BattleState::new(layout);
    state.add_player(Player::new(BLUE, 0));
    state.add_player(Player::new(RED, 0));
    state
}

fn unit(id: u32, player: PlayerId, hex: Hex, health: i32) -> Unit {
    Unit::new(
        UnitId(id),
        "Unit",
        player,
        hex,
        Stats::new()
            .with(StatKind::Health, health)
            .with(StatKind::Movement, 5),
    )
}

/// Runs `f` against a fresh engine with default tuning.
fn with_engine<R>(
    state: &mut BattleState,
    log: &mut BattleLog,
    f: impl FnOnce(&mut CombatEngine<'_>) -> R,
) -> R {
    let config = CombatConfig::default();
    let mut engine = CombatEngine::new(state, &config, log);
    f(&mut engine)
}

/// Index of the first choice covering every hex in `hexes`.
fn choice_covering(query: &TargetQuery, hexes: &[Hex]) -> usize {
    let TargetQuery::Choice { choices, .. } = query else {
        panic!("expected a choice query");
    };
    choices
        .iter()
        .position(|choice| hexes.iter().all(|hex| choice.iter().any(|c| c.hex == *hex)))
        .expect("a choice covers the requested hexes")
}

fn health(state: &BattleState, id: u32) -> i32 {
    state.unit(UnitId(id)).unwrap().vitals.health
}

// ============================================================================
// Area strike and combos
// ============================================================================

fn striker() -> Unit {
    unit(1, BLUE, Hex::new(6, 4), 100).with_ability(
        AbilitySlot::new(AbilityKind::AreaStrike, "Mallet")
            .with_damages(damage_map([(DamageKey::Pure, 50)])),
    )
}

#[test]
fn three_kills_in_one_blast_score_a_single_combo() {
    let mut state = battle();
    let mut log = BattleLog::new();
    let victims = [Hex::new(8, 3), Hex::new(7, 4), Hex::new(9, 5)];

    let report = with_engine(&mut state, &mut log, |engine| {
        engine.summon(striker()).unwrap();
        for (i, hex) in victims.iter().enumerate() {
            engine.summon(unit(10 + i as u32, RED, *hex, 10)).unwrap();
        }
        let pending = engine.query(UnitId(1), 0).unwrap();
        let index = choice_covering(pending.query(), &victims);
        engine.confirm(pending, index).unwrap()
    });

    assert_eq!(report.outcome.kills(), 3);
    assert_eq!(report.outcome.total_damage(), 150);

    let combos: Vec<_> = log
        .scores_of(BLUE)
        .filter(|event| matches!(event, ScoreEvent::Combo { .. }))
        .collect();
    assert_eq!(combos, vec![&ScoreEvent::Combo { kills: 3 }]);
    assert_eq!(
        log.scores_of(BLUE)
            .filter(|event| matches!(event, ScoreEvent::Kill { .. }))
            .count(),
        3
    );
    assert_eq!(log.count_lines("is dead"), 3);
}

#[test]
fn a_single_kill_is_not_a_combo() {
    let mut state = battle();
    let mut log = BattleLog::new();

    let report = with_engine(&mut state, &mut log, |engine| {
        engine.summon(striker()).unwrap();
        engine.summon(unit(10, RED, Hex::new(8, 3), 10)).unwrap();
        engine.summon(unit(11, RED, Hex::new(7, 4), 100)).unwrap();
        let pending = engine.query(UnitId(1), 0).unwrap();
        let index = choice_covering(pending.query(), &[Hex::new(8, 3), Hex::new(7, 4)]);
        engine.confirm(pending, index).unwrap()
    });

    assert_eq!(report.outcome.kills(), 1);
    assert_eq!(report.outcome.survivors().collect::<Vec<_>>(), vec![UnitId(11)]);
    assert_eq!(health(&state, 11), 50);
    assert!(
        !log.scores()
            .iter()
            .any(|(_, event)| matches!(event, ScoreEvent::Combo { .. }))
    );
}

#[test]
fn spent_abilities_refresh_at_round_start() {
    let mut state = battle();
    let mut log = BattleLog::new();

    with_engine(&mut state, &mut log, |engine| {
        engine.summon(striker()).unwrap();
        let pending = engine.query(UnitId(1), 0).unwrap();
        engine.confirm(pending, 0).unwrap();

        assert!(!engine.require(UnitId(1), 0));
        assert_eq!(
            engine.query(UnitId(1), 0).unwrap_err(),
            CombatError::AbilityUsed {
                unit: UnitId(1),
                slot: 0
            }
        );

        engine.start_round().unwrap();
        assert!(engine.require(UnitId(1), 0));
    });
}

// ============================================================================
// Passive stat buff
// ============================================================================

#[test]
fn passive_bonus_tracks_health_and_logs_only_changes() {
    let mut state = battle();
    let mut log = BattleLog::new();

    with_engine(&mut state, &mut log, |engine| {
        engine
            .summon(
                unit(1, BLUE, Hex::new(2, 2), 70)
                    .with_ability(AbilitySlot::new(AbilityKind::StatBuff, "Bulk")),
            )
            .unwrap();
        engine.summon(unit(2, RED, Hex::new(12, 2), 100)).unwrap();

        // Already at full health: the bonus is recomputed but unchanged.
        engine.heal(UnitId(1), 20, true, true).unwrap();
        engine.dispatch(Trigger::OnHeal, UnitId(1)).unwrap();

        let buffed = engine.state().unit(UnitId(1)).unwrap();
        assert_eq!(buffed.stats().get(StatKind::Pierce), 30);
        assert_eq!(buffed.stats().get(StatKind::Crush), 30);
        assert_eq!(buffed.effects.count("Bulk"), 1);

        engine
            .take_damage(
                UnitId(1),
                Damage::new(UnitId(2), damage_map([(DamageKey::Pure, 35)]), 1),
                Default::default(),
            )
            .unwrap();
        let buffed = engine.state().unit(UnitId(1)).unwrap();
        assert_eq!(buffed.vitals.health, 35);
        assert_eq!(buffed.stats().get(StatKind::Slash), 15);
        assert_eq!(buffed.effects.count("Bulk"), 1);
    });

    assert_eq!(log.count_lines("receives 30 pierce, slash and crush"), 1);
    assert_eq!(log.count_lines("receives 15 pierce, slash and crush"), 1);
}

// ============================================================================
// Knockback strike
// ============================================================================

fn knocker(upgraded: bool) -> Unit {
    let slot = AbilitySlot::new(AbilityKind::KnockbackStrike, "Shove");
    let slot = if upgraded { slot.upgraded() } else { slot };
    unit(1, BLUE, Hex::new(4, 4), 100).with_ability(slot)
}

#[test]
fn melee_knockback_pushes_the_target_along_the_lane() {
    let mut state = battle();
    let mut log = BattleLog::new();

    let report = with_engine(&mut state, &mut log, |engine| {
        engine.summon(knocker(false)).unwrap();
        engine.summon(unit(2, RED, Hex::new(5, 4), 100)).unwrap();
        assert!(engine.require(UnitId(1), 0));

        let pending = engine.query(UnitId(1), 0).unwrap();
        assert_eq!(pending.query().len(), 1);
        engine.confirm(pending, 0).unwrap()
    });

    // Melee map: 20 sonic + 10 crush against zeroed stats.
    assert_eq!(report.outcome.total_damage(), 30);
    assert_eq!(report.moved, Some((UnitId(2), Hex::new(6, 4))));
    assert_eq!(state.unit(UnitId(2)).unwrap().position, Hex::new(6, 4));
    assert_eq!(health(&state, 2), 70);
    assert_eq!(log.count_lines("is pushed to (6, 4)"), 1);
}

#[test]
fn upgraded_knockback_hits_harder_when_blocked() {
    let mut state = battle_on(GridLayout::default().with_obstacle(Hex::new(6, 4)));
    let mut log = BattleLog::new();

    let report = with_engine(&mut state, &mut log, |engine| {
        engine.summon(knocker(true)).unwrap();
        engine.summon(unit(2, RED, Hex::new(5, 4), 100)).unwrap();
        let pending = engine.query(UnitId(1), 0).unwrap();
        engine.confirm(pending, 0).unwrap()
    });

    assert_eq!(report.outcome.total_damage(), 40);
    assert_eq!(report.moved, None);
    assert_eq!(state.unit(UnitId(2)).unwrap().position, Hex::new(5, 4));
}

#[test]
fn knockback_requires_an_enemy_in_some_lane() {
    let mut state = battle();
    let mut log = BattleLog::new();

    with_engine(&mut state, &mut log, |engine| {
        engine.summon(knocker(false)).unwrap();
        engine.summon(unit(2, BLUE, Hex::new(5, 4), 100)).unwrap();
        assert!(!engine.require(UnitId(1), 0));
        assert!(matches!(
            engine.query(UnitId(1), 0),
            Err(CombatError::RequirementsNotMet { .. })
        ));
    });
}

/// Index of the lane heading in `direction`.
fn lane_towards(query: &TargetQuery, direction: Direction) -> usize {
    let TargetQuery::Direction { lanes, .. } = query else {
        panic!("expected a direction query");
    };
    lanes
        .iter()
        .position(|lane| lane.direction == direction)
        .expect("a lane heads in the requested direction")
}

fn used(state: &BattleState, id: u32) -> bool {
    state.unit(UnitId(id)).unwrap().ability(0).unwrap().used
}

#[test]
fn knockback_onto_an_emptied_lane_is_a_spent_no_op() {
    let mut state = battle();
    let mut log = BattleLog::new();

    let report = with_engine(&mut state, &mut log, |engine| {
        engine.summon(knocker(false)).unwrap();
        engine.summon(unit(2, RED, Hex::new(7, 4), 100)).unwrap();
        engine.summon(unit(3, RED, Hex::new(1, 4), 100)).unwrap();

        let pending = engine.query(UnitId(1), 0).unwrap();
        let index = lane_towards(pending.query(), Direction::Forward);
        engine
            .move_to(UnitId(2), Hex::new(7, 7), MoveOptions::default())
            .unwrap();
        engine.confirm(pending, index).unwrap()
    });

    assert!(report.outcome.hits().is_empty());
    assert_eq!(report.moved, None);
    assert!(used(&state, 1));
    assert_eq!(health(&state, 2), 100);
    assert_eq!(health(&state, 3), 100);
}

#[test]
fn knockback_falls_back_to_the_first_unit_left_on_the_lane() {
    let mut state = battle();
    let mut log = BattleLog::new();

    let report = with_engine(&mut state, &mut log, |engine| {
        engine.summon(knocker(false)).unwrap();
        engine.summon(unit(2, RED, Hex::new(7, 4), 100)).unwrap();

        let pending = engine.query(UnitId(1), 0).unwrap();
        let index = lane_towards(pending.query(), Direction::Forward);
        engine
            .move_to(UnitId(2), Hex::new(7, 7), MoveOptions::default())
            .unwrap();
        engine.summon(unit(3, RED, Hex::new(6, 4), 100)).unwrap();
        engine.confirm(pending, index).unwrap()
    });

    // Not adjacent, so the ranged map applies: 20 sonic.
    assert_eq!(report.outcome.hits().len(), 1);
    assert_eq!(report.outcome.hits()[0].target, UnitId(3));
    assert_eq!(report.outcome.total_damage(), 20);
    assert_eq!(report.moved, Some((UnitId(3), Hex::new(7, 4))));
    assert_eq!(health(&state, 3), 80);
    assert_eq!(health(&state, 2), 100);
    assert!(used(&state, 1));
}

// ============================================================================
// Ribbon
// ============================================================================

fn ribbon_caster(upgraded: bool) -> Unit {
    let slot = AbilitySlot::new(AbilityKind::Ribbon, "Ribbon");
    let slot = if upgraded { slot.upgraded() } else { slot };
    Unit::new(
        UnitId(1),
        "Healer",
        BLUE,
        Hex::new(6, 4),
        Stats::new()
            .with(StatKind::Health, 100)
            .with(StatKind::Endurance, 10)
            .with(StatKind::Regrowth, 5),
    )
    .with_vitals(Vitals::new(50, 5, 0, 1))
    .with_ability(slot)
}

#[test]
fn self_ribbon_heals_the_caster_once() {
    let mut state = battle();
    let mut log = BattleLog::new();

    with_engine(&mut state, &mut log, |engine| {
        engine.summon(ribbon_caster(false)).unwrap();
        let pending = engine.query(UnitId(1), 0).unwrap();
        let index = choice_covering(pending.query(), &[Hex::new(6, 4)]);
        assert_eq!(index, 0);
        engine.confirm(pending, index).unwrap();
    });

    let caster = state.unit(UnitId(1)).unwrap();
    assert_eq!(caster.vitals, Vitals::new(70, 7, 0, 3));
    assert!(caster.effects.is_empty());
    assert_eq!(log.count_lines("Healer #1 recovers 20 health"), 1);
    assert_eq!(log.count_lines("Healer #1 recovers 2 endurance"), 1);
    assert_eq!(log.count_lines("Healer #1 recovers 2 regrowth"), 1);

    // The restored pool is spent on missing health next round.
    with_engine(&mut state, &mut log, |engine| engine.start_round().unwrap());
    let caster = state.unit(UnitId(1)).unwrap();
    assert_eq!((caster.vitals.health, caster.vitals.regrowth), (73, 0));
    assert_eq!(log.count_lines("Healer #1 regrows 3 health"), 1);
}

#[test]
fn odd_row_front_pair_heals_the_caster_and_its_neighbour() {
    let mut state = battle();
    let mut log = BattleLog::new();
    let mut caster = ribbon_caster(false);
    caster.position = Hex::new(6, 5);

    with_engine(&mut state, &mut log, |engine| {
        engine.summon(caster).unwrap();
        engine
            .summon(unit(2, BLUE, Hex::new(7, 5), 100).with_vitals(Vitals::new(50, 0, 0, 0)))
            .unwrap();

        let pending = engine.query(UnitId(1), 0).unwrap();
        let TargetQuery::Choice { choices, .. } = pending.query() else {
            panic!("expected a choice query");
        };
        let index = choices
            .iter()
            .position(|choice| choice.len() == 2 && choice[0].hex == Hex::new(6, 5))
            .unwrap();
        engine.confirm(pending, index).unwrap();
    });

    assert_eq!(health(&state, 1), 70);
    assert_eq!(health(&state, 2), 70);
    // Only the self-cast is logged; allies are healed silently.
    assert_eq!(log.count_lines("recovers 20 health"), 1);
}

#[test]
fn upgraded_ribbon_slows_enemies_until_next_round() {
    let mut state = battle();
    let mut log = BattleLog::new();

    with_engine(&mut state, &mut log, |engine| {
        engine.summon(ribbon_caster(true)).unwrap();
        engine.summon(unit(2, RED, Hex::new(7, 4), 100)).unwrap();

        let pending = engine.query(UnitId(1), 0).unwrap();
        let index = choice_covering(pending.query(), &[Hex::new(7, 4)]);
        engine.confirm(pending, index).unwrap();

        let enemy = engine.state().unit(UnitId(2)).unwrap();
        assert_eq!(enemy.stats().get(StatKind::Movement), 3);
        assert_eq!(enemy.effects.count("Ribbon Debuff"), 1);

        engine.start_round().unwrap();
        let enemy = engine.state().unit(UnitId(2)).unwrap();
        assert_eq!(enemy.stats().get(StatKind::Movement), 5);
        assert!(enemy.effects.is_empty());
    });

    assert_eq!(log.count_lines("Unit #2 is weakened by Ribbon"), 1);
}

#[test]
fn fuelled_core_units_take_a_token_hit_instead_of_the_debuff() {
    let mut state = battle();
    state.add_player(Player::new(RED, 3));
    let mut log = BattleLog::new();

    let report = with_engine(&mut state, &mut log, |engine| {
        engine.summon(ribbon_caster(true)).unwrap();
        engine
            .summon(unit(2, RED, Hex::new(7, 4), 100).as_core())
            .unwrap();

        let pending = engine.query(UnitId(1), 0).unwrap();
        let index = choice_covering(pending.query(), &[Hex::new(7, 4)]);
        engine.confirm(pending, index).unwrap()
    });

    assert_eq!(report.outcome.hits().len(), 1);
    assert_eq!(report.outcome.total_damage(), 1);
    let core = state.unit(UnitId(2)).unwrap();
    assert_eq!(core.vitals.health, 99);
    assert!(core.effects.is_empty());
}

// ============================================================================
// Protocol guarantees
// ============================================================================

#[test]
fn cancel_and_invalid_selection_leave_the_battle_untouched() {
    let mut state = battle();
    let mut log = BattleLog::new();

    with_engine(&mut state, &mut log, |engine| {
        engine.summon(striker()).unwrap();
        engine.summon(unit(2, RED, Hex::new(7, 4), 10)).unwrap();
    });
    let before = state.clone();

    with_engine(&mut state, &mut log, |engine| {
        let pending = engine.query(UnitId(1), 0).unwrap();
        engine.cancel(pending);

        let pending = engine.query(UnitId(1), 0).unwrap();
        let available = pending.query().len();
        assert_eq!(
            engine.confirm(pending, 99).unwrap_err(),
            CombatError::InvalidSelection {
                index: 99,
                available
            }
        );
    });

    assert_eq!(state, before);
}

#[cfg(feature = "serde")]
#[test]
fn identical_battles_produce_identical_roots() {
    fn play() -> [u8; 32] {
        let mut state = battle();
        let mut log = BattleLog::new();
        with_engine(&mut state, &mut log, |engine| {
            engine.summon(striker()).unwrap();
            engine.summon(unit(2, RED, Hex::new(7, 4), 100)).unwrap();
            engine.summon(unit(3, RED, Hex::new(8, 3), 10)).unwrap();
            let pending = engine.query(UnitId(1), 0).unwrap();
            let index = choice_covering(pending.query(), &[Hex::new(7, 4), Hex::new(8, 3)]);
            engine.confirm(pending, index).unwrap();
            engine.start_round().unwrap();
        });
        state.state_root()
    }

    let first = play();
    assert_eq!(first, play());

    let untouched = battle().state_root();
    assert_ne!(first, untouched);
}
