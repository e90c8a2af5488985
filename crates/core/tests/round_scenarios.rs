//! End-to-end scenarios for the combat rules that matter most for fairness:
//! unmodified hits, armor mitigation, perk gating, momentum, blast fan-out,
//! and health clamping.

use raid_core::content::keys;
use raid_core::perks::{self, PerkContext};
use raid_core::round::{initiative, resolve_round};
use raid_core::state::{Combatant, RoundState};
use raid_core::types::{ActionKind, CombatantId, OutcomeEvent, RoundAction};
use raid_core::ContentPack;

fn hunt(weapon: Option<&'static str>) -> ActionKind {
    ActionKind::Hunt { weapon, pinned_target: None }
}

fn raider_attacks<'a>(
    events: &'a [OutcomeEvent],
    attacker: CombatantId,
) -> impl Iterator<Item = &'a OutcomeEvent> {
    events.iter().filter(move |event| {
        matches!(event, OutcomeEvent::Attacked { attacker: a, .. } if *a == attacker)
    })
}

#[test]
fn unmodified_hits_report_only_the_raw_roll_inside_the_weapon_range() {
    let content = ContentPack::default();
    let bow = content.weapon(keys::WEAPON_HUNTING_BOW).unwrap();
    let mut seen = 0;
    for seed in 0..40 {
        let mut state = RoundState::new(1);
        let raider = state.spawn(Combatant::raider("ada", 200));
        state.get_mut(raider).unwrap().abilities.stun_block_rate = 1.0;
        state
            .get_mut(raider)
            .unwrap()
            .as_raider_mut()
            .unwrap()
            .stock_weapon(keys::WEAPON_HUNTING_BOW, Some(5));
        let rat = state.spawn_enemy(&content, keys::ENEMY_TOWER_RAT).unwrap();

        // Charging keeps the rat visible and harmless for this round.
        let mut actions = vec![
            RoundAction::new(raider, hunt(Some(keys::WEAPON_HUNTING_BOW))),
            RoundAction::new(rat, ActionKind::Charge),
        ];
        let events = resolve_round(&content, &mut state, &mut actions, seed).unwrap();
        for event in raider_attacks(&events, raider) {
            let OutcomeEvent::Attacked { outcome, .. } = event else { unreachable!() };
            assert!(
                (bow.minor_damage..=bow.major_damage).contains(&outcome.original_damage),
                "roll {} escaped [{}, {}]",
                outcome.original_damage,
                bow.minor_damage,
                bow.major_damage
            );
            assert_eq!(
                outcome.new_damage, None,
                "no armor and no perks must leave the roll unmodified"
            );
            assert!(!outcome.originated_by_perk);
            seen += 1;
        }
    }
    assert!(seen > 0, "no raider hit landed across 40 seeds");
}

#[test]
fn armor_halves_incoming_damage_and_reports_the_armor() {
    let content = ContentPack::default();
    let mut seen = 0;
    for seed in 0..40 {
        let mut state = RoundState::new(1);
        let raider = state.spawn(Combatant::raider("ada", 500));
        state.get_mut(raider).unwrap().as_raider_mut().unwrap().armor =
            Some(keys::ARMOR_COMBAT_PLATE);
        let rat = state.spawn_enemy(&content, keys::ENEMY_TOWER_RAT).unwrap();

        let mut actions = vec![
            RoundAction::new(rat, hunt(None)),
            RoundAction::new(raider, ActionKind::Charge),
        ];
        let events = resolve_round(&content, &mut state, &mut actions, seed).unwrap();
        for event in events {
            let OutcomeEvent::Attacked { target, outcome, .. } = event else { continue };
            assert_eq!(target, raider);
            let halved = (f64::from(outcome.original_damage) * 0.5).round() as i32;
            assert_eq!(outcome.new_damage, Some(halved));
            let report = outcome.armor.expect("mitigated hit must carry the armor report");
            assert_eq!(report.armor, keys::ARMOR_COMBAT_PLATE);
            assert_eq!(report.damage_after_armor, halved);
            seen += 1;
        }
    }
    assert!(seen > 0, "no enemy hit landed across 40 seeds");
}

#[test]
fn vigor_doubles_its_bundle_at_top_tier_health() {
    let content = ContentPack::default();
    let vigor = content.perk(keys::PERK_VIGOR).unwrap();
    let mut raider = Combatant::raider("ada", 100);
    raider.as_raider_mut().unwrap().grant_perk(keys::PERK_VIGOR);

    let resolved = perks::resolve_abilities(&content, &raider, PerkContext::default()).unwrap();

    assert_eq!(resolved.attack, vigor.abilities.attack * 2.0);
    assert_eq!(resolved.attack_rate, vigor.abilities.attack_rate * 2.0);
    assert_eq!(resolved.accuracy_rate, vigor.abilities.accuracy_rate * 2.0);
}

#[test]
fn search_success_rate_tracks_the_base_rate_statistically() {
    let content = ContentPack::default();
    let trials = 2_000u64;
    let mut successes = 0u64;
    for seed in 0..trials {
        let mut state = RoundState::new(1);
        let raider = state.spawn(Combatant::raider("ada", 50));
        let mut actions = vec![RoundAction::new(raider, ActionKind::SearchHealth)];
        let events = resolve_round(&content, &mut state, &mut actions, seed).unwrap();
        if !events
            .iter()
            .any(|event| matches!(event, OutcomeEvent::FoundNothing { .. }))
        {
            successes += 1;
        }
    }
    let observed = successes as f64 / trials as f64;
    assert!(
        (observed - 0.6).abs() < 0.03,
        "unboosted searches succeeded at {observed}, expected ~0.60"
    );
}

#[test]
fn threshold_hit_moves_initiative_by_the_fixed_constants() {
    let mut state = RoundState::new(1);
    let attacker = state.spawn(Combatant::raider("ada", 50));
    let target = state.spawn(Combatant::raider("brin", 50));

    // Range [10, 20]: the momentum threshold is 16.
    assert_eq!(initiative::strong_hit_threshold(10, 20), 16);
    initiative::register_hit(&mut state, attacker, target, 16, 10, 20).unwrap();

    assert_eq!(
        state.get(attacker).unwrap().abilities.initiative,
        initiative::STRONG_HIT_ATTACKER_GAIN
    );
    assert_eq!(
        state.get(target).unwrap().abilities.initiative,
        -initiative::STRONG_HIT_TARGET_PENALTY
    );
}

#[test]
fn blast_all_hits_every_living_enemy_exactly_once() {
    let content = ContentPack::default();
    let mut state = RoundState::new(8);
    let raider = state.spawn(Combatant::raider("ada", 1000));
    state.get_mut(raider).unwrap().abilities.stun_block_rate = 1.0;
    state
        .get_mut(raider)
        .unwrap()
        .as_raider_mut()
        .unwrap()
        .stock_weapon(keys::WEAPON_DRAGONFIRE_CANNON, Some(2));
    let enemies = [
        state.spawn_enemy(&content, keys::ENEMY_TOWER_RAT).unwrap(),
        state.spawn_enemy(&content, keys::ENEMY_PHANTOM).unwrap(),
        state.spawn_enemy(&content, keys::ENEMY_WARDEN_DRONE).unwrap(),
    ];

    let mut actions = vec![RoundAction::new(raider, hunt(Some(keys::WEAPON_DRAGONFIRE_CANNON)))];
    for enemy in enemies {
        actions.push(RoundAction::new(enemy, ActionKind::Hide));
    }
    // Hide resolves before hunt, but the raider acts regardless: the cannon
    // is not a detect weapon, so hidden enemies vanish from the pool.
    let events = resolve_round(&content, &mut state, &mut actions, 19).unwrap();
    let struck: Vec<CombatantId> = events
        .iter()
        .filter_map(|event| match event {
            OutcomeEvent::Attacked { attacker, target, .. } if *attacker == raider => {
                Some(*target)
            }
            OutcomeEvent::Evaded { attacker, target } if *attacker == raider => Some(*target),
            _ => None,
        })
        .collect();
    assert!(
        struck.is_empty(),
        "hidden enemies must be untargetable, yet {struck:?} were engaged"
    );

    // Now with everyone visible the cannon sweeps the whole pool.
    for enemy in &mut state.combatants.values_mut() {
        enemy.visible = true;
        enemy.hit_since_last_turn = false;
        enemy.pending_stun_rate = 0.0;
    }
    let mut actions = vec![RoundAction::new(raider, hunt(Some(keys::WEAPON_DRAGONFIRE_CANNON)))];
    for enemy in enemies {
        actions.push(RoundAction::new(enemy, ActionKind::Charge));
    }
    let events = resolve_round(&content, &mut state, &mut actions, 23).unwrap();
    let mut struck: Vec<CombatantId> = events
        .iter()
        .filter_map(|event| match event {
            OutcomeEvent::Attacked { attacker, target, .. } if *attacker == raider => {
                Some(*target)
            }
            OutcomeEvent::Evaded { attacker, target } if *attacker == raider => Some(*target),
            _ => None,
        })
        .collect();
    struck.sort();
    struck.dedup();
    assert_eq!(struck.len(), enemies.len(), "blast-all must engage the entire pool once each");
}

#[test]
fn health_stays_clamped_across_many_chaotic_rounds() {
    let content = ContentPack::default();
    let mut state = RoundState::new(5);
    let ada = state.spawn(Combatant::raider("ada", 70));
    let brin = state.spawn(Combatant::raider("brin", 60));
    {
        let inventory = state.get_mut(ada).unwrap().as_raider_mut().unwrap();
        inventory.stock_weapon(keys::WEAPON_FRAG_GRENADE, Some(10));
        inventory.grant_perk(keys::PERK_ADRENALINE);
    }
    state.spawn_enemy(&content, keys::ENEMY_FLOOR_TYRANT).unwrap();
    state.spawn_enemy(&content, keys::ENEMY_SIEGE_GOLEM).unwrap();

    for round in 0..30u64 {
        let mut actions = vec![
            RoundAction::new(ada, hunt(Some(keys::WEAPON_FRAG_GRENADE))),
            RoundAction::new(brin, ActionKind::SearchHealth),
        ];
        resolve_round(&content, &mut state, &mut actions, round * 31).unwrap();
        for combatant in state.combatants.values() {
            assert!(
                combatant.health >= 0 && combatant.health <= combatant.max_health,
                "{} escaped the health range with {}",
                combatant.name,
                combatant.health
            );
        }
    }
}
