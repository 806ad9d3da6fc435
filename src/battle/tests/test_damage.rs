use crate::battle::damage::{
    apply_roll, calculate_damage, damage_before_random, hit_chance, move_hits, MAX_DAMAGE_ROLL, MIN_DAMAGE_ROLL,
};
use crate::battle::state::TurnRng;
use crate::battle::stats::StatStages;
use crate::battle::tests::common::TestCombatantBuilder;
use crate::move_data::get_move_data;
use crate::pokemon::Combatant;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn mudkip() -> Combatant {
    TestCombatantBuilder::new(258, 5).build()
}

fn zigzagoon() -> Combatant {
    TestCombatantBuilder::new(263, 3).build()
}

#[test]
fn test_starter_tackle_exact_damage() {
    // Mudkip L5 attack 12 vs Zigzagoon L3 defense 7, no STAB, neutral typing:
    // ((2*5/5 + 2) * 35 * 12/7) / 50 + 2 = 6.8
    let tackle = get_move_data("tackle").unwrap();
    let attacker = mudkip();
    let defender = zigzagoon();
    assert_eq!(attacker.stats.attack, 12);
    assert_eq!(defender.stats.defense, 7);

    let mut rng = TurnRng::new_for_test(vec![100]);
    assert_eq!(calculate_damage(&tackle, &attacker, &defender, &mut rng), 6);
    let mut rng = TurnRng::new_for_test(vec![85]);
    assert_eq!(calculate_damage(&tackle, &attacker, &defender, &mut rng), 5);
}

#[test]
fn test_stab_applies_to_matching_type() {
    // Zigzagoon is Normal: (3.2 * 35 * 6/10 / 50 + 2) * 1.5 = 5.016
    let tackle = get_move_data("tackle").unwrap();
    let damage = damage_before_random(&tackle, &zigzagoon(), &mudkip()).unwrap();
    assert!((damage - 5.016).abs() < 1e-9);
    assert_eq!(apply_roll(damage, 100), 5);
}

#[rstest]
#[case("growl")]
#[case("string-shot")]
#[case("foresight")]
fn test_status_moves_deal_no_damage(#[case] move_id: &str) {
    let status = get_move_data(move_id).unwrap();
    assert_eq!(damage_before_random(&status, &mudkip(), &zigzagoon()), None);
    // No power means no damage roll either.
    let mut rng = TurnRng::new_for_test(vec![]);
    assert_eq!(calculate_damage(&status, &mudkip(), &zigzagoon(), &mut rng), 0);
}

#[test]
fn test_damage_bounds_are_monotonic_in_power_and_attack() {
    let mut tackle = get_move_data("tackle").unwrap();
    let defender = zigzagoon();
    for roll in [MIN_DAMAGE_ROLL, MAX_DAMAGE_ROLL] {
        let mut previous = 0;
        for power in (10..=150).step_by(5) {
            tackle.power = Some(power);
            let damage = apply_roll(damage_before_random(&tackle, &mudkip(), &defender).unwrap(), roll);
            assert!(damage >= previous, "power {} dropped damage", power);
            previous = damage;
        }

        tackle.power = Some(35);
        let mut attacker = mudkip();
        let mut previous = 0;
        for attack in 5..=200 {
            attacker.stats.attack = attack;
            let damage = apply_roll(damage_before_random(&tackle, &attacker, &defender).unwrap(), roll);
            assert!(damage >= previous, "attack {} dropped damage", attack);
            previous = damage;
        }
    }
}

#[test]
fn test_attack_stage_scales_damage() {
    let tackle = get_move_data("tackle").unwrap();
    let defender = zigzagoon();
    let boosted = TestCombatantBuilder::new(258, 5)
        .with_stages(StatStages {
            attack: 2,
            ..StatStages::default()
        })
        .build();
    let plain = damage_before_random(&tackle, &mudkip(), &defender).unwrap();
    let doubled = damage_before_random(&tackle, &boosted, &defender).unwrap();
    // The +2 term is not scaled.
    assert!(((doubled - 2.0) - 2.0 * (plain - 2.0)).abs() < 1e-6);
}

#[test]
fn test_evasion_lowers_hit_chance() {
    let string_shot = get_move_data("string-shot").unwrap();
    let evasive = TestCombatantBuilder::new(263, 3)
        .with_stages(StatStages {
            evasion: 1,
            ..StatStages::default()
        })
        .build();

    let chance = hit_chance(&string_shot, &mudkip(), &evasive).unwrap();
    assert!((chance - 95.0 * 0.75).abs() < 1e-4);

    let mut rng = TurnRng::new_for_test(vec![71, 72]);
    assert!(move_hits(&string_shot, &mudkip(), &evasive, &mut rng));
    assert!(!move_hits(&string_shot, &mudkip(), &evasive, &mut rng));
}

#[test]
fn test_moves_without_accuracy_never_roll() {
    let foresight = get_move_data("foresight").unwrap();
    assert_eq!(hit_chance(&foresight, &mudkip(), &zigzagoon()), None);
    let mut rng = TurnRng::new_for_test(vec![]);
    assert!(move_hits(&foresight, &mudkip(), &zigzagoon(), &mut rng));
}

#[test]
fn test_type_immunity_zeroes_the_formula() {
    // Normal moves cannot touch Ghost types.
    let tackle = get_move_data("tackle").unwrap();
    let mut ghost = zigzagoon();
    ghost.types = vec![schema::PokemonType::Ghost];
    let damage = damage_before_random(&tackle, &mudkip(), &ghost).unwrap();
    assert_eq!(apply_roll(damage, MAX_DAMAGE_ROLL), 0);
}

#[test]
fn test_snapshot_reproduces_damage() {
    let tackle = get_move_data("tackle").unwrap();
    let attacker = mudkip();
    let restored = Combatant::from_snapshot(&attacker.to_snapshot().unwrap()).unwrap();
    let defender = zigzagoon();
    assert_eq!(
        damage_before_random(&tackle, &attacker, &defender),
        damage_before_random(&tackle, &restored, &defender)
    );
}
