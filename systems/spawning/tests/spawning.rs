use std::time::Duration;

use wave_survival_core::{
    config::{ArenaTuning, SpawnTuning, WaveTuning},
    EnemyArchetype,
};
use wave_survival_system_spawning::{archetype_for, SpawnOrder, SpawnScheduler};

fn plan(seed: u64, wave: u32) -> Vec<SpawnOrder> {
    let quota = WaveTuning::default().quota(wave);
    SpawnScheduler::new(ArenaTuning::default(), SpawnTuning::default(), seed).plan_wave(wave, quota)
}

fn count(orders: &[SpawnOrder], archetype: EnemyArchetype) -> usize {
    orders
        .iter()
        .filter(|order| order.archetype == archetype)
        .count()
}

#[test]
fn plans_one_order_per_enemy_in_release_order() {
    let orders = plan(0x5eed, 2);
    assert_eq!(orders.len(), 15);
    for (expected, order) in orders.iter().enumerate() {
        assert_eq!(order.index as usize, expected);
    }
    assert!(orders.windows(2).all(|pair| pair[0].delay <= pair[1].delay));
    assert_eq!(orders[14].delay, Duration::from_millis(7_000));
}

#[test]
fn spawn_points_sit_on_the_margin_outside_the_arena() {
    let arena = ArenaTuning::default();
    let orders = plan(0xdead_beef, 4);
    for order in orders {
        let position = order.position;
        let on_horizontal = (position.y == -arena.spawn_margin
            || position.y == arena.height + arena.spawn_margin)
            && (0.0..=arena.width).contains(&position.x);
        let on_vertical = (position.x == -arena.spawn_margin
            || position.x == arena.width + arena.spawn_margin)
            && (0.0..=arena.height).contains(&position.y);
        assert!(
            on_horizontal || on_vertical,
            "spawn point {position:?} is not on the arena boundary"
        );
    }
}

#[test]
fn identical_seeds_replay_identical_plans() {
    assert_eq!(plan(42, 3), plan(42, 3));
    let first: Vec<_> = plan(42, 3).into_iter().map(|order| order.position).collect();
    let other: Vec<_> = plan(43, 3).into_iter().map(|order| order.position).collect();
    assert_ne!(first, other, "different seeds should place enemies differently");
}

#[test]
fn composition_escalates_with_the_wave_number() {
    assert_eq!(count(&plan(1, 1), EnemyArchetype::Basic), 10);
    assert_eq!(count(&plan(1, 2), EnemyArchetype::Ranged), 0);

    let third = plan(1, 3);
    assert_eq!(count(&third, EnemyArchetype::Ranged), 5);
    assert_eq!(count(&third, EnemyArchetype::Boss), 0);

    let fifth = plan(1, 5);
    assert_eq!(fifth.len(), 30);
    assert_eq!(count(&fifth, EnemyArchetype::Boss), 1);
    assert_eq!(fifth[29].archetype, EnemyArchetype::Boss);
    assert_eq!(count(&fifth, EnemyArchetype::Ranged), 7);
}

#[test]
fn boss_replaces_only_the_last_spawn() {
    let tuning = SpawnTuning::default();
    assert_eq!(archetype_for(&tuning, 10, 34, 35), EnemyArchetype::Boss);
    assert_eq!(archetype_for(&tuning, 10, 33, 35), EnemyArchetype::Basic);
    assert_eq!(archetype_for(&tuning, 9, 39, 40), EnemyArchetype::Ranged);
}
