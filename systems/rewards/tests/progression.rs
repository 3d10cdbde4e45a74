use wave_survival_core::{
    AchievementCategory, AchievementId, ChallengeKind, EnemyArchetype, Event, Tuning,
};
use wave_survival_system_rewards::RewardLedger;

fn ledger() -> RewardLedger {
    let tuning = Tuning::default();
    RewardLedger::new(tuning.rewards, &tuning.achievements)
}

fn unlocked(events: &[Event]) -> Vec<(AchievementCategory, u32, u64)> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::AchievementUnlocked {
                category,
                tier,
                reward,
            } => Some((*category, *tier, *reward)),
            _ => None,
        })
        .collect()
}

#[test]
fn kill_thresholds_award_each_tier_once() {
    let mut ledger = ledger();
    let mut events = Vec::new();
    let kills = AchievementCategory::KillCount;

    assert_eq!(ledger.check_and_award(kills, 10, &mut events), Ok(5));
    assert_eq!(ledger.state().coins, 5);
    assert_eq!(ledger.check_and_award(kills, 10, &mut events), Ok(0));
    assert_eq!(ledger.state().coins, 5);

    assert_eq!(ledger.check_and_award(kills, 75, &mut events), Ok(15));
    assert_eq!(ledger.state().coins, 20);
    assert_eq!(ledger.check_and_award(kills, 75, &mut events), Ok(0));

    assert_eq!(
        unlocked(&events),
        vec![(kills, 0, 5), (kills, 1, 15)],
        "the first tier must not be granted again"
    );
}

#[test]
fn lower_values_never_revoke_or_reaward() {
    let mut ledger = ledger();
    let mut events = Vec::new();
    let waves = AchievementCategory::WaveSurvival;

    assert_eq!(ledger.check_and_award(waves, 25, &mut events), Ok(70));
    assert_eq!(ledger.check_and_award(waves, 3, &mut events), Ok(0));
    assert_eq!(ledger.check_and_award(waves, 25, &mut events), Ok(0));
    assert_eq!(unlocked(&events).len(), 3);
}

#[test]
fn tenth_kill_unlocks_the_first_kill_tier() {
    let mut ledger = ledger();
    let mut events = Vec::new();
    for _ in 0..9 {
        ledger.record_kill(EnemyArchetype::Basic, 1, &mut events);
    }
    assert!(unlocked(&events).is_empty());

    ledger.record_kill(EnemyArchetype::Basic, 1, &mut events);
    assert_eq!(
        unlocked(&events),
        vec![
            (AchievementCategory::KillCount, 0, 5),
            (AchievementCategory::KillStreak, 0, 50),
        ]
    );
    assert_eq!(ledger.state().kills, 10);
    assert_eq!(ledger.state().coins, 5 + 50);
}

fn challenges(events: &[Event]) -> Vec<(ChallengeKind, u64, u64)> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::ChallengeCompleted {
                challenge,
                coins,
                experience,
            } => Some((*challenge, *coins, *experience)),
            _ => None,
        })
        .collect()
}

#[test]
fn taking_damage_resets_the_kill_streak() {
    let mut ledger = ledger();
    let mut events = Vec::new();
    for _ in 0..9 {
        ledger.record_kill(EnemyArchetype::Basic, 1, &mut events);
    }
    ledger.record_player_damaged();
    assert_eq!(ledger.state().kill_streak, 0);

    for _ in 0..9 {
        ledger.record_kill(EnemyArchetype::Basic, 1, &mut events);
    }
    assert_eq!(ledger.state().kill_streak, 9);
    assert!(!unlocked(&events)
        .iter()
        .any(|(category, ..)| *category == AchievementCategory::KillStreak));

    ledger.record_kill(EnemyArchetype::Basic, 1, &mut events);
    assert!(unlocked(&events).contains(&(AchievementCategory::KillStreak, 0, 50)));
    assert_eq!(ledger.state().kills, 19);
}

#[test]
fn only_undamaged_waves_count_as_perfect() {
    let mut ledger = ledger();
    let mut events = Vec::new();

    ledger.record_wave_started(1);
    ledger.record_player_damaged();
    ledger.record_wave_cleared(1, &mut events);
    assert_eq!(ledger.state().perfect_waves, 0);
    assert!(unlocked(&events).is_empty());

    ledger.record_wave_started(2);
    ledger.record_wave_cleared(2, &mut events);
    assert_eq!(ledger.state().perfect_waves, 1);
    assert_eq!(
        unlocked(&events),
        vec![(AchievementCategory::PerfectWaves, 0, 75)]
    );
}

#[test]
fn perfect_boss_completes_once_and_only_without_damage() {
    let mut spoiled = ledger();
    let mut events = Vec::new();
    spoiled.record_wave_started(5);
    spoiled.record_player_damaged();
    spoiled.record_kill(EnemyArchetype::Boss, 500, &mut events);
    assert!(challenges(&events).is_empty());
    assert!(spoiled.completed_challenges().is_empty());

    let mut ledger = ledger();
    let mut events = Vec::new();
    ledger.record_wave_started(5);
    ledger.record_kill(EnemyArchetype::Boss, 500, &mut events);
    ledger.record_wave_started(10);
    ledger.record_kill(EnemyArchetype::Boss, 1_000, &mut events);

    assert_eq!(
        challenges(&events),
        vec![(ChallengeKind::PerfectBoss, 2_000, 1_000)]
    );
    assert_eq!(ledger.completed_challenges(), vec![ChallengeKind::PerfectBoss]);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::ExperienceGained { amount: 1_000, .. }
    )));
}

#[test]
fn speed_run_requires_the_wave_goal_inside_the_time_limit() {
    let mut tuning = Tuning::default();
    tuning.rewards.challenges.speed_run_waves = 2;
    tuning.rewards.challenges.speed_run_seconds = 120;

    let mut late = RewardLedger::new(tuning.rewards.clone(), &tuning.achievements);
    let mut events = Vec::new();
    late.record_survival(121, &mut events);
    for wave in 1..=2 {
        late.record_wave_started(wave);
        late.record_wave_cleared(wave, &mut events);
    }
    assert!(challenges(&events).is_empty());

    let mut fast = RewardLedger::new(tuning.rewards, &tuning.achievements);
    let mut events = Vec::new();
    fast.record_survival(120, &mut events);
    fast.record_wave_started(1);
    fast.record_wave_cleared(1, &mut events);
    assert!(challenges(&events).is_empty(), "one wave is not enough");

    let level_before = fast.state().level;
    let coins_before = fast.state().coins;
    let mark = events.len();
    fast.record_wave_started(2);
    fast.record_wave_cleared(2, &mut events);
    assert_eq!(
        challenges(&events),
        vec![(ChallengeKind::SpeedRun, 1_000, 500)]
    );
    assert!(fast.state().level > level_before);
    assert!(fast.state().coins >= coins_before + 1_000);
    assert!(events[mark..].iter().any(|event| matches!(
        event,
        Event::ExperienceGained { amount: 500, .. }
    )));
}

#[test]
fn large_experience_rewards_cross_several_levels() {
    let mut ledger = ledger();
    let mut events = Vec::new();
    ledger.add_experience(400, &mut events);

    let state = ledger.state();
    assert_eq!(state.level, 4);
    assert_eq!(state.experience, 36);
    assert_eq!(state.coins, 200 + 300 + 400);
    assert_eq!(state.skill_points, 3);

    let levels: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            Event::LevelUp { level, .. } => Some(*level),
            _ => None,
        })
        .collect();
    assert_eq!(levels, vec![2, 3, 4]);
    assert!(events.contains(&Event::ExperienceGained {
        amount: 400,
        total: 36,
    }));
}

#[test]
fn fifth_level_grants_a_bonus_skill_point() {
    let mut ledger = ledger();
    let mut events = Vec::new();
    // 100 + 120 + 144 + 172 reaches level five exactly.
    ledger.add_experience(536, &mut events);
    assert_eq!(ledger.state().level, 5);
    assert_eq!(ledger.state().experience, 0);
    assert_eq!(ledger.state().skill_points, 1 + 1 + 1 + 2);
}

#[test]
fn unlocked_achievements_are_reported_in_order() {
    let mut ledger = ledger();
    let mut events = Vec::new();
    let _ = ledger.check_and_award(AchievementCategory::SurvivalTime, 600, &mut events);
    let _ = ledger.check_and_award(AchievementCategory::KillCount, 50, &mut events);

    assert_eq!(
        ledger.unlocked(),
        vec![
            AchievementId {
                category: AchievementCategory::KillCount,
                tier: 0,
            },
            AchievementId {
                category: AchievementCategory::KillCount,
                tier: 1,
            },
            AchievementId {
                category: AchievementCategory::SurvivalTime,
                tier: 0,
            },
            AchievementId {
                category: AchievementCategory::SurvivalTime,
                tier: 1,
            },
        ]
    );
}
