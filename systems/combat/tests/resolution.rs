use std::time::Duration;

use wave_survival_core::{
    config::ReleasePolicy, EnemyId, Event, Modifiers, NegationReason, PlayerStats, Tuning, Vec2,
};
use wave_survival_system_combat::{CombatResolver, Kill, PlayerHit};
use wave_survival_system_wave::WaveController;

struct Arena {
    waves: WaveController,
    combat: CombatResolver,
    stats: PlayerStats,
    events: Vec<Event>,
}

impl Arena {
    fn new(tuning: &Tuning) -> Self {
        let mut waves = WaveController::new(tuning);
        let mut events = Vec::new();
        waves.start(Duration::ZERO, &mut events);
        Self {
            waves,
            combat: CombatResolver::new(tuning.combat.clone(), tuning.player.clone(), tuning.seed),
            stats: PlayerStats::new(tuning.player.baseline()),
            events,
        }
    }

    fn first_enemy(&self) -> EnemyId {
        self.waves
            .enemies()
            .next()
            .map(|enemy| enemy.id())
            .expect("wave one spawns immediately")
    }

    fn shoot(&mut self, enemy: EnemyId, millis: u64) -> Option<Kill> {
        let now = Duration::from_millis(millis);
        let projectile = self
            .combat
            .fire_player_projectile(Vec2::ZERO, Vec2::X, &self.stats, now, &mut self.events)
            .expect("shots are spaced by the fire interval");
        self.combat
            .apply_hit(projectile, enemy, &mut self.waves, now, &mut self.events)
    }

    fn touch(&mut self, enemy: EnemyId, millis: u64) -> PlayerHit {
        self.combat.apply_contact_damage(
            enemy,
            &self.waves,
            &mut self.stats,
            Duration::from_millis(millis),
            &mut self.events,
        )
    }

    fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|event| predicate(event)).count()
    }
}

fn flat_contact_tuning() -> Tuning {
    let mut tuning = Tuning::default();
    tuning.enemies.basic.base_contact_damage = 10.0;
    tuning.enemies.basic.contact_damage_step = 0.0;
    tuning.player.invulnerability_ms = 0;
    tuning
}

#[test]
fn ten_contact_hits_kill_the_player_exactly_once() {
    let mut arena = Arena::new(&flat_contact_tuning());
    let enemy = arena.first_enemy();

    for hit in 1..=9 {
        assert_eq!(
            arena.touch(enemy, hit * 10),
            PlayerHit::Damaged {
                remaining: 100.0 - 10.0 * hit as f32,
            }
        );
    }
    assert_eq!(arena.touch(enemy, 100), PlayerHit::Died);
    assert_eq!(arena.stats.health(), 0.0);
    assert_eq!(arena.touch(enemy, 110), PlayerHit::Ignored);

    assert_eq!(arena.count(|event| *event == Event::PlayerDied), 1);
    assert!(arena.combat.is_player_dead());
}

#[test]
fn invulnerability_window_negates_follow_up_hits() {
    let mut arena = Arena::new(&Tuning::default());
    let enemy = arena.first_enemy();

    assert!(matches!(arena.touch(enemy, 0), PlayerHit::Damaged { .. }));
    let after_first = arena.stats.health();
    assert_eq!(
        arena.touch(enemy, 999),
        PlayerHit::Negated(NegationReason::Invulnerable)
    );
    assert_eq!(arena.stats.health(), after_first);
    assert!(matches!(arena.touch(enemy, 1_000), PlayerHit::Damaged { .. }));
}

#[test]
fn shields_negate_contact_damage_without_arming_invulnerability() {
    let mut tuning = flat_contact_tuning();
    tuning.player.invulnerability_ms = 1_000;
    let mut arena = Arena::new(&tuning);
    let enemy = arena.first_enemy();
    arena.stats.set_temporary(Modifiers {
        shielded: true,
        ..Default::default()
    });

    for millis in [0, 10, 20] {
        assert_eq!(
            arena.touch(enemy, millis),
            PlayerHit::Negated(NegationReason::Shield)
        );
    }
    assert_eq!(arena.stats.health(), 100.0);
    assert_eq!(
        arena.count(|event| matches!(event, Event::PlayerDamaged { .. })),
        0
    );

    arena.stats.set_temporary(Modifiers::default());
    assert_eq!(
        arena.touch(enemy, 30),
        PlayerHit::Damaged { remaining: 90.0 }
    );
}

#[test]
fn lethal_hits_remove_the_enemy_and_report_the_kill() {
    let mut arena = Arena::new(&Tuning::default());
    let enemy = arena.first_enemy();

    assert_eq!(arena.shoot(enemy, 0), None);
    assert_eq!(arena.shoot(enemy, 500), None);
    let kill = arena.shoot(enemy, 1_000).expect("third hit is lethal");

    assert_eq!(kill.enemy, enemy);
    assert_eq!(kill.points, 10);
    assert_eq!(kill.cleared_wave, None, "later spawns are still pending");
    assert!(arena.waves.enemy(enemy).is_none());
    assert!(arena.events.contains(&Event::EnemyDamaged {
        enemy,
        damage: 25.0,
        remaining: -15.0,
    }));
    assert_eq!(
        arena.count(|event| matches!(event, Event::EnemyKilled { .. })),
        1
    );
}

#[test]
fn stale_reports_change_nothing() {
    let mut arena = Arena::new(&Tuning::default());
    let enemy = arena.first_enemy();
    let missing = EnemyId::new(999);

    let projectile = arena
        .combat
        .fire_player_projectile(
            Vec2::ZERO,
            Vec2::X,
            &arena.stats,
            Duration::ZERO,
            &mut arena.events,
        )
        .expect("first shot is never gated");
    let before = arena.events.len();

    assert_eq!(
        arena.combat.apply_hit(
            projectile,
            missing,
            &mut arena.waves,
            Duration::ZERO,
            &mut arena.events
        ),
        None
    );
    assert_eq!(arena.events.len(), before);
    assert_eq!(arena.combat.projectiles().len(), 1, "projectile survives a stale enemy");

    let _ = arena.combat.apply_hit(
        projectile,
        enemy,
        &mut arena.waves,
        Duration::ZERO,
        &mut arena.events,
    );
    let after_hit = arena.events.len();
    let _ = arena.combat.apply_hit(
        projectile,
        enemy,
        &mut arena.waves,
        Duration::ZERO,
        &mut arena.events,
    );
    assert_eq!(arena.events.len(), after_hit, "double delivery is absorbed");
    assert_eq!(arena.touch(missing, 0), PlayerHit::Ignored);
}

#[test]
fn killing_the_last_enemy_of_a_spawned_wave_clears_it() {
    let mut tuning = Tuning::default();
    tuning.wave.initial_enemies = 1;
    tuning.spawning.release = ReleasePolicy::AllAtOnce;
    tuning.player.projectile_damage = 1_000.0;
    let mut arena = Arena::new(&tuning);
    let enemy = arena.first_enemy();

    let kill = arena.shoot(enemy, 0).expect("overwhelming damage kills");
    assert_eq!(kill.cleared_wave, Some(1));
    assert!(arena.events.contains(&Event::WaveCleared { wave: 1 }));
}

#[test]
fn drop_chance_controls_powerup_drops() {
    let mut tuning = Tuning::default();
    tuning.wave.initial_enemies = 3;
    tuning.spawning.release = ReleasePolicy::AllAtOnce;
    tuning.player.projectile_damage = 1_000.0;
    tuning.combat.drop_chance = 1.0;
    let mut arena = Arena::new(&tuning);

    let ids: Vec<EnemyId> = arena.waves.enemies().map(|enemy| enemy.id()).collect();
    for (index, enemy) in ids.into_iter().enumerate() {
        let _ = arena.shoot(enemy, index as u64 * 500);
    }
    assert_eq!(arena.combat.pickups().len(), 3);

    tuning.combat.drop_chance = 0.0;
    let mut dry = Arena::new(&tuning);
    let enemy = dry.first_enemy();
    let _ = dry.shoot(enemy, 0);
    assert!(dry.combat.pickups().is_empty());
}

#[test]
fn pickups_can_only_be_taken_once() {
    let mut tuning = Tuning::default();
    tuning.spawning.release = ReleasePolicy::AllAtOnce;
    tuning.player.projectile_damage = 1_000.0;
    tuning.combat.drop_chance = 1.0;
    let mut arena = Arena::new(&tuning);
    let enemy = arena.first_enemy();
    let _ = arena.shoot(enemy, 0);

    let pickup = arena.combat.pickups()[0].clone();
    assert_eq!(arena.combat.take_pickup(pickup.id), Some(pickup.kind));
    assert_eq!(arena.combat.take_pickup(pickup.id), None);
}
