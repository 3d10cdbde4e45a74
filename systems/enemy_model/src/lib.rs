#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy archetypes, wave scaling, and per-archetype behavior.
//!
//! Scaling is a pure function of the wave number and archetype. Behavior is a
//! sum type selected by archetype at spawn time; [`EnemyModel::advance`] steers
//! an enemy toward or away from the player and reports projectile launches
//! without owning any projectile state itself.

mod boss;

use std::time::Duration;

use wave_survival_core::{
    config::{EnemyProfile, EnemyTuning},
    AttackPattern, EnemyArchetype, EnemyId, EnemySnapshot, Vec2,
};

pub use boss::{volley_angles, BossPhases, BossState};

/// Values an enemy of a given archetype spawns with on a given wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Starting and maximum health.
    pub health: f32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Damage dealt to the player on contact and by the enemy's projectiles.
    pub contact_damage: f32,
    /// Points awarded for killing the enemy.
    pub point_value: u32,
}

/// Scales an archetype profile to the provided wave number.
#[must_use]
pub fn scale(profile: &EnemyProfile, wave: u32) -> EnemyStats {
    let step = wave as f32;
    EnemyStats {
        health: profile.base_health + step * profile.health_step,
        speed: profile.base_speed + step * profile.speed_step,
        contact_damage: profile.base_contact_damage + step * profile.contact_damage_step,
        point_value: profile.points_per_wave.saturating_mul(wave),
    }
}

/// Archetype-specific behavior state.
#[derive(Clone, Debug, PartialEq)]
pub enum Behavior {
    /// Chases the player directly.
    Basic,
    /// Holds a standoff distance and fires aimed shots.
    Ranged {
        /// Earliest simulation time of the next shot.
        next_attack: Duration,
    },
    /// Cycles through attack patterns as health thresholds are crossed.
    Boss(BossState),
}

/// Phase transition triggered by a health change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseTransition {
    /// Health fraction that fired.
    pub threshold: f32,
    /// Pattern the boss uses after the transition.
    pub pattern: AttackPattern,
}

/// Result of applying damage to an enemy.
#[derive(Clone, Debug, PartialEq)]
pub struct DamageOutcome {
    /// Health right after the damage, before any phase regeneration. Negative on overkill.
    pub remaining: f32,
    /// Whether the damage was lethal.
    pub killed: bool,
    /// Boss phase transitions fired by the damage.
    pub transitions: Vec<PhaseTransition>,
}

/// Projectile an enemy wants to launch this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileLaunch {
    /// Launch position.
    pub origin: Vec2,
    /// Launch velocity in world units per second.
    pub velocity: Vec2,
    /// Damage dealt to the player on impact.
    pub damage: f32,
    /// Lifetime of the projectile.
    pub time_to_live: Duration,
}

/// Single enemy record owned by the wave controller.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    id: EnemyId,
    archetype: EnemyArchetype,
    position: Vec2,
    velocity: Vec2,
    health: f32,
    max_health: f32,
    speed: f32,
    contact_damage: f32,
    point_value: u32,
    behavior: Behavior,
}

impl Enemy {
    /// Identifier of the enemy.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Behavioral class of the enemy.
    #[must_use]
    pub const fn archetype(&self) -> EnemyArchetype {
        self.archetype
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Health the enemy spawned with.
    #[must_use]
    pub const fn max_health(&self) -> f32 {
        self.max_health
    }

    /// Damage dealt to the player on contact.
    #[must_use]
    pub const fn contact_damage(&self) -> f32 {
        self.contact_damage
    }

    /// Points awarded for the kill.
    #[must_use]
    pub const fn point_value(&self) -> u32 {
        self.point_value
    }

    /// Archetype-specific behavior state.
    #[must_use]
    pub const fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    /// Captures an immutable view of the enemy.
    #[must_use]
    pub fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            archetype: self.archetype,
            position: self.position,
            velocity: self.velocity,
            health: self.health,
            max_health: self.max_health,
        }
    }

    /// Subtracts damage and evaluates boss phase thresholds if the enemy survives.
    pub fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        self.health -= amount.max(0.0);
        let remaining = self.health;
        if remaining <= 0.0 {
            return DamageOutcome {
                remaining,
                killed: true,
                transitions: Vec::new(),
            };
        }
        DamageOutcome {
            remaining,
            killed: false,
            transitions: self.evaluate_phases(),
        }
    }

    /// Restores health up to the maximum and evaluates boss phase thresholds.
    pub fn heal(&mut self, amount: f32) -> Vec<PhaseTransition> {
        self.health = (self.health + amount.max(0.0)).min(self.max_health);
        self.evaluate_phases()
    }

    fn evaluate_phases(&mut self) -> Vec<PhaseTransition> {
        let Behavior::Boss(state) = &mut self.behavior else {
            return Vec::new();
        };
        let fraction = self.health / self.max_health;
        let fired = state.phases_mut().observe(fraction);
        let mut transitions = Vec::with_capacity(fired.len());
        for threshold in fired {
            let pattern = state.enter_next_phase();
            self.health = (self.health + state.phase_regen()).min(self.max_health);
            transitions.push(PhaseTransition { threshold, pattern });
        }
        transitions
    }
}

/// Factory and behavior driver for every enemy archetype.
#[derive(Clone, Debug)]
pub struct EnemyModel {
    tuning: EnemyTuning,
}

impl EnemyModel {
    /// Creates a model from the enemy tuning.
    #[must_use]
    pub fn new(tuning: EnemyTuning) -> Self {
        Self { tuning }
    }

    /// Spawn values of `archetype` on wave `wave`.
    #[must_use]
    pub fn stats(&self, archetype: EnemyArchetype, wave: u32) -> EnemyStats {
        scale(self.tuning.profile(archetype), wave)
    }

    /// Instantiates an enemy at full health.
    #[must_use]
    pub fn spawn(
        &self,
        id: EnemyId,
        archetype: EnemyArchetype,
        wave: u32,
        position: Vec2,
        now: Duration,
    ) -> Enemy {
        let stats = self.stats(archetype, wave);
        let behavior = match archetype {
            EnemyArchetype::Basic => Behavior::Basic,
            EnemyArchetype::Ranged => Behavior::Ranged {
                next_attack: now
                    .saturating_add(Duration::from_millis(self.tuning.ranged_behavior.cooldown_ms)),
            },
            EnemyArchetype::Boss => Behavior::Boss(BossState::new(&self.tuning.boss_behavior, now)),
        };
        Enemy {
            id,
            archetype,
            position,
            velocity: Vec2::ZERO,
            health: stats.health,
            max_health: stats.health,
            speed: stats.speed,
            contact_damage: stats.contact_damage,
            point_value: stats.point_value,
            behavior,
        }
    }

    /// Steers the enemy relative to `target`, integrates its position over `dt`,
    /// and appends any projectiles it launches.
    pub fn advance(
        &self,
        enemy: &mut Enemy,
        now: Duration,
        dt: Duration,
        target: Vec2,
        launches: &mut Vec<ProjectileLaunch>,
    ) {
        let offset = target - enemy.position;
        let distance = offset.length();
        let toward = offset.normalize_or_zero();
        let aim = offset.y.atan2(offset.x);

        let velocity = match &mut enemy.behavior {
            Behavior::Basic => toward * enemy.speed,
            Behavior::Ranged { next_attack } => {
                let ranged = &self.tuning.ranged_behavior;
                if now >= *next_attack {
                    *next_attack = now.saturating_add(Duration::from_millis(ranged.cooldown_ms));
                    launches.push(ProjectileLaunch {
                        origin: enemy.position,
                        velocity: boss::heading(aim) * ranged.projectile_speed,
                        damage: enemy.contact_damage,
                        time_to_live: Duration::from_millis(ranged.projectile_ttl_ms),
                    });
                }
                if distance < ranged.standoff {
                    -toward * enemy.speed
                } else if distance > ranged.standoff + ranged.band {
                    toward * enemy.speed * ranged.approach_factor
                } else {
                    Vec2::ZERO
                }
            }
            Behavior::Boss(state) => {
                let tuning = &self.tuning.boss_behavior;
                if let Some(pattern) = state.ready(now) {
                    let time_to_live = Duration::from_millis(tuning.projectile_ttl_ms);
                    launches.extend(volley_angles(pattern, aim).into_iter().map(|angle| {
                        ProjectileLaunch {
                            origin: enemy.position,
                            velocity: boss::heading(angle) * tuning.projectile_speed,
                            damage: enemy.contact_damage,
                            time_to_live,
                        }
                    }));
                }
                let sway = now.as_secs_f32().sin();
                boss::heading(aim + sway) * enemy.speed
            }
        };

        enemy.velocity = velocity;
        enemy.position += velocity * dt.as_secs_f32();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> EnemyModel {
        EnemyModel::new(EnemyTuning::default())
    }

    #[test]
    fn scaling_is_monotonic_for_every_archetype() {
        let model = model();
        for archetype in EnemyArchetype::ALL {
            for wave in 2..100 {
                let previous = model.stats(archetype, wave - 1);
                let current = model.stats(archetype, wave);
                assert!(current.health >= previous.health);
                assert!(current.speed >= previous.speed);
                assert!(current.point_value >= previous.point_value);
            }
        }
    }

    #[test]
    fn scaling_matches_the_linear_formula() {
        let stats = model().stats(EnemyArchetype::Basic, 3);
        assert_eq!(stats.health, 80.0);
        assert_eq!(stats.speed, 115.0);
        assert_eq!(stats.contact_damage, 11.5);
        assert_eq!(stats.point_value, 30);
    }

    #[test]
    fn basic_enemies_chase_the_player() {
        let model = model();
        let mut enemy = model.spawn(
            EnemyId::new(0),
            EnemyArchetype::Basic,
            1,
            Vec2::new(0.0, 0.0),
            Duration::ZERO,
        );
        let mut launches = Vec::new();
        model.advance(
            &mut enemy,
            Duration::ZERO,
            Duration::from_secs(1),
            Vec2::new(1_000.0, 0.0),
            &mut launches,
        );
        assert!(launches.is_empty());
        assert!((enemy.position().x - 105.0).abs() < 1e-3);
        assert_eq!(enemy.position().y, 0.0);
    }

    #[test]
    fn ranged_enemies_hold_their_standoff_band() {
        let model = model();
        let spawn = |x: f32| {
            model.spawn(
                EnemyId::new(1),
                EnemyArchetype::Ranged,
                1,
                Vec2::new(x, 0.0),
                Duration::ZERO,
            )
        };
        let step = |enemy: &mut Enemy| {
            let mut launches = Vec::new();
            model.advance(
                enemy,
                Duration::ZERO,
                Duration::from_millis(100),
                Vec2::ZERO,
                &mut launches,
            );
            enemy.snapshot().velocity
        };

        let mut close = spawn(100.0);
        assert!(step(&mut close).x > 0.0, "retreats when too close");

        let mut far = spawn(500.0);
        let approach = step(&mut far);
        assert!(approach.x < 0.0, "approaches when too far");
        assert!((approach.length() - 84.0 * 0.5).abs() < 1e-3);

        let mut held = spawn(220.0);
        assert_eq!(step(&mut held), Vec2::ZERO);
    }

    #[test]
    fn ranged_enemies_fire_on_cooldown() {
        let model = model();
        let mut enemy = model.spawn(
            EnemyId::new(2),
            EnemyArchetype::Ranged,
            1,
            Vec2::new(220.0, 0.0),
            Duration::ZERO,
        );
        let mut launches = Vec::new();
        for millis in (0..=4_000).step_by(100) {
            model.advance(
                &mut enemy,
                Duration::from_millis(millis),
                Duration::from_millis(100),
                Vec2::ZERO,
                &mut launches,
            );
        }
        assert_eq!(launches.len(), 2);
        assert!(launches[0].velocity.x < 0.0, "aimed at the player");
        assert_eq!(launches[0].damage, enemy.contact_damage());
    }

    #[test]
    fn boss_launches_a_full_volley() {
        let model = model();
        let mut enemy = model.spawn(
            EnemyId::new(3),
            EnemyArchetype::Boss,
            5,
            Vec2::new(400.0, 300.0),
            Duration::ZERO,
        );
        let mut launches = Vec::new();
        model.advance(
            &mut enemy,
            Duration::from_millis(3_000),
            Duration::from_millis(16),
            Vec2::ZERO,
            &mut launches,
        );
        assert_eq!(launches.len(), 12);
    }

    #[test]
    fn lethal_damage_reports_negative_remaining_health() {
        let model = model();
        let mut enemy = model.spawn(
            EnemyId::new(4),
            EnemyArchetype::Basic,
            0,
            Vec2::ZERO,
            Duration::ZERO,
        );
        let outcome = enemy.apply_damage(55.0);
        assert!(outcome.killed);
        assert_eq!(outcome.remaining, -5.0);
    }
}
