#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Combat resolution: projectiles, enemy hits, player damage, and powerup drops.
//!
//! Every entry point tolerates stale identifiers because overlap reports may
//! arrive more than once per physics step. Once the player dies the resolver
//! rejects further damage and firing until it is rebuilt.

use std::{collections::BTreeMap, time::Duration};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};
use wave_survival_core::{
    config::{CombatTuning, PlayerTuning},
    EnemyArchetype, EnemyId, Event, NegationReason, PickupId, PickupSnapshot, PlayerStats,
    PowerupKind, ProjectileId, ProjectileOwner, ProjectileSnapshot, Vec2, RNG_STREAM_DROPS,
};
use wave_survival_system_enemy_model::ProjectileLaunch;
use wave_survival_system_wave::WaveController;

/// Enemy death resolved by a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Kill {
    /// Enemy that died.
    pub enemy: EnemyId,
    /// Behavioral class of the enemy.
    pub archetype: EnemyArchetype,
    /// Points awarded for the kill.
    pub points: u32,
    /// Wave cleared by the kill, if it was the last enemy of a fully spawned wave.
    pub cleared_wave: Option<u32>,
}

/// Outcome of damage aimed at the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlayerHit {
    /// The report referenced a stale entity or the run is over.
    Ignored,
    /// A shield or the invulnerability window absorbed the damage.
    Negated(NegationReason),
    /// Health dropped but stayed above zero.
    Damaged {
        /// Health left after the hit.
        remaining: f32,
    },
    /// Health reached zero.
    Died,
}

#[derive(Clone, Debug, PartialEq)]
struct Projectile {
    owner: ProjectileOwner,
    position: Vec2,
    velocity: Vec2,
    damage: f32,
    time_to_live: Duration,
}

#[derive(Clone, Debug, PartialEq)]
struct Pickup {
    kind: PowerupKind,
    position: Vec2,
}

/// Owns projectiles and field pickups and applies every damage rule.
#[derive(Debug)]
pub struct CombatResolver {
    tuning: CombatTuning,
    player: PlayerTuning,
    projectiles: BTreeMap<ProjectileId, Projectile>,
    pickups: BTreeMap<PickupId, Pickup>,
    rng: ChaCha8Rng,
    next_projectile: u32,
    next_pickup: u32,
    last_shot: Option<Duration>,
    invulnerable_until: Duration,
    player_dead: bool,
}

impl CombatResolver {
    /// Creates a resolver whose drop stream is derived from `seed`.
    #[must_use]
    pub fn new(tuning: CombatTuning, player: PlayerTuning, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(RNG_STREAM_DROPS);
        Self {
            tuning,
            player,
            projectiles: BTreeMap::new(),
            pickups: BTreeMap::new(),
            rng,
            next_projectile: 0,
            next_pickup: 0,
            last_shot: None,
            invulnerable_until: Duration::ZERO,
            player_dead: false,
        }
    }

    /// Whether the player already died.
    #[must_use]
    pub const fn is_player_dead(&self) -> bool {
        self.player_dead
    }

    /// Projectiles in flight, in identifier order.
    #[must_use]
    pub fn projectiles(&self) -> Vec<ProjectileSnapshot> {
        self.projectiles
            .iter()
            .map(|(id, projectile)| ProjectileSnapshot {
                id: *id,
                owner: projectile.owner,
                position: projectile.position,
                velocity: projectile.velocity,
                damage: projectile.damage,
                time_to_live: projectile.time_to_live,
            })
            .collect()
    }

    /// Powerups lying in the field, in identifier order.
    #[must_use]
    pub fn pickups(&self) -> Vec<PickupSnapshot> {
        self.pickups
            .iter()
            .map(|(id, pickup)| PickupSnapshot {
                id: *id,
                kind: pickup.kind,
                position: pickup.position,
            })
            .collect()
    }

    /// Launches a player projectile from `origin` if the fire interval elapsed.
    pub fn fire_player_projectile(
        &mut self,
        origin: Vec2,
        direction: Vec2,
        stats: &PlayerStats,
        now: Duration,
        out_events: &mut Vec<Event>,
    ) -> Option<ProjectileId> {
        let heading = direction.normalize_or_zero();
        if self.player_dead || heading == Vec2::ZERO {
            return None;
        }
        let effective = stats.effective();
        let interval = Duration::try_from_secs_f32(effective.fire_interval_ms.max(0.0) / 1_000.0)
            .unwrap_or(Duration::MAX);
        if let Some(last) = self.last_shot {
            if now.saturating_sub(last) < interval {
                return None;
            }
        }
        self.last_shot = Some(now);
        Some(self.launch(
            ProjectileOwner::Player,
            origin,
            heading * effective.projectile_speed,
            effective.projectile_damage,
            self.player.projectile_ttl(),
            out_events,
        ))
    }

    /// Launches a projectile requested by an enemy behavior.
    pub fn spawn_enemy_projectile(
        &mut self,
        launch: ProjectileLaunch,
        out_events: &mut Vec<Event>,
    ) -> Option<ProjectileId> {
        if self.player_dead {
            return None;
        }
        Some(self.launch(
            ProjectileOwner::Enemy,
            launch.origin,
            launch.velocity,
            launch.damage,
            launch.time_to_live,
            out_events,
        ))
    }

    /// Moves projectiles and removes the ones whose lifetime ran out.
    pub fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let seconds = dt.as_secs_f32();
        let mut expired = Vec::new();
        for (id, projectile) in &mut self.projectiles {
            projectile.position += projectile.velocity * seconds;
            projectile.time_to_live = projectile.time_to_live.saturating_sub(dt);
            if projectile.time_to_live.is_zero() {
                expired.push(*id);
            }
        }
        for projectile in expired {
            let _ = self.projectiles.remove(&projectile);
            out_events.push(Event::ProjectileExpired { projectile });
        }
    }

    /// Applies a player projectile to an enemy.
    ///
    /// The projectile is consumed and the enemy damaged. A lethal hit removes
    /// the enemy from the wave, emits the kill, and rolls for a powerup drop.
    /// Reports that reference a missing projectile or enemy, or an enemy
    /// projectile, change nothing.
    pub fn apply_hit(
        &mut self,
        projectile: ProjectileId,
        enemy: EnemyId,
        waves: &mut WaveController,
        now: Duration,
        out_events: &mut Vec<Event>,
    ) -> Option<Kill> {
        if self.player_dead {
            return None;
        }
        let damage = match self.projectiles.get(&projectile) {
            Some(shot) if shot.owner == ProjectileOwner::Player => shot.damage,
            _ => return None,
        };
        let target = waves.enemy_mut(enemy)?;
        let _ = self.projectiles.remove(&projectile);

        let outcome = target.apply_damage(damage);
        out_events.push(Event::EnemyDamaged {
            enemy,
            damage,
            remaining: outcome.remaining,
        });
        for transition in &outcome.transitions {
            debug!(enemy = enemy.get(), threshold = transition.threshold, "boss phase changed");
            out_events.push(Event::BossPhaseChanged {
                enemy,
                threshold: transition.threshold,
                pattern: transition.pattern,
            });
        }
        if !outcome.killed {
            return None;
        }

        let archetype = target.archetype();
        let points = target.point_value();
        let position = target.position();
        debug!(enemy = enemy.get(), %archetype, points, "enemy killed");
        out_events.push(Event::EnemyKilled {
            enemy,
            archetype,
            points,
            position,
        });
        let cleared_wave = waves
            .remove_enemy(enemy, now, out_events)
            .and_then(|removal| removal.cleared_wave);
        self.roll_drop(position, out_events);

        Some(Kill {
            enemy,
            archetype,
            points,
            cleared_wave,
        })
    }

    /// Applies the body damage of a living enemy to the player.
    pub fn apply_contact_damage(
        &mut self,
        enemy: EnemyId,
        waves: &WaveController,
        stats: &mut PlayerStats,
        now: Duration,
        out_events: &mut Vec<Event>,
    ) -> PlayerHit {
        let Some(damage) = waves.enemy(enemy).map(|enemy| enemy.contact_damage()) else {
            return PlayerHit::Ignored;
        };
        self.damage_player(damage, stats, now, out_events)
    }

    /// Applies an enemy projectile to the player, consuming the projectile.
    pub fn apply_projectile_to_player(
        &mut self,
        projectile: ProjectileId,
        stats: &mut PlayerStats,
        now: Duration,
        out_events: &mut Vec<Event>,
    ) -> PlayerHit {
        if self.player_dead {
            return PlayerHit::Ignored;
        }
        let damage = match self.projectiles.get(&projectile) {
            Some(shot) if shot.owner == ProjectileOwner::Enemy => shot.damage,
            _ => return PlayerHit::Ignored,
        };
        let _ = self.projectiles.remove(&projectile);
        self.damage_player(damage, stats, now, out_events)
    }

    /// Removes a pickup from the field and returns its kind.
    pub fn take_pickup(&mut self, pickup: PickupId) -> Option<PowerupKind> {
        if self.player_dead {
            return None;
        }
        self.pickups.remove(&pickup).map(|pickup| pickup.kind)
    }

    /// Drops every projectile and pickup.
    pub fn clear(&mut self) {
        self.projectiles.clear();
        self.pickups.clear();
    }

    fn damage_player(
        &mut self,
        damage: f32,
        stats: &mut PlayerStats,
        now: Duration,
        out_events: &mut Vec<Event>,
    ) -> PlayerHit {
        if self.player_dead {
            return PlayerHit::Ignored;
        }
        let negation = if stats.is_shielded() {
            Some(NegationReason::Shield)
        } else if now < self.invulnerable_until {
            Some(NegationReason::Invulnerable)
        } else {
            None
        };
        if let Some(reason) = negation {
            out_events.push(Event::PlayerDamageNegated { reason });
            return PlayerHit::Negated(reason);
        }

        let remaining = stats.damage(damage);
        self.invulnerable_until = now.saturating_add(self.player.invulnerability());
        out_events.push(Event::PlayerDamaged { damage, remaining });
        if remaining > 0.0 {
            return PlayerHit::Damaged { remaining };
        }

        self.player_dead = true;
        info!("player died");
        out_events.push(Event::PlayerDied);
        PlayerHit::Died
    }

    fn launch(
        &mut self,
        owner: ProjectileOwner,
        position: Vec2,
        velocity: Vec2,
        damage: f32,
        time_to_live: Duration,
        out_events: &mut Vec<Event>,
    ) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile);
        self.next_projectile = self.next_projectile.wrapping_add(1);
        let _ = self.projectiles.insert(
            id,
            Projectile {
                owner,
                position,
                velocity,
                damage,
                time_to_live,
            },
        );
        out_events.push(Event::ProjectileFired {
            projectile: id,
            owner,
            position,
            velocity,
        });
        id
    }

    fn roll_drop(&mut self, position: Vec2, out_events: &mut Vec<Event>) {
        if !self.rng.gen_bool(self.tuning.drop_chance) {
            return;
        }
        let pool = &self.tuning.drop_kinds;
        if pool.is_empty() {
            return;
        }
        let kind = pool[self.rng.gen_range(0..pool.len())];
        let id = PickupId::new(self.next_pickup);
        self.next_pickup = self.next_pickup.wrapping_add(1);
        let _ = self.pickups.insert(id, Pickup { kind, position });
        debug!(pickup = id.get(), %kind, "powerup dropped");
        out_events.push(Event::PowerupDropped {
            pickup: id,
            kind,
            position,
        });
    }
}
