#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative run state for the wave survival simulation.
//!
//! The world owns every gameplay system and the simulation clock. Front ends
//! mutate it exclusively through [`apply`] and observe it through the emitted
//! events and the [`query`] module.

use std::time::Duration;

use tracing::info;
use wave_survival_core::{
    Command, ConfigError, EnemyId, Event, PickupId, PlayerStats, ProjectileId, SkillKind, Tuning,
    Vec2,
};
use wave_survival_system_combat::{CombatResolver, PlayerHit};
use wave_survival_system_powerups::PowerupController;
use wave_survival_system_rewards::RewardLedger;
use wave_survival_system_skills::SkillTree;
use wave_survival_system_wave::WaveController;

#[derive(Debug)]
struct Player {
    position: Vec2,
    heading: Vec2,
    stats: PlayerStats,
}

/// Represents the authoritative state of a single run.
#[derive(Debug)]
pub struct World {
    tuning: Tuning,
    now: Duration,
    started_at: Option<Duration>,
    survival_seconds: u64,
    run_over: bool,
    player: Player,
    waves: WaveController,
    combat: CombatResolver,
    powerups: PowerupController,
    rewards: RewardLedger,
    skills: SkillTree,
}

impl World {
    /// Creates a world for a fresh run after validating the tuning.
    pub fn new(tuning: Tuning) -> Result<Self, ConfigError> {
        tuning.validate()?;
        Ok(Self::build(tuning))
    }

    fn build(tuning: Tuning) -> Self {
        let player = Player {
            position: Vec2::new(tuning.arena.width / 2.0, tuning.arena.height / 2.0),
            heading: Vec2::ZERO,
            stats: PlayerStats::new(tuning.player.baseline()),
        };
        Self {
            now: Duration::ZERO,
            started_at: None,
            survival_seconds: 0,
            run_over: false,
            player,
            waves: WaveController::new(&tuning),
            combat: CombatResolver::new(tuning.combat.clone(), tuning.player.clone(), tuning.seed),
            powerups: PowerupController::new(tuning.powerups.clone()),
            rewards: RewardLedger::new(tuning.rewards.clone(), &tuning.achievements),
            skills: SkillTree::new(tuning.skills.clone()),
            tuning,
        }
    }

    fn start(&mut self, out_events: &mut Vec<Event>) {
        if self.started_at.is_some() {
            return;
        }
        self.started_at = Some(self.now);
        info!(seed = self.tuning.seed, "run started");
        out_events.push(Event::RunStarted {
            seed: self.tuning.seed,
        });
        if let Some(wave) = self.waves.start(self.now, out_events) {
            self.rewards.record_wave_started(wave);
        }
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.now = self.now.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt, now: self.now });

        self.move_player(dt);
        self.powerups.update(&mut self.player.stats, self.now, out_events);

        if let Some(wave) = self.waves.update(self.now, out_events) {
            self.rewards.record_wave_started(wave);
        }

        let mut launches = Vec::new();
        self.waves
            .advance_enemies(self.now, dt, self.player.position, &mut launches);
        for launch in launches {
            let _ = self.combat.spawn_enemy_projectile(launch, out_events);
        }
        self.combat.advance(dt, out_events);

        if let Some(started_at) = self.started_at {
            let seconds = self.now.saturating_sub(started_at).as_secs();
            if seconds > self.survival_seconds {
                self.survival_seconds = seconds;
                self.rewards.record_survival(seconds, out_events);
            }
        }
    }

    fn move_player(&mut self, dt: Duration) {
        if self.player.heading == Vec2::ZERO {
            return;
        }
        let speed = self.player.stats.effective().move_speed;
        let next = self.player.position + self.player.heading * speed * dt.as_secs_f32();
        let bounds = Vec2::new(self.tuning.arena.width, self.tuning.arena.height);
        self.player.position = next.clamp(Vec2::ZERO, bounds);
    }

    fn fire(&mut self, direction: Vec2, out_events: &mut Vec<Event>) {
        let _ = self.combat.fire_player_projectile(
            self.player.position,
            direction,
            &self.player.stats,
            self.now,
            out_events,
        );
    }

    fn hit(&mut self, projectile: ProjectileId, enemy: EnemyId, out_events: &mut Vec<Event>) {
        let Some(kill) = self
            .combat
            .apply_hit(projectile, enemy, &mut self.waves, self.now, out_events)
        else {
            return;
        };
        self.rewards.record_kill(kill.archetype, kill.points, out_events);
        if let Some(wave) = kill.cleared_wave {
            self.rewards.record_wave_cleared(wave, out_events);
        }
    }

    fn contact(&mut self, enemy: EnemyId, out_events: &mut Vec<Event>) {
        let outcome = self.combat.apply_contact_damage(
            enemy,
            &self.waves,
            &mut self.player.stats,
            self.now,
            out_events,
        );
        self.settle_player_hit(outcome, out_events);
    }

    fn enemy_projectile(&mut self, projectile: ProjectileId, out_events: &mut Vec<Event>) {
        let outcome = self.combat.apply_projectile_to_player(
            projectile,
            &mut self.player.stats,
            self.now,
            out_events,
        );
        self.settle_player_hit(outcome, out_events);
    }

    fn settle_player_hit(&mut self, outcome: PlayerHit, out_events: &mut Vec<Event>) {
        match outcome {
            PlayerHit::Damaged { .. } => self.rewards.record_player_damaged(),
            PlayerHit::Died => {
                self.rewards.record_player_damaged();
                self.end_run(out_events);
            }
            PlayerHit::Ignored | PlayerHit::Negated(_) => {}
        }
    }

    fn end_run(&mut self, out_events: &mut Vec<Event>) {
        self.run_over = true;
        self.waves.halt();
        self.powerups.cancel_all(&mut self.player.stats);
        self.combat.clear();
        self.player.heading = Vec2::ZERO;

        let state = self.rewards.state();
        info!(score = state.score, wave = state.highest_wave, "run ended");
        out_events.push(Event::RunEnded {
            score: state.score,
            wave: state.highest_wave,
        });
    }

    fn collect(&mut self, pickup: PickupId, out_events: &mut Vec<Event>) {
        let Some(kind) = self.combat.take_pickup(pickup) else {
            return;
        };
        self.powerups.collect(kind, &mut self.player.stats, self.now, out_events);
        self.rewards.record_powerup_collected(out_events);
    }

    fn upgrade(&mut self, skill: SkillKind, out_events: &mut Vec<Event>) {
        let points = self.rewards.skill_points_mut();
        match self.skills.upgrade(skill, points, &mut self.player.stats) {
            Ok(level) => out_events.push(Event::SkillUpgraded { skill, level }),
            Err(reason) => out_events.push(Event::SkillUpgradeRejected { skill, reason }),
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the player died every command other than [`Command::Restart`] is ignored.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.run_over && command != Command::Restart {
        return;
    }
    match command {
        Command::StartRun => world.start(out_events),
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SteerPlayer { direction } => {
            world.player.heading = direction.normalize_or_zero();
        }
        Command::FireProjectile { direction } => world.fire(direction, out_events),
        Command::ApplyHit { projectile, enemy } => world.hit(projectile, enemy, out_events),
        Command::ApplyContactDamage { enemy } => world.contact(enemy, out_events),
        Command::ApplyProjectileToPlayer { projectile } => {
            world.enemy_projectile(projectile, out_events);
        }
        Command::CollectPowerup { pickup } => world.collect(pickup, out_events),
        Command::UpgradeSkill { skill } => world.upgrade(skill, out_events),
        Command::Restart => {
            let tuning = world.tuning.clone();
            *world = World::build(tuning);
            info!("run reset");
            out_events.push(Event::RunReset);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use wave_survival_core::{
        EnemySnapshot, PickupSnapshot, PlayerSnapshot, PowerupKind, ProjectileSnapshot, RunSnapshot,
        RunState, Tuning, WavePhase,
    };

    /// Simulation time accumulated from every tick.
    #[must_use]
    pub fn now(world: &World) -> Duration {
        world.now
    }

    /// Tuning the run was created with.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Whether the player died and the run stopped accepting commands.
    #[must_use]
    pub fn is_run_over(world: &World) -> bool {
        world.run_over
    }

    /// Lifecycle state of the current wave.
    #[must_use]
    pub fn wave_phase(world: &World) -> WavePhase {
        world.waves.phase()
    }

    /// Number of the current wave; zero before the run starts.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.waves.wave()
    }

    /// Progress counters of the run.
    #[must_use]
    pub fn run_state(world: &World) -> &RunState {
        world.rewards.state()
    }

    /// Captures the player's position, health, and effective stats.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        let stats = &world.player.stats;
        PlayerSnapshot {
            position: world.player.position,
            health: stats.health(),
            effective: stats.effective(),
            shielded: stats.is_shielded(),
        }
    }

    /// Living enemies in identifier order.
    #[must_use]
    pub fn enemies(world: &World) -> Vec<EnemySnapshot> {
        world.waves.enemies().map(|enemy| enemy.snapshot()).collect()
    }

    /// Projectiles in flight in identifier order.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world.combat.projectiles()
    }

    /// Powerups lying in the field in identifier order.
    #[must_use]
    pub fn pickups(world: &World) -> Vec<PickupSnapshot> {
        world.combat.pickups()
    }

    /// Timed powerups currently active with the time each has left.
    #[must_use]
    pub fn active_powerups(world: &World) -> Vec<(PowerupKind, Duration)> {
        world
            .powerups
            .active()
            .filter_map(|kind| {
                world
                    .powerups
                    .remaining(kind, world.now)
                    .map(|remaining| (kind, remaining))
            })
            .collect()
    }

    /// Plain-data snapshot suitable for external persistence.
    #[must_use]
    pub fn snapshot(world: &World) -> RunSnapshot {
        RunSnapshot {
            run: world.rewards.state().clone(),
            achievements: world.rewards.unlocked(),
            challenges: world.rewards.completed_challenges(),
            baseline: world.player.stats.baseline(),
            skills: world.skills.levels(),
        }
    }
}
