#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the wave survival simulation.
//!
//! This crate defines the message surface that connects front ends, the
//! authoritative run controller, and the gameplay systems. Front ends submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that UI layers subscribe to. Nothing in this crate renders, polls input, or
//! performs I/O.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

pub mod config;
pub mod schedule;
mod stats;

pub use config::{ConfigError, Tuning};
pub use glam::Vec2;
pub use schedule::{Schedule, TimerHandle};
pub use stats::{Modifiers, PlayerStats, Stat, StatBlock, StatMultipliers};

/// Stream selector for the spawn placement random number generator.
pub const RNG_STREAM_SPAWNING: u64 = 1;
/// Stream selector for the powerup drop random number generator.
pub const RNG_STREAM_DROPS: u64 = 2;

/// Commands that express all permissible mutations of a run.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Begins the run, moving the wave controller out of its idle state.
    StartRun,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Sets the direction the player is moving in; a zero vector stops the player.
    SteerPlayer {
        /// Desired heading. The magnitude is ignored.
        direction: Vec2,
    },
    /// Requests that the player fire a projectile along the provided heading.
    FireProjectile {
        /// Desired heading. The magnitude is ignored.
        direction: Vec2,
    },
    /// Reports an overlap between a projectile and an enemy.
    ApplyHit {
        /// Projectile that touched the enemy.
        projectile: ProjectileId,
        /// Enemy that was touched.
        enemy: EnemyId,
    },
    /// Reports an overlap between the player and an enemy body.
    ApplyContactDamage {
        /// Enemy that touched the player.
        enemy: EnemyId,
    },
    /// Reports an overlap between an enemy projectile and the player.
    ApplyProjectileToPlayer {
        /// Projectile that touched the player.
        projectile: ProjectileId,
    },
    /// Reports an overlap between the player and a powerup lying in the field.
    CollectPowerup {
        /// Pickup the player touched.
        pickup: PickupId,
    },
    /// Requests that a skill be upgraded using accumulated skill points.
    UpgradeSkill {
        /// Skill to upgrade.
        skill: SkillKind,
    },
    /// Discards the current run and reinitializes every entity from scratch.
    Restart,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that a run began.
    RunStarted {
        /// Seed driving every random stream of the run.
        seed: u64,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
        /// Simulation time after the tick.
        now: Duration,
    },
    /// Announces that a wave entered its spawning state.
    WaveStarted {
        /// Number of the wave, starting at one.
        wave: u32,
        /// Total enemies the wave will spawn.
        quota: u32,
    },
    /// Confirms that an enemy was released into the arena.
    EnemySpawned {
        /// Wave that owns the enemy.
        wave: u32,
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Behavioral class of the enemy.
        archetype: EnemyArchetype,
        /// Position the enemy appeared at.
        position: Vec2,
    },
    /// Reports that every spawn of the wave has fired.
    SpawnsCompleted {
        /// Wave whose spawns completed.
        wave: u32,
    },
    /// Reports damage applied to a living enemy.
    EnemyDamaged {
        /// Enemy that took damage.
        enemy: EnemyId,
        /// Damage applied by the hit.
        damage: f32,
        /// Health left after the hit. May be negative when the hit was lethal.
        remaining: f32,
    },
    /// Reports that a boss crossed one of its health thresholds.
    BossPhaseChanged {
        /// Boss that changed phase.
        enemy: EnemyId,
        /// Health fraction that triggered the transition.
        threshold: f32,
        /// Attack pattern the boss uses from now on.
        pattern: AttackPattern,
    },
    /// Reports that an enemy died.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Behavioral class of the enemy.
        archetype: EnemyArchetype,
        /// Points awarded for the kill.
        points: u32,
        /// Last position of the enemy.
        position: Vec2,
    },
    /// Confirms that a projectile entered the arena.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Side that fired the projectile.
        owner: ProjectileOwner,
        /// Launch position.
        position: Vec2,
        /// Launch velocity in world units per second.
        velocity: Vec2,
    },
    /// Reports that a projectile outlived its time-to-live.
    ProjectileExpired {
        /// Projectile that expired.
        projectile: ProjectileId,
    },
    /// Reports that every enemy of the wave spawned and died.
    WaveCleared {
        /// Wave that was cleared.
        wave: u32,
    },
    /// Reports that the pause between waves began.
    IntermissionStarted {
        /// Wave that was just cleared.
        wave: u32,
        /// Time until the next wave starts.
        delay: Duration,
    },
    /// Reports damage applied to the player.
    PlayerDamaged {
        /// Damage applied.
        damage: f32,
        /// Player health after the damage.
        remaining: f32,
    },
    /// Reports that incoming damage was fully negated.
    PlayerDamageNegated {
        /// Rule that negated the damage.
        reason: NegationReason,
    },
    /// Reports that the player's health reached zero.
    PlayerDied,
    /// Reports that the run is over and no further mutations will be accepted.
    RunEnded {
        /// Final score.
        score: u64,
        /// Highest wave reached.
        wave: u32,
    },
    /// Reports that a killed enemy dropped a powerup.
    PowerupDropped {
        /// Identifier of the pickup lying in the field.
        pickup: PickupId,
        /// Kind of powerup dropped.
        kind: PowerupKind,
        /// Position of the pickup.
        position: Vec2,
    },
    /// Reports that the player collected a powerup.
    PowerupCollected {
        /// Kind of powerup collected.
        kind: PowerupKind,
        /// Whether an active instance of the same kind was replaced.
        replaced: bool,
    },
    /// Reports that a timed powerup ran out and its effect was reverted.
    PowerupExpired {
        /// Kind of powerup that expired.
        kind: PowerupKind,
    },
    /// Reports new score and coin totals.
    ScoreUpdated {
        /// Current score.
        score: u64,
        /// Current coins.
        coins: u64,
    },
    /// Reports experience added to the run.
    ExperienceGained {
        /// Experience added.
        amount: u64,
        /// Experience carried toward the next level after any level-ups.
        total: u64,
    },
    /// Reports that the player gained a level.
    LevelUp {
        /// Level reached.
        level: u32,
        /// Coins granted for the level.
        coins: u64,
        /// Skill points granted for the level.
        skill_points: u32,
    },
    /// Reports that an achievement threshold was crossed for the first time.
    AchievementUnlocked {
        /// Counter the achievement tracks.
        category: AchievementCategory,
        /// Index of the threshold that was crossed.
        tier: u32,
        /// Coins granted.
        reward: u64,
    },
    /// Reports that a one-shot challenge was completed.
    ChallengeCompleted {
        /// Challenge that was completed.
        challenge: ChallengeKind,
        /// Coins granted.
        coins: u64,
        /// Experience granted.
        experience: u64,
    },
    /// Confirms that a skill was upgraded.
    SkillUpgraded {
        /// Skill that was upgraded.
        skill: SkillKind,
        /// Level reached.
        level: u32,
    },
    /// Reports that a skill upgrade request was rejected.
    SkillUpgradeRejected {
        /// Skill targeted by the request.
        skill: SkillKind,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Confirms that the run was discarded and reinitialized.
    RunReset,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a powerup lying in the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PickupId(u32);

impl PickupId {
    /// Creates a new pickup identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Behavioral class of an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyArchetype {
    /// Chases the player directly.
    Basic,
    /// Keeps a standoff distance and fires projectiles on a cooldown.
    Ranged,
    /// Multi-phase enemy whose attack pattern changes at health thresholds.
    Boss,
}

impl EnemyArchetype {
    /// Every archetype in declaration order.
    pub const ALL: [Self; 3] = [Self::Basic, Self::Ranged, Self::Boss];

    /// Stable lowercase name used in configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Ranged => "ranged",
            Self::Boss => "boss",
        }
    }
}

/// Kinds of powerups that can be collected from the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerupKind {
    /// Temporarily scales movement speed.
    Speed,
    /// Temporarily shortens the interval between shots.
    RapidFire,
    /// Temporarily scales projectile damage.
    Damage,
    /// Instantly restores health.
    Health,
    /// Temporarily negates all incoming damage.
    Shield,
}

impl PowerupKind {
    /// Every powerup kind in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Speed,
        Self::RapidFire,
        Self::Damage,
        Self::Health,
        Self::Shield,
    ];

    /// Stable lowercase name used in configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Speed => "speed",
            Self::RapidFire => "rapid_fire",
            Self::Damage => "damage",
            Self::Health => "health",
            Self::Shield => "shield",
        }
    }
}

/// Counters tracked by threshold achievements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    /// Total enemies killed during the run.
    KillCount,
    /// Waves cleared during the run.
    WaveSurvival,
    /// Whole seconds survived.
    SurvivalTime,
    /// Powerups collected during the run.
    PowerupsCollected,
    /// Bosses killed during the run.
    BossesDefeated,
    /// Kills since the player last took damage.
    KillStreak,
    /// Waves cleared without the player taking damage.
    PerfectWaves,
}

impl AchievementCategory {
    /// Every category in declaration order.
    pub const ALL: [Self; 7] = [
        Self::KillCount,
        Self::WaveSurvival,
        Self::SurvivalTime,
        Self::PowerupsCollected,
        Self::BossesDefeated,
        Self::KillStreak,
        Self::PerfectWaves,
    ];

    /// Stable lowercase name used in configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::KillCount => "kill_count",
            Self::WaveSurvival => "wave_survival",
            Self::SurvivalTime => "survival_time",
            Self::PowerupsCollected => "powerups_collected",
            Self::BossesDefeated => "bosses_defeated",
            Self::KillStreak => "kill_streak",
            Self::PerfectWaves => "perfect_waves",
        }
    }
}

/// One-shot challenges, each completed at most once per run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeKind {
    /// Clear a number of waves within a time limit.
    SpeedRun,
    /// Kill a boss during a wave in which the player took no damage.
    PerfectBoss,
}

impl ChallengeKind {
    /// Every challenge in declaration order.
    pub const ALL: [Self; 2] = [Self::SpeedRun, Self::PerfectBoss];

    /// Stable lowercase name used in configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SpeedRun => "speed_run",
            Self::PerfectBoss => "perfect_boss",
        }
    }
}

/// Permanent upgrades that can be bought with skill points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    /// Scales projectile damage.
    Damage,
    /// Shortens the interval between shots.
    FireRate,
    /// Scales movement speed.
    MoveSpeed,
    /// Scales projectile speed.
    ProjectileSpeed,
}

impl SkillKind {
    /// Every skill in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Damage,
        Self::FireRate,
        Self::MoveSpeed,
        Self::ProjectileSpeed,
    ];

    /// Stable lowercase name used in configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Damage => "damage",
            Self::FireRate => "fire_rate",
            Self::MoveSpeed => "move_speed",
            Self::ProjectileSpeed => "projectile_speed",
        }
    }

    /// Player stat scaled by the skill.
    #[must_use]
    pub const fn stat(self) -> Stat {
        match self {
            Self::Damage => Stat::ProjectileDamage,
            Self::FireRate => Stat::FireInterval,
            Self::MoveSpeed => Stat::MoveSpeed,
            Self::ProjectileSpeed => Stat::ProjectileSpeed,
        }
    }
}

macro_rules! impl_kind_parsing {
    ($($kind:ty => $label:literal),* $(,)?) => {
        $(
            impl FromStr for $kind {
                type Err = ConfigError;

                fn from_str(value: &str) -> Result<Self, Self::Err> {
                    Self::ALL
                        .into_iter()
                        .find(|candidate| candidate.name() == value)
                        .ok_or_else(|| ConfigError::UnknownKind {
                            kind: $label,
                            name: value.to_owned(),
                        })
                }
            }

            impl fmt::Display for $kind {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.name())
                }
            }
        )*
    };
}

impl_kind_parsing! {
    EnemyArchetype => "enemy",
    PowerupKind => "powerup",
    AchievementCategory => "achievement",
    ChallengeKind => "challenge",
    SkillKind => "skill",
}

/// Side that fired a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileOwner {
    /// Fired by the player; damages enemies.
    Player,
    /// Fired by an enemy; damages the player.
    Enemy,
}

/// Attack patterns cycled through by bosses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackPattern {
    /// Ring of evenly spaced projectiles.
    Circular,
    /// Fan of projectiles aimed at the player.
    Burst,
    /// Projectiles launched along a rotating heading.
    Spiral,
}

impl AttackPattern {
    /// Patterns in the order bosses cycle through them.
    pub const CYCLE: [Self; 3] = [Self::Circular, Self::Burst, Self::Spiral];
}

/// Lifecycle state of the current wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WavePhase {
    /// No wave has started yet.
    Idle,
    /// Spawn events of the wave are still pending.
    Spawning,
    /// Every spawn fired; enemies are still alive.
    Active,
    /// Every enemy of the wave spawned and died.
    Cleared,
    /// Waiting for the next wave to start.
    Intermission,
}

/// Rules that can negate incoming player damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NegationReason {
    /// An active shield powerup absorbed the damage.
    Shield,
    /// The player is inside the invulnerability window after a previous hit.
    Invulnerable,
}

/// Reasons a skill upgrade request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum UpgradeError {
    /// The run has not accumulated enough skill points.
    #[error("not enough skill points")]
    InsufficientPoints,
    /// The skill already reached its maximum level.
    #[error("skill is already at its maximum level")]
    MaxLevel,
}

/// Accumulated progress of a single run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    /// Points earned from kills and cleared waves.
    pub score: u64,
    /// Coins granted by rewards.
    pub coins: u64,
    /// Experience carried toward the next level.
    pub experience: u64,
    /// Current level, starting at one.
    pub level: u32,
    /// Unspent skill points.
    pub skill_points: u32,
    /// Enemies killed.
    pub kills: u32,
    /// Bosses killed.
    pub bosses_defeated: u32,
    /// Powerups collected.
    pub powerups_collected: u32,
    /// Waves cleared.
    pub waves_completed: u32,
    /// Waves cleared without the player taking damage.
    pub perfect_waves: u32,
    /// Kills since the player last took damage.
    pub kill_streak: u32,
    /// Highest wave number that started.
    pub highest_wave: u32,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            score: 0,
            coins: 0,
            experience: 0,
            level: 1,
            skill_points: 0,
            kills: 0,
            bosses_defeated: 0,
            powerups_collected: 0,
            waves_completed: 0,
            perfect_waves: 0,
            kill_streak: 0,
            highest_wave: 0,
        }
    }
}

/// Identifies a single awarded achievement threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AchievementId {
    /// Counter the achievement tracks.
    pub category: AchievementCategory,
    /// Index of the threshold within the category.
    pub tier: u32,
}

/// Level reached in a single skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLevel {
    /// Skill the level belongs to.
    pub skill: SkillKind,
    /// Number of upgrades bought.
    pub level: u32,
}

/// Plain-data snapshot handed to external save routines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    /// Progress of the run.
    pub run: RunState,
    /// Achievement thresholds awarded so far, in ascending order.
    pub achievements: Vec<AchievementId>,
    /// Challenges completed so far, in ascending order.
    pub challenges: Vec<ChallengeKind>,
    /// Baseline player stats, before any multipliers.
    pub baseline: StatBlock,
    /// Levels bought in each skill.
    pub skills: Vec<SkillLevel>,
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Behavioral class of the enemy.
    pub archetype: EnemyArchetype,
    /// Current position.
    pub position: Vec2,
    /// Current velocity in world units per second.
    pub velocity: Vec2,
    /// Current health.
    pub health: f32,
    /// Health the enemy spawned with.
    pub max_health: f32,
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Side that fired the projectile.
    pub owner: ProjectileOwner,
    /// Current position.
    pub position: Vec2,
    /// Velocity in world units per second.
    pub velocity: Vec2,
    /// Damage dealt on impact.
    pub damage: f32,
    /// Time left before the projectile expires.
    pub time_to_live: Duration,
}

/// Immutable representation of a powerup lying in the field.
#[derive(Clone, Debug, PartialEq)]
pub struct PickupSnapshot {
    /// Unique identifier assigned to the pickup.
    pub id: PickupId,
    /// Kind of powerup.
    pub kind: PowerupKind,
    /// Position of the pickup.
    pub position: Vec2,
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Current position.
    pub position: Vec2,
    /// Current health.
    pub health: f32,
    /// Stats after every multiplier is applied.
    pub effective: StatBlock,
    /// Whether a shield currently negates damage.
    pub shielded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::DeserializeOwned;

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn kinds_parse_from_configuration_names() {
        assert_eq!("ranged".parse::<EnemyArchetype>(), Ok(EnemyArchetype::Ranged));
        assert_eq!("rapid_fire".parse::<PowerupKind>(), Ok(PowerupKind::RapidFire));
        assert_eq!(
            "survival_time".parse::<AchievementCategory>(),
            Ok(AchievementCategory::SurvivalTime)
        );
        assert_eq!("fire_rate".parse::<SkillKind>(), Ok(SkillKind::FireRate));
        assert_eq!(
            "kill_streak".parse::<AchievementCategory>(),
            Ok(AchievementCategory::KillStreak)
        );
        assert_eq!("speed_run".parse::<ChallengeKind>(), Ok(ChallengeKind::SpeedRun));
    }

    #[test]
    fn unknown_kind_fails_fast_with_descriptive_error() {
        let error = "dragon".parse::<EnemyArchetype>().unwrap_err();
        assert_eq!(
            error,
            ConfigError::UnknownKind {
                kind: "enemy",
                name: "dragon".to_owned(),
            }
        );
        assert_eq!(error.to_string(), "unknown enemy type `dragon`");
        assert!("teleport".parse::<PowerupKind>().is_err());
    }

    #[test]
    fn run_state_starts_at_level_one() {
        let state = RunState::default();
        assert_eq!(state.level, 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.highest_wave, 0);
    }

    #[test]
    fn snapshot_round_trips_through_bincode() {
        let snapshot = RunSnapshot {
            run: RunState {
                score: 420,
                coins: 35,
                kills: 12,
                highest_wave: 3,
                ..RunState::default()
            },
            achievements: vec![AchievementId {
                category: AchievementCategory::KillCount,
                tier: 0,
            }],
            challenges: vec![ChallengeKind::PerfectBoss],
            baseline: Tuning::default().player.baseline(),
            skills: vec![SkillLevel {
                skill: SkillKind::Damage,
                level: 2,
            }],
        };
        assert_round_trip(&snapshot);
    }

    #[test]
    fn upgrade_error_round_trips_through_bincode() {
        assert_round_trip(&UpgradeError::MaxLevel);
    }
}
