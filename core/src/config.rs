//! Tuning knobs for every numeric constant of the simulation.
//!
//! Every table implements [`Default`] with the canonical configuration and
//! deserializes with `#[serde(default)]`, so a configuration file only needs
//! to list the values it overrides. [`Tuning::validate`] rejects combinations
//! that would break the simulation's invariants.

use std::{collections::BTreeSet, time::Duration};

use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    AchievementCategory, ChallengeKind, EnemyArchetype, PowerupKind, SkillKind, StatBlock,
};

/// Errors raised by invalid configuration or unknown type names.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A type name did not match any known variant.
    #[error("unknown {kind} type `{name}`")]
    UnknownKind {
        /// Family of the requested type.
        kind: &'static str,
        /// Name that failed to parse.
        name: String,
    },
    /// An achievement category was requested without being configured.
    #[error("no achievement is configured for category `{0}`")]
    UnknownAchievement(AchievementCategory),
    /// The same achievement category was configured twice.
    #[error("achievement category `{0}` is configured more than once")]
    DuplicateAchievement(AchievementCategory),
    /// Thresholds and rewards of an achievement have different lengths.
    #[error("achievement `{category}` has {thresholds} thresholds but {rewards} rewards")]
    MismatchedRewards {
        /// Offending category.
        category: AchievementCategory,
        /// Number of thresholds.
        thresholds: usize,
        /// Number of rewards.
        rewards: usize,
    },
    /// Thresholds of an achievement are not strictly ascending.
    #[error("achievement `{0}` thresholds must be strictly ascending")]
    UnorderedThresholds(AchievementCategory),
    /// The first wave would spawn no enemies.
    #[error("the first wave must spawn at least one enemy")]
    EmptyQuota,
    /// The arena has a non-positive dimension.
    #[error("arena dimensions must be positive")]
    InvalidArena,
    /// An enemy profile has a negative or non-finite base value or scaling step.
    #[error("{0} enemy profile must only contain finite, non-negative values")]
    NegativeScaling(EnemyArchetype),
    /// Boss phase thresholds are not strictly descending fractions in (0, 1).
    #[error("boss phase thresholds must be strictly descending fractions between 0 and 1")]
    InvalidPhaseThresholds,
    /// A probability lies outside `[0, 1]`.
    #[error("probability {0} lies outside [0, 1]")]
    InvalidChance(f64),
    /// Drops are enabled but no powerup kind can be drawn.
    #[error("powerups can drop but `combat.drop_kinds` is empty")]
    EmptyDropPool,
    /// A duration that must be positive is zero.
    #[error("duration `{0}` must be positive")]
    InvalidDuration(&'static str),
    /// A multiplier that must be positive and finite is not.
    #[error("multiplier `{0}` must be positive and finite")]
    InvalidFactor(&'static str),
}

/// Aggregated tuning for a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Seed driving spawn placement and powerup drops.
    pub seed: u64,
    /// Arena geometry.
    pub arena: ArenaTuning,
    /// Wave quota escalation and pacing.
    pub wave: WaveTuning,
    /// Spawn release policy and wave composition.
    pub spawning: SpawnTuning,
    /// Enemy archetype profiles and behaviors.
    pub enemies: EnemyTuning,
    /// Player baseline stats.
    pub player: PlayerTuning,
    /// Combat rules.
    pub combat: CombatTuning,
    /// Powerup effects and durations.
    pub powerups: PowerupTuning,
    /// Coin, score, and experience rewards.
    pub rewards: RewardTuning,
    /// Threshold achievements.
    pub achievements: Vec<AchievementTuning>,
    /// Skill tree upgrades.
    pub skills: SkillTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            seed: 0x5eed_0f_3a7e,
            arena: ArenaTuning::default(),
            wave: WaveTuning::default(),
            spawning: SpawnTuning::default(),
            enemies: EnemyTuning::default(),
            player: PlayerTuning::default(),
            combat: CombatTuning::default(),
            powerups: PowerupTuning::default(),
            rewards: RewardTuning::default(),
            achievements: default_achievements(),
            skills: SkillTuning::default(),
        }
    }
}

impl Tuning {
    /// Checks every table for values that would break simulation invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let arena = &self.arena;
        if !(finite_positive(arena.width)
            && finite_positive(arena.height)
            && finite_non_negative(arena.spawn_margin))
        {
            return Err(ConfigError::InvalidArena);
        }
        if self.wave.initial_enemies == 0 {
            return Err(ConfigError::EmptyQuota);
        }
        if self.spawning.release == ReleasePolicy::Staggered && self.spawning.interval_ms == 0 {
            return Err(ConfigError::InvalidDuration("spawning.interval_ms"));
        }
        for archetype in EnemyArchetype::ALL {
            if !self.enemies.profile(archetype).is_non_negative() {
                return Err(ConfigError::NegativeScaling(archetype));
            }
        }
        self.enemies.validate_behaviors()?;
        self.player.validate()?;
        if !(0.0..=1.0).contains(&self.combat.drop_chance) {
            return Err(ConfigError::InvalidChance(self.combat.drop_chance));
        }
        if self.combat.drop_chance > 0.0 && self.combat.drop_kinds.is_empty() {
            return Err(ConfigError::EmptyDropPool);
        }
        self.powerups.validate()?;
        self.rewards.validate()?;
        self.skills.validate()?;
        self.validate_achievements()
    }

    fn validate_achievements(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for achievement in &self.achievements {
            if !seen.insert(achievement.category) {
                return Err(ConfigError::DuplicateAchievement(achievement.category));
            }
            if achievement.thresholds.len() != achievement.rewards.len() {
                return Err(ConfigError::MismatchedRewards {
                    category: achievement.category,
                    thresholds: achievement.thresholds.len(),
                    rewards: achievement.rewards.len(),
                });
            }
            if achievement
                .thresholds
                .windows(2)
                .any(|pair| pair[0] >= pair[1])
            {
                return Err(ConfigError::UnorderedThresholds(achievement.category));
            }
        }
        Ok(())
    }
}

/// Arena geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    /// Width of the visible arena in world units.
    pub width: f32,
    /// Height of the visible arena in world units.
    pub height: f32,
    /// Distance outside the visible bounds at which enemies appear.
    pub spawn_margin: f32,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            spawn_margin: 50.0,
        }
    }
}

/// Wave quota escalation and pacing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    /// Enemies spawned by the first wave.
    pub initial_enemies: u32,
    /// Additional enemies spawned by each later wave.
    pub increase_per_wave: u32,
    /// Pause between a cleared wave and the next one, in milliseconds.
    pub intermission_ms: u64,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            initial_enemies: 10,
            increase_per_wave: 5,
            intermission_ms: 5_000,
        }
    }
}

impl WaveTuning {
    /// Total enemies spawned by wave `wave` (one-based).
    #[must_use]
    pub fn quota(&self, wave: u32) -> u32 {
        self.initial_enemies
            .saturating_add(wave.saturating_sub(1).saturating_mul(self.increase_per_wave))
    }

    /// Pause between waves.
    #[must_use]
    pub const fn intermission(&self) -> Duration {
        Duration::from_millis(self.intermission_ms)
    }
}

/// How the spawns of a wave are spread over time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleasePolicy {
    /// Every spawn of the wave fires at wave start.
    AllAtOnce,
    /// Spawn `i` fires `i * interval` after wave start.
    Staggered,
}

/// Spawn release policy and wave composition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Release policy for the spawns of a wave.
    pub release: ReleasePolicy,
    /// Interval between staggered spawns, in milliseconds.
    pub interval_ms: u64,
    /// First wave that contains ranged enemies.
    pub ranged_from_wave: u32,
    /// Every n-th spawn of an eligible wave is ranged; zero disables ranged enemies.
    pub ranged_every: u32,
    /// Every n-th wave ends with a boss; zero disables bosses.
    pub boss_every: u32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            release: ReleasePolicy::Staggered,
            interval_ms: 500,
            ranged_from_wave: 3,
            ranged_every: 4,
            boss_every: 5,
        }
    }
}

impl SpawnTuning {
    /// Interval between staggered spawns.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Base values and per-wave scaling steps of an enemy archetype.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyProfile {
    /// Health before wave scaling.
    pub base_health: f32,
    /// Health added per wave.
    pub health_step: f32,
    /// Speed before wave scaling.
    pub base_speed: f32,
    /// Speed added per wave.
    pub speed_step: f32,
    /// Contact damage before wave scaling.
    pub base_contact_damage: f32,
    /// Contact damage added per wave.
    pub contact_damage_step: f32,
    /// Points per wave number awarded for a kill.
    pub points_per_wave: u32,
}

impl Default for EnemyProfile {
    fn default() -> Self {
        Self {
            base_health: 50.0,
            health_step: 10.0,
            base_speed: 100.0,
            speed_step: 5.0,
            base_contact_damage: 10.0,
            contact_damage_step: 0.5,
            points_per_wave: 10,
        }
    }
}

impl EnemyProfile {
    fn is_non_negative(&self) -> bool {
        [
            self.base_health,
            self.health_step,
            self.base_speed,
            self.speed_step,
            self.base_contact_damage,
            self.contact_damage_step,
        ]
        .into_iter()
        .all(finite_non_negative)
            && self.base_health > 0.0
    }
}

/// Standoff and firing parameters of ranged enemies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangedTuning {
    /// Preferred distance to the player.
    pub standoff: f32,
    /// Tolerance above the standoff distance within which the enemy holds still.
    pub band: f32,
    /// Fraction of full speed used when closing in.
    pub approach_factor: f32,
    /// Time between shots, in milliseconds.
    pub cooldown_ms: u64,
    /// Projectile speed in world units per second.
    pub projectile_speed: f32,
    /// Projectile lifetime, in milliseconds.
    pub projectile_ttl_ms: u64,
}

impl Default for RangedTuning {
    fn default() -> Self {
        Self {
            standoff: 200.0,
            band: 50.0,
            approach_factor: 0.5,
            cooldown_ms: 2_000,
            projectile_speed: 200.0,
            projectile_ttl_ms: 3_000,
        }
    }
}

/// Phase and attack parameters of bosses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    /// Initial time between attacks, in milliseconds.
    pub cooldown_ms: u64,
    /// Health fractions at which the boss changes phase, strictly descending.
    pub phase_thresholds: Vec<f32>,
    /// Factor applied to the attack cooldown at each phase transition.
    pub cooldown_factor: f32,
    /// Health restored at each phase transition.
    pub phase_regen: f32,
    /// Projectile speed in world units per second.
    pub projectile_speed: f32,
    /// Projectile lifetime, in milliseconds.
    pub projectile_ttl_ms: u64,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            cooldown_ms: 3_000,
            phase_thresholds: vec![0.7, 0.4, 0.2],
            cooldown_factor: 0.8,
            phase_regen: 100.0,
            projectile_speed: 150.0,
            projectile_ttl_ms: 4_000,
        }
    }
}

/// Enemy archetype profiles and behaviors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    /// Profile of basic enemies.
    pub basic: EnemyProfile,
    /// Profile of ranged enemies.
    pub ranged: EnemyProfile,
    /// Profile of bosses.
    pub boss: EnemyProfile,
    /// Ranged behavior parameters.
    pub ranged_behavior: RangedTuning,
    /// Boss behavior parameters.
    pub boss_behavior: BossTuning,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            basic: EnemyProfile::default(),
            ranged: EnemyProfile {
                base_health: 80.0,
                health_step: 10.0,
                base_speed: 80.0,
                speed_step: 4.0,
                base_contact_damage: 15.0,
                contact_damage_step: 0.5,
                points_per_wave: 15,
            },
            boss: EnemyProfile {
                base_health: 1_000.0,
                health_step: 100.0,
                base_speed: 60.0,
                speed_step: 2.0,
                base_contact_damage: 30.0,
                contact_damage_step: 1.0,
                points_per_wave: 100,
            },
            ranged_behavior: RangedTuning::default(),
            boss_behavior: BossTuning::default(),
        }
    }
}

impl EnemyTuning {
    /// Profile of the provided archetype.
    #[must_use]
    pub const fn profile(&self, archetype: EnemyArchetype) -> &EnemyProfile {
        match archetype {
            EnemyArchetype::Basic => &self.basic,
            EnemyArchetype::Ranged => &self.ranged,
            EnemyArchetype::Boss => &self.boss,
        }
    }

    fn validate_behaviors(&self) -> Result<(), ConfigError> {
        let ranged = &self.ranged_behavior;
        let ranged_numbers = [
            ranged.standoff,
            ranged.band,
            ranged.approach_factor,
            ranged.projectile_speed,
        ];
        if !ranged_numbers.into_iter().all(finite_non_negative) {
            return Err(ConfigError::InvalidFactor("enemies.ranged_behavior"));
        }
        if ranged.cooldown_ms == 0 {
            return Err(ConfigError::InvalidDuration("enemies.ranged_behavior.cooldown_ms"));
        }
        if ranged.projectile_ttl_ms == 0 {
            return Err(ConfigError::InvalidDuration(
                "enemies.ranged_behavior.projectile_ttl_ms",
            ));
        }
        let boss = &self.boss_behavior;
        if boss.cooldown_ms == 0 {
            return Err(ConfigError::InvalidDuration("enemies.boss_behavior.cooldown_ms"));
        }
        if boss.projectile_ttl_ms == 0 {
            return Err(ConfigError::InvalidDuration(
                "enemies.boss_behavior.projectile_ttl_ms",
            ));
        }
        // Phase transitions only ever shorten the cooldown.
        if !(finite_positive(boss.cooldown_factor) && boss.cooldown_factor <= 1.0) {
            return Err(ConfigError::InvalidFactor("enemies.boss_behavior.cooldown_factor"));
        }
        if !(finite_non_negative(boss.phase_regen) && finite_non_negative(boss.projectile_speed)) {
            return Err(ConfigError::InvalidFactor("enemies.boss_behavior"));
        }
        let in_range = boss
            .phase_thresholds
            .iter()
            .all(|threshold| *threshold > 0.0 && *threshold < 1.0);
        let descending = boss
            .phase_thresholds
            .windows(2)
            .all(|pair| pair[0] > pair[1]);
        if !(in_range && descending) {
            return Err(ConfigError::InvalidPhaseThresholds);
        }
        Ok(())
    }
}

/// Player baseline stats and combat timing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Starting and maximum health.
    pub max_health: f32,
    /// Movement speed in world units per second.
    pub move_speed: f32,
    /// Milliseconds between shots.
    pub fire_interval_ms: f32,
    /// Damage of each projectile.
    pub projectile_damage: f32,
    /// Projectile speed in world units per second.
    pub projectile_speed: f32,
    /// Projectile lifetime, in milliseconds.
    pub projectile_ttl_ms: u64,
    /// Window after taking damage during which further damage is negated, in milliseconds.
    pub invulnerability_ms: u64,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            move_speed: 200.0,
            fire_interval_ms: 500.0,
            projectile_damage: 25.0,
            projectile_speed: 400.0,
            projectile_ttl_ms: 2_000,
            invulnerability_ms: 1_000,
        }
    }
}

impl PlayerTuning {
    /// Baseline stat block derived from the tuning.
    #[must_use]
    pub const fn baseline(&self) -> StatBlock {
        StatBlock {
            move_speed: self.move_speed,
            fire_interval_ms: self.fire_interval_ms,
            projectile_damage: self.projectile_damage,
            projectile_speed: self.projectile_speed,
            max_health: self.max_health,
        }
    }

    /// Window after taking damage during which further damage is negated.
    #[must_use]
    pub const fn invulnerability(&self) -> Duration {
        Duration::from_millis(self.invulnerability_ms)
    }

    /// Lifetime of player projectiles.
    #[must_use]
    pub const fn projectile_ttl(&self) -> Duration {
        Duration::from_millis(self.projectile_ttl_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !finite_positive(self.max_health) {
            return Err(ConfigError::InvalidFactor("player.max_health"));
        }
        let numbers = [
            self.fire_interval_ms,
            self.move_speed,
            self.projectile_damage,
            self.projectile_speed,
        ];
        if !numbers.into_iter().all(finite_non_negative) {
            return Err(ConfigError::InvalidFactor("player"));
        }
        if self.projectile_ttl_ms == 0 {
            return Err(ConfigError::InvalidDuration("player.projectile_ttl_ms"));
        }
        Ok(())
    }
}

/// Combat rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Probability that a killed enemy drops a powerup.
    pub drop_chance: f64,
    /// Powerup kinds a drop is drawn from uniformly.
    pub drop_kinds: Vec<PowerupKind>,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            drop_chance: 0.1,
            drop_kinds: PowerupKind::ALL.to_vec(),
        }
    }
}

/// Multiplier and duration of a timed stat boost.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimedBoost {
    /// Factor applied to the boosted stat.
    pub factor: f32,
    /// Duration of the boost, in milliseconds.
    pub duration_ms: u64,
}

/// Keys of a boost table as written in a file; absent keys keep the default.
#[derive(Deserialize)]
struct TimedBoostKeys {
    factor: Option<f32>,
    duration_ms: Option<u64>,
}

fn overlay_boost<'de, D>(
    deserializer: D,
    pick: fn(PowerupTuning) -> TimedBoost,
) -> Result<TimedBoost, D::Error>
where
    D: Deserializer<'de>,
{
    let keys = TimedBoostKeys::deserialize(deserializer)?;
    let base = pick(PowerupTuning::default());
    Ok(TimedBoost {
        factor: keys.factor.unwrap_or(base.factor),
        duration_ms: keys.duration_ms.unwrap_or(base.duration_ms),
    })
}

fn speed_boost<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimedBoost, D::Error> {
    overlay_boost(deserializer, |defaults| defaults.speed)
}

fn rapid_fire_boost<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimedBoost, D::Error> {
    overlay_boost(deserializer, |defaults| defaults.rapid_fire)
}

fn damage_boost<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimedBoost, D::Error> {
    overlay_boost(deserializer, |defaults| defaults.damage)
}

/// Powerup effects and durations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerupTuning {
    /// Movement speed boost.
    #[serde(deserialize_with = "speed_boost")]
    pub speed: TimedBoost,
    /// Fire interval boost; factors below one shoot faster.
    #[serde(deserialize_with = "rapid_fire_boost")]
    pub rapid_fire: TimedBoost,
    /// Projectile damage boost.
    #[serde(deserialize_with = "damage_boost")]
    pub damage: TimedBoost,
    /// Shield duration, in milliseconds.
    pub shield_duration_ms: u64,
    /// Health restored by the health powerup.
    pub heal_amount: f32,
}

impl Default for PowerupTuning {
    fn default() -> Self {
        Self {
            speed: TimedBoost {
                factor: 1.5,
                duration_ms: 5_000,
            },
            rapid_fire: TimedBoost {
                factor: 0.5,
                duration_ms: 4_000,
            },
            damage: TimedBoost {
                factor: 1.5,
                duration_ms: 6_000,
            },
            shield_duration_ms: 8_000,
            heal_amount: 25.0,
        }
    }
}

impl PowerupTuning {
    /// Duration of a timed powerup; `None` for instant powerups.
    #[must_use]
    pub const fn duration(&self, kind: PowerupKind) -> Option<Duration> {
        let millis = match kind {
            PowerupKind::Speed => self.speed.duration_ms,
            PowerupKind::RapidFire => self.rapid_fire.duration_ms,
            PowerupKind::Damage => self.damage.duration_ms,
            PowerupKind::Shield => self.shield_duration_ms,
            PowerupKind::Health => return None,
        };
        Some(Duration::from_millis(millis))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, boost) in [
            ("powerups.speed", &self.speed),
            ("powerups.rapid_fire", &self.rapid_fire),
            ("powerups.damage", &self.damage),
        ] {
            if !finite_positive(boost.factor) {
                return Err(ConfigError::InvalidFactor(name));
            }
            if boost.duration_ms == 0 {
                return Err(ConfigError::InvalidDuration(name));
            }
        }
        if self.shield_duration_ms == 0 {
            return Err(ConfigError::InvalidDuration("powerups.shield_duration_ms"));
        }
        if !finite_non_negative(self.heal_amount) {
            return Err(ConfigError::InvalidFactor("powerups.heal_amount"));
        }
        Ok(())
    }
}

/// Coin, score, and experience rewards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardTuning {
    /// Coins per wave number granted when a wave is cleared.
    pub coins_per_wave: u64,
    /// Score per wave number granted when a wave is cleared.
    pub score_per_wave: u64,
    /// Experience per wave number granted when a wave is cleared.
    pub experience_per_wave: u64,
    /// Experience required to leave level one.
    pub level_base: f64,
    /// Growth of the experience requirement per level.
    pub level_growth: f64,
    /// Coins per level number granted on level-up.
    pub level_up_coins: u64,
    /// Skill points granted on every level-up.
    pub skill_points_base: u32,
    /// One extra skill point is granted for every this many levels; zero disables.
    pub skill_points_every: u32,
    /// One-shot challenge goals and rewards.
    pub challenges: ChallengeTuning,
}

impl Default for RewardTuning {
    fn default() -> Self {
        Self {
            coins_per_wave: 5,
            score_per_wave: 100,
            experience_per_wave: 50,
            level_base: 100.0,
            level_growth: 1.2,
            level_up_coins: 100,
            skill_points_base: 1,
            skill_points_every: 5,
            challenges: ChallengeTuning::default(),
        }
    }
}

impl RewardTuning {
    /// Experience required to advance from `level` to the next one.
    #[must_use]
    pub fn level_threshold(&self, level: u32) -> u64 {
        let exponent = i32::try_from(level.saturating_sub(1)).unwrap_or(i32::MAX);
        // The epsilon keeps values like 1.2 * 100 from flooring to 119.
        let threshold = (self.level_base * self.level_growth.powi(exponent) + 1e-9).floor();
        if threshold >= u64::MAX as f64 {
            u64::MAX
        } else {
            (threshold as u64).max(1)
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let finite = self.level_base.is_finite() && self.level_growth.is_finite();
        if !(finite && self.level_base > 0.0 && self.level_growth > 0.0) {
            return Err(ConfigError::InvalidFactor("rewards.level_base"));
        }
        Ok(())
    }

    /// Skill points granted for reaching `level`.
    #[must_use]
    pub fn skill_points_for(&self, level: u32) -> u32 {
        let bonus = match self.skill_points_every {
            0 => 0,
            every => level / every,
        };
        self.skill_points_base.saturating_add(bonus)
    }
}

/// Goals and rewards of the one-shot challenges.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeTuning {
    /// Waves that must be cleared for the speed run.
    pub speed_run_waves: u32,
    /// Whole seconds since the run started within which the speed run counts.
    pub speed_run_seconds: u64,
    /// Coins granted for the speed run.
    pub speed_run_coins: u64,
    /// Experience granted for the speed run.
    pub speed_run_experience: u64,
    /// Coins granted for killing a boss without taking damage during its wave.
    pub perfect_boss_coins: u64,
    /// Experience granted for killing a boss without taking damage during its wave.
    pub perfect_boss_experience: u64,
}

impl Default for ChallengeTuning {
    fn default() -> Self {
        Self {
            speed_run_waves: 10,
            speed_run_seconds: 300,
            speed_run_coins: 1_000,
            speed_run_experience: 500,
            perfect_boss_coins: 2_000,
            perfect_boss_experience: 1_000,
        }
    }
}

impl ChallengeTuning {
    /// Coins and experience granted by a challenge.
    #[must_use]
    pub const fn reward(&self, challenge: ChallengeKind) -> (u64, u64) {
        match challenge {
            ChallengeKind::SpeedRun => (self.speed_run_coins, self.speed_run_experience),
            ChallengeKind::PerfectBoss => (self.perfect_boss_coins, self.perfect_boss_experience),
        }
    }
}

/// Thresholds and positionally paired coin rewards of one achievement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AchievementTuning {
    /// Counter the achievement tracks.
    pub category: AchievementCategory,
    /// Strictly ascending counter values.
    pub thresholds: Vec<u64>,
    /// Coins granted when the threshold at the same index is crossed.
    pub rewards: Vec<u64>,
}

fn default_achievements() -> Vec<AchievementTuning> {
    vec![
        AchievementTuning {
            category: AchievementCategory::KillCount,
            thresholds: vec![10, 50, 100],
            rewards: vec![5, 15, 30],
        },
        AchievementTuning {
            category: AchievementCategory::WaveSurvival,
            thresholds: vec![5, 10, 20],
            rewards: vec![10, 20, 40],
        },
        AchievementTuning {
            category: AchievementCategory::SurvivalTime,
            thresholds: vec![300, 600, 900],
            rewards: vec![8, 16, 32],
        },
        AchievementTuning {
            category: AchievementCategory::PowerupsCollected,
            thresholds: vec![20],
            rewards: vec![50],
        },
        AchievementTuning {
            category: AchievementCategory::BossesDefeated,
            thresholds: vec![1, 5],
            rewards: vec![100, 250],
        },
        AchievementTuning {
            category: AchievementCategory::KillStreak,
            thresholds: vec![10, 25, 50],
            rewards: vec![50, 125, 250],
        },
        AchievementTuning {
            category: AchievementCategory::PerfectWaves,
            thresholds: vec![1, 5],
            rewards: vec![75, 200],
        },
    ]
}

/// Parameters of a single skill.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkillSpec {
    /// Factor applied to the skill's stat per level.
    pub factor: f32,
    /// Highest level that can be bought.
    pub max_level: u32,
    /// Skill points spent per level.
    pub cost: u32,
}

/// Keys of a skill table as written in a file; absent keys keep the default.
#[derive(Deserialize)]
struct SkillSpecKeys {
    factor: Option<f32>,
    max_level: Option<u32>,
    cost: Option<u32>,
}

fn overlay_skill<'de, D>(
    deserializer: D,
    pick: fn(SkillTuning) -> SkillSpec,
) -> Result<SkillSpec, D::Error>
where
    D: Deserializer<'de>,
{
    let keys = SkillSpecKeys::deserialize(deserializer)?;
    let base = pick(SkillTuning::default());
    Ok(SkillSpec {
        factor: keys.factor.unwrap_or(base.factor),
        max_level: keys.max_level.unwrap_or(base.max_level),
        cost: keys.cost.unwrap_or(base.cost),
    })
}

fn damage_skill<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SkillSpec, D::Error> {
    overlay_skill(deserializer, |defaults| defaults.damage)
}

fn fire_rate_skill<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SkillSpec, D::Error> {
    overlay_skill(deserializer, |defaults| defaults.fire_rate)
}

fn move_speed_skill<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SkillSpec, D::Error> {
    overlay_skill(deserializer, |defaults| defaults.move_speed)
}

fn projectile_speed_skill<'de, D>(deserializer: D) -> Result<SkillSpec, D::Error>
where
    D: Deserializer<'de>,
{
    overlay_skill(deserializer, |defaults| defaults.projectile_speed)
}

/// Skill tree upgrades.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillTuning {
    /// Projectile damage upgrade.
    #[serde(deserialize_with = "damage_skill")]
    pub damage: SkillSpec,
    /// Fire interval upgrade; factors below one shoot faster.
    #[serde(deserialize_with = "fire_rate_skill")]
    pub fire_rate: SkillSpec,
    /// Movement speed upgrade.
    #[serde(deserialize_with = "move_speed_skill")]
    pub move_speed: SkillSpec,
    /// Projectile speed upgrade.
    #[serde(deserialize_with = "projectile_speed_skill")]
    pub projectile_speed: SkillSpec,
}

impl Default for SkillTuning {
    fn default() -> Self {
        Self {
            damage: SkillSpec {
                factor: 1.2,
                max_level: 5,
                cost: 1,
            },
            fire_rate: SkillSpec {
                factor: 0.9,
                max_level: 5,
                cost: 1,
            },
            move_speed: SkillSpec {
                factor: 1.15,
                max_level: 5,
                cost: 1,
            },
            projectile_speed: SkillSpec {
                factor: 1.25,
                max_level: 3,
                cost: 2,
            },
        }
    }
}

impl SkillTuning {
    /// Parameters of the provided skill.
    #[must_use]
    pub const fn spec(&self, skill: SkillKind) -> &SkillSpec {
        match skill {
            SkillKind::Damage => &self.damage,
            SkillKind::FireRate => &self.fire_rate,
            SkillKind::MoveSpeed => &self.move_speed,
            SkillKind::ProjectileSpeed => &self.projectile_speed,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for skill in SkillKind::ALL {
            if !finite_positive(self.spec(skill).factor) {
                return Err(ConfigError::InvalidFactor(skill.name()));
            }
        }
        Ok(())
    }
}

fn finite_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn finite_non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}
