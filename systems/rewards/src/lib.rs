#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Run progress ledger: score, coins, experience, levels, threshold
//! achievements, and one-shot challenges.
//!
//! Every mutation emits the matching event at the mutation site, so observers
//! never need to diff the run state. The ledger also remembers whether the
//! player took damage during the current wave, which drives kill streaks,
//! perfect waves, and the perfect boss challenge.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;
use wave_survival_core::{
    config::{AchievementTuning, RewardTuning},
    AchievementCategory, AchievementId, ChallengeKind, ConfigError, EnemyArchetype, Event,
    RunState,
};

#[derive(Clone, Debug)]
struct Achievement {
    thresholds: Vec<u64>,
    rewards: Vec<u64>,
    awarded: BTreeSet<usize>,
}

/// Accumulates rewards for a single run.
#[derive(Clone, Debug)]
pub struct RewardLedger {
    tuning: RewardTuning,
    achievements: BTreeMap<AchievementCategory, Achievement>,
    challenges: BTreeSet<ChallengeKind>,
    state: RunState,
    seconds_survived: u64,
    damaged_this_wave: bool,
}

impl RewardLedger {
    /// Creates an empty ledger with the provided achievements registered.
    #[must_use]
    pub fn new(tuning: RewardTuning, achievements: &[AchievementTuning]) -> Self {
        let achievements = achievements
            .iter()
            .map(|achievement| {
                (
                    achievement.category,
                    Achievement {
                        thresholds: achievement.thresholds.clone(),
                        rewards: achievement.rewards.clone(),
                        awarded: BTreeSet::new(),
                    },
                )
            })
            .collect();
        Self {
            tuning,
            achievements,
            challenges: BTreeSet::new(),
            state: RunState::default(),
            seconds_survived: 0,
            damaged_this_wave: false,
        }
    }

    /// Progress of the run.
    #[must_use]
    pub const fn state(&self) -> &RunState {
        &self.state
    }

    /// Unspent skill points, handed to the skill tree when buying upgrades.
    pub fn skill_points_mut(&mut self) -> &mut u32 {
        &mut self.state.skill_points
    }

    /// Every awarded achievement threshold in ascending order.
    #[must_use]
    pub fn unlocked(&self) -> Vec<AchievementId> {
        self.achievements
            .iter()
            .flat_map(|(category, achievement)| {
                achievement.awarded.iter().map(|index| AchievementId {
                    category: *category,
                    tier: u32::try_from(*index).unwrap_or(u32::MAX),
                })
            })
            .collect()
    }

    /// Completed challenges in ascending order.
    #[must_use]
    pub fn completed_challenges(&self) -> Vec<ChallengeKind> {
        self.challenges.iter().copied().collect()
    }

    /// Counts a kill, adds its points and experience, and evaluates kill
    /// achievements. A boss killed during an undamaged wave completes the
    /// perfect boss challenge.
    pub fn record_kill(
        &mut self,
        archetype: EnemyArchetype,
        points: u32,
        out_events: &mut Vec<Event>,
    ) {
        self.state.kills = self.state.kills.saturating_add(1);
        self.state.score = self.state.score.saturating_add(u64::from(points));
        self.emit_score(out_events);
        self.add_experience(u64::from(points), out_events);
        self.track(AchievementCategory::KillCount, u64::from(self.state.kills), out_events);
        self.state.kill_streak = self.state.kill_streak.saturating_add(1);
        let streak = u64::from(self.state.kill_streak);
        self.track(AchievementCategory::KillStreak, streak, out_events);

        if archetype == EnemyArchetype::Boss {
            self.state.bosses_defeated = self.state.bosses_defeated.saturating_add(1);
            let bosses = u64::from(self.state.bosses_defeated);
            self.track(AchievementCategory::BossesDefeated, bosses, out_events);
            if !self.damaged_this_wave {
                self.complete_challenge(ChallengeKind::PerfectBoss, out_events);
            }
        }
    }

    /// Tracks the highest wave reached and starts a fresh damage record.
    pub fn record_wave_started(&mut self, wave: u32) {
        self.state.highest_wave = self.state.highest_wave.max(wave);
        self.damaged_this_wave = false;
    }

    /// Notes that the player lost health, ending the kill streak and spoiling
    /// the current wave for perfect wave and perfect boss rewards.
    pub fn record_player_damaged(&mut self) {
        self.state.kill_streak = 0;
        self.damaged_this_wave = true;
    }

    /// Grants the end-of-wave bonus and evaluates wave achievements.
    pub fn record_wave_cleared(&mut self, wave: u32, out_events: &mut Vec<Event>) {
        let wave_number = u64::from(wave);
        self.state.waves_completed = self.state.waves_completed.saturating_add(1);
        self.state.coins = self
            .state
            .coins
            .saturating_add(wave_number.saturating_mul(self.tuning.coins_per_wave));
        self.state.score = self
            .state
            .score
            .saturating_add(wave_number.saturating_mul(self.tuning.score_per_wave));
        self.emit_score(out_events);
        let experience = wave_number.saturating_mul(self.tuning.experience_per_wave);
        self.add_experience(experience, out_events);
        let completed = u64::from(self.state.waves_completed);
        self.track(AchievementCategory::WaveSurvival, completed, out_events);

        if !self.damaged_this_wave {
            self.state.perfect_waves = self.state.perfect_waves.saturating_add(1);
            let perfect = u64::from(self.state.perfect_waves);
            self.track(AchievementCategory::PerfectWaves, perfect, out_events);
        }
        let goals = &self.tuning.challenges;
        if self.state.waves_completed >= goals.speed_run_waves
            && self.seconds_survived <= goals.speed_run_seconds
        {
            self.complete_challenge(ChallengeKind::SpeedRun, out_events);
        }
    }

    /// Counts a collected powerup and evaluates powerup achievements.
    pub fn record_powerup_collected(&mut self, out_events: &mut Vec<Event>) {
        self.state.powerups_collected = self.state.powerups_collected.saturating_add(1);
        let collected = u64::from(self.state.powerups_collected);
        self.track(AchievementCategory::PowerupsCollected, collected, out_events);
    }

    /// Evaluates survival time achievements against whole seconds survived.
    pub fn record_survival(&mut self, seconds: u64, out_events: &mut Vec<Event>) {
        self.seconds_survived = self.seconds_survived.max(seconds);
        self.track(AchievementCategory::SurvivalTime, seconds, out_events);
    }

    /// Awards every threshold of `category` that `value` reaches and that was
    /// not awarded before. Returns the coins granted by this call.
    pub fn check_and_award(
        &mut self,
        category: AchievementCategory,
        value: u64,
        out_events: &mut Vec<Event>,
    ) -> Result<u64, ConfigError> {
        let achievement = self
            .achievements
            .get_mut(&category)
            .ok_or(ConfigError::UnknownAchievement(category))?;

        let mut granted = 0_u64;
        for (index, (threshold, reward)) in achievement
            .thresholds
            .iter()
            .zip(&achievement.rewards)
            .enumerate()
        {
            if value < *threshold || achievement.awarded.contains(&index) {
                continue;
            }
            let _ = achievement.awarded.insert(index);
            granted = granted.saturating_add(*reward);
            let tier = u32::try_from(index).unwrap_or(u32::MAX);
            debug!(%category, tier, reward, "achievement unlocked");
            out_events.push(Event::AchievementUnlocked {
                category,
                tier,
                reward: *reward,
            });
        }

        if granted > 0 {
            self.state.coins = self.state.coins.saturating_add(granted);
            self.emit_score(out_events);
        }
        Ok(granted)
    }

    /// Adds experience, levelling up as many times as the total allows.
    pub fn add_experience(&mut self, amount: u64, out_events: &mut Vec<Event>) {
        if amount == 0 {
            return;
        }
        self.state.experience = self.state.experience.saturating_add(amount);

        let mut level_ups = Vec::new();
        loop {
            let threshold = self.tuning.level_threshold(self.state.level);
            if self.state.experience < threshold {
                break;
            }
            self.state.experience -= threshold;
            self.state.level = self.state.level.saturating_add(1);
            let level = self.state.level;
            let coins = self.tuning.level_up_coins.saturating_mul(u64::from(level));
            let skill_points = self.tuning.skill_points_for(level);
            self.state.coins = self.state.coins.saturating_add(coins);
            self.state.skill_points = self.state.skill_points.saturating_add(skill_points);
            debug!(level, coins, skill_points, "level up");
            level_ups.push(Event::LevelUp {
                level,
                coins,
                skill_points,
            });
        }

        out_events.push(Event::ExperienceGained {
            amount,
            total: self.state.experience,
        });
        if !level_ups.is_empty() {
            out_events.append(&mut level_ups);
            self.emit_score(out_events);
        }
    }

    /// Grants a challenge's coins and experience the first time it completes.
    fn complete_challenge(&mut self, challenge: ChallengeKind, out_events: &mut Vec<Event>) {
        if !self.challenges.insert(challenge) {
            return;
        }
        let (coins, experience) = self.tuning.challenges.reward(challenge);
        debug!(%challenge, coins, experience, "challenge completed");
        out_events.push(Event::ChallengeCompleted {
            challenge,
            coins,
            experience,
        });
        self.state.coins = self.state.coins.saturating_add(coins);
        self.emit_score(out_events);
        self.add_experience(experience, out_events);
    }

    fn track(&mut self, category: AchievementCategory, value: u64, out_events: &mut Vec<Event>) {
        // Categories without a registered achievement are simply not tracked.
        if self.achievements.contains_key(&category) {
            let _ = self.check_and_award(category, value, out_events);
        }
    }

    fn emit_score(&self, out_events: &mut Vec<Event>) {
        out_events.push(Event::ScoreUpdated {
            score: self.state.score,
            coins: self.state.coins,
        });
    }
}
