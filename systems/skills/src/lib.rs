#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Skill tree of permanent upgrades bought with skill points.

use std::collections::BTreeMap;

use tracing::debug;
use wave_survival_core::{config::SkillTuning, PlayerStats, SkillKind, SkillLevel};

pub use wave_survival_core::UpgradeError;

/// Levels bought in each skill of a run.
#[derive(Clone, Debug)]
pub struct SkillTree {
    tuning: SkillTuning,
    levels: BTreeMap<SkillKind, u32>,
}

impl SkillTree {
    /// Creates a tree with every skill at level zero.
    #[must_use]
    pub fn new(tuning: SkillTuning) -> Self {
        Self {
            tuning,
            levels: SkillKind::ALL.into_iter().map(|skill| (skill, 0)).collect(),
        }
    }

    /// Level bought in `skill`.
    #[must_use]
    pub fn level(&self, skill: SkillKind) -> u32 {
        self.levels.get(&skill).copied().unwrap_or(0)
    }

    /// Levels of every skill in declaration order.
    #[must_use]
    pub fn levels(&self) -> Vec<SkillLevel> {
        self.levels
            .iter()
            .map(|(skill, level)| SkillLevel {
                skill: *skill,
                level: *level,
            })
            .collect()
    }

    /// Spends skill points on the next level of `skill` and scales the
    /// matching permanent multiplier. Returns the level reached.
    pub fn upgrade(
        &mut self,
        skill: SkillKind,
        points: &mut u32,
        stats: &mut PlayerStats,
    ) -> Result<u32, UpgradeError> {
        let spec = self.tuning.spec(skill);
        let level = self.level(skill);
        if level >= spec.max_level {
            return Err(UpgradeError::MaxLevel);
        }
        if *points < spec.cost {
            return Err(UpgradeError::InsufficientPoints);
        }

        *points -= spec.cost;
        stats.scale_permanent(skill.stat(), spec.factor);
        let level = level + 1;
        let _ = self.levels.insert(skill, level);
        debug!(%skill, level, "skill upgraded");
        Ok(level)
    }
}
