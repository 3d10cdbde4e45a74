#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawn planning: boundary spawn points, release delays, and
//! the archetype composition of each wave.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wave_survival_core::{
    config::{ArenaTuning, ReleasePolicy, SpawnTuning},
    EnemyArchetype, Vec2, RNG_STREAM_SPAWNING,
};

/// Edge of the arena an enemy enters from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Above the visible area.
    Top,
    /// Right of the visible area.
    Right,
    /// Below the visible area.
    Bottom,
    /// Left of the visible area.
    Left,
}

impl Edge {
    const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];
}

/// Single spawn of a wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnOrder {
    /// Zero-based index of the spawn within its wave.
    pub index: u32,
    /// Archetype to instantiate.
    pub archetype: EnemyArchetype,
    /// Position outside the visible arena at which the enemy appears.
    pub position: Vec2,
    /// Delay after wave start at which the spawn fires.
    pub delay: Duration,
}

/// Archetype of spawn `index` in a wave of `quota` enemies.
///
/// The last spawn of every `boss_every`-th wave is a boss. From
/// `ranged_from_wave` onward every `ranged_every`-th spawn is ranged. All other
/// spawns are basic.
#[must_use]
pub fn archetype_for(tuning: &SpawnTuning, wave: u32, index: u32, quota: u32) -> EnemyArchetype {
    let boss_wave = tuning.boss_every != 0 && wave % tuning.boss_every == 0;
    if boss_wave && index + 1 == quota {
        return EnemyArchetype::Boss;
    }
    let ranged_wave = tuning.ranged_every != 0 && wave >= tuning.ranged_from_wave;
    if ranged_wave && (index + 1) % tuning.ranged_every == 0 {
        return EnemyArchetype::Ranged;
    }
    EnemyArchetype::Basic
}

/// Seeded planner that turns a wave quota into timed spawn orders.
#[derive(Clone, Debug)]
pub struct SpawnScheduler {
    arena: ArenaTuning,
    tuning: SpawnTuning,
    rng: ChaCha8Rng,
}

impl SpawnScheduler {
    /// Creates a scheduler whose placement stream is derived from `seed`.
    #[must_use]
    pub fn new(arena: ArenaTuning, tuning: SpawnTuning, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(RNG_STREAM_SPAWNING);
        Self { arena, tuning, rng }
    }

    /// Produces one order per enemy of the wave, sorted by release delay.
    pub fn plan_wave(&mut self, wave: u32, quota: u32) -> Vec<SpawnOrder> {
        (0..quota)
            .map(|index| SpawnOrder {
                index,
                archetype: archetype_for(&self.tuning, wave, index, quota),
                position: self.spawn_point(),
                delay: self.release_delay(index),
            })
            .collect()
    }

    /// Delay after wave start at which spawn `index` fires.
    #[must_use]
    pub fn release_delay(&self, index: u32) -> Duration {
        match self.tuning.release {
            ReleasePolicy::AllAtOnce => Duration::ZERO,
            ReleasePolicy::Staggered => self.tuning.interval().saturating_mul(index),
        }
    }

    /// Picks a uniform edge, then a uniform coordinate along it, pushed
    /// outward by the spawn margin.
    pub fn spawn_point(&mut self) -> Vec2 {
        let edge = Edge::ALL[self.rng.gen_range(0..Edge::ALL.len())];
        let ArenaTuning {
            width,
            height,
            spawn_margin,
        } = self.arena;
        match edge {
            Edge::Top => Vec2::new(self.rng.gen_range(0.0..=width), -spawn_margin),
            Edge::Right => Vec2::new(width + spawn_margin, self.rng.gen_range(0.0..=height)),
            Edge::Bottom => Vec2::new(self.rng.gen_range(0.0..=width), height + spawn_margin),
            Edge::Left => Vec2::new(-spawn_margin, self.rng.gen_range(0.0..=height)),
        }
    }
}
