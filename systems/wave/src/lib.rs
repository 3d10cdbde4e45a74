#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave lifecycle state machine and owner of the active enemy set.
//!
//! The controller walks `Idle → Spawning → Active → Cleared → Intermission`
//! and back to `Spawning` with a strictly larger wave number. Spawn releases
//! and the intermission delay are entries in a [`Schedule`] drained by
//! [`WaveController::update`]; halting the controller cancels every pending
//! entry so no spawn materializes after the run ends.

use std::{collections::BTreeMap, time::Duration};

use tracing::{debug, info};
use wave_survival_core::{config::WaveTuning, EnemyId, Event, Schedule, Tuning, Vec2, WavePhase};
use wave_survival_system_enemy_model::{Enemy, EnemyModel, ProjectileLaunch};
use wave_survival_system_spawning::{SpawnOrder, SpawnScheduler};

#[derive(Clone, Debug)]
enum WaveTimer {
    Release { wave: u32, order: SpawnOrder },
    EndIntermission { wave: u32 },
}

/// Enemy taken out of the active set.
#[derive(Clone, Debug, PartialEq)]
pub struct Removal {
    /// Enemy that was removed.
    pub enemy: Enemy,
    /// Wave that became cleared because of the removal, if any.
    pub cleared_wave: Option<u32>,
}

/// Drives wave progression and owns every living enemy.
#[derive(Debug)]
pub struct WaveController {
    tuning: WaveTuning,
    model: EnemyModel,
    scheduler: SpawnScheduler,
    phase: WavePhase,
    wave: u32,
    quota: u32,
    spawned: u32,
    enemies: BTreeMap<EnemyId, Enemy>,
    timers: Schedule<WaveTimer>,
    next_enemy_id: u32,
    halted: bool,
}

impl WaveController {
    /// Creates an idle controller from the run tuning.
    #[must_use]
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            tuning: tuning.wave.clone(),
            model: EnemyModel::new(tuning.enemies.clone()),
            scheduler: SpawnScheduler::new(
                tuning.arena.clone(),
                tuning.spawning.clone(),
                tuning.seed,
            ),
            phase: WavePhase::Idle,
            wave: 0,
            quota: 0,
            spawned: 0,
            enemies: BTreeMap::new(),
            timers: Schedule::new(),
            next_enemy_id: 0,
            halted: false,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn phase(&self) -> WavePhase {
        self.phase
    }

    /// Number of the current wave; zero before the first wave starts.
    #[must_use]
    pub const fn wave(&self) -> u32 {
        self.wave
    }

    /// Total enemies the current wave spawns.
    #[must_use]
    pub const fn quota(&self) -> u32 {
        self.quota
    }

    /// Enemies of the current wave released so far.
    #[must_use]
    pub const fn spawned(&self) -> u32 {
        self.spawned
    }

    /// Enemies currently alive.
    #[must_use]
    pub fn alive(&self) -> u32 {
        u32::try_from(self.enemies.len()).unwrap_or(u32::MAX)
    }

    /// Whether the controller stopped accepting transitions.
    #[must_use]
    pub const fn is_halted(&self) -> bool {
        self.halted
    }

    /// Living enemies in identifier order.
    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.values()
    }

    /// Looks up a living enemy.
    #[must_use]
    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.get(&id)
    }

    /// Looks up a living enemy for mutation.
    pub fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.get_mut(&id)
    }

    /// Starts wave one and returns its number. Ignored unless the controller
    /// is idle.
    pub fn start(&mut self, now: Duration, out_events: &mut Vec<Event>) -> Option<u32> {
        if self.halted || self.phase != WavePhase::Idle {
            return None;
        }
        self.begin_wave(1, now, out_events);
        let _ = self.update(now, out_events);
        Some(1)
    }

    /// Fires every timer due at or before `now` and returns the number of the
    /// wave that began, if the intermission ended.
    pub fn update(&mut self, now: Duration, out_events: &mut Vec<Event>) -> Option<u32> {
        if self.halted {
            return None;
        }
        let mut started = None;
        while let Some((handle, timer)) = self.timers.pop_due(now) {
            match timer {
                WaveTimer::Release { wave, order } => {
                    if self.phase == WavePhase::Spawning && wave == self.wave {
                        self.release(order, handle.fire_at(), out_events);
                    }
                }
                WaveTimer::EndIntermission { wave } => {
                    if self.phase == WavePhase::Intermission && wave == self.wave {
                        self.begin_wave(wave + 1, handle.fire_at(), out_events);
                        started = Some(wave + 1);
                    }
                }
            }
        }
        started
    }

    /// Moves every living enemy and collects the projectiles they launch.
    pub fn advance_enemies(
        &mut self,
        now: Duration,
        dt: Duration,
        target: Vec2,
        launches: &mut Vec<ProjectileLaunch>,
    ) {
        if self.halted {
            return;
        }
        for enemy in self.enemies.values_mut() {
            self.model.advance(enemy, now, dt, target, launches);
        }
    }

    /// Removes an enemy from the active set, clearing the wave when it was the
    /// last one and every spawn already fired. Stale identifiers yield `None`.
    pub fn remove_enemy(
        &mut self,
        id: EnemyId,
        now: Duration,
        out_events: &mut Vec<Event>,
    ) -> Option<Removal> {
        if self.halted {
            return None;
        }
        let enemy = self.enemies.remove(&id)?;
        let cleared_wave = if self.phase == WavePhase::Active && self.enemies.is_empty() {
            Some(self.clear_wave(now, out_events))
        } else {
            None
        };
        Some(Removal {
            enemy,
            cleared_wave,
        })
    }

    /// Stops the controller, dropping pending spawns, the intermission timer,
    /// and every living enemy.
    pub fn halt(&mut self) {
        self.halted = true;
        self.timers.clear();
        self.enemies.clear();
    }

    fn begin_wave(&mut self, wave: u32, now: Duration, out_events: &mut Vec<Event>) {
        self.wave = wave;
        self.quota = self.tuning.quota(wave);
        self.spawned = 0;
        self.phase = WavePhase::Spawning;
        info!(wave, quota = self.quota, "wave started");
        out_events.push(Event::WaveStarted {
            wave,
            quota: self.quota,
        });
        for order in self.scheduler.plan_wave(wave, self.quota) {
            let _ = self
                .timers
                .schedule(now.saturating_add(order.delay), WaveTimer::Release { wave, order });
        }
    }

    fn release(&mut self, order: SpawnOrder, at: Duration, out_events: &mut Vec<Event>) {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        let enemy = self
            .model
            .spawn(id, order.archetype, self.wave, order.position, at);
        debug!(enemy = id.get(), archetype = %order.archetype, "enemy spawned");
        out_events.push(Event::EnemySpawned {
            wave: self.wave,
            enemy: id,
            archetype: order.archetype,
            position: order.position,
        });
        let _ = self.enemies.insert(id, enemy);
        self.spawned += 1;
        if self.spawned == self.quota {
            self.phase = WavePhase::Active;
            out_events.push(Event::SpawnsCompleted { wave: self.wave });
        }
    }

    fn clear_wave(&mut self, now: Duration, out_events: &mut Vec<Event>) -> u32 {
        let wave = self.wave;
        self.phase = WavePhase::Cleared;
        info!(wave, "wave cleared");
        out_events.push(Event::WaveCleared { wave });

        let delay = self.tuning.intermission();
        let _ = self
            .timers
            .schedule(now.saturating_add(delay), WaveTimer::EndIntermission { wave });
        self.phase = WavePhase::Intermission;
        out_events.push(Event::IntermissionStarted { wave, delay });
        wave
    }
}
