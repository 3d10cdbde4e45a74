//! Boss phase tracking and attack volleys.

use std::{f32::consts::TAU, time::Duration};

use wave_survival_core::{config::BossTuning, AttackPattern, Vec2};

const CIRCULAR_PROJECTILES: usize = 12;
const BURST_PROJECTILES: usize = 5;
const BURST_SPREAD: f32 = 0.2;
const SPIRAL_PROJECTILES: usize = 20;
const SPIRAL_STEP: f32 = 0.5;

#[derive(Clone, Debug, PartialEq)]
struct PhaseThreshold {
    fraction: f32,
    triggered: bool,
}

/// Ordered one-shot health thresholds of a boss.
///
/// A threshold fires the first time the health fraction is observed at or
/// below it. Once fired it stays fired for the lifetime of the boss, even if
/// health later climbs back above it.
#[derive(Clone, Debug, PartialEq)]
pub struct BossPhases {
    thresholds: Vec<PhaseThreshold>,
}

impl BossPhases {
    /// Creates a tracker with every threshold armed.
    #[must_use]
    pub fn new(fractions: &[f32]) -> Self {
        Self {
            thresholds: fractions
                .iter()
                .map(|fraction| PhaseThreshold {
                    fraction: *fraction,
                    triggered: false,
                })
                .collect(),
        }
    }

    /// Marks every armed threshold at or above `fraction` as fired and returns them in order.
    pub fn observe(&mut self, fraction: f32) -> Vec<f32> {
        let mut fired = Vec::new();
        for threshold in &mut self.thresholds {
            if !threshold.triggered && threshold.fraction >= fraction {
                threshold.triggered = true;
                fired.push(threshold.fraction);
            }
        }
        fired
    }

    /// Number of thresholds that already fired.
    #[must_use]
    pub fn triggered(&self) -> usize {
        self.thresholds
            .iter()
            .filter(|threshold| threshold.triggered)
            .count()
    }
}

/// Mutable attack state of a single boss.
#[derive(Clone, Debug, PartialEq)]
pub struct BossState {
    phases: BossPhases,
    pattern_index: usize,
    cooldown: Duration,
    next_attack: Duration,
    cooldown_factor: f32,
    phase_regen: f32,
}

impl BossState {
    pub(crate) fn new(tuning: &BossTuning, spawned_at: Duration) -> Self {
        let cooldown = Duration::from_millis(tuning.cooldown_ms);
        Self {
            phases: BossPhases::new(&tuning.phase_thresholds),
            pattern_index: 0,
            cooldown,
            next_attack: spawned_at.saturating_add(cooldown),
            cooldown_factor: tuning.cooldown_factor,
            phase_regen: tuning.phase_regen,
        }
    }

    /// Attack pattern used by the next volley.
    #[must_use]
    pub fn pattern(&self) -> AttackPattern {
        AttackPattern::CYCLE[self.pattern_index % AttackPattern::CYCLE.len()]
    }

    /// Current time between volleys.
    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Phase thresholds of the boss.
    #[must_use]
    pub const fn phases(&self) -> &BossPhases {
        &self.phases
    }

    pub(crate) fn phases_mut(&mut self) -> &mut BossPhases {
        &mut self.phases
    }

    pub(crate) const fn phase_regen(&self) -> f32 {
        self.phase_regen
    }

    /// Advances the pattern cycle and shortens the cooldown.
    pub(crate) fn enter_next_phase(&mut self) -> AttackPattern {
        self.pattern_index = (self.pattern_index + 1) % AttackPattern::CYCLE.len();
        self.cooldown = self.cooldown.mul_f32(self.cooldown_factor);
        self.pattern()
    }

    /// Returns the pattern to fire if the cooldown elapsed, re-arming the cooldown.
    pub(crate) fn ready(&mut self, now: Duration) -> Option<AttackPattern> {
        if now < self.next_attack {
            return None;
        }
        self.next_attack = now.saturating_add(self.cooldown);
        Some(self.pattern())
    }
}

/// Launch headings of a volley, in radians.
#[must_use]
pub fn volley_angles(pattern: AttackPattern, aim: f32) -> Vec<f32> {
    match pattern {
        AttackPattern::Circular => {
            let step = TAU / CIRCULAR_PROJECTILES as f32;
            (0..CIRCULAR_PROJECTILES).map(|i| i as f32 * step).collect()
        }
        AttackPattern::Burst => {
            let center = (BURST_PROJECTILES - 1) as f32 / 2.0;
            (0..BURST_PROJECTILES)
                .map(|i| aim + (i as f32 - center) * BURST_SPREAD)
                .collect()
        }
        AttackPattern::Spiral => (0..SPIRAL_PROJECTILES)
            .map(|i| i as f32 * SPIRAL_STEP)
            .collect(),
    }
}

pub(crate) fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_fire_once_in_order() {
        let mut phases = BossPhases::new(&[0.7, 0.4, 0.2]);
        assert_eq!(phases.observe(0.9), Vec::<f32>::new());
        assert_eq!(phases.observe(0.3), vec![0.7, 0.4]);
        assert_eq!(phases.observe(0.3), Vec::<f32>::new());
        assert_eq!(phases.observe(0.1), vec![0.2]);
        assert_eq!(phases.triggered(), 3);
    }

    #[test]
    fn volleys_have_expected_sizes() {
        assert_eq!(volley_angles(AttackPattern::Circular, 0.0).len(), 12);
        assert_eq!(volley_angles(AttackPattern::Spiral, 0.0).len(), 20);
        let burst = volley_angles(AttackPattern::Burst, 1.0);
        assert_eq!(burst.len(), 5);
        assert!((burst[2] - 1.0).abs() < f32::EPSILON);
        assert!((burst[4] - burst[0] - 0.8).abs() < 1e-5);
    }

    #[test]
    fn phase_changes_cycle_patterns_and_shrink_cooldown() {
        let mut state = BossState::new(&BossTuning::default(), Duration::ZERO);
        assert_eq!(state.pattern(), AttackPattern::Circular);
        assert_eq!(state.enter_next_phase(), AttackPattern::Burst);
        assert!((state.cooldown().as_secs_f32() - 2.4).abs() < 1e-3);
        assert_eq!(state.enter_next_phase(), AttackPattern::Spiral);
        assert_eq!(state.enter_next_phase(), AttackPattern::Circular);
    }
}
