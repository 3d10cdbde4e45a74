#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Timed powerups applied to the player's temporary modifiers.
//!
//! Effects are plain data with pure `apply`/`revert` functions. At most one
//! instance of each kind is active: collecting a kind that is already active
//! cancels the pending expiry and reverts the old effect before the new one
//! is applied, so multipliers never stack.

use std::{collections::BTreeMap, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::debug;
use wave_survival_core::{
    config::PowerupTuning, Event, Modifiers, PlayerStats, PowerupKind, Schedule, Stat, TimerHandle,
};

/// Effect of a powerup on the player.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum PowerupEffect {
    /// Multiplies one stat while active.
    Scale {
        /// Stat that is scaled.
        stat: Stat,
        /// Multiplier applied to the stat.
        factor: f32,
    },
    /// Negates all incoming damage while active.
    Shield,
    /// Restores health once on collection.
    Heal {
        /// Health restored.
        amount: f32,
    },
}

impl PowerupEffect {
    /// Effect granted by `kind` under the provided tuning.
    #[must_use]
    pub fn for_kind(kind: PowerupKind, tuning: &PowerupTuning) -> Self {
        match kind {
            PowerupKind::Speed => Self::Scale {
                stat: Stat::MoveSpeed,
                factor: tuning.speed.factor,
            },
            PowerupKind::RapidFire => Self::Scale {
                stat: Stat::FireInterval,
                factor: tuning.rapid_fire.factor,
            },
            PowerupKind::Damage => Self::Scale {
                stat: Stat::ProjectileDamage,
                factor: tuning.damage.factor,
            },
            PowerupKind::Shield => Self::Shield,
            PowerupKind::Health => Self::Heal {
                amount: tuning.heal_amount,
            },
        }
    }

    /// Modifiers with the effect applied.
    #[must_use]
    pub fn apply(self, modifiers: Modifiers) -> Modifiers {
        match self {
            Self::Scale { stat, factor } => Modifiers {
                multipliers: modifiers.multipliers.scaled(stat, factor),
                ..modifiers
            },
            Self::Shield => Modifiers {
                shielded: true,
                ..modifiers
            },
            Self::Heal { .. } => modifiers,
        }
    }

    /// Modifiers with the effect undone.
    #[must_use]
    pub fn revert(self, modifiers: Modifiers) -> Modifiers {
        match self {
            Self::Scale { stat, factor } => Modifiers {
                multipliers: modifiers.multipliers.scaled(stat, factor.recip()),
                ..modifiers
            },
            Self::Shield => Modifiers {
                shielded: false,
                ..modifiers
            },
            Self::Heal { .. } => modifiers,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct ActivePowerup {
    handle: TimerHandle,
    effect: PowerupEffect,
}

/// Tracks active powerups and their expiry timers.
#[derive(Debug)]
pub struct PowerupController {
    tuning: PowerupTuning,
    active: BTreeMap<PowerupKind, ActivePowerup>,
    timers: Schedule<PowerupKind>,
}

impl PowerupController {
    /// Creates a controller with nothing active.
    #[must_use]
    pub fn new(tuning: PowerupTuning) -> Self {
        Self {
            tuning,
            active: BTreeMap::new(),
            timers: Schedule::new(),
        }
    }

    /// Kinds currently active, in declaration order.
    pub fn active(&self) -> impl Iterator<Item = PowerupKind> + '_ {
        self.active.keys().copied()
    }

    /// Time left on an active powerup.
    #[must_use]
    pub fn remaining(&self, kind: PowerupKind, now: Duration) -> Option<Duration> {
        self.active
            .get(&kind)
            .map(|active| active.handle.fire_at().saturating_sub(now))
    }

    /// Applies a collected powerup, replacing any active instance of the same kind.
    pub fn collect(
        &mut self,
        kind: PowerupKind,
        stats: &mut PlayerStats,
        now: Duration,
        out_events: &mut Vec<Event>,
    ) {
        let effect = PowerupEffect::for_kind(kind, &self.tuning);
        let Some(duration) = self.tuning.duration(kind) else {
            if let PowerupEffect::Heal { amount } = effect {
                let _ = stats.heal(amount);
            }
            out_events.push(Event::PowerupCollected {
                kind,
                replaced: false,
            });
            return;
        };

        let replaced = match self.active.remove(&kind) {
            Some(previous) => {
                let _ = self.timers.cancel(previous.handle);
                stats.set_temporary(previous.effect.revert(stats.temporary()));
                true
            }
            None => false,
        };

        stats.set_temporary(effect.apply(stats.temporary()));
        let handle = self.timers.schedule(now.saturating_add(duration), kind);
        let _ = self.active.insert(kind, ActivePowerup { handle, effect });
        debug!(%kind, replaced, "powerup collected");
        out_events.push(Event::PowerupCollected { kind, replaced });
    }

    /// Reverts every powerup whose duration elapsed by `now`.
    pub fn update(&mut self, stats: &mut PlayerStats, now: Duration, out_events: &mut Vec<Event>) {
        while let Some((handle, kind)) = self.timers.pop_due(now) {
            let current = self.active.get(&kind).map(|active| active.handle);
            if current != Some(handle) {
                continue;
            }
            if let Some(expired) = self.active.remove(&kind) {
                stats.set_temporary(expired.effect.revert(stats.temporary()));
                debug!(%kind, "powerup expired");
                out_events.push(Event::PowerupExpired { kind });
            }
        }
    }

    /// Cancels every pending expiry and reverts every active effect.
    pub fn cancel_all(&mut self, stats: &mut PlayerStats) {
        self.timers.clear();
        for (_, active) in std::mem::take(&mut self.active) {
            stats.set_temporary(active.effect.revert(stats.temporary()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wave_survival_core::StatMultipliers;

    #[test]
    fn effects_round_trip_through_bincode() {
        let effect = PowerupEffect::for_kind(PowerupKind::RapidFire, &PowerupTuning::default());
        let bytes = bincode::serialize(&effect).expect("serialize");
        let restored: PowerupEffect = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, effect);
    }

    #[test]
    fn revert_undoes_apply() {
        let effect = PowerupEffect::Scale {
            stat: Stat::ProjectileDamage,
            factor: 1.5,
        };
        let base = Modifiers::default();
        let applied = effect.apply(base);
        assert_eq!(applied.multipliers.projectile_damage, 1.5);
        let reverted = effect.revert(applied);
        assert!((reverted.multipliers.projectile_damage - 1.0).abs() < 1e-6);

        let shielded = PowerupEffect::Shield.apply(base);
        assert!(shielded.shielded);
        assert_eq!(PowerupEffect::Shield.revert(shielded), base);
    }

    #[test]
    fn heal_leaves_modifiers_untouched() {
        let effect = PowerupEffect::Heal { amount: 25.0 };
        let modifiers = Modifiers {
            multipliers: StatMultipliers::default().scaled(Stat::MoveSpeed, 2.0),
            shielded: true,
        };
        assert_eq!(effect.apply(modifiers), modifiers);
        assert_eq!(effect.revert(modifiers), modifiers);
    }
}
