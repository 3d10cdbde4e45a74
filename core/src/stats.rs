//! Player stat block with baseline values and layered multipliers.

use serde::{Deserialize, Serialize};

/// Numeric dimensions of the player stat block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    /// Movement speed in world units per second.
    MoveSpeed,
    /// Milliseconds between shots; lower is faster.
    FireInterval,
    /// Damage carried by each player projectile.
    ProjectileDamage,
    /// Player projectile speed in world units per second.
    ProjectileSpeed,
    /// Upper bound for player health.
    MaxHealth,
}

/// Concrete values for every stat dimension.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatBlock {
    /// Movement speed in world units per second.
    pub move_speed: f32,
    /// Milliseconds between shots.
    pub fire_interval_ms: f32,
    /// Damage carried by each player projectile.
    pub projectile_damage: f32,
    /// Player projectile speed in world units per second.
    pub projectile_speed: f32,
    /// Upper bound for player health.
    pub max_health: f32,
}

impl StatBlock {
    /// Reads a single dimension.
    #[must_use]
    pub const fn get(&self, stat: Stat) -> f32 {
        match stat {
            Stat::MoveSpeed => self.move_speed,
            Stat::FireInterval => self.fire_interval_ms,
            Stat::ProjectileDamage => self.projectile_damage,
            Stat::ProjectileSpeed => self.projectile_speed,
            Stat::MaxHealth => self.max_health,
        }
    }

    fn scaled_by(self, multipliers: &StatMultipliers) -> Self {
        Self {
            move_speed: self.move_speed * multipliers.move_speed,
            fire_interval_ms: self.fire_interval_ms * multipliers.fire_interval,
            projectile_damage: self.projectile_damage * multipliers.projectile_damage,
            projectile_speed: self.projectile_speed * multipliers.projectile_speed,
            max_health: self.max_health * multipliers.max_health,
        }
    }
}

/// Per-dimension multipliers; the identity is all ones.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatMultipliers {
    /// Multiplier applied to movement speed.
    pub move_speed: f32,
    /// Multiplier applied to the interval between shots.
    pub fire_interval: f32,
    /// Multiplier applied to projectile damage.
    pub projectile_damage: f32,
    /// Multiplier applied to projectile speed.
    pub projectile_speed: f32,
    /// Multiplier applied to max health.
    pub max_health: f32,
}

impl Default for StatMultipliers {
    fn default() -> Self {
        Self {
            move_speed: 1.0,
            fire_interval: 1.0,
            projectile_damage: 1.0,
            projectile_speed: 1.0,
            max_health: 1.0,
        }
    }
}

impl StatMultipliers {
    /// Reads the multiplier of a single dimension.
    #[must_use]
    pub const fn get(&self, stat: Stat) -> f32 {
        match stat {
            Stat::MoveSpeed => self.move_speed,
            Stat::FireInterval => self.fire_interval,
            Stat::ProjectileDamage => self.projectile_damage,
            Stat::ProjectileSpeed => self.projectile_speed,
            Stat::MaxHealth => self.max_health,
        }
    }

    /// Returns a copy with one dimension multiplied by `factor`.
    #[must_use]
    pub fn scaled(mut self, stat: Stat, factor: f32) -> Self {
        let slot = match stat {
            Stat::MoveSpeed => &mut self.move_speed,
            Stat::FireInterval => &mut self.fire_interval,
            Stat::ProjectileDamage => &mut self.projectile_damage,
            Stat::ProjectileSpeed => &mut self.projectile_speed,
            Stat::MaxHealth => &mut self.max_health,
        };
        *slot *= factor;
        self
    }
}

/// Temporary modifiers granted by powerups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Modifiers {
    /// Temporary stat multipliers.
    pub multipliers: StatMultipliers,
    /// Whether incoming damage is negated.
    pub shielded: bool,
}

/// Player stat block: baseline values, permanent skill multipliers, temporary
/// powerup modifiers, and current health.
///
/// Effective values are `baseline * permanent * temporary` per dimension.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerStats {
    baseline: StatBlock,
    permanent: StatMultipliers,
    temporary: Modifiers,
    health: f32,
}

impl PlayerStats {
    /// Creates a stat block at full health with no multipliers.
    #[must_use]
    pub fn new(baseline: StatBlock) -> Self {
        Self {
            baseline,
            permanent: StatMultipliers::default(),
            temporary: Modifiers::default(),
            health: baseline.max_health,
        }
    }

    /// Baseline values before any multiplier.
    #[must_use]
    pub const fn baseline(&self) -> StatBlock {
        self.baseline
    }

    /// Permanent multipliers bought through the skill tree.
    #[must_use]
    pub const fn permanent(&self) -> StatMultipliers {
        self.permanent
    }

    /// Temporary modifiers granted by active powerups.
    #[must_use]
    pub const fn temporary(&self) -> Modifiers {
        self.temporary
    }

    /// Replaces the temporary modifiers.
    pub fn set_temporary(&mut self, modifiers: Modifiers) {
        self.temporary = modifiers;
        self.health = self.health.min(self.max_health());
    }

    /// Multiplies one permanent multiplier. Permanent multipliers never revert.
    pub fn scale_permanent(&mut self, stat: Stat, factor: f32) {
        self.permanent = self.permanent.scaled(stat, factor);
    }

    /// Values after every multiplier is applied.
    #[must_use]
    pub fn effective(&self) -> StatBlock {
        self.baseline
            .scaled_by(&self.permanent)
            .scaled_by(&self.temporary.multipliers)
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Effective upper bound for health.
    #[must_use]
    pub fn max_health(&self) -> f32 {
        self.effective().max_health
    }

    /// Whether an active shield negates incoming damage.
    #[must_use]
    pub const fn is_shielded(&self) -> bool {
        self.temporary.shielded
    }

    /// Whether health is above zero.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Subtracts damage, flooring health at zero, and returns the remaining health.
    pub fn damage(&mut self, amount: f32) -> f32 {
        self.health = (self.health - amount.max(0.0)).max(0.0);
        self.health
    }

    /// Restores health up to the effective maximum and returns the new health.
    pub fn heal(&mut self, amount: f32) -> f32 {
        self.health = (self.health + amount.max(0.0)).min(self.max_health());
        self.health
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> StatBlock {
        StatBlock {
            move_speed: 200.0,
            fire_interval_ms: 500.0,
            projectile_damage: 25.0,
            projectile_speed: 400.0,
            max_health: 100.0,
        }
    }

    #[test]
    fn effective_values_multiply_every_layer() {
        let mut stats = PlayerStats::new(baseline());
        stats.scale_permanent(Stat::ProjectileDamage, 1.2);
        stats.set_temporary(Modifiers {
            multipliers: StatMultipliers::default().scaled(Stat::ProjectileDamage, 1.5),
            shielded: false,
        });

        let effective = stats.effective();
        assert!((effective.projectile_damage - 25.0 * 1.2 * 1.5).abs() < 1e-4);
        assert_eq!(effective.move_speed, 200.0);
    }

    #[test]
    fn damage_floors_at_zero_and_heal_clamps_to_max() {
        let mut stats = PlayerStats::new(baseline());
        assert_eq!(stats.damage(30.0), 70.0);
        assert_eq!(stats.heal(50.0), 100.0);
        assert_eq!(stats.damage(250.0), 0.0);
        assert!(!stats.is_alive());
    }

    #[test]
    fn shield_flag_is_read_from_temporary_modifiers() {
        let mut stats = PlayerStats::new(baseline());
        assert!(!stats.is_shielded());
        stats.set_temporary(Modifiers {
            shielded: true,
            ..Modifiers::default()
        });
        assert!(stats.is_shielded());
    }
}
