//! Scripted front end that plays a run without a human.
//!
//! The autopilot fills the role a graphical host would: it steers and aims the
//! player, detects overlaps between circles, and reports them to the world as
//! commands. It never mutates the world directly.

use wave_survival_core::{Command, EnemyArchetype, EnemySnapshot, ProjectileOwner, SkillKind, Vec2};
use wave_survival_world::{query, World};

const PLAYER_RADIUS: f32 = 16.0;
const PROJECTILE_RADIUS: f32 = 4.0;
const PICKUP_RADIUS: f32 = 12.0;
/// Enemies closer than this are treated as threats worth fleeing from.
const THREAT_RANGE: f32 = 250.0;

fn enemy_radius(archetype: EnemyArchetype) -> f32 {
    match archetype {
        EnemyArchetype::Basic => 14.0,
        EnemyArchetype::Ranged => 16.0,
        EnemyArchetype::Boss => 40.0,
    }
}

/// Whether two circles intersect.
pub(crate) fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a.distance_squared(b) <= reach * reach
}

/// Heading away from nearby enemies, weighted by inverse square distance and
/// biased toward the arena centre so the player does not get pinned in a corner.
pub(crate) fn flee_direction(player: Vec2, enemies: &[EnemySnapshot], arena: Vec2) -> Vec2 {
    let mut push = Vec2::ZERO;
    for enemy in enemies {
        let away = player - enemy.position;
        let distance_squared = away.length_squared();
        if distance_squared > THREAT_RANGE * THREAT_RANGE || distance_squared <= f32::EPSILON {
            continue;
        }
        push += away / distance_squared;
    }
    if push == Vec2::ZERO {
        return Vec2::ZERO;
    }
    let centre = (arena / 2.0 - player) / arena.length();
    (push.normalize() + centre).normalize_or_zero()
}

/// Aim point that leads a moving target by the projectile travel time.
pub(crate) fn lead_target(shooter: Vec2, target: &EnemySnapshot, projectile_speed: f32) -> Vec2 {
    if projectile_speed <= 0.0 {
        return target.position;
    }
    let travel = shooter.distance(target.position) / projectile_speed;
    target.position + target.velocity * travel
}

fn nearest(player: Vec2, enemies: &[EnemySnapshot]) -> Option<&EnemySnapshot> {
    enemies.iter().min_by(|a, b| {
        a.position
            .distance_squared(player)
            .total_cmp(&b.position.distance_squared(player))
    })
}

/// Produces the commands a simple player would issue each frame.
#[derive(Debug, Default)]
pub(crate) struct Autopilot {
    next_skill: usize,
}

impl Autopilot {
    /// Steering and firing commands issued before the frame's tick.
    pub(crate) fn intents(&self, world: &World) -> Vec<Command> {
        let player = query::player(world);
        let enemies = query::enemies(world);
        let arena = &query::tuning(world).arena;
        let bounds = Vec2::new(arena.width, arena.height);

        let mut commands = vec![Command::SteerPlayer {
            direction: flee_direction(player.position, &enemies, bounds),
        }];
        if let Some(target) = nearest(player.position, &enemies) {
            let aim = lead_target(player.position, target, player.effective.projectile_speed);
            commands.push(Command::FireProjectile {
                direction: aim - player.position,
            });
        }
        commands
    }

    /// Overlap reports gathered after the frame's tick.
    pub(crate) fn overlaps(&self, world: &World) -> Vec<Command> {
        let player = query::player(world).position;
        let enemies = query::enemies(world);
        let mut commands = Vec::new();

        for projectile in query::projectiles(world) {
            match projectile.owner {
                ProjectileOwner::Player => {
                    let struck = enemies.iter().find(|enemy| {
                        circles_overlap(
                            projectile.position,
                            PROJECTILE_RADIUS,
                            enemy.position,
                            enemy_radius(enemy.archetype),
                        )
                    });
                    if let Some(enemy) = struck {
                        commands.push(Command::ApplyHit {
                            projectile: projectile.id,
                            enemy: enemy.id,
                        });
                    }
                }
                ProjectileOwner::Enemy => {
                    let hit = circles_overlap(
                        projectile.position,
                        PROJECTILE_RADIUS,
                        player,
                        PLAYER_RADIUS,
                    );
                    if hit {
                        commands.push(Command::ApplyProjectileToPlayer {
                            projectile: projectile.id,
                        });
                    }
                }
            }
        }

        commands.extend(
            enemies
                .iter()
                .filter(|enemy| {
                    circles_overlap(
                        player,
                        PLAYER_RADIUS,
                        enemy.position,
                        enemy_radius(enemy.archetype),
                    )
                })
                .map(|enemy| Command::ApplyContactDamage { enemy: enemy.id }),
        );

        commands.extend(
            query::pickups(world)
                .into_iter()
                .filter(|pickup| {
                    circles_overlap(player, PLAYER_RADIUS, pickup.position, PICKUP_RADIUS)
                })
                .map(|pickup| Command::CollectPowerup { pickup: pickup.id }),
        );
        commands
    }

    /// Skill purchase attempted with unspent points, rotating through the tree.
    pub(crate) fn spend_points(&mut self, world: &World) -> Option<Command> {
        if query::run_state(world).skill_points == 0 {
            return None;
        }
        let skill = SkillKind::ALL[self.next_skill % SkillKind::ALL.len()];
        self.next_skill = self.next_skill.wrapping_add(1);
        Some(Command::UpgradeSkill { skill })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wave_survival_core::EnemyId;

    fn enemy(position: Vec2, velocity: Vec2) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(0),
            archetype: EnemyArchetype::Basic,
            position,
            velocity,
            health: 50.0,
            max_health: 50.0,
        }
    }

    #[test]
    fn circles_touching_at_the_rim_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 4.0, Vec2::new(10.0, 0.0), 6.0));
        assert!(!circles_overlap(Vec2::ZERO, 4.0, Vec2::new(10.1, 0.0), 6.0));
    }

    #[test]
    fn flee_moves_away_from_a_close_enemy() {
        let arena = Vec2::new(800.0, 600.0);
        let player = Vec2::new(400.0, 300.0);
        let enemies = [enemy(Vec2::new(450.0, 300.0), Vec2::ZERO)];
        let heading = flee_direction(player, &enemies, arena);
        assert!(heading.x < 0.0);
        assert!((heading.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn distant_enemies_are_ignored() {
        let arena = Vec2::new(800.0, 600.0);
        let enemies = [enemy(Vec2::new(790.0, 590.0), Vec2::ZERO)];
        assert_eq!(
            flee_direction(Vec2::new(100.0, 100.0), &enemies, arena),
            Vec2::ZERO
        );
    }

    #[test]
    fn aim_leads_a_moving_target() {
        let target = enemy(Vec2::new(400.0, 0.0), Vec2::new(0.0, 100.0));
        let aim = lead_target(Vec2::ZERO, &target, 400.0);
        assert_eq!(aim, Vec2::new(400.0, 100.0));
    }
}
