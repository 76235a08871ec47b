#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-tick zombie controller.
//!
//! Each tick the controller decides whether a zombie keeps seeking the player
//! or stands and attacks, proposes a collision-free step along its path,
//! turns it smoothly toward its goal and paces melee strikes. Decisions leave
//! the system as [`Command::SteerZombie`] and [`Command::ZombieAttack`].

use std::{collections::HashMap, time::Duration};

use glam::Vec3;
use tracing::trace;
use zombie_survival_core::{
    geometry::{heading_of, horizontal, horizontal_distance, lerp_angle, rotate_about_y},
    Aabb, Command, Event, NavigationConfig, Obstacle, Terrain, ZombieConfig, ZombieId,
    ZombieSnapshot, ZombieState, ZombieView,
};

/// Pure system that steers every living zombie with an attached model.
#[derive(Debug)]
pub struct Steering {
    config: ZombieConfig,
    half_extents: Vec3,
    attack_timers: HashMap<ZombieId, Duration>,
}

impl Steering {
    /// Creates a controller for agents shaped by the navigation config.
    #[must_use]
    pub fn new(config: ZombieConfig, navigation: &NavigationConfig) -> Self {
        Self {
            config,
            half_extents: navigation.agent_half_extents(),
            attack_timers: HashMap::new(),
        }
    }

    /// Consumes world events and the zombie view to emit steering commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        zombies: &ZombieView,
        obstacles: &[Obstacle],
        terrain: &dyn Terrain,
        player: Vec3,
        out: &mut Vec<Command>,
    ) {
        let mut dt = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt: step } => dt = dt.saturating_add(*step),
                Event::ZombieKilled { zombie } | Event::ZombieRemoved { zombie } => {
                    let _ = self.attack_timers.remove(zombie);
                }
                Event::GameReset => self.attack_timers.clear(),
                _ => {}
            }
        }

        if dt.is_zero() {
            return;
        }

        for zombie in zombies.iter() {
            if !zombie.model_attached || !zombie.state.is_alive() {
                continue;
            }
            self.steer(zombie, obstacles, terrain, player, dt, out);
        }
    }

    fn steer(
        &mut self,
        zombie: &ZombieSnapshot,
        obstacles: &[Obstacle],
        terrain: &dyn Terrain,
        player: Vec3,
        dt: Duration,
        out: &mut Vec<Command>,
    ) {
        let dt_seconds = dt.as_secs_f32();
        let position = Vec3::new(
            zombie.position.x,
            terrain.height_at(zombie.position.x, zombie.position.z),
            zombie.position.z,
        );
        let to_player = horizontal(player - position).normalize_or_zero();
        let turn = (self.config.turn_rate * dt_seconds).min(1.0);

        if horizontal_distance(position, player) > self.config.stopping_distance {
            let _ = self.attack_timers.remove(&zombie.id);

            let mut path_index = zombie.path_index;
            let target = match zombie.path.as_ref() {
                Some(path) => {
                    while path.get(path_index).is_some_and(|waypoint| {
                        horizontal_distance(position, waypoint) <= self.config.waypoint_radius
                    }) {
                        path_index += 1;
                    }
                    path.get(path_index).unwrap_or(player)
                }
                None => player,
            };

            let mut direction = horizontal(target - position).normalize_or_zero();
            if direction == Vec3::ZERO {
                direction = to_player;
            }
            let step = self.config.speed * dt_seconds;
            let (next, travelled) =
                self.resolve_step(zombie.id, position, direction, step, obstacles);
            let heading = if travelled == Vec3::ZERO {
                zombie.heading
            } else {
                lerp_angle(zombie.heading, heading_of(travelled), turn)
            };

            out.push(Command::SteerZombie {
                zombie: zombie.id,
                position: next,
                heading,
                state: ZombieState::Seeking,
                path_index,
            });
            return;
        }

        let anchored = if to_player == Vec3::ZERO {
            position
        } else {
            let clamped = player - to_player * self.config.stopping_distance;
            Vec3::new(clamped.x, position.y, clamped.z)
        };
        let heading = if to_player == Vec3::ZERO {
            zombie.heading
        } else {
            lerp_angle(zombie.heading, heading_of(to_player), turn)
        };
        out.push(Command::SteerZombie {
            zombie: zombie.id,
            position: anchored,
            heading,
            state: ZombieState::Attacking,
            path_index: zombie.path_index,
        });

        if zombie.state != ZombieState::Attacking {
            let _ = self.attack_timers.insert(zombie.id, Duration::ZERO);
            return;
        }
        let interval = self.config.attack_interval();
        let timer = self.attack_timers.entry(zombie.id).or_default();
        *timer = timer.saturating_add(dt);
        if *timer >= interval {
            *timer -= interval;
            out.push(Command::ZombieAttack { zombie: zombie.id });
        }
    }

    /// Proposes a step, deflecting around obstacles when the direct move collides.
    ///
    /// Returns the new position and the direction actually travelled. When the
    /// direct move and both deflections collide, the zombie is nudged away from
    /// the nearest obstacle centre; the nudge itself is not collision checked.
    fn resolve_step(
        &self,
        zombie: ZombieId,
        position: Vec3,
        direction: Vec3,
        step: f32,
        obstacles: &[Obstacle],
    ) -> (Vec3, Vec3) {
        let direct = position + direction * step;
        if !self.collides(direct, obstacles) {
            return (direct, direction);
        }

        let angle = self.config.avoidance_angle_degrees.to_radians();
        for deflection in [angle, -angle] {
            let deflected = rotate_about_y(direction, deflection);
            let candidate = position + deflected * step;
            if !self.collides(candidate, obstacles) {
                return (candidate, deflected);
            }
        }

        let nearest = obstacles.iter().min_by(|a, b| {
            horizontal_distance(position, a.center())
                .total_cmp(&horizontal_distance(position, b.center()))
        });
        match nearest {
            Some(obstacle) => {
                let away = horizontal(position - obstacle.center()).normalize_or_zero();
                trace!(zombie = zombie.get(), "boxed in, pushing back");
                (position + away * self.config.push_back_distance, direction)
            }
            None => (position, direction),
        }
    }

    fn collides(&self, foot: Vec3, obstacles: &[Obstacle]) -> bool {
        let bounds = Aabb::from_center_half_extents(
            foot + Vec3::new(0.0, self.half_extents.y, 0.0),
            self.half_extents,
        )
        .expanded(self.config.collision_margin);
        obstacles
            .iter()
            .any(|obstacle| bounds.intersects(obstacle.bounds()))
    }
}
