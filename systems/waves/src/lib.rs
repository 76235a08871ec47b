#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave spawning system.
//!
//! When the world announces a wave, this system releases its zombies one at a
//! time with a fixed stagger, each on a random walkable point of a ring around
//! the player. A tick never spawns more than one zombie, so a frame hitch
//! cannot release a whole wave at once. After a completed wave it optionally
//! starts the next one once the intermission has elapsed.

use std::{f32::consts::TAU, time::Duration};

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};
use zombie_survival_core::{Command, Event, WaveConfig};
use zombie_survival_world::navigation::NavigationMesh;

/// Pure system that turns wave announcements into staggered spawn commands.
#[derive(Debug)]
pub struct Waves {
    config: WaveConfig,
    rng: ChaCha8Rng,
    pending: u32,
    accumulator: Duration,
    intermission: Option<Duration>,
}

impl Waves {
    /// Creates a spawning system seeded from the wave configuration.
    #[must_use]
    pub fn new(config: WaveConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.spawn_seed),
            config,
            pending: 0,
            accumulator: Duration::ZERO,
            intermission: None,
        }
    }

    /// Zombies of the current wave that have not been spawned yet.
    #[must_use]
    pub const fn pending(&self) -> u32 {
        self.pending
    }

    /// Consumes world events and emits spawn and wave commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        navigation: &NavigationMesh,
        player: Vec3,
        out: &mut Vec<Command>,
    ) {
        let mut dt = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt: step } => dt = dt.saturating_add(*step),
                Event::WaveStarted { zombies, .. } => {
                    self.pending = *zombies;
                    self.accumulator = self.config.spawn_stagger();
                    self.intermission = None;
                }
                Event::WaveCompleted { wave } => {
                    if self.config.auto_advance {
                        debug!(wave, "intermission started");
                        self.intermission = Some(Duration::ZERO);
                    }
                }
                Event::GameOver { .. } => {
                    self.pending = 0;
                    self.intermission = None;
                }
                Event::GameReset => {
                    self.pending = 0;
                    self.intermission = None;
                    out.push(Command::StartWave);
                }
                _ => {}
            }
        }

        if dt.is_zero() {
            return;
        }

        if let Some(elapsed) = self.intermission.as_mut() {
            *elapsed = elapsed.saturating_add(dt);
            if *elapsed >= self.config.intermission() {
                self.intermission = None;
                out.push(Command::StartWave);
            }
        }

        if self.pending == 0 {
            return;
        }
        let stagger = self.config.spawn_stagger();
        self.accumulator = self.accumulator.saturating_add(dt);
        if self.accumulator >= stagger {
            // At most one spawn per tick; a long frame carries one interval over.
            self.accumulator = (self.accumulator - stagger).min(stagger);
            self.pending -= 1;
            let position = self.spawn_point(navigation, player);
            out.push(Command::SpawnZombie { position });
        }
    }

    fn spawn_point(&mut self, navigation: &NavigationMesh, player: Vec3) -> Vec3 {
        let mut candidate = player;
        for _ in 0..self.config.spawn_attempts.max(1) {
            candidate = self.ring_sample(player);
            if navigation.is_walkable_at(candidate) {
                return candidate;
            }
        }
        warn!(
            x = candidate.x,
            z = candidate.z,
            "no walkable spawn point found, using last sample"
        );
        candidate
    }

    fn ring_sample(&mut self, player: Vec3) -> Vec3 {
        let angle = self.rng.gen_range(0.0..TAU);
        let radius = self
            .rng
            .gen_range(self.config.spawn_radius_min..=self.config.spawn_radius_max);
        Vec3::new(
            player.x + angle.cos() * radius,
            player.y,
            player.z + angle.sin() * radius,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zombie_survival_core::NavigationConfig;

    fn mesh() -> NavigationMesh {
        NavigationMesh::build(&NavigationConfig::default(), &|_: f32, _: f32| 0.0, &[])
            .expect("mesh builds")
    }

    fn tick(millis: u64) -> Event {
        Event::TimeAdvanced {
            dt: Duration::from_millis(millis),
        }
    }

    fn spawns(commands: &[Command]) -> usize {
        commands
            .iter()
            .filter(|command| matches!(command, Command::SpawnZombie { .. }))
            .count()
    }

    #[test]
    fn wave_spawns_are_staggered() {
        let mesh = mesh();
        let mut waves = Waves::new(WaveConfig::default());
        let mut commands = Vec::new();

        waves.handle(
            &[Event::WaveStarted {
                wave: 1,
                zombies: 10,
            }],
            &mesh,
            Vec3::ZERO,
            &mut commands,
        );
        assert!(commands.is_empty());

        waves.handle(&[tick(16)], &mesh, Vec3::ZERO, &mut commands);
        assert_eq!(spawns(&commands), 1);

        for _ in 0..5 {
            waves.handle(&[tick(16)], &mesh, Vec3::ZERO, &mut commands);
        }
        assert_eq!(spawns(&commands), 1);

        waves.handle(&[tick(20)], &mesh, Vec3::ZERO, &mut commands);
        assert_eq!(spawns(&commands), 2);

        for _ in 0..7 {
            waves.handle(&[tick(100)], &mesh, Vec3::ZERO, &mut commands);
        }
        assert_eq!(spawns(&commands), 9);
        assert_eq!(waves.pending(), 1);
    }

    #[test]
    fn a_long_frame_spawns_a_single_zombie() {
        let mesh = mesh();
        let mut waves = Waves::new(WaveConfig::default());
        let mut commands = Vec::new();
        waves.handle(
            &[
                Event::WaveStarted {
                    wave: 1,
                    zombies: 10,
                },
                tick(5_000),
            ],
            &mesh,
            Vec3::ZERO,
            &mut commands,
        );
        assert_eq!(spawns(&commands), 1);
        assert_eq!(waves.pending(), 9);

        waves.handle(&[tick(16)], &mesh, Vec3::ZERO, &mut commands);
        assert_eq!(spawns(&commands), 2);

        waves.handle(&[tick(16)], &mesh, Vec3::ZERO, &mut commands);
        assert_eq!(spawns(&commands), 2);
    }

    #[test]
    fn spawn_points_lie_on_the_walkable_ring() {
        let mesh = mesh();
        let mut waves = Waves::new(WaveConfig::default());
        let mut commands = Vec::new();
        let player = Vec3::new(20.0, 0.0, -30.0);

        waves.handle(
            &[Event::WaveStarted {
                wave: 1,
                zombies: 10,
            }],
            &mesh,
            player,
            &mut commands,
        );
        for _ in 0..10 {
            waves.handle(&[tick(100)], &mesh, player, &mut commands);
        }
        assert_eq!(spawns(&commands), 10);

        for command in &commands {
            let Command::SpawnZombie { position } = command else {
                continue;
            };
            let radius = Vec3::new(position.x - player.x, 0.0, position.z - player.z).length();
            assert!((299.9..=450.1).contains(&radius), "radius {radius}");
            assert!(mesh.is_walkable_at(*position));
        }
    }

    #[test]
    fn same_seed_gives_same_spawn_points() {
        let mesh = mesh();
        let run = || {
            let mut waves = Waves::new(WaveConfig::default());
            let mut commands = Vec::new();
            waves.handle(
                &[Event::WaveStarted {
                    wave: 1,
                    zombies: 5,
                }],
                &mesh,
                Vec3::ZERO,
                &mut commands,
            );
            for _ in 0..5 {
                waves.handle(&[tick(100)], &mesh, Vec3::ZERO, &mut commands);
            }
            commands
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn completed_waves_advance_after_the_intermission() {
        let mesh = mesh();
        let mut waves = Waves::new(WaveConfig::default());
        let mut commands = Vec::new();

        waves.handle(
            &[Event::WaveCompleted { wave: 1 }, tick(4_000)],
            &mesh,
            Vec3::ZERO,
            &mut commands,
        );
        assert!(commands.is_empty());

        waves.handle(&[tick(1_000)], &mesh, Vec3::ZERO, &mut commands);
        assert_eq!(commands, vec![Command::StartWave]);

        waves.handle(&[tick(10_000)], &mesh, Vec3::ZERO, &mut commands);
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn manual_mode_waits_for_the_host() {
        let mesh = mesh();
        let mut waves = Waves::new(WaveConfig {
            auto_advance: false,
            ..WaveConfig::default()
        });
        let mut commands = Vec::new();

        waves.handle(
            &[Event::WaveCompleted { wave: 1 }, tick(60_000)],
            &mesh,
            Vec3::ZERO,
            &mut commands,
        );

        assert!(commands.is_empty());
    }

    #[test]
    fn game_over_cancels_pending_spawns() {
        let mesh = mesh();
        let mut waves = Waves::new(WaveConfig::default());
        let mut commands = Vec::new();

        waves.handle(
            &[
                Event::WaveStarted {
                    wave: 1,
                    zombies: 10,
                },
                Event::GameOver { kills: 0 },
                tick(5_000),
            ],
            &mesh,
            Vec3::ZERO,
            &mut commands,
        );

        assert!(commands.is_empty());
        assert_eq!(waves.pending(), 0);
    }
}
