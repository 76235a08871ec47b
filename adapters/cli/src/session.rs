//! Headless host loop wiring the world to its systems.

use std::{mem, time::Duration};

use serde::Serialize;
use tracing::info;
use zombie_survival_core::{
    Command, Event, Obstacle, SurvivalConfig, Terrain, ZombieId, ZombieModel,
};
use zombie_survival_system_pathfinding::Pathfinding;
use zombie_survival_system_steering::Steering;
use zombie_survival_system_waves::Waves;
use zombie_survival_world::{self as world, query, World, WorldError};

use crate::scenario::Marksman;

/// Totals gathered from the event stream of a session.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub(crate) struct RunSummary {
    pub(crate) frames: u64,
    pub(crate) simulated_ms: u64,
    pub(crate) waves_started: u32,
    pub(crate) waves_completed: u32,
    pub(crate) highest_wave: u32,
    pub(crate) zombies_spawned: u32,
    pub(crate) zombies_killed: u32,
    pub(crate) shots_fired: u32,
    pub(crate) hits: u32,
    pub(crate) player_health: f32,
    pub(crate) game_over: bool,
}

impl RunSummary {
    fn record(&mut self, event: &Event) {
        match event {
            Event::WaveStarted { wave, .. } => {
                self.waves_started += 1;
                self.highest_wave = self.highest_wave.max(*wave);
            }
            Event::WaveCompleted { .. } => self.waves_completed += 1,
            Event::ZombieSpawned { .. } => self.zombies_spawned += 1,
            Event::ZombieKilled { .. } => self.zombies_killed += 1,
            Event::ShotFired { .. } => self.shots_fired += 1,
            Event::TargetHit { .. } => self.hits += 1,
            Event::PlayerDamaged { health, .. } | Event::PlayerHealed { health, .. } => {
                self.player_health = *health;
            }
            Event::GameOver { .. } => self.game_over = true,
            _ => {}
        }
    }
}

/// Owns the world and every system, pumping events until they settle.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    pathfinding: Pathfinding,
    steering: Steering,
    waves: Waves,
    marksman: Marksman,
    loading: Vec<ZombieId>,
    summary: RunSummary,
}

impl Session {
    /// Builds the world and its systems from one configuration.
    pub(crate) fn new(
        config: SurvivalConfig,
        terrain: Box<dyn Terrain>,
        obstacles: Vec<Obstacle>,
    ) -> Result<Self, WorldError> {
        let steering = Steering::new(config.zombie.clone(), &config.navigation);
        let waves = Waves::new(config.waves.clone());
        let range = config.shooting.max_range;
        let world = World::new(config, terrain, obstacles)?;
        let marksman = Marksman::new(query::terrain(&world), range);
        let summary = RunSummary {
            player_health: query::game_state(&world).health(),
            ..RunSummary::default()
        };

        Ok(Self {
            world,
            pathfinding: Pathfinding::default(),
            steering,
            waves,
            marksman,
            loading: Vec::new(),
            summary,
        })
    }

    /// Places the player and starts the first wave.
    pub(crate) fn start(&mut self) {
        info!("{}", query::welcome_banner(&self.world));
        let camera = self.marksman.idle_camera();
        self.submit(Command::UpdateCamera { camera });
        self.submit(Command::StartWave);
    }

    /// Advances the session by one frame of `dt`.
    ///
    /// Models requested on the previous frame finish loading first, then time
    /// advances and the scripted player takes its shot.
    pub(crate) fn frame(&mut self, dt: Duration) {
        for zombie in mem::take(&mut self.loading) {
            self.submit(Command::AttachZombieModel {
                zombie,
                model: ZombieModel::standard(),
            });
        }

        self.submit(Command::Tick { dt });

        let view = query::zombie_view(&self.world);
        if let Some(camera) = self.marksman.aim(&view) {
            self.submit(Command::UpdateCamera { camera });
            self.submit(Command::Fire);
        }

        self.summary.frames += 1;
        self.summary.simulated_ms =
            u64::try_from(query::clock(&self.world).as_millis()).unwrap_or(u64::MAX);
    }

    /// Whether the player has died.
    pub(crate) fn is_over(&self) -> bool {
        query::game_state(&self.world).is_game_over()
    }

    /// Totals recorded so far.
    pub(crate) fn summary(&self) -> &RunSummary {
        &self.summary
    }

    fn submit(&mut self, command: Command) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.pump(events);
    }

    fn pump(&mut self, mut events: Vec<Event>) {
        loop {
            if events.is_empty() {
                break;
            }
            for event in &events {
                self.summary.record(event);
                if let Event::ZombieSpawned { zombie, .. } = event {
                    self.loading.push(*zombie);
                }
            }

            let player = query::camera(&self.world).position;
            let view = query::zombie_view(&self.world);
            let mut commands = Vec::new();
            self.pathfinding.handle(
                &events,
                query::navigation(&self.world),
                player,
                &mut commands,
            );
            self.steering.handle(
                &events,
                &view,
                query::obstacles(&self.world),
                query::terrain(&self.world),
                player,
                &mut commands,
            );
            self.waves.handle(
                &events,
                query::navigation(&self.world),
                player,
                &mut commands,
            );

            if commands.is_empty() {
                break;
            }
            events.clear();
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zombie_survival_core::ZombieState;

    const FRAME: Duration = Duration::from_millis(16);

    fn session() -> Session {
        let mut session = Session::new(
            SurvivalConfig::default(),
            Box::new(|_: f32, _: f32| 0.0),
            Vec::new(),
        )
        .expect("session builds");
        session.start();
        session
    }

    fn run(session: &mut Session, frames: u32) {
        for _ in 0..frames {
            if session.is_over() {
                break;
            }
            session.frame(FRAME);
        }
    }

    #[test]
    fn first_wave_spawns_and_loads_every_zombie() {
        let mut session = session();

        run(&mut session, 120);

        let summary = session.summary();
        assert_eq!(summary.waves_started, 1);
        assert_eq!(summary.highest_wave, 1);
        assert_eq!(summary.zombies_spawned, 10);
        let view = query::zombie_view(&session.world);
        assert_eq!(view.len(), 10);
        assert!(view.iter().all(|zombie| zombie.model_attached));
    }

    #[test]
    fn zombies_close_in_on_the_player() {
        let mut session = session();
        run(&mut session, 90);
        let before: f32 = query::zombie_view(&session.world)
            .iter()
            .map(|zombie| zombie.position.length())
            .sum();

        run(&mut session, 60);
        let after: f32 = query::zombie_view(&session.world)
            .iter()
            .map(|zombie| zombie.position.length())
            .sum();

        assert!(after < before, "zombies did not advance: {before} -> {after}");
        assert!(query::zombie_view(&session.world)
            .iter()
            .all(|zombie| zombie.state == ZombieState::Seeking));
    }

    #[test]
    fn marksman_engages_zombies_that_reach_it() {
        let mut session = session();

        run(&mut session, 60 * 30);

        let summary = session.summary();
        assert!(summary.shots_fired > 0);
        assert!(summary.hits > 0);
        assert!(summary.zombies_killed > 0 || summary.game_over);
        assert!(summary.zombies_killed <= summary.zombies_spawned);
    }

    #[test]
    fn identical_sessions_produce_identical_summaries() {
        let mut first = session();
        let mut second = session();

        run(&mut first, 600);
        run(&mut second, 600);

        assert_eq!(first.summary(), second.summary());
    }
}
