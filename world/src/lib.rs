#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Zombie Survival.
//!
//! The world owns every piece of mutable simulation state: the navigation
//! mesh, the zombie collection, the shooting pipeline with its target
//! registry, player vitals and wave progress, and the deferred task queue.
//! It only changes through [`apply`], and it reports every observable change
//! as an [`Event`].

pub mod animation;
pub mod game_state;
pub mod navigation;
mod schedule;
pub mod shooting;
mod zombie;

use std::{fmt, time::Duration};

use glam::Vec3;
use thiserror::Error;
use tracing::{debug, info, warn};
use zombie_survival_core::{
    geometry::{heading_of, horizontal, wrap_angle},
    AnimationIntent, Camera, Command, ConfigError, Event, Obstacle, Path, SurvivalConfig, Terrain,
    ZombieId, ZombieModel, ZombieState, WELCOME_BANNER,
};

use crate::{
    game_state::{GameState, KillOutcome},
    navigation::{NavigationError, NavigationMesh},
    schedule::{DeferredTask, TaskQueue},
    shooting::{FireOutcome, ShootingPipeline, TargetRegistry},
    zombie::Zombie,
};

/// Reasons the world could not be created.
#[derive(Debug, Error)]
pub enum WorldError {
    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The navigation mesh could not be built.
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

/// Represents the authoritative Zombie Survival world state.
pub struct World {
    banner: &'static str,
    config: SurvivalConfig,
    terrain: Box<dyn Terrain>,
    obstacles: Vec<Obstacle>,
    navigation: NavigationMesh,
    navigation_stale: bool,
    camera: Camera,
    zombies: Vec<Zombie>,
    next_zombie_id: u32,
    targets: TargetRegistry,
    shooting: ShootingPipeline,
    game_state: GameState,
    tasks: TaskQueue,
    clock: Duration,
    tick_index: u64,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("obstacles", &self.obstacles.len())
            .field("navigation_stale", &self.navigation_stale)
            .field("zombies", &self.zombies.len())
            .field("targets", &self.targets.len())
            .field("game_state", &self.game_state)
            .field("clock", &self.clock)
            .field("tick_index", &self.tick_index)
            .finish_non_exhaustive()
    }
}

impl World {
    /// Creates a world over the provided terrain and obstacles.
    ///
    /// Fails when the configuration is invalid or the navigation mesh cannot
    /// be built from it.
    pub fn new(
        config: SurvivalConfig,
        terrain: Box<dyn Terrain>,
        obstacles: Vec<Obstacle>,
    ) -> Result<Self, WorldError> {
        config.validate()?;
        let navigation = NavigationMesh::build(&config.navigation, terrain.as_ref(), &obstacles)?;
        info!(
            walkable = navigation.walkable_count(),
            total = navigation.node_count(),
            "navigation mesh built"
        );
        let game_state = GameState::new(config.player.clone(), config.waves.clone());

        Ok(Self {
            banner: WELCOME_BANNER,
            config,
            terrain,
            obstacles,
            navigation,
            navigation_stale: false,
            camera: Camera::default(),
            zombies: Vec::new(),
            next_zombie_id: 0,
            targets: TargetRegistry::default(),
            shooting: ShootingPipeline::default(),
            game_state,
            tasks: TaskQueue::default(),
            clock: Duration::ZERO,
            tick_index: 0,
        })
    }

    fn zombie_index(&self, zombie: ZombieId) -> Option<usize> {
        self.zombies.iter().position(|candidate| candidate.id == zombie)
    }

    fn zombie_mut(&mut self, zombie: ZombieId) -> Option<&mut Zombie> {
        self.zombies
            .iter_mut()
            .find(|candidate| candidate.id == zombie)
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.game_state.is_paused() || self.game_state.is_game_over() {
            return;
        }

        self.clock = self.clock.saturating_add(dt);
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced { dt });

        let dt_seconds = dt.as_secs_f32();
        self.game_state.update_stamina(dt_seconds);

        for task in self.tasks.drain_due(self.clock) {
            self.run_task(task, out_events);
        }

        for (projectile, position) in self
            .shooting
            .advance_projectiles(dt_seconds, self.config.shooting.projectile_speed)
        {
            out_events.push(Event::ProjectileImpact {
                projectile,
                position,
            });
        }

        let recompute = self.config.zombie.path_recompute();
        for zombie in &mut self.zombies {
            if zombie.wants_path(self.clock, recompute) {
                zombie.path_pending = true;
                zombie.path_requested_at = Some(self.clock);
                out_events.push(Event::ZombiePathNeeded {
                    zombie: zombie.id,
                    from: zombie.position,
                });
            }
        }
    }

    fn run_task(&mut self, task: DeferredTask, out_events: &mut Vec<Event>) {
        match task {
            DeferredTask::RemoveZombie { zombie, epoch } => {
                let Some(index) = self.zombie_index(zombie) else {
                    return;
                };
                let current = &self.zombies[index];
                if current.epoch != epoch || current.state != ZombieState::Dying {
                    debug!(zombie = zombie.get(), epoch, "stale removal discarded");
                    return;
                }
                self.remove_zombie(index, out_events);
            }
            DeferredTask::RevertFlash { target, epoch } => {
                let _ = self.shooting.revert_flash(target, epoch);
            }
        }
    }

    fn remove_zombie(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let zombie = self.zombies.remove(index);
        let from = zombie.state;
        debug!(zombie = zombie.id.get(), "zombie removed");
        out_events.push(Event::ZombieStateChanged {
            zombie: zombie.id,
            from,
            to: ZombieState::Removed,
        });
        out_events.push(Event::ZombieRemoved { zombie: zombie.id });
    }

    fn spawn_zombie(&mut self, position: Vec3, out_events: &mut Vec<Event>) {
        if self.game_state.is_game_over() {
            warn!("spawn rejected after game over");
            return;
        }

        let id = ZombieId::new(self.next_zombie_id);
        self.next_zombie_id = self.next_zombie_id.wrapping_add(1);
        let grounded = Vec3::new(
            position.x,
            self.terrain.height_at(position.x, position.z),
            position.z,
        );
        let mut zombie = Zombie::new(id, grounded, self.config.zombie.health);
        zombie.heading = heading_towards(grounded, self.camera.position);
        self.zombies.push(zombie);

        let living = self.zombies.iter().filter(|zombie| zombie.is_alive()).count();
        if living > self.game_state.zombies_remaining() as usize {
            self.game_state.add_zombie();
        }

        debug!(zombie = id.get(), x = grounded.x, z = grounded.z, "zombie spawned");
        out_events.push(Event::ZombieSpawned {
            zombie: id,
            position: grounded,
        });
    }

    fn attach_model(&mut self, zombie: ZombieId, model: ZombieModel, out_events: &mut Vec<Event>) {
        let Some(index) = self.zombie_index(zombie) else {
            warn!(zombie = zombie.get(), "model attached to unknown zombie");
            return;
        };
        let entry = &mut self.zombies[index];
        if !entry.is_alive() || entry.model_attached() {
            warn!(zombie = zombie.get(), "model attach ignored");
            return;
        }

        let targets: Vec<_> = model
            .parts
            .iter()
            .map(|part| self.targets.register(zombie, part.bounds_at(entry.position)))
            .collect();
        entry.targets.clone_from(&targets);
        entry.model = Some(model);
        let intent = AnimationIntent::for_state(entry.state);
        out_events.push(Event::ZombieModelAttached { zombie, targets });
        entry.animate(intent, out_events);
    }

    fn steer_zombie(
        &mut self,
        zombie: ZombieId,
        position: Vec3,
        heading: f32,
        state: ZombieState,
        path_index: usize,
        out_events: &mut Vec<Event>,
    ) {
        if !state.is_alive() {
            warn!(zombie = zombie.get(), ?state, "steering cannot set lifecycle states");
            return;
        }
        let grounded = Vec3::new(
            position.x,
            self.terrain.height_at(position.x, position.z),
            position.z,
        );
        let Some(index) = self.zombie_index(zombie) else {
            return;
        };
        let entry = &mut self.zombies[index];
        if !entry.is_alive() || !entry.model_attached() {
            return;
        }

        let offset = grounded - entry.position;
        entry.position = grounded;
        entry.heading = wrap_angle(heading);
        entry.path_index = path_index;
        for &target in &entry.targets {
            if let Some(bounds) = self
                .targets
                .get(target)
                .map(|registered| registered.bounds.translated(offset))
            {
                self.targets.update_bounds(target, bounds);
            }
        }

        if entry.state != state {
            let from = entry.state;
            entry.state = state;
            if state == ZombieState::Seeking {
                entry.clear_path();
                entry.path_requested_at = None;
            }
            debug!(zombie = zombie.get(), ?from, to = ?state, "zombie state changed");
            out_events.push(Event::ZombieStateChanged {
                zombie,
                from,
                to: state,
            });
            entry.animate(AnimationIntent::for_state(state), out_events);
        }
    }

    fn assign_path(&mut self, zombie: ZombieId, path: Option<Path>) {
        let Some(entry) = self.zombie_mut(zombie) else {
            return;
        };
        entry.path_pending = false;
        if !entry.is_alive() {
            return;
        }
        if path.is_none() {
            debug!(zombie = zombie.get(), "no path available, steering directly");
        }
        entry.path = path.filter(|path| !path.is_empty());
        entry.path_index = 0;
    }

    fn zombie_attack(&mut self, zombie: ZombieId, out_events: &mut Vec<Event>) {
        let Some(entry) = self.zombies.iter().find(|candidate| candidate.id == zombie) else {
            return;
        };
        if entry.state != ZombieState::Attacking {
            debug!(zombie = zombie.get(), "attack from non-attacking zombie ignored");
            return;
        }
        let damage = self.config.zombie.attack_damage;
        self.damage_player(damage, out_events);
    }

    fn damage_zombie(&mut self, zombie: ZombieId, amount: u32, out_events: &mut Vec<Event>) {
        let Some(index) = self.zombie_index(zombie) else {
            return;
        };
        let entry = &mut self.zombies[index];
        if !entry.is_alive() {
            return;
        }

        entry.health = entry.health.saturating_sub(amount);
        out_events.push(Event::ZombieDamaged {
            zombie,
            amount,
            remaining_health: entry.health,
        });
        if entry.health == 0 {
            self.kill_zombie(index, out_events);
        }
    }

    fn kill_zombie(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let entry = &mut self.zombies[index];
        let zombie = entry.id;
        let from = entry.state;
        entry.state = ZombieState::Dying;
        entry.epoch = entry.epoch.wrapping_add(1);
        entry.clear_path();
        entry.path_pending = false;
        for target in entry.targets.drain(..) {
            let _ = self.targets.unregister(target);
            self.shooting.forget_target(target);
        }

        out_events.push(Event::ZombieStateChanged {
            zombie,
            from,
            to: ZombieState::Dying,
        });
        out_events.push(Event::ZombieKilled { zombie });
        entry.animate(AnimationIntent::Die, out_events);

        let epoch = entry.epoch;
        let delayed = entry.has_death_animation();

        match self.game_state.kill_zombie() {
            KillOutcome::WaveComplete => {
                let wave = self.game_state.current_wave();
                info!(wave, kills = self.game_state.kill_count(), "wave completed");
                out_events.push(Event::WaveCompleted { wave });
            }
            KillOutcome::Counted => {
                debug!(
                    zombie = zombie.get(),
                    remaining = self.game_state.zombies_remaining(),
                    "zombie killed"
                );
            }
            KillOutcome::Ignored => {
                debug!(zombie = zombie.get(), "kill outside of a wave");
            }
        }

        if delayed {
            let due = self.clock.saturating_add(self.config.zombie.death_animation());
            self.tasks
                .schedule(due, DeferredTask::RemoveZombie { zombie, epoch });
        } else {
            self.remove_zombie(index, out_events);
        }
    }

    fn fire(&mut self, out_events: &mut Vec<Event>) {
        if self.game_state.is_paused() || self.game_state.is_game_over() {
            debug!("shot dropped while inactive");
            return;
        }

        match self
            .shooting
            .fire(self.clock, &self.camera, &self.targets, &self.config.shooting)
        {
            FireOutcome::CoolingDown => debug!("shot dropped during cooldown"),
            FireOutcome::NoAim => warn!("shot dropped without an aim direction"),
            FireOutcome::Missed {
                projectile,
                origin,
                destination,
            } => out_events.push(Event::ShotFired {
                projectile,
                origin,
                destination,
            }),
            FireOutcome::Hit {
                hit,
                projectile,
                origin,
            } => {
                out_events.push(Event::ShotFired {
                    projectile,
                    origin,
                    destination: hit.point,
                });
                out_events.push(Event::TargetHit {
                    target: hit.target,
                    zombie: hit.zombie,
                    point: hit.point,
                });
                let epoch = self.shooting.flash(hit.target);
                let due = self.clock.saturating_add(self.config.shooting.hit_flash());
                self.tasks.schedule(
                    due,
                    DeferredTask::RevertFlash {
                        target: hit.target,
                        epoch,
                    },
                );
                let damage = self.config.shooting.damage;
                self.damage_zombie(hit.zombie, damage, out_events);
            }
        }
    }

    fn damage_player(&mut self, amount: f32, out_events: &mut Vec<Event>) {
        let change = self.game_state.damage_player(amount);
        if change.delta < 0.0 {
            out_events.push(Event::PlayerDamaged {
                amount: -change.delta,
                health: change.health,
            });
        }
        if change.game_over {
            let kills = self.game_state.kill_count();
            info!(kills, wave = self.game_state.current_wave(), "game over");
            out_events.push(Event::GameOver { kills });
            for zombie in self
                .zombies
                .iter_mut()
                .filter(|zombie| zombie.is_alive() && zombie.model_attached())
            {
                zombie.animate(AnimationIntent::Idle, out_events);
            }
        }
    }

    fn restart(&mut self, out_events: &mut Vec<Event>) {
        self.zombies.clear();
        self.targets.clear();
        self.shooting.reset();
        self.tasks.clear();
        self.game_state.reset();
        info!("game restarted");
        out_events.push(Event::GameReset);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SetPaused { paused } => {
            if world.game_state.set_paused(paused) {
                info!(paused, "pause toggled");
                out_events.push(Event::PauseChanged { paused });
            }
        }
        Command::UpdateCamera { camera } => world.camera = camera,
        Command::SetSprinting { sprinting } => {
            if world.game_state.set_sprinting(sprinting) != sprinting {
                debug!("sprint refused without stamina");
            }
        }
        Command::ReplaceObstacles { obstacles } => {
            world.obstacles = obstacles;
            world.navigation_stale = true;
            warn!(
                obstacles = world.obstacles.len(),
                "obstacles replaced; navigation is stale until rebuilt"
            );
        }
        Command::RebuildNavigation => {
            match NavigationMesh::build(
                &world.config.navigation,
                world.terrain.as_ref(),
                &world.obstacles,
            ) {
                Ok(mesh) => {
                    let walkable = mesh.walkable_count();
                    let total = mesh.node_count();
                    world.navigation = mesh;
                    world.navigation_stale = false;
                    info!(walkable, total, "navigation mesh rebuilt");
                    out_events.push(Event::NavigationRebuilt { walkable, total });
                }
                Err(error) => warn!(%error, "navigation rebuild rejected"),
            }
        }
        Command::StartWave => {
            if world.game_state.is_game_over() {
                warn!("wave start rejected after game over");
                return;
            }
            let zombies = world.game_state.start_new_wave();
            let wave = world.game_state.current_wave();
            info!(wave, zombies, "wave started");
            out_events.push(Event::WaveStarted { wave, zombies });
        }
        Command::SpawnZombie { position } => world.spawn_zombie(position, out_events),
        Command::AttachZombieModel { zombie, model } => {
            world.attach_model(zombie, model, out_events)
        }
        Command::AssignPath { zombie, path } => world.assign_path(zombie, path),
        Command::SteerZombie {
            zombie,
            position,
            heading,
            state,
            path_index,
        } => world.steer_zombie(zombie, position, heading, state, path_index, out_events),
        Command::ZombieAttack { zombie } => {
            if !world.game_state.is_game_over() {
                world.zombie_attack(zombie, out_events);
            }
        }
        Command::DamageZombie { zombie, amount } => world.damage_zombie(zombie, amount, out_events),
        Command::Fire => world.fire(out_events),
        Command::DamagePlayer { amount } => world.damage_player(amount, out_events),
        Command::HealPlayer { amount } => {
            let change = world.game_state.heal_player(amount);
            if change.delta > 0.0 {
                out_events.push(Event::PlayerHealed {
                    amount: change.delta,
                    health: change.health,
                });
            }
        }
        Command::RestartGame => world.restart(out_events),
    }
}

fn heading_towards(from: Vec3, to: Vec3) -> f32 {
    let direction = horizontal(to - from);
    if direction.length_squared() <= f32::EPSILON {
        0.0
    } else {
        heading_of(direction)
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use crate::{game_state::GameState, navigation::NavigationMesh, shooting::TargetRegistry};
    use zombie_survival_core::{
        Camera, MinimapBlip, MinimapSnapshot, Obstacle, ProjectileSnapshot, SurvivalConfig,
        TargetId, Terrain, Tint, ZombieId, ZombieView,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &SurvivalConfig {
        &world.config
    }

    /// Player vitals, wave progress and pause state.
    #[must_use]
    pub fn game_state(world: &World) -> &GameState {
        &world.game_state
    }

    /// Whether the simulation is paused.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.game_state.is_paused()
    }

    /// Simulated time elapsed while unpaused.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Captures a read-only view of every zombie, including dying ones.
    #[must_use]
    pub fn zombie_view(world: &World) -> ZombieView {
        ZombieView::from_snapshots(
            world
                .zombies
                .iter()
                .map(|zombie| zombie.snapshot(&world.config.navigation))
                .collect(),
        )
    }

    /// Zombies that are still alive, in identifier order.
    #[must_use]
    pub fn tracked_zombies(world: &World) -> Vec<ZombieId> {
        let mut ids: Vec<ZombieId> = world
            .zombies
            .iter()
            .filter(|zombie| zombie.is_alive())
            .map(|zombie| zombie.id)
            .collect();
        ids.sort();
        ids
    }

    /// Navigation mesh used for path finding and spawn validation.
    #[must_use]
    pub fn navigation(world: &World) -> &NavigationMesh {
        &world.navigation
    }

    /// Whether the obstacles changed since the mesh was last built.
    #[must_use]
    pub fn is_navigation_stale(world: &World) -> bool {
        world.navigation_stale
    }

    /// Static obstacles currently in the world.
    #[must_use]
    pub fn obstacles(world: &World) -> &[Obstacle] {
        &world.obstacles
    }

    /// Terrain height field.
    #[must_use]
    pub fn terrain(world: &World) -> &dyn Terrain {
        world.terrain.as_ref()
    }

    /// Current camera pose, which is also the player position.
    #[must_use]
    pub fn camera(world: &World) -> Camera {
        world.camera
    }

    /// In-flight cosmetic projectiles.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world.shooting.projectiles()
    }

    /// Registered hit targets.
    #[must_use]
    pub fn targets(world: &World) -> &TargetRegistry {
        &world.targets
    }

    /// Material overlay currently applied to the target.
    #[must_use]
    pub fn target_tint(world: &World, target: TargetId) -> Tint {
        world.shooting.tint(target)
    }

    /// Number of deferred tasks waiting for the clock.
    #[must_use]
    pub fn pending_tasks(world: &World) -> usize {
        world.tasks.len()
    }

    /// Normalised player and zombie positions for the minimap.
    #[must_use]
    pub fn minimap(world: &World) -> MinimapSnapshot {
        let mut zombies: Vec<MinimapBlip> = world
            .zombies
            .iter()
            .filter(|zombie| zombie.is_alive())
            .map(|zombie| MinimapBlip {
                zombie: zombie.id,
                position: MinimapSnapshot::normalise(zombie.position),
            })
            .collect();
        zombies.sort_by_key(|blip| blip.zombie);
        MinimapSnapshot {
            player: MinimapSnapshot::normalise(world.camera.position),
            zombies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zombie_survival_core::NavigationConfig;

    fn world() -> World {
        let config = SurvivalConfig {
            navigation: NavigationConfig {
                world_size: 200.0,
                ..NavigationConfig::default()
            },
            ..SurvivalConfig::default()
        };
        World::new(config, Box::new(|_: f32, _: f32| 0.0), Vec::new()).expect("world builds")
    }

    fn spawn_attached(world: &mut World, position: Vec3) -> ZombieId {
        let mut events = Vec::new();
        apply(world, Command::SpawnZombie { position }, &mut events);
        let zombie = events
            .iter()
            .find_map(|event| match event {
                Event::ZombieSpawned { zombie, .. } => Some(*zombie),
                _ => None,
            })
            .expect("zombie spawned");
        apply(
            world,
            Command::AttachZombieModel {
                zombie,
                model: ZombieModel::standard(),
            },
            &mut events,
        );
        zombie
    }

    #[test]
    fn invalid_navigation_extent_fails_construction() {
        let config = SurvivalConfig {
            navigation: NavigationConfig {
                world_size: -1.0,
                ..NavigationConfig::default()
            },
            ..SurvivalConfig::default()
        };

        let result = World::new(config, Box::new(|_: f32, _: f32| 0.0), Vec::new());

        assert!(matches!(
            result,
            Err(WorldError::Navigation(NavigationError::InvalidExtent { .. }))
        ));
    }

    #[test]
    fn spawn_snaps_to_terrain_height() {
        let mut world = World::new(
            SurvivalConfig {
                navigation: NavigationConfig {
                    world_size: 200.0,
                    ..NavigationConfig::default()
                },
                ..SurvivalConfig::default()
            },
            Box::new(|_: f32, _: f32| 12.0),
            Vec::new(),
        )
        .expect("world builds");

        let zombie = spawn_attached(&mut world, Vec3::new(10.0, 0.0, 10.0));

        let view = query::zombie_view(&world);
        let snapshot = view.get(zombie).expect("zombie present");
        assert_eq!(snapshot.position.y, 12.0);
        assert!(snapshot.model_attached);
        assert_eq!(query::targets(&world).len(), 3);
    }

    #[test]
    fn seeking_zombies_request_paths_once_per_interval() {
        let mut world = world();
        let zombie = spawn_attached(&mut world, Vec3::new(50.0, 0.0, 0.0));
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );

        let requests = events
            .iter()
            .filter(|event| matches!(event, Event::ZombiePathNeeded { .. }))
            .count();
        assert_eq!(requests, 1);

        apply(
            &mut world,
            Command::AssignPath {
                zombie,
                path: Some(Path::new(vec![Vec3::new(50.0, 0.0, 0.0), Vec3::ZERO])),
            },
            &mut events,
        );
        events.clear();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(1_000),
            },
            &mut events,
        );

        assert!(events
            .iter()
            .any(|event| matches!(event, Event::ZombiePathNeeded { .. })));
    }

    #[test]
    fn steering_into_attack_reports_state_and_animation() {
        let mut world = world();
        let zombie = spawn_attached(&mut world, Vec3::new(80.0, 0.0, 0.0));
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SteerZombie {
                zombie,
                position: Vec3::new(70.0, 0.0, 0.0),
                heading: 0.0,
                state: ZombieState::Attacking,
                path_index: 0,
            },
            &mut events,
        );

        assert!(events.contains(&Event::ZombieStateChanged {
            zombie,
            from: ZombieState::Seeking,
            to: ZombieState::Attacking,
        }));
        assert!(events.contains(&Event::AnimationChanged {
            zombie,
            animation: zombie_survival_core::AnimationState::Punching,
        }));
    }

    #[test]
    fn attacks_only_land_while_attacking() {
        let mut world = world();
        let zombie = spawn_attached(&mut world, Vec3::new(80.0, 0.0, 0.0));
        let mut events = Vec::new();

        apply(&mut world, Command::ZombieAttack { zombie }, &mut events);
        assert_eq!(query::game_state(&world).health(), 100.0);

        apply(
            &mut world,
            Command::SteerZombie {
                zombie,
                position: Vec3::new(70.0, 0.0, 0.0),
                heading: 0.0,
                state: ZombieState::Attacking,
                path_index: 0,
            },
            &mut events,
        );
        apply(&mut world, Command::ZombieAttack { zombie }, &mut events);

        assert_eq!(query::game_state(&world).health(), 90.0);
    }

    #[test]
    fn paused_ticks_do_not_advance_time() {
        let mut world = world();
        let mut events = Vec::new();

        apply(&mut world, Command::SetPaused { paused: true }, &mut events);
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(1),
            },
            &mut events,
        );

        assert_eq!(events, vec![Event::PauseChanged { paused: true }]);
        assert_eq!(query::clock(&world), Duration::ZERO);
    }

    #[test]
    fn replacing_obstacles_marks_navigation_stale_until_rebuilt() {
        let mut world = world();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::ReplaceObstacles {
                obstacles: vec![Obstacle::new(zombie_survival_core::Aabb::from_center_half_extents(
                    Vec3::new(0.0, 10.0, 0.0),
                    Vec3::splat(10.0),
                ))],
            },
            &mut events,
        );
        assert!(query::is_navigation_stale(&world));
        assert!(query::navigation(&world).is_walkable_at(Vec3::ZERO));

        apply(&mut world, Command::RebuildNavigation, &mut events);

        assert!(!query::is_navigation_stale(&world));
        assert!(!query::navigation(&world).is_walkable_at(Vec3::ZERO));
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::NavigationRebuilt { .. })));
    }
}
