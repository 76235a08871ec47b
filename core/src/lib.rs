#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Zombie Survival simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

pub mod config;
pub mod geometry;

use std::time::Duration;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

pub use config::{
    ConfigError, NavigationConfig, PlayerConfig, ShootingConfig, SurvivalConfig, WaveConfig,
    ZombieConfig,
};
pub use geometry::{Aabb, Camera, Obstacle, Ray, Terrain};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Zombie Survival.";

/// Side length of the square area covered by the minimap, centred on the origin.
pub const MINIMAP_WORLD_SIZE: f32 = 2_000.0;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous frame.
        dt: Duration,
    },
    /// Pauses or resumes the simulation.
    SetPaused {
        /// Whether the simulation should be paused.
        paused: bool,
    },
    /// Moves the player's eye and aim.
    UpdateCamera {
        /// Camera pose for the coming frames.
        camera: Camera,
    },
    /// Starts or stops sprinting. Starting is refused without stamina.
    SetSprinting {
        /// Whether the player wants to sprint.
        sprinting: bool,
    },
    /// Replaces the static obstacle snapshot, leaving navigation stale.
    ReplaceObstacles {
        /// New obstacle set.
        obstacles: Vec<Obstacle>,
    },
    /// Rebuilds the navigation mesh from the current terrain and obstacles.
    RebuildNavigation,
    /// Advances the game state to the next wave.
    StartWave,
    /// Requests a new zombie standing at the provided position.
    SpawnZombie {
        /// Horizontal spawn location; elevation is snapped to the terrain.
        position: Vec3,
    },
    /// Reports that the zombie's model finished loading.
    AttachZombieModel {
        /// Zombie receiving the model.
        zombie: ZombieId,
        /// Hittable layout of the model.
        model: ZombieModel,
    },
    /// Answers a path request. `None` means no path exists and steering goes direct.
    AssignPath {
        /// Zombie that requested the path.
        zombie: ZombieId,
        /// Computed path, if any.
        path: Option<Path>,
    },
    /// Applies a steering decision for a single zombie.
    SteerZombie {
        /// Zombie being steered.
        zombie: ZombieId,
        /// New horizontal position; elevation is snapped to the terrain.
        position: Vec3,
        /// New facing angle in radians.
        heading: f32,
        /// Movement state chosen by the controller.
        state: ZombieState,
        /// Index of the next waypoint to approach.
        path_index: usize,
    },
    /// Reports that an attacking zombie landed a melee strike.
    ZombieAttack {
        /// Zombie that struck.
        zombie: ZombieId,
    },
    /// Deals direct damage to a zombie.
    DamageZombie {
        /// Zombie receiving the damage.
        zombie: ZombieId,
        /// Health to remove.
        amount: u32,
    },
    /// Pulls the trigger along the camera's aim.
    Fire,
    /// Deals damage to the player.
    DamagePlayer {
        /// Health to remove.
        amount: f32,
    },
    /// Restores player health.
    HealPlayer {
        /// Health to restore.
        amount: f32,
    },
    /// Clears every zombie and projectile and resets the game state.
    RestartGame,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the simulation was paused or resumed.
    PauseChanged {
        /// Whether the simulation is now paused.
        paused: bool,
    },
    /// Confirms that the navigation mesh was rebuilt.
    NavigationRebuilt {
        /// Number of walkable nodes.
        walkable: usize,
        /// Total number of nodes.
        total: usize,
    },
    /// Announces the start of a wave.
    WaveStarted {
        /// One-based wave number.
        wave: u32,
        /// Zombies that must die to complete the wave.
        zombies: u32,
    },
    /// Announces that the last zombie of a wave died.
    WaveCompleted {
        /// Wave that was completed.
        wave: u32,
    },
    /// Confirms that a zombie entered the world.
    ZombieSpawned {
        /// Identifier allocated to the zombie.
        zombie: ZombieId,
        /// Grounded spawn position.
        position: Vec3,
    },
    /// Confirms that a zombie became hittable and controllable.
    ZombieModelAttached {
        /// Zombie that received its model.
        zombie: ZombieId,
        /// Hit targets registered for the model's parts.
        targets: Vec<TargetId>,
    },
    /// Requests a path from the zombie's position to the player.
    ZombiePathNeeded {
        /// Zombie requiring a path.
        zombie: ZombieId,
        /// Zombie position at request time.
        from: Vec3,
    },
    /// Announces a movement or lifecycle state transition.
    ZombieStateChanged {
        /// Zombie that transitioned.
        zombie: ZombieId,
        /// State before the transition.
        from: ZombieState,
        /// State after the transition.
        to: ZombieState,
    },
    /// Announces that the zombie's animation clip changed.
    AnimationChanged {
        /// Zombie whose animation changed.
        zombie: ZombieId,
        /// Animation now playing.
        animation: AnimationState,
    },
    /// Reports damage dealt to a zombie that survived or just died.
    ZombieDamaged {
        /// Zombie that was damaged.
        zombie: ZombieId,
        /// Health removed by the hit.
        amount: u32,
        /// Health left after the hit.
        remaining_health: u32,
    },
    /// Announces that a zombie started dying. Emitted once per zombie.
    ZombieKilled {
        /// Zombie that died.
        zombie: ZombieId,
    },
    /// Confirms that a dead zombie left the world.
    ZombieRemoved {
        /// Zombie that was removed.
        zombie: ZombieId,
    },
    /// Confirms that an accepted shot spawned a projectile.
    ShotFired {
        /// Identifier of the cosmetic projectile.
        projectile: ProjectileId,
        /// Gun position the projectile starts from.
        origin: Vec3,
        /// Point the projectile travels toward.
        destination: Vec3,
    },
    /// Reports that a shot struck a zombie part.
    TargetHit {
        /// Part that was struck.
        target: TargetId,
        /// Zombie owning the part.
        zombie: ZombieId,
        /// World-space impact point.
        point: Vec3,
    },
    /// Reports that a projectile reached its destination.
    ProjectileImpact {
        /// Projectile that landed.
        projectile: ProjectileId,
        /// Impact position.
        position: Vec3,
    },
    /// Reports damage dealt to the player.
    PlayerDamaged {
        /// Health removed.
        amount: f32,
        /// Health left.
        health: f32,
    },
    /// Reports health restored to the player.
    PlayerHealed {
        /// Health restored.
        amount: f32,
        /// Health after healing.
        health: f32,
    },
    /// Announces that the player died. Emitted once per game.
    GameOver {
        /// Zombies killed during the game.
        kills: u32,
    },
    /// Confirms that the game was restarted.
    GameReset,
}

/// Unique identifier assigned to a zombie.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZombieId(u32);

impl ZombieId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of a hittable zombie part in the target registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(u32);

impl TargetId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of a cosmetic projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Movement and lifecycle state of a zombie.
///
/// `Seeking` and `Attacking` alternate freely; `Dying` and `Removed` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZombieState {
    /// Walking toward the player.
    Seeking,
    /// Standing at stopping distance and striking.
    Attacking,
    /// Playing the death animation; no longer hittable.
    Dying,
    /// Released from the world.
    Removed,
}

impl ZombieState {
    /// Reports whether the zombie still takes part in combat.
    #[must_use]
    pub const fn is_alive(self) -> bool {
        matches!(self, Self::Seeking | Self::Attacking)
    }
}

/// Animation clip currently playing on a zombie.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationState {
    /// Standing still.
    Idle,
    /// Walk cycle.
    Walking,
    /// Melee strike loop.
    Punching,
    /// Death clip; never left once entered.
    Dying,
}

/// Animation request emitted by the movement state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationIntent {
    /// Stand still; living zombies idle once the player is dead.
    Idle,
    /// Walk toward a target.
    Walk,
    /// Strike the player.
    Attack,
    /// Play the death clip.
    Die,
}

impl AnimationIntent {
    /// Intent associated with entering the provided movement state.
    #[must_use]
    pub const fn for_state(state: ZombieState) -> Self {
        match state {
            ZombieState::Seeking => Self::Walk,
            ZombieState::Attacking => Self::Attack,
            ZombieState::Dying | ZombieState::Removed => Self::Die,
        }
    }
}

/// Ordered list of world-space waypoints produced by the path finder.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    waypoints: Vec<Vec3>,
}

impl Path {
    /// Wraps the provided waypoints.
    #[must_use]
    pub fn new(waypoints: Vec<Vec3>) -> Self {
        Self { waypoints }
    }

    /// All waypoints in travel order.
    #[must_use]
    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Reports whether the path has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Waypoint at the provided index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.waypoints.get(index).copied()
    }

    /// Final waypoint of the path.
    #[must_use]
    pub fn last(&self) -> Option<Vec3> {
        self.waypoints.last().copied()
    }
}

/// Hittable box of a zombie model, relative to the zombie's feet.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HitPart {
    /// Offset of the box centre from the zombie position.
    pub offset: Vec3,
    /// Half extents of the box.
    pub half_extents: Vec3,
}

impl HitPart {
    /// World-space bounds of the part for a zombie standing at `position`.
    #[must_use]
    pub fn bounds_at(&self, position: Vec3) -> Aabb {
        Aabb::from_center_half_extents(position + self.offset, self.half_extents)
    }
}

/// Hittable layout of a loaded zombie model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZombieModel {
    /// Parts registered as individual hit targets.
    pub parts: Vec<HitPart>,
    /// Whether the model ships a death clip. Without one the corpse is removed at once.
    pub has_death_animation: bool,
}

impl ZombieModel {
    /// Humanoid layout with legs, torso and head, matching a 30 unit tall agent.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            parts: vec![
                HitPart {
                    offset: Vec3::new(0.0, 7.5, 0.0),
                    half_extents: Vec3::new(4.0, 7.5, 4.0),
                },
                HitPart {
                    offset: Vec3::new(0.0, 19.0, 0.0),
                    half_extents: Vec3::new(5.0, 4.0, 3.0),
                },
                HitPart {
                    offset: Vec3::new(0.0, 26.5, 0.0),
                    half_extents: Vec3::new(2.5, 3.5, 2.5),
                },
            ],
            has_death_animation: true,
        }
    }
}

/// Immutable representation of a single zombie used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct ZombieSnapshot {
    /// Unique identifier assigned to the zombie.
    pub id: ZombieId,
    /// Grounded world-space position.
    pub position: Vec3,
    /// Facing angle in radians.
    pub heading: f32,
    /// Remaining health.
    pub health: u32,
    /// Movement and lifecycle state.
    pub state: ZombieState,
    /// Animation clip currently playing.
    pub animation: AnimationState,
    /// Whether the model finished loading.
    pub model_attached: bool,
    /// Path currently followed, if any.
    pub path: Option<Path>,
    /// Index of the next waypoint to approach.
    pub path_index: usize,
    /// Agent collision box.
    pub bounds: Aabb,
}

impl ZombieSnapshot {
    /// Waypoint the zombie is currently heading for.
    #[must_use]
    pub fn current_waypoint(&self) -> Option<Vec3> {
        self.path
            .as_ref()
            .and_then(|path| path.get(self.path_index))
    }
}

/// Read-only snapshot describing all zombies in the world.
#[derive(Clone, Debug, Default)]
pub struct ZombieView {
    snapshots: Vec<ZombieSnapshot>,
}

impl ZombieView {
    /// Creates a new zombie view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ZombieSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured zombie snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ZombieSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the provided zombie, if present.
    #[must_use]
    pub fn get(&self, zombie: ZombieId) -> Option<&ZombieSnapshot> {
        self.snapshots
            .binary_search_by_key(&zombie, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Number of zombies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no zombies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ZombieSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of an in-flight projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: ProjectileId,
    /// Current position.
    pub position: Vec3,
    /// Point the projectile travels toward.
    pub destination: Vec3,
    /// Distance covered so far.
    pub traveled: f32,
    /// Distance to cover before impact.
    pub total_distance: f32,
}

/// Material overlay currently shown on a hit target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tint {
    /// The model's own material.
    Base,
    /// Temporary red flash after a hit.
    HitFlash,
}

/// Minimap blip for a single zombie.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimapBlip {
    /// Zombie represented by the blip.
    pub zombie: ZombieId,
    /// Position normalised into `0.0..=1.0` across the minimap.
    pub position: Vec2,
}

/// Normalised positions for drawing the minimap.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MinimapSnapshot {
    /// Player position normalised into `0.0..=1.0`.
    pub player: Vec2,
    /// Living zombies in identifier order.
    pub zombies: Vec<MinimapBlip>,
}

impl MinimapSnapshot {
    /// Maps a world position onto the minimap, clamping points outside it to the border.
    #[must_use]
    pub fn normalise(position: Vec3) -> Vec2 {
        let half = MINIMAP_WORLD_SIZE * 0.5;
        Vec2::new(
            ((position.x + half) / MINIMAP_WORLD_SIZE).clamp(0.0, 1.0),
            ((position.z + half) / MINIMAP_WORLD_SIZE).clamp(0.0, 1.0),
        )
    }
}
