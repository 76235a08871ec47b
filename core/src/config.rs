//! Tunable parameters for every subsystem, loadable from TOML by adapters.
//!
//! All durations are stored as whole milliseconds so configuration files stay
//! readable; accessor methods convert them into [`Duration`] values.

use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Aggregated configuration for a survival session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurvivalConfig {
    /// Navigation grid construction parameters.
    pub navigation: NavigationConfig,
    /// Zombie movement and combat parameters.
    pub zombie: ZombieConfig,
    /// Player weapon parameters.
    pub shooting: ShootingConfig,
    /// Player vitals parameters.
    pub player: PlayerConfig,
    /// Wave sizing and spawning parameters.
    pub waves: WaveConfig,
}

impl SurvivalConfig {
    /// Rejects values that would stall or destabilise the simulation.
    ///
    /// Navigation extents are validated separately when the mesh is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("zombie.speed", self.zombie.speed)?;
        positive("zombie.stopping_distance", self.zombie.stopping_distance)?;
        positive("zombie.turn_rate", self.zombie.turn_rate)?;
        non_zero("zombie.attack_interval_ms", self.zombie.attack_interval_ms)?;
        non_zero("zombie.health", u64::from(self.zombie.health))?;
        non_zero("shooting.cooldown_ms", self.shooting.cooldown_ms)?;
        positive("shooting.max_range", self.shooting.max_range)?;
        positive("shooting.projectile_speed", self.shooting.projectile_speed)?;
        positive("player.max_health", self.player.max_health)?;
        positive("player.max_stamina", self.player.max_stamina)?;
        non_zero("waves.spawn_stagger_ms", self.waves.spawn_stagger_ms)?;
        if self.waves.spawn_radius_min > self.waves.spawn_radius_max {
            return Err(ConfigError::InvertedSpawnRing {
                min: self.waves.spawn_radius_min,
                max: self.waves.spawn_radius_max,
            });
        }
        Ok(())
    }
}

/// Errors reported by [`SurvivalConfig::validate`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A parameter that must be strictly positive was zero, negative or not finite.
    #[error("`{field}` must be positive, got {value}")]
    NotPositive {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Value found in the configuration.
        value: f64,
    },
    /// The spawn ring's inner radius exceeds its outer radius.
    #[error("spawn ring is inverted: min radius {min} exceeds max radius {max}")]
    InvertedSpawnRing {
        /// Configured inner radius.
        min: f32,
        /// Configured outer radius.
        max: f32,
    },
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive {
            field,
            value: f64::from(value),
        })
    }
}

fn non_zero(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::NotPositive { field, value: 0.0 })
    } else {
        Ok(())
    }
}

/// Parameters controlling how the walkability grid is derived from the world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Side length of the square navigable extent, centred on the origin.
    pub world_size: f32,
    /// Side length of a single grid cell.
    pub cell_size: f32,
    /// Largest height change an agent can climb within half a cell.
    pub height_tolerance: f32,
    /// Horizontal radius of the agent's collision box.
    pub agent_radius: f32,
    /// Height of the agent's collision box.
    pub agent_height: f32,
    /// Extra clearance kept between agents and obstacle centres.
    pub obstacle_buffer: f32,
}

impl NavigationConfig {
    /// Half extents of the agent collision box.
    #[must_use]
    pub fn agent_half_extents(&self) -> Vec3 {
        Vec3::new(self.agent_radius, self.agent_height * 0.5, self.agent_radius)
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            world_size: 1_000.0,
            cell_size: 5.0,
            height_tolerance: 2.0,
            agent_radius: 5.0,
            agent_height: 30.0,
            obstacle_buffer: 2.0,
        }
    }
}

/// Parameters for zombie movement, avoidance and melee.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZombieConfig {
    /// Walking speed in world units per second.
    pub speed: f32,
    /// Starting health of a freshly spawned zombie.
    pub health: u32,
    /// Distance from the player at which a zombie stops and attacks.
    pub stopping_distance: f32,
    /// Heading interpolation rate per second; the per-tick factor is capped at one.
    pub turn_rate: f32,
    /// Grace margin added around the agent box when predicting collisions.
    pub collision_margin: f32,
    /// Deflection tried on either side of a blocked heading, in degrees.
    pub avoidance_angle_degrees: f32,
    /// Distance a fully blocked zombie is nudged away from the nearest obstacle.
    pub push_back_distance: f32,
    /// Damage dealt to the player on each melee strike.
    pub attack_damage: f32,
    /// Interval between melee strikes while attacking.
    pub attack_interval_ms: u64,
    /// Length of the death animation before the corpse is released.
    pub death_animation_ms: u64,
    /// Distance at which a path waypoint counts as reached.
    pub waypoint_radius: f32,
    /// Minimum time between path requests for the same zombie.
    pub path_recompute_ms: u64,
}

impl ZombieConfig {
    /// Interval between melee strikes while attacking.
    #[must_use]
    pub const fn attack_interval(&self) -> Duration {
        Duration::from_millis(self.attack_interval_ms)
    }

    /// Length of the death animation.
    #[must_use]
    pub const fn death_animation(&self) -> Duration {
        Duration::from_millis(self.death_animation_ms)
    }

    /// Minimum time between path requests for the same zombie.
    #[must_use]
    pub const fn path_recompute(&self) -> Duration {
        Duration::from_millis(self.path_recompute_ms)
    }
}

impl Default for ZombieConfig {
    fn default() -> Self {
        Self {
            speed: 60.0,
            health: 100,
            stopping_distance: 70.0,
            turn_rate: 8.0,
            collision_margin: 0.5,
            avoidance_angle_degrees: 45.0,
            push_back_distance: 0.1,
            attack_damage: 10.0,
            attack_interval_ms: 1_000,
            death_animation_ms: 2_000,
            waypoint_radius: 5.0,
            path_recompute_ms: 1_000,
        }
    }
}

/// Parameters for the player's hit-scan weapon.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShootingConfig {
    /// Minimum time between accepted shots.
    pub cooldown_ms: u64,
    /// Damage applied to the zombie owning the part that was hit.
    pub damage: u32,
    /// Travel distance of a cosmetic projectile that hit nothing.
    pub max_range: f32,
    /// Cosmetic projectile speed in world units per second.
    pub projectile_speed: f32,
    /// Duration of the red hit flash on the struck part.
    pub hit_flash_ms: u64,
    /// Muzzle position in camera space (x right, y up, -z forward).
    pub gun_offset: Vec3,
}

impl ShootingConfig {
    /// Minimum time between accepted shots.
    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    /// Duration of the hit flash.
    #[must_use]
    pub const fn hit_flash(&self) -> Duration {
        Duration::from_millis(self.hit_flash_ms)
    }
}

impl Default for ShootingConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 250,
            damage: 10,
            max_range: 100.0,
            projectile_speed: 7_200.0,
            hit_flash_ms: 100,
            gun_offset: Vec3::new(3.0, -3.2, -10.0),
        }
    }
}

/// Player vitals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Health ceiling and starting health.
    pub max_health: f32,
    /// Stamina ceiling and starting stamina.
    pub max_stamina: f32,
    /// Stamina spent per second while sprinting.
    pub sprint_drain_per_second: f32,
    /// Stamina recovered per second while not sprinting.
    pub stamina_regen_per_second: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            max_stamina: 100.0,
            sprint_drain_per_second: 30.0,
            stamina_regen_per_second: 20.0,
        }
    }
}

/// Wave sizing and spawn scheduling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Zombies in the first wave.
    pub base_count: u32,
    /// Additional zombies per subsequent wave.
    pub increment: u32,
    /// Delay between consecutive spawns of the same wave.
    pub spawn_stagger_ms: u64,
    /// Inner radius of the spawn ring around the player.
    pub spawn_radius_min: f32,
    /// Outer radius of the spawn ring around the player.
    pub spawn_radius_max: f32,
    /// Samples drawn while looking for a walkable spawn point.
    pub spawn_attempts: u32,
    /// Starts the next wave automatically after a completed one.
    pub auto_advance: bool,
    /// Pause between a completed wave and the automatic start of the next.
    pub intermission_ms: u64,
    /// Seed for spawn position sampling.
    pub spawn_seed: u64,
}

impl WaveConfig {
    /// Number of zombies in the provided one-based wave.
    #[must_use]
    pub fn zombies_in_wave(&self, wave: u32) -> u32 {
        self.base_count
            .saturating_add(wave.saturating_sub(1).saturating_mul(self.increment))
    }

    /// Delay between consecutive spawns.
    #[must_use]
    pub const fn spawn_stagger(&self) -> Duration {
        Duration::from_millis(self.spawn_stagger_ms)
    }

    /// Pause before an automatic wave start.
    #[must_use]
    pub const fn intermission(&self) -> Duration {
        Duration::from_millis(self.intermission_ms)
    }
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            base_count: 10,
            increment: 5,
            spawn_stagger_ms: 100,
            spawn_radius_min: 300.0,
            spawn_radius_max: 450.0,
            spawn_attempts: 16,
            auto_advance: true,
            intermission_ms: 5_000,
            spawn_seed: 0x5eed_2b0d_1e5a_11ce,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SurvivalConfig::default().validate(), Ok(()));
    }

    #[test]
    fn wave_sizes_grow_linearly() {
        let waves = WaveConfig::default();
        assert_eq!(waves.zombies_in_wave(1), 10);
        assert_eq!(waves.zombies_in_wave(2), 15);
        assert_eq!(waves.zombies_in_wave(5), 30);
    }

    #[test]
    fn zero_cooldown_is_rejected() {
        let mut config = SurvivalConfig::default();
        config.shooting.cooldown_ms = 0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "shooting.cooldown_ms",
                ..
            })
        ));
    }

    #[test]
    fn inverted_spawn_ring_is_rejected() {
        let mut config = SurvivalConfig::default();
        config.waves.spawn_radius_min = 500.0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedSpawnRing { .. })
        ));
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config: SurvivalConfig = toml::from_str(
            r#"
            [waves]
            base_count = 4
            increment = 2

            [shooting]
            gun_offset = [0.0, 0.0, -1.0]
            "#,
        )
        .expect("config parses");

        assert_eq!(config.waves.base_count, 4);
        assert_eq!(config.waves.spawn_stagger_ms, 100);
        assert_eq!(config.shooting.gun_offset, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(config.zombie, ZombieConfig::default());
    }
}
