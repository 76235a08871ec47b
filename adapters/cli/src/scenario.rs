//! Procedural arena and scripted player used by headless sessions.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use zombie_survival_core::{
    geometry::horizontal_distance, Aabb, Camera, Obstacle, Terrain, ZombieView,
};

/// Height of the player's eyes above the ground.
pub(crate) const EYE_HEIGHT: f32 = 20.0;

/// Height above a zombie's feet that the marksman aims at.
const TORSO_HEIGHT: f32 = 19.0;

/// Radius around the arena centre kept free of obstacles.
const CLEARING_RADIUS: f32 = 120.0;

/// Gently rolling ground, flat enough to stay walkable everywhere.
pub(crate) fn rolling_hills(x: f32, z: f32) -> f32 {
    6.0 * (x / 120.0).sin() * (z / 150.0).cos() + 2.0 * ((x + z) / 90.0).sin()
}

/// Scatters crate-like boxes over the arena, leaving the centre clear.
pub(crate) fn scatter_obstacles(
    seed: u64,
    count: usize,
    world_size: f32,
    terrain: &dyn Terrain,
) -> Vec<Obstacle> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let reach = (world_size * 0.5 - 40.0).max(CLEARING_RADIUS + 40.0);
    let mut obstacles = Vec::with_capacity(count);
    while obstacles.len() < count {
        let x = rng.gen_range(-reach..reach);
        let z = rng.gen_range(-reach..reach);
        if x.hypot(z) < CLEARING_RADIUS {
            continue;
        }
        let half_extents = Vec3::new(
            rng.gen_range(5.0..20.0),
            rng.gen_range(10.0..20.0),
            rng.gen_range(5.0..20.0),
        );
        let ground = terrain.height_at(x, z);
        obstacles.push(Obstacle::new(Aabb::from_center_half_extents(
            Vec3::new(x, ground + half_extents.y, z),
            half_extents,
        )));
    }
    obstacles
}

/// Stationary player that turns toward the closest zombie in range and fires.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Marksman {
    position: Vec3,
    range: f32,
}

impl Marksman {
    /// Places the marksman at the arena centre.
    pub(crate) fn new(terrain: &dyn Terrain, range: f32) -> Self {
        Self {
            position: Vec3::new(0.0, terrain.height_at(0.0, 0.0) + EYE_HEIGHT, 0.0),
            range,
        }
    }

    /// Camera looking across the arena before any zombie shows up.
    pub(crate) fn idle_camera(&self) -> Camera {
        Camera::new(self.position, Vec3::NEG_Z)
    }

    /// Camera aimed at the torso of the nearest living zombie within range.
    pub(crate) fn aim(&self, zombies: &ZombieView) -> Option<Camera> {
        zombies
            .iter()
            .filter(|zombie| zombie.model_attached && zombie.state.is_alive())
            .map(|zombie| (horizontal_distance(zombie.position, self.position), zombie))
            .filter(|(distance, _)| *distance <= self.range)
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, zombie)| {
                let torso = zombie.position + Vec3::Y * TORSO_HEIGHT;
                Camera::new(self.position, torso - self.position)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zombie_survival_core::{AnimationState, ZombieId, ZombieSnapshot, ZombieState};

    fn zombie(id: u32, position: Vec3, state: ZombieState) -> ZombieSnapshot {
        ZombieSnapshot {
            id: ZombieId::new(id),
            position,
            heading: 0.0,
            health: 100,
            state,
            animation: AnimationState::Walking,
            model_attached: true,
            path: None,
            path_index: 0,
            bounds: Aabb::from_center_half_extents(position, Vec3::splat(5.0)),
        }
    }

    #[test]
    fn obstacles_avoid_the_clearing_and_rest_on_the_ground() {
        let obstacles = scatter_obstacles(7, 30, 1_000.0, &rolling_hills);

        assert_eq!(obstacles.len(), 30);
        for obstacle in &obstacles {
            let center = obstacle.center();
            assert!(center.x.hypot(center.z) >= CLEARING_RADIUS);
            let ground = rolling_hills(center.x, center.z);
            assert!((obstacle.bounds().min().y - ground).abs() < 1e-3);
        }
    }

    #[test]
    fn same_seed_scatters_the_same_arena() {
        let first = scatter_obstacles(11, 12, 1_000.0, &rolling_hills);
        let second = scatter_obstacles(11, 12, 1_000.0, &rolling_hills);

        assert_eq!(first, second);
    }

    #[test]
    fn marksman_aims_at_the_nearest_living_zombie_in_range() {
        let flat = |_: f32, _: f32| 0.0;
        let marksman = Marksman::new(&flat, 100.0);
        let view = ZombieView::from_snapshots(vec![
            zombie(1, Vec3::new(0.0, 0.0, -90.0), ZombieState::Seeking),
            zombie(2, Vec3::new(50.0, 0.0, 0.0), ZombieState::Dying),
            zombie(3, Vec3::new(0.0, 0.0, 150.0), ZombieState::Attacking),
        ]);

        let camera = marksman.aim(&view).expect("zombie 1 is in range");

        assert_eq!(camera.position, Vec3::new(0.0, EYE_HEIGHT, 0.0));
        assert!(camera.forward.z < 0.0);
        assert!(camera.forward.x.abs() < 1e-6);
    }

    #[test]
    fn marksman_holds_fire_without_targets() {
        let flat = |_: f32, _: f32| 0.0;
        let marksman = Marksman::new(&flat, 100.0);
        let view = ZombieView::from_snapshots(vec![zombie(
            1,
            Vec3::new(0.0, 0.0, 300.0),
            ZombieState::Seeking,
        )]);

        assert!(marksman.aim(&view).is_none());
    }
}
