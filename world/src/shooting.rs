//! Hit-scan weapon: target registry, cooldown, ray resolution and cosmetic projectiles.

use std::{collections::HashMap, time::Duration};

use glam::Vec3;
use zombie_survival_core::{
    Aabb, Camera, ProjectileId, ProjectileSnapshot, Ray, ShootingConfig, TargetId, Tint, ZombieId,
};

/// Hittable box registered for a zombie part.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegisteredTarget {
    /// Identifier allocated by the registry.
    pub id: TargetId,
    /// Zombie owning the part.
    pub owner: ZombieId,
    /// World-space bounds of the part.
    pub bounds: Aabb,
}

/// Intersection of the aim ray with a registered target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Target that was struck.
    pub target: TargetId,
    /// Zombie owning the target.
    pub zombie: ZombieId,
    /// Distance from the ray origin to the entry point.
    pub distance: f32,
    /// World-space entry point.
    pub point: Vec3,
}

/// Registry of hittable parts with an owner map back to their zombies.
///
/// Registration and removal are O(1): targets live in a dense vector that is
/// compacted with `swap_remove`, and an index map tracks each target's slot.
#[derive(Clone, Debug, Default)]
pub struct TargetRegistry {
    targets: Vec<RegisteredTarget>,
    slots: HashMap<TargetId, usize>,
    next_id: u32,
}

impl TargetRegistry {
    /// Registers a part owned by `owner` and returns its identifier.
    pub fn register(&mut self, owner: ZombieId, bounds: Aabb) -> TargetId {
        let id = TargetId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let _ = self.slots.insert(id, self.targets.len());
        self.targets.push(RegisteredTarget { id, owner, bounds });
        id
    }

    /// Removes a target. Unknown identifiers are ignored.
    pub fn unregister(&mut self, id: TargetId) -> bool {
        let Some(slot) = self.slots.remove(&id) else {
            return false;
        };
        let _ = self.targets.swap_remove(slot);
        if let Some(moved) = self.targets.get(slot) {
            let _ = self.slots.insert(moved.id, slot);
        }
        true
    }

    /// Moves a target to new bounds.
    pub fn update_bounds(&mut self, id: TargetId, bounds: Aabb) {
        if let Some(&slot) = self.slots.get(&id) {
            if let Some(target) = self.targets.get_mut(slot) {
                target.bounds = bounds;
            }
        }
    }

    /// Zombie owning the target, if it is still registered.
    #[must_use]
    pub fn owner_of(&self, id: TargetId) -> Option<ZombieId> {
        self.get(id).map(|target| target.owner)
    }

    /// Registration details for the target.
    #[must_use]
    pub fn get(&self, id: TargetId) -> Option<&RegisteredTarget> {
        self.slots
            .get(&id)
            .and_then(|&slot| self.targets.get(slot))
    }

    /// Every target the ray enters, nearest first.
    #[must_use]
    pub fn cast(&self, ray: &Ray) -> Vec<RayHit> {
        let mut hits: Vec<RayHit> = self
            .targets
            .iter()
            .filter_map(|target| {
                target.bounds.ray_distance(ray).map(|distance| RayHit {
                    target: target.id,
                    zombie: target.owner,
                    distance,
                    point: ray.point_at(distance),
                })
            })
            .collect();
        hits.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.target.cmp(&b.target))
        });
        hits
    }

    /// Registered targets in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredTarget> {
        self.targets.iter()
    }

    /// Number of registered targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether no targets are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Removes every target.
    pub fn clear(&mut self) {
        self.targets.clear();
        self.slots.clear();
    }
}

/// Result of pulling the trigger.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FireOutcome {
    /// The weapon has not cooled down; the shot was dropped.
    CoolingDown,
    /// The camera has no usable aim direction; the shot was dropped.
    NoAim,
    /// Nothing was struck; a projectile flies to maximum range.
    Missed {
        /// Projectile representing the shot.
        projectile: ProjectileId,
        /// Gun position.
        origin: Vec3,
        /// End of the projectile's flight.
        destination: Vec3,
    },
    /// The nearest target was struck.
    Hit {
        /// Resolved hit.
        hit: RayHit,
        /// Projectile representing the shot.
        projectile: ProjectileId,
        /// Gun position.
        origin: Vec3,
    },
}

#[derive(Clone, Copy, Debug)]
struct Projectile {
    id: ProjectileId,
    start: Vec3,
    destination: Vec3,
    direction: Vec3,
    total_distance: f32,
    traveled: f32,
}

impl Projectile {
    fn position(&self) -> Vec3 {
        self.start + self.direction * self.traveled.min(self.total_distance)
    }
}

/// Weapon state: cooldown clock, in-flight projectiles and active hit flashes.
#[derive(Clone, Debug, Default)]
pub struct ShootingPipeline {
    last_shot: Option<Duration>,
    projectiles: Vec<Projectile>,
    next_projectile: u32,
    flashes: HashMap<TargetId, u64>,
    flash_epoch: u64,
}

impl ShootingPipeline {
    /// Resolves a trigger pull at simulated time `now`.
    pub fn fire(
        &mut self,
        now: Duration,
        camera: &Camera,
        registry: &TargetRegistry,
        config: &ShootingConfig,
    ) -> FireOutcome {
        if let Some(last) = self.last_shot {
            if now.saturating_sub(last) < config.cooldown() {
                return FireOutcome::CoolingDown;
            }
        }
        let Some(ray) = camera.aim_ray() else {
            return FireOutcome::NoAim;
        };
        self.last_shot = Some(now);

        let origin = camera.to_world(config.gun_offset);
        match registry.cast(&ray).first().copied() {
            Some(hit) => {
                let projectile = self.launch(origin, hit.point);
                FireOutcome::Hit {
                    hit,
                    projectile,
                    origin,
                }
            }
            None => {
                let destination = origin + ray.direction() * config.max_range;
                let projectile = self.launch(origin, destination);
                FireOutcome::Missed {
                    projectile,
                    origin,
                    destination,
                }
            }
        }
    }

    fn launch(&mut self, start: Vec3, destination: Vec3) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile);
        self.next_projectile = self.next_projectile.wrapping_add(1);
        let offset = destination - start;
        self.projectiles.push(Projectile {
            id,
            start,
            destination,
            direction: offset.normalize_or_zero(),
            total_distance: offset.length(),
            traveled: 0.0,
        });
        id
    }

    /// Moves every projectile and returns the ones that landed this step.
    pub fn advance_projectiles(
        &mut self,
        dt_seconds: f32,
        speed: f32,
    ) -> Vec<(ProjectileId, Vec3)> {
        let step = speed * dt_seconds;
        let mut landed = Vec::new();
        self.projectiles.retain_mut(|projectile| {
            projectile.traveled += step;
            if projectile.traveled >= projectile.total_distance {
                landed.push((projectile.id, projectile.destination));
                false
            } else {
                true
            }
        });
        landed
    }

    /// Starts a hit flash on the target and returns the epoch that may revert it.
    pub fn flash(&mut self, target: TargetId) -> u64 {
        self.flash_epoch = self.flash_epoch.wrapping_add(1);
        let _ = self.flashes.insert(target, self.flash_epoch);
        self.flash_epoch
    }

    /// Ends a flash if no newer flash replaced it. Returns whether the tint changed.
    pub fn revert_flash(&mut self, target: TargetId, epoch: u64) -> bool {
        if self.flashes.get(&target) == Some(&epoch) {
            let _ = self.flashes.remove(&target);
            true
        } else {
            false
        }
    }

    /// Drops any flash on a target that left the registry.
    pub fn forget_target(&mut self, target: TargetId) {
        let _ = self.flashes.remove(&target);
    }

    /// Material overlay currently applied to the target.
    #[must_use]
    pub fn tint(&self, target: TargetId) -> Tint {
        if self.flashes.contains_key(&target) {
            Tint::HitFlash
        } else {
            Tint::Base
        }
    }

    /// Snapshots of in-flight projectiles in launch order.
    #[must_use]
    pub fn projectiles(&self) -> Vec<ProjectileSnapshot> {
        self.projectiles
            .iter()
            .map(|projectile| ProjectileSnapshot {
                id: projectile.id,
                position: projectile.position(),
                destination: projectile.destination,
                traveled: projectile.traveled,
                total_distance: projectile.total_distance,
            })
            .collect()
    }

    /// Clears projectiles, flashes and the cooldown.
    pub fn reset(&mut self) {
        self.last_shot = None;
        self.projectiles.clear();
        self.flashes.clear();
    }
}
