//! Geometric primitives shared by navigation, steering and hit detection.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    min: Vec3,
    max: Vec3,
}

impl Aabb {
    /// Creates a box from two opposite corners in any order.
    #[must_use]
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates a box centred on `center` that extends `half_extents` along each axis.
    #[must_use]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half_extents = half_extents.abs();
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Lower corner of the box.
    #[must_use]
    pub const fn min(&self) -> Vec3 {
        self.min
    }

    /// Upper corner of the box.
    #[must_use]
    pub const fn max(&self) -> Vec3 {
        self.max
    }

    /// Geometric centre of the box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half of the box size along each axis.
    #[must_use]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Reports whether two boxes overlap. Touching faces count as overlap.
    #[must_use]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Reports whether the point lies inside or on the surface of the box.
    #[must_use]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Returns a copy grown by `margin` on every side.
    #[must_use]
    pub fn expanded(&self, margin: f32) -> Self {
        let margin = Vec3::splat(margin);
        Self::from_corners(self.min - margin, self.max + margin)
    }

    /// Returns a copy moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Distance along `ray` to the first point of the box, if the ray enters it.
    ///
    /// Uses the slab method. A ray starting inside the box reports zero.
    #[must_use]
    pub fn ray_distance(&self, ray: &Ray) -> Option<f32> {
        let mut entry = 0.0_f32;
        let mut exit = f32::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            let low = self.min[axis];
            let high = self.max[axis];

            if direction.abs() < f32::EPSILON {
                if origin < low || origin > high {
                    return None;
                }
                continue;
            }

            let inverse = 1.0 / direction;
            let mut near = (low - origin) * inverse;
            let mut far = (high - origin) * inverse;
            if near > far {
                std::mem::swap(&mut near, &mut far);
            }

            entry = entry.max(near);
            exit = exit.min(far);
            if entry > exit {
                return None;
            }
        }

        Some(entry)
    }
}

/// Half-line with a normalised direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    /// Creates a ray, normalising the direction.
    ///
    /// Returns `None` when the direction has no length or is not finite.
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || !origin.is_finite() {
            return None;
        }
        Some(Self { origin, direction })
    }

    /// Starting point of the ray.
    #[must_use]
    pub const fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Unit direction of travel.
    #[must_use]
    pub const fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Point reached after travelling `distance` units along the ray.
    #[must_use]
    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Static collidable geometry supplied by the host world.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    bounds: Aabb,
}

impl Obstacle {
    /// Wraps a bounding volume as an obstacle.
    #[must_use]
    pub const fn new(bounds: Aabb) -> Self {
        Self { bounds }
    }

    /// Bounding volume of the obstacle.
    #[must_use]
    pub const fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Centre of the obstacle's bounding volume.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        self.bounds.center()
    }

    /// Half extents of the obstacle's bounding volume.
    #[must_use]
    pub fn half_extents(&self) -> Vec3 {
        self.bounds.half_extents()
    }
}

/// First-person camera used as the player's eye and aim.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// World-space eye position. The player stands here.
    pub position: Vec3,
    /// Direction the reticle points at. Need not be normalised.
    pub forward: Vec3,
}

impl Camera {
    /// Creates a camera at `position` looking along `forward`.
    #[must_use]
    pub const fn new(position: Vec3, forward: Vec3) -> Self {
        Self { position, forward }
    }

    /// Ray cast from the eye through the screen centre.
    #[must_use]
    pub fn aim_ray(&self) -> Option<Ray> {
        Ray::new(self.position, self.forward)
    }

    /// Converts a camera-space offset (x right, y up, -z forward) into world space.
    #[must_use]
    pub fn to_world(&self, offset: Vec3) -> Vec3 {
        let forward = self.forward.normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = if right == Vec3::ZERO {
            Vec3::Y
        } else {
            right.cross(forward)
        };
        self.position + right * offset.x + up * offset.y - forward * offset.z
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::NEG_Z)
    }
}

/// Height field queried for grounding agents and grading walkability.
pub trait Terrain {
    /// Terrain elevation at the provided horizontal coordinates.
    fn height_at(&self, x: f32, z: f32) -> f32;
}

impl<F> Terrain for F
where
    F: Fn(f32, f32) -> f32,
{
    fn height_at(&self, x: f32, z: f32) -> f32 {
        self(x, z)
    }
}

/// Projects a vector onto the horizontal plane.
#[must_use]
pub fn horizontal(vector: Vec3) -> Vec3 {
    Vec3::new(vector.x, 0.0, vector.z)
}

/// Horizontal distance between two points, ignoring elevation.
#[must_use]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    horizontal(b - a).length()
}

/// Yaw angle that faces along `direction`, measured from +Z toward +X.
#[must_use]
pub fn heading_of(direction: Vec3) -> f32 {
    direction.x.atan2(direction.z)
}

/// Rotates a vector around the vertical axis by `angle` radians.
#[must_use]
pub fn rotate_about_y(vector: Vec3, angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(
        vector.x * cos + vector.z * sin,
        vector.y,
        -vector.x * sin + vector.z * cos,
    )
}

/// Normalises an angle into the half-open range (-π, π].
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Interpolates from `from` toward `to` along the shorter arc.
///
/// `t` is clamped into `0.0..=1.0`; the result is wrapped into (-π, π].
#[must_use]
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    let delta = wrap_angle(to - from);
    wrap_angle(from + delta * t.clamp(0.0, 1.0))
}
