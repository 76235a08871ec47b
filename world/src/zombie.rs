use std::time::Duration;

use glam::Vec3;
use zombie_survival_core::{
    Aabb, AnimationIntent, AnimationState, Event, NavigationConfig, Path, TargetId, ZombieId,
    ZombieModel, ZombieSnapshot, ZombieState,
};

use crate::animation;

/// Authoritative record of a single zombie.
#[derive(Clone, Debug)]
pub(crate) struct Zombie {
    pub(crate) id: ZombieId,
    pub(crate) position: Vec3,
    pub(crate) heading: f32,
    pub(crate) health: u32,
    pub(crate) state: ZombieState,
    pub(crate) animation: AnimationState,
    pub(crate) model: Option<ZombieModel>,
    pub(crate) targets: Vec<TargetId>,
    pub(crate) path: Option<Path>,
    pub(crate) path_index: usize,
    pub(crate) path_requested_at: Option<Duration>,
    pub(crate) path_pending: bool,
    pub(crate) epoch: u64,
}

impl Zombie {
    pub(crate) fn new(id: ZombieId, position: Vec3, health: u32) -> Self {
        Self {
            id,
            position,
            heading: 0.0,
            health,
            state: ZombieState::Seeking,
            animation: AnimationState::Idle,
            model: None,
            targets: Vec::new(),
            path: None,
            path_index: 0,
            path_requested_at: None,
            path_pending: false,
            epoch: 0,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.state.is_alive()
    }

    pub(crate) fn model_attached(&self) -> bool {
        self.model.is_some()
    }

    pub(crate) fn has_death_animation(&self) -> bool {
        self.model
            .as_ref()
            .is_some_and(|model| model.has_death_animation)
    }

    /// Agent collision box standing on the zombie's feet.
    pub(crate) fn bounds(&self, navigation: &NavigationConfig) -> Aabb {
        agent_bounds(self.position, navigation)
    }

    /// Whether a fresh path should be requested at `now`.
    pub(crate) fn wants_path(&self, now: Duration, recompute: Duration) -> bool {
        self.is_alive()
            && self.state == ZombieState::Seeking
            && self.model_attached()
            && !self.path_pending
            && self
                .path_requested_at
                .map_or(true, |requested| now.saturating_sub(requested) >= recompute)
    }

    pub(crate) fn clear_path(&mut self) {
        self.path = None;
        self.path_index = 0;
    }

    /// Feeds an intent through the animation reducer, reporting real changes.
    pub(crate) fn animate(&mut self, intent: AnimationIntent, out_events: &mut Vec<Event>) {
        if let Some(next) = animation::reduce(self.animation, intent) {
            self.animation = next;
            out_events.push(Event::AnimationChanged {
                zombie: self.id,
                animation: next,
            });
        }
    }

    pub(crate) fn snapshot(&self, navigation: &NavigationConfig) -> ZombieSnapshot {
        ZombieSnapshot {
            id: self.id,
            position: self.position,
            heading: self.heading,
            health: self.health,
            state: self.state,
            animation: self.animation,
            model_attached: self.model_attached(),
            path: self.path.clone(),
            path_index: self.path_index,
            bounds: self.bounds(navigation),
        }
    }
}

fn agent_bounds(position: Vec3, navigation: &NavigationConfig) -> Aabb {
    let radius = navigation.agent_radius;
    Aabb::from_corners(
        position - Vec3::new(radius, 0.0, radius),
        position + Vec3::new(radius, navigation.agent_height, radius),
    )
}
