#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Path finding system that answers zombie path requests with A* routes.
//!
//! The world raises [`Event::ZombiePathNeeded`] for seeking zombies; this
//! system searches the navigation mesh from the zombie toward the player and
//! replies with [`Command::AssignPath`]. Searches that fail reply with `None`
//! so the zombie falls back to steering straight at the player.

pub mod finder;

use glam::Vec3;
use tracing::debug;
use zombie_survival_core::{Command, Event};
use zombie_survival_world::navigation::NavigationMesh;

pub use finder::{NoPath, PathFinder};

/// Pure system that converts path requests into path assignments.
#[derive(Debug, Default)]
pub struct Pathfinding {
    finder: PathFinder,
}

impl Pathfinding {
    /// Consumes world events and answers every path request toward `player`.
    pub fn handle(
        &mut self,
        events: &[Event],
        navigation: &NavigationMesh,
        player: Vec3,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            let Event::ZombiePathNeeded { zombie, from } = event else {
                continue;
            };
            let path = match self.finder.find_path(navigation, *from, player) {
                Ok(path) => Some(path),
                Err(reason) => {
                    debug!(zombie = zombie.get(), %reason, "path request failed");
                    None
                }
            };
            out.push(Command::AssignPath {
                zombie: *zombie,
                path,
            });
        }
    }
}
