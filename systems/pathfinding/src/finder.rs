//! A* search over the navigation mesh with line-of-sight smoothing.

use std::{cmp::Ordering, collections::BinaryHeap};

use glam::{Vec2, Vec3};
use thiserror::Error;
use zombie_survival_core::Path;
use zombie_survival_world::navigation::{NavCell, NavigationMesh};

/// Reasons no path could be produced.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum NoPath {
    /// The start or goal lies outside the navigation grid.
    #[error("start or goal lies outside the navigation grid")]
    OutsideGrid,
    /// The start cell is not walkable.
    #[error("start cell is not walkable")]
    StartBlocked,
    /// The goal cell is not walkable.
    #[error("goal cell is not walkable")]
    GoalBlocked,
    /// Every reachable cell was explored without finding the goal.
    #[error("goal is unreachable from the start")]
    Exhausted,
}

#[derive(Clone, Copy, Debug, Default)]
struct SearchNode {
    g: f32,
    h: f32,
    f: f32,
    parent: Option<usize>,
    stamp: u32,
    closed: bool,
}

impl SearchNode {
    fn set_costs(&mut self, g: f32, h: f32) {
        self.g = g;
        self.h = h;
        self.f = g + h;
    }
}

#[derive(Clone, Copy, Debug)]
struct OpenEntry {
    f: f32,
    sequence: u64,
    index: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Reusable A* workspace.
///
/// Scratch buffers are sized to the mesh on first use and invalidated with a
/// per-search stamp instead of being cleared.
#[derive(Debug, Default)]
pub struct PathFinder {
    nodes: Vec<SearchNode>,
    open: BinaryHeap<OpenEntry>,
    stamp: u32,
    sequence: u64,
}

impl PathFinder {
    /// Finds a smoothed path between the cells containing `start` and `goal`.
    pub fn find_path(
        &mut self,
        mesh: &NavigationMesh,
        start: Vec3,
        goal: Vec3,
    ) -> Result<Path, NoPath> {
        let start_index = mesh.index_at(start).ok_or(NoPath::OutsideGrid)?;
        let goal_index = mesh.index_at(goal).ok_or(NoPath::OutsideGrid)?;
        let start_position = mesh.node_position(start_index).ok_or(NoPath::OutsideGrid)?;
        let goal_position = mesh.node_position(goal_index).ok_or(NoPath::OutsideGrid)?;

        if !mesh.node(start_index).is_some_and(|node| node.walkable()) {
            return Err(NoPath::StartBlocked);
        }
        if !mesh.node(goal_index).is_some_and(|node| node.walkable()) {
            return Err(NoPath::GoalBlocked);
        }
        if start_index == goal_index {
            return Ok(Path::new(vec![goal_position]));
        }

        self.prepare(mesh.node_count());
        let stamp = self.stamp;
        {
            let node = &mut self.nodes[start_index];
            node.stamp = stamp;
            node.parent = None;
            node.closed = false;
            node.set_costs(0.0, manhattan(start_position, goal_position));
        }
        self.push(start_index);

        while let Some(entry) = self.open.pop() {
            let current = self.nodes[entry.index];
            if current.closed || entry.f > current.f {
                continue;
            }
            if entry.index == goal_index {
                let raw = self.reconstruct(mesh, goal_index);
                return Ok(Path::new(smooth(mesh, &raw)));
            }
            self.nodes[entry.index].closed = true;

            for (neighbor, cost) in mesh.neighbors(entry.index) {
                let tentative = current.g + cost;
                let node = &mut self.nodes[neighbor];
                let fresh = node.stamp != stamp;
                if !fresh && (node.closed || tentative >= node.g) {
                    continue;
                }
                if fresh {
                    node.stamp = stamp;
                    node.closed = false;
                }
                let position = mesh.node_position(neighbor).unwrap_or(goal_position);
                node.parent = Some(entry.index);
                node.set_costs(tentative, manhattan(position, goal_position));
                self.push(neighbor);
            }
        }

        Err(NoPath::Exhausted)
    }

    fn prepare(&mut self, node_count: usize) {
        if self.nodes.len() != node_count {
            self.nodes = vec![SearchNode::default(); node_count];
            self.stamp = 0;
        }
        self.stamp = self.stamp.wrapping_add(1);
        if self.stamp == 0 {
            self.nodes.fill(SearchNode::default());
            self.stamp = 1;
        }
        self.open.clear();
        self.sequence = 0;
    }

    fn push(&mut self, index: usize) {
        let f = self.nodes[index].f;
        self.open.push(OpenEntry {
            f,
            sequence: self.sequence,
            index,
        });
        self.sequence = self.sequence.wrapping_add(1);
    }

    fn reconstruct(&self, mesh: &NavigationMesh, goal: usize) -> Vec<Vec3> {
        let mut waypoints = Vec::new();
        let mut cursor = Some(goal);
        while let Some(index) = cursor {
            if let Some(position) = mesh.node_position(index) {
                waypoints.push(position);
            }
            cursor = self.nodes[index].parent;
        }
        waypoints.reverse();
        waypoints
    }
}

fn manhattan(a: Vec3, b: Vec3) -> f32 {
    (a.x - b.x).abs() + (a.z - b.z).abs()
}

/// Whether every grid cell crossed by the segment between `from` and `to` is walkable.
///
/// Cells are visited in crossing order regardless of segment length. Where the
/// segment passes exactly through a cell corner, both flanking cells must be
/// walkable as well.
#[must_use]
pub fn has_line_of_sight(mesh: &NavigationMesh, from: Vec3, to: Vec3) -> bool {
    let (Some(start), Some(end)) = (mesh.cell_for(from.x, from.z), mesh.cell_for(to.x, to.z))
    else {
        return false;
    };
    let origin = grid_point(mesh, from);
    let delta = grid_point(mesh, to) - origin;

    let mut column = start.column() as isize;
    let mut row = start.row() as isize;
    let end_column = end.column() as isize;
    let end_row = end.row() as isize;
    let step_column = (end_column - column).signum();
    let step_row = (end_row - row).signum();
    let mut next_column = first_crossing(origin.x, column, step_column, delta.x);
    let mut next_row = first_crossing(origin.y, row, step_row, delta.y);
    let column_span = crossing_span(step_column, delta.x);
    let row_span = crossing_span(step_row, delta.y);

    if !walkable_cell(mesh, column, row) {
        return false;
    }
    while column != end_column || row != end_row {
        let (advance_column, advance_row) = if column == end_column {
            (false, true)
        } else if row == end_row {
            (true, false)
        } else if (next_column - next_row).abs() <= f32::EPSILON {
            (true, true)
        } else {
            (next_column < next_row, next_row < next_column)
        };

        if advance_column
            && advance_row
            && !(walkable_cell(mesh, column + step_column, row)
                && walkable_cell(mesh, column, row + step_row))
        {
            return false;
        }
        if advance_column {
            column += step_column;
            next_column += column_span;
        }
        if advance_row {
            row += step_row;
            next_row += row_span;
        }
        if !walkable_cell(mesh, column, row) {
            return false;
        }
    }
    true
}

/// Position in cell units measured from the grid's minimum corner.
fn grid_point(mesh: &NavigationMesh, position: Vec3) -> Vec2 {
    let half = mesh.world_size() * 0.5;
    Vec2::new(position.x + half, position.z + half) / mesh.cell_size()
}

/// Segment parameter at which the first cell boundary along one axis is crossed.
fn first_crossing(origin: f32, index: isize, step: isize, delta: f32) -> f32 {
    match step {
        0 => f32::INFINITY,
        1 => ((index + 1) as f32 - origin) / delta,
        _ => (index as f32 - origin) / delta,
    }
}

fn crossing_span(step: isize, delta: f32) -> f32 {
    if step == 0 {
        f32::INFINITY
    } else {
        1.0 / delta.abs()
    }
}

fn walkable_cell(mesh: &NavigationMesh, column: isize, row: isize) -> bool {
    let (Ok(column), Ok(row)) = (usize::try_from(column), usize::try_from(row)) else {
        return false;
    };
    mesh.index(NavCell::new(column, row))
        .and_then(|index| mesh.node(index))
        .is_some_and(|node| node.walkable())
}

/// Drops intermediate waypoints that can be skipped in a straight line.
///
/// From each kept waypoint the furthest later waypoint with line of sight is
/// kept next. Endpoints always survive.
#[must_use]
pub fn smooth(mesh: &NavigationMesh, waypoints: &[Vec3]) -> Vec<Vec3> {
    if waypoints.len() <= 2 {
        return waypoints.to_vec();
    }

    let mut smoothed = vec![waypoints[0]];
    let mut current = 0;
    while current < waypoints.len() - 1 {
        let mut furthest = current + 1;
        for candidate in current + 2..waypoints.len() {
            if has_line_of_sight(mesh, waypoints[current], waypoints[candidate]) {
                furthest = candidate;
            }
        }
        smoothed.push(waypoints[furthest]);
        current = furthest;
    }
    smoothed
}

#[cfg(test)]
mod tests {
    use super::*;
    use zombie_survival_core::{Aabb, NavigationConfig, Obstacle};

    fn mesh(obstacles: &[Obstacle]) -> NavigationMesh {
        let config = NavigationConfig {
            world_size: 100.0,
            ..NavigationConfig::default()
        };
        NavigationMesh::build(&config, &|_: f32, _: f32| 0.0, obstacles).expect("mesh builds")
    }

    #[test]
    fn open_ground_smooths_to_a_straight_line() {
        let mesh = mesh(&[]);
        let mut finder = PathFinder::default();

        let path = finder
            .find_path(&mesh, Vec3::new(-40.0, 0.0, -40.0), Vec3::new(40.0, 0.0, 30.0))
            .expect("path exists");

        assert_eq!(path.len(), 2);
        assert_eq!(path.get(0), Some(Vec3::new(-37.5, 0.0, -37.5)));
        assert_eq!(path.last(), Some(Vec3::new(42.5, 0.0, 32.5)));
    }

    #[test]
    fn same_cell_yields_single_waypoint() {
        let mesh = mesh(&[]);
        let mut finder = PathFinder::default();

        let path = finder
            .find_path(&mesh, Vec3::new(1.0, 0.0, 1.0), Vec3::new(4.0, 0.0, 4.0))
            .expect("path exists");

        assert_eq!(path.waypoints(), &[Vec3::new(2.5, 0.0, 2.5)]);
    }

    #[test]
    fn blocked_and_outside_endpoints_are_reported() {
        let wall = Obstacle::new(Aabb::from_center_half_extents(
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::new(5.0, 10.0, 5.0),
        ));
        let mesh = mesh(&[wall]);
        let mut finder = PathFinder::default();

        assert_eq!(
            finder.find_path(&mesh, Vec3::ZERO, Vec3::new(40.0, 0.0, 0.0)),
            Err(NoPath::StartBlocked)
        );
        assert_eq!(
            finder.find_path(&mesh, Vec3::new(40.0, 0.0, 0.0), Vec3::ZERO),
            Err(NoPath::GoalBlocked)
        );
        assert_eq!(
            finder.find_path(&mesh, Vec3::new(400.0, 0.0, 0.0), Vec3::ZERO),
            Err(NoPath::OutsideGrid)
        );
    }

    #[test]
    fn long_segments_see_small_blockers_between_distant_waypoints() {
        let config = NavigationConfig {
            world_size: 200.0,
            ..NavigationConfig::default()
        };
        let post = Obstacle::new(Aabb::from_center_half_extents(
            Vec3::new(10.0, 10.0, 2.5),
            Vec3::new(0.5, 10.0, 0.5),
        ));
        let mesh =
            NavigationMesh::build(&config, &|_: f32, _: f32| 0.0, &[post]).expect("mesh builds");

        assert!(!mesh.is_walkable_at(Vec3::new(12.5, 0.0, 2.5)));
        assert!(!has_line_of_sight(
            &mesh,
            Vec3::new(-97.5, 0.0, 2.5),
            Vec3::new(97.5, 0.0, 2.5)
        ));
        assert!(has_line_of_sight(
            &mesh,
            Vec3::new(-97.5, 0.0, 42.5),
            Vec3::new(97.5, 0.0, 42.5)
        ));
    }

    #[test]
    fn corner_crossings_require_both_flanks() {
        let blocker = Obstacle::new(Aabb::from_center_half_extents(
            Vec3::new(7.5, 10.0, 2.5),
            Vec3::new(0.5, 10.0, 0.5),
        ));
        let config = NavigationConfig {
            world_size: 100.0,
            agent_radius: 1.0,
            obstacle_buffer: 0.0,
            ..NavigationConfig::default()
        };
        let mesh =
            NavigationMesh::build(&config, &|_: f32, _: f32| 0.0, &[blocker]).expect("mesh builds");

        assert!(!mesh.is_walkable_at(Vec3::new(7.5, 0.0, 2.5)));
        assert!(mesh.is_walkable_at(Vec3::new(2.5, 0.0, 7.5)));
        assert!(!has_line_of_sight(
            &mesh,
            Vec3::new(2.5, 0.0, 2.5),
            Vec3::new(7.5, 0.0, 7.5)
        ));
        assert!(has_line_of_sight(
            &mesh,
            Vec3::new(-2.5, 0.0, 2.5),
            Vec3::new(2.5, 0.0, 7.5)
        ));
    }

    #[test]
    fn smoothing_keeps_waypoints_without_line_of_sight() {
        let wall = Obstacle::new(Aabb::from_center_half_extents(
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::new(2.0, 10.0, 30.0),
        ));
        let mesh = mesh(&[wall]);
        let raw = [
            Vec3::new(-20.0, 0.0, 0.0),
            Vec3::new(-20.0, 0.0, 45.0),
            Vec3::new(20.0, 0.0, 45.0),
            Vec3::new(20.0, 0.0, 0.0),
        ];

        let smoothed = smooth(&mesh, &raw);

        assert_eq!(smoothed, raw.to_vec());
    }
}
