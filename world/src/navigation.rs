//! Walkability grid derived from terrain slope and static obstacles.

use std::f32::consts::SQRT_2;

use glam::Vec3;
use thiserror::Error;
use zombie_survival_core::{Aabb, NavigationConfig, Obstacle, Terrain};

/// Largest number of cells a navigation mesh may allocate.
pub const MAX_CELLS: usize = 4_000_000;

const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];

/// Reasons the navigation mesh could not be built.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum NavigationError {
    /// The world extent is zero, negative or not finite.
    #[error("navigation extent must be positive and finite, got {world_size}")]
    InvalidExtent {
        /// Configured extent.
        world_size: f32,
    },
    /// The cell size is zero, negative or not finite.
    #[error("navigation cell size must be positive and finite, got {cell_size}")]
    InvalidCellSize {
        /// Configured cell size.
        cell_size: f32,
    },
    /// The slope tolerance is zero, negative or not finite.
    #[error("height tolerance must be positive and finite, got {height_tolerance}")]
    InvalidHeightTolerance {
        /// Configured tolerance.
        height_tolerance: f32,
    },
    /// A single cell would not fit inside the extent.
    #[error("cell size {cell_size} exceeds navigation extent {world_size}")]
    CellLargerThanExtent {
        /// Configured cell size.
        cell_size: f32,
        /// Configured extent.
        world_size: f32,
    },
    /// The grid would exceed [`MAX_CELLS`].
    #[error("navigation grid of {cells} cells exceeds the limit of {limit}")]
    TooManyCells {
        /// Requested cell count.
        cells: u64,
        /// Supported cell count.
        limit: usize,
    },
}

/// Column and row of a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NavCell {
    column: usize,
    row: usize,
}

impl NavCell {
    /// Creates a cell coordinate.
    #[must_use]
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }

    /// Column along the x axis.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Row along the z axis.
    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }
}

/// Single grid node located at a cell centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavNode {
    position: Vec3,
    walkable: bool,
}

impl NavNode {
    /// Cell centre with the terrain elevation in `y`.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Whether an agent may stand on this node.
    #[must_use]
    pub const fn walkable(&self) -> bool {
        self.walkable
    }
}

/// Dense row-major walkability grid centred on the origin.
#[derive(Clone, Debug)]
pub struct NavigationMesh {
    world_size: f32,
    cell_size: f32,
    height_tolerance: f32,
    columns: usize,
    nodes: Vec<NavNode>,
    walkable: usize,
}

impl NavigationMesh {
    /// Samples the terrain and obstacles into a fresh grid.
    pub fn build(
        config: &NavigationConfig,
        terrain: &dyn Terrain,
        obstacles: &[Obstacle],
    ) -> Result<Self, NavigationError> {
        let world_size = config.world_size;
        let cell_size = config.cell_size;
        if !world_size.is_finite() || world_size <= 0.0 {
            return Err(NavigationError::InvalidExtent { world_size });
        }
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(NavigationError::InvalidCellSize { cell_size });
        }
        if !config.height_tolerance.is_finite() || config.height_tolerance <= 0.0 {
            return Err(NavigationError::InvalidHeightTolerance {
                height_tolerance: config.height_tolerance,
            });
        }
        if cell_size > world_size {
            return Err(NavigationError::CellLargerThanExtent {
                cell_size,
                world_size,
            });
        }

        let columns_f = (world_size / cell_size).floor();
        let cells = (f64::from(columns_f) * f64::from(columns_f)) as u64;
        if cells > MAX_CELLS as u64 {
            return Err(NavigationError::TooManyCells {
                cells,
                limit: MAX_CELLS,
            });
        }
        let columns = columns_f as usize;

        let half = world_size * 0.5;
        let mut nodes = Vec::with_capacity(columns * columns);
        let mut walkable = 0;
        for row in 0..columns {
            for column in 0..columns {
                let x = -half + (column as f32 + 0.5) * cell_size;
                let z = -half + (row as f32 + 0.5) * cell_size;
                let height = terrain.height_at(x, z);
                let position = Vec3::new(x, height, z);
                let is_walkable = !too_steep(config, terrain, position)
                    && !blocked(config, position, obstacles);
                if is_walkable {
                    walkable += 1;
                }
                nodes.push(NavNode {
                    position,
                    walkable: is_walkable,
                });
            }
        }

        Ok(Self {
            world_size,
            cell_size,
            height_tolerance: config.height_tolerance,
            columns,
            nodes,
            walkable,
        })
    }

    /// Side length of the covered square.
    #[must_use]
    pub const fn world_size(&self) -> f32 {
        self.world_size
    }

    /// Side length of a cell.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of cells along each axis.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Total number of nodes in the grid.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of walkable nodes.
    #[must_use]
    pub const fn walkable_count(&self) -> usize {
        self.walkable
    }

    /// All nodes in row-major order.
    #[must_use]
    pub fn nodes(&self) -> &[NavNode] {
        &self.nodes
    }

    /// Cell containing the provided horizontal coordinates.
    #[must_use]
    pub fn cell_for(&self, x: f32, z: f32) -> Option<NavCell> {
        let half = self.world_size * 0.5;
        let column = ((x + half) / self.cell_size).floor();
        let row = ((z + half) / self.cell_size).floor();
        let limit = self.columns as f32;
        if !(0.0..limit).contains(&column) || !(0.0..limit).contains(&row) {
            return None;
        }
        Some(NavCell::new(column as usize, row as usize))
    }

    /// Dense index of the provided cell, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, cell: NavCell) -> Option<usize> {
        if cell.column >= self.columns || cell.row >= self.columns {
            return None;
        }
        Some(cell.row * self.columns + cell.column)
    }

    /// Cell at the provided dense index.
    #[must_use]
    pub fn cell_at(&self, index: usize) -> Option<NavCell> {
        (index < self.nodes.len())
            .then(|| NavCell::new(index % self.columns, index / self.columns))
    }

    /// Node at the provided dense index.
    #[must_use]
    pub fn node(&self, index: usize) -> Option<&NavNode> {
        self.nodes.get(index)
    }

    /// Cell centre of the node at the provided index.
    #[must_use]
    pub fn node_position(&self, index: usize) -> Option<Vec3> {
        self.nodes.get(index).map(NavNode::position)
    }

    /// Dense index of the node covering a world position.
    #[must_use]
    pub fn index_at(&self, position: Vec3) -> Option<usize> {
        self.cell_for(position.x, position.z)
            .and_then(|cell| self.index(cell))
    }

    /// Reports whether the cell under `position` is walkable. Points off the grid are not.
    #[must_use]
    pub fn is_walkable_at(&self, position: Vec3) -> bool {
        self.index_at(position)
            .and_then(|index| self.nodes.get(index))
            .is_some_and(NavNode::walkable)
    }

    /// Walkable neighbours of a node with their traversal costs.
    ///
    /// Diagonal moves require both flanking cardinal cells to be walkable.
    /// Costs scale with the height change between the two nodes.
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = (usize, f32)> + '_ {
        let origin = self.cell_at(index);
        let from_height = self.node_position(index).map_or(0.0, |position| position.y);

        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(move |&(dc, dr)| {
                let origin = origin?;
                let target = self.walkable_offset(origin, dc, dr)?;
                if dc != 0 && dr != 0 {
                    let _ = self.walkable_offset(origin, dc, 0)?;
                    let _ = self.walkable_offset(origin, 0, dr)?;
                }
                let base = if dc != 0 && dr != 0 { SQRT_2 } else { 1.0 };
                let to_height = self.nodes[target].position.y;
                let slope = (to_height - from_height).abs() / self.height_tolerance;
                Some((target, self.cell_size * base * (1.0 + slope)))
            })
    }

    fn walkable_offset(&self, origin: NavCell, dc: i64, dr: i64) -> Option<usize> {
        let column = usize::try_from(origin.column as i64 + dc).ok()?;
        let row = usize::try_from(origin.row as i64 + dr).ok()?;
        let index = self.index(NavCell::new(column, row))?;
        self.nodes[index].walkable.then_some(index)
    }
}

fn too_steep(config: &NavigationConfig, terrain: &dyn Terrain, centre: Vec3) -> bool {
    let offset = config.cell_size * 0.5;
    [(offset, 0.0), (-offset, 0.0), (0.0, offset), (0.0, -offset)]
        .into_iter()
        .any(|(dx, dz)| {
            let sample = terrain.height_at(centre.x + dx, centre.z + dz);
            (sample - centre.y).abs() > config.height_tolerance
        })
}

fn blocked(config: &NavigationConfig, foot: Vec3, obstacles: &[Obstacle]) -> bool {
    let agent = Aabb::from_corners(
        Vec3::new(foot.x - config.agent_radius, foot.y, foot.z - config.agent_radius),
        Vec3::new(
            foot.x + config.agent_radius,
            foot.y + config.agent_height,
            foot.z + config.agent_radius,
        ),
    );
    let centre = agent.center();
    let clearance = config.agent_radius + config.obstacle_buffer;

    obstacles.iter().any(|obstacle| {
        agent.intersects(obstacle.bounds()) || centre.distance(obstacle.center()) < clearance
    })
}
