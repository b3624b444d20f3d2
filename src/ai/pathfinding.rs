//! Grid navigation and path following
//!
//! A* over a walkable grid laid out on the XZ plane, plus two path followers
//! with navigation-agent semantics: the agent is steered toward the next
//! waypoint, waypoints are consumed once the agent comes within
//! `path_desired_distance`, and the route is finished within
//! `target_desired_distance` of its last point (or at once if there is no
//! route).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use glam::{Vec2, Vec3};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::agent::PathFollower;

// ============================================================================
// Grid
// ============================================================================

/// Walkable grid on the XZ plane. `Vec2` coordinates are `(x, z)`.
#[derive(Debug, Clone)]
pub struct Grid {
    /// Width in cells (along X)
    pub width: usize,
    /// Depth in cells (along Z)
    pub depth: usize,
    /// Cell size in world units
    pub cell_size: f32,
    /// World position of the grid's minimum corner
    pub origin: Vec2,
    /// Walkable cells, row-major by Z
    cells: Vec<bool>,
}

type Cell = (usize, usize);

impl Grid {
    /// Create a new grid (all cells walkable by default)
    #[must_use]
    pub fn new(width: usize, depth: usize, cell_size: f32) -> Self {
        Self {
            width,
            depth,
            cell_size,
            origin: Vec2::ZERO,
            cells: vec![true; width * depth],
        }
    }

    /// Create a grid whose cells cover `[min, max]` on both axes
    #[must_use]
    pub fn covering(min: Vec2, max: Vec2, cell_size: f32) -> Self {
        let extent = (max - min).max(Vec2::ZERO);
        let width = (extent.x / cell_size).ceil().max(1.0) as usize;
        let depth = (extent.y / cell_size).ceil().max(1.0) as usize;
        let mut grid = Self::new(width, depth, cell_size);
        grid.origin = min;
        grid
    }

    fn index(&self, (x, z): Cell) -> Option<usize> {
        (x < self.width && z < self.depth).then_some(z * self.width + x)
    }

    /// Set a cell's walkability
    pub fn set_walkable(&mut self, x: usize, z: usize, walkable: bool) {
        if let Some(i) = self.index((x, z)) {
            self.cells[i] = walkable;
        }
    }

    /// Block every cell whose center lies inside the world-space rectangle
    pub fn block_rect(&mut self, min: Vec2, max: Vec2) {
        for z in 0..self.depth {
            for x in 0..self.width {
                let center = self.cell_center((x, z));
                if center.cmpge(min).all() && center.cmple(max).all() {
                    self.set_walkable(x, z, false);
                }
            }
        }
    }

    /// Check if a cell is walkable (out of range is not)
    #[must_use]
    pub fn is_walkable(&self, x: usize, z: usize) -> bool {
        self.index((x, z)).is_some_and(|i| self.cells[i])
    }

    /// Cell containing a world position, if it lies on the grid
    #[must_use]
    pub fn cell_at(&self, pos: Vec2) -> Option<(usize, usize)> {
        let local = (pos - self.origin) / self.cell_size;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let cell = (local.x.floor() as usize, local.y.floor() as usize);
        self.index(cell).map(|_| cell)
    }

    /// World position of a cell's center
    #[must_use]
    pub fn cell_center(&self, (x, z): (usize, usize)) -> Vec2 {
        self.origin + (Vec2::new(x as f32, z as f32) + 0.5) * self.cell_size
    }

    fn walkable_neighbors(&self, (x, z): Cell) -> impl Iterator<Item = Cell> + '_ {
        let candidates = [
            x.checked_sub(1).map(|x| (x, z)),
            Some((x + 1, z)),
            z.checked_sub(1).map(|z| (x, z)),
            Some((x, z + 1)),
        ];
        candidates
            .into_iter()
            .flatten()
            .filter(|&(nx, nz)| self.is_walkable(nx, nz))
    }
}

// ============================================================================
// A*
// ============================================================================

/// Result of pathfinding
#[derive(Debug, Clone, Default)]
pub struct PathResult {
    /// Cell centers from start to goal, in world `(x, z)`
    pub waypoints: Vec<Vec2>,
    /// Total path length
    pub length: f32,
}

impl PathResult {
    /// Check if no path was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// Open-set entry ordered by lowest `f_cost` first
#[derive(Debug, Clone, Copy)]
struct Frontier {
    cell: Cell,
    f_cost: f32,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f_cost.total_cmp(&self.f_cost)
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find a path using A* with a Manhattan heuristic
#[must_use]
pub fn find_path(grid: &Grid, start: Vec2, goal: Vec2) -> PathResult {
    let (Some(start), Some(goal)) = (grid.cell_at(start), grid.cell_at(goal)) else {
        return PathResult::default();
    };
    if !grid.is_walkable(start.0, start.1) || !grid.is_walkable(goal.0, goal.1) {
        return PathResult::default();
    }

    let heuristic = |(x, z): Cell| x.abs_diff(goal.0) as f32 + z.abs_diff(goal.1) as f32;

    let mut open = BinaryHeap::new();
    let mut came_from: FxHashMap<Cell, Cell> = FxHashMap::default();
    let mut g_score: FxHashMap<Cell, f32> = FxHashMap::default();

    g_score.insert(start, 0.0);
    open.push(Frontier {
        cell: start,
        f_cost: heuristic(start),
    });

    while let Some(Frontier { cell, .. }) = open.pop() {
        if cell == goal {
            let mut cells = vec![goal];
            let mut cursor = goal;
            while let Some(&prev) = came_from.get(&cursor) {
                cells.push(prev);
                cursor = prev;
            }
            cells.reverse();

            let waypoints: Vec<Vec2> = cells.into_iter().map(|c| grid.cell_center(c)).collect();
            let length = waypoints.windows(2).map(|w| w[0].distance(w[1])).sum();
            return PathResult { waypoints, length };
        }

        let g = g_score.get(&cell).copied().unwrap_or(f32::MAX);
        for next in grid.walkable_neighbors(cell) {
            let tentative = g + 1.0;
            if tentative < g_score.get(&next).copied().unwrap_or(f32::MAX) {
                came_from.insert(next, cell);
                g_score.insert(next, tentative);
                open.push(Frontier {
                    cell: next,
                    f_cost: tentative + heuristic(next),
                });
            }
        }
    }

    PathResult::default()
}

// ============================================================================
// Path following
// ============================================================================

/// Arrival thresholds for path followers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationSettings {
    /// Distance at which an intermediate waypoint counts as reached
    pub path_desired_distance: f32,
    /// Distance at which the final point counts as reached
    pub target_desired_distance: f32,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            path_desired_distance: 1.0,
            target_desired_distance: 1.0,
        }
    }
}

/// Progress along a list of waypoints. Shared by every follower.
#[derive(Debug, Clone, Default)]
struct PathProgress {
    waypoints: Vec<Vec3>,
    next: usize,
    finished: bool,
}

impl PathProgress {
    fn reset(&mut self, waypoints: Vec<Vec3>) {
        self.finished = waypoints.is_empty();
        self.waypoints = waypoints;
        self.next = 0;
    }

    fn update(&mut self, position: Vec3, settings: &NavigationSettings) {
        if self.finished {
            return;
        }

        let last = self.waypoints.len() - 1;
        while self.next < last
            && position.distance(self.waypoints[self.next]) <= settings.path_desired_distance
        {
            self.next += 1;
        }

        if position.distance(self.waypoints[last]) <= settings.target_desired_distance {
            self.next = last;
            self.finished = true;
        }
    }

    fn next_waypoint(&self, position: Vec3) -> Vec3 {
        if self.finished {
            return position;
        }
        self.waypoints.get(self.next).copied().unwrap_or(position)
    }
}

/// Straight-line follower: the only waypoint is the target itself.
#[derive(Debug, Clone)]
pub struct DirectPath {
    settings: NavigationSettings,
    progress: PathProgress,
    target: Option<Vec3>,
}

impl DirectPath {
    /// Create a follower with no target (reports finished)
    #[must_use]
    pub fn new(settings: NavigationSettings) -> Self {
        Self {
            settings,
            progress: PathProgress {
                finished: true,
                ..Default::default()
            },
            target: None,
        }
    }

    /// Current destination, if any
    #[must_use]
    pub fn target(&self) -> Option<Vec3> {
        self.target
    }
}

impl Default for DirectPath {
    fn default() -> Self {
        Self::new(NavigationSettings::default())
    }
}

impl PathFollower for DirectPath {
    fn set_target(&mut self, target: Vec3) {
        self.target = Some(target);
        self.progress.reset(vec![target]);
    }

    fn is_finished(&mut self, position: Vec3) -> bool {
        self.progress.update(position, &self.settings);
        self.progress.finished
    }

    fn next_waypoint(&mut self, position: Vec3) -> Vec3 {
        self.progress.update(position, &self.settings);
        self.progress.next_waypoint(position)
    }
}

/// A* follower over a [`Grid`].
///
/// The route is planned lazily on the first query after `set_target`, from
/// wherever the agent is at that moment. An unreachable target yields an
/// empty route, which reports finished immediately.
#[derive(Debug, Clone)]
pub struct GridPath {
    grid: Grid,
    /// Height of the walkable surface the waypoints lie on
    height: f32,
    settings: NavigationSettings,
    progress: PathProgress,
    pending: Option<Vec3>,
}

impl GridPath {
    /// Create a follower over `grid` with waypoints at `height`
    #[must_use]
    pub fn new(grid: Grid, height: f32, settings: NavigationSettings) -> Self {
        Self {
            grid,
            height,
            settings,
            progress: PathProgress {
                finished: true,
                ..Default::default()
            },
            pending: None,
        }
    }

    /// The navigation grid
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Waypoints of the current route
    #[must_use]
    pub fn waypoints(&self) -> &[Vec3] {
        &self.progress.waypoints
    }

    fn plan(&mut self, position: Vec3) {
        let Some(target) = self.pending.take() else {
            return;
        };

        let path = find_path(
            &self.grid,
            Vec2::new(position.x, position.z),
            Vec2::new(target.x, target.z),
        );
        let mut waypoints: Vec<Vec3> = path
            .waypoints
            .iter()
            .map(|p| Vec3::new(p.x, self.height, p.y))
            .collect();

        // End on the exact target rather than its cell center
        if let Some(last) = waypoints.last_mut() {
            *last = Vec3::new(target.x, self.height, target.z);
        } else {
            log::debug!("No route from {position} to {target}");
        }

        self.progress.reset(waypoints);
    }
}

impl PathFollower for GridPath {
    fn set_target(&mut self, target: Vec3) {
        self.pending = Some(target);
    }

    fn is_finished(&mut self, position: Vec3) -> bool {
        self.plan(position);
        self.progress.update(position, &self.settings);
        self.progress.finished
    }

    fn next_waypoint(&mut self, position: Vec3) -> Vec3 {
        self.plan(position);
        self.progress.update(position, &self.settings);
        self.progress.next_waypoint(position)
    }
}
