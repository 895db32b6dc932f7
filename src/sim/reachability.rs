//! Coarse-grid reachability between world points
//!
//! The world is cut into square cells; a cell is blocked when a probe circle
//! at its centre (slightly smaller than the player) overlaps a tree. Paths
//! move between 4-connected free cells. The source cell is always enterable,
//! so a player standing half inside a tree can still walk out.

use std::collections::VecDeque;

use glam::Vec2;

use super::geometry::overlaps_obstacle;
use super::state::{Collectible, Obstacle};
use crate::consts::*;

/// Integer cell coordinate on the reachability grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub col: usize,
    pub row: usize,
}

/// Blocked/free occupancy for one obstacle layout
#[derive(Debug, Clone)]
pub struct ReachabilityGrid {
    cols: usize,
    rows: usize,
    blocked: Vec<bool>,
}

impl ReachabilityGrid {
    /// Rasterize the obstacle layout onto the grid
    pub fn new(obstacles: &[Obstacle]) -> Self {
        let cols = (WORLD_WIDTH / GRID_CELL).floor() as usize;
        let rows = (WORLD_HEIGHT / GRID_CELL).floor() as usize;
        let probe = PLAYER_RADIUS * GRID_PROBE_FACTOR;

        let mut blocked = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let center = Self::cell_center(Cell { col, row });
                blocked.push(overlaps_obstacle(obstacles, center, probe));
            }
        }

        Self {
            cols,
            rows,
            blocked,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// World-space centre of a cell
    pub fn cell_center(cell: Cell) -> Vec2 {
        Vec2::new(
            cell.col as f32 * GRID_CELL + GRID_CELL / 2.0,
            cell.row as f32 * GRID_CELL + GRID_CELL / 2.0,
        )
    }

    /// Cell containing a point, clamped onto the grid
    pub fn cell_of(&self, point: Vec2) -> Cell {
        let to_cell = |v: f32, max: usize| -> usize {
            let idx = (v / GRID_CELL).floor();
            if idx <= 0.0 {
                0
            } else {
                (idx as usize).min(max - 1)
            }
        };
        Cell {
            col: to_cell(point.x, self.cols),
            row: to_cell(point.y, self.rows),
        }
    }

    #[inline]
    fn index(&self, cell: Cell) -> usize {
        cell.row * self.cols + cell.col
    }

    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.blocked[self.index(cell)]
    }

    /// Breadth-first search over free cells from `from` to `to`
    pub fn has_path(&self, from: Vec2, to: Vec2) -> bool {
        let source = self.cell_of(from);
        let target = self.cell_of(to);

        let mut seen = vec![false; self.cols * self.rows];
        let mut queue = VecDeque::new();
        seen[self.index(source)] = true;
        queue.push_back(source);

        while let Some(cell) = queue.pop_front() {
            if cell == target {
                return true;
            }
            for next in self.neighbors(cell).into_iter().flatten() {
                let idx = self.index(next);
                if seen[idx] || self.blocked[idx] {
                    continue;
                }
                seen[idx] = true;
                queue.push_back(next);
            }
        }
        false
    }

    /// 4-connected neighbours that lie on the grid
    fn neighbors(&self, cell: Cell) -> [Option<Cell>; 4] {
        let Cell { col, row } = cell;
        [
            (col + 1 < self.cols).then(|| Cell { col: col + 1, row }),
            (col > 0).then(|| Cell { col: col - 1, row }),
            (row + 1 < self.rows).then(|| Cell { col, row: row + 1 }),
            (row > 0).then(|| Cell { col, row: row - 1 }),
        ]
    }
}

/// Count collectibles reachable from the start and able to reach the goal,
/// stopping as soon as `enough` is hit
pub fn count_reachable(
    grid: &ReachabilityGrid,
    collectibles: &[Collectible],
    enough: usize,
) -> usize {
    let mut reachable = 0;
    for item in collectibles {
        if grid.has_path(PLAYER_START, item.pos) && grid.has_path(item.pos, GOAL_POS) {
            reachable += 1;
            if reachable >= enough {
                break;
            }
        }
    }
    reachable
}

/// Whether a layout can be finished: start reaches the goal and at least
/// `required` balls can be fetched and delivered
pub fn layout_playable(
    obstacles: &[Obstacle],
    collectibles: &[Collectible],
    required: u32,
) -> bool {
    let grid = ReachabilityGrid::new(obstacles);
    if !grid.has_path(PLAYER_START, GOAL_POS) {
        return false;
    }
    let required = required as usize;
    count_reachable(&grid, collectibles, required) >= required
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dimensions() {
        let grid = ReachabilityGrid::new(&[]);
        assert_eq!(grid.cols(), 33);
        assert_eq!(grid.rows(), 25);
    }

    #[test]
    fn test_cell_of_clamps() {
        let grid = ReachabilityGrid::new(&[]);
        assert_eq!(grid.cell_of(Vec2::new(-5.0, -5.0)), Cell { col: 0, row: 0 });
        assert_eq!(
            grid.cell_of(Vec2::new(WORLD_WIDTH + 50.0, WORLD_HEIGHT)),
            Cell { col: 32, row: 24 }
        );
        assert_eq!(grid.cell_of(Vec2::new(50.0, 25.0)), Cell { col: 2, row: 1 });
    }

    #[test]
    fn test_open_field_is_connected() {
        let grid = ReachabilityGrid::new(&[]);
        assert!(grid.has_path(PLAYER_START, GOAL_POS));
        assert!(grid.has_path(Vec2::new(5.0, 5.0), Vec2::new(795.0, 595.0)));
    }

    #[test]
    fn test_tree_blocks_cells() {
        let tree = Obstacle::new(Vec2::new(200.0, 200.0), 40.0);
        let grid = ReachabilityGrid::new(&[tree]);
        assert!(grid.is_blocked(grid.cell_of(Vec2::new(200.0, 200.0))));
        assert!(!grid.is_blocked(grid.cell_of(Vec2::new(500.0, 500.0))));
    }

    #[test]
    fn test_blocked_target_is_unreachable() {
        let tree = Obstacle::new(Vec2::new(200.0, 200.0), 40.0);
        let grid = ReachabilityGrid::new(&[tree]);
        assert!(!grid.has_path(PLAYER_START, Vec2::new(200.0, 200.0)));

        // Edge of the blocked disc: can walk out, cannot walk in
        let edge = Vec2::new(228.0, 204.0);
        assert!(grid.is_blocked(grid.cell_of(edge)));
        assert!(!grid.is_blocked(grid.cell_of(Vec2::new(252.0, 204.0))));
        assert!(grid.has_path(edge, PLAYER_START));
        assert!(!grid.has_path(PLAYER_START, edge));
    }

    #[test]
    fn test_wall_of_trees_cuts_the_field() {
        // A column of large trees at x=600 spanning the full height
        let wall: Vec<Obstacle> = (0..8)
            .map(|i| Obstacle::new(Vec2::new(600.0, i as f32 * 80.0 + 20.0), 56.0))
            .collect();
        let grid = ReachabilityGrid::new(&wall);
        assert!(grid.has_path(PLAYER_START, GOAL_POS));
        assert!(!grid.has_path(PLAYER_START, Vec2::new(740.0, 300.0)));
    }

    #[test]
    fn test_layout_playable_counts_required() {
        let wall: Vec<Obstacle> = (0..8)
            .map(|i| Obstacle::new(Vec2::new(600.0, i as f32 * 80.0 + 20.0), 56.0))
            .collect();
        let near = Collectible::new(Vec2::new(150.0, 150.0));
        let far = Collectible::new(Vec2::new(740.0, 300.0));
        let items = [near, far, far];

        assert!(layout_playable(&wall, &items, 1));
        assert!(!layout_playable(&wall, &items, 2));
        assert!(layout_playable(&[], &items, 3));
    }

    #[test]
    fn test_count_reachable_short_circuits() {
        let items = vec![Collectible::new(Vec2::new(150.0, 150.0)); 10];
        let grid = ReachabilityGrid::new(&[]);
        assert_eq!(count_reachable(&grid, &items, 4), 4);
        assert_eq!(count_reachable(&grid, &items, 20), 10);
    }
}
