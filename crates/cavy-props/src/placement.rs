use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Habitat floor grid. Cells are addressed `(col, row)` with row 0 along
/// the back (top) wall and the grid centred on the world origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    pub cols: u32,
    pub rows: u32,
    pub cell_size: f32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            cols: 14,
            rows: 10,
            cell_size: 3.0,
        }
    }
}

impl GridLayout {
    pub fn new(cols: u32, rows: u32, cell_size: f32) -> Self {
        Self {
            cols,
            rows,
            cell_size,
        }
    }

    /// World-space offset of a cell on the floor plane (y = 0)
    pub fn cell_to_world(&self, col: u32, row: u32) -> Vec3 {
        let x = (col as f32 - (self.cols / 2) as f32) * self.cell_size;
        let z = (row as f32 - (self.rows / 2) as f32) * self.cell_size;
        Vec3::new(x, 0.0, z)
    }

    pub fn contains(&self, col: u32, row: u32) -> bool {
        col < self.cols && row < self.rows
    }

    /// Yaw that turns a water bottle's bracket toward the nearest wall.
    /// Straight edges snap to the wall normal; corners (and interior cells,
    /// which have no wall) point along the diagonal from the centre.
    pub fn water_bottle_rotation(&self, col: u32, row: u32) -> f32 {
        let last_col = self.cols.saturating_sub(1);
        let last_row = self.rows.saturating_sub(1);
        let on_left = col == 0;
        let on_right = col == last_col;
        let on_top = row == 0;
        let on_bottom = row == last_row;

        let on_vertical_edge = on_left || on_right;
        let on_horizontal_edge = on_top || on_bottom;

        if on_horizontal_edge && !on_vertical_edge {
            return if on_top { -FRAC_PI_2 } else { FRAC_PI_2 };
        }
        if on_vertical_edge && !on_horizontal_edge {
            return if on_left { 0.0 } else { PI };
        }

        let offset = self.cell_to_world(col, row);
        (-offset.z).atan2(offset.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_world() {
        let grid = GridLayout::default();
        assert_eq!(grid.cell_to_world(0, 0), Vec3::new(-21.0, 0.0, -15.0));
        assert_eq!(grid.cell_to_world(7, 5), Vec3::ZERO);
        assert_eq!(grid.cell_to_world(13, 9), Vec3::new(18.0, 0.0, 12.0));
    }

    #[test]
    fn test_corner_rotation() {
        let grid = GridLayout::default();
        let r = grid.water_bottle_rotation(0, 0);
        assert_eq!(r, 15.0f32.atan2(-21.0));
        assert!((r - 2.531).abs() < 1e-3);
    }

    #[test]
    fn test_edge_rotations() {
        let grid = GridLayout::default();
        assert_eq!(grid.water_bottle_rotation(7, 0), -FRAC_PI_2);
        assert_eq!(grid.water_bottle_rotation(7, 9), FRAC_PI_2);
        assert_eq!(grid.water_bottle_rotation(0, 4), 0.0);
        assert_eq!(grid.water_bottle_rotation(13, 4), PI);
    }

    #[test]
    fn test_interior_uses_diagonal() {
        let grid = GridLayout::default();
        let offset = grid.cell_to_world(3, 2);
        assert_eq!(
            grid.water_bottle_rotation(3, 2),
            (-offset.z).atan2(offset.x)
        );
    }
}
