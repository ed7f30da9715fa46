//! 12-column grid constants and the clamping rules the store applies.

use crate::templates::Alignment;

pub const GRID_COLUMNS: i32 = 12;
/// Vertical distance between consecutive blocks under auto-flow.
pub const ROW_STRIDE: i32 = 4;

pub const DEFAULT_BLOCK_WIDTH: i32 = 6;
pub const DEFAULT_BLOCK_HEIGHT: i32 = 4;
pub const DEFAULT_MIN_SIZE: i32 = 2;

/// Auto-flow row for the block at `index` in reading order.
pub fn row_for(index: usize) -> i32 {
    index as i32 * ROW_STRIDE
}

pub fn clamp_x(x: i32) -> i32 {
    x.clamp(0, GRID_COLUMNS - 1)
}

pub fn clamp_width(w: i32) -> i32 {
    w.clamp(1, GRID_COLUMNS)
}

pub fn floor_height(h: i32) -> i32 {
    h.max(1)
}

/// Pulls `x` left just enough that `x + w` stays inside the grid.
pub fn fit_within_grid(x: i32, w: i32) -> i32 {
    if x.saturating_add(w) > GRID_COLUMNS {
        (GRID_COLUMNS - w).max(0)
    } else {
        x
    }
}

/// Column offset for a block of width `w` with the given alignment.
pub fn x_for_alignment(alignment: Alignment, w: i32) -> i32 {
    let w = clamp_width(w);
    match alignment {
        Alignment::Left | Alignment::Justify => 0,
        Alignment::Center => (GRID_COLUMNS - w) / 2,
        Alignment::Right => GRID_COLUMNS - w,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_for_uses_stride() {
        assert_eq!(row_for(0), 0);
        assert_eq!(row_for(3), 12);
    }

    #[test]
    fn test_clamps() {
        assert_eq!(clamp_x(-3), 0);
        assert_eq!(clamp_x(14), 11);
        assert_eq!(clamp_width(0), 1);
        assert_eq!(clamp_width(15), 12);
        assert_eq!(floor_height(-2), 1);
        assert_eq!(floor_height(40), 40);
    }

    #[test]
    fn test_fit_within_grid() {
        assert_eq!(fit_within_grid(4, 6), 4);
        assert_eq!(fit_within_grid(8, 6), 6);
        assert_eq!(fit_within_grid(3, 12), 0);
    }

    #[test]
    fn test_fit_within_grid_extreme_x_lands_on_grid() {
        assert_eq!(fit_within_grid(i32::MAX - 2, 6), 6);
        assert_eq!(fit_within_grid(i32::MAX, 12), 0);
    }

    #[test]
    fn test_x_for_alignment() {
        assert_eq!(x_for_alignment(Alignment::Left, 6), 0);
        assert_eq!(x_for_alignment(Alignment::Center, 6), 3);
        assert_eq!(x_for_alignment(Alignment::Center, 5), 3);
        assert_eq!(x_for_alignment(Alignment::Right, 4), 8);
        assert_eq!(x_for_alignment(Alignment::Justify, 12), 0);
    }
}
