//! Grid layout - fixed tile contract and placement arithmetic

use serde::Serialize;

pub const ASSET_COUNT: usize = 10;
pub const TILE_WIDTH: u32 = 362;
pub const TILE_HEIGHT: u32 = 544;
pub const COLUMNS: u32 = 5;
pub const SPACING_H: u32 = 10;
pub const SPACING_V: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub col: u32,
    pub row: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridLayout {
    pub count: usize,
    pub columns: u32,
    pub rows: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub spacing_h: u32,
    pub spacing_v: u32,
}

impl GridLayout {
    /// Ten 362x544 tiles in five columns with 10px gutters.
    pub const fn standard() -> Self {
        Self {
            count: ASSET_COUNT,
            columns: COLUMNS,
            rows: (ASSET_COUNT as u32).div_ceil(COLUMNS),
            tile_width: TILE_WIDTH,
            tile_height: TILE_HEIGHT,
            spacing_h: SPACING_H,
            spacing_v: SPACING_V,
        }
    }

    pub fn tile_size(&self) -> (u32, u32) {
        (self.tile_width, self.tile_height)
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (
            self.columns * self.tile_width + (self.columns - 1) * self.spacing_h,
            self.rows * self.tile_height + (self.rows - 1) * self.spacing_v,
        )
    }

    /// Slot of the `index`-th tile in placement order.
    pub fn slot(&self, index: usize) -> Slot {
        let index = index as u32;
        Slot {
            col: index % self.columns,
            row: index / self.columns,
        }
    }

    /// Top-left pixel of a slot.
    pub fn origin(&self, slot: Slot) -> (u32, u32) {
        (
            slot.col * (self.tile_width + self.spacing_h),
            slot.row * (self.tile_height + self.spacing_v),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_canvas() {
        let layout = GridLayout::standard();
        assert_eq!(layout.rows, 2);
        assert_eq!(layout.canvas_size(), (1850, 1098));
    }

    #[test]
    fn test_slot_origins() {
        let layout = GridLayout::standard();
        assert_eq!(layout.origin(layout.slot(0)), (0, 0));
        assert_eq!(layout.origin(layout.slot(4)), (1488, 0));
        assert_eq!(layout.origin(layout.slot(5)), (0, 554));
        assert_eq!(layout.slot(9), Slot { col: 4, row: 1 });
        assert_eq!(layout.origin(layout.slot(9)), (1488, 554));
    }

    #[test]
    fn test_last_tile_touches_canvas_edge() {
        let layout = GridLayout::standard();
        let (x, y) = layout.origin(layout.slot(ASSET_COUNT - 1));
        assert_eq!((x + TILE_WIDTH, y + TILE_HEIGHT), layout.canvas_size());
    }
}
