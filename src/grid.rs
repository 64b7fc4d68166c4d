use std::ops::Range;

use crate::constants::grid::OVERSCAN_ROWS;

/// How the token tiles are produced for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Every filtered tile, laid out as a responsive grid.
    Grid,
    /// Only the rows intersecting the viewport (plus overscan).
    #[default]
    Virtual,
}

impl std::str::FromStr for RenderMode {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "grid" | "plain" => Ok(RenderMode::Grid),
            "virtual" | "virtualized" | "windowed" => Ok(RenderMode::Virtual),
            _ => Err(anyhow::anyhow!(
                "Invalid render mode '{s}'. Valid options: grid, virtual"
            )),
        }
    }
}

impl std::fmt::Display for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderMode::Grid => write!(f, "grid"),
            RenderMode::Virtual => write!(f, "virtual"),
        }
    }
}

/// Fixed-size tile grid. Units are renderer-agnostic: pixels on the web,
/// cells in the terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLayout {
    pub tile_w: u32,
    pub tile_h: u32,
    pub gap: u32,
}

/// Where one tile sits in the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl GridLayout {
    pub fn new(tile_w: u32, tile_h: u32, gap: u32) -> Self {
        Self { tile_w, tile_h, gap }
    }

    pub fn row_stride(&self) -> u32 {
        self.tile_h + self.gap
    }

    pub fn col_stride(&self) -> u32 {
        self.tile_w + self.gap
    }

    /// Columns that fit in `width`; never less than one.
    pub fn columns(&self, width: u32) -> usize {
        let stride = self.col_stride().max(1);
        (((width + self.gap) / stride) as usize).max(1)
    }

    pub fn rows(&self, count: usize, columns: usize) -> usize {
        count.div_ceil(columns.max(1))
    }

    /// Total scrollable height for `count` tiles.
    pub fn content_height(&self, count: usize, columns: usize) -> u32 {
        let rows = self.rows(count, columns) as u32;
        (rows * self.row_stride()).saturating_sub(self.gap)
    }

    pub fn cell(&self, index: usize, columns: usize) -> Cell {
        let columns = columns.max(1);
        Cell {
            row: index / columns,
            col: index % columns,
        }
    }

    /// Largest valid scroll offset.
    pub fn max_scroll(&self, count: usize, columns: usize, viewport_h: u32) -> u32 {
        self.content_height(count, columns).saturating_sub(viewport_h)
    }

    /// Row range intersecting the viewport, widened by the overscan.
    pub fn visible_rows(
        &self,
        count: usize,
        columns: usize,
        viewport_h: u32,
        scroll_top: u32,
    ) -> Range<usize> {
        let total_rows = self.rows(count, columns);
        if total_rows == 0 {
            return 0..0;
        }
        let stride = self.row_stride().max(1);
        let first = (scroll_top / stride) as usize;
        let last = ((scroll_top + viewport_h.max(1)).div_ceil(stride)) as usize;
        let start = first.saturating_sub(OVERSCAN_ROWS).min(total_rows);
        let end = (last + OVERSCAN_ROWS).min(total_rows);
        start..end
    }

    /// Tile index range for the visible rows; never past `count`.
    pub fn visible_range(
        &self,
        count: usize,
        columns: usize,
        viewport_h: u32,
        scroll_top: u32,
    ) -> Range<usize> {
        let rows = self.visible_rows(count, columns, viewport_h, scroll_top);
        let columns = columns.max(1);
        (rows.start * columns).min(count)..(rows.end * columns).min(count)
    }

    /// Scroll offset that brings `index` fully into view, moving as little as possible.
    pub fn scroll_to_reveal(
        &self,
        index: usize,
        columns: usize,
        viewport_h: u32,
        scroll_top: u32,
    ) -> u32 {
        let row = self.cell(index, columns).row as u32;
        let top = row * self.row_stride();
        let bottom = top + self.tile_h;
        if top < scroll_top {
            top
        } else if bottom > scroll_top + viewport_h {
            bottom.saturating_sub(viewport_h)
        } else {
            scroll_top
        }
    }

    /// Tile under a point relative to the grid origin, accounting for scroll.
    /// Points in the gaps hit nothing.
    pub fn hit_test(
        &self,
        x: u32,
        y: u32,
        columns: usize,
        count: usize,
        scroll_top: u32,
    ) -> Option<usize> {
        let y = y + scroll_top;
        let col = (x / self.col_stride().max(1)) as usize;
        let row = (y / self.row_stride().max(1)) as usize;
        if col >= columns.max(1) {
            return None;
        }
        if x % self.col_stride().max(1) >= self.tile_w || y % self.row_stride().max(1) >= self.tile_h {
            return None;
        }
        let index = row * columns.max(1) + col;
        (index < count).then_some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn web() -> GridLayout {
        GridLayout::new(138, 138, 25)
    }

    #[test]
    fn columns_follow_width() {
        let g = web();
        assert_eq!(g.columns(0), 1);
        assert_eq!(g.columns(138), 1);
        assert_eq!(g.columns(300), 1);
        assert_eq!(g.columns(301), 2);
        assert_eq!(g.columns(1280), 8);
    }

    #[test]
    fn rows_and_content_height() {
        let g = web();
        assert_eq!(g.rows(0, 4), 0);
        assert_eq!(g.rows(9, 4), 3);
        assert_eq!(g.content_height(9, 4), 3 * 163 - 25);
        assert_eq!(g.content_height(0, 4), 0);
    }

    #[test]
    fn visible_window_with_overscan() {
        let g = web();
        // 100 tiles, 5 columns => 20 rows of 163px
        let r = g.visible_range(100, 5, 400, 0);
        // rows 0..3 visible (400/163 -> 3), +1 overscan
        assert_eq!(r, 0..20);

        let r = g.visible_range(100, 5, 400, 163 * 10);
        assert_eq!(r, 45..70);
    }

    #[test]
    fn visible_window_never_exceeds_count() {
        let g = web();
        for count in [0usize, 1, 7, 33] {
            for scroll in [0u32, 500, 10_000] {
                let r = g.visible_range(count, 4, 600, scroll);
                assert!(r.end <= count);
                assert!(r.start <= r.end);
            }
        }
    }

    #[test]
    fn reveal_scrolls_minimally() {
        let g = GridLayout::new(18, 4, 1);
        // row 6 top = 30, bottom = 34; viewport 20 rows
        assert_eq!(g.scroll_to_reveal(6 * 3, 3, 20, 0), 14);
        assert_eq!(g.scroll_to_reveal(0, 3, 20, 14), 0);
        assert_eq!(g.scroll_to_reveal(4, 3, 20, 0), 0);
    }

    #[test]
    fn hit_test_tiles_and_gaps() {
        let g = GridLayout::new(18, 4, 1);
        assert_eq!(g.hit_test(0, 0, 3, 10, 0), Some(0));
        assert_eq!(g.hit_test(20, 1, 3, 10, 0), Some(1));
        // gap column
        assert_eq!(g.hit_test(18, 0, 3, 10, 0), None);
        // second row via scroll
        assert_eq!(g.hit_test(0, 0, 3, 10, 5), Some(3));
        // past the end
        assert_eq!(g.hit_test(40, 15, 3, 10, 0), None);
        // beyond last column
        assert_eq!(g.hit_test(60, 0, 3, 10, 0), None);
    }
}
