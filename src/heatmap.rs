//! Click heatmap: per-cell click counts and running success rates.
//! Used to find the player's hotspot and the areas they keep missing.

use glam::Vec2;

/// Cell edge length in world units.
pub const CELL_SIZE: f32 = 50.0;

/// One grid cell.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeatCell {
    pub clicks: u32,
    /// Fraction of clicks in this cell that hit something, in [0, 1].
    pub success_rate: f32,
}

pub struct Heatmap {
    /// Row-major cells.
    cells: Vec<HeatCell>,
    cols: usize,
    rows: usize,
}

impl Heatmap {
    /// Grid dimensions are fixed from the viewport at construction.
    pub fn new(width: f32, height: f32) -> Self {
        let cols = (width / CELL_SIZE).ceil().max(0.0) as usize;
        let rows = (height / CELL_SIZE).ceil().max(0.0) as usize;
        Self {
            cells: vec![HeatCell::default(); cols * rows],
            cols,
            rows,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Cell index containing `pos`, or `None` when outside the grid.
    fn index_of(&self, pos: Vec2) -> Option<usize> {
        let cx = (pos.x / CELL_SIZE).floor();
        let cy = (pos.y / CELL_SIZE).floor();
        if cx < 0.0 || cy < 0.0 {
            return None;
        }
        let (cx, cy) = (cx as usize, cy as usize);
        (cx < self.cols && cy < self.rows).then(|| cy * self.cols + cx)
    }

    fn center_of(&self, idx: usize) -> Vec2 {
        let cx = (idx % self.cols) as f32;
        let cy = (idx / self.cols) as f32;
        Vec2::new((cx + 0.5) * CELL_SIZE, (cy + 0.5) * CELL_SIZE)
    }

    /// Fold one click into its cell. Off-grid clicks are ignored.
    /// Returns whether a cell was updated.
    pub fn record(&mut self, pos: Vec2, success: bool) -> bool {
        let Some(idx) = self.index_of(pos) else {
            return false;
        };
        let cell = &mut self.cells[idx];
        let old_count = cell.clicks as f32;
        cell.clicks += 1;
        let hit = if success { 1.0 } else { 0.0 };
        cell.success_rate = (cell.success_rate * old_count + hit) / cell.clicks as f32;
        true
    }

    /// Cell containing `pos`.
    pub fn cell_at(&self, pos: Vec2) -> Option<HeatCell> {
        self.index_of(pos).map(|idx| self.cells[idx])
    }

    /// Center of the most-clicked cell. Ties go to the first in scan order.
    pub fn hotspot(&self) -> Option<Vec2> {
        let mut best: Option<usize> = None;
        let mut max_clicks = 0;
        for (idx, cell) in self.cells.iter().enumerate() {
            if cell.clicks > max_clicks {
                max_clicks = cell.clicks;
                best = Some(idx);
            }
        }
        best.map(|idx| self.center_of(idx))
    }

    /// Centers of cells with at least `min_clicks` clicks and a success
    /// rate below `max_rate`, in scan order.
    pub fn weak_cells(&self, min_clicks: u32, max_rate: f32) -> Vec<Vec2> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.clicks >= min_clicks && c.success_rate < max_rate)
            .map(|(idx, _)| self.center_of(idx))
            .collect()
    }

    pub fn clear(&mut self) {
        self.cells.fill(HeatCell::default());
    }
}
