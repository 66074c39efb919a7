//! Dense cell-layer storage backing the authoritative board state.

use fenceline_core::{BoardLayout, CellClass, CellCoord};

/// Dense per-cell class grid.
///
/// Slots hold `None` for cells outside every configured layer ("void"), so
/// callers can distinguish unclassified gaps from secured or capturable
/// ground. A cell listed in several layers resolves in border-then-land
/// order; the border layer is immutable after installation.
#[derive(Clone, Debug, Default)]
pub(crate) struct ClassGrid {
    columns: u32,
    rows: u32,
    cells: Vec<Option<CellClass>>,
}

impl ClassGrid {
    pub(crate) fn from_layout(layout: &BoardLayout) -> Self {
        let capacity_u64 = u64::from(layout.columns()) * u64::from(layout.rows());
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        let mut grid = Self {
            columns: layout.columns(),
            rows: layout.rows(),
            cells: vec![None; capacity],
        };

        for &cell in layout.border() {
            grid.install(cell, CellClass::Border);
        }
        for &cell in layout.land() {
            grid.install(cell, CellClass::Land);
        }

        grid
    }

    fn install(&mut self, cell: CellCoord, class: CellClass) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                if slot.is_none() {
                    *slot = Some(class);
                }
            }
        }
    }

    pub(crate) fn class_of(&self, cell: CellCoord) -> Option<CellClass> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Applies the one-way `Land -> Cleared` transition. Returns whether the
    /// cell actually transitioned; border, cleared, and void cells are left
    /// untouched.
    pub(crate) fn reclassify_land_to_cleared(&mut self, cell: CellCoord) -> bool {
        let Some(index) = self.index(cell) else {
            return false;
        };
        match self.cells.get_mut(index) {
            Some(slot @ Some(CellClass::Land)) => {
                *slot = Some(CellClass::Cleared);
                true
            }
            _ => false,
        }
    }

    /// Enumerates the cells holding the provided class in row-major order.
    pub(crate) fn cells_of_class(&self, class: CellClass) -> Vec<CellCoord> {
        let mut matches = Vec::new();
        for row in 0..self.rows {
            for column in 0..self.columns {
                let cell = CellCoord::new(column, row);
                if self.class_of(cell) == Some(class) {
                    matches.push(cell);
                }
            }
        }
        matches
    }

    pub(crate) fn cells(&self) -> &[Option<CellClass>] {
        &self.cells
    }

    pub(crate) fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Dense boolean grid for the obstacle layer consulted by the step probe.
#[derive(Clone, Debug, Default)]
pub(crate) struct ObstacleGrid {
    columns: u32,
    rows: u32,
    cells: Vec<bool>,
}

impl ObstacleGrid {
    pub(crate) fn from_layout(layout: &BoardLayout) -> Self {
        let capacity_u64 = u64::from(layout.columns()) * u64::from(layout.rows());
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        let mut grid = Self {
            columns: layout.columns(),
            rows: layout.rows(),
            cells: vec![false; capacity],
        };

        for &cell in layout.obstacles() {
            if let Some(index) = grid.index(cell) {
                if let Some(slot) = grid.cells.get_mut(index) {
                    *slot = true;
                }
            }
        }

        grid
    }

    pub(crate) fn blocked(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .map_or(false, |index| self.cells.get(index).copied().unwrap_or(false))
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
