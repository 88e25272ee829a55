use serde::{Deserialize, Serialize};

/// A near-square display grid sized to hold a requested number of units.
///
/// Columns are fixed first as the nearest integer to the square root of the
/// requested count; rows follow as the ceiling division. The grid may
/// over-provision cells (`columns * rows > count`); the assembler skips the
/// excess by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPlan {
    pub columns: u32,
    pub rows: u32,
}

impl GridPlan {
    /// Plan a grid for `count` units. Non-positive counts fall back to a 1x1 grid.
    pub fn for_count(count: i64) -> Self {
        if count <= 0 {
            return Self {
                columns: 1,
                rows: 1,
            };
        }

        let mut columns = (count as f64).sqrt().round() as u32;
        if columns == 0 {
            columns = 1;
        }

        let rows = (count as u64).div_ceil(columns as u64) as u32;

        Self { columns, rows }
    }

    pub fn cell_count(&self) -> u32 {
        self.columns * self.rows
    }

    /// Iterate every cell in row-major order (row outer, column inner).
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| {
            (0..columns).map(move |column| GridCell {
                column,
                row,
                index: row * columns + column,
            })
        })
    }
}

/// One cell of a [`GridPlan`], with its row-major index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub column: u32,
    pub row: u32,
    pub index: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_holds_requested_count() {
        for n in 1..200i64 {
            let plan = GridPlan::for_count(n);
            assert!(plan.columns >= 1 && plan.rows >= 1);
            assert!(
                (plan.columns as i64) * (plan.rows as i64) >= n,
                "grid {}x{} too small for {}",
                plan.columns,
                plan.rows,
                n
            );
            let expected_columns = ((n as f64).sqrt().round() as u32).max(1);
            assert_eq!(plan.columns, expected_columns);
        }
    }

    #[test]
    fn test_plan_degenerate_counts() {
        assert_eq!(GridPlan::for_count(0), GridPlan { columns: 1, rows: 1 });
        assert_eq!(GridPlan::for_count(-3), GridPlan { columns: 1, rows: 1 });
        assert_eq!(GridPlan::for_count(1), GridPlan { columns: 1, rows: 1 });
    }

    #[test]
    fn test_plan_known_shapes() {
        assert_eq!(GridPlan::for_count(5), GridPlan { columns: 2, rows: 3 });
        assert_eq!(GridPlan::for_count(7), GridPlan { columns: 3, rows: 3 });
        assert_eq!(GridPlan::for_count(12), GridPlan { columns: 3, rows: 4 });
        assert_eq!(GridPlan::for_count(16), GridPlan { columns: 4, rows: 4 });
    }

    #[test]
    fn test_cells_row_major() {
        let plan = GridPlan { columns: 3, rows: 2 };
        let cells: Vec<GridCell> = plan.cells().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], GridCell { column: 0, row: 0, index: 0 });
        assert_eq!(cells[2], GridCell { column: 2, row: 0, index: 2 });
        assert_eq!(cells[3], GridCell { column: 0, row: 1, index: 3 });
        assert_eq!(cells[5], GridCell { column: 2, row: 1, index: 5 });
    }
}
