//! Matrix traversal orders

use super::Generator;
use crate::errors::{TraceResult, ValidationError};
use crate::snapshot::{
    elements_from, empty_sequence, ElementStatus, EventKind, Narrative, StepSequence,
    TraceRecorder,
};

/// Order in which cells are visited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixOrder {
    Row,
    Column,
    /// Rows left-to-right then right-to-left, alternating
    Snake,
    /// Clockwise from the top-left corner inwards
    Spiral,
    /// Anti-diagonals from the top-left corner
    Diagonal,
}

impl MatrixOrder {
    pub fn parse(name: &str) -> TraceResult<Self> {
        match name {
            "row" => Ok(MatrixOrder::Row),
            "column" | "col" => Ok(MatrixOrder::Column),
            "snake" => Ok(MatrixOrder::Snake),
            "spiral" => Ok(MatrixOrder::Spiral),
            "diagonal" => Ok(MatrixOrder::Diagonal),
            other => Err(ValidationError::UnknownName {
                field: "matrix.order",
                name: other.to_string(),
            }),
        }
    }

    fn label(self) -> &'static str {
        match self {
            MatrixOrder::Row => "row-major",
            MatrixOrder::Column => "column-major",
            MatrixOrder::Snake => "snake",
            MatrixOrder::Spiral => "spiral",
            MatrixOrder::Diagonal => "diagonal",
        }
    }
}

/// Cell coordinates in visiting order
pub fn visit_order(rows: usize, cols: usize, order: MatrixOrder) -> Vec<(usize, usize)> {
    let mut cells = Vec::with_capacity(rows * cols);
    if rows == 0 || cols == 0 {
        return cells;
    }

    match order {
        MatrixOrder::Row => {
            for r in 0..rows {
                for c in 0..cols {
                    cells.push((r, c));
                }
            }
        }
        MatrixOrder::Column => {
            for c in 0..cols {
                for r in 0..rows {
                    cells.push((r, c));
                }
            }
        }
        MatrixOrder::Snake => {
            for r in 0..rows {
                if r % 2 == 0 {
                    cells.extend((0..cols).map(|c| (r, c)));
                } else {
                    cells.extend((0..cols).rev().map(|c| (r, c)));
                }
            }
        }
        MatrixOrder::Spiral => {
            let (mut top, mut bottom) = (0isize, rows as isize - 1);
            let (mut left, mut right) = (0isize, cols as isize - 1);
            while top <= bottom && left <= right {
                for c in left..=right {
                    cells.push((top as usize, c as usize));
                }
                top += 1;
                for r in top..=bottom {
                    cells.push((r as usize, right as usize));
                }
                right -= 1;
                if top <= bottom {
                    for c in (left..=right).rev() {
                        cells.push((bottom as usize, c as usize));
                    }
                    bottom -= 1;
                }
                if left <= right {
                    for r in (top..=bottom).rev() {
                        cells.push((r as usize, left as usize));
                    }
                    left += 1;
                }
            }
        }
        MatrixOrder::Diagonal => {
            for d in 0..rows + cols - 1 {
                let first = d.saturating_sub(cols - 1);
                let last = d.min(rows - 1);
                for r in first..=last {
                    cells.push((r, d - r));
                }
            }
        }
    }

    cells
}

/// Traverse a rectangular matrix in a chosen order
#[derive(Debug, Clone)]
pub struct MatrixTraversal {
    pub matrix: Vec<Vec<i64>>,
    pub order: MatrixOrder,
}

impl MatrixTraversal {
    pub fn new(matrix: Vec<Vec<i64>>, order: MatrixOrder) -> Self {
        MatrixTraversal { matrix, order }
    }

    fn validate(&self) -> TraceResult<(usize, usize)> {
        let rows = self.matrix.len();
        let cols = self.matrix.first().map_or(0, |row| row.len());
        for (row, cells) in self.matrix.iter().enumerate() {
            if cells.len() != cols {
                return Err(ValidationError::RaggedMatrix {
                    row,
                    expected: cols,
                    got: cells.len(),
                });
            }
        }
        Ok((rows, cols))
    }
}

impl Generator for MatrixTraversal {
    fn name(&self) -> &str {
        "matrix traversal"
    }

    fn generate(&self) -> TraceResult<StepSequence> {
        let (rows, cols) = self.validate()?;
        if rows == 0 || cols == 0 {
            return Ok(empty_sequence("matrix"));
        }

        let flat: Vec<i64> = self.matrix.iter().flatten().copied().collect();
        let mut rec = TraceRecorder::new(elements_from(&flat));
        rec.emit(
            EventKind::Start,
            Vec::new(),
            Narrative::new(
                "Start",
                format!(
                    "Traverse a {}x{} matrix in {} order.",
                    rows,
                    cols,
                    self.order.label()
                ),
            )
            .var("rows", rows)
            .var("cols", cols)
            .var("visited", 0),
        );

        let mut previous: Option<usize> = None;
        for (count, (r, c)) in visit_order(rows, cols, self.order).into_iter().enumerate() {
            let index = r * cols + c;
            if let Some(prev) = previous {
                rec.mark(prev, ElementStatus::Visiting);
            }
            rec.mark(index, ElementStatus::Pivot);
            rec.emit(
                EventKind::Visit,
                vec![index],
                Narrative::new(
                    format!("Visit ({}, {})", r, c),
                    format!("Cell ({}, {}) holds {}.", r, c, flat[index]),
                )
                .var("row", r)
                .var("col", c)
                .var("visited", count + 1),
            );
            previous = Some(index);
        }

        rec.mark_all(ElementStatus::Visiting);
        rec.emit(
            EventKind::Done,
            Vec::new(),
            Narrative::new("Done", "Every cell has been visited.").var("visited", flat.len()),
        );
        Ok(rec.finish())
    }
}
