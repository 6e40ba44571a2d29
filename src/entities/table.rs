//! ACAD_TABLE

use crate::document::ResolvedRef;
use crate::types::{Handle, Vector3};

/// ACAD_TABLE; cell contents are kept as text in row-major order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AcadTable {
    /// Block holding the rendered table (2)
    pub block_name: Option<String>,
    /// Table style (342)
    pub style: ResolvedRef,
    /// Block record (343)
    pub block_record: Option<Handle>,
    pub insertion: Vector3,
    /// Horizontal direction (11)
    pub direction: Vector3,
    pub rows: i32,
    pub columns: i32,
    /// Row heights (141)
    pub row_heights: Vec<f64>,
    /// Column widths (142)
    pub column_widths: Vec<f64>,
    /// Cell text (1, continued by 2/3)
    pub cell_text: Vec<String>,
}

impl AcadTable {
    /// Text of the cell at `row`, `column` when the table is dense
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        let columns = usize::try_from(self.columns).ok()?;
        if column >= columns {
            return None;
        }
        self.cell_text.get(row * columns + column).map(String::as_str)
    }
}
