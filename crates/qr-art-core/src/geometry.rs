use crate::StyleError;

/// Pixel geometry of a styled QR canvas.
///
/// Every canvas in one generation run (resized background, QR layer, final
/// image) is `total_size x total_size`, with
/// `total_size = (matrix_size + 2 * border) * box_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    matrix_size: u32,
    border: u32,
    box_size: u32,
    total_size: u32,
}

/// Square pixel region of one module, `[x0, x1) x [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Layout {
    pub fn new(matrix_size: u32, border: u32, box_size: u32) -> Result<Self, StyleError> {
        if box_size == 0 {
            return Err(StyleError::InvalidGeometry("box size must be positive".into()));
        }

        let total_size = border
            .checked_mul(2)
            .and_then(|b| b.checked_add(matrix_size))
            .and_then(|modules| modules.checked_mul(box_size))
            // imageproc draws with i32 coordinates
            .filter(|&size| size <= i32::MAX as u32)
            .ok_or_else(|| {
                StyleError::InvalidGeometry(format!(
                    "canvas size overflows: ({} + 2 * {}) * {}",
                    matrix_size, border, box_size
                ))
            })?;

        Ok(Self {
            matrix_size,
            border,
            box_size,
            total_size,
        })
    }

    pub fn matrix_size(&self) -> u32 {
        self.matrix_size
    }

    pub fn border(&self) -> u32 {
        self.border
    }

    pub fn box_size(&self) -> u32 {
        self.box_size
    }

    /// Side length in pixels of every canvas.
    pub fn total_size(&self) -> u32 {
        self.total_size
    }

    /// Pixel region of matrix cell `(x, y)`, border offset applied.
    pub fn cell_rect(&self, x: u32, y: u32) -> CellRect {
        let x0 = (x + self.border) * self.box_size;
        let y0 = (y + self.border) * self.box_size;
        CellRect {
            x0,
            y0,
            x1: x0 + self.box_size,
            y1: y0 + self.box_size,
        }
    }

    /// Sampling point and dot center of matrix cell `(x, y)`.
    pub fn cell_center(&self, x: u32, y: u32) -> (u32, u32) {
        let rect = self.cell_rect(x, y);
        (rect.x0 + self.box_size / 2, rect.y0 + self.box_size / 2)
    }

    /// Radius of the dot inscribed in a cell. Keeps `center ± radius` inside
    /// the cell for both odd and even box sizes.
    ///
    /// For even box sizes the dot is `box_size - 1` pixels across and leaves
    /// the first row and column of the cell empty. `box_size = 2` yields a
    /// single-pixel dot; `box_size = 1` fills the whole cell.
    pub fn dot_radius(&self) -> u32 {
        (self.box_size - 1) / 2
    }
}
