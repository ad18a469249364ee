//! Axis-aligned transforms set with `cm`.

use crate::error::{Error, Result};

/// A scale-and-translate mapping: `(x, y) -> (sx*x + tx, sy*y + ty)`.
///
/// AliveCor pages only ever use `cm` matrices without shear or rotation,
/// so the general 3x3 matrix is not needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphicsMap {
    pub sx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for GraphicsMap {
    fn default() -> Self {
        Self::identity()
    }
}

impl GraphicsMap {
    pub fn new(sx: f64, sy: f64, tx: f64, ty: f64) -> Self {
        Self { sx, sy, tx, ty }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 1.0, 0.0, 0.0)
    }

    /// Build from the six `cm` operands `a b c d e f`.
    ///
    /// `index` is the operator position used in error reports.
    pub fn from_cm(operands: &[f64], index: usize) -> Result<Self> {
        match operands {
            [a, b, c, d, e, f] if *b == 0.0 && *c == 0.0 => Ok(Self::new(*a, *d, *e, *f)),
            [_, _, _, _, _, _] => Err(Error::ecg(
                index,
                format!("cm matrix {:?} has shear or rotation", operands),
            )),
            _ => Err(Error::ecg(
                index,
                format!("cm expects 6 operands, got {}", operands.len()),
            )),
        }
    }

    pub fn map(&self, x: f64, y: f64) -> (f64, f64) {
        (self.sx * x + self.tx, self.sy * y + self.ty)
    }
}
