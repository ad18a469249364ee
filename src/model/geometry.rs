//! Page rectangles.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::PdfValue;
use crate::error::{Error, Result};

/// A rectangle in default user space units (points), `[x0 y0 x1 y1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Build from a 4-element numeric PDF array.
    ///
    /// Corners are normalized so that `x0 <= x1` and `y0 <= y1`.
    pub fn from_values(values: &[PdfValue]) -> Result<Self> {
        if values.len() != 4 {
            return Err(Error::InvalidObject(format!(
                "expected 4-element rectangle, got {} elements",
                values.len()
            )));
        }
        let mut n = [0.0f32; 4];
        for (slot, value) in n.iter_mut().zip(values) {
            *slot = value.as_f32().ok_or_else(|| {
                Error::InvalidObject(format!("rectangle entry is not a number: {}", value))
            })?;
        }
        Ok(Self::new(
            n[0].min(n[2]),
            n[1].min(n[3]),
            n[0].max(n[2]),
            n[1].max(n[3]),
        ))
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.x0, self.y0, self.x1, self.y1]
    }

    /// Width and height in millimetres.
    pub fn size_mm(&self) -> (f32, f32) {
        const MM_PER_POINT: f32 = 25.4 / 72.0;
        (self.width() * MM_PER_POINT, self.height() * MM_PER_POINT)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.x0, self.y0, self.x1, self.y1)
    }
}
