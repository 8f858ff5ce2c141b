//! Figure selection on a rendered page image
//!
//! The user drags a rectangle over a page image to crop a figure. Pointer
//! positions arrive in pixels relative to the image surface; the backend
//! wants the rectangle normalized to `[0, 1]` on both axes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Normalized width and height must each exceed this to count as a selection
pub const MIN_SELECTION_EXTENT: f64 = 0.02;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    #[error("selection surface must have a positive size, got {width}x{height}")]
    InvalidSurface { width: f64, height: f64 },

    #[error("selection too small ({width:.3} x {height:.3}), drag a larger area")]
    TooSmall { width: f64, height: f64 },

    #[error("no selection in progress")]
    NotSelecting,
}

/// A pointer position in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Size of the surface the drag happens on, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
}

impl Surface {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn validate(self) -> Result<Self, SelectionError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(self.width) && valid(self.height) {
            Ok(self)
        } else {
            Err(SelectionError::InvalidSurface {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Rectangle in surface pixels, used for the live selection box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    /// Box spanned by two corners, in any drag direction
    pub fn spanning(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }
}

/// Selection normalized to the surface, every field in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SelectionRect {
    /// Normalize a drag from `start` to `end` and reject tiny selections
    ///
    /// Points outside the surface are clamped to its edges.
    pub fn from_drag(start: Point, end: Point, surface: Surface) -> Result<Self, SelectionError> {
        let surface = surface.validate()?;
        let clamp = |p: Point| {
            Point::new(
                p.x.clamp(0.0, surface.width),
                p.y.clamp(0.0, surface.height),
            )
        };
        let px = PixelRect::spanning(clamp(start), clamp(end));

        let rect = Self {
            x: px.left / surface.width,
            y: px.top / surface.height,
            width: px.width / surface.width,
            height: px.height / surface.height,
        };

        if rect.width > MIN_SELECTION_EXTENT && rect.height > MIN_SELECTION_EXTENT {
            Ok(rect)
        } else {
            Err(SelectionError::TooSmall {
                width: rect.width,
                height: rect.height,
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Dragging { start: Point },
}

/// Pointer-drag state machine for the selection overlay
#[derive(Debug, Clone)]
pub struct SelectionTool {
    surface: Surface,
    state: DragState,
}

impl SelectionTool {
    pub fn new(surface: Surface) -> Self {
        Self {
            surface,
            state: DragState::Idle,
        }
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Pointer down: start a new selection, discarding any unfinished one
    pub fn press(&mut self, at: Point) {
        self.state = DragState::Dragging { start: at };
    }

    /// Pointer move: the box to draw, or `None` when not dragging
    pub fn drag(&self, to: Point) -> Option<PixelRect> {
        match self.state {
            DragState::Dragging { start } => Some(PixelRect::spanning(start, to)),
            DragState::Idle => None,
        }
    }

    /// Pointer up: finish the selection
    ///
    /// The tool returns to idle whether or not the selection is accepted.
    pub fn release(&mut self, at: Point) -> Result<SelectionRect, SelectionError> {
        let DragState::Dragging { start } = std::mem::replace(&mut self.state, DragState::Idle)
        else {
            return Err(SelectionError::NotSelecting);
        };
        SelectionRect::from_drag(start, at, self.surface)
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

/// Request body for cropping a figure out of a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureRequest {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub figure_name: String,
}

impl FigureRequest {
    /// Build a crop request; a missing or blank name becomes `Figure_{page}`
    pub fn new(rect: SelectionRect, page_number: u32, name: Option<&str>) -> Self {
        let figure_name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Figure_{}", page_number),
        };
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            figure_name,
        }
    }
}
