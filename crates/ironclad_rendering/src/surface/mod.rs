//! # Drawing Surface Contract
//!
//! The minimum primitive set the host surface must provide. Everything the
//! renderer draws is expressed through [`Surface`]; the design is otherwise
//! surface-agnostic.
//!
//! ```text
//! ┌───────────────┐   paths, paints, text   ┌──────────────────┐
//! │ Scene / Tank  │ ──────────────────────> │  dyn Surface     │
//! │ Effects / Map │                         │  (canvas, GPU,   │
//! └───────────────┘                         │   recording)     │
//!                                           └──────────────────┘
//! ```

mod recording;

pub use recording::{DrawCommand, PaintKind, RecordingSurface};

use ironclad_shared::{Rect, Vec2};

use crate::color::Color;
use crate::texture_cache::Texture;

/// Blend mode for subsequent fills and strokes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompositeMode {
    /// Normal alpha blending.
    #[default]
    SourceOver,
    /// Additive ("lighter"), used for glows.
    Lighter,
}

/// One gradient stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Position in `[0, 1]`.
    pub offset: f32,
    /// Color at this stop.
    pub color: Color,
}

impl ColorStop {
    /// Creates a stop.
    #[must_use]
    pub const fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Fill or stroke source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint<'a> {
    /// Flat color.
    Solid(Color),
    /// Gradient along a line.
    Linear {
        /// Start point.
        from: Vec2,
        /// End point.
        to: Vec2,
        /// Stops, ascending.
        stops: &'a [ColorStop],
    },
    /// Gradient between two circles.
    Radial {
        /// Center of the inner circle.
        inner_center: Vec2,
        /// Radius of the inner circle.
        inner_radius: f32,
        /// Center of the outer circle.
        outer_center: Vec2,
        /// Radius of the outer circle.
        outer_radius: f32,
        /// Stops, ascending.
        stops: &'a [ColorStop],
    },
}

impl Paint<'_> {
    /// Color of the first stop, or the solid color.
    #[must_use]
    pub fn dominant(&self) -> Color {
        match self {
            Self::Solid(c) => *c,
            Self::Linear { stops, .. } | Self::Radial { stops, .. } => {
                stops.first().map_or(Color::TRANSPARENT, |s| s.color)
            }
        }
    }
}

/// Horizontal text anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAlign {
    /// Anchor at the left edge.
    Left,
    /// Anchor at the center.
    #[default]
    Center,
    /// Anchor at the right edge.
    Right,
}

/// Font parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Pixel size.
    pub size: f32,
    /// Bold weight.
    pub bold: bool,
    /// Use monospace font.
    pub monospace: bool,
    /// Anchor.
    pub align: TextAlign,
}

impl TextStyle {
    /// Centered regular text of `size`.
    #[must_use]
    pub const fn new(size: f32) -> Self {
        Self {
            size,
            bold: false,
            monospace: false,
            align: TextAlign::Center,
        }
    }

    /// Bold variant.
    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Monospace variant.
    #[must_use]
    pub const fn monospace(mut self) -> Self {
        self.monospace = true;
        self
    }
}

/// 2D raster surface with a canvas-style immediate API.
///
/// Angles are radians, coordinates are surface pixels after the current
/// transform. Implementations must tolerate any finite input; callers
/// clamp radii and sizes to zero before building paths.
pub trait Surface {
    /// Backing size in physical pixels.
    fn size(&self) -> (u32, u32);
    /// Resizes the backing store.
    fn resize(&mut self, width: u32, height: u32);
    /// Opacity of the surface element itself.
    fn set_element_opacity(&mut self, opacity: f32);

    /// Fills the whole surface, ignoring the transform.
    fn clear(&mut self, color: Color);

    /// Pushes transform, alpha, composite, dash and clip state.
    fn save(&mut self);
    /// Pops the state pushed by the matching [`Surface::save`].
    fn restore(&mut self);
    /// Translates the current transform.
    fn translate(&mut self, x: f32, y: f32);
    /// Rotates the current transform.
    fn rotate(&mut self, angle: f32);
    /// Scales the current transform.
    fn scale(&mut self, sx: f32, sy: f32);

    /// Global alpha for subsequent operations.
    fn set_alpha(&mut self, alpha: f32);
    /// Composite mode for subsequent operations.
    fn set_composite(&mut self, mode: CompositeMode);
    /// Dash pattern for strokes; empty for solid.
    fn set_line_dash(&mut self, pattern: &[f32]);

    /// Starts a new path.
    fn begin_path(&mut self);
    /// Starts a sub-path.
    fn move_to(&mut self, x: f32, y: f32);
    /// Straight segment.
    fn line_to(&mut self, x: f32, y: f32);
    /// Quadratic curve.
    fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32);
    /// Circular arc from `start` to `end`, clockwise.
    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32);
    /// Closed rectangle sub-path.
    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    /// Closes the current sub-path.
    fn close_path(&mut self);

    /// Fills the current path.
    fn fill(&mut self, paint: &Paint<'_>);
    /// Strokes the current path.
    fn stroke(&mut self, paint: &Paint<'_>, width: f32);
    /// Intersects the clip region with the current path.
    fn clip(&mut self);

    /// Blits a texture into `dest` with the current alpha.
    fn draw_image(&mut self, texture: &Texture, dest: Rect);
    /// Fills glyphs.
    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle, color: Color);
    /// Strokes glyph outlines.
    fn stroke_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle, color: Color, width: f32);
}
