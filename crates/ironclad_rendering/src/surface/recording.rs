//! Command-list surface.
//!
//! Records every call as a [`DrawCommand`] instead of rasterizing. Used
//! headless by tests, benches and the replay binary, and as the reference
//! for what a real backend receives.

use ironclad_shared::Rect;

use super::{CompositeMode, Paint, Surface, TextStyle};
use crate::color::Color;
use crate::texture_cache::Texture;

/// Which paint a fill or stroke used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintKind {
    /// Flat color.
    Solid,
    /// Linear gradient.
    Linear,
    /// Radial gradient.
    Radial,
}

impl PaintKind {
    fn of(paint: &Paint<'_>) -> Self {
        match paint {
            Paint::Solid(_) => Self::Solid,
            Paint::Linear { .. } => Self::Linear,
            Paint::Radial { .. } => Self::Radial,
        }
    }
}

/// A recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Whole-surface clear.
    Clear {
        /// Clear color.
        color: Color,
    },
    /// Backing store resize.
    Resize {
        /// New width.
        width: u32,
        /// New height.
        height: u32,
    },
    /// Element opacity write.
    ElementOpacity {
        /// New opacity.
        opacity: f32,
    },
    /// State push.
    Save,
    /// State pop.
    Restore,
    /// Translation.
    Translate {
        /// X offset.
        x: f32,
        /// Y offset.
        y: f32,
    },
    /// Rotation.
    Rotate {
        /// Angle in radians.
        angle: f32,
    },
    /// Scale.
    Scale {
        /// X factor.
        sx: f32,
        /// Y factor.
        sy: f32,
    },
    /// Global alpha change.
    Alpha {
        /// New alpha.
        alpha: f32,
    },
    /// Composite change.
    Composite {
        /// New mode.
        mode: CompositeMode,
    },
    /// Dash change.
    LineDash {
        /// Pattern.
        pattern: Vec<f32>,
    },
    /// New path.
    BeginPath,
    /// Sub-path start.
    MoveTo {
        /// X.
        x: f32,
        /// Y.
        y: f32,
    },
    /// Line segment.
    LineTo {
        /// X.
        x: f32,
        /// Y.
        y: f32,
    },
    /// Quadratic segment.
    QuadTo {
        /// Control X.
        cx: f32,
        /// Control Y.
        cy: f32,
        /// End X.
        x: f32,
        /// End Y.
        y: f32,
    },
    /// Arc segment.
    Arc {
        /// Center X.
        x: f32,
        /// Center Y.
        y: f32,
        /// Radius.
        radius: f32,
        /// Start angle.
        start: f32,
        /// End angle.
        end: f32,
    },
    /// Rectangle sub-path.
    Rect {
        /// Bounds.
        bounds: Rect,
    },
    /// Sub-path close.
    ClosePath,
    /// Path fill.
    Fill {
        /// Paint type.
        kind: PaintKind,
        /// Solid color or first gradient stop.
        color: Color,
        /// Global alpha at the time of the fill.
        alpha: f32,
        /// Composite mode at the time of the fill.
        composite: CompositeMode,
    },
    /// Path stroke.
    Stroke {
        /// Paint type.
        kind: PaintKind,
        /// Solid color or first gradient stop.
        color: Color,
        /// Line width.
        width: f32,
        /// Composite mode at the time of the stroke.
        composite: CompositeMode,
    },
    /// Clip to current path.
    Clip,
    /// Texture blit.
    Image {
        /// Texture width.
        width: u32,
        /// Texture height.
        height: u32,
        /// Destination.
        dest: Rect,
        /// Global alpha at the time of the blit.
        alpha: f32,
    },
    /// Filled text.
    FillText {
        /// Content.
        text: String,
        /// X.
        x: f32,
        /// Y.
        y: f32,
        /// Font size.
        size: f32,
        /// Color.
        color: Color,
    },
    /// Outlined text.
    StrokeText {
        /// Content.
        text: String,
        /// X.
        x: f32,
        /// Y.
        y: f32,
        /// Outline width.
        width: f32,
    },
}

#[derive(Debug, Clone, Copy)]
struct State {
    alpha: f32,
    composite: CompositeMode,
}

impl Default for State {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            composite: CompositeMode::SourceOver,
        }
    }
}

/// Surface that records commands.
#[derive(Debug)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
    state: State,
    stack: Vec<State>,
    invalid_geometry: u32,
    unbalanced_restores: u32,
    resizes: u32,
    opacity_writes: u32,
    element_opacity: f32,
}

impl RecordingSurface {
    /// Creates a surface of the given backing size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::with_capacity(4096),
            state: State::default(),
            stack: Vec::with_capacity(16),
            invalid_geometry: 0,
            unbalanced_restores: 0,
            resizes: 0,
            opacity_writes: 0,
            element_opacity: 1.0,
        }
    }

    /// Commands recorded since the last [`Self::clear_commands`].
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drops the recorded commands, keeping counters.
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Takes the recorded commands.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of recorded commands matching `pred`.
    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    /// Number of fills recorded.
    #[must_use]
    pub fn fill_count(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::Fill { .. }))
    }

    /// Paths built with a negative or non-finite radius, size or coordinate.
    #[must_use]
    pub const fn invalid_geometry(&self) -> u32 {
        self.invalid_geometry
    }

    /// `restore` calls without a matching `save`.
    #[must_use]
    pub const fn unbalanced_restores(&self) -> u32 {
        self.unbalanced_restores
    }

    /// Current save depth.
    #[must_use]
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    /// Number of `resize` calls over the surface lifetime.
    #[must_use]
    pub const fn resize_count(&self) -> u32 {
        self.resizes
    }

    /// Number of element-opacity writes over the surface lifetime.
    #[must_use]
    pub const fn opacity_writes(&self) -> u32 {
        self.opacity_writes
    }

    /// Last element opacity written.
    #[must_use]
    pub const fn element_opacity(&self) -> f32 {
        self.element_opacity
    }

    fn check(&mut self, values: &[f32]) {
        if values.iter().any(|v| !v.is_finite()) {
            self.invalid_geometry += 1;
        }
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.resizes += 1;
        self.commands.push(DrawCommand::Resize { width, height });
    }

    fn set_element_opacity(&mut self, opacity: f32) {
        self.element_opacity = opacity;
        self.opacity_writes += 1;
        self.commands.push(DrawCommand::ElementOpacity { opacity });
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear { color });
    }

    fn save(&mut self) {
        self.stack.push(self.state);
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some(state) => self.state = state,
            None => self.unbalanced_restores += 1,
        }
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.check(&[x, y]);
        self.commands.push(DrawCommand::Translate { x, y });
    }

    fn rotate(&mut self, angle: f32) {
        self.check(&[angle]);
        self.commands.push(DrawCommand::Rotate { angle });
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.check(&[sx, sy]);
        self.commands.push(DrawCommand::Scale { sx, sy });
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha;
        self.commands.push(DrawCommand::Alpha { alpha });
    }

    fn set_composite(&mut self, mode: CompositeMode) {
        self.state.composite = mode;
        self.commands.push(DrawCommand::Composite { mode });
    }

    fn set_line_dash(&mut self, pattern: &[f32]) {
        self.commands.push(DrawCommand::LineDash {
            pattern: pattern.to_vec(),
        });
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.check(&[x, y]);
        self.commands.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.check(&[x, y]);
        self.commands.push(DrawCommand::LineTo { x, y });
    }

    fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        self.check(&[cx, cy, x, y]);
        self.commands.push(DrawCommand::QuadTo { cx, cy, x, y });
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32) {
        if radius < 0.0 {
            self.invalid_geometry += 1;
        }
        self.check(&[x, y, radius, start, end]);
        self.commands.push(DrawCommand::Arc {
            x,
            y,
            radius,
            start,
            end,
        });
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if width < 0.0 || height < 0.0 {
            self.invalid_geometry += 1;
        }
        self.check(&[x, y, width, height]);
        self.commands.push(DrawCommand::Rect {
            bounds: Rect::new(x, y, width, height),
        });
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn fill(&mut self, paint: &Paint<'_>) {
        self.commands.push(DrawCommand::Fill {
            kind: PaintKind::of(paint),
            color: paint.dominant(),
            alpha: self.state.alpha,
            composite: self.state.composite,
        });
    }

    fn stroke(&mut self, paint: &Paint<'_>, width: f32) {
        self.check(&[width]);
        self.commands.push(DrawCommand::Stroke {
            kind: PaintKind::of(paint),
            color: paint.dominant(),
            width,
            composite: self.state.composite,
        });
    }

    fn clip(&mut self) {
        self.commands.push(DrawCommand::Clip);
    }

    fn draw_image(&mut self, texture: &Texture, dest: Rect) {
        self.check(&[dest.x, dest.y, dest.width, dest.height]);
        self.commands.push(DrawCommand::Image {
            width: texture.width,
            height: texture.height,
            dest,
            alpha: self.state.alpha,
        });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle, color: Color) {
        self.check(&[x, y]);
        self.commands.push(DrawCommand::FillText {
            text: text.to_owned(),
            x,
            y,
            size: style.size,
            color,
        });
    }

    fn stroke_text(&mut self, text: &str, x: f32, y: f32, _style: &TextStyle, _color: Color, width: f32) {
        self.check(&[x, y]);
        self.commands.push(DrawCommand::StrokeText {
            text: text.to_owned(),
            x,
            y,
            width,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_radius_counts_as_invalid() {
        let mut s = RecordingSurface::new(10, 10);
        s.begin_path();
        s.arc(0.0, 0.0, -1.0, 0.0, 1.0);
        s.rect(0.0, 0.0, f32::NAN, 1.0);
        assert_eq!(s.invalid_geometry(), 2);
    }

    #[test]
    fn test_fill_captures_state() {
        let mut s = RecordingSurface::new(10, 10);
        s.save();
        s.set_alpha(0.5);
        s.set_composite(CompositeMode::Lighter);
        s.fill(&Paint::Solid(Color::WHITE));
        s.restore();
        s.fill(&Paint::Solid(Color::WHITE));
        let fills: Vec<_> = s
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Fill { alpha, composite, .. } => Some((*alpha, *composite)),
                _ => None,
            })
            .collect();
        assert_eq!(fills, vec![(0.5, CompositeMode::Lighter), (1.0, CompositeMode::SourceOver)]);
        assert_eq!(s.save_depth(), 0);
    }
}
