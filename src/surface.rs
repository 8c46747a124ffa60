//! 2D stroke surface the renderer draws into.
//!
//! [`Surface`] is the small subset of a canvas-style 2D context the starfield
//! needs. [`LineBatch`] implements it by turning every stroked path into
//! [`LineInstance`]s, which the GPU pipeline draws as instanced quads.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};

/// How the ends of a stroked segment are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    /// Ends exactly at the endpoints.
    #[default]
    Butt,
    /// Half-disc of radius `width / 2` at each end.
    Round,
    /// Half-square extension of `width / 2` at each end.
    Square,
}

impl LineCap {
    fn to_gpu(self) -> u32 {
        match self {
            LineCap::Butt => 0,
            LineCap::Round => 1,
            LineCap::Square => 2,
        }
    }
}

/// Canvas-style stroke API, sized in device pixels.
pub trait Surface {
    /// Surface size in device pixels.
    fn size(&self) -> Vec2;

    /// Erase everything inside the rectangle.
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Start a new path, discarding any unstroked one.
    fn begin_path(&mut self);

    fn move_to(&mut self, x: f32, y: f32);

    fn line_to(&mut self, x: f32, y: f32);

    /// Stroke the current path with the current style.
    fn stroke(&mut self);

    fn set_line_width(&mut self, width: f32);

    fn set_line_cap(&mut self, cap: LineCap);

    fn set_global_alpha(&mut self, alpha: f32);

    /// Set the stroke color (RGB, 0.0-1.0).
    fn set_stroke_color(&mut self, rgb: [f32; 3]);
}

/// One stroked segment as uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LineInstance {
    pub start: [f32; 2],
    pub end: [f32; 2],
    /// RGB plus alpha.
    pub color: [f32; 4],
    pub width: f32,
    pub cap: u32,
    pub _pad: [f32; 2],
}

#[derive(Debug, Clone, Copy)]
struct StrokeStyle {
    width: f32,
    cap: LineCap,
    alpha: f32,
    color: [f32; 3],
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            cap: LineCap::Butt,
            alpha: 1.0,
            color: [0.0, 0.0, 0.0],
        }
    }
}

/// A [`Surface`] that records strokes as GPU line instances.
#[derive(Debug, Default)]
pub struct LineBatch {
    size: Vec2,
    style: StrokeStyle,
    /// Subpaths of the current path, each a polyline.
    path: Vec<Vec<Vec2>>,
    instances: Vec<LineInstance>,
}

impl LineBatch {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            ..Default::default()
        }
    }

    /// Resize the surface. Like a canvas, this also drops the contents.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
        self.instances.clear();
    }

    /// Segments stroked since the last clear.
    pub fn instances(&self) -> &[LineInstance] {
        &self.instances
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl Surface for LineBatch {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if x <= 0.0 && y <= 0.0 && x + width >= self.size.x && y + height >= self.size.y {
            self.instances.clear();
            return;
        }
        // Partial clears drop segments lying fully inside the rectangle.
        let inside = |p: [f32; 2]| p[0] >= x && p[0] <= x + width && p[1] >= y && p[1] <= y + height;
        self.instances.retain(|line| !(inside(line.start) && inside(line.end)));
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.path.push(vec![Vec2::new(x, y)]);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = Vec2::new(x, y);
        match self.path.last_mut() {
            Some(subpath) => subpath.push(p),
            // A canvas treats a leading lineTo as moveTo.
            None => self.path.push(vec![p]),
        }
    }

    fn stroke(&mut self) {
        let style = self.style;
        if style.alpha <= 0.0 || style.width <= 0.0 {
            return;
        }
        let color = Vec4::new(style.color[0], style.color[1], style.color[2], style.alpha);
        for subpath in &self.path {
            for pair in subpath.windows(2) {
                self.instances.push(LineInstance {
                    start: pair[0].to_array(),
                    end: pair[1].to_array(),
                    color: color.to_array(),
                    width: style.width,
                    cap: style.cap.to_gpu(),
                    _pad: [0.0; 2],
                });
            }
        }
    }

    fn set_line_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.style.width = width;
        }
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.style.cap = cap;
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        if alpha.is_finite() {
            self.style.alpha = alpha.clamp(0.0, 1.0);
        }
    }

    fn set_stroke_color(&mut self, rgb: [f32; 3]) {
        self.style.color = rgb;
    }
}
