//! `ScratchSurface` backed by an HTML `<canvas>` 2D context.
//!
//! Logical coordinates are scaled to the canvas's pixel size on every call,
//! so the backing store can be resized (e.g. for device pixel ratio) without
//! touching the scratch engine.

use sm_core::Point;
use sm_render::palette::css_color;
use sm_render::surface::{ColorStop, LinearGradient, RadialGradient, ScratchSurface, SurfaceError};
use wasm_bindgen::JsValue;
use web_sys::{CanvasGradient, CanvasRenderingContext2d};

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    logical_size: f64,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d, logical_size: f64) -> Self {
        Self { ctx, logical_size }
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    /// Backing-store size in device pixels.
    fn pixel_size(&self) -> (f64, f64) {
        match self.ctx.canvas() {
            Some(canvas) => (canvas.width() as f64, canvas.height() as f64),
            None => (0.0, 0.0),
        }
    }

    fn to_pixels(&self, p: Point) -> (f64, f64) {
        let (w, h) = self.pixel_size();
        (p.x / self.logical_size * w, p.y / self.logical_size * h)
    }

    /// Scale a logical length; uses the horizontal axis.
    fn length_to_pixels(&self, len: f64) -> f64 {
        len / self.logical_size * self.pixel_size().0
    }

    fn add_stops(gradient: &CanvasGradient, stops: &[ColorStop]) -> Result<(), SurfaceError> {
        for (offset, color) in stops {
            gradient
                .add_color_stop(*offset, &css_color(*color))
                .map_err(backend)?;
        }
        Ok(())
    }

    fn fill_all(&self) {
        let (w, h) = self.pixel_size();
        self.ctx.fill_rect(0.0, 0.0, w, h);
    }
}

fn backend(err: JsValue) -> SurfaceError {
    SurfaceError::Backend(format!("{err:?}"))
}

impl ScratchSurface for CanvasSurface {
    fn logical_size(&self) -> f64 {
        self.logical_size
    }

    fn fill_linear(&mut self, gradient: &LinearGradient) -> Result<(), SurfaceError> {
        let (x0, y0) = self.to_pixels(gradient.start);
        let (x1, y1) = self.to_pixels(gradient.end);
        let grad = self.ctx.create_linear_gradient(x0, y0, x1, y1);
        Self::add_stops(&grad, &gradient.stops)?;
        self.ctx
            .set_global_composite_operation("source-over")
            .map_err(backend)?;
        self.ctx.set_fill_style_canvas_gradient(&grad);
        self.fill_all();
        Ok(())
    }

    fn fill_radial(&mut self, gradient: &RadialGradient, alpha: f64) -> Result<(), SurfaceError> {
        let (x0, y0) = self.to_pixels(gradient.start_center);
        let (x1, y1) = self.to_pixels(gradient.end_center);
        let r0 = self.length_to_pixels(gradient.start_radius);
        let r1 = self.length_to_pixels(gradient.end_radius);
        let grad = self
            .ctx
            .create_radial_gradient(x0, y0, r0, x1, y1, r1)
            .map_err(backend)?;
        Self::add_stops(&grad, &gradient.stops)?;

        self.ctx.save();
        let result = self
            .ctx
            .set_global_composite_operation("source-over")
            .map_err(backend);
        if result.is_ok() {
            self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0));
            self.ctx.set_fill_style_canvas_gradient(&grad);
            self.fill_all();
        }
        self.ctx.restore();
        result
    }

    fn erase_circle(&mut self, center: Point, radius: f64) -> Result<(), SurfaceError> {
        let (cx, cy) = self.to_pixels(center);
        let r = self.length_to_pixels(radius);
        self.ctx.save();
        let result = self
            .ctx
            .set_global_composite_operation("destination-out")
            .and_then(|()| {
                self.ctx.begin_path();
                self.ctx.arc(cx, cy, r, 0.0, std::f64::consts::TAU)
            })
            .map(|()| {
                self.ctx.set_fill_style_str("#000");
                self.ctx.fill();
            })
            .map_err(backend);
        self.ctx.restore();
        result
    }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        let (w, h) = self.pixel_size();
        self.ctx.clear_rect(0.0, 0.0, w, h);
        Ok(())
    }

    fn alpha_at(&self, p: Point) -> Result<u8, SurfaceError> {
        let (w, h) = self.pixel_size();
        let (x, y) = self.to_pixels(p);
        if !(0.0..w).contains(&x) || !(0.0..h).contains(&y) {
            return Err(SurfaceError::OutOfBounds { x: p.x, y: p.y });
        }
        let data = self
            .ctx
            .get_image_data(x.floor(), y.floor(), 1.0, 1.0)
            .map_err(backend)?;
        data.data()
            .get(3)
            .copied()
            .ok_or_else(|| SurfaceError::Backend("empty image data".into()))
    }
}
