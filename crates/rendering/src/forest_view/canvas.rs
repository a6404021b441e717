//! CPU pixel buffer the forest is painted into before upload.

use simulation::palette::Rgba;
use simulation::scene::Viewport;

/// Row-major RGBA pixels at logical resolution.
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl PixelCanvas {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            width: viewport.width,
            height: viewport.height,
            pixels: vec![[0, 0, 0, 255]; viewport.pixel_count()],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    /// Reallocate for a new size. Contents are cleared.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport() {
            return;
        }
        self.width = viewport.width;
        self.height = viewport.height;
        self.pixels.clear();
        self.pixels.resize(viewport.pixel_count(), [0, 0, 0, 255]);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Flat byte view, ready for an `Rgba8UnormSrgb` texture.
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_flattened()
    }

    /// Fill a rectangle, clipped to the canvas. Degenerate or fully
    /// off-canvas rectangles are ignored.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
        if w <= 0 || h <= 0 {
            return;
        }
        let x0 = x.max(0) as i64;
        let y0 = y.max(0) as i64;
        let x1 = (x as i64 + w as i64).min(self.width as i64);
        let y1 = (y as i64 + h as i64).min(self.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let stride = self.width as usize;
        for py in y0 as usize..y1 as usize {
            let row = py * stride;
            self.pixels[row + x0 as usize..row + x1 as usize].fill(color);
        }
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        self.fill_rect(x, y, 1, 1, color);
    }

    /// Top-to-bottom linear blend between two colors, sampled at row centres.
    pub fn vertical_gradient(&mut self, top: Rgba, bottom: Rgba) {
        let stride = self.width as usize;
        let rows = self.height.max(1) as f32;
        for py in 0..self.height as usize {
            let t = (py as f32 + 0.5) / rows;
            let color = lerp_rgba(top, bottom, t);
            self.pixels[py * stride..(py + 1) * stride].fill(color);
        }
    }
}

fn lerp_rgba(a: Rgba, b: Rgba, t: f32) -> Rgba {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round().clamp(0.0, 255.0) as u8;
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2]), mix(a[3], b[3])]
}
