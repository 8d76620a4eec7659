/// Scanline triangle fill with affine texture mapping
///
/// Triangles are split at their middle vertex into an upper and a lower
/// span. Each span walks two edges one row at a time, linearly
/// interpolating x and the texture coordinates, and fills the pixels
/// between them with nearest-texel samples. There is no depth buffer;
/// callers order triangles themselves.
use crate::buffer::PixelBuffer;

/// A triangle corner in screen space with its texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenVertex {
    pub x: i32,
    pub y: i32,
    pub u: f32,
    pub v: f32,
}

impl ScreenVertex {
    pub fn new(x: i32, y: i32, u: f32, v: f32) -> Self {
        Self { x, y, u, v }
    }
}

/// One end of a horizontal span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanPoint {
    pub x: i32,
    pub u: f32,
    pub v: f32,
}

/// Pixel accounting for one or more fills.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RasterStats {
    pub pixels_written: usize,
    /// Pixels on visible rows that fell left or right of the frame
    pub pixels_clipped: usize,
    /// Whole rows above or below the frame
    pub rows_clipped: usize,
}

impl std::ops::AddAssign for RasterStats {
    fn add_assign(&mut self, other: Self) {
        self.pixels_written += other.pixels_written;
        self.pixels_clipped += other.pixels_clipped;
        self.rows_clipped += other.rows_clipped;
    }
}

/// Linear walk along a triangle edge, one step per row.
#[derive(Debug, Clone, Copy)]
struct Edge {
    y0: i64,
    x: f32,
    u: f32,
    v: f32,
    dx: f32,
    du: f32,
    dv: f32,
}

impl Edge {
    /// Walk from `(x, u, v)` at row `y0` toward `to`.
    ///
    /// The step count is `to.y + 1 - y0`, which is never zero for sorted
    /// vertices and keeps horizontal edges finite.
    fn toward(y0: i64, x: f32, u: f32, v: f32, to: &ScreenVertex) -> Self {
        let steps = (i64::from(to.y) + 1 - y0) as f32;
        Self {
            y0,
            x,
            u,
            v,
            dx: (to.x as f32 - x) / steps,
            du: (to.u - u) / steps,
            dv: (to.v - v) / steps,
        }
    }

    fn from_vertex(from: &ScreenVertex, to: &ScreenVertex) -> Self {
        Self::toward(i64::from(from.y), from.x as f32, from.u, from.v, to)
    }

    fn at(&self, y: i64) -> SpanPoint {
        let k = (y - self.y0) as f32;
        SpanPoint {
            x: (self.x + self.dx * k).floor() as i32,
            u: self.u + self.du * k,
            v: self.v + self.dv * k,
        }
    }

    /// Continue from row `y` toward a new target vertex.
    fn retarget(&self, y: i64, to: &ScreenVertex) -> Self {
        let k = (y - self.y0) as f32;
        Self::toward(
            y,
            self.x + self.dx * k,
            self.u + self.du * k,
            self.v + self.dv * k,
            to,
        )
    }
}

/// Fills triangles into a frame, sampling a texture.
pub struct Rasterizer<'a> {
    frame: &'a mut PixelBuffer,
    texture: &'a PixelBuffer,
    stats: RasterStats,
}

impl<'a> Rasterizer<'a> {
    pub fn new(frame: &'a mut PixelBuffer, texture: &'a PixelBuffer) -> Self {
        Self {
            frame,
            texture,
            stats: RasterStats::default(),
        }
    }

    pub fn stats(&self) -> RasterStats {
        self.stats
    }

    /// Scanline-fill a triangle.
    ///
    /// Rows run from the top vertex down to, but not including, the bottom
    /// vertex's row.
    pub fn fill_triangle(&mut self, corners: [ScreenVertex; 3]) {
        let mut sorted = corners;
        sorted.sort_by_key(|c| c.y);
        let [top, middle, bottom] = sorted;

        let short = Edge::from_vertex(&top, &middle);
        let long = Edge::from_vertex(&top, &bottom);
        self.fill_rows(i64::from(top.y), i64::from(middle.y), &short, &long);

        let middle_y = i64::from(middle.y);
        let short = Edge::from_vertex(&middle, &bottom);
        let long = long.retarget(middle_y, &bottom);
        self.fill_rows(middle_y, i64::from(bottom.y), &short, &long);
    }

    fn fill_rows(&mut self, start: i64, end: i64, first: &Edge, second: &Edge) {
        if end <= start {
            return;
        }
        let height = self.frame.height() as i64;
        let visible_start = start.max(0);
        let visible_end = end.min(height);
        let visible_rows = (visible_end - visible_start).max(0);
        self.stats.rows_clipped += (end - start - visible_rows) as usize;

        for y in visible_start..visible_end {
            self.fill_span_i64(y, first.at(y), second.at(y));
        }
    }

    /// Fill one row from `from.x` to `to.x` inclusive.
    ///
    /// Texture coordinates are interpolated linearly in x. A span whose ends
    /// share the same x writes nothing.
    pub fn fill_span(&mut self, y: i32, from: SpanPoint, to: SpanPoint) {
        let height = self.frame.height() as i64;
        let y = i64::from(y);
        if y < 0 || y >= height {
            self.stats.rows_clipped += 1;
            return;
        }
        self.fill_span_i64(y, from, to);
    }

    fn fill_span_i64(&mut self, y: i64, from: SpanPoint, to: SpanPoint) {
        let x1 = i64::from(from.x);
        let x2 = i64::from(to.x);
        if x1 == x2 {
            return;
        }

        let distance = (x2 - x1).abs();
        let du = (to.u - from.u) / distance as f32;
        let dv = (to.v - from.v) / distance as f32;
        let step = if x2 < x1 { -1 } else { 1 };

        // Restrict the walk to the columns that exist; k counts pixels from x1
        let last_column = self.frame.width() as i64 - 1;
        let (k_start, k_end) = if step > 0 {
            ((-x1).max(0), distance.min(last_column - x1))
        } else {
            ((x1 - last_column).max(0), distance.min(x1))
        };
        let total = (distance + 1) as usize;
        if k_start > k_end {
            self.stats.pixels_clipped += total;
            return;
        }
        self.stats.pixels_clipped += total - (k_end - k_start + 1) as usize;

        let frame_y = (self.frame.height() as i64 - 1 - y) as i32;
        let texture_top = self.texture.height() as i32 - 1;
        for k in k_start..=k_end {
            let x = (x1 + step * k) as i32;
            let u = from.u + du * k as f32;
            let v = from.v + dv * k as f32;
            let texel = self
                .texture
                .get_pixel_clamped(u.floor() as i32, texture_top.saturating_sub(v.floor() as i32));
            if self.frame.set_pixel(x, frame_y, texel) {
                self.stats.pixels_written += 1;
            } else {
                self.stats.pixels_clipped += 1;
            }
        }
    }
}
