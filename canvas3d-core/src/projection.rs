/// Orthographic screen mapping and normal-driven texture coordinates
use crate::buffer::PixelBuffer;
use crate::geometry::Vector3;
use crate::raster::ScreenVertex;

/// Orthographic view onto a canvas: rotated x/y become pixel offsets from
/// the canvas centre, z is ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthographicView {
    pub center_x: f32,
    pub center_y: f32,
}

impl OrthographicView {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            center_x: width as f32 / 2.0,
            center_y: height as f32 / 2.0,
        }
    }

    pub fn for_buffer(buffer: &PixelBuffer) -> Self {
        Self::new(buffer.width(), buffer.height())
    }

    /// Project a rotated point to integer screen coordinates.
    pub fn project(&self, point: &Vector3) -> (i32, i32) {
        (
            (point.x + self.center_x).floor() as i32,
            (point.y + self.center_y).floor() as i32,
        )
    }
}

/// Spherical environment mapping: a unit normal's x/y pick the texel.
///
/// The normal is scaled by the texture's half-size, so a normal facing the
/// viewer samples the centre and grazing normals reach the edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentMap {
    pub half_width: f32,
    pub half_height: f32,
}

impl EnvironmentMap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            half_width: width as f32 / 2.0,
            half_height: height as f32 / 2.0,
        }
    }

    pub fn for_texture(texture: &PixelBuffer) -> Self {
        Self::new(texture.width(), texture.height())
    }

    /// Texture coordinates for a rotated vertex normal.
    pub fn texcoord(&self, normal: &Vector3) -> (f32, f32) {
        (
            (normal.x * self.half_width).floor() + self.half_width,
            (normal.y * self.half_height).floor() + self.half_height,
        )
    }
}

/// Screen position from the rotated position, texture coordinate from the
/// rotated normal.
pub fn screen_vertex(
    view: &OrthographicView,
    env: &EnvironmentMap,
    position: &Vector3,
    normal: &Vector3,
) -> ScreenVertex {
    let (x, y) = view.project(position);
    let (u, v) = env.texcoord(normal);
    ScreenVertex { x, y, u, v }
}
