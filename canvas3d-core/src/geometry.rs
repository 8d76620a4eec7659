/// Geometry primitives shared by the loader and the render pipeline
use nalgebra::Vector3 as NaVector3;

/// Positions and normals are plain single-precision 3-vectors.
pub type Vector3 = NaVector3<f32>;

/// Returned by [`normalize_or_fallback`] when the input has no direction.
pub const DEGENERATE_NORMAL: Vector3 = Vector3::new(0.0, 0.0, 0.01);

/// Normalize `v`, or return [`DEGENERATE_NORMAL`] for the zero vector.
///
/// Collapsed triangles produce a zero cross product. The fallback points
/// slightly away from the viewer, so such triangles are culled instead of
/// propagating NaNs into the rasterizer.
pub fn normalize_or_fallback(v: &Vector3) -> Vector3 {
    let length = v.norm();
    if length == 0.0 {
        return DEGENERATE_NORMAL;
    }
    v / length
}

/// Facing direction of the triangle `(a, b, c)`: `normalize((a - b) x (c - b))`.
///
/// With the viewer looking down +z, a negative z component means the
/// triangle faces the viewer.
pub fn face_normal(a: &Vector3, b: &Vector3, c: &Vector3) -> Vector3 {
    let d = a - b;
    let e = c - b;
    normalize_or_fallback(&d.cross(&e))
}
