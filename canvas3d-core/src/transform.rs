/// Euler rotation of vertex positions and normals
use crate::geometry::Vector3;

/// Accumulated rotation around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    /// Advance by one animation tick of `speed` radians per axis.
    ///
    /// Angles are wrapped into `[0, 2π)` so long-running animations keep
    /// their float precision.
    pub fn advance(&mut self, speed: [f32; 3]) {
        self.rotate(speed[0], speed[1], speed[2]);
        self.x = self.x.rem_euclid(std::f32::consts::TAU);
        self.y = self.y.rem_euclid(std::f32::consts::TAU);
        self.z = self.z.rem_euclid(std::f32::consts::TAU);
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Sines and cosines of one rotation, computed once and applied to many vectors.
///
/// The composition is X, then Y, then Z, each a 2D rotation in the plane
/// perpendicular to its axis.
#[derive(Debug, Clone, Copy)]
pub struct Rotation {
    cos_x: f32,
    sin_x: f32,
    cos_y: f32,
    sin_y: f32,
    cos_z: f32,
    sin_z: f32,
}

impl Rotation {
    pub fn new(angle_x: f32, angle_y: f32, angle_z: f32) -> Self {
        let (sin_x, cos_x) = angle_x.sin_cos();
        let (sin_y, cos_y) = angle_y.sin_cos();
        let (sin_z, cos_z) = angle_z.sin_cos();
        Self {
            cos_x,
            sin_x,
            cos_y,
            sin_y,
            cos_z,
            sin_z,
        }
    }

    pub fn from_state(state: &RotationState) -> Self {
        Self::new(state.x, state.y, state.z)
    }

    /// Rotate a single vector. Positions and normals go through the same path.
    pub fn apply(&self, v: &Vector3) -> Vector3 {
        let xpp1 = v.x * self.cos_x + v.y * self.sin_x;
        let ypp1 = v.y * self.cos_x - v.x * self.sin_x;
        let xpp2 = xpp1 * self.cos_y + v.z * self.sin_y;
        let zpp2 = v.z * self.cos_y - xpp1 * self.sin_y;
        let ypp3 = ypp1 * self.cos_z - zpp2 * self.sin_z;
        let zpp3 = zpp2 * self.cos_z + ypp1 * self.sin_z;
        Vector3::new(xpp2, ypp3, zpp3)
    }

    /// Rotate every vector of `source` into `target`, reusing its allocation.
    pub fn apply_all(&self, source: &[Vector3], target: &mut Vec<Vector3>) {
        target.clear();
        target.extend(source.iter().map(|v| self.apply(v)));
    }

    /// Undo a rotation built from the same angles.
    ///
    /// Each stage is inverted in reverse order: Z, then Y, then X.
    #[cfg(test)]
    pub fn invert(&self, v: &Vector3) -> Vector3 {
        let ypp1 = v.y * self.cos_z + v.z * self.sin_z;
        let zpp2 = v.z * self.cos_z - v.y * self.sin_z;
        let xpp1 = v.x * self.cos_y - zpp2 * self.sin_y;
        let z = zpp2 * self.cos_y + v.x * self.sin_y;
        let x = xpp1 * self.cos_x - ypp1 * self.sin_x;
        let y = ypp1 * self.cos_x + xpp1 * self.sin_x;
        Vector3::new(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, TAU};

    #[test]
    fn test_rotation_state() {
        let mut state = RotationState::zero();
        assert_eq!(state.x, 0.0);
        assert_eq!(state.y, 0.0);
        assert_eq!(state.z, 0.0);

        state.rotate(0.1, 0.2, 0.3);
        assert!((state.x - 0.1).abs() < 1e-6);
        assert!((state.y - 0.2).abs() < 1e-6);
        assert!((state.z - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_advance_wraps_angles() {
        let mut state = RotationState::new(TAU - 0.005, 0.0, 0.0);
        state.advance([0.01, 0.013, 0.02]);
        assert_relative_eq!(state.x, 0.005, epsilon = 1e-4);
        assert_relative_eq!(state.y, 0.013, epsilon = 1e-6);
        assert_relative_eq!(state.z, 0.02, epsilon = 1e-6);
    }

    #[test]
    fn test_identity_rotation() {
        let rotation = Rotation::new(0.0, 0.0, 0.0);
        let v = Vector3::new(1.5, -2.0, 7.25);
        assert_eq!(rotation.apply(&v), v);
    }

    #[test]
    fn test_full_turn_returns_to_start() {
        let rotation = Rotation::new(TAU, TAU, TAU);
        let v = Vector3::new(3.0, -4.0, 12.0);
        assert_relative_eq!(rotation.apply(&v), v, epsilon = 1e-4);
    }

    #[test]
    fn test_quarter_turn_about_x_stage() {
        // The first stage rotates in the xy plane: (1, 0, 0) -> (0, -1, 0)
        let rotation = Rotation::new(FRAC_PI_2, 0.0, 0.0);
        let v = rotation.apply(&Vector3::x());
        assert_relative_eq!(v, Vector3::new(0.0, -1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_invert_undoes_apply() {
        let rotation = Rotation::new(0.4, -1.3, 2.2);
        let v = Vector3::new(-6.0, 2.5, 9.0);
        let rotated = rotation.apply(&v);
        assert_relative_eq!(rotated.norm(), v.norm(), epsilon = 1e-4);
        assert_relative_eq!(rotation.invert(&rotated), v, epsilon = 1e-4);
    }

    #[test]
    fn test_apply_all_reuses_target() {
        let rotation = Rotation::new(0.0, 0.0, 0.0);
        let source = vec![Vector3::x(), Vector3::y()];
        let mut target = vec![Vector3::zeros(); 5];
        rotation.apply_all(&source, &mut target);
        assert_eq!(target, source);
    }
}
