/// Per-frame render pipeline: rotate, order, cull, rasterize
///
/// [`Renderer::rotate`] fills the renderer's [`RenderContext`] with rotated
/// copies of every mesh's positions and normals. [`Renderer::draw`] reads
/// them back to draw the visible triangles. Both take `&mut self`, so a frame's
/// rotate/draw pair cannot interleave with another frame on the same renderer.
use crate::buffer::PixelBuffer;
use crate::config::{DepthOrder, RenderConfig};
use crate::geometry::{face_normal, Vector3};
use crate::mesh::{Mesh, Object};
use crate::projection::{screen_vertex, EnvironmentMap, OrthographicView};
use crate::raster::{RasterStats, Rasterizer};
use crate::transform::{Rotation, RotationState};
use log::{trace, warn};

/// Rotated data of one mesh for the current frame.
#[derive(Debug, Clone, Default)]
pub struct MeshFrame {
    pub vertices: Vec<Vector3>,
    pub normals: Vec<Vector3>,
    /// Painter's order of the mesh's polygons, rebuilt by every draw
    order: Vec<(f32, usize)>,
}

impl MeshFrame {
    /// Painter's key of a face: the sum of its rotated z values.
    fn depth_key(&self, indices: [usize; 3]) -> Option<f32> {
        let mut sum = 0.0;
        for i in indices {
            sum += self.vertices.get(i)?.z;
        }
        Some(sum)
    }

    fn matches(&self, mesh: &Mesh) -> bool {
        self.vertices.len() == mesh.vertices.len()
            && self.normals.len() == mesh.vertex_normals.len()
            && self.normals.len() == self.vertices.len()
    }
}

/// Transient render state, indexed like the meshes of the rotated object.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    frames: Vec<MeshFrame>,
}

impl RenderContext {
    pub fn mesh(&self, index: usize) -> Option<&MeshFrame> {
        self.frames.get(index)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Triangle and pixel counts of one draw.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub triangles: usize,
    /// Facing away from the viewer
    pub culled: usize,
    /// Dropped because the mesh had no matching rotated data or a bad index
    pub skipped: usize,
    pub drawn: usize,
    pub raster: RasterStats,
}

/// Software renderer holding the per-frame context.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    context: RenderContext,
    depth_order: DepthOrder,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_depth_order(depth_order: DepthOrder) -> Self {
        Self {
            context: RenderContext::default(),
            depth_order,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::with_depth_order(config.depth_order)
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Rotate every mesh of `object` into the render context.
    ///
    /// Positions and normals of each mesh are replaced wholesale, so the
    /// context always matches the object passed last.
    pub fn rotate(&mut self, angle_x: f32, angle_y: f32, angle_z: f32, object: &Object) {
        let rotation = Rotation::new(angle_x, angle_y, angle_z);
        self.context
            .frames
            .resize_with(object.meshes.len(), MeshFrame::default);

        for (mesh, frame) in object.meshes.iter().zip(&mut self.context.frames) {
            rotation.apply_all(&mesh.vertices, &mut frame.vertices);
            rotation.apply_all(&mesh.vertex_normals, &mut frame.normals);
        }
    }

    /// Draw the rotated object into `frame`, sampling `texture`.
    ///
    /// Expects [`Renderer::rotate`] to have run on the same object this
    /// frame. Meshes whose rotated data does not line up are skipped with a
    /// warning rather than aborting the frame.
    pub fn draw(&mut self, object: &Object, frame: &mut PixelBuffer, texture: &PixelBuffer) -> FrameStats {
        let view = OrthographicView::for_buffer(frame);
        let env = EnvironmentMap::for_texture(texture);
        let mut stats = FrameStats::default();
        let mut raster = Rasterizer::new(frame, texture);

        for (mesh_index, mesh) in object.meshes.iter().enumerate() {
            stats.triangles += mesh.polygons.len();

            let Some(mesh_frame) = self.context.frames.get_mut(mesh_index) else {
                warn!("mesh `{}` has not been rotated; skipping", mesh.name);
                stats.skipped += mesh.polygons.len();
                continue;
            };
            if !mesh_frame.matches(mesh) {
                warn!("rotated data of mesh `{}` is stale; skipping", mesh.name);
                stats.skipped += mesh.polygons.len();
                continue;
            }

            let mut order = std::mem::take(&mut mesh_frame.order);
            order.clear();
            for (face_index, face) in mesh.polygons.iter().enumerate() {
                match mesh_frame.depth_key(face.indices()) {
                    Some(key) => order.push((key, face_index)),
                    None => stats.skipped += 1,
                }
            }
            match self.depth_order {
                DepthOrder::FarFirst => order.sort_by(|a, b| b.0.total_cmp(&a.0)),
                DepthOrder::AscendingKey => order.sort_by(|a, b| a.0.total_cmp(&b.0)),
            }

            for &(_, face_index) in &order {
                let [a, b, c] = mesh.polygons[face_index].indices();
                let positions = [
                    mesh_frame.vertices[a],
                    mesh_frame.vertices[b],
                    mesh_frame.vertices[c],
                ];
                if face_normal(&positions[0], &positions[1], &positions[2]).z >= 0.0 {
                    stats.culled += 1;
                    continue;
                }

                let corners = [a, b, c].map(|i| {
                    screen_vertex(&view, &env, &mesh_frame.vertices[i], &mesh_frame.normals[i])
                });
                raster.fill_triangle(corners);
                stats.drawn += 1;
            }
            mesh_frame.order = order;
        }

        stats.raster = raster.stats();
        trace!(
            "frame: {} triangles, {} drawn, {} culled, {} skipped, {} pixels",
            stats.triangles,
            stats.drawn,
            stats.culled,
            stats.skipped,
            stats.raster.pixels_written
        );
        stats
    }

    /// Rotate and draw one animation frame back to back.
    pub fn render_frame(
        &mut self,
        object: &Object,
        rotation: &RotationState,
        frame: &mut PixelBuffer,
        texture: &PixelBuffer,
    ) -> FrameStats {
        self.rotate(rotation.x, rotation.y, rotation.z, object);
        self.draw(object, frame, texture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Face, Outline};
    use approx::assert_relative_eq;
    use std::f32::consts::TAU;

    fn triangle_mesh(points: [(f32, f32, f32); 3]) -> Mesh {
        let mut mesh = Mesh::new("tri");
        for (x, y, z) in points {
            mesh.add_vertex(Vector3::new(x, y, z), Vector3::new(0.0, 0.0, -1.0));
        }
        mesh.add_face(Face::new(0, 1, 2), Outline::all());
        mesh
    }

    fn opaque_pixels(frame: &PixelBuffer) -> usize {
        frame.pixels().chunks_exact(4).filter(|p| p[3] == 255).count()
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let object = Object::from(Mesh::cube(3.0));
        let mut renderer = Renderer::new();
        renderer.rotate(0.0, 0.0, 0.0, &object);

        let frame = renderer.context().mesh(0).unwrap();
        assert_eq!(frame.vertices, object.meshes[0].vertices);
        assert_eq!(frame.normals, object.meshes[0].vertex_normals);
    }

    #[test]
    fn test_full_turn_restores_vertices() {
        let object = Object::from(Mesh::cube(3.0));
        let mut renderer = Renderer::new();
        renderer.rotate(TAU, TAU, TAU, &object);

        let frame = renderer.context().mesh(0).unwrap();
        for (rotated, original) in frame.vertices.iter().zip(&object.meshes[0].vertices) {
            assert_relative_eq!(rotated, original, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_rotate_matches_source_lengths() {
        let object = Object::new(vec![Mesh::cube(1.0), triangle_mesh([(0.0, 0.0, 0.0); 3])]);
        let mut renderer = Renderer::new();
        renderer.rotate(0.3, 0.2, 0.1, &object);
        assert_eq!(renderer.context().len(), 2);
        for (i, mesh) in object.meshes.iter().enumerate() {
            let frame = renderer.context().mesh(i).unwrap();
            assert_eq!(frame.vertices.len(), mesh.vertices.len());
            assert_eq!(frame.normals.len(), mesh.vertex_normals.len());
        }

        // A smaller object shrinks the context
        renderer.rotate(0.0, 0.0, 0.0, &Object::from(Mesh::cube(1.0)));
        assert_eq!(renderer.context().len(), 1);
    }

    #[test]
    fn test_backfacing_triangle_writes_nothing() {
        // Reversed winding: face normal z is positive
        let object = Object::from(triangle_mesh([
            (0.0, 10.0, 10.0),
            (10.0, 0.0, 10.0),
            (0.0, 0.0, 10.0),
        ]));
        let texture = PixelBuffer::filled(8, 8, [200, 100, 50, 255]);
        let mut frame = PixelBuffer::new(100, 100);
        let mut renderer = Renderer::new();
        renderer.rotate(0.0, 0.0, 0.0, &object);
        let stats = renderer.draw(&object, &mut frame, &texture);

        assert_eq!(stats.culled, 1);
        assert_eq!(stats.drawn, 0);
        assert_eq!(opaque_pixels(&frame), 0);
    }

    #[test]
    fn test_edge_on_triangle_is_culled() {
        // All three points share x, so the face normal has zero z
        let object = Object::from(triangle_mesh([
            (5.0, 0.0, 0.0),
            (5.0, 10.0, 0.0),
            (5.0, 0.0, 10.0),
        ]));
        let texture = PixelBuffer::filled(8, 8, [1, 2, 3, 255]);
        let mut frame = PixelBuffer::new(50, 50);
        let mut renderer = Renderer::new();
        let stats = renderer.render_frame(&object, &RotationState::zero(), &mut frame, &texture);
        assert_eq!(stats.culled, 1);
        assert_eq!(opaque_pixels(&frame), 0);
    }

    /// Two overlapping front-facing triangles; the pixel they share shows
    /// whichever was drawn last.
    fn overlapping_pair() -> Object {
        let mut mesh = Mesh::new("pair");
        // Near triangle (z = 1), sampling the left texel
        mesh.add_vertex(Vector3::new(-10.0, -10.0, 1.0), Vector3::new(-1.0, 0.0, 0.0));
        mesh.add_vertex(Vector3::new(10.0, -10.0, 1.0), Vector3::new(-1.0, 0.0, 0.0));
        mesh.add_vertex(Vector3::new(-10.0, 10.0, 1.0), Vector3::new(-1.0, 0.0, 0.0));
        // Far triangle (z = 50), sampling the right texel
        mesh.add_vertex(Vector3::new(-10.0, -10.0, 50.0), Vector3::x() * 0.9);
        mesh.add_vertex(Vector3::new(10.0, -10.0, 50.0), Vector3::x() * 0.9);
        mesh.add_vertex(Vector3::new(-10.0, 10.0, 50.0), Vector3::x() * 0.9);
        mesh.add_face(Face::new(0, 1, 2), Outline::all());
        mesh.add_face(Face::new(3, 4, 5), Outline::all());
        Object::from(mesh)
    }

    fn two_texel_texture() -> PixelBuffer {
        let mut texture = PixelBuffer::new(2, 1);
        texture.set_pixel(0, 0, [255, 0, 0]);
        texture.set_pixel(1, 0, [0, 0, 255]);
        texture
    }

    #[test]
    fn test_far_first_draws_near_triangle_on_top() {
        let object = overlapping_pair();
        let texture = two_texel_texture();
        let mut frame = PixelBuffer::new(40, 40);
        let mut renderer = Renderer::with_depth_order(DepthOrder::FarFirst);
        let stats = renderer.render_frame(&object, &RotationState::zero(), &mut frame, &texture);

        assert_eq!(stats.drawn, 2);
        // Screen (15, 15) lies inside both triangles
        assert_eq!(frame.rgba_at_row(15, 15), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_ascending_key_draws_far_triangle_on_top() {
        let object = overlapping_pair();
        let texture = two_texel_texture();
        let mut frame = PixelBuffer::new(40, 40);
        let mut renderer = Renderer::with_depth_order(DepthOrder::AscendingKey);
        renderer.render_frame(&object, &RotationState::zero(), &mut frame, &texture);

        assert_eq!(frame.rgba_at_row(15, 15), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_from_config_uses_configured_order() {
        let object = overlapping_pair();
        let texture = two_texel_texture();
        let config = RenderConfig {
            depth_order: DepthOrder::AscendingKey,
            ..RenderConfig::default()
        };
        let mut frame = PixelBuffer::new(40, 40);
        let mut renderer = Renderer::from_config(&config);
        renderer.render_frame(&object, &RotationState::zero(), &mut frame, &texture);

        assert_eq!(frame.rgba_at_row(15, 15), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_draw_without_rotate_skips_mesh() {
        let object = Object::from(Mesh::cube(10.0));
        let texture = PixelBuffer::filled(4, 4, [255, 255, 255, 255]);
        let mut frame = PixelBuffer::new(32, 32);
        let mut renderer = Renderer::new();
        let stats = renderer.draw(&object, &mut frame, &texture);
        assert_eq!(stats.skipped, 12);
        assert_eq!(opaque_pixels(&frame), 0);
    }

    #[test]
    fn test_bad_face_index_is_skipped() {
        let mut mesh = triangle_mesh([(0.0, 0.0, 10.0), (10.0, 0.0, 10.0), (0.0, 10.0, 10.0)]);
        mesh.add_face(Face::new(0, 1, 7), Outline::all());
        let object = Object::from(mesh);
        let texture = PixelBuffer::filled(4, 4, [255, 255, 255, 255]);
        let mut frame = PixelBuffer::new(100, 100);
        let mut renderer = Renderer::new();
        let stats = renderer.render_frame(&object, &RotationState::zero(), &mut frame, &texture);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.drawn, 1);
    }

    #[test]
    fn test_cube_shows_at_most_three_faces() {
        let object = Object::from(Mesh::cube(20.0));
        let texture = PixelBuffer::filled(16, 16, [10, 20, 30, 255]);
        let mut frame = PixelBuffer::new(64, 64);
        let mut renderer = Renderer::new();
        let stats = renderer.render_frame(
            &object,
            &RotationState::new(0.5, 0.7, 0.2),
            &mut frame,
            &texture,
        );
        assert_eq!(stats.triangles, 12);
        assert_eq!(stats.drawn + stats.culled, 12);
        assert!(stats.drawn <= 6 && stats.drawn > 0);
        assert!(stats.raster.pixels_written > 0);
    }
}
