/// Mesh data model consumed by the render pipeline
use crate::error::MeshDefect;
use crate::geometry::{normalize_or_fallback, Vector3};

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from unit-range floats, scaling each channel by 255.
    pub fn from_unit(r: f32, g: f32, b: f32) -> Self {
        let channel = |c: f32| (c * 255.0).clamp(0.0, 255.0) as u8;
        Self::new(channel(r), channel(g), channel(b))
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A named diffuse colour from the scene's material table.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub id: String,
    pub color: Rgb,
}

impl Material {
    pub fn new(id: impl Into<String>, color: Rgb) -> Self {
        Self {
            id: id.into(),
            color,
        }
    }
}

/// Three vertex indices making up one triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub a: usize,
    pub b: usize,
    pub c: usize,
}

impl Face {
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self { a, b, c }
    }

    pub fn indices(&self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }
}

/// Edge visibility flags of a face. Parsed and kept, never rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Outline {
    pub ab: bool,
    pub bc: bool,
    pub ca: bool,
}

impl Outline {
    pub fn new(ab: bool, bc: bool, ca: bool) -> Self {
        Self { ab, bc, ca }
    }

    pub fn all() -> Self {
        Self::new(true, true, true)
    }
}

/// Triangles sharing one vertex and normal pool.
///
/// A mesh only holds the model-space data. The rotated copies needed while
/// drawing belong to the renderer's per-frame context.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub tint: Rgb,
    pub polygons: Vec<Face>,
    pub vertices: Vec<Vector3>,
    pub vertex_normals: Vec<Vector3>,
    pub outlines: Vec<Outline>,
}

impl Mesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tint: Rgb::default(),
            polygons: Vec::new(),
            vertices: Vec::new(),
            vertex_normals: Vec::new(),
            outlines: Vec::new(),
        }
    }

    /// Append a vertex and its normal, returning the new vertex index.
    pub fn add_vertex(&mut self, position: Vector3, normal: Vector3) -> usize {
        self.vertices.push(position);
        self.vertex_normals.push(normal);
        self.vertices.len() - 1
    }

    pub fn add_face(&mut self, face: Face, outline: Outline) {
        self.polygons.push(face);
        self.outlines.push(outline);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.polygons.len()
    }

    /// Check the index and length invariants the pipeline relies on.
    pub fn validate(&self) -> Result<(), MeshDefect> {
        if self.vertex_normals.len() != self.vertices.len() {
            return Err(MeshDefect::NormalCount {
                normals: self.vertex_normals.len(),
                vertices: self.vertices.len(),
            });
        }
        if self.outlines.len() != self.polygons.len() {
            return Err(MeshDefect::OutlineCount {
                outlines: self.outlines.len(),
                polygons: self.polygons.len(),
            });
        }
        for (face_index, face) in self.polygons.iter().enumerate() {
            if let Some(&index) = face.indices().iter().find(|&&i| i >= self.vertices.len()) {
                return Err(MeshDefect::FaceIndex {
                    face: face_index,
                    index,
                });
            }
        }
        Ok(())
    }

    /// Cube centred on the origin, wound so every face normal points outward.
    ///
    /// Vertex normals point along the corner diagonals, which gives the
    /// environment map a smooth sphere-like look.
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let mut mesh = Self::new("cube");

        for i in 0..8 {
            let corner = Vector3::new(
                if i & 1 == 0 { -half } else { half },
                if i & 2 == 0 { -half } else { half },
                if i & 4 == 0 { -half } else { half },
            );
            mesh.add_vertex(corner, normalize_or_fallback(&corner));
        }

        // Corner order per quad makes face_normal point out of the cube
        const QUADS: [[usize; 4]; 6] = [
            [0, 1, 3, 2], // -z
            [4, 6, 7, 5], // +z
            [0, 4, 5, 1], // -y
            [2, 3, 7, 6], // +y
            [0, 2, 6, 4], // -x
            [1, 5, 7, 3], // +x
        ];
        for [a, b, c, d] in QUADS {
            mesh.add_face(Face::new(a, b, c), Outline::new(true, true, false));
            mesh.add_face(Face::new(a, c, d), Outline::new(false, true, true));
        }

        mesh
    }
}

/// One loaded scene: its meshes and the material table they were tinted from.
#[derive(Debug, Clone, Default)]
pub struct Object {
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
}

impl Object {
    pub fn new(meshes: Vec<Mesh>) -> Self {
        Self {
            meshes,
            materials: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(Mesh::vertex_count).sum()
    }

    pub fn face_count(&self) -> usize {
        self.meshes.iter().map(Mesh::face_count).sum()
    }
}

impl From<Mesh> for Object {
    fn from(mesh: Mesh) -> Self {
        Self::new(vec![mesh])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::face_normal;

    #[test]
    fn test_rgb_from_unit() {
        assert_eq!(Rgb::from_unit(1.0, 0.5, 0.0), Rgb::new(255, 127, 0));
        assert_eq!(Rgb::from_unit(2.0, -1.0, 0.0), Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_cube_is_valid() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.face_count(), 12);
        assert_eq!(cube.validate(), Ok(()));
    }

    #[test]
    fn test_cube_faces_point_outward() {
        let cube = Mesh::cube(2.0);
        for face in &cube.polygons {
            let [a, b, c] = face.indices().map(|i| cube.vertices[i]);
            let centroid = (a + b + c) / 3.0;
            let n = face_normal(&a, &b, &c);
            assert!(n.dot(&centroid) > 0.0, "face {:?} is wound inward", face);
        }
    }

    #[test]
    fn test_validate_rejects_bad_index() {
        let mut mesh = Mesh::new("broken");
        mesh.add_vertex(Vector3::zeros(), Vector3::z());
        mesh.add_face(Face::new(0, 0, 3), Outline::all());
        assert_eq!(
            mesh.validate(),
            Err(MeshDefect::FaceIndex { face: 0, index: 3 })
        );
    }

    #[test]
    fn test_validate_rejects_misaligned_normals() {
        let mut mesh = Mesh::new("broken");
        mesh.add_vertex(Vector3::zeros(), Vector3::z());
        mesh.vertex_normals.clear();
        assert_eq!(
            mesh.validate(),
            Err(MeshDefect::NormalCount {
                normals: 0,
                vertices: 1
            })
        );
    }

    #[test]
    fn test_defect_is_a_std_error() {
        let mut mesh = Mesh::cube(1.0);
        mesh.outlines.pop();
        let defect = mesh.validate().unwrap_err();
        assert_eq!(defect.to_string(), "11 outlines for 12 polygons");

        let boxed: Box<dyn std::error::Error> = Box::new(defect);
        assert!(boxed.source().is_none());
    }
}
