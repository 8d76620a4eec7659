/// Scene loader for ASCII scene exports (ASE)
///
/// The format is line oriented: every value follows a `*MARKER` on the same
/// line, and blocks are located by searching forward for their marker.
use std::path::Path;

use log::{debug, warn};

use crate::config::{LoaderConfig, TintSource};
use crate::error::LoadError;
use crate::geometry::Vector3;
use crate::mesh::{Face, Material, Mesh, Object, Outline, Rgb};
use crate::scanner::Scanner;

/// Upper bound for preallocation from counts declared in the file.
const MAX_RESERVE: usize = 1 << 16;

/// Load scene text with the default tint policy.
pub fn load_scene(content: &str, scale: f32) -> Result<Object, LoadError> {
    SceneLoader::new(scale).load(content)
}

/// Read and load a scene file.
pub fn load_scene_file(path: impl AsRef<Path>, config: &LoaderConfig) -> Result<Object, LoadError> {
    SceneLoader::with_config(config.clone()).load_file(path)
}

/// Builds an [`Object`] from scene text.
#[derive(Debug, Clone, Default)]
pub struct SceneLoader {
    config: LoaderConfig,
}

impl SceneLoader {
    pub fn new(scale: f32) -> Self {
        Self::with_config(LoaderConfig {
            scale,
            ..LoaderConfig::default()
        })
    }

    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Object, LoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        debug!("loading scene {}", path.display());
        self.load(&content)
    }

    /// Parse a whole document. Any error aborts the load; there is no
    /// partially loaded result.
    pub fn load(&self, content: &str) -> Result<Object, LoadError> {
        let mut scanner = Scanner::new(content);
        let materials = read_materials(&mut scanner)?;

        let mut meshes = Vec::new();
        while scanner.find("GEOMOBJECT").is_ok() {
            let mesh = self.read_mesh(&mut scanner, &materials)?;
            debug!(
                "mesh `{}`: {} vertices, {} faces",
                mesh.name,
                mesh.vertex_count(),
                mesh.face_count()
            );
            meshes.push(mesh);
        }

        let object = Object { meshes, materials };
        debug!(
            "loaded {} meshes, {} vertices, {} faces",
            object.meshes.len(),
            object.vertex_count(),
            object.face_count()
        );
        Ok(object)
    }

    fn read_mesh(&self, scanner: &mut Scanner, materials: &[Material]) -> Result<Mesh, LoadError> {
        scanner.find("NODE_NAME")?;
        let name = scanner.read_name();
        scanner.find("MESH_NUMVERTEX")?;
        let vertex_count = scanner.read_index()?;
        scanner.find("MESH_NUMFACES")?;
        let face_count = scanner.read_index()?;

        scanner.find("MESH_VERTEX_LIST")?;
        let mut vertices = Vec::with_capacity(vertex_count.min(MAX_RESERVE));
        for _ in 0..vertex_count {
            scanner.next_line();
            scanner.find("MESH_VERTEX")?;
            scanner.read_token();
            vertices.push(read_vector(scanner)? * self.config.scale);
        }

        scanner.find("MESH_FACE_LIST")?;
        let mut faces = Vec::with_capacity(face_count.min(MAX_RESERVE));
        let mut outlines = Vec::with_capacity(face_count.min(MAX_RESERVE));
        for face_index in 0..face_count {
            scanner.next_line();
            scanner.find("MESH_FACE")?;
            // Face number and the "A:" label
            scanner.read_token();
            scanner.read_token();
            let a = scanner.read_index()?;
            scanner.read_token();
            let b = scanner.read_index()?;
            scanner.read_token();
            let c = scanner.read_index()?;

            scanner.find("AB:")?;
            let ab = scanner.read_int()? > 0;
            scanner.find("BC:")?;
            let bc = scanner.read_int()? > 0;
            scanner.find("CA:")?;
            let ca = scanner.read_int()? > 0;

            let face = Face::new(a, b, c);
            if let Some(&index) = face.indices().iter().find(|&&i| i >= vertex_count) {
                return Err(LoadError::FaceIndex {
                    mesh: name,
                    face: face_index,
                    index,
                    vertex_count,
                });
            }
            faces.push(face);
            outlines.push(Outline::new(ab, bc, ca));
        }

        // Vertices shared by several faces are listed once per face; the
        // last listing wins
        let mut normals: Vec<Option<Vector3>> = vec![None; vertex_count];
        scanner.find("MESH_NORMALS")?;
        for _ in 0..face_count {
            scanner.find("*MESH_FACENORMAL")?;
            scanner.find("*MESH_FACENORMAL")?;
            for corner in 0..3 {
                if corner > 0 {
                    scanner.next_line();
                }
                scanner.find("MESH_VERTEXNORMAL")?;
                let index = scanner.read_index()?;
                let normal = read_vector(scanner)?;
                match normals.get_mut(index) {
                    Some(slot) => *slot = Some(normal),
                    None => {
                        return Err(LoadError::NormalIndex {
                            mesh: name,
                            index,
                            vertex_count,
                        })
                    }
                }
            }
        }

        let missing = normals.iter().filter(|n| n.is_none()).count();
        if missing > 0 {
            warn!("mesh `{}`: {} vertices have no normal, using zero", name, missing);
        }
        let vertex_normals = normals
            .into_iter()
            .map(|n| n.unwrap_or_else(Vector3::zeros))
            .collect();

        scanner.find("MATERIAL_REF")?;
        let material_ref = scanner.read_index()?;
        let last_parsed = materials.last().map(|m| m.color).unwrap_or(Rgb::WHITE);
        let tint = match self.config.tint {
            TintSource::Referenced => match materials.get(material_ref) {
                Some(material) => material.color,
                None => {
                    warn!(
                        "mesh `{}`: material reference {} out of range ({} materials), using the last material",
                        name,
                        material_ref,
                        materials.len()
                    );
                    last_parsed
                }
            },
            TintSource::LastParsed => last_parsed,
        };

        Ok(Mesh {
            name,
            tint,
            polygons: faces,
            vertices,
            vertex_normals,
            outlines,
        })
    }
}

fn read_materials(scanner: &mut Scanner) -> Result<Vec<Material>, LoadError> {
    scanner.find("MATERIAL_COUNT")?;
    let count = scanner.read_index()?;
    let mut materials = Vec::with_capacity(count.min(MAX_RESERVE));
    for _ in 0..count {
        scanner.find("MATERIAL_NAME")?;
        let id = scanner.read_name();
        scanner.find("MATERIAL_DIFFUSE")?;
        let r = scanner.read_float()?;
        let g = scanner.read_float()?;
        let b = scanner.read_float()?;
        materials.push(Material::new(id, Rgb::from_unit(r, g, b)));
    }
    Ok(materials)
}

fn read_vector(scanner: &mut Scanner) -> Result<Vector3, LoadError> {
    let x = scanner.read_float()?;
    let y = scanner.read_float()?;
    let z = scanner.read_float()?;
    Ok(Vector3::new(x, y, z))
}
