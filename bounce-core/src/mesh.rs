//! Wavefront OBJ geometry for deriving a sphere's radius.
//!
//! Parsing goes through `tobj`; only positions matter to the physics core.
//! Faces are triangulated and expanded into a flat corner list, the same
//! layout a renderer would upload, so "the n-th vertex" means the same thing
//! here as it does in a vertex buffer.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::types::Vec3;

/// Error type for mesh loading operations.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("OBJ parsing error: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("mesh has no faces")]
    Empty,
    #[error("mesh has {len} expanded vertices, no vertex #{index}")]
    VertexOutOfRange { index: usize, len: usize },
    #[error("mesh radius is degenerate ({0})")]
    DegenerateRadius(f64),
}

/// Triangulated mesh geometry.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Corner positions, three per triangle
    pub vertices: Vec<Vec3>,
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
    }
}

impl Mesh {
    /// Read and parse an OBJ file. Material libraries are not loaded.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MeshError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let mesh = Self::parse(&contents)?;
        debug!(
            path = %path.as_ref().display(),
            triangles = mesh.triangle_count(),
            "loaded mesh"
        );
        Ok(mesh)
    }

    /// Parse OBJ text. Every object in the file is merged into one mesh.
    pub fn parse(source: &str) -> Result<Self, MeshError> {
        let (models, _materials) =
            tobj::load_obj_buf(&mut source.as_bytes(), &load_options(), |_| {
                Ok((Vec::new(), Default::default()))
            })?;

        let mut vertices = Vec::new();
        for model in &models {
            let positions = &model.mesh.positions;
            for &index in &model.mesh.indices {
                let i = index as usize * 3;
                let p = positions.get(i..i + 3).ok_or(MeshError::VertexOutOfRange {
                    index: index as usize,
                    len: positions.len() / 3,
                })?;
                vertices.push(Vec3::new(p[0] as f64, p[1] as f64, p[2] as f64));
            }
        }

        if vertices.is_empty() {
            return Err(MeshError::Empty);
        }
        Ok(Self { vertices })
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Distinct positions in first-seen order. A corner shared by several
    /// triangles appears once.
    pub fn unique_positions(&self) -> Vec<Vec3> {
        // + 0.0 folds -0.0 into 0.0
        let key = |v: &Vec3| [(v.x + 0.0).to_bits(), (v.y + 0.0).to_bits(), (v.z + 0.0).to_bits()];
        let mut seen = HashSet::new();
        self.vertices
            .iter()
            .copied()
            .filter(|v| seen.insert(key(v)))
            .collect()
    }

    /// Mean of the distinct vertex positions.
    pub fn centroid(&self) -> Vec3 {
        let positions = self.unique_positions();
        let sum = positions.iter().fold(Vec3::ZERO, |acc, &v| acc + v);
        sum / positions.len().max(1) as f64
    }

    /// Largest distance from the centroid to any vertex.
    ///
    /// For a sphere mesh this is the sphere's radius regardless of which
    /// vertex happens to be listed first.
    pub fn bounding_radius(&self) -> Result<f64, MeshError> {
        let center = self.centroid();
        let radius = self
            .vertices
            .iter()
            .map(|v| v.distance(&center))
            .fold(0.0_f64, f64::max);
        check_radius(radius)
    }

    /// Distance of the `index`-th expanded vertex from the local origin.
    ///
    /// Only correct when that vertex lies on the sphere's surface and the
    /// mesh is centered on the origin. Kept for matching older scenes that
    /// measured their radius this way (`index = 3`).
    pub fn vertex_radius(&self, index: usize) -> Result<f64, MeshError> {
        let vertex = self.vertices.get(index).ok_or(MeshError::VertexOutOfRange {
            index,
            len: self.vertices.len(),
        })?;
        check_radius(vertex.magnitude())
    }
}

fn check_radius(radius: f64) -> Result<f64, MeshError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(radius)
    } else {
        Err(MeshError::DegenerateRadius(radius))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Octahedron of radius 2 centered on the origin
    const OCTAHEDRON: &str = "\
# octahedron
mtllib ball.mtl
o ball
v 2 0 0
v -2 0 0
v 0 2 0
v 0 -2 0
v 0 0 2
v 0 0 -2
s off
f 1 3 5
f 3 2 5
f 2 4 5
f 4 1 5
f 3 1 6
f 2 3 6
f 4 2 6
f 1 4 6
";

    #[test]
    fn test_parse_counts_triangles() {
        let mesh = Mesh::parse(OCTAHEDRON).unwrap();
        assert_eq!(mesh.triangle_count(), 8);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.vertices[0], Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_bounding_radius() {
        let mesh = Mesh::parse(OCTAHEDRON).unwrap();
        assert_relative_eq!(mesh.bounding_radius().unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_centroid_ignores_shared_corners() {
        // Vertex 1 is used by all three faces, the others by two each.
        // Weighting by corner would pull the center toward +x.
        let source = "\
v 1 0 0
v -1 0 0
v 0 1 0
v 0 -1 0
f 1 3 2
f 1 2 4
f 1 4 3
";
        let mesh = Mesh::parse(source).unwrap();
        assert_eq!(mesh.vertices.len(), 9);
        assert_eq!(mesh.unique_positions().len(), 4);
        assert_eq!(mesh.centroid(), Vec3::ZERO);
        assert_relative_eq!(mesh.bounding_radius().unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bounding_radius_uses_farthest_vertex() {
        // Vertex #3 of the expanded list sits closer than the true extent,
        // so the single-vertex shortcut underestimates.
        let source = "\
v 0 0 0.5
v 0 0.5 0
v 0.5 0 0
v 3 0 0
f 1 2 3
f 2 1 4
";
        let mesh = Mesh::parse(source).unwrap();
        let shortcut = mesh.vertex_radius(3).unwrap();
        let extent = mesh.bounding_radius().unwrap();
        assert!(shortcut < extent);
    }

    #[test]
    fn test_quad_is_triangulated() {
        let source = "\
v -1 0 -1
v 1 0 -1
v 1 0 1
v -1 0 1
f 1 2 3 4
";
        let mesh = Mesh::parse(source).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn test_negative_indices() {
        let source = "\
v 1 0 0
v 0 1 0
v 0 0 1
f -3 -2 -1
";
        let mesh = Mesh::parse(source).unwrap();
        assert_eq!(mesh.vertices[0], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.vertices[2], Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_bad_number_is_reported() {
        let result = Mesh::parse("v 1 0 0\nv 0 x 0\nf 1 2 1\n");
        assert!(matches!(result, Err(MeshError::Obj(_))));
    }

    #[test]
    fn test_empty_mesh() {
        assert!(matches!(Mesh::parse("v 1 2 3\n"), Err(MeshError::Empty)));
    }

    #[test]
    fn test_vertex_radius_out_of_range() {
        let mesh = Mesh::parse(OCTAHEDRON).unwrap();
        match mesh.vertex_radius(24) {
            Err(MeshError::VertexOutOfRange { index, len }) => {
                assert_eq!(index, 24);
                assert_eq!(len, 24);
            }
            other => panic!("Expected VertexOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_degenerate_radius() {
        let mesh = Mesh::parse("v 0 0 0\nf 1 1 1\n").unwrap();
        assert!(matches!(
            mesh.bounding_radius(),
            Err(MeshError::DegenerateRadius(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ball.obj");
        fs::write(&path, OCTAHEDRON).unwrap();

        let mesh = Mesh::load(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 8);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Mesh::load("/nonexistent/ball.obj");
        assert!(matches!(result, Err(MeshError::Io(_))));
    }
}
