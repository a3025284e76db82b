/// Geometry primitives for 3D rendering
use nalgebra::{Point2, Vector3};

use crate::error::{Error, Result};
use crate::math::{Mat4, Vec4, Vec4Ext};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec4,
    pub normal: Vec4,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Vec4::point(x, y, z),
            normal: Vec4::direction(nx, ny, nz),
        }
    }

    pub fn from_parts(position: Vec4, normal: Vec4) -> Self {
        Self { position, normal }
    }

    /// Both position and normal go through `matrix`.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        Self {
            position: matrix * self.position,
            normal: matrix * self.normal,
        }
    }
}

/// Rotational order of a projected triangle as seen on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    /// Front facing
    Clockwise,
    CounterClockwise,
    /// Zero area
    Degenerate,
}

impl Winding {
    /// Classify three surface-space points (y grows downward).
    pub fn of(a: Point2<f32>, b: Point2<f32>, c: Point2<f32>) -> Self {
        let area = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
        if area > 0.0 {
            Winding::Clockwise
        } else if area < 0.0 {
            Winding::CounterClockwise
        } else {
            Winding::Degenerate
        }
    }

    pub fn is_front_facing(self) -> bool {
        self == Winding::Clockwise
    }
}

/// A triangle face defined by three vertices.
///
/// A triangle faces the camera when its vertices run clockwise as seen from
/// the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Build a triangle from three positions and give every vertex the face normal.
    pub fn from_positions(a: Vec4, b: Vec4, c: Vec4) -> Result<Self> {
        let mut triangle = Self::new(
            Vertex::from_parts(a, Vec4::zeros()),
            Vertex::from_parts(b, Vec4::zeros()),
            Vertex::from_parts(c, Vec4::zeros()),
        );
        triangle.set_auto_normal()?;
        Ok(triangle)
    }

    /// A small front-facing triangle around the origin.
    pub fn centered() -> Self {
        Self::new(
            Vertex::new(-1.0, -1.0, 0.0, 0.0, 0.0, -1.0),
            Vertex::new(0.0, 1.0, 0.0, 0.0, 0.0, -1.0),
            Vertex::new(1.0, -1.0, 0.0, 0.0, 0.0, -1.0),
        )
    }

    /// Calculate the face normal from the triangle's vertices.
    ///
    /// `(v1 - v0) × (v2 - v0)`, normalized. For a clockwise (front-facing)
    /// triangle this points away from the viewer.
    pub fn calculate_normal(&self) -> Result<Vec4> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1
            .cross3(&edge2)
            .try_normalized()
            .map_err(|_| Error::degenerate("triangle has zero area"))
    }

    pub fn set_normal(&mut self, normal: Vec4) {
        for vertex in &mut self.vertices {
            vertex.normal = normal;
        }
    }

    pub fn set_auto_normal(&mut self) -> Result<()> {
        let normal = self.calculate_normal()?;
        self.set_normal(normal);
        Ok(())
    }

    /// Copy with the winding order flipped.
    pub fn reversed(&self) -> Self {
        let [v0, v1, v2] = self.vertices;
        Self::new(v2, v1, v0)
    }

    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let [v0, v1, v2] = self.vertices;
        Self::new(
            v0.transformed(matrix),
            v1.transformed(matrix),
            v2.transformed(matrix),
        )
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.triangles.len() * 3
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    /// Return a new mesh with every vertex put through `matrix`.
    ///
    /// Normals use the same matrix as positions, which is only correct for
    /// rotations and uniform scale. Nothing downstream shades with them yet.
    pub fn transform(&self, matrix: &Mat4) -> Mesh {
        Mesh {
            triangles: self
                .triangles
                .iter()
                .map(|triangle| triangle.transformed(matrix))
                .collect(),
        }
    }

    pub fn translated(&self, offset: Vector3<f32>) -> Mesh {
        self.transform(&Mat4::new_translation(&offset))
    }

    /// Two front-facing triangles covering [-1, 1]² in the z = 0 plane.
    pub fn centered_quad() -> Self {
        let n = (0.0, 0.0, -1.0);
        let v = |x: f32, y: f32| Vertex::new(x, y, 0.0, n.0, n.1, n.2);
        Self {
            triangles: vec![
                Triangle::new(v(1.0, 1.0), v(1.0, -1.0), v(-1.0, -1.0)),
                Triangle::new(v(-1.0, -1.0), v(-1.0, 1.0), v(1.0, 1.0)),
            ],
        }
    }

    /// Create a cube mesh. Faces wind clockwise seen from outside and carry
    /// outward normals.
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let mut mesh = Self::with_capacity(12);

        // Each face is listed as (normal, four corners clockwise from outside).
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            // Front
            (
                [0.0, 0.0, 1.0],
                [
                    [-half, -half, half],
                    [-half, half, half],
                    [half, half, half],
                    [half, -half, half],
                ],
            ),
            // Back
            (
                [0.0, 0.0, -1.0],
                [
                    [half, -half, -half],
                    [half, half, -half],
                    [-half, half, -half],
                    [-half, -half, -half],
                ],
            ),
            // Top
            (
                [0.0, 1.0, 0.0],
                [
                    [-half, half, half],
                    [-half, half, -half],
                    [half, half, -half],
                    [half, half, half],
                ],
            ),
            // Bottom
            (
                [0.0, -1.0, 0.0],
                [
                    [-half, -half, -half],
                    [-half, -half, half],
                    [half, -half, half],
                    [half, -half, -half],
                ],
            ),
            // Right
            (
                [1.0, 0.0, 0.0],
                [
                    [half, -half, half],
                    [half, half, half],
                    [half, half, -half],
                    [half, -half, -half],
                ],
            ),
            // Left
            (
                [-1.0, 0.0, 0.0],
                [
                    [-half, -half, -half],
                    [-half, half, -half],
                    [-half, half, half],
                    [-half, -half, half],
                ],
            ),
        ];

        for ([nx, ny, nz], corners) in faces {
            let v = |[x, y, z]: [f32; 3]| Vertex::new(x, y, z, nx, ny, nz);
            mesh.add_triangle(Triangle::new(v(corners[0]), v(corners[1]), v(corners[2])));
            mesh.add_triangle(Triangle::new(v(corners[0]), v(corners[2]), v(corners[3])));
        }

        mesh
    }
}

impl From<Vec<Triangle>> for Mesh {
    fn from(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }
}

impl<'a> IntoIterator for &'a Mesh {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}
