//! Immutable triangle-soup geometry.

use crate::Aabb;
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An in-memory triangle mesh, produced once per uploaded file.
///
/// Stores vertex positions plus an optional index sequence. When
/// `indices` is `None` every consecutive run of three positions forms
/// one triangle (a raw soup, as STL parsers emit); when present, each
/// consecutive run of three indices references the position array (as
/// glTF-style parsers emit).
///
/// The geometry is treated as immutable: the analyzer extracts metrics
/// from it in a single pass and discards it. Face winding is assumed
/// counter-clockwise when viewed from outside, so [`signed_volume`]
/// is positive for a well-formed closed mesh.
///
/// [`signed_volume`]: MeshGeometry::signed_volume
///
/// # Example
///
/// ```
/// use print_types::MeshGeometry;
///
/// let mesh = MeshGeometry::from_raw(
///     &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
///     Some(&[0, 1, 2]),
/// );
/// assert_eq!(mesh.triangle_count(), 1);
/// assert!(!mesh.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeshGeometry {
    /// Vertex positions in the scene frame, source units.
    pub positions: Vec<Point3<f64>>,

    /// Optional triangle indices into `positions`.
    /// Each consecutive triple is one face.
    pub indices: Option<Vec<u32>>,
}

impl MeshGeometry {
    /// Create an empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            positions: Vec::new(),
            indices: None,
        }
    }

    /// Create a mesh from positions and optional indices.
    #[inline]
    #[must_use]
    pub const fn from_parts(positions: Vec<Point3<f64>>, indices: Option<Vec<u32>>) -> Self {
        Self { positions, indices }
    }

    /// Create a mesh from raw flat arrays.
    ///
    /// `positions` is `[x0, y0, z0, x1, y1, z1, ...]`. An index slice
    /// whose length is not divisible by 3, or a position slice that is
    /// not, yields an empty mesh rather than a panic.
    ///
    /// # Example
    ///
    /// ```
    /// use print_types::MeshGeometry;
    ///
    /// let soup = MeshGeometry::from_raw(
    ///     &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
    ///     None,
    /// );
    /// assert_eq!(soup.triangle_count(), 1);
    /// ```
    #[must_use]
    pub fn from_raw(positions: &[f64], indices: Option<&[u32]>) -> Self {
        if positions.len() % 3 != 0 {
            return Self::new();
        }
        if let Some(idx) = indices {
            if idx.len() % 3 != 0 {
                return Self::new();
            }
        }

        Self {
            positions: positions
                .chunks_exact(3)
                .map(|c| Point3::new(c[0], c[1], c[2]))
                .collect(),
            indices: indices.map(<[u32]>::to_vec),
        }
    }

    /// Number of resolvable triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(idx) => idx.len() / 3,
            None => self.positions.len() / 3,
        }
    }

    /// Check if the mesh has no vertices or no resolvable triangles.
    ///
    /// Callers must treat an empty mesh as "unanalyzable", not as a
    /// valid tiny object.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.triangle_count() == 0
    }

    /// Iterate over triangles as position triples.
    ///
    /// Indexed faces referencing out-of-range vertices are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f64>; 3]> + '_ {
        let n = self.triangle_count();
        (0..n).filter_map(move |i| self.triangle(i))
    }

    fn triangle(&self, face: usize) -> Option<[Point3<f64>; 3]> {
        match &self.indices {
            Some(idx) => {
                let tri = idx.get(face * 3..face * 3 + 3)?;
                Some([
                    *self.positions.get(tri[0] as usize)?,
                    *self.positions.get(tri[1] as usize)?,
                    *self.positions.get(tri[2] as usize)?,
                ])
            }
            None => {
                let tri = self.positions.get(face * 3..face * 3 + 3)?;
                Some([tri[0], tri[1], tri[2]])
            }
        }
    }

    /// Compute the axis-aligned bounding box over all vertices.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        if self.positions.is_empty() {
            return Aabb::empty();
        }
        Aabb::from_points(self.positions.iter())
    }

    /// Compute the signed volume of the mesh.
    ///
    /// Uses the divergence theorem: the signed volume is the sum over
    /// every triangle `(A, B, C)` of the signed tetrahedron volume
    /// `A · (B × C) / 6`. Exact for a closed, consistently-wound
    /// manifold mesh; for anything else the result is plausible but
    /// wrong, which is why the analyzer sanity-checks it against the
    /// bounding-box volume.
    ///
    /// # Returns
    ///
    /// - Positive value: normals point outward (correct orientation)
    /// - Negative value: normals point inward (inside-out mesh)
    /// - Near-zero: mesh is not closed or has inconsistent winding
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        let mut volume = 0.0;

        for [a, b, c] in self.triangles() {
            // Using mul_add for better numerical accuracy
            let cross = Vector3::new(
                b.y.mul_add(c.z, -(b.z * c.y)),
                b.z.mul_add(c.x, -(b.x * c.z)),
                b.x.mul_add(c.y, -(b.y * c.x)),
            );
            volume += a.z.mul_add(cross.z, a.x.mul_add(cross.x, a.y * cross.y));
        }

        volume / 6.0
    }

    /// Compute the absolute volume of the mesh.
    ///
    /// Returns the absolute value of [`signed_volume`].
    ///
    /// [`signed_volume`]: MeshGeometry::signed_volume
    #[inline]
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }
}

/// Build a closed axis-aligned box mesh from the origin to `(x, y, z)`.
///
/// Faces are wound counter-clockwise viewed from outside, so the signed
/// volume is positive. Useful for tests and calibration.
///
/// # Example
///
/// ```
/// use print_types::solid_box;
///
/// let cube = solid_box(1.0, 1.0, 1.0);
/// assert_eq!(cube.triangle_count(), 12);
/// assert!((cube.signed_volume() - 1.0).abs() < 1e-10);
/// ```
#[must_use]
pub fn solid_box(x: f64, y: f64, z: f64) -> MeshGeometry {
    let positions = vec![
        Point3::new(0.0, 0.0, 0.0), // 0
        Point3::new(x, 0.0, 0.0),   // 1
        Point3::new(x, y, 0.0),     // 2
        Point3::new(0.0, y, 0.0),   // 3
        Point3::new(0.0, 0.0, z),   // 4
        Point3::new(x, 0.0, z),     // 5
        Point3::new(x, y, z),       // 6
        Point3::new(0.0, y, z),     // 7
    ];

    // 12 triangles (2 per face), CCW winding viewed from outside
    let indices = vec![
        0, 2, 1, 0, 3, 2, // bottom (z = 0)
        4, 5, 6, 4, 6, 7, // top (z = max)
        0, 1, 5, 0, 5, 4, // front (y = 0)
        3, 7, 6, 3, 6, 2, // back (y = max)
        0, 4, 7, 0, 7, 3, // left (x = 0)
        1, 2, 6, 1, 6, 5, // right (x = max)
    ];

    MeshGeometry::from_parts(positions, Some(indices))
}
