//! Dimension and volume extraction.

use print_types::{MeshGeometry, SceneDims, SourceUnit};
use tracing::debug;

/// A mesh volume above this multiple of its bounding-box volume is
/// geometrically impossible and indicates a corrupt or non-manifold
/// mesh (the small margin absorbs floating-point slop on meshes that
/// fill their box exactly).
pub const VOLUME_TOLERANCE_RATIO: f64 = 1.15;

/// Empirical average solid fraction of printable models, used to
/// derive a conservative volume from the bounding box when the mesh
/// volume cannot be trusted.
pub const FALLBACK_OCCUPANCY: f64 = 0.32;

/// How the reported volume was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeMethod {
    /// Divergence-theorem volume of the mesh itself.
    Mesh,
    /// Conservative bounding-box estimate; geometry integrity is
    /// unverified.
    Fallback,
}

impl VolumeMethod {
    /// Human-readable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mesh => "mesh",
            Self::Fallback => "fallback",
        }
    }
}

/// Physical metrics extracted from one analysis pass over a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshMetrics {
    /// Axis-aligned size in the scene frame, millimeters.
    pub size: SceneDims,
    /// Material volume in cm³.
    pub volume_cm3: f64,
    /// How `volume_cm3` was obtained.
    pub volume_method: VolumeMethod,
}

impl MeshMetrics {
    /// Zero metrics for an empty or unreadable mesh.
    #[must_use]
    pub const fn unanalyzable() -> Self {
        Self {
            size: SceneDims::new(0.0, 0.0, 0.0),
            volume_cm3: 0.0,
            volume_method: VolumeMethod::Fallback,
        }
    }

    /// True when the mesh could not be analyzed at all.
    ///
    /// Callers must treat this as "no usable geometry", never as a
    /// valid tiny object.
    #[must_use]
    pub fn is_unanalyzable(&self) -> bool {
        self.size.is_zero() && self.volume_cm3 <= 0.0
    }

    /// Bounding-box volume in cm³ of the measured size.
    #[must_use]
    pub fn bounds_volume_cm3(&self) -> f64 {
        self.size.x * self.size.y * self.size.z / 1000.0
    }
}

/// Analyze a parsed mesh: bounding-box dimensions plus sanity-checked
/// volume, scaled from the declared source unit to mm / cm³.
///
/// An empty mesh yields [`MeshMetrics::unanalyzable`]. A mesh whose
/// divergence-theorem volume is non-finite, non-positive, or above
/// [`VOLUME_TOLERANCE_RATIO`] times the bounding-box volume gets the
/// conservative fallback `bounds_volume × `[`FALLBACK_OCCUPANCY`]
/// instead, tagged [`VolumeMethod::Fallback`].
///
/// # Example
///
/// ```
/// use print_analyze::analyze_geometry;
/// use print_types::{solid_box, SourceUnit};
///
/// // A 40 mm cube modeled in meters
/// let mesh = solid_box(0.04, 0.04, 0.04);
/// let metrics = analyze_geometry(&mesh, SourceUnit::Meters);
///
/// assert!((metrics.size.x - 40.0).abs() < 1e-9);
/// assert!((metrics.volume_cm3 - 64.0).abs() < 1e-6);
/// ```
#[must_use]
pub fn analyze_geometry(mesh: &MeshGeometry, unit: SourceUnit) -> MeshMetrics {
    if mesh.is_empty() {
        return MeshMetrics::unanalyzable();
    }

    let scale = unit.linear_scale();
    let extent = mesh.bounds().size();
    let size = SceneDims::new(extent.x * scale, extent.y * scale, extent.z * scale);

    // mm³ → cm³ after unit scaling (scale is linear, volume scales cubed)
    let mesh_volume_cm3 = mesh.volume() * scale.powi(3) / 1000.0;
    let bounds_volume_cm3 = size.x * size.y * size.z / 1000.0;

    let credible = mesh_volume_cm3.is_finite()
        && mesh_volume_cm3 > 0.0
        && mesh_volume_cm3 <= VOLUME_TOLERANCE_RATIO * bounds_volume_cm3;

    if credible {
        MeshMetrics {
            size,
            volume_cm3: mesh_volume_cm3,
            volume_method: VolumeMethod::Mesh,
        }
    } else {
        debug!(
            mesh_volume_cm3,
            bounds_volume_cm3, "mesh volume not credible, using occupancy fallback"
        );
        MeshMetrics {
            size,
            volume_cm3: bounds_volume_cm3 * FALLBACK_OCCUPANCY,
            volume_method: VolumeMethod::Fallback,
        }
    }
}
