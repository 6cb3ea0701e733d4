//! The two coordinate-frame framings of a physical bounding box.
//!
//! A box measured on an uploaded model lives in the **scene frame**
//! (Y-up, the convention of the render layer and most interchange
//! formats). The same box on the build plate lives in the **printer
//! frame** (Z-up). These are two semantic framings of one physical
//! object; conversion between them is explicit and named, never
//! inlined ad hoc.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default print-bed cube edge in millimeters.
pub const DEFAULT_BED_MM: f64 = 200.0;

/// Axis-aligned dimensions in the scene frame (**Y is up**), millimeters.
///
/// # Example
///
/// ```
/// use print_types::SceneDims;
///
/// // A model 40 wide, 60 tall, 40 deep (scene convention)
/// let dims = SceneDims::new(40.0, 60.0, 40.0);
/// let printed = dims.to_printer();
///
/// // On the build plate the 60 mm height is along printer Z
/// assert!((printed.z - 60.0).abs() < f64::EPSILON);
/// assert_eq!(printed.to_scene(), dims);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SceneDims {
    /// Width (scene X), mm.
    pub x: f64,
    /// Height (scene Y, the up axis), mm.
    pub y: f64,
    /// Depth (scene Z), mm.
    pub z: f64,
}

impl SceneDims {
    /// Create scene-frame dimensions.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Convert to the printer frame (Z-up).
    ///
    /// The mapping is `printer.x = scene.x`, `printer.y = scene.z`,
    /// `printer.z = scene.y`. [`PrinterDims::to_scene`] is the exact
    /// inverse, so the round trip is the identity.
    #[inline]
    #[must_use]
    pub const fn to_printer(self) -> PrinterDims {
        PrinterDims {
            x: self.x,
            y: self.z,
            z: self.y,
        }
    }

    /// Uniformly scale all axes.
    #[inline]
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// True when every extent is zero or non-finite is absent.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.x <= 0.0 && self.y <= 0.0 && self.z <= 0.0
    }
}

/// Axis-aligned dimensions in the printer frame (**Z is up**), millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrinterDims {
    /// Width across the bed (printer X), mm.
    pub x: f64,
    /// Depth across the bed (printer Y), mm.
    pub y: f64,
    /// Build height (printer Z, the up axis), mm.
    pub z: f64,
}

impl PrinterDims {
    /// Create printer-frame dimensions.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Convert back to the scene frame (Y-up).
    ///
    /// Exact inverse of [`SceneDims::to_printer`].
    #[inline]
    #[must_use]
    pub const fn to_scene(self) -> SceneDims {
        SceneDims {
            x: self.x,
            y: self.z,
            z: self.y,
        }
    }

    /// Longest extent, mm.
    #[inline]
    #[must_use]
    pub fn longest(&self) -> f64 {
        self.x.max(self.y).max(self.z)
    }

    /// Shortest extent, mm.
    #[inline]
    #[must_use]
    pub fn shortest(&self) -> f64 {
        self.x.min(self.y).min(self.z)
    }

    /// Aspect ratio (longest / shortest extent).
    ///
    /// Returns `f64::INFINITY` when the shortest extent is zero.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        let min = self.shortest();
        if min.abs() < f64::EPSILON {
            f64::INFINITY
        } else {
            self.longest() / min
        }
    }

    /// Bounding-box volume in cm³ (`x·y·z / 1000`).
    #[inline]
    #[must_use]
    pub fn bounds_volume_cm3(&self) -> f64 {
        self.x * self.y * self.z / 1000.0
    }

    /// Check every extent against a cubic bed of edge `bed_mm`.
    ///
    /// An extent exactly equal to the bed edge still fits.
    #[inline]
    #[must_use]
    pub fn fits_within(&self, bed_mm: f64) -> bool {
        self.x <= bed_mm && self.y <= bed_mm && self.z <= bed_mm
    }

    /// True when every extent is zero (an unanalyzable model).
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.x <= 0.0 && self.y <= 0.0 && self.z <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_is_identity() {
        let dims = SceneDims::new(1.0, 2.0, 3.0);
        assert_eq!(dims.to_printer().to_scene(), dims);

        let printed = PrinterDims::new(4.0, 5.0, 6.0);
        assert_eq!(printed.to_scene().to_printer(), printed);
    }

    #[test]
    fn height_axis_maps_to_printer_z() {
        let dims = SceneDims::new(10.0, 60.0, 20.0);
        let printed = dims.to_printer();
        assert!((printed.x - 10.0).abs() < f64::EPSILON);
        assert!((printed.y - 20.0).abs() < f64::EPSILON);
        assert!((printed.z - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn aspect_ratio() {
        let dims = PrinterDims::new(10.0, 2.0, 1.0);
        assert!((dims.aspect_ratio() - 10.0).abs() < 1e-10);

        let flat = PrinterDims::new(10.0, 2.0, 0.0);
        assert!(flat.aspect_ratio().is_infinite());
    }

    #[test]
    fn bounds_volume() {
        let dims = PrinterDims::new(40.0, 40.0, 60.0);
        assert!((dims.bounds_volume_cm3() - 96.0).abs() < 1e-10);
    }

    #[test]
    fn bed_fit_boundary() {
        let exact = PrinterDims::new(DEFAULT_BED_MM, 50.0, 50.0);
        assert!(exact.fits_within(DEFAULT_BED_MM));

        let over = PrinterDims::new(DEFAULT_BED_MM + 0.01, 50.0, 50.0);
        assert!(!over.fits_within(DEFAULT_BED_MM));
    }

    #[test]
    fn scaled_dims() {
        let dims = SceneDims::new(1.0, 2.0, 3.0).scaled(10.0);
        assert_eq!(dims, SceneDims::new(10.0, 20.0, 30.0));
    }
}
