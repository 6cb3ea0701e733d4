//! The canonical orientation set.

use print_types::PrinterDims;

/// One of the three canonical build orientations.
///
/// Each is a fixed permutation of the printer-axis triple; the set is
/// closed. Applying a permutation twice is not generally the identity,
/// but every permutation is a bijection on the tuple: no axis is
/// duplicated or dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Identity: the model prints as converted from the scene frame.
    Upright,
    /// Laid on its side by a quarter turn about printer X
    /// (depth and height trade places).
    OnSideX,
    /// Laid on its side by a quarter turn about printer Y
    /// (width and height trade places).
    OnSideY,
}

impl Orientation {
    /// All canonical orientations, in evaluation order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Upright, Self::OnSideX, Self::OnSideY]
    }

    /// Stable key for UI selection and persistence.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upright => "upright",
            Self::OnSideX => "on-side-x",
            Self::OnSideY => "on-side-y",
        }
    }

    /// Apply this orientation's axis permutation to printer-frame
    /// dimensions.
    #[must_use]
    pub const fn apply(self, dims: PrinterDims) -> PrinterDims {
        match self {
            Self::Upright => dims,
            Self::OnSideX => PrinterDims::new(dims.x, dims.z, dims.y),
            Self::OnSideY => PrinterDims::new(dims.z, dims.y, dims.x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upright_is_identity() {
        let dims = PrinterDims::new(1.0, 2.0, 3.0);
        assert_eq!(Orientation::Upright.apply(dims), dims);
    }

    #[test]
    fn every_permutation_is_a_bijection() {
        let dims = PrinterDims::new(1.0, 2.0, 3.0);
        for orientation in Orientation::all() {
            let out = orientation.apply(dims);
            let mut extents = [out.x, out.y, out.z];
            extents.sort_by(f64::total_cmp);
            // Same multiset of extents: nothing duplicated or dropped
            assert_eq!(extents, [1.0, 2.0, 3.0], "{}", orientation.as_str());
        }
    }

    #[test]
    fn on_side_x_swaps_depth_and_height() {
        let dims = PrinterDims::new(1.0, 2.0, 3.0);
        assert_eq!(Orientation::OnSideX.apply(dims), PrinterDims::new(1.0, 3.0, 2.0));
    }

    #[test]
    fn on_side_y_swaps_width_and_height() {
        let dims = PrinterDims::new(1.0, 2.0, 3.0);
        assert_eq!(Orientation::OnSideY.apply(dims), PrinterDims::new(3.0, 2.0, 1.0));
    }

    #[test]
    fn keys_are_stable() {
        assert_eq!(Orientation::Upright.as_str(), "upright");
        assert_eq!(Orientation::OnSideX.as_str(), "on-side-x");
        assert_eq!(Orientation::OnSideY.as_str(), "on-side-y");
    }
}
