//! Uniform spatial coordinate grids.

use ndarray as nd;
use crate::error::TdseError;

pub type GResult<T> = Result<T, TdseError>;

// relative deviation in grid spacing tolerated before a grid is considered
// non-uniform
pub(crate) const UNIFORM_RTOL: f64 = 1e-8;

/// Simple record to keep track of a uniformly spaced coordinate array.
///
/// Arrays borrowed from this type are guaranteed to have at least three points
/// with uniform, positive spacing.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    // coordinate array
    x: nd::Array1<f64>,
    // coordinate array grid spacing
    dx: f64,
}

impl Grid {
    /// Create a new `Grid` from "linspace-style" arguments (start, inclusive
    /// end, and an array length).
    pub fn linspace(x0: f64, x1: f64, n: usize) -> GResult<Self> {
        Self::from_array(nd::Array1::linspace(x0, x1, n))
    }

    /// Create a new `Grid` from a bare coordinate array, checking that it is
    /// uniformly spaced and increasing.
    pub fn from_array(x: nd::Array1<f64>) -> GResult<Self> {
        let n = x.len();
        TdseError::check_config(
            n >= 3,
            || format!("spatial grid must have at least 3 points; got {n}"),
        )?;
        let dx = (x[n - 1] - x[0]) / (n - 1) as f64;
        TdseError::check_config(
            dx.is_finite() && dx > 0.0,
            || format!("spatial grid must be increasing; got spacing {dx}"),
        )?;
        let uniform
            = x.iter().zip(x.iter().skip(1))
            .all(|(xk, xkp1)| ((xkp1 - xk) - dx).abs() <= UNIFORM_RTOL * dx);
        TdseError::check_config(
            uniform,
            || "spatial grid must be uniformly spaced".into(),
        )?;
        Ok(Self { x, dx })
    }

    /// Get a reference to the coordinate array.
    pub fn get_x(&self) -> &nd::Array1<f64> { &self.x }

    /// Get the coordinate array grid spacing.
    pub fn get_dx(&self) -> f64 { self.dx }

    /// Get the length of the coordinate array.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.x.len() }

    /// Return the coordinates of the two grid endpoints, or `None` if the grid
    /// has been released.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        let mut x = self.x.iter();
        x.next().copied().zip(x.next_back().copied())
    }

    /// Drop the coordinate array, leaving an empty grid behind.
    pub(crate) fn release(&mut self) {
        self.x = nd::Array1::zeros(0);
        self.dx = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_spacing() {
        let grid = Grid::linspace(-20.0, 20.0, 512).unwrap();
        assert_eq!(grid.len(), 512);
        assert!((grid.get_dx() - 40.0 / 511.0).abs() < 1e-14);
        assert_eq!(grid.bounds(), Some((-20.0, 20.0)));
    }

    #[test]
    fn rejects_bad_grids() {
        assert!(Grid::linspace(0.0, 1.0, 2).is_err());
        assert!(Grid::linspace(1.0, 0.0, 10).is_err());
        assert!(Grid::from_array(nd::array![0.0, 0.1, 0.3, 0.4]).is_err());
    }

    #[test]
    fn released_grid_has_no_bounds() {
        let mut grid = Grid::linspace(-1.0, 1.0, 5).unwrap();
        grid.release();
        assert_eq!(grid.len(), 0);
        assert_eq!(grid.bounds(), None);
    }
}
