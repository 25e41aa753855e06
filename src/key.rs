//! Spatial key quantiser: the coarse identity used by transient markers.
//!
//! The perception pipeline gives no object identity, so consecutive frames are
//! stitched together by quantising each detection into a composite
//! `(class_label, rounded position)` key. Two detections of the same class that
//! round to the same cell on every axis share a key and therefore the same
//! transient anchor.
//!
//! With the default precision of one decimal place, jitter below roughly 0.05
//! units per axis lands in one key; larger jitter, or jitter that straddles a
//! rounding boundary, produces a new key.
//!
//! # Invariants
//! - Rounding is half away from zero, never floor.
//! - Keys compare by integer cells, so equality is exact and hashing is stable.
//! - Different class labels never share a key.

use alloc::string::{String, ToString};
use core::fmt;

use nalgebra::{ComplexField, Point3};

/// Default number of decimal places kept in a key.
pub const DEFAULT_KEY_PRECISION: u8 = 1;

/// Largest supported precision. Beyond this, `f32` noise dominates the cells.
pub const MAX_KEY_PRECISION: u8 = 6;

/// Composite class + quantised-position key.
///
/// Displays as `"<class>_(<x>, <y>, <z>)"` with `precision` decimals, for
/// example `"cup_(1.0, 0.0, 0.0)"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpatialKey {
    class_label: String,
    cells: [i64; 3],
    precision: u8,
}

impl SpatialKey {
    /// Class label component.
    pub fn class_label(&self) -> &str {
        &self.class_label
    }

    /// Quantised coordinates, in units of `10^-precision`.
    pub fn cells(&self) -> [i64; 3] {
        self.cells
    }

    /// Decimal places used to build this key.
    pub fn precision(&self) -> u8 {
        self.precision
    }
}

impl fmt::Display for SpatialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_(", self.class_label)?;
        for (i, &cell) in self.cells.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write_fixed(f, cell, self.precision)?;
        }
        f.write_str(")")
    }
}

/// Write an integer cell as a fixed-point decimal without going through floats.
fn write_fixed(f: &mut fmt::Formatter<'_>, cell: i64, precision: u8) -> fmt::Result {
    if precision == 0 {
        return write!(f, "{cell}");
    }
    let scale = 10u64.pow(u32::from(precision));
    let sign = if cell < 0 { "-" } else { "" };
    let abs = cell.unsigned_abs();
    write!(
        f,
        "{sign}{}.{:0width$}",
        abs / scale,
        abs % scale,
        width = usize::from(precision)
    )
}

/// Derives [`SpatialKey`]s at a fixed decimal precision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyQuantizer {
    precision: u8,
    scale: f64,
}

impl KeyQuantizer {
    /// Quantiser keeping `precision` decimal places (clamped to [`MAX_KEY_PRECISION`]).
    pub fn new(precision: u8) -> Self {
        let precision = precision.min(MAX_KEY_PRECISION);
        let scale = (0..precision).fold(1.0f64, |s, _| s * 10.0);
        Self { precision, scale }
    }

    /// Decimal places kept by this quantiser.
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Quantise `position` and combine it with `class_label`.
    pub fn key(&self, class_label: &str, position: &Point3<f32>) -> SpatialKey {
        SpatialKey {
            class_label: class_label.to_string(),
            cells: [
                quantize_axis(position.x, self.scale),
                quantize_axis(position.y, self.scale),
                quantize_axis(position.z, self.scale),
            ],
            precision: self.precision,
        }
    }

    /// String form of [`key`](Self::key).
    pub fn key_string(&self, class_label: &str, position: &Point3<f32>) -> String {
        self.key(class_label, position).to_string()
    }
}

impl Default for KeyQuantizer {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PRECISION)
    }
}

/// Round `value * scale` half away from zero.
///
/// The coordinate is widened to `f64` before scaling, so the cell matches the
/// decimal rounding of the exact `f32` value.
///
/// `as` saturates out-of-range values and maps NaN to 0, so non-finite
/// coordinates still yield a valid (if meaningless) cell.
fn quantize_axis(value: f32, scale: f64) -> i64 {
    ComplexField::round(f64::from(value) * scale) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cup(x: f32) -> SpatialKey {
        KeyQuantizer::default().key("cup", &Point3::new(x, 0.0, 0.0))
    }

    #[test]
    fn test_nearby_positions_collide() {
        // 1.02 and 1.04 both round to 1.0
        assert_eq!(cup(1.02), cup(1.04));
    }

    #[test]
    fn test_distant_positions_differ() {
        // 1.02 → 1.0, 1.20 → 1.2
        assert_ne!(cup(1.02), cup(1.20));
    }

    #[test]
    fn test_rounds_rather_than_floors() {
        // floor would put 1.07 in the 1.0 cell; rounding puts it in 1.1
        assert_eq!(cup(1.07).cells(), [11, 0, 0]);
        assert_eq!(cup(1.07), cup(1.12));
        assert_ne!(cup(1.07), cup(1.02));
    }

    #[test]
    fn test_negative_coordinates_round_away_from_zero() {
        assert_eq!(cup(-1.07).cells(), [-11, 0, 0]);
        assert_eq!(cup(-0.04).cells(), [0, 0, 0]);
        assert_eq!(cup(-0.04), cup(0.04));
    }

    #[test]
    fn test_class_label_discriminates() {
        let q = KeyQuantizer::default();
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_ne!(q.key("cup", &p), q.key("bottle", &p));
    }

    #[test]
    fn test_display_format() {
        let q = KeyQuantizer::default();
        let k = q.key("chair", &Point3::new(2.03, 0.0, 1.01));
        assert_eq!(k.to_string(), "chair_(2.0, 0.0, 1.0)");

        let k = q.key("cup", &Point3::new(-0.26, 1.5, 10.0));
        assert_eq!(k.to_string(), "cup_(-0.3, 1.5, 10.0)");
    }

    #[test]
    fn test_display_negative_fraction_only() {
        let q = KeyQuantizer::new(2);
        let k = q.key("cup", &Point3::new(-0.05, 0.0, 0.123));
        assert_eq!(k.to_string(), "cup_(-0.05, 0.00, 0.12)");
    }

    #[test]
    fn test_precision_zero_uses_integers() {
        let q = KeyQuantizer::new(0);
        let k = q.key("table", &Point3::new(1.4, -2.6, 0.0));
        assert_eq!(k.cells(), [1, -3, 0]);
        assert_eq!(k.to_string(), "table_(1, -3, 0)");
    }

    #[test]
    fn test_precision_is_clamped() {
        let q = KeyQuantizer::new(40);
        assert_eq!(q.precision(), MAX_KEY_PRECISION);
    }

    #[test]
    fn test_key_string_matches_display() {
        let q = KeyQuantizer::default();
        let p = Point3::new(0.5, 0.25, -0.75);
        assert_eq!(q.key_string("mug", &p), q.key("mug", &p).to_string());
    }

    #[test]
    fn test_values_just_below_half_round_down() {
        // 0.049999997 and 1.05f32 (= 1.0499999523) both sit below the midpoint
        assert_eq!(cup(0.049_999_997).to_string(), "cup_(0.0, 0.0, 0.0)");
        assert_eq!(cup(1.05).to_string(), "cup_(1.0, 0.0, 0.0)");
        assert_eq!(cup(-1.05).cells(), [-10, 0, 0]);

        let q = KeyQuantizer::new(0);
        let k = q.key("cup", &Point3::new(0.499_999_97, 0.0, 0.0));
        assert_eq!(k.to_string(), "cup_(0, 0, 0)");
    }

    #[test]
    fn test_exact_midpoint_rounds_away_from_zero() {
        let q = KeyQuantizer::new(0);
        let k = q.key("cup", &Point3::new(0.5, -0.5, 2.5));
        assert_eq!(k.cells(), [1, -1, 3]);
    }

    #[test]
    fn test_non_finite_coordinates_do_not_panic() {
        let q = KeyQuantizer::default();
        let k = q.key("cup", &Point3::new(f32::NAN, f32::INFINITY, f32::NEG_INFINITY));
        assert_eq!(k.cells()[0], 0);
        assert_eq!(k.cells()[1], i64::MAX);
        assert_eq!(k.cells()[2], i64::MIN);
    }
}
