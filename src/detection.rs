//! Per-frame perception input and placement poses.

use alloc::string::String;

use nalgebra::{Point3, UnitQuaternion};

/// One object-class detection for the current frame.
///
/// Produced fresh every frame by the perception pipeline. Carries no identity;
/// the only association signal is the class label and the noisy position.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Detection {
    /// Class label reported by the detector (e.g. `"chair"`).
    pub class_label: String,
    /// Estimated world-space position of the detected object.
    pub world_position: Point3<f32>,
}

impl Detection {
    /// Construct a detection from a label and a world position.
    pub fn new(class_label: impl Into<String>, world_position: Point3<f32>) -> Self {
        Self {
            class_label: class_label.into(),
            world_position,
        }
    }

    /// Construct a detection from a label and raw coordinates.
    ///
    /// ```rust
    /// use anchor_track::detection::Detection;
    ///
    /// let d = Detection::at("chair", 2.0, 0.0, 1.0);
    /// assert_eq!(d.class_label, "chair");
    /// assert_eq!(d.world_position.x, 2.0);
    /// ```
    pub fn at(class_label: impl Into<String>, x: f32, y: f32, z: f32) -> Self {
        Self::new(class_label, Point3::new(x, y, z))
    }
}

/// Placement-ready pose returned by the environment pose resolver.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    /// World-space position.
    pub position: Point3<f32>,
    /// World-space orientation.
    pub orientation: UnitQuaternion<f32>,
}

impl Pose {
    /// Pose at `position` with identity orientation.
    pub fn from_position(position: Point3<f32>) -> Self {
        Self {
            position,
            orientation: UnitQuaternion::identity(),
        }
    }

    /// Construct a pose from a position and orientation.
    pub fn new(position: Point3<f32>, orientation: UnitQuaternion<f32>) -> Self {
        Self { position, orientation }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::from_position(Point3::origin())
    }
}
