//! Proximity matcher: same-class nearest neighbour within a radius.
//!
//! Used by the commit policy to decide whether a detection is a new object or
//! one that already has a persistent anchor. Candidates are scanned linearly;
//! the persistent population is expected to stay in the tens.
//!
//! The matcher returns the *closest* qualifying candidate. Equal distances are
//! resolved in favour of the earlier candidate. When anchors of one class never
//! overlap within the radius this is indistinguishable from returning the first
//! qualifying candidate.

use nalgebra::Point3;

/// Something with a class label and a position that can be matched against.
pub trait Locatable {
    /// Class label of the candidate.
    fn class_label(&self) -> &str;
    /// World position of the candidate.
    fn position(&self) -> &Point3<f32>;
}

/// A successful match: index into the candidate slice and the distance to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProximityMatch {
    /// Index of the matched candidate.
    pub index: usize,
    /// Euclidean distance between the query and the candidate.
    pub distance: f32,
}

/// Find the nearest candidate of `class_label` strictly closer than `threshold`.
///
/// Returns `None` when no candidate qualifies. A `None` is the normal signal
/// for "this is a new object", not an error.
pub fn find_nearest<A: Locatable>(
    position: &Point3<f32>,
    class_label: &str,
    candidates: &[A],
    threshold: f32,
) -> Option<ProximityMatch> {
    let mut best: Option<ProximityMatch> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        if candidate.class_label() != class_label {
            continue;
        }
        let distance = nalgebra::distance(position, candidate.position());
        if distance < threshold && best.map_or(true, |b| distance < b.distance) {
            best = Some(ProximityMatch { index, distance });
        }
    }
    best
}
