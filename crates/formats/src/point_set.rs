use std::sync::Arc;

use foundation::{BoundingBox, BoundingSphere, Point3};
use serde::Serialize;

/// Ingested points in file order. Immutable; clones share storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PointSet {
    points: Arc<[Point3]>,
}

impl PointSet {
    pub fn new(points: Vec<Point3>) -> Self {
        Self {
            points: points.into(),
        }
    }

    /// Groups a flat `[x, y, z, x, y, z, ...]` buffer into points.
    ///
    /// Missing or NaN channels (including a short trailing triple) become 0.
    pub fn from_flat_positions(flat: &[f64]) -> Self {
        let points = flat
            .chunks(3)
            .map(|c| Point3::from_channels(c.first().copied(), c.get(1).copied(), c.get(2).copied()))
            .collect::<Vec<_>>();
        Self::new(points)
    }

    pub fn as_slice(&self) -> &[Point3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point3> {
        self.points.iter()
    }

    /// `(min z, max z)`, or `None` when empty.
    pub fn z_range(&self) -> Option<(f64, f64)> {
        let b = self.bounding_box()?;
        Some((b.min.z, b.max.z))
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.points)
    }

    pub fn bounding_sphere(&self) -> Option<BoundingSphere> {
        BoundingSphere::from_points(&self.points)
    }

    /// Shares storage with `other`, i.e. is the very same ingested dataset.
    pub fn same_dataset(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.points, &other.points)
    }
}

impl std::ops::Deref for PointSet {
    type Target = [Point3];

    fn deref(&self) -> &Self::Target {
        &self.points
    }
}

impl Default for PointSet {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl From<Vec<Point3>> for PointSet {
    fn from(points: Vec<Point3>) -> Self {
        Self::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::PointSet;
    use foundation::Point3;

    #[test]
    fn groups_flat_positions_with_zero_fill() {
        let set = PointSet::from_flat_positions(&[1.0, 2.0, 3.0, f64::NAN, 5.0, 6.0, 7.0]);
        assert_eq!(
            set.as_slice(),
            &[
                Point3::new(1.0, 2.0, 3.0),
                Point3::new(0.0, 5.0, 6.0),
                Point3::new(7.0, 0.0, 0.0),
            ]
        );
    }

    #[test]
    fn z_range_of_empty_is_none() {
        assert_eq!(PointSet::default().z_range(), None);
        let set = PointSet::new(vec![Point3::new(0.0, 0.0, 50.0), Point3::new(1.0, 1.0, 5.0)]);
        assert_eq!(set.z_range(), Some((5.0, 50.0)));
    }

    #[test]
    fn clones_share_storage() {
        let a = PointSet::new(vec![Point3::new(1.0, 1.0, 1.0)]);
        let b = a.clone();
        let c = PointSet::new(vec![Point3::new(1.0, 1.0, 1.0)]);
        assert!(a.same_dataset(&b));
        assert!(!a.same_dataset(&c));
        assert_eq!(a, c);
    }
}
