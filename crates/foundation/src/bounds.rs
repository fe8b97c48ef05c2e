use serde::{Deserialize, Serialize};

use crate::math::Point3;

/// Per-axis extents of a bounding box.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Extent along x.
    pub width: f64,
    /// Extent along y.
    pub length: f64,
    /// Extent along z.
    pub height: f64,
}

/// Axis-aligned bounding box
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3,
    pub max: Point3,
}

impl BoundingBox {
    pub fn new(min: Point3, max: Point3) -> Self {
        BoundingBox { min, max }
    }

    /// Linear min/max scan. Returns `None` for an empty slice.
    pub fn from_points(points: &[Point3]) -> Option<Self> {
        let first = *points.first()?;
        let mut min = first;
        let mut max = first;
        for p in points.iter().skip(1) {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }
        Some(Self::new(min, max))
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.max.x - self.min.x,
            length: self.max.y - self.min.y,
            height: self.max.z - self.min.z,
        }
    }

    pub fn center(&self) -> Point3 {
        self.min.midpoint(self.max)
    }

    pub fn contains(&self, p: Point3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }
}

/// Sphere enclosing every point it was built from.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingSphere {
    pub center: Point3,
    pub radius: f64,
}

impl BoundingSphere {
    pub fn new(center: Point3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Centre at the bounding-box midpoint, radius = farthest point from it.
    ///
    /// Not the minimal sphere, but every input point is inside by construction.
    pub fn from_points(points: &[Point3]) -> Option<Self> {
        let center = BoundingBox::from_points(points)?.center();
        let mut max_d2 = 0.0f64;
        for p in points {
            max_d2 = max_d2.max(center.distance_squared(*p));
        }
        Some(Self::new(center, max_d2.sqrt()))
    }

    pub fn contains(&self, p: Point3, eps: f64) -> bool {
        self.center.distance(p) <= self.radius + eps
    }
}

#[cfg(test)]
mod tests {
    use super::{BoundingBox, BoundingSphere};
    use crate::math::Point3;

    fn cloud() -> Vec<Point3> {
        vec![
            Point3::new(1.0, -2.0, 5.0),
            Point3::new(4.0, 3.0, 50.0),
            Point3::new(-3.0, 0.5, 7.5),
            Point3::new(0.0, 0.0, 12.0),
        ]
    }

    #[test]
    fn empty_input_has_no_volume() {
        assert!(BoundingBox::from_points(&[]).is_none());
        assert!(BoundingSphere::from_points(&[]).is_none());
    }

    #[test]
    fn box_dimensions_and_center() {
        let b = BoundingBox::from_points(&cloud()).unwrap();
        let d = b.dimensions();
        assert_eq!(d.width, 7.0);
        assert_eq!(d.length, 5.0);
        assert_eq!(d.height, 45.0);
        assert_eq!(b.center(), Point3::new(0.5, 0.5, 27.5));
        assert!(b.contains(b.center()));
    }

    #[test]
    fn single_point_box_is_degenerate() {
        let p = Point3::new(2.0, 3.0, 4.0);
        let b = BoundingBox::from_points(&[p]).unwrap();
        assert_eq!(b.dimensions().width, 0.0);
        assert_eq!(b.center(), p);
        let s = BoundingSphere::from_points(&[p]).unwrap();
        assert_eq!(s.radius, 0.0);
    }

    #[test]
    fn sphere_encloses_every_point() {
        let pts = cloud();
        let s = BoundingSphere::from_points(&pts).unwrap();
        assert!(s.radius >= 0.0);
        for p in &pts {
            assert!(s.contains(*p, 1e-9), "{p:?} outside {s:?}");
        }
    }

    #[test]
    fn sphere_encloses_scattered_grid() {
        let mut pts = Vec::new();
        for i in 0..20 {
            for j in 0..20 {
                let x = (i as f64 * 0.731).sin() * 100.0;
                let y = (j as f64 * 0.419).cos() * 30.0;
                let z = (i * j) as f64 * 0.25 - 40.0;
                pts.push(Point3::new(x, y, z));
            }
        }
        let s = BoundingSphere::from_points(&pts).unwrap();
        for p in &pts {
            assert!(s.contains(*p, 1e-9));
        }
    }
}
