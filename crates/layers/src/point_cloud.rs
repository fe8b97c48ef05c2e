use foundation::{BoundingSphere, Point3, Rgb, color_for_altitude, flatten_colors};
use formats::PointSet;
use scene::AltitudeRange;
use serde::Serialize;

use crate::layer::{Layer, LayerId, ViewKind};

/// Derived view of a point set under an altitude window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloudView {
    /// Points with `min <= z <= max`, source order preserved.
    pub visible: PointSet,
    /// One colour per visible point, same order.
    pub colors: Vec<Rgb>,
    /// `None` when nothing is visible.
    pub sphere: Option<BoundingSphere>,
}

impl PointCloudView {
    pub fn flat_positions(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.visible.len() * 3);
        for p in self.visible.iter() {
            out.extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
        }
        out
    }

    pub fn flat_colors(&self) -> Vec<f32> {
        flatten_colors(&self.colors)
    }
}

pub fn apply_altitude_filter(points: &PointSet, range: AltitudeRange) -> PointCloudView {
    let visible: Vec<Point3> = points
        .iter()
        .copied()
        .filter(|p| range.contains(p.z))
        .collect();
    let colors = visible.iter().map(|p| color_for_altitude(p.z)).collect();
    let sphere = BoundingSphere::from_points(&visible);
    PointCloudView {
        visible: PointSet::new(visible),
        colors,
        sphere,
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct PointSizeSettings {
    /// Default size as a fraction of the bounding-sphere radius.
    pub factor: f64,
    pub min_size: f64,
}

impl Default for PointSizeSettings {
    fn default() -> Self {
        Self {
            factor: 0.001,
            min_size: 0.0001,
        }
    }
}

/// Rendering point size with its slider range.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct PointSizeControl {
    pub default_size: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
}

impl PointSizeControl {
    /// `max(radius * factor, min_size)`, range `[default / 10, default * 10]`.
    pub fn derive(sphere: Option<&BoundingSphere>, settings: PointSizeSettings) -> Self {
        let radius = sphere.map_or(0.0, |s| s.radius);
        let default_size = (radius * settings.factor).max(settings.min_size);
        let min = default_size / 10.0;
        let max = default_size * 10.0;
        Self {
            default_size,
            min,
            max,
            step: (max - min) / 100.0,
            value: default_size,
        }
    }

    /// Clamped into `[min, max]`. Non-finite input is ignored.
    pub fn set(&mut self, size: f64) -> f64 {
        if size.is_finite() {
            self.value = size.clamp(self.min, self.max);
        }
        self.value
    }
}

/// Camera placement that frames the visible points.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct CameraFraming {
    pub target: Point3,
    pub position: Point3,
    pub distance: f64,
    pub near: f64,
    pub far: f64,
}

impl CameraFraming {
    pub const NEAR: f64 = 0.1;

    /// Looks at the sphere from `3 * radius` up the z axis. Without a sphere
    /// the radius is 1 and the target stays at `fallback_target`.
    pub fn frame(sphere: Option<&BoundingSphere>, fallback_target: Point3) -> Self {
        let (target, radius) = match sphere {
            Some(s) => (s.center, s.radius),
            None => (fallback_target, 1.0),
        };
        let distance = radius * 3.0;
        Self {
            target,
            position: target + Point3::new(0.0, 0.0, distance),
            distance,
            near: Self::NEAR,
            far: distance * 100.0,
        }
    }
}

impl Default for CameraFraming {
    fn default() -> Self {
        Self::frame(None, Point3::default())
    }
}

/// The 3D point view: source points, altitude window and derived state.
#[derive(Debug, Clone)]
pub struct PointCloudLayer {
    id: LayerId,
    settings: PointSizeSettings,
    source: Option<PointSet>,
    range: AltitudeRange,
    point_size: PointSizeControl,
    view: PointCloudView,
    framing: CameraFraming,
}

impl PointCloudLayer {
    pub fn new(id: u64, settings: PointSizeSettings) -> Self {
        Self {
            id: LayerId(id),
            settings,
            source: None,
            range: AltitudeRange::new(0.0, 0.0),
            point_size: PointSizeControl::derive(None, settings),
            view: PointCloudView::default(),
            framing: CameraFraming::default(),
        }
    }

    /// Installs a new point set. The altitude window resets to the data's
    /// z extent and the point size is derived from the full set, once.
    pub fn load(&mut self, points: PointSet) {
        let (min_z, max_z) = points.z_range().unwrap_or((0.0, 0.0));
        self.range = AltitudeRange::new(min_z, max_z);
        self.point_size = PointSizeControl::derive(points.bounding_sphere().as_ref(), self.settings);
        self.source = Some(points);
        self.recompute();
        tracing::info!(
            points = self.source.as_ref().map_or(0, PointSet::len),
            min_z,
            max_z,
            point_size = self.point_size.default_size,
            "point cloud loaded"
        );
    }

    /// Replaces the altitude window. A reversed window yields an empty view.
    pub fn set_altitude_range(&mut self, range: AltitudeRange) {
        self.range = range;
        self.recompute();
    }

    pub fn set_point_size(&mut self, size: f64) -> f64 {
        self.point_size.set(size)
    }

    pub fn source(&self) -> Option<&PointSet> {
        self.source.as_ref()
    }

    /// Slider bounds: the loaded data's `(min z, max z)`.
    pub fn z_bounds(&self) -> Option<(f64, f64)> {
        self.source.as_ref()?.z_range()
    }

    pub fn altitude_range(&self) -> AltitudeRange {
        self.range
    }

    pub fn point_size(&self) -> &PointSizeControl {
        &self.point_size
    }

    pub fn view(&self) -> &PointCloudView {
        &self.view
    }

    pub fn framing(&self) -> &CameraFraming {
        &self.framing
    }

    fn recompute(&mut self) {
        self.view = match &self.source {
            Some(points) => apply_altitude_filter(points, self.range),
            None => PointCloudView::default(),
        };
        self.framing = CameraFraming::frame(self.view.sphere.as_ref(), self.framing.target);
    }
}

impl Layer for PointCloudLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn view_kind(&self) -> ViewKind {
        ViewKind::Points
    }

    fn is_loaded(&self) -> bool {
        self.source.is_some()
    }

    fn clear(&mut self) {
        self.source = None;
        self.range = AltitudeRange::new(0.0, 0.0);
        self.point_size = PointSizeControl::derive(None, self.settings);
        self.view = PointCloudView::default();
        self.framing = CameraFraming::default();
    }
}
