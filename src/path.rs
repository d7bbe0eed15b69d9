use cgmath::Vector3;

/// Squared distance under which two point normals count as the same direction.
pub const NORMAL_EPSILON_SQ: f32 = 1e-10;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CablePoint {
    pub position: Vector3<f32>,
    /// Local "up" used to orient the cross-section, not a shading normal.
    pub normal: Vector3<f32>,
}

impl CablePoint {
    pub fn new(position: Vector3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }

    pub fn same_normal(&self, other: &CablePoint) -> bool {
        let delta = self.normal - other.normal;
        delta.x * delta.x + delta.y * delta.y + delta.z * delta.z < NORMAL_EPSILON_SQ
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn to_index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Axis of the largest absolute component. Ties resolve X, then Y, then Z.
    pub fn dominant(v: Vector3<f32>) -> Self {
        let (ax, ay, az) = (v.x.abs(), v.y.abs(), v.z.abs());
        if ax >= ay && ax >= az {
            Axis::X
        } else if ay >= az {
            Axis::Y
        } else {
            Axis::Z
        }
    }
}

fn set_component(v: &mut Vector3<f32>, axis: Axis, value: f32) {
    v[axis.to_index()] = value;
}

/// Where the next point lands when the user aims at `target` on a surface
/// with `target_normal`.
///
/// The previous point is copied and only the coordinate along the axis of
/// largest travel is taken from the target, so cables stay axis aligned.
/// With `snap_normal` the coordinate along the surface normal's dominant
/// axis is taken from the target as well, which lets a cable climb onto a
/// different face.
pub fn snap_next_point(
    last: Option<Vector3<f32>>,
    target: Vector3<f32>,
    target_normal: Vector3<f32>,
    snap_normal: bool,
) -> Vector3<f32> {
    let Some(last) = last else {
        return target;
    };

    let travel_axis = Axis::dominant(last - target);
    let mut snapped = last;
    set_component(&mut snapped, travel_axis, target[travel_axis.to_index()]);

    if snap_normal {
        let normal_axis = Axis::dominant(target_normal);
        set_component(&mut snapped, normal_axis, target[normal_axis.to_index()]);
    }

    snapped
}

/// Ordered control points of one cable. Insertion order is path order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CablePath {
    points: Vec<CablePoint>,
}

impl CablePath {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn from_points(points: Vec<CablePoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[CablePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&CablePoint> {
        self.points.last()
    }

    pub fn push(&mut self, point: CablePoint) {
        self.points.push(point);
    }

    /// Appends a point placed with [`snap_next_point`] relative to the current end.
    pub fn push_snapped(
        &mut self,
        target: Vector3<f32>,
        target_normal: Vector3<f32>,
        snap_normal: bool,
    ) -> CablePoint {
        let position = snap_next_point(
            self.last().map(|p| p.position),
            target,
            target_normal,
            snap_normal,
        );
        let point = CablePoint::new(position, target_normal);
        self.points.push(point);
        point
    }

    /// Inserts before `index`; an index past the end appends.
    pub fn insert(&mut self, index: usize, point: CablePoint) {
        let index = index.min(self.points.len());
        self.points.insert(index, point);
    }

    pub fn remove(&mut self, index: usize) -> Option<CablePoint> {
        if index < self.points.len() {
            Some(self.points.remove(index))
        } else {
            None
        }
    }

    pub fn remove_last(&mut self) -> Option<CablePoint> {
        self.points.pop()
    }

    pub fn set_position(&mut self, index: usize, position: Vector3<f32>) -> bool {
        match self.points.get_mut(index) {
            Some(point) => {
                point.position = position;
                true
            }
            None => false,
        }
    }

    pub fn reverse(&mut self) {
        self.points.reverse();
    }
}

impl From<Vec<CablePoint>> for CablePath {
    fn from(points: Vec<CablePoint>) -> Self {
        Self::from_points(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32, z: f32) -> Vector3<f32> {
        Vector3::new(x, y, z)
    }

    #[test]
    fn dominant_axis_prefers_x_then_y_on_ties() {
        assert_eq!(Axis::dominant(v(1.0, 1.0, 1.0)), Axis::X);
        assert_eq!(Axis::dominant(v(0.0, -2.0, 2.0)), Axis::Y);
        assert_eq!(Axis::dominant(v(0.1, 0.2, -0.3)), Axis::Z);
    }

    #[test]
    fn first_point_is_not_snapped() {
        let target = v(0.3, 1.2, -4.0);
        assert_eq!(snap_next_point(None, target, v(0.0, 1.0, 0.0), true), target);
    }

    #[test]
    fn snapping_keeps_cable_axis_aligned() {
        let last = v(0.0, 0.0, 0.0);
        let snapped = snap_next_point(Some(last), v(3.0, 0.2, 0.5), v(0.0, 1.0, 0.0), false);
        assert_eq!(snapped, v(3.0, 0.0, 0.0));
    }

    #[test]
    fn snapping_normal_takes_surface_height() {
        let last = v(0.0, 0.0, 0.0);
        let snapped = snap_next_point(Some(last), v(3.0, 0.2, 0.5), v(0.0, 1.0, 0.0), true);
        assert_eq!(snapped, v(3.0, 0.2, 0.0));
    }

    #[test]
    fn editing_operations_keep_order() {
        let up = v(0.0, 1.0, 0.0);
        let mut path = CablePath::new();
        path.push(CablePoint::new(v(0.0, 0.0, 0.0), up));
        path.push(CablePoint::new(v(2.0, 0.0, 0.0), up));
        path.insert(1, CablePoint::new(v(1.0, 0.0, 0.0), up));
        assert_eq!(path.len(), 3);
        assert_eq!(path.points()[1].position, v(1.0, 0.0, 0.0));

        path.reverse();
        assert_eq!(path.points()[0].position, v(2.0, 0.0, 0.0));

        assert!(path.remove_last().is_some());
        assert!(path.remove(7).is_none());
        assert!(path.set_position(0, v(5.0, 0.0, 0.0)));
        assert!(!path.set_position(9, v(5.0, 0.0, 0.0)));
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn push_snapped_uses_previous_end() {
        let up = v(0.0, 1.0, 0.0);
        let mut path = CablePath::new();
        path.push_snapped(v(0.0, 0.0, 0.0), up, false);
        let point = path.push_snapped(v(0.4, 0.0, 2.0), up, false);
        assert_eq!(point.position, v(0.0, 0.0, 2.0));
        assert_eq!(point.normal, up);
    }

    #[test]
    fn same_normal_tolerates_float_noise() {
        let a = CablePoint::new(v(0.0, 0.0, 0.0), v(0.0, 1.0, 0.0));
        let b = CablePoint::new(v(1.0, 0.0, 0.0), v(0.0, 1.0 + 1e-7, 0.0));
        let c = CablePoint::new(v(1.0, 0.0, 0.0), v(1.0, 0.0, 0.0));
        assert!(a.same_normal(&b));
        assert!(!a.same_normal(&c));
    }
}
