use cgmath::{InnerSpace, Vector3};

use crate::activation::Combinator;
use crate::path::CablePoint;
use crate::texture::{
    AtlasColumn, COLUMN_JUNCTION_AND, COLUMN_JUNCTION_OR, COLUMN_JUNCTION_PASSTHROUGH,
    COLUMN_JUNCTION_SIMPLE,
};

/// Beyond this |dot(forward, normal)| a normal change counts as a plane change.
pub const PLANE_CHANGE_THRESHOLD: f32 = 0.75;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JunctionKind {
    SamePlane,
    Convex,
    Concave,
}

/// Look of a same-plane junction. Geometry is identical, only the atlas
/// strip differs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JunctionVariant {
    Simple,
    Or,
    And,
    Passthrough,
}

impl JunctionVariant {
    pub fn column(self) -> AtlasColumn {
        match self {
            JunctionVariant::Simple => COLUMN_JUNCTION_SIMPLE,
            JunctionVariant::Or => COLUMN_JUNCTION_OR,
            JunctionVariant::And => COLUMN_JUNCTION_AND,
            JunctionVariant::Passthrough => COLUMN_JUNCTION_PASSTHROUGH,
        }
    }

    /// Start cap drawn for a cable's combinator; `None` cables get no cap.
    pub fn start_cap(combinator: Combinator) -> Option<Self> {
        match combinator {
            Combinator::None => None,
            Combinator::Or => Some(JunctionVariant::Or),
            Combinator::And => Some(JunctionVariant::And),
            Combinator::Passthrough => Some(JunctionVariant::Passthrough),
            Combinator::Unknown => {
                log::error!("unknown combinator type, skipping start cap");
                None
            }
        }
    }
}

/// Classifies a point from the incoming travel direction, the previous
/// point's normal and its own normal.
///
/// Differing normals with `|dot| <= 0.75` fall in the dead zone and get no
/// junction at all.
pub fn classify_normals(
    forward: Vector3<f32>,
    previous: &CablePoint,
    current: &CablePoint,
) -> Option<JunctionKind> {
    if previous.same_normal(current) {
        return Some(JunctionKind::SamePlane);
    }
    let d = forward.dot(current.normal);
    if d < -PLANE_CHANGE_THRESHOLD {
        Some(JunctionKind::Concave)
    } else if d > PLANE_CHANGE_THRESHOLD {
        Some(JunctionKind::Convex)
    } else {
        None
    }
}

/// Junction kind at interior point `index`, or `None` for end points and
/// dead-zone points.
pub fn classify(points: &[CablePoint], index: usize) -> Option<JunctionKind> {
    if index == 0 || index + 1 >= points.len() {
        return None;
    }
    let previous = &points[index - 1];
    let current = &points[index];
    let forward = (current.position - previous.position).normalize();
    classify_normals(forward, previous, current)
}
