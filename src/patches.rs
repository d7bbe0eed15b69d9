//! Fixed-topology mesh pieces the cable is stitched together from.
//!
//! Every generator is a pure function of a point, an up direction and a
//! travel direction. Shapes are constant offsets in the local frame, sized
//! by [`Profile`], so segments and junctions share the same cross-section
//! and meet without gaps. Triangles are wound counter-clockwise seen from
//! outside (right-handed), indices are local to the patch.

use std::f32::consts::FRAC_1_SQRT_2;

use cgmath::{InnerSpace, Vector2, Vector3};

use crate::config::CableMeshSettings;
use crate::frame::LocalFrame;
use crate::uv::UvTransform;

// Cross-section of the profiled cable, in fractions of width / height.
pub const PROFILE_BOTTOM_HALF_WIDTH: f32 = 0.052868;
pub const PROFILE_TOP_HALF_WIDTH: f32 = 0.031255;
pub const PROFILE_HEIGHT: f32 = 0.027186;

pub const GLOW_HALF_WIDTH: f32 = 0.012;

// Concave corner block, in fractions of the profile height.
const CONCAVE_BEVEL: f32 = 1.0;
const CONCAVE_BULGE: f32 = 0.25;
const CONCAVE_FILLET: f32 = 0.5;

pub const SEGMENT_TRIANGLES: usize = 6;
pub const SAME_PLANE_TRIANGLES: usize = 10;
pub const CONVEX_TRIANGLES: usize = 4;
pub const CONCAVE_TRIANGLES: usize = 13;
pub const CONCAVE_VERTICES: usize = 26;
pub const GLOW_SEGMENT_TRIANGLES: usize = 2;
pub const GLOW_CONVEX_TRIANGLES: usize = 4;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Patch {
    pub vertices: Vec<(Vector3<f32>, Vector2<f32>)>,
    pub triangles: Vec<[u32; 3]>,
}

impl Patch {
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            triangles: Vec::with_capacity(triangles),
        }
    }

    pub fn push(&mut self, position: Vector3<f32>, uv: Vector2<f32>) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push((position, uv));
        index
    }

    pub fn tri(&mut self, a: u32, b: u32, c: u32) {
        self.triangles.push([a, b, c]);
    }

    /// Splits the quad `a b c d` (in winding order) along `a c`.
    pub fn quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.tri(a, b, c);
        self.tri(a, c, d);
    }

    pub fn map_uvs(mut self, transform: UvTransform) -> Self {
        for (_, uv) in &mut self.vertices {
            *uv = transform.apply(*uv);
        }
        self
    }

    /// Reverses the winding of every triangle.
    pub fn flip(mut self) -> Self {
        for tri in &mut self.triangles {
            tri.swap(1, 2);
        }
        self
    }

    /// World-space face normal of each triangle, unnormalised.
    pub fn face_normals(&self) -> Vec<Vector3<f32>> {
        self.triangles
            .iter()
            .map(|tri| {
                let a = self.vertices[tri[0] as usize].0;
                let b = self.vertices[tri[1] as usize].0;
                let c = self.vertices[tri[2] as usize].0;
                (b - a).cross(c - a)
            })
            .collect()
    }
}

/// Resolved cross-section dimensions for one generation call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Profile {
    pub bottom: f32,
    pub top: f32,
    pub height: f32,
    pub glow_height: f32,
    pub glow_half_width: f32,
    pub upside_down: bool,
}

impl Profile {
    pub fn from_settings(settings: &CableMeshSettings) -> Self {
        let w = settings.width * settings.scale;
        let h = settings.height * settings.scale;
        Self {
            bottom: PROFILE_BOTTOM_HALF_WIDTH * w,
            top: PROFILE_TOP_HALF_WIDTH * w,
            height: PROFILE_HEIGHT * h,
            glow_height: settings.glow_height * settings.scale,
            glow_half_width: GLOW_HALF_WIDTH * w,
            upside_down: settings.upside_down,
        }
    }

    pub fn frame(
        &self,
        origin: Vector3<f32>,
        normal: Vector3<f32>,
        forward: Vector3<f32>,
    ) -> LocalFrame {
        LocalFrame::new(origin, normal, forward, self.upside_down)
    }

    /// Final touch shared by every generator: atlas placement, and a winding
    /// flip when the mirrored upside-down frame turned the faces inward.
    fn finish(&self, patch: Patch, uv: UvTransform) -> Patch {
        let patch = patch.map_uvs(uv);
        if self.upside_down {
            patch.flip()
        } else {
            patch
        }
    }

    /// Cross-section corners: bottom right, top right, top left, bottom left.
    fn cross_section(&self) -> [(f32, f32); 4] {
        [
            (self.bottom, 0.0),
            (self.top, self.height),
            (-self.top, self.height),
            (-self.bottom, 0.0),
        ]
    }

    /// `u` of each cross-section corner, by arc length around the profile.
    fn cross_section_u(&self) -> [f32; 4] {
        let slant = Vector2::new(self.bottom - self.top, self.height).magnitude();
        let span = 2.0 * self.top;
        let total = 2.0 * slant + span;
        [0.0, slant / total, (slant + span) / total, 1.0]
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::from_settings(&CableMeshSettings::default())
    }
}

/// Straight piece between `start` and `end`, both cross-sections oriented
/// by `normal`. `v` carries the distance travelled so textures repeat.
pub fn segment(
    start: Vector3<f32>,
    end: Vector3<f32>,
    normal: Vector3<f32>,
    profile: &Profile,
    uv: UvTransform,
) -> Patch {
    let delta = end - start;
    let length = delta.magnitude();
    let forward = delta / length;
    let frame = profile.frame(start, normal, forward);
    let section = profile.cross_section();
    let us = profile.cross_section_u();

    let mut patch = Patch::with_capacity(8, SEGMENT_TRIANGLES);
    for (distance, origin) in [(0.0, start), (length, end)] {
        let frame = LocalFrame { origin, ..frame };
        for (&(x, y), &u) in section.iter().zip(us.iter()) {
            patch.push(frame.point(x, y, 0.0), Vector2::new(u, distance));
        }
    }

    patch.tri(0, 4, 1);
    patch.tri(1, 4, 5);
    patch.tri(1, 5, 2);
    patch.tri(2, 5, 6);
    patch.tri(2, 6, 3);
    patch.tri(3, 6, 7);
    profile.finish(patch, uv)
}

/// Square frustum cap where the path bends inside one plane, also used as
/// the start cap.
///
/// Four footprint corners on the surface and four raised corners at profile
/// height form a square frustum whose slopes match the cable's sides in all
/// four travel directions, so any axis-aligned turn is covered.
pub fn same_plane_junction(
    point: Vector3<f32>,
    normal: Vector3<f32>,
    forward: Vector3<f32>,
    profile: &Profile,
    uv: UvTransform,
) -> Patch {
    let frame = profile.frame(point, normal, forward);
    let (b, a, t) = (profile.bottom, profile.top, profile.height);
    let footprint = |x: f32, z: f32| Vector2::new((x / b + 1.0) * 0.5, (z / b + 1.0) * 0.5);

    let corners = [(1.0, 1.0), (1.0, -1.0), (-1.0, -1.0), (-1.0, 1.0)];
    let mut patch = Patch::with_capacity(8, SAME_PLANE_TRIANGLES);
    for &(sx, sz) in &corners {
        patch.push(frame.point(sx * b, 0.0, sz * b), footprint(sx * b, sz * b));
    }
    for &(sx, sz) in &corners {
        patch.push(frame.point(sx * a, t, sz * a), footprint(sx * a, sz * a));
    }

    for i in 0..4u32 {
        let j = (i + 1) % 4;
        patch.quad(i, 4 + i, 4 + j, j);
    }
    patch.quad(4, 7, 6, 5);
    profile.finish(patch, uv)
}

/// Rows of the rounded ramp around an outer edge: straight up, the
/// bisector, then straight along the incoming direction.
fn ramp_directions(frame: &LocalFrame) -> [Vector3<f32>; 3] {
    [
        frame.up,
        (frame.up + frame.forward) * FRAC_1_SQRT_2,
        frame.forward,
    ]
}

fn ramp(frame: &LocalFrame, radius: f32, half_width: f32, triangles: usize) -> Patch {
    let mut patch = Patch::with_capacity(6, triangles);
    for (row, dir) in ramp_directions(frame).iter().enumerate() {
        let v = row as f32 * 0.5;
        let center = frame.origin + dir * radius;
        patch.push(center + frame.right * half_width, Vector2::new(0.0, v));
        patch.push(center - frame.right * half_width, Vector2::new(1.0, v));
    }
    patch.tri(0, 2, 1);
    patch.tri(1, 2, 3);
    patch.tri(2, 4, 3);
    patch.tri(3, 4, 5);
    patch
}

/// Ramp over an outer edge where the path leaves the surface it was on.
///
/// `normal` is the up of the incoming side (the previous point's normal),
/// `forward` the incoming travel direction, which is roughly the new
/// surface's normal.
pub fn convex_junction(
    point: Vector3<f32>,
    normal: Vector3<f32>,
    forward: Vector3<f32>,
    profile: &Profile,
    uv: UvTransform,
) -> Patch {
    let frame = profile.frame(point, normal, forward);
    profile.finish(ramp(&frame, profile.height, profile.top, CONVEX_TRIANGLES), uv)
}

/// Glow strip hovering over [`convex_junction`].
pub fn glow_convex_junction(
    point: Vector3<f32>,
    normal: Vector3<f32>,
    forward: Vector3<f32>,
    profile: &Profile,
    uv: UvTransform,
) -> Patch {
    let frame = profile.frame(point, normal, forward);
    let patch = ramp(
        &frame,
        profile.height + profile.glow_height,
        profile.glow_half_width,
        GLOW_CONVEX_TRIANGLES,
    );
    profile.finish(patch, uv)
}

/// Glow strip hovering over the top face of [`segment`].
pub fn glow_segment(
    start: Vector3<f32>,
    end: Vector3<f32>,
    normal: Vector3<f32>,
    profile: &Profile,
    uv: UvTransform,
) -> Patch {
    let delta = end - start;
    let length = delta.magnitude();
    let frame = profile.frame(start, normal, delta / length);
    let y = profile.height + profile.glow_height;
    let w = profile.glow_half_width;

    let mut patch = Patch::with_capacity(4, GLOW_SEGMENT_TRIANGLES);
    patch.push(frame.point(w, y, 0.0), Vector2::new(0.0, 0.0));
    patch.push(frame.point(-w, y, 0.0), Vector2::new(1.0, 0.0));
    patch.push(frame.point(w, y, length), Vector2::new(0.0, length));
    patch.push(frame.point(-w, y, length), Vector2::new(1.0, length));
    patch.tri(0, 2, 1);
    patch.tri(1, 2, 3);
    profile.finish(patch, uv)
}

/// Bevelled block for an inside corner where the path runs into a wall.
///
/// In the local frame the incoming cable lies on `y = 0` and the wall is
/// the plane `z = 0`. The block sits in the corner between the two cable
/// tops: a bulged bevel (middle) with triangular sides, closed by the faces
/// resting on the incoming cable (front) and on the climbing cable (back).
/// A fillet across the floor/wall seam with its floor toe makes up the
/// ground transition.
pub fn concave_junction(
    point: Vector3<f32>,
    normal: Vector3<f32>,
    forward: Vector3<f32>,
    profile: &Profile,
    uv: UvTransform,
) -> Patch {
    let f = profile.frame(point, normal, forward);
    let (b, a, t) = (profile.bottom, profile.top, profile.height);
    let c = CONCAVE_BEVEL * t;
    let g = CONCAVE_FILLET * t;
    let bulge = CONCAVE_BULGE * t * FRAC_1_SQRT_2;
    let u_of = |x: f32| (1.0 - x / a) * 0.5;

    let mut patch = Patch::with_capacity(CONCAVE_VERTICES, CONCAVE_TRIANGLES);

    // middle: closed fan around the bulge apex
    let apex = patch.push(
        f.point(0.0, t + c * 0.5 + bulge, -t - c * 0.5 - bulge),
        Vector2::new(0.5, 0.5),
    );
    let rim = [
        patch.push(f.point(a, t, -t - c), Vector2::new(u_of(a), 0.0)),
        patch.push(f.point(a, t + c, -t), Vector2::new(u_of(a), 1.0)),
        patch.push(f.point(-a, t + c, -t), Vector2::new(u_of(-a), 1.0)),
        patch.push(f.point(-a, t, -t - c), Vector2::new(u_of(-a), 0.0)),
    ];
    for i in 0..4 {
        patch.tri(apex, rim[i], rim[(i + 1) % 4]);
    }

    // sides: wedge ends, corner / floor-side / wall-side
    for &x in &[a, -a] {
        let corner = patch.push(f.point(x, t, -t), Vector2::new(0.0, 0.0));
        let floor_side = patch.push(f.point(x, t, -t - c), Vector2::new(1.0, 0.0));
        let wall_side = patch.push(f.point(x, t + c, -t), Vector2::new(0.0, 1.0));
        if x > 0.0 {
            patch.tri(corner, wall_side, floor_side);
        } else {
            patch.tri(corner, floor_side, wall_side);
        }
    }

    // front: rests on the incoming cable's top
    let front = [
        patch.push(f.point(a, t, -t - c), Vector2::new(u_of(a), 0.0)),
        patch.push(f.point(a, t, -t), Vector2::new(u_of(a), 1.0)),
        patch.push(f.point(-a, t, -t), Vector2::new(u_of(-a), 1.0)),
        patch.push(f.point(-a, t, -t - c), Vector2::new(u_of(-a), 0.0)),
    ];
    patch.quad(front[0], front[3], front[2], front[1]);

    // back: rests on the climbing cable's top
    let back = [
        patch.push(f.point(a, t, -t), Vector2::new(u_of(a), 0.0)),
        patch.push(f.point(a, t + c, -t), Vector2::new(u_of(a), 1.0)),
        patch.push(f.point(-a, t + c, -t), Vector2::new(u_of(-a), 1.0)),
        patch.push(f.point(-a, t, -t), Vector2::new(u_of(-a), 0.0)),
    ];
    patch.quad(back[0], back[3], back[2], back[1]);

    // ground transition: seam fillet plus its toe on the floor
    let u_wide = |x: f32| (1.0 - x / b) * 0.5;
    let fillet = [
        patch.push(f.point(b, 0.0, -g), Vector2::new(u_wide(b), 0.0)),
        patch.push(f.point(b, g, 0.0), Vector2::new(u_wide(b), 1.0)),
        patch.push(f.point(-b, g, 0.0), Vector2::new(u_wide(-b), 1.0)),
        patch.push(f.point(-b, 0.0, -g), Vector2::new(u_wide(-b), 0.0)),
    ];
    patch.quad(fillet[0], fillet[3], fillet[2], fillet[1]);

    let toe_right = patch.push(f.point(b, 0.0, -g), Vector2::new(u_wide(b), 0.0));
    let toe_left = patch.push(f.point(-b, 0.0, -g), Vector2::new(u_wide(-b), 0.0));
    let toe_tip = patch.push(f.point(0.0, 0.0, 0.0), Vector2::new(0.5, 1.0));
    patch.tri(toe_right, toe_left, toe_tip);

    profile.finish(patch, uv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn v(x: f32, y: f32, z: f32) -> Vector3<f32> {
        Vector3::new(x, y, z)
    }

    const UP: Vector3<f32> = Vector3 { x: 0.0, y: 1.0, z: 0.0 };
    const EAST: Vector3<f32> = Vector3 { x: 1.0, y: 0.0, z: 0.0 };

    fn all_indices_in_range(patch: &Patch) -> bool {
        let n = patch.vertices.len() as u32;
        patch.triangles.iter().flatten().all(|&i| i < n)
    }

    #[test]
    fn patch_sizes_are_fixed() {
        let p = Profile::default();
        let id = UvTransform::IDENTITY;
        let origin = v(0.0, 0.0, 0.0);

        let seg = segment(origin, v(2.0, 0.0, 0.0), UP, &p, id);
        assert_eq!((seg.vertices.len(), seg.triangles.len()), (8, SEGMENT_TRIANGLES));

        let same = same_plane_junction(origin, UP, EAST, &p, id);
        assert_eq!((same.vertices.len(), same.triangles.len()), (8, SAME_PLANE_TRIANGLES));

        let convex = convex_junction(origin, UP, EAST, &p, id);
        assert_eq!((convex.vertices.len(), convex.triangles.len()), (6, CONVEX_TRIANGLES));

        let concave = concave_junction(origin, UP, EAST, &p, id);
        assert_eq!(
            (concave.vertices.len(), concave.triangles.len()),
            (CONCAVE_VERTICES, CONCAVE_TRIANGLES)
        );

        let glow = glow_segment(origin, v(2.0, 0.0, 0.0), UP, &p, id);
        assert_eq!(glow.triangles.len(), GLOW_SEGMENT_TRIANGLES);
        let glow_convex = glow_convex_junction(origin, UP, EAST, &p, id);
        assert_eq!(glow_convex.triangles.len(), GLOW_CONVEX_TRIANGLES);

        for patch in [seg, same, convex, concave, glow, glow_convex] {
            assert!(all_indices_in_range(&patch));
        }
    }

    #[test]
    fn segment_cross_section_matches_profile() {
        let p = Profile::default();
        let seg = segment(v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), UP, &p, UvTransform::IDENTITY);
        // right of +x travel with +y up is +z
        assert_relative_eq!(seg.vertices[0].0.z, PROFILE_BOTTOM_HALF_WIDTH);
        assert_relative_eq!(seg.vertices[1].0.z, PROFILE_TOP_HALF_WIDTH);
        assert_relative_eq!(seg.vertices[1].0.y, PROFILE_HEIGHT);
        assert_relative_eq!(seg.vertices[3].0.z, -PROFILE_BOTTOM_HALF_WIDTH);
        assert_relative_eq!(seg.vertices[4].0.x, 1.0);
    }

    #[test]
    fn segment_v_tracks_distance() {
        let p = Profile::default();
        let seg = segment(v(0.0, 0.0, 0.0), v(0.0, 0.0, 3.0), UP, &p, UvTransform::IDENTITY);
        assert_relative_eq!(seg.vertices[0].1.y, 0.0);
        assert_relative_eq!(seg.vertices[7].1.y, 3.0);
        assert_relative_eq!(seg.vertices[3].1.x, 1.0);
    }

    #[test]
    fn segment_faces_point_away_from_the_surface() {
        let p = Profile::default();
        let seg = segment(v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), UP, &p, UvTransform::IDENTITY);
        for n in seg.face_normals() {
            assert!(n.y > 0.0);
        }
        let normals = seg.face_normals();
        assert!(normals[0].z > 0.0);
        assert!(normals[5].z < 0.0);
    }

    #[test]
    fn same_plane_junction_faces_point_outward() {
        let p = Profile::default();
        let patch = same_plane_junction(v(0.0, 0.0, 0.0), UP, EAST, &p, UvTransform::IDENTITY);
        let centre = v(0.0, p.height * 0.5, 0.0);
        for (tri, n) in patch.triangles.iter().zip(patch.face_normals()) {
            let a = patch.vertices[tri[0] as usize].0;
            assert!(n.dot(a - centre) > 0.0);
        }
    }

    #[test]
    fn convex_ramp_wraps_from_up_to_forward() {
        let p = Profile::default();
        let patch = convex_junction(v(0.0, 0.0, 0.0), UP, EAST, &p, UvTransform::IDENTITY);
        assert_relative_eq!(patch.vertices[0].0.y, p.height);
        assert_relative_eq!(patch.vertices[4].0.x, p.height);
        assert_relative_eq!(patch.vertices[4].0.y, 0.0);
        for n in patch.face_normals() {
            assert!(n.x > 0.0 && n.y > 0.0);
        }
    }

    #[test]
    fn glow_floats_above_the_cable() {
        let p = Profile::default();
        let glow = glow_segment(v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), UP, &p, UvTransform::IDENTITY);
        for (pos, _) in &glow.vertices {
            assert_relative_eq!(pos.y, p.height + p.glow_height);
        }
        for n in glow.face_normals() {
            assert!(n.y > 0.0);
        }

        let ramp = glow_convex_junction(v(0.0, 0.0, 0.0), UP, EAST, &p, UvTransform::IDENTITY);
        assert_relative_eq!(ramp.vertices[0].0.y, p.height + p.glow_height);
    }

    #[test]
    fn concave_bevel_faces_back_and_up() {
        let p = Profile::default();
        let patch = concave_junction(v(0.0, 0.0, 0.0), UP, EAST, &p, UvTransform::IDENTITY);
        let normals = patch.face_normals();
        for n in &normals[0..4] {
            assert!(n.y > 0.0 && n.x < 0.0);
        }
        // right side faces +z, left side -z
        assert!(normals[4].z > 0.0);
        assert!(normals[5].z < 0.0);
        // front rests on the incoming top, back against the climbing top
        assert!(normals[6].y < 0.0 && normals[7].y < 0.0);
        assert!(normals[8].x > 0.0 && normals[9].x > 0.0);
        // fillet faces the seam, toe faces the floor
        assert!(normals[10].x > 0.0 && normals[10].y < 0.0);
        assert!(normals[12].y < 0.0);
    }

    #[test]
    fn uv_transform_is_applied() {
        let p = Profile::default();
        let shift = UvTransform::translation(0.5, 0.0);
        let plain = same_plane_junction(v(0.0, 0.0, 0.0), UP, EAST, &p, UvTransform::IDENTITY);
        let shifted = same_plane_junction(v(0.0, 0.0, 0.0), UP, EAST, &p, shift);
        for ((pa, ua), (pb, ub)) in plain.vertices.iter().zip(shifted.vertices.iter()) {
            assert_eq!(pa, pb);
            assert_relative_eq!(ub.x - ua.x, 0.5);
        }
    }

    #[test]
    fn upside_down_hangs_below() {
        let settings = CableMeshSettings {
            upside_down: true,
            ..CableMeshSettings::default()
        };
        let p = Profile::from_settings(&settings);
        let seg = segment(v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), UP, &p, UvTransform::IDENTITY);
        assert!(seg.vertices[1].0.y < 0.0);
        for n in seg.face_normals() {
            assert!(n.y < 0.0);
        }
    }

    #[test]
    fn scale_stretches_the_profile() {
        let settings = CableMeshSettings {
            width: 2.0,
            scale: 0.5,
            ..CableMeshSettings::default()
        };
        let p = Profile::from_settings(&settings);
        assert_relative_eq!(p.bottom, PROFILE_BOTTOM_HALF_WIDTH);
        assert_relative_eq!(p.height, PROFILE_HEIGHT * 0.5);
    }
}
