//! 3D line clipping against the canonical view volume.
//!
//! Classification uses a 6-bit outcode per endpoint; clipping is
//! Cohen-Sutherland generalized to the six CVV planes. For the parallel
//! volume the planes are the constant slabs x,y in [-1,1], z in [-1,0]; for
//! the perspective volume the side planes are the z-dependent x=±z and y=±z,
//! with z tested against [-1, zmin].
//!
//! Everything here operates on pre-projection CVV coordinates: z is intact,
//! the homogeneous weight rides along through interpolation, and the divide
//! happens later in the engine.

use std::ops::{BitAnd, BitOrAssign};

use crate::camera::ProjectionKind;
use crate::math::{Vec3, Vec4};

/// Boundary tolerance so points sitting on a plane classify as inside.
pub const FLOAT_EPSILON: f32 = 1e-6;

/// Bitset of violated CVV half-spaces; zero means inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcode(u8);

impl Outcode {
    pub const INSIDE: Outcode = Outcode(0);
    pub const LEFT: Outcode = Outcode(0b10_0000);
    pub const RIGHT: Outcode = Outcode(0b01_0000);
    pub const BOTTOM: Outcode = Outcode(0b00_1000);
    pub const TOP: Outcode = Outcode(0b00_0100);
    pub const FAR: Outcode = Outcode(0b00_0010);
    pub const NEAR: Outcode = Outcode(0b00_0001);

    const PLANES: [Outcode; 6] = [
        Outcode::LEFT,
        Outcode::RIGHT,
        Outcode::BOTTOM,
        Outcode::TOP,
        Outcode::FAR,
        Outcode::NEAR,
    ];

    pub fn is_inside(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// First violated plane, scanned in LEFT..NEAR order.
    fn first_plane(self) -> Option<Outcode> {
        Self::PLANES.iter().copied().find(|p| !(self & *p).is_inside())
    }
}

impl BitOrAssign for Outcode {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Outcode {
    type Output = Outcode;

    fn bitand(self, rhs: Self) -> Outcode {
        Outcode(self.0 & rhs.0)
    }
}

/// Outcode against the parallel (box) view volume.
pub fn outcode_parallel(p: Vec3) -> Outcode {
    let mut code = Outcode::INSIDE;
    if p.x < -1.0 - FLOAT_EPSILON {
        code |= Outcode::LEFT;
    } else if p.x > 1.0 + FLOAT_EPSILON {
        code |= Outcode::RIGHT;
    }
    if p.y < -1.0 - FLOAT_EPSILON {
        code |= Outcode::BOTTOM;
    } else if p.y > 1.0 + FLOAT_EPSILON {
        code |= Outcode::TOP;
    }
    if p.z < -1.0 - FLOAT_EPSILON {
        code |= Outcode::FAR;
    } else if p.z > 0.0 + FLOAT_EPSILON {
        code |= Outcode::NEAR;
    }
    code
}

/// Outcode against the perspective (pyramidal) view volume. The side planes
/// depend on z; `z_min` is the near-plane depth `-near/far`.
pub fn outcode_perspective(p: Vec3, z_min: f32) -> Outcode {
    let mut code = Outcode::INSIDE;
    if p.x < p.z - FLOAT_EPSILON {
        code |= Outcode::LEFT;
    } else if p.x > -p.z + FLOAT_EPSILON {
        code |= Outcode::RIGHT;
    }
    if p.y < p.z - FLOAT_EPSILON {
        code |= Outcode::BOTTOM;
    } else if p.y > -p.z + FLOAT_EPSILON {
        code |= Outcode::TOP;
    }
    if p.z < -1.0 - FLOAT_EPSILON {
        code |= Outcode::FAR;
    } else if p.z > z_min + FLOAT_EPSILON {
        code |= Outcode::NEAR;
    }
    code
}

fn outcode(p: Vec4, kind: ProjectionKind, z_min: f32) -> Outcode {
    match kind {
        ProjectionKind::Parallel => outcode_parallel(p.to_vec3()),
        ProjectionKind::Perspective => outcode_perspective(p.to_vec3(), z_min),
    }
}

/// Parameter `t` along `p(t) = p0 + t * (p1 - p0)` where the segment meets
/// one CVV plane, clamped to [0, 1]. `None` when the segment runs parallel
/// to the plane (those cases trivially accept or reject instead).
fn intersection_t(
    p0: Vec4,
    p1: Vec4,
    plane: Outcode,
    kind: ProjectionKind,
    z_min: f32,
) -> Option<f32> {
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;
    let dz = p1.z - p0.z;

    let (numerator, denominator) = match kind {
        ProjectionKind::Parallel => match plane {
            Outcode::LEFT => (-1.0 - p0.x, dx),
            Outcode::RIGHT => (1.0 - p0.x, dx),
            Outcode::BOTTOM => (-1.0 - p0.y, dy),
            Outcode::TOP => (1.0 - p0.y, dy),
            Outcode::FAR => (-1.0 - p0.z, dz),
            _ => (-p0.z, dz),
        },
        // Side planes are linear in z: e.g. x = z gives
        // x0 + t*dx = z0 + t*dz  =>  t = (z0 - x0) / (dx - dz).
        ProjectionKind::Perspective => match plane {
            Outcode::LEFT => (p0.z - p0.x, dx - dz),
            Outcode::RIGHT => (-p0.z - p0.x, dx + dz),
            Outcode::BOTTOM => (p0.z - p0.y, dy - dz),
            Outcode::TOP => (-p0.z - p0.y, dy + dz),
            Outcode::FAR => (-1.0 - p0.z, dz),
            _ => (z_min - p0.z, dz),
        },
    };

    if denominator.abs() < FLOAT_EPSILON {
        return None;
    }
    Some((numerator / denominator).clamp(0.0, 1.0))
}

/// Clips a segment to the canonical view volume.
///
/// Returns the surviving (possibly shortened) segment, or `None` when it
/// lies wholly outside. Endpoints with near-zero homogeneous weight are
/// points at infinity and reject rather than fault on the later divide.
pub fn clip_line(
    mut p0: Vec4,
    mut p1: Vec4,
    kind: ProjectionKind,
    z_min: f32,
) -> Option<(Vec4, Vec4)> {
    if p0.w.abs() < FLOAT_EPSILON || p1.w.abs() < FLOAT_EPSILON {
        return None;
    }
    if !p0.is_finite() || !p1.is_finite() {
        return None;
    }

    // Six planes, so at most six useful intersections.
    for _ in 0..=6 {
        let code0 = outcode(p0, kind, z_min);
        let code1 = outcode(p1, kind, z_min);

        if code0.is_inside() && code1.is_inside() {
            return Some((p0, p1));
        }
        if !(code0 & code1).is_inside() {
            return None;
        }

        let (replace_p0, outside) = if !code0.is_inside() {
            (true, code0)
        } else {
            (false, code1)
        };
        let plane = outside.first_plane()?;
        let t = intersection_t(p0, p1, plane, kind, z_min)?;
        let boundary = p0.lerp(p1, t);
        if replace_p0 {
            p0 = boundary;
        } else {
            p1 = boundary;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const Z_MIN: f32 = -0.1;

    #[test]
    fn points_inside_each_volume_have_zero_outcode() {
        assert!(outcode_parallel(Vec3::new(0.0, 0.0, -0.5)).is_inside());
        assert!(outcode_perspective(Vec3::new(0.0, 0.0, -0.5), Z_MIN).is_inside());
    }

    #[test]
    fn boundary_points_classify_as_inside() {
        assert!(outcode_parallel(Vec3::new(1.0, -1.0, 0.0)).is_inside());
        assert!(outcode_perspective(Vec3::new(-0.5, 0.5, -0.5), Z_MIN).is_inside());
    }

    #[test]
    fn parallel_outcode_flags_each_violated_plane() {
        let code = outcode_parallel(Vec3::new(-2.0, 2.0, 0.5));
        assert_eq!(
            code.bits(),
            Outcode::LEFT.bits() | Outcode::TOP.bits() | Outcode::NEAR.bits()
        );
        assert_eq!(
            outcode_parallel(Vec3::new(0.0, 0.0, -1.5)).bits(),
            Outcode::FAR.bits()
        );
    }

    #[test]
    fn perspective_outcode_uses_z_dependent_side_planes() {
        // x = -0.9 is outside the left plane at z = -0.5 but inside at z = -1.
        assert_eq!(
            outcode_perspective(Vec3::new(-0.9, 0.0, -0.5), Z_MIN).bits(),
            Outcode::LEFT.bits()
        );
        assert!(outcode_perspective(Vec3::new(-0.9, 0.0, -1.0), Z_MIN).is_inside());
    }

    #[test]
    fn fully_inside_segment_is_returned_unchanged() {
        let p0 = Vec4::point(-0.5, -0.5, -0.8);
        let p1 = Vec4::point(0.5, 0.5, -0.2);
        let (q0, q1) = clip_line(p0, p1, ProjectionKind::Parallel, 0.0).unwrap();
        assert_eq!(q0, p0);
        assert_eq!(q1, p1);
    }

    #[test]
    fn segment_outside_one_shared_plane_is_rejected() {
        let p0 = Vec4::point(1.5, 0.0, -0.5);
        let p1 = Vec4::point(2.5, 0.9, -0.1);
        assert!(clip_line(p0, p1, ProjectionKind::Parallel, 0.0).is_none());
    }

    #[test]
    fn crossing_one_boundary_lands_endpoint_on_the_plane() {
        let inside = Vec4::point(0.0, 0.0, -0.5);
        let outside = Vec4::point(2.0, 0.0, -0.5);
        let (q0, q1) = clip_line(inside, outside, ProjectionKind::Parallel, 0.0).unwrap();
        assert_eq!(q0, inside);
        assert_relative_eq!(q1.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(q1.y, 0.0);
        assert_relative_eq!(q1.z, -0.5);
    }

    #[test]
    fn segment_spanning_the_volume_is_shortened_on_both_ends() {
        let p0 = Vec4::point(-3.0, 0.0, -0.5);
        let p1 = Vec4::point(3.0, 0.0, -0.5);
        let (q0, q1) = clip_line(p0, p1, ProjectionKind::Parallel, 0.0).unwrap();
        assert_relative_eq!(q0.x, -1.0, epsilon = 1e-5);
        assert_relative_eq!(q1.x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn perspective_clip_lands_on_slanted_plane() {
        // Horizontal segment at z = -0.5 exits through x = -z = 0.5.
        let inside = Vec4::point(0.0, 0.0, -0.5);
        let outside = Vec4::point(2.0, 0.0, -0.5);
        let (q0, q1) = clip_line(inside, outside, ProjectionKind::Perspective, Z_MIN).unwrap();
        assert_eq!(q0, inside);
        assert_relative_eq!(q1.x, 0.5, epsilon = 1e-5);
        assert_relative_eq!(q1.x + q1.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn perspective_diagonal_reject_outside_frustum() {
        // Both endpoints in front of the near plane.
        let p0 = Vec4::point(0.0, 0.0, -0.05);
        let p1 = Vec4::point(0.01, 0.0, -0.01);
        assert!(clip_line(p0, p1, ProjectionKind::Perspective, Z_MIN).is_none());
    }

    #[test]
    fn near_zero_weight_rejects_instead_of_faulting() {
        let p0 = Vec4::new(0.0, 0.0, -0.5, 1e-9);
        let p1 = Vec4::point(0.1, 0.1, -0.5);
        assert!(clip_line(p0, p1, ProjectionKind::Parallel, 0.0).is_none());
    }

    #[test]
    fn non_finite_endpoint_rejects() {
        let p0 = Vec4::new(f32::NAN, 0.0, -0.5, 1.0);
        let p1 = Vec4::point(0.1, 0.1, -0.5);
        assert!(clip_line(p0, p1, ProjectionKind::Parallel, 0.0).is_none());
    }
}
