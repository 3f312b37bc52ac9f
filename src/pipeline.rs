//! Viewing pipeline: camera parameters to canonical-view-volume transform.
//!
//! The transform is built in two pieces that are deliberately kept apart:
//!
//! - `view`: world space into the canonical view volume (CVV), where the
//!   clipper runs with z still intact.
//! - `proj`: the fixed projective matrix (`m_par` or `m_per`) applied to the
//!   surviving clipped endpoints, followed by the homogeneous divide.
//!
//! Folding `proj` into `view` would destroy the z information the clipper
//! needs (parallel projection zeroes z).

use crate::camera::{CameraError, CameraSpec, ProjectionKind};
use crate::math::{Mat4, Vec3};

/// The composed CVV transform for one camera state.
#[derive(Debug, Clone, Copy)]
pub struct CvvTransform {
    /// World space to CVV space, pre-projection.
    pub view: Mat4,
    /// `m_par` or `m_per`, applied after clipping.
    pub proj: Mat4,
    pub kind: ProjectionKind,
    /// Near-plane depth of the perspective CVV (`-near/far`); unused for
    /// parallel, where the CVV depth range is fixed at [-1, 0].
    pub z_min: f32,
}

/// Orthonormal view-reference-coordinate basis derived from the camera.
struct VrcBasis {
    u: Vec3,
    v: Vec3,
    n: Vec3,
}

impl VrcBasis {
    fn derive(camera: &CameraSpec) -> Result<Self, CameraError> {
        // View-plane normal points from the look-at target toward the eye.
        let n = (camera.prp - camera.srp)
            .try_normalize()
            .ok_or(CameraError::DegenerateCamera("eye coincides with target"))?;
        let u = camera
            .vup
            .cross(n)
            .try_normalize()
            .ok_or(CameraError::DegenerateCamera(
                "up hint is parallel to the view direction",
            ))?;
        let v = n.cross(u);
        Ok(Self { u, v, n })
    }

    /// Rotation aligning (u, v, n) with the world (x, y, z) axes.
    fn rotation(&self) -> Mat4 {
        Mat4::new([
            [self.u.x, self.u.y, self.u.z, 0.0],
            [self.v.x, self.v.y, self.v.z, 0.0],
            [self.n.x, self.n.y, self.n.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }
}

impl CvvTransform {
    /// Builds the CVV transform for the given camera.
    ///
    /// Fails with [`CameraError::DegenerateCamera`] when no orthonormal VRC
    /// basis exists; callers skip the frame (or reuse a previous transform).
    pub fn build(camera: &CameraSpec) -> Result<Self, CameraError> {
        let basis = VrcBasis::derive(camera)?;
        let rotate = basis.rotation();
        let translate_prp =
            Mat4::translation(-camera.prp.x, -camera.prp.y, -camera.prp.z);

        // Shear the center-of-window ray onto the z-axis.
        let cw = camera.clip.window_center();
        let shear = Mat4::shear_xy(-(cw.x / cw.z), -(cw.y / cw.z));

        let clip = camera.clip;
        let (view, proj, z_min) = match camera.kind {
            ProjectionKind::Parallel => {
                let scale = Mat4::scaling(
                    2.0 / (clip.right - clip.left),
                    2.0 / (clip.top - clip.bottom),
                    1.0 / clip.far,
                );
                let translate_near = Mat4::translation(0.0, 0.0, clip.near);
                let view =
                    Mat4::compose(&[scale, translate_near, shear, rotate, translate_prp])
                        .unwrap_or_else(Mat4::identity);
                (view, Mat4::m_par(), 0.0)
            }
            ProjectionKind::Perspective => {
                let scale = Mat4::scaling(
                    2.0 * clip.near / ((clip.right - clip.left) * clip.far),
                    2.0 * clip.near / ((clip.top - clip.bottom) * clip.far),
                    1.0 / clip.far,
                );
                let view = Mat4::compose(&[scale, shear, rotate, translate_prp])
                    .unwrap_or_else(Mat4::identity);
                (view, Mat4::m_per(), -clip.near / clip.far)
            }
        };

        Ok(Self {
            view,
            proj,
            kind: camera.kind,
            z_min,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::ClipVolume;
    use crate::math::Vec4;
    use approx::assert_relative_eq;

    fn camera(kind: ProjectionKind) -> CameraSpec {
        CameraSpec {
            kind,
            prp: Vec3::new(0.0, 10.0, -50.0),
            srp: Vec3::new(0.0, 1.0, 0.0),
            vup: Vec3::Y_AXIS,
            clip: ClipVolume::new([-12.0, 6.0, -12.0, 6.0, 10.0, 100.0]),
        }
    }

    #[test]
    fn view_transform_is_finite_and_invertible() {
        for kind in [ProjectionKind::Parallel, ProjectionKind::Perspective] {
            let cvv = CvvTransform::build(&camera(kind)).unwrap();
            assert!(cvv.view.is_finite());
            assert!(cvv.view.inverse().is_some());
        }
    }

    #[test]
    fn parallel_cvv_corners_round_trip_through_inverse() {
        let cvv = CvvTransform::build(&camera(ProjectionKind::Parallel)).unwrap();
        let inverse = cvv.view.inverse().unwrap();
        for x in [-1.0f32, 1.0] {
            for y in [-1.0f32, 1.0] {
                for z in [-1.0f32, 0.0] {
                    let corner = Vec4::point(x, y, z);
                    let world = inverse * corner;
                    let back = cvv.view * world;
                    assert_relative_eq!(back.x, corner.x, epsilon = 1e-3);
                    assert_relative_eq!(back.y, corner.y, epsilon = 1e-3);
                    assert_relative_eq!(back.z, corner.z, epsilon = 1e-3);
                    assert_relative_eq!(back.w, 1.0, epsilon = 1e-4);
                }
            }
        }
    }

    #[test]
    fn center_of_window_ray_lands_on_negative_z_axis() {
        // The shear puts the ray from the eye through the window center on
        // the z-axis, so that world point must map to x = y = 0, z < 0.
        let cam = camera(ProjectionKind::Perspective);
        let cvv = CvvTransform::build(&cam).unwrap();
        let basis = VrcBasis::derive(&cam).unwrap();
        let cw = cam.clip.window_center();
        let world = cam.prp + basis.u * cw.x + basis.v * cw.y + basis.n * cw.z;
        let mapped = cvv.view * Vec4::point(world.x, world.y, world.z);
        assert_relative_eq!(mapped.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(mapped.y, 0.0, epsilon = 1e-4);
        assert!(mapped.z < 0.0);
    }

    #[test]
    fn perspective_z_min_is_near_over_far() {
        let cvv = CvvTransform::build(&camera(ProjectionKind::Perspective)).unwrap();
        assert_relative_eq!(cvv.z_min, -0.1);
    }

    #[test]
    fn coincident_eye_and_target_is_degenerate() {
        let mut cam = camera(ProjectionKind::Perspective);
        cam.srp = cam.prp;
        assert!(matches!(
            CvvTransform::build(&cam),
            Err(CameraError::DegenerateCamera(_))
        ));
    }

    #[test]
    fn vup_parallel_to_view_direction_is_degenerate() {
        let mut cam = camera(ProjectionKind::Parallel);
        cam.vup = (cam.prp - cam.srp).try_normalize().unwrap();
        assert!(matches!(
            CvvTransform::build(&cam),
            Err(CameraError::DegenerateCamera(_))
        ));
    }
}
