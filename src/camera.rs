//! Camera parameters and discrete navigation.
//!
//! A [`CameraSpec`] holds everything the viewing pipeline needs to build the
//! canonical-view-volume transform: the projection kind, the eye (PRP), the
//! look-at point (SRP), the up hint (VUP), and the clip volume bounds.
//!
//! Navigation is a set of discrete [`NavEvent`]s, each applying one
//! fixed-magnitude mutation, matching the original viewer's key bindings.

use thiserror::Error;

use crate::math::{Mat4, Vec3, Vec4};

/// Which canonical view volume the scene is transformed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionKind {
    /// Box-shaped CVV: x,y in [-1,1], z in [-1,0].
    Parallel,
    /// Pyramidal CVV bounded by x=±z, y=±z, z=-1 and z=zmin.
    Perspective,
}

#[derive(Debug, Error, PartialEq)]
pub enum CameraError {
    /// VUP parallel to the view direction, or PRP coincident with SRP.
    #[error("degenerate camera: {0}")]
    DegenerateCamera(&'static str),
    /// Rejected at scene-load time, never per frame.
    #[error("invalid clip volume: {0}")]
    InvalidClipVolume(&'static str),
}

/// View window and depth bounds: `[left, right] x [bottom, top]` on the view
/// plane, plus positive near/far distances along the negated view axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipVolume {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl ClipVolume {
    pub fn new(bounds: [f32; 6]) -> Self {
        let [left, right, bottom, top, near, far] = bounds;
        Self {
            left,
            right,
            bottom,
            top,
            near,
            far,
        }
    }

    pub fn validate(&self) -> Result<(), CameraError> {
        if self.near <= 0.0 {
            return Err(CameraError::InvalidClipVolume("near must be positive"));
        }
        if self.far <= self.near {
            return Err(CameraError::InvalidClipVolume("far must exceed near"));
        }
        if self.left >= self.right {
            return Err(CameraError::InvalidClipVolume("left must be below right"));
        }
        if self.bottom >= self.top {
            return Err(CameraError::InvalidClipVolume("bottom must be below top"));
        }
        Ok(())
    }

    /// Center of the view window on the near plane, used for the shear that
    /// puts the center-of-window ray on the z-axis.
    pub fn window_center(&self) -> Vec3 {
        Vec3::new(
            (self.left + self.right) / 2.0,
            (self.bottom + self.top) / 2.0,
            -self.near,
        )
    }
}

/// One discrete camera mutation, each a fixed-magnitude step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    /// Move eye and look-at one unit along +x.
    TruckLeft,
    /// Move eye and look-at one unit along -x.
    TruckRight,
    /// Move eye and look-at one unit along -z.
    DollyIn,
    /// Move eye and look-at one unit along +z.
    DollyOut,
    /// Rotate the view direction one radian about VUP.
    OrbitLeft,
    /// Drop the look-at point one unit.
    SrpDown,
}

/// Full camera state for one scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSpec {
    pub kind: ProjectionKind,
    /// Projection reference point: the eye position in world space.
    pub prp: Vec3,
    /// Stare reference point: the look-at target in world space.
    pub srp: Vec3,
    /// Up hint; must not be parallel to `prp - srp`.
    pub vup: Vec3,
    pub clip: ClipVolume,
}

impl CameraSpec {
    /// Applies one navigation event in place. The caller owns invalidating
    /// any cached view transform afterwards.
    pub fn apply(&mut self, event: NavEvent) {
        match event {
            NavEvent::TruckLeft => {
                self.prp.x += 1.0;
                self.srp.x += 1.0;
            }
            NavEvent::TruckRight => {
                self.prp.x -= 1.0;
                self.srp.x -= 1.0;
            }
            NavEvent::DollyIn => {
                self.prp.z -= 1.0;
                self.srp.z -= 1.0;
            }
            NavEvent::DollyOut => {
                self.prp.z += 1.0;
                self.srp.z += 1.0;
            }
            NavEvent::OrbitLeft => self.orbit(1.0),
            NavEvent::SrpDown => self.srp.y -= 1.0,
        }
    }

    /// Rotates the view direction about VUP, keeping the eye fixed. A
    /// degenerate up hint makes this a no-op; the pipeline reports the
    /// error when it next builds a transform.
    fn orbit(&mut self, theta: f32) {
        let Some(axis) = self.vup.try_normalize() else {
            return;
        };
        let direction = self.srp - self.prp;
        let rotated: Vec4 = Mat4::rotation_about_axis(axis, theta) * Into::<Vec4>::into(direction);
        self.srp = self.prp + rotated.to_vec3();
    }
}
