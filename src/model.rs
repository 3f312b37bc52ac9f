//! Scene models: shape description, generated wireframe, animation state.
//!
//! The shape set is closed, so it is a plain tagged enum with one generation
//! arm per variant. Geometry is generated once when the model is created;
//! the per-frame animation step only accumulates an angle, and posing
//! re-rotates the untouched rest pose.

use crate::math::{Mat4, Vec3, Vec4};
use crate::mesh::{self, Wireframe};

/// World axis a model spins about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Constant-rate spin about one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub axis: Axis,
    /// Radians per second.
    pub rps: f32,
}

/// Shape parameters for the closed set of model kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Explicit vertex and edge lists supplied by the scene description.
    Generic(Wireframe),
    Cube {
        center: Vec3,
        width: f32,
        height: f32,
        depth: f32,
    },
    Sphere {
        center: Vec3,
        radius: f32,
        slices: usize,
        stacks: usize,
    },
    Cone {
        center: Vec3,
        radius: f32,
        height: f32,
        sides: usize,
    },
    Cylinder {
        center: Vec3,
        radius: f32,
        height: f32,
        sides: usize,
    },
}

impl Shape {
    /// Generates the rest-pose wireframe for this shape.
    pub fn wireframe(self) -> Wireframe {
        match self {
            Shape::Generic(wireframe) => wireframe,
            Shape::Cube {
                center,
                width,
                height,
                depth,
            } => mesh::cube(center, width, height, depth),
            Shape::Sphere {
                center,
                radius,
                slices,
                stacks,
            } => mesh::sphere(center, radius, slices, stacks),
            Shape::Cone {
                center,
                radius,
                height,
                sides,
            } => mesh::cone(center, radius, height, sides),
            Shape::Cylinder {
                center,
                radius,
                height,
                sides,
            } => mesh::cylinder(center, radius, height, sides),
        }
    }
}

/// One model instance: immutable rest geometry plus a spin accumulator.
#[derive(Debug, Clone)]
pub struct Model {
    rest: Wireframe,
    animation: Option<Animation>,
    theta: f32,
}

impl Model {
    pub fn new(shape: Shape, animation: Option<Animation>) -> Self {
        Self {
            rest: shape.wireframe(),
            animation,
            theta: 0.0,
        }
    }

    pub fn wireframe(&self) -> &Wireframe {
        &self.rest
    }

    pub fn theta(&self) -> f32 {
        self.theta
    }

    /// Per-frame animation step: accumulate the spin angle only. Vertex
    /// data is never touched here.
    pub fn advance(&mut self, dt_secs: f32) {
        if let Some(animation) = self.animation {
            self.theta += animation.rps * dt_secs;
        }
    }

    /// Rest-pose vertices rotated by the accumulated angle. With no
    /// animation (or a zero angle) this is the rest pose itself.
    pub fn posed_vertices(&self) -> Vec<Vec4> {
        let Some(animation) = self.animation else {
            return self.rest.vertices.clone();
        };
        let rotation = match animation.axis {
            Axis::X => Mat4::rotation_x(self.theta),
            Axis::Y => Mat4::rotation_y(self.theta),
            Axis::Z => Mat4::rotation_z(self.theta),
        };
        self.rest.vertices.iter().map(|&v| rotation * v).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    fn spinning_cube() -> Model {
        Model::new(
            Shape::Cube {
                center: Vec3::new(2.0, 0.0, 0.0),
                width: 2.0,
                height: 2.0,
                depth: 2.0,
            },
            Some(Animation {
                axis: Axis::Y,
                rps: PI,
            }),
        )
    }

    #[test]
    fn zero_angle_pose_is_the_rest_pose() {
        let model = spinning_cube();
        let posed = model.posed_vertices();
        for (posed, rest) in posed.iter().zip(&model.wireframe().vertices) {
            assert_relative_eq!(posed.x, rest.x, epsilon = 1e-6);
            assert_relative_eq!(posed.y, rest.y, epsilon = 1e-6);
            assert_relative_eq!(posed.z, rest.z, epsilon = 1e-6);
        }
    }

    #[test]
    fn advance_accumulates_radians_per_second() {
        let mut model = spinning_cube();
        model.advance(0.5);
        assert_relative_eq!(model.theta(), PI / 2.0);
        model.advance(0.5);
        assert_relative_eq!(model.theta(), PI);
    }

    #[test]
    fn posing_rotates_about_the_configured_axis_from_rest() {
        let mut model = spinning_cube();
        model.advance(1.0); // half a turn about Y
        let posed = model.posed_vertices();
        for (posed, rest) in posed.iter().zip(&model.wireframe().vertices) {
            assert_relative_eq!(posed.x, -rest.x, epsilon = 1e-5);
            assert_relative_eq!(posed.y, rest.y, epsilon = 1e-5);
            assert_relative_eq!(posed.z, -rest.z, epsilon = 1e-5);
        }
        // Rest pose itself must be untouched by advancing.
        let rest_x: Vec<f32> = model.wireframe().vertices.iter().map(|v| v.x).collect();
        assert!(rest_x.iter().any(|&x| x > 0.0));
    }

    #[test]
    fn model_without_animation_ignores_advance() {
        let mut model = Model::new(
            Shape::Cylinder {
                center: Vec3::ZERO,
                radius: 1.0,
                height: 2.0,
                sides: 8,
            },
            None,
        );
        model.advance(10.0);
        assert_relative_eq!(model.theta(), 0.0);
        assert_eq!(model.posed_vertices(), model.wireframe().vertices);
    }
}
