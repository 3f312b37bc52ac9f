//! Scene assembly and the JSON scene description.
//!
//! The wire format mirrors the original viewer's scene files: a `view`
//! object with `type`, `prp`, `srp`, `vup` and a six-element `clip` array,
//! and a `models` list tagged by `type`. Deserialization happens into plain
//! description structs here; the viewing core only ever sees the validated
//! [`CameraSpec`] and [`Model`] values built from them.
//!
//! All structural validation (clip volume bounds, generic edge indices)
//! happens at load time, never per frame.

use serde::Deserialize;
use thiserror::Error;

use crate::camera::{CameraError, CameraSpec, ClipVolume, ProjectionKind};
use crate::math::{Vec3, Vec4};
use crate::mesh::{Polyline, Wireframe};
use crate::model::{Animation, Axis, Model, Shape};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Camera(#[from] CameraError),
    #[error("edge index {index} out of range for {vertex_count} vertices")]
    EdgeIndexOutOfRange { index: usize, vertex_count: usize },
    #[error("malformed scene description: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One loaded scene: camera state plus an ordered model list.
pub struct Scene {
    pub camera: CameraSpec,
    pub models: Vec<Model>,
}

impl Scene {
    /// Parses and validates a JSON scene description.
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        let desc: SceneDesc = serde_json::from_str(text)?;
        desc.build()
    }

    /// The built-in startup scene: a generic house-shaped prism plus one of
    /// each procedural shape, most of them spinning.
    pub fn demo() -> Self {
        let camera = CameraSpec {
            kind: ProjectionKind::Perspective,
            prp: Vec3::new(0.0, 10.0, -50.0),
            srp: Vec3::new(0.0, 1.0, 0.0),
            vup: Vec3::Y_AXIS,
            clip: ClipVolume::new([-12.0, 6.0, -12.0, 6.0, 10.0, 100.0]),
        };

        let house = Wireframe {
            vertices: vec![
                Vec4::point(0.0, 0.0, 0.0),
                Vec4::point(20.0, 0.0, 0.0),
                Vec4::point(20.0, 12.0, 0.0),
                Vec4::point(10.0, 20.0, 0.0),
                Vec4::point(0.0, 12.0, 0.0),
                Vec4::point(0.0, 0.0, -30.0),
                Vec4::point(20.0, 0.0, -30.0),
                Vec4::point(20.0, 12.0, -30.0),
                Vec4::point(10.0, 20.0, -30.0),
                Vec4::point(0.0, 12.0, -30.0),
            ],
            polylines: vec![
                Polyline::closed(vec![0, 1, 2, 3, 4]),
                Polyline::closed(vec![5, 6, 7, 8, 9]),
                Polyline::open(vec![0, 5]),
                Polyline::open(vec![1, 6]),
                Polyline::open(vec![2, 7]),
                Polyline::open(vec![3, 8]),
                Polyline::open(vec![4, 9]),
            ],
        };

        let models = vec![
            Model::new(
                Shape::Generic(house),
                Some(Animation {
                    axis: Axis::Y,
                    rps: 0.2,
                }),
            ),
            Model::new(
                Shape::Cube {
                    center: Vec3::new(30.0, 0.0, 0.0),
                    width: 3.0,
                    height: 3.0,
                    depth: 3.0,
                },
                None,
            ),
            Model::new(
                Shape::Sphere {
                    center: Vec3::new(-30.0, 0.0, 0.0),
                    radius: 15.0,
                    slices: 30,
                    stacks: 30,
                },
                Some(Animation {
                    axis: Axis::X,
                    rps: 0.5,
                }),
            ),
            Model::new(
                Shape::Cone {
                    center: Vec3::new(0.0, -20.0, -20.0),
                    radius: 3.0,
                    height: 10.0,
                    sides: 10,
                },
                Some(Animation {
                    axis: Axis::Y,
                    rps: 1.0,
                }),
            ),
            Model::new(
                Shape::Cylinder {
                    center: Vec3::new(45.0, 0.0, -60.0),
                    radius: 5.0,
                    height: 5.0,
                    sides: 100,
                },
                Some(Animation {
                    axis: Axis::Y,
                    rps: 0.01,
                }),
            ),
        ];

        Self { camera, models }
    }
}

// ---------------------------------------------------------------------------
// Wire-format description structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SceneDesc {
    view: ViewDesc,
    models: Vec<ModelDesc>,
}

#[derive(Debug, Deserialize)]
struct ViewDesc {
    #[serde(rename = "type")]
    kind: KindDesc,
    prp: [f32; 3],
    srp: [f32; 3],
    vup: [f32; 3],
    clip: [f32; 6],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum KindDesc {
    Parallel,
    Perspective,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum AxisDesc {
    X,
    Y,
    Z,
}

#[derive(Debug, Deserialize)]
struct AnimationDesc {
    axis: AxisDesc,
    /// Radians per second.
    rps: f32,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ModelDesc {
    Generic {
        vertices: Vec<[f32; 3]>,
        edges: Vec<Vec<usize>>,
        animation: Option<AnimationDesc>,
    },
    Cube {
        center: [f32; 3],
        width: f32,
        height: f32,
        depth: f32,
        animation: Option<AnimationDesc>,
    },
    Sphere {
        center: [f32; 3],
        radius: f32,
        slices: usize,
        stacks: usize,
        animation: Option<AnimationDesc>,
    },
    Cone {
        center: [f32; 3],
        radius: f32,
        height: f32,
        sides: usize,
        animation: Option<AnimationDesc>,
    },
    Cylinder {
        center: [f32; 3],
        radius: f32,
        height: f32,
        sides: usize,
        animation: Option<AnimationDesc>,
    },
}

fn vec3(v: [f32; 3]) -> Vec3 {
    Vec3::new(v[0], v[1], v[2])
}

impl From<AxisDesc> for Axis {
    fn from(axis: AxisDesc) -> Self {
        match axis {
            AxisDesc::X => Axis::X,
            AxisDesc::Y => Axis::Y,
            AxisDesc::Z => Axis::Z,
        }
    }
}

impl From<AnimationDesc> for Animation {
    fn from(desc: AnimationDesc) -> Self {
        Animation {
            axis: desc.axis.into(),
            rps: desc.rps,
        }
    }
}

/// An edge list whose last index repeats its first is a closed loop in the
/// wire format; it becomes an explicit closed polyline with the duplicate
/// dropped.
fn polyline_from_edge_list(indices: Vec<usize>) -> Polyline {
    if indices.len() > 2 && indices.first() == indices.last() {
        let mut indices = indices;
        indices.pop();
        Polyline::closed(indices)
    } else {
        Polyline::open(indices)
    }
}

impl SceneDesc {
    fn build(self) -> Result<Scene, SceneError> {
        let camera = CameraSpec {
            kind: match self.view.kind {
                KindDesc::Parallel => ProjectionKind::Parallel,
                KindDesc::Perspective => ProjectionKind::Perspective,
            },
            prp: vec3(self.view.prp),
            srp: vec3(self.view.srp),
            vup: vec3(self.view.vup),
            clip: ClipVolume::new(self.view.clip),
        };
        camera.clip.validate()?;

        let mut models = Vec::with_capacity(self.models.len());
        for desc in self.models {
            models.push(build_model(desc)?);
        }
        Ok(Scene { camera, models })
    }
}

fn build_model(desc: ModelDesc) -> Result<Model, SceneError> {
    let (shape, animation) = match desc {
        ModelDesc::Generic {
            vertices,
            edges,
            animation,
        } => {
            let wireframe = Wireframe {
                vertices: vertices
                    .into_iter()
                    .map(|v| Vec4::point(v[0], v[1], v[2]))
                    .collect(),
                polylines: edges.into_iter().map(polyline_from_edge_list).collect(),
            };
            if let Some(index) = wireframe.first_bad_index() {
                return Err(SceneError::EdgeIndexOutOfRange {
                    index,
                    vertex_count: wireframe.vertices.len(),
                });
            }
            (Shape::Generic(wireframe), animation)
        }
        ModelDesc::Cube {
            center,
            width,
            height,
            depth,
            animation,
        } => (
            Shape::Cube {
                center: vec3(center),
                width,
                height,
                depth,
            },
            animation,
        ),
        ModelDesc::Sphere {
            center,
            radius,
            slices,
            stacks,
            animation,
        } => (
            Shape::Sphere {
                center: vec3(center),
                radius,
                slices,
                stacks,
            },
            animation,
        ),
        ModelDesc::Cone {
            center,
            radius,
            height,
            sides,
            animation,
        } => (
            Shape::Cone {
                center: vec3(center),
                radius,
                height,
                sides,
            },
            animation,
        ),
        ModelDesc::Cylinder {
            center,
            radius,
            height,
            sides,
            animation,
        } => (
            Shape::Cylinder {
                center: vec3(center),
                radius,
                height,
                sides,
            },
            animation,
        ),
    };
    Ok(Model::new(shape, animation.map(Into::into)))
}
