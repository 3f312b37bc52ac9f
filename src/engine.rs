//! Frame orchestration: animation stepping, camera navigation and the
//! per-frame transform-clip-project walk over every model.

use tracing::{debug, warn};

use crate::camera::NavEvent;
use crate::clip::{clip_line, FLOAT_EPSILON};
use crate::math::Vec4;
use crate::pipeline::CvvTransform;
use crate::scene::Scene;

/// Receiver for projected screen-space segments.
///
/// Coordinates are in pixels with the origin at the top left; endpoints may
/// land fractionally between pixels and may touch the right/bottom edge.
pub trait DrawSink {
    fn draw_segment(&mut self, x0: f32, y0: f32, x1: f32, y1: f32);
}

pub struct Engine {
    scene: Scene,
    width: u32,
    height: u32,
    /// Rebuilt lazily after navigation changes the camera.
    cached: Option<CvvTransform>,
}

impl Engine {
    pub fn new(scene: Scene, width: u32, height: u32) -> Self {
        Self {
            scene,
            width,
            height,
            cached: None,
        }
    }

    /// Steps every animated model by the elapsed wall-clock time.
    pub fn advance(&mut self, elapsed_ms: f32) {
        let dt_secs = elapsed_ms / 1000.0;
        for model in &mut self.scene.models {
            model.advance(dt_secs);
        }
    }

    /// Applies a navigation event and invalidates the cached transform.
    pub fn navigate(&mut self, event: NavEvent) {
        self.scene.camera.apply(event);
        self.cached = None;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Transforms, clips and projects every model, emitting the surviving
    /// segments in screen space.
    ///
    /// A camera that has been navigated into a degenerate state produces no
    /// segments for the frame rather than an error; the viewer keeps running
    /// and the next navigation event can recover it.
    pub fn render(&mut self, sink: &mut impl DrawSink) {
        let transform = match self.cached {
            Some(t) => t,
            None => match CvvTransform::build(&self.scene.camera) {
                Ok(t) => {
                    self.cached = Some(t);
                    t
                }
                Err(err) => {
                    warn!(%err, "skipping frame");
                    return;
                }
            },
        };

        let half_w = self.width as f32 * 0.5;
        let half_h = self.height as f32 * 0.5;
        let mut drawn = 0usize;
        let mut culled = 0usize;

        for model in &self.scene.models {
            let cvv: Vec<Vec4> = model
                .posed_vertices()
                .into_iter()
                .map(|v| transform.view * v)
                .collect();

            for polyline in &model.wireframe().polylines {
                for (a, b) in polyline.index_pairs() {
                    let clipped =
                        clip_line(cvv[a], cvv[b], transform.kind, transform.z_min);
                    let (p0, p1) = match clipped {
                        Some(segment) => segment,
                        None => {
                            culled += 1;
                            continue;
                        }
                    };
                    let s0 = match to_screen(transform.proj * p0, half_w, half_h) {
                        Some(s) => s,
                        None => continue,
                    };
                    let s1 = match to_screen(transform.proj * p1, half_w, half_h) {
                        Some(s) => s,
                        None => continue,
                    };
                    sink.draw_segment(s0.0, s0.1, s1.0, s1.1);
                    drawn += 1;
                }
            }
        }

        debug!(drawn, culled, "frame segments");
    }
}

/// Homogeneous divide followed by the NDC-to-pixel remap; y flips so +y
/// in the view volume is up on screen.
fn to_screen(p: Vec4, half_w: f32, half_h: f32) -> Option<(f32, f32)> {
    if p.w.abs() < FLOAT_EPSILON {
        return None;
    }
    let x = p.x / p.w;
    let y = p.y / p.w;
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    Some(((x + 1.0) * half_w, (1.0 - y) * half_h))
}
