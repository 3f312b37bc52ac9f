//! Procedural wireframe generation.
//!
//! Every curved shape is built from one primitive: a circular sweep that
//! emits `count + 1` ring vertices (the last duplicating the first to close
//! the loop) in either the XY or XZ plane. Cube, cone, cylinder and sphere
//! builders return fully-formed immutable vertex/edge data; nothing mutates
//! shared geometry incrementally.

use crate::math::{Vec3, Vec4};

/// Plane a circle sweep lies in; the third coordinate comes from the center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingPlane {
    /// Circle of constant z.
    Xy,
    /// Circle of constant y.
    Xz,
}

/// A run of vertex indices drawn as connected segments. `closed` adds one
/// wrapping segment from the last index back to the first, replacing the
/// sentinel-terminated edge lists of older scene formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polyline {
    pub indices: Vec<usize>,
    pub closed: bool,
}

impl Polyline {
    pub fn open(indices: Vec<usize>) -> Self {
        Self {
            indices,
            closed: false,
        }
    }

    pub fn closed(indices: Vec<usize>) -> Self {
        Self {
            indices,
            closed: true,
        }
    }

    /// Consecutive index pairs, wrapping once when closed.
    pub fn index_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let wrap = if self.closed && self.indices.len() > 2 {
            Some((self.indices[self.indices.len() - 1], self.indices[0]))
        } else {
            None
        };
        self.indices
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
            .chain(wrap)
    }
}

/// Immutable vertex/edge data for one model, in rest pose.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wireframe {
    pub vertices: Vec<Vec4>,
    pub polylines: Vec<Polyline>,
}

impl Wireframe {
    /// Index of the first out-of-range vertex reference, if any.
    pub fn first_bad_index(&self) -> Option<usize> {
        self.polylines
            .iter()
            .flat_map(|p| p.indices.iter().copied())
            .find(|&i| i >= self.vertices.len())
    }

    /// Appends a circle of `count + 1` vertices (last duplicates the first)
    /// at angles `i * (360 / count)` degrees, as one open polyline.
    fn push_ring(&mut self, count: usize, radius: f32, center: Vec3, plane: RingPlane) {
        let start = self.vertices.len();
        let step = 360.0 / count as f32;
        for i in 0..=count {
            let angle = (i as f32 * step).to_radians();
            let (dx, dp) = (radius * angle.cos(), radius * angle.sin());
            let vertex = match plane {
                RingPlane::Xy => Vec4::point(center.x + dx, center.y + dp, center.z),
                RingPlane::Xz => Vec4::point(center.x + dx, center.y, center.z + dp),
            };
            self.vertices.push(vertex);
        }
        self.polylines
            .push(Polyline::open((start..=start + count).collect()));
    }
}

/// Axis-aligned box wireframe: 8 corners, two closed 4-cycles for the
/// side faces plus 4 connecting struts, 12 edges total.
pub fn cube(center: Vec3, width: f32, height: f32, depth: f32) -> Wireframe {
    let (hw, hh, hd) = (width / 2.0, height / 2.0, depth / 2.0);
    let corner = |sx: f32, sy: f32, sz: f32| {
        Vec4::point(center.x + sx * hw, center.y + sy * hh, center.z + sz * hd)
    };
    Wireframe {
        vertices: vec![
            corner(-1.0, 1.0, 1.0),
            corner(-1.0, -1.0, 1.0),
            corner(-1.0, 1.0, -1.0),
            corner(-1.0, -1.0, -1.0),
            corner(1.0, 1.0, 1.0),
            corner(1.0, -1.0, 1.0),
            corner(1.0, 1.0, -1.0),
            corner(1.0, -1.0, -1.0),
        ],
        polylines: vec![
            Polyline::closed(vec![0, 1, 3, 2]),
            Polyline::closed(vec![4, 5, 7, 6]),
            Polyline::open(vec![0, 4]),
            Polyline::open(vec![1, 5]),
            Polyline::open(vec![2, 6]),
            Polyline::open(vec![3, 7]),
        ],
    }
}

/// Cone wireframe: one base ring at `z = center.z - height/2`, an apex at
/// `z = center.z + height/2`, and a spoke from every base vertex.
pub fn cone(center: Vec3, radius: f32, height: f32, sides: usize) -> Wireframe {
    let half = height / 2.0;
    let mut wf = Wireframe::default();
    wf.push_ring(
        sides,
        radius,
        Vec3::new(center.x, center.y, center.z - half),
        RingPlane::Xy,
    );
    let apex = wf.vertices.len();
    wf.vertices
        .push(Vec4::point(center.x, center.y, center.z + half));
    for i in 0..sides {
        wf.polylines.push(Polyline::open(vec![i, apex]));
    }
    wf
}

/// Cylinder wireframe: two rings offset by `±height/2` along z, joined by
/// `sides` vertical struts between corresponding ring vertices.
pub fn cylinder(center: Vec3, radius: f32, height: f32, sides: usize) -> Wireframe {
    let half = height / 2.0;
    let mut wf = Wireframe::default();
    wf.push_ring(
        sides,
        radius,
        Vec3::new(center.x, center.y, center.z - half),
        RingPlane::Xy,
    );
    let top_start = wf.vertices.len();
    wf.push_ring(
        sides,
        radius,
        Vec3::new(center.x, center.y, center.z + half),
        RingPlane::Xy,
    );
    for i in 0..sides {
        wf.polylines.push(Polyline::open(vec![i, top_start + i]));
    }
    wf
}

/// Latitude-and-longitude sphere wireframe: `slices` band positions spaced
/// across the diameter, each contributing one ring of constant z and one of
/// constant y, both swept with `stacks` segments. Ring radii come from
/// `sqrt(r^2 - d^2)`, clamped to zero where floating round-off at the poles
/// would go negative. This is a globe grid, not a geodesic mesh.
pub fn sphere(center: Vec3, radius: f32, slices: usize, stacks: usize) -> Wireframe {
    let mut wf = Wireframe::default();
    if slices < 2 {
        return wf;
    }
    let spacing = (radius * 2.0) / (slices - 1) as f32;
    for band in 0..slices {
        let offset = -radius + spacing * band as f32;
        let ring_radius = (radius * radius - offset * offset).max(0.0).sqrt();
        wf.push_ring(
            stacks,
            ring_radius,
            Vec3::new(center.x, center.y, center.z + offset),
            RingPlane::Xy,
        );
        wf.push_ring(
            stacks,
            ring_radius,
            Vec3::new(center.x, center.y + offset, center.z),
            RingPlane::Xz,
        );
    }
    wf
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::{HashMap, HashSet};

    /// Distinct undirected edges of a wireframe.
    fn edge_set(wf: &Wireframe) -> HashSet<(usize, usize)> {
        wf.polylines
            .iter()
            .flat_map(|p| p.index_pairs())
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect()
    }

    #[test]
    fn cube_is_a_closed_degree_three_graph() {
        let wf = cube(Vec3::ZERO, 2.0, 2.0, 2.0);
        assert_eq!(wf.vertices.len(), 8);

        let edges = edge_set(&wf);
        assert_eq!(edges.len(), 12);

        let mut degree: HashMap<usize, usize> = HashMap::new();
        for (a, b) in &edges {
            *degree.entry(*a).or_default() += 1;
            *degree.entry(*b).or_default() += 1;
        }
        assert_eq!(degree.len(), 8);
        assert!(degree.values().all(|&d| d == 3));

        for v in &wf.vertices {
            assert_relative_eq!(v.x.abs(), 1.0);
            assert_relative_eq!(v.y.abs(), 1.0);
            assert_relative_eq!(v.z.abs(), 1.0);
        }
    }

    #[test]
    fn ring_duplicates_its_first_vertex_to_close() {
        let mut wf = Wireframe::default();
        wf.push_ring(8, 2.0, Vec3::new(1.0, 0.0, -3.0), RingPlane::Xy);
        assert_eq!(wf.vertices.len(), 9);
        let first = wf.vertices[0];
        let last = wf.vertices[8];
        assert_relative_eq!(first.x, last.x, epsilon = 1e-5);
        assert_relative_eq!(first.y, last.y, epsilon = 1e-5);
        assert_eq!(first.z, last.z);
    }

    #[test]
    fn sphere_vertices_sit_on_the_sphere() {
        let center = Vec3::ZERO;
        let radius = 15.0;
        let wf = sphere(center, radius, 30, 30);
        for v in &wf.vertices {
            let d = (v.to_vec3() - center).magnitude();
            assert_relative_eq!(d, radius, epsilon = 1e-3);
        }
        assert!(wf.first_bad_index().is_none());
    }

    #[test]
    fn sphere_pole_rings_clamp_to_zero_radius() {
        // Odd spacing makes r^2 - d^2 dip slightly negative at the poles;
        // the clamp turns that into a zero-radius ring instead of NaN.
        let wf = sphere(Vec3::ZERO, 7.3, 13, 9);
        assert!(wf.vertices.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn sphere_with_unequal_slices_and_stacks_indexes_correctly() {
        let wf = sphere(Vec3::ZERO, 5.0, 12, 20);
        // 12 bands, two rings per band, 21 vertices per ring.
        assert_eq!(wf.vertices.len(), 12 * 2 * 21);
        assert!(wf.first_bad_index().is_none());
    }

    #[test]
    fn cone_has_base_ring_plus_spokes() {
        let sides = 10;
        let wf = cone(Vec3::new(0.0, -20.0, -20.0), 3.0, 10.0, sides);
        assert_eq!(wf.vertices.len(), sides + 2);
        // One base polyline plus one spoke per side.
        assert_eq!(wf.polylines.len(), sides + 1);
        let apex = wf.vertices[sides + 1];
        assert_relative_eq!(apex.z, -15.0);
        for v in &wf.vertices[..=sides] {
            assert_relative_eq!(v.z, -25.0);
        }
        assert!(wf.first_bad_index().is_none());
    }

    #[test]
    fn cylinder_struts_join_corresponding_ring_vertices() {
        let sides = 6;
        let wf = cylinder(Vec3::ZERO, 5.0, 4.0, sides);
        assert_eq!(wf.vertices.len(), 2 * (sides + 1));
        assert_eq!(wf.polylines.len(), 2 + sides);
        for i in 0..sides {
            let strut = &wf.polylines[2 + i];
            let (a, b) = (strut.indices[0], strut.indices[1]);
            let (va, vb) = (wf.vertices[a], wf.vertices[b]);
            assert_relative_eq!(va.x, vb.x, epsilon = 1e-5);
            assert_relative_eq!(va.y, vb.y, epsilon = 1e-5);
            assert_relative_eq!(vb.z - va.z, 4.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn closed_polyline_wraps_exactly_once() {
        let p = Polyline::closed(vec![0, 1, 2, 3]);
        let pairs: Vec<_> = p.index_pairs().collect();
        assert_eq!(pairs, vec![(0, 1), (1, 2), (2, 3), (3, 0)]);
    }

    #[test]
    fn bad_edge_index_is_reported() {
        let wf = Wireframe {
            vertices: vec![Vec4::point(0.0, 0.0, 0.0)],
            polylines: vec![Polyline::open(vec![0, 3])],
        };
        assert_eq!(wf.first_bad_index(), Some(3));
    }
}
