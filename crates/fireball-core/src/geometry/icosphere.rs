use fnv::FnvHashMap;
use glam::Vec3;

use super::{GeometryError, Mesh, Vertex, MAX_TESSELLATION};
use crate::drawable::{Drawable, Model};

// 20 faces of the canonical icosahedron, outward CCW.
const ICOSAHEDRON_FACES: [[u32; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// The 12 vertices of a regular icosahedron inscribed in the unit sphere.
fn icosahedron_vertices() -> Vec<Vec3> {
    let phi = (1.0 + 5.0_f32.sqrt()) * 0.5;
    [
        Vec3::new(-1.0, phi, 0.0),
        Vec3::new(1.0, phi, 0.0),
        Vec3::new(-1.0, -phi, 0.0),
        Vec3::new(1.0, -phi, 0.0),
        Vec3::new(0.0, -1.0, phi),
        Vec3::new(0.0, 1.0, phi),
        Vec3::new(0.0, -1.0, -phi),
        Vec3::new(0.0, 1.0, -phi),
        Vec3::new(phi, 0.0, -1.0),
        Vec3::new(phi, 0.0, 1.0),
        Vec3::new(-phi, 0.0, -1.0),
        Vec3::new(-phi, 0.0, 1.0),
    ]
    .into_iter()
    .map(Vec3::normalize)
    .collect()
}

/// Splits every edge exactly once per pass; keyed by the sorted parent pair.
struct MidpointCache {
    edges: FnvHashMap<(u32, u32), u32>,
}

impl MidpointCache {
    fn with_capacity(edges: usize) -> Self {
        Self {
            edges: FnvHashMap::with_capacity_and_hasher(edges, Default::default()),
        }
    }

    fn midpoint(&mut self, points: &mut Vec<Vec3>, a: u32, b: u32) -> u32 {
        let key = (a.min(b), a.max(b));
        *self.edges.entry(key).or_insert_with(|| {
            let mid = (points[a as usize] + points[b as usize]).normalize();
            points.push(mid);
            (points.len() - 1) as u32
        })
    }
}

/// Generate a geodesic sphere by subdividing an icosahedron `tessellation_level` times.
///
/// The result has `20 * 4^level` triangles. Vertices are shared between
/// neighbouring triangles, normals point away from `center`, and positions are
/// scaled by `radius` before being translated to `center`.
///
/// Callers are expected to pass a level within `0..=MAX_TESSELLATION`;
/// [`Icosphere::new`] enforces this.
pub fn generate_icosphere(center: Vec3, radius: f32, tessellation_level: u32) -> Mesh {
    let mut points = icosahedron_vertices();
    let mut faces: Vec<[u32; 3]> = ICOSAHEDRON_FACES.to_vec();

    for _ in 0..tessellation_level {
        // Euler: a closed triangle mesh has 3F/2 edges.
        let mut cache = MidpointCache::with_capacity(faces.len() * 3 / 2);
        let mut next = Vec::with_capacity(faces.len() * 4);
        for &[a, b, c] in &faces {
            let mab = cache.midpoint(&mut points, a, b);
            let mbc = cache.midpoint(&mut points, b, c);
            let mac = cache.midpoint(&mut points, a, c);
            next.push([a, mab, mac]);
            next.push([b, mbc, mab]);
            next.push([c, mac, mbc]);
            next.push([mab, mbc, mac]);
        }
        faces = next;
    }

    let vertices = points
        .iter()
        .map(|p| Vertex {
            position: (*p * radius + center).to_array(),
            normal: p.normalize().to_array(),
        })
        .collect();
    let indices = faces.into_iter().flatten().collect();

    Mesh { vertices, indices }
}

/// Expected triangle count for a tessellation level.
pub fn icosphere_triangle_count(tessellation_level: u32) -> usize {
    20 * 4usize.pow(tessellation_level)
}

/// A drawable icosphere. The mesh is generated once at construction; changing
/// the level means building a new `Icosphere`.
#[derive(Debug)]
pub struct Icosphere {
    center: Vec3,
    radius: f32,
    tessellations: u32,
    model: Model,
}

impl Icosphere {
    pub fn new(center: Vec3, radius: f32, tessellations: u32) -> Result<Self, GeometryError> {
        if tessellations > MAX_TESSELLATION {
            return Err(GeometryError::TessellationOutOfRange {
                level: tessellations,
                max: MAX_TESSELLATION,
            });
        }
        let mesh = generate_icosphere(center, radius, tessellations);
        log::debug!(
            "[geometry] icosphere level={} vertices={} triangles={}",
            tessellations,
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        Ok(Self {
            center,
            radius,
            tessellations,
            model: Model::new(mesh),
        })
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn tessellations(&self) -> u32 {
        self.tessellations
    }
}

impl Drawable for Icosphere {
    fn model(&self) -> &Model {
        &self.model
    }

    fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }
}
