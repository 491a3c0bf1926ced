// Host-side tests for the icosphere generator and the other mesh kinds.

use fireball_core::*;
use glam::Vec3;

fn pos(v: &Vertex) -> Vec3 {
    Vec3::from(v.position)
}

#[test]
fn triangle_count_quadruples_per_level() {
    for level in 0..=4 {
        let mesh = generate_icosphere(Vec3::ZERO, 1.0, level);
        assert_eq!(mesh.triangle_count(), 20 * 4usize.pow(level));
        assert_eq!(mesh.triangle_count(), icosphere_triangle_count(level));
    }
}

#[test]
fn base_icosahedron_has_twelve_vertices() {
    let mesh = generate_icosphere(Vec3::ZERO, 1.0, 0);
    assert_eq!(mesh.vertex_count(), 12);
    assert_eq!(mesh.triangle_count(), 20);
}

#[test]
fn shared_midpoints_are_deduplicated() {
    // 12 corners + one midpoint per each of the 30 edges
    let mesh = generate_icosphere(Vec3::ZERO, 1.0, 1);
    assert_eq!(mesh.vertex_count(), 42);
    let mesh = generate_icosphere(Vec3::ZERO, 1.0, 2);
    assert_eq!(mesh.vertex_count(), 162);
}

#[test]
fn vertices_lie_on_the_sphere_around_center() {
    let center = Vec3::new(1.0, -2.0, 0.5);
    let radius = 2.5;
    let mesh = generate_icosphere(center, radius, 3);
    for v in &mesh.vertices {
        assert!(((pos(v) - center).length() - radius).abs() < 1e-4);
    }
}

#[test]
fn indices_in_range_and_normals_outward() {
    let center = Vec3::new(0.0, 3.0, 0.0);
    let mesh = generate_icosphere(center, 2.0, 2);
    let n = mesh.vertex_count() as u32;
    assert!(mesh.indices.iter().all(|&i| i < n));
    for v in &mesh.vertices {
        let normal = Vec3::from(v.normal);
        assert!((normal.length() - 1.0).abs() < 1e-5);
        assert!(normal.dot((pos(v) - center).normalize()) > 0.999);
    }
    for [a, b, c] in mesh.triangles() {
        let (a, b, c) = (
            pos(&mesh.vertices[a as usize]),
            pos(&mesh.vertices[b as usize]),
            pos(&mesh.vertices[c as usize]),
        );
        let face = (b - a).cross(c - a);
        let centroid = (a + b + c) / 3.0;
        assert!(face.dot(centroid - center) > 0.0, "inward-facing triangle");
    }
}

#[test]
fn generation_is_deterministic() {
    let a = generate_icosphere(Vec3::ZERO, 1.0, 3);
    let b = generate_icosphere(Vec3::ZERO, 1.0, 3);
    assert_eq!(a, b);
}

#[test]
fn icosphere_rejects_levels_above_max() {
    let err = Icosphere::new(Vec3::ZERO, 1.0, MAX_TESSELLATION + 1).unwrap_err();
    assert_eq!(
        err,
        GeometryError::TessellationOutOfRange {
            level: MAX_TESSELLATION + 1,
            max: MAX_TESSELLATION,
        }
    );
    let ok = Icosphere::new(Vec3::ZERO, 1.0, 1).unwrap();
    assert_eq!(ok.tessellations(), 1);
    assert_eq!(ok.mesh().vertex_count(), 42);
}

#[test]
fn square_and_cube_shapes() {
    let square = generate_square(Vec3::new(0.0, 1.0, 0.0));
    assert_eq!(square.vertex_count(), 4);
    assert_eq!(square.triangle_count(), 2);
    assert!(square.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));

    let cube = generate_cube(Vec3::ZERO);
    assert_eq!(cube.vertex_count(), 24);
    assert_eq!(cube.triangle_count(), 12);
    for v in &cube.vertices {
        assert!(pos(v).abs().max_element() <= 1.0 + 1e-6);
    }
}

#[test]
fn every_kind_is_drawable() {
    let mut kinds: Vec<Box<dyn Drawable>> = vec![
        Box::new(Icosphere::new(Vec3::ZERO, 1.0, 0).unwrap()),
        Box::new(Square::new(Vec3::ZERO)),
        Box::new(Cube::new(Vec3::ZERO)),
    ];
    for d in kinds.iter_mut() {
        d.model_mut().position = Vec3::X;
        assert_eq!(d.transform().w_axis.truncate(), Vec3::X);
        assert!(!d.mesh().is_empty());
    }
}
