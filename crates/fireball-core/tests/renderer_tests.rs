// Host-side tests for the render orchestration protocol, run against the
// recording headless backend.

use fireball_core::*;
use glam::{Mat4, Vec3, Vec4};

fn setup() -> (HeadlessBackend, ShaderProgram, Camera, Renderer) {
    let mut backend = HeadlessBackend::new();
    let program = ShaderProgram::link(
        &mut backend,
        &[
            ShaderStage::vertex(FIREBALL_WGSL),
            ShaderStage::fragment(FIREBALL_WGSL),
        ],
    )
    .unwrap();
    let camera = Camera::new(CAMERA_START, CAMERA_TARGET);
    (backend, program, camera, Renderer::default())
}

fn params() -> AnimationParams {
    AnimationParams::from_controls(&Controls::default(), &FIREBALL_INSTANCES[0])
}

fn mat(draw: &DrawCall, name: &str) -> Mat4 {
    match draw.uniform(name) {
        Some(UniformValue::Mat4(m)) => m,
        other => panic!("{name}: expected mat4, got {other:?}"),
    }
}

fn float(draw: &DrawCall, name: &str) -> f32 {
    match draw.uniform(name) {
        Some(UniformValue::Float(v)) => v,
        other => panic!("{name}: expected float, got {other:?}"),
    }
}

#[test]
fn frame_counter_counts_render_calls_not_drawables() {
    let (mut backend, mut program, camera, mut renderer) = setup();
    let mut a = Icosphere::new(Vec3::ZERO, 1.0, 0).unwrap();
    let mut b = Square::new(Vec3::ZERO);
    let mut c = Cube::new(Vec3::ZERO);

    renderer
        .render(&mut backend, &camera, &mut program, &params(), &mut [&mut a, &mut b, &mut c])
        .unwrap();
    assert_eq!(renderer.frame_count(), 1);
    assert_eq!(backend.draws().len(), 3);

    renderer
        .render(&mut backend, &camera, &mut program, &params(), &mut [])
        .unwrap();
    assert_eq!(renderer.frame_count(), 2);
    assert_eq!(backend.draws().len(), 3);
}

#[test]
fn time_uniform_advances_one_sixtieth_per_call() {
    let (mut backend, mut program, camera, mut renderer) = setup();
    let mut sphere = Icosphere::new(Vec3::ZERO, 1.0, 0).unwrap();
    let mut p = params();
    p.time_scale = 2.0;
    for _ in 0..3 {
        renderer
            .render(&mut backend, &camera, &mut program, &p, &mut [&mut sphere])
            .unwrap();
    }
    let times: Vec<f32> = backend.draws().iter().map(|d| float(d, uniforms::TIME)).collect();
    assert_eq!(times[0], 0.0);
    assert!((times[1] - 2.0 / 60.0).abs() < 1e-6);
    assert!((times[2] - 4.0 / 60.0).abs() < 1e-6);
}

#[test]
fn three_instances_via_three_render_calls() {
    let (mut backend, mut program, camera, mut renderer) = setup();
    let mut sphere = Icosphere::new(Vec3::ZERO, 1.0, 1).unwrap();
    let controls = Controls::default();
    renderer.clear(&mut backend);
    for style in &FIREBALL_INSTANCES {
        sphere.model_mut().position = style.position;
        let p = AnimationParams::from_controls(&controls, style);
        renderer
            .render(&mut backend, &camera, &mut program, &p, &mut [&mut sphere])
            .unwrap();
    }

    assert_eq!(renderer.frame_count(), 3);
    let draws = backend.draws();
    assert_eq!(draws.len(), 3);

    let xs: Vec<f32> = draws.iter().map(|d| mat(d, uniforms::MODEL).w_axis.x).collect();
    assert_eq!(xs, vec![-2.5, 0.0, 2.5]);

    // mesh buffers were created once and reused
    assert!(draws.iter().all(|d| d.mesh == draws[0].mesh));
    assert_eq!(backend.live_meshes(), 1);

    let colors: Vec<_> = draws.iter().map(|d| d.uniform(uniforms::COLOR1)).collect();
    assert_eq!(colors[0], Some(UniformValue::Vec3(Vec3::new(0.1, 0.1, 1.0))));
    assert_eq!(colors[2], Some(UniformValue::Vec3(Vec3::new(1.0, 0.1, 0.1))));
    assert_eq!(float(&draws[1], uniforms::BLEND1), 0.5);
    assert_eq!(float(&draws[2], uniforms::BLEND2), 1.0);
}

#[test]
fn matrices_follow_camera_and_model() {
    let (mut backend, mut program, mut camera, mut renderer) = setup();
    camera.set_viewport(800, 600);
    let mut sphere = Icosphere::new(Vec3::ZERO, 1.0, 0).unwrap();
    sphere.model_mut().position = Vec3::new(1.0, 2.0, 3.0);
    renderer
        .render(&mut backend, &camera, &mut program, &params(), &mut [&mut sphere])
        .unwrap();

    let draw = &backend.draws()[0];
    let model = sphere.transform();
    let view = camera.view_matrix();
    assert_eq!(mat(draw, uniforms::VIEW_PROJ), camera.projection_matrix() * view);
    assert_eq!(mat(draw, uniforms::MODEL), model);
    assert_eq!(mat(draw, uniforms::MODEL_VIEW), view * model);
}

#[test]
fn normal_matrix_differs_under_non_uniform_scale() {
    let (mut backend, mut program, camera, mut renderer) = setup();
    let mut sphere = Icosphere::new(Vec3::ZERO, 1.0, 0).unwrap();
    sphere.model_mut().scale = Vec3::new(2.0, 1.0, 1.0);
    renderer
        .render(&mut backend, &camera, &mut program, &params(), &mut [&mut sphere])
        .unwrap();

    let draw = &backend.draws()[0];
    let model = mat(draw, uniforms::MODEL);
    let inv_tr = mat(draw, uniforms::MODEL_INV_TR);
    assert_eq!(inv_tr, model.transpose().inverse());

    let n = Vec4::new(1.0, 1.0, 0.0, 0.0).normalize();
    let by_model = (model * n).truncate().normalize();
    let by_inv_tr = (inv_tr * n).truncate().normalize();
    assert!((by_model - by_inv_tr).length() > 1e-3);
    // x component is squashed, not stretched
    assert!(by_inv_tr.x < by_inv_tr.y);
}

#[test]
fn clear_uses_renderer_color() {
    let (mut backend, _, _, mut renderer) = setup();
    renderer.set_clear_color([0.1, 0.2, 0.3, 1.0]);
    renderer.clear(&mut backend);
    assert_eq!(backend.clear_color(), [0.1, 0.2, 0.3, 1.0]);
    assert_eq!(
        backend.commands().last(),
        Some(&Command::Clear([0.1, 0.2, 0.3, 1.0]))
    );
}

#[test]
fn draw_errors_propagate() {
    let mut backend = HeadlessBackend::new();
    let mut program = ShaderProgram::link(
        &mut backend,
        &[ShaderStage::vertex("v"), ShaderStage::fragment("f")],
    )
    .unwrap();
    let camera = Camera::new(CAMERA_START, CAMERA_TARGET);
    let mut renderer = Renderer::default();
    let mut empty = Model::new(Mesh::default());
    let err = renderer
        .render(&mut backend, &camera, &mut program, &params(), &mut [&mut empty])
        .unwrap_err();
    assert_eq!(err, RenderError::Backend(BackendError::EmptyMesh));
    assert_eq!(renderer.frame_count(), 0);
}
