//! Custom render callback: a spinning vertex-colored triangle.
//!
//! W toggles wireframe, Esc quits.

use glint_engine::device::{
    BufferId, BufferTarget, BufferUsage, Primitive, ProgramId, UniformLocation, VertexArrayId,
};
use glint_engine::logging::{init_logging, LoggingConfig};
use glint_engine::{Event, EventControl, Graphics, GraphicsConfig, Key};

const VERTEX_SRC: &str = r#"#version 330 core
layout(location = 0) in vec2 a_Position;
layout(location = 1) in vec3 a_Color;

uniform float u_Time;
uniform vec2 u_Resolution;

out vec3 v_Color;

void main() {
    float c = cos(u_Time);
    float s = sin(u_Time);
    vec2 p = mat2(c, s, -s, c) * a_Position;
    p.x *= u_Resolution.y / max(u_Resolution.x, 1.0);
    v_Color = a_Color;
    gl_Position = vec4(p, 0.0, 1.0);
}
"#;

const FRAGMENT_SRC: &str = r#"#version 330 core
in vec3 v_Color;
out vec4 o_Color;

uniform vec3 u_Tint;

void main() {
    o_Color = vec4(v_Color * u_Tint, 1.0);
}
"#;

/// x, y, r, g, b
#[rustfmt::skip]
const TRIANGLE: [f32; 15] = [
     0.0,   0.7,  1.0, 0.2, 0.2,
    -0.6,  -0.45, 0.2, 1.0, 0.2,
     0.6,  -0.45, 0.2, 0.4, 1.0,
];

const FLOATS_PER_VERTEX: i32 = 5;

#[derive(Debug, Clone, Copy)]
struct Scene {
    program: ProgramId,
    vao: VertexArrayId,
    vbo: BufferId,
    u_time: UniformLocation,
    u_resolution: UniformLocation,
    u_tint: UniformLocation,
    wireframe: bool,
}

type Gfx = Graphics<Option<Scene>>;

impl Scene {
    fn new(gfx: &Gfx) -> glint_engine::Result<Self> {
        let program = gfx.link_program(VERTEX_SRC, FRAGMENT_SRC)?;
        let vao = gfx.create_vertex_array()?;
        let vbo = gfx.create_buffer()?;

        gfx.bind_vertex_array(Some(vao));
        gfx.bind_buffer(BufferTarget::Array, Some(vbo));
        gfx.buffer_data_f32(BufferTarget::Array, &TRIANGLE, BufferUsage::StaticDraw);
        gfx.vertex_attrib_f32(0, 2, FLOATS_PER_VERTEX, 0);
        gfx.vertex_attrib_f32(1, 3, FLOATS_PER_VERTEX, 2);
        gfx.bind_vertex_array(None);
        gfx.bind_buffer(BufferTarget::Array, None);

        Ok(Self {
            program,
            vao,
            vbo,
            u_time: gfx.uniform_location(program, "u_Time"),
            u_resolution: gfx.uniform_location(program, "u_Resolution"),
            u_tint: gfx.uniform_location(program, "u_Tint"),
            wireframe: false,
        })
    }

    fn destroy(self, gfx: &Gfx) {
        gfx.delete_buffer(self.vbo);
        gfx.delete_vertex_array(self.vao);
        gfx.delete_program(self.program);
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = GraphicsConfig::new().title("glint custom render");
    let mut gfx = Gfx::new(config, None)?;

    let scene = Scene::new(&gfx)?;
    *gfx.user_data_mut() = Some(scene);

    let mut last_report = 0.0_f64;
    gfx.set_render_fn(move |gfx, _dt| {
        let Some(scene) = *gfx.user_data() else {
            return Ok(());
        };

        let t = gfx.elapsed_time();
        let (w, h) = gfx.window_size();
        let pulse = 0.75 + 0.25 * (t as f32 * 2.0).sin();

        gfx.set_viewport(0, 0, w as i32, h as i32);
        gfx.clear(0.06, 0.06, 0.08, 1.0);
        gfx.set_wireframe(scene.wireframe);

        gfx.use_program(Some(scene.program));
        gfx.set_uniform_f32(scene.u_time, t as f32);
        gfx.set_uniform_vec2(scene.u_resolution, [w as f32, h as f32]);
        gfx.set_uniform_vec3(scene.u_tint, [pulse, pulse, 1.0]);

        gfx.bind_vertex_array(Some(scene.vao));
        gfx.draw_arrays(Primitive::Triangles, 0, 3);
        gfx.bind_vertex_array(None);

        if t - last_report >= 2.0 {
            log::info!("{:.1} fps", gfx.fps());
            last_report = t;
        }
        Ok(())
    });

    gfx.set_event_handler(|gfx, event| match event {
        Event::KeyDown(key) if key.keycode == Key::Escape => {
            gfx.quit();
            EventControl::Handled
        }
        Event::KeyDown(key) if key.keycode == Key::W => {
            if let Some(scene) = gfx.user_data_mut() {
                scene.wireframe = !scene.wireframe;
                log::info!("wireframe {}", if scene.wireframe { "on" } else { "off" });
            }
            EventControl::Handled
        }
        _ => EventControl::Unhandled,
    });

    let result = gfx.run();

    if let Some(scene) = gfx.user_data_mut().take() {
        scene.destroy(&gfx);
    }
    gfx.teardown();

    Ok(result?)
}
