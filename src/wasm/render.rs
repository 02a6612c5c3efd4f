use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Vec2};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{
    window, HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram,
    WebGlShader, WebGlUniformLocation, WebGlVertexArrayObject,
};

use super::dom::{self, js_err, DomPresenter};
use crate::app::{FrameUpdate, LineUpdate, Sketch};
use crate::config::SketchConfig;
use crate::error::SketchError;
use crate::geometry::{GeometryAllocator, GeometryBuffer, LineSlot};

const VERTEX_SRC: &str = r#"#version 300 es
in vec3 a_pos;
uniform mat4 u_mvp;
uniform float u_point_size;
void main() {
    gl_Position = u_mvp * vec4(a_pos, 1.0);
    gl_PointSize = u_point_size;
}
"#;

const FRAGMENT_SRC: &str = r#"#version 300 es
precision mediump float;
uniform vec4 u_color;
uniform bool u_round;
out vec4 frag;
void main() {
    if (u_round && length(gl_PointCoord - vec2(0.5)) > 0.5) discard;
    frag = u_color;
}
"#;

const CLEAR: [f32; 3] = [5.0 / 255.0, 5.0 / 255.0, 5.0 / 255.0];
const PATH_COLOR: [f32; 4] = [
    0x3b as f32 / 255.0,
    0x82 as f32 / 255.0,
    0xf6 as f32 / 255.0,
    1.0,
];
const SHAPE_COLOR: [f32; 4] = [
    0xaa as f32 / 255.0,
    0xaa as f32 / 255.0,
    0xaa as f32 / 255.0,
    0.75,
];
const DOT_RADIUS: f32 = 0.1;

/// A vertex array plus its backing buffer. Both are deleted on drop.
pub struct GlLineBuffer {
    gl: GL,
    vao: WebGlVertexArrayObject,
    buffer: WebGlBuffer,
    count: usize,
}

impl GeometryBuffer for GlLineBuffer {
    fn vertex_count(&self) -> usize {
        self.count
    }

    fn write(&mut self, positions: &[f32]) -> Result<(), SketchError> {
        if positions.len() != self.count * 3 {
            return Err(SketchError::Gpu("vertex count changed".into()));
        }
        let data = js_sys::Float32Array::from(positions);
        self.gl.bind_buffer(GL::ARRAY_BUFFER, Some(&self.buffer));
        self.gl
            .buffer_sub_data_with_i32_and_array_buffer_view(GL::ARRAY_BUFFER, 0, &data);
        Ok(())
    }
}

impl Drop for GlLineBuffer {
    fn drop(&mut self) {
        self.gl.delete_vertex_array(Some(&self.vao));
        self.gl.delete_buffer(Some(&self.buffer));
    }
}

pub struct GlAllocator {
    gl: GL,
    position_attrib: u32,
}

impl GeometryAllocator for GlAllocator {
    type Buffer = GlLineBuffer;

    fn allocate(&self, positions: &[f32]) -> Result<GlLineBuffer, SketchError> {
        let gl = &self.gl;
        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| SketchError::Gpu("create_vertex_array".into()))?;
        let Some(buffer) = gl.create_buffer() else {
            gl.delete_vertex_array(Some(&vao));
            return Err(SketchError::Gpu("create_buffer".into()));
        };

        gl.bind_vertex_array(Some(&vao));
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        let data = js_sys::Float32Array::from(positions);
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &data, GL::DYNAMIC_DRAW);
        gl.enable_vertex_attrib_array(self.position_attrib);
        gl.vertex_attrib_pointer_with_i32(self.position_attrib, 3, GL::FLOAT, false, 0, 0);
        gl.bind_vertex_array(None);

        Ok(GlLineBuffer {
            gl: gl.clone(),
            vao,
            buffer,
            count: positions.len() / 3,
        })
    }
}

fn compile(gl: &GL, kind: u32, src: &str) -> Result<WebGlShader, SketchError> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| SketchError::Shader("create_shader".into()))?;
    gl.shader_source(&shader, src);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(SketchError::Shader(log))
    }
}

fn link(gl: &GL) -> Result<WebGlProgram, SketchError> {
    let vs = compile(gl, GL::VERTEX_SHADER, VERTEX_SRC)?;
    let fs = compile(gl, GL::FRAGMENT_SHADER, FRAGMENT_SRC)?;
    let program = gl
        .create_program()
        .ok_or_else(|| SketchError::Shader("create_program".into()))?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);
    gl.delete_shader(Some(&vs));
    gl.delete_shader(Some(&fs));
    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(SketchError::Shader(log))
    }
}

pub struct Renderer {
    gl: GL,
    program: WebGlProgram,
    u_mvp: Option<WebGlUniformLocation>,
    u_color: Option<WebGlUniformLocation>,
    u_point_size: Option<WebGlUniformLocation>,
    u_round: Option<WebGlUniformLocation>,
    allocator: GlAllocator,
    path: LineSlot<GlLineBuffer>,
    shape: LineSlot<GlLineBuffer>,
    dot: LineSlot<GlLineBuffer>,
    viewport: Vec2,
}

impl Renderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, SketchError> {
        let gl: GL = canvas
            .get_context("webgl2")
            .map_err(js_err)?
            .ok_or(SketchError::NoWebGl)?
            .dyn_into()
            .map_err(|_| SketchError::NoWebGl)?;

        let program = link(&gl)?;
        let position_attrib = gl.get_attrib_location(&program, "a_pos");
        if position_attrib < 0 {
            return Err(SketchError::Shader("a_pos not found".into()));
        }
        let allocator = GlAllocator {
            gl: gl.clone(),
            position_attrib: position_attrib as u32,
        };

        let mut dot = LineSlot::new();
        dot.replace(&allocator, &[0.0, 0.0, 0.0])?;

        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);
        gl.clear_color(CLEAR[0], CLEAR[1], CLEAR[2], 1.0);

        Ok(Self {
            u_mvp: gl.get_uniform_location(&program, "u_mvp"),
            u_color: gl.get_uniform_location(&program, "u_color"),
            u_point_size: gl.get_uniform_location(&program, "u_point_size"),
            u_round: gl.get_uniform_location(&program, "u_round"),
            gl,
            program,
            allocator,
            path: LineSlot::new(),
            shape: LineSlot::new(),
            dot,
            viewport: Vec2::ONE,
        })
    }

    pub fn resize(&mut self, canvas: &HtmlCanvasElement, viewport: Vec2) {
        canvas.set_width(viewport.x as u32);
        canvas.set_height(viewport.y as u32);
        self.gl.viewport(0, 0, viewport.x as i32, viewport.y as i32);
        self.viewport = viewport;
    }

    pub fn draw(&mut self, frame: &FrameUpdate, dot_pixels: f32) -> Result<(), SketchError> {
        match &frame.path {
            LineUpdate::Keep => {}
            LineUpdate::Clear => self.path.clear(),
            LineUpdate::Rebuild(verts) => self.path.replace(&self.allocator, verts)?,
        }
        match &frame.shape {
            Some(verts) => self.shape.upload(&self.allocator, verts)?,
            None => self.shape.clear(),
        }

        let gl = &self.gl;
        gl.clear(GL::COLOR_BUFFER_BIT);
        gl.use_program(Some(&self.program));

        self.draw_slot(&self.dot, GL::POINTS, frame.view_proj, [1.0; 4], dot_pixels);
        self.draw_slot(&self.path, GL::LINE_STRIP, frame.view_proj, PATH_COLOR, 1.0);
        self.draw_slot(
            &self.shape,
            GL::LINES,
            frame.view_proj * frame.shape_model,
            SHAPE_COLOR,
            1.0,
        );
        gl.bind_vertex_array(None);
        Ok(())
    }

    fn draw_slot(
        &self,
        slot: &LineSlot<GlLineBuffer>,
        mode: u32,
        mvp: Mat4,
        color: [f32; 4],
        point: f32,
    ) {
        let Some(buf) = slot.get() else { return };
        let gl = &self.gl;
        gl.uniform_matrix4fv_with_f32_array(self.u_mvp.as_ref(), false, &mvp.to_cols_array());
        gl.uniform4fv_with_f32_array(self.u_color.as_ref(), &color);
        gl.uniform1f(self.u_point_size.as_ref(), point);
        gl.uniform1i(self.u_round.as_ref(), (mode == GL::POINTS) as i32);
        gl.bind_vertex_array(Some(&buf.vao));
        gl.draw_arrays(mode, 0, buf.count as i32);
    }
}

/// On-screen diameter of the origin dot for the current camera.
fn dot_pixels(sketch: &Sketch, viewport: Vec2) -> f32 {
    let fov = sketch.camera().fov_y_deg.to_radians();
    let distance = sketch.orbit().distance.max(1e-3);
    2.0 * DOT_RADIUS * viewport.y / (2.0 * (fov * 0.5).tan() * distance)
}

/// Wires events, prompt timers and the animation loop. Runs until the page
/// goes away.
pub fn start(canvas: HtmlCanvasElement, config: SketchConfig) -> Result<(), SketchError> {
    let win = window().ok_or(SketchError::Js("no window".into()))?;
    let document = win.document().ok_or(SketchError::Js("no document".into()))?;
    let viewport = dom::viewport(&win);

    let mut renderer = Renderer::new(&canvas)?;
    renderer.resize(&canvas, viewport);
    let renderer = Rc::new(RefCell::new(renderer));

    let presenter = Rc::new(RefCell::new(DomPresenter::attach(&document)));
    let schedule = config.prompts.schedule(presenter.borrow().prompt_count());
    let sketch = Rc::new(RefCell::new(Sketch::new(config, viewport)));

    for event in schedule.events() {
        let sketch = sketch.clone();
        let presenter = presenter.clone();
        dom::after_ms(&win, event.at_ms, move || {
            sketch
                .borrow_mut()
                .apply_prompt(event.action, &mut *presenter.borrow_mut());
        })?;
    }

    {
        let sketch = sketch.clone();
        let presenter = presenter.clone();
        dom::listen(&document, "mousemove", move |e: web_sys::MouseEvent| {
            let client = Vec2::new(e.client_x() as f32, e.client_y() as f32);
            sketch
                .borrow_mut()
                .pointer_move(client, &mut *presenter.borrow_mut());
        })?;
    }
    {
        let sketch = sketch.clone();
        dom::listen(&canvas, "mousedown", move |e: web_sys::MouseEvent| {
            sketch
                .borrow_mut()
                .pointer_down(Vec2::new(e.client_x() as f32, e.client_y() as f32));
        })?;
    }
    {
        let sketch = sketch.clone();
        dom::listen(&win, "mouseup", move |_: web_sys::MouseEvent| {
            sketch.borrow_mut().pointer_up();
        })?;
    }
    {
        let sketch = sketch.clone();
        dom::listen(&canvas, "wheel", move |e: web_sys::WheelEvent| {
            sketch.borrow_mut().wheel(e.delta_y() as f32);
        })?;
    }
    {
        let sketch = sketch.clone();
        let renderer = renderer.clone();
        let canvas = canvas.clone();
        let resize_win = win.clone();
        dom::listen(&win, "resize", move |_: web_sys::Event| {
            let vp = dom::viewport(&resize_win);
            sketch.borrow_mut().resize(vp);
            renderer.borrow_mut().resize(&canvas, vp);
        })?;
    }

    // The frame closure reschedules itself through `f`.
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let performance = win.performance();
    let loop_win = win.clone();
    *g.borrow_mut() = Some(Closure::new(move || {
        let now = performance.as_ref().map(|p| p.now()).unwrap_or(0.0);
        let (frame, px) = {
            let mut sketch = sketch.borrow_mut();
            let frame = sketch.tick(now, &mut *presenter.borrow_mut());
            let px = dot_pixels(&sketch, renderer.borrow().viewport);
            (frame, px)
        };
        if let Err(err) = renderer.borrow_mut().draw(&frame, px) {
            log::error!("draw failed: {err}");
        }

        if let Some(next) = f.borrow().as_ref() {
            if let Err(err) = loop_win.request_animation_frame(next.as_ref().unchecked_ref()) {
                log::error!("request_animation_frame failed: {err:?}");
            }
        }
    }));

    if let Some(first) = g.borrow().as_ref() {
        win.request_animation_frame(first.as_ref().unchecked_ref())
            .map_err(js_err)?;
    }
    Ok(())
}
