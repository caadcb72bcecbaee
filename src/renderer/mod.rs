//! Shader upload surface consumed by the light engine, with the OpenGL
//! implementation and a headless recorder.

pub mod shader;

use std::collections::HashMap;

use glam::{Mat4, Vec2, Vec3, Vec4};
use shader::ShaderProgram;

use crate::camera::ScreenRect;
use crate::color::Color;
use crate::error::Result;

const VERT_SRC: &str = include_str!("../../shaders/light.vert");
const FRAG_SRC: &str = include_str!("../../shaders/light.frag");

/// Where the engine sends render-target state and uniform values.
///
/// Uniform setters assume the program is bound; the engine binds before every
/// batch of uploads.
pub trait UniformSurface {
    fn apply_viewport(&mut self, rect: ScreenRect);
    fn clear(&mut self);

    fn bind(&mut self);
    fn unbind(&mut self);

    fn set_int(&mut self, name: &str, value: i32);
    fn set_float(&mut self, name: &str, value: f32);
    fn set_vec2(&mut self, name: &str, value: Vec2);
    fn set_vec3(&mut self, name: &str, value: Vec3);
    fn set_vec4(&mut self, name: &str, value: Vec4);
    fn set_mat4(&mut self, name: &str, value: &Mat4);
}

impl<T: UniformSurface + ?Sized> UniformSurface for &mut T {
    fn apply_viewport(&mut self, rect: ScreenRect) {
        (**self).apply_viewport(rect)
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn bind(&mut self) {
        (**self).bind()
    }

    fn unbind(&mut self) {
        (**self).unbind()
    }

    fn set_int(&mut self, name: &str, value: i32) {
        (**self).set_int(name, value)
    }

    fn set_float(&mut self, name: &str, value: f32) {
        (**self).set_float(name, value)
    }

    fn set_vec2(&mut self, name: &str, value: Vec2) {
        (**self).set_vec2(name, value)
    }

    fn set_vec3(&mut self, name: &str, value: Vec3) {
        (**self).set_vec3(name, value)
    }

    fn set_vec4(&mut self, name: &str, value: Vec4) {
        (**self).set_vec4(name, value)
    }

    fn set_mat4(&mut self, name: &str, value: &Mat4) {
        (**self).set_mat4(name, value)
    }
}

/// The normal-mapped lighting program on the current GL context.
pub struct GlLightShader {
    program: ShaderProgram,
    clear_color: Color,
}

impl GlLightShader {
    /// Compile the bundled `light.vert` / `light.frag` pair.
    pub fn compile() -> Result<Self> {
        Self::from_sources(VERT_SRC, FRAG_SRC)
    }

    pub fn from_sources(vert_src: &str, frag_src: &str) -> Result<Self> {
        let program = ShaderProgram::from_sources(vert_src, frag_src)?;
        unsafe {
            gl::Enable(gl::BLEND);
            gl::BlendFunc(gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA);
        }
        Ok(Self {
            program,
            clear_color: Color::BLACK,
        })
    }

    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }
}

impl UniformSurface for GlLightShader {
    fn apply_viewport(&mut self, rect: ScreenRect) {
        unsafe {
            gl::Viewport(rect.x, rect.y, rect.width, rect.height);
        }
    }

    fn clear(&mut self) {
        let c = self.clear_color;
        unsafe {
            gl::ClearColor(c.r, c.g, c.b, c.a);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
    }

    fn bind(&mut self) {
        self.program.bind();
    }

    fn unbind(&mut self) {
        self.program.unbind();
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.program.set_int(name, value);
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.program.set_float(name, value);
    }

    fn set_vec2(&mut self, name: &str, value: Vec2) {
        self.program.set_vec2(name, value);
    }

    fn set_vec3(&mut self, name: &str, value: Vec3) {
        self.program.set_vec3(name, value);
    }

    fn set_vec4(&mut self, name: &str, value: Vec4) {
        self.program.set_vec4(name, value);
    }

    fn set_mat4(&mut self, name: &str, value: &Mat4) {
        self.program.set_mat4(name, value);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    ApplyViewport(ScreenRect),
    Clear,
    Bind,
    Unbind,
    Uniform(String),
}

/// Headless [`UniformSurface`]: keeps the last value written to every
/// uniform and a log of calls in order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    values: HashMap<String, UniformValue>,
    calls: Vec<SurfaceCall>,
    bound: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.values.get(name).copied()
    }

    pub fn int(&self, name: &str) -> Option<i32> {
        match self.get(name) {
            Some(UniformValue::Int(v)) => Some(v),
            _ => None,
        }
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    fn record(&mut self, name: &str, value: UniformValue) {
        self.values.insert(name.to_string(), value);
        self.calls.push(SurfaceCall::Uniform(name.to_string()));
    }
}

impl UniformSurface for RecordingSurface {
    fn apply_viewport(&mut self, rect: ScreenRect) {
        self.calls.push(SurfaceCall::ApplyViewport(rect));
    }

    fn clear(&mut self) {
        self.calls.push(SurfaceCall::Clear);
    }

    fn bind(&mut self) {
        self.bound = true;
        self.calls.push(SurfaceCall::Bind);
    }

    fn unbind(&mut self) {
        self.bound = false;
        self.calls.push(SurfaceCall::Unbind);
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.record(name, UniformValue::Int(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.record(name, UniformValue::Float(value));
    }

    fn set_vec2(&mut self, name: &str, value: Vec2) {
        self.record(name, UniformValue::Vec2(value));
    }

    fn set_vec3(&mut self, name: &str, value: Vec3) {
        self.record(name, UniformValue::Vec3(value));
    }

    fn set_vec4(&mut self, name: &str, value: Vec4) {
        self.record(name, UniformValue::Vec4(value));
    }

    fn set_mat4(&mut self, name: &str, value: &Mat4) {
        self.record(name, UniformValue::Mat4(*value));
    }
}
