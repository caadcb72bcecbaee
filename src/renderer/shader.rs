use gl::types::*;
use glam::{Mat4, Vec2, Vec3, Vec4};
use std::collections::HashMap;
use std::ffi::CString;
use std::ptr;

use crate::error::{LightError, Result};

pub struct ShaderProgram {
    pub id: GLuint,
    uniform_cache: HashMap<String, GLint>,
}

impl ShaderProgram {
    pub fn from_sources(vert_src: &str, frag_src: &str) -> Result<Self> {
        unsafe {
            let vert = compile_shader(vert_src, gl::VERTEX_SHADER)?;
            let frag = match compile_shader(frag_src, gl::FRAGMENT_SHADER) {
                Ok(frag) => frag,
                Err(e) => {
                    gl::DeleteShader(vert);
                    return Err(e);
                }
            };

            let program = gl::CreateProgram();
            gl::AttachShader(program, vert);
            gl::AttachShader(program, frag);
            gl::LinkProgram(program);

            let mut success = 0;
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
            if success == 0 {
                let mut len = 0;
                gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
                let mut buf = vec![0u8; len.max(1) as usize];
                gl::GetProgramInfoLog(program, len, ptr::null_mut(), buf.as_mut_ptr() as *mut _);
                buf.pop(); // remove null terminator
                let log = String::from_utf8_lossy(&buf).to_string();
                gl::DeleteProgram(program);
                gl::DeleteShader(vert);
                gl::DeleteShader(frag);
                return Err(LightError::ShaderLink { log });
            }

            gl::DeleteShader(vert);
            gl::DeleteShader(frag);

            Ok(Self {
                id: program,
                uniform_cache: HashMap::new(),
            })
        }
    }

    pub fn bind(&self) {
        unsafe {
            gl::UseProgram(self.id);
        }
    }

    pub fn unbind(&self) {
        unsafe {
            gl::UseProgram(0);
        }
    }

    /// -1 (silently ignored by GL) for names the program does not use.
    fn get_uniform_location(&mut self, name: &str) -> GLint {
        if let Some(&loc) = self.uniform_cache.get(name) {
            return loc;
        }
        let loc = match CString::new(name) {
            Ok(cname) => unsafe { gl::GetUniformLocation(self.id, cname.as_ptr()) },
            Err(e) => {
                log::warn!("uniform name {name:?} is not a C string: {e}");
                -1
            }
        };
        self.uniform_cache.insert(name.to_string(), loc);
        loc
    }

    pub fn set_mat4(&mut self, name: &str, mat: &Mat4) {
        let loc = self.get_uniform_location(name);
        unsafe {
            gl::UniformMatrix4fv(loc, 1, gl::FALSE, mat.to_cols_array().as_ptr());
        }
    }

    pub fn set_vec2(&mut self, name: &str, v: Vec2) {
        let loc = self.get_uniform_location(name);
        unsafe {
            gl::Uniform2f(loc, v.x, v.y);
        }
    }

    pub fn set_vec3(&mut self, name: &str, v: Vec3) {
        let loc = self.get_uniform_location(name);
        unsafe {
            gl::Uniform3f(loc, v.x, v.y, v.z);
        }
    }

    pub fn set_vec4(&mut self, name: &str, v: Vec4) {
        let loc = self.get_uniform_location(name);
        unsafe {
            gl::Uniform4f(loc, v.x, v.y, v.z, v.w);
        }
    }

    pub fn set_float(&mut self, name: &str, val: f32) {
        let loc = self.get_uniform_location(name);
        unsafe {
            gl::Uniform1f(loc, val);
        }
    }

    pub fn set_int(&mut self, name: &str, val: i32) {
        let loc = self.get_uniform_location(name);
        unsafe {
            gl::Uniform1i(loc, val);
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteProgram(self.id);
        }
    }
}

unsafe fn compile_shader(src: &str, shader_type: GLenum) -> Result<GLuint> {
    let c_src = CString::new(src)?;
    let shader = gl::CreateShader(shader_type);
    gl::ShaderSource(shader, 1, &c_src.as_ptr(), ptr::null());
    gl::CompileShader(shader);

    let mut success = 0;
    gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
    if success == 0 {
        let mut len = 0;
        gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
        let mut buf = vec![0u8; len.max(1) as usize];
        gl::GetShaderInfoLog(shader, len, ptr::null_mut(), buf.as_mut_ptr() as *mut _);
        buf.pop();
        let stage = if shader_type == gl::VERTEX_SHADER {
            "vertex"
        } else {
            "fragment"
        };
        let log = String::from_utf8_lossy(&buf).to_string();
        gl::DeleteShader(shader);
        return Err(LightError::ShaderCompile { stage, log });
    }
    Ok(shader)
}
