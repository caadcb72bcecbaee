use sdl2::video::{GLContext, GLProfile, Window};
use sdl2::Sdl;

use crate::DemoError;

pub struct DemoWindow {
    _gl_context: GLContext,
    window: Window,
}

impl DemoWindow {
    pub fn new(sdl: &Sdl, title: &str, width: u32, height: u32) -> Result<Self, DemoError> {
        let video = sdl.video().map_err(DemoError::Sdl)?;

        let gl_attr = video.gl_attr();
        gl_attr.set_context_profile(GLProfile::Core);
        gl_attr.set_context_version(3, 3);

        let window = video
            .window(title, width, height)
            .opengl()
            .resizable()
            .allow_highdpi()
            .position_centered()
            .build()?;

        let gl_context = window.gl_create_context().map_err(DemoError::Sdl)?;
        gl::load_with(|s| video.gl_get_proc_address(s) as *const _);

        Ok(Self {
            _gl_context: gl_context,
            window,
        })
    }

    pub fn swap(&self) {
        self.window.gl_swap_window();
    }

    /// Logical size in window coordinates.
    pub fn size(&self) -> (u32, u32) {
        self.window.size()
    }

    /// Framebuffer pixels per logical pixel; above 1 on HiDPI displays.
    pub fn backbuffer_scale(&self) -> f32 {
        let (w, _) = self.window.size();
        let (dw, _) = self.window.drawable_size();
        if w == 0 {
            1.0
        } else {
            dw as f32 / w as f32
        }
    }
}
