use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Pixel rectangle inside the window, y-up (OpenGL window coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ScreenRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Window size in logical pixels plus the factor to framebuffer pixels
/// (2.0 on most HiDPI displays).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
    pub backbuffer_scale: f32,
}

impl WindowSize {
    pub fn new(width: u32, height: u32, backbuffer_scale: f32) -> Self {
        Self {
            width,
            height,
            backbuffer_scale,
        }
    }

    /// Framebuffer size in pixels, never below 1x1.
    pub fn framebuffer(&self) -> (i32, i32) {
        let w = (self.width as f32 * self.backbuffer_scale).round() as i32;
        let h = (self.height as f32 * self.backbuffer_scale).round() as i32;
        (w.max(1), h.max(1))
    }
}

/// How the world area maps onto the window when it is resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scaling {
    /// Keep the world size and aspect, letterbox or pillarbox the rest.
    #[default]
    Fit,
    /// Keep the aspect by growing the world along the longer screen axis.
    Extend,
    /// Fill the window, distorting the aspect.
    Stretch,
}

/// World area shown on screen and the screen rectangle it is drawn into.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub scaling: Scaling,
    /// World size requested by the caller. `world_size()` may differ under `Extend`.
    pub min_world: Vec2,
    world: Vec2,
    screen: ScreenRect,
}

impl Viewport {
    pub fn new(scaling: Scaling, world_width: f32, world_height: f32) -> Self {
        let world = Vec2::new(world_width, world_height);
        Self {
            scaling,
            min_world: world,
            world,
            screen: ScreenRect::default(),
        }
    }

    /// Recompute the screen rectangle (and world size for `Extend`) for a window of
    /// `screen_width` x `screen_height` pixels.
    pub fn update(&mut self, screen_width: i32, screen_height: i32) {
        let sw = screen_width as f32;
        let sh = screen_height as f32;
        match self.scaling {
            Scaling::Fit => {
                let scale = (sw / self.min_world.x).min(sh / self.min_world.y);
                let w = (self.min_world.x * scale).round() as i32;
                let h = (self.min_world.y * scale).round() as i32;
                self.world = self.min_world;
                self.screen = ScreenRect::new(
                    (screen_width - w) / 2,
                    (screen_height - h) / 2,
                    w,
                    h,
                );
            }
            Scaling::Extend => {
                let scale = (sw / self.min_world.x).min(sh / self.min_world.y);
                self.world = Vec2::new(sw / scale, sh / scale);
                self.screen = ScreenRect::new(0, 0, screen_width, screen_height);
            }
            Scaling::Stretch => {
                self.world = self.min_world;
                self.screen = ScreenRect::new(0, 0, screen_width, screen_height);
            }
        }
    }

    pub fn world_size(&self) -> Vec2 {
        self.world
    }

    pub fn screen(&self) -> ScreenRect {
        self.screen
    }
}

/// Orthographic 2D camera looking down -Z at the world plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera2d {
    pub position: Vec2,
    pub zoom: f32,
    /// World units covered by the camera at zoom 1.
    pub viewport_size: Vec2,
}

impl Camera2d {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            position: Vec2::new(viewport_width / 2.0, viewport_height / 2.0),
            zoom: 1.0,
            viewport_size: Vec2::new(viewport_width, viewport_height),
        }
    }

    /// Match the camera to the viewport's world size after a resize.
    pub fn fit_to(&mut self, viewport: &Viewport) {
        self.viewport_size = viewport.world_size();
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(-self.position.extend(0.0))
    }

    pub fn projection_matrix(&self) -> Mat4 {
        let half = self.viewport_size * self.zoom / 2.0;
        Mat4::orthographic_rh_gl(-half.x, half.x, -half.y, half.y, -1.0, 1.0)
    }

    /// Projection * view, the matrix sprites and shadow geometry are drawn with.
    pub fn combined(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World point to window pixels (y-up) inside `viewport`'s screen rectangle.
    pub fn project(&self, world: Vec2, viewport: &Viewport) -> Vec2 {
        let ndc = self.combined().project_point3(world.extend(0.0));
        let rect = viewport.screen();
        rect.offset() + (Vec2::new(ndc.x, ndc.y) + Vec2::ONE) / 2.0 * rect.size()
    }

    /// Window pixels (y-up) back to the world plane.
    pub fn unproject(&self, screen: Vec2, viewport: &Viewport) -> Vec2 {
        let rect = viewport.screen();
        let ndc = (screen - rect.offset()) / rect.size() * 2.0 - Vec2::ONE;
        let world = self
            .combined()
            .inverse()
            .project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        Vec2::new(world.x, world.y)
    }
}
