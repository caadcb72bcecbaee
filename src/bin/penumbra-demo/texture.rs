//! Procedural diffuse and normal maps for the demo scene.

use gl::types::*;

pub struct Texture {
    id: GLuint,
}

impl Texture {
    /// Upload tightly packed RGBA8 pixels, first row at the top of the image.
    pub fn from_rgba(width: u32, height: u32, pixels: &[u8]) -> Self {
        debug_assert_eq!(pixels.len(), (width * height * 4) as usize);
        let mut id = 0;
        unsafe {
            gl::GenTextures(1, &mut id);
            gl::BindTexture(gl::TEXTURE_2D, id);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::LINEAR as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE as GLint);
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                gl::RGBA8 as GLint,
                width as GLsizei,
                height as GLsizei,
                0,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                pixels.as_ptr() as *const _,
            );
            gl::BindTexture(gl::TEXTURE_2D, 0);
        }
        Self { id }
    }

    pub fn bind(&self, unit: i32) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit as GLenum);
            gl::BindTexture(gl::TEXTURE_2D, self.id);
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteTextures(1, &self.id);
        }
    }
}

/// Diffuse and normal map sharing one size.
pub struct Material {
    pub diffuse: Texture,
    pub normals: Texture,
}

impl Material {
    pub fn bind(&self, diffuse_unit: i32, normal_unit: i32) {
        self.normals.bind(normal_unit);
        self.diffuse.bind(diffuse_unit);
    }
}

/// CPU-side surface description: albedo, height and gloss per texel.
pub struct SurfaceImage {
    pub width: u32,
    pub height: u32,
    albedo: Vec<[f32; 3]>,
    heights: Vec<f32>,
    gloss: Vec<f32>,
}

impl SurfaceImage {
    fn new(width: u32, height: u32) -> Self {
        let n = (width * height) as usize;
        Self {
            width,
            height,
            albedo: vec![[0.0; 3]; n],
            heights: vec![0.0; n],
            gloss: vec![0.0; n],
        }
    }

    fn index(&self, x: i32, y: i32) -> usize {
        let x = x.clamp(0, self.width as i32 - 1) as u32;
        let y = y.clamp(0, self.height as i32 - 1) as u32;
        (y * self.width + x) as usize
    }

    pub fn diffuse_pixels(&self) -> Vec<u8> {
        self.albedo
            .iter()
            .flat_map(|c| [to_byte(c[0]), to_byte(c[1]), to_byte(c[2]), 255])
            .collect()
    }

    /// Tangent-space normals from the height field, y-up, gloss in alpha.
    pub fn normal_pixels(&self, strength: f32) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.heights.len() * 4);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let dx = self.heights[self.index(x + 1, y)] - self.heights[self.index(x - 1, y)];
                // Rows run top to bottom, so "up" is the previous row.
                let dy = self.heights[self.index(x, y - 1)] - self.heights[self.index(x, y + 1)];
                let n = glam::Vec3::new(-dx * strength, -dy * strength, 1.0).normalize();
                let gloss = self.gloss[self.index(x, y)];
                out.extend_from_slice(&[
                    to_byte(n.x * 0.5 + 0.5),
                    to_byte(n.y * 0.5 + 0.5),
                    to_byte(n.z * 0.5 + 0.5),
                    to_byte(gloss),
                ]);
            }
        }
        out
    }

    pub fn upload(&self, strength: f32) -> Material {
        Material {
            diffuse: Texture::from_rgba(self.width, self.height, &self.diffuse_pixels()),
            normals: Texture::from_rgba(self.width, self.height, &self.normal_pixels(strength)),
        }
    }
}

fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Cheap integer hash to [0, 1).
fn noise(x: u32, y: u32, seed: u32) -> f32 {
    let mut h = x.wrapping_mul(374_761_393) ^ y.wrapping_mul(668_265_263) ^ seed;
    h = (h ^ (h >> 13)).wrapping_mul(1_274_126_177);
    h ^= h >> 16;
    (h & 0xffff) as f32 / 65536.0
}

pub fn bricks(width: u32, height: u32) -> SurfaceImage {
    const BRICK_W: u32 = 48;
    const BRICK_H: u32 = 20;
    const MORTAR: u32 = 3;
    const BEVEL: f32 = 4.0;

    let mut img = SurfaceImage::new(width, height);
    for y in 0..height {
        let row = y / BRICK_H;
        let shift = if row % 2 == 0 { 0 } else { BRICK_W / 2 };
        for x in 0..width {
            let col = (x + shift) / BRICK_W;
            let bx = (x + shift) % BRICK_W;
            let by = y % BRICK_H;
            let i = (y * width + x) as usize;

            let edge = bx.min(BRICK_W - 1 - bx).min(by).min(BRICK_H - 1 - by);
            if edge < MORTAR {
                let grit = noise(x, y, 7) * 0.08;
                img.albedo[i] = [0.42 + grit, 0.40 + grit, 0.37 + grit];
                img.heights[i] = 0.0;
                img.gloss[i] = 0.05;
            } else {
                let tint = noise(col, row, 1) * 0.2;
                let grain = noise(x, y, 3) * 0.1;
                img.albedo[i] = [0.55 + tint + grain, 0.22 + tint * 0.5 + grain, 0.16 + grain];
                img.heights[i] = ((edge - MORTAR) as f32 / BEVEL).min(1.0) - grain;
                img.gloss[i] = 0.35 + tint;
            }
        }
    }
    img
}

pub fn planks(width: u32, height: u32) -> SurfaceImage {
    const PLANK_W: u32 = 32;

    let mut img = SurfaceImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let plank = x / PLANK_W;
            let px = x % PLANK_W;
            let i = (y * width + x) as usize;

            let seam = px == 0 || px == PLANK_W - 1;
            let phase = noise(plank, 0, 11) * 40.0;
            let ring = ((y as f32 + phase) * 0.15 + (px as f32 * 0.4).sin() * 2.0).sin() * 0.5 + 0.5;
            let tint = noise(plank, 1, 5) * 0.15;

            img.albedo[i] = [
                0.45 + ring * 0.15 + tint,
                0.28 + ring * 0.08 + tint * 0.6,
                0.14 + ring * 0.04,
            ];
            img.heights[i] = if seam { 0.0 } else { 0.6 + ring * 0.2 };
            img.gloss[i] = if seam { 0.0 } else { 0.6 * ring };
        }
    }
    img
}
