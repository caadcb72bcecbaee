use std::time::Instant;

use glam::Vec2;
use hecs::World;
use penumbra::uniforms::{DIFFUSE_UNIT, NORMAL_UNIT};
use penumbra::{
    Camera2d, Color, DirectionalLight, EngineConfig, GlLightShader, Light, LightEngine, LightId,
    PointLight, Scaling, ShadowLightTable, SpotLight, UniformSurface, Viewport, WindowSize,
};
use sdl2::keyboard::Scancode;
use sdl2::Sdl;

use crate::input::InputState;
use crate::mesh::{create_quad, Mesh};
use crate::scene::{load_demo_scene, sorted_sprites, WORLD_HEIGHT, WORLD_WIDTH};
use crate::texture::{self, Material};
use crate::window::DemoWindow;
use crate::DemoError;

const LIGHT_INTENSITY_SPEED: f32 = 2.5;
const LIGHT_DISTANCE_SPEED: f32 = 2.5;
const LIGHT_MULTIPLIER_SPEED: f32 = 2.5;
const SPOT_CONE_ANGLE_SPEED: f32 = 15.0;
const SPOT_ROTATION_SPEED: f32 = 55.0;
const DIRECTIONAL_INTENSITY_SPEED: f32 = 2.5;
const DIRECTIONAL_ANGLE_SPEED: f32 = 15.0;
const SPECULAR_SPEED: f32 = 20.0;
const HUE_SCROLL_DEGREES: f32 = 5.0;
const NORMAL_INFLUENCE: f32 = 0.8;
/// Longest frame step fed to the hold-to-adjust controls, in seconds.
const MAX_FRAME_STEP: f32 = 0.1;

type DemoEngine = LightEngine<GlLightShader, ShadowLightTable>;

/// A light that can be taken out of the engine and put back.
struct Switchable {
    id: Option<LightId>,
    parked: Option<Light>,
}

impl Switchable {
    fn active(id: LightId) -> Self {
        Self {
            id: Some(id),
            parked: None,
        }
    }

    fn is_on(&self) -> bool {
        self.id.is_some()
    }

    fn turn_off(&mut self, engine: &mut DemoEngine) {
        if let Some(id) = self.id.take() {
            self.parked = engine.remove_light(id);
        }
    }

    fn turn_on(&mut self, engine: &mut DemoEngine) {
        if let Some(light) = self.parked.take() {
            self.id = Some(engine.add_light(light));
        }
    }

    fn toggle(&mut self, engine: &mut DemoEngine) {
        if self.is_on() {
            self.turn_off(engine);
        } else {
            self.turn_on(engine);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Active {
    Point,
    Spot,
}

pub struct LightDemo {
    world: World,
    materials: Vec<Material>,
    quad: Mesh,
    engine: DemoEngine,
    sun: Switchable,
    lamp: Switchable,
    spot: Switchable,
    active: Active,
    normals_enabled: bool,
}

impl LightDemo {
    pub fn new(window: &DemoWindow, config: EngineConfig) -> Result<Self, DemoError> {
        let shader = GlLightShader::compile()?.with_clear_color(config.clear_color);

        let (w, h) = window.size();
        let mut engine = LightEngine::new(
            shader,
            ShadowLightTable::new(),
            Camera2d::new(WORLD_WIDTH, WORLD_HEIGHT),
            Viewport::new(Scaling::Extend, WORLD_WIDTH, WORLD_HEIGHT),
            config,
            WindowSize::new(w, h, window.backbuffer_scale()),
        );
        engine.set_specular_remap(0.3, 0.7);
        engine.set_normal_influence(NORMAL_INFLUENCE);

        let sun = engine.add_directional_light(
            DirectionalLight::new(Color::new(0.8, 0.8, 1.0, 0.45), -45.0, 2.8).with_elevation(40.0),
        );
        let lamp = engine.add_point_light(
            PointLight::new(Vec2::new(6.0, 6.0), Color::new(1.0, 0.5, 0.2, 1.0), 2.0, 7.0)
                .with_falloff_profile(1.0)
                .with_shader_intensity_multiplier(1.0),
        );
        let spot = engine.add_spot_light(
            SpotLight::new(Vec2::new(6.0, 5.0), Color::new(0.2, 0.5, 1.0, 1.0), 0.0, 75.0, 4.0, 10.0)
                .with_falloff_profile(0.5)
                .with_shader_intensity_multiplier(2.0),
        );

        let mut spot = Switchable::active(spot);
        spot.turn_off(&mut engine);

        let mut world = World::new();
        load_demo_scene(&mut world);

        let materials = vec![
            texture::bricks(512, 256).upload(6.0),
            texture::planks(256, 512).upload(4.0),
        ];

        Ok(Self {
            world,
            materials,
            quad: create_quad(),
            engine,
            sun: Switchable::active(sun),
            lamp: Switchable::active(lamp),
            spot,
            active: Active::Point,
            normals_enabled: true,
        })
    }

    pub fn run(mut self, sdl: &Sdl, window: &DemoWindow) -> Result<(), DemoError> {
        let mut event_pump = sdl.event_pump().map_err(DemoError::Sdl)?;
        let mut input = InputState::new();
        let mut last_frame = Instant::now();

        log::info!("controls: 1/2 switch light, BACKSPACE sun, SPACE diffuse shadows, N normals");

        loop {
            let now = Instant::now();
            let dt = now.duration_since(last_frame).as_secs_f32().min(MAX_FRAME_STEP);
            last_frame = now;

            input.update(&mut event_pump);
            if input.quit {
                break;
            }

            if let Some((w, h)) = input.resized {
                self.engine.resize(w, h, window.backbuffer_scale());
            }

            self.handle_input(&input, window, dt);
            self.engine.update();
            self.render();

            window.swap();
        }

        self.engine.dispose();
        Ok(())
    }

    fn handle_input(&mut self, input: &InputState, window: &DemoWindow, dt: f32) {
        self.follow_cursor(input, window);
        self.handle_switching(input);
        self.handle_global_controls(input, dt);
        self.handle_active_light_controls(input, dt);
        self.handle_color_change(input);
    }

    fn active_id(&self) -> Option<LightId> {
        match self.active {
            Active::Point => self.lamp.id,
            Active::Spot => self.spot.id,
        }
    }

    fn follow_cursor(&mut self, input: &InputState, window: &DemoWindow) {
        let Some(id) = self.active_id() else {
            return;
        };
        let (_, h) = window.size();
        let scale = window.backbuffer_scale();
        // SDL reports y-down logical coordinates; the viewport is y-up framebuffer pixels.
        let screen = Vec2::new(input.mouse.x, h as f32 - input.mouse.y) * scale;
        let target = self.engine.camera().unproject(screen, self.engine.viewport());
        if let Some(light) = self.engine.light_mut(id) {
            light.set_position(target);
        }
    }

    fn handle_switching(&mut self, input: &InputState) {
        if input.was_key_pressed(Scancode::Num1) && self.active != Active::Point {
            self.spot.turn_off(&mut self.engine);
            self.lamp.turn_on(&mut self.engine);
            self.active = Active::Point;
            log::info!("active light: point");
        }
        if input.was_key_pressed(Scancode::Num2) && self.active != Active::Spot {
            self.lamp.turn_off(&mut self.engine);
            self.spot.turn_on(&mut self.engine);
            self.active = Active::Spot;
            log::info!("active light: spot");
        }
    }

    fn handle_global_controls(&mut self, input: &InputState, dt: f32) {
        if input.was_key_pressed(Scancode::Backspace) {
            self.sun.toggle(&mut self.engine);
            log::info!("directional light {}", if self.sun.is_on() { "on" } else { "off" });
        }
        if input.was_key_pressed(Scancode::Space) {
            let diffuse = !self.engine.config().diffuse_shadows;
            self.engine.set_diffuse_shadows(diffuse);
            log::info!("diffuse shadows: {diffuse}");
        }
        if input.was_key_pressed(Scancode::N) {
            self.normals_enabled = !self.normals_enabled;
            let influence = if self.normals_enabled { NORMAL_INFLUENCE } else { 0.0 };
            self.engine.set_normal_influence(influence);
        }

        let specular = input.axis(Scancode::Y, Scancode::H);
        if specular != 0.0 {
            let current = self.engine.config().shading.specular_intensity;
            self.engine
                .set_specular_intensity((current + specular * SPECULAR_SPEED * dt).max(1.0));
        }

        let Some(id) = self.sun.id else {
            return;
        };
        let Some(sun) = self.engine.light_mut(id).and_then(Light::as_directional_mut) else {
            return;
        };
        let intensity = input.axis(Scancode::I, Scancode::K);
        let angle = input.axis(Scancode::O, Scancode::L);
        sun.set_intensity(sun.intensity() + intensity * DIRECTIONAL_INTENSITY_SPEED * dt);
        sun.set_direction(sun.direction() + angle * DIRECTIONAL_ANGLE_SPEED * dt);
    }

    fn handle_active_light_controls(&mut self, input: &InputState, dt: f32) {
        let Some(id) = self.active_id() else {
            return;
        };
        let Some(light) = self.engine.light_mut(id) else {
            return;
        };

        let intensity = input.axis(Scancode::Q, Scancode::A) * LIGHT_INTENSITY_SPEED * dt;
        let distance = input.axis(Scancode::W, Scancode::S) * LIGHT_DISTANCE_SPEED * dt;
        let multiplier = input.axis(Scancode::E, Scancode::D) * LIGHT_MULTIPLIER_SPEED * dt;

        match light {
            Light::Point(p) => {
                p.set_intensity(p.intensity() + intensity);
                p.set_distance(p.distance() + distance);
                p.set_shader_intensity_multiplier(p.shader_intensity_multiplier() + multiplier);
            }
            Light::Spot(s) => {
                s.set_intensity(s.intensity() + intensity);
                s.set_distance(s.distance() + distance);
                s.set_shader_intensity_multiplier(s.shader_intensity_multiplier() + multiplier);

                let cone = input.axis(Scancode::R, Scancode::F) * SPOT_CONE_ANGLE_SPEED * dt;
                let turn = input.axis(Scancode::T, Scancode::G) * SPOT_ROTATION_SPEED * dt;
                s.set_cone_degree(s.cone_degree() + cone);
                s.set_direction(s.direction() + turn);
            }
            Light::Directional(_) => {}
        }
    }

    fn handle_color_change(&mut self, input: &InputState) {
        if input.scroll == 0.0 {
            return;
        }
        let Some(id) = self.active_id() else {
            return;
        };
        if let Some(light) = self.engine.light_mut(id) {
            let shifted = light.color().shift_hue(-input.scroll * HUE_SCROLL_DEGREES);
            light.set_color(shifted);
        }
    }

    fn render(&mut self) {
        let sprites = sorted_sprites(&self.world);
        let materials = &self.materials;
        let quad = &self.quad;

        self.engine.render_lights(|pass| {
            for sprite in &sprites {
                // Each sprite is its own draw call, so nothing is pending when the flag flips.
                pass.set_normal_mapped(sprite.normal_mapped);
                if let Some(material) = materials.get(sprite.material.0) {
                    material.bind(DIFFUSE_UNIT, NORMAL_UNIT);
                }
                pass.surface().set_mat4("u_model", &sprite.model_matrix());
                quad.draw();
            }
        });
    }
}
