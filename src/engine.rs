//! The light registry and per-frame render orchestration.

use glam::{Mat4, Vec2};
use slotmap::SlotMap;

use crate::camera::{Camera2d, Viewport, WindowSize};
use crate::color::Color;
use crate::config::EngineConfig;
use crate::light::{DirectionalLight, Light, PointLight, SpotLight};
use crate::renderer::UniformSurface;
use crate::shadow::{ShadowCaster, ShadowHandle};
use crate::uniforms::{self, LightUniforms};

slotmap::new_key_type! {
    /// Caller-side handle to a registered light. Stale after `remove_light`.
    pub struct LightId;
}

struct ActiveLight {
    light: Light,
    shadow: ShadowHandle,
}

/// Owns the active lights, the lighting shader and the shadow service.
///
/// Frame protocol: mutate lights, call [`update`](Self::update) once, then
/// [`render_lights`](Self::render_lights) once.
pub struct LightEngine<S: UniformSurface, C: ShadowCaster> {
    surface: S,
    shadows: C,
    camera: Camera2d,
    viewport: Viewport,
    config: EngineConfig,
    lights: SlotMap<LightId, ActiveLight>,
    /// Insertion order; the first `max_shader_lights` entries get shader slots.
    order: Vec<LightId>,
    resolution: Vec2,
}

impl<S: UniformSurface, C: ShadowCaster> LightEngine<S, C> {
    /// Build the engine and size it for `window`, exactly as a first
    /// [`resize`](Self::resize) would.
    pub fn new(
        mut surface: S,
        mut shadows: C,
        camera: Camera2d,
        viewport: Viewport,
        config: EngineConfig,
        window: WindowSize,
    ) -> Self {
        surface.bind();
        surface.set_int(uniforms::DIFFUSE_SAMPLER, uniforms::DIFFUSE_UNIT);
        surface.set_int(uniforms::NORMAL_SAMPLER, uniforms::NORMAL_UNIT);
        surface.set_int(uniforms::USE_NORMAL_MAP, 1);
        surface.set_int(uniforms::LIGHT_COUNT, 0);
        surface.set_vec4(uniforms::AMBIENT, config.shading.ambient.to_vec4());
        surface.unbind();

        shadows.set_ambient(config.shading.ambient);
        shadows.set_diffuse(config.diffuse_shadows);

        log::info!(
            "light engine ready: {} shader slots, {} shadow rays",
            config.max_shader_lights,
            config.shadow_rays
        );

        let mut engine = Self {
            surface,
            shadows,
            camera,
            viewport,
            config,
            lights: SlotMap::with_key(),
            order: Vec::new(),
            resolution: Vec2::ONE,
        };
        engine.apply_window_size(window);
        engine
    }

    pub fn add_directional_light(&mut self, light: DirectionalLight) -> LightId {
        self.add_light(light)
    }

    pub fn add_point_light(&mut self, light: PointLight) -> LightId {
        self.add_light(light)
    }

    pub fn add_spot_light(&mut self, light: SpotLight) -> LightId {
        self.add_light(light)
    }

    /// Register a light at the end of the order, creating its shadow light.
    ///
    /// Also re-registers a light previously returned by [`remove_light`](Self::remove_light).
    pub fn add_light(&mut self, light: impl Into<Light>) -> LightId {
        let light = light.into();
        let shadow = self
            .shadows
            .create_light(light.kind().shadow_kind(), self.config.shadow_rays);
        light.sync_shadow(shadow, &mut self.shadows);

        let kind = light.kind();
        let id = self.lights.insert(ActiveLight { light, shadow });
        self.order.push(id);
        self.upload_light_count();
        log::debug!("added {:?} light {:?} ({} active)", kind, id, self.order.len());
        id
    }

    /// Unregister a light and destroy its shadow light. The light count
    /// uniform is re-uploaded before returning.
    ///
    /// Returns the descriptor so it can be added again later; `None` if `id`
    /// is not registered.
    pub fn remove_light(&mut self, id: LightId) -> Option<Light> {
        let active = self.lights.remove(id)?;
        self.order.retain(|&other| other != id);
        self.shadows.destroy_light(active.shadow);
        self.upload_light_count();
        log::debug!("removed light {:?} ({} active)", id, self.order.len());
        Some(active.light)
    }

    pub fn clear_lights(&mut self) {
        for id in self.order.drain(..) {
            if let Some(active) = self.lights.remove(id) {
                self.shadows.destroy_light(active.shadow);
            }
        }
        self.upload_light_count();
        log::debug!("cleared all lights");
    }

    pub fn light(&self, id: LightId) -> Option<&Light> {
        self.lights.get(id).map(|active| &active.light)
    }

    /// Changes reach the shadow light on the next [`update`](Self::update) and
    /// the shader on the next [`render_lights`](Self::render_lights).
    pub fn light_mut(&mut self, id: LightId) -> Option<&mut Light> {
        self.lights.get_mut(id).map(|active| &mut active.light)
    }

    pub fn contains(&self, id: LightId) -> bool {
        self.lights.contains_key(id)
    }

    /// Active lights in insertion order.
    pub fn lights(&self) -> impl Iterator<Item = (LightId, &Light)> + '_ {
        self.order
            .iter()
            .filter_map(move |&id| self.lights.get(id).map(|active| (id, &active.light)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Lights that get a shader slot this frame.
    pub fn shader_light_count(&self) -> usize {
        self.order.len().min(self.config.max_shader_lights)
    }

    /// Applied to the shadow service now and to the shader on the next frame.
    pub fn set_ambient_light(&mut self, ambient: Color) {
        self.config.shading.ambient = ambient;
        self.shadows.set_ambient(ambient);
    }

    pub fn ambient_light(&self) -> Color {
        self.config.shading.ambient
    }

    pub fn set_normal_influence(&mut self, influence: f32) {
        self.config.shading.normal_influence = influence;
    }

    pub fn set_specular_intensity(&mut self, intensity: f32) {
        self.config.shading.specular_intensity = intensity;
    }

    pub fn set_specular_remap(&mut self, min: f32, max: f32) {
        self.config.shading.specular_remap = [min, max];
    }

    pub fn set_diffuse_shadows(&mut self, diffuse: bool) {
        self.config.diffuse_shadows = diffuse;
        self.shadows.set_diffuse(diffuse);
    }

    /// Push every light's current values into its shadow light, in order.
    pub fn update(&mut self) {
        for id in &self.order {
            if let Some(active) = self.lights.get(*id) {
                active.light.sync_shadow(active.shadow, &mut self.shadows);
            }
        }
    }

    /// The uniform snapshot the next render would upload.
    pub fn uniforms(&self) -> LightUniforms {
        LightUniforms::capture(
            self.lights().map(|(_, light)| light),
            self.config.max_shader_lights,
            &self.config.shading,
            &self.camera,
            &self.viewport,
            self.resolution,
        )
    }

    /// Render one lit frame.
    ///
    /// `draw_scene` runs with the lighting shader bound. Every draw inside it
    /// must bind the diffuse texture to unit 0 and the normal map to unit 1,
    /// and flush the sprite batch whenever [`LitPass::set_normal_mapped`]
    /// reports a change. Shadows are rendered over the result afterwards.
    pub fn render_lights<F>(&mut self, draw_scene: F)
    where
        F: FnOnce(&mut LitPass<'_, S>),
    {
        let snapshot = self.uniforms();

        self.surface.apply_viewport(self.viewport.screen());
        self.surface.clear();

        self.surface.bind();
        snapshot.upload(&mut self.surface);
        self.surface.set_int(uniforms::USE_NORMAL_MAP, 1);

        let mut pass = LitPass {
            surface: &mut self.surface,
            projection: snapshot.proj_trans,
            normal_mapped: true,
        };
        draw_scene(&mut pass);

        self.surface.unbind();

        self.shadows.set_combined_matrix(&snapshot.proj_trans);
        self.shadows.update_and_render();
    }

    /// React to a window resize of `width` x `height` logical pixels.
    ///
    /// `backbuffer_scale` converts logical pixels to framebuffer pixels
    /// (2.0 on most HiDPI displays).
    pub fn resize(&mut self, width: u32, height: u32, backbuffer_scale: f32) {
        self.apply_window_size(WindowSize::new(width, height, backbuffer_scale));
    }

    fn apply_window_size(&mut self, window: WindowSize) {
        let (fb_width, fb_height) = window.framebuffer();

        self.viewport.update(fb_width, fb_height);
        self.camera.fit_to(&self.viewport);
        self.resolution = Vec2::new(fb_width as f32, fb_height as f32);

        self.surface.bind();
        self.surface.set_vec2(uniforms::RESOLUTION, self.resolution);
        self.surface.unbind();

        self.shadows.set_combined_matrix(&self.camera.combined());
        self.shadows.set_viewport(self.viewport.screen());

        log::info!(
            "window {}x{} (scale {}), viewport {:?}",
            window.width,
            window.height,
            window.backbuffer_scale,
            self.viewport.screen()
        );
    }

    /// Framebuffer size in pixels.
    pub fn resolution(&self) -> Vec2 {
        self.resolution
    }

    pub fn camera(&self) -> &Camera2d {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera2d {
        &mut self.camera
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn shadows(&self) -> &C {
        &self.shadows
    }

    /// Release the shader and the shadow service. Shadow lights still
    /// registered are freed by the service's own teardown.
    pub fn dispose(self) {
        let Self {
            surface,
            mut shadows,
            order,
            ..
        } = self;
        log::info!("disposing light engine with {} active lights", order.len());
        shadows.dispose();
        drop(surface);
    }

    fn upload_light_count(&mut self) {
        let count = self.shader_light_count() as i32;
        self.surface.bind();
        self.surface.set_int(uniforms::LIGHT_COUNT, count);
        self.surface.unbind();
    }
}

/// Handed to the scene-draw callback of [`LightEngine::render_lights`].
pub struct LitPass<'a, S: UniformSurface> {
    surface: &'a mut S,
    projection: Mat4,
    normal_mapped: bool,
}

impl<'a, S: UniformSurface> LitPass<'a, S> {
    /// Toggle normal mapping for the following draws.
    ///
    /// Returns `true` when the state changed, in which case the caller must
    /// flush any pending batch before drawing with the new state.
    pub fn set_normal_mapped(&mut self, enabled: bool) -> bool {
        if self.normal_mapped == enabled {
            return false;
        }
        self.normal_mapped = enabled;
        self.surface.set_int(uniforms::USE_NORMAL_MAP, enabled as i32);
        true
    }

    pub fn is_normal_mapped(&self) -> bool {
        self.normal_mapped
    }

    /// Camera matrix uploaded as `u_projTrans` this frame.
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// The bound lighting shader, for per-draw uniforms.
    pub fn surface(&mut self) -> &mut S {
        &mut *self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{ScreenRect, Scaling};
    use crate::falloff::Falloff;
    use crate::renderer::{RecordingSurface, SurfaceCall, UniformValue};
    use crate::shadow::{ShadowLightKind, ShadowLightTable};
    use approx::assert_relative_eq;

    type TestEngine = LightEngine<RecordingSurface, ShadowLightTable>;

    fn engine(max_shader_lights: usize) -> TestEngine {
        // Never updated by hand: construction sizes it.
        let viewport = Viewport::new(Scaling::Fit, 19.0, 19.0);
        let camera = Camera2d::new(19.0, 19.0);
        let config = EngineConfig {
            max_shader_lights,
            ..EngineConfig::default()
        };
        LightEngine::new(
            RecordingSurface::new(),
            ShadowLightTable::new(),
            camera,
            viewport,
            config,
            WindowSize::new(1280, 720, 1.0),
        )
    }

    fn lamp(x: f32) -> PointLight {
        PointLight::new(Vec2::new(x, 2.0), Color::new(1.0, 0.5, 0.2, 1.0), 1.0, 7.0)
    }

    fn slot_values(surface: &RecordingSurface, i: usize) -> Vec<Option<UniformValue>> {
        ["lightType", "lightPos", "lightDir", "lightColor", "falloff", "coneAngle"]
            .iter()
            .map(|name| surface.get(&uniforms::indexed(name, i)))
            .collect()
    }

    #[test]
    fn construction_binds_samplers_and_ambient() {
        let e = engine(20);
        assert_eq!(e.surface().int("u_texture"), Some(0));
        assert_eq!(e.surface().int("u_normals"), Some(1));
        assert_eq!(e.surface().int("lightCount"), Some(0));
        assert_eq!(e.shadows().ambient, Color::new(1.0, 1.0, 1.0, 0.0));
        assert!(!e.surface().is_bound());
    }

    #[test]
    fn add_then_remove_restores_count_and_order() {
        let mut e = engine(20);
        let a = e.add_point_light(lamp(1.0));
        let b = e.add_point_light(lamp(2.0));
        let c = e.add_point_light(lamp(3.0));
        assert_eq!(e.surface().int("lightCount"), Some(3));

        let extra = e.add_point_light(lamp(4.0));
        assert_eq!(e.len(), 4);
        assert_eq!(e.surface().int("lightCount"), Some(4));

        assert!(e.remove_light(extra).is_some());
        assert_eq!(e.len(), 3);
        assert_eq!(e.surface().int("lightCount"), Some(3));
        assert_eq!(e.shadows().len(), 3);
        let ids: Vec<LightId> = e.lights().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b, c]);

        e.remove_light(b);
        let ids: Vec<LightId> = e.lights().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, c]);
        assert_eq!(e.surface().int("lightCount"), Some(2));
    }

    #[test]
    fn removal_uploads_immediately_without_render() {
        let mut e = engine(20);
        let a = e.add_point_light(lamp(1.0));
        e.surface.clear_calls();
        e.remove_light(a);
        assert_eq!(
            e.surface().calls(),
            &[
                SurfaceCall::Bind,
                SurfaceCall::Uniform("lightCount".to_string()),
                SurfaceCall::Unbind
            ]
        );
        assert_eq!(e.surface().int("lightCount"), Some(0));
    }

    #[test]
    fn stale_id_is_ignored() {
        let mut e = engine(20);
        let a = e.add_point_light(lamp(1.0));
        let b = e.add_point_light(lamp(2.0));
        assert!(e.remove_light(a).is_some());
        assert!(e.remove_light(a).is_none());
        assert!(e.light(a).is_none());
        assert!(!e.contains(a));
        assert!(e.contains(b));
        assert_eq!(e.len(), 1);
    }

    #[test]
    fn uploaded_count_is_capped_to_first_lights() {
        let mut e = engine(20);
        for i in 0..25 {
            e.add_point_light(lamp(i as f32));
        }
        assert_eq!(e.surface().int("lightCount"), Some(20));

        e.render_lights(|_| {});
        assert_eq!(e.surface().int("lightCount"), Some(20));
        assert!(e.surface().get("lightType[20]").is_none());

        let snapshot = e.uniforms();
        assert_eq!(snapshot.light_count(), 20);
        for (i, slot) in snapshot.slots.iter().enumerate() {
            let expected = crate::coords::world_to_shader_space(
                Vec2::new(i as f32, 2.0),
                e.camera(),
                e.viewport(),
            );
            assert_eq!(slot.position, expected);
        }
        // Unshaded lights still cast shadows.
        assert_eq!(e.shadows().len(), 25);
    }

    #[test]
    fn removing_unshaded_light_leaves_shaded_slots_untouched() {
        let mut e = engine(20);
        let ids: Vec<LightId> = (0..25).map(|i| e.add_point_light(lamp(i as f32))).collect();
        e.update();
        e.render_lights(|_| {});
        let before: Vec<_> = (0..20).map(|i| slot_values(e.surface(), i)).collect();

        e.remove_light(ids[20]);
        e.update();
        e.render_lights(|_| {});
        let after: Vec<_> = (0..20).map(|i| slot_values(e.surface(), i)).collect();

        assert_eq!(before, after);
        assert_eq!(e.surface().int("lightCount"), Some(20));
        assert_eq!(e.len(), 24);
    }

    #[test]
    fn removing_shaded_light_promotes_next_in_order() {
        let mut e = engine(2);
        let first = e.add_point_light(lamp(0.0));
        e.add_point_light(lamp(1.0));
        e.add_point_light(lamp(2.0));

        e.remove_light(first);
        let slots = e.uniforms().slots;
        assert_eq!(slots.len(), 2);
        let expected =
            crate::coords::world_to_shader_space(Vec2::new(2.0, 2.0), e.camera(), e.viewport());
        assert_eq!(slots[1].position, expected);
    }

    #[test]
    fn update_reconciles_shadow_lights() {
        let mut e = engine(20);
        let id = e.add_spot_light(SpotLight::new(
            Vec2::new(6.0, 5.0),
            Color::new(0.2, 0.5, 1.0, 1.0),
            0.0,
            75.0,
            4.0,
            10.0,
        ));
        let handle = e.lights[id].shadow;

        {
            let spot = e.light_mut(id).and_then(Light::as_spot_mut).unwrap();
            spot.set_position(Vec2::new(1.0, 1.0));
            spot.set_direction(90.0);
            spot.set_cone_degree(40.0);
            spot.set_shader_intensity_multiplier(2.0);
        }
        // Not reconciled until update.
        assert_eq!(e.shadows().get(handle).unwrap().position, Vec2::new(6.0, 5.0));

        e.update();
        let state = e.shadows().get(handle).unwrap();
        assert_eq!(state.kind, ShadowLightKind::Cone);
        assert_eq!(state.position, Vec2::new(1.0, 1.0));
        assert_relative_eq!(state.direction, 90.0);
        assert_relative_eq!(state.cone_degree, 20.0);
        assert_relative_eq!(state.distance, 10.0);
        assert_relative_eq!(state.color.a, 4.0);

        let slot = &e.uniforms().slots[0];
        assert_relative_eq!(slot.cone_angle, 20.0_f32.to_radians().cos());
        assert_relative_eq!(slot.color.w, 8.0);
    }

    #[test]
    fn point_distance_drives_uploaded_falloff() {
        let mut e = engine(20);
        let id = e.add_point_light(lamp(6.0).with_falloff_profile(1.0));
        assert_eq!(
            e.uniforms().slots[0].falloff,
            Falloff::from_distance(7.0, 1.0).to_vec3()
        );

        e.light_mut(id)
            .and_then(Light::as_point_mut)
            .unwrap()
            .set_distance(30.0);
        e.update();
        let falloff = e.uniforms().slots[0].falloff;
        assert_relative_eq!(falloff.x, 1.0);
        assert_relative_eq!(falloff.y, 0.0);
        assert_relative_eq!(falloff.z, 255.0 / 900.0);

        let handle = e.lights[id].shadow;
        assert_relative_eq!(e.shadows().get(handle).unwrap().distance, 30.0);
    }

    #[test]
    fn directional_light_uploads_flat_direction() {
        let mut e = engine(20);
        e.add_directional_light(DirectionalLight::new(Color::WHITE, 0.0, 1.0).with_elevation(0.0));
        e.render_lights(|_| {});
        match e.surface().get("lightDir[0]") {
            Some(UniformValue::Vec3(d)) => {
                assert_relative_eq!(d.x, 1.0);
                assert_relative_eq!(d.y, 0.0);
                assert_relative_eq!(d.z, 0.0);
            }
            other => panic!("unexpected lightDir[0]: {other:?}"),
        }
        assert_eq!(e.surface().int("lightType[0]"), Some(0));
    }

    #[test]
    fn render_follows_frame_protocol() {
        let mut e = engine(20);
        e.add_point_light(lamp(1.0));
        e.surface.clear_calls();

        let mut called = 0;
        e.render_lights(|pass| {
            called += 1;
            pass.surface().set_float("u_marker", 1.0);
        });
        assert_eq!(called, 1);

        let calls = e.surface().calls();
        let pos = |target: &SurfaceCall| calls.iter().position(|c| c == target).unwrap();
        let viewport = SurfaceCall::ApplyViewport(e.viewport().screen());
        let count = SurfaceCall::Uniform("lightCount".to_string());
        let marker = SurfaceCall::Uniform("u_marker".to_string());

        assert_eq!(pos(&viewport), 0);
        assert_eq!(pos(&SurfaceCall::Clear), 1);
        assert_eq!(pos(&SurfaceCall::Bind), 2);
        assert!(pos(&count) > 2);
        assert!(pos(&marker) > pos(&count));
        assert_eq!(calls.last(), Some(&SurfaceCall::Unbind));

        assert_eq!(e.shadows().frames_rendered, 1);
        assert_eq!(e.shadows().combined, e.camera().combined());
    }

    #[test]
    fn normal_map_toggle_reports_flushes() {
        let mut e = engine(20);
        let mut flushes = Vec::new();
        e.render_lights(|pass| {
            flushes.push(pass.set_normal_mapped(true));
            flushes.push(pass.set_normal_mapped(false));
            flushes.push(pass.set_normal_mapped(false));
            flushes.push(pass.set_normal_mapped(true));
        });
        assert_eq!(flushes, vec![false, true, false, true]);
        assert_eq!(e.surface().int("u_useNormalMap"), Some(1));
    }

    #[test]
    fn lit_pass_reports_state_and_frame_projection() {
        let mut e = engine(20);
        let combined = e.camera().combined();
        let mut seen = None;
        e.render_lights(|pass| {
            let initially = pass.is_normal_mapped();
            pass.set_normal_mapped(false);
            seen = Some((initially, pass.is_normal_mapped(), pass.projection()));
        });
        assert_eq!(seen, Some((true, false, combined)));
    }

    #[test]
    fn shading_settings_are_deferred_to_next_frame() {
        let mut e = engine(20);
        let dusk = Color::new(0.1, 0.1, 0.3, 0.4);
        e.set_ambient_light(dusk);
        e.set_normal_influence(0.0);
        e.set_specular_remap(0.3, 0.7);

        assert_eq!(e.shadows().ambient, dusk);
        assert_ne!(e.surface().get("ambient"), Some(UniformValue::Vec4(dusk.to_vec4())));
        assert!(e.surface().get("normalInfluence").is_none());

        e.render_lights(|_| {});
        assert_eq!(e.surface().get("ambient"), Some(UniformValue::Vec4(dusk.to_vec4())));
        assert_eq!(e.surface().get("normalInfluence"), Some(UniformValue::Float(0.0)));
        assert_eq!(
            e.surface().get("specularRemap"),
            Some(UniformValue::Vec2(Vec2::new(0.3, 0.7)))
        );
    }

    #[test]
    fn diffuse_toggle_goes_to_shadow_service() {
        let mut e = engine(20);
        assert!(e.shadows().diffuse);
        e.set_diffuse_shadows(false);
        assert!(!e.shadows().diffuse);
    }

    #[test]
    fn construction_sizes_viewport_and_resolution() {
        let e = engine(20);
        assert_eq!(e.resolution(), Vec2::new(1280.0, 720.0));
        assert_eq!(e.viewport().screen(), ScreenRect::new(280, 0, 720, 720));
        assert_eq!(e.shadows().viewport, e.viewport().screen());
        assert_eq!(e.shadows().combined, e.camera().combined());
    }

    #[test]
    fn first_frame_uploads_resolution_without_resize() {
        let mut e = engine(20);
        e.surface.clear_calls();
        e.render_lights(|_| {});

        assert!(e
            .surface()
            .calls()
            .contains(&SurfaceCall::Uniform("resolution".to_string())));
        assert_eq!(
            e.surface().get("resolution"),
            Some(UniformValue::Vec2(Vec2::new(1280.0, 720.0)))
        );
        assert_eq!(e.uniforms().resolution, Vec2::new(1280.0, 720.0));
    }

    #[test]
    fn light_positions_are_finite_before_any_resize() {
        let mut e = engine(20);
        e.add_point_light(lamp(3.0));
        e.add_spot_light(SpotLight::new(Vec2::new(4.0, 4.0), Color::WHITE, 0.0, 60.0, 1.0, 5.0));
        e.render_lights(|_| {});

        for i in 0..2 {
            match e.surface().get(&uniforms::indexed("lightPos", i)) {
                Some(UniformValue::Vec3(p)) => assert!(p.is_finite(), "lightPos[{i}] = {p:?}"),
                other => panic!("unexpected lightPos[{i}]: {other:?}"),
            }
        }
    }

    #[test]
    fn resize_uploads_scaled_resolution_and_viewport() {
        let mut e = engine(20);
        e.resize(800, 600, 2.0);

        assert_eq!(
            e.surface().get("resolution"),
            Some(UniformValue::Vec2(Vec2::new(1600.0, 1200.0)))
        );
        assert_eq!(e.viewport().screen(), ScreenRect::new(200, 0, 1200, 1200));
        assert_eq!(e.shadows().viewport, e.viewport().screen());
        assert_eq!(e.shadows().combined, e.camera().combined());
    }

    #[test]
    fn clear_lights_resets_count_and_shadows() {
        let mut e = engine(20);
        let a = e.add_point_light(lamp(1.0));
        e.add_directional_light(DirectionalLight::new(Color::WHITE, 45.0, 1.0));
        e.clear_lights();

        assert!(e.is_empty());
        assert!(e.shadows().is_empty());
        assert_eq!(e.surface().int("lightCount"), Some(0));
        assert!(e.light(a).is_none());
    }

    #[test]
    fn removed_light_can_be_added_again_at_the_end() {
        let mut e = engine(20);
        let sun = e.add_directional_light(DirectionalLight::new(Color::WHITE, -45.0, 2.8));
        let lamp_id = e.add_point_light(lamp(1.0));

        let detached = e.remove_light(sun).unwrap();
        assert_eq!(e.shadows().len(), 1);

        let again = e.add_light(detached);
        assert_ne!(again, sun);
        assert_eq!(e.shadows().len(), 2);
        let ids: Vec<LightId> = e.lights().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![lamp_id, again]);

        let handle = e.lights[again].shadow;
        assert_relative_eq!(e.shadows().get(handle).unwrap().direction, 135.0);
    }

    #[test]
    fn dispose_tears_down_shadow_service() {
        let mut table = ShadowLightTable::new();
        let mut surface = RecordingSurface::new();
        {
            let mut e = LightEngine::new(
                &mut surface,
                &mut table,
                Camera2d::new(10.0, 10.0),
                Viewport::new(Scaling::Stretch, 10.0, 10.0),
                EngineConfig::default(),
                WindowSize::new(640, 480, 1.0),
            );
            e.add_point_light(lamp(1.0));
            e.add_point_light(lamp(2.0));
            e.dispose();
        }
        assert!(table.disposed);
        assert!(table.is_empty());
        assert_eq!(surface.int("lightCount"), Some(2));
    }

    #[test]
    fn light_positions_follow_camera() {
        let mut e = engine(20);
        e.add_point_light(lamp(9.5));
        let before = e.uniforms().slots[0].position;
        e.camera_mut().position += Vec2::new(1.0, 0.0);
        let after = e.uniforms().slots[0].position;
        assert!(after.x < before.x);
        assert_relative_eq!(after.y, before.y);
        assert_eq!(after.z, 0.0);
    }
}
