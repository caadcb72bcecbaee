use glam::{Mat4, Vec2};
use hecs::World;

/// Index into the demo's material list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialId(pub usize);

pub const WALL: MaterialId = MaterialId(0);
pub const WOOD: MaterialId = MaterialId(1);

/// Axis-aligned textured quad on the world plane.
#[derive(Debug, Clone, Copy)]
pub struct Sprite {
    pub position: Vec2,
    pub size: Vec2,
    pub material: MaterialId,
    /// Lower layers draw first.
    pub layer: i32,
    pub normal_mapped: bool,
}

impl Sprite {
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position.extend(0.0)) * Mat4::from_scale(self.size.extend(1.0))
    }
}

/// World extent of the demo room.
pub const WORLD_WIDTH: f32 = 19.0;
pub const WORLD_HEIGHT: f32 = 9.0;

pub fn load_demo_scene(world: &mut World) {
    world.spawn((Sprite {
        position: Vec2::ZERO,
        size: Vec2::new(WORLD_WIDTH, WORLD_HEIGHT),
        material: WALL,
        layer: 0,
        normal_mapped: true,
    },));

    world.spawn((Sprite {
        position: Vec2::new(9.0, 0.0),
        size: Vec2::new(9.0, 19.0),
        material: WOOD,
        layer: 1,
        normal_mapped: true,
    },));

    // Same planks without normals, to compare flat and bumped shading side by side.
    world.spawn((Sprite {
        position: Vec2::new(1.0, 1.0),
        size: Vec2::new(3.0, 3.0),
        material: WOOD,
        layer: 2,
        normal_mapped: false,
    },));
}

/// Sprites in draw order.
pub fn sorted_sprites(world: &World) -> Vec<Sprite> {
    let mut sprites: Vec<Sprite> = world.query::<&Sprite>().iter().map(|(_, s)| *s).collect();
    sprites.sort_by_key(|s| s.layer);
    sprites
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprites_come_back_in_layer_order() {
        let mut world = World::new();
        load_demo_scene(&mut world);
        let layers: Vec<i32> = sorted_sprites(&world).iter().map(|s| s.layer).collect();
        assert_eq!(layers, vec![0, 1, 2]);
    }

    #[test]
    fn model_matrix_maps_unit_quad_onto_sprite() {
        let sprite = Sprite {
            position: Vec2::new(2.0, 3.0),
            size: Vec2::new(4.0, 5.0),
            material: WALL,
            layer: 0,
            normal_mapped: true,
        };
        let corner = sprite.model_matrix().transform_point3(glam::Vec3::ONE);
        assert_eq!(corner.truncate(), Vec2::new(6.0, 8.0));
    }
}
