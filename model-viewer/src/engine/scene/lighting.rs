use bevy::pbr::{CascadeShadowConfigBuilder, DirectionalLightShadowMap};
use bevy::prelude::*;

use constants::render_settings::{
    AMBIENT_BRIGHTNESS, AMBIENT_COLOUR, KEY_LIGHT_ILLUMINANCE, KEY_LIGHT_POSITION,
    SHADOW_FAR, SHADOW_MAP_SIZE, SHADOW_NEAR,
};

/// Marker for the shadow-casting key light.
#[derive(Component)]
pub struct KeyLight;

/// Adds the lighting rig to the scene owned by `commands`.
pub fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            color: Color::WHITE,
            illuminance: KEY_LIGHT_ILLUMINANCE,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(KEY_LIGHT_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        CascadeShadowConfigBuilder {
            num_cascades: 1,
            minimum_distance: SHADOW_NEAR,
            maximum_distance: SHADOW_FAR,
            ..default()
        }
        .build(),
        KeyLight,
        Name::new("key_light"),
    ));

    let [r, g, b] = AMBIENT_COLOUR;
    commands.insert_resource(AmbientLight {
        color: Color::srgb_u8(r, g, b),
        brightness: AMBIENT_BRIGHTNESS,
        ..default()
    });
    commands.insert_resource(DirectionalLightShadowMap {
        size: SHADOW_MAP_SIZE,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn lighting_adds_shadowed_key_light_and_ambient_fill() {
        let mut world = World::new();
        world
            .run_system_once(|mut commands: Commands| spawn_lighting(&mut commands))
            .expect("lighting system runs");

        let mut lights = world.query_filtered::<(&DirectionalLight, &Transform), With<KeyLight>>();
        let (light, transform) = lights.single(&world).expect("one key light");
        assert!(light.shadows_enabled);
        assert_eq!(transform.translation, Vec3::new(5.0, 10.0, 7.5));

        let ambient = world.resource::<AmbientLight>();
        assert_eq!(ambient.color, Color::srgb_u8(0x40, 0x40, 0x40));
        assert_eq!(world.resource::<DirectionalLightShadowMap>().size, 1024);
    }
}
