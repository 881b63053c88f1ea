//! Built-in scenes.

use tracer_math::{Color, Vec3};

use crate::scene::{CameraSettings, Entity, Lighting, Material, Scene};

const GLASS: Material = Material::Dielectric {
    refractive_index: 1.5,
};

const MIRROR: Material = Material::Metal { fuzz: 0.0 };

/// Named scenes that ship with the tracer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    /// Hollow glass spheres of several sizes over a mirror floor.
    Showcase,
    /// One glass shell resting on a large diffuse ground sphere.
    Lens,
    /// A red sphere above a grey ground plane, viewed down +Z.
    SphereOnPlane,
}

impl Preset {
    /// Every preset, in display order.
    pub const ALL: [Preset; 3] = [Preset::Showcase, Preset::Lens, Preset::SphereOnPlane];

    /// Stable name used on the command line and in logs.
    pub fn name(self) -> &'static str {
        match self {
            Preset::Showcase => "showcase",
            Preset::Lens => "lens",
            Preset::SphereOnPlane => "sphere_on_plane",
        }
    }

    /// Look up a preset by [`Preset::name`].
    pub fn from_name(name: &str) -> Option<Preset> {
        Self::ALL.into_iter().find(|preset| preset.name() == name)
    }

    /// Build the scene.
    pub fn build(self) -> Scene {
        match self {
            Preset::Showcase => showcase(),
            Preset::Lens => lens(),
            Preset::SphereOnPlane => sphere_on_plane(),
        }
    }
}

/// A glass shell: an outer sphere with a negative-radius sphere inside it.
fn shell(scene: &mut Scene, center: Vec3, outer: f32, inner: f32) {
    scene.add_entity(Entity::sphere(center, outer).with_material(GLASS));
    scene.add_entity(Entity::sphere(center, -inner).with_material(GLASS));
}

fn showcase() -> Scene {
    let mut scene = Scene::new(Preset::Showcase.name());

    let shells = [
        (Vec3::new(0.0, 0.0, -5.0), 1.0, 0.4),
        (Vec3::new(2.5, 0.0, -7.0), 1.0, 0.9),
        (Vec3::new(-2.5, 0.0, -7.0), 1.0, 0.8),
        (Vec3::new(-1.0, 4.0, -8.0), 1.5, 1.1),
        (Vec3::new(-10.0, 3.0, -20.0), 2.4, 2.0),
        (Vec3::new(6.0, 4.0, -4.0), 5.0, 4.5),
    ];
    for (center, outer, inner) in shells {
        shell(&mut scene, center, outer, inner);
    }

    // A second shell nested inside the large one
    shell(&mut scene, Vec3::new(6.0, 4.0, -4.0), 4.0, 1.0);

    scene.add_entity(Entity::plane(Vec3::new(0.0, -1.5, 0.0), Vec3::Y).with_material(MIRROR));

    scene.camera = CameraSettings {
        position: Vec3::ZERO,
        look_at: Vec3::new(0.0, 0.0, -1.0),
        up: Vec3::Y,
        vfov: 90.0,
    };

    scene
}

fn lens() -> Scene {
    let mut scene = Scene::new(Preset::Lens.name());

    scene.add_entity(
        Entity::sphere(Vec3::new(0.0, -100.5, -1.0), 100.0).with_color(Color::new(0.8, 0.8, 0.0)),
    );
    shell(&mut scene, Vec3::new(-1.0, 0.0, -1.0), 0.5, 0.4);
    scene.add_entity(
        Entity::sphere(Vec3::new(0.2, 0.0, -1.4), 0.5).with_color(Color::new(0.1, 0.2, 0.5)),
    );
    scene.add_entity(
        Entity::sphere(Vec3::new(1.2, 0.0, -1.0), 0.5)
            .with_color(Color::new(1.0, 0.8, 0.4))
            .with_material(Material::Metal { fuzz: 0.3 }),
    );

    scene.camera = CameraSettings {
        position: Vec3::new(0.0, 0.3, 1.0),
        look_at: Vec3::new(0.0, 0.0, -1.0),
        up: Vec3::Y,
        vfov: 50.0,
    };

    scene
}

fn sphere_on_plane() -> Scene {
    let mut scene = Scene::new(Preset::SphereOnPlane.name());

    scene.add_entity(
        Entity::plane(Vec3::new(0.0, -1.2, 0.0), Vec3::Y).with_color(Color::splat(0.8)),
    );
    scene.add_entity(
        Entity::sphere(Vec3::new(0.0, 0.0, 5.0), 1.0).with_color(Color::new(1.0, 0.0, 0.0)),
    );

    scene.lighting = Lighting {
        ambient: 0.25,
        sun_direction: Vec3::new(0.3, 0.1, -1.0).normalize(),
    };
    scene.camera = CameraSettings {
        position: Vec3::ZERO,
        look_at: Vec3::new(0.0, 0.0, 5.0),
        up: Vec3::Y,
        vfov: 30.0,
    };

    scene
}
