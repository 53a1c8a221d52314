use bevy::prelude::*;

/// Tunable inputs of the galaxy generator.
///
/// Only the control panel writes to this resource, and only through a
/// [`ParametersCommitted`] event, so every value stored here has been through
/// [`GalaxyParameters::sanitized`].
#[derive(Resource, Clone, PartialEq, Debug)]
pub struct GalaxyParameters {
    pub count: u32,
    pub size: f32,
    pub radius: f32,
    pub branches: u32,
    pub spin: f32,
    pub randomness: f32,
    pub randomness_power: f32,
    pub inside_color: Color,
    pub outside_color: Color,
}

impl GalaxyParameters {
    pub const MIN: Self = Self {
        count: 100,
        size: 0.001,
        radius: 0.01,
        branches: 2,
        spin: -5.0,
        randomness: 0.0,
        randomness_power: 1.0,
        inside_color: Color::BLACK,
        outside_color: Color::BLACK,
    };
    pub const MAX: Self = Self {
        count: 1_000_000,
        size: 0.1,
        radius: 20.0,
        branches: 20,
        spin: 5.0,
        randomness: 2.0,
        randomness_power: 10.0,
        inside_color: Color::WHITE,
        outside_color: Color::WHITE,
    };
    // colors have no step
    pub const STEP: Self = Self {
        count: 100,
        size: 0.001,
        radius: 0.01,
        branches: 1,
        spin: 0.001,
        randomness: 0.001,
        randomness_power: 0.001,
        inside_color: Color::NONE,
        outside_color: Color::NONE,
    };

    /// Copy of `self` with every scalar clamped into `[MIN, MAX]`.
    /// NaN falls back to the default value of the field.
    pub fn sanitized(&self) -> Self {
        let default = Self::default();
        let clamp = |value: f32, min: f32, max: f32, fallback: f32| {
            if value.is_nan() {
                fallback
            } else {
                value.clamp(min, max)
            }
        };

        Self {
            count: self.count.clamp(Self::MIN.count, Self::MAX.count),
            size: clamp(self.size, Self::MIN.size, Self::MAX.size, default.size),
            radius: clamp(self.radius, Self::MIN.radius, Self::MAX.radius, default.radius),
            branches: self.branches.clamp(Self::MIN.branches, Self::MAX.branches),
            spin: clamp(self.spin, Self::MIN.spin, Self::MAX.spin, default.spin),
            randomness: clamp(
                self.randomness,
                Self::MIN.randomness,
                Self::MAX.randomness,
                default.randomness,
            ),
            randomness_power: clamp(
                self.randomness_power,
                Self::MIN.randomness_power,
                Self::MAX.randomness_power,
                default.randomness_power,
            ),
            inside_color: self.inside_color,
            outside_color: self.outside_color,
        }
    }
}

impl Default for GalaxyParameters {
    fn default() -> Self {
        Self {
            count: 100_000,
            size: 0.01,
            radius: 5.0,
            branches: 3,
            spin: 1.0,
            randomness: 0.2,
            randomness_power: 3.0,
            inside_color: Color::srgb_u8(0xff, 0x60, 0x30),
            outside_color: Color::srgb_u8(0x1b, 0x39, 0x84),
        }
    }
}

/// Id of the currently applied parameter set. Bumped on every effective commit.
#[derive(Resource, Default, Clone, Copy, PartialEq, Eq, Debug)]
pub struct GalaxyGeneration(pub u64);

/// Sent by the control panel when the user finishes editing a value.
#[derive(Event, Clone, Debug)]
pub struct ParametersCommitted(pub GalaxyParameters);

/// Forces a rebuild with the current parameters.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct RegenerateGalaxy;

pub struct GalaxyParametersPlugin;

impl Plugin for GalaxyParametersPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GalaxyParameters::default())
            .insert_resource(GalaxyGeneration::default())
            .add_event::<ParametersCommitted>()
            .add_event::<RegenerateGalaxy>()
            .add_systems(Update, apply_committed_parameters);
    }
}

pub fn apply_committed_parameters(
    mut commits: EventReader<ParametersCommitted>,
    mut regenerate: EventReader<RegenerateGalaxy>,
    mut parameters: ResMut<GalaxyParameters>,
    mut generation: ResMut<GalaxyGeneration>,
) {
    let mut dirty = regenerate.read().count() > 0;

    for ParametersCommitted(committed) in commits.read() {
        let committed = committed.sanitized();
        if committed != *parameters {
            *parameters = committed;
            dirty = true;
        }
    }

    if dirty {
        generation.0 += 1;
        debug!("Galaxy parameters applied, generation {}", generation.0);
    }
}
