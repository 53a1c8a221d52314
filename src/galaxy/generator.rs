use super::GalaxyParameters;
use bevy::color::{LinearRgba, Mix};
use bevy::prelude::*;
use rand::prelude::*;
use rayon::prelude::*;
use std::f32::consts::TAU;

/// Flat, index aligned particle data. Particle `i` lives at `[3i, 3i + 1, 3i + 2]`
/// in both vectors, as xyz and linear rgb.
#[derive(Clone, Debug, Default)]
pub struct ParticleBuffers {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
}

impl ParticleBuffers {
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[index * 3..index * 3 + 3])
    }

    pub fn color(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.colors[index * 3..index * 3 + 3])
    }
}

/// Generates the galaxy point cloud on the rayon pool, one thread rng per worker.
pub fn generate(params: &GalaxyParameters) -> ParticleBuffers {
    let sampler = ParticleSampler::new(params);
    let mut buffers = ParticleBuffers::zeroed(params.count as usize);

    buffers
        .positions
        .par_chunks_exact_mut(3)
        .zip(buffers.colors.par_chunks_exact_mut(3))
        .enumerate()
        .for_each_init(rand::rng, |rng, (i, (position, color))| {
            sampler.write(i as u32, rng, position, color);
        });

    buffers
}

/// Sequential variant of [`generate`] drawing from the given rng.
pub fn generate_with_rng<R: Rng>(params: &GalaxyParameters, rng: &mut R) -> ParticleBuffers {
    let sampler = ParticleSampler::new(params);
    let mut buffers = ParticleBuffers::zeroed(params.count as usize);

    for (i, (position, color)) in buffers
        .positions
        .chunks_exact_mut(3)
        .zip(buffers.colors.chunks_exact_mut(3))
        .enumerate()
    {
        sampler.write(i as u32, rng, position, color);
    }

    buffers
}

impl ParticleBuffers {
    fn zeroed(count: usize) -> Self {
        Self {
            positions: vec![0.0; count * 3],
            colors: vec![0.0; count * 3],
        }
    }
}

/// Angle of the arm a particle belongs to. Assignment is round robin on the index.
pub fn branch_angle(index: u32, branches: u32) -> f32 {
    let branches = branches.max(2);
    (index % branches) as f32 / branches as f32 * TAU
}

/// Signed offset in `[-randomness * radius, randomness * radius]`.
/// Higher `power` pulls the mass of the distribution towards zero.
pub fn jitter<R: Rng>(rng: &mut R, power: f32, randomness: f32, radius: f32) -> f32 {
    let magnitude = rng.random::<f32>().powf(power);
    let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    magnitude * sign * randomness * radius
}

/// Position on the spiral before jitter is added.
pub fn spiral_position(index: u32, particle_radius: f32, spin: f32, branches: u32) -> Vec3 {
    let angle = branch_angle(index, branches) + particle_radius * spin;
    vec3(angle.cos() * particle_radius, 0.0, angle.sin() * particle_radius)
}

pub fn radial_color(inside: LinearRgba, outside: LinearRgba, fraction: f32) -> LinearRgba {
    inside.mix(&outside, fraction.clamp(0.0, 1.0))
}

struct ParticleSampler {
    radius: f32,
    spin: f32,
    branches: u32,
    randomness: f32,
    randomness_power: f32,
    inside: LinearRgba,
    outside: LinearRgba,
}

impl ParticleSampler {
    fn new(params: &GalaxyParameters) -> Self {
        Self {
            // a zero radius would make the color fraction NaN
            radius: params.radius.max(GalaxyParameters::MIN.radius),
            spin: params.spin,
            branches: params.branches.max(GalaxyParameters::MIN.branches),
            randomness: params.randomness,
            randomness_power: params.randomness_power,
            inside: params.inside_color.to_linear(),
            outside: params.outside_color.to_linear(),
        }
    }

    fn write<R: Rng>(&self, index: u32, rng: &mut R, position: &mut [f32], color: &mut [f32]) {
        let particle_radius = rng.random::<f32>() * self.radius;

        let offset = vec3(
            jitter(rng, self.randomness_power, self.randomness, particle_radius),
            jitter(rng, self.randomness_power, self.randomness, particle_radius),
            jitter(rng, self.randomness_power, self.randomness, particle_radius),
        );
        let pos = spiral_position(index, particle_radius, self.spin, self.branches) + offset;
        position.copy_from_slice(&pos.to_array());

        let mixed = radial_color(self.inside, self.outside, particle_radius / self.radius);
        color.copy_from_slice(&[mixed.red, mixed.green, mixed.blue]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use std::f32::consts::PI;

    const EPSILON: f32 = 1e-5;

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(0x6a1a)
    }

    #[test]
    fn buffers_have_three_slots_per_particle() {
        let params = GalaxyParameters {
            count: 1234,
            ..default()
        };
        let buffers = generate(&params);
        assert_eq!(buffers.positions.len(), 3 * 1234);
        assert_eq!(buffers.colors.len(), 3 * 1234);
        assert_eq!(buffers.len(), 1234);
    }

    #[test]
    fn particles_stay_within_radius_without_randomness() {
        let params = GalaxyParameters {
            count: 5000,
            radius: 3.0,
            randomness: 0.0,
            ..default()
        };
        let buffers = generate_with_rng(&params, &mut seeded());

        for i in 0..buffers.len() {
            let pos = buffers.position(i);
            assert!(pos.xz().length() <= params.radius + EPSILON);
            assert!(pos.y.abs() < EPSILON);
        }
    }

    #[test]
    fn jitter_is_bounded_by_randomness() {
        let params = GalaxyParameters {
            count: 5000,
            radius: 2.0,
            randomness: 1.5,
            ..default()
        };
        let buffers = generate(&params);
        let bound = params.radius * (1.0 + params.randomness) + EPSILON;

        for i in 0..buffers.len() {
            let pos = buffers.position(i);
            assert!(pos.x.abs() <= bound && pos.z.abs() <= bound);
            assert!(pos.y.abs() <= params.radius * params.randomness + EPSILON);
            assert!(pos.is_finite());
        }
    }

    #[test]
    fn branch_angle_repeats_every_branch_count() {
        for branches in 2..=20 {
            for i in 0..100 {
                assert_eq!(branch_angle(i, branches), branch_angle(i + branches, branches));
            }
        }
        assert!((branch_angle(1, 4) - PI / 2.0).abs() < EPSILON);
    }

    #[test]
    fn color_endpoints_match_inside_and_outside() {
        let inside = Color::srgb_u8(0xff, 0x60, 0x30).to_linear();
        let outside = Color::srgb_u8(0x1b, 0x39, 0x84).to_linear();

        let start = radial_color(inside, outside, 0.0);
        let end = radial_color(inside, outside, 1.0);
        assert!((start.red - inside.red).abs() < EPSILON);
        assert!((start.blue - inside.blue).abs() < EPSILON);
        assert!((end.green - outside.green).abs() < EPSILON);
        assert!((end.blue - outside.blue).abs() < EPSILON);
    }

    #[test]
    fn colors_lie_between_endpoints() {
        let params = GalaxyParameters {
            count: 2000,
            inside_color: Color::BLACK,
            outside_color: Color::WHITE,
            randomness: 0.0,
            ..default()
        };
        let buffers = generate_with_rng(&params, &mut seeded());

        for i in 0..buffers.len() {
            let color = buffers.color(i);
            assert!(color.min_element() >= 0.0 && color.max_element() <= 1.0);
            // grey ramp tracks the particle's distance from the center
            let fraction = buffers.position(i).xz().length() / params.radius;
            assert!((color.x - fraction).abs() < 1e-4);
        }
    }

    #[test]
    fn unseeded_generations_differ() {
        let params = GalaxyParameters {
            count: 500,
            ..default()
        };
        let a = generate(&params);
        let b = generate(&params);

        assert_eq!(a.positions.len(), b.positions.len());
        assert_ne!(a.positions, b.positions);
    }

    #[test]
    fn seeded_generations_repeat() {
        let params = GalaxyParameters {
            count: 500,
            ..default()
        };
        let a = generate_with_rng(&params, &mut seeded());
        let b = generate_with_rng(&params, &mut seeded());
        assert_eq!(a.positions, b.positions);
        assert_eq!(a.colors, b.colors);
    }

    #[test]
    fn two_branches_without_spin_land_on_opposite_rays() {
        let params = GalaxyParameters {
            count: 4,
            branches: 2,
            radius: 1.0,
            spin: 0.0,
            randomness: 0.0,
            ..default()
        };
        let buffers = generate_with_rng(&params, &mut seeded());

        for i in 0..4 {
            let pos = buffers.position(i);
            let distance = pos.xz().length();
            assert!(distance <= 1.0);
            assert_eq!(pos.y.abs(), 0.0);
            if distance > EPSILON {
                let direction = pos.xz() / distance;
                let expected = if i % 2 == 0 { 1.0 } else { -1.0 };
                assert!((direction.x - expected).abs() < 1e-4, "particle {i}: {pos}");
                assert!(direction.y.abs() < 1e-4);
            }
        }
    }

    #[test]
    fn zero_radius_does_not_produce_nan() {
        let params = GalaxyParameters {
            count: 100,
            radius: 0.0,
            ..default()
        };
        let buffers = generate(&params);
        assert!(buffers.colors.iter().all(|c| c.is_finite()));
        assert!(buffers.positions.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn power_concentrates_jitter_near_zero() {
        let mut rng = seeded();
        let mean = |rng: &mut StdRng, power: f32| {
            (0..4000).map(|_| jitter(rng, power, 1.0, 1.0).abs()).sum::<f32>() / 4000.0
        };
        let uniform = mean(&mut rng, 1.0);
        let concentrated = mean(&mut rng, 8.0);
        assert!((uniform - 0.5).abs() < 0.05);
        assert!(concentrated < uniform / 3.0);
    }
}
