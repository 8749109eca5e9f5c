use crate::buffer::{Particle, ParticleBuffer};
use crate::error::GalaxyResult;
use crate::params::GalaxyParameters;
use crate::random::RandomSource;
use std::f32::consts::TAU;
use tracing::debug;

/// Samples consumed per particle, in order: radius, then magnitude and sign for each
/// of x, y, z, then scale.
pub const DRAWS_PER_PARTICLE: usize = 8;

/// Angle of the arm particle `index` belongs to. Arms are assigned round-robin by index.
pub fn branch_angle(index: u32, branches: u32) -> f32 {
    (index % branches) as f32 / branches as f32 * TAU
}

/// Per-axis jitter. Raising the sample to `randomness_power` pulls most offsets toward
/// zero, and the offset grows with distance from the center.
fn jitter<R: RandomSource + ?Sized>(params: &GalaxyParameters, radius: f32, rng: &mut R) -> f32 {
    let magnitude = rng.next_f32().powf(params.randomness_power);
    let sign = if rng.next_f32() < 0.5 { 1.0 } else { -1.0 };
    magnitude * sign * params.randomness * radius
}

/// Builds a fresh particle buffer for `params`.
///
/// Parameters are validated before any sample is drawn. The result depends only on
/// `params` and the samples `rng` hands out.
pub fn generate<R: RandomSource + ?Sized>(
    params: &GalaxyParameters,
    rng: &mut R,
) -> GalaxyResult<ParticleBuffer> {
    params.validate()?;

    let branches = params.branches as u32;
    let mut buffer = ParticleBuffer::with_capacity(params.count as usize);

    for i in 0..params.count {
        let radius = rng.next_f32() * params.radius;
        let spin_angle = radius * params.spin;
        let angle = branch_angle(i, branches) + spin_angle;

        let offset = [
            jitter(params, radius, rng),
            jitter(params, radius, rng),
            jitter(params, radius, rng),
        ];

        let t = if params.radius == 0.0 {
            0.0
        } else {
            (radius / params.radius).clamp(0.0, 1.0)
        };
        let color = params.inside_color.lerp(params.outside_color, t);
        let scale = rng.next_f32();

        buffer.push(Particle {
            position: [
                angle.cos() * radius + offset[0],
                offset[1],
                angle.sin() * radius + offset[2],
            ],
            color: color.to_array(),
            scale,
            offset,
        });
    }

    debug!(
        count = params.count,
        branches = params.branches,
        radius = params.radius,
        "generated galaxy particles"
    );
    Ok(buffer)
}
