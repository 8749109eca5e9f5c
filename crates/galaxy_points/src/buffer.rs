use bytemuck::{Pod, Zeroable};

/// One generated particle, as read back from a [`ParticleBuffer`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Particle {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub scale: f32,
    /// Jitter already included in `position`.
    pub offset: [f32; 3],
}

/// Flat per-particle attribute arrays.
///
/// Vector attributes hold `3 * len()` floats, scalar attributes `len()`.
/// A buffer is never edited after generation; a parameter change produces a new one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleBuffer {
    positions: Vec<f32>,
    colors: Vec<f32>,
    scales: Vec<f32>,
    offsets: Vec<f32>,
}

impl ParticleBuffer {
    pub(crate) fn with_capacity(count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(count * 3),
            colors: Vec::with_capacity(count * 3),
            scales: Vec::with_capacity(count),
            offsets: Vec::with_capacity(count * 3),
        }
    }

    pub(crate) fn push(&mut self, particle: Particle) {
        self.positions.extend_from_slice(&particle.position);
        self.colors.extend_from_slice(&particle.color);
        self.scales.push(particle.scale);
        self.offsets.extend_from_slice(&particle.offset);
    }

    pub fn len(&self) -> usize {
        self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn scales(&self) -> &[f32] {
        &self.scales
    }

    pub fn offsets(&self) -> &[f32] {
        &self.offsets
    }

    pub fn positions_xyz(&self) -> &[[f32; 3]] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn colors_rgb(&self) -> &[[f32; 3]] {
        bytemuck::cast_slice(&self.colors)
    }

    pub fn offsets_xyz(&self) -> &[[f32; 3]] {
        bytemuck::cast_slice(&self.offsets)
    }

    pub fn get(&self, index: usize) -> Option<Particle> {
        Some(Particle {
            position: *self.positions_xyz().get(index)?,
            color: *self.colors_rgb().get(index)?,
            scale: *self.scales.get(index)?,
            offset: *self.offsets_xyz().get(index)?,
        })
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Particle> + '_ {
        let (positions, colors, offsets) =
            (self.positions_xyz(), self.colors_rgb(), self.offsets_xyz());
        (0..self.len()).map(move |i| Particle {
            position: positions[i],
            color: colors[i],
            scale: self.scales[i],
            offset: offsets[i],
        })
    }
}
