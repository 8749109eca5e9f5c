use crate::error::{GalaxyError, GalaxyResult};
use crate::random::{RandomSource, rand_float, rand_int};
use bytemuck::{Pod, Zeroable};

/// An RGB triple with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> GalaxyResult<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(GalaxyError::InvalidColor(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| GalaxyError::InvalidColor(hex.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }

    /// Linear blend; `t = 0` returns `self` and `t = 1` returns `other` exactly.
    pub fn lerp(&self, other: Rgb, t: f32) -> Rgb {
        let mix = |a: f32, b: f32| a * (1.0 - t) + b * t;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    fn is_unit(&self) -> bool {
        self.to_array().iter().all(|c| (0.0..=1.0).contains(c))
    }
}

impl From<[f32; 3]> for Rgb {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GalaxyParameters {
    pub count: u32,
    pub size: f32,
    pub radius: f32,
    pub branches: i32,
    pub spin: f32,
    pub randomness: f32,
    pub randomness_power: f32,
    pub inside_color: Rgb,
    pub outside_color: Rgb,
    /// Rotation rate in radians per second, applied by the renderer.
    pub speed: f32,
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
            inside_color: Rgb::new(1.0, 96.0 / 255.0, 48.0 / 255.0), // #ff6030
            outside_color: Rgb::new(27.0 / 255.0, 57.0 / 255.0, 132.0 / 255.0), // #1b3984
            speed: 0.1,
        }
    }
}

impl GalaxyParameters {
    /// Lower editing bounds.
    pub const MIN: Self = Self {
        count: 10,
        size: 0.001,
        radius: 0.01,
        branches: 2,
        spin: -5.0,
        randomness: 0.0,
        randomness_power: 1.0,
        inside_color: Rgb::BLACK,
        outside_color: Rgb::BLACK,
        speed: -2.0,
    };
    /// Upper editing bounds.
    pub const MAX: Self = Self {
        count: 999_999,
        size: 5.0,
        radius: 20.0,
        branches: 20,
        spin: 5.0,
        randomness: 5.0,
        randomness_power: 10.0,
        inside_color: Rgb::WHITE,
        outside_color: Rgb::WHITE,
        speed: 2.0,
    };
    pub const COUNT_STEP: u32 = 100;

    /// Rejects values the generator cannot work with.
    ///
    /// Degenerate but well-formed values (no particles, zero radius) pass.
    pub fn validate(&self) -> GalaxyResult<()> {
        if self.branches <= 0 {
            return Err(GalaxyError::invalid(
                "branches",
                format!("must be positive, got {}", self.branches),
            ));
        }
        let finite = [
            ("size", self.size),
            ("radius", self.radius),
            ("spin", self.spin),
            ("randomness", self.randomness),
            ("randomness_power", self.randomness_power),
            ("speed", self.speed),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(GalaxyError::invalid(name, format!("must be finite, got {value}")));
            }
        }
        if self.size <= 0.0 {
            return Err(GalaxyError::invalid(
                "size",
                format!("must be positive, got {}", self.size),
            ));
        }
        if self.randomness < 0.0 {
            return Err(GalaxyError::invalid("randomness", "must not be negative"));
        }
        if self.randomness_power < 1.0 {
            return Err(GalaxyError::invalid(
                "randomness_power",
                format!("must be at least 1, got {}", self.randomness_power),
            ));
        }
        if !self.inside_color.is_unit() {
            return Err(GalaxyError::invalid("inside_color", "channels must lie in [0, 1]"));
        }
        if !self.outside_color.is_unit() {
            return Err(GalaxyError::invalid("outside_color", "channels must lie in [0, 1]"));
        }
        Ok(())
    }

    /// True when switching from `other` to `self` needs a new particle buffer.
    /// Size and speed are render-time only.
    pub fn particles_differ(&self, other: &GalaxyParameters) -> bool {
        self.count != other.count
            || self.radius != other.radius
            || self.branches != other.branches
            || self.spin != other.spin
            || self.randomness != other.randomness
            || self.randomness_power != other.randomness_power
            || self.inside_color != other.inside_color
            || self.outside_color != other.outside_color
    }

    /// A random galaxy shape. Count and size are kept.
    pub fn randomized<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Self {
        let radius = rand_float(0.0, 20.0, rng);
        let branches = rand_int(2, 20, rng);
        let spin = rand_float(-5.0, 5.0, rng);
        let randomness = rand_float(0.0, 2.0, rng);
        let randomness_power = rand_float(1.0, 10.0, rng);
        let mut color = || Rgb::new(rng.next_f32(), rng.next_f32(), rng.next_f32());
        let inside_color = color();
        let outside_color = color();
        let speed = rand_float(-2.0, 2.0, rng);

        Self {
            radius,
            branches,
            spin,
            randomness,
            randomness_power,
            inside_color,
            outside_color,
            speed,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn defaults_match_the_classic_galaxy() {
        let params = GalaxyParameters::default();
        assert_eq!(params.inside_color.to_hex(), "#ff6030");
        assert_eq!(params.outside_color.to_hex(), "#1b3984");
        assert!(params.validate().is_ok());
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(Rgb::from_hex("#ff0000").unwrap(), Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(Rgb::from_hex("0000ff").unwrap(), Rgb::new(0.0, 0.0, 1.0));
        assert!(matches!(Rgb::from_hex("#ff00"), Err(GalaxyError::InvalidColor(_))));
        assert!(matches!(Rgb::from_hex("#gg0000"), Err(GalaxyError::InvalidColor(_))));
    }

    #[test]
    fn lerp_hits_endpoints_exactly() {
        let a = Rgb::new(0.3, 0.7, 0.1);
        let b = Rgb::new(0.9, 0.2, 0.6);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }

    #[test]
    fn rejects_non_positive_branches() {
        for branches in [0, -3] {
            let params = GalaxyParameters {
                branches,
                ..Default::default()
            };
            assert!(matches!(
                params.validate(),
                Err(GalaxyError::InvalidParameter { name: "branches", .. })
            ));
        }
    }

    #[test]
    fn rejects_out_of_domain_values() {
        let base = GalaxyParameters::default();
        let cases = [
            GalaxyParameters { randomness: -0.1, ..base.clone() },
            GalaxyParameters { randomness_power: 0.5, ..base.clone() },
            GalaxyParameters { spin: f32::NAN, ..base.clone() },
            GalaxyParameters { size: -1.0, ..base.clone() },
            GalaxyParameters { size: 0.0, ..base.clone() },
            GalaxyParameters { inside_color: Rgb::new(1.5, 0.0, 0.0), ..base.clone() },
        ];
        for params in cases {
            assert!(params.validate().is_err(), "{params:?} should be rejected");
        }
    }

    #[test]
    fn degenerate_values_are_valid() {
        let params = GalaxyParameters {
            count: 0,
            radius: 0.0,
            branches: 1,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn size_and_speed_do_not_need_new_particles() {
        let base = GalaxyParameters::default();
        let tweaked = GalaxyParameters {
            size: 0.5,
            speed: -1.0,
            ..base.clone()
        };
        assert!(!tweaked.particles_differ(&base));
        let reshaped = GalaxyParameters { spin: 2.0, ..base.clone() };
        assert!(reshaped.particles_differ(&base));
    }

    #[test]
    fn randomized_stays_within_editing_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let base = GalaxyParameters::default();
        for _ in 0..500 {
            let params = base.randomized(&mut rng);
            assert_eq!(params.count, base.count);
            assert_eq!(params.size, base.size);
            assert!((0.0..20.0).contains(&params.radius));
            assert!((2..=20).contains(&params.branches));
            assert!((-5.0..5.0).contains(&params.spin));
            assert!((0.0..2.0).contains(&params.randomness));
            assert!((1.0..10.0).contains(&params.randomness_power));
            assert!((-2.0..2.0).contains(&params.speed));
            assert!(params.validate().is_ok());
        }
    }
}
