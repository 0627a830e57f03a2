//! Heightfield sampling
//!
//! Terrain generation lives elsewhere; the simulation only ever asks "how high
//! is the ground here". Samplers must answer for any input: coordinates that
//! are out of bounds or not generated yet read as flat ground at height 0.

/// Ground elevation sampler indexed by world x/z
pub trait HeightField {
    /// Raw elevation at (x, z)
    fn height_at(&self, x: f32, z: f32) -> f32;

    /// Elevation with data gaps (NaN, infinities) mapped to 0
    fn sample(&self, x: f32, z: f32) -> f32 {
        let h = self.height_at(x, z);
        if h.is_finite() {
            h
        } else {
            0.0
        }
    }
}

/// Infinite flat plane at a fixed height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlatGround {
    pub height: f32,
}

impl FlatGround {
    pub const fn new(height: f32) -> Self {
        Self { height }
    }
}

impl HeightField for FlatGround {
    fn height_at(&self, _x: f32, _z: f32) -> f32 {
        self.height
    }
}

impl<F> HeightField for F
where
    F: Fn(f32, f32) -> f32,
{
    fn height_at(&self, x: f32, z: f32) -> f32 {
        self(x, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_ground() {
        let ground = FlatGround::new(2.5);
        assert_eq!(ground.sample(100.0, -40.0), 2.5);
    }

    #[test]
    fn test_closure_heightfield() {
        let ramp = |x: f32, _z: f32| x * 0.5;
        assert_eq!(ramp.sample(4.0, 0.0), 2.0);
    }

    #[test]
    fn test_data_gaps_read_as_zero() {
        let missing = |_x: f32, _z: f32| f32::NAN;
        assert_eq!(missing.sample(1.0, 1.0), 0.0);
    }
}
