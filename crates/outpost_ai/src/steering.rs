//! Direct steering
//!
//! Agents move straight at their goal on the XZ plane. There is no path
//! planning; walls are handled by the collision world pushing bodies out.

use glam::Vec3;

/// Horizontal velocity toward `target` at `speed`. Zero when already there.
pub fn seek(position: Vec3, target: Vec3, speed: f32) -> Vec3 {
    let to_target = Vec3::new(target.x - position.x, 0.0, target.z - position.z);
    to_target.normalize_or_zero() * speed
}

/// Like [`seek`] but never overshoots within one step of `delta_time`
pub fn arrive(position: Vec3, target: Vec3, speed: f32, delta_time: f32) -> Vec3 {
    let distance = horizontal_distance(position, target);
    if delta_time > 0.0 && distance < speed * delta_time {
        seek(position, target, distance / delta_time)
    } else {
        seek(position, target, speed)
    }
}

/// Yaw (radians around +Y, 0 facing +Z) that faces from `from` toward `to`.
/// Returns `current` when the points coincide.
pub fn yaw_towards(from: Vec3, to: Vec3, current: f32) -> f32 {
    let dx = to.x - from.x;
    let dz = to.z - from.z;
    if dx * dx + dz * dz < 1e-8 {
        current
    } else {
        dx.atan2(dz)
    }
}

/// Distance on the XZ plane
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_seek_ignores_height() {
        let v = seek(Vec3::ZERO, Vec3::new(3.0, 10.0, 4.0), 5.0);
        assert_relative_eq!(v.x, 3.0, epsilon = 1e-5);
        assert_relative_eq!(v.z, 4.0, epsilon = 1e-5);
        assert_eq!(v.y, 0.0);
    }

    #[test]
    fn test_seek_at_target_is_zero() {
        assert_eq!(seek(Vec3::ONE, Vec3::ONE, 5.0), Vec3::ZERO);
    }

    #[test]
    fn test_arrive_does_not_overshoot() {
        let v = arrive(Vec3::ZERO, Vec3::new(0.0, 0.0, 0.1), 5.0, 0.1);
        assert_relative_eq!(v.z * 0.1, 0.1, epsilon = 1e-5);
    }

    #[test]
    fn test_yaw() {
        assert_relative_eq!(yaw_towards(Vec3::ZERO, Vec3::Z, 1.0), 0.0);
        assert_relative_eq!(yaw_towards(Vec3::ZERO, Vec3::X, 0.0), std::f32::consts::FRAC_PI_2);
        assert_eq!(yaw_towards(Vec3::ZERO, Vec3::ZERO, 0.7), 0.7);
    }
}
