//! Player detection

use crate::steering::horizontal_distance;
use glam::Vec3;
use outpost_core::PlayerInfo;

/// Nearest live player strictly inside `radius` (XZ distance).
///
/// Ties keep the player that comes first in the snapshot.
pub fn nearest_live_player(position: Vec3, players: &[PlayerInfo], radius: f32) -> Option<(&PlayerInfo, f32)> {
    let mut best: Option<(&PlayerInfo, f32)> = None;
    for player in players.iter().filter(|p| p.is_alive) {
        let distance = horizontal_distance(position, player.position);
        if distance >= radius {
            continue;
        }
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((player, distance));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use outpost_core::PlayerId;

    #[test]
    fn test_nearest_live_player() {
        let players = [
            PlayerInfo::new(PlayerId(1), Vec3::new(10.0, 0.0, 0.0)),
            PlayerInfo::new(PlayerId(2), Vec3::new(4.0, 0.0, 0.0)).dead(),
            PlayerInfo::new(PlayerId(3), Vec3::new(0.0, 0.0, 6.0)),
        ];

        let (player, distance) = nearest_live_player(Vec3::ZERO, &players, 25.0).unwrap();
        assert_eq!(player.id, PlayerId(3));
        assert_eq!(distance, 6.0);
    }

    #[test]
    fn test_radius_is_strict() {
        let players = [PlayerInfo::new(PlayerId(1), Vec3::new(25.0, 0.0, 0.0))];
        assert!(nearest_live_player(Vec3::ZERO, &players, 25.0).is_none());
        assert!(nearest_live_player(Vec3::ZERO, &players, 25.1).is_some());
    }
}
