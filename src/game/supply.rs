//! Supply network: which owned planets can trace a path back home.
//!
//! Edges join two planets of the same owner whose centres are within the
//! supply range. Connectivity is rebuilt from scratch on every call with a
//! breadth-first search from each living player's home.

use std::collections::VecDeque;

use crate::game::{Planet, Player, PlayerId};

/// Recompute `connected` for every planet.
///
/// Every planet is first marked disconnected. Players whose home planet is
/// no longer theirs are eliminated and skipped; everyone else floods out from
/// home across owned planets within `range` of the frontier.
///
/// Returns the players eliminated by this pass, so the caller can report them.
pub fn recompute_supply(
    planets: &mut [Planet],
    players: &mut [Player],
    range: f64,
) -> Vec<PlayerId> {
    for planet in planets.iter_mut() {
        planet.connected = false;
    }

    let mut queue = VecDeque::new();
    let mut eliminated = Vec::new();

    for player in players.iter_mut() {
        if !player.alive {
            continue;
        }

        let home = player.home as usize;
        if planets.get(home).is_none_or(|p| !p.is_owned_by(player.id)) {
            tracing::debug!(player = player.id, "home lost, eliminated during supply pass");
            player.eliminate();
            eliminated.push(player.id);
            continue;
        }

        planets[home].connected = true;
        queue.clear();
        queue.push_back(home);

        while let Some(current) = queue.pop_front() {
            let (cx, cy) = (planets[current].x, planets[current].y);
            for next in planets.iter_mut() {
                if next.connected || !next.is_owned_by(player.id) {
                    continue;
                }
                if (next.x - cx).hypot(next.y - cy) <= range {
                    next.connected = true;
                    queue.push_back(next.id as usize);
                }
            }
        }
    }
    eliminated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::PlanetSize;

    fn planet(id: u32, x: f64, owner: Option<u8>) -> Planet {
        let mut p = Planet::new(id, PlanetSize::Small, x, 0.0);
        p.owner = owner;
        p
    }

    #[test]
    fn test_chain_within_range_connects() {
        let mut planets = vec![
            planet(0, 0.0, Some(0)),
            planet(1, 300.0, Some(0)),
            planet(2, 600.0, Some(0)),
        ];
        let mut players = vec![Player::new(0, 0)];

        recompute_supply(&mut planets, &mut players, 350.0);
        assert!(planets.iter().all(|p| p.connected));
    }

    #[test]
    fn test_gap_breaks_chain() {
        let mut planets = vec![
            planet(0, 0.0, Some(0)),
            planet(1, 300.0, Some(0)),
            planet(2, 1000.0, Some(0)),
        ];
        let mut players = vec![Player::new(0, 0)];

        recompute_supply(&mut planets, &mut players, 350.0);
        assert!(planets[0].connected);
        assert!(planets[1].connected);
        assert!(!planets[2].connected);
    }

    #[test]
    fn test_enemy_planets_do_not_bridge() {
        let mut planets = vec![
            planet(0, 0.0, Some(0)),
            planet(1, 300.0, Some(1)),
            planet(2, 600.0, Some(0)),
            planet(3, 900.0, Some(1)),
        ];
        let mut players = vec![Player::new(0, 0), Player::new(1, 3)];

        recompute_supply(&mut planets, &mut players, 350.0);
        assert!(planets[0].connected);
        assert!(!planets[2].connected, "own planet only reachable through an enemy");
        assert!(planets[3].connected);
        assert!(!planets[1].connected, "enemy planet only reachable through us");
    }

    #[test]
    fn test_neutral_never_connected() {
        let mut planets = vec![planet(0, 0.0, Some(0)), planet(1, 100.0, None)];
        planets[1].connected = true;
        let mut players = vec![Player::new(0, 0)];

        recompute_supply(&mut planets, &mut players, 350.0);
        assert!(!planets[1].connected);
    }

    #[test]
    fn test_lost_home_eliminates_player() {
        let mut planets = vec![planet(0, 0.0, Some(1)), planet(1, 100.0, Some(0))];
        let mut players = vec![Player::new(0, 0), Player::new(1, 0)];

        let eliminated = recompute_supply(&mut planets, &mut players, 350.0);
        assert_eq!(eliminated, vec![0]);
        assert!(!players[0].alive);
        assert!(!planets[1].connected, "dead players get no supply");
        assert!(players[1].alive);

        // Already dead, so not reported again
        assert!(recompute_supply(&mut planets, &mut players, 350.0).is_empty());
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut planets = vec![
            planet(0, 0.0, Some(0)),
            planet(1, 200.0, Some(0)),
            planet(2, 900.0, Some(0)),
            planet(3, 1200.0, Some(1)),
        ];
        let mut players = vec![Player::new(0, 0), Player::new(1, 3)];

        recompute_supply(&mut planets, &mut players, 350.0);
        let first: Vec<bool> = planets.iter().map(|p| p.connected).collect();
        recompute_supply(&mut planets, &mut players, 350.0);
        let second: Vec<bool> = planets.iter().map(|p| p.connected).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_range_is_inclusive() {
        let mut planets = vec![planet(0, 0.0, Some(0)), planet(1, 350.0, Some(0))];
        let mut players = vec![Player::new(0, 0)];

        recompute_supply(&mut planets, &mut players, 350.0);
        assert!(planets[1].connected);
    }
}
