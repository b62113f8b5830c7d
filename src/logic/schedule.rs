//! Round-robin schedule (circle method).

use crate::models::{RegularMatch, Team};

/// Generate a round-robin schedule where every team meets every other team once per cycle.
///
/// 1. Odd team counts get a bye slot so the working list has even size `n`.
/// 2. Each cycle has `n - 1` rounds; in a round, slot `i` plays slot `n - 1 - i`.
///    Pairings against the bye produce no match.
/// 3. After each round the last slot moves to position 1; slot 0 stays fixed.
/// 4. Cycle `c` (0-based) offsets its round numbers by `c * (n - 1)`.
///
/// Fewer than two teams yields an empty schedule.
pub fn generate_schedule(teams: &[Team], cycles: u32) -> Vec<RegularMatch> {
    if teams.len() < 2 {
        return Vec::new();
    }

    let mut slots: Vec<Option<&Team>> = teams.iter().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }
    let n = slots.len();
    let rounds_per_cycle = (n - 1) as u32;

    let mut matches = Vec::with_capacity(cycles as usize * (n / 2) * (n - 1));
    for cycle in 0..cycles {
        let mut order = slots.clone();
        for round in 0..rounds_per_cycle {
            let round_number = cycle * rounds_per_cycle + round + 1;
            for i in 0..n / 2 {
                if let (Some(home), Some(away)) = (order[i], order[n - 1 - i]) {
                    matches.push(RegularMatch::new(
                        (home.id, home.players.as_slice()),
                        (away.id, away.players.as_slice()),
                        round_number,
                    ));
                }
            }
            if let Some(last) = order.pop() {
                order.insert(1, last);
            }
        }
    }
    matches
}
