//! Standings table computed from team win/loss records.

use crate::models::{Team, TeamId};
use serde::Serialize;

/// One row of the standings table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Standing {
    pub team_id: TeamId,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub matches_played: u32,
    /// 0..=100; 0 for a team that has not played.
    pub win_percentage: f64,
}

impl Standing {
    pub fn from_team(team: &Team) -> Self {
        let matches_played = team.wins + team.losses;
        let win_percentage = if matches_played > 0 {
            team.wins as f64 / matches_played as f64 * 100.0
        } else {
            0.0
        };
        Self {
            team_id: team.id,
            name: team.name.clone(),
            wins: team.wins,
            losses: team.losses,
            matches_played,
            win_percentage,
        }
    }
}

/// Rank teams: win percentage desc, then wins desc, then name (case-insensitive).
/// The sort is stable, so fully equal rows keep input order.
pub fn compute_standings(teams: &[Team]) -> Vec<Standing> {
    let mut rows: Vec<Standing> = teams.iter().map(Standing::from_team).collect();
    rows.sort_by(|a, b| {
        b.win_percentage
            .total_cmp(&a.win_percentage)
            .then(b.wins.cmp(&a.wins))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    rows
}

/// Teams in playoff seeding order: wins desc, then losses asc (stable).
pub fn seeding_order(teams: &[Team]) -> Vec<&Team> {
    let mut ordered: Vec<&Team> = teams.iter().collect();
    ordered.sort_by(|a, b| b.wins.cmp(&a.wins).then(a.losses.cmp(&b.losses)));
    ordered
}
