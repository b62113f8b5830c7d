//! Setup: validate the roster, form teams, and build the initial schedule or bracket.

use crate::logic::playoffs::{build_initial_round, validate_best_of, validate_bracket_size};
use crate::logic::schedule::generate_schedule;
use crate::models::{
    Bracket, Format, Phase, Player, Team, TeamId, Tournament, TournamentError, TournamentType,
};
use chrono::Utc;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

/// Most round-robin cycles a regular season may repeat.
pub const MAX_CYCLES: u32 = 10;

/// Everything needed to create a tournament.
#[derive(Clone, Debug, Deserialize)]
pub struct NewTournament {
    pub name: String,
    #[serde(default)]
    pub format: Format,
    pub matches_per_team: u32,
    #[serde(default, rename = "type")]
    pub kind: TournamentType,
    /// Player names in entry order.
    pub players: Vec<String>,
    /// Doubles only: shuffle players before pairing them into teams.
    #[serde(default)]
    pub random_teams: bool,
}

/// Create a tournament owned by `owner_id`.
///
/// Regular+playoffs tournaments start in the regular phase with a round-robin schedule
/// repeated `matches_per_team` times. Playoff-only tournaments start in the playoffs with
/// every team seeded in entry order and series of `matches_per_team` games.
pub fn create_tournament(
    owner_id: impl Into<String>,
    new: NewTournament,
) -> Result<Tournament, TournamentError> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(TournamentError::EmptyName);
    }
    if new.matches_per_team == 0
        || (new.kind == TournamentType::RegularPlusPlayoffs && new.matches_per_team > MAX_CYCLES)
    {
        return Err(TournamentError::InvalidMatchesPerTeam);
    }
    let players = roster(&new.players)?;
    validate_player_count(new.format, players.len())?;

    let teams = form_teams(&players, new.format, new.random_teams);
    if teams.len() < 2 {
        return Err(TournamentError::NotEnoughTeams);
    }

    let mut tournament = Tournament {
        id: Uuid::new_v4(),
        owner_id: owner_id.into(),
        name: name.to_string(),
        format: new.format,
        matches_per_team: new.matches_per_team,
        kind: new.kind,
        phase: Phase::Regular,
        teams,
        players,
        regular_matches: Vec::new(),
        bracket: None,
        playoff_seed_map: None,
        created_at: Utc::now(),
        last_visited: None,
    };

    match new.kind {
        TournamentType::RegularPlusPlayoffs => {
            tournament.regular_matches =
                generate_schedule(&tournament.teams, tournament.matches_per_team);
        }
        TournamentType::Playoffs => {
            validate_best_of(new.matches_per_team)?;
            validate_bracket_size(tournament.teams.len(), tournament.teams.len())?;
            let seeded: Vec<&Team> = tournament.teams.iter().collect();
            let first_round = build_initial_round(&seeded, seeded.len(), new.matches_per_team);
            tournament.playoff_seed_map = Some(seed_map(&seeded));
            tournament.bracket = Some(Bracket::new(new.matches_per_team, first_round));
            tournament.phase = Phase::Playoffs;
        }
    }

    log::info!(
        "Created tournament {} ({:?}, {:?}) with {} teams",
        tournament.id,
        tournament.kind,
        tournament.format,
        tournament.teams.len()
    );
    Ok(tournament)
}

/// Re-pair doubles teams at random and rebuild the schedule. Only before any result is in.
pub fn reshuffle_teams(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.format != Format::Doubles
        || tournament.kind != TournamentType::RegularPlusPlayoffs
        || tournament.phase != Phase::Regular
    {
        return Err(TournamentError::WrongPhase);
    }
    if tournament.regular_matches.iter().any(|m| m.result.completed) {
        return Err(TournamentError::MatchesAlreadyPlayed);
    }
    tournament.teams = form_teams(&tournament.players, tournament.format, true);
    tournament.regular_matches = generate_schedule(&tournament.teams, tournament.matches_per_team);
    log::info!("Reshuffled doubles teams for tournament {}", tournament.id);
    Ok(())
}

/// Seed map for teams in seed order (first = seed 1).
pub(crate) fn seed_map(seeded: &[&Team]) -> HashMap<TeamId, u32> {
    seeded
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id, i as u32 + 1))
        .collect()
}

fn roster(names: &[String]) -> Result<Vec<Player>, TournamentError> {
    let mut players: Vec<Player> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::EmptyName);
        }
        if players.iter().any(|p| p.name.eq_ignore_ascii_case(name)) {
            return Err(TournamentError::DuplicatePlayerName(name.to_string()));
        }
        players.push(Player::new(name));
    }
    Ok(players)
}

fn validate_player_count(format: Format, count: usize) -> Result<(), TournamentError> {
    let ok = match format {
        Format::Singles => count >= 2,
        Format::Doubles => count >= 4 && count % 2 == 0,
    };
    if ok {
        Ok(())
    } else {
        Err(TournamentError::InvalidPlayerCount { format, count })
    }
}

fn form_teams(players: &[Player], format: Format, shuffle: bool) -> Vec<Team> {
    let mut order: Vec<&Player> = players.iter().collect();
    if shuffle && format == Format::Doubles {
        order.shuffle(&mut rand::thread_rng());
    }
    order
        .chunks_exact(format.team_size())
        .map(Team::from_players)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_in_entry_order_pairs_neighbours() {
        let players: Vec<Player> = ["Ann", "Bob", "Cy", "Dee"].into_iter().map(Player::new).collect();
        let teams = form_teams(&players, Format::Doubles, false);
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].name, "Ann & Bob");
        assert_eq!(teams[1].name, "Cy & Dee");
        assert_eq!(teams[1].players, vec![players[2].id, players[3].id]);
    }

    #[test]
    fn duplicate_names_are_rejected_case_insensitively() {
        let names = vec!["Ann".to_string(), "ann ".to_string()];
        assert!(matches!(
            roster(&names),
            Err(TournamentError::DuplicatePlayerName(_))
        ));
    }
}
