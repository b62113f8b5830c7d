//! Single binary web server: static front-end from STATIC_DIR, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST, PORT, DATA_DIR (JSON documents instead of memory),
//! SESSION_KEY (32+ bytes), COOKIE_SECURE, STATIC_DIR.

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    delete, get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use cup_tournament_web::{
    players_csv, service, standings_csv, JsonFileStore, MatchId, MemoryStore, NewTournament,
    ResultEntry, Store, TeamId, TournamentError, TournamentId,
};
use serde::Deserialize;
use uuid::Uuid;

type AppState = Data<Store>;

/// Session key holding the caller's opaque owner id.
const OWNER_KEY: &str = "owner_id";

/// Server settings read from the environment.
#[derive(Clone, Debug)]
struct ServerConfig {
    host: String,
    port: u16,
    data_dir: Option<String>,
    session_key: Option<String>,
    cookie_secure: bool,
    static_dir: String,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| default_host()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(default_port),
            data_dir: std::env::var("DATA_DIR").ok().filter(|d| !d.trim().is_empty()),
            session_key: std::env::var("SESSION_KEY").ok(),
            cookie_secure: std::env::var("COOKIE_SECURE")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            static_dir: std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()),
        }
    }

    /// Cookie signing key; a random one (sessions lost on restart) if none or too short.
    fn session_key(&self) -> Key {
        match self.session_key.as_deref() {
            Some(k) if k.len() >= 32 => Key::derive_from(k.as_bytes()),
            Some(_) => {
                log::warn!("SESSION_KEY shorter than 32 bytes; using a random key");
                Key::generate()
            }
            None => {
                log::warn!("SESSION_KEY not set; sessions will not survive a restart");
                Key::generate()
            }
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct EnterPlayoffsBody {
    bracket_size: usize,
    #[serde(default = "default_best_of")]
    best_of: u32,
}

fn default_best_of() -> u32 {
    3
}

#[derive(Deserialize)]
struct SelectGameBody {
    game_index: usize,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and regular match id
#[derive(Deserialize)]
struct MatchPath {
    id: TournamentId,
    match_id: MatchId,
}

/// Path segments: tournament id and team id
#[derive(Deserialize)]
struct TeamPath {
    id: TournamentId,
    team_id: TeamId,
}

/// Path segments: tournament id and playoff series id
#[derive(Deserialize)]
struct SeriesPath {
    id: TournamentId,
    series_id: MatchId,
}

/// Path segments: tournament id, series id and 0-based game index
#[derive(Deserialize)]
struct GamePath {
    id: TournamentId,
    series_id: MatchId,
    game_index: usize,
}

/// Path segments: tournament id and 1-based round number
#[derive(Deserialize)]
struct RoundPath {
    id: TournamentId,
    round: u32,
}

/// Owner id for this session, minted on first use.
fn owner_id(session: &Session) -> Result<String, HttpResponse> {
    match session.get::<String>(OWNER_KEY) {
        Ok(Some(id)) => Ok(id),
        Ok(None) => {
            let id = Uuid::new_v4().to_string();
            session.insert(OWNER_KEY, &id).map_err(|e| {
                log::error!("Failed to store owner id in session: {}", e);
                HttpResponse::InternalServerError().body("session error")
            })?;
            Ok(id)
        }
        Err(e) => {
            log::warn!("Unreadable session: {}", e);
            session.purge();
            Err(HttpResponse::BadRequest().json(serde_json::json!({ "error": "Invalid session" })))
        }
    }
}

/// Not found -> 404, storage -> 500, everything else is a validation error -> 400.
fn error_response(e: TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    if e.is_not_found() {
        HttpResponse::NotFound().json(body)
    } else if e.is_storage() {
        log::error!("{}", e);
        HttpResponse::InternalServerError().json(body)
    } else {
        HttpResponse::BadRequest().json(body)
    }
}

fn respond<T: serde::Serialize>(result: Result<T, TournamentError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(e),
    }
}

fn csv_response(result: Result<String, TournamentError>, filename: &str) -> HttpResponse {
    match result {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", filename),
            ))
            .body(body),
        Err(e) => error_response(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "cup-tournament-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// List the caller's tournaments, most recently visited first.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState, session: Session) -> HttpResponse {
    let owner = match owner_id(&session) {
        Ok(o) => o,
        Err(resp) => return resp,
    };
    respond(service::list_tournaments(state.get_ref(), &owner).await)
}

/// Create a tournament with its schedule (or bracket, for playoff-only).
#[post("/api/tournaments")]
async fn api_create_tournament(
    state: AppState,
    session: Session,
    body: Json<NewTournament>,
) -> HttpResponse {
    let owner = match owner_id(&session) {
        Ok(o) => o,
        Err(resp) => return resp,
    };
    respond(service::create_tournament(state.get_ref(), &owner, body.into_inner()).await)
}

/// Get a tournament by id (404 if not found). Touching it refreshes last_visited.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, session: Session, path: Path<TournamentPath>) -> HttpResponse {
    let owner = match owner_id(&session) {
        Ok(o) => o,
        Err(resp) => return resp,
    };
    respond(service::get_tournament(state.get_ref(), &owner, path.id).await)
}

#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(
    state: AppState,
    session: Session,
    path: Path<TournamentPath>,
) -> HttpResponse {
    let owner = match owner_id(&session) {
        Ok(o) => o,
        Err(resp) => return resp,
    };
    match service::delete_tournament(state.get_ref(), &owner, path.id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(e),
    }
}

/// A single regular match or playoff series, tagged by `kind`.
#[get("/api/tournaments/{id}/matches/{match_id}")]
async fn api_get_match(state: AppState, session: Session, path: Path<MatchPath>) -> HttpResponse {
    let owner = match owner_id(&session) {
        Ok(o) => o,
        Err(resp) => return resp,
    };
    match service::find_tournament(state.get_ref(), &owner, path.id).await {
        Ok(t) => match t.find_match(path.match_id) {
            Some(m) => HttpResponse::Ok().json(m),
            None => error_response(TournamentError::MatchNotFound(path.match_id)),
        },
        Err(e) => error_response(e),
    }
}

/// Every regular match and playoff series a team takes part in.
#[get("/api/tournaments/{id}/teams/{team_id}/matches")]
async fn api_team_matches(state: AppState, session: Session, path: Path<TeamPath>) -> HttpResponse {
    let owner = match owner_id(&session) {
        Ok(o) => o,
        Err(resp) => return resp,
    };
    match service::find_tournament(state.get_ref(), &owner, path.id).await {
        Ok(t) => HttpResponse::Ok().json(t.matches_for_team(path.team_id)),
        Err(e) => error_response(e),
    }
}

/// Record or correct a regular-season result.
#[put("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_record_match_result(
    state: AppState,
    session: Session,
    path: Path<MatchPath>,
    body: Json<ResultEntry>,
) -> HttpResponse {
    let owner = match owner_id(&session) {
        Ok(o) => o,
        Err(resp) => return resp,
    };
    respond(
        service::record_regular_match_result(state.get_ref(), &owner, path.id, path.match_id, &body)
            .await,
    )
}

/// Re-pair doubles teams at random (before any result).
#[post("/api/tournaments/{id}/teams/reshuffle")]
async fn api_reshuffle_teams(
    state: AppState,
    session: Session,
    path: Path<TournamentPath>,
) -> HttpResponse {
    let owner = match owner_id(&session) {
        Ok(o) => o,
        Err(resp) => return resp,
    };
    respond(service::reshuffle_teams(state.get_ref(), &owner, path.id).await)
}

/// Close the regular season and seed the bracket.
#[post("/api/tournaments/{id}/playoffs")]
async fn api_enter_playoffs(
    state: AppState,
    session: Session,
    path: Path<TournamentPath>,
    body: Json<EnterPlayoffsBody>,
) -> HttpResponse {
    let owner = match owner_id(&session) {
        Ok(o) => o,
        Err(resp) => return resp,
    };
    respond(
        service::enter_playoffs(state.get_ref(), &owner, path.id, body.bracket_size, body.best_of)
            .await,
    )
}

/// Record or correct one game of a playoff series.
#[put("/api/tournaments/{id}/series/{series_id}/games/{game_index}")]
async fn api_record_playoff_game(
    state: AppState,
    session: Session,
    path: Path<GamePath>,
    body: Json<ResultEntry>,
) -> HttpResponse {
    let owner = match owner_id(&session) {
        Ok(o) => o,
        Err(resp) => return resp,
    };
    respond(
        service::record_playoff_game_result(
            state.get_ref(),
            &owner,
            path.id,
            path.series_id,
            path.game_index,
            &body,
        )
        .await,
    )
}

/// Move a series' current-game cursor.
#[put("/api/tournaments/{id}/series/{series_id}/current-game")]
async fn api_select_game(
    state: AppState,
    session: Session,
    path: Path<SeriesPath>,
    body: Json<SelectGameBody>,
) -> HttpResponse {
    let owner = match owner_id(&session) {
        Ok(o) => o,
        Err(resp) => return resp,
    };
    respond(
        service::select_game(state.get_ref(), &owner, path.id, path.series_id, body.game_index)
            .await,
    )
}

/// Generate the next round from the winners of `round`.
#[post("/api/tournaments/{id}/rounds/{round}/advance")]
async fn api_advance_round(state: AppState, session: Session, path: Path<RoundPath>) -> HttpResponse {
    let owner = match owner_id(&session) {
        Ok(o) => o,
        Err(resp) => return resp,
    };
    respond(service::advance_playoff_round(state.get_ref(), &owner, path.id, path.round).await)
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, session: Session, path: Path<TournamentPath>) -> HttpResponse {
    let owner = match owner_id(&session) {
        Ok(o) => o,
        Err(resp) => return resp,
    };
    respond(service::get_standings(state.get_ref(), &owner, path.id).await)
}

#[get("/api/tournaments/{id}/standings.csv")]
async fn api_standings_csv(
    state: AppState,
    session: Session,
    path: Path<TournamentPath>,
) -> HttpResponse {
    let owner = match owner_id(&session) {
        Ok(o) => o,
        Err(resp) => return resp,
    };
    let result = service::get_standings(state.get_ref(), &owner, path.id)
        .await
        .and_then(|rows| standings_csv(&rows));
    csv_response(result, "standings.csv")
}

#[get("/api/tournaments/{id}/players/stats")]
async fn api_player_stats(
    state: AppState,
    session: Session,
    path: Path<TournamentPath>,
) -> HttpResponse {
    let owner = match owner_id(&session) {
        Ok(o) => o,
        Err(resp) => return resp,
    };
    respond(service::get_player_stats(state.get_ref(), &owner, path.id).await)
}

#[get("/api/tournaments/{id}/players/stats.csv")]
async fn api_player_stats_csv(
    state: AppState,
    session: Session,
    path: Path<TournamentPath>,
) -> HttpResponse {
    let owner = match owner_id(&session) {
        Ok(o) => o,
        Err(resp) => return resp,
    };
    let result = service::get_player_stats(state.get_ref(), &owner, path.id)
        .await
        .and_then(|lines| players_csv(&lines));
    csv_response(result, "players.csv")
}

/// API routes (shared by the server and the route tests).
fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(favicon)
        .service(api_list_tournaments)
        .service(api_create_tournament)
        .service(api_standings_csv)
        .service(api_player_stats_csv)
        .service(api_standings)
        .service(api_player_stats)
        .service(api_get_tournament)
        .service(api_delete_tournament)
        .service(api_get_match)
        .service(api_team_matches)
        .service(api_record_match_result)
        .service(api_reshuffle_teams)
        .service(api_enter_playoffs)
        .service(api_record_playoff_game)
        .service(api_select_game)
        .service(api_advance_round);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let store = match &config.data_dir {
        Some(dir) => {
            log::info!("Storing tournaments as JSON documents in {}", dir);
            let file_store = JsonFileStore::open(dir)
                .await
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            Store::File(file_store)
        }
        None => {
            log::info!("DATA_DIR not set; tournaments are kept in memory");
            Store::Memory(MemoryStore::new())
        }
    };
    let state = Data::new(store);
    let key = config.session_key();

    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let static_dir = config.static_dir.clone();
    let cookie_secure = config.cookie_secure;
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
                    .cookie_secure(cookie_secure)
                    .build(),
            )
            .configure(configure_api)
            .service(Files::new("/", static_dir.clone()).index_file("index.html"))
    })
    .bind(bind)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{cookie::Cookie, http::StatusCode, test};
    use serde_json::{json, Value};

    fn session() -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
            .cookie_secure(false)
            .build()
    }

    fn session_cookie<B>(resp: &actix_web::dev::ServiceResponse<B>) -> Option<Cookie<'static>> {
        resp.response()
            .cookies()
            .find(|c| c.name() == "id")
            .map(|c| c.into_owned())
    }

    #[actix_web::test]
    async fn health_reports_ok() {
        let app = test::init_service(App::new().configure(configure_api)).await;
        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["ok"], json!(true));
    }

    #[actix_web::test]
    async fn create_then_fetch_with_same_session() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(Store::Memory(MemoryStore::new())))
                .wrap(session())
                .configure(configure_api),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/tournaments")
            .set_json(json!({
                "name": "Friday league",
                "format": "singles",
                "matches_per_team": 2,
                "type": "regular+playoffs",
                "players": ["Ann", "Bob", "Cy"]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = session_cookie(&resp).expect("session cookie");
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["regular_matches"].as_array().map(Vec::len), Some(6));
        let id = created["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri(&format!("/api/tournaments/{id}"))
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        // Another session does not see it.
        let req = test::TestRequest::get()
            .uri(&format!("/api/tournaments/{id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let match_id = created["regular_matches"][0]["id"].as_str().unwrap().to_string();
        let req = test::TestRequest::get()
            .uri(&format!("/api/tournaments/{id}/matches/{match_id}"))
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let fixture: Value = test::read_body_json(resp).await;
        assert_eq!(fixture["kind"], json!("regular"));
        assert_eq!(fixture["round"], json!(1));

        let req = test::TestRequest::get()
            .uri(&format!("/api/tournaments/{id}/standings.csv"))
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).starts_with("rank,team,wins"));
    }

    #[actix_web::test]
    async fn validation_errors_are_bad_requests() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(Store::Memory(MemoryStore::new())))
                .wrap(session())
                .configure(configure_api),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/api/tournaments")
            .set_json(json!({
                "name": "Bracket",
                "format": "singles",
                "matches_per_team": 3,
                "type": "playoffs",
                "players": ["Ann", "Bob", "Cy"]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("2, 4, 8 or 16"));
    }
}
