// Endpoint logic for `/api/search` and `/api/player/:id`, independent of the
// HTTP framing in `routes`.

use std::collections::HashMap;

use puckpool_core::model::{PlayerId, PlayerStats, SearchHit};
use puckpool_core::season::Season;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;
use crate::upstream::{StatsProvider, SummaryKind, SummaryRow, UpstreamError};

/// Shortest accepted search query, in characters after trimming.
pub const MIN_QUERY_LEN: usize = 2;

/// Most search results returned to the client.
pub const MAX_SEARCH_RESULTS: usize = 100;

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Search players by (partial) name.
pub async fn search(
    provider: &dyn StatsProvider,
    raw_query: Option<&str>,
) -> Result<Vec<SearchHit>, ApiError> {
    let query = raw_query.map(str::trim).unwrap_or_default();
    if query.chars().count() < MIN_QUERY_LEN {
        return Err(ApiError::BadRequest(format!(
            "name must be at least {MIN_QUERY_LEN} characters"
        )));
    }

    let rows = provider
        .search_players(query)
        .await
        .map_err(|e| ApiError::upstream("records fetch failed", e))?;
    let hits = dedupe_hits(rows);
    debug!(query, results = hits.len(), "search complete");
    Ok(hits)
}

/// Collapse rows sharing an id. Each id keeps the position of its first
/// occurrence and the value of its last; the result is cut to
/// `MAX_SEARCH_RESULTS`.
pub fn dedupe_hits(rows: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut out: Vec<SearchHit> = Vec::with_capacity(rows.len());
    let mut positions: HashMap<PlayerId, usize> = HashMap::with_capacity(rows.len());
    for row in rows {
        if row.id == 0 || row.name.is_empty() {
            continue;
        }
        match positions.get(&row.id) {
            Some(&index) => out[index] = row,
            None => {
                positions.insert(row.id, out.len());
                out.push(row);
            }
        }
    }
    out.truncate(MAX_SEARCH_RESULTS);
    out
}

// ---------------------------------------------------------------------------
// Player stats
// ---------------------------------------------------------------------------

/// Name used when the profile endpoint gives nothing.
pub fn placeholder_name(id: PlayerId) -> String {
    format!("#{id}")
}

fn parse_player_id(raw: &str) -> Result<PlayerId, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::BadRequest("invalid id".into()));
    }
    raw.parse()
        .map_err(|_| ApiError::BadRequest("invalid id".into()))
}

/// Regular-season totals for one player in one season.
pub async fn player_stats(
    state: &AppState,
    raw_id: &str,
    raw_season: Option<&str>,
) -> Result<PlayerStats, ApiError> {
    let id = parse_player_id(raw_id)?;
    let season = Season::parse(raw_season.unwrap_or_default())
        .map_err(|_| ApiError::BadRequest("invalid season (YYYYYYYY)".into()))?;

    if season.exceeds_window((state.today)()) {
        debug!(player_id = id, %season, "season not started, returning zeros");
        return Ok(PlayerStats::zeroed(id, placeholder_name(id)));
    }

    if let Some(cached) = state.cache.get(id, &season) {
        debug!(player_id = id, %season, "stats cache hit");
        return Ok(cached);
    }

    let provider = state.provider.as_ref();
    let (name, summary) = tokio::join!(
        provider.player_name(id),
        summary_with_fallback(provider, id, &season)
    );
    let summary = summary.map_err(|e| ApiError::upstream("player stats fetch failed", e))?;

    let name = name.unwrap_or_else(|| placeholder_name(id));
    let stats = match summary {
        Some(row) => PlayerStats {
            id,
            name,
            games: row.games,
            goals: row.goals,
            assists: row.assists,
            points: row.points,
        },
        None => {
            info!(player_id = id, %season, "no skater or goalie row, using zeros");
            PlayerStats::zeroed(id, name)
        }
    };

    state.cache.insert(&season, stats.clone());
    Ok(stats)
}

/// Skater summary first; the goalie report only when the skater report has
/// no row for the player.
async fn summary_with_fallback(
    provider: &dyn StatsProvider,
    id: PlayerId,
    season: &Season,
) -> Result<Option<SummaryRow>, UpstreamError> {
    if let Some(row) = provider
        .season_summary(SummaryKind::Skater, id, season)
        .await?
    {
        return Ok(Some(row));
    }
    provider
        .season_summary(SummaryKind::Goalie, id, season)
        .await
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
