// Client for the public NHL APIs: player records search, player profile
// (display name) and skater/goalie season summaries.
//
// `StatsProvider` is the seam the proxy logic is written against; `NhlClient`
// is the real implementation. The JSON helpers below are pure so the payload
// handling can be tested without the network.

use async_trait::async_trait;
use puckpool_core::model::{count_from_value, PlayerId, SearchHit};
use puckpool_core::season::Season;
use reqwest::header::USER_AGENT;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::UpstreamConfig;

/// Name used when a records row carries no usable name.
const UNKNOWN_PLAYER_NAME: &str = "Unknown";

/// Regular-season game type in the stats API's `gameTypeId`.
const REGULAR_SEASON: u8 = 2;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("upstream payload could not be decoded: {0}")]
    Decode(String),
}

impl UpstreamError {
    /// The upstream HTTP status, when the provider answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status(code) => Some(*code),
            _ => None,
        }
    }
}

/// Which season summary report to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    Skater,
    Goalie,
}

impl SummaryKind {
    fn path(self) -> &'static str {
        match self {
            SummaryKind::Skater => "skater",
            SummaryKind::Goalie => "goalie",
        }
    }
}

/// Aggregated regular-season totals from a summary report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SummaryRow {
    pub games: u32,
    pub goals: u32,
    pub assists: u32,
    pub points: u32,
}

/// Source of player data for the proxy endpoints.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// Players whose full name contains `name`, in provider order. Rows may
    /// repeat the same id.
    async fn search_players(&self, name: &str) -> Result<Vec<SearchHit>, UpstreamError>;

    /// Best-effort display name. Any failure yields `None`.
    async fn player_name(&self, id: PlayerId) -> Option<String>;

    /// Regular-season totals for `id` in `season`, or `None` when the report
    /// has no row for the player.
    async fn season_summary(
        &self,
        kind: SummaryKind,
        id: PlayerId,
        season: &Season,
    ) -> Result<Option<SummaryRow>, UpstreamError>;
}

// ---------------------------------------------------------------------------
// NhlClient
// ---------------------------------------------------------------------------

/// `StatsProvider` backed by the public NHL endpoints.
pub struct NhlClient {
    http: reqwest::Client,
    config: UpstreamConfig,
}

impl NhlClient {
    /// Build a client whose every request is bounded by the configured
    /// timeout.
    pub fn new(config: UpstreamConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { http, config })
    }

    async fn get_json(&self, request: reqwest::RequestBuilder) -> Result<Value, UpstreamError> {
        let response = request
            .header(USER_AGENT, &self.config.user_agent)
            .send()
            .await
            .map_err(UpstreamError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %truncate(&body, 200), "upstream error response");
            return Err(UpstreamError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

#[async_trait]
impl StatsProvider for NhlClient {
    async fn search_players(&self, name: &str) -> Result<Vec<SearchHit>, UpstreamError> {
        let request = self
            .http
            .get(&self.config.records_url)
            .query(&[("cayenneExp", name_filter(name))]);
        let body = self.get_json(request).await?;
        let hits = parse_search_rows(&body);
        debug!(query = name, rows = hits.len(), "records search");
        Ok(hits)
    }

    async fn player_name(&self, id: PlayerId) -> Option<String> {
        let url = format!("{}/{}/landing", self.config.profile_url, id);
        match self.get_json(self.http.get(url)).await {
            Ok(body) => parse_landing_name(&body),
            Err(e) => {
                debug!(player_id = id, "profile lookup failed: {}", e);
                None
            }
        }
    }

    async fn season_summary(
        &self,
        kind: SummaryKind,
        id: PlayerId,
        season: &Season,
    ) -> Result<Option<SummaryRow>, UpstreamError> {
        let url = format!("{}/{}/summary", self.config.stats_url, kind.path());
        let request = self.http.get(url).query(&summary_query(id, season));
        let body = self.get_json(request).await?;
        Ok(parse_summary_row(&body))
    }
}

// ---------------------------------------------------------------------------
// Query builders
// ---------------------------------------------------------------------------

/// Cayenne substring filter on the player's full name. Double quotes would
/// end the string literal early, so they are dropped.
pub(crate) fn name_filter(name: &str) -> String {
    let cleaned: String = name.chars().filter(|c| *c != '"').collect();
    format!("fullName like \"%{cleaned}%\"")
}

/// Query parameters for an aggregated regular-season summary of one player.
pub(crate) fn summary_query(id: PlayerId, season: &Season) -> Vec<(&'static str, String)> {
    vec![
        ("isAggregate", "true".to_string()),
        ("isGame", "false".to_string()),
        (
            "sort",
            r#"[{"property":"playerId","direction":"ASC"}]"#.to_string(),
        ),
        ("limit", "100".to_string()),
        (
            "cayenneExp",
            format!("seasonId={season} and gameTypeId={REGULAR_SEASON} and playerId={id}"),
        ),
    ]
}

// ---------------------------------------------------------------------------
// Payload parsing helpers
// ---------------------------------------------------------------------------

/// Map records rows to search hits.
///
/// Expected shape: `{ "data": [ { "playerId": 8478402, "fullName": "..." } ] }`.
/// The id falls back to `id`, the name to `name`. Rows without a usable id
/// are dropped.
pub(crate) fn parse_search_rows(body: &Value) -> Vec<SearchHit> {
    let Some(rows) = body.get("data").and_then(Value::as_array) else {
        return Vec::new();
    };

    rows.iter()
        .filter_map(|row| {
            let id = row
                .get("playerId")
                .filter(|v| !v.is_null())
                .or_else(|| row.get("id"))
                .and_then(player_id_from_value)?;
            let name = ["fullName", "name"]
                .iter()
                .filter_map(|key| row.get(*key).and_then(Value::as_str))
                .map(str::trim)
                .find(|s| !s.is_empty())
                .unwrap_or(UNKNOWN_PLAYER_NAME)
                .to_string();
            Some(SearchHit { id, name })
        })
        .collect()
}

/// Display name from a player landing payload.
///
/// Expected shape: `{ "firstName": { "default": "Connor" }, "lastName": { "default": "McDavid" } }`,
/// falling back to a plain `name` string.
pub(crate) fn parse_landing_name(body: &Value) -> Option<String> {
    let first = body.pointer("/firstName/default").and_then(Value::as_str);
    let last = body.pointer("/lastName/default").and_then(Value::as_str);

    if first.is_some() || last.is_some() {
        let combined = format!(
            "{} {}",
            first.unwrap_or("").trim(),
            last.unwrap_or("").trim()
        );
        let combined = combined.trim();
        return (!combined.is_empty()).then(|| combined.to_string());
    }

    body.get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// First row of a summary report.
///
/// Expected shape: `{ "data": [ { "gamesPlayed": 82, "goals": 32, "assists": 100, "points": 132 } ] }`.
/// Missing counts read as 0; a missing `points` is goals + assists.
pub(crate) fn parse_summary_row(body: &Value) -> Option<SummaryRow> {
    let row = body.get("data")?.as_array()?.first()?;
    let goals = count_from_value(row.get("goals"));
    let assists = count_from_value(row.get("assists"));
    let points = match row.get("points") {
        Some(v) if !v.is_null() => count_from_value(Some(v)),
        _ => goals.saturating_add(assists),
    };
    Some(SummaryRow {
        games: count_from_value(row.get("gamesPlayed")),
        goals,
        assists,
        points,
    })
}

fn player_id_from_value(value: &Value) -> Option<PlayerId> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|id| *id != 0)
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- records search --

    #[test]
    fn search_rows_map_player_id_and_full_name() {
        let body = json!({
            "data": [
                { "playerId": 8478402, "fullName": "Connor McDavid", "position": "C" },
                { "id": 8477934, "name": "Leon Draisaitl" }
            ],
            "total": 2
        });
        let hits = parse_search_rows(&body);
        assert_eq!(
            hits,
            vec![
                SearchHit { id: 8478402, name: "Connor McDavid".into() },
                SearchHit { id: 8477934, name: "Leon Draisaitl".into() },
            ]
        );
    }

    #[test]
    fn search_rows_keep_duplicates_for_the_caller() {
        let body = json!({ "data": [
            { "playerId": 1, "fullName": "A" },
            { "playerId": 1, "fullName": "A2" }
        ]});
        assert_eq!(parse_search_rows(&body).len(), 2);
    }

    #[test]
    fn search_rows_without_id_are_dropped() {
        let body = json!({ "data": [
            { "fullName": "No Id" },
            { "playerId": 0, "fullName": "Zero" },
            { "playerId": "x", "fullName": "Bad" },
            { "playerId": "42", "fullName": "String Id" }
        ]});
        let hits = parse_search_rows(&body);
        assert_eq!(hits, vec![SearchHit { id: 42, name: "String Id".into() }]);
    }

    #[test]
    fn search_row_without_name_gets_placeholder() {
        let body = json!({ "data": [ { "playerId": 7, "fullName": "" } ] });
        assert_eq!(parse_search_rows(&body)[0].name, UNKNOWN_PLAYER_NAME);
    }

    #[test]
    fn search_body_without_data_is_empty() {
        assert!(parse_search_rows(&json!({})).is_empty());
        assert!(parse_search_rows(&json!({ "data": "nope" })).is_empty());
    }

    #[test]
    fn name_filter_wraps_query_and_strips_quotes() {
        assert_eq!(name_filter("mcdav"), "fullName like \"%mcdav%\"");
        assert_eq!(name_filter("o\"reilly"), "fullName like \"%oreilly%\"");
    }

    // -- landing --

    #[test]
    fn landing_name_joins_first_and_last() {
        let body = json!({
            "firstName": { "default": "Connor" },
            "lastName": { "default": " McDavid " }
        });
        assert_eq!(parse_landing_name(&body), Some("Connor McDavid".into()));
    }

    #[test]
    fn landing_name_with_only_last_name() {
        let body = json!({ "lastName": { "default": "Ovechkin" } });
        assert_eq!(parse_landing_name(&body), Some("Ovechkin".into()));
    }

    #[test]
    fn landing_name_falls_back_to_plain_name() {
        assert_eq!(
            parse_landing_name(&json!({ "name": "Sidney Crosby" })),
            Some("Sidney Crosby".into())
        );
        assert_eq!(parse_landing_name(&json!({ "playerId": 1 })), None);
    }

    #[test]
    fn landing_name_blank_parts_give_none() {
        let body = json!({ "firstName": { "default": " " }, "lastName": { "default": "" } });
        assert_eq!(parse_landing_name(&body), None);
    }

    // -- summary --

    #[test]
    fn summary_row_reads_first_row() {
        let body = json!({ "data": [
            { "playerId": 8478402, "gamesPlayed": 82, "goals": 32, "assists": 100, "points": 132 },
            { "playerId": 8478402, "gamesPlayed": 1, "goals": 1, "assists": 1, "points": 2 }
        ]});
        assert_eq!(
            parse_summary_row(&body),
            Some(SummaryRow { games: 82, goals: 32, assists: 100, points: 132 })
        );
    }

    #[test]
    fn summary_points_default_to_goals_plus_assists() {
        let body = json!({ "data": [ { "gamesPlayed": 10, "goals": 3, "assists": 4 } ] });
        assert_eq!(parse_summary_row(&body).unwrap().points, 7);
        let body = json!({ "data": [ { "goals": 3, "assists": 4, "points": null } ] });
        assert_eq!(parse_summary_row(&body).unwrap().points, 7);
    }

    #[test]
    fn summary_missing_counts_are_zero() {
        let body = json!({ "data": [ { "gamesPlayed": 60, "wins": 30 } ] });
        assert_eq!(
            parse_summary_row(&body),
            Some(SummaryRow { games: 60, goals: 0, assists: 0, points: 0 })
        );
    }

    #[test]
    fn summary_without_rows_is_none() {
        assert_eq!(parse_summary_row(&json!({ "data": [] })), None);
        assert_eq!(parse_summary_row(&json!({ "total": 0 })), None);
    }

    #[test]
    fn summary_query_filters_season_game_type_and_player() {
        let season = Season::parse("20242025").unwrap();
        let query = summary_query(8478402, &season);
        let cayenne = query
            .iter()
            .find(|(k, _)| *k == "cayenneExp")
            .map(|(_, v)| v.as_str())
            .unwrap();
        assert_eq!(cayenne, "seasonId=20242025 and gameTypeId=2 and playerId=8478402");
        assert!(query.contains(&("isAggregate", "true".to_string())));
        assert!(query.contains(&("limit", "100".to_string())));
    }

    #[test]
    fn upstream_error_exposes_status() {
        assert_eq!(UpstreamError::Status(503).status(), Some(503));
        assert_eq!(UpstreamError::Decode("x".into()).status(), None);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("äöå", 2), "äö");
        assert_eq!(truncate("abc", 10), "abc");
    }
}
