// Pool records: participants, their player picks, and cached season stats.
//
// The serialized shape of these types is the persisted/exported format, so
// field names are part of the file format.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Maximum number of picks a participant may hold.
pub const MAX_PICKS: usize = 10;

/// External (NHL) player identifier.
pub type PlayerId = u64;

/// Season totals for one player, as returned by `/api/player/:id`.
///
/// Doubles as the stats snapshot cached on a [`Pick`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    #[serde(default)]
    pub id: PlayerId,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub games: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    pub goals: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    pub assists: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    pub points: u32,
}

impl PlayerStats {
    /// All-zero stats for a player, named `name`.
    pub fn zeroed(id: PlayerId, name: impl Into<String>) -> Self {
        PlayerStats {
            id,
            name: name.into(),
            games: 0,
            goals: 0,
            assists: 0,
            points: 0,
        }
    }
}

/// One row of a player search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: PlayerId,
    pub name: String,
}

/// A player picked by a participant, with the last fetched stats (if any).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    pub id: PlayerId,
    pub name: String,
    /// `None` until fetched, and after a failed refresh.
    #[serde(rename = "_stats", default)]
    pub stats: Option<PlayerStats>,
}

impl Pick {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Pick {
            id,
            name: name.into(),
            stats: None,
        }
    }

    /// Name to show for this pick: the stats snapshot's name when present.
    pub fn display_name(&self) -> &str {
        match &self.stats {
            Some(s) if !s.name.is_empty() => &s.name,
            _ => &self.name,
        }
    }

    /// Points contributed to the participant total (0 without stats).
    pub fn points(&self) -> u32 {
        self.stats.as_ref().map(|s| s.points).unwrap_or(0)
    }
}

impl From<SearchHit> for Pick {
    fn from(hit: SearchHit) -> Self {
        Pick::new(hit.id, hit.name)
    }
}

/// A pool entrant and their picks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub picks: Vec<Pick>,
}

impl Participant {
    /// Create a participant with a fresh random id and no picks.
    pub fn new(name: impl Into<String>) -> Self {
        Participant {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            picks: Vec::new(),
        }
    }

    pub fn has_pick(&self, id: PlayerId) -> bool {
        self.picks.iter().any(|p| p.id == id)
    }
}

/// Read a non-negative count from loosely typed JSON.
///
/// Numbers (fractions truncated), numeric strings and `null` are accepted;
/// negative or non-numeric values read as 0.
pub fn count_from_value(value: Option<&Value>) -> u32 {
    let n = match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f as u64),
        _ => None,
    };
    n.map(|n| n.min(u32::MAX as u64) as u32).unwrap_or(0)
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(count_from_value(value.as_ref()))
}
