// Messages between the app orchestrator and the TUI.

use std::path::PathBuf;

use puckpool_core::model::{Participant, PlayerId, SearchHit};
use puckpool_core::ranking::RankingEntry;
use puckpool_core::season::Season;

/// Commands sent from the TUI to the app orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    AddParticipant(String),
    RemoveParticipant(String),
    AddPick {
        participant_id: String,
        hit: SearchHit,
    },
    RemovePick {
        participant_id: String,
        player_id: PlayerId,
    },
    SetSeason(Season),
    /// Raw search box contents; debounced by the app.
    Search(String),
    RefreshParticipant(String),
    RefreshAll,
    Export,
    Import(PathBuf),
    Quit,
}

/// State of the search panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchStatus {
    /// Query too short; nothing shown.
    #[default]
    Idle,
    Pending,
    Results(Vec<SearchHit>),
    NoResults,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One-line message shown to the user until replaced or dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Everything the TUI needs to redraw the pool.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolSnapshot {
    pub season: Season,
    pub participants: Vec<Participant>,
    pub ranking: Vec<RankingEntry>,
}

/// Updates pushed from the app orchestrator to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    Snapshot(Box<PoolSnapshot>),
    Search(SearchStatus),
    Notice(Notice),
    /// A stats refresh is in flight (`Some(label)`) or finished (`None`).
    Busy(Option<String>),
}
