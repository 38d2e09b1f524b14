// Application state and orchestration logic.
//
// Owns the participant collection, the selected season, local storage and
// the server client. User commands from the TUI are applied here; after each
// one the app persists the collection and pushes a fresh snapshot back to the
// TUI render loop.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::future::join_all;
use puckpool_core::db::Database;
use puckpool_core::model::{Pick, PlayerId, PlayerStats, SearchHit};
use puckpool_core::pool::{PoolError, PoolState};
use puckpool_core::ranking::{ranking, RankingEntry};
use puckpool_core::season::Season;
use puckpool_core::transfer::{self, ImportError};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::PoolApi;
use crate::config::Config;
use crate::protocol::{Notice, PoolSnapshot, SearchStatus, UiUpdate, UserCommand};
use crate::search::{SearchDebouncer, SearchEvent};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub config: Config,
    pub pool: PoolState,
    pub season: Season,
    pub db: Database,
    pub api: Arc<dyn PoolApi>,
    pub search: SearchDebouncer,
    /// Message for the user produced while handling the current command,
    /// flushed with the next snapshot.
    pub notice: Option<Notice>,
}

impl AppState {
    /// Create an app with an empty pool and the current season selected.
    pub fn new(
        config: Config,
        db: Database,
        api: Arc<dyn PoolApi>,
        search_tx: mpsc::Sender<SearchEvent>,
    ) -> Self {
        let search = SearchDebouncer::new(Arc::clone(&api), config.search_debounce, search_tx);
        AppState {
            config,
            pool: PoolState::new(Vec::new()),
            season: Season::current(),
            db,
            api,
            search,
            notice: None,
        }
    }

    /// Save the collection. A failure leaves the in-memory state as is and
    /// is reported to the user.
    pub fn persist(&mut self) {
        if let Err(e) = self.db.save_participants(self.pool.participants()) {
            warn!("Failed to save participants: {:#}", e);
            self.notice = Some(Notice::error(format!("Could not save the pool: {e:#}")));
        }
    }

    pub fn add_participant(&mut self, name: &str) -> Result<String, PoolError> {
        let id = self.pool.add_participant(name)?;
        info!("Added participant {:?}", name.trim());
        self.persist();
        Ok(id)
    }

    pub fn remove_participant(&mut self, participant_id: &str) -> bool {
        let removed = self.pool.remove_participant(participant_id);
        self.persist();
        removed
    }

    /// Append `hit` to a participant's picks. Stats are fetched separately.
    pub fn add_pick(&mut self, participant_id: &str, hit: SearchHit) -> Result<(), PoolError> {
        self.pool.add_pick(participant_id, Pick::from(hit))?;
        self.persist();
        Ok(())
    }

    pub fn remove_pick(
        &mut self,
        participant_id: &str,
        player_id: PlayerId,
    ) -> Result<bool, PoolError> {
        let removed = self.pool.remove_pick(participant_id, player_id)?;
        self.persist();
        Ok(removed)
    }

    /// Switch the active season. Returns `false` when it was already active.
    pub fn set_season(&mut self, season: Season) -> bool {
        if season == self.season {
            return false;
        }
        info!("Season changed {} -> {}", self.season, season);
        self.season = season;
        true
    }

    /// Fetch stats for every pick of one participant, concurrently, and
    /// replace the stored snapshots.
    pub async fn refresh_participant(&mut self, participant_id: &str) -> Result<(), PoolError> {
        let picks = self
            .pool
            .get(participant_id)
            .map(|p| p.picks.clone())
            .ok_or_else(|| PoolError::UnknownParticipant(participant_id.to_string()))?;

        let results = fetch_pick_stats(self.api.as_ref(), &picks, &self.season).await;
        let failed = results.iter().filter(|r| r.is_none()).count();
        debug!(
            participant_id,
            picks = picks.len(),
            failed,
            season = %self.season,
            "refreshed participant"
        );

        self.pool.apply_stats(participant_id, results)?;
        self.persist();
        Ok(())
    }

    /// Refresh every participant, one after another.
    pub async fn refresh_all(&mut self) {
        let ids: Vec<String> = self.pool.participants().iter().map(|p| p.id.clone()).collect();
        for id in ids {
            if let Err(e) = self.refresh_participant(&id).await {
                warn!("Refresh of {} skipped: {}", id, e);
            }
        }
    }

    pub fn ranking(&self) -> Vec<RankingEntry> {
        ranking(self.pool.participants())
    }

    /// Write the collection to `<export_dir>/nhl-pool-<season>.json`.
    pub fn export(&self) -> anyhow::Result<PathBuf> {
        transfer::write_export(
            &self.config.export_dir,
            &self.season,
            self.pool.participants(),
        )
    }

    /// Replace the collection with the contents of an export file. On error
    /// nothing changes.
    pub fn import(&mut self, path: &Path) -> Result<usize, ImportError> {
        let participants = transfer::read_import(path)?;
        let count = participants.len();
        self.pool.replace_all(participants);
        info!("Imported {} participants from {}", count, path.display());
        self.persist();
        Ok(count)
    }

    pub fn build_snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            season: self.season.clone(),
            participants: self.pool.participants().to_vec(),
            ranking: self.ranking(),
        }
    }
}

/// One stats request per pick, all in flight together. A failed request
/// yields `None` at that pick's position.
pub async fn fetch_pick_stats(
    api: &dyn PoolApi,
    picks: &[Pick],
    season: &Season,
) -> Vec<Option<PlayerStats>> {
    let requests = picks.iter().map(|pick| async move {
        match api.player_stats(pick.id, season).await {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!(player_id = pick.id, "stats request failed: {}", e);
                None
            }
        }
    });
    join_all(requests).await
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the application event loop until `Quit` or until the TUI goes away.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut search_rx: mpsc::Receiver<SearchEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");
    publish(&mut state, &ui_tx).await;

    let mut search_open = true;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            event = search_rx.recv(), if search_open => {
                match event {
                    Some(event) => handle_search_event(&state, event, &ui_tx).await,
                    None => search_open = false,
                }
            }
        }
    }

    state.search.cancel();
    info!("Application event loop exiting");
    Ok(())
}

/// Push the current snapshot, plus any pending notice.
async fn publish(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let snapshot = state.build_snapshot();
    let _ = ui_tx.send(UiUpdate::Snapshot(Box::new(snapshot))).await;
    if let Some(notice) = state.notice.take() {
        let _ = ui_tx.send(UiUpdate::Notice(notice)).await;
    }
}

async fn handle_search_event(state: &AppState, event: SearchEvent, ui_tx: &mpsc::Sender<UiUpdate>) {
    if !state.search.is_current(event.generation) {
        debug!("Discarding stale search result (gen {})", event.generation);
        return;
    }
    let _ = ui_tx.send(UiUpdate::Search(event.status)).await;
}

async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::AddParticipant(name) => {
            if let Err(e) = state.add_participant(&name) {
                state.notice = Some(Notice::error(e.to_string()));
            }
        }
        UserCommand::RemoveParticipant(id) => {
            state.remove_participant(&id);
        }
        UserCommand::AddPick {
            participant_id,
            hit,
        } => match state.add_pick(&participant_id, hit) {
            Ok(()) => {
                publish(state, ui_tx).await;
                refresh_with_progress(state, &participant_id, ui_tx).await;
            }
            Err(e) => state.notice = Some(Notice::error(e.to_string())),
        },
        UserCommand::RemovePick {
            participant_id,
            player_id,
        } => {
            if let Err(e) = state.remove_pick(&participant_id, player_id) {
                state.notice = Some(Notice::error(e.to_string()));
            }
        }
        UserCommand::SetSeason(season) => {
            if state.set_season(season) {
                publish(state, ui_tx).await;
                refresh_all_with_progress(state, ui_tx).await;
            }
        }
        UserCommand::Search(query) => {
            let status = if state.search.schedule(&query) {
                SearchStatus::Pending
            } else {
                SearchStatus::Idle
            };
            let _ = ui_tx.send(UiUpdate::Search(status)).await;
            return;
        }
        UserCommand::RefreshParticipant(id) => {
            refresh_with_progress(state, &id, ui_tx).await;
        }
        UserCommand::RefreshAll => {
            refresh_all_with_progress(state, ui_tx).await;
        }
        UserCommand::Export => match state.export() {
            Ok(path) => {
                info!("Exported pool to {}", path.display());
                state.notice = Some(Notice::info(format!("Exported to {}", path.display())));
            }
            Err(e) => {
                warn!("Export failed: {:#}", e);
                state.notice = Some(Notice::error(format!("Export failed: {e:#}")));
            }
        },
        UserCommand::Import(path) => match state.import(&path) {
            Ok(count) => {
                let notice = state
                    .notice
                    .take()
                    .unwrap_or_else(|| Notice::info(format!("Imported {count} participants")));
                state.notice = Some(notice);
                publish(state, ui_tx).await;
                refresh_all_with_progress(state, ui_tx).await;
            }
            Err(e) => {
                warn!("Import of {} failed: {}", path.display(), e);
                state.notice = Some(Notice::error(format!("Import failed: {e}")));
            }
        },
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }

    publish(state, ui_tx).await;
}

async fn refresh_with_progress(
    state: &mut AppState,
    participant_id: &str,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    let Some(name) = state.pool.get(participant_id).map(|p| p.name.clone()) else {
        return;
    };
    let _ = ui_tx
        .send(UiUpdate::Busy(Some(format!("Refreshing {name}..."))))
        .await;
    if let Err(e) = state.refresh_participant(participant_id).await {
        state.notice = Some(Notice::error(e.to_string()));
    }
    let _ = ui_tx.send(UiUpdate::Busy(None)).await;
}

async fn refresh_all_with_progress(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    if state.pool.is_empty() {
        return;
    }
    let _ = ui_tx
        .send(UiUpdate::Busy(Some(format!(
            "Refreshing {} participants for {}...",
            state.pool.len(),
            state.season.label()
        ))))
        .await;
    state.refresh_all().await;
    let _ = ui_tx.send(UiUpdate::Busy(None)).await;
}

// ---------------------------------------------------------------------------
// Startup recovery
// ---------------------------------------------------------------------------

/// Load the stored collection into `state`. Returns whether anything was
/// restored.
pub fn recover_from_db(state: &mut AppState) -> anyhow::Result<bool> {
    let participants = state.db.load_participants()?;
    if participants.is_empty() {
        info!("No stored participants, starting with an empty pool");
        return Ok(false);
    }
    info!("Restored {} participants from storage", participants.len());
    state.pool.replace_all(participants);
    Ok(true)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
