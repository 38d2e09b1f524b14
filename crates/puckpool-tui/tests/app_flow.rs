// End-to-end flows through the app event loop with a scripted server.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use puckpool_core::db::Database;
use puckpool_core::model::{PlayerId, PlayerStats, SearchHit};
use puckpool_core::season::Season;
use puckpool_tui::api::{ApiError, PoolApi};
use puckpool_tui::app::{self, AppState};
use puckpool_tui::config::Config;
use puckpool_tui::protocol::{Notice, NoticeLevel, PoolSnapshot, SearchStatus, UiUpdate, UserCommand};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

// ---------------------------------------------------------------------------
// Scripted server
// ---------------------------------------------------------------------------

#[derive(Default)]
struct ScriptedApi {
    players: Vec<SearchHit>,
    points: HashMap<PlayerId, u32>,
    queries: Mutex<Vec<String>>,
}

#[async_trait]
impl PoolApi for ScriptedApi {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ApiError> {
        self.queries.lock().unwrap().push(query.to_string());
        let needle = query.to_lowercase();
        Ok(self
            .players
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn player_stats(&self, id: PlayerId, _season: &Season) -> Result<PlayerStats, ApiError> {
        let Some(hit) = self.players.iter().find(|p| p.id == id) else {
            return Err(ApiError::Status(502));
        };
        let points = self.points.get(&id).copied().unwrap_or(0);
        Ok(PlayerStats {
            id,
            name: hit.name.clone(),
            games: 82,
            goals: points / 2,
            assists: points - points / 2,
            points,
        })
    }
}

fn scripted_api() -> ScriptedApi {
    ScriptedApi {
        players: vec![
            SearchHit {
                id: 8478402,
                name: "Connor McDavid".into(),
            },
            SearchHit {
                id: 8477934,
                name: "Leon Draisaitl".into(),
            },
            SearchHit {
                id: 8479318,
                name: "Auston Matthews".into(),
            },
        ],
        points: HashMap::from([(8478402, 132), (8477934, 106), (8479318, 85)]),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

struct Harness {
    cmd_tx: mpsc::Sender<UserCommand>,
    ui_rx: mpsc::Receiver<UiUpdate>,
    notices: Vec<Notice>,
    handle: JoinHandle<anyhow::Result<()>>,
}

impl Harness {
    fn start(api: Arc<ScriptedApi>, export_dir: PathBuf) -> Self {
        let config = Config {
            server_url: "http://127.0.0.1:9".into(),
            request_timeout: Duration::from_secs(1),
            db_path: ":memory:".into(),
            export_dir,
            search_debounce: Duration::from_millis(300),
        };
        let db = Database::open(":memory:").unwrap();
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (search_tx, search_rx) = mpsc::channel(16);
        let (ui_tx, ui_rx) = mpsc::channel(256);
        let state = AppState::new(config, db, api, search_tx);
        let handle = tokio::spawn(app::run(cmd_rx, search_rx, ui_tx, state));
        Harness {
            cmd_tx,
            ui_rx,
            notices: Vec::new(),
            handle,
        }
    }

    async fn send(&self, cmd: UserCommand) {
        self.cmd_tx.send(cmd).await.unwrap();
    }

    async fn next_snapshot(&mut self) -> PoolSnapshot {
        loop {
            match self.ui_rx.recv().await.expect("ui channel closed") {
                UiUpdate::Snapshot(s) => return *s,
                UiUpdate::Notice(n) => self.notices.push(n),
                _ => {}
            }
        }
    }

    async fn next_search(&mut self) -> SearchStatus {
        loop {
            match self.ui_rx.recv().await.expect("ui channel closed") {
                UiUpdate::Search(status) => return status,
                UiUpdate::Notice(n) => self.notices.push(n),
                _ => {}
            }
        }
    }

    async fn quit(self) {
        self.cmd_tx.send(UserCommand::Quit).await.unwrap();
        self.handle.await.unwrap().unwrap();
    }
}

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("puckpool_flow_{}_{}", tag, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn typing_only_searches_the_final_query() {
    let api = Arc::new(scripted_api());
    let mut h = Harness::start(api.clone(), scratch_dir("search"));
    h.next_snapshot().await;

    h.send(UserCommand::Search("m".into())).await;
    assert_eq!(h.next_search().await, SearchStatus::Idle);
    h.send(UserCommand::Search("mc".into())).await;
    assert_eq!(h.next_search().await, SearchStatus::Pending);
    h.send(UserCommand::Search("mcd".into())).await;
    assert_eq!(h.next_search().await, SearchStatus::Pending);

    // The debounce window elapses once everything is idle.
    match h.next_search().await {
        SearchStatus::Results(hits) => {
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].name, "Connor McDavid");
        }
        other => panic!("expected results, got {other:?}"),
    }
    assert_eq!(*api.queries.lock().unwrap(), vec!["mcd".to_string()]);

    h.quit().await;
}

#[tokio::test(start_paused = true)]
async fn search_without_matches_reports_no_results() {
    let api = Arc::new(scripted_api());
    let mut h = Harness::start(api, scratch_dir("nomatch"));
    h.next_snapshot().await;

    h.send(UserCommand::Search("gretzky".into())).await;
    assert_eq!(h.next_search().await, SearchStatus::Pending);
    assert_eq!(h.next_search().await, SearchStatus::NoResults);

    h.quit().await;
}

#[tokio::test]
async fn build_a_pool_and_rank_it() {
    let api = Arc::new(scripted_api());
    let mut h = Harness::start(api, scratch_dir("rank"));
    h.next_snapshot().await;

    h.send(UserCommand::AddParticipant("Alice".into())).await;
    let snapshot = h.next_snapshot().await;
    let alice = snapshot.participants[0].id.clone();
    h.send(UserCommand::AddParticipant("Bob".into())).await;
    let snapshot = h.next_snapshot().await;
    let bob = snapshot.participants[0].id.clone();

    let picks = [(&alice, 8479318, "Auston Matthews"), (&bob, 8477934, "Leon Draisaitl")];
    for (participant_id, id, name) in picks {
        h.send(UserCommand::AddPick {
            participant_id: participant_id.clone(),
            hit: SearchHit {
                id,
                name: name.into(),
            },
        })
        .await;
        h.next_snapshot().await; // pick added
        h.next_snapshot().await; // stats refreshed
    }

    h.send(UserCommand::RefreshAll).await;
    let snapshot = h.next_snapshot().await;
    let standings: Vec<(String, u32)> = snapshot
        .ranking
        .iter()
        .map(|r| (r.name.clone(), r.total))
        .collect();
    assert_eq!(
        standings,
        vec![("Bob".to_string(), 106), ("Alice".to_string(), 85)]
    );
    assert!(h.notices.is_empty());

    h.quit().await;
}

#[tokio::test]
async fn duplicate_pick_is_reported() {
    let api = Arc::new(scripted_api());
    let mut h = Harness::start(api, scratch_dir("dup"));
    h.next_snapshot().await;

    h.send(UserCommand::AddParticipant("Alice".into())).await;
    let alice = h.next_snapshot().await.participants[0].id.clone();
    let mcdavid = SearchHit {
        id: 8478402,
        name: "Connor McDavid".into(),
    };

    h.send(UserCommand::AddPick {
        participant_id: alice.clone(),
        hit: mcdavid.clone(),
    })
    .await;
    h.next_snapshot().await;
    h.next_snapshot().await;

    h.send(UserCommand::AddPick {
        participant_id: alice,
        hit: mcdavid,
    })
    .await;
    let snapshot = h.next_snapshot().await;
    assert_eq!(snapshot.participants[0].picks.len(), 1);

    // Flush the pending notice.
    h.send(UserCommand::SetSeason(snapshot.season.clone())).await;
    h.next_snapshot().await;
    assert_eq!(h.notices.len(), 1);
    assert_eq!(h.notices[0].level, NoticeLevel::Error);

    h.quit().await;
}

#[tokio::test]
async fn export_then_import_refreshes_stats() {
    let export_dir = scratch_dir("transfer");
    let api = Arc::new(scripted_api());

    let mut source = Harness::start(api.clone(), export_dir.clone());
    source.next_snapshot().await;
    source.send(UserCommand::AddParticipant("Alice".into())).await;
    let alice = source.next_snapshot().await.participants[0].id.clone();
    source
        .send(UserCommand::AddPick {
            participant_id: alice,
            hit: SearchHit {
                id: 8478402,
                name: "Connor McDavid".into(),
            },
        })
        .await;
    source.next_snapshot().await;
    let season = source.next_snapshot().await.season;
    source.send(UserCommand::Export).await;
    source.next_snapshot().await;
    source.quit().await;

    let path = export_dir.join(format!("nhl-pool-{season}.json"));
    assert!(path.exists());

    let mut target = Harness::start(api, scratch_dir("transfer_target"));
    target.next_snapshot().await;
    target.send(UserCommand::Import(path)).await;

    let imported = target.next_snapshot().await;
    assert_eq!(imported.participants.len(), 1);
    assert_eq!(imported.participants[0].name, "Alice");

    let refreshed = target.next_snapshot().await;
    assert_eq!(refreshed.ranking[0].total, 132);
    assert_eq!(target.notices.len(), 1);
    assert_eq!(target.notices[0].level, NoticeLevel::Info);
    assert!(target.notices[0].text.contains("Imported 1"));

    target.quit().await;
    let _ = std::fs::remove_dir_all(&export_dir);
}

#[tokio::test]
async fn import_of_a_non_list_changes_nothing() {
    let dir = scratch_dir("badimport");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("bad.json");
    std::fs::write(&path, r#"{"participants": []}"#).unwrap();

    let api = Arc::new(scripted_api());
    let mut h = Harness::start(api, dir.clone());
    h.next_snapshot().await;
    h.send(UserCommand::AddParticipant("Alice".into())).await;
    h.next_snapshot().await;

    h.send(UserCommand::Import(path)).await;
    let snapshot = h.next_snapshot().await;
    assert_eq!(snapshot.participants.len(), 1);
    assert_eq!(snapshot.participants[0].name, "Alice");

    h.send(UserCommand::RefreshAll).await;
    h.next_snapshot().await;
    assert_eq!(h.notices.len(), 1);
    assert!(h.notices[0].text.starts_with("Import failed"));

    h.quit().await;
    let _ = std::fs::remove_dir_all(&dir);
}
