// Terminal UI: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` mirroring what the app orchestrator last sent.
// The orchestrator pushes `UiUpdate` messages over an mpsc channel; the TUI
// applies them and re-renders at ~30 fps. Key presses become `UserCommand`s.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use puckpool_core::model::{Participant, SearchHit};
use puckpool_core::ranking::RankingEntry;
use puckpool_core::season::Season;
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::protocol::{Notice, PoolSnapshot, SearchStatus, UiUpdate, UserCommand};

use layout::build_layout;

// ---------------------------------------------------------------------------
// Focus and text input
// ---------------------------------------------------------------------------

/// Which panel the arrow keys move through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Participants,
    Picks,
    Results,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Participants => Focus::Picks,
            Focus::Picks => Focus::Results,
            Focus::Results => Focus::Participants,
        }
    }
}

/// What the text input line is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    NewParticipant,
    Search,
    ImportPath,
}

impl InputKind {
    pub fn prompt(self) -> &'static str {
        match self {
            InputKind::NewParticipant => "New participant",
            InputKind::Search => "Search players (min. 2 chars)",
            InputKind::ImportPath => "Import file",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    pub kind: InputKind,
    pub buffer: String,
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state for rendering.
pub struct ViewState {
    pub season: Season,
    pub participants: Vec<Participant>,
    pub ranking: Vec<RankingEntry>,
    /// Index into `participants`.
    pub selected: usize,
    /// Index into the selected participant's picks.
    pub selected_pick: usize,
    pub focus: Focus,
    pub search: SearchStatus,
    /// Last query typed into the search box.
    pub search_query: String,
    pub selected_result: usize,
    pub input: Option<TextInput>,
    pub notice: Option<Notice>,
    pub busy: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            season: Season::current(),
            participants: Vec::new(),
            ranking: Vec::new(),
            selected: 0,
            selected_pick: 0,
            focus: Focus::default(),
            search: SearchStatus::Idle,
            search_query: String::new(),
            selected_result: 0,
            input: None,
            notice: None,
            busy: None,
        }
    }
}

impl ViewState {
    pub fn selected_participant(&self) -> Option<&Participant> {
        self.participants.get(self.selected)
    }

    pub fn search_results(&self) -> &[SearchHit] {
        match &self.search {
            SearchStatus::Results(hits) => hits,
            _ => &[],
        }
    }

    /// Apply a snapshot, keeping the same participant selected when it is
    /// still present.
    pub fn apply_snapshot(&mut self, snapshot: PoolSnapshot) {
        let selected_id = self.selected_participant().map(|p| p.id.clone());

        self.season = snapshot.season;
        self.participants = snapshot.participants;
        self.ranking = snapshot.ranking;

        self.selected = selected_id
            .and_then(|id| self.participants.iter().position(|p| p.id == id))
            .unwrap_or(0)
            .min(self.participants.len().saturating_sub(1));
        let picks = self.selected_participant().map_or(0, |p| p.picks.len());
        self.selected_pick = self.selected_pick.min(picks.saturating_sub(1));
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => state.apply_snapshot(*snapshot),
        UiUpdate::Search(status) => {
            state.search = status;
            state.selected_result = 0;
        }
        UiUpdate::Notice(notice) => state.notice = Some(notice),
        UiUpdate::Busy(label) => state.busy = label,
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete screen.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::participants::render(frame, layout.participants, state);
    widgets::ranking::render(frame, layout.ranking, state);
    widgets::picks::render(frame, layout.picks, state);
    widgets::search::render(frame, layout.search, state);
    widgets::input_line::render(frame, layout.input, state);
    widgets::help_bar::render(frame, layout.help_bar, state);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop until the user quits or the app goes away.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    // Also installs a panic hook that restores the terminal.
    let mut terminal = ratatui::init();

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // App is shutting down
                    None => break,
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
