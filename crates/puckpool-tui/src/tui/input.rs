// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the app
// orchestrator, or into local ViewState changes (focus, selection, the text
// input line).

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{Focus, InputKind, TextInput, ViewState};
use crate::protocol::{Notice, UserCommand};

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator, `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // crossterm reports both Press and Release on some platforms.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.input.is_some() {
        return handle_text_input(key_event, view_state);
    }

    match key_event.code {
        KeyCode::Char('q') => Some(UserCommand::Quit),

        KeyCode::Tab => {
            view_state.focus = view_state.focus.next();
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            move_selection(view_state, -1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_selection(view_state, 1);
            None
        }

        KeyCode::Char('a') => {
            open_input(view_state, InputKind::NewParticipant, String::new());
            None
        }
        KeyCode::Char('/') => {
            let query = view_state.search_query.clone();
            open_input(view_state, InputKind::Search, query);
            view_state.focus = Focus::Results;
            None
        }
        KeyCode::Char('i') => {
            open_input(view_state, InputKind::ImportPath, String::new());
            None
        }
        KeyCode::Char('e') => Some(UserCommand::Export),

        KeyCode::Char('r') => view_state
            .selected_participant()
            .map(|p| UserCommand::RefreshParticipant(p.id.clone())),
        KeyCode::Char('R') => Some(UserCommand::RefreshAll),

        // Season picker: previous / selected / next
        KeyCode::Char(c @ '1'..='3') => {
            let idx = c as usize - '1' as usize;
            let choice = view_state.season.picker_choices()[idx].clone();
            (choice != view_state.season).then_some(UserCommand::SetSeason(choice))
        }

        KeyCode::Enter => add_selected_result(view_state),

        KeyCode::Char('d') | KeyCode::Delete => remove_selected(view_state),

        KeyCode::Esc => {
            view_state.notice = None;
            None
        }

        _ => None,
    }
}

fn open_input(view_state: &mut ViewState, kind: InputKind, buffer: String) {
    view_state.input = Some(TextInput { kind, buffer });
}

/// Handle a key while the input line is open.
///
/// Every edit of the search box is forwarded so the app can debounce it.
fn handle_text_input(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let input = view_state.input.as_mut()?;
    let kind = input.kind;

    match key_event.code {
        KeyCode::Esc => {
            view_state.input = None;
            if kind == InputKind::Search {
                view_state.search_query.clear();
                return Some(UserCommand::Search(String::new()));
            }
            None
        }
        KeyCode::Enter => {
            let text = input.buffer.trim().to_string();
            view_state.input = None;
            match kind {
                InputKind::NewParticipant => Some(UserCommand::AddParticipant(text)),
                InputKind::Search => {
                    view_state.focus = Focus::Results;
                    None
                }
                InputKind::ImportPath if text.is_empty() => None,
                InputKind::ImportPath => Some(UserCommand::Import(PathBuf::from(text))),
            }
        }
        KeyCode::Backspace => {
            input.buffer.pop();
            search_edit(view_state, kind)
        }
        KeyCode::Char(c) => {
            input.buffer.push(c);
            search_edit(view_state, kind)
        }
        _ => None,
    }
}

fn search_edit(view_state: &mut ViewState, kind: InputKind) -> Option<UserCommand> {
    if kind != InputKind::Search {
        return None;
    }
    let query = view_state.input.as_ref()?.buffer.clone();
    view_state.search_query = query.clone();
    Some(UserCommand::Search(query))
}

fn move_selection(view_state: &mut ViewState, delta: isize) {
    let (len, current) = match view_state.focus {
        Focus::Participants => (view_state.participants.len(), &mut view_state.selected),
        Focus::Picks => (
            view_state
                .participants
                .get(view_state.selected)
                .map_or(0, |p| p.picks.len()),
            &mut view_state.selected_pick,
        ),
        Focus::Results => {
            let len = view_state.search_results().len();
            (len, &mut view_state.selected_result)
        }
    };
    if len == 0 {
        *current = 0;
        return;
    }
    *current = current.saturating_add_signed(delta).min(len - 1);

    if view_state.focus == Focus::Participants {
        view_state.selected_pick = 0;
    }
}

fn add_selected_result(view_state: &mut ViewState) -> Option<UserCommand> {
    if view_state.focus != Focus::Results {
        return None;
    }
    let hit = view_state
        .search_results()
        .get(view_state.selected_result)
        .cloned()?;
    match view_state.selected_participant() {
        Some(participant) => Some(UserCommand::AddPick {
            participant_id: participant.id.clone(),
            hit,
        }),
        None => {
            view_state.notice = Some(Notice::error("Add a participant first"));
            None
        }
    }
}

fn remove_selected(view_state: &mut ViewState) -> Option<UserCommand> {
    let participant = view_state.selected_participant()?;
    match view_state.focus {
        Focus::Participants => Some(UserCommand::RemoveParticipant(participant.id.clone())),
        Focus::Picks => participant
            .picks
            .get(view_state.selected_pick)
            .map(|pick| UserCommand::RemovePick {
                participant_id: participant.id.clone(),
                player_id: pick.id,
            }),
        Focus::Results => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
