//! Key-to-intent mapping for the non-form screens.

use crate::machine::{Intent, Phase};
use crate::protocol::Answer;
use crossterm::event::KeyCode;

/// What a key press asks the UI layer to do.
#[derive(Debug, Clone)]
pub enum UiCommand {
    /// Hand an intent to the state machine.
    Intent(Intent),
    /// Leave the TUI.
    Quit,
}

/// Maps a key to a command for the idle, playing, and guessing screens.
///
/// The adding screen has its own form handling in [`super::form`].
pub fn map_key(phase: Phase, key: KeyCode) -> Option<UiCommand> {
    // Global keys first.
    match key {
        KeyCode::Char('q') | KeyCode::Esc => return Some(UiCommand::Quit),
        KeyCode::Char('r') => return Some(UiCommand::Intent(Intent::Reset)),
        _ => {}
    }

    match phase {
        Phase::Idle => match key {
            KeyCode::Enter | KeyCode::Char('s') => Some(UiCommand::Intent(Intent::Start)),
            _ => None,
        },
        Phase::Playing => answer_key(key).map(|a| UiCommand::Intent(Intent::Answer(a))),
        Phase::Guessing => match key {
            KeyCode::Char('y') => Some(UiCommand::Intent(Intent::ConfirmCorrect)),
            KeyCode::Char('n') => Some(UiCommand::Intent(Intent::ConfirmIncorrect)),
            _ => None,
        },
        // Handled by the form, not here.
        Phase::Adding => None,
    }
}

/// Maps the number row to the five answer values.
fn answer_key(key: KeyCode) -> Option<Answer> {
    match key {
        KeyCode::Char('1') => Some(Answer::Yes),
        KeyCode::Char('2') => Some(Answer::Probably),
        KeyCode::Char('3') => Some(Answer::Unknown),
        KeyCode::Char('4') => Some(Answer::ProbablyNot),
        KeyCode::Char('5') => Some(Answer::No),
        _ => None,
    }
}
