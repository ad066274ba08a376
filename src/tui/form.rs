//! The add-character form: field navigation and editing.

use crate::machine::Intent;
use crate::protocol::FeatureValue;
use crate::submission::{CharacterSheet, FEATURE_QUESTIONS};
use crossterm::event::{KeyCode, KeyEvent};

use super::input::UiCommand;

/// Number of free-text fields before the feature rows.
const TEXT_FIELDS: usize = 3;

/// Editable state of the add-character form.
///
/// Rows 0..3 are name, image URL, and description; the remaining rows
/// are the canonical feature questions.
#[derive(Debug, Default)]
pub struct FormState {
    sheet: CharacterSheet,
    cursor: usize,
}

impl FormState {
    /// The sheet as edited so far.
    pub fn sheet(&self) -> &CharacterSheet {
        &self.sheet
    }

    /// The selected row index.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Total number of rows.
    pub fn rows() -> usize {
        TEXT_FIELDS + FEATURE_QUESTIONS.len()
    }

    /// Handles a key press while the form is active.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<UiCommand> {
        match key.code {
            KeyCode::Esc => return Some(UiCommand::Intent(Intent::CancelAdd)),
            KeyCode::Enter => {
                return Some(UiCommand::Intent(Intent::SubmitCharacter(
                    self.sheet.clone(),
                )));
            }
            KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.cursor + 1 < Self::rows() {
                    self.cursor += 1;
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = self.text_field_mut() {
                    field.pop();
                }
            }
            KeyCode::Tab | KeyCode::Char(' ') if self.cursor >= TEXT_FIELDS => {
                self.cycle_feature();
            }
            KeyCode::Char(c) => {
                if let Some(field) = self.text_field_mut() {
                    field.push(c);
                } else {
                    // On feature rows, y/n/u set the value directly.
                    let value = match c {
                        'y' => Some(FeatureValue::Yes),
                        'n' => Some(FeatureValue::No),
                        'u' => Some(FeatureValue::Unknown),
                        _ => None,
                    };
                    if let Some(value) = value {
                        let id = FEATURE_QUESTIONS[self.cursor - TEXT_FIELDS].id;
                        self.sheet.set_feature(id, value);
                    }
                }
            }
            _ => {}
        }
        None
    }

    /// Display value for a feature row, if one has been chosen.
    pub fn feature_value(&self, row: usize) -> Option<FeatureValue> {
        let question = FEATURE_QUESTIONS.get(row.checked_sub(TEXT_FIELDS)?)?;
        self.sheet.features.get(question.id).copied()
    }

    fn text_field_mut(&mut self) -> Option<&mut String> {
        match self.cursor {
            0 => Some(&mut self.sheet.name),
            1 => Some(&mut self.sheet.image_url),
            2 => Some(&mut self.sheet.description),
            _ => None,
        }
    }

    fn cycle_feature(&mut self) {
        let Some(question) = FEATURE_QUESTIONS.get(self.cursor - TEXT_FIELDS) else {
            return;
        };
        let next = match self.sheet.features.get(question.id) {
            None => FeatureValue::Yes,
            Some(value) => value.next(),
        };
        self.sheet.set_feature(question.id, next);
    }
}
