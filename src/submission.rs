//! Builds a new-character submission from user input.

use crate::protocol::{FeatureValue, NewCharacter};
use derive_more::{Display, Error};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::{debug, instrument};

/// One canonical feature question on the submission form.
#[derive(Debug, Clone, Copy)]
pub struct FeatureQuestion {
    /// Stable question id sent to the engine.
    pub id: &'static str,
    /// Display text.
    pub text: &'static str,
}

/// The fixed feature vocabulary for new characters.
///
/// Ids are part of the engine contract and must not change.
pub const FEATURE_QUESTIONS: &[FeatureQuestion] = &[
    FeatureQuestion { id: "is_real_person", text: "Is your character a real person?" },
    FeatureQuestion { id: "is_male", text: "Is your character male?" },
    FeatureQuestion { id: "can_fly", text: "Can your character fly?" },
    FeatureQuestion { id: "has_superpowers", text: "Does your character have superpowers?" },
    FeatureQuestion { id: "is_human", text: "Is your character human?" },
    FeatureQuestion { id: "is_villain", text: "Is your character a villain?" },
    FeatureQuestion { id: "from_marvel", text: "Is your character from Marvel?" },
    FeatureQuestion { id: "from_dc", text: "Is your character from DC?" },
    FeatureQuestion { id: "wears_mask", text: "Does your character wear a mask?" },
    FeatureQuestion { id: "has_weapon", text: "Does your character use weapons?" },
];

/// A locally rejected submission.
#[derive(Debug, Clone, Display, Error)]
pub enum SubmissionError {
    /// The character name was empty after trimming.
    #[display("character name must not be empty")]
    EmptyName,
}

/// User input for a new character, collected by the add-character form.
///
/// Call [`CharacterSheet::build`] to validate and produce the wire
/// shape; validation failures never reach the network.
#[derive(Debug, Clone, Default)]
pub struct CharacterSheet {
    /// Character name (required).
    pub name: String,
    /// Portrait URL (optional, blank means absent).
    pub image_url: String,
    /// Description (optional, blank means absent).
    pub description: String,
    /// Feature answers keyed by canonical question id.
    pub features: BTreeMap<String, FeatureValue>,
}

impl CharacterSheet {
    /// Records a feature answer.
    pub fn set_feature(&mut self, question_id: &str, value: FeatureValue) {
        self.features.insert(question_id.to_string(), value);
    }

    /// Validates the sheet and assembles the wire submission.
    ///
    /// Rejects a name that trims to empty. Blank optional fields are
    /// dropped rather than sent as empty strings.
    #[instrument(skip(self), fields(name = %self.name))]
    pub fn build(&self) -> Result<NewCharacter, SubmissionError> {
        let name = self.name.trim();
        if name.is_empty() {
            debug!("Rejecting submission with empty name");
            return Err(SubmissionError::EmptyName);
        }

        Ok(NewCharacter {
            character_id: next_character_id(),
            name: name.to_string(),
            image_url: non_blank(&self.image_url),
            description: non_blank(&self.description),
            features: self.features.clone(),
        })
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Generates a unique client-side character id.
///
/// Time-based (`c_<millis>`), bumped past the previous issue when two
/// calls land in the same millisecond, so ids never collide within a
/// process.
pub fn next_character_id() -> String {
    static LAST: AtomicI64 = AtomicI64::new(0);
    let now = chrono::Utc::now().timestamp_millis();
    let mut issued = now;
    let _ = LAST.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| {
        issued = now.max(prev + 1);
        Some(issued)
    });
    format!("c_{issued}")
}
