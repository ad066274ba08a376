//! Wire types shared with the guessing engine.
//!
//! Field names follow the engine's JSON contract exactly (camelCase on
//! the wire), so every struct here is a faithful mirror of one request
//! or response body. Closed value sets are real enums: an unrecognized
//! answer or response tag fails at decode instead of rendering wrong.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::EnumIter;

/// A user's response to a question, from the engine's fixed five-value set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    /// Definitely true.
    Yes,
    /// Leaning true.
    Probably,
    /// The player doesn't know.
    Unknown,
    /// Leaning false.
    ProbablyNot,
    /// Definitely false.
    No,
}

impl Answer {
    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Answer::Yes => "Yes",
            Answer::Probably => "Probably",
            Answer::Unknown => "Don't Know",
            Answer::ProbablyNot => "Probably Not",
            Answer::No => "No",
        }
    }
}

/// A feature value on a submitted character (three-value set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureValue {
    /// The character has the feature.
    Yes,
    /// The character lacks the feature.
    No,
    /// The submitter doesn't know.
    Unknown,
}

impl FeatureValue {
    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            FeatureValue::Yes => "Yes",
            FeatureValue::No => "No",
            FeatureValue::Unknown => "Unknown",
        }
    }

    /// Cycles to the next value (for form toggling).
    pub fn next(&self) -> Self {
        match self {
            FeatureValue::Yes => FeatureValue::No,
            FeatureValue::No => FeatureValue::Unknown,
            FeatureValue::Unknown => FeatureValue::Yes,
        }
    }
}

/// One pending question from the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Opaque identifier, echoed back when answering.
    pub question_id: String,
    /// Display text.
    pub text: String,
}

/// A ranked guess shown during play.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Character name.
    pub name: String,
    /// Engine confidence in 0..1.
    pub probability: f64,
}

/// The engine's terminal guess.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessedCharacter {
    /// Character name.
    pub name: String,
    /// Optional portrait URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Optional blurb.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A secondary candidate shown alongside a terminal guess.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alternative {
    /// Character name.
    pub name: String,
}

/// Response to `POST /game/start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    /// Opaque session token for the new play-through.
    pub session_id: String,
    /// The first question to ask.
    pub question: Question,
    /// Questions asked so far (usually 1 at start).
    pub questions_asked: u32,
    /// Engine's question ceiling for this session.
    pub max_questions: u32,
}

/// Request body for `POST /game/answer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    /// Active session token.
    pub session_id: String,
    /// The question being answered.
    pub question_id: String,
    /// The chosen answer.
    pub answer: Answer,
}

/// Response to `POST /game/answer` — either the next question or a guess.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum AnswerResponse {
    /// The engine wants to ask another question.
    Question {
        /// The next question.
        question: Question,
        /// Updated count of questions asked.
        questions_asked: u32,
        /// Current top-ranked candidates (may be empty or unsorted).
        #[serde(default)]
        top_candidates: Vec<Candidate>,
    },
    /// The engine is ready to guess.
    Guess {
        /// The guessed character.
        character: GuessedCharacter,
        /// Secondary candidates.
        #[serde(default)]
        alternatives: Vec<Alternative>,
    },
}

/// Request body for `POST /game/confirm`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    /// Active session token.
    pub session_id: String,
    /// Whether the engine's guess was right.
    pub was_correct: bool,
    /// The actual character, required when `was_correct` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_character_id: Option<String>,
}

/// Request body for `POST /game/character` — a user-authored character.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCharacter {
    /// Client-generated unique id.
    pub character_id: String,
    /// Character name (validated non-empty before sending).
    pub name: String,
    /// Optional portrait URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Optional blurb.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Feature answers keyed by canonical question id.
    pub features: BTreeMap<String, FeatureValue>,
}

/// Response to `GET /admin/stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStats {
    /// Total games played.
    pub total_games: u64,
    /// Characters known to the engine.
    pub total_characters: u64,
    /// Questions in the engine's pool.
    pub total_questions: u64,
    /// Percentage of games guessed correctly.
    pub success_rate: f64,
}

/// Extra display data attached to a stored character.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterMetadata {
    /// Optional portrait URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Optional blurb.
    #[serde(default)]
    pub description: Option<String>,
}

/// A stored character, as listed by `GET /admin/characters`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    /// Engine-side character id.
    pub character_id: String,
    /// Character name.
    pub name: String,
    /// How often the engine guessed this character.
    #[serde(default)]
    pub times_guessed: u64,
    /// How often that guess was confirmed correct.
    #[serde(default)]
    pub times_correct: u64,
    /// Optional display metadata.
    #[serde(default)]
    pub metadata: Option<CharacterMetadata>,
}

/// Response to `GET /admin/characters`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterList {
    /// All stored characters.
    pub characters: Vec<CharacterRecord>,
}

/// A question in the engine's pool, as listed by `GET /admin/questions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    /// Engine-side question id.
    pub question_id: String,
    /// Question text.
    pub text: String,
    /// Optional category.
    #[serde(default)]
    pub category: Option<String>,
    /// How often the engine asked this question.
    #[serde(default)]
    pub times_asked: u64,
    /// The engine's information-gain score for the question.
    #[serde(default)]
    pub information_value: f64,
}

/// Response to `GET /admin/questions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionList {
    /// All pool questions.
    pub questions: Vec<QuestionRecord>,
}

/// Request body for `POST /admin/question`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    /// Question text.
    pub text: String,
    /// Optional category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}
