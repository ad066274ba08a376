//! The client session state machine.
//!
//! One play-through moves through four phases: `Idle` → `Playing` →
//! `Guessing` → (`Adding` →) `Idle`. Every user intent is handed to
//! [`GameMachine::handle`], which calls the engine where the
//! transition table requires it and computes the next [`Snapshot`].
//! Presentation layers only read the snapshot and emit intents; they
//! never mutate state directly.

use crate::client::Engine;
use crate::protocol::{
    Alternative, Answer, AnswerRequest, AnswerResponse, Candidate, ConfirmRequest,
    GuessedCharacter, Question,
};
use crate::submission::CharacterSheet;
use derive_getters::Getters;
use tracing::{debug, info, instrument, warn};

/// Default question ceiling shown before the engine supplies one.
pub const DEFAULT_MAX_QUESTIONS: u32 = 20;

/// The phase of the current play-through. No other states are reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No session; waiting for the player to start.
    Idle,
    /// A session is live and a question is pending.
    Playing,
    /// The engine has made a terminal guess.
    Guessing,
    /// The player rejected the guess and is describing the real character.
    Adding,
}

impl Phase {
    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Playing => "playing",
            Phase::Guessing => "guessing",
            Phase::Adding => "adding",
        }
    }
}

/// A discrete user action delivered to the state machine.
///
/// This is the whole contract a presentation layer needs to satisfy.
#[derive(Debug, Clone)]
pub enum Intent {
    /// Start a new game.
    Start,
    /// Answer the current question.
    Answer(Answer),
    /// The engine's guess was right.
    ConfirmCorrect,
    /// The engine's guess was wrong; move to the add-character form.
    ConfirmIncorrect,
    /// Submit the described character and close out the session.
    SubmitCharacter(CharacterSheet),
    /// Abandon the add-character form and reset.
    CancelAdd,
    /// Abandon the play-through entirely.
    Reset,
}

/// The state machine's current data, exposed read-only to views.
///
/// Invariants held after every transition: a session id exists exactly
/// when the phase is not [`Phase::Idle`]; a current question exists
/// exactly in [`Phase::Playing`]; a guessed character exists exactly
/// in [`Phase::Guessing`].
#[derive(Debug, Clone, Getters)]
pub struct Snapshot {
    /// Current phase.
    phase: Phase,
    /// Opaque session token, present while a play-through is live.
    session_id: Option<String>,
    /// The pending question while playing.
    question: Option<Question>,
    /// Questions asked so far.
    questions_asked: u32,
    /// Engine-supplied question ceiling (display only).
    max_questions: u32,
    /// Top-ranked candidates after the last answer (display only).
    top_candidates: Vec<Candidate>,
    /// The engine's terminal guess while guessing.
    guessed_character: Option<GuessedCharacter>,
    /// Secondary candidates alongside the guess.
    alternatives: Vec<Alternative>,
    /// True while an engine call is in flight; views disable controls.
    busy: bool,
    /// The last failure, shown until the next successful action or reset.
    last_error: Option<String>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            session_id: None,
            question: None,
            questions_asked: 0,
            max_questions: DEFAULT_MAX_QUESTIONS,
            top_candidates: Vec::new(),
            guessed_character: None,
            alternatives: Vec::new(),
            busy: false,
            last_error: None,
        }
    }
}

impl Snapshot {
    /// Progress through the question budget as a ratio in 0..=1.
    ///
    /// Clamped so display stays sane even if the engine reports more
    /// questions asked than its own ceiling.
    pub fn progress(&self) -> f64 {
        if self.max_questions == 0 {
            return 0.0;
        }
        (f64::from(self.questions_asked) / f64::from(self.max_questions)).clamp(0.0, 1.0)
    }
}

/// Drives one play-through against an [`Engine`].
///
/// At most one engine call is in flight at a time: `handle` awaits the
/// call it issues, and intents that are invalid for the current phase
/// are ignored, so a repeated trigger cannot produce a duplicate
/// request.
#[derive(Debug)]
pub struct GameMachine<E: Engine> {
    engine: E,
    snapshot: Snapshot,
}

impl<E: Engine> GameMachine<E> {
    /// Creates an idle machine over the given engine.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            snapshot: Snapshot::default(),
        }
    }

    /// The latest state snapshot.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Applies one user intent, calling the engine where the
    /// transition requires it.
    ///
    /// On any engine failure the machine stays in its pre-call phase
    /// and records the error message; there is no partial transition
    /// and no automatic retry.
    #[instrument(skip(self, intent), fields(phase = self.snapshot.phase.label()))]
    pub async fn handle(&mut self, intent: Intent) {
        if self.snapshot.busy {
            debug!(?intent, "Ignoring intent while a call is in flight");
            return;
        }

        match (self.snapshot.phase, intent) {
            (_, Intent::Reset) => {
                info!("Resetting play-through");
                self.reset();
            }
            (Phase::Idle, Intent::Start) => self.start().await,
            (Phase::Playing, Intent::Answer(answer)) => self.answer(answer).await,
            (Phase::Guessing, Intent::ConfirmCorrect) => self.confirm_correct().await,
            (Phase::Guessing, Intent::ConfirmIncorrect) => {
                // Local transition only; the engine hears about the
                // rejection when the replacement character is submitted.
                info!("Guess rejected, switching to add-character");
                self.snapshot.guessed_character = None;
                self.snapshot.alternatives.clear();
                self.snapshot.phase = Phase::Adding;
            }
            (Phase::Adding, Intent::SubmitCharacter(sheet)) => self.submit_character(&sheet).await,
            (Phase::Adding, Intent::CancelAdd) => {
                info!("Add-character cancelled");
                self.reset();
            }
            (phase, intent) => {
                debug!(phase = phase.label(), ?intent, "Intent not valid in this phase");
            }
        }
    }

    /// Starts a new session.
    async fn start(&mut self) {
        self.begin_call();
        let result = self.engine.start_game().await;
        self.snapshot.busy = false;

        match result {
            Ok(started) => {
                info!(
                    session_id = %started.session_id,
                    max_questions = started.max_questions,
                    "Game started"
                );
                self.snapshot.session_id = Some(started.session_id);
                self.snapshot.question = Some(started.question);
                self.snapshot.questions_asked = started.questions_asked;
                self.snapshot.max_questions = started.max_questions;
                self.snapshot.phase = Phase::Playing;
            }
            Err(e) => {
                warn!(error = %e, "Failed to start game");
                self.snapshot.last_error = Some(e.to_string());
            }
        }
    }

    /// Submits an answer to the current question.
    async fn answer(&mut self, answer: Answer) {
        let (Some(session_id), Some(question)) =
            (self.snapshot.session_id.clone(), self.snapshot.question.clone())
        else {
            warn!("Answer intent without a live question");
            return;
        };

        let request = AnswerRequest {
            session_id,
            question_id: question.question_id,
            answer,
        };

        self.begin_call();
        let result = self.engine.submit_answer(&request).await;
        self.snapshot.busy = false;

        match result {
            Ok(AnswerResponse::Question {
                question,
                questions_asked,
                top_candidates,
            }) => {
                debug!(
                    question_id = %question.question_id,
                    questions_asked,
                    candidates = top_candidates.len(),
                    "Next question received"
                );
                self.snapshot.question = Some(question);
                self.snapshot.questions_asked = questions_asked;
                self.snapshot.top_candidates = top_candidates;
            }
            Ok(AnswerResponse::Guess {
                character,
                alternatives,
            }) => {
                info!(name = %character.name, "Engine made a guess");
                self.snapshot.question = None;
                self.snapshot.guessed_character = Some(character);
                self.snapshot.alternatives = alternatives;
                self.snapshot.phase = Phase::Guessing;
            }
            Err(e) => {
                warn!(error = %e, "Failed to submit answer");
                self.snapshot.last_error = Some(e.to_string());
            }
        }
    }

    /// Confirms the guess as correct and closes the session.
    async fn confirm_correct(&mut self) {
        let Some(session_id) = self.snapshot.session_id.clone() else {
            warn!("Confirm intent without a session");
            return;
        };

        let request = ConfirmRequest {
            session_id,
            was_correct: true,
            correct_character_id: None,
        };

        self.begin_call();
        let result = self.engine.confirm_guess(&request).await;
        self.snapshot.busy = false;

        match result {
            Ok(()) => {
                info!("Guess confirmed correct, session closed");
                self.reset();
            }
            Err(e) => {
                warn!(error = %e, "Failed to confirm guess");
                self.snapshot.last_error = Some(e.to_string());
            }
        }
    }

    /// Registers the user's character, then confirms the guess as
    /// incorrect referencing it, in that order.
    ///
    /// Either call failing is a unit failure: the machine stays in
    /// `Adding` with the error surfaced, even though a registered
    /// character persists engine-side for future games. The session
    /// must not look cleanly closed when it is not.
    async fn submit_character(&mut self, sheet: &CharacterSheet) {
        let Some(session_id) = self.snapshot.session_id.clone() else {
            warn!("Submit intent without a session");
            return;
        };

        // Local validation: an empty name never reaches the network.
        let character = match sheet.build() {
            Ok(c) => c,
            Err(e) => {
                debug!(error = %e, "Submission rejected locally");
                self.snapshot.last_error = Some(e.to_string());
                return;
            }
        };

        self.begin_call();
        let result = self.engine.add_character(&character).await;

        let result = match result {
            Ok(()) => {
                let request = ConfirmRequest {
                    session_id,
                    was_correct: false,
                    correct_character_id: Some(character.character_id.clone()),
                };
                self.engine.confirm_guess(&request).await
            }
            Err(e) => Err(e),
        };
        self.snapshot.busy = false;

        match result {
            Ok(()) => {
                info!(name = %character.name, "Character added and guess rejection confirmed");
                self.reset();
            }
            Err(e) => {
                warn!(error = %e, "Add-character sequence failed");
                self.snapshot.last_error = Some(e.to_string());
            }
        }
    }

    /// Marks a call in flight and clears the previous error.
    fn begin_call(&mut self) {
        self.snapshot.busy = true;
        self.snapshot.last_error = None;
    }

    /// Discards all play-through state, returning to idle.
    fn reset(&mut self) {
        self.snapshot = Snapshot::default();
    }
}
