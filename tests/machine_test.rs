//! Tests for the session state machine against a scripted engine.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use twentyq::client::{Engine, TransportError};
use twentyq::machine::{GameMachine, Intent, Phase, Snapshot};
use twentyq::protocol::{
    Alternative, Answer, AnswerRequest, AnswerResponse, Candidate, ConfirmRequest, FeatureValue,
    GuessedCharacter, NewCharacter, Question, StartResponse,
};
use twentyq::submission::CharacterSheet;

/// One observed engine call, in order.
#[derive(Debug, Clone, PartialEq)]
enum Call {
    Start,
    Answer(Answer),
    Confirm {
        was_correct: bool,
        correct_character_id: Option<String>,
    },
    AddCharacter {
        character_id: String,
        name: String,
    },
}

/// Engine double that records calls and replays scripted results.
#[derive(Debug, Clone, Default)]
struct MockEngine {
    calls: Arc<Mutex<Vec<Call>>>,
    start_results: Arc<Mutex<VecDeque<Result<StartResponse, TransportError>>>>,
    answer_results: Arc<Mutex<VecDeque<Result<AnswerResponse, TransportError>>>>,
    confirm_results: Arc<Mutex<VecDeque<Result<(), TransportError>>>>,
    add_results: Arc<Mutex<VecDeque<Result<(), TransportError>>>>,
}

impl MockEngine {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn push_start(&self, result: Result<StartResponse, TransportError>) {
        self.start_results.lock().expect("lock").push_back(result);
    }

    fn push_answer(&self, result: Result<AnswerResponse, TransportError>) {
        self.answer_results.lock().expect("lock").push_back(result);
    }

    fn push_confirm(&self, result: Result<(), TransportError>) {
        self.confirm_results.lock().expect("lock").push_back(result);
    }

    fn push_add(&self, result: Result<(), TransportError>) {
        self.add_results.lock().expect("lock").push_back(result);
    }
}

#[async_trait]
impl Engine for MockEngine {
    async fn start_game(&self) -> Result<StartResponse, TransportError> {
        self.calls.lock().expect("lock").push(Call::Start);
        self.start_results
            .lock()
            .expect("lock")
            .pop_front()
            .expect("unscripted start_game call")
    }

    async fn submit_answer(
        &self,
        request: &AnswerRequest,
    ) -> Result<AnswerResponse, TransportError> {
        self.calls
            .lock()
            .expect("lock")
            .push(Call::Answer(request.answer));
        self.answer_results
            .lock()
            .expect("lock")
            .pop_front()
            .expect("unscripted submit_answer call")
    }

    async fn confirm_guess(&self, request: &ConfirmRequest) -> Result<(), TransportError> {
        self.calls.lock().expect("lock").push(Call::Confirm {
            was_correct: request.was_correct,
            correct_character_id: request.correct_character_id.clone(),
        });
        self.confirm_results
            .lock()
            .expect("lock")
            .pop_front()
            .expect("unscripted confirm_guess call")
    }

    async fn add_character(&self, character: &NewCharacter) -> Result<(), TransportError> {
        self.calls.lock().expect("lock").push(Call::AddCharacter {
            character_id: character.character_id.clone(),
            name: character.name.clone(),
        });
        self.add_results
            .lock()
            .expect("lock")
            .pop_front()
            .expect("unscripted add_character call")
    }
}

fn transport_error() -> TransportError {
    TransportError::Status {
        endpoint: "http://localhost:5000/api/game/test".to_string(),
        status: 500,
        message: Some("engine exploded".to_string()),
    }
}

fn started() -> StartResponse {
    StartResponse {
        session_id: "s1".to_string(),
        question: Question {
            question_id: "q1".to_string(),
            text: "Is it a hero?".to_string(),
        },
        questions_asked: 1,
        max_questions: 20,
    }
}

fn guess_batman() -> AnswerResponse {
    AnswerResponse::Guess {
        character: GuessedCharacter {
            name: "Batman".to_string(),
            image_url: None,
            description: None,
        },
        alternatives: vec![Alternative {
            name: "Superman".to_string(),
        }],
    }
}

/// Checks the data-consistency invariants that must hold after every
/// transition: session id outside idle, question only while playing,
/// guess only while guessing.
fn assert_invariants(snapshot: &Snapshot) {
    match snapshot.phase() {
        Phase::Idle => assert!(snapshot.session_id().is_none()),
        _ => assert!(snapshot.session_id().is_some()),
    }
    assert_eq!(
        snapshot.question().is_some(),
        *snapshot.phase() == Phase::Playing
    );
    assert_eq!(
        snapshot.guessed_character().is_some(),
        *snapshot.phase() == Phase::Guessing
    );
}

/// Drives a fresh machine to the guessing phase.
async fn machine_at_guess(engine: &MockEngine) -> GameMachine<MockEngine> {
    engine.push_start(Ok(started()));
    engine.push_answer(Ok(guess_batman()));

    let mut machine = GameMachine::new(engine.clone());
    machine.handle(Intent::Start).await;
    machine.handle(Intent::Answer(Answer::Yes)).await;
    assert_eq!(*machine.snapshot().phase(), Phase::Guessing);
    machine
}

fn robin_sheet() -> CharacterSheet {
    let mut sheet = CharacterSheet {
        name: "Robin".to_string(),
        ..CharacterSheet::default()
    };
    sheet.set_feature("can_fly", FeatureValue::No);
    sheet
}

#[tokio::test]
async fn start_success_enters_playing() {
    let engine = MockEngine::default();
    engine.push_start(Ok(started()));

    let mut machine = GameMachine::new(engine.clone());
    machine.handle(Intent::Start).await;

    let snapshot = machine.snapshot();
    assert_eq!(*snapshot.phase(), Phase::Playing);
    assert_eq!(snapshot.session_id().as_deref(), Some("s1"));
    let question = snapshot.question().as_ref().expect("question");
    assert_eq!(question.question_id, "q1");
    assert_eq!(question.text, "Is it a hero?");
    assert_eq!(*snapshot.questions_asked(), 1);
    assert_eq!(*snapshot.max_questions(), 20);
    assert!(snapshot.last_error().is_none());
    assert_invariants(snapshot);
}

#[tokio::test]
async fn start_failure_stays_idle_with_error() {
    let engine = MockEngine::default();
    engine.push_start(Err(transport_error()));

    let mut machine = GameMachine::new(engine.clone());
    machine.handle(Intent::Start).await;

    let snapshot = machine.snapshot();
    assert_eq!(*snapshot.phase(), Phase::Idle);
    assert!(snapshot.session_id().is_none());
    assert!(
        snapshot
            .last_error()
            .as_deref()
            .is_some_and(|e| e.contains("engine exploded"))
    );
    assert_invariants(snapshot);
}

#[tokio::test]
async fn question_response_replaces_question_and_candidates() {
    let engine = MockEngine::default();
    engine.push_start(Ok(started()));
    engine.push_answer(Ok(AnswerResponse::Question {
        question: Question {
            question_id: "q2".to_string(),
            text: "Can it fly?".to_string(),
        },
        questions_asked: 2,
        top_candidates: vec![Candidate {
            name: "Batman".to_string(),
            probability: 0.41,
        }],
    }));

    let mut machine = GameMachine::new(engine.clone());
    machine.handle(Intent::Start).await;
    machine.handle(Intent::Answer(Answer::ProbablyNot)).await;

    let snapshot = machine.snapshot();
    assert_eq!(*snapshot.phase(), Phase::Playing);
    assert_eq!(
        snapshot.question().as_ref().map(|q| q.question_id.as_str()),
        Some("q2")
    );
    assert_eq!(*snapshot.questions_asked(), 2);
    assert_eq!(snapshot.top_candidates().len(), 1);
    assert_eq!(snapshot.top_candidates()[0].name, "Batman");
    assert_invariants(snapshot);

    assert_eq!(
        engine.calls(),
        vec![Call::Start, Call::Answer(Answer::ProbablyNot)]
    );
}

#[tokio::test]
async fn guess_response_enters_guessing() {
    let engine = MockEngine::default();
    let machine = machine_at_guess(&engine).await;

    let snapshot = machine.snapshot();
    assert_eq!(
        snapshot.guessed_character().as_ref().map(|c| c.name.as_str()),
        Some("Batman")
    );
    assert_eq!(snapshot.alternatives().len(), 1);
    assert_eq!(snapshot.alternatives()[0].name, "Superman");
    assert!(snapshot.question().is_none());
    assert_invariants(snapshot);
}

#[tokio::test]
async fn answer_failure_keeps_current_question() {
    let engine = MockEngine::default();
    engine.push_start(Ok(started()));
    engine.push_answer(Err(transport_error()));

    let mut machine = GameMachine::new(engine.clone());
    machine.handle(Intent::Start).await;
    machine.handle(Intent::Answer(Answer::Yes)).await;

    let snapshot = machine.snapshot();
    assert_eq!(*snapshot.phase(), Phase::Playing);
    assert_eq!(
        snapshot.question().as_ref().map(|q| q.question_id.as_str()),
        Some("q1")
    );
    assert!(snapshot.last_error().is_some());
    assert_invariants(snapshot);
}

#[tokio::test]
async fn confirm_correct_closes_session() {
    let engine = MockEngine::default();
    let mut machine = machine_at_guess(&engine).await;
    engine.push_confirm(Ok(()));

    machine.handle(Intent::ConfirmCorrect).await;

    let snapshot = machine.snapshot();
    assert_eq!(*snapshot.phase(), Phase::Idle);
    assert!(snapshot.session_id().is_none());
    assert!(snapshot.guessed_character().is_none());
    assert_invariants(snapshot);

    assert_eq!(
        engine.calls().last(),
        Some(&Call::Confirm {
            was_correct: true,
            correct_character_id: None,
        })
    );
}

#[tokio::test]
async fn confirm_correct_failure_stays_guessing() {
    let engine = MockEngine::default();
    let mut machine = machine_at_guess(&engine).await;
    engine.push_confirm(Err(transport_error()));

    machine.handle(Intent::ConfirmCorrect).await;

    let snapshot = machine.snapshot();
    assert_eq!(*snapshot.phase(), Phase::Guessing);
    assert!(snapshot.session_id().is_some());
    assert!(snapshot.last_error().is_some());
    assert_invariants(snapshot);
}

#[tokio::test]
async fn incorrect_is_a_local_transition() {
    let engine = MockEngine::default();
    let mut machine = machine_at_guess(&engine).await;
    let calls_before = engine.calls();

    machine.handle(Intent::ConfirmIncorrect).await;

    assert_eq!(*machine.snapshot().phase(), Phase::Adding);
    assert!(machine.snapshot().session_id().is_some());
    // No answer or confirm endpoint was touched.
    assert_eq!(engine.calls(), calls_before);
    assert_invariants(machine.snapshot());
}

#[tokio::test]
async fn empty_name_rejected_locally() {
    let engine = MockEngine::default();
    let mut machine = machine_at_guess(&engine).await;
    machine.handle(Intent::ConfirmIncorrect).await;
    let calls_before = engine.calls();

    let sheet = CharacterSheet {
        name: "   ".to_string(),
        ..CharacterSheet::default()
    };
    machine.handle(Intent::SubmitCharacter(sheet)).await;

    let snapshot = machine.snapshot();
    assert_eq!(*snapshot.phase(), Phase::Adding);
    assert!(snapshot.last_error().is_some());
    assert_eq!(engine.calls(), calls_before);
}

#[tokio::test]
async fn submit_issues_add_then_confirm_in_order() {
    let engine = MockEngine::default();
    let mut machine = machine_at_guess(&engine).await;
    machine.handle(Intent::ConfirmIncorrect).await;
    engine.push_add(Ok(()));
    engine.push_confirm(Ok(()));

    machine.handle(Intent::SubmitCharacter(robin_sheet())).await;

    let snapshot = machine.snapshot();
    assert_eq!(*snapshot.phase(), Phase::Idle);
    assert!(snapshot.session_id().is_none());
    assert!(snapshot.last_error().is_none());
    assert_invariants(snapshot);

    let calls = engine.calls();
    let tail = &calls[calls.len() - 2..];
    let Call::AddCharacter { character_id, name } = &tail[0] else {
        panic!("expected add_character first, got {:?}", tail);
    };
    assert_eq!(name, "Robin");
    assert!(character_id.starts_with("c_"));
    assert_eq!(
        tail[1],
        Call::Confirm {
            was_correct: false,
            correct_character_id: Some(character_id.clone()),
        }
    );
}

#[tokio::test]
async fn add_failure_surfaces_without_confirm() {
    let engine = MockEngine::default();
    let mut machine = machine_at_guess(&engine).await;
    machine.handle(Intent::ConfirmIncorrect).await;
    engine.push_add(Err(transport_error()));

    machine.handle(Intent::SubmitCharacter(robin_sheet())).await;

    let snapshot = machine.snapshot();
    assert_eq!(*snapshot.phase(), Phase::Adding);
    assert!(snapshot.last_error().is_some());
    // confirm_guess was never reached.
    assert!(
        !engine
            .calls()
            .iter()
            .any(|c| matches!(c, Call::Confirm { was_correct: false, .. }))
    );
}

#[tokio::test]
async fn confirm_failure_after_add_does_not_reset() {
    let engine = MockEngine::default();
    let mut machine = machine_at_guess(&engine).await;
    machine.handle(Intent::ConfirmIncorrect).await;
    engine.push_add(Ok(()));
    engine.push_confirm(Err(transport_error()));

    machine.handle(Intent::SubmitCharacter(robin_sheet())).await;

    // The character was persisted upstream, but the session must not
    // look cleanly closed: we stay in adding with the error surfaced.
    let snapshot = machine.snapshot();
    assert_eq!(*snapshot.phase(), Phase::Adding);
    assert!(snapshot.session_id().is_some());
    assert!(snapshot.last_error().is_some());
    assert_invariants(snapshot);
}

#[tokio::test]
async fn cancel_add_resets_without_network() {
    let engine = MockEngine::default();
    let mut machine = machine_at_guess(&engine).await;
    machine.handle(Intent::ConfirmIncorrect).await;
    let calls_before = engine.calls();

    machine.handle(Intent::CancelAdd).await;

    assert_eq!(*machine.snapshot().phase(), Phase::Idle);
    assert!(machine.snapshot().session_id().is_none());
    assert_eq!(engine.calls(), calls_before);
}

#[tokio::test]
async fn repeated_start_triggers_one_call() {
    let engine = MockEngine::default();
    engine.push_start(Ok(started()));

    let mut machine = GameMachine::new(engine.clone());
    // Two rapid triggers: only the first can issue a request; once the
    // session is live, a second start intent is not valid.
    machine.handle(Intent::Start).await;
    machine.handle(Intent::Start).await;

    assert_eq!(engine.calls(), vec![Call::Start]);
    assert_eq!(*machine.snapshot().phase(), Phase::Playing);
}

#[tokio::test]
async fn intents_invalid_for_phase_are_ignored() {
    let engine = MockEngine::default();
    let mut machine = GameMachine::new(engine.clone());

    machine.handle(Intent::Answer(Answer::Yes)).await;
    machine.handle(Intent::ConfirmCorrect).await;
    machine.handle(Intent::CancelAdd).await;

    assert_eq!(*machine.snapshot().phase(), Phase::Idle);
    assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn reset_clears_all_session_fields() {
    let engine = MockEngine::default();
    let mut machine = machine_at_guess(&engine).await;
    // Park an error so reset has something to clear.
    engine.push_confirm(Err(transport_error()));
    machine.handle(Intent::ConfirmCorrect).await;
    assert!(machine.snapshot().last_error().is_some());

    machine.handle(Intent::Reset).await;

    let snapshot = machine.snapshot();
    assert_eq!(*snapshot.phase(), Phase::Idle);
    assert!(snapshot.session_id().is_none());
    assert!(snapshot.question().is_none());
    assert!(snapshot.guessed_character().is_none());
    assert!(snapshot.alternatives().is_empty());
    assert!(snapshot.top_candidates().is_empty());
    assert!(snapshot.last_error().is_none());
    assert_eq!(*snapshot.questions_asked(), 0);
    assert_invariants(snapshot);
}

#[tokio::test]
async fn progress_clamps_when_engine_overruns_ceiling() {
    let engine = MockEngine::default();
    engine.push_start(Ok(StartResponse {
        max_questions: 5,
        ..started()
    }));
    engine.push_answer(Ok(AnswerResponse::Question {
        question: Question {
            question_id: "q9".to_string(),
            text: "Still going?".to_string(),
        },
        questions_asked: 9,
        top_candidates: Vec::new(),
    }));

    let mut machine = GameMachine::new(engine.clone());
    machine.handle(Intent::Start).await;
    machine.handle(Intent::Answer(Answer::Unknown)).await;

    // Over-ceiling counts render as full progress, and the machine does
    // not force completion: only a guess response ends the questioning.
    let snapshot = machine.snapshot();
    assert_eq!(*snapshot.phase(), Phase::Playing);
    assert_eq!(*snapshot.questions_asked(), 9);
    assert_eq!(snapshot.progress(), 1.0);
}
