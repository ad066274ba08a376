//! HTTP client for the guessing engine.

use crate::protocol::{
    AnswerRequest, AnswerResponse, CharacterList, CharacterRecord, ConfirmRequest, EngineStats,
    NewCharacter, NewQuestion, QuestionList, QuestionRecord, StartResponse,
};
use async_trait::async_trait;
use derive_more::{Display, Error};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

/// A failed exchange with the engine.
///
/// This is the only error kind the client distinguishes; server error
/// bodies are not interpreted beyond pulling out an optional
/// human-readable `error` message.
#[derive(Debug, Clone, Display, Error)]
pub enum TransportError {
    /// The request never completed (connection refused, DNS, timeout).
    #[display("request to {endpoint} failed: {message}")]
    Network {
        /// Full URL of the failed request.
        endpoint: String,
        /// Transport-level failure description.
        message: String,
    },
    /// The engine answered with a non-2xx status.
    #[display(
        "{} returned HTTP {}{}",
        endpoint,
        status,
        message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
    )]
    Status {
        /// Full URL of the failed request.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Human-readable message from the error body, if present.
        message: Option<String>,
    },
    /// The engine answered 2xx but the body did not decode.
    #[display("malformed response from {endpoint}: {message}")]
    Malformed {
        /// Full URL of the request.
        endpoint: String,
        /// Decode failure description.
        message: String,
    },
}

/// The engine operations the session state machine depends on.
///
/// `EngineClient` is the real implementation; tests substitute a
/// scripted mock to drive the machine without a network.
#[async_trait]
pub trait Engine {
    /// Starts a new play-through.
    async fn start_game(&self) -> Result<StartResponse, TransportError>;

    /// Submits an answer to the current question.
    async fn submit_answer(&self, request: &AnswerRequest)
    -> Result<AnswerResponse, TransportError>;

    /// Confirms or rejects the engine's terminal guess.
    async fn confirm_guess(&self, request: &ConfirmRequest) -> Result<(), TransportError>;

    /// Registers a user-authored character with the engine.
    async fn add_character(&self, character: &NewCharacter) -> Result<(), TransportError>;
}

/// Typed HTTP client for the engine's game and admin endpoints.
///
/// No operation retries internally; every failure surfaces to the
/// caller as a [`TransportError`].
#[derive(Debug, Clone)]
pub struct EngineClient {
    base_url: String,
    client: reqwest::Client,
}

impl EngineClient {
    /// Creates a client against the given base URL (e.g. `http://localhost:5000/api`).
    #[instrument]
    pub fn new(base_url: &str) -> Self {
        info!("Creating engine client");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POSTs a JSON body and decodes a JSON response.
    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let text = self.post_raw(path, body).await?;
        let endpoint = format!("{}{}", self.base_url, path);
        serde_json::from_str(&text).map_err(|e| {
            warn!(endpoint = %endpoint, error = %e, "Response body did not decode");
            TransportError::Malformed {
                endpoint,
                message: e.to_string(),
            }
        })
    }

    /// POSTs a JSON body, checking status but discarding the response body.
    async fn post_ack<B>(&self, path: &str, body: &B) -> Result<(), TransportError>
    where
        B: Serialize + ?Sized,
    {
        self.post_raw(path, body).await.map(|_| ())
    }

    /// POSTs a JSON body and returns the successful response text.
    async fn post_raw<B>(&self, path: &str, body: &B) -> Result<String, TransportError>
    where
        B: Serialize + ?Sized,
    {
        let endpoint = format!("{}{}", self.base_url, path);
        debug!(endpoint = %endpoint, "Sending POST");

        let response = self
            .client
            .post(&endpoint)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Network {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })?;

        Self::read_body(endpoint, response).await
    }

    /// GETs a JSON response.
    async fn get_json<T>(&self, path: &str) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
    {
        let endpoint = format!("{}{}", self.base_url, path);
        debug!(endpoint = %endpoint, "Sending GET");

        let response = self
            .client
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| TransportError::Network {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })?;

        let text = Self::read_body(endpoint.clone(), response).await?;
        serde_json::from_str(&text).map_err(|e| {
            warn!(endpoint = %endpoint, error = %e, "Response body did not decode");
            TransportError::Malformed {
                endpoint,
                message: e.to_string(),
            }
        })
    }

    /// Checks status and reads the body, extracting the server's
    /// `error` message on non-2xx responses.
    async fn read_body(
        endpoint: String,
        response: reqwest::Response,
    ) -> Result<String, TransportError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Network {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })?;

        if !status.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| v.get("error").and_then(|m| m.as_str()).map(str::to_string));
            warn!(
                endpoint = %endpoint,
                status = status.as_u16(),
                message = message.as_deref().unwrap_or("<none>"),
                "Engine returned error status"
            );
            return Err(TransportError::Status {
                endpoint,
                status: status.as_u16(),
                message,
            });
        }

        Ok(text)
    }

    /// Fetches aggregate engine statistics.
    #[instrument(skip(self))]
    pub async fn get_stats(&self) -> Result<EngineStats, TransportError> {
        self.get_json("/admin/stats").await
    }

    /// Lists every character the engine knows.
    #[instrument(skip(self))]
    pub async fn get_characters(&self) -> Result<Vec<CharacterRecord>, TransportError> {
        let list: CharacterList = self.get_json("/admin/characters").await?;
        Ok(list.characters)
    }

    /// Lists the engine's question pool.
    #[instrument(skip(self))]
    pub async fn get_questions(&self) -> Result<Vec<QuestionRecord>, TransportError> {
        let list: QuestionList = self.get_json("/admin/questions").await?;
        Ok(list.questions)
    }

    /// Adds a question to the engine's pool.
    #[instrument(skip(self, question), fields(text = %question.text))]
    pub async fn add_question(&self, question: &NewQuestion) -> Result<(), TransportError> {
        info!("Adding question to engine pool");
        self.post_ack("/admin/question", question).await
    }
}

#[async_trait]
impl Engine for EngineClient {
    #[instrument(skip(self))]
    async fn start_game(&self) -> Result<StartResponse, TransportError> {
        info!("Starting new game session");
        self.post_json("/game/start", &serde_json::json!({})).await
    }

    #[instrument(skip(self, request), fields(question_id = %request.question_id, answer = ?request.answer))]
    async fn submit_answer(
        &self,
        request: &AnswerRequest,
    ) -> Result<AnswerResponse, TransportError> {
        debug!("Submitting answer");
        self.post_json("/game/answer", request).await
    }

    #[instrument(skip(self, request), fields(was_correct = request.was_correct))]
    async fn confirm_guess(&self, request: &ConfirmRequest) -> Result<(), TransportError> {
        info!("Confirming guess outcome");
        self.post_ack("/game/confirm", request).await
    }

    #[instrument(skip(self, character), fields(name = %character.name))]
    async fn add_character(&self, character: &NewCharacter) -> Result<(), TransportError> {
        info!("Registering new character");
        self.post_ack("/game/character", character).await
    }
}
