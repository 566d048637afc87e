use std::sync::Arc;

use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use tokio::sync::{oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::buffer::ResponseBuffer;
use crate::endpoint::Endpoint;
use crate::error::{QueryError, QueryResult, TransportError};
use crate::transport::Transport;

/// A fully resolved request: verb, URL and, for POST, the encoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreparedRequest {
    Get { url: Url },
    Post { url: Url, body: Vec<u8> },
}

impl PreparedRequest {
    /// Resolves `endpoint` against `base`. A body is required for POST
    /// endpoints and refused for GET ones.
    pub fn new(endpoint: Endpoint, base: &Url, body: Option<Vec<u8>>) -> QueryResult<Self> {
        let url = endpoint.url(base)?;
        let method = endpoint.method();
        match body {
            None if method == Method::GET => Ok(PreparedRequest::Get { url }),
            Some(body) if method == Method::POST => Ok(PreparedRequest::Post { url, body }),
            _ => Err(QueryError::MalformedInput(
                "request body doesn't match the endpoint's method",
            )),
        }
    }

    pub fn method(&self) -> Method {
        match self {
            PreparedRequest::Get { .. } => Method::GET,
            PreparedRequest::Post { .. } => Method::POST,
        }
    }

    pub fn url(&self) -> &Url {
        match self {
            PreparedRequest::Get { url } | PreparedRequest::Post { url, .. } => url,
        }
    }

    pub fn body(&self) -> Option<&[u8]> {
        match self {
            PreparedRequest::Get { .. } => None,
            PreparedRequest::Post { body, .. } => Some(body),
        }
    }

    async fn send(
        self,
        transport: &dyn Transport,
        sink: &mut ResponseBuffer,
    ) -> Result<(), TransportError> {
        match self {
            PreparedRequest::Get { url } => transport.get(&url, sink).await,
            PreparedRequest::Post { url, body } => transport.post(&url, body, sink).await,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Created,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Succeeded | TaskState::Failed | TaskState::Cancelled
        )
    }
}

/// What a finished task hands back. The bytes are the response buffer's
/// contents, moved out as the buffer was released.
#[derive(Debug)]
pub enum TaskOutcome {
    Succeeded(Vec<u8>),
    Failed { error: QueryError, partial: Vec<u8> },
    Cancelled,
}

impl TaskOutcome {
    pub fn state(&self) -> TaskState {
        match self {
            TaskOutcome::Succeeded(_) => TaskState::Succeeded,
            TaskOutcome::Failed { .. } => TaskState::Failed,
            TaskOutcome::Cancelled => TaskState::Cancelled,
        }
    }

    /// Decodes a successful body. Cancellation yields `Ok(None)`. A body that
    /// doesn't decode comes back inside [`QueryError::Decode`].
    pub fn into_json<T: DeserializeOwned>(self) -> QueryResult<Option<T>> {
        match self {
            TaskOutcome::Succeeded(body) => match serde_json::from_slice(&body) {
                Ok(value) => Ok(Some(value)),
                Err(source) => Err(QueryError::Decode { source, body }),
            },
            TaskOutcome::Failed { error, .. } => Err(error),
            TaskOutcome::Cancelled => Ok(None),
        }
    }
}

type Observer = Box<dyn FnOnce(&TaskOutcome) + Send>;

/// One network round trip, not yet started.
///
/// The task owns its [`ResponseBuffer`] until it reaches a terminal state.
/// Drive it with [`execute`](Self::execute) from your own scheduler, or hand
/// it to tokio with [`spawn`](Self::spawn).
pub struct QueryTask {
    name: &'static str,
    transport: Arc<dyn Transport>,
    request: QueryResult<PreparedRequest>,
    buffer: ResponseBuffer,
    observers: Vec<Observer>,
    state: watch::Sender<TaskState>,
}

impl QueryTask {
    pub fn new(
        name: &'static str,
        transport: Arc<dyn Transport>,
        request: QueryResult<PreparedRequest>,
        buffer: ResponseBuffer,
    ) -> Self {
        let request = if buffer.is_empty() {
            request
        } else {
            Err(QueryError::MalformedInput("response buffer must start empty"))
        };
        let (state, _) = watch::channel(TaskState::Created);
        QueryTask {
            name,
            transport,
            request,
            buffer,
            observers: Vec::new(),
            state,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn request(&self) -> Result<&PreparedRequest, &QueryError> {
        self.request.as_ref()
    }

    pub fn state(&self) -> TaskState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<TaskState> {
        self.state.subscribe()
    }

    /// Registers a callback run once, after the buffer is released and the
    /// terminal state is published.
    pub fn on_finished(mut self, observer: impl FnOnce(&TaskOutcome) + Send + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    pub async fn execute(self, cancel: CancellationToken) -> TaskOutcome {
        let QueryTask {
            name,
            transport,
            request,
            mut buffer,
            observers,
            state,
        } = self;

        let outcome = if cancel.is_cancelled() {
            drop(buffer);
            TaskOutcome::Cancelled
        } else {
            match request {
                Err(error) => TaskOutcome::Failed {
                    error,
                    partial: buffer.into_bytes(),
                },
                Ok(request) => {
                    state.send_replace(TaskState::Running);
                    debug!("{name}: {} {}", request.method(), request.url());
                    let sent = tokio::select! {
                        biased;
                        () = cancel.cancelled() => None,
                        result = request.send(transport.as_ref(), &mut buffer) => Some(result),
                    };
                    match sent {
                        None => {
                            drop(buffer);
                            TaskOutcome::Cancelled
                        }
                        Some(Ok(())) => TaskOutcome::Succeeded(buffer.into_bytes()),
                        Some(Err(error)) => TaskOutcome::Failed {
                            error: error.into(),
                            partial: buffer.into_bytes(),
                        },
                    }
                }
            }
        };

        match &outcome {
            TaskOutcome::Succeeded(bytes) => debug!("{name}: finished ({} bytes)", bytes.len()),
            TaskOutcome::Failed { error, .. } => warn!("{name}: {error}"),
            TaskOutcome::Cancelled => debug!("{name}: cancelled"),
        }
        state.send_replace(outcome.state());
        for observer in observers {
            observer(&outcome);
        }
        outcome
    }

    /// Starts the task on the current tokio runtime.
    pub fn spawn(self) -> TaskHandle {
        let name = self.name;
        let state = self.subscribe();
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let (outcome_tx, outcome_rx) = oneshot::channel();
        tokio::spawn(async move {
            let outcome = self.execute(token).await;
            let _ = outcome_tx.send(outcome);
        });
        TaskHandle {
            name,
            cancel,
            state,
            outcome: outcome_rx,
        }
    }
}

/// Caller side of a spawned [`QueryTask`]. Dropping the handle detaches the
/// task; it still runs to completion and releases its buffer.
pub struct TaskHandle {
    name: &'static str,
    cancel: CancellationToken,
    state: watch::Receiver<TaskState>,
    outcome: oneshot::Receiver<TaskOutcome>,
}

impl TaskHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Safe to call at any time, including after the task has finished.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> TaskState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<TaskState> {
        self.state.clone()
    }

    pub async fn wait(self) -> TaskOutcome {
        self.outcome.await.unwrap_or(TaskOutcome::Failed {
            error: QueryError::Aborted,
            partial: Vec::new(),
        })
    }
}
