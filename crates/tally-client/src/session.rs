//! Session lifecycle and request/response correlation.
//!
//! A [`Session`] owns one WebSocket connection to the endpoint. Two tasks
//! run for the life of the connection: a writer draining an outbound
//! channel into the sink, and a reader routing `RequestResponse` frames to
//! the pending-request table and `Event` frames to a broadcast channel.
//!
//! The pending table is the single shared mutable resource. Every access is
//! a short critical section with no `.await` inside, so callers and the
//! reader can never observe a half-applied update.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::{Duration, Instant};

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};
use uuid::Uuid;

use tally_protocol::{
    Envelope, Event, Hello, Identified, Identify, Request, RequestResponse,
    authentication_string, close_code, opcode,
};

use crate::error::ClientError;
use crate::options::ConnectOptions;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long a graceful disconnect waits for the close frame to flush.
const CLOSE_GRACE: Duration = Duration::from_millis(500);

/// Capacity of the outbound frame channel.
const WRITE_QUEUE: usize = 64;

/// Connection lifecycle states.
///
/// `Connecting` covers the handshake inside [`Session::connect`]; a handle
/// obtained from a successful `connect` starts out `Connected`. An abrupt
/// transport failure moves the session straight to `Disconnected`, skipping
/// `Closing`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionState {
    /// No connection.
    Disconnected = 0,
    /// Transport and handshake in progress.
    Connecting = 1,
    /// Identified and able to issue requests.
    Connected = 2,
    /// Graceful shutdown in progress.
    Closing = 3,
}

impl SessionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Connecting,
            2 => Self::Connected,
            3 => Self::Closing,
            _ => Self::Disconnected,
        }
    }
}

/// A call waiting for its correlated response.
#[derive(Debug)]
struct PendingRequest {
    tx: oneshot::Sender<Result<Value, ClientError>>,
    issued_at: Instant,
}

/// State shared between the session handle and its reader task.
#[derive(Debug)]
struct SessionShared {
    pending: Mutex<HashMap<String, PendingRequest>>,
    state: AtomicU8,
    write_tx: mpsc::Sender<Message>,
    events_tx: broadcast::Sender<Event>,
    call_timeout: Duration,
}

impl SessionShared {
    fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn set_state(&self, state: SessionState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }

    /// Resolve every still-pending call with `Closed`.
    fn fail_pending(&self) {
        let drained: Vec<PendingRequest> = {
            let mut pending = self.pending.lock();
            pending.drain().map(|(_, entry)| entry).collect()
        };
        if !drained.is_empty() {
            debug!(count = drained.len(), "failing pending requests on close");
        }
        for entry in drained {
            let _ = entry.tx.send(Err(ClientError::Closed));
        }
    }
}

/// A remote-control session: one connection, correlated calls, events.
#[derive(Debug)]
pub struct Session {
    shared: Arc<SessionShared>,
    reader: Mutex<Option<JoinHandle<()>>>,
    writer: Mutex<Option<JoinHandle<()>>>,
}

impl Session {
    /// Connect to the endpoint and perform the identification handshake.
    ///
    /// When the endpoint presents an authentication challenge, the password
    /// from `options` is used to compute the authentication string;
    /// [`ClientError::AuthRequired`] is returned if no password is
    /// configured, and [`ClientError::AuthRejected`] if the endpoint closes
    /// the connection with the authentication-failed close code.
    pub async fn connect(options: ConnectOptions) -> Result<Self, ClientError> {
        info!(url = %options.url, "connecting");
        let (mut ws, _) =
            connect_async(options.url.as_str())
                .await
                .map_err(|e| ClientError::Connect {
                    context: e.to_string(),
                })?;

        let envelope = handshake_recv(&mut ws).await?;
        if envelope.op != opcode::HELLO {
            return Err(ClientError::Connect {
                context: format!("expected hello, got op {}", envelope.op),
            });
        }
        let hello: Hello = envelope.payload()?;
        debug!(
            version = %hello.obs_web_socket_version,
            rpc_version = hello.rpc_version,
            auth_required = hello.authentication.is_some(),
            "received hello"
        );

        let authentication = match &hello.authentication {
            Some(challenge) => {
                let password = options.password.as_deref().ok_or(ClientError::AuthRequired)?;
                Some(authentication_string(
                    password,
                    &challenge.salt,
                    &challenge.challenge,
                ))
            }
            None => None,
        };
        let identify = Identify {
            rpc_version: hello.rpc_version,
            authentication,
            event_subscriptions: Some(options.event_subscriptions),
        };
        let frame = Envelope::pack(opcode::IDENTIFY, &identify)?.to_text()?;
        ws.send(Message::Text(frame.into()))
            .await
            .map_err(|e| ClientError::Connect {
                context: e.to_string(),
            })?;

        let envelope = handshake_recv(&mut ws).await?;
        if envelope.op != opcode::IDENTIFIED {
            return Err(ClientError::Connect {
                context: format!("expected identified, got op {}", envelope.op),
            });
        }
        let identified: Identified = envelope.payload()?;
        info!(
            rpc_version = identified.negotiated_rpc_version,
            "session identified"
        );

        let (write_tx, write_rx) = mpsc::channel::<Message>(WRITE_QUEUE);
        let (events_tx, _) = broadcast::channel(options.event_buffer.max(1));
        let shared = Arc::new(SessionShared {
            pending: Mutex::new(HashMap::new()),
            state: AtomicU8::new(SessionState::Connected as u8),
            write_tx,
            events_tx,
            call_timeout: options.call_timeout,
        });

        let (sink, stream) = ws.split();
        let writer = tokio::spawn(write_loop(sink, write_rx));
        let reader = tokio::spawn(read_loop(stream, Arc::clone(&shared)));

        Ok(Self {
            shared,
            reader: Mutex::new(Some(reader)),
            writer: Mutex::new(Some(writer)),
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.shared.state()
    }

    /// Number of calls currently awaiting a response.
    pub fn pending_requests(&self) -> usize {
        self.shared.pending.lock().len()
    }

    /// Subscribe to server-pushed events.
    ///
    /// Receivers that fall behind the buffer observe a lag error and then
    /// resume with newer events; the session never blocks on them.
    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.shared.events_tx.subscribe()
    }

    /// Issue a request and await its correlated response.
    ///
    /// Resolves exactly once: the response payload on success,
    /// [`ClientError::Call`] when the endpoint rejects the request,
    /// [`ClientError::Timeout`] when the per-call budget elapses (the
    /// pending entry is removed, so a late response is discarded), or
    /// [`ClientError::Closed`] if the connection drops while pending.
    pub async fn call(
        &self,
        request_type: &str,
        request_data: Option<Value>,
    ) -> Result<Value, ClientError> {
        if self.shared.state() != SessionState::Connected {
            return Err(ClientError::Closed);
        }

        let request_id = Uuid::now_v7().to_string();
        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.shared.pending.lock();
            let _ = pending.insert(
                request_id.clone(),
                PendingRequest {
                    tx,
                    issued_at: Instant::now(),
                },
            );
        }

        let request = Request {
            request_type: request_type.to_owned(),
            request_id: request_id.clone(),
            request_data,
        };
        let frame = match Envelope::pack(opcode::REQUEST, &request).and_then(|e| e.to_text()) {
            Ok(frame) => frame,
            Err(err) => {
                let _ = self.shared.pending.lock().remove(&request_id);
                return Err(err.into());
            }
        };
        if self
            .shared
            .write_tx
            .send(Message::Text(frame.into()))
            .await
            .is_err()
        {
            let _ = self.shared.pending.lock().remove(&request_id);
            return Err(ClientError::Closed);
        }
        // A disconnect may have swept the table between the state check and
        // the insert above; re-check so this entry cannot outlive the session.
        if self.shared.state() != SessionState::Connected {
            let _ = self.shared.pending.lock().remove(&request_id);
            return Err(ClientError::Closed);
        }
        debug!(request_id = %request_id, request_type, "request sent");

        match tokio::time::timeout(self.shared.call_timeout, rx).await {
            Ok(Ok(outcome)) => outcome,
            // The reader dropped the sender without resolving: connection gone.
            Ok(Err(_)) => Err(ClientError::Closed),
            Err(_) => {
                // Abandon our own pending entry; a late response is discarded.
                let _ = self.shared.pending.lock().remove(&request_id);
                Err(ClientError::Timeout {
                    request_type: request_type.to_owned(),
                    timeout_ms: u64::try_from(self.shared.call_timeout.as_millis())
                        .unwrap_or(u64::MAX),
                })
            }
        }
    }

    /// Gracefully close the session.
    ///
    /// Idempotent: the first call transitions `Connected → Closing`, sends a
    /// close frame (best effort), stops both connection tasks, and fails
    /// every still-pending call with [`ClientError::Closed`]; later calls
    /// are no-ops.
    pub async fn disconnect(&self) {
        if self
            .shared
            .state
            .compare_exchange(
                SessionState::Connected as u8,
                SessionState::Closing as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_err()
        {
            return;
        }
        info!("closing session");

        let _ = self.shared.write_tx.send(Message::Close(None)).await;
        let writer = self.writer.lock().take();
        if let Some(mut handle) = writer {
            if tokio::time::timeout(CLOSE_GRACE, &mut handle).await.is_err() {
                handle.abort();
            }
        }
        let reader = self.reader.lock().take();
        if let Some(handle) = reader {
            handle.abort();
        }

        self.shared.fail_pending();
        self.shared.set_state(SessionState::Disconnected);
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(handle) = self.reader.lock().take() {
            handle.abort();
        }
        if let Some(handle) = self.writer.lock().take() {
            handle.abort();
        }
        self.shared.fail_pending();
        self.shared.set_state(SessionState::Disconnected);
    }
}

/// Receive the next envelope during the handshake.
///
/// Close frames and transport failures map to connect-phase errors; the
/// authentication-failed close code maps to [`ClientError::AuthRejected`].
async fn handshake_recv(ws: &mut WsStream) -> Result<Envelope, ClientError> {
    loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => return Ok(Envelope::from_text(&text)?),
            Some(Ok(Message::Close(frame))) => {
                if let Some(frame) = frame {
                    if u16::from(frame.code) == close_code::AUTHENTICATION_FAILED {
                        return Err(ClientError::AuthRejected);
                    }
                }
                return Err(ClientError::Connect {
                    context: "connection closed during handshake".to_owned(),
                });
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                return Err(ClientError::Connect {
                    context: e.to_string(),
                });
            }
            None => {
                return Err(ClientError::Connect {
                    context: "connection closed during handshake".to_owned(),
                });
            }
        }
    }
}

/// Drain the outbound channel into the sink until it closes or a close
/// frame goes out.
async fn write_loop(mut sink: SplitSink<WsStream, Message>, mut rx: mpsc::Receiver<Message>) {
    while let Some(msg) = rx.recv().await {
        let is_close = matches!(msg, Message::Close(_));
        if sink.send(msg).await.is_err() {
            break;
        }
        if is_close {
            break;
        }
    }
    let _ = sink.close().await;
}

/// Route inbound frames until the transport drops, then fail whatever is
/// still waiting.
async fn read_loop(mut stream: SplitStream<WsStream>, shared: Arc<SessionShared>) {
    while let Some(item) = stream.next().await {
        let msg = match item {
            Ok(msg) => msg,
            Err(e) => {
                warn!(error = %e, "transport error");
                break;
            }
        };
        let text = match msg {
            Message::Text(text) => text,
            Message::Close(_) => {
                debug!("endpoint sent close frame");
                break;
            }
            _ => continue,
        };
        let envelope = match Envelope::from_text(&text) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "discarding malformed frame");
                continue;
            }
        };
        match envelope.op {
            opcode::REQUEST_RESPONSE => match envelope.payload::<RequestResponse>() {
                Ok(response) => dispatch_response(&shared, response),
                Err(e) => warn!(error = %e, "discarding undecodable response"),
            },
            opcode::EVENT => match envelope.payload::<Event>() {
                Ok(event) => {
                    let _ = shared.events_tx.send(event);
                }
                Err(e) => warn!(error = %e, "discarding undecodable event"),
            },
            other => debug!(op = other, "ignoring unexpected opcode"),
        }
    }

    shared.fail_pending();
    shared.set_state(SessionState::Disconnected);
}

/// Hand a response to the caller waiting on its request id, if any.
fn dispatch_response(shared: &SessionShared, response: RequestResponse) {
    let entry = shared.pending.lock().remove(&response.request_id);
    let Some(entry) = entry else {
        debug!(
            request_id = %response.request_id,
            "discarding response for abandoned request"
        );
        return;
    };
    debug!(
        request_id = %response.request_id,
        request_type = %response.request_type,
        elapsed_ms = u64::try_from(entry.issued_at.elapsed().as_millis()).unwrap_or(u64::MAX),
        success = response.request_status.result,
        "request resolved"
    );
    let outcome = if response.request_status.result {
        Ok(response.response_data.unwrap_or(Value::Null))
    } else {
        Err(ClientError::Call {
            code: response.request_status.code,
            comment: response.request_status.comment.unwrap_or_default(),
        })
    };
    let _ = entry.tx.send(outcome);
}
