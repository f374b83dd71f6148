//! Live Update Channel.
//!
//! A [`LiveChannel`] owns one long-lived duplex connection, decodes every
//! inbound text message as a [`Quote`] and hands it to a callback. The
//! channel never reconnects: a transport error or a server close moves it to
//! [`ChannelState::Closed`] for good.
//!
//! The handle must be released with [`LiveChannel::close`], which sends a
//! close frame and waits for the connection task. Dropping an open handle
//! aborts the task without a close handshake.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures_util::StreamExt;
use serde::Serialize;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::Quote;

/// Invoked for every decoded quote, on the channel's task.
pub type QuoteCallback = Arc<dyn Fn(Quote) + Send + Sync>;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelState {
    Connecting,
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiveError {
    #[error("failed to connect to {url}: {message}")]
    Connect { url: String, message: String },
    #[error("live transport error: {0}")]
    Transport(String),
}

/// An established message connection.
pub trait LiveConnection: Send {
    /// Next inbound text message; `None` once the peer has closed.
    fn next_text(&mut self) -> BoxFuture<'_, Option<Result<String, LiveError>>>;

    /// Starts the close handshake.
    fn close(&mut self) -> BoxFuture<'_, ()>;
}

/// Opens [`LiveConnection`]s. The seam used to replace the websocket
/// transport in tests.
pub trait LiveConnector: Send + Sync {
    fn connect<'a>(
        &'a self,
        url: &'a str,
    ) -> BoxFuture<'a, Result<Box<dyn LiveConnection>, LiveError>>;
}

/// tokio-tungstenite transport (`ws://` and `wss://`).
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketConnector;

impl LiveConnector for WebSocketConnector {
    fn connect<'a>(
        &'a self,
        url: &'a str,
    ) -> BoxFuture<'a, Result<Box<dyn LiveConnection>, LiveError>> {
        Box::pin(async move {
            let (stream, _response) =
                connect_async(url).await.map_err(|e| LiveError::Connect {
                    url: url.to_owned(),
                    message: e.to_string(),
                })?;
            Ok(Box::new(WebSocketConnection { stream }) as Box<dyn LiveConnection>)
        })
    }
}

struct WebSocketConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl LiveConnection for WebSocketConnection {
    fn next_text(&mut self) -> BoxFuture<'_, Option<Result<String, LiveError>>> {
        Box::pin(async move {
            while let Some(message) = self.stream.next().await {
                match message {
                    Ok(Message::Text(text)) => return Some(Ok(text)),
                    Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                        Ok(text) => return Some(Ok(text)),
                        Err(_) => warn!("dropping non-UTF-8 binary frame"),
                    },
                    Ok(Message::Close(frame)) => {
                        debug!(?frame, "peer sent close frame");
                        return None;
                    }
                    // Pings are answered by tungstenite itself.
                    Ok(_) => {}
                    Err(e) => return Some(Err(LiveError::Transport(e.to_string()))),
                }
            }
            None
        })
    }

    fn close(&mut self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            if let Err(e) = self.stream.close(None).await {
                debug!(error = %e, "close handshake failed");
            }
        })
    }
}

/// Handle to a running live channel.
pub struct LiveChannel {
    url: String,
    state: watch::Receiver<ChannelState>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl LiveChannel {
    /// Spawns the connection task and returns at once in
    /// [`ChannelState::Connecting`]. Must be called inside a tokio runtime.
    pub fn open(
        connector: Arc<dyn LiveConnector>,
        url: impl Into<String>,
        on_quote: QuoteCallback,
    ) -> Self {
        let url = url.into();
        let (state_tx, state_rx) = watch::channel(ChannelState::Connecting);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(run_channel(
            connector,
            url.clone(),
            on_quote,
            state_tx,
            shutdown_rx,
        ));

        Self {
            url,
            state: state_rx,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> ChannelState {
        *self.state.borrow()
    }

    /// Receiver notified on every state transition.
    pub fn state_changes(&self) -> watch::Receiver<ChannelState> {
        self.state.clone()
    }

    /// Closes the connection and waits for the task to finish.
    pub async fn close(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(url = %self.url, error = %e, "live channel task failed");
            }
        }
    }
}

impl Drop for LiveChannel {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            debug!(url = %self.url, "live channel dropped without close; aborting");
            task.abort();
        }
    }
}

async fn run_channel(
    connector: Arc<dyn LiveConnector>,
    url: String,
    on_quote: QuoteCallback,
    state: watch::Sender<ChannelState>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let connected = tokio::select! {
        result = connector.connect(&url) => result,
        _ = &mut shutdown => {
            state.send_replace(ChannelState::Closed);
            return;
        }
    };

    let mut connection = match connected {
        Ok(connection) => connection,
        Err(e) => {
            warn!(%url, error = %e, "live channel failed to connect");
            state.send_replace(ChannelState::Closed);
            return;
        }
    };

    state.send_replace(ChannelState::Open);
    info!(%url, "live channel open");

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                connection.close().await;
                break;
            }
            message = connection.next_text() => match message {
                Some(Ok(text)) => match serde_json::from_str::<Quote>(&text) {
                    Ok(quote) => on_quote(quote),
                    Err(e) => warn!(%url, error = %e, "skipping undecodable live message"),
                },
                Some(Err(e)) => {
                    warn!(%url, error = %e, "live channel transport error");
                    break;
                }
                None => {
                    info!(%url, "live channel closed by peer");
                    break;
                }
            }
        }
    }

    state.send_replace(ChannelState::Closed);
    info!(%url, "live channel closed");
}
