//! WebSocket transport for the session.
//!
//! Provides [`ConnectedChannel`], a thin bridge between the socket and a pair
//! of channels. Protocol logic stays in the Sans-IO [`crate::Session`]; the
//! driver owning both decides which generation the channel's traffic belongs
//! to.
//!
//! Lifecycle mapping for the driver:
//! - `connect` returning `Ok` is the transport-up signal
//! - each received text frame arrives on `from_server`, in receipt order
//! - `from_server` yielding `None` is the transport-down signal (error and
//!   peer close look the same from here; the session treats them the same)

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    sync::mpsc,
};
use tokio_tungstenite::{WebSocketStream, connect_async, tungstenite::Message};

use crate::address::ChannelAddress;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// WebSocket handshake failed.
    #[error("connection failed: {0}")]
    Connect(String),
}

/// Handle to one live WebSocket connection.
///
/// Frames travel through the channels; an internal task owns the socket and
/// does the I/O. Dropping the handle (or calling [`ConnectedChannel::stop`])
/// releases the socket on every exit path.
pub struct ConnectedChannel {
    /// Send raw text frames to the server.
    pub to_server: mpsc::Sender<String>,
    /// Receive raw text frames from the server. Yields `None` once the
    /// connection is gone.
    pub from_server: mpsc::Receiver<String>,
    /// Abort handle to stop the connection task.
    abort_handle: tokio::task::AbortHandle,
}

impl ConnectedChannel {
    /// Stop the connection task, releasing the socket.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

impl Drop for ConnectedChannel {
    fn drop(&mut self) {
        self.abort_handle.abort();
    }
}

/// Open a WebSocket to the resolved channel address.
pub async fn connect(address: &ChannelAddress) -> Result<ConnectedChannel, TransportError> {
    let (socket, _response) =
        connect_async(address.url()).await.map_err(|e| TransportError::Connect(e.to_string()))?;

    let (to_server_tx, to_server_rx) = mpsc::channel::<String>(32);
    let (from_server_tx, from_server_rx) = mpsc::channel::<String>(32);

    let handle = tokio::spawn(run_connection(socket, to_server_rx, from_server_tx));

    Ok(ConnectedChannel {
        to_server: to_server_tx,
        from_server: from_server_rx,
        abort_handle: handle.abort_handle(),
    })
}

/// Run the connection, bridging between channels and the socket.
///
/// Ends when the peer closes, the socket errors, or the driver drops the
/// sending half. Dropping `from_server` on return is what the driver observes
/// as transport-down.
async fn run_connection<S>(
    socket: WebSocketStream<S>,
    mut to_server: mpsc::Receiver<String>,
    from_server: mpsc::Sender<String>,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            outgoing = to_server.recv() => match outgoing {
                Some(text) => {
                    if sink.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                },
                // Driver dropped the sender: normal teardown.
                None => break,
            },
            inbound = stream.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    if from_server.send(text).await.is_err() {
                        break;
                    }
                },
                // Ping/pong are answered by tungstenite; binary frames are
                // not part of this protocol.
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Binary(_))) => {},
                Some(Ok(_)) | Some(Err(_)) | None => break,
            },
        }
    }

    // Best-effort close; the socket is released when the halves drop.
    let _ = sink.close().await;
}
