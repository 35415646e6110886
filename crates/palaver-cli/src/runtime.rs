//! Runtime loop wiring the session to a WebSocket transport and the terminal.
//!
//! Orchestrates three parties the way the app layer expects:
//! - stdin lines become user intents on the [`App`]
//! - [`AppAction`]s route through the [`Bridge`] into the session
//! - queued transport commands are executed here, and transport outcomes are
//!   fed back generation-tagged
//!
//! The driver holds at most one live channel and always knows which
//! generation it belongs to; the session discards anything stale on its own.

use std::io::Write;

use chrono::Local;
use palaver_app::{App, AppAction, AppEvent, Bridge, status_label};
use palaver_client::{
    ChannelKind, ConnectionStatus, Endpoint, SessionAction, SessionIdentity,
    transport::{self, ConnectedChannel},
};
use thiserror::Error;
use tokio::io::AsyncBufReadExt;

/// Runtime errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One live transport and the generation it was dialed under.
type LiveChannel = Option<(u64, ConnectedChannel)>;

/// Orchestrates App, Bridge, and the WebSocket transport.
pub struct Runtime {
    app: App,
    bridge: Bridge,
    initial: SessionIdentity,
    /// How many of the current conversation's messages are already printed.
    printed: usize,
    last_status: ConnectionStatus,
    last_status_line: Option<String>,
}

impl Runtime {
    /// Create a runtime chatting as `user`, starting in `identity`.
    pub fn new(endpoint: Endpoint, user: String, identity: SessionIdentity) -> Self {
        Self {
            app: App::new(user),
            bridge: Bridge::new(endpoint, identity.clone()),
            initial: identity,
            printed: 0,
            last_status: ConnectionStatus::Disconnected,
            last_status_line: None,
        }
    }

    /// Run the main event loop until `/quit` or stdin closes.
    pub async fn run(mut self) -> Result<(), RuntimeError> {
        let mut channel: LiveChannel = None;

        let opening = match self.initial.kind {
            ChannelKind::Group => self.app.open_group(self.initial.target.clone()),
            ChannelKind::Direct => self.app.open_direct(self.initial.target.clone()),
        };
        if self.process_actions(opening, &mut channel).await? {
            return Ok(());
        }

        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if self.handle_line(&line, &mut channel).await? {
                        break;
                    }
                },
                frame = next_frame(&mut channel) => {
                    let events = match frame {
                        Some(text) => {
                            let generation =
                                channel.as_ref().map_or(0, |(generation, _)| *generation);
                            self.bridge.frame_received(generation, text)
                        },
                        None => match channel.take() {
                            Some((generation, _)) => self.bridge.transport_down(generation),
                            None => vec![],
                        },
                    };
                    let actions = self.apply_events(events);
                    if self.process_actions(actions, &mut channel).await? {
                        break;
                    }
                },
            }
        }

        // Teardown on every exit path: close the session and release the
        // socket.
        let events = self.bridge.close();
        let actions = self.apply_events(events);
        self.process_actions(actions, &mut channel).await?;
        let _ = self.drive(&mut channel).await;

        Ok(())
    }

    /// Interpret one line of input. Returns `true` to quit.
    async fn handle_line(
        &mut self,
        line: &str,
        channel: &mut LiveChannel,
    ) -> Result<bool, RuntimeError> {
        let actions = match line.trim() {
            "/quit" => self.app.quit(),
            command if command.starts_with("/join ") => {
                self.app.open_group(command.trim_start_matches("/join ").trim().to_string())
            },
            command if command.starts_with("/dm ") => {
                self.app.open_direct(command.trim_start_matches("/dm ").trim().to_string())
            },
            _ => self.app.submit(line),
        };

        self.process_actions(actions, channel).await
    }

    /// Process App actions to quiescence. Returns `true` to quit.
    async fn process_actions(
        &mut self,
        initial_actions: Vec<AppAction>,
        channel: &mut LiveChannel,
    ) -> Result<bool, RuntimeError> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.render()?,
                    AppAction::Quit => return Ok(true),
                    AppAction::OpenSession { identity } => {
                        let events = self.open_session(identity);
                        pending_actions.extend(self.apply_events(events));
                        pending_actions.extend(self.drive(channel).await);
                    },
                    AppAction::SendMessage { body } => {
                        let events = self.bridge.submit(body);
                        pending_actions.extend(self.apply_events(events));
                        pending_actions.extend(self.drive(channel).await);
                    },
                }
            }
        }

        Ok(false)
    }

    /// Route an open-session intent: a fresh open for the current binding,
    /// a rebind for any other.
    fn open_session(&mut self, identity: SessionIdentity) -> Vec<AppEvent> {
        if *self.bridge.session().identity() == identity {
            self.bridge.open()
        } else {
            self.bridge.switch(identity)
        }
    }

    /// Feed bridge events through the App, collecting follow-up actions.
    fn apply_events(&mut self, events: Vec<AppEvent>) -> Vec<AppAction> {
        events.into_iter().flat_map(|event| self.app.handle(event)).collect()
    }

    /// Execute queued transport commands and return follow-up App actions.
    async fn drive(&mut self, channel: &mut LiveChannel) -> Vec<AppAction> {
        let mut follow_ups = Vec::new();

        for command in self.bridge.take_outgoing() {
            match command {
                SessionAction::Dial { generation, address } => {
                    if let Some((_, old)) = channel.take() {
                        old.stop();
                    }

                    match transport::connect(&address).await {
                        Ok(connected) => {
                            tracing::debug!(generation, url = %address.url(), "transport up");
                            *channel = Some((generation, connected));
                            let events = self.bridge.transport_up(generation);
                            follow_ups.extend(self.apply_events(events));
                        },
                        Err(e) => {
                            tracing::warn!(generation, error = %e, "connect failed");
                            let events = self.bridge.transport_down(generation);
                            follow_ups.extend(self.apply_events(events));
                        },
                    }
                },
                SessionAction::SendFrame { generation, text } => {
                    let live = matches!(channel, Some((current, _)) if *current == generation);
                    if live
                        && let Some((_, connected)) = channel.as_ref()
                        && connected.to_server.send(text).await.is_err()
                    {
                        channel.take();
                        let events = self.bridge.transport_down(generation);
                        follow_ups.extend(self.apply_events(events));
                    }
                },
                SessionAction::CloseTransport { generation } => {
                    if matches!(channel, Some((current, _)) if *current == generation)
                        && let Some((_, connected)) = channel.take()
                    {
                        connected.stop();
                    }
                },
                // The bridge reports decode failures as events, never as
                // queued commands.
                SessionAction::DecodeFailure { .. } => {},
            }
        }

        follow_ups
    }

    /// Print whatever changed since the last render.
    fn render(&mut self) -> Result<(), RuntimeError> {
        let mut out = std::io::stdout().lock();

        let status = self.app.status();
        if status != self.last_status {
            self.last_status = status;
            writeln!(out, "── {}", status_label(status))?;
        }

        if let Some(chat) = self.app.chat() {
            if chat.messages.len() < self.printed {
                // Conversation switched or reloaded; start over.
                self.printed = 0;
                writeln!(out, "── {} ({})", chat.title(), chat.subtitle())?;
            }

            let user = self.app.user().to_string();
            for message in &chat.messages[self.printed..] {
                let stamp = message.sent_at.with_timezone(&Local).format("%H:%M");
                let marker = if message.sender == user { "*" } else { " " };
                writeln!(out, "[{stamp}]{marker}{}: {}", message.sender, message.body)?;
            }
            self.printed = chat.messages.len();
        }

        if self.app.status_line() != self.last_status_line.as_deref() {
            self.last_status_line = self.app.status_line().map(str::to_string);
            if let Some(line) = &self.last_status_line {
                writeln!(out, "── {line}")?;
            }
        }

        out.flush()?;
        Ok(())
    }
}

/// Next inbound frame from the live channel; pends forever while there is no
/// channel so the select loop sleeps on stdin alone.
async fn next_frame(channel: &mut LiveChannel) -> Option<String> {
    match channel {
        Some((_, connected)) => connected.from_server.recv().await,
        None => std::future::pending().await,
    }
}
