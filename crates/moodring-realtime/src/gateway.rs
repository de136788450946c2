//! The gateway: inbound events in, store mutations and broadcasts out.
//!
//! The gateway owns no session state. It keeps only routing state: which
//! connections sit in which room, and which (session, participant) pair
//! each connection is bound to. Every mutate-then-broadcast unit runs
//! under that session's event guard, so the order of broadcasts matches
//! the order of mutations.

use std::sync::{Arc, Weak};
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use moodring_core::config::{RealtimeConfig, SessionConfig};
use moodring_core::types::{ConnectionId, Mood, ReactionKind, SessionCode, UserId};
use moodring_engine::{RemoveOutcome, SessionStore};

use crate::connection::pool::ConnectionPool;
use crate::message::{ClientEvent, ServerEvent};
use crate::room::RoomRegistry;

/// What a connection is bound to after a successful join.
#[derive(Debug, Clone)]
struct Binding {
    code: SessionCode,
    user_id: UserId,
}

/// Routes client events into the session store and broadcasts the results.
#[derive(Debug)]
pub struct Gateway {
    store: Arc<SessionStore>,
    pool: Arc<ConnectionPool>,
    rooms: RoomRegistry,
    /// Connection → (session, participant), torn down on leave/disconnect.
    bindings: DashMap<ConnectionId, Binding>,
    /// Per-session event guards serializing mutate+broadcast units.
    guards: DashMap<SessionCode, Arc<Mutex<()>>>,
    config: RealtimeConfig,
    /// Delay between the session-ended broadcast and the purge.
    end_grace: Duration,
}

impl Gateway {
    /// Creates a gateway over the given store and connection pool.
    ///
    /// Registers itself as the store's purge hook so that deletions the
    /// gateway never sees (the expiry sweep, the deferred post-end
    /// purge) still shed its routing state for the dead session.
    pub fn new(
        store: Arc<SessionStore>,
        pool: Arc<ConnectionPool>,
        config: RealtimeConfig,
        session_config: &SessionConfig,
    ) -> Arc<Self> {
        let gateway = Arc::new(Self {
            store: Arc::clone(&store),
            pool,
            rooms: RoomRegistry::new(),
            bindings: DashMap::new(),
            guards: DashMap::new(),
            config,
            end_grace: Duration::from_secs(session_config.end_grace_seconds),
        });

        let hook: Weak<Self> = Arc::downgrade(&gateway);
        store.set_purge_hook(move |code| {
            if let Some(gateway) = hook.upgrade() {
                gateway.forget_session(code);
            }
        });

        gateway
    }

    /// Parse and route one inbound text frame.
    ///
    /// An unparseable frame answers an error to the origin only.
    pub async fn handle_frame(&self, conn_id: ConnectionId, text: &str) {
        match serde_json::from_str::<ClientEvent>(text) {
            Ok(event) => self.handle_event(conn_id, event).await,
            Err(err) => {
                debug!(conn_id = %conn_id, error = %err, "Unparseable inbound frame");
                self.error_to(conn_id, "Unrecognized event");
            }
        }
    }

    /// Route one inbound event.
    pub async fn handle_event(&self, conn_id: ConnectionId, event: ClientEvent) {
        match event {
            ClientEvent::Join { code, user_id } => self.on_join(conn_id, code, user_id).await,
            ClientEvent::UpdateMood {
                code,
                user_id,
                mood,
                status,
            } => self.on_update_mood(conn_id, code, user_id, mood, status).await,
            ClientEvent::SendReaction {
                code,
                from_user_id,
                to_user_id,
                kind,
            } => self.on_send_reaction(code, from_user_id, to_user_id, kind).await,
            ClientEvent::SendMessage {
                code,
                user_id,
                text,
            } => self.on_send_message(conn_id, code, user_id, text).await,
            ClientEvent::CreatePoll {
                code,
                user_id,
                question,
                options,
            } => self.on_create_poll(conn_id, code, user_id, question, options).await,
            ClientEvent::VotePoll {
                code,
                user_id,
                option_index,
            } => self.on_vote_poll(code, user_id, option_index).await,
            ClientEvent::ClearPoll { code } => self.on_clear_poll(code).await,
            ClientEvent::EndSession { code, user_id } => {
                self.on_end_session(conn_id, code, user_id).await
            }
            ClientEvent::Leave { code, user_id } => {
                let _guard = self.session_guard(&code).await;
                self.bindings.remove(&conn_id);
                self.depart(conn_id, &code, user_id);
            }
        }
    }

    /// Transport-level disconnect: treated as a leave for whatever the
    /// connection was bound to, then dropped from the pool.
    pub async fn handle_disconnect(&self, conn_id: ConnectionId) {
        if let Some((_, binding)) = self.bindings.remove(&conn_id) {
            let _guard = self.session_guard(&binding.code).await;
            self.depart(conn_id, &binding.code, binding.user_id);
        }
        self.pool.remove(conn_id);
    }

    async fn on_join(&self, conn_id: ConnectionId, code: SessionCode, user_id: UserId) {
        let _guard = self.session_guard(&code).await;

        let Some(view) = self.store.snapshot(&code) else {
            self.error_to(conn_id, "Oops! This session doesn't exist");
            return;
        };
        let Some(user) = view.users.iter().find(|u| u.id == user_id).cloned() else {
            self.error_to(conn_id, "You're not in this session");
            return;
        };

        self.bindings.insert(
            conn_id,
            Binding {
                code: code.clone(),
                user_id,
            },
        );
        self.store.bind_connection(&code, user_id, conn_id);
        self.rooms.enroll(code.clone(), conn_id);

        let user_count = view.user_count;
        self.send_to(conn_id, ServerEvent::SessionState { session: view });
        self.broadcast_except(&code, conn_id, ServerEvent::UserJoined { user, user_count });
        info!(conn_id = %conn_id, code = %code, user_id = %user_id, "Connection joined room");
    }

    async fn on_update_mood(
        &self,
        conn_id: ConnectionId,
        code: SessionCode,
        user_id: UserId,
        mood: Mood,
        status: String,
    ) {
        if status.chars().count() > self.config.max_status_length {
            self.error_to(conn_id, "Status is too long");
            return;
        }

        let _guard = self.session_guard(&code).await;
        // Unknown session or user is a silent no-op.
        if let Some(update) = self.store.update_mood(&code, user_id, mood, status) {
            self.broadcast(
                &code,
                ServerEvent::MoodUpdated {
                    user_id,
                    mood: update.entry.mood,
                    status: update.entry.status,
                    vibe: update.view.vibe,
                },
            );
        }
    }

    async fn on_send_reaction(
        &self,
        code: SessionCode,
        from_user_id: UserId,
        to_user_id: UserId,
        kind: ReactionKind,
    ) {
        let _guard = self.session_guard(&code).await;
        let Some(record) = self.store.send_reaction(&code, from_user_id, to_user_id, kind) else {
            return;
        };

        // Recorded regardless; delivered only if the target is bound.
        if let Some(target) = record.target_connection {
            self.send_to(
                target,
                ServerEvent::ReceiveReaction {
                    from_user_name: record.reaction.from_user_name,
                    to_user_id,
                    kind: record.reaction.kind,
                    timestamp: record.reaction.timestamp,
                },
            );
        }
    }

    async fn on_send_message(
        &self,
        conn_id: ConnectionId,
        code: SessionCode,
        user_id: UserId,
        text: String,
    ) {
        if text.trim().is_empty() {
            self.error_to(conn_id, "Message is empty");
            return;
        }
        if text.chars().count() > self.config.max_message_length {
            self.error_to(conn_id, "Message is too long");
            return;
        }

        let _guard = self.session_guard(&code).await;
        if let Some(message) = self.store.send_message(&code, user_id, text) {
            self.broadcast(&code, ServerEvent::ReceiveMessage { message });
        }
    }

    async fn on_create_poll(
        &self,
        conn_id: ConnectionId,
        code: SessionCode,
        user_id: UserId,
        question: String,
        options: Vec<String>,
    ) {
        let _guard = self.session_guard(&code).await;
        match self.store.create_poll(&code, user_id, question, options) {
            Ok(poll) => self.broadcast(&code, ServerEvent::PollCreated { poll }),
            // Conflict (a poll is already running) goes to the origin only.
            Err(err) => self.error_to(conn_id, &err.message),
        }
    }

    async fn on_vote_poll(&self, code: SessionCode, user_id: UserId, option_index: usize) {
        let _guard = self.session_guard(&code).await;
        if let Some(poll) = self.store.vote_poll(&code, user_id, option_index) {
            self.broadcast(&code, ServerEvent::PollUpdated { poll });
        }
    }

    async fn on_clear_poll(&self, code: SessionCode) {
        let _guard = self.session_guard(&code).await;
        if self.store.clear_poll(&code) {
            self.broadcast(&code, ServerEvent::PollCleared {});
        }
    }

    async fn on_end_session(&self, conn_id: ConnectionId, code: SessionCode, user_id: UserId) {
        let _guard = self.session_guard(&code).await;

        if !self.store.is_creator(&code, user_id) {
            self.error_to(conn_id, "Only the session creator can end the session");
            return;
        }
        let Some(snapshot) = self.store.stats_snapshot(&code) else {
            self.error_to(conn_id, "Oops! This session doesn't exist");
            return;
        };

        let report = moodring_stats::calculate(&snapshot);
        self.broadcast(&code, ServerEvent::SessionEnded { report });

        // Leave the data in place for the grace window so the broadcast
        // can be observed. The purge hook sheds the routing state once
        // the deferred purge fires.
        self.store.schedule_purge(code.clone(), self.end_grace);
        info!(code = %code, "Session ended by creator");
    }

    /// Shared departure path for leave and disconnect. Idempotent: the
    /// second arrival for the same user finds nothing left to remove.
    fn depart(&self, conn_id: ConnectionId, code: &SessionCode, user_id: UserId) {
        self.store.unbind_connection(code, user_id, conn_id);
        self.rooms.withdraw(code, conn_id);

        match self.store.remove_user(code, user_id) {
            RemoveOutcome::Removed { user_name, view } => {
                self.broadcast(
                    code,
                    ServerEvent::UserLeft {
                        user_id,
                        user_name,
                        user_count: view.user_count,
                    },
                );
            }
            // Deletion routes through the store's purge path, whose hook
            // already called `forget_session`.
            RemoveOutcome::SessionDeleted { .. } => {}
            RemoveOutcome::NoOp => {}
        }
    }

    /// Drop every piece of routing state held for a deleted session:
    /// member bindings, the room, and the event guard.
    fn forget_session(&self, code: &SessionCode) {
        for member in self.rooms.members(code) {
            self.bindings.remove(&member);
        }
        self.rooms.remove_room(code);
        self.guards.remove(code);
    }

    /// Acquire this session's event guard, creating it on first use.
    async fn session_guard(&self, code: &SessionCode) -> tokio::sync::OwnedMutexGuard<()> {
        let mutex = self
            .guards
            .entry(code.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }

    fn send_to(&self, conn_id: ConnectionId, event: ServerEvent) {
        if let Some(handle) = self.pool.get(conn_id) {
            handle.send(event);
        }
    }

    fn error_to(&self, conn_id: ConnectionId, message: &str) {
        warn!(conn_id = %conn_id, message, "Rejecting client event");
        self.send_to(
            conn_id,
            ServerEvent::Error {
                message: message.to_string(),
            },
        );
    }

    fn broadcast(&self, code: &SessionCode, event: ServerEvent) {
        for member in self.rooms.members(code) {
            self.send_to(member, event.clone());
        }
    }

    fn broadcast_except(&self, code: &SessionCode, except: ConnectionId, event: ServerEvent) {
        for member in self.rooms.members(code) {
            if member != except {
                self.send_to(member, event.clone());
            }
        }
    }
}
