//! Session store and lifecycle.
//!
//! Owns the mapping from code to live session. Mutations against one
//! session go through its `DashMap` entry guard, so they are observed as
//! strictly serialized per session while distinct sessions proceed
//! concurrently. Deletions are idempotent everywhere: an expiry sweep, a
//! deferred post-end purge, and a user-driven removal may race for the
//! same session without error.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info};

use moodring_core::config::session::SessionConfig;
use moodring_core::types::{ConnectionId, Mood, ReactionKind, SessionCode, UserId};
use moodring_core::{AppError, AppResult};
use moodring_entity::chat::ChatMessage;
use moodring_entity::poll::Poll;
use moodring_entity::reaction::Reaction;
use moodring_entity::session::Session;
use moodring_entity::timeline::MoodEntry;
use moodring_entity::view::{SessionSnapshot, SessionView};

/// Result of a mood update: the appended timeline entry plus the
/// refreshed public view (whose vibe the gateway broadcasts).
#[derive(Debug, Clone)]
pub struct MoodUpdate {
    /// The timeline entry just appended.
    pub entry: MoodEntry,
    /// The updated public view.
    pub view: SessionView,
}

/// Result of recording a reaction: the log entry plus the target's
/// currently bound connection, if any, for live delivery.
#[derive(Debug, Clone)]
pub struct ReactionRecord {
    /// The recorded reaction.
    pub reaction: Reaction,
    /// Where to deliver it live, if the target is connected.
    pub target_connection: Option<ConnectionId>,
}

/// Outcome of removing a user from a session.
#[derive(Debug, Clone)]
pub enum RemoveOutcome {
    /// Session or user unknown — silent no-op (idempotent removal).
    NoOp,
    /// The user left and the session became empty, so it was deleted.
    SessionDeleted {
        /// The departing user's name.
        user_name: String,
    },
    /// The user left; other participants remain.
    Removed {
        /// The departing user's name.
        user_name: String,
        /// The updated public view.
        view: SessionView,
    },
}

/// Notified with the code of every deleted session.
type PurgeHook = Box<dyn Fn(&SessionCode) + Send + Sync>;

/// The authoritative in-memory registry of live sessions.
pub struct SessionStore {
    /// Code → live session.
    sessions: DashMap<SessionCode, Session>,
    /// Code → handle of a scheduled (grace-delayed) purge task.
    pending_purges: DashMap<SessionCode, tokio::task::AbortHandle>,
    /// Invoked after each deletion so routing layers can shed their
    /// per-session state (the expiry sweep deletes behind their back).
    purge_hook: OnceLock<PurgeHook>,
    /// Lifecycle configuration.
    config: SessionConfig,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("sessions", &self.sessions.len())
            .finish()
    }
}

impl SessionStore {
    /// Create an empty store.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            pending_purges: DashMap::new(),
            purge_hook: OnceLock::new(),
            config,
        }
    }

    /// Install the hook called after every session deletion.
    ///
    /// At most one hook per store; later installs are ignored. The hook
    /// runs on whichever task triggered the deletion and must not call
    /// back into the store.
    pub fn set_purge_hook(&self, hook: impl Fn(&SessionCode) + Send + Sync + 'static) {
        let _ = self.purge_hook.set(Box::new(hook));
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Create a new session with `creator_name` as sole user.
    ///
    /// Retries code generation until the candidate does not collide with
    /// any live session.
    pub fn create_session(&self, creator_name: String) -> (SessionCode, UserId) {
        loop {
            let code = crate::codegen::generate();
            match self.sessions.entry(code.clone()) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(vacant) => {
                    let session =
                        Session::new(code.clone(), creator_name.clone(), self.config.expiry_hours);
                    let user_id = session.users[0].id;
                    vacant.insert(session);
                    info!(code = %code, creator = %creator_name, "Session created");
                    return (code, user_id);
                }
            }
        }
    }

    /// Join an existing session.
    ///
    /// Fails with NotFound for an unknown code, Expired for a session past
    /// its expiry (purging it as a side effect), or Capacity when full.
    pub fn join_session(
        &self,
        code: &SessionCode,
        name: String,
    ) -> AppResult<(SessionView, UserId)> {
        let Some(mut session) = self.sessions.get_mut(code) else {
            return Err(AppError::not_found("Oops! This session doesn't exist"));
        };

        if session.is_expired(Utc::now()) {
            drop(session);
            self.purge(code);
            return Err(AppError::expired("This session has expired"));
        }

        let user_id = session.add_user(name.clone(), self.config.max_users)?;
        let view = session.view();
        info!(code = %code, user = %name, count = view.user_count, "User joined session");
        Ok((view, user_id))
    }

    /// Current public view of a session, if it exists.
    pub fn snapshot(&self, code: &SessionCode) -> Option<SessionView> {
        self.sessions.get(code).map(|s| s.view())
    }

    /// Read-only stats capture: final view plus full logs.
    ///
    /// Used by the gateway before the grace-delayed purge so the
    /// end-session broadcast can be observed before the data disappears.
    pub fn stats_snapshot(&self, code: &SessionCode) -> Option<SessionSnapshot> {
        self.sessions.get(code).map(|s| s.snapshot())
    }

    /// Whether `user_id` is the session's creator (first in join order).
    pub fn is_creator(&self, code: &SessionCode, user_id: UserId) -> bool {
        self.sessions
            .get(code)
            .is_some_and(|s| s.is_creator(user_id))
    }

    /// Update a user's mood. Silent no-op for unknown session or user.
    pub fn update_mood(
        &self,
        code: &SessionCode,
        user_id: UserId,
        mood: Mood,
        status: String,
    ) -> Option<MoodUpdate> {
        let mut session = self.sessions.get_mut(code)?;
        let entry = session.record_mood(user_id, mood, status)?;
        let view = session.view();
        debug!(code = %code, user_id = %user_id, mood = %mood, "Mood updated");
        Some(MoodUpdate { entry, view })
    }

    /// Record a reaction. Silent no-op if session or either user is unknown.
    pub fn send_reaction(
        &self,
        code: &SessionCode,
        from: UserId,
        to: UserId,
        kind: ReactionKind,
    ) -> Option<ReactionRecord> {
        let mut session = self.sessions.get_mut(code)?;
        let reaction = session.record_reaction(from, to, kind, self.config.recent_reactions)?;
        let target_connection = session.user(to).and_then(|u| u.connection);
        Some(ReactionRecord {
            reaction,
            target_connection,
        })
    }

    /// Append a chat message. Silent no-op for unknown session or user.
    pub fn send_message(
        &self,
        code: &SessionCode,
        user_id: UserId,
        text: String,
    ) -> Option<ChatMessage> {
        let mut session = self.sessions.get_mut(code)?;
        session.push_message(user_id, text, self.config.max_chat_messages)
    }

    /// Open a poll in the session.
    pub fn create_poll(
        &self,
        code: &SessionCode,
        user_id: UserId,
        question: String,
        options: Vec<String>,
    ) -> AppResult<Poll> {
        let Some(mut session) = self.sessions.get_mut(code) else {
            return Err(AppError::not_found("Oops! This session doesn't exist"));
        };
        session.create_poll(user_id, question, options)
    }

    /// Cast a vote on the active poll, returning the updated poll.
    pub fn vote_poll(
        &self,
        code: &SessionCode,
        user_id: UserId,
        option_index: usize,
    ) -> Option<Poll> {
        let mut session = self.sessions.get_mut(code)?;
        session.vote_poll(user_id, option_index)
    }

    /// Discard the active poll. Returns whether the session existed.
    pub fn clear_poll(&self, code: &SessionCode) -> bool {
        match self.sessions.get_mut(code) {
            Some(mut session) => {
                session.clear_poll();
                true
            }
            None => false,
        }
    }

    /// Remove a user from a session.
    ///
    /// Idempotent: removing an already-absent user (or from an
    /// already-absent session) is a no-op, never an error, and triggers
    /// no removal side effects a second time. Deletes the session when
    /// its user collection becomes empty.
    pub fn remove_user(&self, code: &SessionCode, user_id: UserId) -> RemoveOutcome {
        let Some(mut session) = self.sessions.get_mut(code) else {
            return RemoveOutcome::NoOp;
        };

        let Some(user_name) = session.remove_user(user_id) else {
            return RemoveOutcome::NoOp;
        };

        if session.is_empty() {
            drop(session);
            self.purge(code);
            info!(code = %code, user = %user_name, "Last user left; session deleted");
            return RemoveOutcome::SessionDeleted { user_name };
        }

        let view = session.view();
        info!(code = %code, user = %user_name, count = view.user_count, "User left session");
        RemoveOutcome::Removed { user_name, view }
    }

    /// Bind a user's connection reference.
    pub fn bind_connection(&self, code: &SessionCode, user_id: UserId, conn_id: ConnectionId) {
        if let Some(mut session) = self.sessions.get_mut(code)
            && let Some(user) = session.user_mut(user_id)
        {
            user.connection = Some(conn_id);
        }
    }

    /// Clear a user's connection reference, but only if it still points
    /// at `conn_id` (a newer connection may have rebound it).
    pub fn unbind_connection(&self, code: &SessionCode, user_id: UserId, conn_id: ConnectionId) {
        if let Some(mut session) = self.sessions.get_mut(code)
            && let Some(user) = session.user_mut(user_id)
            && user.connection == Some(conn_id)
        {
            user.connection = None;
        }
    }

    /// The connection currently bound to a user, if any.
    pub fn connection_of(&self, code: &SessionCode, user_id: UserId) -> Option<ConnectionId> {
        self.sessions
            .get(code)?
            .user(user_id)
            .and_then(|u| u.connection)
    }

    /// Schedule a deferred purge after `grace`.
    ///
    /// The task is cancellable: if the session is purged first (by the
    /// expiry sweep or a user-driven deletion), the pending task is
    /// aborted so it cannot fire twice.
    pub fn schedule_purge(self: &Arc<Self>, code: SessionCode, grace: Duration) {
        let store = Arc::clone(self);
        let task_code = code.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            store.purge(&task_code);
        });

        if let Some(previous) = self.pending_purges.insert(code, task.abort_handle()) {
            previous.abort();
        }
    }

    /// Delete a session outright, cancelling any pending purge.
    ///
    /// The single deletion path: every removal (user-driven, deferred,
    /// or swept) lands here, so the purge hook fires exactly once per
    /// deleted session. Idempotent for an already-absent code.
    pub fn purge(&self, code: &SessionCode) -> bool {
        self.cancel_pending_purge(code);
        let removed = self.sessions.remove(code).is_some();
        if removed {
            info!(code = %code, "Session purged");
            if let Some(hook) = self.purge_hook.get() {
                hook(code);
            }
        }
        removed
    }

    /// Sweep all sessions, deleting any past their expiry time.
    ///
    /// Idempotent and safe to run concurrently with user-driven mutations.
    pub fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        let expired: Vec<SessionCode> = self
            .sessions
            .iter()
            .filter(|entry| entry.value().is_expired(now))
            .map(|entry| entry.key().clone())
            .collect();

        let mut cleaned = 0;
        for code in expired {
            if self.purge(&code) {
                cleaned += 1;
            }
        }

        if cleaned > 0 {
            info!(count = cleaned, "Cleaned up expired sessions");
        }
        cleaned
    }

    fn cancel_pending_purge(&self, code: &SessionCode) {
        if let Some((_, handle)) = self.pending_purges.remove(code) {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    fn store() -> Arc<SessionStore> {
        Arc::new(SessionStore::new(SessionConfig::default()))
    }

    /// Force a session's expiry into the past.
    fn expire(store: &SessionStore, code: &SessionCode) {
        let mut session = store.sessions.get_mut(code).expect("session exists");
        session.expires_at = Utc::now() - ChronoDuration::seconds(1);
    }

    #[test]
    fn test_create_then_join_counts_two() {
        let store = store();
        let (code, _alice) = store.create_session("Alice".to_string());
        let (view, _bob) = store
            .join_session(&code, "Bob".to_string())
            .expect("join succeeds");
        assert_eq!(view.user_count, 2);
    }

    #[test]
    fn test_join_unknown_code_not_found() {
        let store = store();
        let code = SessionCode::from_raw("ZZZ999").expect("valid code");
        let err = store
            .join_session(&code, "Bob".to_string())
            .expect_err("unknown code");
        assert_eq!(err.kind, moodring_core::error::ErrorKind::NotFound);
    }

    #[test]
    fn test_fiftieth_joins_fifty_first_fails() {
        let store = store();
        let (code, _) = store.create_session("Alice".to_string());
        for i in 2..=50 {
            store
                .join_session(&code, format!("user{i}"))
                .expect("under capacity");
        }
        assert_eq!(store.snapshot(&code).expect("live").user_count, 50);

        let err = store
            .join_session(&code, "late".to_string())
            .expect_err("51st rejected");
        assert_eq!(err.kind, moodring_core::error::ErrorKind::Capacity);
        assert_eq!(store.snapshot(&code).expect("live").user_count, 50);
    }

    #[test]
    fn test_expired_join_purges_session() {
        let store = store();
        let (code, _) = store.create_session("Alice".to_string());
        expire(&store, &code);

        let err = store
            .join_session(&code, "Bob".to_string())
            .expect_err("expired");
        assert_eq!(err.kind, moodring_core::error::ErrorKind::Expired);
        assert!(store.snapshot(&code).is_none());
    }

    #[test]
    fn test_remove_user_twice_is_noop() {
        let store = store();
        let (code, _alice) = store.create_session("Alice".to_string());
        let (_, bob) = store.join_session(&code, "Bob".to_string()).expect("join");

        match store.remove_user(&code, bob) {
            RemoveOutcome::Removed { user_name, view } => {
                assert_eq!(user_name, "Bob");
                assert_eq!(view.user_count, 1);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(matches!(store.remove_user(&code, bob), RemoveOutcome::NoOp));
    }

    #[test]
    fn test_empty_session_no_longer_retrievable() {
        let store = store();
        let (code, alice) = store.create_session("Alice".to_string());
        assert!(matches!(
            store.remove_user(&code, alice),
            RemoveOutcome::SessionDeleted { .. }
        ));
        assert!(store.snapshot(&code).is_none());
    }

    #[test]
    fn test_update_mood_appends_and_recomputes_vibe() {
        let store = store();
        let (code, alice) = store.create_session("Alice".to_string());
        let (_, bob) = store.join_session(&code, "Bob".to_string()).expect("join");

        store
            .update_mood(&code, alice, Mood::Energetic, String::new())
            .expect("known user");
        let update = store
            .update_mood(&code, bob, Mood::Energetic, String::new())
            .expect("known user");

        assert_eq!(update.view.vibe.dominant, Some(Mood::Energetic));
        assert_eq!(update.view.vibe.breakdown[0].percent, 100);

        let snapshot = store.stats_snapshot(&code).expect("live");
        assert_eq!(snapshot.mood_timeline.len(), 2);
    }

    #[test]
    fn test_update_mood_after_removal_is_silent_noop() {
        let store = store();
        let (code, _alice) = store.create_session("Alice".to_string());
        let (_, bob) = store.join_session(&code, "Bob".to_string()).expect("join");
        store.remove_user(&code, bob);

        assert!(
            store
                .update_mood(&code, bob, Mood::Happy, String::new())
                .is_none()
        );
    }

    #[test]
    fn test_reaction_to_unbound_user_recorded_without_target() {
        let store = store();
        let (code, alice) = store.create_session("Alice".to_string());
        let (_, bob) = store.join_session(&code, "Bob".to_string()).expect("join");

        let record = store
            .send_reaction(&code, alice, bob, ReactionKind::Hug)
            .expect("both known");
        assert!(record.target_connection.is_none());

        let snapshot = store.stats_snapshot(&code).expect("live");
        assert_eq!(snapshot.reactions_log.len(), 1);
    }

    #[test]
    fn test_reaction_to_bound_user_carries_connection() {
        let store = store();
        let (code, alice) = store.create_session("Alice".to_string());
        let (_, bob) = store.join_session(&code, "Bob".to_string()).expect("join");
        let conn = ConnectionId::new();
        store.bind_connection(&code, bob, conn);

        let record = store
            .send_reaction(&code, alice, bob, ReactionKind::Wave)
            .expect("both known");
        assert_eq!(record.target_connection, Some(conn));
    }

    #[test]
    fn test_unbind_only_clears_matching_connection() {
        let store = store();
        let (code, alice) = store.create_session("Alice".to_string());
        let old = ConnectionId::new();
        let newer = ConnectionId::new();
        store.bind_connection(&code, alice, old);
        store.bind_connection(&code, alice, newer);

        store.unbind_connection(&code, alice, old);
        assert_eq!(store.connection_of(&code, alice), Some(newer));

        store.unbind_connection(&code, alice, newer);
        assert_eq!(store.connection_of(&code, alice), None);
    }

    #[test]
    fn test_stats_snapshot_survives_until_purge() {
        let store = store();
        let (code, alice) = store.create_session("Alice".to_string());
        store
            .update_mood(&code, alice, Mood::Focused, String::new())
            .expect("known user");

        let snapshot = store.stats_snapshot(&code).expect("was live");
        assert_eq!(snapshot.mood_timeline.len(), 1);

        assert!(store.purge(&code));
        assert!(store.stats_snapshot(&code).is_none());
        assert!(!store.purge(&code));
    }

    #[test]
    fn test_purge_hook_fires_once_per_deletion() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let store = store();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        store.set_purge_hook(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let (code, alice) = store.create_session("Alice".to_string());
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        // Last-user removal deletes through the common purge path.
        store.remove_user(&code, alice);
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // Purging an already-absent code must not re-fire.
        store.purge(&code);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_purge_hook_fires_for_expiry_sweep() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let store = store();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        store.set_purge_hook(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let (code, _) = store.create_session("Alice".to_string());
        expire(&store, &code);
        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cleanup_sweeps_only_expired() {
        let store = store();
        let (expired_code, _) = store.create_session("Alice".to_string());
        let (live_code, _) = store.create_session("Bob".to_string());
        expire(&store, &expired_code);

        assert_eq!(store.cleanup_expired(), 1);
        assert!(store.snapshot(&expired_code).is_none());
        assert!(store.snapshot(&live_code).is_some());

        // Idempotent.
        assert_eq!(store.cleanup_expired(), 0);
    }

    #[test]
    fn test_codes_unique_among_live_sessions() {
        let store = store();
        let mut codes = std::collections::HashSet::new();
        for i in 0..200 {
            let (code, _) = store.create_session(format!("user{i}"));
            assert!(codes.insert(code));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduled_purge_fires_after_grace() {
        let store = store();
        let (code, _) = store.create_session("Alice".to_string());

        store.schedule_purge(code.clone(), Duration::from_secs(5));
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(store.snapshot(&code).is_some());

        tokio::time::sleep(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        assert!(store.snapshot(&code).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_earlier_purge_cancels_scheduled_task() {
        let store = store();
        let (code, _) = store.create_session("Alice".to_string());

        store.schedule_purge(code.clone(), Duration::from_secs(5));
        // The sweep wins the race; the deferred task must not fire twice.
        assert!(store.purge(&code));
        assert!(store.pending_purges.get(&code).is_none());

        tokio::time::sleep(Duration::from_secs(6)).await;
        tokio::task::yield_now().await;
        assert!(store.snapshot(&code).is_none());
    }
}
