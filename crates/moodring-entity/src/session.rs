//! The session entity — one bounded-lifetime group of participants.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use moodring_core::types::{Mood, ReactionKind, SessionCode, UserId};
use moodring_core::{AppError, AppResult};

use crate::chat::ChatMessage;
use crate::poll::Poll;
use crate::reaction::Reaction;
use crate::timeline::MoodEntry;
use crate::user::User;
use crate::vibe::VibeSnapshot;
use crate::view::{SessionSnapshot, SessionView};

/// A live session: participants, logs, and at most one active poll.
///
/// Users are kept in join order; the first entry is the creator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique code among live sessions.
    pub code: SessionCode,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Expiry time (creation + configured TTL).
    pub expires_at: DateTime<Utc>,
    /// Participants in join order.
    pub users: Vec<User>,
    /// Append-only mood change log.
    pub mood_timeline: Vec<MoodEntry>,
    /// Append-only reaction log.
    pub reactions_log: Vec<Reaction>,
    /// Capped chat log, oldest first.
    pub messages: VecDeque<ChatMessage>,
    /// Active poll, or none.
    pub poll: Option<Poll>,
}

impl Session {
    /// Create a session with the creator as sole user.
    pub fn new(code: SessionCode, creator_name: String, ttl_hours: u64) -> Self {
        let now = Utc::now();
        let creator = User::new(creator_name, now);
        Self {
            code,
            created_at: now,
            expires_at: now + Duration::hours(ttl_hours as i64),
            users: vec![creator],
            mood_timeline: Vec::new(),
            reactions_log: Vec::new(),
            messages: VecDeque::new(),
            poll: None,
        }
    }

    /// Whether the session is past its expiry time.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Whether the session holds no users (and should be deleted).
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// The creator is the first user in join order.
    pub fn is_creator(&self, user_id: UserId) -> bool {
        self.users.first().is_some_and(|u| u.id == user_id)
    }

    /// Look up a participant.
    pub fn user(&self, user_id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    /// Look up a participant mutably.
    pub fn user_mut(&mut self, user_id: UserId) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == user_id)
    }

    /// Add a participant, enforcing the capacity limit.
    pub fn add_user(&mut self, name: String, max_users: usize) -> AppResult<UserId> {
        if self.users.len() >= max_users {
            return Err(AppError::capacity(format!(
                "This session is full (max {max_users} people)"
            )));
        }
        let user = User::new(name, Utc::now());
        let id = user.id;
        self.users.push(user);
        Ok(id)
    }

    /// Remove a participant, returning their name if they were present.
    pub fn remove_user(&mut self, user_id: UserId) -> Option<String> {
        let index = self.users.iter().position(|u| u.id == user_id)?;
        Some(self.users.remove(index).name)
    }

    /// Update a participant's mood and append a timeline entry.
    ///
    /// Silent no-op (returns `None`) for an unknown user.
    pub fn record_mood(&mut self, user_id: UserId, mood: Mood, status: String) -> Option<MoodEntry> {
        let now = Utc::now();
        let user = self.user_mut(user_id)?;
        user.set_mood(mood, status.clone(), now);

        let entry = MoodEntry {
            user_id,
            mood,
            status,
            timestamp: now,
        };
        self.mood_timeline.push(entry.clone());
        Some(entry)
    }

    /// Record a reaction from one participant to another.
    ///
    /// Appends to the session log and to the target's bounded
    /// recent-reactions list. Silent no-op if either user is unknown.
    pub fn record_reaction(
        &mut self,
        from: UserId,
        to: UserId,
        kind: ReactionKind,
        recent_cap: usize,
    ) -> Option<Reaction> {
        let from_name = self.user(from)?.name.clone();
        self.user(to)?;

        let reaction = Reaction {
            from_user_id: from,
            from_user_name: from_name,
            to_user_id: to,
            kind,
            timestamp: Utc::now(),
        };

        self.reactions_log.push(reaction.clone());
        if let Some(target) = self.user_mut(to) {
            target.record_reaction(reaction.clone(), recent_cap);
        }
        Some(reaction)
    }

    /// Append a chat message, dropping the oldest past the cap.
    ///
    /// Silent no-op if the author is unknown.
    pub fn push_message(&mut self, user_id: UserId, text: String, cap: usize) -> Option<ChatMessage> {
        let user_name = self.user(user_id)?.name.clone();
        let message = ChatMessage::new(user_id, user_name, text);
        self.messages.push_back(message.clone());
        while self.messages.len() > cap {
            self.messages.pop_front();
        }
        Some(message)
    }

    /// Open a poll, failing with Conflict while one is already active.
    ///
    /// The existing poll and its votes are left untouched on failure.
    pub fn create_poll(
        &mut self,
        creator: UserId,
        question: String,
        options: Vec<String>,
    ) -> AppResult<Poll> {
        let created_by = self
            .user(creator)
            .map(|u| u.name.clone())
            .ok_or_else(|| AppError::not_found("Unknown user"))?;

        if self.poll.is_some() {
            return Err(AppError::conflict("A poll is already active"));
        }

        let poll = Poll::open(question, options, created_by)?;
        self.poll = Some(poll.clone());
        Ok(poll)
    }

    /// Cast a vote on the active poll.
    ///
    /// Returns the updated poll; `None` when no poll is active or the
    /// index is out of range (state unchanged either way).
    pub fn vote_poll(&mut self, user_id: UserId, option_index: usize) -> Option<Poll> {
        let poll = self.poll.as_mut()?;
        poll.vote(user_id, option_index).ok()?;
        Some(poll.clone())
    }

    /// Discard the active poll and its votes, if any.
    pub fn clear_poll(&mut self) {
        self.poll = None;
    }

    /// Build the public view: sanitized users, fresh vibe, chat log, poll.
    pub fn view(&self) -> SessionView {
        SessionView {
            code: self.code.clone(),
            created_at: self.created_at,
            expires_at: self.expires_at,
            user_count: self.users.len(),
            users: self.users.iter().map(User::to_view).collect(),
            vibe: VibeSnapshot::of_users(&self.users),
            messages: self.messages.iter().cloned().collect(),
            poll: self.poll.clone(),
        }
    }

    /// Capture the one-shot stats snapshot: final view plus full logs.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session: self.view(),
            mood_timeline: self.mood_timeline.clone(),
            reactions_log: self.reactions_log.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        let code = SessionCode::from_raw("ABC123").expect("valid code");
        Session::new(code, "Alice".to_string(), 24)
    }

    #[test]
    fn test_creator_is_first_user() {
        let mut s = session();
        let bob = s.add_user("Bob".to_string(), 50).expect("join");
        assert!(s.is_creator(s.users[0].id));
        assert!(!s.is_creator(bob));
    }

    #[test]
    fn test_capacity_enforced() {
        let mut s = session();
        for i in 1..50 {
            s.add_user(format!("user{i}"), 50).expect("under cap");
        }
        assert_eq!(s.users.len(), 50);
        let err = s.add_user("late".to_string(), 50).expect_err("over cap");
        assert_eq!(err.kind, moodring_core::error::ErrorKind::Capacity);
        assert_eq!(s.users.len(), 50);
    }

    #[test]
    fn test_mood_update_appends_timeline() {
        let mut s = session();
        let alice = s.users[0].id;
        s.record_mood(alice, Mood::Happy, "great".to_string())
            .expect("known user");
        s.record_mood(alice, Mood::Tired, String::new())
            .expect("known user");
        assert_eq!(s.mood_timeline.len(), 2);
        assert_eq!(s.users[0].mood, Some(Mood::Tired));
    }

    #[test]
    fn test_mood_update_unknown_user_is_noop() {
        let mut s = session();
        assert!(s.record_mood(UserId::new(), Mood::Happy, String::new()).is_none());
        assert!(s.mood_timeline.is_empty());
    }

    #[test]
    fn test_chat_log_capped() {
        let mut s = session();
        let alice = s.users[0].id;
        for i in 0..110 {
            s.push_message(alice, format!("msg {i}"), 100).expect("known user");
        }
        assert_eq!(s.messages.len(), 100);
        assert_eq!(s.messages.front().unwrap().text, "msg 10");
    }

    #[test]
    fn test_second_poll_conflicts_and_preserves_votes() {
        let mut s = session();
        let alice = s.users[0].id;
        s.create_poll(
            alice,
            "Q?".to_string(),
            vec!["A".to_string(), "B".to_string()],
        )
        .expect("first poll");
        s.vote_poll(alice, 1).expect("vote");

        let err = s
            .create_poll(
                alice,
                "Another?".to_string(),
                vec!["C".to_string(), "D".to_string()],
            )
            .expect_err("second poll");
        assert_eq!(err.kind, moodring_core::error::ErrorKind::Conflict);

        let poll = s.poll.as_ref().expect("still active");
        assert_eq!(poll.question, "Q?");
        assert_eq!(poll.votes[1], vec![alice]);
    }

    #[test]
    fn test_reaction_recorded_for_target_without_connection() {
        let mut s = session();
        let alice = s.users[0].id;
        let bob = s.add_user("Bob".to_string(), 50).expect("join");
        assert!(s.user(bob).unwrap().connection.is_none());

        s.record_reaction(alice, bob, ReactionKind::Hug, 10)
            .expect("both users known");
        assert_eq!(s.reactions_log.len(), 1);
        assert_eq!(s.user(bob).unwrap().reactions_received.len(), 1);
    }

    #[test]
    fn test_vibe_scenario_all_energetic() {
        let mut s = session();
        let alice = s.users[0].id;
        let bob = s.add_user("Bob".to_string(), 50).expect("join");
        s.record_mood(alice, Mood::Energetic, String::new()).unwrap();
        s.record_mood(bob, Mood::Energetic, String::new()).unwrap();

        let view = s.view();
        assert_eq!(view.vibe.dominant, Some(Mood::Energetic));
        assert_eq!(view.vibe.breakdown.len(), 1);
        assert_eq!(view.vibe.breakdown[0].percent, 100);
    }
}
