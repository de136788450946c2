//! Single-choice polls.
//!
//! A session holds zero or one poll at a time. The poll state machine has
//! two states — no active poll, and exactly one active poll with a voter
//! map — and the transitions live here plus on [`crate::Session`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use moodring_core::types::UserId;
use moodring_core::{AppError, AppResult};

/// Minimum number of options a poll must offer.
pub const MIN_OPTIONS: usize = 2;

/// Maximum number of options a poll may offer.
pub const MAX_OPTIONS: usize = 6;

/// An active single-choice poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poll {
    /// The question being asked.
    pub question: String,
    /// Ordered option labels.
    pub options: Vec<String>,
    /// Display name of the creating user.
    pub created_by: String,
    /// When the poll was opened.
    pub created_at: DateTime<Utc>,
    /// Voter IDs per option, indexed like `options`.
    pub votes: Vec<Vec<UserId>>,
}

impl Poll {
    /// Open a new poll, validating the question and option labels.
    ///
    /// Requires a non-empty question and between [`MIN_OPTIONS`] and
    /// [`MAX_OPTIONS`] non-empty option labels.
    pub fn open(question: String, options: Vec<String>, created_by: String) -> AppResult<Self> {
        let question = question.trim().to_string();
        if question.is_empty() {
            return Err(AppError::validation("Poll question is required"));
        }

        let options: Vec<String> = options
            .into_iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
        if options.len() < MIN_OPTIONS {
            return Err(AppError::validation(format!(
                "A poll needs at least {MIN_OPTIONS} options"
            )));
        }
        if options.len() > MAX_OPTIONS {
            return Err(AppError::validation(format!(
                "A poll allows at most {MAX_OPTIONS} options"
            )));
        }

        let votes = vec![Vec::new(); options.len()];
        Ok(Self {
            question,
            options,
            created_by,
            created_at: Utc::now(),
            votes,
        })
    }

    /// Cast (or move) a user's vote to the given option.
    ///
    /// Any prior vote by the same user is retracted first, so a user's
    /// vote occupies exactly one option at a time. Re-voting the option
    /// the user already holds completes without error. Out-of-range
    /// indexes are rejected without mutating state.
    pub fn vote(&mut self, user_id: UserId, option_index: usize) -> AppResult<()> {
        if option_index >= self.options.len() {
            return Err(AppError::validation(format!(
                "Option index {option_index} is out of range"
            )));
        }

        for voters in &mut self.votes {
            voters.retain(|id| *id != user_id);
        }
        self.votes[option_index].push(user_id);
        Ok(())
    }

    /// Total number of votes cast.
    pub fn total_votes(&self) -> usize {
        self.votes.iter().map(Vec::len).sum()
    }
}
