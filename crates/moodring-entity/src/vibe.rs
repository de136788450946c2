//! Vibe calculation — the instantaneous aggregate mood of a session.

use serde::{Deserialize, Serialize};

use moodring_core::types::Mood;

use crate::user::User;

/// The derived aggregate mood snapshot of a session.
///
/// Never stored; recomputed from the current user states for every
/// public view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VibeSnapshot {
    /// The mood held by the largest number of users with a mood set.
    /// Ties break toward the mood first encountered in join order.
    pub dominant: Option<Mood>,
    /// Percentage share per mood among users with a mood set, in
    /// first-encountered order.
    pub breakdown: Vec<MoodShare>,
}

/// One mood's share of the current vibe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodShare {
    /// The mood.
    pub mood: Mood,
    /// Rounded percentage of users (with a mood) holding it.
    pub percent: u8,
}

impl VibeSnapshot {
    /// Compute the vibe over the given users, in their join order.
    pub fn of_users(users: &[User]) -> Self {
        // Counts keyed in first-encountered order so ties resolve
        // deterministically.
        let mut counts: Vec<(Mood, usize)> = Vec::new();
        let mut total = 0usize;

        for user in users {
            let Some(mood) = user.mood else { continue };
            total += 1;
            match counts.iter_mut().find(|(m, _)| *m == mood) {
                Some((_, n)) => *n += 1,
                None => counts.push((mood, 1)),
            }
        }

        if total == 0 {
            return Self {
                dominant: None,
                breakdown: Vec::new(),
            };
        }

        let mut dominant = None;
        let mut max = 0usize;
        for (mood, n) in &counts {
            if *n > max {
                max = *n;
                dominant = Some(*mood);
            }
        }

        let breakdown = counts
            .iter()
            .map(|(mood, n)| MoodShare {
                mood: *mood,
                percent: percent_of(*n, total),
            })
            .collect();

        Self { dominant, breakdown }
    }

    /// An empty vibe (no users with a mood set).
    pub fn empty() -> Self {
        Self {
            dominant: None,
            breakdown: Vec::new(),
        }
    }
}

/// Rounded integer percentage.
fn percent_of(count: usize, total: usize) -> u8 {
    ((count as f64 / total as f64) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with(mood: Option<Mood>) -> User {
        let mut user = User::new("someone".to_string(), Utc::now());
        user.mood = mood;
        user
    }

    #[test]
    fn test_empty_when_no_moods() {
        let users = vec![user_with(None), user_with(None)];
        let vibe = VibeSnapshot::of_users(&users);
        assert!(vibe.dominant.is_none());
        assert!(vibe.breakdown.is_empty());
    }

    #[test]
    fn test_unanimous_vibe() {
        let users = vec![user_with(Some(Mood::Energetic)), user_with(Some(Mood::Energetic))];
        let vibe = VibeSnapshot::of_users(&users);
        assert_eq!(vibe.dominant, Some(Mood::Energetic));
        assert_eq!(vibe.breakdown.len(), 1);
        assert_eq!(vibe.breakdown[0].percent, 100);
    }

    #[test]
    fn test_tie_breaks_toward_first_encountered() {
        let users = vec![
            user_with(Some(Mood::Sad)),
            user_with(Some(Mood::Happy)),
            user_with(Some(Mood::Happy)),
            user_with(Some(Mood::Sad)),
        ];
        let vibe = VibeSnapshot::of_users(&users);
        assert_eq!(vibe.dominant, Some(Mood::Sad));
    }

    #[test]
    fn test_breakdown_percentages() {
        let users = vec![
            user_with(Some(Mood::Happy)),
            user_with(Some(Mood::Happy)),
            user_with(Some(Mood::Tired)),
            user_with(None),
        ];
        let vibe = VibeSnapshot::of_users(&users);
        let happy = vibe.breakdown.iter().find(|s| s.mood == Mood::Happy).unwrap();
        let tired = vibe.breakdown.iter().find(|s| s.mood == Mood::Tired).unwrap();
        assert_eq!(happy.percent, 67);
        assert_eq!(tired.percent, 33);
    }
}
