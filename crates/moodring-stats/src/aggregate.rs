//! The aggregation pass: logs in, report out.
//!
//! Every "most X" selection here is deterministic: candidates are visited
//! in insertion/arrival order and a later candidate wins only with a
//! strictly greater score, so ties break toward the first encountered.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use moodring_core::types::{Mood, UserId};
use moodring_entity::reaction::Reaction;
use moodring_entity::timeline::MoodEntry;
use moodring_entity::view::{SessionSnapshot, UserView};

use crate::format::format_duration;
use crate::report::{
    CountedUser, Highlights, MoodInfluencer, MoodSlice, Overview, ParticipantSummary, PeakVibe,
    SessionReport, Streak,
};

/// Width of the peak-vibe detection window.
const PEAK_WINDOW_MS: i64 = 10 * 60 * 1000;

/// Width of the influencer detection window.
const INFLUENCER_WINDOW_MS: i64 = 5 * 60 * 1000;

/// Produce the end-of-session report from the final snapshot.
pub fn calculate(snapshot: &SessionSnapshot) -> SessionReport {
    let now = Utc::now();
    let users = &snapshot.session.users;
    let timeline = &snapshot.mood_timeline;
    let reactions = &snapshot.reactions_log;

    SessionReport {
        overview: overview(snapshot, now),
        mood_distribution: mood_distribution(timeline),
        peak_vibe: peak_vibe(timeline),
        mood_influencer: mood_influencer(users, timeline),
        highlights: highlights(users, timeline, reactions),
        participants: participants(users, timeline, reactions, now),
    }
}

fn overview(snapshot: &SessionSnapshot, now: DateTime<Utc>) -> Overview {
    let started_at = snapshot.session.created_at;
    Overview {
        code: snapshot.session.code.clone(),
        duration: format_duration(now - started_at),
        total_participants: snapshot.session.users.len(),
        total_mood_changes: snapshot.mood_timeline.len(),
        started_at,
        ended_at: now,
    }
}

fn mood_distribution(timeline: &[MoodEntry]) -> Vec<MoodSlice> {
    let total = timeline.len();
    Mood::ALL
        .iter()
        .map(|mood| {
            let count = timeline.iter().filter(|e| e.mood == *mood).count();
            let percentage = if total == 0 {
                0
            } else {
                ((count as f64 / total as f64) * 100.0).round() as u8
            };
            MoodSlice {
                mood: *mood,
                count,
                percentage,
            }
        })
        .collect()
}

/// Partition entries into fixed windows keyed by absolute time, keeping
/// windows in first-encountered order.
fn window_entries(timeline: &[MoodEntry], window_ms: i64) -> Vec<(i64, Vec<&MoodEntry>)> {
    let mut windows: Vec<(i64, Vec<&MoodEntry>)> = Vec::new();
    for entry in timeline {
        let key = entry.timestamp.timestamp_millis().div_euclid(window_ms);
        match windows.iter_mut().find(|(k, _)| *k == key) {
            Some((_, entries)) => entries.push(entry),
            None => windows.push((key, vec![entry])),
        }
    }
    windows
}

/// Most frequent mood in arrival order, first encountered winning ties.
fn dominant_mood<I: IntoIterator<Item = Mood>>(moods: I) -> Option<Mood> {
    let mut counts: Vec<(Mood, usize)> = Vec::new();
    for mood in moods {
        match counts.iter_mut().find(|(m, _)| *m == mood) {
            Some((_, n)) => *n += 1,
            None => counts.push((mood, 1)),
        }
    }
    first_max(counts.into_iter()).map(|(mood, _)| mood)
}

/// Select the entry with the strictly greatest score; earlier entries
/// win ties.
fn first_max<K, I: Iterator<Item = (K, usize)>>(items: I) -> Option<(K, usize)> {
    let mut best: Option<(K, usize)> = None;
    for (key, score) in items {
        match &best {
            Some((_, max)) if score <= *max => {}
            _ => best = Some((key, score)),
        }
    }
    best
}

fn peak_vibe(timeline: &[MoodEntry]) -> Option<PeakVibe> {
    let windows = window_entries(timeline, PEAK_WINDOW_MS);

    let scored = windows.iter().map(|(key, entries)| {
        let positive = entries.iter().filter(|e| e.mood.is_positive()).count();
        ((key, entries), positive)
    });
    let ((key, entries), positive_count) = first_max(scored)?;
    if positive_count == 0 {
        return None;
    }

    let mood = dominant_mood(entries.iter().map(|e| e.mood))?;
    let window_start = DateTime::from_timestamp_millis(key * PEAK_WINDOW_MS)?;

    Some(PeakVibe {
        window_start,
        positive_count,
        mood,
    })
}

fn mood_influencer(users: &[UserView], timeline: &[MoodEntry]) -> Option<MoodInfluencer> {
    // Within each window a user counts once, with their last entry there.
    let mut windows: Vec<Vec<(UserId, Mood)>> = Vec::new();
    {
        let mut keys: Vec<i64> = Vec::new();
        for entry in timeline {
            let key = entry
                .timestamp
                .timestamp_millis()
                .div_euclid(INFLUENCER_WINDOW_MS);
            let index = match keys.iter().position(|k| *k == key) {
                Some(i) => i,
                None => {
                    keys.push(key);
                    windows.push(Vec::new());
                    windows.len() - 1
                }
            };
            let window = &mut windows[index];
            match window.iter_mut().find(|(id, _)| *id == entry.user_id) {
                Some((_, mood)) => *mood = entry.mood,
                None => window.push((entry.user_id, entry.mood)),
            }
        }
    }

    // matches / windows-present per user, counting only final participants.
    let mut tallies: HashMap<UserId, (usize, usize)> = HashMap::new();
    for window in &windows {
        let Some(dominant) = dominant_mood(window.iter().map(|(_, m)| *m)) else {
            continue;
        };
        for (user_id, mood) in window {
            if !users.iter().any(|u| u.id == *user_id) {
                continue;
            }
            let (matches, total) = tallies.entry(*user_id).or_insert((0, 0));
            *total += 1;
            if *mood == dominant {
                *matches += 1;
            }
        }
    }

    let scored = users.iter().filter_map(|user| {
        let (matches, total) = tallies.get(&user.id)?;
        let percentage = ((*matches as f64 / *total as f64) * 100.0).round() as usize;
        Some((user, percentage))
    });

    first_max(scored).map(|(user, percentage)| MoodInfluencer {
        user_id: user.id,
        name: user.name.clone(),
        percentage: percentage as u8,
    })
}

fn longest_streak(users: &[UserView], timeline: &[MoodEntry]) -> Option<Streak> {
    let mut best: Option<(Streak, Duration)> = None;

    for user in users {
        let entries: Vec<&MoodEntry> = timeline.iter().filter(|e| e.user_id == user.id).collect();
        let mut run_start = 0;
        for i in 0..entries.len() {
            let run_ends = match entries.get(i + 1) {
                Some(next) => next.mood != entries[i].mood,
                None => true,
            };
            if !run_ends {
                continue;
            }

            let duration = entries[i].timestamp - entries[run_start].timestamp;
            let is_longer = match &best {
                Some((_, max)) => duration > *max,
                None => true,
            };
            if is_longer {
                best = Some((
                    Streak {
                        user_id: user.id,
                        user_name: user.name.clone(),
                        mood: entries[run_start].mood,
                        duration_secs: duration.num_seconds(),
                        duration_text: format_duration(duration),
                    },
                    duration,
                ));
            }
            run_start = i + 1;
        }
    }

    best.map(|(streak, _)| streak)
}

/// Tally occurrences keyed by user, preserving first-encountered order.
fn tally_users<I: Iterator<Item = UserId>>(ids: I) -> Vec<(UserId, usize)> {
    let mut counts: Vec<(UserId, usize)> = Vec::new();
    for id in ids {
        match counts.iter_mut().find(|(u, _)| *u == id) {
            Some((_, n)) => *n += 1,
            None => counts.push((id, 1)),
        }
    }
    counts
}

fn counted_user(users: &[UserView], counts: Vec<(UserId, usize)>) -> Option<CountedUser> {
    first_max(counts.into_iter()).map(|(user_id, count)| CountedUser {
        user_id,
        user_name: users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.name.clone())
            .unwrap_or_else(|| "unknown".to_string()),
        count,
    })
}

fn highlights(users: &[UserView], timeline: &[MoodEntry], reactions: &[Reaction]) -> Highlights {
    Highlights {
        longest_streak: longest_streak(users, timeline),
        most_changes: counted_user(users, tally_users(timeline.iter().map(|e| e.user_id))),
        most_reactions_sent: counted_user(
            users,
            tally_users(reactions.iter().map(|r| r.from_user_id)),
        ),
        most_reactions_received: counted_user(
            users,
            tally_users(reactions.iter().map(|r| r.to_user_id)),
        ),
    }
}

fn participants(
    users: &[UserView],
    timeline: &[MoodEntry],
    reactions: &[Reaction],
    now: DateTime<Utc>,
) -> Vec<ParticipantSummary> {
    users
        .iter()
        .map(|user| ParticipantSummary {
            user_id: user.id,
            name: user.name.clone(),
            most_frequent_mood: dominant_mood(
                timeline
                    .iter()
                    .filter(|e| e.user_id == user.id)
                    .map(|e| e.mood),
            ),
            time_in_session: format_duration(now - user.joined_at),
            reactions_sent: reactions.iter().filter(|r| r.from_user_id == user.id).count(),
            reactions_received: reactions.iter().filter(|r| r.to_user_id == user.id).count(),
        })
        .collect()
}
