use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Caption row from the `captions` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Caption {
    pub id: Uuid,
    pub content: String,
    pub created_datetime_utc: DateTime<Utc>,
}

/// Vote direction for a caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteKind {
    Up,
    Down,
}

impl VoteKind {
    /// Value stored in `caption_votes.vote_value`.
    pub fn value(self) -> i16 {
        match self {
            VoteKind::Up => 1,
            VoteKind::Down => -1,
        }
    }
}

/// Row inserted into the `caption_votes` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionVote {
    pub profile_id: Uuid,
    pub caption_id: Uuid,
    pub vote_value: i16,
    pub created_datetime_utc: DateTime<Utc>,
}

impl CaptionVote {
    /// Vote by `profile_id` on `caption`, carrying the caption's creation
    /// timestamp alongside as the table expects.
    pub fn new(profile_id: Uuid, caption: &Caption, kind: VoteKind) -> Self {
        Self {
            profile_id,
            caption_id: caption.id,
            vote_value: kind.value(),
            created_datetime_utc: caption.created_datetime_utc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caption() -> Caption {
        Caption {
            id: Uuid::new_v4(),
            content: "A dog.".to_string(),
            created_datetime_utc: Utc::now(),
        }
    }

    #[test]
    fn vote_values() {
        assert_eq!(VoteKind::Up.value(), 1);
        assert_eq!(VoteKind::Down.value(), -1);
    }

    #[test]
    fn vote_row_copies_caption_fields() {
        let caption = caption();
        let profile_id = Uuid::new_v4();
        let vote = CaptionVote::new(profile_id, &caption, VoteKind::Down);
        assert_eq!(vote.profile_id, profile_id);
        assert_eq!(vote.caption_id, caption.id);
        assert_eq!(vote.vote_value, -1);
        assert_eq!(vote.created_datetime_utc, caption.created_datetime_utc);
    }
}
