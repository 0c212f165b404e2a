// src/funnel.rs

//! Round-drop funnel: which interview stage a student fell out at.

use serde::{Deserialize, Serialize};

use crate::models::StageProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Coding,
    TechnicalInterview,
    HrInterview,
    FinalOffer,
}

impl Stage {
    pub const PIPELINE: [Stage; 4] = [
        Stage::Coding,
        Stage::TechnicalInterview,
        Stage::HrInterview,
        Stage::FinalOffer,
    ];

    /// Name as stored in the `rounds` column.
    pub fn name(self) -> &'static str {
        match self {
            Stage::Coding => "Coding",
            Stage::TechnicalInterview => "Technical Interview",
            Stage::HrInterview => "HR Interview",
            Stage::FinalOffer => "Final Offer",
        }
    }

    fn cleared_by<S: AsRef<str>>(self, rounds: &[S]) -> bool {
        rounds.iter().any(|r| r.as_ref() == self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropBucket {
    Round1Failed,
    Round2Failed,
    Round3Failed,
    Round4Failed,
}

/// First matching rule wins. A student who never cleared Coding only counts
/// as a round-1 drop when their score is positive.
pub fn classify<S: AsRef<str>>(rounds: &[S], score: f64) -> Option<DropBucket> {
    let [coding, technical, hr, offer] = Stage::PIPELINE.map(|stage| stage.cleared_by(rounds));

    if !coding && score > 0.0 {
        Some(DropBucket::Round1Failed)
    } else if coding && !technical {
        Some(DropBucket::Round2Failed)
    } else if technical && !hr {
        Some(DropBucket::Round3Failed)
    } else if hr && !offer {
        Some(DropBucket::Round4Failed)
    } else {
        None
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundDrop {
    pub round_1_failed: i64,
    pub round_2_failed: i64,
    pub round_3_failed: i64,
    pub round_4_failed: i64,
}

impl RoundDrop {
    pub fn record(&mut self, bucket: DropBucket) {
        let counter = match bucket {
            DropBucket::Round1Failed => &mut self.round_1_failed,
            DropBucket::Round2Failed => &mut self.round_2_failed,
            DropBucket::Round3Failed => &mut self.round_3_failed,
            DropBucket::Round4Failed => &mut self.round_4_failed,
        };
        *counter += 1;
    }

    pub fn tally<'a, I>(students: I) -> Self
    where
        I: IntoIterator<Item = &'a StageProgress>,
    {
        let mut drop = Self::default();
        for student in students {
            if let Some(bucket) = classify(student.rounds.as_slice(), student.cgpa) {
                drop.record(bucket);
            }
        }
        drop
    }
}
