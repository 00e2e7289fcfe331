use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::models::{CandidateProfile, LifestyleCategory, RoomOffer};

/// Errors while loading a candidate pool from disk
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to read pool file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse pool file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// In-memory candidate pool with attached room offers.
///
/// Read-only for the lifetime of the process; ranking never mutates it.
#[derive(Debug, Clone)]
pub struct CandidateDirectory {
    candidates: Vec<CandidateProfile>,
}

impl CandidateDirectory {
    /// Load a pool from a JSON file (an array of candidate profiles).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PoolError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let candidates: Vec<CandidateProfile> = serde_json::from_str(&raw)?;
        tracing::info!(
            "Loaded {} candidates from {}",
            candidates.len(),
            path.as_ref().display()
        );
        Ok(Self { candidates })
    }

    pub fn from_candidates(candidates: Vec<CandidateProfile>) -> Self {
        Self { candidates }
    }

    /// Built-in demo pool used when no pool file is configured.
    pub fn seed() -> Self {
        let lifestyle = |sleep: &str, clean: &str, noise: &str, social: &str, values: &str| {
            [
                (LifestyleCategory::SleepSchedule, sleep),
                (LifestyleCategory::Cleanliness, clean),
                (LifestyleCategory::NoiseTolerance, noise),
                (LifestyleCategory::SocialFrequency, social),
                (LifestyleCategory::RelationshipValues, values),
            ]
            .into_iter()
            .map(|(c, v)| (c, v.to_string()))
            .collect()
        };

        let candidates = vec![
            CandidateProfile {
                id: "cand-emma".to_string(),
                name: "Emma Wilson".to_string(),
                age: 24,
                occupation: "Marketing Manager".to_string(),
                lifestyle: lifestyle(
                    "early-bird",
                    "high-cleanliness",
                    "quiet-preference",
                    "moderate-social",
                    "boundaries-focused",
                ),
                room: RoomOffer {
                    number: "A-204".to_string(),
                    floor: 2,
                    amenities: vec![
                        "Private bathroom".to_string(),
                        "Balcony".to_string(),
                    ],
                    rent: 1200,
                },
            },
            CandidateProfile {
                id: "cand-maya".to_string(),
                name: "Maya Patel".to_string(),
                age: 26,
                occupation: "UX Designer".to_string(),
                lifestyle: lifestyle(
                    "night-owl",
                    "moderate-cleanliness",
                    "noise-tolerant",
                    "high-social",
                    "companionship-focused",
                ),
                room: RoomOffer {
                    number: "B-301".to_string(),
                    floor: 3,
                    amenities: vec![
                        "Walk-in closet".to_string(),
                        "City view".to_string(),
                    ],
                    rent: 1300,
                },
            },
            CandidateProfile {
                id: "cand-jessica".to_string(),
                name: "Jessica Chen".to_string(),
                age: 25,
                occupation: "Data Analyst".to_string(),
                lifestyle: lifestyle(
                    "early-bird",
                    "high-cleanliness",
                    "quiet-preference",
                    "low-social",
                    "boundaries-focused",
                ),
                room: RoomOffer {
                    number: "A-205".to_string(),
                    floor: 2,
                    amenities: vec!["Large windows".to_string()],
                    rent: 1150,
                },
            },
            CandidateProfile {
                id: "cand-sarah".to_string(),
                name: "Sarah Johnson".to_string(),
                age: 26,
                occupation: "Software Engineer".to_string(),
                lifestyle: lifestyle(
                    "night-owl",
                    "moderate-cleanliness",
                    "balanced-noise",
                    "moderate-social",
                    "communication-focused",
                ),
                room: RoomOffer {
                    number: "B-302".to_string(),
                    floor: 3,
                    amenities: vec![
                        "Ensuite bathroom".to_string(),
                        "City view".to_string(),
                    ],
                    rent: 1300,
                },
            },
        ];

        Self { candidates }
    }

    pub fn candidates(&self) -> &[CandidateProfile] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Number of distinct rooms offered across the pool.
    pub fn rooms_listed(&self) -> usize {
        self.candidates
            .iter()
            .map(|c| c.room.number.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}
