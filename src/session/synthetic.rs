//! Placeholder values for figures the backend did not report.
//!
//! Nothing produced here is a measurement. Callers tag every value taken
//! from this module with `Origin::Synthetic`.

use crate::config::SyntheticBands;
use crate::models::chat::{ Confidence, SourceMatch };
use rand::rngs::StdRng;
use rand::{ Rng, SeedableRng };

/// Upper bound on the simulated top-matches list.
pub const MAX_TOP_MATCHES: usize = 3;

const TOP_SCORE: f64 = 0.92;
const SCORE_STEP: f64 = 0.07;

pub struct SyntheticPolicy {
    bands: SyntheticBands,
    rng: StdRng,
}

impl SyntheticPolicy {
    pub fn new(bands: SyntheticBands) -> Self {
        Self { bands, rng: StdRng::from_entropy() }
    }

    pub fn seeded(bands: SyntheticBands, seed: u64) -> Self {
        Self { bands, rng: StdRng::seed_from_u64(seed) }
    }

    pub fn confidence(&mut self) -> Confidence {
        let band = self.bands.confidence.clone();
        if band.is_empty() {
            return Confidence::synthetic(*band.start());
        }
        Confidence::synthetic(self.rng.gen_range(band))
    }

    pub fn processing_time_ms(&mut self) -> u64 {
        let band = self.bands.processing_time_ms.clone();
        if band.is_empty() {
            return *band.start();
        }
        self.rng.gen_range(band)
    }

    /// Simulated ranking of `count` sources (capped at [`MAX_TOP_MATCHES`]).
    /// Names cycle through `known_documents`, or generic knowledge-base
    /// entries when none are known.
    pub fn top_matches(&self, count: u64, known_documents: &[String], source: &str) -> Vec<SourceMatch> {
        let count = (count.min(MAX_TOP_MATCHES as u64)) as usize;
        (0..count)
            .map(|i| {
                let name = if known_documents.is_empty() {
                    format!("{} entry {}", source, i + 1)
                } else {
                    known_documents[i % known_documents.len()].clone()
                };
                let score = ((TOP_SCORE - SCORE_STEP * (i as f64)) * 100.0).round() / 100.0;
                SourceMatch { name, score }
            })
            .collect()
    }
}
