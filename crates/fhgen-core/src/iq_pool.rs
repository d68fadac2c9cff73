//! IQ Sample Pool
//!
//! The ordered pool of signed 8-bit IQ samples the assembler draws from.
//! Element 2k is I, element 2k+1 is Q. The pool is created once at startup
//! and read-only thereafter; packets slice it with a single monotonically
//! increasing cursor, wrapping modulo the pool length.
//!
//! Fixed mode reads a text file with one `I Q` pair per line; lines that do
//! not parse as two integers are skipped. Random mode sizes the pool to the
//! run's full sample demand and fills it from `StdRng` — non-reproducible
//! by default, reproducible through the seed hook.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::capacity_plan::StreamPlan;
use crate::config::{Config, PayloadType};
use crate::types::{FhError, FhResult};

/// Read-only pool of interleaved I/Q samples.
#[derive(Debug, Clone)]
pub struct IqPool {
    samples: Vec<i8>,
}

impl IqPool {
    /// Build the pool a configuration asks for: file-backed in fixed mode,
    /// sized-to-run random in random mode. `seed` makes random mode
    /// reproducible; pass `None` for entropy seeding.
    pub fn for_run(cfg: &Config, plan: &StreamPlan, seed: Option<u64>) -> FhResult<Self> {
        match cfg.payload_type()? {
            PayloadType::Fixed => Self::from_file(&cfg.iq_sample_source),
            PayloadType::Random => Ok(match seed {
                Some(seed) => Self::random_seeded(plan.total_iq_samples(), seed),
                None => Self::random(plan.total_iq_samples()),
            }),
        }
    }

    /// Parse an IQ sample file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> FhResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| FhError::IqSourceFailure {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        let mut samples = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|err| FhError::IqSourceFailure {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;
            let mut fields = line.split_whitespace();
            let (Some(i), Some(q)) = (fields.next(), fields.next()) else {
                continue;
            };
            let (Ok(i), Ok(q)) = (i.parse::<i32>(), q.parse::<i32>()) else {
                continue;
            };
            samples.push(i as i8);
            samples.push(q as i8);
        }

        if samples.is_empty() {
            return Err(FhError::IqSourceFailure {
                path: path.to_path_buf(),
                reason: "no IQ samples found".to_string(),
            });
        }
        Ok(Self { samples })
    }

    /// Pool of `len` uniformly random samples, entropy-seeded.
    pub fn random(len: u64) -> Self {
        Self::fill_random(len, StdRng::from_entropy())
    }

    /// Pool of `len` uniformly random samples from a fixed seed. Two pools
    /// built with the same length and seed are identical.
    pub fn random_seeded(len: u64, seed: u64) -> Self {
        Self::fill_random(len, StdRng::seed_from_u64(seed))
    }

    fn fill_random(len: u64, mut rng: StdRng) -> Self {
        let samples = (0..len).map(|_| rng.gen::<i8>()).collect();
        Self { samples }
    }

    /// Pool over caller-provided samples.
    pub fn from_samples(samples: Vec<i8>) -> Self {
        Self { samples }
    }

    /// Number of samples in the pool.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the pool holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at the wrapped cursor position.
    pub fn at(&self, cursor: u64) -> i8 {
        self.samples[(cursor % self.samples.len() as u64) as usize]
    }

    /// Copy `count` samples starting at `cursor` into `out` (cleared first),
    /// wrapping modulo the pool length.
    pub fn slice_into(&self, cursor: u64, count: usize, out: &mut Vec<i8>) {
        out.clear();
        out.reserve(count);
        for i in 0..count as u64 {
            out.push(self.at(cursor + i));
        }
    }
}
