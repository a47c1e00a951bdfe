// sentinel-core/src/infrastructure/adapters/synthetic.rs
//
// Seeded generator for the three demo feeds. Each mode has its own fixed
// seed, so a given (mode, size) always yields the same dataset.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use tracing::{debug, instrument};

use crate::domain::dataset::{Dataset, DatasetMode, Record};
use crate::error::SentinelError;
use crate::ports::dataset::DatasetProvider;

pub const DEFAULT_SIZE: usize = 1000;

const GENDERS: [(&str, f64); 2] = [("Male", 0.52), ("Female", 0.48)];
const EMPLOYMENT: [(&str, f64); 4] = [
    ("Full-time", 0.65),
    ("Part-time", 0.15),
    ("Self-employed", 0.15),
    ("Unemployed", 0.05),
];

const DECISION_NOISE: f64 = 0.05;
/// Clean feed is topped up until female/male approval reaches this ratio.
const CLEAN_TARGET_DI: f64 = 0.95;
const CLEAN_BOOST_SHARE: f64 = 0.10;

/// Per-mode generation settings.
#[derive(Debug, Clone, Copy)]
struct Scenario {
    seed: u64,
    accuracy: f64,
    probability_clip: (f64, f64),
    female_penalty: f64,
    economic_downturn: bool,
    balance_gender: bool,
}

impl Scenario {
    fn of(mode: DatasetMode) -> Self {
        match mode {
            DatasetMode::Clean => Scenario {
                seed: 42,
                accuracy: 0.87,
                probability_clip: (0.1, 0.9),
                female_penalty: 0.0,
                economic_downturn: false,
                balance_gender: true,
            },
            DatasetMode::Biased => Scenario {
                seed: 43,
                accuracy: 0.85,
                probability_clip: (0.05, 0.95),
                female_penalty: -0.18,
                economic_downturn: false,
                balance_gender: false,
            },
            DatasetMode::Drifted => Scenario {
                seed: 44,
                accuracy: 0.75,
                probability_clip: (0.1, 0.9),
                female_penalty: 0.0,
                economic_downturn: true,
                balance_gender: false,
            },
        }
    }
}

// --- SAMPLING ---

/// The handful of distributions the generator needs, on top of a seeded RNG.
struct Sampler {
    rng: StdRng,
}

impl Sampler {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Box-Muller transform.
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.uniform().max(1e-10);
        let u2 = self.uniform();
        mean + std_dev * (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    fn lognormal(&mut self, mu: f64, sigma: f64) -> f64 {
        self.normal(mu, sigma).exp()
    }

    /// Gamma(shape, 1) for integer shapes: sum of unit exponentials.
    fn gamma_int(&mut self, shape: u32) -> f64 {
        (0..shape).map(|_| -(1.0 - self.uniform()).ln()).sum()
    }

    fn beta_int(&mut self, alpha: u32, beta: u32) -> f64 {
        let x = self.gamma_int(alpha);
        let y = self.gamma_int(beta);
        x / (x + y)
    }

    fn choice<'a>(&mut self, weighted: &[(&'a str, f64)]) -> &'a str {
        let mut target = self.uniform();
        for (value, weight) in weighted {
            if target < *weight {
                return *value;
            }
            target -= weight;
        }
        // Rounding left a sliver past the last bucket
        weighted.last().map_or("", |(v, _)| *v)
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

// --- GENERATION ---

fn base_record(s: &mut Sampler, index: usize) -> Record {
    let age = s.normal(42.0, 12.0).clamp(18.0, 75.0) as u32;
    let gender = s.choice(&GENDERS);
    let income = s.lognormal(10.8, 0.5).clamp(20_000.0, 200_000.0).floor();
    let credit_score = s.normal(680.0, 80.0).clamp(300.0, 850.0).floor();
    let employment_type = s.choice(&EMPLOYMENT);
    let debt_ratio = round2(s.beta_int(2, 5).clamp(0.0, 1.0));

    Record {
        customer_id: format!("CUST_{:06}", index + 1),
        age,
        gender: gender.to_string(),
        income,
        credit_score,
        employment_type: employment_type.to_string(),
        debt_ratio,
        prediction: 0,
        actual_outcome: 0,
    }
}

/// Lower credit and income, heavier debt.
fn apply_downturn(r: &mut Record) {
    r.credit_score = (r.credit_score - 50.0).clamp(300.0, 850.0).floor();
    r.income = (r.income * 0.85).clamp(20_000.0, 200_000.0).floor();
    r.debt_ratio = round2((r.debt_ratio * 1.2).clamp(0.0, 1.0));
}

fn approval_rate_of(records: &[Record], gender: &str) -> Option<f64> {
    let group: Vec<&Record> = records.iter().filter(|r| r.gender == gender).collect();
    if group.is_empty() {
        return None;
    }
    Some(group.iter().filter(|r| r.approved()).count() as f64 / group.len() as f64)
}

/// Flips a share of female denials to approvals when the feed drifted away
/// from gender parity.
fn balance_gender(s: &mut Sampler, records: &mut [Record]) {
    let (Some(male), Some(female)) = (
        approval_rate_of(records, "Male"),
        approval_rate_of(records, "Female"),
    ) else {
        return;
    };
    if male <= 0.0 || female / male >= CLEAN_TARGET_DI {
        return;
    }

    let mut denials: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.gender == "Female" && !r.approved())
        .map(|(i, _)| i)
        .collect();
    let boost = (denials.len() as f64 * CLEAN_BOOST_SHARE) as usize;
    denials.shuffle(&mut s.rng);
    for &i in denials.iter().take(boost) {
        records[i].prediction = 1;
    }
    debug!(boosted = boost, "Balanced female approvals");
}

/// Generates `size` decisions for the given feed.
pub fn generate(mode: DatasetMode, size: usize) -> Dataset {
    let scenario = Scenario::of(mode);
    let mut s = Sampler::new(scenario.seed);

    let mut records: Vec<Record> = (0..size).map(|i| base_record(&mut s, i)).collect();
    if scenario.economic_downturn {
        records.iter_mut().for_each(apply_downturn);
    }

    let (low, high) = scenario.probability_clip;
    for r in &mut records {
        let penalty = if r.gender == "Female" {
            scenario.female_penalty
        } else {
            0.0
        };
        let p = r.approval_likelihood().unwrap_or_default() + penalty;
        let p = (p + s.normal(0.0, DECISION_NOISE)).clamp(low, high);
        r.prediction = u8::from(p > 0.5);
    }

    for r in &mut records {
        let correct = s.uniform() < scenario.accuracy;
        r.actual_outcome = if correct { r.prediction } else { 1 - r.prediction };
    }

    // Balancing runs after outcomes are drawn
    if scenario.balance_gender {
        balance_gender(&mut s, &mut records);
    }

    Dataset::new(records)
}

// --- PROVIDER ---

#[derive(Debug, Clone)]
pub struct SyntheticDatasetProvider {
    size: usize,
}

impl SyntheticDatasetProvider {
    pub fn new(size: usize) -> Self {
        Self { size }
    }
}

impl Default for SyntheticDatasetProvider {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE)
    }
}

impl DatasetProvider for SyntheticDatasetProvider {
    #[instrument(skip(self), fields(size = self.size))]
    fn dataset(&self, mode: DatasetMode) -> Result<Dataset, SentinelError> {
        Ok(generate(mode, self.size))
    }

    /// The clean feed doubles as the validation baseline.
    fn baseline(&self) -> Result<Dataset, SentinelError> {
        Ok(generate(DatasetMode::Clean, self.size))
    }
}
