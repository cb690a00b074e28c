//! Engin de dyzurs : N essais independants, le meilleur est retenu. La
//! parallelisation entre essais est triviale car chaque `TrialState` est
//! possede en propre, jamais partage.

pub mod filters;
pub mod fixed;
pub mod rotation;
pub mod score;
pub mod trial;
pub mod types;

pub use types::{DeniedFixed, OnCallResult, TrialState};

use crate::config::{EngineConfig, ScoreWeights};
use crate::model::{Doctor, DoctorId};
use crate::prefs::ProjectedPrefs;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::thread;
use std::time::Instant;

/// Nombre de vagues supplementaires tentees quand le meilleur essai d'une
/// vague laisse des jours UNFILLED. Borne le cout de la recherche "profonde"
/// sans la laisser tourner indefiniment.
const MAX_RESCUE_ROUNDS: u32 = 5;

pub struct OnCallEngine;

impl OnCallEngine {
    /// Lance `config.trials` essais, puis des vagues de secours bornees tant
    /// que le meilleur essai connu laisse des jours non pourvus. Des qu'un
    /// essai entierement pourvu apparait, il est retenu immediatement, meme
    /// si son score n'est pas le meilleur rencontre.
    pub fn run(
        dates: &[NaiveDate],
        doctors: &[Doctor],
        prefs: &ProjectedPrefs,
        target_limits: &HashMap<DoctorId, u32>,
        previous_tail: Option<&DoctorId>,
        period_start: NaiveDate,
        config: &EngineConfig,
    ) -> OnCallResult {
        let started = Instant::now();
        let mut trial_offset = 0u32;

        let first_wave = run_batch(
            dates, doctors, prefs, target_limits, previous_tail, period_start,
            &config.weights, config.seed, trial_offset, config.trials.max(1),
        );
        trial_offset += config.trials.max(1);
        let mut best = pick_best(first_wave);

        let mut rounds = 0;
        while best_is_incomplete(&best)
            && rounds < MAX_RESCUE_ROUNDS
            && !budget_expired(config.time_budget, started)
        {
            let wave = run_batch(
                dates, doctors, prefs, target_limits, previous_tail, period_start,
                &config.weights, config.seed, trial_offset, config.trials.max(1),
            );
            trial_offset += config.trials.max(1);
            rounds += 1;

            if let Some(complete) = find_first_complete(wave) {
                best = Some(complete);
                break;
            }
        }

        let (state, score) = best.expect("at least one trial always runs");
        OnCallResult {
            roster: state.roster,
            stats: state.stats,
            rejections: state.rejections,
            denied_fixed: state.denied_fixed,
            score,
        }
    }
}

fn budget_expired(budget: Option<std::time::Duration>, started: Instant) -> bool {
    budget.is_some_and(|b| started.elapsed() >= b)
}

fn best_is_incomplete(best: &Option<(TrialState, i64)>) -> bool {
    match best {
        None => true,
        Some((state, _)) => !state.roster.unfilled_dates().is_empty(),
    }
}

/// Ce qu'un thread de travail remonte pour sa tranche d'essais : le
/// meilleur par score, et le premier essai entierement pourvu rencontre
/// (s'il y en a un).
struct SliceOutcome {
    best: (TrialState, i64),
    first_complete: Option<(TrialState, i64)>,
}

fn pick_best(outcomes: Vec<SliceOutcome>) -> Option<(TrialState, i64)> {
    outcomes
        .into_iter()
        .map(|o| o.best)
        .fold(None, |best, candidate| match best {
            None => Some(candidate),
            Some(b) if candidate.1 > b.1 => Some(candidate),
            Some(b) => Some(b),
        })
}

fn find_first_complete(outcomes: Vec<SliceOutcome>) -> Option<(TrialState, i64)> {
    outcomes.into_iter().find_map(|o| o.first_complete)
}

fn worker_count(trial_count: u32) -> u32 {
    let parallelism = thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1);
    parallelism.min(trial_count.max(1))
}

/// Repartit `count` essais sur `available_parallelism()` threads de travail,
/// chacun executant sa tranche d'indices sequentiellement et se reduisant a
/// un seul resultat local, plutot qu'un thread par essai.
#[allow(clippy::too_many_arguments)]
fn run_batch(
    dates: &[NaiveDate],
    doctors: &[Doctor],
    prefs: &ProjectedPrefs,
    target_limits: &HashMap<DoctorId, u32>,
    previous_tail: Option<&DoctorId>,
    period_start: NaiveDate,
    weights: &ScoreWeights,
    root_seed: u64,
    start_index: u32,
    count: u32,
) -> Vec<SliceOutcome> {
    let workers = worker_count(count);
    let chunk_size = count.div_ceil(workers);

    thread::scope(|scope| {
        let mut handles = Vec::new();
        let mut chunk_start = start_index;
        let mut remaining = count;

        while remaining > 0 {
            let chunk_len = chunk_size.min(remaining);
            let this_start = chunk_start;
            chunk_start += chunk_len;
            remaining -= chunk_len;

            handles.push(scope.spawn(move || {
                let mut best: Option<(TrialState, i64)> = None;
                let mut first_complete: Option<(TrialState, i64)> = None;

                for i in 0..chunk_len {
                    let trial_index = this_start + i;
                    let state = trial::run_one(
                        dates, doctors, prefs, target_limits, previous_tail, period_start,
                        weights, root_seed, trial_index,
                    );
                    let sc = trial::score(dates, &state, doctors, prefs, weights);

                    if first_complete.is_none() && state.roster.unfilled_dates().is_empty() {
                        first_complete = Some((state.clone(), sc));
                    }

                    let replace = match &best {
                        None => true,
                        Some((_, best_score)) => sc > *best_score,
                    };
                    if replace {
                        best = Some((state, sc));
                    }
                }

                SliceOutcome {
                    best: best.expect("chunk always covers at least one trial"),
                    first_complete,
                }
            }));
        }

        handles
            .into_iter()
            .map(|h| h.join().expect("worker thread panicked"))
            .collect()
    })
}
