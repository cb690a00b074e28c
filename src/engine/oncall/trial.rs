//! Un essai complet : phase I puis phase II, sur un etat propre et une
//! graine dediee.

use super::{fixed, rotation, score};
use crate::config::ScoreWeights;
use crate::model::{Doctor, DoctorId, DoctorRole};
use crate::prefs::ProjectedPrefs;
use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

use super::types::TrialState;

/// Derive la sous-graine d'un essai depuis la graine racine et son indice,
/// pour que chaque essai soit reproductible independamment des autres.
pub fn sub_seed(root_seed: u64, trial_index: u32) -> u64 {
    root_seed
        .wrapping_mul(0x9E3779B97F4A7C15)
        .wrapping_add(trial_index as u64)
}

/// Execute un essai independant et renvoie son etat final.
#[allow(clippy::too_many_arguments)]
pub fn run_one(
    dates: &[NaiveDate],
    doctors: &[Doctor],
    prefs: &ProjectedPrefs,
    target_limits: &HashMap<DoctorId, u32>,
    previous_tail: Option<&DoctorId>,
    period_start: NaiveDate,
    weights: &ScoreWeights,
    root_seed: u64,
    trial_index: u32,
) -> TrialState {
    let mut rng = ChaCha8Rng::seed_from_u64(sub_seed(root_seed, trial_index));
    let mut state = TrialState::default();

    let unresolved = fixed::resolve(dates, doctors, prefs, period_start, &mut state, &mut rng);

    let rotation_doctors: Vec<Doctor> = doctors
        .iter()
        .filter(|d| d.role == DoctorRole::Rotation)
        .cloned()
        .collect();

    rotation::fill(
        unresolved,
        &rotation_doctors,
        prefs,
        target_limits,
        previous_tail,
        period_start,
        weights,
        &mut state,
        &mut rng,
    );

    state
}

/// Score d'un essai deja execute, pour comparaison entre essais.
pub fn score(
    dates: &[NaiveDate],
    state: &TrialState,
    doctors: &[Doctor],
    prefs: &ProjectedPrefs,
    weights: &ScoreWeights,
) -> i64 {
    let rotation_ids: Vec<DoctorId> = doctors
        .iter()
        .filter(|d| d.role == DoctorRole::Rotation)
        .map(|d| d.id.clone())
        .collect();
    score::score_roster(dates, state, &rotation_ids, prefs, weights)
}
