//! Phase II : remplissage rotatif des jours non resolus par la Phase I.

use super::filters::{evaluate_all, FilterContext};
use super::score::{candidate_weight, sort_candidates, Candidate};
use super::types::TrialState;
use crate::calendar;
use crate::config::ScoreWeights;
use crate::model::{Doctor, DoctorId, PrefStatus};
use crate::prefs::ProjectedPrefs;
use chrono::NaiveDate;
use rand::Rng;
use std::collections::HashMap;

/// Remplit les jours non resolus en tirant, pour chacun, le meilleur
/// candidat rotatif survivant des filtres durs. Traite d'abord les jours les
/// plus difficiles (moins de candidats disponibles).
pub fn fill<R: Rng>(
    mut days_to_fill: Vec<NaiveDate>,
    rotation_doctors: &[Doctor],
    prefs: &ProjectedPrefs,
    target_limits: &HashMap<DoctorId, u32>,
    previous_tail: Option<&DoctorId>,
    period_start: NaiveDate,
    weights: &ScoreWeights,
    state: &mut TrialState,
    rng: &mut R,
) {
    let availability_count = |date: NaiveDate| -> usize {
        rotation_doctors
            .iter()
            .filter(|d| !matches!(prefs.status(date, &d.id), Some((PrefStatus::Unavailable, _))))
            .count()
    };

    let mut keyed: Vec<(NaiveDate, usize, f64)> = days_to_fill
        .drain(..)
        .map(|d| (d, availability_count(d), rng.gen::<f64>()))
        .collect();
    keyed.sort_by(|a, b| a.1.cmp(&b.1).then(a.2.partial_cmp(&b.2).unwrap()));

    for (date, _, _) in keyed {
        let group = calendar::day_group(date);
        let mut candidates = Vec::new();
        let mut rejections = HashMap::new();

        for doctor in rotation_doctors {
            let ctx = FilterContext {
                date,
                doctor,
                state,
                prefs,
                target_limits,
                previous_tail,
                period_start,
            };
            match evaluate_all(&ctx) {
                Some(tag) => {
                    rejections.insert(doctor.id.clone(), tag);
                }
                None => {
                    let status = prefs.status(date, &doctor.id).map(|(s, _)| s);
                    candidates.push(Candidate {
                        doctor: doctor.id.clone(),
                        weight: candidate_weight(status, weights),
                        group_count: state
                            .stats
                            .get(&doctor.id)
                            .map(|s| s.group_count(group))
                            .unwrap_or(0),
                        total_count: state.total(&doctor.id),
                        epsilon: rng.gen::<f64>(),
                    });
                }
            }
        }

        if candidates.is_empty() {
            state.mark_unfilled(date);
            state.rejections.insert(date, rejections);
        } else {
            sort_candidates(&mut candidates);
            let chosen = candidates[0].doctor.clone();
            let week = calendar::week_key(date, period_start);
            state.assign(date, chosen, group, week);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DoctorRole;
    use crate::prefs::PreferenceTable;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn fills_day_when_one_candidate_survives() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let doctors = vec![Doctor::new("Ihab", DoctorRole::Rotation)];
        let prefs = PreferenceTable::default().project();
        let limits: HashMap<DoctorId, u32> = HashMap::from([(DoctorId::new("Ihab"), 5)]);
        let mut state = TrialState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        fill(
            vec![date],
            &doctors,
            &prefs,
            &limits,
            None,
            date,
            &ScoreWeights::default(),
            &mut state,
            &mut rng,
        );

        assert_eq!(state.roster.doctor_on(date), Some(&DoctorId::new("Ihab")));
    }

    #[test]
    fn marks_unfilled_with_rejection_when_everyone_unavailable() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 14).unwrap();
        let doctors = vec![Doctor::new("Ihab", DoctorRole::Rotation)];
        let table = PreferenceTable::new(vec![crate::model::PreferenceRecord::new(
            date,
            DoctorId::new("Ihab"),
            PrefStatus::Unavailable,
            None,
        )
        .unwrap()]);
        let prefs = table.project();
        let limits: HashMap<DoctorId, u32> = HashMap::from([(DoctorId::new("Ihab"), 5)]);
        let mut state = TrialState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        fill(
            vec![date],
            &doctors,
            &prefs,
            &limits,
            None,
            date,
            &ScoreWeights::default(),
            &mut state,
            &mut rng,
        );

        assert_eq!(state.roster.get(date), Some(&crate::model::RosterSlot::Unfilled));
        assert_eq!(
            state.rejections[&date][&DoctorId::new("Ihab")],
            crate::model::RejectTag::Unavailable
        );
    }
}
