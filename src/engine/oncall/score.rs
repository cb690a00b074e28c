//! Calcul des cles d'ordonnancement des candidats et du score d'un roster
//! complet. Le score ne sert qu'a departager les N essais ; il n'influence
//! jamais la construction d'un essai individuel.

use super::types::TrialState;
use crate::config::ScoreWeights;
use crate::model::{DayGroup, DoctorId, PrefStatus};
use crate::prefs::ProjectedPrefs;
use chrono::NaiveDate;

/// Un candidat survivant des filtres durs, pret a etre trie.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub doctor: DoctorId,
    pub weight: i64,
    pub group_count: u32,
    pub total_count: u32,
    pub epsilon: f64,
}

/// Trie les candidats selon (-weight, group_count, total_count, epsilon),
/// le premier element etant le choix retenu.
pub fn sort_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        b.weight
            .cmp(&a.weight)
            .then(a.group_count.cmp(&b.group_count))
            .then(a.total_count.cmp(&b.total_count))
            .then(a.epsilon.partial_cmp(&b.epsilon).unwrap())
    });
}

/// Poids d'un medecin pour un jour donne, selon son statut declare (ou la
/// valeur par defaut geleee si aucun enregistrement n'existe).
pub fn candidate_weight(
    status: Option<PrefStatus>,
    weights: &ScoreWeights,
) -> i64 {
    match status {
        Some(PrefStatus::Available) => weights.available,
        Some(PrefStatus::Reluctant) => weights.reluctant,
        _ => weights.no_record_default,
    }
}

/// Score d'un roster complet : jours pourvus (dominant), equite inter-groupe,
/// bonus de preference. Utilise uniquement pour selectionner le meilleur des
/// N essais.
pub fn score_roster(
    dates: &[NaiveDate],
    state: &TrialState,
    rotation_doctors: &[DoctorId],
    prefs: &ProjectedPrefs,
    weights: &ScoreWeights,
) -> i64 {
    let mut score: i64 = 0;

    let filled = dates
        .iter()
        .filter(|d| state.roster.doctor_on(**d).is_some())
        .count() as i64;
    score += filled * 1_000_000;

    for group in DayGroup::ALL {
        let counts: Vec<i64> = rotation_doctors
            .iter()
            .map(|doc| {
                state
                    .stats
                    .get(doc)
                    .map(|s| s.group_count(group) as i64)
                    .unwrap_or(0)
            })
            .collect();
        if let (Some(min), Some(max)) = (counts.iter().min(), counts.iter().max()) {
            score -= (max - min) * 1000;
        }
    }

    for date in dates {
        if let Some(doctor) = state.roster.doctor_on(*date) {
            if rotation_doctors.contains(doctor) {
                match prefs.status(*date, doctor).map(|(s, _)| s) {
                    Some(PrefStatus::Available) => score += weights.bonus_available,
                    Some(PrefStatus::Reluctant) => score += weights.bonus_reluctant,
                    _ => {}
                }
            }
        }
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_candidates_prefers_higher_weight_then_lower_counts() {
        let mut candidates = vec![
            Candidate {
                doctor: DoctorId::new("A"),
                weight: 10,
                group_count: 3,
                total_count: 5,
                epsilon: 0.9,
            },
            Candidate {
                doctor: DoctorId::new("B"),
                weight: 10,
                group_count: 1,
                total_count: 9,
                epsilon: 0.1,
            },
            Candidate {
                doctor: DoctorId::new("C"),
                weight: 1,
                group_count: 0,
                total_count: 0,
                epsilon: 0.0,
            },
        ];
        sort_candidates(&mut candidates);
        assert_eq!(candidates[0].doctor, DoctorId::new("B"));
        assert_eq!(candidates[2].doctor, DoctorId::new("C"));
    }

    #[test]
    fn candidate_weight_uses_neutral_default_without_record() {
        let weights = ScoreWeights::default();
        assert_eq!(candidate_weight(None, &weights), weights.no_record_default);
        assert_eq!(
            candidate_weight(Some(PrefStatus::Available), &weights),
            weights.available
        );
    }
}
