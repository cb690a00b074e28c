//! Phase I : resolution des jours FIXED.

use super::types::{DeniedFixed, TrialState};
use crate::calendar;
use crate::model::{Doctor, DoctorRole, PrefStatus};
use crate::prefs::ProjectedPrefs;
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

/// Resout les claims FIXED pour toutes les dates, dans l'ordre calendaire.
/// Renvoie les dates encore non resolues, destinees a la phase II.
pub fn resolve<R: Rng>(
    dates: &[NaiveDate],
    doctors: &[Doctor],
    prefs: &ProjectedPrefs,
    period_start: NaiveDate,
    state: &mut TrialState,
    rng: &mut R,
) -> Vec<NaiveDate> {
    let mut unresolved = Vec::new();

    for &date in dates {
        let fixed_role_claims: Vec<&Doctor> = doctors
            .iter()
            .filter(|d| d.role == DoctorRole::Fixed)
            .filter(|d| matches!(prefs.status(date, &d.id), Some((PrefStatus::Fixed, _))))
            .collect();

        let winner = if !fixed_role_claims.is_empty() {
            let winner = fixed_role_claims[0];
            for other in &fixed_role_claims[1..] {
                state.denied_fixed.push(DeniedFixed {
                    date,
                    doctor: other.id.clone(),
                    winner: winner.id.clone(),
                });
            }
            Some(winner)
        } else {
            let rotation_claims: Vec<&Doctor> = doctors
                .iter()
                .filter(|d| d.role == DoctorRole::Rotation)
                .filter(|d| matches!(prefs.status(date, &d.id), Some((PrefStatus::Fixed, _))))
                .collect();
            if rotation_claims.is_empty() {
                None
            } else {
                let winner = *rotation_claims.choose(rng).expect("non-empty checked above");
                for other in &rotation_claims {
                    if other.id != winner.id {
                        state.denied_fixed.push(DeniedFixed {
                            date,
                            doctor: other.id.clone(),
                            winner: winner.id.clone(),
                        });
                    }
                }
                Some(winner)
            }
        };

        match winner {
            Some(doctor) => {
                let group = calendar::day_group(date);
                let week = calendar::week_key(date, period_start);
                state.assign(date, doctor.id.clone(), group, week);
            }
            None => unresolved.push(date),
        }
    }

    unresolved
}
