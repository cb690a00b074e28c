use crate::model::{DoctorId, RejectTag, Roster, Stats, WeekKey};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Bilan de bookkeeping propre a un essai : jamais partage entre essais,
/// construit de zero a chaque fois.
#[derive(Debug, Clone, Default)]
pub struct TrialState {
    pub roster: Roster,
    pub stats: HashMap<DoctorId, Stats>,
    pub weekly_counts: HashMap<WeekKey, HashMap<DoctorId, u32>>,
    pub rejections: HashMap<NaiveDate, HashMap<DoctorId, RejectTag>>,
    pub denied_fixed: Vec<DeniedFixed>,
}

impl TrialState {
    pub fn assign(&mut self, date: NaiveDate, doctor: DoctorId, group: crate::model::DayGroup, week: WeekKey) {
        self.stats.entry(doctor.clone()).or_default().record(group);
        *self
            .weekly_counts
            .entry(week)
            .or_default()
            .entry(doctor.clone())
            .or_insert(0) += 1;
        self.roster
            .slots
            .insert(date, crate::model::RosterSlot::Assigned(doctor));
    }

    pub fn mark_unfilled(&mut self, date: NaiveDate) {
        self.roster.slots.insert(date, crate::model::RosterSlot::Unfilled);
    }

    pub fn weekly_count(&self, week: WeekKey, doctor: &DoctorId) -> u32 {
        self.weekly_counts
            .get(&week)
            .and_then(|m| m.get(doctor))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self, doctor: &DoctorId) -> u32 {
        self.stats.get(doctor).map(|s| s.total).unwrap_or(0)
    }
}

/// Une requete FIXED refusee, pour explication en aval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeniedFixed {
    pub date: NaiveDate,
    pub doctor: DoctorId,
    pub winner: DoctorId,
}

/// Resultat final de l'engin de dyzurs : le meilleur des N essais.
#[derive(Debug, Clone)]
pub struct OnCallResult {
    pub roster: Roster,
    pub stats: HashMap<DoctorId, Stats>,
    pub rejections: HashMap<NaiveDate, HashMap<DoctorId, RejectTag>>,
    pub denied_fixed: Vec<DeniedFixed>,
    pub score: i64,
}
