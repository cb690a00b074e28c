//! Engin d'horaires journaliers : expansion du roster fini en cases
//! quotidiennes par medecin, semaine par semaine.

pub mod week;

use crate::calendar;
use crate::model::{DailyCell, Doctor, DoctorId, DoctorRole, Roster};
use crate::prefs::ProjectedPrefs;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Matrice finale {date -> {medecin -> case}}, exclusion faite du premier
/// medecin FIXED de la liste canonique ("le senior").
#[derive(Debug, Clone, Default)]
pub struct Timetable {
    pub cells: HashMap<NaiveDate, HashMap<DoctorId, DailyCell>>,
}

impl Timetable {
    pub fn cell(&self, date: NaiveDate, doctor: &DoctorId) -> Option<DailyCell> {
        self.cells.get(&date)?.get(doctor).copied()
    }
}

pub struct TimetableEngine;

impl TimetableEngine {
    /// `dates` doit couvrir exactement la periode de reglement, dans l'ordre
    /// calendaire, pour que le regroupement hebdomadaire corresponde a
    /// `calendar::week_key`.
    pub fn run(
        dates: &[NaiveDate],
        doctors: &[Doctor],
        roster: &Roster,
        prefs: &ProjectedPrefs,
        previous_tail: Option<&DoctorId>,
        period_start: NaiveDate,
    ) -> Timetable {
        let senior = doctors.iter().find(|d| d.role == DoctorRole::Fixed).map(|d| d.id.clone());
        let included: Vec<Doctor> = doctors
            .iter()
            .filter(|d| Some(&d.id) != senior.as_ref())
            .cloned()
            .collect();

        let lookup = |date: NaiveDate| roster.doctor_on(date).cloned();

        let mut weeks: Vec<Vec<NaiveDate>> = Vec::new();
        for &date in dates {
            let key = calendar::week_key(date, period_start);
            match weeks.last_mut() {
                Some(week) if calendar::week_key(week[0], period_start) == key => week.push(date),
                _ => weeks.push(vec![date]),
            }
        }

        let mut cells = HashMap::new();
        for week_dates in &weeks {
            let week_cells = week::process_week(
                week_dates,
                &included,
                &lookup,
                prefs,
                previous_tail,
                period_start,
            );
            cells.extend(week_cells);
        }

        Timetable { cells }
    }
}
