//! Traitement d'une semaine unique : passes A (etiquettes), B (plafond 48h),
//! C (remplissage des cases restantes).

use crate::calendar;
use crate::model::{DailyCell, Doctor, DoctorId};
use crate::prefs::ProjectedPrefs;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::HashMap;

const NORM: f64 = 7.0 + 35.0 / 60.0;

/// Produit les cases {date -> {medecin -> case}} pour une semaine, etant
/// donnes le roster fini et les preferences (deja projetees).
pub fn process_week(
    week_dates: &[NaiveDate],
    doctors: &[Doctor],
    roster_lookup: &impl Fn(NaiveDate) -> Option<DoctorId>,
    prefs: &ProjectedPrefs,
    previous_tail: Option<&DoctorId>,
    period_start: NaiveDate,
) -> HashMap<NaiveDate, HashMap<DoctorId, DailyCell>> {
    let mut cells: HashMap<NaiveDate, HashMap<DoctorId, DailyCell>> = HashMap::new();
    let mut hours: HashMap<DoctorId, f64> = HashMap::new();
    let mut daily_staff_count: HashMap<NaiveDate, i64> = HashMap::new();

    // Pass A.
    for &date in week_dates {
        let mut row = HashMap::new();
        for doctor in doctors {
            let cell = pass_a_label(date, doctor, roster_lookup, prefs, previous_tail, period_start);
            if let DailyCell::Leave | DailyCell::Course | DailyCell::OnCall24h = cell {
                *hours.entry(doctor.id.clone()).or_insert(0.0) += cell.hours();
            }
            row.insert(doctor.id.clone(), cell);
        }
        let unassigned = row.values().filter(|c| **c == DailyCell::Unassigned).count() as i64;
        daily_staff_count.insert(date, unassigned);
        cells.insert(date, row);
    }

    // Pass B.
    for doctor in doctors.iter().filter(|d| d.no_optout) {
        let committed = hours.get(&doctor.id).copied().unwrap_or(0.0);
        let remaining = (48.0 - committed).max(0.0);
        let max_work_days = (remaining / NORM).floor() as usize;

        let mut unassigned_days: Vec<NaiveDate> = week_dates
            .iter()
            .copied()
            .filter(|d| {
                cells
                    .get(d)
                    .and_then(|row| row.get(&doctor.id))
                    .is_some_and(|c| *c == DailyCell::Unassigned)
            })
            .collect();

        if unassigned_days.len() <= max_work_days {
            for date in unassigned_days {
                set_cell(&mut cells, date, &doctor.id, DailyCell::StandardDay);
            }
        } else {
            let excess = unassigned_days.len() - max_work_days;
            unassigned_days.sort_by(|a, b| {
                let count_a = daily_staff_count.get(a).copied().unwrap_or(0);
                let count_b = daily_staff_count.get(b).copied().unwrap_or(0);
                count_b.cmp(&count_a)
            });
            for date in unassigned_days.iter().take(excess) {
                set_cell(&mut cells, *date, &doctor.id, DailyCell::CapOff);
                if let Some(count) = daily_staff_count.get_mut(date) {
                    *count -= 1;
                }
            }
            for date in unassigned_days.iter().skip(excess) {
                set_cell(&mut cells, *date, &doctor.id, DailyCell::StandardDay);
            }
        }
    }

    // Pass C.
    for row in cells.values_mut() {
        for cell in row.values_mut() {
            if *cell == DailyCell::Unassigned {
                *cell = DailyCell::StandardDay;
            }
        }
    }

    cells
}

fn set_cell(
    cells: &mut HashMap<NaiveDate, HashMap<DoctorId, DailyCell>>,
    date: NaiveDate,
    doctor: &DoctorId,
    cell: DailyCell,
) {
    cells.entry(date).or_default().insert(doctor.clone(), cell);
}

fn pass_a_label(
    date: NaiveDate,
    doctor: &Doctor,
    roster_lookup: &impl Fn(NaiveDate) -> Option<DoctorId>,
    prefs: &ProjectedPrefs,
    previous_tail: Option<&DoctorId>,
    period_start: NaiveDate,
) -> DailyCell {
    use crate::model::{AbsenceReason, PrefStatus};

    if let Some((PrefStatus::Unavailable, Some(reason))) = prefs.status(date, &doctor.id) {
        return match reason {
            AbsenceReason::Urlop => DailyCell::Leave,
            AbsenceReason::Kurs => DailyCell::Course,
            AbsenceReason::Inne => DailyCell::Leave,
        };
    }

    if roster_lookup(date).as_ref() == Some(&doctor.id) {
        return DailyCell::OnCall24h;
    }

    let was_on_call_yesterday = if date == period_start {
        previous_tail == Some(&doctor.id)
    } else {
        roster_lookup(date - Duration::days(1)).as_ref() == Some(&doctor.id)
    };
    if was_on_call_yesterday {
        return DailyCell::PostCallOff;
    }

    if doctor.saturday_rule
        && date.weekday() == Weekday::Mon
        && roster_lookup(date - Duration::days(2)).as_ref() == Some(&doctor.id)
    {
        return DailyCell::SatRuleOff;
    }

    if calendar::is_red_day(date) {
        return DailyCell::WeekendOff;
    }

    DailyCell::Unassigned
}
