//! Table de preferences : chargement/sauvegarde et projection en cartes de
//! recherche rapides consommees par les deux engins.

mod csv_codec;

pub use csv_codec::{load_csv, save_csv};

use crate::model::{AbsenceReason, DoctorId, PrefStatus, PreferenceRecord};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Table plate de tous les enregistrements connus. Au plus un enregistrement
/// par (date, medecin), garanti par `upsert`.
#[derive(Debug, Clone, Default)]
pub struct PreferenceTable {
    records: Vec<PreferenceRecord>,
}

impl PreferenceTable {
    pub fn new(records: Vec<PreferenceRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[PreferenceRecord] {
        &self.records
    }

    pub fn upsert(&mut self, record: PreferenceRecord) {
        if let Some(existing) = self
            .records
            .iter_mut()
            .find(|r| r.date == record.date && r.doctor == record.doctor)
        {
            *existing = record;
        } else {
            self.records.push(record);
        }
    }

    /// Projette la table en carte (date -> medecin -> (status, reason)),
    /// consommee par les deux engins comme instantane immuable.
    pub fn project(&self) -> ProjectedPrefs {
        let mut map: HashMap<NaiveDate, HashMap<DoctorId, (PrefStatus, Option<AbsenceReason>)>> =
            HashMap::new();
        for r in &self.records {
            map.entry(r.date)
                .or_default()
                .insert(r.doctor.clone(), (r.status, r.reason));
        }
        ProjectedPrefs { map }
    }
}

/// Instantane immuable en lecture, prete pour l'engin : pref[date][doctor].
#[derive(Debug, Clone, Default)]
pub struct ProjectedPrefs {
    map: HashMap<NaiveDate, HashMap<DoctorId, (PrefStatus, Option<AbsenceReason>)>>,
}

impl ProjectedPrefs {
    pub fn status(&self, date: NaiveDate, doctor: &DoctorId) -> Option<(PrefStatus, Option<AbsenceReason>)> {
        self.map.get(&date)?.get(doctor).copied()
    }

    pub fn is_unavailable(&self, date: NaiveDate, doctor: &DoctorId) -> bool {
        matches!(self.status(date, doctor), Some((PrefStatus::Unavailable, _)))
    }

    /// Vrai si le medecin a marque indisponible avec un motif d'absence
    /// planifiee (conges ou formation) pour cette date.
    pub fn is_scheduled_absence(&self, date: NaiveDate, doctor: &DoctorId) -> bool {
        matches!(
            self.status(date, doctor),
            Some((PrefStatus::Unavailable, Some(AbsenceReason::Urlop)))
                | Some((PrefStatus::Unavailable, Some(AbsenceReason::Kurs)))
        )
    }

    pub fn doctors_with_status(&self, date: NaiveDate, status: PrefStatus) -> Vec<DoctorId> {
        self.map
            .get(&date)
            .map(|by_doctor| {
                by_doctor
                    .iter()
                    .filter(|(_, (s, _))| *s == status)
                    .map(|(doc, _)| doc.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_replaces_existing_record_for_same_key() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let doc = DoctorId::new("Ihab");
        let mut table = PreferenceTable::default();
        table.upsert(PreferenceRecord::new(date, doc.clone(), PrefStatus::Available, None).unwrap());
        table.upsert(
            PreferenceRecord::new(date, doc.clone(), PrefStatus::Unavailable, None).unwrap(),
        );
        assert_eq!(table.records().len(), 1);
        assert_eq!(table.records()[0].status, PrefStatus::Unavailable);
    }

    #[test]
    fn projected_prefs_detects_scheduled_absence() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let doc = DoctorId::new("Ihab");
        let table = PreferenceTable::new(vec![PreferenceRecord::new(
            date,
            doc.clone(),
            PrefStatus::Unavailable,
            Some(AbsenceReason::Urlop),
        )
        .unwrap()]);
        let projected = table.project();
        assert!(projected.is_scheduled_absence(date, &doc));
        assert!(projected.is_unavailable(date, &doc));
    }
}
