use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifiant fort pour un medecin (nom d'affichage stable).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DoctorId(String);

impl DoctorId {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DoctorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DoctorId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Role disjoint : Fixed choisit ses propres jours, Rotation entre dans le tirage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoctorRole {
    Fixed,
    Rotation,
}

/// Medecin participant au grafik, avec ses drapeaux orthogonaux.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub role: DoctorRole,
    /// Soumis au plafond hebdomadaire de 48h (pas d'opt-out).
    #[serde(default)]
    pub no_optout: bool,
    /// Un dyzur le samedi impose le lundi suivant en repos.
    #[serde(default)]
    pub saturday_rule: bool,
}

impl Doctor {
    pub fn new(id: impl Into<String>, role: DoctorRole) -> Self {
        Self {
            id: DoctorId::new(id),
            role,
            no_optout: false,
            saturday_rule: false,
        }
    }

    pub fn fixed(id: impl Into<String>) -> Self {
        Self::new(id, DoctorRole::Fixed)
    }

    pub fn rotation(id: impl Into<String>) -> Self {
        Self::new(id, DoctorRole::Rotation)
    }

    pub fn with_no_optout(mut self, value: bool) -> Self {
        self.no_optout = value;
        self
    }

    pub fn with_saturday_rule(mut self, value: bool) -> Self {
        self.saturday_rule = value;
        self
    }
}

/// Statut de disponibilite declare pour une (date, medecin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrefStatus {
    Available,
    Reluctant,
    Fixed,
    Unavailable,
}

impl fmt::Display for PrefStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PrefStatus::Available => "AVAILABLE",
            PrefStatus::Reluctant => "RELUCTANT",
            PrefStatus::Fixed => "FIXED",
            PrefStatus::Unavailable => "UNAVAILABLE",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for PrefStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(PrefStatus::Available),
            "RELUCTANT" => Ok(PrefStatus::Reluctant),
            "FIXED" => Ok(PrefStatus::Fixed),
            "UNAVAILABLE" => Ok(PrefStatus::Unavailable),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// Motif d'indisponibilite, pertinent uniquement quand `status = Unavailable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbsenceReason {
    Urlop,
    Kurs,
    Inne,
}

impl fmt::Display for AbsenceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AbsenceReason::Urlop => "URLOP",
            AbsenceReason::Kurs => "KURS",
            AbsenceReason::Inne => "INNE",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for AbsenceReason {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "URLOP" => Ok(AbsenceReason::Urlop),
            "KURS" => Ok(AbsenceReason::Kurs),
            "INNE" => Ok(AbsenceReason::Inne),
            other => Err(format!("unknown reason: {other}")),
        }
    }
}

/// Enregistrement de preference, cle par (date, medecin).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    pub date: NaiveDate,
    pub doctor: DoctorId,
    pub status: PrefStatus,
    pub reason: Option<AbsenceReason>,
}

impl PreferenceRecord {
    /// Construit un enregistrement en validant l'invariant reason <=> Unavailable.
    pub fn new(
        date: NaiveDate,
        doctor: DoctorId,
        status: PrefStatus,
        reason: Option<AbsenceReason>,
    ) -> Result<Self, String> {
        if reason.is_some() && status != PrefStatus::Unavailable {
            return Err("reason is only meaningful when status = UNAVAILABLE".to_string());
        }
        Ok(Self {
            date,
            doctor,
            status,
            reason,
        })
    }
}

/// Periode de reglement : fenetre de deux mois civils commencant un mois impair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPeriod {
    pub year: i32,
    pub start_month: u32,
}

impl SettlementPeriod {
    pub fn new(year: i32, start_month: u32) -> Result<Self, String> {
        if start_month == 0 || start_month > 12 || start_month % 2 == 0 {
            return Err(format!(
                "start_month must be odd and in 1..=11, got {start_month}"
            ));
        }
        Ok(Self { year, start_month })
    }

    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.start_month, 1)
            .expect("validated start_month is in 1..=12")
    }

    /// Toutes les dates de la periode, mois de depart puis mois suivant.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut out = Vec::new();
        for offset in 0..2 {
            let month = self.start_month + offset;
            if month > 12 {
                continue;
            }
            let days_in_month = days_in_month(self.year, month);
            for day in 1..=days_in_month {
                out.push(
                    NaiveDate::from_ymd_opt(self.year, month, day)
                        .expect("day bounded by days_in_month"),
                );
            }
        }
        out
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("valid next month");
    let this_month_first = NaiveDate::from_ymd_opt(year, month, 1).expect("valid month");
    (next_month_first - this_month_first).num_days() as u32
}

/// Classification d'une date en l'un des six groupes utilises pour l'equite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayGroup {
    Monday,
    TueWed,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayGroup {
    pub const ALL: [DayGroup; 6] = [
        DayGroup::Monday,
        DayGroup::TueWed,
        DayGroup::Thursday,
        DayGroup::Friday,
        DayGroup::Saturday,
        DayGroup::Sunday,
    ];

    fn index(self) -> usize {
        match self {
            DayGroup::Monday => 0,
            DayGroup::TueWed => 1,
            DayGroup::Thursday => 2,
            DayGroup::Friday => 3,
            DayGroup::Saturday => 4,
            DayGroup::Sunday => 5,
        }
    }
}

/// Index de semaine relatif au debut de periode : floor((date - period_start) / 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeekKey(pub i64);

/// Emplacement d'un jour du roster : non pourvu, ou assigne a un medecin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RosterSlot {
    Unfilled,
    Assigned(DoctorId),
}

impl RosterSlot {
    pub fn doctor(&self) -> Option<&DoctorId> {
        match self {
            RosterSlot::Assigned(d) => Some(d),
            RosterSlot::Unfilled => None,
        }
    }

    pub fn is_assigned_to(&self, doctor: &DoctorId) -> bool {
        matches!(self, RosterSlot::Assigned(d) if d == doctor)
    }
}

/// Roster complet : association totale date -> emplacement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    pub slots: std::collections::BTreeMap<NaiveDate, RosterSlot>,
}

impl Roster {
    pub fn get(&self, date: NaiveDate) -> Option<&RosterSlot> {
        self.slots.get(&date)
    }

    pub fn doctor_on(&self, date: NaiveDate) -> Option<&DoctorId> {
        self.slots.get(&date).and_then(RosterSlot::doctor)
    }

    pub fn unfilled_dates(&self) -> Vec<NaiveDate> {
        self.slots
            .iter()
            .filter(|(_, slot)| matches!(slot, RosterSlot::Unfilled))
            .map(|(date, _)| *date)
            .collect()
    }
}

/// Compteurs par medecin, derives du roster et maintenus a jour pendant la generation.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub total: u32,
    by_group: [u32; 6],
}

impl Stats {
    pub fn group_count(&self, group: DayGroup) -> u32 {
        self.by_group[group.index()]
    }

    pub fn record(&mut self, group: DayGroup) {
        self.total += 1;
        self.by_group[group.index()] += 1;
    }
}

/// Etiquette journaliere finale d'un (date, medecin) apres l'engin d'horaires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DailyCell {
    OnCall24h,
    PostCallOff,
    WeekendOff,
    SatRuleOff,
    Leave,
    Course,
    CapOff,
    StandardDay,
    /// Interne uniquement : ne doit jamais survivre a l'engin.
    Unassigned,
}

impl DailyCell {
    /// Heures de travail imputees au plafond hebdomadaire de 48h.
    pub fn hours(self) -> f64 {
        const NORM: f64 = 7.0 + 35.0 / 60.0;
        match self {
            DailyCell::OnCall24h => 24.0,
            DailyCell::Leave | DailyCell::Course | DailyCell::StandardDay => NORM,
            _ => 0.0,
        }
    }
}

/// Raisons de rejet courtes utilisees pour expliquer un jour UNFILLED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectTag {
    /// Limite de dyzurs atteinte.
    Limit,
    /// Indisponible ce jour-la (ND = Niedostepny).
    Unavailable,
    /// Deja assigne la veille.
    RestAfter,
    /// Deja assigne le lendemain.
    RestBefore,
    /// Absence (conges/formation) prevue le lendemain.
    PreLeave,
    /// Plafond hebdomadaire de 2 dyzurs atteint.
    WeeklyCap,
    /// Regle "samedi -> lundi de repos" viole.
    SaturdayRule,
}

impl fmt::Display for RejectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RejectTag::Limit => "Limit",
            RejectTag::Unavailable => "ND",
            RejectTag::RestAfter => "Po",
            RejectTag::RestBefore => "Przed",
            RejectTag::PreLeave => "PreLeave",
            RejectTag::WeeklyCap => "Max2",
            RejectTag::SaturdayRule => "Sobota",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preference_record_rejects_reason_without_unavailable() {
        let err = PreferenceRecord::new(
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            DoctorId::new("Jedrzej"),
            PrefStatus::Available,
            Some(AbsenceReason::Urlop),
        );
        assert!(err.is_err());
    }

    #[test]
    fn settlement_period_rejects_even_start_month() {
        assert!(SettlementPeriod::new(2026, 2).is_err());
        assert!(SettlementPeriod::new(2026, 1).is_ok());
    }

    #[test]
    fn settlement_period_spans_two_months() {
        let period = SettlementPeriod::new(2026, 1).unwrap();
        let dates = period.dates();
        assert_eq!(dates.len(), 31 + 28); // 2026 not a leap year
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(
            *dates.last().unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
        );
    }

    #[test]
    fn settlement_period_covers_both_months_at_year_end() {
        let period = SettlementPeriod::new(2026, 11).unwrap();
        let dates = period.dates();
        assert_eq!(dates.len(), 30 + 31); // November + December
        assert_eq!(
            *dates.last().unwrap(),
            NaiveDate::from_ymd_opt(2026, 12, 31).unwrap()
        );
    }
}
