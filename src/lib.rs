#![forbid(unsafe_code)]
//! Grafik — generation locale (sans base de donnees) d'un grafik de dyzurs
//! (on-call) bimestriel et de son horaire journalier.
//!
//! - Stockage fichier unique (CSV), ecriture atomique.
//! - Deux engins purs et deterministes a graine fixee : `engine::oncall` puis
//!   `engine::timetable`.
//! - Toutes les dates sont des `NaiveDate` civiles ; aucune horloge murale
//!   n'entre dans le coeur (cf. `config::PeriodSelector`).

pub mod calendar;
pub mod config;
pub mod engine;
pub mod error;
pub mod limits;
pub mod model;
pub mod prefs;
pub mod storage;

pub use config::{EngineConfig, PeriodSelector, ScoreWeights};
pub use engine::{OnCallEngine, OnCallResult, Timetable, TimetableEngine};
pub use error::CoreError;
pub use limits::suggest_target_limits;
pub use model::{
    AbsenceReason, DailyCell, DayGroup, Doctor, DoctorId, DoctorRole, PrefStatus,
    PreferenceRecord, RejectTag, Roster, RosterSlot, SettlementPeriod, Stats, WeekKey,
};
pub use prefs::{load_csv, save_csv, PreferenceTable, ProjectedPrefs};
pub use storage::{FileCsvStore, PreferenceStore};
