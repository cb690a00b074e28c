//! Entrees de configuration explicites consommees par les deux engins.
//!
//! Rien ici n'est lu depuis l'horloge murale ou l'environnement. Le CLI est
//! seul responsable de peupler ces valeurs par defaut a partir de l'heure du
//! jour.

use crate::model::Doctor;
use std::time::Duration;

/// Periode choisie par l'appelant : l'engin n'infere jamais l'annee ou le
/// mois de depart depuis l'horloge systeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodSelector {
    pub year: i32,
    pub start_month: u32,
}

/// Calibrations figees, choisies une fois pour toutes par ce crate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    /// Poids du candidat quand il a explicitement marque le jour disponible.
    pub available: i64,
    /// Poids du candidat quand il a marque le jour "a contrecoeur".
    pub reluctant: i64,
    /// Poids par defaut quand aucun enregistrement n'existe pour ce jour.
    pub no_record_default: i64,
    /// Bonus de score pour un jour rempli par un disponible.
    pub bonus_available: i64,
    /// Bonus (negatif) de score pour un jour rempli par un "a contrecoeur".
    pub bonus_reluctant: i64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            available: 10,
            reluctant: 1,
            // Choix fige : "neutre" plutot que "considere comme disponible".
            no_record_default: 5,
            bonus_available: 50,
            bonus_reluctant: -50,
        }
    }
}

/// Configuration de l'engin de dyzurs.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub doctors: Vec<Doctor>,
    /// Nombre d'essais randomises (le seul parametre visible de l'utilisateur).
    pub trials: u32,
    /// Graine racine ; chaque essai derive sa propre sous-graine.
    pub seed: u64,
    pub weights: ScoreWeights,
    /// Budget de temps optionnel, verifie entre deux vagues d'essais. A
    /// l'expiration, le meilleur essai connu est retourne, jamais un resultat
    /// partiel ou par defaut.
    pub time_budget: Option<Duration>,
}

impl EngineConfig {
    pub fn new(doctors: Vec<Doctor>) -> Self {
        Self {
            doctors,
            trials: 500,
            seed: 0,
            weights: ScoreWeights::default(),
            time_budget: None,
        }
    }

    pub fn with_trials(mut self, trials: u32) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }
}
