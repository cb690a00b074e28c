use thiserror::Error;

/// Erreurs qui peuvent remonter hors du coeur. Un jour non pourvu ou un
/// claim FIXED refuse ne sont PAS des erreurs : ce sont des donnees en bande
/// (roster UNFILLED + cartes de rejet), portees par `OnCallResult`.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("preference store unavailable")]
    StoreUnavailable(#[from] anyhow::Error),
}
