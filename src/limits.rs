//! Calculateur de limites suggerees. Externe au coeur des engins : ceux-ci
//! traitent `target_limits` comme une entree autoritaire et ne recalculent
//! jamais rien ici.

use crate::model::{Doctor, DoctorId, DoctorRole};
use std::collections::HashMap;

/// Suggere des `target_limits` a partir du nombre total de jours de la
/// periode et du nombre de jours deja reclames en FIXED par chaque medecin.
///
/// Le pool restant pour la rotation est reparti a parts egales entre les
/// medecins rotatifs (division entiere ; le reste n'est pas distribue, un
/// operateur humain ajuste ensuite au besoin).
pub fn suggest_target_limits(
    doctors: &[Doctor],
    fixed_counts: &HashMap<DoctorId, u32>,
    total_days: u32,
) -> HashMap<DoctorId, u32> {
    let mut limits = HashMap::new();

    let mut claimed = 0u32;
    for doc in doctors {
        let count = fixed_counts.get(&doc.id).copied().unwrap_or(0);
        if doc.role == DoctorRole::Fixed {
            limits.insert(doc.id.clone(), count);
        }
        claimed += count;
    }

    let rotation: Vec<&Doctor> = doctors.iter().filter(|d| d.role == DoctorRole::Rotation).collect();
    let pool = total_days.saturating_sub(claimed);
    let base = if rotation.is_empty() {
        0
    } else {
        pool / rotation.len() as u32
    };
    for doc in rotation {
        limits.insert(doc.id.clone(), base);
    }

    limits
}
