// FICHIER : archimate-core/src/model_engine/manipulator/ids.rs

use crate::model_engine::types::{non_blank, ModelData};
use crate::utils::{AppError, EntityKind, Result};

const MAX_ATTEMPTS: usize = 8;

/// Identifiant généré : `<préfixe>-<horodatage ms>-<8 caractères aléatoires>`.
pub(crate) fn generate(kind: EntityKind) -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}",
        kind.id_prefix(),
        chrono::Utc::now().timestamp_millis(),
        &random[..8]
    )
}

fn is_taken(model: &ModelData, kind: EntityKind, id: &str) -> bool {
    match kind {
        EntityKind::PropertyDefinition => model.property_definitions.contains_key(id),
        _ => model.contains_id(id),
    }
}

/// Réserve un identifiant : celui fourni s'il est libre, sinon un identifiant généré.
/// Un identifiant fourni déjà pris donne `Duplicate` ; vide, il est ignoré.
pub(crate) fn claim(model: &ModelData, kind: EntityKind, requested: Option<String>) -> Result<String> {
    if let Some(id) = non_blank(requested) {
        let id = id.trim().to_string();
        if is_taken(model, kind, &id) {
            return Err(AppError::duplicate(kind, id));
        }
        return Ok(id);
    }

    let mut last = String::new();
    for _ in 0..MAX_ATTEMPTS {
        last = generate(kind);
        if !is_taken(model, kind, &last) {
            return Ok(last);
        }
        tracing::debug!("Collision d'identifiant généré : {}", last);
    }
    Err(AppError::duplicate(kind, last))
}
