// FICHIER : archimate-core/src/utils/env.rs

use crate::utils::{AppError, Result};
use std::env;
use std::str::FromStr;

/// Récupère une variable d'environnement (Requis).
/// Renvoie une erreur explicite si la clé est manquante.
pub fn get(key: &str) -> Result<String> {
    env::var(key)
        .map_err(|_| AppError::Config(format!("Variable d'environnement manquante : {}", key)))
}

/// Récupère une variable d'environnement (Optionnel).
/// Une valeur vide est traitée comme absente.
pub fn get_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Récupère une variable d'environnement avec valeur par défaut.
pub fn get_or(key: &str, default: &str) -> String {
    get_optional(key).unwrap_or_else(|| default.to_string())
}

/// Récupère et parse une variable (ex: booléen, entier).
pub fn get_parsed<T: FromStr>(key: &str) -> Result<T> {
    let val = get(key)?;
    val.trim()
        .parse::<T>()
        .map_err(|_| AppError::Config(format!("Impossible de parser la variable : {}", key)))
}

/// Indique si une feature flag est active (ex: "true", "1", "yes").
pub fn is_enabled(key: &str) -> bool {
    matches!(
        get_optional(key).map(|v| v.to_lowercase()).as_deref(),
        Some("true") | Some("1") | Some("yes") | Some("on")
    )
}

// --- TESTS UNITAIRES ---
#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_get_missing_is_config_error() {
        env::remove_var("ARCHIMATE_TEST_MISSING");
        let err = get("ARCHIMATE_TEST_MISSING").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(get_or("ARCHIMATE_TEST_MISSING", "fr"), "fr");
    }

    #[test]
    #[serial]
    fn test_flags_and_parsing() {
        env::set_var("ARCHIMATE_TEST_FLAG", "YES");
        assert!(is_enabled("ARCHIMATE_TEST_FLAG"));

        env::set_var("ARCHIMATE_TEST_FLAG", "0");
        assert!(!is_enabled("ARCHIMATE_TEST_FLAG"));

        env::set_var("ARCHIMATE_TEST_NUM", " 42 ");
        assert_eq!(get_parsed::<u32>("ARCHIMATE_TEST_NUM").unwrap(), 42);

        env::set_var("ARCHIMATE_TEST_NUM", "abc");
        assert!(get_parsed::<u32>("ARCHIMATE_TEST_NUM").is_err());

        env::remove_var("ARCHIMATE_TEST_FLAG");
        env::remove_var("ARCHIMATE_TEST_NUM");
    }

    #[test]
    #[serial]
    fn test_blank_value_is_absent() {
        env::set_var("ARCHIMATE_TEST_BLANK", "   ");
        assert!(get_optional("ARCHIMATE_TEST_BLANK").is_none());
        env::remove_var("ARCHIMATE_TEST_BLANK");
    }
}
