// FICHIER : archimate-core/src/model_engine/validators/schema.rs

use super::{ValidationCategory, ValidationIssue};
use crate::model_engine::exchange::ARCHIMATE_NS;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Résultat d'une validation de schéma déléguée.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaOutcome {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl SchemaOutcome {
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn failed(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn into_issues(self) -> Vec<ValidationIssue> {
        self.errors
            .into_iter()
            .map(|e| ValidationIssue::error(ValidationCategory::Schema, "SCHEMA_001", None, e))
            .collect()
    }
}

/// Collaborateur externe : validation du XML produit contre un schéma nommé.
/// Le moteur ne fait qu'orchestrer l'appel et fusionner ses erreurs.
pub trait SchemaValidator: Send + Sync {
    fn validate(&self, xml: &str, schema_name: &str) -> SchemaOutcome;
}

/// Validateur neutre : accepte tout document.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSchemaValidator;

impl SchemaValidator for NoopSchemaValidator {
    fn validate(&self, _xml: &str, _schema_name: &str) -> SchemaOutcome {
        SchemaOutcome::ok()
    }
}

/// Validateur structurel intégré (sans XSD) :
/// bonne formation, racine `model` dans l'espace de noms ArchiMate,
/// identifiants présents et uniques, extrémités des relations renseignées.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuralSchemaValidator;

const IDENTIFIED_TAGS: &[&[u8]] = &[
    b"element",
    b"relationship",
    b"propertyDefinition",
    b"view",
    b"node",
    b"connection",
];

impl StructuralSchemaValidator {
    fn attr(e: &BytesStart, key: &[u8]) -> Option<String> {
        e.attributes()
            .flatten()
            .find(|a| a.key.as_ref() == key)
            .map(|a| String::from_utf8_lossy(&a.value).to_string())
    }

    fn check_start(
        e: &BytesStart,
        is_root: bool,
        ids: &mut HashSet<String>,
        errors: &mut Vec<String>,
    ) {
        let tag = e.local_name();
        let tag_name = String::from_utf8_lossy(tag.as_ref()).to_string();

        for attr in e.attributes() {
            if let Err(err) = attr {
                errors.push(format!("Attribut invalide sur <{}> : {}", tag_name, err));
            }
        }

        if is_root {
            if tag.as_ref() != b"model" {
                errors.push(format!(
                    "Élément racine inattendu : <{}> (attendu <model>)",
                    tag_name
                ));
            }
            match Self::attr(e, b"xmlns") {
                Some(ns) if ns == ARCHIMATE_NS => {}
                Some(ns) => errors.push(format!("Espace de noms inattendu : {}", ns)),
                None => errors.push("Espace de noms ArchiMate absent".to_string()),
            }
        }

        let needs_id = is_root || IDENTIFIED_TAGS.contains(&tag.as_ref());
        if needs_id {
            match Self::attr(e, b"identifier") {
                None => errors.push(format!("Attribut 'identifier' manquant sur <{}>", tag_name)),
                Some(id) if !ids.insert(id.clone()) => {
                    errors.push(format!("Identifiant dupliqué dans le document : {}", id))
                }
                Some(_) => {}
            }
        }

        if tag.as_ref() == b"element" || tag.as_ref() == b"relationship" {
            if Self::attr(e, b"xsi:type").is_none() {
                errors.push(format!("Attribut 'xsi:type' manquant sur <{}>", tag_name));
            }
        }
        if tag.as_ref() == b"relationship" {
            for key in ["source", "target"] {
                if Self::attr(e, key.as_bytes()).is_none() {
                    errors.push(format!("Attribut '{}' manquant sur <relationship>", key));
                }
            }
        }
    }
}

impl SchemaValidator for StructuralSchemaValidator {
    fn validate(&self, xml: &str, schema_name: &str) -> SchemaOutcome {
        tracing::debug!("Validation structurelle (schéma demandé : {})", schema_name);

        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut errors = Vec::new();
        let mut ids = HashSet::new();
        let mut depth = 0usize;
        let mut root_seen = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    if depth == 0 && root_seen {
                        errors.push("Plusieurs éléments racine".to_string());
                    }
                    Self::check_start(&e, depth == 0, &mut ids, &mut errors);
                    root_seen = true;
                    depth += 1;
                }
                Ok(Event::Empty(e)) => {
                    if depth == 0 && root_seen {
                        errors.push("Plusieurs éléments racine".to_string());
                    }
                    Self::check_start(&e, depth == 0, &mut ids, &mut errors);
                    root_seen = true;
                }
                Ok(Event::End(_)) => depth = depth.saturating_sub(1),
                Ok(Event::Eof) => break,
                Err(e) => {
                    errors.push(format!(
                        "XML mal formé à la position {} : {}",
                        reader.buffer_position(),
                        e
                    ));
                    break;
                }
                _ => (),
            }
        }

        if !root_seen {
            errors.push("Document vide".to_string());
        } else if depth != 0 {
            errors.push("Document tronqué : balises non fermées".to_string());
        }

        SchemaOutcome::failed(errors)
    }
}
