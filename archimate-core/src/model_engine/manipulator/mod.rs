// FICHIER : archimate-core/src/model_engine/manipulator/mod.rs

//! Moteur de mutation : seul point d'écriture de l'agrégat `ModelData`.
//!
//! Chaque opération valide d'abord, puis applique ses changements :
//! une erreur laisse toujours le modèle inchangé.

mod elements;
mod guard;
mod ids;
mod properties;
mod queries;
mod relationships;
mod views;

pub use elements::DeleteOutcome;
pub use queries::{ElementFilter, ModelStats, RelationshipFilter};

use crate::model_engine::exchange::ExchangeCodec;
use crate::model_engine::persistence::{self, SaveOptions, SaveOutcome};
use crate::model_engine::transactions::{Operation, TransactionJournal};
use crate::model_engine::types::{Element, ModelData, Relationship};
use crate::model_engine::validators::{
    run_all, BusinessRuleValidator, IntegrityChecker, ModelValidator, Reporter, SchemaValidator,
    StructuralSchemaValidator, TypeValidator, ValidationCategory, ValidationIssue,
    ValidationReport,
};
use crate::utils::{AppError, EngineConfig, EntityKind, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

pub struct ModelManipulator {
    model: ModelData,
    config: EngineConfig,
    codec: ExchangeCodec,
    source_path: Option<PathBuf>,
    modified: bool,
    journal: TransactionJournal,
    schema_validator: Box<dyn SchemaValidator>,
}

impl std::fmt::Debug for ModelManipulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelManipulator")
            .field("model", &self.model.id)
            .field("source_path", &self.source_path)
            .field("modified", &self.modified)
            .field("transaction", &self.journal.open_id())
            .finish()
    }
}

impl ModelManipulator {
    /// Modèle vide, nommé d'après la configuration.
    pub fn new(config: EngineConfig) -> Self {
        let model = ModelData::new(ids::generate(EntityKind::Model), config.model_name.clone());
        Self::from_model(model, config)
    }

    /// Adopte un agrégat existant ; les références inverses sont recalculées.
    pub fn from_model(mut model: ModelData, config: EngineConfig) -> Self {
        model.rebuild_back_references();
        Self {
            model,
            codec: ExchangeCodec::from_config(&config),
            config,
            source_path: None,
            modified: false,
            journal: TransactionJournal::default(),
            schema_validator: Box::new(StructuralSchemaValidator),
        }
    }

    /// Ouvre un fichier d'échange.
    pub fn open(path: impl AsRef<Path>, config: EngineConfig) -> Result<Self> {
        let path = path.as_ref();
        let model = persistence::load(path, &ExchangeCodec::from_config(&config))?;
        let mut manipulator = Self::from_model(model, config);
        manipulator.source_path = Some(path.to_path_buf());
        Ok(manipulator)
    }

    pub fn with_schema_validator(mut self, validator: impl SchemaValidator + 'static) -> Self {
        self.schema_validator = Box::new(validator);
        self
    }

    // --- ACCESSEURS ---

    pub fn get_model(&self) -> &ModelData {
        &self.model
    }

    pub fn into_model(self) -> ModelData {
        self.model
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn codec(&self) -> &ExchangeCodec {
        &self.codec
    }

    pub fn journal(&self) -> &TransactionJournal {
        &self.journal
    }

    // --- CYCLE DE VIE ---

    /// Abandonne les modifications et relit le dernier fichier sauvegardé.
    #[instrument(skip(self))]
    pub fn reload(&mut self) -> Result<()> {
        if self.journal.is_open() {
            return Err(AppError::Transaction(
                "Rechargement impossible pendant une transaction".to_string(),
            ));
        }
        let path = self
            .source_path
            .clone()
            .ok_or_else(|| AppError::Config("Aucun fichier associé au modèle".to_string()))?;
        let mut model = persistence::load(&path, &self.codec)?;
        model.rebuild_back_references();
        self.model = model;
        self.modified = false;
        info!("🔄 Modèle rechargé depuis {:?}", path);
        Ok(())
    }

    /// Sauvegarde avec les options de la configuration.
    /// Sans chemin explicite, écrit dans le fichier d'origine.
    pub fn save(&mut self, path: Option<&Path>) -> Result<SaveOutcome> {
        let options = SaveOptions::from_config(&self.config);
        self.save_with(path, options)
    }

    #[instrument(skip(self))]
    pub fn save_with(&mut self, path: Option<&Path>, options: SaveOptions) -> Result<SaveOutcome> {
        let target = match path {
            Some(p) => p.to_path_buf(),
            None => self.source_path.clone().ok_or_else(|| {
                AppError::Config("Aucun chemin de sauvegarde pour le modèle".to_string())
            })?,
        };

        let outcome = persistence::save(
            &self.model,
            &target,
            options,
            &self.codec,
            self.schema_validator.as_ref(),
            &self.config.schema_name,
        )?;

        self.source_path = Some(target);
        self.modified = false;
        Ok(outcome)
    }

    // --- VALIDATION EXPLICITE (rapports, jamais d'erreur) ---

    /// Toutes les catégories : type, règles métier, intégrité, schéma.
    pub fn validate_model(&self) -> ValidationReport {
        let validators: [&dyn ModelValidator; 3] = [
            &TypeValidator,
            &BusinessRuleValidator,
            &IntegrityChecker,
        ];
        let issues = run_all(&validators, &self.model);

        let schema_issues = match self.codec.encode(&self.model) {
            Ok(xml) => self
                .schema_validator
                .validate(&xml, &self.config.schema_name)
                .into_issues(),
            Err(e) => vec![ValidationIssue::error(
                ValidationCategory::Schema,
                "SCHEMA_000",
                None,
                e.to_string(),
            )],
        };

        let report = Reporter::build([issues, schema_issues]);
        debug!(
            "Validation du modèle : {} erreur(s), {} avertissement(s)",
            report.error_count, report.warning_count
        );
        report
    }

    /// Contrôle d'une relation : champs, extrémités, règles métier.
    pub fn validate_relationship(&self, id: &str) -> ValidationReport {
        let Some(rel) = self.model.relationships.get(id) else {
            return Reporter::from_error(&AppError::not_found(EntityKind::Relationship, id));
        };

        if let Err(e) = TypeValidator::check_relationship(
            rel.relationship_type.as_str(),
            &rel.source_id,
            &rel.target_id,
        )
        .into_result()
        {
            return Reporter::from_error(&e);
        }

        match self.endpoints(rel) {
            Ok((source, target)) => Reporter::build([BusinessRuleValidator::check_relationship(
                rel,
                source,
                target,
                self.model.relationships.values(),
            )]),
            Err(e) => Reporter::from_error(&e),
        }
    }

    // --- INTERNE ---

    fn endpoints(&self, rel: &Relationship) -> Result<(&Element, &Element)> {
        let source = self
            .model
            .elements
            .get(&rel.source_id)
            .ok_or_else(|| AppError::not_found(EntityKind::Element, &rel.source_id))?;
        let target = self
            .model
            .elements
            .get(&rel.target_id)
            .ok_or_else(|| AppError::not_found(EntityKind::Element, &rel.target_id))?;
        Ok((source, target))
    }

    /// Toute mutation réussie passe par ici : drapeau « modifié » et journal.
    pub(crate) fn mark_dirty(&mut self, operation: Operation) {
        debug!("Mutation : {:?}", operation);
        self.modified = true;
        self.journal.record(operation);
    }
}
