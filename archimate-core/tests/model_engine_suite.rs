// FICHIER : archimate-core/tests/model_engine_suite.rs

// Module commun (Setup, Helpers)
#[path = "model_engine_suite/mod.rs"]
mod common;

// Scénarios de mutation (création, mise à jour, cascade)
#[path = "model_engine_suite/mutation_tests.rs"]
mod mutation_tests;

// Transactions (snapshot / rollback)
#[path = "model_engine_suite/transaction_tests.rs"]
mod transaction_tests;

// Format d'échange (aller-retour, fichiers)
#[path = "model_engine_suite/exchange_tests.rs"]
mod exchange_tests;

// Invariants après une séquence d'opérations mixtes
#[path = "model_engine_suite/invariant_tests.rs"]
mod invariant_tests;
