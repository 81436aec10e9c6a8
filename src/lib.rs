//! Track-quality classification for Level-1 trigger track candidates.
/// Classification dispatch across cut-based and model-based scoring.
pub mod classifier;
/// TOML configuration loading and resolution.
pub mod config;
/// Hand-tuned cut selection.
pub mod cuts;
/// Named feature derivation and ordered selection.
pub mod features;
/// Hit-pattern expansion via the eta-binned lookup table.
pub mod hitpattern;
/// Logging setup for the CLI tools.
pub mod logging;
/// Model inference backends.
pub mod models;
/// Track data model.
pub mod track;
