//! Pipeline module.
//!
//! This module provides the imputation engine and the end-to-end cleaning
//! pipeline built on top of it.

mod builder;
mod executor;

pub use builder::{CleaningPipeline, CleaningPipelineBuilder};
pub use executor::{ImputationEngine, Imputed};
