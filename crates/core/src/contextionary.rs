//! Vocabulary extension for the contextionary text vectorizer.
//!
//! A concept extension teaches the vectorizer a new word (or compound) by
//! describing it in known words. The weight controls how strongly the new
//! concept replaces an existing one of the same name.

use crate::config::{CONCEPT_WEIGHT_MAX, CONCEPT_WEIGHT_MIN, DEFAULT_CONCEPT_WEIGHT};
use crate::error::ConfigError;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConceptExtension {
    concept: String,
    definition: String,
    weight: f32,
}

impl Default for ConceptExtension {
    fn default() -> Self {
        Self {
            concept: String::new(),
            definition: String::new(),
            weight: DEFAULT_CONCEPT_WEIGHT,
        }
    }
}

impl ConceptExtension {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_concept(mut self, concept: impl Into<String>) -> Self {
        self.concept = concept.into();
        self
    }

    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = definition.into();
        self
    }

    /// Rejects weights outside `[0, 1]`, NaN included.
    pub fn with_weight(mut self, weight: f32) -> Result<Self, ConfigError> {
        if !(CONCEPT_WEIGHT_MIN..=CONCEPT_WEIGHT_MAX).contains(&weight) {
            return Err(ConfigError::WeightOutOfRange(weight));
        }
        self.weight = weight;
        Ok(self)
    }

    pub fn concept(&self) -> &str {
        &self.concept
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// REST body: `{"concept": .., "definition": .., "weight": ..}`.
    pub fn to_rest_body(&self) -> serde_json::Value {
        serde_json::json!(self)
    }
}
