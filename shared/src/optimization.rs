//! Optimization request form: algorithm choice, date range, weights.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Optimization algorithms offered by the scheduling service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    AntColony,
    TabuSearch,
    ParticleSwarm,
}

impl Algorithm {
    /// Display order of the algorithm cards; the first one is preselected
    pub const ALL: [Algorithm; 3] = [Algorithm::AntColony, Algorithm::TabuSearch, Algorithm::ParticleSwarm];

    /// Value sent in the `algorithm` field
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::AntColony => "ant_colony",
            Algorithm::TabuSearch => "tabu_search",
            Algorithm::ParticleSwarm => "particle_swarm",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Algorithm::AntColony => "Ant Colony Optimization",
            Algorithm::TabuSearch => "Tabu Search",
            Algorithm::ParticleSwarm => "Particle Swarm Optimization",
        }
    }

    pub fn short_code(&self) -> &'static str {
        match self {
            Algorithm::AntColony => "ACOBM",
            Algorithm::TabuSearch => "TSBM",
            Algorithm::ParticleSwarm => "PSOBM",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == value)
    }
}

/// Cost-factor weighting slider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WeightFactor {
    Actor,
    Location,
    Travel,
}

impl WeightFactor {
    pub const ALL: [WeightFactor; 3] = [WeightFactor::Actor, WeightFactor::Location, WeightFactor::Travel];
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 10;
    pub const DEFAULT: u8 = 5;

    /// Form field name
    pub fn field_name(&self) -> &'static str {
        match self {
            WeightFactor::Actor => "actor_weight",
            WeightFactor::Location => "location_weight",
            WeightFactor::Travel => "travel_weight",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeightFactor::Actor => "Actor Cost Weight",
            WeightFactor::Location => "Location Cost Weight",
            WeightFactor::Travel => "Travel Cost Weight",
        }
    }
}

/// Specific validation errors; several can fire at once
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please select an optimization algorithm.")]
    MissingAlgorithm,
    #[error("Please select a start date.")]
    MissingStartDate,
    #[error("Start date must be before end date.")]
    InvalidRange,
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// Raw form state as typed by the user
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationForm {
    pub name: String,
    pub algorithm: Option<Algorithm>,
    pub start_date: String,
    pub end_date: String,
    pub weights: BTreeMap<WeightFactor, u8>,
}

impl Default for OptimizationForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            algorithm: Algorithm::ALL.first().copied(),
            start_date: String::new(),
            end_date: String::new(),
            weights: WeightFactor::ALL.into_iter().map(|w| (w, WeightFactor::DEFAULT)).collect(),
        }
    }
}

impl OptimizationForm {
    pub fn weight(&self, factor: WeightFactor) -> u8 {
        self.weights.get(&factor).copied().unwrap_or(WeightFactor::DEFAULT)
    }

    pub fn set_weight(&mut self, factor: WeightFactor, value: u8) {
        self.weights.insert(factor, value.clamp(WeightFactor::MIN, WeightFactor::MAX));
    }

    /// Run every rule and collect all failures
    pub fn validate(&self) -> Vec<FormError> {
        let mut errors = Vec::new();

        if self.algorithm.is_none() {
            errors.push(FormError::MissingAlgorithm);
        }

        let start = self.start_date.trim();
        let end = self.end_date.trim();

        if start.is_empty() {
            errors.push(FormError::MissingStartDate);
        } else if !end.is_empty() {
            match (parse_date(start), parse_date(end)) {
                (Ok(start), Ok(end)) if start > end => errors.push(FormError::InvalidRange),
                (Ok(_), Ok(_)) => {}
                (Err(e), _) | (_, Err(e)) => errors.push(e),
            }
        } else if let Err(e) = parse_date(start) {
            errors.push(e);
        }

        errors
    }

    /// Flatten the form into the key-value JSON payload
    pub fn to_payload(&self) -> BTreeMap<String, String> {
        let mut payload = BTreeMap::new();
        payload.insert("name".to_string(), self.name.trim().to_string());
        payload.insert(
            "algorithm".to_string(),
            self.algorithm.map(|a| a.as_str().to_string()).unwrap_or_default(),
        );
        payload.insert("start_date".to_string(), self.start_date.trim().to_string());
        payload.insert("end_date".to_string(), self.end_date.trim().to_string());
        for factor in WeightFactor::ALL {
            payload.insert(factor.field_name().to_string(), self.weight(factor).to_string());
        }
        payload
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| FormError::InvalidDate(value.to_string()))
}
