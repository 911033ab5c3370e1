use std::collections::HashSet;

use thiserror::Error;

use crate::config::HealthThresholdConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthThreshold {
    pub min_score: i64,
    pub label: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HealthTableError {
    #[error("health table must contain at least one threshold")]
    Empty,
    #[error("health threshold {0} is declared more than once")]
    DuplicateThreshold(i64),
    #[error("health threshold {0} has an empty label")]
    EmptyLabel(i64),
}

/// Severity score to health label lookup, highest threshold first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthTable {
    rows: Vec<HealthThreshold>,
}

impl HealthTable {
    pub fn new(mut rows: Vec<HealthThreshold>) -> Result<Self, HealthTableError> {
        if rows.is_empty() {
            return Err(HealthTableError::Empty);
        }

        let mut seen = HashSet::with_capacity(rows.len());
        for row in &rows {
            if row.label.trim().is_empty() {
                return Err(HealthTableError::EmptyLabel(row.min_score));
            }
            if !seen.insert(row.min_score) {
                return Err(HealthTableError::DuplicateThreshold(row.min_score));
            }
        }

        rows.sort_by(|left, right| right.min_score.cmp(&left.min_score));
        Ok(Self { rows })
    }

    pub fn from_config(thresholds: &[HealthThresholdConfig]) -> Result<Self, HealthTableError> {
        Self::new(
            thresholds
                .iter()
                .map(|threshold| HealthThreshold {
                    min_score: threshold.min_score,
                    label: threshold.label.clone(),
                })
                .collect(),
        )
    }

    pub fn label_for(&self, severity_score: i64) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| severity_score >= row.min_score)
            .map(|row| row.label.as_str())
    }

    pub fn rows(&self) -> &[HealthThreshold] {
        &self.rows
    }
}
