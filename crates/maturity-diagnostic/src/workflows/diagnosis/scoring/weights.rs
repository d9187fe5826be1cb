use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Global fallback used whenever a scope has no usable table.
pub const DEFAULT_OPTION_WEIGHTS: [i32; 4] = [0, 33, 66, 100];

pub const MAX_WEIGHT: i32 = 100;

/// Percentage awarded per option position (position 0 is the first option).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionWeightTable(Vec<i32>);

impl OptionWeightTable {
    pub fn new(weights: Vec<i32>) -> Self {
        Self(weights)
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn weight(&self, position: usize) -> Option<i32> {
        self.0.get(position).copied()
    }

    /// Pick the table scoring should use for a scope.
    ///
    /// A configured table is honored only when it has exactly one weight per option;
    /// anything else falls back to [`DEFAULT_OPTION_WEIGHTS`].
    pub fn resolve(configured: Option<&OptionWeightTable>, option_count: usize) -> Self {
        match configured {
            Some(table) if !table.is_empty() && table.len() == option_count => table.clone(),
            _ => Self::default(),
        }
    }

    /// Whether [`OptionWeightTable::resolve`] would discard this table.
    pub fn fits(&self, option_count: usize) -> bool {
        !self.is_empty() && self.len() == option_count
    }

    /// Range and shape check for administrator supplied tables.
    pub fn validate(&self, option_count: usize) -> Result<(), WeightViolation> {
        if self.is_empty() {
            return Err(WeightViolation::Empty);
        }

        if self.len() != option_count {
            return Err(WeightViolation::LengthMismatch {
                expected: option_count,
                found: self.len(),
            });
        }

        if let Some((position, value)) = self
            .0
            .iter()
            .copied()
            .enumerate()
            .find(|(_, value)| !(0..=MAX_WEIGHT).contains(value))
        {
            return Err(WeightViolation::OutOfRange { position, value });
        }

        Ok(())
    }
}

impl Default for OptionWeightTable {
    fn default() -> Self {
        Self(DEFAULT_OPTION_WEIGHTS.to_vec())
    }
}

/// Parses a comma-separated list such as `0,33,66,100`, one weight per option position.
impl FromStr for OptionWeightTable {
    type Err = WeightParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let weights = raw
            .split(',')
            .map(|part| {
                let part = part.trim();
                part.parse::<i32>()
                    .map_err(|_| WeightParseError::NotAnInteger(part.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let table = Self::new(weights);
        table.validate(table.len())?;
        Ok(table)
    }
}

impl From<Vec<i32>> for OptionWeightTable {
    fn from(value: Vec<i32>) -> Self {
        Self::new(value)
    }
}

/// Reasons an administrator supplied weight table is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WeightViolation {
    #[error("weight table must contain at least one weight")]
    Empty,
    #[error("weight table has {found} positions but questions offer {expected} options")]
    LengthMismatch { expected: usize, found: usize },
    #[error("weight {value} at position {position} must be between 0 and 100")]
    OutOfRange { position: usize, value: i32 },
}

/// Reasons a textual weight list cannot become a table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WeightParseError {
    #[error("'{0}' is not an integer weight")]
    NotAnInteger(String),
    #[error(transparent)]
    Invalid(#[from] WeightViolation),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_prefers_matching_scope_table() {
        let table = OptionWeightTable::new(vec![0, 25, 75, 100]);
        assert_eq!(OptionWeightTable::resolve(Some(&table), 4), table);
    }

    #[test]
    fn resolve_falls_back_when_unset_or_mismatched() {
        let short = OptionWeightTable::new(vec![0, 100]);
        let empty = OptionWeightTable::new(Vec::new());

        for configured in [None, Some(&short), Some(&empty)] {
            assert_eq!(
                OptionWeightTable::resolve(configured, 4).as_slice(),
                &DEFAULT_OPTION_WEIGHTS
            );
        }
    }

    #[test]
    fn validate_reports_first_offending_weight() {
        let table = OptionWeightTable::new(vec![0, -5, 66, 120]);
        assert_eq!(
            table.validate(4),
            Err(WeightViolation::OutOfRange {
                position: 1,
                value: -5
            })
        );
        assert_eq!(
            OptionWeightTable::default().validate(5),
            Err(WeightViolation::LengthMismatch {
                expected: 5,
                found: 4
            })
        );
        assert!(OptionWeightTable::default().validate(4).is_ok());
    }

    #[test]
    fn parses_comma_separated_lists() {
        let table: OptionWeightTable = " 0, 25 ,75,100".parse().expect("valid list");
        assert_eq!(table.as_slice(), &[0, 25, 75, 100]);

        assert_eq!(
            "0,abc".parse::<OptionWeightTable>(),
            Err(WeightParseError::NotAnInteger("abc".to_string()))
        );
        assert_eq!(
            "0,-5,100".parse::<OptionWeightTable>(),
            Err(WeightParseError::Invalid(WeightViolation::OutOfRange {
                position: 1,
                value: -5
            }))
        );
    }
}
