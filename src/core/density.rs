use crate::domain::model::{CountryEntry, CountryTable};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_VAL: f64 = 0.1;
pub const DEFAULT_MAX_VAL: f64 = 0.6;
/// No entity may visually dominate: opacity never exceeds this.
pub const OPACITY_CEILING: f64 = 0.5;

/// Which raw count of a country entry feeds the scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DensityColumn {
    Population,
    FilmCount,
}

impl DensityColumn {
    fn value(&self, entry: &CountryEntry) -> f64 {
        match self {
            DensityColumn::Population => entry.population,
            DensityColumn::FilmCount => entry.film_count as f64,
        }
    }
}

/// Converts one raw count column into a bounded display intensity.
/// The column maximum is captured once at construction.
#[derive(Debug, Clone)]
pub struct DensityScale {
    column: DensityColumn,
    maximal: f64,
    min_val: f64,
    max_val: f64,
}

impl DensityScale {
    pub fn new(table: &CountryTable, column: DensityColumn) -> Self {
        let maximal = table
            .values()
            .map(|entry| column.value(entry))
            .fold(0.0, f64::max);
        Self {
            column,
            maximal,
            min_val: DEFAULT_MIN_VAL,
            max_val: DEFAULT_MAX_VAL,
        }
    }

    pub fn with_bounds(mut self, min_val: f64, max_val: f64) -> Self {
        self.min_val = min_val;
        self.max_val = max_val;
        self
    }

    /// Display intensity in [0, 0.5]. Small nonzero ratios are lifted
    /// to `min_val` so they stay visible; zero stays zero.
    pub fn opacity(&self, entry: &CountryEntry) -> f64 {
        if self.maximal == 0.0 {
            return 0.0;
        }

        let mut val = self.column.value(entry) / self.maximal / self.max_val;
        if val > 0.0 && val < self.min_val {
            val = self.min_val;
        }

        if val < OPACITY_CEILING {
            val
        } else {
            OPACITY_CEILING
        }
    }
}
