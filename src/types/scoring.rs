use crate::catalog::{AxisId, Catalog, SchoolId};
use serde::Serialize;

pub type Score = i32;

/// Raw per-school and per-axis totals, indexed by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreCard {
    pub schools: Vec<Score>,
    pub axes: Vec<Score>,
}

impl ScoreCard {
    pub fn zeroed(catalog: &Catalog) -> Self {
        Self {
            schools: vec![0; catalog.schools.len()],
            axes: vec![0; catalog.axes.len()],
        }
    }

    pub fn school(&self, id: SchoolId) -> Score {
        self.schools[id.index()]
    }

    pub fn axis(&self, id: AxisId) -> Score {
        self.axes[id.index()]
    }
}
