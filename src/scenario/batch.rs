use crate::aggregator::*;
use crate::error::*;

/// Scenario outcomes, one slot per entry in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    slots: Vec<RaceResult<SolverResult>>,
}

impl Batch {
    pub(crate) fn new(slots: Vec<RaceResult<SolverResult>>) -> Self {
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
    pub fn get(&self, index: usize) -> Option<&RaceResult<SolverResult>> {
        self.slots.get(index)
    }
    pub fn iter(&self) -> impl Iterator<Item = &RaceResult<SolverResult>> {
        self.slots.iter()
    }

    /// Indices of failed entries with their errors.
    pub fn failures(&self) -> Vec<(usize, &RaceError)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().err().map(|e| (i, e)))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_ok())
    }

    /// Every result, or a single error listing each failed slot.
    pub fn into_results(self) -> RaceResult<Vec<SolverResult>> {
        if self.is_complete() {
            return self.slots.into_iter().collect();
        }
        let total = self.len();
        let failures = self
            .failures()
            .into_iter()
            .map(|(i, e)| (i, e.to_string()))
            .collect();
        Err(RaceError::BatchPartialFailure { failures, total })
    }
}

impl IntoIterator for Batch {
    type Item = RaceResult<SolverResult>;
    type IntoIter = std::vec::IntoIter<RaceResult<SolverResult>>;
    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter()
    }
}
