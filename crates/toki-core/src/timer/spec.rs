use std::time::Duration;

use crate::error::{CoreError, Result};

/// Ordered list of stage durations for one invocation.
///
/// Insertion order is execution order. Always holds at least one stage and
/// is never modified after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSpec {
    stages: Vec<Duration>,
}

impl TimerSpec {
    /// Build a spec from parsed durations.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptySpec`] when `stages` is empty.
    pub fn new(stages: Vec<Duration>) -> Result<Self> {
        if stages.is_empty() {
            return Err(CoreError::EmptySpec);
        }
        Ok(Self { stages })
    }

    pub fn stages(&self) -> &[Duration] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Duration> {
        self.stages.get(index).copied()
    }

    pub fn is_last(&self, index: usize) -> bool {
        index + 1 == self.stages.len()
    }

    /// Sum of all stage lengths.
    pub fn total(&self) -> Duration {
        self.stages.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_spec_is_rejected() {
        assert!(matches!(TimerSpec::new(vec![]), Err(CoreError::EmptySpec)));
    }

    #[test]
    fn last_index_and_total() {
        let spec = TimerSpec::new(vec![Duration::from_secs(2), Duration::from_secs(3)]).unwrap();
        assert_eq!(spec.len(), 2);
        assert!(!spec.is_last(0));
        assert!(spec.is_last(1));
        assert_eq!(spec.total(), Duration::from_secs(5));
        assert_eq!(spec.get(2), None);
    }
}
