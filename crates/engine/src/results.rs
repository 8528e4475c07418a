//! Outcome of one or more data-source creation attempts.

use std::fmt;

/// Partition of attempted data-source creations into successes and failures.
///
/// Successes pair a created source `S` with the defining object `D` it came from;
/// failures pair the defining object with the error `E` that was captured. The
/// defining object is stored and echoed back, never inspected. Entries are only
/// ever appended, so the order of each partition is the order of the calls that
/// produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSourceResults<S, D, E> {
    data_sources: Vec<S>,
    success_data: Vec<D>,
    failed_data: Vec<D>,
    exceptions: Vec<E>,
}

impl<S, D, E> Default for DataSourceResults<S, D, E> {
    fn default() -> Self {
        Self {
            data_sources: Vec::new(),
            success_data: Vec::new(),
            failed_data: Vec::new(),
            exceptions: Vec::new(),
        }
    }
}

impl<S, D, E> DataSourceResults<S, D, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Results holding exactly one success.
    pub fn with_success(source: S, defining: D) -> Self {
        let mut results = Self::new();
        results.add_success(source, defining);
        results
    }

    /// Results holding exactly one failure.
    pub fn with_failure(defining: D, error: E) -> Self {
        let mut results = Self::new();
        results.add_failed(defining, error);
        results
    }

    pub fn add_success(&mut self, source: S, defining: D) {
        self.data_sources.push(source);
        self.success_data.push(defining);
    }

    pub fn add_failed(&mut self, defining: D, error: E) {
        self.failed_data.push(defining);
        self.exceptions.push(error);
    }

    /// Append every entry of `other` after this value's own entries.
    pub fn merge(&mut self, other: &Self)
    where
        S: Clone,
        D: Clone,
        E: Clone,
    {
        self.data_sources.extend_from_slice(&other.data_sources);
        self.success_data.extend_from_slice(&other.success_data);
        self.failed_data.extend_from_slice(&other.failed_data);
        self.exceptions.extend_from_slice(&other.exceptions);
    }

    /// Consuming form of [`merge`](Self::merge).
    pub fn absorb(&mut self, other: Self) {
        self.data_sources.extend(other.data_sources);
        self.success_data.extend(other.success_data);
        self.failed_data.extend(other.failed_data);
        self.exceptions.extend(other.exceptions);
    }

    pub fn any_failed(&self) -> bool {
        !self.exceptions.is_empty()
    }

    pub fn any_ok(&self) -> bool {
        !self.data_sources.is_empty()
    }

    /// At least one failure and no successes.
    pub fn all_failed(&self) -> bool {
        self.any_failed() && !self.any_ok()
    }

    /// No failures. True for empty results.
    pub fn all_ok(&self) -> bool {
        !self.any_failed()
    }

    pub fn data_sources(&self) -> &[S] {
        &self.data_sources
    }

    pub fn success_data(&self) -> &[D] {
        &self.success_data
    }

    pub fn failed_data(&self) -> &[D] {
        &self.failed_data
    }

    pub fn exceptions(&self) -> &[E] {
        &self.exceptions
    }

    /// Created sources paired with their defining objects.
    pub fn successes(&self) -> impl Iterator<Item = (&S, &D)> {
        self.data_sources.iter().zip(&self.success_data)
    }

    /// Defining objects paired with the error each one produced.
    pub fn failures(&self) -> impl Iterator<Item = (&D, &E)> {
        self.failed_data.iter().zip(&self.exceptions)
    }

    pub fn success_count(&self) -> usize {
        self.data_sources.len()
    }

    pub fn failure_count(&self) -> usize {
        self.exceptions.len()
    }
}

/// Report lines for results that contain failures; empty when everything loaded.
///
/// When some entries succeeded they are listed first so a partial load is visible
/// next to the errors.
pub fn summarize<S, D, E>(results: &DataSourceResults<S, D, E>) -> Vec<String>
where
    D: fmt::Display,
    E: fmt::Display,
{
    if !results.any_failed() {
        return Vec::new();
    }
    let plural = results.failure_count() > 1;
    let mut lines = Vec::new();
    if results.any_ok() {
        lines.push("Some of the data was loaded successfully:".to_string());
        lines.extend(results.success_data().iter().map(|defining| format!("    {defining}")));
        lines.push(if plural {
            "But there were errors loading some of the data:".to_string()
        } else {
            "But there was an error loading some of the data:".to_string()
        });
    } else {
        lines.push(if plural {
            "There were errors loading the data:".to_string()
        } else {
            "There was an error loading the data:".to_string()
        });
    }
    lines.extend(results.failures().map(|(defining, error)| format!("    {defining}: {error}")));
    lines
}
