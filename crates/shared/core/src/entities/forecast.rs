use serde::{Deserialize, Serialize};

use super::WeatherSample;

/// Ordered collection of samples, in the order the remote store lists them
///
/// Insertion order is arrival order, which is not necessarily chronological.
/// A collection is always replaced whole by the next snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastCollection {
    samples: Vec<WeatherSample>,
}

impl ForecastCollection {
    pub fn new(samples: Vec<WeatherSample>) -> Self {
        Self { samples }
    }

    pub fn push(&mut self, sample: WeatherSample) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[WeatherSample] {
        &self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeatherSample> {
        self.samples.iter()
    }

    /// Most recently arrived sample
    pub fn last(&self) -> Option<&WeatherSample> {
        self.samples.last()
    }

    /// The last `limit` samples, most recent first
    pub fn latest(&self, limit: usize) -> Vec<&WeatherSample> {
        self.samples.iter().rev().take(limit).collect()
    }

    pub fn into_samples(self) -> Vec<WeatherSample> {
        self.samples
    }
}

impl From<Vec<WeatherSample>> for ForecastCollection {
    fn from(samples: Vec<WeatherSample>) -> Self {
        Self::new(samples)
    }
}

impl FromIterator<WeatherSample> for ForecastCollection {
    fn from_iter<I: IntoIterator<Item = WeatherSample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for ForecastCollection {
    type Item = WeatherSample;
    type IntoIter = std::vec::IntoIter<WeatherSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.into_iter()
    }
}
