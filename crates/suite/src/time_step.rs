//! Time steps returned by control environments.

use ndarray::{Array1, ArrayD};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepType {
    First,
    Mid,
    Last,
}

/// One observation entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ObsValue {
    Scalar(f64),
    Array(ArrayD<f64>),
}

impl ObsValue {
    /// Values in row-major order.
    #[must_use]
    pub fn to_flat(&self) -> Vec<f64> {
        match self {
            ObsValue::Scalar(v) => vec![*v],
            ObsValue::Array(a) => a.iter().copied().collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            ObsValue::Scalar(_) => 1,
            ObsValue::Array(a) => a.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<f64>> for ObsValue {
    fn from(values: Vec<f64>) -> Self {
        ObsValue::Array(Array1::from_vec(values).into_dyn())
    }
}

impl From<f64> for ObsValue {
    fn from(value: f64) -> Self {
        ObsValue::Scalar(value)
    }
}

impl From<ArrayD<f64>> for ObsValue {
    fn from(values: ArrayD<f64>) -> Self {
        ObsValue::Array(values)
    }
}

/// Insertion-ordered observation dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observation {
    entries: Vec<(String, ObsValue)>,
}

impl Observation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry. Replacing keeps the original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ObsValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ObsValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ObsValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &ObsValue> {
        self.entries.iter().map(|(_, v)| v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of `reset` or `step` on a control environment.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeStep {
    pub step_type: StepType,
    /// `None` on the first step of an episode.
    pub reward: Option<f64>,
    /// `None` on the first step of an episode.
    pub discount: Option<f64>,
    pub observation: Observation,
}

impl TimeStep {
    #[must_use]
    pub fn restart(observation: Observation) -> Self {
        Self { step_type: StepType::First, reward: None, discount: None, observation }
    }

    #[must_use]
    pub fn transition(reward: f64, discount: f64, observation: Observation) -> Self {
        Self { step_type: StepType::Mid, reward: Some(reward), discount: Some(discount), observation }
    }

    #[must_use]
    pub fn termination(reward: f64, observation: Observation) -> Self {
        Self { step_type: StepType::Last, reward: Some(reward), discount: Some(0.0), observation }
    }

    #[must_use]
    pub fn truncation(reward: f64, discount: f64, observation: Observation) -> Self {
        Self { step_type: StepType::Last, reward: Some(reward), discount: Some(discount), observation }
    }

    #[must_use]
    pub fn first(&self) -> bool {
        self.step_type == StepType::First
    }

    #[must_use]
    pub fn mid(&self) -> bool {
        self.step_type == StepType::Mid
    }

    #[must_use]
    pub fn last(&self) -> bool {
        self.step_type == StepType::Last
    }
}
