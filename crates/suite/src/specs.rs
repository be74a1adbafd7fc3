//! Array specifications for actions and observations.

use crate::{Result, SuiteError};

/// Element type of a spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dtype {
    Float32,
    Float64,
    Int32,
    UInt8,
}

impl Dtype {
    #[must_use]
    pub fn is_float(self) -> bool {
        matches!(self, Dtype::Float32 | Dtype::Float64)
    }
}

/// A minimum or maximum, either shared by every element or given per element.
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    Scalar(f64),
    Elements(Vec<f64>),
}

impl Bound {
    /// Expand the bound to `n` elements.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::BoundShape`] when a per-element bound has the
    /// wrong length.
    pub fn broadcast(&self, n: usize) -> Result<Vec<f64>> {
        match self {
            Bound::Scalar(v) => Ok(vec![*v; n]),
            Bound::Elements(values) if values.len() == n => Ok(values.clone()),
            Bound::Elements(values) if values.len() == 1 => Ok(vec![values[0]; n]),
            Bound::Elements(values) => Err(SuiteError::BoundShape { expected: n, actual: values.len() }),
        }
    }
}

/// Unbounded array spec.
#[derive(Debug, Clone, PartialEq)]
pub struct ArraySpec {
    pub name: String,
    pub shape: Vec<usize>,
    pub dtype: Dtype,
}

impl ArraySpec {
    #[must_use]
    pub fn new(name: impl Into<String>, shape: &[usize], dtype: Dtype) -> Self {
        Self { name: name.into(), shape: shape.to_vec(), dtype }
    }

    /// Number of scalar values described. A scalar shape `[]` holds one.
    #[must_use]
    pub fn num_values(&self) -> usize {
        self.shape.iter().product()
    }
}

/// Array spec with inclusive element bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedArraySpec {
    pub name: String,
    pub shape: Vec<usize>,
    pub dtype: Dtype,
    pub minimum: Bound,
    pub maximum: Bound,
}

impl BoundedArraySpec {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        shape: &[usize],
        dtype: Dtype,
        minimum: Bound,
        maximum: Bound,
    ) -> Self {
        Self { name: name.into(), shape: shape.to_vec(), dtype, minimum, maximum }
    }

    #[must_use]
    pub fn num_values(&self) -> usize {
        self.shape.iter().product()
    }

    /// Check that an action matches the spec's size and lies within bounds.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::ActionShape`] on a size mismatch. Out-of-range
    /// values are reported as `Ok(false)`.
    pub fn validate(&self, values: &[f64]) -> Result<bool> {
        let n = self.num_values();
        if values.len() != n {
            return Err(SuiteError::ActionShape { expected: n, actual: values.len() });
        }
        let lo = self.minimum.broadcast(n)?;
        let hi = self.maximum.broadcast(n)?;
        Ok(values.iter().zip(lo.iter().zip(&hi)).all(|(v, (l, h))| v >= l && v <= h))
    }
}

/// Either kind of spec, as listed in an observation spec.
#[derive(Debug, Clone, PartialEq)]
pub enum Spec {
    Array(ArraySpec),
    Bounded(BoundedArraySpec),
}

impl Spec {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Spec::Array(s) => &s.name,
            Spec::Bounded(s) => &s.name,
        }
    }

    #[must_use]
    pub fn shape(&self) -> &[usize] {
        match self {
            Spec::Array(s) => &s.shape,
            Spec::Bounded(s) => &s.shape,
        }
    }

    #[must_use]
    pub fn dtype(&self) -> Dtype {
        match self {
            Spec::Array(s) => s.dtype,
            Spec::Bounded(s) => s.dtype,
        }
    }

    #[must_use]
    pub fn num_values(&self) -> usize {
        self.shape().iter().product()
    }
}

impl From<ArraySpec> for Spec {
    fn from(spec: ArraySpec) -> Self {
        Spec::Array(spec)
    }
}

impl From<BoundedArraySpec> for Spec {
    fn from(spec: BoundedArraySpec) -> Self {
        Spec::Bounded(spec)
    }
}
