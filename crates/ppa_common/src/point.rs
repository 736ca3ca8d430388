//! Sweep parameter spaces and the points they enumerate.
//!
//! A [`ParameterSpace`] is an ordered list of named integer parameters, each
//! with an ordered list of values. Enumerating it yields the Cartesian
//! product as [`ParameterPoint`]s: the first parameter varies slowest and the
//! last parameter varies fastest. That order is part of the contract, since
//! the aggregate table keeps its rows in it.

use std::fmt;
use std::sync::Arc;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A single named sweep dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// The parameter name (e.g., `frame_length`).
    pub name: String,
    /// The values to sweep, in declaration order.
    pub values: Vec<i64>,
}

/// Errors raised while building a parameter space.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpaceError {
    /// Two parameters share a name.
    #[error("duplicate sweep parameter '{0}'")]
    DuplicateParameter(String),

    /// A parameter has no values, so the product would be empty.
    #[error("sweep parameter '{0}' has no values")]
    EmptyValues(String),

    /// A parameter name is empty or contains characters unusable in a path.
    #[error("invalid sweep parameter name '{0}'")]
    InvalidName(String),
}

/// An ordered collection of sweep parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpace {
    parameters: Vec<Parameter>,
}

impl ParameterSpace {
    /// Creates an empty parameter space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a space from a list of parameters, validating each one.
    pub fn from_parameters(parameters: Vec<Parameter>) -> Result<Self, SpaceError> {
        let mut space = Self::new();
        for p in parameters {
            space.push(p.name, p.values)?;
        }
        Ok(space)
    }

    /// Appends a parameter as the new innermost (fastest-varying) dimension.
    pub fn push(&mut self, name: impl Into<String>, values: Vec<i64>) -> Result<(), SpaceError> {
        let name = name.into();
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(SpaceError::InvalidName(name));
        }
        if self.parameters.iter().any(|p| p.name == name) {
            return Err(SpaceError::DuplicateParameter(name));
        }
        if values.is_empty() {
            return Err(SpaceError::EmptyValues(name));
        }
        self.parameters.push(Parameter { name, values });
        Ok(())
    }

    /// Builder-style variant of [`push`](Self::push).
    pub fn with(mut self, name: impl Into<String>, values: Vec<i64>) -> Result<Self, SpaceError> {
        self.push(name, values)?;
        Ok(self)
    }

    /// Returns the parameters in declaration order.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Returns the parameter names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name.as_str())
    }

    /// Returns `true` if a parameter with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p.name == name)
    }

    /// Returns the number of points the space enumerates.
    pub fn point_count(&self) -> usize {
        if self.parameters.is_empty() {
            return 0;
        }
        self.parameters.iter().map(|p| p.values.len()).product()
    }

    /// Enumerates every point in the space, outer parameter first.
    pub fn points(&self) -> Vec<ParameterPoint> {
        if self.parameters.is_empty() {
            return Vec::new();
        }
        let names: Arc<[String]> = self.parameters.iter().map(|p| p.name.clone()).collect();
        self.parameters
            .iter()
            .map(|p| p.values.iter().copied())
            .multi_cartesian_product()
            .enumerate()
            .map(|(index, values)| ParameterPoint {
                index,
                names: Arc::clone(&names),
                values,
            })
            .collect()
    }
}

/// One combination of sweep parameter values.
///
/// Carries its position in the enumeration so results computed out of order
/// can be put back in place. Parameter names are shared between all points of
/// a space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterPoint {
    index: usize,
    names: Arc<[String]>,
    values: Vec<i64>,
}

impl ParameterPoint {
    /// Returns the zero-based position of this point in the enumeration.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the value of the named parameter.
    pub fn get(&self, name: &str) -> Option<i64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i])
    }

    /// Returns the parameter names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns the parameter values in declaration order.
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Iterates over `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Builds the directory key for this point.
    ///
    /// Every `name_value` pair is joined with `_`, values zero-padded to
    /// `pad_width` digits. A lexical sort matches numeric order only while
    /// every value is non-negative and fits the width. A width of zero
    /// produces unpadded values.
    pub fn key(&self, pad_width: usize) -> String {
        self.iter()
            .map(|(name, value)| format!("{name}_{value:0pad_width$}"))
            .join("_")
    }
}

impl fmt::Display for ParameterPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} ({})",
            self.index,
            self.iter().map(|(n, v)| format!("{n}={v}")).join(", ")
        )
    }
}
