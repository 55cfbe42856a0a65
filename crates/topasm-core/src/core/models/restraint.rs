use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const POSITION_RESTRAINTS_HEADER: &str = "[ position_restraints ]";
pub const POSITION_RESTRAINTS_COLUMNS: &str = "; atom  type      fx      fy      fz";

/// Harmonic position restraint function type used for every emitted record.
pub const POSRES_FUNCTION_TYPE: u8 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RestraintParseError {
    #[error("Invalid triplet '{0}'. Expected '(reference, restrain, chain)'.")]
    InvalidTriplet(String),
    #[error("Triplet list is empty")]
    EmptyTripletList,
    #[error("Expected 3 force constants, found {0}")]
    ForceConstantCount(usize),
    #[error("Invalid force constant '{0}'")]
    InvalidForceConstant(String),
}

/// A (reference group, restrain group, chain) request for one restraint file.
///
/// The reference group defines the molecule-local atom numbering; the restrain
/// group must be a subset of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RestraintTriplet {
    pub reference: String,
    pub restrain: String,
    pub chain: String,
}

impl RestraintTriplet {
    pub fn new(
        reference: impl Into<String>,
        restrain: impl Into<String>,
        chain: impl Into<String>,
    ) -> Self {
        Self {
            reference: reference.into(),
            restrain: restrain.into(),
            chain: chain.into(),
        }
    }

    /// Parses a list written as `( Chain_A, Chain_A_noMut, A ), ( Chain_B, Chain_B_noMut, B )`.
    ///
    /// Spaces are ignored everywhere.
    pub fn parse_list(text: &str) -> Result<Vec<Self>, RestraintParseError> {
        if text.trim().is_empty() {
            return Err(RestraintParseError::EmptyTripletList);
        }
        text.split("),").map(str::parse).collect()
    }
}

impl FromStr for RestraintTriplet {
    type Err = RestraintParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .trim_matches(|c: char| c == ' ' || c == '(' || c == ')')
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let fields: Vec<&str> = compact.split(',').collect();
        match fields.as_slice() {
            [reference, restrain, chain]
                if !reference.is_empty() && !restrain.is_empty() && !chain.is_empty() =>
            {
                Ok(Self::new(*reference, *restrain, *chain))
            }
            _ => Err(RestraintParseError::InvalidTriplet(s.trim().to_string())),
        }
    }
}

impl fmt::Display for RestraintTriplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.reference, self.restrain, self.chain)
    }
}

/// Accepted serialized forms of [`ForceConstants`]: `[fx, fy, fz]` or `"fx fy fz"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ForceConstantsRepr {
    Array(Vec<f64>),
    Text(String),
}

/// Force constants (kJ mol⁻¹ nm⁻²) along x, y and z.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "ForceConstantsRepr")]
pub struct ForceConstants {
    pub fx: f64,
    pub fy: f64,
    pub fz: f64,
}

impl ForceConstants {
    pub const fn new(fx: f64, fy: f64, fz: f64) -> Self {
        Self { fx, fy, fz }
    }

    pub const fn uniform(k: f64) -> Self {
        Self::new(k, k, k)
    }

    fn from_values(values: &[f64]) -> Result<Self, RestraintParseError> {
        match values {
            [fx, fy, fz] => Ok(Self::new(*fx, *fy, *fz)),
            other => Err(RestraintParseError::ForceConstantCount(other.len())),
        }
    }
}

impl Default for ForceConstants {
    fn default() -> Self {
        Self::uniform(500.0)
    }
}

impl FromStr for ForceConstants {
    type Err = RestraintParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<f64>()
                    .map_err(|_| RestraintParseError::InvalidForceConstant(token.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_values(&values)
    }
}

impl TryFrom<ForceConstantsRepr> for ForceConstants {
    type Error = RestraintParseError;

    fn try_from(repr: ForceConstantsRepr) -> Result<Self, Self::Error> {
        match repr {
            ForceConstantsRepr::Array(values) => Self::from_values(&values),
            ForceConstantsRepr::Text(text) => text.parse(),
        }
    }
}

impl fmt::Display for ForceConstants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.fx, self.fy, self.fz)
    }
}

/// One line of a `[ position_restraints ]` directive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionRestraintRecord {
    /// 1-based atom index local to the restrained moleculetype.
    pub atom: usize,
    pub function_type: u8,
    pub force_constants: ForceConstants,
}

impl PositionRestraintRecord {
    pub fn new(atom: usize, force_constants: ForceConstants) -> Self {
        Self {
            atom,
            function_type: POSRES_FUNCTION_TYPE,
            force_constants,
        }
    }
}

impl fmt::Display for PositionRestraintRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}     {}  {}",
            self.atom, self.function_type, self.force_constants
        )
    }
}

/// Contents of a standalone position restraint include file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionRestraints {
    pub records: Vec<PositionRestraintRecord>,
}

impl PositionRestraints {
    /// One record per local atom index, in the given order.
    pub fn from_local_indices(indices: &[usize], force_constants: ForceConstants) -> Self {
        Self {
            records: indices
                .iter()
                .map(|&atom| PositionRestraintRecord::new(atom, force_constants))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
