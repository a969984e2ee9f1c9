use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use restock_core::{DomainError, ValueObject};

/// Value-contribution grade.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AbcGrade {
    A,
    B,
    C,
}

/// Demand-volatility grade.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum XyzGrade {
    X,
    Y,
    Z,
}

impl ValueObject for AbcGrade {}
impl ValueObject for XyzGrade {}

impl AbcGrade {
    pub const ALL: [AbcGrade; 3] = [AbcGrade::A, AbcGrade::B, AbcGrade::C];

    pub fn as_str(&self) -> &'static str {
        match self {
            AbcGrade::A => "A",
            AbcGrade::B => "B",
            AbcGrade::C => "C",
        }
    }
}

impl XyzGrade {
    pub const ALL: [XyzGrade; 3] = [XyzGrade::X, XyzGrade::Y, XyzGrade::Z];

    pub fn as_str(&self) -> &'static str {
        match self {
            XyzGrade::X => "X",
            XyzGrade::Y => "Y",
            XyzGrade::Z => "Z",
        }
    }
}

impl fmt::Display for AbcGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for XyzGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AbcGrade {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(AbcGrade::A),
            "B" => Ok(AbcGrade::B),
            "C" => Ok(AbcGrade::C),
            other => Err(DomainError::validation(format!("unknown ABC grade: {other}"))),
        }
    }
}

impl FromStr for XyzGrade {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "X" => Ok(XyzGrade::X),
            "Y" => Ok(XyzGrade::Y),
            "Z" => Ok(XyzGrade::Z),
            other => Err(DomainError::validation(format!("unknown XYZ grade: {other}"))),
        }
    }
}

/// ABC × XYZ cross grade (e.g. `AX`, `CZ`).
///
/// Serialized as its two-letter code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CombinedGrade {
    pub abc: AbcGrade,
    pub xyz: XyzGrade,
}

impl ValueObject for CombinedGrade {}

impl CombinedGrade {
    pub fn new(abc: AbcGrade, xyz: XyzGrade) -> Self {
        Self { abc, xyz }
    }

    pub fn code(&self) -> String {
        format!("{}{}", self.abc, self.xyz)
    }
}

impl fmt::Display for CombinedGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.abc, self.xyz)
    }
}

impl FromStr for CombinedGrade {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 2 || !s.is_ascii() {
            return Err(DomainError::validation(format!("invalid combined grade: {s}")));
        }
        let (abc, xyz) = s.split_at(1);
        Ok(Self::new(abc.parse()?, xyz.parse()?))
    }
}

impl From<CombinedGrade> for String {
    fn from(value: CombinedGrade) -> Self {
        value.code()
    }
}

impl TryFrom<String> for CombinedGrade {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_grade_code_and_parse() {
        let g = CombinedGrade::new(AbcGrade::B, XyzGrade::Z);
        assert_eq!(g.code(), "BZ");
        assert_eq!("bz".parse::<CombinedGrade>().unwrap(), g);
        assert!("B".parse::<CombinedGrade>().is_err());
        assert!("QZ".parse::<CombinedGrade>().is_err());
    }

    #[test]
    fn combined_grade_serializes_as_code() {
        let g = CombinedGrade::new(AbcGrade::A, XyzGrade::X);
        let json = serde_json::to_string(&g).unwrap();
        assert_eq!(json, "\"AX\"");
        let back: CombinedGrade = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
    }
}
