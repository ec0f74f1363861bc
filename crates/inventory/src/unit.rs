use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use restoflow_core::DomainError;

/// Unit an ingredient is stocked and costed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitOfMeasure {
    #[serde(rename = "gr")]
    Gram,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "ml")]
    Milliliter,
    #[serde(rename = "lt")]
    Liter,
    #[serde(rename = "und")]
    Unit,
}

impl UnitOfMeasure {
    pub fn symbol(self) -> &'static str {
        match self {
            UnitOfMeasure::Gram => "gr",
            UnitOfMeasure::Kilogram => "kg",
            UnitOfMeasure::Milliliter => "ml",
            UnitOfMeasure::Liter => "lt",
            UnitOfMeasure::Unit => "und",
        }
    }
}

impl fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for UnitOfMeasure {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gr" | "g" => Ok(UnitOfMeasure::Gram),
            "kg" => Ok(UnitOfMeasure::Kilogram),
            "ml" => Ok(UnitOfMeasure::Milliliter),
            "lt" | "l" => Ok(UnitOfMeasure::Liter),
            "und" | "unit" => Ok(UnitOfMeasure::Unit),
            other => Err(DomainError::invalid(format!("unknown unit of measure '{other}'"))),
        }
    }
}
