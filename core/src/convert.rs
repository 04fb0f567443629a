use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConvertError {
    #[error("Unknown unit: '{0}'")]
    UnknownUnit(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Meter,
    Kilometer,
    Centimeter,
    Millimeter,
    Inch,
    Foot,
}

impl LengthUnit {
    pub const ALL: [LengthUnit; 6] = [
        LengthUnit::Meter,
        LengthUnit::Kilometer,
        LengthUnit::Centimeter,
        LengthUnit::Millimeter,
        LengthUnit::Inch,
        LengthUnit::Foot,
    ];

    /// Length of one unit in metres.
    pub fn factor(self) -> f64 {
        match self {
            LengthUnit::Meter => 1.0,
            LengthUnit::Kilometer => 1000.0,
            LengthUnit::Centimeter => 0.01,
            LengthUnit::Millimeter => 0.001,
            LengthUnit::Inch => 0.0254,
            LengthUnit::Foot => 0.3048,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LengthUnit::Meter => "Meter",
            LengthUnit::Kilometer => "Kilometer",
            LengthUnit::Centimeter => "Centimeter",
            LengthUnit::Millimeter => "Millimeter",
            LengthUnit::Inch => "Inch",
            LengthUnit::Foot => "Foot",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LengthUnit {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "meter" | "meters" => Ok(LengthUnit::Meter),
            "km" | "kilometer" | "kilometers" => Ok(LengthUnit::Kilometer),
            "cm" | "centimeter" | "centimeters" => Ok(LengthUnit::Centimeter),
            "mm" | "millimeter" | "millimeters" => Ok(LengthUnit::Millimeter),
            "in" | "inch" | "inches" => Ok(LengthUnit::Inch),
            "ft" | "foot" | "feet" => Ok(LengthUnit::Foot),
            _ => Err(ConvertError::UnknownUnit(s.to_string())),
        }
    }
}

pub fn convert_length(value: f64, from: LengthUnit, to: LengthUnit) -> f64 {
    value * from.factor() / to.factor()
}
