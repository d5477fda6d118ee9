//! Typed block parameters.
//!
//! Each block kind exposes a closed set of numeric parameters with fixed
//! ranges. Names are parsed into [`ParamName`]; a name the block does not
//! have is rejected, never stored.

use blockscape_core::ParamError;
use serde::{Deserialize, Serialize};

/// Every parameter name known to any block kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamName {
    RoomSize,
    Dampening,
    Mix,
}

impl ParamName {
    /// Parses a parameter key. Case, `_` and `-` are ignored, so `roomSize`,
    /// `room_size` and `room-size` are the same key.
    pub fn from_key(key: &str) -> Option<ParamName> {
        let normalized: String = key
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "roomsize" => Some(ParamName::RoomSize),
            "dampening" => Some(ParamName::Dampening),
            "mix" => Some(ParamName::Mix),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamName::RoomSize => "roomSize",
            ParamName::Dampening => "dampening",
            ParamName::Mix => "mix",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ParamName::RoomSize => "Room Size",
            ParamName::Dampening => "Dampening",
            ParamName::Mix => "Mix",
        }
    }
}

impl std::fmt::Display for ParamName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive value range of a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
}

impl ParamRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Rejects values outside the range, NaN included.
    pub fn check(&self, name: ParamName, value: f64) -> Result<(), ParamError> {
        if value >= self.min && value <= self.max {
            Ok(())
        } else {
            Err(ParamError::OutOfRange {
                param: name.to_string(),
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// A parameter's current value and range, as shown in an options form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamSpec {
    pub name: ParamName,
    pub label: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

const ROOM_SIZE: ParamRange = ParamRange::new(0.1, 0.95);
const DAMPENING: ParamRange = ParamRange::new(0.1, 1.0);
const MIX: ParamRange = ParamRange::new(0.0, 1.0);

/// Parameters of an effect block, one variant per effect kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EffectParams {
    #[serde(rename_all = "camelCase")]
    Reverb {
        dampening: f64,
        room_size: f64,
        mix: f64,
    },
}

impl EffectParams {
    /// Reverb with its default settings.
    pub fn reverb() -> Self {
        EffectParams::Reverb {
            dampening: 0.7,
            room_size: 0.5,
            mix: 0.5,
        }
    }

    /// Display name of the effect kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            EffectParams::Reverb { .. } => "Reverb",
        }
    }

    pub fn get(&self, name: ParamName) -> Result<f64, ParamError> {
        match (self, name) {
            (EffectParams::Reverb { room_size, .. }, ParamName::RoomSize) => Ok(*room_size),
            (EffectParams::Reverb { dampening, .. }, ParamName::Dampening) => Ok(*dampening),
            (EffectParams::Reverb { mix, .. }, ParamName::Mix) => Ok(*mix),
        }
    }

    /// Validates and stores a value. The stored value is unchanged on error.
    pub fn set(&mut self, name: ParamName, value: f64) -> Result<(), ParamError> {
        let range = self.range(name)?;
        range.check(name, value)?;
        match (self, name) {
            (EffectParams::Reverb { room_size, .. }, ParamName::RoomSize) => *room_size = value,
            (EffectParams::Reverb { dampening, .. }, ParamName::Dampening) => *dampening = value,
            (EffectParams::Reverb { mix, .. }, ParamName::Mix) => *mix = value,
        }
        Ok(())
    }

    pub fn range(&self, name: ParamName) -> Result<ParamRange, ParamError> {
        match (self, name) {
            (EffectParams::Reverb { .. }, ParamName::RoomSize) => Ok(ROOM_SIZE),
            (EffectParams::Reverb { .. }, ParamName::Dampening) => Ok(DAMPENING),
            (EffectParams::Reverb { .. }, ParamName::Mix) => Ok(MIX),
        }
    }

    /// Parameter names in form order.
    pub fn names(&self) -> &'static [ParamName] {
        match self {
            EffectParams::Reverb { .. } => &[ParamName::RoomSize, ParamName::Dampening, ParamName::Mix],
        }
    }

    pub fn specs(&self) -> Vec<ParamSpec> {
        self.names()
            .iter()
            .filter_map(|&name| {
                let value = self.get(name).ok()?;
                let range = self.range(name).ok()?;
                Some(ParamSpec {
                    name,
                    label: name.label(),
                    value,
                    min: range.min,
                    max: range.max,
                })
            })
            .collect()
    }
}
