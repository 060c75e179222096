use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dmx::FixtureChannels;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn is_black(&self) -> bool {
        *self == Rgb::BLACK
    }
}

/// How a fixture's channels turn into a display color.
///
/// Both interpretations have been seen in the wild, so neither is picked
/// silently; the active one is part of the startup configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// `[brightness, R, G, B, saturation]`, each color component scaled by
    /// `brightness / 255`
    #[default]
    BrightnessScaled,
    /// `[unused, R, G, B, saturation]`, color used as-is
    Raw,
}

/// Which slots hold green and blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelOrder {
    /// Slots 1, 2, 3 are R, G, B
    #[default]
    Rgb,
    /// Slots 1, 2, 3 are R, B, G
    Rbg,
}

/// Color information pulled out of one fixture's channel slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedColor {
    pub color: Rgb,
    /// Present only when the color mode applies brightness
    pub brightness: Option<u8>,
    /// Read but not applied to the color
    pub saturation: u8,
}

/// `min(value * brightness / 255, 255)`, truncating.
pub fn scale_component(value: u8, brightness: u8) -> u8 {
    ((value as u32 * brightness as u32) / 255).min(255) as u8
}

pub fn derive_color(channels: &FixtureChannels, mode: ColorMode, order: ChannelOrder) -> DerivedColor {
    let slots = channels.slots;
    let (r, g, b) = match order {
        ChannelOrder::Rgb => (slots[1], slots[2], slots[3]),
        ChannelOrder::Rbg => (slots[1], slots[3], slots[2]),
    };

    match mode {
        ColorMode::BrightnessScaled => {
            let brightness = channels.brightness();
            DerivedColor {
                color: Rgb::new(
                    scale_component(r, brightness),
                    scale_component(g, brightness),
                    scale_component(b, brightness),
                ),
                brightness: Some(brightness),
                saturation: channels.saturation(),
            }
        }
        ColorMode::Raw => DerivedColor {
            color: Rgb::new(r, g, b),
            brightness: None,
            saturation: channels.saturation(),
        },
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "brightness-scaled" | "scaled" => Ok(ColorMode::BrightnessScaled),
            "raw" => Ok(ColorMode::Raw),
            other => Err(format!(
                "Unknown color mode '{}', expected 'brightness-scaled' or 'raw'",
                other
            )),
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorMode::BrightnessScaled => write!(f, "brightness-scaled"),
            ColorMode::Raw => write!(f, "raw"),
        }
    }
}

impl FromStr for ChannelOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rgb" => Ok(ChannelOrder::Rgb),
            "rbg" => Ok(ChannelOrder::Rbg),
            other => Err(format!(
                "Unknown channel order '{}', expected 'rgb' or 'rbg'",
                other
            )),
        }
    }
}

impl fmt::Display for ChannelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelOrder::Rgb => write!(f, "rgb"),
            ChannelOrder::Rbg => write!(f, "rbg"),
        }
    }
}
