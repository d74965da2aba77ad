#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const ACC_UNIT_BIT: u8 = 0b0000_0001;
const GYR_UNIT_BIT: u8 = 0b0000_0010;
const EUL_UNIT_BIT: u8 = 0b0000_0100;
const TEMP_UNIT_BIT: u8 = 0b0001_0000;
const ORI_ANDROID_BIT: u8 = 0b1000_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum AccelUnit {
    #[default]
    MetersPerSecondSquared,
    MilliG,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum GyroUnit {
    #[default]
    DegreesPerSecond,
    RadiansPerSecond,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

/// Pitch sign convention of the Euler output, see table 3-11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum OrientationConvention {
    #[default]
    Windows,
    Android,
}

/// Contents of the `UNIT_SEL` register.
///
/// The default value matches the chip's reset state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct SensorUnits {
    pub accel: AccelUnit,
    pub gyro: GyroUnit,
    pub euler: AngleUnit,
    pub temperature: TemperatureUnit,
    pub orientation: OrientationConvention,
}

impl SensorUnits {
    pub fn from_bits(bits: u8) -> Self {
        SensorUnits {
            accel: if bits & ACC_UNIT_BIT != 0 {
                AccelUnit::MilliG
            } else {
                AccelUnit::MetersPerSecondSquared
            },
            gyro: if bits & GYR_UNIT_BIT != 0 {
                GyroUnit::RadiansPerSecond
            } else {
                GyroUnit::DegreesPerSecond
            },
            euler: if bits & EUL_UNIT_BIT != 0 {
                AngleUnit::Radians
            } else {
                AngleUnit::Degrees
            },
            temperature: if bits & TEMP_UNIT_BIT != 0 {
                TemperatureUnit::Fahrenheit
            } else {
                TemperatureUnit::Celsius
            },
            orientation: if bits & ORI_ANDROID_BIT != 0 {
                OrientationConvention::Android
            } else {
                OrientationConvention::Windows
            },
        }
    }

    pub fn bits(&self) -> u8 {
        let mut bits = 0;
        if self.accel == AccelUnit::MilliG {
            bits |= ACC_UNIT_BIT;
        }
        if self.gyro == GyroUnit::RadiansPerSecond {
            bits |= GYR_UNIT_BIT;
        }
        if self.euler == AngleUnit::Radians {
            bits |= EUL_UNIT_BIT;
        }
        if self.temperature == TemperatureUnit::Fahrenheit {
            bits |= TEMP_UNIT_BIT;
        }
        if self.orientation == OrientationConvention::Android {
            bits |= ORI_ANDROID_BIT;
        }
        bits
    }
}

impl AccelUnit {
    /// Value of one LSB in this unit.
    pub fn scale(self) -> f32 {
        match self {
            AccelUnit::MetersPerSecondSquared => 1.0 / 100.0, // 1 m/s^2 = 100 lsb
            AccelUnit::MilliG => 1.0,
        }
    }
}

impl GyroUnit {
    pub fn scale(self) -> f32 {
        match self {
            GyroUnit::DegreesPerSecond => 1.0 / 16.0,
            GyroUnit::RadiansPerSecond => 1.0 / 900.0,
        }
    }
}

impl AngleUnit {
    pub fn scale(self) -> f32 {
        match self {
            AngleUnit::Degrees => 1.0 / 16.0,
            AngleUnit::Radians => 1.0 / 900.0,
        }
    }
}

impl TemperatureUnit {
    pub fn scale(self) -> f32 {
        match self {
            TemperatureUnit::Celsius => 1.0,
            TemperatureUnit::Fahrenheit => 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_value_is_default() {
        assert_eq!(SensorUnits::from_bits(0x00), SensorUnits::default());
        assert_eq!(SensorUnits::default().bits(), 0x00);
    }

    #[test]
    fn decodes_each_bit() {
        let units = SensorUnits::from_bits(0b1001_0111);

        assert_eq!(units.accel, AccelUnit::MilliG);
        assert_eq!(units.gyro, GyroUnit::RadiansPerSecond);
        assert_eq!(units.euler, AngleUnit::Radians);
        assert_eq!(units.temperature, TemperatureUnit::Fahrenheit);
        assert_eq!(units.orientation, OrientationConvention::Android);
        assert_eq!(units.bits(), 0b1001_0111);
    }

    #[test]
    fn reserved_bits_are_ignored() {
        let units = SensorUnits::from_bits(0b0110_1000);
        assert_eq!(units, SensorUnits::default());
    }
}
