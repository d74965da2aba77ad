//! Conversion of raw register contents into physical readings.
//!
//! Everything here works on bytes that were already fetched from the device.

use core::fmt;

use byteorder::{ByteOrder, LittleEndian};
use num_derive::FromPrimitive;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(not(feature = "defmt-03"))]
use bitflags::bitflags;
#[cfg(feature = "defmt-03")]
use defmt::bitflags;

use crate::units::{AngleUnit, TemperatureUnit};

/// Unit quaternion, Q14 fixed point on the chip.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Quaternion {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Quaternion {
    /// Decodes `QUA_DATA_W_LSB..=QUA_DATA_Z_MSB`.
    pub fn from_registers(buf: &[u8; 8]) -> Self {
        let scale = 1.0 / ((1 << 14) as f32);

        Quaternion {
            w: LittleEndian::read_i16(&buf[0..2]) as f32 * scale,
            x: LittleEndian::read_i16(&buf[2..4]) as f32 * scale,
            y: LittleEndian::read_i16(&buf[4..6]) as f32 * scale,
            z: LittleEndian::read_i16(&buf[6..8]) as f32 * scale,
        }
    }
}

impl From<Quaternion> for mint::Quaternion<f32> {
    fn from(q: Quaternion) -> Self {
        mint::Quaternion {
            v: mint::Vector3 {
                x: q.x,
                y: q.y,
                z: q.z,
            },
            s: q.w,
        }
    }
}

/// Fused orientation as heading, roll and pitch in the session's angle unit.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct EulerAngles {
    pub heading: f32,
    pub roll: f32,
    pub pitch: f32,
}

impl EulerAngles {
    /// Decodes `EUL_HEADING_LSB..=EUL_PITCH_MSB`.
    pub fn from_registers(buf: &[u8; 6], unit: AngleUnit) -> Self {
        let scale = unit.scale();

        EulerAngles {
            heading: LittleEndian::read_i16(&buf[0..2]) as f32 * scale,
            roll: LittleEndian::read_i16(&buf[2..4]) as f32 * scale,
            pitch: LittleEndian::read_i16(&buf[4..6]) as f32 * scale,
        }
    }
}

impl From<EulerAngles> for mint::EulerAngles<f32, ()> {
    fn from(e: EulerAngles) -> Self {
        mint::EulerAngles::from([e.roll, e.pitch, e.heading])
    }
}

/// Chip temperature from the signed `TEMP` register.
pub fn temperature(raw: u8, unit: TemperatureUnit) -> f32 {
    (raw as i8) as f32 * unit.scale()
}

/// Three consecutive little-endian words scaled by `scale`.
pub fn vector(buf: &[u8; 6], scale: f32) -> mint::Vector3<f32> {
    mint::Vector3::from([
        LittleEndian::read_i16(&buf[0..2]) as f32 * scale,
        LittleEndian::read_i16(&buf[2..4]) as f32 * scale,
        LittleEndian::read_i16(&buf[4..6]) as f32 * scale,
    ])
}

bitflags! {
    /// Power-on self-test result, one pass bit per component.
    #[cfg_attr(not(feature = "defmt-03"), derive(Debug, Clone, Copy, PartialEq, Eq))]
    pub struct SelfTestStatus: u8 {
        const ACC_OK = 0b0001;
        const MAG_OK = 0b0010;
        const GYR_OK = 0b0100;
        const MCU_OK = 0b1000;
    }
}

impl SelfTestStatus {
    pub fn all_passed(&self) -> bool {
        self.contains(Self::ACC_OK | Self::MAG_OK | Self::GYR_OK | Self::MCU_OK)
    }
}

/// `SYS_STATUS` register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[repr(u8)]
pub enum SystemStatus {
    Idle = 0,
    Error = 1,
    InitializingPeripherals = 2,
    Initializing = 3,
    ExecutingSelfTest = 4,
    RunningWithFusion = 5,
    RunningWithoutFusion = 6,
}

/// `SYS_ERR` register, meaningful when `SystemStatus::Error` is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[repr(u8)]
pub enum SystemError {
    None = 0,
    PeripheralInit = 1,
    SystemInit = 2,
    SelfTest = 3,
    RegisterMapValue = 4,
    RegisterMapAddress = 5,
    RegisterMapWrite = 6,
    LowPowerModeNotAvailable = 7,
    AccelPowerModeNotAvailable = 8,
    FusionAlgoConfig = 9,
    SensorConfig = 10,
}

/// Software revision, two BCD-like bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct SoftwareRevision {
    pub lsb: u8,
    pub msb: u8,
}

impl SoftwareRevision {
    pub fn raw(&self) -> u16 {
        u16::from_le_bytes([self.lsb, self.msb])
    }
}

impl fmt::Display for SoftwareRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.msb >> 4,
            self.msb & 0x0F,
            self.lsb >> 4,
            self.lsb & 0x0F
        )
    }
}

/// Chip identifiers and firmware revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Versions {
    pub chip: u8,
    pub accelerometer: u8,
    pub magnetometer: u8,
    pub gyroscope: u8,
    pub software: SoftwareRevision,
    pub bootloader: u8,
}

impl Versions {
    /// Decodes `CHIP_ID..=BL_REV_ID`.
    pub fn from_registers(buf: &[u8; 7]) -> Self {
        Versions {
            chip: buf[0],
            accelerometer: buf[1],
            magnetometer: buf[2],
            gyroscope: buf[3],
            software: SoftwareRevision {
                lsb: buf[4],
                msb: buf[5],
            },
            bootloader: buf[6],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn identity_quaternion() {
        let q = Quaternion::from_registers(&[0x00, 0x40, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            q,
            Quaternion {
                w: 1.0,
                x: 0.0,
                y: 0.0,
                z: 0.0
            }
        );
    }

    #[test]
    fn negative_quaternion_components() {
        // -0x2000 = 0xE000 -> -0.5
        let q = Quaternion::from_registers(&[0, 0, 0x00, 0xE0, 0, 0, 0x00, 0x20]);
        assert!(close(q.x, -0.5));
        assert!(close(q.z, 0.5));

        let m: mint::Quaternion<f32> = q.into();
        assert!(close(m.v.x, -0.5));
        assert!(close(m.s, 0.0));
    }

    #[test]
    fn euler_heading_in_degrees_and_radians() {
        let buf = [160, 0, 0, 0, 0, 0];

        let deg = EulerAngles::from_registers(&buf, AngleUnit::Degrees);
        assert!(close(deg.heading, 10.0));

        let rad = EulerAngles::from_registers(&buf, AngleUnit::Radians);
        assert!(close(rad.heading, 160.0 / 900.0));
    }

    #[test]
    fn euler_field_order() {
        // heading 1 deg, roll -2 deg, pitch 3 deg
        let buf = [16, 0, 0xE0, 0xFF, 48, 0];
        let e = EulerAngles::from_registers(&buf, AngleUnit::Degrees);

        assert!(close(e.heading, 1.0));
        assert!(close(e.roll, -2.0));
        assert!(close(e.pitch, 3.0));
    }

    #[test]
    fn signed_temperature() {
        assert!(close(temperature(25, TemperatureUnit::Celsius), 25.0));
        assert!(close(temperature(0xF6, TemperatureUnit::Celsius), -10.0));
        assert!(close(temperature(154, TemperatureUnit::Fahrenheit), -51.0));
        assert!(close(temperature(100, TemperatureUnit::Fahrenheit), 50.0));
    }

    #[test]
    fn self_test_bits() {
        let st = SelfTestStatus::from_bits_truncate(0x0F);
        assert!(st.all_passed());

        let st = SelfTestStatus::from_bits_truncate(0b1011);
        assert!(!st.all_passed());
        assert!(!st.contains(SelfTestStatus::GYR_OK));
        assert!(st.contains(SelfTestStatus::MCU_OK));
    }

    #[test]
    fn versions_layout() {
        let v = Versions::from_registers(&[0xA0, 0xFB, 0x32, 0x0F, 0x11, 0x03, 0x15]);

        assert_eq!(v.chip, 0xA0);
        assert_eq!(v.accelerometer, 0xFB);
        assert_eq!(v.magnetometer, 0x32);
        assert_eq!(v.gyroscope, 0x0F);
        assert_eq!(v.bootloader, 0x15);
        assert_eq!(v.software.raw(), 0x0311);
        assert_eq!(v.software.to_string(), "0.3.1.1");
    }
}
