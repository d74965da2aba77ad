use byteorder::{ByteOrder, LittleEndian};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::mode::{OperatingMode, Sensors};

/// Level reported by a fully calibrated subsystem.
pub const FULLY_CALIBRATED: u8 = 3;

/// Size of the offset block `ACC_OFFSET_X_LSB..=MAG_RADIUS_MSB`.
pub const SENSOR_OFFSETS_SIZE: usize = 22;

/// Per-subsystem calibration levels from `CALIB_STAT`, each 0..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct CalibrationStatus {
    pub sys: u8,
    pub gyro: u8,
    pub accel: u8,
    pub mag: u8,
}

impl CalibrationStatus {
    pub fn from_bits(status: u8) -> Self {
        CalibrationStatus {
            sys: (status >> 6) & 0b11,
            gyro: (status >> 4) & 0b11,
            accel: (status >> 2) & 0b11,
            mag: status & 0b11,
        }
    }

    /// Subsystems currently at `FULLY_CALIBRATED`.
    pub fn calibrated(&self) -> Sensors {
        let mut sensors = Sensors::empty();
        if self.sys == FULLY_CALIBRATED {
            sensors |= Sensors::SYS;
        }
        if self.gyro == FULLY_CALIBRATED {
            sensors |= Sensors::GYRO;
        }
        if self.accel == FULLY_CALIBRATED {
            sensors |= Sensors::ACCEL;
        }
        if self.mag == FULLY_CALIBRATED {
            sensors |= Sensors::MAG;
        }
        sensors
    }

    /// Whether every subsystem `mode` relies on is fully calibrated.
    pub fn is_fully_calibrated_for(&self, mode: OperatingMode) -> bool {
        self.calibrated().contains(mode.required_sensors())
    }
}

/// Calibration offsets and radii as stored by the chip.
///
/// Only meaningful once the device reports full calibration for the mode in use.
/// Field names serialize as `accelX`, ..., `magRadius`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct SensorOffsets {
    pub accel_x: i16,
    pub accel_y: i16,
    pub accel_z: i16,
    pub mag_x: i16,
    pub mag_y: i16,
    pub mag_z: i16,
    pub gyro_x: i16,
    pub gyro_y: i16,
    pub gyro_z: i16,
    pub accel_radius: i16,
    pub mag_radius: i16,
}

impl SensorOffsets {
    /// Values in register order, starting at `ACC_OFFSET_X_LSB`.
    pub fn words(&self) -> [i16; 11] {
        [
            self.accel_x,
            self.accel_y,
            self.accel_z,
            self.mag_x,
            self.mag_y,
            self.mag_z,
            self.gyro_x,
            self.gyro_y,
            self.gyro_z,
            self.accel_radius,
            self.mag_radius,
        ]
    }

    pub fn from_registers(buf: &[u8; SENSOR_OFFSETS_SIZE]) -> Self {
        let word = |i: usize| LittleEndian::read_i16(&buf[i * 2..i * 2 + 2]);

        SensorOffsets {
            accel_x: word(0),
            accel_y: word(1),
            accel_z: word(2),
            mag_x: word(3),
            mag_y: word(4),
            mag_z: word(5),
            gyro_x: word(6),
            gyro_y: word(7),
            gyro_z: word(8),
            accel_radius: word(9),
            mag_radius: word(10),
        }
    }

    pub fn to_registers(&self) -> [u8; SENSOR_OFFSETS_SIZE] {
        let mut buf = [0u8; SENSOR_OFFSETS_SIZE];
        for (chunk, word) in buf.chunks_exact_mut(2).zip(self.words()) {
            LittleEndian::write_i16(chunk, word);
        }
        buf
    }
}
