use embedded_hal_async::{
    delay::DelayNs,
    i2c::{I2c, SevenBitAddress},
};
use log::debug;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(not(feature = "defmt-03"))]
use bitflags::bitflags;
#[cfg(feature = "defmt-03")]
use defmt::bitflags;

use crate::{bus::RegisterBus, regs, Error};

/// BNO055 operation modes, see datasheet section 3.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[repr(u8)]
pub enum OperatingMode {
    Config = 0x00,
    AccelOnly = 0x01,
    MagOnly = 0x02,
    GyroOnly = 0x03,
    AccelMag = 0x04,
    AccelGyro = 0x05,
    MagGyro = 0x06,
    AccelMagGyro = 0x07,
    Imu = 0x08,
    Compass = 0x09,
    ImuMagForGyro = 0x0A,
    FullFusionNoFastMagCal = 0x0B,
    FullFusion = 0x0C,
}

bitflags! {
    /// A set of calibration subsystems.
    #[cfg_attr(not(feature = "defmt-03"), derive(Debug, Clone, Copy, PartialEq, Eq))]
    pub struct Sensors: u8 {
        const MAG = 0b0001;
        const ACCEL = 0b0010;
        const GYRO = 0b0100;
        const SYS = 0b1000;
    }
}

const ALL_SENSORS: Sensors = Sensors::from_bits_truncate(0b1111);
const ACCEL_MAG: Sensors = Sensors::from_bits_truncate(0b0011);
const ACCEL_GYRO: Sensors = Sensors::from_bits_truncate(0b0110);
const MAG_GYRO: Sensors = Sensors::from_bits_truncate(0b0101);

/// Subsystems that must report level 3 before a mode counts as fully calibrated.
/// Indexed by the mode's register value.
const REQUIRED_SENSORS: [(OperatingMode, Sensors); 13] = [
    (OperatingMode::Config, ALL_SENSORS),
    (OperatingMode::AccelOnly, Sensors::ACCEL),
    (OperatingMode::MagOnly, Sensors::MAG),
    (OperatingMode::GyroOnly, Sensors::GYRO),
    (OperatingMode::AccelMag, ACCEL_MAG),
    (OperatingMode::AccelGyro, ACCEL_GYRO),
    (OperatingMode::MagGyro, MAG_GYRO),
    (OperatingMode::AccelMagGyro, ALL_SENSORS),
    (OperatingMode::Imu, ACCEL_GYRO),
    (OperatingMode::Compass, ACCEL_MAG),
    (OperatingMode::ImuMagForGyro, Sensors::GYRO),
    (OperatingMode::FullFusionNoFastMagCal, ALL_SENSORS),
    (OperatingMode::FullFusion, ALL_SENSORS),
];

impl OperatingMode {
    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn from_bits(bits: u8) -> Option<Self> {
        Self::from_u8(bits)
    }

    /// Calibration subsystems this mode waits on in `is_fully_calibrated`.
    pub fn required_sensors(self) -> Sensors {
        REQUIRED_SENSORS[self as usize].1
    }

    pub fn is_fusion_enabled(self) -> bool {
        matches!(
            self,
            Self::Imu
                | Self::Compass
                | Self::ImuMagForGyro
                | Self::FullFusionNoFastMagCal
                | Self::FullFusion,
        )
    }

    pub fn is_accel_enabled(self) -> bool {
        matches!(
            self,
            Self::AccelOnly
                | Self::AccelMag
                | Self::AccelGyro
                | Self::AccelMagGyro
                | Self::Imu
                | Self::Compass
                | Self::ImuMagForGyro
                | Self::FullFusionNoFastMagCal
                | Self::FullFusion,
        )
    }

    pub fn is_gyro_enabled(self) -> bool {
        matches!(
            self,
            Self::GyroOnly
                | Self::AccelGyro
                | Self::MagGyro
                | Self::AccelMagGyro
                | Self::Imu
                | Self::FullFusionNoFastMagCal
                | Self::FullFusion,
        )
    }

    pub fn is_mag_enabled(self) -> bool {
        matches!(
            self,
            Self::MagOnly
                | Self::AccelMag
                | Self::MagGyro
                | Self::AccelMagGyro
                | Self::Compass
                | Self::ImuMagForGyro
                | Self::FullFusionNoFastMagCal
                | Self::FullFusion,
        )
    }

    /// Wait required by the chip after writing this mode to `OPR_MODE`.
    pub fn settle_time_ms(self) -> u32 {
        if self == Self::Config {
            regs::CONFIG_MODE_SWITCH_MS
        } else {
            regs::OPERATING_MODE_SWITCH_MS
        }
    }
}

/// BNO055 power modes, see section 3.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[repr(u8)]
pub enum PowerMode {
    Normal = 0b00,
    LowPower = 0b01,
    Suspend = 0b10,
}

/// Tracks the operating mode the device was last put into.
#[derive(Debug)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub(crate) struct ModeManager {
    current: OperatingMode,
}

impl Default for ModeManager {
    fn default() -> Self {
        // Power-on and post-reset mode.
        ModeManager {
            current: OperatingMode::Config,
        }
    }
}

impl ModeManager {
    /// Mode as remembered by the driver, without touching the bus.
    pub fn current(&self) -> OperatingMode {
        self.current
    }

    /// Writes `OPR_MODE` once and waits for the switch to take effect.
    /// The remembered mode only changes after the wait.
    pub(crate) async fn set_mode<I, E, D>(
        &mut self,
        bus: &mut RegisterBus<I>,
        mode: OperatingMode,
        delay: &mut D,
    ) -> Result<(), Error<E>>
    where
        I: I2c<SevenBitAddress, Error = E>,
        D: DelayNs,
    {
        debug!("BNO055 mode {:?} -> {:?}", self.current, mode);

        bus.write_u8(regs::BNO055_OPR_MODE, mode.bits())
            .await
            .map_err(Error::I2c)?;

        delay.delay_ms(mode.settle_time_ms()).await;
        self.current = mode;

        Ok(())
    }

    /// Reads `OPR_MODE` and resynchronizes the remembered mode with it.
    pub(crate) async fn get_mode<I, E>(
        &mut self,
        bus: &mut RegisterBus<I>,
    ) -> Result<OperatingMode, Error<E>>
    where
        I: I2c<SevenBitAddress, Error = E>,
    {
        let value = bus
            .read_u8(regs::BNO055_OPR_MODE)
            .await
            .map_err(Error::I2c)?;

        let mode = OperatingMode::from_bits(value & 0x0F).ok_or(Error::InvalidRegisterValue {
            reg: regs::BNO055_OPR_MODE,
            value,
        })?;
        self.current = mode;

        Ok(mode)
    }

    /// Fails unless the device is in CONFIG_MODE.
    pub(crate) fn require_config<E>(&self) -> Result<(), Error<E>> {
        if self.current == OperatingMode::Config {
            Ok(())
        } else {
            Err(Error::InvalidMode)
        }
    }
}
