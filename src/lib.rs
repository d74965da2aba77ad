#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![allow(clippy::bad_bit_mask)]

//! Async driver for the Bosch Sensortec BNO055 9-axis absolute orientation sensor.
//! Datasheet: https://ae-bst.resource.bosch.com/media/_tech/media/datasheets/BST-BNO055-DS000.pdf
//!
//! A [`Bno055`] session is obtained from [`Bno055::begin`], which brings the chip from an
//! unknown state into the requested operating mode. The session remembers the operating mode
//! and the unit selection, temporarily switches to `CONFIG_MODE` whenever a configuration
//! register is written, and restores the previous mode afterwards.
//!
//! Calibration offsets can be read with [`Bno055::sensor_offsets`] once the chip reports full
//! calibration and written back on the next boot with [`Bno055::set_sensor_offsets`].
//! With the `serde` feature [`SensorOffsets`] can be persisted in any serde format.
pub use mint;

mod axis;
mod bus;
mod calibration;
mod decode;
mod mode;
mod regs;
mod session;
#[cfg(feature = "std")]
mod std;
mod units;

pub use axis::{Axis, AxisRemap, AxisRemapBuilder, AxisSign};
pub use calibration::{CalibrationStatus, SensorOffsets, FULLY_CALIBRATED, SENSOR_OFFSETS_SIZE};
pub use decode::{
    EulerAngles, Quaternion, SelfTestStatus, SoftwareRevision, SystemError, SystemStatus,
    Versions,
};
pub use mode::{OperatingMode, PowerMode, Sensors};
pub use regs::BNO055_ID;
pub use session::{Bno055, DeviceAddress, SessionConfig};
pub use units::{
    AccelUnit, AngleUnit, GyroUnit, OrientationConvention, SensorUnits, TemperatureUnit,
};

/// All possible errors in this crate
#[derive(Debug)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Error<E> {
    /// I2C bus error
    I2c(E),

    /// Invalid chip ID was read
    InvalidChipId(u8),

    /// Invalid (not applicable) device mode.
    InvalidMode,

    /// A register held a value that does not decode to any known setting.
    InvalidRegisterValue { reg: u8, value: u8 },
}
