use crate::Error;
use std::{error, fmt};

impl<E: core::fmt::Debug> error::Error for Error<E> {}

impl<E: core::fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::I2c(e) => write!(f, "I2C bus error: {:?}", e),
            Error::InvalidChipId(id) => write!(
                f,
                "BNO055 not found: chip ID {:#04x}, expected {:#04x}",
                id,
                crate::BNO055_ID
            ),
            Error::InvalidMode => write!(f, "operation not applicable in the current mode"),
            Error::InvalidRegisterValue { reg, value } => {
                write!(f, "register {:#04x} holds unknown value {:#04x}", reg, value)
            }
        }
    }
}
