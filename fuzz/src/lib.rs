//! Async adapters for the blocking fuzzing bus.

use embedded_hal::i2c::I2c as _;
use embedded_hal_async::{
    delay::DelayNs,
    i2c::{ErrorType, I2c, Operation, SevenBitAddress},
};

/// Drives a blocking bus through the async `I2c` trait.
pub struct AsyncI2c<T>(pub T);

impl<T: embedded_hal::i2c::I2c> ErrorType for AsyncI2c<T> {
    type Error = T::Error;
}

impl<T: embedded_hal::i2c::I2c> I2c for AsyncI2c<T> {
    async fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.0.transaction(address, operations)
    }
}

pub struct Delay {}

impl DelayNs for Delay {
    async fn delay_ns(&mut self, _ns: u32) {
        // no-op, go as fast as possible for fuzzing
    }
}
