#![no_main]
use libfuzzer_sys::fuzz_target;

use bno055_fusion::{Bno055, SessionConfig};
use bno055_fusion_fuzz::{AsyncI2c, Delay};
use embedded_hal::i2c::SevenBitAddress;
use embedded_hal_fuzz::i2c::ArbitraryI2c;
use futures::executor::block_on;

fuzz_target!(|i2c: ArbitraryI2c<SevenBitAddress>| {
    let mut delay = Delay {};

    // Discard the result as we only care about it it crashes not if there
    // is an error.
    let _ = block_on(Bno055::begin(
        AsyncI2c(i2c),
        SessionConfig::default(),
        &mut delay,
    ));
});
