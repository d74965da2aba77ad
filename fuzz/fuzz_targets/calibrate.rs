#![no_main]
use libfuzzer_sys::fuzz_target;

use bno055_fusion::{Bno055, OperatingMode, SessionConfig};
use bno055_fusion_fuzz::{AsyncI2c, Delay};
use embedded_hal::i2c::SevenBitAddress;
use embedded_hal_fuzz::i2c::ArbitraryI2c;
use futures::executor::block_on;

fuzz_target!(|i2c: ArbitraryI2c<SevenBitAddress>| {
    let mut delay = Delay {};

    block_on(async {
        let config = SessionConfig::default()
            .with_alternative_address()
            .with_mode(OperatingMode::FullFusion);
        let Ok(mut imu) = Bno055::begin(AsyncI2c(i2c), config, &mut delay).await else {
            return;
        };

        let _ = imu.get_mode().await;
        let _ = imu.calibration_status().await;

        if let Ok(Some(offsets)) = imu.sensor_offsets(&mut delay).await {
            let _ = imu.set_sensor_offsets(&offsets, &mut delay).await;
        }

        let _ = imu.refresh_units().await;
        let _ = imu.quaternion().await;
        let _ = imu.euler_angles().await;
        let _ = imu.temperature().await;
        let _ = imu.axis_remap().await;
        let _ = imu.versions().await;
    });
});
