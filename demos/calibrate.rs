//! Calibrates a BNO055 on `/dev/i2c-1` and keeps the offsets in `offsets.json`.
//!
//! Stored offsets are restored on start, so a calibrated board comes up
//! calibrated. Run with `--features std,serde`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use bno055_fusion::{Bno055, OperatingMode, SensorOffsets, SessionConfig};
use embedded_hal::i2c::I2c as _;
use embedded_hal_async::{
    delay::DelayNs,
    i2c::{ErrorType, I2c, Operation, SevenBitAddress},
};
use futures::executor::block_on;
use linux_embedded_hal::I2cdev;

const OFFSETS_FILE: &str = "offsets.json";

/// Runs the blocking Linux bus behind the async trait.
struct BlockingI2c(I2cdev);

impl ErrorType for BlockingI2c {
    type Error = <I2cdev as embedded_hal::i2c::ErrorType>::Error;
}

impl I2c for BlockingI2c {
    async fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.0.transaction(address, operations)
    }
}

struct SleepDelay;

impl DelayNs for SleepDelay {
    async fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(ns as u64));
    }
}

fn load_offsets(path: &Path) -> Option<SensorOffsets> {
    let json = fs::read_to_string(path).ok()?;

    match serde_json::from_str(&json) {
        Ok(offsets) => Some(offsets),
        Err(e) => {
            eprintln!("Ignoring {}: {}", path.display(), e);
            None
        }
    }
}

fn main() {
    let dev = I2cdev::new("/dev/i2c-1").expect("Failed to open /dev/i2c-1");
    let mut delay = SleepDelay;

    block_on(async {
        let config = SessionConfig::default().with_mode(OperatingMode::FullFusion);
        let mut imu = Bno055::begin(BlockingI2c(dev), config, &mut delay)
            .await
            .expect("BNO055 bring-up failed");

        let versions = imu.versions().await.expect("Failed to read versions");
        println!("BNO055 firmware {}", versions.software);

        let path = Path::new(OFFSETS_FILE);
        if let Some(offsets) = load_offsets(path) {
            imu.set_sensor_offsets(&offsets, &mut delay)
                .await
                .expect("Failed to restore offsets");
            println!("Restored offsets from {}", path.display());
        }

        // Move the board as described in section 3.11 of the datasheet until
        // every sensor reports level 3.
        println!("- Waiting for calibration...");
        while !imu.is_fully_calibrated().await.expect("Bus error") {
            let status = imu.calibration_status().await.expect("Bus error");
            println!("Calibration status: {:?}", status);
            delay.delay_ms(1000).await;
        }

        if let Some(offsets) = imu
            .sensor_offsets(&mut delay)
            .await
            .expect("Failed to read offsets")
        {
            let json = serde_json::to_string_pretty(&offsets).expect("Serialization failed");
            fs::write(path, json).expect("Failed to store offsets");
            println!("       - Calibration complete, offsets stored in {}", path.display());
        }

        loop {
            // Quaternion; due to a bug in the BNO055, this is recommended over Euler Angles
            match imu.quaternion().await {
                Ok(q) => println!("IMU Quaternion: {:?}", mint::Quaternion::from(q)),
                Err(e) => eprintln!("{:?}", e),
            }

            match imu.euler_angles().await {
                Ok(e) => println!("IMU angles: {:?}", e),
                Err(e) => eprintln!("{:?}", e),
            }

            match imu.temperature().await {
                Ok(t) => println!("Temperature: {}", t),
                Err(e) => eprintln!("{:?}", e),
            }

            delay.delay_ms(500).await;
        }
    });
}
