use embedded_hal_async::{
    delay::DelayNs,
    i2c::{I2c, SevenBitAddress},
};
use log::{debug, error, warn};
use num_traits::FromPrimitive;

use crate::{
    axis::{AxisRemap, AxisSign},
    bus::RegisterBus,
    calibration::{CalibrationStatus, SensorOffsets, SENSOR_OFFSETS_SIZE},
    decode::{self, EulerAngles, Quaternion, SelfTestStatus, SystemError, SystemStatus, Versions},
    mode::{ModeManager, OperatingMode, PowerMode},
    regs,
    units::SensorUnits,
    Error,
};

/// The two I2C addresses selectable with the COM3 pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum DeviceAddress {
    /// COM3 low, `0x28`.
    #[default]
    A,
    /// COM3 high, `0x29`.
    B,
}

impl DeviceAddress {
    pub fn addr(self) -> SevenBitAddress {
        match self {
            DeviceAddress::A => regs::BNO055_ADDR_A,
            DeviceAddress::B => regs::BNO055_ADDR_B,
        }
    }
}

/// Settings applied by [`Bno055::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct SessionConfig {
    pub address: DeviceAddress,
    pub mode: OperatingMode,
    pub external_crystal: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            address: DeviceAddress::A,
            mode: OperatingMode::FullFusion,
            external_crystal: true,
        }
    }
}

impl SessionConfig {
    /// Uses `DeviceAddress::B`.
    pub fn with_alternative_address(mut self) -> Self {
        self.address = DeviceAddress::B;

        self
    }

    pub fn with_mode(mut self, mode: OperatingMode) -> Self {
        self.mode = mode;

        self
    }

    pub fn with_external_crystal(mut self, ext: bool) -> Self {
        self.external_crystal = ext;

        self
    }
}

/// An initialized BNO055.
///
/// All register access goes through `&mut self`, so operations on one device never
/// interleave. Mode-dependent operations switch to `CONFIG_MODE` and back internally.
pub struct Bno055<I> {
    bus: RegisterBus<I>,
    mode: ModeManager,
    units: SensorUnits,
}

impl<I, E> Bno055<I>
where
    I: I2c<SevenBitAddress, Error = E>,
{
    /// Brings the device up and returns a session in `config.mode`.
    ///
    /// Steps:
    /// - Checks the chip ID
    /// - Enters `CONFIG` mode and resets the system
    /// - Checks the chip ID again
    /// - Selects page 0 and `NORMAL` power mode
    /// - Selects the external or internal oscillator
    /// - Enters `config.mode`
    /// - Reads the unit selection
    ///
    /// Any failure aborts the sequence. Pass `&mut i2c` to keep the bus for a retry.
    ///
    /// # Usage Example
    ///
    /// ```rust
    /// // use your_chip_hal::{I2c, Delay}; // <- import your chip's async I2c and Delay
    /// use bno055_fusion::{Bno055, OperatingMode, SessionConfig};
    /// #
    /// # // All of this is needed for example to work:
    /// # use bno055_fusion::BNO055_ID;
    /// # use embedded_hal_async::delay::DelayNs;
    /// # use embedded_hal_async::i2c::{I2c as I2cTrait, Operation, Error, ErrorType, ErrorKind};
    /// # struct Delay {}
    /// # impl Delay { pub fn new() -> Self { Delay{ } }}
    /// # impl DelayNs for Delay {
    /// #    async fn delay_ns(&mut self, _ns: u32) {
    /// #        // no-op for example purposes
    /// #    }
    /// # }
    /// # struct I2c {}
    /// # impl I2c { pub fn new() -> Self { I2c { } }}
    /// # #[derive(Debug)]
    /// # struct DummyError {}
    /// # impl Error for DummyError { fn kind(&self) -> ErrorKind { ErrorKind::Other } }
    /// # impl ErrorType for I2c { type Error = DummyError; }
    /// # // Every read answers with the chip ID; reading it back as UNIT_SEL is harmless.
    /// # impl I2cTrait for I2c { async fn transaction(&mut self, _address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> { if let Some(Operation::Read(read)) = operations.get_mut(1) { read[0] = BNO055_ID; }; Ok(()) } }
    /// #
    /// # futures::executor::block_on(async {
    /// // Actual example:
    /// let mut delay = Delay::new(/* ... */);
    /// let i2c = I2c::new(/* ... */);
    /// let config = SessionConfig::default().with_mode(OperatingMode::Imu);
    /// let bno055 = Bno055::begin(i2c, config, &mut delay).await?;
    /// assert_eq!(bno055.mode(), OperatingMode::Imu);
    /// # Result::<(), bno055_fusion::Error<DummyError>>::Ok(())
    /// # }).unwrap();
    /// ```
    pub async fn begin<D>(i2c: I, config: SessionConfig, delay: &mut D) -> Result<Self, Error<E>>
    where
        D: DelayNs,
    {
        let mut dev = Bno055 {
            bus: RegisterBus::new(i2c, config.address.addr()),
            mode: ModeManager::default(),
            units: SensorUnits::default(),
        };
        debug!("BNO055 bring-up at {:#04x}", dev.bus.address());

        dev.verify_id().await?;

        dev.mode
            .set_mode(&mut dev.bus, OperatingMode::Config, delay)
            .await?;

        dev.bus
            .write_u8(
                regs::BNO055_SYS_TRIGGER,
                regs::BNO055_SYS_TRIGGER_RST_SYS_BIT,
            )
            .await
            .map_err(Error::I2c)?;
        delay.delay_ms(regs::RESET_BOOT_MS).await;

        dev.verify_id().await?;

        dev.bus
            .write_u8(regs::BNO055_PAGE_ID, 0)
            .await
            .map_err(Error::I2c)?;
        dev.write_config_u8(regs::BNO055_PWR_MODE, PowerMode::Normal as u8)
            .await?;
        dev.write_config_u8(regs::BNO055_SYS_TRIGGER, clock_source(config.external_crystal))
            .await?;

        dev.mode.set_mode(&mut dev.bus, config.mode, delay).await?;
        dev.refresh_units().await?;

        debug!("BNO055 ready in {:?}", config.mode);
        Ok(dev)
    }

    /// Ends the session and gives the bus back.
    pub fn release(self) -> I {
        self.bus.release()
    }

    /// Device address in use.
    pub fn address(&self) -> SevenBitAddress {
        self.bus.address()
    }

    /// Operating mode the driver last put the device into.
    pub fn mode(&self) -> OperatingMode {
        self.mode.current()
    }

    /// Unit selection used to scale every reading.
    pub fn units(&self) -> SensorUnits {
        self.units
    }

    /// Sets the operating mode, see [OperatingMode](enum.OperatingMode.html).
    /// See section 3.3.
    pub async fn set_mode<D>(&mut self, mode: OperatingMode, delay: &mut D) -> Result<(), Error<E>>
    where
        D: DelayNs,
    {
        self.mode.set_mode(&mut self.bus, mode, delay).await
    }

    /// Reads the operating mode from the device.
    pub async fn get_mode(&mut self) -> Result<OperatingMode, Error<E>> {
        self.mode.get_mode(&mut self.bus).await
    }

    /// Returns device's factory-programmed and constant chip ID.
    pub async fn id(&mut self) -> Result<u8, Error<E>> {
        self.bus
            .read_u8(regs::BNO055_CHIP_ID)
            .await
            .map_err(Error::I2c)
    }

    async fn verify_id(&mut self) -> Result<(), Error<E>> {
        let id = self.id().await?;
        if id != regs::BNO055_ID {
            error!(
                "Invalid chip ID. Expected {:#04x}, got {:#04x}",
                regs::BNO055_ID,
                id
            );
            return Err(Error::InvalidChipId(id));
        }

        Ok(())
    }

    /// Switches to `CONFIG_MODE` unless already there and returns the mode to restore.
    async fn enter_config_mode<D>(
        &mut self,
        delay: &mut D,
    ) -> Result<OperatingMode, Error<E>>
    where
        D: DelayNs,
    {
        let saved = self.mode.current();
        if saved != OperatingMode::Config {
            self.mode
                .set_mode(&mut self.bus, OperatingMode::Config, delay)
                .await?;
        }

        Ok(saved)
    }

    /// Puts `saved` back no matter how `result` turned out.
    ///
    /// The error in `result` wins over a failed restore.
    async fn restore_mode<T, D>(
        &mut self,
        saved: OperatingMode,
        result: Result<T, Error<E>>,
        delay: &mut D,
    ) -> Result<T, Error<E>>
    where
        D: DelayNs,
    {
        if saved == OperatingMode::Config {
            return result;
        }

        match self.mode.set_mode(&mut self.bus, saved, delay).await {
            Ok(()) => result,
            Err(_) if result.is_err() => {
                warn!("BNO055 failed to restore {:?} after an error", saved);
                result
            }
            Err(e) => Err(e),
        }
    }

    /// Writes a register that only accepts writes in `CONFIG_MODE`.
    async fn write_config_u8(&mut self, reg: u8, value: u8) -> Result<(), Error<E>> {
        self.mode.require_config()?;

        self.bus.write_u8(reg, value).await.map_err(Error::I2c)
    }

    /// Resets the system and returns to the mode that was active.
    pub async fn reset<D>(&mut self, delay: &mut D) -> Result<(), Error<E>>
    where
        D: DelayNs,
    {
        let saved = self.enter_config_mode(delay).await?;

        let result = match self
            .write_config_u8(
                regs::BNO055_SYS_TRIGGER,
                regs::BNO055_SYS_TRIGGER_RST_SYS_BIT,
            )
            .await
        {
            Ok(()) => {
                delay.delay_ms(regs::RESET_BOOT_MS).await;
                // UNIT_SEL is back at its reset value
                self.refresh_units().await.map(|_| ())
            }
            Err(e) => Err(e),
        };

        self.restore_mode(saved, result, delay).await
    }

    /// Sets the power mode and selects register page 0.
    /// See section 3.2
    pub async fn set_power_mode<D>(&mut self, power: PowerMode, delay: &mut D) -> Result<(), Error<E>>
    where
        D: DelayNs,
    {
        let saved = self.enter_config_mode(delay).await?;

        let mut result = self
            .write_config_u8(regs::BNO055_PWR_MODE, power as u8)
            .await;
        if result.is_ok() {
            result = self.write_config_u8(regs::BNO055_PAGE_ID, 0).await;
        }

        self.restore_mode(saved, result, delay).await
    }

    /// Returns BNO055's power mode.
    pub async fn power_mode(&mut self) -> Result<PowerMode, Error<E>> {
        let value = self
            .bus
            .read_u8(regs::BNO055_PWR_MODE)
            .await
            .map_err(Error::I2c)?;

        PowerMode::from_u8(value & 0b11).ok_or(Error::InvalidRegisterValue {
            reg: regs::BNO055_PWR_MODE,
            value,
        })
    }

    /// Enables/Disables usage of external 32k crystal.
    pub async fn set_external_crystal<D>(&mut self, ext: bool, delay: &mut D) -> Result<(), Error<E>>
    where
        D: DelayNs,
    {
        let saved = self.enter_config_mode(delay).await?;

        let result = self
            .write_config_u8(regs::BNO055_SYS_TRIGGER, clock_source(ext))
            .await;

        self.restore_mode(saved, result, delay).await
    }

    /// Configures axis remap and axis signs of the device.
    pub async fn set_axis_remap<D>(
        &mut self,
        remap: AxisRemap,
        sign: AxisSign,
        delay: &mut D,
    ) -> Result<(), Error<E>>
    where
        D: DelayNs,
    {
        let saved = self.enter_config_mode(delay).await?;

        let mut result = self
            .write_config_u8(regs::BNO055_AXIS_MAP_CONFIG, remap.bits())
            .await;
        if result.is_ok() {
            result = self
                .write_config_u8(regs::BNO055_AXIS_MAP_SIGN, sign.bits())
                .await;
        }

        self.restore_mode(saved, result, delay).await
    }

    /// Returns axis remap of the device.
    pub async fn axis_remap(&mut self) -> Result<AxisRemap, Error<E>> {
        let value = self
            .bus
            .read_u8(regs::BNO055_AXIS_MAP_CONFIG)
            .await
            .map_err(Error::I2c)?;

        AxisRemap::from_bits(value).ok_or(Error::InvalidRegisterValue {
            reg: regs::BNO055_AXIS_MAP_CONFIG,
            value,
        })
    }

    /// Return device's axes sign.
    pub async fn axis_sign(&mut self) -> Result<AxisSign, Error<E>> {
        let value = self
            .bus
            .read_u8(regs::BNO055_AXIS_MAP_SIGN)
            .await
            .map_err(Error::I2c)?;

        Ok(AxisSign::from_bits_truncate(value))
    }

    /// Re-reads `UNIT_SEL`; later readings are scaled with the result.
    pub async fn refresh_units(&mut self) -> Result<SensorUnits, Error<E>> {
        let bits = self
            .bus
            .read_u8(regs::BNO055_UNIT_SEL)
            .await
            .map_err(Error::I2c)?;
        self.units = SensorUnits::from_bits(bits);

        Ok(self.units)
    }

    /// Writes `UNIT_SEL`.
    pub async fn set_units<D>(&mut self, units: SensorUnits, delay: &mut D) -> Result<(), Error<E>>
    where
        D: DelayNs,
    {
        let saved = self.enter_config_mode(delay).await?;

        let result = self
            .write_config_u8(regs::BNO055_UNIT_SEL, units.bits())
            .await;
        if result.is_ok() {
            self.units = units;
        }

        self.restore_mode(saved, result, delay).await
    }

    /// Returns the selected register map page.
    pub async fn page(&mut self) -> Result<u8, Error<E>> {
        let page = self
            .bus
            .read_u8(regs::BNO055_PAGE_ID)
            .await
            .map_err(Error::I2c)?;

        Ok(page & 0x1)
    }

    pub async fn system_status(&mut self) -> Result<SystemStatus, Error<E>> {
        let value = self
            .bus
            .read_u8(regs::BNO055_SYS_STATUS)
            .await
            .map_err(Error::I2c)?;

        SystemStatus::from_u8(value & 0x7).ok_or(Error::InvalidRegisterValue {
            reg: regs::BNO055_SYS_STATUS,
            value,
        })
    }

    pub async fn system_error(&mut self) -> Result<SystemError, Error<E>> {
        let value = self
            .bus
            .read_u8(regs::BNO055_SYS_ERR)
            .await
            .map_err(Error::I2c)?;

        SystemError::from_u8(value & 0xF).ok_or(Error::InvalidRegisterValue {
            reg: regs::BNO055_SYS_ERR,
            value,
        })
    }

    /// Result of the last self-test (the power-on one unless `run_self_test` was called).
    pub async fn self_test_result(&mut self) -> Result<SelfTestStatus, Error<E>> {
        let value = self
            .bus
            .read_u8(regs::BNO055_ST_RESULT)
            .await
            .map_err(Error::I2c)?;

        Ok(SelfTestStatus::from_bits_truncate(value))
    }

    /// Triggers a self-test and returns its result.
    pub async fn run_self_test<D>(&mut self, delay: &mut D) -> Result<SelfTestStatus, Error<E>>
    where
        D: DelayNs,
    {
        let saved = self.enter_config_mode(delay).await?;

        let result = match self.trigger_self_test().await {
            Ok(()) => {
                delay.delay_ms(regs::SELF_TEST_MS).await;
                self.self_test_result().await
            }
            Err(e) => Err(e),
        };

        self.restore_mode(saved, result, delay).await
    }

    /// Sets the self-test bit, keeping the clock source selected in `SYS_TRIGGER`.
    async fn trigger_self_test(&mut self) -> Result<(), Error<E>> {
        let sys_trigger = self
            .bus
            .read_u8(regs::BNO055_SYS_TRIGGER)
            .await
            .map_err(Error::I2c)?;

        self.write_config_u8(
            regs::BNO055_SYS_TRIGGER,
            sys_trigger | regs::BNO055_SYS_TRIGGER_SELF_TEST_BIT,
        )
        .await
    }

    /// Chip IDs and firmware revisions.
    pub async fn versions(&mut self) -> Result<Versions, Error<E>> {
        let mut buf = [0u8; regs::BNO055_VERSIONS_LEN];
        self.bus
            .read_bytes(regs::BNO055_CHIP_ID, &mut buf)
            .await
            .map_err(Error::I2c)?;

        Ok(Versions::from_registers(&buf))
    }

    /// Current orientation as a unit quaternion.
    /// Meaningful in sensor fusion modes.
    pub async fn quaternion(&mut self) -> Result<Quaternion, Error<E>> {
        let mut buf = [0u8; regs::BNO055_QUA_LEN];
        self.bus
            .read_bytes(regs::BNO055_QUA_DATA_W_LSB, &mut buf)
            .await
            .map_err(Error::I2c)?;

        Ok(Quaternion::from_registers(&buf))
    }

    /// Current orientation as heading, roll and pitch in the selected angle unit.
    /// Meaningful in sensor fusion modes.
    pub async fn euler_angles(&mut self) -> Result<EulerAngles, Error<E>> {
        let mut buf = [0u8; regs::BNO055_EUL_LEN];
        self.bus
            .read_bytes(regs::BNO055_EUL_HEADING_LSB, &mut buf)
            .await
            .map_err(Error::I2c)?;

        Ok(EulerAngles::from_registers(&buf, self.units.euler))
    }

    /// Chip temperature in the selected temperature unit.
    pub async fn temperature(&mut self) -> Result<f32, Error<E>> {
        let raw = self
            .bus
            .read_u8(regs::BNO055_TEMP)
            .await
            .map_err(Error::I2c)?;

        Ok(decode::temperature(raw, self.units.temperature))
    }

    async fn read_vec(&mut self, reg: u8, scale: f32) -> Result<mint::Vector3<f32>, Error<E>> {
        let mut buf = [0u8; 6];
        self.bus
            .read_bytes(reg, &mut buf)
            .await
            .map_err(Error::I2c)?;

        Ok(decode::vector(&buf, scale))
    }

    /// Returns current accelerometer data in the selected acceleration unit.
    /// Available only in modes in which accelerometer is enabled.
    pub async fn accel_data(&mut self) -> Result<mint::Vector3<f32>, Error<E>> {
        if !self.mode().is_accel_enabled() {
            return Err(Error::InvalidMode);
        }
        let scale = self.units.accel.scale();
        self.read_vec(regs::BNO055_ACC_DATA_X_LSB, scale).await
    }

    /// Returns current gyroscope data in the selected angular rate unit.
    /// Available only in modes in which gyroscope is enabled.
    pub async fn gyro_data(&mut self) -> Result<mint::Vector3<f32>, Error<E>> {
        if !self.mode().is_gyro_enabled() {
            return Err(Error::InvalidMode);
        }
        let scale = self.units.gyro.scale();
        self.read_vec(regs::BNO055_GYR_DATA_X_LSB, scale).await
    }

    /// Returns current magnetometer data in uT units.
    /// Available only in modes in which magnetometer is enabled.
    pub async fn mag_data(&mut self) -> Result<mint::Vector3<f32>, Error<E>> {
        if !self.mode().is_mag_enabled() {
            return Err(Error::InvalidMode);
        }
        self.read_vec(regs::BNO055_MAG_DATA_X_LSB, 1.0 / 16.0).await // 1 uT = 16 lsb
    }

    /// Returns linear acceleration vector in the selected acceleration unit.
    /// Available only in sensor fusion modes.
    pub async fn linear_acceleration(&mut self) -> Result<mint::Vector3<f32>, Error<E>> {
        if !self.mode().is_fusion_enabled() {
            return Err(Error::InvalidMode);
        }
        let scale = self.units.accel.scale();
        self.read_vec(regs::BNO055_LIA_DATA_X_LSB, scale).await
    }

    /// Returns gravity vector in the selected acceleration unit.
    /// Available only in sensor fusion modes.
    pub async fn gravity(&mut self) -> Result<mint::Vector3<f32>, Error<E>> {
        if !self.mode().is_fusion_enabled() {
            return Err(Error::InvalidMode);
        }
        let scale = self.units.accel.scale();
        self.read_vec(regs::BNO055_GRV_DATA_X_LSB, scale).await
    }

    /// Get calibration status
    pub async fn calibration_status(&mut self) -> Result<CalibrationStatus, Error<E>> {
        let status = self
            .bus
            .read_u8(regs::BNO055_CALIB_STAT)
            .await
            .map_err(Error::I2c)?;

        Ok(CalibrationStatus::from_bits(status))
    }

    /// Checks whether every sensor used by the current mode is fully calibrated.
    pub async fn is_fully_calibrated(&mut self) -> Result<bool, Error<E>> {
        let status = self.calibration_status().await?;

        Ok(status.is_fully_calibrated_for(self.mode()))
    }

    /// Reads the calibration offsets, or `None` while the device is not fully calibrated.
    pub async fn sensor_offsets<D>(
        &mut self,
        delay: &mut D,
    ) -> Result<Option<SensorOffsets>, Error<E>>
    where
        D: DelayNs,
    {
        if !self.is_fully_calibrated().await? {
            return Ok(None);
        }

        let saved = self.enter_config_mode(delay).await?;

        let mut buf = [0u8; SENSOR_OFFSETS_SIZE];
        let result = self
            .bus
            .read_bytes(regs::BNO055_ACC_OFFSET_X_LSB, &mut buf)
            .await
            .map_err(Error::I2c)
            .map(|()| SensorOffsets::from_registers(&buf));

        self.restore_mode(saved, result, delay).await.map(Some)
    }

    /// Writes calibration offsets, LSB then MSB for each value.
    ///
    /// Writes are not atomic: a bus error part way leaves a mix of old and new values.
    pub async fn set_sensor_offsets<D>(
        &mut self,
        offsets: &SensorOffsets,
        delay: &mut D,
    ) -> Result<(), Error<E>>
    where
        D: DelayNs,
    {
        let saved = self.enter_config_mode(delay).await?;
        delay.delay_ms(regs::OFFSET_WRITE_SETTLE_MS).await;

        let result = self.write_offsets(offsets).await;

        self.restore_mode(saved, result, delay).await
    }

    async fn write_offsets(&mut self, offsets: &SensorOffsets) -> Result<(), Error<E>> {
        let buf = offsets.to_registers();
        for (reg, value) in (regs::BNO055_ACC_OFFSET_X_LSB..=regs::BNO055_MAG_RADIUS_MSB).zip(buf)
        {
            self.write_config_u8(reg, value).await?;
        }

        Ok(())
    }
}

fn clock_source(external_crystal: bool) -> u8 {
    if external_crystal {
        regs::BNO055_SYS_TRIGGER_CLK_SEL_BIT
    } else {
        0x00
    }
}
