pub(crate) const BNO055_ADDR_A: u8 = 0x28;
pub(crate) const BNO055_ADDR_B: u8 = 0x29;
pub const BNO055_ID: u8 = 0xA0;

pub(crate) const BNO055_PAGE_ID: u8 = 0x07;

/// Chip ID, followed by accel/mag/gyro IDs, SW revision LSB/MSB and bootloader revision.
pub(crate) const BNO055_CHIP_ID: u8 = 0x00;
pub(crate) const BNO055_VERSIONS_LEN: usize = 7;

pub(crate) const BNO055_ACC_DATA_X_LSB: u8 = 0x08;
pub(crate) const BNO055_MAG_DATA_X_LSB: u8 = 0x0E;
pub(crate) const BNO055_GYR_DATA_X_LSB: u8 = 0x14;

pub(crate) const BNO055_EUL_HEADING_LSB: u8 = 0x1A;
pub(crate) const BNO055_EUL_LEN: usize = 6;

pub(crate) const BNO055_QUA_DATA_W_LSB: u8 = 0x20;
pub(crate) const BNO055_QUA_LEN: usize = 8;

/// Linear acceleration data
pub(crate) const BNO055_LIA_DATA_X_LSB: u8 = 0x28;

/// Gravity vector data
pub(crate) const BNO055_GRV_DATA_X_LSB: u8 = 0x2E;

pub(crate) const BNO055_TEMP: u8 = 0x34;
pub(crate) const BNO055_CALIB_STAT: u8 = 0x35;
pub(crate) const BNO055_ST_RESULT: u8 = 0x36;
pub(crate) const BNO055_SYS_STATUS: u8 = 0x39;
pub(crate) const BNO055_SYS_ERR: u8 = 0x3A;
pub(crate) const BNO055_UNIT_SEL: u8 = 0x3B;
pub(crate) const BNO055_OPR_MODE: u8 = 0x3D;
pub(crate) const BNO055_PWR_MODE: u8 = 0x3E;

pub(crate) const BNO055_SYS_TRIGGER: u8 = 0x3F;
pub(crate) const BNO055_SYS_TRIGGER_SELF_TEST_BIT: u8 = 0x01;
pub(crate) const BNO055_SYS_TRIGGER_RST_SYS_BIT: u8 = 0x20;
pub(crate) const BNO055_SYS_TRIGGER_CLK_SEL_BIT: u8 = 0x80;

pub(crate) const BNO055_AXIS_MAP_CONFIG: u8 = 0x41;
pub(crate) const BNO055_AXIS_MAP_SIGN: u8 = 0x42;

/// Sensor offsets: 11 little-endian words from accel X to mag radius.
pub(crate) const BNO055_ACC_OFFSET_X_LSB: u8 = 0x55;
pub(crate) const BNO055_MAG_RADIUS_MSB: u8 = 0x6A;

/// Table 3-6: CONFIG_MODE is entered in 19ms, any other mode in 7ms.
pub(crate) const CONFIG_MODE_SWITCH_MS: u32 = 20;
pub(crate) const OPERATING_MODE_SWITCH_MS: u32 = 8;

/// Offset registers are not writable right after entering CONFIG_MODE.
pub(crate) const OFFSET_WRITE_SETTLE_MS: u32 = 25;

pub(crate) const RESET_BOOT_MS: u32 = 2000;
pub(crate) const SELF_TEST_MS: u32 = 1000;
