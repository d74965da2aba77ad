//! Mock bus and clock shared by the integration tests.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bno055_fusion::{Bno055, SessionConfig, BNO055_ID};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{ErrorKind, ErrorType, I2c, Operation};

pub const CHIP_ID: u8 = 0x00;
pub const PAGE_ID: u8 = 0x07;
pub const EUL_HEADING_LSB: u8 = 0x1A;
pub const QUA_DATA_W_LSB: u8 = 0x20;
pub const TEMP: u8 = 0x34;
pub const CALIB_STAT: u8 = 0x35;
pub const ST_RESULT: u8 = 0x36;
pub const SYS_STATUS: u8 = 0x39;
pub const SYS_ERR: u8 = 0x3A;
pub const UNIT_SEL: u8 = 0x3B;
pub const OPR_MODE: u8 = 0x3D;
pub const PWR_MODE: u8 = 0x3E;
pub const SYS_TRIGGER: u8 = 0x3F;
pub const AXIS_MAP_CONFIG: u8 = 0x41;
pub const AXIS_MAP_SIGN: u8 = 0x42;
pub const ACC_OFFSET_X_LSB: u8 = 0x55;
pub const MAG_OFFSET_X_LSB: u8 = 0x5B;
pub const MAG_RADIUS_MSB: u8 = 0x6A;

pub const MS: u64 = 1_000_000;

/// One register access, stamped with the virtual time it happened at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusOp {
    Read { reg: u8, len: usize, at_ns: u64 },
    Write { reg: u8, value: u8, at_ns: u64 },
}

impl BusOp {
    pub fn at_ns(&self) -> u64 {
        match *self {
            BusOp::Read { at_ns, .. } | BusOp::Write { at_ns, .. } => at_ns,
        }
    }

    /// Register access without the timestamp, for sequence comparisons.
    pub fn untimed(&self) -> Access {
        match *self {
            BusOp::Read { reg, len, .. } => Access::Read(reg, len),
            BusOp::Write { reg, value, .. } => Access::Write(reg, value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read(u8, usize),
    Write(u8, u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

impl embedded_hal_async::i2c::Error for MockError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

struct MockState {
    registers: [u8; 256],
    ops: Vec<BusOp>,
    addresses: Vec<u8>,
    clock: Rc<Cell<u64>>,
    fail_write_to: Option<(u8, usize)>,
    fail_read_of: Option<u8>,
    fail_reads: bool,
    id_after_reset: Option<u8>,
}

impl MockState {
    fn write(&mut self, reg: u8, value: u8) -> Result<(), MockError> {
        if let Some((target, skip)) = self.fail_write_to {
            if target == reg {
                if skip == 0 {
                    self.fail_write_to = None;
                    return Err(MockError);
                }
                self.fail_write_to = Some((target, skip - 1));
            }
        }

        self.ops.push(BusOp::Write {
            reg,
            value,
            at_ns: self.clock.get(),
        });
        self.registers[reg as usize] = value;

        if reg == SYS_TRIGGER && value & 0x20 != 0 {
            self.registers[OPR_MODE as usize] = 0;
            if let Some(id) = self.id_after_reset {
                self.registers[CHIP_ID as usize] = id;
            }
        }

        Ok(())
    }

    fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), MockError> {
        if self.fail_reads {
            return Err(MockError);
        }
        if self.fail_read_of == Some(reg) {
            self.fail_read_of = None;
            return Err(MockError);
        }

        self.ops.push(BusOp::Read {
            reg,
            len: buf.len(),
            at_ns: self.clock.get(),
        });
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = self.registers[reg as usize + i];
        }

        Ok(())
    }
}

/// Register-file model of the chip behind an async I2C bus.
///
/// Writes store their value, reads return what is stored, and resets only put
/// `OPR_MODE` back to CONFIG.
#[derive(Clone)]
pub struct MockI2c {
    state: Rc<RefCell<MockState>>,
}

impl MockI2c {
    pub fn new(clock: &Clock) -> Self {
        let mut registers = [0u8; 256];
        registers[CHIP_ID as usize] = BNO055_ID;
        registers[AXIS_MAP_CONFIG as usize] = 0x24;

        Self {
            state: Rc::new(RefCell::new(MockState {
                registers,
                ops: Vec::new(),
                addresses: Vec::new(),
                clock: clock.0.clone(),
                fail_write_to: None,
                fail_read_of: None,
                fail_reads: false,
                id_after_reset: None,
            })),
        }
    }

    pub fn set_register(&self, reg: u8, value: u8) {
        self.state.borrow_mut().registers[reg as usize] = value;
    }

    pub fn set_registers(&self, reg: u8, values: &[u8]) {
        let mut state = self.state.borrow_mut();
        for (i, v) in values.iter().enumerate() {
            state.registers[reg as usize + i] = *v;
        }
    }

    pub fn register(&self, reg: u8) -> u8 {
        self.state.borrow().registers[reg as usize]
    }

    pub fn registers(&self, reg: u8, len: usize) -> Vec<u8> {
        self.state.borrow().registers[reg as usize..reg as usize + len].to_vec()
    }

    pub fn ops(&self) -> Vec<BusOp> {
        self.state.borrow().ops.clone()
    }

    pub fn accesses(&self) -> Vec<Access> {
        self.state.borrow().ops.iter().map(BusOp::untimed).collect()
    }

    pub fn writes_to(&self, reg: u8) -> Vec<u8> {
        self.state
            .borrow()
            .ops
            .iter()
            .filter_map(|op| match *op {
                BusOp::Write { reg: r, value, .. } if r == reg => Some(value),
                _ => None,
            })
            .collect()
    }

    pub fn clear_ops(&self) {
        self.state.borrow_mut().ops.clear();
    }

    pub fn addresses(&self) -> Vec<u8> {
        self.state.borrow().addresses.clone()
    }

    /// The next write to `reg` fails without reaching the register.
    pub fn fail_next_write_to(&self, reg: u8) {
        self.fail_nth_write_to(reg, 0);
    }

    /// Lets `n` writes to `reg` through, then fails the following one.
    pub fn fail_nth_write_to(&self, reg: u8, n: usize) {
        self.state.borrow_mut().fail_write_to = Some((reg, n));
    }

    /// The next block or byte read starting at `reg` fails.
    pub fn fail_next_read_of(&self, reg: u8) {
        self.state.borrow_mut().fail_read_of = Some(reg);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.state.borrow_mut().fail_reads = fail;
    }

    /// Chip ID reported once a system reset was written.
    pub fn id_after_reset(&self, id: u8) {
        self.state.borrow_mut().id_after_reset = Some(id);
    }
}

impl ErrorType for MockI2c {
    type Error = MockError;
}

impl I2c for MockI2c {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        state.addresses.push(address);

        let mut pointer: Option<u8> = None;
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    let (reg, values) = bytes.split_first().ok_or(MockError)?;
                    let mut reg = *reg;
                    for value in values {
                        state.write(reg, *value)?;
                        reg = reg.wrapping_add(1);
                    }
                    pointer = Some(reg);
                }
                Operation::Read(buf) => {
                    let reg = pointer.ok_or(MockError)?;
                    state.read(reg, buf)?;
                }
            }
        }

        Ok(())
    }
}

/// Virtual time in nanoseconds, advanced only by [`MockDelay`].
#[derive(Clone, Default)]
pub struct Clock(Rc<Cell<u64>>);

impl Clock {
    pub fn now_ns(&self) -> u64 {
        self.0.get()
    }
}

pub struct MockDelay {
    clock: Clock,
    waits_ms: Vec<u32>,
}

impl MockDelay {
    pub fn new(clock: &Clock) -> Self {
        Self {
            clock: clock.clone(),
            waits_ms: Vec::new(),
        }
    }

    pub fn waits_ms(&self) -> &[u32] {
        &self.waits_ms
    }

    pub fn clear(&mut self) {
        self.waits_ms.clear();
    }

    fn advance(&self, ns: u64) {
        self.clock.0.set(self.clock.0.get() + ns);
    }
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.advance(ns as u64);
    }

    async fn delay_us(&mut self, us: u32) {
        self.advance(us as u64 * 1_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.waits_ms.push(ms);
        self.advance(ms as u64 * MS);
    }
}

pub fn block_on<F: core::future::Future>(f: F) -> F::Output {
    futures::executor::block_on(f)
}

/// A mock chip, its clock and a session brought up with `config`.
/// The bring-up traffic is cleared from the logs.
pub fn begin(config: SessionConfig) -> (Bno055<MockI2c>, MockI2c, MockDelay, Clock) {
    let clock = Clock::default();
    let i2c = MockI2c::new(&clock);
    let mut delay = MockDelay::new(&clock);

    let dev = block_on(Bno055::begin(i2c.clone(), config, &mut delay)).unwrap();

    i2c.clear_ops();
    delay.clear();
    (dev, i2c, delay, clock)
}
