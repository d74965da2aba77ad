use embedded_hal_async::i2c::{I2c, SevenBitAddress};

/// Register-level access to a single BNO055 on a shared I2C bus.
///
/// Every register read is a `write_read` of the register number followed by the data bytes;
/// every write is a two-byte `write` of the register number and the value. The chip
/// auto-increments the register pointer, so block reads cover consecutive registers.
pub struct RegisterBus<I> {
    i2c: I,
    address: SevenBitAddress,
}

impl<I, E> RegisterBus<I>
where
    I: I2c<SevenBitAddress, Error = E>,
{
    pub fn new(i2c: I, address: SevenBitAddress) -> Self {
        RegisterBus { i2c, address }
    }

    #[inline(always)]
    pub fn address(&self) -> SevenBitAddress {
        self.address
    }

    /// Gives the bus back.
    pub fn release(self) -> I {
        self.i2c
    }

    pub async fn read_u8(&mut self, reg: u8) -> Result<u8, E> {
        let mut byte: [u8; 1] = [0; 1];
        self.i2c.write_read(self.address, &[reg], &mut byte).await?;

        Ok(byte[0])
    }

    pub async fn read_bytes(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), E> {
        self.i2c.write_read(self.address, &[reg], buf).await
    }

    pub async fn write_u8(&mut self, reg: u8, value: u8) -> Result<(), E> {
        self.i2c.write(self.address, &[reg, value]).await
    }
}
