//! 4-wire SPI transport
//!
//! Chip-select is held low for exactly one call by a guard that raises it
//! again when dropped, so it is released on every exit path. The
//! data/command line is low for opcodes and high for parameters and pixel
//! data; the bus is flushed before the line changes.

use lumen_core::{Rgb565, Transport};
use lumen_hal::{OutputPin, SpiBus};

/// Bytes staged per SPI write when streaming pixels
pub const STAGING_BYTES: usize = 128;

/// Holds chip-select low while alive
struct Selected<'a, CS: OutputPin> {
    cs: &'a mut CS,
}

impl<'a, CS: OutputPin> Selected<'a, CS> {
    fn new(cs: &'a mut CS) -> Self {
        cs.set_low();
        Self { cs }
    }
}

impl<CS: OutputPin> Drop for Selected<'_, CS> {
    fn drop(&mut self) {
        self.cs.set_high();
    }
}

/// SPI bus plus data/command and chip-select lines
pub struct SpiTransport<SPI, DC, CS> {
    spi: SPI,
    dc: DC,
    cs: CS,
}

impl<SPI, DC, CS> SpiTransport<SPI, DC, CS>
where
    SPI: SpiBus,
    DC: OutputPin,
    CS: OutputPin,
{
    /// Take ownership of the bus and pins, deselecting the controller
    pub fn new(spi: SPI, mut dc: DC, mut cs: CS) -> Self {
        cs.set_high();
        dc.set_high();
        Self { spi, dc, cs }
    }

    /// Give back the bus and pins
    pub fn release(self) -> (SPI, DC, CS) {
        (self.spi, self.dc, self.cs)
    }
}

impl<SPI, DC, CS> Transport for SpiTransport<SPI, DC, CS>
where
    SPI: SpiBus,
    DC: OutputPin,
    CS: OutputPin,
{
    type Error = SPI::Error;

    fn send_command(&mut self, opcode: u8) -> Result<(), Self::Error> {
        let _selected = Selected::new(&mut self.cs);
        self.dc.set_low();
        self.spi.write(&[opcode])?;
        self.spi.flush()
    }

    fn send_parameters(&mut self, params: &[u8]) -> Result<(), Self::Error> {
        if params.is_empty() {
            return Ok(());
        }
        let _selected = Selected::new(&mut self.cs);
        self.dc.set_high();
        self.spi.write(params)?;
        self.spi.flush()
    }

    fn send_pixels<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Rgb565>,
    {
        let _selected = Selected::new(&mut self.cs);
        self.dc.set_high();
        let mut staging = [0u8; STAGING_BYTES];
        let mut filled = 0;
        for pixel in pixels {
            staging[filled..filled + 2].copy_from_slice(&pixel.to_be_bytes());
            filled += 2;
            if filled == STAGING_BYTES {
                self.spi.write(&staging)?;
                filled = 0;
            }
        }
        if filled > 0 {
            self.spi.write(&staging[..filled])?;
        }
        self.spi.flush()
    }

    fn command(&mut self, opcode: u8, params: &[u8]) -> Result<(), Self::Error> {
        let _selected = Selected::new(&mut self.cs);
        self.dc.set_low();
        self.spi.write(&[opcode])?;
        self.spi.flush()?;
        if !params.is_empty() {
            self.dc.set_high();
            self.spi.write(params)?;
            self.spi.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use core::cell::RefCell;
    use std::rc::Rc;
    use std::vec;
    use std::vec::Vec;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Cs(bool),
        Dc(bool),
        Write(Vec<u8>),
        Flush,
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    struct MockPin {
        log: Log,
        cs: bool,
        high: bool,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
            self.log.borrow_mut().push(self.event(true));
        }

        fn set_low(&mut self) {
            self.high = false;
            self.log.borrow_mut().push(self.event(false));
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    impl MockPin {
        fn event(&self, high: bool) -> Event {
            if self.cs {
                Event::Cs(high)
            } else {
                Event::Dc(high)
            }
        }
    }

    struct MockSpi {
        log: Log,
        /// Fail the write after this many successful ones
        fail_after: Option<usize>,
    }

    impl SpiBus for MockSpi {
        type Error = ();

        fn write(&mut self, data: &[u8]) -> Result<(), ()> {
            if let Some(n) = self.fail_after.as_mut() {
                if *n == 0 {
                    return Err(());
                }
                *n -= 1;
            }
            self.log.borrow_mut().push(Event::Write(data.to_vec()));
            Ok(())
        }

        fn flush(&mut self) -> Result<(), ()> {
            self.log.borrow_mut().push(Event::Flush);
            Ok(())
        }
    }

    fn transport(fail_after: Option<usize>) -> (SpiTransport<MockSpi, MockPin, MockPin>, Log) {
        let log: Log = Rc::default();
        let spi = MockSpi {
            log: log.clone(),
            fail_after,
        };
        let dc = MockPin {
            log: log.clone(),
            cs: false,
            high: false,
        };
        let cs = MockPin {
            log: log.clone(),
            cs: true,
            high: false,
        };
        let t = SpiTransport::new(spi, dc, cs);
        log.borrow_mut().clear();
        (t, log)
    }

    #[test]
    fn test_new_deselects() {
        let log: Log = Rc::default();
        let spi = MockSpi {
            log: log.clone(),
            fail_after: None,
        };
        let dc = MockPin {
            log: log.clone(),
            cs: false,
            high: false,
        };
        let cs = MockPin {
            log: log.clone(),
            cs: true,
            high: false,
        };
        let t = SpiTransport::new(spi, dc, cs);
        let (_, dc, cs) = t.release();
        assert!(cs.is_set_high());
        assert!(dc.is_set_high());
    }

    #[test]
    fn test_command_framing() {
        let (mut t, log) = transport(None);
        t.send_command(0x29).unwrap();
        assert_eq!(
            *log.borrow(),
            [
                Event::Cs(false),
                Event::Dc(false),
                Event::Write(vec![0x29]),
                Event::Flush,
                Event::Cs(true),
            ]
        );
    }

    #[test]
    fn test_command_with_params_single_select() {
        let (mut t, log) = transport(None);
        t.command(0x2A, &[0x00, 0x0A, 0x00, 0x13]).unwrap();
        assert_eq!(
            *log.borrow(),
            [
                Event::Cs(false),
                Event::Dc(false),
                Event::Write(vec![0x2A]),
                Event::Flush,
                Event::Dc(true),
                Event::Write(vec![0x00, 0x0A, 0x00, 0x13]),
                Event::Flush,
                Event::Cs(true),
            ]
        );
    }

    #[test]
    fn test_pixels_big_endian() {
        let (mut t, log) = transport(None);
        t.send_pixels([Rgb565(0xF81F), Rgb565(0x1234)]).unwrap();
        assert_eq!(
            *log.borrow(),
            [
                Event::Cs(false),
                Event::Dc(true),
                Event::Write(vec![0xF8, 0x1F, 0x12, 0x34]),
                Event::Flush,
                Event::Cs(true),
            ]
        );
    }

    #[test]
    fn test_pixels_staged_in_chunks() {
        let (mut t, log) = transport(None);
        let count = STAGING_BYTES / 2 * 2 + 3;
        t.send_pixels(core::iter::repeat(Rgb565::WHITE).take(count)).unwrap();
        let sizes: Vec<usize> = log
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Write(bytes) => Some(bytes.len()),
                _ => None,
            })
            .collect();
        assert_eq!(sizes, [STAGING_BYTES, STAGING_BYTES, 6]);
        assert_eq!(sizes.iter().sum::<usize>(), count * 2);
    }

    #[test]
    fn test_cs_released_on_error() {
        let (mut t, log) = transport(Some(1));
        let result = t.send_pixels(core::iter::repeat(Rgb565::BLACK).take(STAGING_BYTES));
        assert_eq!(result, Err(()));
        assert_eq!(log.borrow().last(), Some(&Event::Cs(true)));
    }

    #[test]
    fn test_empty_params_send_nothing() {
        let (mut t, log) = transport(None);
        t.send_parameters(&[]).unwrap();
        assert!(log.borrow().is_empty());
    }
}
