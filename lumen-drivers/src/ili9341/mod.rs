//! ILI9341 TFT controller
//!
//! 240x320, 262K colors, driven here in its 16-bit RGB565 mode over a
//! 4-wire SPI link. The controller owns the frame memory; the host only
//! programs a window and streams pixels into it.
//!
//! # Window addressing
//!
//! Every drawing operation ends up in [`PixelSink::set_window`]:
//!
//! 1. MADCTL, only when the scan direction differs from the last one
//!    programmed
//! 2. CASET and PASET with the column and page ranges for that scan
//! 3. RAMWR, after which pixel data fills the window
//!
//! ```ignore
//! let transport = SpiTransport::new(spi, dc, cs);
//! let mut display = Ili9341::new(transport, DisplayConfig::ILI9341)?;
//! display.init(&mut delay)?;
//! display.fill_screen(Rgb565::BLACK)?;
//! ```

pub mod command;
mod transport;

pub use transport::{SpiTransport, STAGING_BYTES};

use lumen_core::config::{ConfigError, DisplayConfig};
use lumen_core::geometry::{ScanDirection, Size, Window};
use lumen_core::{Error, PixelSink, Rgb565, Rotation, Transport};
use lumen_hal::{DelayMs, OutputPin};

use self::command::{cmd, madctl_value};

/// ILI9341 driver over any [`Transport`]
pub struct Ili9341<T> {
    transport: T,
    config: DisplayConfig,
    /// Scan direction currently in MADCTL, `None` when unknown
    programmed_scan: Option<ScanDirection>,
}

impl<T: Transport> Ili9341<T> {
    /// Create a driver; nothing is sent until [`init`](Self::init)
    pub fn new(transport: T, config: DisplayConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            transport,
            config,
            programmed_scan: None,
        })
    }

    /// Pulse the reset line
    ///
    /// Controller state is lost, so [`init`](Self::init) must follow.
    pub fn hardware_reset<P, D>(&mut self, rst: &mut P, delay: &mut D)
    where
        P: OutputPin,
        D: DelayMs,
    {
        rst.set_high();
        delay.delay_ms(5);
        rst.set_low();
        delay.delay_ms(1);
        rst.set_high();
        delay.delay_ms(command::RESET_DELAY_MS);
        self.programmed_scan = None;
    }

    /// Bring the controller up in 16-bit mode with the display on
    pub fn init<D: DelayMs>(&mut self, delay: &mut D) -> Result<(), Error<T::Error>> {
        debug!("ili9341: init {=u16}x{=u16}", self.config.width, self.config.height);
        self.programmed_scan = None;

        self.send(cmd::DISPOFF, &[])?;
        self.send(cmd::SWRESET, &[])?;
        delay.delay_ms(command::RESET_DELAY_MS);

        self.send(cmd::PIXFMT, &[command::PIXFMT_16BPP])?;
        self.send(cmd::GAMMASET, &[command::GAMMA_CURVE_1])?;
        self.send(cmd::ETMOD, &[command::ETMOD_NORMAL])?;
        self.program_scan(self.config.rotation.scan_direction())?;

        self.send(cmd::SLPOUT, &[])?;
        delay.delay_ms(command::RESET_DELAY_MS);
        self.send(cmd::NORON, &[])?;
        self.send(cmd::DISPON, &[])?;
        info!("ili9341: ready, {}", self.config.rotation);
        Ok(())
    }

    /// Change the rotation; affects subsequent drawing only
    pub fn set_rotation(&mut self, rotation: Rotation) -> Result<(), Error<T::Error>> {
        info!("ili9341: rotation {}", rotation);
        self.config.rotation = rotation;
        self.programmed_scan = None;
        self.program_scan(rotation.scan_direction())
    }

    /// Enter sleep mode
    pub fn sleep<D: DelayMs>(&mut self, delay: &mut D) -> Result<(), Error<T::Error>> {
        debug!("ili9341: sleep");
        self.send(cmd::SLPIN, &[])?;
        delay.delay_ms(command::SLEEP_IN_DELAY_MS);
        Ok(())
    }

    /// Leave sleep mode
    pub fn wake<D: DelayMs>(&mut self, delay: &mut D) -> Result<(), Error<T::Error>> {
        debug!("ili9341: wake");
        self.send(cmd::SLPOUT, &[])?;
        delay.delay_ms(command::RESET_DELAY_MS);
        Ok(())
    }

    /// Turn the panel output on or off; frame memory is kept
    pub fn set_display_on(&mut self, on: bool) -> Result<(), Error<T::Error>> {
        self.send(if on { cmd::DISPON } else { cmd::DISPOFF }, &[])
    }

    /// Invert all colors on the panel
    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), Error<T::Error>> {
        self.send(if inverted { cmd::INVON } else { cmd::INVOFF }, &[])
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Give back the transport
    pub fn release(self) -> T {
        self.transport
    }

    fn send(&mut self, opcode: u8, params: &[u8]) -> Result<(), Error<T::Error>> {
        self.transport
            .command(opcode, params)
            .map_err(Error::Transport)
    }

    fn program_scan(&mut self, scan: ScanDirection) -> Result<(), Error<T::Error>> {
        if self.programmed_scan == Some(scan) {
            return Ok(());
        }
        trace!("ili9341: scan {}", scan);
        // Unknown until the write succeeds
        self.programmed_scan = None;
        self.send(cmd::MADCTL, &[madctl_value(scan, self.config.bgr)])?;
        self.programmed_scan = Some(scan);
        Ok(())
    }
}

impl<T: Transport> PixelSink for Ili9341<T> {
    type Error = T::Error;

    fn panel_size(&self) -> Size {
        self.config.panel_size()
    }

    fn rotation(&self) -> Rotation {
        self.config.rotation
    }

    fn set_window(&mut self, window: &Window) -> Result<(), Error<T::Error>> {
        let panel = self.panel_size();
        if window.validate(panel).is_err() {
            warn!("ili9341: rejected window {}", window);
            return Err(Error::InvalidWindow);
        }
        self.program_scan(window.scan)?;
        let (columns, pages) = command::address_ranges(window, panel);
        self.send(cmd::CASET, &command::range_params(columns))?;
        self.send(cmd::PASET, &command::range_params(pages))?;
        self.send(cmd::RAMWR, &[])
    }

    fn write_pixels<I>(&mut self, pixels: I) -> Result<(), Error<T::Error>>
    where
        I: IntoIterator<Item = Rgb565>,
    {
        self.transport.send_pixels(pixels).map_err(Error::Transport)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec;
    use std::vec::Vec;

    use lumen_core::geometry::Rect;
    use lumen_core::Draw;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Frame {
        Command(u8, Vec<u8>),
        Pixels(usize),
    }

    /// Transport that records frames and can be told to fail
    #[derive(Default)]
    struct Recorder {
        frames: Vec<Frame>,
        fail: bool,
    }

    impl Recorder {
        fn opcodes(&self) -> Vec<u8> {
            self.frames
                .iter()
                .filter_map(|f| match f {
                    Frame::Command(op, _) => Some(*op),
                    Frame::Pixels(_) => None,
                })
                .collect()
        }
    }

    impl Transport for Recorder {
        type Error = ();

        fn send_command(&mut self, opcode: u8) -> Result<(), ()> {
            self.command(opcode, &[])
        }

        fn send_parameters(&mut self, params: &[u8]) -> Result<(), ()> {
            match self.frames.last_mut() {
                Some(Frame::Command(_, p)) => p.extend_from_slice(params),
                _ => return Err(()),
            }
            Ok(())
        }

        fn send_pixels<I>(&mut self, pixels: I) -> Result<(), ()>
        where
            I: IntoIterator<Item = Rgb565>,
        {
            if self.fail {
                return Err(());
            }
            self.frames.push(Frame::Pixels(pixels.into_iter().count()));
            Ok(())
        }

        fn command(&mut self, opcode: u8, params: &[u8]) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            self.frames.push(Frame::Command(opcode, params.to_vec()));
            Ok(())
        }
    }

    struct NoDelay(u32);

    impl DelayMs for NoDelay {
        fn delay_ms(&mut self, ms: u32) {
            self.0 += ms;
        }
    }

    fn display() -> Ili9341<Recorder> {
        Ili9341::new(Recorder::default(), DisplayConfig::ILI9341).unwrap()
    }

    #[test]
    fn test_new_validates_config() {
        let bad = DisplayConfig::new(0, 320);
        assert!(matches!(
            Ili9341::new(Recorder::default(), bad),
            Err(ConfigError::InvalidResolution)
        ));
    }

    #[test]
    fn test_init_sequence() {
        let mut d = display();
        let mut delay = NoDelay(0);
        d.init(&mut delay).unwrap();
        let t = d.release();
        assert_eq!(
            t.frames,
            [
                Frame::Command(cmd::DISPOFF, vec![]),
                Frame::Command(cmd::SWRESET, vec![]),
                Frame::Command(cmd::PIXFMT, vec![0x55]),
                Frame::Command(cmd::GAMMASET, vec![0x01]),
                Frame::Command(cmd::ETMOD, vec![0x07]),
                Frame::Command(cmd::MADCTL, vec![0x48]),
                Frame::Command(cmd::SLPOUT, vec![]),
                Frame::Command(cmd::NORON, vec![]),
                Frame::Command(cmd::DISPON, vec![]),
            ]
        );
        assert!(delay.0 >= 2 * command::RESET_DELAY_MS);
    }

    #[test]
    fn test_set_window_sequence() {
        let mut d = display();
        d.init(&mut NoDelay(0)).unwrap();
        d.transport.frames.clear();

        d.fill_rect(10, 20, 10, 5, Rgb565::RED).unwrap();
        assert_eq!(
            d.transport.frames,
            [
                Frame::Command(cmd::CASET, vec![0, 10, 0, 19]),
                Frame::Command(cmd::PASET, vec![0, 20, 0, 24]),
                Frame::Command(cmd::RAMWR, vec![]),
                Frame::Pixels(50),
            ]
        );
    }

    #[test]
    fn test_madctl_only_on_scan_change() {
        let mut d = display();
        d.fill_rect(0, 0, 2, 2, Rgb565::RED).unwrap();
        d.fill_rect(4, 4, 2, 2, Rgb565::RED).unwrap();
        let madctl_writes = d
            .transport
            .opcodes()
            .iter()
            .filter(|&&op| op == cmd::MADCTL)
            .count();
        assert_eq!(madctl_writes, 1);

        // A bottom-up stream needs a different scan, then back again
        let window = Rotation::Deg0
            .window_for_rows_reversed(&Rect::new(0, 0, 2, 2), d.panel_size())
            .unwrap();
        d.set_window(&window).unwrap();
        d.fill_rect(0, 0, 1, 1, Rgb565::RED).unwrap();
        let madctl: Vec<Vec<u8>> = d
            .transport
            .frames
            .iter()
            .filter_map(|f| match f {
                Frame::Command(cmd::MADCTL, p) => Some(p.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(madctl, [vec![0x48], vec![0xC8], vec![0x48]]);
    }

    #[test]
    fn test_set_rotation_reprograms_and_changes_bounds() {
        let mut d = display();
        d.init(&mut NoDelay(0)).unwrap();
        d.transport.frames.clear();

        d.set_rotation(Rotation::Deg90).unwrap();
        assert_eq!(d.logical_size(), Size::new(320, 240));
        assert_eq!(d.transport.frames, [Frame::Command(cmd::MADCTL, vec![0x28])]);

        // Landscape: CASET and PASET carry the logical rectangle
        d.transport.frames.clear();
        d.fill_rect(300, 0, 20, 10, Rgb565::BLUE).unwrap();
        assert_eq!(
            d.transport.frames[..2],
            [
                Frame::Command(cmd::CASET, vec![0x01, 0x2C, 0x01, 0x3F]),
                Frame::Command(cmd::PASET, vec![0, 0, 0, 9]),
            ]
        );
    }

    #[test]
    fn test_invalid_window_rejected_without_traffic() {
        let mut d = display();
        let window = Window::new(0, 0, 240, 10, ScanDirection::ROW_MAJOR);
        assert_eq!(d.set_window(&window), Err(Error::InvalidWindow));
        let inverted = Window::new(5, 0, 4, 10, ScanDirection::ROW_MAJOR);
        assert_eq!(d.set_window(&inverted), Err(Error::InvalidWindow));
        assert!(d.transport.frames.is_empty());
    }

    #[test]
    fn test_transport_error_surfaces() {
        let mut d = display();
        d.transport.fail = true;
        assert_eq!(d.fill_screen(Rgb565::BLACK), Err(Error::Transport(())));
        // MADCTL state is unknown after a failed write
        assert_eq!(d.programmed_scan, None);
    }

    #[test]
    fn test_power_and_inversion() {
        let mut d = display();
        let mut delay = NoDelay(0);
        d.sleep(&mut delay).unwrap();
        d.wake(&mut delay).unwrap();
        d.set_display_on(false).unwrap();
        d.set_inverted(true).unwrap();
        d.set_inverted(false).unwrap();
        assert_eq!(
            d.transport.opcodes(),
            [cmd::SLPIN, cmd::SLPOUT, cmd::DISPOFF, cmd::INVON, cmd::INVOFF]
        );
        assert_eq!(delay.0, command::SLEEP_IN_DELAY_MS + command::RESET_DELAY_MS);
    }

    #[test]
    fn test_hardware_reset_pulses_low() {
        struct Pin(Vec<bool>);

        impl OutputPin for Pin {
            fn set_high(&mut self) {
                self.0.push(true);
            }

            fn set_low(&mut self) {
                self.0.push(false);
            }

            fn is_set_high(&self) -> bool {
                self.0.last().copied().unwrap_or(false)
            }
        }

        let mut d = display();
        d.fill_rect(0, 0, 1, 1, Rgb565::RED).unwrap();
        let mut rst = Pin(Vec::new());
        d.hardware_reset(&mut rst, &mut NoDelay(0));
        assert_eq!(rst.0, [true, false, true]);
        assert_eq!(d.programmed_scan, None);
    }

    #[test]
    fn test_text_and_bitmap_through_driver() {
        let mut d = display();
        let style = lumen_core::TextStyle::new(Rgb565::WHITE).with_background(Rgb565::BLACK);
        d.draw_text(0, 0, "ok", &style).unwrap();
        let pixel_runs: Vec<_> = d
            .transport
            .frames
            .iter()
            .filter(|f| matches!(f, Frame::Pixels(_)))
            .cloned()
            .collect();
        assert_eq!(pixel_runs, [Frame::Pixels(64), Frame::Pixels(64)]);

        let mut image = Vec::new();
        image.extend_from_slice(b"R565");
        image.extend_from_slice(&2u16.to_le_bytes());
        image.extend_from_slice(&1u16.to_le_bytes());
        image.extend_from_slice(&[0xF8, 0x00, 0x00, 0x1F]);
        d.transport.frames.clear();
        d.draw_bitmap(0, 0, 2, 1, &mut &image[..]).unwrap();
        assert_eq!(d.transport.frames.last(), Some(&Frame::Pixels(2)));
    }
}
