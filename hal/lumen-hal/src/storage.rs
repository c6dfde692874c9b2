//! Image storage abstractions
//!
//! Bitmaps live on whatever medium the board provides (SD card, SPI flash,
//! a `static` byte array). The display engine only ever consumes the
//! sequential byte stream these traits expose.

/// Errors from storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// No object with the requested name
    NotFound,
    /// The medium reported a read failure
    Io,
    /// The stream ended before the expected amount of data
    UnexpectedEof,
    /// The medium is busy or another source is still open
    Busy,
}

/// Sequential byte stream
///
/// Each call to [`read_chunk`](ByteSource::read_chunk) fills the front of
/// `buf` and returns how many bytes were written. A return of `0` marks the
/// end of the stream.
pub trait ByteSource {
    /// Read the next chunk into `buf`
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Read until `buf` is full
    ///
    /// Fails with [`StorageError::UnexpectedEof`] if the stream ends first.
    fn read_exact(&mut self, mut buf: &mut [u8]) -> Result<(), StorageError> {
        while !buf.is_empty() {
            match self.read_chunk(buf)? {
                0 => return Err(StorageError::UnexpectedEof),
                n => buf = &mut buf[n..],
            }
        }
        Ok(())
    }

    /// Read and drop `count` bytes
    fn skip(&mut self, mut count: usize) -> Result<(), StorageError> {
        let mut scratch = [0u8; 32];
        while count > 0 {
            let want = count.min(scratch.len());
            self.read_exact(&mut scratch[..want])?;
            count -= want;
        }
        Ok(())
    }

    /// Release the underlying handle
    fn close(self) -> Result<(), StorageError>
    where
        Self: Sized,
    {
        Ok(())
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, StorageError> {
        S::read_chunk(self, buf)
    }
}

/// In-memory images (e.g. `include_bytes!`) are byte sources too
impl ByteSource for &[u8] {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, StorageError> {
        let n = buf.len().min(self.len());
        let (head, tail) = self.split_at(n);
        buf[..n].copy_from_slice(head);
        *self = tail;
        Ok(n)
    }
}

/// Named image storage
///
/// Opens byte sources by name. The storage medium, directory layout and
/// file system are entirely up to the implementation.
pub trait ImageStore {
    /// Byte source handed out by [`open`](ImageStore::open)
    type Source<'a>: ByteSource
    where
        Self: 'a;

    /// Open the image called `name`
    fn open(&mut self, name: &str) -> Result<Self::Source<'_>, StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Source that hands out at most `step` bytes per read
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl ByteSource for Trickle<'_> {
        fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, StorageError> {
            let n = buf.len().min(self.step).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_slice_source_reads_in_order() {
        let mut source: &[u8] = &[1, 2, 3, 4, 5];
        let mut buf = [0u8; 2];

        assert_eq!(source.read_chunk(&mut buf), Ok(2));
        assert_eq!(buf, [1, 2]);
        assert_eq!(source.read_chunk(&mut buf), Ok(2));
        assert_eq!(buf, [3, 4]);
        assert_eq!(source.read_chunk(&mut buf), Ok(1));
        assert_eq!(buf[0], 5);
        assert_eq!(source.read_chunk(&mut buf), Ok(0));
    }

    #[test]
    fn test_read_exact_across_short_reads() {
        let mut source = Trickle {
            data: &[9, 8, 7, 6, 5],
            step: 2,
        };
        let mut buf = [0u8; 5];
        source.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [9, 8, 7, 6, 5]);
    }

    #[test]
    fn test_read_exact_eof() {
        let mut source: &[u8] = &[1, 2];
        let mut buf = [0u8; 3];
        assert_eq!(
            source.read_exact(&mut buf),
            Err(StorageError::UnexpectedEof)
        );
    }

    #[test]
    fn test_skip() {
        let data = [0u8; 40];
        let mut tail = [0u8; 41];
        tail[..40].copy_from_slice(&data);
        tail[40] = 0xAB;

        let mut source: &[u8] = &tail;
        source.skip(40).unwrap();
        let mut one = [0u8; 1];
        source.read_exact(&mut one).unwrap();
        assert_eq!(one[0], 0xAB);
    }
}
