//! Bounds-checked binary reader with cursor tracking.

use crate::BufferError;

/// A cursor over a borrowed byte slice.
///
/// Every read checks the remaining length first and reports
/// [`BufferError::EndOfBuffer`] instead of panicking; a failed read leaves the
/// cursor where it was. Multi-byte values are big-endian.
///
/// # Example
///
/// ```
/// use doc_element_buffers::Reader;
///
/// let data = [0x01, 0x02, 0x03, 0x04];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.try_u8(), Ok(0x01));
/// assert_eq!(reader.try_u16(), Ok(0x0203));
/// assert!(reader.try_u16().is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub data: &'a [u8],
    /// Offset of the next unread byte.
    pub pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Creates a reader positioned at offset `pos`.
    pub fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    /// Returns the number of bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Checks that `n` more bytes are available from the current cursor.
    #[inline]
    fn check(&self, n: usize) -> Result<(), BufferError> {
        match self.pos.checked_add(n) {
            Some(end) if end <= self.data.len() => Ok(()),
            _ => Err(BufferError::EndOfBuffer),
        }
    }

    #[inline]
    pub fn try_u8(&mut self) -> Result<u8, BufferError> {
        self.check(1)?;
        let val = self.data[self.pos];
        self.pos += 1;
        Ok(val)
    }

    #[inline]
    pub fn try_u16(&mut self) -> Result<u16, BufferError> {
        self.try_array().map(u16::from_be_bytes)
    }

    #[inline]
    pub fn try_u32(&mut self) -> Result<u32, BufferError> {
        self.try_array().map(u32::from_be_bytes)
    }

    /// Reads `N` raw bytes into an array.
    #[inline]
    pub fn try_array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        self.check(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    /// Advances the cursor by `size` bytes.
    pub fn try_skip(&mut self, size: usize) -> Result<(), BufferError> {
        self.check(size)?;
        self.pos += size;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian_integers() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.try_u16(), Ok(0x0102));
        assert_eq!(reader.try_u32(), Ok(0x0304_0506));
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn at_starts_from_offset() {
        let data = [0xaa, 0xbb, 0xcc];
        let mut reader = Reader::at(&data, 2);
        assert_eq!(reader.remaining(), 1);
        assert_eq!(reader.try_u8(), Ok(0xcc));
    }

    #[test]
    fn reads_stop_at_end() {
        let data = [0x01, 0x02, 0x03];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.try_u16(), Ok(0x0102));
        assert_eq!(reader.try_u32(), Err(BufferError::EndOfBuffer));
        // A failed read leaves the cursor where it was.
        assert_eq!(reader.pos, 2);
        assert_eq!(reader.try_u8(), Ok(0x03));
        assert_eq!(reader.try_u8(), Err(BufferError::EndOfBuffer));
    }

    #[test]
    fn skip_rejects_overflowing_lengths() {
        let data = [0u8; 4];
        let mut reader = Reader::at(&data, 1);
        assert_eq!(reader.try_skip(usize::MAX), Err(BufferError::EndOfBuffer));
        assert_eq!(reader.try_skip(3), Ok(()));
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn reads_fixed_width_arrays() {
        let data = [0x00, 0x00, 0x01, 0x00, 0x07];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.try_array::<4>().map(u32::from_be_bytes), Ok(256));
        assert_eq!(reader.try_array::<2>(), Err(BufferError::EndOfBuffer));
    }
}
