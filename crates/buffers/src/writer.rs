//! Growable byte writer.

/// Fixed-width values that can be written big-endian.
pub trait BigEndian: Copy {
    type Bytes: AsRef<[u8]>;

    fn be_bytes(self) -> Self::Bytes;
}

macro_rules! big_endian {
    ($($ty:ty),* $(,)?) => {
        $(
            impl BigEndian for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                #[inline]
                fn be_bytes(self) -> Self::Bytes {
                    self.to_be_bytes()
                }
            }
        )*
    };
}

big_endian!(i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// An append-only output buffer.
///
/// Numbers go through [`Writer::put`] (big-endian, width taken from the
/// type); [`Writer::tagged`] prefixes one with a tag byte, the shape of most
/// MessagePack headers.
///
/// # Example
///
/// ```
/// use doc_element_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.byte(0x01);
/// writer.put(0x0203u16);
/// writer.tagged(0xce, 7u32);
/// assert_eq!(writer.flush(), [0x01, 0x02, 0x03, 0xce, 0, 0, 0, 7]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Writer {
    out: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands back everything written so far and starts over empty.
    pub fn flush(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.out)
    }

    #[inline]
    pub fn byte(&mut self, byte: u8) {
        self.out.push(byte);
    }

    #[inline]
    pub fn bytes(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(bytes);
    }

    /// Appends the UTF-8 bytes of `s`; returns how many were written.
    pub fn str(&mut self, s: &str) -> usize {
        self.bytes(s.as_bytes());
        s.len()
    }

    #[inline]
    pub fn put<T: BigEndian>(&mut self, value: T) {
        self.bytes(value.be_bytes().as_ref());
    }

    /// Writes `tag` and then `value`.
    #[inline]
    pub fn tagged<T: BigEndian>(&mut self, tag: u8, value: T) {
        self.byte(tag);
        self.put(value);
    }
}
