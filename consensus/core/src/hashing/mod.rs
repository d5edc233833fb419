use overlay_hashes::HasherBase;

pub mod tx;

pub trait HasherExtensions {
    /// Writes the value using the variable length `CompactSize` encoding
    fn write_var_int(&mut self, value: u64) -> &mut Self;

    /// Writes the len as a `CompactSize` var int
    fn write_len(&mut self, len: usize) -> &mut Self;

    /// Writes a single u8
    fn write_u8(&mut self, element: u8) -> &mut Self;

    /// Writes the u32 as a little endian u8 array
    fn write_u32(&mut self, element: u32) -> &mut Self;

    /// Writes the u64 as a little endian u8 array
    fn write_u64(&mut self, element: u64) -> &mut Self;

    /// Writes the number of bytes followed by the bytes themselves
    fn write_var_bytes(&mut self, bytes: &[u8]) -> &mut Self;
}

/// Fails at compile time if `usize::MAX > u64::MAX`.
/// If `usize` will ever grow larger than `u64`, we need to verify
/// that the lossy conversion below at `write_len` remains precise.
const _: usize = u64::MAX as usize - usize::MAX;

impl<T: HasherBase> HasherExtensions for T {
    fn write_var_int(&mut self, value: u64) -> &mut Self {
        match value {
            0..=0xfc => self.update([value as u8]),
            0xfd..=0xffff => self.update([0xfd]).update((value as u16).to_le_bytes()),
            0x1_0000..=0xffff_ffff => self.update([0xfe]).update((value as u32).to_le_bytes()),
            _ => self.update([0xff]).update(value.to_le_bytes()),
        }
    }

    #[inline(always)]
    fn write_len(&mut self, len: usize) -> &mut Self {
        self.write_var_int(len as u64)
    }

    #[inline(always)]
    fn write_u8(&mut self, element: u8) -> &mut Self {
        self.update([element])
    }

    #[inline(always)]
    fn write_u32(&mut self, element: u32) -> &mut Self {
        self.update(element.to_le_bytes())
    }

    #[inline(always)]
    fn write_u64(&mut self, element: u64) -> &mut Self {
        self.update(element.to_le_bytes())
    }

    #[inline(always)]
    fn write_var_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.write_len(bytes.len()).update(bytes)
    }
}

/// Collects written bytes, so the serializers used for hashing also produce wire encodings.
#[derive(Clone, Debug, Default)]
pub struct ByteWriter(Vec<u8>);

impl ByteWriter {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl HasherBase for ByteWriter {
    fn update<A: AsRef<[u8]>>(&mut self, data: A) -> &mut Self {
        self.0.extend_from_slice(data.as_ref());
        self
    }
}
