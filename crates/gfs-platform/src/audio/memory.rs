use crate::error::AudioError;

/// Byte storage behind an in-process audio ring.
///
/// Shared by the device implementations; it only knows how to hand out
/// wrapped regions.
#[derive(Debug, Clone)]
pub struct MemoryRing {
    bytes: Vec<u8>,
}

impl MemoryRing {
    /// A silent ring of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: vec![0; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Splits `len` bytes at `offset` into (tail, head) regions and passes
    /// them to `write`.
    ///
    /// Fails when `offset` is outside the ring or `len` exceeds its capacity.
    pub fn lock(
        &mut self,
        offset: usize,
        len: usize,
        write: &mut dyn FnMut(&mut [u8], &mut [u8]),
    ) -> Result<(), AudioError> {
        let capacity = self.bytes.len();
        if len > capacity || (offset >= capacity && len > 0) {
            return Err(AudioError::LockFailure { offset, len });
        }
        if len == 0 {
            write(&mut [], &mut []);
            return Ok(());
        }

        let first_len = len.min(capacity - offset);
        let second_len = len - first_len;

        // second_len <= offset because len <= capacity.
        let (head, tail) = self.bytes.split_at_mut(offset);
        write(&mut tail[..first_len], &mut head[..second_len]);
        Ok(())
    }
}
