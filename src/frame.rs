//! Raw radio frames
//!
//! A frame is one opaque message exchanged with the upper protocol layer.
//! Framing and encoding of its contents are the upper layer's business.

use heapless::Vec;

/// Maximum payload length of a single frame in bytes
pub const MAX_FRAME_LEN: usize = 32;

/// One received or transmitted radio message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    payload: Vec<u8, MAX_FRAME_LEN>,
}

impl Frame {
    /// Create an empty frame
    pub const fn new() -> Self {
        Self {
            payload: Vec::new(),
        }
    }

    /// Create a frame holding a copy of `data`
    ///
    /// Returns `None` when `data` is longer than [`MAX_FRAME_LEN`].
    pub fn from_slice(data: &[u8]) -> Option<Self> {
        let payload = Vec::from_slice(data).ok()?;
        Some(Self { payload })
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the frame carries no payload
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Payload bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.payload
    }

    /// Let `read` write the payload directly into the frame storage.
    ///
    /// `read` receives a buffer of [`MAX_FRAME_LEN`] bytes and returns how
    /// many of them it produced; larger counts are capped. On error the
    /// frame is left empty.
    pub fn fill<E, F>(&mut self, read: F) -> Result<usize, E>
    where
        F: FnOnce(&mut [u8]) -> Result<usize, E>,
    {
        self.payload.clear();
        // Cannot fail, the new length equals the capacity
        let _ = self.payload.resize_default(MAX_FRAME_LEN);
        match read(&mut self.payload[..]) {
            Ok(len) => {
                let len = len.min(MAX_FRAME_LEN);
                self.payload.truncate(len);
                Ok(len)
            }
            Err(e) => {
                self.payload.clear();
                Err(e)
            }
        }
    }

    /// Copy the payload into `buffer`, returning the number of bytes copied
    pub fn copy_to(&self, buffer: &mut [u8]) -> usize {
        let len = self.payload.len().min(buffer.len());
        buffer[..len].copy_from_slice(&self.payload[..len]);
        len
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_limits() {
        assert!(Frame::from_slice(&[0xAA; MAX_FRAME_LEN]).is_some());
        assert!(Frame::from_slice(&[0xAA; MAX_FRAME_LEN + 1]).is_none());
        assert!(Frame::from_slice(b"").unwrap().is_empty());
    }

    #[test]
    fn test_fill_caps_length() {
        let mut frame = Frame::new();
        let len: Result<usize, ()> = frame.fill(|buf| {
            assert_eq!(buf.len(), MAX_FRAME_LEN);
            buf.fill(0x42);
            Ok(MAX_FRAME_LEN + 10)
        });
        assert_eq!(len, Ok(MAX_FRAME_LEN));
        assert_eq!(frame.as_slice(), &[0x42; MAX_FRAME_LEN]);
    }

    #[test]
    fn test_fill_error_leaves_frame_empty() {
        let mut frame = Frame::from_slice(b"stale").unwrap();
        let result = frame.fill(|_| Err::<usize, _>("bus"));
        assert_eq!(result, Err("bus"));
        assert!(frame.is_empty());
    }

    #[test]
    fn test_copy_to_short_buffer() {
        let frame = Frame::from_slice(b"abcdef").unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(frame.copy_to(&mut buf), 4);
        assert_eq!(&buf, b"abcd");
    }
}
