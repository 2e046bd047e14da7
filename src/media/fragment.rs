//! Media fragment type
//!
//! One WebSocket binary message carries exactly one fragment of fragmented
//! MP4 (an init segment or a `moof`+`mdat` pair). There are no boundaries
//! inside a message that this crate cares about.

use bytes::Bytes;

/// A single decodable unit of container data
///
/// Cheap to clone: the payload is reference-counted `Bytes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFragment {
    data: Bytes,
}

impl MediaFragment {
    /// Wrap a payload
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// Borrow the payload
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Take the payload
    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    /// Payload size in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<Bytes> for MediaFragment {
    fn from(data: Bytes) -> Self {
        Self::new(data)
    }
}

impl From<Vec<u8>> for MediaFragment {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl AsRef<[u8]> for MediaFragment {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_shares_payload() {
        let payload = Bytes::from_static(b"moofmdat");
        let fragment = MediaFragment::new(payload.clone());
        let copy = fragment.clone();

        assert_eq!(copy.len(), 8);
        assert_eq!(copy.data().as_ptr(), payload.as_ptr());
        assert_eq!(fragment.into_bytes(), payload);
    }

    #[test]
    fn test_empty_fragment() {
        let fragment = MediaFragment::from(Vec::new());
        assert!(fragment.is_empty());
        assert_eq!(fragment.as_ref(), b"");
    }
}
