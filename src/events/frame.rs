//! Fragment reassembly

/// A piece of an inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub data: Vec<u8>,
    /// Last fragment of the message
    pub is_final: bool,
}

impl Fragment {
    /// A whole message in a single fragment
    pub fn whole(data: impl Into<Vec<u8>>) -> Self {
        Fragment {
            data: data.into(),
            is_final: true,
        }
    }

    /// A non-final piece of a larger message
    pub fn partial(data: impl Into<Vec<u8>>) -> Self {
        Fragment {
            data: data.into(),
            is_final: false,
        }
    }
}

/// Joins fragments until the final one arrives
///
/// Nothing is handed out before the final fragment, so callers never parse
/// partial data.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    buffer: Vec<u8>,
}

impl FrameAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fragment; returns the complete message once `is_final` is seen
    pub fn push(&mut self, fragment: Fragment) -> Option<Vec<u8>> {
        if fragment.is_final && self.buffer.is_empty() {
            return Some(fragment.data);
        }

        self.buffer.extend_from_slice(&fragment.data);
        if fragment.is_final {
            Some(std::mem::take(&mut self.buffer))
        } else {
            None
        }
    }

    /// Bytes buffered for the message in progress
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}
