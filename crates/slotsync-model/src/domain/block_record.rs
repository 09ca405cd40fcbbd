/// Opaque block data produced by the resolver for one slot.
///
/// The content is never interpreted. Trailing newlines of the captured output are dropped on
/// construction and exactly one is added back when the record is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockRecord(Vec<u8>);

impl BlockRecord {
    /// Build a record from raw resolver stdout.
    pub fn from_stdout(mut raw: Vec<u8>) -> Self {
        while raw.last() == Some(&b'\n') {
            raw.pop();
        }
        Self(raw)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bytes written to `block_<slot>.json`: the record followed by a single newline.
    pub fn to_file_contents(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.0.len() + 1);
        out.extend_from_slice(&self.0);
        out.push(b'\n');
        out
    }
}

impl From<&str> for BlockRecord {
    fn from(value: &str) -> Self {
        Self::from_stdout(value.as_bytes().to_vec())
    }
}
