/// Options for the boundary operations.
#[derive(Debug, Clone)]
pub struct Options {
    /// The number of slices a computation result is split into before garbling.
    pub(crate) slice_count: usize,
}

impl Options {
    /// Create a new `Options` instance with the default values.
    pub fn new() -> Self {
        Self { slice_count: 2 }
    }

    /// Set the number of slices the payload is split into.
    ///
    /// Must be at least 2 and a power of two, and every slice must come out as a multiple of
    /// 32 bytes. A computation result is 64 bytes, so only 2 is useful there.
    ///
    /// Default: 2.
    pub fn slice_count(&mut self, slice_count: usize) {
        self.slice_count = slice_count;
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}
