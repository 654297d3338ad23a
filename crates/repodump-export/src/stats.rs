/// Statistics from an export run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Object elements written, inline ones included.
    pub objects: usize,
    /// Non-retrievable objects embedded inline.
    pub inline_objects: usize,
    /// Content files written.
    pub content_files: usize,
    /// Properties whose values could not be read completely.
    pub property_failures: usize,
    /// Dump requests for objects that were already exported.
    pub duplicate_dumps: usize,
    /// Queued references that no longer resolve.
    pub fetch_misses: usize,
    /// Queued references whose fetch failed for another reason.
    pub fetch_failures: usize,
    /// Classes whose subclasses or declared properties could not be listed.
    pub listing_failures: usize,
}

impl ExportStats {
    /// Check if the run finished without any recoverable error.
    pub fn is_clean(&self) -> bool {
        self.property_failures == 0
            && self.duplicate_dumps == 0
            && self.fetch_misses == 0
            && self.fetch_failures == 0
            && self.listing_failures == 0
    }
}

/// Progress reported after each top-level object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportProgress {
    /// Objects exported so far.
    pub exported: usize,
    /// Objects waiting in the pending queue.
    pub pending: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_stats() {
        let mut stats = ExportStats {
            objects: 10,
            content_files: 2,
            ..Default::default()
        };
        assert!(stats.is_clean());
        stats.fetch_misses = 1;
        assert!(!stats.is_clean());
    }
}
