use super::{InterruptFlags, InterruptSource};

/// Iterator over the sources set in a mask, highest priority first.
///
/// Created by [`InterruptFlags::sources`]. The mask is captured up front, so
/// acknowledging a source while iterating does not change what is yielded.
#[derive(Clone, Debug)]
pub struct PendingSources {
    remaining: InterruptFlags,
}

impl PendingSources {
    pub(super) fn new(mask: InterruptFlags) -> Self {
        Self { remaining: mask }
    }
}

impl Iterator for PendingSources {
    type Item = InterruptSource;

    fn next(&mut self) -> Option<InterruptSource> {
        let source = InterruptSource::ALL
            .into_iter()
            .find(|source| self.remaining.contains(source.flag()))?;
        self.remaining.remove(source.flag());
        Some(source)
    }
}
