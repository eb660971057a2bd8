/// A trailing-edge debounce slot.
///
/// Every `schedule` replaces the pending value and pushes the deadline out; only the last
/// value survives to `take_due`. Time is supplied by the caller.
#[derive(Clone, Debug)]
pub(crate) struct Debounce<T> {
    pending: Option<(T, u64)>,
}

impl<T> Default for Debounce<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> Debounce<T> {
    pub(crate) fn schedule(&mut self, value: T, now_ms: u64, delay_ms: u64) {
        self.pending = Some((value, now_ms.saturating_add(delay_ms)));
    }

    pub(crate) fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(v, _)| v)
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub(crate) fn due_ms(&self) -> Option<u64> {
        self.pending.as_ref().map(|(_, due)| *due)
    }

    pub(crate) fn take_due(&mut self, now_ms: u64) -> Option<T> {
        match self.pending {
            Some((_, due)) if now_ms >= due => self.cancel(),
            _ => None,
        }
    }
}
