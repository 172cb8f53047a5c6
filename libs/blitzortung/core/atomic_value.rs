use parking_lot::RwLock;

/// Shared slot that is only ever replaced wholesale
///
/// Readers get a clone of the stored value, writers replace it in one step, so
/// nobody can observe a half-updated value or hold on to the slot itself.
#[derive(Debug, Default)]
pub struct AtomicValue<T: Clone> {
    inner: RwLock<T>,
}

impl<T: Clone> AtomicValue<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: RwLock::new(value),
        }
    }

    #[inline]
    pub fn load(&self) -> T {
        self.inner.read().clone()
    }

    #[inline]
    pub fn store(&self, value: T) {
        *self.inner.write() = value;
    }
}
