//! Secure buffer arena: recyclable scratch buffers with guaranteed erasure.
//!
//! Sensitive intermediates (the one-time authenticator key, raw keystream)
//! live inside the padded working buffers of the secret-box construction
//! alongside the plaintext. A wipe therefore always acts on a buffer's whole
//! backing allocation, even when the caller only holds a narrowed view into
//! its tail; views keep their backing buffer precisely so the arena can
//! reach every byte.
//!
//! All arena methods take `&mut self`, so the recycle set is data-race-free
//! by construction. The arena is `Send`; callers that want to share one
//! across threads must serialize access externally (e.g. a `Mutex`), or use
//! one arena per thread of control.

use zeroize::Zeroize;

/// A window into an owned byte buffer.
///
/// Dereferences to the meaningful region only; the backing buffer, hidden
/// padding prefix included, stays reachable through [`BufferView::padded`]
/// so a wipe can erase every byte. The view is invalidated by returning it
/// to the arena ([`SecureArena::wipe`] or [`SecureArena::recycle`]).
///
/// Dropping a view without returning it zeroizes the backing buffer, but the
/// storage is lost to the pool; explicit wiping is the intended lifecycle.
pub struct BufferView {
    bytes: Vec<u8>,
    offset: usize,
}

impl BufferView {
    fn new(bytes: Vec<u8>, offset: usize) -> Self {
        debug_assert!(offset <= bytes.len());
        Self { bytes, offset }
    }

    /// Length of the visible window in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len() - self.offset
    }

    /// Whether the visible window is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The full backing buffer, hidden padding included.
    #[must_use]
    pub fn padded(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of hidden padding bytes in front of the visible window.
    #[must_use]
    pub fn pad_len(&self) -> usize {
        self.offset
    }

    /// Full backing buffer, mutable. The construction writes through this;
    /// the window only narrows what callers see.
    pub(crate) fn backing_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Re-anchor the visible window at `offset`.
    pub(crate) fn with_offset(mut self, offset: usize) -> Self {
        debug_assert!(offset <= self.bytes.len());
        self.offset = offset;
        self
    }

    /// Surrender the backing buffer to the arena.
    fn into_bytes(mut self) -> Vec<u8> {
        std::mem::take(&mut self.bytes)
    }
}

impl std::ops::Deref for BufferView {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes[self.offset..]
    }
}

impl AsRef<[u8]> for BufferView {
    fn as_ref(&self) -> &[u8] {
        self
    }
}

impl Zeroize for BufferView {
    /// Zeroizes the full backing buffer, not just the visible window. The
    /// window stays readable (as zeros) afterwards.
    fn zeroize(&mut self) {
        self.bytes.as_mut_slice().zeroize();
    }
}

impl Drop for BufferView {
    fn drop(&mut self) {
        self.bytes.as_mut_slice().zeroize();
    }
}

/// Allocates zero-initialized scratch buffers, preferring recycled storage
/// over fresh allocation, and erases them on demand.
///
/// A buffer is exclusively owned by at most one [`BufferView`] between
/// allocation and the moment it is wiped or recycled; the pool never holds a
/// buffer that a caller can still reach.
#[derive(Default)]
pub struct SecureArena {
    pool: Vec<Vec<u8>>,
}

impl SecureArena {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self { pool: Vec::new() }
    }

    /// Allocate a zero-initialized buffer of exactly `len` bytes.
    ///
    /// The smallest adequate recycled buffer is reused when one is available;
    /// reuse never skips re-zeroing.
    pub fn allocate(&mut self, len: usize) -> BufferView {
        BufferView::new(self.take_zeroed(len), 0)
    }

    /// Erase the view's full backing storage and return it to the pool.
    ///
    /// Every byte of the backing allocation, hidden padding included, is
    /// overwritten with zero; the write cannot be elided even though the
    /// buffer looks dead to the optimizer.
    pub fn wipe(&mut self, view: BufferView) {
        let mut bytes = view.into_bytes();
        bytes.as_mut_slice().zeroize();
        self.pool.push(bytes);
    }

    /// Erase several views in one call.
    pub fn wipe_all<I>(&mut self, views: I)
    where
        I: IntoIterator<Item = BufferView>,
    {
        for view in views {
            self.wipe(view);
        }
    }

    /// Return a buffer to the pool without erasing it.
    ///
    /// The contents stay resident until the buffer is reused (which re-zeroes
    /// it) or [`SecureArena::wipe_recycled`] runs. Prefer
    /// [`SecureArena::wipe`] for buffers that carried secrets.
    pub fn recycle(&mut self, view: BufferView) {
        self.pool.push(view.into_bytes());
    }

    /// Erase and release every buffer currently held for reuse.
    pub fn wipe_recycled(&mut self) {
        for bytes in &mut self.pool {
            bytes.zeroize();
        }
        self.pool.clear();
    }

    /// Number of buffers currently held for reuse.
    #[must_use]
    pub fn recycled_len(&self) -> usize {
        self.pool.len()
    }

    fn take_zeroed(&mut self, len: usize) -> Vec<u8> {
        let mut best: Option<(usize, usize)> = None;
        for (i, buf) in self.pool.iter().enumerate() {
            let cap = buf.capacity();
            if cap >= len && best.is_none_or(|(_, best_cap)| cap < best_cap) {
                best = Some((i, cap));
            }
        }

        match best {
            Some((i, _)) => {
                let mut bytes = self.pool.swap_remove(i);
                bytes.as_mut_slice().zeroize();
                bytes.clear();
                bytes.resize(len, 0);
                bytes
            }
            None => vec![0u8; len],
        }
    }
}
