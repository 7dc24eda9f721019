//! Untyped heap buffers owned by registry slots.
//!
//! A `RawBuf` is one allocation from the platform allocator together with
//! its length. Only registry slots hold these, so every tracked
//! allocation is released through the registry and nowhere else.

use std::alloc::{alloc, alloc_zeroed, dealloc, realloc, Layout};
use std::ptr::NonNull;

/// Fill pattern written over released buffers under the `debug` feature,
/// so use-after-release reads something recognizable.
#[cfg(feature = "debug")]
pub(crate) const RELEASED_PATTERN: u8 = 0xDD;

pub(crate) struct RawBuf {
    ptr: NonNull<u8>,
    size: usize,
}

// SAFETY: a RawBuf exclusively owns its allocation; moving it between
// threads transfers that ownership.
unsafe impl Send for RawBuf {}

impl RawBuf {
    /// Allocate a buffer holding a copy of `bytes`.
    ///
    /// Empty input produces a zero-size buffer that owns no allocation.
    /// Returns `None` when the platform allocator refuses.
    pub fn with_copy_of(bytes: &[u8]) -> Option<Self> {
        if bytes.is_empty() {
            return Some(Self {
                ptr: NonNull::dangling(),
                size: 0,
            });
        }

        let layout = Layout::from_size_align(bytes.len(), 1).ok()?;
        // SAFETY: the layout has non-zero size.
        let raw = unsafe { alloc(layout) };
        let ptr = NonNull::new(raw)?;
        // SAFETY: `ptr` is a fresh allocation of `bytes.len()` bytes and
        // cannot overlap the source slice.
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.as_ptr(), bytes.len());
        }
        Some(Self {
            ptr,
            size: bytes.len(),
        })
    }

    /// Size of the buffer in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Address of the underlying allocation. Zero-size buffers report the
    /// dangling sentinel.
    pub fn addr(&self) -> usize {
        self.ptr.as_ptr() as usize
    }

    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: `ptr` is valid for `size` bytes for the lifetime of
        // `self`; a zero-size slice may use the dangling pointer.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.size) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as in `as_slice`, plus exclusivity through `&mut self`.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.size) }
    }

    /// Grow-or-move reallocation to `new_size` bytes (which must not be 0;
    /// zero-size resize is handled as a release before reaching here).
    ///
    /// Bytes past the old size read as zero after a grow. On failure the
    /// buffer is untouched and remains valid.
    pub fn resize(&mut self, new_size: usize) -> bool {
        if new_size == self.size {
            return true;
        }
        if new_size == 0 {
            return false;
        }

        if self.size == 0 {
            let layout = match Layout::from_size_align(new_size, 1) {
                Ok(layout) => layout,
                Err(_) => return false,
            };
            // SAFETY: the layout has non-zero size.
            let raw = unsafe { alloc_zeroed(layout) };
            match NonNull::new(raw) {
                Some(ptr) => {
                    self.ptr = ptr;
                    self.size = new_size;
                    true
                }
                None => false,
            }
        } else {
            let layout = match Layout::from_size_align(self.size, 1) {
                Ok(layout) => layout,
                Err(_) => return false,
            };
            // SAFETY: `ptr` was allocated with `layout` and `new_size` is
            // non-zero.
            let raw = unsafe { realloc(self.ptr.as_ptr(), layout, new_size) };
            let ptr = match NonNull::new(raw) {
                Some(ptr) => ptr,
                None => return false,
            };
            if new_size > self.size {
                // SAFETY: the grown tail belongs to us and is uninitialized.
                unsafe {
                    std::ptr::write_bytes(ptr.as_ptr().add(self.size), 0, new_size - self.size);
                }
            }
            self.ptr = ptr;
            self.size = new_size;
            true
        }
    }
}

impl Drop for RawBuf {
    fn drop(&mut self) {
        if self.size == 0 {
            return;
        }

        #[cfg(feature = "debug")]
        // SAFETY: the buffer is still live here.
        unsafe {
            std::ptr::write_bytes(self.ptr.as_ptr(), RELEASED_PATTERN, self.size);
        }

        let layout = Layout::from_size_align(self.size, 1)
            .expect("layout was valid when the buffer was allocated");
        // SAFETY: `ptr` was allocated with exactly this layout.
        unsafe { dealloc(self.ptr.as_ptr(), layout) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_roundtrip() {
        let buf = RawBuf::with_copy_of(b"hello").unwrap();
        assert_eq!(buf.size(), 5);
        assert_eq!(buf.as_slice(), b"hello");
    }

    #[test]
    fn test_empty_buffer() {
        let buf = RawBuf::with_copy_of(b"").unwrap();
        assert_eq!(buf.size(), 0);
        assert!(buf.as_slice().is_empty());
    }

    #[test]
    fn test_grow_preserves_prefix_and_zeroes_tail() {
        let mut buf = RawBuf::with_copy_of(b"abc").unwrap();
        assert!(buf.resize(8));
        assert_eq!(&buf.as_slice()[..3], b"abc");
        assert_eq!(&buf.as_slice()[3..], &[0u8; 5]);
    }

    #[test]
    fn test_shrink_preserves_prefix() {
        let mut buf = RawBuf::with_copy_of(b"abcdef").unwrap();
        assert!(buf.resize(2));
        assert_eq!(buf.as_slice(), b"ab");
    }

    #[test]
    fn test_grow_from_empty() {
        let mut buf = RawBuf::with_copy_of(b"").unwrap();
        assert!(buf.resize(4));
        assert_eq!(buf.as_slice(), &[0u8; 4]);
    }

    #[test]
    fn test_mutation_through_slice() {
        let mut buf = RawBuf::with_copy_of(b"abcd").unwrap();
        buf.as_mut_slice()[0] = b'z';
        assert_eq!(buf.as_slice(), b"zbcd");
    }
}
