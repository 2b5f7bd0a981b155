//! POSIX shared-memory plumbing for the counter cell.
//!
//! A [`Mapping`] owns one `mmap`-ed region exactly large enough for a single
//! `AtomicI64`. Named mappings use `shm_open` with create-or-attach semantics;
//! anonymous mappings back process-private counters (tests, embedders).
//!
//! The create/attach dance:
//! 1. `shm_open(O_CREAT | O_EXCL)` — winner creates the segment.
//! 2. On `EEXIST`, reopen without `O_EXCL` — attacher reuses it.
//! 3. `ftruncate` to the cell size on *both* paths. Growing a fresh segment
//!    zero-fills it (the counter starts at 0); truncating an already-sized
//!    segment is a no-op and preserves the current value. This also closes the
//!    window where an attacher maps a raced, still-zero-length segment.

use std::ffi::c_void;
use std::mem;
use std::num::NonZeroUsize;
use std::ptr::NonNull;
use std::sync::atomic::AtomicI64;

use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::mman::{mmap, mmap_anonymous, munmap, shm_open, shm_unlink, MapFlags, ProtFlags};
use nix::sys::stat::Mode;
use nix::unistd::ftruncate;

use crate::error::SegmentError;

/// Size of the mapped region: one atomic counter cell.
const SEGMENT_LEN: NonZeroUsize = match NonZeroUsize::new(mem::size_of::<AtomicI64>()) {
    Some(n) => n,
    None => unreachable!(),
};

/// One mapped shared-memory region holding the counter cell.
pub(crate) struct Mapping {
    ptr: NonNull<c_void>,
    len: NonZeroUsize,
    created: bool,
}

// The region is only ever accessed through the `AtomicI64` at its base.
unsafe impl Send for Mapping {}
unsafe impl Sync for Mapping {}

impl Mapping {
    /// Creates or attaches the named segment and maps it.
    pub(crate) fn open_named(name: &str) -> Result<Self, SegmentError> {
        let (fd, created) = match shm_open(
            name,
            OFlag::O_CREAT | OFlag::O_EXCL | OFlag::O_RDWR,
            Mode::from_bits_truncate(0o666),
        ) {
            Ok(fd) => (fd, true),
            Err(Errno::EEXIST) => {
                let fd = shm_open(name, OFlag::O_RDWR, Mode::empty()).map_err(|source| {
                    SegmentError::Attach {
                        name: name.to_string(),
                        source,
                    }
                })?;
                (fd, false)
            }
            Err(source) => {
                return Err(SegmentError::Create {
                    name: name.to_string(),
                    source,
                })
            }
        };

        ftruncate(&fd, SEGMENT_LEN.get() as _).map_err(|source| SegmentError::Resize {
            name: name.to_string(),
            source,
        })?;

        let ptr = unsafe {
            mmap(
                None,
                SEGMENT_LEN,
                ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
                MapFlags::MAP_SHARED,
                &fd,
                0,
            )
        }
        .map_err(|source| SegmentError::Map {
            name: name.to_string(),
            source,
        })?;

        Ok(Self {
            ptr,
            len: SEGMENT_LEN,
            created,
        })
    }

    /// Maps a process-private anonymous region (zero-filled).
    pub(crate) fn open_anonymous() -> Result<Self, SegmentError> {
        let ptr = unsafe {
            mmap_anonymous(
                None,
                SEGMENT_LEN,
                ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
                MapFlags::MAP_SHARED,
            )
        }
        .map_err(|source| SegmentError::Map {
            name: String::new(),
            source,
        })?;

        Ok(Self {
            ptr,
            len: SEGMENT_LEN,
            created: true,
        })
    }

    /// True if this mapping created the segment (as opposed to attaching).
    pub(crate) fn created(&self) -> bool {
        self.created
    }

    /// The atomic cell at the base of the region.
    pub(crate) fn cell(&self) -> &AtomicI64 {
        // The region is live for `self`'s lifetime, page-aligned, and at least
        // one cell long.
        unsafe { self.ptr.cast::<AtomicI64>().as_ref() }
    }
}

impl Drop for Mapping {
    fn drop(&mut self) {
        // The segment itself outlives the mapping; only the view goes away.
        let _ = unsafe { munmap(self.ptr, self.len.get()) };
    }
}

/// Removes a named segment from the system.
///
/// Live mappings stay valid; the name becomes available for a fresh segment.
pub(crate) fn unlink_named(name: &str) -> std::io::Result<()> {
    shm_unlink(name).map_err(|errno| std::io::Error::from_raw_os_error(errno as i32))
}
