//! The seam between the VM and the operating system.
//!
//! Everything the VM wants from the host funnels through [`Host`]: the raw
//! syscall gateway behind the SYSCALL bridge, and the futex pair the FORK
//! handshake parks on. [`LinuxHost`] is the production implementation;
//! tests substitute a recording double. This module is the only place the
//! crate touches `unsafe`.

#![allow(unsafe_code)]

use std::ptr;
use std::sync::atomic::AtomicU32;

/// Host services consumed by the interpreter.
///
/// Implementations are cloned into forked guest threads, so they must be
/// cheap handles.
pub trait Host: Clone + Send + 'static {
    /// Issue host syscall `no` with up to four arguments, returning the
    /// raw (possibly negative) result.
    fn syscall(&self, no: i64, args: [u64; 4]) -> i64;

    /// Park until `word` no longer holds `expected`. Spurious wakeups are
    /// permitted; callers re-check and re-wait.
    fn futex_wait(&self, word: &AtomicU32, expected: u32) {
        futex_wait(word, expected);
    }

    /// Wake at most one waiter parked on `word`.
    fn futex_wake(&self, word: &AtomicU32) {
        futex_wake(word);
    }
}

/// Host backed by direct Linux syscalls.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinuxHost;

impl Host for LinuxHost {
    fn syscall(&self, no: i64, args: [u64; 4]) -> i64 {
        // Safety: pointer arguments were rebased into the VM memory region
        // by the bridge; the remaining arguments are plain words. The
        // curated table passes at most four arguments.
        let ret = unsafe {
            libc::syscall(
                no as libc::c_long,
                args[0],
                args[1],
                args[2],
                args[3],
            )
        };
        if ret == -1 {
            // The guest ABI carries the kernel convention: a negative errno
            // in the return value, not the libc -1/errno split.
            let errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
            return -i64::from(errno);
        }
        ret as i64
    }
}

/// FUTEX_WAIT on `word` while it holds `expected`. Returns on wake, on a
/// signal, or immediately when the word already changed.
pub fn futex_wait(word: &AtomicU32, expected: u32) {
    // Safety: the word outlives the call and the kernel compares-and-sleeps
    // atomically; a stale `expected` just returns EAGAIN.
    unsafe {
        libc::syscall(
            libc::SYS_futex,
            word.as_ptr(),
            libc::FUTEX_WAIT,
            expected,
            ptr::null::<libc::timespec>(),
        );
    }
}

/// FUTEX_WAKE one waiter parked on `word`.
pub fn futex_wake(word: &AtomicU32) {
    // Safety: the word outlives the call; waking nobody is harmless.
    unsafe {
        libc::syscall(libc::SYS_futex, word.as_ptr(), libc::FUTEX_WAKE, 1u32);
    }
}
