use core::fmt;

/// Curated guest syscall numbers.
///
/// Two-nibble codes: the high nibble selects a family (1 = process and
/// time, 2 = file I/O, 3 = watches and futexes), the low nibble the
/// operation. Arguments travel in `F0..F3`; the bridge rewrites pointer
/// arguments into host addresses. Codes outside this set pass through to
/// the host untranslated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum Syscall {
    /// nanosleep on a guest timespec at `F0`.
    Sleep = 0x10,
    /// getpid.
    Getpid = 0x11,
    /// getppid.
    Getppid = 0x12,
    /// kill(`F0`, `F1`).
    Kill = 0x13,
    /// gettimeofday into a guest buffer at `F0`.
    Tod = 0x14,
    /// open(path at `F0`, flags `F1`).
    Open = 0x20,
    /// read(fd `F0`, guest buffer `F1`, count `F2`).
    Read = 0x21,
    /// write(fd `F0`, guest buffer `F1`, count `F2`).
    Write = 0x22,
    /// close(fd `F0`).
    Close = 0x23,
    /// lseek(fd `F0`, offset `F1`, whence `F2`).
    Lseek = 0x24,
    /// inotify_init.
    InotifyInit = 0x30,
    /// inotify_add_watch(fd `F0`, path at `F1`, mask `F2`).
    InotifyAddWatch = 0x31,
    /// inotify_rm_watch(fd `F0`, wd `F1`).
    InotifyRmWatch = 0x32,
    /// futex(word at `F0`, op `F1`, val `F2`, timeout at `F3`).
    Futex = 0x33,
}

impl TryFrom<u32> for Syscall {
    /// Unmapped codes are handed back for passthrough.
    type Error = u32;

    fn try_from(code: u32) -> Result<Self, u32> {
        use Syscall::*;
        Ok(match code {
            0x10 => Sleep,
            0x11 => Getpid,
            0x12 => Getppid,
            0x13 => Kill,
            0x14 => Tod,
            0x20 => Open,
            0x21 => Read,
            0x22 => Write,
            0x23 => Close,
            0x24 => Lseek,
            0x30 => InotifyInit,
            0x31 => InotifyAddWatch,
            0x32 => InotifyRmWatch,
            0x33 => Futex,
            other => return Err(other),
        })
    }
}

impl fmt::Display for Syscall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn u32_round_trip() {
        for call in Syscall::iter() {
            assert_eq!(Syscall::try_from(call as u32), Ok(call));
        }
        assert_eq!(Syscall::try_from(0x15), Err(0x15));
        assert_eq!(Syscall::try_from(0x77), Err(0x77));
    }
}
