//! Scoped silencing of the process's standard error stream.
//!
//! Metadata providers may write diagnostics straight to fd 2. [`StderrGuard`]
//! points fd 2 at the null device for as long as it lives and puts the
//! original descriptor back when dropped, on every exit path.

#[cfg(unix)]
mod imp {
    use std::io;
    use std::os::fd::OwnedFd;

    use rustix::fs::{Mode, OFlags};

    pub(super) struct Saved(OwnedFd);

    pub(super) fn silence() -> io::Result<Saved> {
        let saved = rustix::io::dup(io::stderr())?;
        let null = rustix::fs::open("/dev/null", OFlags::WRONLY | OFlags::CLOEXEC, Mode::empty())?;
        rustix::stdio::dup2_stderr(&null)?;
        Ok(Saved(saved))
    }

    pub(super) fn restore(saved: &Saved) -> io::Result<()> {
        rustix::stdio::dup2_stderr(&saved.0)?;
        Ok(())
    }
}

#[cfg(not(unix))]
mod imp {
    use std::io;

    pub(super) struct Saved;

    pub(super) fn silence() -> io::Result<Saved> {
        Ok(Saved)
    }

    pub(super) fn restore(_saved: &Saved) -> io::Result<()> {
        Ok(())
    }
}

/// Redirects stderr to the null device until dropped.
pub struct StderrGuard {
    saved: imp::Saved,
}

impl StderrGuard {
    /// Silence stderr.
    ///
    /// # Errors
    ///
    /// Fails if the current descriptor cannot be duplicated or the null device
    /// cannot be opened; stderr is left untouched in that case.
    pub fn silence() -> std::io::Result<Self> {
        Ok(Self { saved: imp::silence()? })
    }

    /// Silence stderr when `enabled`, logging and continuing if that fails.
    pub fn maybe(enabled: bool) -> Option<Self> {
        if !enabled {
            return None;
        }
        match Self::silence() {
            Ok(guard) => Some(guard),
            Err(e) => {
                tracing::debug!("could not silence stderr: {e}");
                None
            }
        }
    }
}

impl Drop for StderrGuard {
    fn drop(&mut self) {
        // Nothing useful can be reported here: stderr is the thing being restored.
        let _ = imp::restore(&self.saved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Mutex, MutexGuard};

    // fd 2 is process-wide; guards from parallel tests must not interleave.
    static FD_LOCK: Mutex<()> = Mutex::new(());

    fn serial() -> MutexGuard<'static, ()> {
        FD_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn test_guard_restores_stderr() {
        let _serial = serial();
        {
            let _guard = StderrGuard::silence().unwrap();
            assert!(std::io::stderr().write_all(b"swallowed\n").is_ok());
        }
        assert!(std::io::stderr().write_all(b"").is_ok());
    }

    #[test]
    fn test_guard_restores_on_unwind() {
        let _serial = serial();
        let result = std::panic::catch_unwind(|| {
            let _guard = StderrGuard::silence().unwrap();
            panic!("provider blew up");
        });
        assert!(result.is_err());
        assert!(std::io::stderr().flush().is_ok());
    }

    #[test]
    fn test_maybe_disabled() {
        assert!(StderrGuard::maybe(false).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_fd_points_back_at_original() {
        use std::os::fd::AsRawFd;

        let _serial = serial();
        let before = rustix::fs::fstat(std::io::stderr()).unwrap();
        {
            let _guard = StderrGuard::silence().unwrap();
            let during = rustix::fs::fstat(std::io::stderr()).unwrap();
            let null = rustix::fs::stat("/dev/null").unwrap();
            assert_eq!((during.st_dev, during.st_ino), (null.st_dev, null.st_ino));
        }
        let after = rustix::fs::fstat(std::io::stderr()).unwrap();
        assert_eq!((before.st_dev, before.st_ino), (after.st_dev, after.st_ino));
        assert_eq!(std::io::stderr().as_raw_fd(), 2);
    }
}
