//! OS-level cleanup of written outputs.
//!
//! Extended attributes and timestamps live outside the file body, so the
//! re-encode step cannot touch them. Both passes here are best-effort:
//! a failure leaves the output image intact and the task successful.

use filetime::FileTime;
use std::path::Path;
use tracing::debug;

/// Clear extended file attributes via the system `xattr` utility.
///
/// POSIX hosts only; elsewhere this is a no-op. A missing utility or a
/// non-zero exit is swallowed.
pub fn clear_xattrs(path: &Path) {
    #[cfg(unix)]
    {
        use std::process::Command;

        match Command::new("xattr").arg("-c").arg(path).output() {
            Ok(output) if !output.status.success() => {
                debug!("xattr -c exited nonzero for {}", path.display());
            }
            Err(e) => {
                debug!("xattr utility unavailable for {}: {}", path.display(), e);
            }
            _ => {}
        }
    }

    #[cfg(not(unix))]
    {
        let _ = path;
    }
}

/// Reset access and modification times to the epoch origin.
///
/// Leaves no trace of when the sanitized copy was produced. Failure is
/// swallowed.
pub fn reset_timestamps(path: &Path) {
    if let Err(e) = filetime::set_file_times(path, FileTime::zero(), FileTime::zero()) {
        debug!("failed to reset timestamps for {}: {}", path.display(), e);
    }
}
