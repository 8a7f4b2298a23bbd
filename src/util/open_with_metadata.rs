use std::fs::{Metadata, OpenOptions as StdOpenOptions};
use std::io::Error as IoError;
use std::path::Path;
use tokio::fs::OpenOptions;

#[cfg(windows)]
use std::os::windows::fs::OpenOptionsExt;
#[cfg(windows)]
use winapi::um::winbase::FILE_FLAG_BACKUP_SEMANTICS;

/// Open a file for reading and fetch its metadata.
///
/// Directories open fine on all supported platforms, which lets the caller
/// distinguish a directory request from a missing file with one syscall
/// round-trip.
pub(crate) async fn open_with_metadata(
    path: impl AsRef<Path>,
) -> Result<(tokio::fs::File, Metadata), IoError> {
    let mut opts = StdOpenOptions::new();
    opts.read(true);

    // On Windows, we need this flag to be able to open directories.
    #[cfg(windows)]
    opts.custom_flags(FILE_FLAG_BACKUP_SEMANTICS);

    let file = OpenOptions::from(opts).open(path).await?;
    let metadata = file.metadata().await?;
    Ok((file, metadata))
}
