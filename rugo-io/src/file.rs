use std::fs::File;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use log::trace;
use rugo_error::{RugoResult, rugo_err};

use crate::RugoReadAt;
use crate::read::checked_bounds;

/// A read-only local file.
///
/// The file descriptor is held for the lifetime of the value and closed when it is dropped,
/// so every handle is released on all exit paths of the call that opened it.
#[derive(Debug)]
pub struct LocalFile {
    file: File,
    path: PathBuf,
}

impl LocalFile {
    /// Open a file on the current file system.
    pub fn open(path: impl AsRef<Path>) -> RugoResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| rugo_err!(CannotOpenFile: path.display(), e))?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }
}

impl RugoReadAt for LocalFile {
    fn read_byte_range(&self, range: Range<u64>) -> io::Result<Bytes> {
        let (start, end) = checked_bounds(&range)?;
        trace!("reading {}..{} from {}", range.start, range.end, self.path.display());
        let mut buffer = vec![0u8; end - start];
        read_exact_at(&self.file, &mut buffer, range.start)?;
        Ok(Bytes::from(buffer))
    }

    fn size(&self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        fn read_exact_at(file: &File, buffer: &mut [u8], offset: u64) -> io::Result<()> {
            std::os::unix::fs::FileExt::read_exact_at(file, buffer, offset)
        }
    } else if #[cfg(windows)] {
        fn read_exact_at(file: &File, mut buffer: &mut [u8], mut offset: u64) -> io::Result<()> {
            use std::os::windows::fs::FileExt;

            while !buffer.is_empty() {
                match file.seek_read(buffer, offset) {
                    Ok(0) => {
                        return Err(io::Error::new(
                            io::ErrorKind::UnexpectedEof,
                            "failed to fill whole buffer",
                        ));
                    }
                    Ok(n) => {
                        buffer = &mut buffer[n..];
                        offset += n as u64;
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                    Err(e) => return Err(e),
                }
            }
            Ok(())
        }
    } else {
        fn read_exact_at(mut file: &File, buffer: &mut [u8], offset: u64) -> io::Result<()> {
            use std::io::{Read, Seek, SeekFrom};

            file.seek(SeekFrom::Start(offset))?;
            file.read_exact(buffer)
        }
    }
}
