use std::fs::File;
use std::io::{self, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::download::progress::TransferProgress;
use crate::error::{DownloadError, Result};

/// Everything after the last `/`, or the whole URL if it has none.
/// Query strings and escapes are kept as-is.
pub fn file_name_from_url(url: &str) -> &str {
    match url.rfind('/') {
        Some(idx) => &url[idx + 1..],
        None => url,
    }
}

pub fn destination_path(output_dir: &Path, url: &str) -> Result<PathBuf> {
    let name = file_name_from_url(url);
    if name.is_empty() || name == "." || name == ".." {
        return Err(DownloadError::NoFileName(url.to_string()));
    }
    Ok(output_dir.join(name))
}

/// Creates or truncates the destination.
pub fn create_file(path: &Path) -> Result<File> {
    File::create(path).map_err(|source| DownloadError::Create {
        path: path.to_path_buf(),
        source,
    })
}

/// Sizes the file to its final length up front. Sparse on most filesystems.
pub fn allocate(file: &File, len: u64) -> Result<()> {
    file.set_len(len).map_err(DownloadError::Allocation)
}

/// Reader that copies every chunk it hands out into `sink` as well.
pub struct TeeReader<R, W> {
    reader: R,
    sink: W,
}

impl<R: Read, W: Write> TeeReader<R, W> {
    pub fn new(reader: R, sink: W) -> Self {
        Self { reader, sink }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.sink)
    }
}

impl<R: Read, W: Write> Read for TeeReader<R, W> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        if n > 0 {
            self.sink.write_all(&buf[..n])?;
        }
        Ok(n)
    }
}

/// Streams `reader` into `file`, counting every chunk on `progress`.
/// Returns the number of bytes written.
pub fn write_stream_to_file<R: Read, W: Write>(
    reader: &mut R,
    file: &mut W,
    progress: &Arc<TransferProgress>,
    buffer_size: usize,
) -> io::Result<u64> {
    let mut tee = TeeReader::new(reader, progress.sink());
    let mut buffer = vec![0; buffer_size.max(1)];
    let mut written = 0u64;

    loop {
        let n = match tee.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        file.write_all(&buffer[..n])?;
        written += n as u64;
    }

    file.flush()?;
    Ok(written)
}
