use flate2::{Compression, write::GzEncoder};
use log::{debug, error};

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

pub enum FileDescriptor {
    Plain(File),
    Gzip(GzEncoder<File>),
}

impl std::io::Write for FileDescriptor {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        match self {
            Self::Plain(w) => w.write(data),
            Self::Gzip(w) => w.write(data),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Self::Plain(w) => w.flush(),
            Self::Gzip(w) => w.flush(),
        }
    }
}

impl FileDescriptor {
    pub fn new(gzip: bool, path: &Path) -> std::io::Result<Self> {
        let fd = File::create(path)?;

        if gzip {
            let compression = Compression::new(5);
            Ok(Self::Gzip(GzEncoder::new(fd, compression)))
        } else {
            Ok(Self::Plain(fd))
        }
    }

    /// Terminates the stream (writes the gzip trailer)
    fn finish(&mut self) -> std::io::Result<()> {
        match self {
            Self::Plain(w) => w.flush(),
            Self::Gzip(w) => w.try_finish(),
        }
    }
}

/// One RINEX output file. Counts the bytes it was given,
/// and removes itself on drop when that count is still zero.
pub struct OutputFile {
    path: PathBuf,
    written: u64,
    writer: Option<BufWriter<FileDescriptor>>,
}

impl OutputFile {
    /// Creates (truncates) the file at `path`
    pub fn create(path: PathBuf, gzip: bool) -> std::io::Result<Self> {
        let fd = FileDescriptor::new(gzip, &path)?;
        debug!("created \"{}\"", path.display());
        Ok(Self {
            path,
            written: 0,
            writer: Some(BufWriter::new(fd)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total number of bytes written so far (before compression)
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    fn writer(&mut self) -> std::io::Result<&mut BufWriter<FileDescriptor>> {
        self.writer
            .as_mut()
            .ok_or_else(|| std::io::Error::other("file already closed"))
    }
}

impl Write for OutputFile {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        let size = self.writer()?.write(data)?;
        self.written += size as u64;
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer()?.flush()
    }
}

impl Drop for OutputFile {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            match writer.into_inner() {
                Ok(mut fd) => {
                    if let Err(e) = fd.finish() {
                        error!("failed to close \"{}\": {}", self.path.display(), e);
                    }
                },
                Err(e) => {
                    error!("failed to flush \"{}\": {}", self.path.display(), e.error());
                },
            }
        }

        if self.written == 0 {
            match std::fs::remove_file(&self.path) {
                Ok(_) => debug!("removed empty file \"{}\"", self.path.display()),
                Err(e) => error!("failed to remove \"{}\": {}", self.path.display(), e),
            }
        }
    }
}
