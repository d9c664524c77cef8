//! stream/sink.rs
//! Rolls one byte stream across numbered, size-bounded part files.

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::constants::{FAT_PART_LIMIT, PART_SUFFIX_WIDTH};
use crate::stream::ByteSink;
use crate::types::StreamError;

/// One finalized part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartInfo {
    /// Zero-based part number.
    pub index: u32,
    pub path: PathBuf,
    pub len: u64,
}

/// Invoked after a part closes; the upload-collaborator seam.
pub type PartClosedFn = Box<dyn FnMut(&PartInfo) + Send>;

/// Writes a byte stream across part files of at most `part_size` bytes.
///
/// Parts are named `<prefix><index>` with a zero-padded numeric suffix and
/// created lazily on the first byte, so an empty stream produces no parts.
/// A part becomes visible to the callback and the closed-parts list only
/// after it is fully written and closed; a half-filled open part never is.
pub struct SegmentedSink {
    prefix: PathBuf,
    part_size: u64,
    current: Option<OpenPart>,
    written_current: u64,
    total_written: u64,
    next_index: u32,
    parts: Vec<PartInfo>,
    on_part_closed: Option<PartClosedFn>,
    closed: bool,
}

struct OpenPart {
    file: File,
    path: PathBuf,
}

impl std::fmt::Debug for SegmentedSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegmentedSink")
            .field("prefix", &self.prefix)
            .field("part_size", &self.part_size)
            .field("written_current", &self.written_current)
            .field("total_written", &self.total_written)
            .field("next_index", &self.next_index)
            .field("parts", &self.parts)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl SegmentedSink {
    /// `prefix` is the caller-supplied path stem the numeric suffix is
    /// appended to (conventionally ending in `.part_`).
    pub fn create(prefix: impl Into<PathBuf>, part_size: u64) -> Result<Self, StreamError> {
        if part_size == 0 {
            return Err(StreamError::Config("part_size must be non-zero".into()));
        }
        Ok(Self {
            prefix: prefix.into(),
            part_size,
            current: None,
            written_current: 0,
            total_written: 0,
            next_index: 0,
            parts: Vec::new(),
            on_part_closed: None,
            closed: false,
        })
    }

    /// Report each closed part to `callback` (e.g. an upload queue).
    pub fn with_part_callback(mut self, callback: PartClosedFn) -> Self {
        self.on_part_closed = Some(callback);
        self
    }

    fn part_path(&self, index: u32) -> PathBuf {
        let mut name: OsString = self.prefix.clone().into_os_string();
        name.push(format!("{index:0width$}", width = PART_SUFFIX_WIDTH));
        PathBuf::from(name)
    }

    fn open_next_part(&mut self) -> Result<(), StreamError> {
        debug_assert!(self.current.is_none());
        let path = self.part_path(self.next_index);
        let file = File::create(&path)?;
        tracing::debug!(part = self.next_index, path = %path.display(), "part opened");
        self.current = Some(OpenPart { file, path });
        self.written_current = 0;
        Ok(())
    }

    fn finish_part(&mut self) -> Result<(), StreamError> {
        let mut part = match self.current.take() {
            Some(p) => p,
            None => return Ok(()),
        };
        part.file.flush()?;
        drop(part.file);

        let info = PartInfo {
            index: self.next_index,
            path: part.path,
            len: self.written_current,
        };
        tracing::debug!(part = info.index, len = info.len, "part closed");
        if let Some(callback) = self.on_part_closed.as_mut() {
            callback(&info);
        }
        self.parts.push(info);
        self.next_index += 1;
        self.written_current = 0;
        Ok(())
    }

    /// Append `data`, rolling over part boundaries as needed.
    ///
    /// A single write may span any number of parts; the placement loop runs
    /// until every byte has landed.
    pub fn write_bytes(&mut self, mut data: &[u8]) -> Result<(), StreamError> {
        if self.closed {
            return Err(StreamError::Pipeline("write to closed sink"));
        }
        while !data.is_empty() {
            if self.current.is_none() {
                self.open_next_part()?;
            }
            let remaining = (self.part_size - self.written_current) as usize;
            let take = remaining.min(data.len());
            self.current
                .as_mut()
                .expect("part opened above")
                .file
                .write_all(&data[..take])?;
            self.written_current += take as u64;
            self.total_written += take as u64;
            data = &data[take..];

            if self.written_current == self.part_size {
                self.finish_part()?;
            }
        }
        Ok(())
    }

    /// Finalize the open part. Idempotent; no further writes are accepted.
    pub fn close(&mut self) -> Result<(), StreamError> {
        if self.closed {
            return Ok(());
        }
        self.finish_part()?;
        self.closed = true;
        Ok(())
    }

    pub fn part_count(&self) -> u64 {
        self.parts.len() as u64
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_written
    }

    /// True when the whole stream fit in exactly one part.
    pub fn is_single_part(&self) -> bool {
        self.parts.len() == 1
    }

    /// Finalized parts, in order.
    pub fn parts(&self) -> &[PartInfo] {
        &self.parts
    }
}

impl Write for SegmentedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(part) = self.current.as_mut() {
            part.file.flush()?;
        }
        Ok(())
    }
}

impl ByteSink for SegmentedSink {
    fn finish(&mut self) -> Result<(), StreamError> {
        self.close()
    }
}

/// Part-size clamp for the destination's filesystem, if it has one.
///
/// FAT-family filesystems cap files at 4 GiB; everything else is unbounded
/// as far as this core cares.
pub fn fs_part_limit(dest: &Path) -> Option<u64> {
    let dest = dest.canonicalize().unwrap_or_else(|_| dest.to_path_buf());
    let disks = sysinfo::Disks::new_with_refreshed_list();

    let mut best_match = PathBuf::new();
    let mut fs_name = String::new();
    for disk in disks.list() {
        let mount = disk.mount_point();
        if dest.starts_with(mount) && mount.as_os_str().len() >= best_match.as_os_str().len() {
            best_match = mount.to_path_buf();
            fs_name = disk.file_system().to_string_lossy().to_ascii_lowercase();
        }
    }

    // exFAT lifts the 4 GiB cap, so only the classic FAT variants match.
    let fat = fs_name.contains("msdos")
        || (fs_name.contains("fat") && !fs_name.contains("exfat"));
    fat.then_some(FAT_PART_LIMIT)
}
