//! stream/source.rs
//! Presents numbered part files as one continuous readable stream.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use crate::constants::{
    LARGE_INPUT_THRESHOLD, PART_MARKER, SMALL_INPUT_THRESHOLD, SOURCE_BUF_DEFAULT,
    SOURCE_BUF_LARGE_INPUT, SOURCE_BUF_SMALL_INPUT,
};
use crate::types::StreamError;

/// Reads a sequence of part files as one byte stream.
///
/// Reads may span, start, or end at arbitrary offsets relative to part
/// boundaries; callers cannot observe where one part ends and the next
/// begins.
#[derive(Debug)]
pub struct SegmentedSource {
    parts: Vec<PathBuf>,
    total_len: u64,
    buf_capacity: usize,
    next_part: usize,
    current: Option<BufReader<File>>,
}

impl SegmentedSource {
    /// Discover parts matching `pattern` and open the stream.
    ///
    /// The pattern is a path whose file name may contain one `*` wildcard
    /// (`backup.tar.gz.part_*`). A concrete part path without a wildcard is
    /// widened to its whole part family. Fails with a discovery error when
    /// nothing matches.
    pub fn open(pattern: &str) -> Result<Self, StreamError> {
        let parts = discover_parts(pattern)?;
        let total_len = parts
            .iter()
            .map(|p| std::fs::metadata(p).map(|m| m.len()))
            .sum::<io::Result<u64>>()?;
        let buf_capacity = recommended_buffer_size(total_len);
        tracing::debug!(parts = parts.len(), total_len, buf_capacity, "source opened");
        Ok(Self { parts, total_len, buf_capacity, next_part: 0, current: None })
    }

    /// Like [`SegmentedSource::open`] with an explicit read-buffer capacity.
    pub fn open_with_buffer(pattern: &str, buf_capacity: usize) -> Result<Self, StreamError> {
        let mut source = Self::open(pattern)?;
        source.buf_capacity = buf_capacity.max(1);
        Ok(source)
    }

    /// Discovered part paths, in stream order.
    pub fn parts(&self) -> &[PathBuf] {
        &self.parts
    }

    /// Summed byte size of every discovered part.
    pub fn total_len(&self) -> u64 {
        self.total_len
    }

    /// Release the currently open part handle. Idempotent.
    pub fn close(&mut self) {
        self.current = None;
        self.next_part = self.parts.len();
    }

    fn advance(&mut self) -> io::Result<bool> {
        if self.next_part >= self.parts.len() {
            return Ok(false);
        }
        let file = File::open(&self.parts[self.next_part])?;
        self.current = Some(BufReader::with_capacity(self.buf_capacity, file));
        self.next_part += 1;
        Ok(true)
    }
}

impl Read for SegmentedSource {
    /// Fill `buf` across part boundaries until it is full or every part is
    /// exhausted.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            let reader = match self.current.as_mut() {
                Some(r) => r,
                None => {
                    if !self.advance()? {
                        break;
                    }
                    self.current.as_mut().expect("advance opened a part")
                }
            };
            let n = reader.read(&mut buf[filled..])?;
            if n == 0 {
                // Current part exhausted; move on to the next.
                self.current = None;
                continue;
            }
            filled += n;
        }
        Ok(filled)
    }
}

/// Pick a read-buffer capacity from the total discovered input size:
/// generous for small inputs, conservative for very large ones.
pub fn recommended_buffer_size(total_len: u64) -> usize {
    if total_len <= SMALL_INPUT_THRESHOLD {
        SOURCE_BUF_SMALL_INPUT
    } else if total_len >= LARGE_INPUT_THRESHOLD {
        SOURCE_BUF_LARGE_INPUT
    } else {
        SOURCE_BUF_DEFAULT
    }
}

/// Resolve `pattern` to the sorted list of part paths.
fn discover_parts(pattern: &str) -> Result<Vec<PathBuf>, StreamError> {
    let normalized = normalize_pattern(pattern);
    let path = Path::new(&normalized);
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let name_pattern = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| StreamError::Discovery(pattern.to_string()))?;

    let mut names: Vec<String> = Vec::new();
    let entries = match std::fs::read_dir(&dir) {
        Ok(e) => e,
        Err(_) => return Err(StreamError::Discovery(pattern.to_string())),
    };
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if matches_pattern(&name, &name_pattern) {
            names.push(name);
        }
    }
    if names.is_empty() {
        return Err(StreamError::Discovery(pattern.to_string()));
    }

    // Numeric suffix order so part 10 follows part 9, not part 1;
    // lexicographic fallback for names without a numeric suffix.
    names.sort_by_key(|name| (part_ordinal(name), name.clone()));
    Ok(names.into_iter().map(|n| dir.join(n)).collect())
}

/// Widen a concrete part path to its whole family, mirroring the pattern
/// convenience of the backup tool's restore path: `x.part_000` -> `x.part_*`.
fn normalize_pattern(pattern: &str) -> String {
    if pattern.contains('*') {
        return pattern.to_string();
    }
    match pattern.rfind(PART_MARKER) {
        Some(pos) => {
            let base = &pattern[..pos + PART_MARKER.len()];
            format!("{base}*")
        }
        None => pattern.to_string(),
    }
}

/// Match `name` against a file-name pattern holding at most one `*`.
fn matches_pattern(name: &str, pattern: &str) -> bool {
    match pattern.split_once('*') {
        Some((prefix, suffix)) => {
            name.len() >= prefix.len() + suffix.len()
                && name.starts_with(prefix)
                && name.ends_with(suffix)
        }
        None => name == pattern,
    }
}

/// Numeric value of the trailing digit run, if any (`backup.part_012` -> 12).
fn part_ordinal(name: &str) -> Option<u64> {
    let run = name.bytes().rev().take_while(u8::is_ascii_digit).count();
    if run == 0 {
        return None;
    }
    name[name.len() - run..].parse().ok()
}
