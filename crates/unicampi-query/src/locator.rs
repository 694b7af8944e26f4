//! Locating content inside scraped text.
//!
//! Scraped pages are usually flattened into text before parsing. A
//! [`ContentLocator`] splits that text into trimmed, non-empty segments and
//! picks out the segment (or run of segments) that follows a known label.
//!
//! ```
//! use unicampi_query::{ContentLocator, LocateOptions};
//!
//! let page = ContentLocator::new("x\nSTART\n1\n2\nEND\n");
//! let block = page
//!     .locate("START", LocateOptions::new().offset(1).until("END"))
//!     .unwrap();
//!
//! assert_eq!(block.to_vec(), ["1", "2"]);
//! ```

use std::borrow::Cow;

use crate::error::{Error, Result};

/// Separator used when none is given.
pub const DEFAULT_SEPARATOR: &str = "\n";

/// Pre-split view over a block of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLocator {
    segments: Vec<String>,
}

/// How far a locate call extends from its anchor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocateOptions<'a> {
    offset: usize,
    count: Option<usize>,
    end_pattern: Option<&'a str>,
}

impl<'a> LocateOptions<'a> {
    /// A single segment at the anchor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start this many segments after the anchor.
    #[must_use]
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// End `count` segments after the anchor. Zero is treated as unset.
    #[must_use]
    pub fn count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// End before the first segment, from the anchor on, containing
    /// `end_pattern`. An empty pattern is treated as unset.
    #[must_use]
    pub fn until(mut self, end_pattern: &'a str) -> Self {
        self.end_pattern = Some(end_pattern);
        self
    }
}

/// Result of [`ContentLocator::locate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Located<'s> {
    /// A single segment.
    Segment(&'s str),
    /// A run of consecutive segments, possibly empty.
    Range(&'s [String]),
}

impl Located<'_> {
    /// Collects the located content into owned strings.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Located::Segment(segment) => vec![(*segment).to_string()],
            Located::Range(range) => range.to_vec(),
        }
    }

    /// Returns the single segment, if this is one.
    #[must_use]
    pub fn as_segment(&self) -> Option<&str> {
        match self {
            Located::Segment(segment) => Some(segment),
            Located::Range(_) => None,
        }
    }
}

impl ContentLocator {
    /// Splits `text` on newlines.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self::with_separator(text, DEFAULT_SEPARATOR)
    }

    /// Splits `text` on `separator`, trimming each piece and dropping the
    /// ones left empty. An empty separator splits on newlines.
    #[must_use]
    pub fn with_separator(text: &str, separator: &str) -> Self {
        let separator = if separator.is_empty() {
            DEFAULT_SEPARATOR
        } else {
            separator
        };
        let segments = text
            .split(separator)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect();
        Self { segments }
    }

    /// Returns all segments in order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if the text had no non-blank segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Finds the first segment containing `pattern` and extracts content
    /// relative to it.
    ///
    /// `pattern` may be text or raw bytes; bytes are decoded as UTF-8 with
    /// invalid sequences replaced. With a non-zero `count`, the result is the
    /// segments in `[anchor + offset, anchor + count)`. Otherwise, with a
    /// non-empty end pattern, it is `[anchor + offset, end)` where `end` is
    /// the first segment at or after the anchor containing the end pattern.
    /// Otherwise it is the single segment at `anchor + offset`.
    ///
    /// # Arguments
    ///
    /// * `pattern` - Text the anchor segment must contain.
    /// * `options` - Offset from the anchor and where the range ends.
    ///
    /// # Examples
    ///
    /// ```
    /// use unicampi_query::{ContentLocator, LocateOptions, Located};
    ///
    /// let page = ContentLocator::new("Disciplina: MC102\nCreditos: 6\n");
    /// let located = page.locate("Disciplina", LocateOptions::new().offset(1)).unwrap();
    /// assert_eq!(located, Located::Segment("Creditos: 6"));
    /// ```
    ///
    /// # Errors
    ///
    /// - `Error::PatternNotFound` if no segment contains `pattern`
    /// - `Error::EndPatternNotFound` if the end pattern never appears
    /// - `Error::SegmentOutOfRange` if a single segment is requested past
    ///   the end
    ///
    /// Offsets and counts too large to add to the anchor saturate, so they
    /// land past the end instead of wrapping around.
    pub fn locate(
        &self,
        pattern: impl AsRef<[u8]>,
        options: LocateOptions<'_>,
    ) -> Result<Located<'_>> {
        let pattern = String::from_utf8_lossy(pattern.as_ref());
        let anchor = self.anchor(&pattern)?;
        let start = anchor.saturating_add(options.offset);

        if let Some(count) = options.count.filter(|&c| c > 0) {
            return Ok(Located::Range(self.slice(start, anchor.saturating_add(count))));
        }

        if let Some(end_pattern) = options.end_pattern.filter(|p| !p.is_empty()) {
            let end = self.segments[anchor..]
                .iter()
                .position(|s| s.contains(end_pattern))
                .map(|i| anchor + i)
                .ok_or_else(|| Error::EndPatternNotFound(end_pattern.to_string()))?;
            return Ok(Located::Range(self.slice(start, end)));
        }

        self.segment_at(start).map(Located::Segment)
    }

    /// Returns the segment `offset` positions after the one containing
    /// `pattern`.
    ///
    /// # Errors
    ///
    /// See [`locate`](Self::locate).
    pub fn find_line(&self, pattern: impl AsRef<[u8]>, offset: usize) -> Result<&str> {
        let pattern = String::from_utf8_lossy(pattern.as_ref());
        self.segment_at(self.anchor(&pattern)?.saturating_add(offset))
    }

    /// Returns segments `[anchor + offset, anchor + count)`.
    ///
    /// # Errors
    ///
    /// See [`locate`](Self::locate).
    pub fn find_count(
        &self,
        pattern: impl AsRef<[u8]>,
        offset: usize,
        count: usize,
    ) -> Result<Vec<String>> {
        self.locate(pattern, LocateOptions::new().offset(offset).count(count))
            .map(|located| located.to_vec())
    }

    /// Returns segments from `anchor + offset` up to, not including, the
    /// first segment containing `end_pattern`.
    ///
    /// # Errors
    ///
    /// See [`locate`](Self::locate).
    pub fn find_until(
        &self,
        pattern: impl AsRef<[u8]>,
        offset: usize,
        end_pattern: &str,
    ) -> Result<Vec<String>> {
        self.locate(pattern, LocateOptions::new().offset(offset).until(end_pattern))
            .map(|located| located.to_vec())
    }

    fn anchor(&self, pattern: &Cow<'_, str>) -> Result<usize> {
        self.segments
            .iter()
            .position(|s| s.contains(pattern.as_ref()))
            .ok_or_else(|| Error::PatternNotFound(pattern.to_string()))
    }

    fn segment_at(&self, index: usize) -> Result<&str> {
        self.segments
            .get(index)
            .map(String::as_str)
            .ok_or(Error::SegmentOutOfRange {
                index,
                len: self.segments.len(),
            })
    }

    // Clamps like sequence slicing: an inverted range is empty.
    fn slice(&self, start: usize, end: usize) -> &[String] {
        let end = end.min(self.segments.len());
        let start = start.min(end);
        &self.segments[start..end]
    }
}
