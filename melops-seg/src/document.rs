//! Ordered, self-indexing subtitle document with SRT serialization.

use crate::error::ParseError;
use crate::timecode::{format_time_range, parse_time_range};
use crate::types::SubtitleSegment;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Ordered collection of subtitle segments.
///
/// Segments are kept sorted by start time and carry indices `1..=N` in that
/// order. Every mutation reindexes, so indices never need to be assigned by
/// callers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubtitleDocument {
    segments: Vec<SubtitleSegment>,
}

impl SubtitleDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from segments in any order.
    pub fn from_segments(segments: impl IntoIterator<Item = SubtitleSegment>) -> Self {
        let mut segments: Vec<_> = segments.into_iter().collect();
        segments.sort_by_key(|s| s.start);

        let mut document = Self { segments };
        document.reindex();
        document
    }

    /// Insert a segment in start order and return its assigned index.
    ///
    /// A segment sharing a start time with existing ones goes after them.
    pub fn add(&mut self, segment: SubtitleSegment) -> usize {
        let position = self.segments.partition_point(|s| s.start <= segment.start);
        self.segments.insert(position, segment);
        self.reindex();
        position + 1
    }

    /// Remove the segment with the given index.
    pub fn remove(&mut self, index: usize) -> Option<SubtitleSegment> {
        let position = self.position(index)?;
        let removed = self.segments.remove(position);
        self.reindex();
        Some(removed)
    }

    /// Look up a segment by its index.
    pub fn get(&self, index: usize) -> Option<&SubtitleSegment> {
        self.segments.iter().find(|s| s.index == index)
    }

    /// Segment preceding the given index in time order.
    pub fn previous(&self, index: usize) -> Option<&SubtitleSegment> {
        let position = self.position(index)?;
        position.checked_sub(1).and_then(|p| self.segments.get(p))
    }

    /// Segment following the given index in time order.
    pub fn next(&self, index: usize) -> Option<&SubtitleSegment> {
        let position = self.position(index)?;
        self.segments.get(position + 1)
    }

    /// Silence between a segment and its successor (zero when they overlap).
    pub fn gap_after(&self, index: usize) -> Option<Duration> {
        let current = self.get(index)?;
        let next = self.next(index)?;
        Some(next.start.saturating_sub(current.end))
    }

    /// Latest end time over all segments.
    pub fn total_duration(&self) -> Duration {
        self.segments
            .iter()
            .map(|s| s.end)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SubtitleSegment> {
        self.segments.iter()
    }

    pub fn segments(&self) -> &[SubtitleSegment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<SubtitleSegment> {
        self.segments
    }

    /// Render as SRT text.
    pub fn to_srt_string(&self) -> String {
        self.to_string()
    }

    fn position(&self, index: usize) -> Option<usize> {
        self.segments.iter().position(|s| s.index == index)
    }

    fn reindex(&mut self) {
        for (segment, index) in self.segments.iter_mut().zip(1..) {
            segment.index = index;
        }
    }
}

impl<'a> IntoIterator for &'a SubtitleDocument {
    type Item = &'a SubtitleSegment;
    type IntoIter = std::slice::Iter<'a, SubtitleSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            writeln!(f, "{}", segment.index)?;
            writeln!(f, "{}", format_time_range(segment.start, segment.end))?;
            for line in segment.text.lines().filter(|l| !l.trim().is_empty()) {
                writeln!(f, "{line}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for SubtitleDocument {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_srt(s)
    }
}

/// Parse SRT text into a document.
///
/// Blocks are separated by blank lines. Each block needs an index line
/// followed by a time-range line; the index line alone may be omitted.
/// Indices in the input are discarded and recomputed from time order.
pub fn parse_srt(s: &str) -> Result<SubtitleDocument, ParseError> {
    let s = s.strip_prefix('\u{feff}').unwrap_or(s);

    let mut segments = Vec::new();
    let mut block: Vec<(usize, &str)> = Vec::new();

    for (line, line_no) in s.lines().zip(1..) {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line.trim().is_empty() {
            if !block.is_empty() {
                segments.push(parse_block(&block)?);
                block.clear();
            }
        } else {
            block.push((line_no, line));
        }
    }

    if !block.is_empty() {
        segments.push(parse_block(&block)?);
    }

    Ok(SubtitleDocument::from_segments(segments))
}

fn parse_block(block: &[(usize, &str)]) -> Result<SubtitleSegment, ParseError> {
    let (first_line, first) = block[0];

    // Time range may be the first line when the index is missing.
    if let Ok((start, end)) = parse_time_range(first) {
        return segment_from(start, end, first_line, &block[1..]);
    }

    let rest = &block[1..];

    if first.trim().parse::<usize>().is_err() {
        return Err(ParseError::InvalidIndex {
            line: first_line,
            value: first.to_string(),
        });
    }

    let Some(&(range_line, range)) = rest.first() else {
        return Err(ParseError::MissingTimeRange { line: first_line });
    };

    let (start, end) =
        parse_time_range(range).map_err(|_| ParseError::MissingTimeRange { line: range_line })?;

    segment_from(start, end, range_line, &rest[1..])
}

fn segment_from(
    start: Duration,
    end: Duration,
    line: usize,
    text: &[(usize, &str)],
) -> Result<SubtitleSegment, ParseError> {
    if end < start {
        return Err(ParseError::InvertedRange { line });
    }

    let text = text
        .iter()
        .map(|(_, l)| *l)
        .collect::<Vec<_>>()
        .join("\n");

    Ok(SubtitleSegment::new(text, start, end))
}
