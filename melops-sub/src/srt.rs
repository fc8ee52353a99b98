//! SRT preview utilities.
//!
//! Files are written by `SubtitleDocument`'s own codec. The preview reads
//! that written text back through srtlib, so it shows what an independent
//! SRT reader recovers from the file.

use eyre::{Result, eyre};
use srtlib::{Subtitle, Subtitles};

/// Parse written SRT text with srtlib.
pub fn read_back(text: &str) -> Result<Vec<Subtitle>> {
    let subtitles = Subtitles::parse_from_str(text.to_string())
        .map_err(|e| eyre!("written srt is not readable: {e:?}"))?;

    Ok(subtitles.to_vec())
}

/// Format subtitles as SRT file content.
pub fn display_subtitles(subtitles: &[Subtitle]) -> String {
    subtitles
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Display preview of subtitles (first and last entries).
pub fn preview_subtitles(subtitles: &[Subtitle], head_count: usize, tail_count: usize) -> String {
    let total = subtitles.len();

    if total <= head_count + tail_count {
        display_subtitles(subtitles)
    } else {
        let mut out = Vec::new();
        out.extend(subtitles[..head_count].iter().map(|s| s.to_string()));
        out.push("...".to_string());
        out.extend(subtitles[(total - tail_count)..].iter().map(|s| s.to_string()));
        out.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use melops_seg::document::SubtitleDocument;
    use melops_seg::types::SubtitleSegment;
    use std::time::Duration;

    fn document(count: u64) -> SubtitleDocument {
        SubtitleDocument::from_segments((0..count).map(|i| {
            SubtitleSegment::new(
                format!("line {i}"),
                Duration::from_secs(i * 2),
                Duration::from_secs(i * 2 + 1),
            )
        }))
    }

    fn read(document: &SubtitleDocument) -> Vec<Subtitle> {
        read_back(&document.to_srt_string()).unwrap()
    }

    #[test]
    fn reads_back_written_document() {
        let subtitles = read(&document(2));

        match &subtitles[..] {
            [first, second] => {
                assert_eq!(first.num, 1);
                assert_eq!(first.text, "line 0");
                assert_eq!(second.num, 2);
                assert!(second.to_string().contains("00:00:02,000 --> 00:00:03,000"));
            }
            _ => panic!("expected 2 subtitles, got {}", subtitles.len()),
        }
    }

    #[test]
    fn reads_back_multiline_text() {
        let document = SubtitleDocument::from_segments([SubtitleSegment::new(
            "first part\n\nsecond part",
            Duration::ZERO,
            Duration::from_secs(2),
        )]);

        let subtitles = read(&document);

        match &subtitles[..] {
            [single] => assert_eq!(single.text, "first part\nsecond part"),
            _ => panic!("expected 1 subtitle, got {}", subtitles.len()),
        }
    }

    #[test]
    fn previews_head_and_tail() {
        let subtitles = read(&document(10));

        let preview = preview_subtitles(&subtitles, 2, 1);

        assert!(preview.contains("line 0"));
        assert!(preview.contains("line 1"));
        assert!(!preview.contains("line 2"));
        assert!(preview.contains("..."));
        assert!(preview.contains("line 9"));
    }

    #[test]
    fn previews_everything_when_short() {
        let subtitles = read(&document(3));

        let preview = preview_subtitles(&subtitles, 3, 3);

        assert!(!preview.contains("..."));
        assert_eq!(preview.matches("line").count(), 3);
    }
}
