//! melops-seg: speech timeline segmentation and subtitle synthesis.
//!
//! This crate turns voice activity detection output and speech recognition
//! transcripts into bounded, well-formed segments. It performs neither VAD
//! nor ASR itself; both are consumed as JSON documents.
//!
//! # Architecture
//!
//! - [`segmenter::AudioSegmenter`]: VAD intervals to audio segments bounded
//!   by a maximum duration, cut on silence where possible
//! - [`normalize::Synthesizer`]: transcript segments to a subtitle document
//!   through filter, merge, split, anomaly and clamp stages
//! - [`document::SubtitleDocument`]: ordered, self-indexing subtitles with
//!   SRT serialization
//!
//! # Quick Start
//!
//! ```no_run
//! use melops_seg::input::Transcript;
//! use melops_seg::normalize::{Mode, Synthesizer};
//! use melops_seg::policy::OptimizationPolicy;
//!
//! let transcript = Transcript::from_path("talk.json")?;
//! let synthesizer = Synthesizer::new(OptimizationPolicy::display())?;
//!
//! let synthesis = synthesizer.synthesize(transcript.into_segments(), Mode::Segment);
//! print!("{}", synthesis.document);
//! # Ok::<(), melops_seg::error::Error>(())
//! ```

pub mod document;
pub mod error;
pub mod input;
pub mod normalize;
pub mod policy;
pub mod segmenter;
pub mod timecode;
pub mod types;
