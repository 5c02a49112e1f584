//! Media similarity clauses (`nearImage`, `nearAudio`, `nearVideo`,
//! `nearDepth`, `nearThermal`, `nearIMU`).
//!
//! All six share [`NearMedia`], parameterized by [`MediaKind`]. Content is
//! supplied either as base64 text (optionally a `data:` URI) or as raw bytes,
//! and always leaves the builder as canonical base64. Setting one source
//! replaces the other.

use super::{SimilarityClause, SimilarityOptions};
use crate::config::{DATA_URI_BASE64_MARKER, DATA_URI_PREFIX};
use crate::error::ConfigError;
use crate::rpc::pb;
use crate::text;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io::Read;

/// Media modality. Ordering follows clause order in a Get query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MediaKind {
    Image,
    Audio,
    Video,
    Depth,
    Thermal,
    Imu,
}

impl MediaKind {
    pub const ALL: [MediaKind; 6] = [
        MediaKind::Image,
        MediaKind::Audio,
        MediaKind::Video,
        MediaKind::Depth,
        MediaKind::Thermal,
        MediaKind::Imu,
    ];

    /// Clause key, e.g. `nearImage`.
    pub fn clause_name(self) -> &'static str {
        match self {
            MediaKind::Image => "nearImage",
            MediaKind::Audio => "nearAudio",
            MediaKind::Video => "nearVideo",
            MediaKind::Depth => "nearDepth",
            MediaKind::Thermal => "nearThermal",
            MediaKind::Imu => "nearIMU",
        }
    }

    /// Content field inside the clause, e.g. `image`.
    pub fn field_name(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
            MediaKind::Depth => "depth",
            MediaKind::Thermal => "thermal",
            MediaKind::Imu => "imu",
        }
    }

    fn to_rpc(self) -> pb::MediaType {
        match self {
            MediaKind::Image => pb::MediaType::Image,
            MediaKind::Audio => pb::MediaType::Audio,
            MediaKind::Video => pb::MediaType::Video,
            MediaKind::Depth => pb::MediaType::Depth,
            MediaKind::Thermal => pb::MediaType::Thermal,
            MediaKind::Imu => pb::MediaType::Imu,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaSource {
    /// Base64 text or a `data:...;base64,...` URI.
    Encoded(String),
    Bytes(Vec<u8>),
}

impl MediaSource {
    /// Canonical base64 payload.
    pub fn to_base64(&self) -> String {
        match self {
            MediaSource::Encoded(s) => strip_data_uri(s).to_owned(),
            MediaSource::Bytes(b) => STANDARD.encode(b),
        }
    }
}

/// Keeps only the payload after the last `;base64,` of a data URI. Plain
/// base64, or a data URI without the marker, passes through unchanged.
fn strip_data_uri(s: &str) -> &str {
    if !s.starts_with(DATA_URI_PREFIX) {
        return s;
    }
    match s.rfind(DATA_URI_BASE64_MARKER) {
        Some(i) => &s[i + DATA_URI_BASE64_MARKER.len()..],
        None => s,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearMedia {
    kind: MediaKind,
    source: Option<MediaSource>,
    pub(crate) options: SimilarityOptions,
}

impl NearMedia {
    pub fn new(kind: MediaKind) -> Self {
        Self {
            kind,
            source: None,
            options: SimilarityOptions::default(),
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn with_media(mut self, encoded: impl Into<String>) -> Self {
        self.source = Some(MediaSource::Encoded(encoded.into()));
        self
    }

    pub fn with_bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.source = Some(MediaSource::Bytes(bytes.into()));
        self
    }

    /// Drains `reader` now so that rendering stays free of I/O.
    pub fn with_reader<R: Read>(self, mut reader: R) -> Result<Self, ConfigError> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(self.with_bytes(buf))
    }

    similarity_setters!();

    pub fn options(&self) -> &SimilarityOptions {
        &self.options
    }

    /// Canonical base64 content; empty when no source was set.
    pub fn encoded(&self) -> String {
        self.source
            .as_ref()
            .map(MediaSource::to_base64)
            .unwrap_or_default()
    }

    pub fn to_text(&self) -> String {
        let mut parts = vec![format!(
            "{}: {}",
            self.kind.field_name(),
            text::quote(&self.encoded())
        )];
        parts.extend(self.options.threshold_text());
        parts.extend(self.options.targets_text());
        format!("{}:{{{}}}", self.kind.clause_name(), parts.join(" "))
    }

    pub fn to_rpc(&self) -> pb::NearMediaSearch {
        let (target_vectors, targets) = self.options.rpc_targets();
        pb::NearMediaSearch {
            media_type: self.kind.to_rpc() as i32,
            media: self.encoded(),
            certainty: self.options.certainty(),
            distance: self.options.distance(),
            target_vectors,
            targets,
        }
    }
}

macro_rules! media_wrapper {
    ($(#[$doc:meta])* $name:ident, $kind:expr, $setter:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name(NearMedia);

        impl Default for $name {
            fn default() -> Self {
                Self(NearMedia::new($kind))
            }
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            /// Base64 content or a data URI.
            pub fn $setter(self, encoded: impl Into<String>) -> Self {
                Self(self.0.with_media(encoded))
            }

            pub fn with_bytes(self, bytes: impl Into<Vec<u8>>) -> Self {
                Self(self.0.with_bytes(bytes))
            }

            pub fn with_reader<R: Read>(self, reader: R) -> Result<Self, ConfigError> {
                self.0.with_reader(reader).map(Self)
            }

            pub fn with_certainty(self, certainty: f32) -> Self {
                Self(self.0.with_certainty(certainty))
            }

            pub fn with_distance(self, distance: f32) -> Self {
                Self(self.0.with_distance(distance))
            }

            pub fn with_target_vectors<I, S>(self, names: I) -> Self
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                Self(self.0.with_target_vectors(names))
            }

            pub fn with_targets(self, targets: super::multi_target::MultiTarget) -> Self {
                Self(self.0.with_targets(targets))
            }

            pub fn to_text(&self) -> String {
                self.0.to_text()
            }

            pub fn to_rpc(&self) -> pb::NearMediaSearch {
                self.0.to_rpc()
            }
        }

        impl From<$name> for NearMedia {
            fn from(w: $name) -> Self {
                w.0
            }
        }

        impl From<$name> for SimilarityClause {
            fn from(w: $name) -> Self {
                SimilarityClause::NearMedia(w.0)
            }
        }
    };
}

media_wrapper!(
    /// `nearImage` clause.
    NearImage, MediaKind::Image, with_image
);
media_wrapper!(NearAudio, MediaKind::Audio, with_audio);
media_wrapper!(NearVideo, MediaKind::Video, with_video);
media_wrapper!(
    /// `nearDepth` clause for depth-map images.
    NearDepth, MediaKind::Depth, with_depth
);
media_wrapper!(NearThermal, MediaKind::Thermal, with_thermal);
media_wrapper!(
    /// `nearIMU` clause for inertial measurement unit readings.
    NearImu, MediaKind::Imu, with_imu
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_data_uri_is_stripped() {
        let a = NearImage::new().with_image("data:image/png;base64,AAAA").to_text();
        let b = NearImage::new().with_image("AAAA").to_text();
        assert_eq!(a, b);
        assert_eq!(a, "nearImage:{image: \"AAAA\"}");
    }

    #[test]
    fn test_last_marker_wins() {
        assert_eq!(strip_data_uri("data:x;base64,AA;base64,BB"), "BB");
        assert_eq!(strip_data_uri("data:text/plain,hello"), "data:text/plain,hello");
        assert_eq!(strip_data_uri("QUJD"), "QUJD");
    }

    #[test]
    fn test_bytes_are_encoded() {
        let media = NearMedia::new(MediaKind::Audio).with_bytes(b"abc".to_vec());
        assert_eq!(media.encoded(), "YWJj");
        assert_eq!(media.to_text(), "nearAudio:{audio: \"YWJj\"}");
    }

    #[test]
    fn test_later_source_replaces_earlier() {
        let media = NearVideo::new().with_bytes(vec![1u8, 2, 3]).with_video("Zm9v");
        assert_eq!(media.to_text(), "nearVideo:{video: \"Zm9v\"}");
    }

    #[test]
    fn test_reader_is_drained_eagerly() {
        let media = NearThermal::new()
            .with_reader(io::Cursor::new(b"abc".to_vec()))
            .expect("cursor read");
        assert_eq!(media.to_text(), "nearThermal:{thermal: \"YWJj\"}");
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }
    }

    #[test]
    fn test_reader_failure_is_config_error() {
        let err = NearDepth::new().with_reader(FailingReader).unwrap_err();
        assert!(matches!(err, ConfigError::MediaRead(_)));
    }

    #[test]
    fn test_imu_token_and_threshold() {
        let text = NearImu::new().with_imu("SU1V").with_certainty(0.6).to_text();
        assert_eq!(text, "nearIMU:{imu: \"SU1V\" certainty: 0.6}");
    }

    #[test]
    fn test_rpc() {
        let rpc = NearImage::new()
            .with_image("data:image/jpeg;base64,/9j/")
            .with_distance(0.4)
            .to_rpc();
        assert_eq!(rpc.media_type, pb::MediaType::Image as i32);
        assert_eq!(rpc.media, "/9j/");
        assert_eq!(rpc.distance, Some(0.4));
    }
}
