//! Media descriptors read from gallery cards, and the overlay node built from them.

use std::fmt;
use std::str::FromStr;

use crate::config::DEFAULT_VIDEO_MIME;

/// Declared by the card's `data-type` attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Photo,
}

impl MediaKind {
    pub const ATTRIBUTE: &'static str = "data-type";

    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Photo => "photo",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownMediaKind(pub String);

impl fmt::Display for UnknownMediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown media kind {:?}", self.0)
    }
}

impl FromStr for MediaKind {
    type Err = UnknownMediaKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(MediaKind::Video),
            "photo" => Ok(MediaKind::Photo),
            other => Err(UnknownMediaKind(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceEntry {
    pub src: String,
    pub mime: String,
}

impl SourceEntry {
    /// `None` when the `<source>` has no usable `src`.
    pub fn from_attrs(src: Option<String>, mime: Option<String>) -> Option<Self> {
        let src = src.filter(|s| !s.is_empty())?;
        let mime = mime
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_VIDEO_MIME.to_string());
        Some(Self { src, mime })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaDescriptor {
    Video {
        sources: Vec<SourceEntry>,
        /// Resolved source of the thumbnail (`currentSrc`, else `src`).
        fallback_src: String,
    },
    Photo {
        src: String,
        alt: String,
    },
}

impl MediaDescriptor {
    pub fn kind(&self) -> MediaKind {
        match self {
            MediaDescriptor::Video { .. } => MediaKind::Video,
            MediaDescriptor::Photo { .. } => MediaKind::Photo,
        }
    }

    pub fn overlay(&self) -> OverlayMedia {
        match self {
            MediaDescriptor::Video { sources, fallback_src } => {
                let source = if sources.is_empty() {
                    VideoSource::Src(fallback_src.clone())
                } else {
                    VideoSource::List(sources.clone())
                };
                OverlayMedia::Video(VideoOverlay {
                    source,
                    controls: true,
                    autoplay: true,
                    plays_inline: true,
                    muted: false,
                    volume: 1.0,
                })
            }
            MediaDescriptor::Photo { src, alt } => OverlayMedia::Photo {
                src: src.clone(),
                alt: alt.clone(),
            },
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) fn resolved_src(current_src: String, src: String) -> String {
    if current_src.is_empty() {
        src
    } else {
        current_src
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum VideoSource {
    List(Vec<SourceEntry>),
    Src(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct VideoOverlay {
    pub source: VideoSource,
    pub controls: bool,
    pub autoplay: bool,
    pub plays_inline: bool,
    pub muted: bool,
    pub volume: f64,
}

/// Plan for the node placed in the lightbox content slot.
#[derive(Clone, Debug, PartialEq)]
pub enum OverlayMedia {
    Video(VideoOverlay),
    Photo { src: String, alt: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kind_from_markup() {
        assert_eq!("video".parse::<MediaKind>(), Ok(MediaKind::Video));
        assert_eq!(" Photo ".parse::<MediaKind>(), Ok(MediaKind::Photo));
        assert_eq!(
            "gif".parse::<MediaKind>(),
            Err(UnknownMediaKind("gif".into()))
        );
        assert_eq!(MediaKind::Video.to_string(), "video");
    }

    #[test]
    fn source_entry_skips_empty_src_and_defaults_mime() {
        assert_eq!(SourceEntry::from_attrs(None, Some("video/webm".into())), None);
        assert_eq!(SourceEntry::from_attrs(Some(String::new()), None), None);
        assert_eq!(
            SourceEntry::from_attrs(Some("a.mp4".into()), Some(String::new())),
            Some(SourceEntry { src: "a.mp4".into(), mime: "video/mp4".into() })
        );
        assert_eq!(
            SourceEntry::from_attrs(Some("a.webm".into()), Some("video/webm".into()))
                .map(|s| s.mime),
            Some("video/webm".into())
        );
    }

    #[test]
    fn video_overlay_copies_every_source() {
        let sources = vec![
            SourceEntry { src: "clip.webm".into(), mime: "video/webm".into() },
            SourceEntry { src: "clip.mp4".into(), mime: "video/mp4".into() },
        ];
        let desc = MediaDescriptor::Video {
            sources: sources.clone(),
            fallback_src: "ignored.mp4".into(),
        };
        let OverlayMedia::Video(video) = desc.overlay() else {
            panic!("expected video overlay");
        };
        assert_eq!(video.source, VideoSource::List(sources));
        assert!(video.controls && video.autoplay && video.plays_inline);
        assert!(!video.muted);
        assert_eq!(video.volume, 1.0);
    }

    #[test]
    fn video_without_sources_falls_back_to_resolved_src() {
        let desc = MediaDescriptor::Video {
            sources: Vec::new(),
            fallback_src: resolved_src(String::new(), "thumb.mp4".into()),
        };
        assert_eq!(desc.kind(), MediaKind::Video);
        match desc.overlay() {
            OverlayMedia::Video(video) => {
                assert_eq!(video.source, VideoSource::Src("thumb.mp4".into()))
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            resolved_src("http://x/current.mp4".into(), "thumb.mp4".into()),
            "http://x/current.mp4"
        );
    }

    #[test]
    fn photo_overlay_keeps_alt_text() {
        let desc = MediaDescriptor::Photo { src: "p.jpg".into(), alt: "Harbour".into() };
        assert_eq!(
            desc.overlay(),
            OverlayMedia::Photo { src: "p.jpg".into(), alt: "Harbour".into() }
        );
    }
}
