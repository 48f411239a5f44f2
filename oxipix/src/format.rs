//! Output format identification.

use oxipix_core::error::Result;
use oxipix_gif::GIF_MAGIC;
use oxipix_png::PNG_SIGNATURE;
use std::io::Read;

/// Formats this crate can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ImageFormat {
    /// GIF89a (.gif).
    Gif,
    /// PNG (.png).
    Png,
}

impl ImageFormat {
    /// MIME type for HTTP responses.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Gif => "image/gif",
            Self::Png => "image/png",
        }
    }

    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Gif => "gif",
            Self::Png => "png",
        }
    }

    /// Parse a file extension, ignoring case and a leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        if ext.eq_ignore_ascii_case("gif") {
            Some(Self::Gif)
        } else if ext.eq_ignore_ascii_case("png") {
            Some(Self::Png)
        } else {
            None
        }
    }

    /// Parse a MIME type.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type.trim() {
            "image/gif" => Some(Self::Gif),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    ///
    /// Both GIF versions are recognised even though only GIF89a is written.
    pub fn from_magic(magic: &[u8]) -> Option<Self> {
        // GIF: "GIF87a" or "GIF89a"
        if magic.starts_with(b"GIF87a") || magic.starts_with(GIF_MAGIC) {
            return Some(Self::Gif);
        }

        // PNG: 0x89 "PNG" CR LF 0x1A LF
        if magic.starts_with(&PNG_SIGNATURE) {
            return Some(Self::Png);
        }

        None
    }

    /// Detect format from a reader.
    ///
    /// Returns the detected format together with the bytes consumed.
    pub fn detect<R: Read>(reader: &mut R) -> Result<(Option<Self>, Vec<u8>)> {
        let mut magic = Vec::with_capacity(PNG_SIGNATURE.len());
        reader
            .by_ref()
            .take(PNG_SIGNATURE.len() as u64)
            .read_to_end(&mut magic)?;
        Ok((Self::from_magic(&magic), magic))
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Gif => "GIF",
            Self::Png => "PNG",
        })
    }
}
