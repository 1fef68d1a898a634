//! Base64 data URLs for image previews.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::types::SelectedFile;

const FALLBACK_MIME: &str = "application/octet-stream";

#[cfg(test)]
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub(crate) enum PreviewError {
    #[error("not a data URL")]
    NotDataUrl,
    #[error("data URL is not base64-encoded")]
    NotBase64,
    #[error("invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// A decoded `data:` URL.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Build `data:<mime>;base64,<payload>`.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Preview URL for an attached file.
pub fn preview_url(file: &SelectedFile) -> String {
    encode_data_url(file.mime_type(), &file.bytes)
}

/// Inverse of [`encode_data_url`]; lets tests check what a preview shows.
#[cfg(test)]
pub(crate) fn decode_data_url(url: &str) -> Result<DataUrl, PreviewError> {
    let rest = url.strip_prefix("data:").ok_or(PreviewError::NotDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(PreviewError::NotDataUrl)?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or(PreviewError::NotBase64)?;
    let bytes = STANDARD.decode(payload)?;
    Ok(DataUrl {
        mime: mime.to_string(),
        bytes,
    })
}

/// Guess a MIME type from the file extension.
pub fn guess_mime(file_name: &str) -> &'static str {
    let ext = match file_name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return FALLBACK_MIME,
    };
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "ico" => "image/x-icon",
        "tif" | "tiff" => "image/tiff",
        _ => FALLBACK_MIME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encodes_known_bytes() {
        assert_eq!(encode_data_url("image/png", b"hi"), "data:image/png;base64,aGk=");
    }

    #[test]
    fn preview_uses_guessed_mime_when_picker_reports_none() {
        let file = SelectedFile::new("Shelf Photo.JPG", vec![1, 2, 3]);
        assert!(preview_url(&file).starts_with("data:image/jpeg;base64,"));

        let file = SelectedFile::new("notes", vec![]).with_mime("image/heic");
        assert_eq!(preview_url(&file), "data:image/heic;base64,");
    }

    #[test]
    fn unknown_extension_falls_back_to_octet_stream() {
        assert_eq!(guess_mime("archive.tar.zst"), FALLBACK_MIME);
        assert_eq!(guess_mime("README"), FALLBACK_MIME);
    }

    #[test]
    fn decode_rejects_non_data_urls() {
        assert_eq!(decode_data_url("http://x/y.png"), Err(PreviewError::NotDataUrl));
        assert_eq!(decode_data_url("data:text/plain,hello"), Err(PreviewError::NotBase64));
        assert!(matches!(
            decode_data_url("data:image/png;base64,***"),
            Err(PreviewError::Decode(_))
        ));
    }

    proptest! {
        #[test]
        fn preview_decodes_to_the_file_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let file = SelectedFile::new("item.png", bytes.clone());
            let decoded = decode_data_url(&preview_url(&file)).unwrap();
            prop_assert_eq!(decoded.mime, "image/png");
            prop_assert_eq!(decoded.bytes, bytes);
        }
    }
}
