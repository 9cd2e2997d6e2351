use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "heic", "bmp"];

/// Classifies a media URL by the file extension of its path, ignoring any
/// query string or fragment. The kind is computed once when the record is
/// created and stored with it; reads never re-derive it. Anything without a
/// recognized image extension is treated as video.
pub fn media_kind(url: &str) -> MediaKind {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file = path.rsplit('/').next().unwrap_or(path);
    let ext = match file.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return MediaKind::Video,
    };
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        MediaKind::Image
    } else {
        MediaKind::Video
    }
}

pub fn is_image(url: &str) -> bool {
    media_kind(url) == MediaKind::Image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_extensions_classify_as_image() {
        assert_eq!(media_kind("https://cdn.example.com/a/b/photo.JPG"), MediaKind::Image);
        assert_eq!(media_kind("/uploads/pic.webp"), MediaKind::Image);
    }

    #[test]
    fn video_and_unknown_extensions_classify_as_video() {
        assert_eq!(media_kind("/uploads/clip.mp4"), MediaKind::Video);
        assert_eq!(media_kind("/uploads/clip.mov"), MediaKind::Video);
        assert_eq!(media_kind("/uploads/archive.zip"), MediaKind::Video);
    }

    #[test]
    fn query_string_is_ignored() {
        assert_eq!(media_kind("https://cdn.example.com/photo.png?w=640&h=480"), MediaKind::Image);
        assert_eq!(media_kind("https://cdn.example.com/clip.mp4#t=5"), MediaKind::Video);
    }

    #[test]
    fn extensionless_url_is_video() {
        assert_eq!(media_kind("https://cdn.example.com/media/12345"), MediaKind::Video);
    }
}
