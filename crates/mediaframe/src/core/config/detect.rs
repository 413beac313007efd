//! Content Type Detection
//!
//! Pure function of the content source. Checks run in a fixed order because
//! hostnames and extensions can overlap; the video check always runs first.

use url::Url;

use crate::core::ContentType;

/// Hostnames (matched on suffix) served by video platforms
const VIDEO_HOSTS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "youtube-nocookie.com",
    "vimeo.com",
    "dailymotion.com",
];

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "mov", "avi"];
const MODEL_EXTENSIONS: &[&str] = &["glb", "gltf", "obj", "fbx", "3ds"];
const SPLAT_EXTENSIONS: &[&str] = &["ply"];
const PDF_EXTENSIONS: &[&str] = &["pdf"];

const H5P_MARKER: &str = "h5p";

/// Detects the content type for a source URI
pub fn detect_type(src: &str) -> ContentType {
    let src = src.trim();
    if src.is_empty() {
        return ContentType::Iframe;
    }

    let (host, path) = split_host_path(src);
    let ext = extension(&path);

    if host.as_deref().is_some_and(is_video_host) || matches_ext(&ext, VIDEO_EXTENSIONS) {
        ContentType::Video
    } else if matches_ext(&ext, MODEL_EXTENSIONS) {
        ContentType::Model
    } else if matches_ext(&ext, SPLAT_EXTENSIONS) {
        ContentType::Supersplat
    } else if matches_ext(&ext, PDF_EXTENSIONS) {
        ContentType::Pdf
    } else if host.as_deref().is_some_and(|h| h.contains(H5P_MARKER))
        || path.contains(H5P_MARKER)
    {
        ContentType::H5p
    } else {
        ContentType::Iframe
    }
}

/// Lowercased hostname (absolute URIs only) and lowercased path without query/fragment
fn split_host_path(src: &str) -> (Option<String>, String) {
    match Url::parse(src) {
        Ok(url) => (
            url.host_str().map(|h| h.to_ascii_lowercase()),
            url.path().to_ascii_lowercase(),
        ),
        Err(_) => {
            let end = src.find(['?', '#']).unwrap_or(src.len());
            (None, src[..end].to_ascii_lowercase())
        }
    }
}

fn extension(path: &str) -> Option<String> {
    let file = path.rsplit('/').next().unwrap_or(path);
    let (stem, ext) = file.rsplit_once('.')?;
    (!stem.is_empty() && !ext.is_empty()).then(|| ext.to_string())
}

fn matches_ext(ext: &Option<String>, table: &[&str]) -> bool {
    ext.as_deref().is_some_and(|e| table.contains(&e))
}

fn is_video_host(host: &str) -> bool {
    VIDEO_HOSTS
        .iter()
        .any(|known| host == *known || host.ends_with(&format!(".{}", known)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_examples() {
        assert_eq!(detect_type("file.mp4"), ContentType::Video);
        assert_eq!(detect_type("scene.ply"), ContentType::Supersplat);
        assert_eq!(detect_type("doc.pdf"), ContentType::Pdf);
        assert_eq!(detect_type(""), ContentType::Iframe);
    }

    #[test]
    fn test_video_extensions() {
        for src in ["a.mp4", "a.webm", "a.ogg", "a.mov", "a.avi", "A.MP4"] {
            assert_eq!(detect_type(src), ContentType::Video, "{}", src);
        }
    }

    #[test]
    fn test_model_extensions() {
        for src in ["a.glb", "a.gltf", "a.obj", "a.fbx", "a.3ds"] {
            assert_eq!(detect_type(src), ContentType::Model, "{}", src);
        }
    }

    #[test]
    fn test_video_hosts() {
        assert_eq!(
            detect_type("https://www.youtube.com/watch?v=abc"),
            ContentType::Video
        );
        assert_eq!(detect_type("https://youtu.be/abc"), ContentType::Video);
        assert_eq!(detect_type("https://player.vimeo.com/video/1"), ContentType::Video);
        assert_eq!(
            detect_type("https://notyoutube.com/page"),
            ContentType::Iframe
        );
    }

    #[test]
    fn test_query_and_fragment_ignored() {
        assert_eq!(
            detect_type("https://cdn.example.org/lecture.mp4?token=x.pdf"),
            ContentType::Video
        );
        assert_eq!(detect_type("notes.pdf#page=2"), ContentType::Pdf);
        assert_eq!(detect_type("model.glb?v=3"), ContentType::Model);
    }

    #[test]
    fn test_video_check_precedes_h5p_marker() {
        assert_eq!(
            detect_type("https://h5p.example.org/media/intro.mp4"),
            ContentType::Video
        );
    }

    #[test]
    fn test_h5p_marker() {
        assert_eq!(
            detect_type("https://h5p.org/node/1234"),
            ContentType::H5p
        );
        assert_eq!(
            detect_type("https://lms.example.org/h5p/embed/7"),
            ContentType::H5p
        );
    }

    #[test]
    fn test_fallback_iframe() {
        assert_eq!(detect_type("https://example.org/"), ContentType::Iframe);
        assert_eq!(detect_type("readme"), ContentType::Iframe);
        assert_eq!(detect_type(".mp4"), ContentType::Iframe);
        assert_eq!(detect_type("archive.zip"), ContentType::Iframe);
    }
}
