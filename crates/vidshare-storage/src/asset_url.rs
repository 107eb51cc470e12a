//! Recovering the asset identity from a URL handed out by the store.

use crate::traits::ResourceKind;

const UPLOAD_MARKER: &str = "/upload/";

/// Identity of a remote asset, as needed by the store's delete call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    /// Path after the upload marker, without version prefix or extension
    pub public_id: String,
    pub kind: ResourceKind,
    /// Lowercased file extension, when the URL carries one
    pub format: Option<String>,
}

/// Strip a leading `v<digits>/` version segment.
fn strip_version(path: &str) -> &str {
    let Some(rest) = path.strip_prefix('v') else {
        return path;
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return path;
    }
    match rest[digits..].strip_prefix('/') {
        Some(after) => after,
        None => path,
    }
}

/// Extract the public id and resource kind from an asset URL.
///
/// Takes everything after `/upload/`, drops any query or fragment, a leading
/// version segment and the trailing extension. Returns `None` when the URL
/// has no upload marker or leaves nothing to identify.
pub fn parse_asset_url(url: &str) -> Option<AssetRef> {
    let start = url.find(UPLOAD_MARKER)? + UPLOAD_MARKER.len();
    let path = &url[start..];
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = strip_version(path);

    let last_slash = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    let (public_id, format) = match path[last_slash..].rfind('.') {
        Some(dot) => {
            let dot = last_slash + dot;
            (&path[..dot], Some(path[dot + 1..].to_ascii_lowercase()))
        }
        None => (path, None),
    };

    if public_id.is_empty() || public_id.ends_with('/') {
        return None;
    }

    let kind = format
        .as_deref()
        .map(ResourceKind::from_extension)
        .unwrap_or(ResourceKind::Image);

    Some(AssetRef {
        public_id: public_id.to_string(),
        kind,
        format: format.filter(|f| !f.is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_versioned_video_url() {
        let asset =
            parse_asset_url("http://res.cloudinary.com/demo/video/upload/v1712345678/abc123.mp4")
                .unwrap();
        assert_eq!(asset.public_id, "abc123");
        assert_eq!(asset.kind, ResourceKind::Video);
        assert_eq!(asset.format.as_deref(), Some("mp4"));
    }

    #[test]
    fn test_parse_image_url_with_folder_and_query() {
        let asset = parse_asset_url(
            "https://res.cloudinary.com/demo/image/upload/v42/thumbs/cat.PNG?_a=BAMAGSa0#top",
        )
        .unwrap();
        assert_eq!(asset.public_id, "thumbs/cat");
        assert_eq!(asset.kind, ResourceKind::Image);
        assert_eq!(asset.format.as_deref(), Some("png"));
    }

    #[test]
    fn test_parse_url_without_version_or_extension() {
        let asset = parse_asset_url("https://cdn.example.com/image/upload/plain").unwrap();
        assert_eq!(asset.public_id, "plain");
        assert_eq!(asset.kind, ResourceKind::Image);
        assert_eq!(asset.format, None);
    }

    #[test]
    fn test_version_like_folder_is_kept() {
        let asset = parse_asset_url("https://x/image/upload/videos/v2.jpg").unwrap();
        assert_eq!(asset.public_id, "videos/v2");
    }

    #[test]
    fn test_dot_in_folder_is_not_an_extension() {
        let asset = parse_asset_url("https://x/video/upload/v1/my.folder/clip").unwrap();
        assert_eq!(asset.public_id, "my.folder/clip");
        assert_eq!(asset.format, None);
    }

    #[test]
    fn test_unparseable_urls() {
        assert!(parse_asset_url("https://example.com/files/a.mp4").is_none());
        assert!(parse_asset_url("https://x/image/upload/").is_none());
        assert!(parse_asset_url("https://x/image/upload/v12/").is_none());
        assert!(parse_asset_url("").is_none());
    }
}
