//! URL builders for camera imagery.
//!
//! Direct image and thumbnail URLs point at the public camera file server
//! (`[catalog] image_base_url`). The thumbnail path (`thumbs/{id}.gif`) is
//! undocumented upstream.

/// Default base URL of the public camera file server
pub const DIRECT_IMAGE_BASE: &str = "https://intranet.chmi.cz/files/portal/docs/meteo/kam";

/// Current full-size image for a camera
pub fn image_url(base: &str, camera_id: &str) -> String {
    format!("{}/{}.jpg", base.trim_end_matches('/'), camera_id)
}

/// Thumbnail used for map markers
pub fn thumbnail_url(base: &str, camera_id: &str) -> String {
    format!("{}/thumbs/{}.gif", base.trim_end_matches('/'), camera_id)
}

/// Relay path for a camera's history metadata
pub fn history_path(camera_id: &str) -> String {
    format!("/api/history/{}", camera_id)
}

/// Relay path for one historical frame. The timestamp is percent-encoded
/// so that `:` and `+` survive as a single path segment.
pub fn historical_image_path(camera_id: &str, date_time: &str) -> String {
    format!(
        "/api/image/{}/{}",
        camera_id,
        urlencoding::encode(date_time)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_urls() {
        assert_eq!(
            image_url(DIRECT_IMAGE_BASE, "snezka"),
            "https://intranet.chmi.cz/files/portal/docs/meteo/kam/snezka.jpg"
        );
        assert_eq!(
            thumbnail_url(DIRECT_IMAGE_BASE, "snezka"),
            "https://intranet.chmi.cz/files/portal/docs/meteo/kam/thumbs/snezka.gif"
        );
        assert_eq!(
            image_url("http://mirror.local/kam/", "snezka"),
            "http://mirror.local/kam/snezka.jpg"
        );
    }

    #[test]
    fn test_relay_paths() {
        assert_eq!(history_path("lysa"), "/api/history/lysa");
        assert_eq!(
            historical_image_path("lysa", "2025-01-02T10:20:00+01:00"),
            "/api/image/lysa/2025-01-02T10%3A20%3A00%2B01%3A00"
        );
    }
}
