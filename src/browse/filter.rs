//! Search filter for the camera list.

use crate::catalog::Camera;

/// Case-insensitive substring match on camera name or full region name.
/// An empty (or whitespace-only) term matches everything.
pub fn matches_search(camera: &Camera, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    camera.name.to_lowercase().contains(&needle)
        || camera.region_name().to_lowercase().contains(&needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cam() -> Camera {
        Camera::new("lysa", "Lysá hora", 49.54, 18.45).region("T")
    }

    #[test]
    fn test_matches_name() {
        assert!(matches_search(&cam(), "lysá"));
        assert!(matches_search(&cam(), "HORA"));
        assert!(!matches_search(&cam(), "sněžka"));
    }

    #[test]
    fn test_matches_region_full_name() {
        assert!(matches_search(&cam(), "moravskoslez"));
        // unknown codes are searched as-is
        assert!(matches_search(&Camera::new("x", "X", 0.0, 0.0).region("Q"), "q"));
    }

    #[test]
    fn test_empty_term_matches() {
        assert!(matches_search(&cam(), ""));
        assert!(matches_search(&cam(), "   "));
    }
}
