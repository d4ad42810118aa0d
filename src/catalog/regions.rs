//! Region codes used by the camera list (`kraj` field).

/// Region code → full region name
pub const REGIONS: &[(&str, &str)] = &[
    ("A", "Hlavní město Praha"),
    ("S", "Středočeský kraj"),
    ("C", "Jihočeský kraj"),
    ("P", "Plzeňský kraj"),
    ("K", "Karlovarský kraj"),
    ("U", "Ústecký kraj"),
    ("L", "Liberecký kraj"),
    ("H", "Královéhradecký kraj"),
    ("E", "Pardubický kraj"),
    ("M", "Olomoucký kraj"),
    ("T", "Moravskoslezský kraj"),
    ("B", "Jihomoravský kraj"),
    ("Z", "Zlínský kraj"),
    ("J", "Kraj Vysočina"),
];

/// Full name for a region code. Unknown codes are returned unchanged.
pub fn region_name(code: &str) -> &str {
    REGIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(region_name("A"), "Hlavní město Praha");
        assert_eq!(region_name("J"), "Kraj Vysočina");
        assert_eq!(REGIONS.len(), 14);
    }

    #[test]
    fn test_unknown_code_passthrough() {
        assert_eq!(region_name("X"), "X");
        assert_eq!(region_name(""), "");
    }
}
