use regex::Regex;

// Registration plates like "HR-38-W-2162" or "HR 38 W 2162", with or
// without separators.
const PLATE_PATTERN: &str = r"(?i)HR[- ]?\d+[- ]?[A-Z][- ]?\d+";

/// Canonical form used for all folder comparisons: hyphens become spaces,
/// whitespace runs collapse to one space, trimmed, uppercased. Separators
/// are never inserted, so a compact source stays compact.
pub fn normalize_folder_name(s: &str) -> String {
    let collapse = Regex::new(r"\s+").unwrap();
    collapse
        .replace_all(&s.replace('-', " "), " ")
        .trim()
        .to_uppercase()
}

/// Derives the photo-folder identifier for a truck, or None when neither
/// source carries a plate. No folder association is a valid outcome, not
/// an error.
pub fn extract_folder_name(name: &str, image_url: &str) -> Option<String> {
    let pattern = Regex::new(PLATE_PATTERN).unwrap();

    // The image reference is the most reliable source.
    if !image_url.is_empty() {
        if let Some(m) = pattern.find(image_url) {
            return Some(normalize_folder_name(m.as_str()));
        }
    }

    if !name.is_empty() {
        if let Some(m) = pattern.find(name) {
            return Some(normalize_folder_name(m.as_str()));
        }
        // Some listings use the bare plate as the whole display name.
        let anchored = Regex::new(&format!("^{}", PLATE_PATTERN)).unwrap();
        if let Some(m) = anchored.find(name.trim()) {
            return Some(normalize_folder_name(m.as_str()));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::{extract_folder_name, normalize_folder_name};

    #[test]
    fn normalizes_separator_variants() {
        assert_eq!(normalize_folder_name("HR-38-W-2162"), "HR 38 W 2162");
        assert_eq!(normalize_folder_name("HR 38 W 2162"), "HR 38 W 2162");
        assert_eq!(normalize_folder_name("hr-38-w-2162"), "HR 38 W 2162");
        assert_eq!(normalize_folder_name("  hr   38  w   2162 "), "HR 38 W 2162");
    }

    #[test]
    fn normalization_never_inserts_separators() {
        assert_eq!(normalize_folder_name("hr38w2162"), "HR38W2162");
    }

    #[test]
    fn extracts_from_image_url() {
        assert_eq!(
            extract_folder_name("Tata Prima", "/uploads/HR-38-W-2162/front.jpg"),
            Some("HR 38 W 2162".to_string())
        );
    }

    #[test]
    fn image_url_wins_over_name() {
        assert_eq!(
            extract_folder_name("HR-11-A-1111", "/uploads/HR-38-W-2162/front.jpg"),
            Some("HR 38 W 2162".to_string())
        );
    }

    #[test]
    fn extracts_from_name_when_url_has_no_plate() {
        assert_eq!(
            extract_folder_name("Eicher Pro HR 22 C 9087", "/img/truck.png"),
            Some("HR 22 C 9087".to_string())
        );
    }

    #[test]
    fn extracts_bare_plate_names() {
        assert_eq!(
            extract_folder_name(" hr 38 w 2162 ", ""),
            Some("HR 38 W 2162".to_string())
        );
        assert_eq!(extract_folder_name("hr38w2162", ""), Some("HR38W2162".to_string()));
    }

    #[test]
    fn no_plate_means_no_folder() {
        assert_eq!(extract_folder_name("Tata Prima", ""), None);
        assert_eq!(extract_folder_name("", ""), None);
        assert_eq!(extract_folder_name("Mahindra Pickup", "/img/pickup.png"), None);
    }
}
