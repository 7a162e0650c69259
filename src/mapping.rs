use crate::folder::normalize_folder_name;
use log::{debug, warn};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Snapshot produced by the photo-upload tooling, associating folder names
/// with uploaded image URLs. Fresh checkouts may not have one.
pub const MAPPING_FILE: &str = "hr-folders-upload-mapping.json";

/// Loads the mapping snapshot. An absent, unreadable or malformed file is
/// treated as "no mapping available", never as a failure.
pub fn load_mapping(path: &Path) -> Vec<Value> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            debug!("No mapping file at {:?}: {}", path, e);
            return Vec::new();
        }
    };
    match serde_json::from_str(&contents) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => {
            warn!("Mapping file {:?} is not a JSON array", path);
            Vec::new()
        }
        Err(e) => {
            warn!("Failed to parse mapping file {:?}: {}", path, e);
            Vec::new()
        }
    }
}

/// Returns the mapped image URLs for a folder, in file order, skipping
/// entries without a usable URL.
pub fn folder_images(path: &Path, folder: &str) -> Vec<String> {
    let target = normalize_folder_name(folder);
    load_mapping(path)
        .iter()
        .filter(|entry| {
            entry["folderName"]
                .as_str()
                .map(|name| normalize_folder_name(name) == target)
                .unwrap_or(false)
        })
        .filter_map(|entry| entry["supabaseUrl"].as_str())
        .filter(|url| !url.is_empty())
        .map(|url| url.to_string())
        .collect()
}
