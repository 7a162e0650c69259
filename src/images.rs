use crate::folder::extract_folder_name;
use crate::mapping;
use crate::supabase::{Supabase, TRUCK_IMAGES_BUCKET};
use crate::types::Truck;
use log::{error, info};
use regex::Regex;
use std::path::Path;

// Fixed listing window; the bucket is far below this today.
const STORAGE_LIST_LIMIT: usize = 1000;

/// Resolves the photo set for a truck. Tiers are tried once each, in
/// order, first non-empty result wins: the precomputed mapping file, then
/// a live bucket listing, then the record's own image reference.
pub async fn resolve_images(supabase: &Supabase, truck: &Truck) -> Vec<String> {
    resolve_with_mapping(supabase, truck, Path::new(mapping::MAPPING_FILE)).await
}

async fn resolve_with_mapping(
    supabase: &Supabase,
    truck: &Truck,
    mapping_path: &Path,
) -> Vec<String> {
    let image_url = truck.image_url.as_deref().unwrap_or("");
    if let Some(folder) = extract_folder_name(&truck.name, image_url) {
        let mapped = mapping::folder_images(mapping_path, &folder);
        if !mapped.is_empty() {
            info!("Found {} mapped images for folder {}", mapped.len(), folder);
            return mapped;
        }

        let listed = storage_images(supabase, &folder).await;
        if !listed.is_empty() {
            info!("Found {} stored images for folder {}", listed.len(), folder);
            return listed;
        }
    }

    info!(
        "No folder images for truck {}, falling back to its own image",
        truck.id
    );
    fallback_images(truck)
}

/// Last tier: the record's own image reference, if it has one. An empty
/// reference counts as absent.
pub fn fallback_images(truck: &Truck) -> Vec<String> {
    match &truck.image_url {
        Some(url) if !url.is_empty() => vec![url.clone()],
        _ => Vec::new(),
    }
}

async fn storage_images(supabase: &Supabase, folder: &str) -> Vec<String> {
    let names = match supabase.list_bucket(TRUCK_IMAGES_BUCKET, STORAGE_LIST_LIMIT).await {
        Ok(names) => names,
        Err(e) => {
            error!("Error listing storage for folder {}: {}", folder, e);
            return Vec::new();
        }
    };
    matching_object_names(&names, folder)
        .into_iter()
        .filter_map(|name| match supabase.public_url(TRUCK_IMAGES_BUCKET, name) {
            Ok(url) => Some(url),
            Err(e) => {
                error!("Skipping object {:?}: {}", name, e);
                None
            }
        })
        .collect()
}

/// Upload naming is inconsistent: an object matches on the hyphenated
/// search token, the space-to-hyphen variant, or the compact no-separator
/// variant. The first two coincide at the moment; all three checks stay.
// TODO: confirm with the upload tooling which naming variants actually occur.
fn matching_object_names<'a>(names: &'a [String], folder: &str) -> Vec<&'a str> {
    let whitespace = Regex::new(r"\s+").unwrap();
    let search_token = whitespace.replace_all(folder, "-").to_uppercase();
    let hyphenated = whitespace.replace_all(folder, "-").to_uppercase();
    let compact = whitespace.replace_all(folder, "").to_uppercase();
    names
        .iter()
        .filter(|name| {
            let upper = name.to_uppercase();
            upper.contains(&search_token)
                || upper.contains(&hyphenated)
                || upper.contains(&compact)
        })
        .map(|name| name.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{fallback_images, matching_object_names, resolve_with_mapping};
    use crate::supabase::Supabase;
    use crate::types::Truck;
    use std::io::Write;
    use std::path::Path;
    use url::Url;

    fn truck(image_url: Option<&str>) -> Truck {
        Truck {
            id: 1,
            name: "HR 38 W 2162".to_string(),
            image_url: image_url.map(|url| url.to_string()),
        }
    }

    // A backend nothing listens on; any storage call fails and degrades.
    fn unreachable_supabase() -> Supabase {
        Supabase::new(Url::parse("http://127.0.0.1:9").unwrap(), "anon".to_string())
    }

    #[test]
    fn matches_all_naming_variants() {
        let names: Vec<String> = [
            "HR-38-W-2162-front.jpg",
            "hr-38-w-2162-rear.jpg",
            "HR38W2162_cabin.jpg",
            "HR-11-A-1111-front.jpg",
            "logo.png",
        ]
        .iter()
        .map(|name| name.to_string())
        .collect();
        assert_eq!(
            matching_object_names(&names, "HR 38 W 2162"),
            [
                "HR-38-W-2162-front.jpg",
                "hr-38-w-2162-rear.jpg",
                "HR38W2162_cabin.jpg"
            ]
        );
    }

    #[test]
    fn matches_nothing_on_empty_listing() {
        assert!(matching_object_names(&[], "HR 38 W 2162").is_empty());
    }

    #[test]
    fn fallback_uses_the_image_reference() {
        assert_eq!(fallback_images(&truck(Some("/trucks/prima.png"))), ["/trucks/prima.png"]);
    }

    #[test]
    fn fallback_treats_empty_reference_as_absent() {
        assert!(fallback_images(&truck(Some(""))).is_empty());
        assert!(fallback_images(&truck(None)).is_empty());
    }

    #[tokio::test]
    async fn mapping_hit_bypasses_storage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"[{"folderName": "HR-38-W-2162", "supabaseUrl": "https://cdn.example/1.jpg"}]"#,
        )
        .unwrap();
        let resolved =
            resolve_with_mapping(&unreachable_supabase(), &truck(None), file.path()).await;
        assert_eq!(resolved, ["https://cdn.example/1.jpg"]);
    }

    #[tokio::test]
    async fn no_folder_skips_straight_to_the_fallback() {
        let no_plate = Truck {
            id: 2,
            name: "Tata Prima".to_string(),
            image_url: Some("/trucks/prima.png".to_string()),
        };
        let resolved = resolve_with_mapping(
            &unreachable_supabase(),
            &no_plate,
            Path::new("/nonexistent/mapping.json"),
        )
        .await;
        assert_eq!(resolved, ["/trucks/prima.png"]);
    }

    #[tokio::test]
    async fn dead_tiers_and_blank_reference_resolve_to_nothing() {
        let resolved = resolve_with_mapping(
            &unreachable_supabase(),
            &truck(Some("")),
            Path::new("/nonexistent/mapping.json"),
        )
        .await;
        assert!(resolved.is_empty());
    }
}
