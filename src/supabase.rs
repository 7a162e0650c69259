use crate::types::Truck;
use failure::Error;
use futures::TryFutureExt;
use log::warn;
use serde_json::{json, Value};
use std::env;
use url::Url;

pub const TRUCK_IMAGES_BUCKET: &str = "truck-images";

/// Thin client over the hosted backend's REST and Storage HTTP APIs. All
/// persistence and querying is delegated to it; this service keeps no state
/// of its own.
pub struct Supabase {
    base: Url,
    key: String,
    client: reqwest::Client,
}

impl Supabase {
    pub fn new(base: Url, key: String) -> Supabase {
        Supabase {
            base,
            key,
            client: reqwest::Client::new(),
        }
    }

    /// None when the credentials are not configured; callers log and
    /// degrade rather than fail.
    pub fn from_env() -> Option<Supabase> {
        match (env::var("SUPABASE_URL"), env::var("SUPABASE_ANON_KEY")) {
            (Ok(base), Ok(key)) => match Url::parse(&base) {
                Ok(base) => Some(Supabase::new(base, key)),
                Err(e) => {
                    warn!("Invalid SUPABASE_URL {:?}: {}", base, e);
                    None
                }
            },
            _ => None,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        self.base
            .join(path)
            .map_err(|e| format_err!("Invalid endpoint {}: {}", path, e))
    }

    fn auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.key)
            .header("Authorization", format!("Bearer {}", self.key))
    }

    /// Fetches the id, name and image reference of one truck row.
    pub async fn fetch_truck(&self, id: i64) -> Result<Option<Truck>, Error> {
        let id_filter = format!("eq.{}", id);
        let response = self
            .auth(self.client.get(self.endpoint("/rest/v1/trucks")?))
            .query(&[
                ("select", "id,name,image_url"),
                ("id", id_filter.as_str()),
                ("limit", "1"),
            ])
            .send()
            .map_err(|e| format_err!("Error fetching truck {}: {}", id, e))
            .await?
            .error_for_status()
            .map_err(|e| format_err!("Truck fetch failed: {}", e))?;
        let rows: Value = response
            .json()
            .map_err(|e| format_err!("Invalid truck response: {}", e))
            .await?;
        let rows = rows
            .as_array()
            .ok_or_else(|| format_err!("Expected an array of trucks, got {}", rows))?;
        match rows.first() {
            Some(row) => Ok(Some(truck_from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Fetches full truck rows, newest first, optionally filtered by a
    /// case-insensitive search over name, manufacturer and model.
    pub async fn fetch_trucks(&self, search: Option<&str>) -> Result<Vec<Value>, Error> {
        let mut query = vec![
            ("select".to_string(), "*".to_string()),
            ("order".to_string(), "created_at.desc".to_string()),
        ];
        if let Some(term) = search {
            query.push((
                "or".to_string(),
                format!(
                    "(name.ilike.*{term}*,manufacturer.ilike.*{term}*,model.ilike.*{term}*)",
                    term = term
                ),
            ));
        }
        let rows: Value = self
            .auth(self.client.get(self.endpoint("/rest/v1/trucks")?))
            .query(&query)
            .send()
            .map_err(|e| format_err!("Error fetching trucks: {}", e))
            .await?
            .error_for_status()
            .map_err(|e| format_err!("Truck listing failed: {}", e))?
            .json()
            .map_err(|e| format_err!("Invalid truck listing: {}", e))
            .await?;
        rows.as_array()
            .cloned()
            .ok_or_else(|| format_err!("Expected an array of trucks, got {}", rows))
    }

    /// Inserts rows into a table, returning the inserted representation.
    pub async fn insert(&self, table: &str, rows: &Value) -> Result<Value, Error> {
        let response = self
            .auth(self.client.post(self.endpoint(&format!("/rest/v1/{}", table))?))
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .map_err(|e| format_err!("Error inserting into {}: {}", table, e))
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format_err!(
                "Insert into {} failed with {}: {}",
                table,
                status,
                body
            ));
        }
        response
            .json()
            .map_err(|e| format_err!("Invalid insert response: {}", e))
            .await
    }

    /// Lists object names in a storage bucket, name ascending, up to limit.
    pub async fn list_bucket(&self, bucket: &str, limit: usize) -> Result<Vec<String>, Error> {
        let body = json!({
            "prefix": "",
            "limit": limit,
            "sortBy": { "column": "name", "order": "asc" },
        });
        let entries: Value = self
            .auth(
                self.client
                    .post(self.endpoint(&format!("/storage/v1/object/list/{}", bucket))?),
            )
            .json(&body)
            .send()
            .map_err(|e| format_err!("Error listing bucket {}: {}", bucket, e))
            .await?
            .error_for_status()
            .map_err(|e| format_err!("Bucket listing failed: {}", e))?
            .json()
            .map_err(|e| format_err!("Invalid bucket listing: {}", e))
            .await?;
        let entries = entries
            .as_array()
            .ok_or_else(|| format_err!("Expected an array of objects, got {}", entries))?;
        Ok(entries
            .iter()
            .filter_map(|entry| entry["name"].as_str())
            .map(|name| name.to_string())
            .collect())
    }

    /// Public URL for a stored object.
    pub fn public_url(&self, bucket: &str, name: &str) -> Result<String, Error> {
        self.base
            .join(&format!("/storage/v1/object/public/{}/{}", bucket, name))
            .map(|url| url.to_string())
            .map_err(|e| format_err!("Cannot build public URL for {:?}: {}", name, e))
    }
}

fn truck_from_row(row: &Value) -> Result<Truck, Error> {
    Ok(Truck {
        id: row["id"]
            .as_i64()
            .ok_or_else(|| format_err!("Missing truck id in {}", row))?,
        name: row["name"].as_str().unwrap_or("").to_string(),
        image_url: row["image_url"].as_str().map(|url| url.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Supabase {
        Supabase::new(
            Url::parse("https://example.supabase.co").unwrap(),
            "anon-key".to_string(),
        )
    }

    #[test]
    fn builds_public_urls() {
        assert_eq!(
            client()
                .public_url(TRUCK_IMAGES_BUCKET, "HR-38-W-2162-front.jpg")
                .unwrap(),
            "https://example.supabase.co/storage/v1/object/public/truck-images/HR-38-W-2162-front.jpg"
        );
    }

    #[test]
    fn public_urls_escape_object_names() {
        assert_eq!(
            client()
                .public_url(TRUCK_IMAGES_BUCKET, "HR 38 W 2162/front.jpg")
                .unwrap(),
            "https://example.supabase.co/storage/v1/object/public/truck-images/HR%2038%20W%202162/front.jpg"
        );
    }

    #[test]
    fn parses_truck_rows() {
        let truck = truck_from_row(&json!({
            "id": 7,
            "name": "HR 38 W 2162",
            "image_url": null,
        }))
        .unwrap();
        assert_eq!(truck.id, 7);
        assert_eq!(truck.name, "HR 38 W 2162");
        assert!(truck.image_url.is_none());
    }

    #[test]
    fn rejects_truck_rows_without_id() {
        assert!(truck_from_row(&json!({ "name": "Tata Prima" })).is_err());
    }
}
