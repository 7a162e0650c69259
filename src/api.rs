use crate::images;
use crate::supabase::Supabase;
use failure::Error;
use log::{error, info, warn};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::env;
use warp::http::StatusCode;
use warp::Filter;

pub async fn run() {
    let port = env::var("PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(8400u16);
    info!("Listening on port {}", port);
    warp::serve(routes()).run(([0, 0, 0, 0], port)).await;
}

fn routes() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let truck_images = warp::get()
        .and(warp::path!("api" / "trucks" / String / "images"))
        .and_then(truck_images);
    let list_trucks = warp::get()
        .and(warp::path!("api" / "trucks"))
        .and(warp::query::<HashMap<String, String>>())
        .and_then(list_trucks);
    let contact = warp::post()
        .and(warp::path!("api" / "contact"))
        .and(warp::body::json())
        .and_then(submit_contact);
    let inquiry = warp::post()
        .and(warp::path!("api" / "inquiries"))
        .and(warp::body::json())
        .and_then(submit_inquiry);
    let valuation = warp::post()
        .and(warp::path!("api" / "valuations"))
        .and(warp::body::json())
        .and_then(submit_valuation);
    truck_images
        .or(list_trucks)
        .or(contact)
        .or(inquiry)
        .or(valuation)
}

fn reply_with(body: Value, status: StatusCode) -> impl warp::Reply {
    warp::reply::with_status(warp::reply::json(&body), status)
}

// The images and listing routes never surface backend instability; anything
// short of malformed input answers 200 with an empty payload.

async fn truck_images(id: String) -> Result<impl warp::Reply, warp::Rejection> {
    let truck_id: i64 = match id.parse() {
        Ok(truck_id) => truck_id,
        Err(_) => {
            return Ok(reply_with(
                json!({ "error": "Invalid truck ID" }),
                StatusCode::BAD_REQUEST,
            ))
        }
    };

    let supabase = match Supabase::from_env() {
        Some(supabase) => supabase,
        None => {
            error!("Supabase credentials not found in environment");
            return Ok(reply_with(json!({ "images": [] }), StatusCode::OK));
        }
    };

    let truck = match supabase.fetch_truck(truck_id).await {
        Ok(Some(truck)) => truck,
        Ok(None) => {
            warn!("Truck {} not found", truck_id);
            return Ok(reply_with(json!({ "images": [] }), StatusCode::OK));
        }
        Err(e) => {
            error!("Error fetching truck {}: {}", truck_id, e);
            return Ok(reply_with(json!({ "images": [] }), StatusCode::OK));
        }
    };

    let resolved = images::resolve_images(&supabase, &truck).await;
    Ok(reply_with(json!({ "images": resolved }), StatusCode::OK))
}

async fn list_trucks(query: HashMap<String, String>) -> Result<impl warp::Reply, warp::Rejection> {
    let search = query
        .get("search")
        .map(|term| term.trim())
        .filter(|term| !term.is_empty());

    let supabase = match Supabase::from_env() {
        Some(supabase) => supabase,
        None => {
            error!("Supabase credentials not found in environment");
            return Ok(reply_with(json!({ "trucks": [] }), StatusCode::OK));
        }
    };

    if let Some(term) = search {
        // Analytics only; the listing must not fail on it.
        if let Err(e) = supabase
            .insert("search_queries", &json!([{ "query": term }]))
            .await
        {
            warn!("Failed to record search query {:?}: {}", term, e);
        }
    }

    match supabase.fetch_trucks(search).await {
        Ok(trucks) => Ok(reply_with(json!({ "trucks": trucks }), StatusCode::OK)),
        Err(e) => {
            error!("Error fetching trucks: {}", e);
            Ok(reply_with(json!({ "trucks": [] }), StatusCode::OK))
        }
    }
}

// Visitor submissions surface failure, unlike the read routes; silently
// dropping a form would lose the lead.

async fn submit_contact(body: Value) -> Result<impl warp::Reply, warp::Rejection> {
    submit("contact_submissions", &["name", "email", "message"], &["phone"], body).await
}

async fn submit_inquiry(body: Value) -> Result<impl warp::Reply, warp::Rejection> {
    submit(
        "truck_inquiries",
        &["truck_id", "truck_name", "name", "email", "phone"],
        &["message"],
        body,
    )
    .await
}

async fn submit_valuation(body: Value) -> Result<impl warp::Reply, warp::Rejection> {
    submit(
        "valuation_requests",
        &[
            "name",
            "email",
            "phone",
            "truck_manufacturer",
            "truck_model",
            "year",
            "kilometers",
            "condition",
        ],
        &["additional_info"],
        body,
    )
    .await
}

async fn submit(
    table: &str,
    required: &[&str],
    optional: &[&str],
    body: Value,
) -> Result<impl warp::Reply, warp::Rejection> {
    let row = match build_row(&body, required, optional) {
        Ok(row) => row,
        Err(e) => {
            return Ok(reply_with(
                json!({ "error": e.to_string() }),
                StatusCode::BAD_REQUEST,
            ))
        }
    };

    let supabase = match Supabase::from_env() {
        Some(supabase) => supabase,
        None => {
            error!("Supabase credentials not found in environment");
            return Ok(reply_with(
                json!({ "error": "Failed to submit" }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
    };

    match supabase.insert(table, &json!([row])).await {
        Ok(_) => Ok(reply_with(json!({ "ok": true }), StatusCode::OK)),
        Err(e) => {
            error!("Error inserting into {}: {}", table, e);
            Ok(reply_with(
                json!({ "error": "Failed to submit" }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

/// Copies the known fields out of a submission body, rejecting requests
/// with a required field missing, null or blank. Unknown fields are
/// dropped rather than forwarded to the backend.
fn build_row(body: &Value, required: &[&str], optional: &[&str]) -> Result<Value, Error> {
    let mut row = serde_json::Map::new();
    for field in required {
        let value = body.get(*field).cloned().unwrap_or(Value::Null);
        let blank = value
            .as_str()
            .map(|text| text.trim().is_empty())
            .unwrap_or(false);
        if value.is_null() || blank {
            return Err(format_err!("Missing required field: {}", field));
        }
        row.insert((*field).to_string(), value);
    }
    for field in optional {
        if let Some(value) = body.get(*field) {
            if !value.is_null() {
                row.insert((*field).to_string(), value.clone());
            }
        }
    }
    Ok(Value::Object(row))
}
