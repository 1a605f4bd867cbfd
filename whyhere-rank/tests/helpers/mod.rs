//! Test helpers: a local stand-in for the `/data/pois` service
//!
//! The fake backend picks its reply from the request body:
//! - `budget` 500: HTTP 500 with a plain-text body
//! - `budget` 501: `{"success": false}`
//! - `budget` 502: a non-JSON body
//! - `budget` 503: sleeps past any short client timeout
//! - parks weighted 8 (top priority): replies after a delay with "slow-*" records
//! - anything else: replies at once with "fast-*" records

#![allow(dead_code)]

use axum::{http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::time::Duration;

/// Delay of the "slow" reply
pub const SLOW_REPLY: Duration = Duration::from_millis(400);

fn records(prefix: &str) -> Value {
    json!([
        {
            "hex_id": format!("{}-a", prefix),
            "lat": 33.78, "lon": -84.38,
            "neighborhood": "Midtown, Atlanta, GA",
            "crime_incident_accessibility": 0.9,
            "school_accessibility": 0.2,
            "marta_stop_accessibility": 12.0,
            "restaurant_accessibility": 40,
            "park_accessibility": 0.1,
            "grocery_store_accessibility": 3,
            "hospital_accessibility": 1.0,
            "police_station_accessibility": 0.5
        },
        {
            "hex_id": format!("{}-b", prefix),
            "lat": 33.75, "lon": -84.40,
            "location_name": "West End",
            "crime_incident_accessibility": 0.1,
            "school_accessibility": 0.8,
            "marta_stop_accessibility": 2.0,
            "restaurant_accessibility": 10,
            "park_accessibility": 0.9,
            "grocery_store_accessibility": 1,
            "hospital_accessibility": 0.2,
            "police_station_accessibility": 0.5
        },
        {
            "hex_id": format!("{}-c", prefix),
            "neighborhood": "",
            "user_match_score": 0.55,
            "crime_incident_accessibility": "n/a",
            "park_accessibility": 0.5,
            "police_station_accessibility": 0.5
        }
    ])
}

async fn data_pois(Json(body): Json<Value>) -> impl IntoResponse {
    let budget = body["budget"].as_f64().unwrap_or_default();
    let parks_weight = body["user_weights"]["park"].as_u64().unwrap_or_default();

    if budget == 500.0 {
        return (StatusCode::INTERNAL_SERVER_ERROR, "model unavailable".to_string()).into_response();
    }
    if budget == 501.0 {
        return Json(json!({"success": false, "error": "bad input"})).into_response();
    }
    if budget == 502.0 {
        return (StatusCode::OK, "<html>oops</html>".to_string()).into_response();
    }
    if budget == 503.0 {
        tokio::time::sleep(Duration::from_secs(5)).await;
    }

    if parks_weight == 8 {
        tokio::time::sleep(SLOW_REPLY).await;
        return Json(json!({"success": true, "data": records("slow")})).into_response();
    }

    Json(json!({"success": true, "data": records("fast")})).into_response()
}

/// Start the fake backend on an ephemeral port; returns its base URL
pub async fn spawn_fake_backend() -> String {
    let app = Router::new().route("/data/pois", post(data_pois));
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Priority order with parks first (triggers the slow reply)
pub fn parks_first() -> whyhere_common::PriorityList {
    "parks,crime,schools,martaStops,restaurants,grocery,hospitals,policeStations"
        .parse()
        .unwrap()
}
