use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

/// One scripted upstream reply. The last entry repeats once the script runs out.
#[derive(Clone, Debug)]
pub enum Scripted {
    Status(u16),
    Json(Value),
    Delay(Duration, Value),
}

#[derive(Clone)]
struct UpstreamState {
    script: Arc<Vec<Scripted>>,
    hits: Arc<AtomicUsize>,
}

pub struct Upstream {
    pub url: String,
    hits: Arc<AtomicUsize>,
}

impl Upstream {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

pub async fn spawn_upstream(script: Vec<Scripted>) -> Upstream {
    let hits = Arc::new(AtomicUsize::new(0));
    let state = UpstreamState { script: Arc::new(script), hits: hits.clone() };
    let app = Router::new().route("/products", get(serve)).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind upstream");
    let address = listener.local_addr().expect("upstream address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Upstream { url: format!("http://{address}/products"), hits }
}

async fn serve(State(state): State<UpstreamState>) -> Response {
    let index = state.hits.fetch_add(1, Ordering::SeqCst);
    let step = state.script.get(index).or_else(|| state.script.last()).cloned();

    match step {
        Some(Scripted::Status(code)) => {
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR).into_response()
        }
        Some(Scripted::Json(body)) => Json(body).into_response(),
        Some(Scripted::Delay(delay, body)) => {
            tokio::time::sleep(delay).await;
            Json(body).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub fn sample_records() -> Value {
    json!([
        {
            "id": 1,
            "title": "Slim Fit Shirt",
            "price": 22.3,
            "image": "https://img.example/shirt.jpg",
            "category": "men's clothing",
            "rating": {"rate": 4.1, "count": 259}
        },
        {
            "id": 5,
            "title": "Silver Dragon Bracelet",
            "price": 695.0,
            "image": "https://img.example/bracelet.jpg",
            "category": "jewelery",
            "rating": {"rate": 4.6, "count": 400}
        },
        {
            "id": 9,
            "title": "Portable External Drive",
            "price": 64.0,
            "image": "https://img.example/drive.jpg",
            "category": "electronics"
        }
    ])
}
