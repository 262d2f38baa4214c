//! Shared fixtures: model builders, an in-process labeling fake and a fake
//! Vision AI API served over HTTP.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Form, Json, Router,
};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use vision_ai_console::client::ClientError;
use vision_ai_console::models::*;
use vision_ai_console::workflow::LabelingApi;

pub const USERNAME: &str = "annotator";
pub const PASSWORD: &str = "s3cret";
pub const TOKEN: &str = "valid-token";

// ============================================================
// Model builders
// ============================================================

pub fn identification(image: &str, object: &str) -> Identification {
    Identification {
        id: Uuid::new_v4(),
        object: object.to_string(),
        title: None,
        question: Some(format!("Question about {}", object)),
        explanation: None,
        snapshot: Snapshot {
            id: None,
            image_url: image.to_string(),
            camera_id: None,
            timestamp: None,
        },
        status: None,
        label: None,
        label_text: None,
        timestamp: None,
    }
}

pub fn label(value: &str) -> Label {
    Label {
        id: Uuid::new_v4(),
        value: value.to_string(),
        text: format!("Text {}", value),
        criteria: None,
        identification_guide: None,
        order: None,
    }
}

pub fn object(slug: &str, values: &[&str]) -> ObjectDefinition {
    ObjectDefinition {
        id: Uuid::new_v4(),
        name: slug.to_string(),
        slug: slug.to_string(),
        title: None,
        question: None,
        explanation: None,
        labels: values.iter().map(|v| label(v)).collect(),
    }
}

/// Catalog covering the objects used by the skip rules.
pub fn catalog() -> Vec<ObjectDefinition> {
    vec![
        object("image_corrupted", &["true", "false", "null"]),
        object("rain", &["true", "false", "null"]),
        object("water_level", &["low", "medium", "high", "null"]),
        object("road_blockade", &["free", "partially", "totally_blocked"]),
        object("image_description", &["null"]),
    ]
}

// ============================================================
// In-process labeling fake
// ============================================================

#[derive(Debug, Default)]
pub struct FakeLabeling {
    pub queue: Vec<Identification>,
    pub objects: Vec<ObjectDefinition>,
    pub submissions: Mutex<Vec<Submission>>,
    /// Submissions for these identifications fail with a server error.
    pub failing: Mutex<HashSet<Uuid>>,
    /// Every call fails with 401.
    pub unauthorized: bool,
    /// Queue loads after this many succeed fail with 503.
    pub outage_after: Option<usize>,
    pub queue_loads: Mutex<usize>,
}

impl FakeLabeling {
    pub fn new(queue: Vec<Identification>) -> Self {
        Self {
            queue,
            objects: catalog(),
            ..Default::default()
        }
    }

    pub fn fail_for(&self, id: Uuid) {
        self.failing.lock().insert(id);
    }

    pub fn submitted(&self) -> Vec<(Uuid, String)> {
        self.submissions
            .lock()
            .iter()
            .map(|s| (s.identification_id, s.label.clone()))
            .collect()
    }
}

impl LabelingApi for FakeLabeling {
    async fn load_queue(&self, _page_size: u32) -> Result<Vec<Identification>, ClientError> {
        if self.unauthorized {
            return Err(ClientError::Unauthorized);
        }
        let mut loads = self.queue_loads.lock();
        *loads += 1;
        if self.outage_after.is_some_and(|limit| *loads > limit) {
            return Err(ClientError::Server("503 Service Unavailable: down".to_string()));
        }
        Ok(self.queue.clone())
    }

    async fn load_catalog(&self, _page_size: u32) -> Result<Vec<ObjectDefinition>, ClientError> {
        if self.unauthorized {
            return Err(ClientError::Unauthorized);
        }
        Ok(self.objects.clone())
    }

    async fn submit(&self, identification_id: Uuid, label: &str) -> Result<(), ClientError> {
        if self.unauthorized {
            return Err(ClientError::Unauthorized);
        }
        if self.failing.lock().contains(&identification_id) {
            return Err(ClientError::Server("500 Internal Server Error: boom".to_string()));
        }
        self.submissions.lock().push(Submission {
            identification_id,
            label: label.to_string(),
        });
        Ok(())
    }
}

// ============================================================
// Fake HTTP API
// ============================================================

#[derive(Debug, Default)]
pub struct ApiState {
    pub identifications: Vec<Identification>,
    pub objects: Vec<ObjectDefinition>,
    pub cameras: Vec<Camera>,
    pub prompts: Vec<Prompt>,
    pub submissions: Vec<Submission>,
    /// `Authorization` header of every resource request, in arrival order.
    pub auth_headers: Vec<Option<String>>,
    /// Delay before answering a given page number.
    pub page_delays: HashMap<u32, Duration>,
    /// Answer every resource request with 500.
    pub broken: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FakeApi {
    pub state: Arc<Mutex<ApiState>>,
}

#[derive(Debug, Deserialize)]
struct PageParams {
    page: Option<u32>,
    size: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, f: impl FnOnce(&mut ApiState)) -> Self {
        f(&mut self.state.lock());
        self
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().auth_headers.len()
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.state.lock().submissions.clone()
    }

    /// Serve on an ephemeral port and return the base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/auth/token", post(token))
            .route("/identifications/ai", get(list_identifications))
            .route("/identifications", post(submit))
            .route("/objects", get(list_objects))
            .route("/cameras", get(list_cameras))
            .route("/prompts", get(list_prompts))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake API");
        let addr = listener.local_addr().expect("No local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Fake API crashed");
        });
        format!("http://{}", addr)
    }

    /// Record the header and check the bearer token.
    fn authorize(&self, headers: &HeaderMap) -> Result<(), StatusCode> {
        let header = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let mut state = self.state.lock();
        state.auth_headers.push(header.clone());
        if state.broken {
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
        if header.as_deref() == Some(&format!("Bearer {}", TOKEN)) {
            Ok(())
        } else {
            Err(StatusCode::UNAUTHORIZED)
        }
    }

    async fn paginate(
        &self,
        headers: &HeaderMap,
        params: PageParams,
        items: impl FnOnce(&ApiState) -> Vec<Value>,
    ) -> Result<Json<Value>, StatusCode> {
        self.authorize(headers)?;
        let page = params.page.unwrap_or(1).max(1);
        let size = params.size.unwrap_or(50).max(1) as usize;

        let (body, delay) = {
            let state = self.state.lock();
            let all = items(&state);
            let pages = all.len().div_ceil(size).max(1);
            let start = ((page as usize - 1) * size).min(all.len());
            let end = (start + size).min(all.len());
            let body = json!({
                "items": all[start..end],
                "page": page,
                "pages": pages,
                "size": size,
                "total": all.len(),
            });
            (body, state.page_delays.get(&page).copied())
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(Json(body))
    }
}

fn to_values<T: serde::Serialize>(items: &[T]) -> Vec<Value> {
    items
        .iter()
        .map(|item| serde_json::to_value(item).expect("Serializable fixture"))
        .collect()
}

async fn token(Form(form): Form<LoginForm>) -> Result<Json<Value>, StatusCode> {
    if form.username == USERNAME && form.password == PASSWORD {
        Ok(Json(json!({ "access_token": TOKEN, "token_type": "bearer" })))
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

async fn list_identifications(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>, StatusCode> {
    api.paginate(&headers, params, |s| to_values(&s.identifications))
        .await
}

async fn list_objects(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>, StatusCode> {
    api.paginate(&headers, params, |s| to_values(&s.objects)).await
}

async fn list_cameras(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>, StatusCode> {
    api.paginate(&headers, params, |s| to_values(&s.cameras)).await
}

async fn list_prompts(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>, StatusCode> {
    api.paginate(&headers, params, |s| to_values(&s.prompts)).await
}

async fn submit(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Json(submission): Json<Submission>,
) -> Result<Json<Value>, StatusCode> {
    api.authorize(&headers)?;
    api.state.lock().submissions.push(submission.clone());
    Ok(Json(json!({
        "id": submission.identification_id,
        "label": submission.label,
    })))
}
