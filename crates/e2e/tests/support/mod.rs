//! In-process fake of the StudioMate backend
//!
//! Mirrors the response envelopes of the real API and keeps everything in
//! memory. Individual routes can be made to misbehave with [`Fault`].

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Misbehaviour injected for one `METHOD /path` route
#[derive(Debug, Clone)]
pub enum Fault {
    /// Respond with this status and an error envelope
    Status(StatusCode),
    /// Respond 200 with this body instead of the real one
    Body(Value),
    /// Sleep before handling the request normally
    Delay(Duration),
    /// Respond 200 with this body on the n-th matching request only (1-based)
    NthBody(usize, Value),
}

/// A request seen by the fake, with its JSON body if any
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct Store {
    pub projects: Vec<Value>,
    pub sessions: Vec<Value>,
    pub audio_files: Vec<Value>,
    pub comments: Vec<Value>,
    pub messages: Vec<Value>,
    pub invoices: Vec<Value>,
    pub emails: Vec<Value>,
}

struct Inner {
    store: Mutex<Store>,
    faults: HashMap<String, Fault>,
    requests: Mutex<Vec<Recorded>>,
    cascade: bool,
}

type Shared = Arc<Inner>;

pub struct FakeStudio {
    faults: HashMap<String, Fault>,
    cascade: bool,
    seeded_projects: usize,
}

impl FakeStudio {
    pub fn new() -> Self {
        Self {
            faults: HashMap::new(),
            cascade: true,
            seeded_projects: 0,
        }
    }

    /// Inject a fault, e.g. `fault("POST", "/projects", Fault::Status(..))`
    pub fn fault(mut self, method: &str, path: &str, fault: Fault) -> Self {
        self.faults.insert(format!("{} {}", method, path), fault);
        self
    }

    /// Keep dependents when a project is deleted
    pub fn without_cascade(mut self) -> Self {
        self.cascade = false;
        self
    }

    /// Start with `count` projects the scenario did not create
    pub fn with_projects(mut self, count: usize) -> Self {
        self.seeded_projects = count;
        self
    }

    /// Serve on an ephemeral port
    pub async fn spawn(self) -> RunningStudio {
        let projects = (0..self.seeded_projects)
            .map(|i| entity(json!({"name": format!("Existing Project {}", i + 1)}), "createdAt"))
            .collect();
        let inner = Arc::new(Inner {
            store: Mutex::new(Store {
                projects,
                ..Store::default()
            }),
            faults: self.faults,
            requests: Mutex::new(Vec::new()),
            cascade: self.cascade,
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(inner.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        RunningStudio {
            base_url: format!("http://{}/api", addr),
            inner,
        }
    }
}

pub struct RunningStudio {
    pub base_url: String,
    inner: Shared,
}

impl RunningStudio {
    pub fn store<T>(&self, f: impl FnOnce(&Store) -> T) -> T {
        f(&*self.inner.store.lock())
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.inner.requests.lock().clone()
    }

    /// Requests whose `METHOD /path` matches
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }
}

fn router(inner: Shared) -> Router {
    let api = Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/sessions", get(list_sessions).post(create_session))
        .route("/sessions/:id", put(update_session).delete(delete_session))
        .route("/upload", post(upload_chunk))
        .route("/audio-files", get(list_audio_files).post(create_audio_file))
        .route("/audio-files/:id", delete(delete_audio_file))
        .route("/comments", get(list_comments).post(create_comment))
        .route("/messages", get(list_messages).post(create_message))
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route("/stripe/create-payment-intent", post(stripe_create_intent))
        .route("/stripe/confirm-payment", post(stripe_confirm))
        .route("/paypal/create-order", post(paypal_create_order))
        .route("/paypal/capture-order", post(paypal_capture_order))
        .route("/send-email", post(send_email))
        .route("/dashboard-stats", get(dashboard_stats));

    Router::new()
        .nest("/api", api)
        .fallback(not_found_handler)
        .layer(middleware::from_fn_with_state(inner.clone(), record_and_inject))
        .with_state(inner)
}

async fn record_and_inject(State(inner): State<Shared>, req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let method = parts.method.to_string();
    let path = parts.uri.path().trim_start_matches("/api").to_string();

    let seen = {
        let mut requests = inner.requests.lock();
        requests.push(Recorded {
            method: method.clone(),
            path: path.clone(),
            body: serde_json::from_slice(&bytes).ok(),
        });
        requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    };

    match inner.faults.get(&format!("{} {}", method, path)).cloned() {
        Some(Fault::Status(status)) => {
            return (status, Json(json!({"success": false, "error": "injected fault"})))
                .into_response();
        }
        Some(Fault::Body(body)) => return Json(body).into_response(),
        Some(Fault::Delay(delay)) => tokio::time::sleep(delay).await,
        Some(Fault::NthBody(n, body)) if n == seen => return Json(body).into_response(),
        Some(Fault::NthBody(..)) | None => {}
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

// ============================================================================
// Helpers
// ============================================================================

fn ok_data(data: Value) -> Response {
    Json(json!({"success": true, "data": data})).into_response()
}

fn ok_message(message: &str) -> Response {
    Json(json!({"success": true, "message": message})).into_response()
}

fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"success": false, "error": format!("{} not found", what)})),
    )
        .into_response()
}

async fn not_found_handler() -> Response {
    not_found("Endpoint")
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Copy of `body` with a fresh id and `stamp` set to now
fn entity(body: Value, stamp: &str) -> Value {
    let mut object = body.as_object().cloned().unwrap_or_default();
    object.insert("id".into(), json!(new_id()));
    object.insert(stamp.into(), json!(chrono::Utc::now().to_rfc3339()));
    Value::Object(object)
}

fn has(item: &Value, field: &str, value: &str) -> bool {
    item.get(field).and_then(Value::as_str) == Some(value)
}

fn filtered(items: &[Value], query: &HashMap<String, String>, fields: &[&str]) -> Vec<Value> {
    items
        .iter()
        .filter(|item| {
            fields
                .iter()
                .all(|f| query.get(*f).map_or(true, |v| has(item, f, v)))
        })
        .cloned()
        .collect()
}

fn merge(target: &mut Value, update: &Value) {
    if let (Some(target), Some(update)) = (target.as_object_mut(), update.as_object()) {
        for (k, v) in update {
            if k != "id" {
                target.insert(k.clone(), v.clone());
            }
        }
    }
}

fn remove_by_id(items: &mut Vec<Value>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| !has(item, "id", id));
    items.len() != before
}

// ============================================================================
// Handlers
// ============================================================================

async fn list_projects(State(inner): State<Shared>) -> Response {
    ok_data(json!(inner.store.lock().projects))
}

async fn create_project(State(inner): State<Shared>, Json(body): Json<Value>) -> Response {
    let project = entity(body, "createdAt");
    inner.store.lock().projects.push(project.clone());
    ok_data(project)
}

async fn get_project(State(inner): State<Shared>, Path(id): Path<String>) -> Response {
    let store = inner.store.lock();
    match store.projects.iter().find(|p| has(p, "id", &id)) {
        Some(project) => ok_data(project.clone()),
        None => not_found("Project"),
    }
}

async fn update_project(
    State(inner): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = inner.store.lock();
    match store.projects.iter_mut().find(|p| has(p, "id", &id)) {
        Some(project) => {
            merge(project, &body);
            ok_message("Project updated")
        }
        None => not_found("Project"),
    }
}

async fn delete_project(State(inner): State<Shared>, Path(id): Path<String>) -> Response {
    let mut store = inner.store.lock();
    if !remove_by_id(&mut store.projects, &id) {
        return not_found("Project");
    }
    if inner.cascade {
        store.audio_files.retain(|f| !has(f, "projectId", &id));
        store.comments.retain(|c| !has(c, "projectId", &id));
        store.messages.retain(|m| !has(m, "projectId", &id));
    }
    ok_message("Project deleted")
}

async fn list_sessions(State(inner): State<Shared>) -> Response {
    ok_data(json!(inner.store.lock().sessions))
}

async fn create_session(State(inner): State<Shared>, Json(body): Json<Value>) -> Response {
    let session = entity(body, "createdAt");
    inner.store.lock().sessions.push(session.clone());
    ok_data(session)
}

async fn update_session(
    State(inner): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = inner.store.lock();
    match store.sessions.iter_mut().find(|s| has(s, "id", &id)) {
        Some(session) => {
            merge(session, &body);
            ok_message("Session updated")
        }
        None => not_found("Session"),
    }
}

async fn delete_session(State(inner): State<Shared>, Path(id): Path<String>) -> Response {
    let mut store = inner.store.lock();
    if remove_by_id(&mut store.sessions, &id) {
        ok_message("Session deleted")
    } else {
        not_found("Session")
    }
}

async fn upload_chunk(State(inner): State<Shared>, Json(body): Json<Value>) -> Response {
    let index = body["chunkIndex"].as_u64().unwrap_or_default();
    let total = body["totalChunks"].as_u64().unwrap_or(1).max(1);

    if index + 1 < total {
        let progress = (index + 1) as f64 / total as f64 * 100.0;
        return Json(json!({"success": true, "progress": progress})).into_response();
    }

    let chunk_len = body["chunk"].as_str().map(str::len).unwrap_or_default() as u64;
    let file = json!({
        "id": new_id(),
        "name": body["fileName"],
        "projectId": body["projectId"],
        "size": chunk_len * total,
        "uploadedBy": "Current User",
        "version": "v1",
        "type": "recording"
    });
    inner.store.lock().audio_files.push(file.clone());
    Json(json!({"success": true, "data": file, "completed": true})).into_response()
}

async fn list_audio_files(
    State(inner): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let store = inner.store.lock();
    ok_data(json!(filtered(&store.audio_files, &query, &["projectId"])))
}

async fn create_audio_file(State(inner): State<Shared>, Json(body): Json<Value>) -> Response {
    let file = entity(body, "uploadedAt");
    inner.store.lock().audio_files.push(file.clone());
    ok_data(file)
}

async fn delete_audio_file(State(inner): State<Shared>, Path(id): Path<String>) -> Response {
    let mut store = inner.store.lock();
    if !remove_by_id(&mut store.audio_files, &id) {
        return not_found("File");
    }
    store.comments.retain(|c| !has(c, "fileId", &id));
    ok_message("File deleted")
}

async fn list_comments(
    State(inner): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let store = inner.store.lock();
    ok_data(json!(filtered(&store.comments, &query, &["projectId", "fileId"])))
}

async fn create_comment(State(inner): State<Shared>, Json(body): Json<Value>) -> Response {
    let comment = entity(body, "createdAt");
    inner.store.lock().comments.push(comment.clone());
    ok_data(comment)
}

async fn list_messages(
    State(inner): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let store = inner.store.lock();
    ok_data(json!(filtered(&store.messages, &query, &["projectId"])))
}

async fn create_message(State(inner): State<Shared>, Json(body): Json<Value>) -> Response {
    let message = entity(body, "createdAt");
    inner.store.lock().messages.push(message.clone());
    ok_data(message)
}

async fn list_invoices(State(inner): State<Shared>) -> Response {
    ok_data(json!(inner.store.lock().invoices))
}

async fn create_invoice(State(inner): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut invoice = entity(body, "createdAt");
    invoice["status"] = json!("pending");
    inner.store.lock().invoices.push(invoice.clone());
    ok_data(invoice)
}

async fn stripe_create_intent(Json(body): Json<Value>) -> Response {
    ok_data(json!({
        "id": format!("pi_fake_{}", new_id()),
        "client_secret": format!("pi_fake_{}_secret", new_id()),
        "amount": body["amount"],
        "currency": body.get("currency").cloned().unwrap_or(json!("usd")),
        "status": "requires_payment_method"
    }))
}

async fn stripe_confirm(Json(body): Json<Value>) -> Response {
    if body["paymentIntentId"].as_str().map_or(true, str::is_empty) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "error": "paymentIntentId required"})),
        )
            .into_response();
    }
    ok_message("Payment confirmed")
}

async fn paypal_create_order() -> Response {
    Json(json!({"success": true, "orderId": format!("paypal_fake_{}", new_id())})).into_response()
}

async fn paypal_capture_order(State(inner): State<Shared>, Json(body): Json<Value>) -> Response {
    if let Some(invoice_id) = body["invoiceId"].as_str() {
        let mut store = inner.store.lock();
        if let Some(invoice) = store.invoices.iter_mut().find(|i| has(i, "id", invoice_id)) {
            invoice["status"] = json!("paid");
            invoice["paypalOrderId"] = body["orderId"].clone();
        }
    }
    ok_message("Payment captured")
}

async fn send_email(State(inner): State<Shared>, Json(body): Json<Value>) -> Response {
    let log = entity(body, "sentAt");
    inner.store.lock().emails.push(log);
    ok_message("Email sent successfully")
}

async fn dashboard_stats(State(inner): State<Shared>) -> Response {
    let store = inner.store.lock();
    let revenue: f64 = store
        .invoices
        .iter()
        .filter(|i| has(i, "status", "paid"))
        .filter_map(|i| i["amount"].as_f64())
        .sum();
    ok_data(json!({
        "activeProjects": store.projects.len(),
        "weekSessions": store.sessions.len(),
        "monthRevenue": revenue,
        "filesProcessed": 142
    }))
}
