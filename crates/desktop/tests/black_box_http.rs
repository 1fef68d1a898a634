use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use stockroom_core::SupplierId;
use stockroom_desktop::{
    ApiError, ClientConfig, HttpInventoryApi, InventoryApi, InventoryListController,
    ReselectPolicy, SelectedFile,
};
use stockroom_inventory::{DraftField, ProductDraft};

#[derive(Debug, Clone, PartialEq)]
enum Received {
    Suppliers,
    Upload {
        field: String,
        file_name: Option<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
    },
    Add(Value),
}

#[derive(Clone)]
struct Backend {
    received: Arc<Mutex<Vec<Received>>>,
    fail_suppliers: bool,
    fail_add: bool,
}

impl Backend {
    fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

async fn suppliers(State(backend): State<Backend>) -> impl IntoResponse {
    backend.received.lock().unwrap().push(Received::Suppliers);
    if backend.fail_suppliers {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "detail": "db down" })));
    }
    (
        StatusCode::OK,
        Json(json!([
            { "id": 1, "name": "Acme Foods" },
            { "id": 2, "name": "Globex Dairy" }
        ])),
    )
}

async fn upload_image(State(backend): State<Backend>, mut multipart: Multipart) -> impl IntoResponse {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.unwrap().to_vec();
        let safe_name = file_name.clone().unwrap_or_default().replace(' ', "_");
        backend.received.lock().unwrap().push(Received::Upload {
            field: name,
            file_name,
            content_type,
            bytes,
        });
        return (
            StatusCode::OK,
            Json(json!({ "image_url": format!("http://localhost:8000/static/{safe_name}") })),
        );
    }
    (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": "no file" })))
}

async fn add_product(State(backend): State<Backend>, Json(body): Json<Value>) -> impl IntoResponse {
    backend.received.lock().unwrap().push(Received::Add(body));
    if backend.fail_add {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": "invalid supplier" })));
    }
    (StatusCode::OK, Json(json!({ "message": "Product added successfully" })))
}

async fn inventory() -> impl IntoResponse {
    Json(json!([{
        "id": 10,
        "name": "Cheddar",
        "category": "Cheese",
        "stock_level": 3,
        "reorder_threshold": 5,
        "batchInfo": "CH-7",
        "supplier": "Globex Dairy",
        "image_url": ""
    }]))
}

struct TestServer {
    base_url: String,
    backend: Backend,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(fail_suppliers: bool, fail_add: bool) -> Self {
        let backend = Backend {
            received: Arc::new(Mutex::new(Vec::new())),
            fail_suppliers,
            fail_add,
        };
        let app = Router::new()
            .route("/suppliers", get(suppliers))
            .route("/products/upload-image", post(upload_image))
            .route("/products/add", post(add_product))
            .route("/inventory", get(inventory))
            .with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            backend,
            handle,
        }
    }

    fn api(&self) -> HttpInventoryApi {
        HttpInventoryApi::new(ClientConfig::new(&self.base_url)).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn lists_suppliers_and_inventory() {
    let server = TestServer::spawn(false, false).await;
    let api = server.api();

    let suppliers = api.list_suppliers().await.unwrap();
    assert_eq!(suppliers.len(), 2);
    assert_eq!(suppliers[1].id, SupplierId::new(2));
    assert_eq!(suppliers[1].name, "Globex Dairy");

    let items = api.list_inventory().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].batch_info, "CH-7");
    assert!(items[0].needs_reorder());
}

#[tokio::test]
async fn non_success_status_is_an_api_error() {
    let server = TestServer::spawn(true, false).await;

    let err = server.api().list_suppliers().await.unwrap_err();
    match err {
        ApiError::Api(500, body) => assert!(body.contains("db down")),
        other => panic!("Expected Api(500) error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpInventoryApi::new(ClientConfig::new(format!("http://{}", addr))).unwrap();
    let err = api.list_suppliers().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}

#[tokio::test]
async fn upload_sends_file_as_uploaded_file_field() {
    let server = TestServer::spawn(false, false).await;
    let file = SelectedFile::new("goat cheese.png", vec![0x89, b'P', b'N', b'G']);

    let uploaded = server.api().upload_image(&file).await.unwrap();
    assert_eq!(uploaded.image_url, "http://localhost:8000/static/goat_cheese.png");

    assert_eq!(
        server.backend.received(),
        vec![Received::Upload {
            field: "uploaded_file".to_string(),
            file_name: Some("goat cheese.png".to_string()),
            content_type: Some("image/png".to_string()),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }]
    );
}

#[tokio::test]
async fn add_product_posts_json_body() {
    let server = TestServer::spawn(false, false).await;
    let mut draft = ProductDraft::default();
    draft.set_raw(DraftField::Name, "Brie").unwrap();
    draft.set_raw(DraftField::Category, "Cheese").unwrap();
    draft.set_raw(DraftField::StockLevel, "8").unwrap();
    draft.set_raw(DraftField::CostPrice, "2.5").unwrap();
    draft.set_raw(DraftField::Price, "4").unwrap();
    draft.set_raw(DraftField::SupplierId, "2").unwrap();

    server
        .api()
        .add_product(&draft.to_new_product("http://cdn/brie.png"))
        .await
        .unwrap();

    assert_eq!(
        server.backend.received(),
        vec![Received::Add(json!({
            "name": "Brie",
            "category": "Cheese",
            "stock_level": 8,
            "reserved_stock": 0,
            "reorder_threshold": 0,
            "cost_price": 2.5,
            "price": 4.0,
            "supplier_id": 2,
            "image_url": "http://cdn/brie.png"
        }))]
    );
}

fn refresh_counter() -> (Arc<AtomicUsize>, stockroom_desktop::RefreshCallback) {
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    (count, Arc::new(move || {
        c.fetch_add(1, Ordering::SeqCst);
    }))
}

#[tokio::test]
async fn add_product_flow_uploads_then_creates_then_refreshes() {
    let server = TestServer::spawn(false, false).await;
    let (count, refresh) = refresh_counter();
    let controller =
        InventoryListController::new(Arc::new(server.api()), ReselectPolicy::Supersede, refresh);

    controller.mount().unwrap().await.unwrap();
    assert_eq!(controller.snapshot().supplier_options.len(), 3);

    controller.open_modal().unwrap();
    controller.edit_field(DraftField::Name, "Feta").unwrap();
    controller.edit_field(DraftField::SupplierId, "1").unwrap();
    controller.edit_field(DraftField::ImageUrl, "typed.png").unwrap();
    controller
        .select_file(SelectedFile::new("feta.jpg", vec![1, 2, 3]))
        .unwrap()
        .await
        .unwrap();
    assert!(
        controller
            .snapshot()
            .preview_url
            .unwrap()
            .starts_with("data:image/jpeg;base64,")
    );

    controller.submit().unwrap().await.unwrap();

    let received = server.backend.received();
    assert_eq!(received.len(), 3);
    assert_eq!(received[0], Received::Suppliers);
    assert!(matches!(&received[1], Received::Upload { field, .. } if field == "uploaded_file"));
    match &received[2] {
        Received::Add(body) => {
            assert_eq!(body["name"], "Feta");
            assert_eq!(body["supplier_id"], 1);
            assert_eq!(body["image_url"], "http://localhost:8000/static/feta.jpg");
        }
        other => panic!("Expected Add request, got {other:?}"),
    }

    let snapshot = controller.snapshot();
    assert!(!snapshot.modal_open);
    assert!(snapshot.file_name.is_none());
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rejected_create_keeps_form_and_skips_refresh() {
    let server = TestServer::spawn(true, true).await;
    let (count, refresh) = refresh_counter();
    let controller =
        InventoryListController::new(Arc::new(server.api()), ReselectPolicy::Supersede, refresh);

    controller.mount().unwrap().await.unwrap();
    assert_eq!(controller.snapshot().supplier_options.len(), 1);

    controller.open_modal().unwrap();
    controller.edit_field(DraftField::Name, "Halloumi").unwrap();
    controller.submit().unwrap().await.unwrap();

    let received = server.backend.received();
    assert!(!received.iter().any(|r| matches!(r, Received::Upload { .. })));
    match received.last() {
        Some(Received::Add(body)) => assert_eq!(body["image_url"], ""),
        other => panic!("Expected Add request, got {other:?}"),
    }

    let snapshot = controller.snapshot();
    assert!(snapshot.modal_open);
    assert_eq!(snapshot.draft.name, "Halloumi");
    assert!(snapshot.error.unwrap().contains("422"));
    assert_eq!(count.load(Ordering::SeqCst), 0);
}
