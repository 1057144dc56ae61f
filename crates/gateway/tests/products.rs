use actix_web::{
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::StatusCode,
    test,
    web::Data,
    App, Error,
};
use prodstock_api::{
    component::Component,
    product::{Product, ProductId},
};
use prodstock_core::signal::FunctionSignal;
use prodstock_gateway::{
    actix::json_config,
    db::{Database, DatabaseArgs},
    routes,
};
use serde_json::{json, Value};

async fn init_db() -> Database {
    let args = DatabaseArgs {
        db_endpoint: "sqlite::memory:".into(),
    };
    Database::try_new(args, &FunctionSignal::default())
        .await
        .expect("initializing an in-memory product store")
}

fn app(
    db: Database,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(Data::new(db))
        .app_data(json_config())
        .service(routes::product::list)
        .service(routes::product::create)
        .service(routes::product::update)
        .service(routes::product::delete)
}

fn widget() -> Value {
    json!({
        "ProductCode": "P1",
        "ProductName": "Widget",
        "ProductDate": "2024-01-01",
        "ProductOriginPrice": 10,
        "Quantity": 5,
        "ProductStoreCode": "S2",
    })
}

#[actix_web::test]
async fn products_crud_scenario() {
    let app = test::init_service(app(init_db().await)).await;

    // create: the stored record echoes the submitted fields with a fresh id
    let req = test::TestRequest::post()
        .uri("/api/products")
        .set_json(widget())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Product = test::read_body_json(resp).await;
    assert!(!created.id.is_nil());
    assert_eq!(created.spec.product_code, "P1");
    assert_eq!(created.spec.product_name, "Widget");
    assert_eq!(created.spec.quantity, 5);
    assert_eq!(created.spec.product_store_code, "S2");

    // list: exactly one record carries the new id
    let req = test::TestRequest::get().uri("/api/products").to_request();
    let products: Vec<Product> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(products.iter().filter(|p| p.id == created.id).count(), 1);

    // partial update: only the supplied field changes
    let req = test::TestRequest::put()
        .uri(&format!("/api/products/{}", created.id))
        .set_json(json!({ "Quantity": 8 }))
        .to_request();
    let updated: Product = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.spec.quantity, 8);
    assert_eq!(updated.spec.product_code, "P1");
    assert_eq!(updated.spec.product_name, "Widget");
    assert_eq!(updated.spec.product_origin_price, 10.0);

    // delete: the record disappears from the list
    let req = test::TestRequest::delete()
        .uri(&format!("/api/products/{}", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let confirmation: Value = test::read_body_json(resp).await;
    assert!(confirmation["message"].is_string());

    let req = test::TestRequest::get().uri("/api/products").to_request();
    let products: Vec<Product> = test::call_and_read_body_json(&app, req).await;
    assert!(products.iter().all(|p| p.id != created.id));

    // a second delete of the same id reports not-found
    let req = test::TestRequest::delete()
        .uri(&format!("/api/products/{}", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn update_of_missing_id_is_not_found_and_creates_nothing() {
    let app = test::init_service(app(init_db().await)).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/products/{}", ProductId::new_v4()))
        .set_json(json!({ "Quantity": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].is_string());

    let req = test::TestRequest::get().uri("/api/products").to_request();
    let products: Vec<Product> = test::call_and_read_body_json(&app, req).await;
    assert!(products.is_empty());
}

#[actix_web::test]
async fn delete_of_missing_id_is_not_found() {
    let app = test::init_service(app(init_db().await)).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/products/{}", ProductId::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn create_rejects_missing_required_fields() {
    let app = test::init_service(app(init_db().await)).await;

    let req = test::TestRequest::post()
        .uri("/api/products")
        .set_json(json!({ "Quantity": 5 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"]
        .as_str()
        .unwrap_or_default()
        .contains("ProductCode"));

    let req = test::TestRequest::get().uri("/api/products").to_request();
    let products: Vec<Product> = test::call_and_read_body_json(&app, req).await;
    assert!(products.is_empty());
}

#[actix_web::test]
async fn create_rejects_unknown_fields() {
    let app = test::init_service(app(init_db().await)).await;

    let mut payload = widget();
    payload["Color"] = json!("red");
    let req = test::TestRequest::post()
        .uri("/api/products")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].is_string());
}

#[actix_web::test]
async fn created_ids_are_distinct() {
    let app = test::init_service(app(init_db().await)).await;

    let mut ids = Vec::new();
    for code in ["P1", "P2", "P3"] {
        let mut payload = widget();
        payload["ProductCode"] = json!(code);
        let req = test::TestRequest::post()
            .uri("/api/products")
            .set_json(payload)
            .to_request();
        let created: Product = test::call_and_read_body_json(&app, req).await;
        ids.push(created.id);
    }

    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}
