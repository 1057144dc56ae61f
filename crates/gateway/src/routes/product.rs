use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    HttpResponse,
};
use prodstock_api::{
    message::Message,
    product::{ProductId, ProductPatch},
};
use tracing::{instrument, Level};

use crate::{db::Database, error::StoreError};

#[instrument(level = Level::INFO, skip(db))]
#[get("/api/products")]
pub async fn list(db: Data<Database>) -> Result<HttpResponse, StoreError> {
    let products = db.list_products().await?;
    Ok(HttpResponse::Ok().json(products))
}

#[instrument(level = Level::INFO, skip(db, patch))]
#[post("/api/products")]
pub async fn create(
    db: Data<Database>,
    patch: Json<ProductPatch>,
) -> Result<HttpResponse, StoreError> {
    let spec = patch.0.build().map_err(StoreError::InvalidPayload)?;
    let product = db.insert_product(spec).await?;
    Ok(HttpResponse::Ok().json(product))
}

#[instrument(level = Level::INFO, skip(db, patch))]
#[put("/api/products/{prod_id}")]
pub async fn update(
    db: Data<Database>,
    path: Path<ProductId>,
    patch: Json<ProductPatch>,
) -> Result<HttpResponse, StoreError> {
    let prod_id = path.into_inner();
    let product = db.update_product(prod_id, patch.0).await?;
    Ok(HttpResponse::Ok().json(product))
}

#[instrument(level = Level::INFO, skip(db))]
#[delete("/api/products/{prod_id}")]
pub async fn delete(db: Data<Database>, path: Path<ProductId>) -> Result<HttpResponse, StoreError> {
    let prod_id = path.into_inner();
    db.remove_product(prod_id).await?;
    Ok(HttpResponse::Ok().json(Message::new("Product deleted")))
}
