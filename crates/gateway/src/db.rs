use anyhow::{anyhow, Result};
use async_trait::async_trait;
use clap::Parser;
use migration::MigratorTrait;
use prodstock_api::{
    component::Component,
    product::{Product, ProductId, ProductPatch, ProductSpec},
};
use prodstock_core::signal::FunctionSignal;
use sea_orm::{DbErr, DeleteResult, EntityTrait};
use serde::{Deserialize, Serialize};
use tracing::{instrument, Level};

use crate::error::StoreError;

/// The product store client: one connection pool for the lifetime of the
/// process, established at startup and injected into the API layer.
#[derive(Clone)]
pub struct Database {
    connection: ::sea_orm::DatabaseConnection,
    pub(crate) signal: FunctionSignal,
}

#[async_trait]
impl Component for Database {
    type Args = DatabaseArgs;

    #[instrument(level = Level::INFO, skip(args, signal))]
    async fn try_new(args: <Self as Component>::Args, signal: &FunctionSignal) -> Result<Self> {
        let DatabaseArgs { db_endpoint } = args;

        let mut opt = ::sea_orm::ConnectOptions::new(db_endpoint.clone());
        if db_endpoint.starts_with("sqlite::memory:") {
            // a pooled in-memory sqlite keeps one database per connection
            opt.max_connections(1);
        }
        let connection = ::sea_orm::Database::connect(opt)
            .await
            .map_err(|error| anyhow!("failed to connect to the product store: {error}"))?;

        let steps = None;
        ::migration::Migrator::up(&connection, steps)
            .await
            .map_err(|error| anyhow!("failed to upgrade the product store: {error}"))?;

        Ok(Self {
            connection,
            signal: signal.clone(),
        })
    }
}

impl Database {
    #[instrument(level = Level::INFO, skip(self))]
    pub async fn close(&self) -> Result<()> {
        Ok(())
    }
}

impl Database {
    #[instrument(level = Level::INFO, skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let dsl = entity::product::Entity::find();

        dsl.all(&self.connection)
            .await
            .map_err(|error| StoreError::Unavailable(error.into()))?
            .into_iter()
            .map(|model| model.try_into().map_err(StoreError::Unavailable))
            .collect()
    }

    #[instrument(level = Level::INFO, skip(self, spec))]
    pub async fn insert_product(&self, spec: ProductSpec) -> Result<Product, StoreError> {
        let prod_id = ProductId::new_v4();
        let model = entity::product::ActiveModel::from_spec(spec.clone(), prod_id)
            .map_err(StoreError::Write)?;
        let dsl = entity::product::Entity::insert(model);

        dsl.exec_without_returning(&self.connection)
            .await
            .map_err(|error| StoreError::Write(error.into()))?;
        Ok(Product::new(prod_id, spec))
    }

    #[instrument(level = Level::INFO, skip(self, patch))]
    pub async fn update_product(
        &self,
        prod_id: ProductId,
        patch: ProductPatch,
    ) -> Result<Product, StoreError> {
        let dsl = entity::product::Entity::find_by_id(prod_id);
        let model = dsl
            .one(&self.connection)
            .await
            .map_err(|error| StoreError::Unavailable(error.into()))?
            .ok_or(StoreError::NotFound { prod_id })?;

        let mut spec: ProductSpec = model.try_into().map_err(StoreError::Unavailable)?;
        patch.apply(&mut spec);

        let model = entity::product::ActiveModel::from_spec(spec.clone(), prod_id)
            .map_err(StoreError::Write)?;
        let dsl = entity::product::Entity::update(model);

        dsl.exec(&self.connection)
            .await
            .map_err(|error| match error {
                DbErr::RecordNotUpdated => StoreError::NotFound { prod_id },
                error => StoreError::Write(error.into()),
            })?;
        Ok(Product::new(prod_id, spec))
    }

    #[instrument(level = Level::INFO, skip(self))]
    pub async fn remove_product(&self, prod_id: ProductId) -> Result<(), StoreError> {
        let model = entity::product::ActiveModel::from_id(prod_id);
        let dsl = entity::product::Entity::delete(model);

        let DeleteResult { rows_affected } = dsl
            .exec(&self.connection)
            .await
            .map_err(|error| StoreError::Unavailable(error.into()))?;
        if rows_affected == 0 {
            return Err(StoreError::NotFound { prod_id });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Parser)]
#[clap(rename_all = "kebab-case")]
#[serde(rename_all = "camelCase")]
pub struct DatabaseArgs {
    #[arg(
        long,
        env = "PRODSTOCK_DB_ENDPOINT",
        value_name = "URL",
        default_value_t = DatabaseArgs::default_db_endpoint(),
    )]
    pub db_endpoint: String,
}

impl DatabaseArgs {
    fn default_db_endpoint() -> String {
        "sqlite::memory:".into()
    }
}
