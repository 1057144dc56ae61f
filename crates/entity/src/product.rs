use anyhow::{Error, Result};
use chrono::NaiveDateTime;
use prodstock_api::product::{Product, ProductId, ProductSpec};
use sea_orm::{
    ActiveModelBehavior, ActiveValue, DeriveEntityModel, DerivePrimaryKey, DeriveRelation,
    EntityTrait, EnumIter, PrimaryKeyTrait,
};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: ProductId,
    #[sea_orm(column_type = "Timestamp")]
    pub created_at: NaiveDateTime,
    pub spec: Value,
}

impl TryFrom<Model> for ProductSpec {
    type Error = Error;

    fn try_from(value: Model) -> Result<Self, Self::Error> {
        let Model {
            id: _,
            created_at: _,
            spec,
        } = value;

        ::serde_json::from_value(spec).map_err(Into::into)
    }
}

impl TryFrom<Model> for Product {
    type Error = Error;

    fn try_from(value: Model) -> Result<Self, Self::Error> {
        let id = value.id;
        let spec = value.try_into()?;

        Ok(Self::new(id, spec))
    }
}

impl ActiveModel {
    pub const fn from_id(id: ProductId) -> Self {
        Self {
            id: ActiveValue::Set(id),
            created_at: ActiveValue::NotSet,
            spec: ActiveValue::NotSet,
        }
    }

    pub fn from_spec(spec: ProductSpec, id: ProductId) -> Result<Self> {
        let spec = ::serde_json::to_value(spec)?;

        Ok(Self {
            id: ActiveValue::Set(id),
            created_at: ActiveValue::NotSet,
            spec: ActiveValue::Set(spec),
        })
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
