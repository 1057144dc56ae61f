extern crate prodstock_entity as entity;
extern crate prodstock_migration as migration;

pub mod actix;
pub mod db;
pub mod error;
pub mod routes;
