#[macro_use]
extern crate rocket;

mod catchers;
pub mod configuration;
pub mod delivery;
pub mod domain;
pub mod email;
pub mod guards;
pub mod models;
pub mod opens;
pub mod pixel;
pub mod port_saver;
pub mod routes;
pub mod schema;
pub mod startup;
pub mod store;
pub mod telemetry;
