//! Route handlers organized by resource

pub mod couriers;
pub mod deliveries;
pub mod delivery_routes;
pub mod health;
pub mod offers;
pub mod products;
