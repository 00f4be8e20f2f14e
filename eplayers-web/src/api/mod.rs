//! HTTP handlers for eplayers-web

pub mod health;
pub mod home;
pub mod login;
pub mod team;

pub use health::health_routes;
pub use home::{home_routes, not_found};
pub use login::login_routes;
pub use team::team_routes;
