pub mod api;
pub mod app;
pub mod assessment;
pub mod config;
pub mod dashboard;
pub mod logger;
pub mod models;
pub mod push;
pub mod routes;
pub mod screens;
pub mod widgets;
