//! Library entrypoint for the FinSim gateway.
//!
//! This file exists mainly to make controller tests easy (integration
//! tests under `tests/` can import the app state, routers, controllers,
//! services).

pub mod config;
pub mod models;

#[path = "middleware/auth.rs"]
pub mod auth;

pub mod services;

pub mod controllers;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub db: mongodb::Database,
    pub settings: config::Settings,
    pub fmp: services::fmp::FmpClient,
    pub alpha_vantage: services::alpha_vantage::AlphaVantageClient,
    pub finnhub: services::finnhub::FinnhubClient,
    pub backend: services::backend_service::BackendClient,
    pub links: services::link_service::LinkRegistry,
}
