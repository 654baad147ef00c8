//! SocialBlast Backend Library
//!
//! This library exports the core modules for the SocialBlast backend server.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod escrow;
pub mod esim;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod orders;
pub mod reseller;
pub mod routes;
pub mod smm;
pub mod state;
pub mod support;
pub mod wallet;
