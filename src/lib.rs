pub mod auth;
pub mod board;
pub mod config;
pub mod db;
pub mod error;
pub mod mail;
pub mod review;
pub mod roles;
pub mod routes;
pub mod state;
pub mod templates;
pub mod tokens;
pub mod workflow;
