//! HTTP backend for nowhey, a dairy-free restaurant finder.
//!
//! Proxies between the web client, the Gemini language model, the Google
//! Places API and a Postgres datastore holding restaurants and user reviews.

pub mod config;
pub mod controller;
pub mod error;
pub mod helpers;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
