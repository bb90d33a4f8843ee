//! HTTP surface of the deployment dashboard

pub mod api;
pub mod config;
