//! HTTP handlers for the identity domain

pub mod auth;
