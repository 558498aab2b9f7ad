//! HTTP request handlers for API endpoints.
//!
//! This module contains all request handlers organized by resource type.

pub mod ai;
pub mod cache;
pub mod health;
pub mod repos;
