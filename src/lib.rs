//! Coursecat - A lightweight course catalog service
//!
//! This library provides the core functionality for the coursecat catalog.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod views;
