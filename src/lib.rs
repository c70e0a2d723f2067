//! Library crate for futebol-back, exposing modules for binaries and integration tests.

pub mod balancer;
pub mod config;
pub mod dao;
mod dto;
mod error;
pub mod routes;
pub mod services;
pub mod state;
