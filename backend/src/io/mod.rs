//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain services: routing targets,
//! JSON (de)serialization via the `shared` DTOs, the session middleware, and the
//! mapping of domain errors to status codes.

pub mod rest;
