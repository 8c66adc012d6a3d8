//! Verba - Word-by-Word Translation Service
//!
//! A Rust implementation of a translation service that splits text into
//! words, translates each word through a remote translation resource with
//! bounded concurrency and a TTL cache, and durably records completed
//! translations.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod language;
pub mod persist;
pub mod remote;
pub mod service;
pub mod web;
