// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Neighborhood: community platform API and devlog upload client
//!
//! The server half exposes validated CRUD handlers over a remote tabular
//! record store. The client half drives video uploads with progress and
//! audible feedback for the devlog composer.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod sanitize;
pub mod services;
pub mod validation;

use config::{Config, StoreBackend};
use db::{AirtableStore, Database, MemoryStore, RecordStore};
use ring::rand::SystemRandom;
use services::{HackatimeClient, LoopsClient};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub hackatime: HackatimeClient,
    pub loops: LoopsClient,
    pub rng: SystemRandom,
}

impl AppState {
    /// Build state with the record store selected by `config`.
    pub fn from_config(config: Config) -> Self {
        let store: Arc<dyn RecordStore> = match config.store_backend {
            StoreBackend::Airtable => Arc::new(AirtableStore::new(
                &config.airtable_api_url,
                &config.airtable_base_id,
                &config.airtable_api_key,
            )),
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
        };
        Self::with_store(config, store)
    }

    /// Build state around an existing record store.
    pub fn with_store(config: Config, store: Arc<dyn RecordStore>) -> Self {
        Self {
            db: Database::new(store, config.users_table.clone()),
            hackatime: HackatimeClient::new(
                &config.hackatime_api_url,
                &config.hackatime_start_date,
            ),
            loops: LoopsClient::new(
                &config.loops_api_url,
                &config.loops_auth_token,
                &config.loops_otp_transactional_id,
            ),
            rng: SystemRandom::new(),
            config,
        }
    }
}
