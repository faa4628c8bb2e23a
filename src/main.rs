use crate::configuration::Configuration;
use crate::http::start_server;
use crate::ledger::BookingLedger;
use crate::slots::SlotDirectory;
use crate::store::{MemoryStore, RecordStore};
use crate::users::UserDirectory;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod configuration;
mod conflict;
mod error;
mod http;
mod ledger;
mod policy;
mod slots;
mod store;
#[cfg(test)]
mod testutils;
mod time_range;
mod types;
mod users;

#[derive(Clone)]
struct AppState<S: RecordStore> {
    users: UserDirectory<S>,
    slots: SlotDirectory<S>,
    bookings: BookingLedger<S>,
}

impl<S: RecordStore> AppState<S> {
    fn new(store: S) -> Self {
        Self {
            users: UserDirectory::new(store.clone()),
            slots: SlotDirectory::new(store.clone()),
            bookings: BookingLedger::new(store),
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let configuration = Configuration::parse();
    let state = AppState::new(MemoryStore::default());

    let listener = tokio::net::TcpListener::bind((configuration.bind.as_str(), configuration.port))
        .await
        .unwrap();
    tracing::info!(address = %listener.local_addr().unwrap(), "listening");
    start_server(state, listener).await;
}
