//! itsalive: website reachability monitor
//!
//! A library for periodically probing registered websites and notifying
//! their owners when a site goes down or comes back online.

pub mod config;
pub mod http;
pub mod monitor;
pub mod notify;
pub mod probe;
pub mod site;
pub mod store;
pub mod time;
