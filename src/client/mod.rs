//! Service clients
//!
//! A [`ServiceClient`] binds the shared [`HttpClient`](crate::http::HttpClient)
//! to one service endpoint (network, database, ...). Resource modules build
//! their URLs from it and list operations page through it, since it
//! implements [`Transport`](crate::pagination::Transport).

mod service;

pub use service::ServiceClient;
