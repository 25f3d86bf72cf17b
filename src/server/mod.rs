pub(crate) mod auth;
#[allow(clippy::module_inception)]
mod server;

pub(crate) use server::{AppState, run};
