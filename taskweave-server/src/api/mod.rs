//! HTTP API surface: the webhook intake route.

pub mod webhook;
