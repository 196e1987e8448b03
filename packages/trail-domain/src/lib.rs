pub mod activity;
pub mod cursor;
pub mod document;
pub mod filter;
pub mod user;

mod error;

pub use error::{Error, Result};

use std::{future::Future, pin::Pin};

use serde_json::{Map, Value};

/// A schemaless item as stored in the key-value store or returned by the search index.
pub type Item = Map<String, Value>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
