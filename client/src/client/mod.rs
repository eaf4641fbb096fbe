//! Client construction and request execution.

mod executor;

pub use executor::{Client, ClientBuilder, Credentials};
