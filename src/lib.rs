// src/lib.rs

// Large json! fixtures in the unit tests need the extra depth.
#![recursion_limit = "256"]

// 1. Data Structures (The "Nouns")
pub mod models;
pub mod error;

// 2. Flat-File Layout (The "Shelf")
pub mod snapshot;

// 3. External Source (The "Plumbing")
pub mod fetcher;

// 4. Enrichment Pass (The "Kitchen")
pub mod enrich;

// 5. Query Resolvers (The "Counter")
pub mod query;

// 6. HTTP Surface and Configuration
pub mod server;
pub mod config;

#[cfg(test)]
mod test_utils;
