//! Row construction for participant version tables

pub mod builder;

pub use builder::{columns, encode_memberships, RecordRowBuilder, RowBuilder};
