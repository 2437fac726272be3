//! Business logic services

pub mod atom_feed;
pub mod resource_import;
