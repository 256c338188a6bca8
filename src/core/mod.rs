pub mod composer;
pub mod config;
pub mod corpus;
pub mod generator;
pub mod graph;
