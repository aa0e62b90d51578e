//! carpool-planner core
//!
//! Groups same-day passenger bookings into vehicle trips under seat and
//! pickup-window limits.

pub mod cluster;
pub mod config;
pub mod error;
pub mod grouping;
pub mod groups;
pub mod haversine;
pub mod model;
pub mod plan;
pub mod planner;
pub mod request;
pub mod solver;
pub mod traits;
