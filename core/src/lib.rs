//! Game-state engine for a square minefield: mine placement, cascading reveal and win/loss tracking.
//!
//! Rendering and input capture live outside this crate, front ends drive a [`GameSession`] or a bare
//! [`FieldEngine`] and draw whatever [`FieldEngine::tile_at`] reports.
#![no_std]

extern crate alloc;

pub use cell::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use mine::*;
pub use session::*;
pub use tile::*;
pub use types::*;

mod cell;
mod config;
mod engine;
mod error;
mod generator;
mod mine;
mod session;
mod tile;
mod types;
