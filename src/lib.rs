#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod core;
#[cfg(feature = "std")]
mod config;
#[cfg(feature = "std")]
pub mod gateway;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod node;
#[cfg(feature = "std")]
pub mod prelude;

pub use crate::core::*;
#[cfg(feature = "std")]
pub use config::*;
#[cfg(feature = "std")]
pub use logging::{init_logging, LOG_ENV};
#[cfg(feature = "std")]
pub use node::{SignalError, SignalNode};
#[cfg(all(feature = "std", unix))]
pub use gateway::bird::BirdGateway;
#[cfg(feature = "std")]
pub use gateway::{in_memory::InMemoryGateway, AdvertisementGateway};
