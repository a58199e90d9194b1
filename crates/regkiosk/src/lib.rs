//! `regkiosk` - A registration kiosk with signature capture
//!
//! This library provides the core functionality for capturing registrations
//! with a hand-drawn signature, rejecting duplicate registrants, and
//! persisting records to a local store or a remote table.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod kiosk;
pub mod logging;
pub mod pad;
pub mod records;
pub mod registrant;

pub use config::Config;
pub use error::{Error, Result};
pub use gateway::{Gateway, LocalGateway, RemoteGateway};
pub use kiosk::Kiosk;
pub use logging::init_logging;
pub use pad::{PointerEvent, SignaturePad, SurfaceFrame};
pub use registrant::{registration_key, Department, Registrant, RegistrationForm};
