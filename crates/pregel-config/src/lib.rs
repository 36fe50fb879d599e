// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Configuration services for pregel tools.
//!
//! [`ConfigStore`] is the storage port (raw bytes keyed by logical name),
//! [`FsConfigStore`] the filesystem adapter, [`ConfigService`] the JSON layer
//! on top, and [`RunProfile`] the typed, named bundle of run settings the CLI
//! saves and loads.

pub mod config;
pub mod fs;
pub mod profile;

pub use config::{ConfigError, ConfigService, ConfigStore};
pub use fs::FsConfigStore;
pub use profile::{Algorithm, RunProfile};
