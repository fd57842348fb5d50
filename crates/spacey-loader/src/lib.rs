// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # spacey-loader
//!
//! Loads modules compiled by `spacey-compiler` on top of a CommonJS-style
//! module object.
//!
//! ## Overview
//!
//! - [`Entry`]: one canonical record per module id holding its exports,
//!   getters, importer watchers and compiled form
//! - [`ScratchCache`]: modules constructed before their source is known,
//!   merged into the real module when it loads
//! - [`Loader`]: the load routine (reconcile, compile, execute) with an
//!   explicit state machine, see [`EntryState`]
//! - [`Runtime`]: the live-binding calls made by compiled code
//! - [`Host`]: what the embedder supplies, chiefly code execution
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use spacey_loader::{Loader, LoaderConfig};
//!
//! let config = LoaderConfig::find(&main)?;
//! let loader = Loader::with_config(MyEngineHost::new(), config);
//! let module = loader.load_main(&main)?;
//! println!("{:?}", module.exports().keys());
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod entry;
pub mod error;
pub mod host;
pub mod loader;
pub mod module;
pub mod runtime;
pub mod scratch;
pub mod value;

pub use config::LoaderConfig;
pub use entry::{Entry, EntryState, Watcher};
pub use error::{LoaderError, Result};
pub use host::Host;
pub use loader::Loader;
pub use module::Module;
pub use runtime::Runtime;
pub use scratch::ScratchCache;
pub use value::{Exports, Getter, Setter, Value};
