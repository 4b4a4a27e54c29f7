//! # Fudge Core Library
//!
//! This crate contains the core logic of the `fudge` tool: it reads a project's
//! `Fudgefile` and drives a system package manager (Chocolatey by default) to
//! install, upgrade, uninstall, reinstall, list, search and pack what it declares.
//!
//! A `Fudgefile` is a small JSON document:
//!
//! ```json
//! {
//!     "packages": { "git": "2.43.0", "7zip": "latest" },
//!     "devPackages": { "fiddler": "" },
//!     "pack": { "website": "nuspecs/website.nuspec" }
//! }
//! ```
//!
//! ## Modules Overview
//! - [`action`] – The closed set of actions and their elevation policy
//! - [`request`] – Validating raw command-line input into an [`InvocationRequest`]
//! - [`fudgefile`] – Loading, saving and scoping `Fudgefile` manifests
//! - [`precondition`] – Deciding whether there is anything to do
//! - [`privilege`] – Detecting administrative rights
//! - [`backend`] – The [`Backend`] trait and the Chocolatey runner
//! - [`dispatch`] – One handler per action
//! - [`execute`] – A whole run, from raw arguments to an [`Outcome`]
//! - [`report`] – User-facing output and the run timer
//! - [`config`] – User-level configuration (`config.toml`)
//! - [`error`] – The [`FudgeError`] type

pub mod action;
pub mod backend;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod execute;
pub mod fudgefile;
pub mod precondition;
pub mod privilege;
pub mod report;
pub mod request;

pub use action::*;
pub use backend::{Backend, Chocolatey, InstalledPackage, SearchHit};
pub use config::Config;
pub use dispatch::{ListEntry, ListStatus, Outcome};
pub use error::FudgeError;
pub use execute::{execute, InvocationContext};
pub use fudgefile::*;
pub use report::{Reporter, RunTimer};
pub use request::*;
