//! Manifest loading and host-OS resolution.
//!
//! The manifest is a hierarchical YAML document with the fixed schema
//! `app.host_os.<os-id>.{environments, modules}`. Loading validates the
//! required shape before anything else in the process is touched, so a
//! malformed document costs nothing but a log line.

mod document;
mod loader;

pub use document::{EnvDirective, EnvMode, EnvValue, HostSection, Manifest};
pub use loader::ManifestSource;
