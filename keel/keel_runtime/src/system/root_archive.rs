//! Root-archive selection.
//!
//! Root-archive policy: the content root comes out of the fully-parsed
//! manifest's host section, and the archive is constructed through whichever
//! archive-manager capability a loaded module registered. The root's suffix
//! only hints which backend instance to prefer; exactly one backend is
//! consulted per load.

use crate::env::EnvironmentStore;
use crate::manifest::{EnvValue, HostSection};
use keel_core::capability::InterfaceRegistry;
use keel_core::error::{ArchiveError, Error};
use keel_core::traits::{Archive, ArchiveManager, ARCHIVE_MANAGER_TAG};
use keel_core::utils::formalize;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Environment entry naming the content root the archive is built over.
pub const CONTENT_ROOT_VAR: &str = "CONTENT_ROOT";

/// Backend instance name to prefer for a content root path.
pub fn backend_hint(root: &str) -> &'static str {
    let lower = root.to_ascii_lowercase();
    if lower.ends_with(".zip") || lower.ends_with(".obb") {
        "package"
    } else {
        "directory"
    }
}

/// Construct the root archive for a loaded manifest.
///
/// Every failure here is fatal to bootstrap: a missing content root, no
/// resident archive manager, or a backend that cannot produce the archive.
pub fn create_root_archive(
    interfaces: &InterfaceRegistry,
    host: &HostSection,
    store: &EnvironmentStore,
) -> Result<Arc<dyn Archive>, Error> {
    let raw = match host.environment(CONTENT_ROOT_VAR) {
        Some(EnvValue::Scalar(value)) => value.clone(),
        Some(EnvValue::Sequence(values)) => match values.first() {
            Some(value) => value.clone(),
            None => {
                error!("CONTENT_ROOT declared as an empty sequence");
                return Err(ArchiveError::ContentRootMissing.into());
            }
        },
        None => {
            error!("Manifest host section declares no CONTENT_ROOT");
            return Err(ArchiveError::ContentRootMissing.into());
        }
    };

    let root = formalize(&raw, |name| store.get(name)).map_err(|err| {
        error!(%err, "CONTENT_ROOT failed formalization");
        Error::Environment(err)
    })?;

    let hint = backend_hint(&root);
    let manager = resolve_manager(interfaces, hint).ok_or_else(|| {
        error!(backend = hint, "No archive manager interface found");
        Error::Archive(ArchiveError::ManagerNotResident(hint.to_string()))
    })?;

    let archive = manager.create_archive(Path::new(&root)).map_err(|err| {
        error!(root = %root, %err, "Failed to create root archive");
        Error::Archive(err)
    })?;

    info!(root = %root, backend = manager.backend_name(), "Root archive ready");
    Ok(archive)
}

/// Find the manager for `hint`: by instance name first, then any registrant
/// whose backend matches. A registrant for a different backend is never
/// used.
fn resolve_manager(
    interfaces: &InterfaceRegistry,
    hint: &str,
) -> Option<Arc<dyn ArchiveManager>> {
    if let Some(manager) =
        interfaces.get_cloned::<Arc<dyn ArchiveManager>>(ARCHIVE_MANAGER_TAG, Some(hint))
    {
        return Some(manager);
    }

    let fallback =
        interfaces.get_cloned::<Arc<dyn ArchiveManager>>(ARCHIVE_MANAGER_TAG, None)?;
    if fallback.backend_name() == hint {
        warn!(
            backend = hint,
            "Archive manager found under a different instance name"
        );
        Some(fallback)
    } else {
        None
    }
}
