//! Toolkit discovery.

use thiserror::Error;
use tracing::{debug, info};

use crate::toolkit::{BindingKind, ToolkitBinding};

/// Why a candidate binding could not be used. Every variant means "not
/// found" for that candidate; probing moves on to the next one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("no libraries configured for the {0} binding")]
    NotConfigured(BindingKind),

    #[error("cannot load {library}: {message}")]
    Load { library: String, message: String },

    #[error("{library} does not export {symbol}")]
    MissingSymbol { library: String, symbol: String },

    #[error("{library} speaks toolkit ABI {found}, expected {expected}")]
    AbiMismatch { library: String, expected: u32, found: u32 },

    #[error("{library} exports an incomplete table: {field} is missing")]
    IncompleteTable { library: String, field: &'static str },

    #[error("{0}")]
    Unavailable(String),
}

/// An importable toolkit binding.
pub trait ToolkitCandidate {
    fn kind(&self) -> BindingKind;

    /// Attempts to load the binding. Expensive and side-effecting; the
    /// controller calls it at most once per candidate.
    fn import(&self) -> Result<ToolkitBinding, ProbeError>;
}

/// Tries `candidates` in order and returns the first binding that imports.
pub fn probe_candidates<I>(candidates: I) -> Option<ToolkitBinding>
where
    I: IntoIterator<Item = Box<dyn ToolkitCandidate>>,
{
    for candidate in candidates {
        match candidate.import() {
            Ok(binding) => {
                info!(binding = %binding.kind, dialog_base = %binding.dialog_base_type, "toolkit binding found");
                return Some(binding);
            }
            Err(error) => debug!(binding = %candidate.kind(), error = %error, "toolkit binding unavailable"),
        }
    }
    debug!("no toolkit binding available");
    None
}
