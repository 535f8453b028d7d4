//! Data model for the Queensland census health preprocessor.

pub mod columns;
pub mod error;
pub mod geography;
pub mod lookup;
pub mod options;
pub mod roles;

pub use columns::FactKind;
pub use error::{CensusError, Result};
pub use geography::{GeogLevel, HierarchyCodes};
pub use lookup::CaseInsensitiveSet;
pub use options::{DEFAULT_TARGET_STATE, PipelineOptions};
pub use roles::{LabelSource, LookupRole, ResolvedColumns, STRUCTURAL_COLUMNS};
