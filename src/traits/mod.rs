//! The trait contract.
//!
//! A trait is a stateless unit of generation logic that hooks into a
//! stencil's code generation. Each stencil calls every trait it declares
//! exactly once, handing it the shared output type and initializer.
pub mod builtin;
pub mod id;

pub use builtin::{AttachTrait, ClickTrait, TintTrait, TypedTagTrait, VisibilityTrait};
pub use id::TraitId;

use crate::error::TraitError;
use crate::model::{ClassType, InitMethod, OutputType};
use std::fmt::Debug;

/// Code that must be generated for a view to receive a piece of functionality.
///
/// Implementations append members to `output` and statements to `init`.
/// They must not read anything other than the arguments, and must leave
/// `init` with the same control-flow depth they found it at.
pub trait Trait: Debug + Send + Sync {
    /// Identity used for duplicate detection and error attribution.
    fn id(&self) -> TraitId;

    /// Contributes this trait's fragments to the class named `source_type`.
    fn generate_for(
        &self,
        output: &mut OutputType,
        init: &mut InitMethod,
        class_type: &ClassType,
        source_type: &str,
    ) -> Result<(), TraitError>;
}
