// Core modules
pub mod batch;
pub mod codegen;
pub mod collision;
pub mod compose;
pub mod error;
pub mod model;
pub mod registry;
pub mod stencil;
pub mod traits;

// Configuration module for public API
pub mod config;

// Re-export key types for public API
pub use batch::{BatchReport, GeneratedSource, Generator};
pub use codegen::{AssemblerConfig, AssemblerConfigBuilder, SourceAssembler, SourceWriter};
pub use collision::{CollisionResolver, Resolution};
pub use compose::{ComposedClass, CompositionEngine, EngineState};
pub use config::{GeneratorConfig, GeneratorConfigBuilder, Manifest};
pub use error::{ForgeError, Result, TraitError};
pub use model::{
    ClassType, CodeBlock, Contribution, FieldSpec, InitMethod, Member, MemberKind, MethodSpec,
    Modifier, Origin, OutputType, Param,
};
pub use registry::{TraitCatalog, TraitRegistry};
pub use stencil::{StencilDecl, ViewStencil, ViewStencilBuilder};
pub use traits::{Trait, TraitId};

/// Composes a stencil and renders it with the default assembler settings.
///
/// This is the simplest entry point: one stencil in, one class of source out.
/// The pipeline is:
/// 1. **Preparation:** constructors and stencil interfaces are planned
/// 2. **Composition:** every trait runs once, in declaration order
/// 3. **Collision resolution:** conflicting members are rejected, identical ones merged
/// 4. **Assembly:** the class is rendered to text
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use viewforge::traits::ClickTrait;
/// use viewforge::{generate_class, ClassType, ViewStencil};
///
/// let stencil = ViewStencil::builder("ButtonStencil", "android.widget.Button")
///     .package("com.example")
///     .with_trait(Arc::new(ClickTrait))
///     .build()
///     .unwrap();
/// let source = generate_class(stencil, &ClassType::new("com.example.R")).unwrap();
/// assert!(source.contains("public class ForgeButton extends android.widget.Button {"));
/// assert!(source.contains("setClickable(true);"));
/// ```
pub fn generate_class(stencil: ViewStencil, class_type: &ClassType) -> Result<String> {
    let composed = compose::compose(stencil, class_type)?;
    Ok(SourceAssembler::default().assemble(&composed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::traits::{AttachTrait, TintTrait, VisibilityTrait};

    #[test]
    fn test_generate_class_orders_members_by_declaration() {
        let stencil = ViewStencil::builder("ImageStencil", "android.widget.ImageView")
            .with_trait(Arc::new(AttachTrait))
            .with_trait(Arc::new(VisibilityTrait))
            .build()
            .expect("stencil");
        let source = generate_class(stencil, &ClassType::new("R")).expect("generate");

        let attach = source.find("attachEvents()").expect("attach method");
        let show = source.find("ForgeImageView show()").expect("show method");
        assert!(attach < show);
    }

    #[test]
    fn test_generate_class_propagates_failures() {
        let stencil = ViewStencil::builder("TintStencil", "android.widget.ImageView")
            .with_trait(Arc::new(TintTrait))
            .build()
            .expect("stencil");
        let error = generate_class(stencil, &ClassType::new("R")).unwrap_err();
        assert!(matches!(error, ForgeError::Generation { .. }));
    }
}
