/// Trait registration and resolution.
///
/// [`TraitRegistry`] is the ordered trait list owned by one stencil.
/// [`TraitCatalog`] maps trait names used in declarations to implementations.
use crate::error::{ForgeError, Result, TraitError};
use crate::traits::{
    AttachTrait, ClickTrait, TintTrait, Trait, TraitId, TypedTagTrait, VisibilityTrait,
};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Ordered, duplicate-free list of the traits declared by one stencil.
#[derive(Debug, Clone)]
pub struct TraitRegistry {
    stencil: String,
    traits: Vec<Arc<dyn Trait>>,
}

impl TraitRegistry {
    /// Creates an empty registry for the named stencil.
    pub fn new(stencil: impl Into<String>) -> Self {
        Self {
            stencil: stencil.into(),
            traits: Vec::new(),
        }
    }

    /// Appends a trait; declaring the same identity twice is rejected.
    pub fn register(&mut self, t: Arc<dyn Trait>) -> Result<()> {
        let id = t.id();

        if self.contains(&id) {
            return Err(ForgeError::Registration {
                stencil: self.stencil.clone(),
                trait_id: id,
            });
        }

        self.traits.push(t);
        Ok(())
    }

    pub fn contains(&self, id: &TraitId) -> bool {
        self.traits.iter().any(|t| &t.id() == id)
    }

    pub fn len(&self) -> usize {
        self.traits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }

    /// Identities in declaration order.
    pub fn ids(&self) -> Vec<TraitId> {
        self.traits.iter().map(|t| t.id()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Trait>> {
        self.traits.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<dyn Trait>> {
        self.traits.get(index)
    }

    pub fn stencil(&self) -> &str {
        &self.stencil
    }
}

/// Builds a trait instance from its parsed reference.
pub type TraitFactory =
    Arc<dyn Fn(&TraitId) -> std::result::Result<Arc<dyn Trait>, TraitError> + Send + Sync>;

/// Name-indexed trait factories used to resolve declarations.
#[derive(Clone, Default)]
pub struct TraitCatalog {
    factories: BTreeMap<String, TraitFactory>,
}

impl fmt::Debug for TraitCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraitCatalog")
            .field("names", &self.names())
            .finish()
    }
}

impl TraitCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog preloaded with the builtin traits.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        let builtins: [Arc<dyn Trait>; 4] = [
            Arc::new(ClickTrait),
            Arc::new(VisibilityTrait),
            Arc::new(AttachTrait),
            Arc::new(TintTrait),
        ];
        for t in builtins {
            catalog
                .register_trait(t)
                .expect("builtin names are distinct");
        }
        catalog
            .register_factory(TypedTagTrait::NAME, |id: &TraitId| {
                TypedTagTrait::from_id(id).map(|t| Arc::new(t) as Arc<dyn Trait>)
            })
            .expect("builtin names are distinct");
        catalog
    }

    /// Registers a factory under `name`. Names must be unique.
    pub fn register_factory<F>(&mut self, name: impl Into<String>, factory: F) -> Result<()>
    where
        F: Fn(&TraitId) -> std::result::Result<Arc<dyn Trait>, TraitError> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(ForgeError::config_error(format!(
                "trait '{}' is already in the catalog",
                name
            )));
        }
        self.factories.insert(name, Arc::new(factory));
        Ok(())
    }

    /// Registers a non-generic trait instance under its own name.
    pub fn register_trait(&mut self, t: Arc<dyn Trait>) -> Result<()> {
        let name = t.id().name().to_string();
        self.register_factory(name.clone(), move |id: &TraitId| {
            if id.generics().is_empty() {
                Ok(Arc::clone(&t))
            } else {
                Err(TraitError::message(format!(
                    "{} does not take type parameters",
                    name
                )))
            }
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Catalog names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Resolves a textual reference such as `TypedTagTrait<String>`.
    pub fn resolve(&self, reference: &str) -> Result<Arc<dyn Trait>> {
        let id = TraitId::parse(reference)?;
        self.resolve_id(&id)
    }

    pub fn resolve_id(&self, id: &TraitId) -> Result<Arc<dyn Trait>> {
        let factory = self
            .factories
            .get(id.name())
            .ok_or_else(|| ForgeError::config_error(format!("unknown trait '{}'", id)))?;

        factory(id).map_err(|e| ForgeError::config_error(format!("trait {}: {}", id, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_preserves_order() {
        let mut registry = TraitRegistry::new("ButtonStencil");
        registry.register(Arc::new(VisibilityTrait)).expect("first");
        registry.register(Arc::new(ClickTrait)).expect("second");

        assert_eq!(
            registry.ids(),
            vec![TraitId::new("VisibilityTrait"), TraitId::new("ClickTrait")]
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let mut registry = TraitRegistry::new("ButtonStencil");
        registry.register(Arc::new(ClickTrait)).expect("first");

        let error = registry.register(Arc::new(ClickTrait)).unwrap_err();
        match error {
            ForgeError::Registration { stencil, trait_id } => {
                assert_eq!(stencil, "ButtonStencil");
                assert_eq!(trait_id, TraitId::new("ClickTrait"));
            }
            other => panic!("expected registration error, got {other:?}"),
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_distinguishes_generic_parameters() {
        let mut registry = TraitRegistry::new("TagStencil");
        registry
            .register(Arc::new(TypedTagTrait::new("String")))
            .expect("string");
        registry
            .register(Arc::new(TypedTagTrait::new("Integer")))
            .expect("integer is a different identity");
        assert!(registry
            .register(Arc::new(TypedTagTrait::new("String")))
            .is_err());
    }

    #[test]
    fn test_catalog_resolves_builtins() {
        let catalog = TraitCatalog::with_builtins();
        assert_eq!(
            catalog.names(),
            vec![
                "AttachTrait",
                "ClickTrait",
                "TintTrait",
                "TypedTagTrait",
                "VisibilityTrait"
            ]
        );

        let t = catalog.resolve("ClickTrait").expect("click");
        assert_eq!(t.id(), TraitId::new("ClickTrait"));

        let t = catalog.resolve("TypedTagTrait<java.lang.String>").expect("typed tag");
        assert_eq!(t.id().generics(), &["java.lang.String".to_string()]);
    }

    #[test]
    fn test_catalog_errors() {
        let mut catalog = TraitCatalog::with_builtins();
        assert!(matches!(
            catalog.resolve("NopeTrait"),
            Err(ForgeError::Config { .. })
        ));
        assert!(catalog.resolve("ClickTrait<String>").is_err());
        assert!(catalog.resolve("TypedTagTrait").is_err());
        assert!(catalog.resolve("Click Trait").is_err());
        assert!(catalog.register_trait(Arc::new(ClickTrait)).is_err());
    }
}
