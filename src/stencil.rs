/// View stencils: the templates that declare which traits compose a view.
use crate::config::GeneratorConfig;
use crate::error::{ForgeError, Result};
use crate::registry::{TraitCatalog, TraitRegistry};
use crate::traits::Trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_VIEW_PREFIX: &str = "Forge";
pub const MAX_CONSTRUCTORS: u8 = 3;

/// A template for one generated view class.
///
/// Composition takes the stencil by value, so it is consumed exactly once.
#[derive(Debug, Clone)]
pub struct ViewStencil {
    name: String,
    package: String,
    class_name: String,
    extended_type: String,
    interfaces: Vec<String>,
    constructor_count: u8,
    default_style_attr: Option<String>,
    traits: TraitRegistry,
}

impl ViewStencil {
    pub fn builder(name: impl Into<String>, extended_type: impl Into<String>) -> ViewStencilBuilder {
        ViewStencilBuilder::new(name, extended_type)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn extended_type(&self) -> &str {
        &self.extended_type
    }

    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    pub fn constructor_count(&self) -> u8 {
        self.constructor_count
    }

    pub fn default_style_attr(&self) -> Option<&str> {
        self.default_style_attr.as_deref()
    }

    pub fn traits(&self) -> &TraitRegistry {
        &self.traits
    }

    /// Fully-qualified name of the generated class.
    pub fn source_type(&self) -> String {
        if self.package.is_empty() {
            self.class_name.clone()
        } else {
            format!("{}.{}", self.package, self.class_name)
        }
    }
}

/// Returns the last segment of a dotted type name.
pub fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

/// Builder for [`ViewStencil`]. Traits are registered, in order, by [`build`](Self::build).
#[derive(Debug)]
pub struct ViewStencilBuilder {
    name: String,
    extended_type: String,
    package: String,
    class_name: Option<String>,
    view_prefix: String,
    interfaces: Vec<String>,
    constructor_count: u8,
    default_style_attr: Option<String>,
    traits: Vec<Arc<dyn Trait>>,
}

impl ViewStencilBuilder {
    pub fn new(name: impl Into<String>, extended_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extended_type: extended_type.into(),
            package: String::new(),
            class_name: None,
            view_prefix: DEFAULT_VIEW_PREFIX.to_string(),
            interfaces: Vec::new(),
            constructor_count: MAX_CONSTRUCTORS,
            default_style_attr: None,
            traits: Vec::new(),
        }
    }

    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    /// Overrides the generated class name; defaults to prefix + extended simple name.
    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn view_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.view_prefix = prefix.into();
        self
    }

    pub fn interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Number of Android view constructors to generate (1 to 3).
    pub fn constructor_count(mut self, count: u8) -> Self {
        self.constructor_count = count;
        self
    }

    /// Attribute (in the `attr` resources) used as the default style.
    pub fn default_style_attr(mut self, attr: impl Into<String>) -> Self {
        self.default_style_attr = Some(attr.into());
        self
    }

    pub fn with_trait(mut self, t: Arc<dyn Trait>) -> Self {
        self.traits.push(t);
        self
    }

    pub fn with_traits<I>(mut self, traits: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Trait>>,
    {
        self.traits.extend(traits);
        self
    }

    pub fn build(self) -> Result<ViewStencil> {
        if self.name.trim().is_empty() {
            return Err(ForgeError::config_error("stencil name must not be empty"));
        }
        if self.extended_type.trim().is_empty() {
            return Err(ForgeError::config_error(format!(
                "stencil '{}' has no extended type",
                self.name
            )));
        }
        if !(1..=MAX_CONSTRUCTORS).contains(&self.constructor_count) {
            return Err(ForgeError::config_error(format!(
                "stencil '{}' asks for {} constructors, expected 1 to {}",
                self.name, self.constructor_count, MAX_CONSTRUCTORS
            )));
        }

        let mut registry = TraitRegistry::new(self.name.clone());
        for t in self.traits {
            registry.register(t)?;
        }

        let class_name = self.class_name.unwrap_or_else(|| {
            format!("{}{}", self.view_prefix, simple_name(&self.extended_type))
        });

        Ok(ViewStencil {
            name: self.name,
            package: self.package,
            class_name,
            extended_type: self.extended_type,
            interfaces: self.interfaces,
            constructor_count: self.constructor_count,
            default_style_attr: self.default_style_attr,
            traits: registry,
        })
    }
}

fn default_constructor_count() -> u8 {
    MAX_CONSTRUCTORS
}

/// Declarative form of a stencil, as written in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StencilDecl {
    pub name: String,
    pub extends: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default = "default_constructor_count")]
    pub constructors: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_style_attr: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub traits: Vec<String>,
}

impl StencilDecl {
    /// Resolves trait references through `catalog` and builds the stencil,
    /// filling in package and prefix from `config`.
    pub fn resolve(&self, catalog: &TraitCatalog, config: &GeneratorConfig) -> Result<ViewStencil> {
        let mut builder = ViewStencil::builder(&self.name, &self.extends)
            .package(self.package.clone().unwrap_or_else(|| config.package.clone()))
            .view_prefix(&config.view_prefix)
            .constructor_count(self.constructors);

        if let Some(class_name) = &self.class_name {
            builder = builder.class_name(class_name);
        }
        if let Some(attr) = &self.default_style_attr {
            builder = builder.default_style_attr(attr);
        }
        for interface in &self.interfaces {
            builder = builder.interface(interface);
        }
        for reference in &self.traits {
            let t = catalog.resolve(reference).map_err(|e| {
                ForgeError::config_error(format!("stencil '{}': {}", self.name, e))
            })?;
            builder = builder.with_trait(t);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{ClickTrait, TraitId, VisibilityTrait};

    #[test]
    fn test_builder_defaults() {
        let stencil = ViewStencil::builder("ButtonStencil", "android.widget.Button")
            .package("com.example.views")
            .build()
            .expect("stencil");

        assert_eq!(stencil.class_name(), "ForgeButton");
        assert_eq!(stencil.source_type(), "com.example.views.ForgeButton");
        assert_eq!(stencil.constructor_count(), 3);
        assert!(stencil.traits().is_empty());
    }

    #[test]
    fn test_builder_registers_traits_in_order() {
        let stencil = ViewStencil::builder("ButtonStencil", "android.widget.Button")
            .with_trait(Arc::new(ClickTrait))
            .with_trait(Arc::new(VisibilityTrait))
            .build()
            .expect("stencil");

        assert_eq!(
            stencil.traits().ids(),
            vec![TraitId::new("ClickTrait"), TraitId::new("VisibilityTrait")]
        );
        assert_eq!(stencil.source_type(), "ForgeButton");
    }

    #[test]
    fn test_builder_rejects_duplicate_traits() {
        let result = ViewStencil::builder("ButtonStencil", "android.widget.Button")
            .with_trait(Arc::new(ClickTrait))
            .with_trait(Arc::new(ClickTrait))
            .build();
        assert!(matches!(result, Err(ForgeError::Registration { .. })));
    }

    #[test]
    fn test_builder_validation() {
        assert!(ViewStencil::builder("", "android.widget.Button").build().is_err());
        assert!(ViewStencil::builder("S", " ").build().is_err());
        assert!(ViewStencil::builder("S", "android.widget.Button")
            .constructor_count(0)
            .build()
            .is_err());
        assert!(ViewStencil::builder("S", "android.widget.Button")
            .constructor_count(4)
            .build()
            .is_err());
    }

    #[test]
    fn test_simple_name() {
        assert_eq!(simple_name("android.widget.Button"), "Button");
        assert_eq!(simple_name("Button"), "Button");
    }

    #[test]
    fn test_decl_resolve() {
        let decl: StencilDecl = serde_yaml::from_str(
            "name: TextStencil\nextends: android.widget.TextView\ntraits: [ClickTrait, 'TypedTagTrait<String>']\n",
        )
        .expect("yaml");
        assert_eq!(decl.constructors, 3);

        let config = GeneratorConfig::builder()
            .package("com.example")
            .view_prefix("My")
            .build();
        let stencil = decl
            .resolve(&TraitCatalog::with_builtins(), &config)
            .expect("resolve");

        assert_eq!(stencil.source_type(), "com.example.MyTextView");
        assert_eq!(stencil.traits().len(), 2);
    }

    #[test]
    fn test_decl_unknown_trait_names_stencil() {
        let decl = StencilDecl {
            name: "TextStencil".into(),
            extends: "android.widget.TextView".into(),
            class_name: None,
            package: None,
            constructors: 3,
            default_style_attr: None,
            interfaces: Vec::new(),
            traits: vec!["MissingTrait".into()],
        };
        let error = decl
            .resolve(&TraitCatalog::with_builtins(), &GeneratorConfig::default())
            .unwrap_err();
        let text = error.to_string();
        assert!(text.contains("TextStencil"));
        assert!(text.contains("MissingTrait"));
    }
}
