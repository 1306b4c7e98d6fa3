/// Configuration module for the generator public API.
///
/// This module provides the generator configuration with a builder, and the
/// YAML manifest format that pairs a configuration with stencil declarations.
use crate::codegen::AssemblerConfig;
use crate::error::Result;
use crate::registry::TraitCatalog;
use crate::stencil::{StencilDecl, ViewStencil, DEFAULT_VIEW_PREFIX};
use serde::{Deserialize, Serialize};

/// Main configuration struct for a generation batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Prefix for generated class names (`Forge` + `Button`)
    pub view_prefix: String,
    /// Package used by stencils that do not name one
    pub package: String,
    /// Whether independent stencils are generated in parallel
    pub parallel: bool,
    /// Source rendering options
    pub assembler: AssemblerConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            view_prefix: DEFAULT_VIEW_PREFIX.to_string(),
            package: String::new(),
            parallel: true,
            assembler: AssemblerConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Creates a builder for configuring the generator.
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::new()
    }

    /// Parses a configuration from YAML. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Builder for GeneratorConfig to provide a fluent configuration API.
#[derive(Debug, Default)]
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.view_prefix = prefix.into();
        self
    }

    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.config.package = package.into();
        self
    }

    pub fn parallel(mut self, enabled: bool) -> Self {
        self.config.parallel = enabled;
        self
    }

    pub fn assembler(mut self, assembler: AssemblerConfig) -> Self {
        self.config.assembler = assembler;
        self
    }

    pub fn build(self) -> GeneratorConfig {
        self.config
    }
}

/// A configuration plus the stencils it applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub config: GeneratorConfig,
    #[serde(default)]
    pub stencils: Vec<StencilDecl>,
}

impl Manifest {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Resolves each declaration on its own, in manifest order.
    ///
    /// A declaration that fails (unknown trait, duplicate trait, bad
    /// constructor count) yields an error in its own slot only.
    pub fn resolve(&self, catalog: &TraitCatalog) -> Vec<Result<ViewStencil>> {
        self.stencils
            .iter()
            .map(|decl| decl.resolve(catalog, &self.config))
            .collect()
    }
}
