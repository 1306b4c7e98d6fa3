/// Batch generation over many independent stencils.
use crate::codegen::SourceAssembler;
use crate::compose::CompositionEngine;
use crate::config::{GeneratorConfig, Manifest};
use crate::error::{ForgeError, Result};
use crate::model::ClassType;
use crate::registry::TraitCatalog;
use crate::stencil::ViewStencil;
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{info, warn};

/// Rendered source for one stencil, ready for an external writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSource {
    pub stencil: String,
    pub source_type: String,
    /// `com/example/ForgeButton.java`
    pub relative_path: PathBuf,
    pub text: String,
}

/// Per-stencil outcomes of a batch, in input order.
#[derive(Debug, Clone)]
pub struct BatchReport {
    outcomes: Vec<Result<GeneratedSource>>,
}

impl BatchReport {
    pub fn outcomes(&self) -> &[Result<GeneratedSource>] {
        &self.outcomes
    }

    pub fn sources(&self) -> impl Iterator<Item = &GeneratedSource> {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ForgeError> {
        self.outcomes.iter().filter_map(|o| o.as_ref().err())
    }

    pub fn succeeded(&self) -> usize {
        self.sources().count()
    }

    pub fn failed(&self) -> usize {
        self.failures().count()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// All sources, or the first failure in input order.
    pub fn into_result(self) -> Result<Vec<GeneratedSource>> {
        self.outcomes.into_iter().collect()
    }
}

/// Generates view classes from stencils.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
    assembler: SourceAssembler,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        let assembler = SourceAssembler::new(config.assembler.clone());
        Self { config, assembler }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Composes, validates and renders a single stencil.
    pub fn generate_one(&self, stencil: ViewStencil, class_type: &ClassType) -> Result<GeneratedSource> {
        let composed = CompositionEngine::new(stencil, class_type).compose()?;
        let text = self.assembler.assemble(&composed);
        Ok(GeneratedSource {
            relative_path: relative_path(&composed.package, &composed.simple_name),
            stencil: composed.stencil,
            source_type: composed.source_type,
            text,
        })
    }

    /// Generates every stencil. A failing stencil never affects its siblings.
    #[tracing::instrument(skip_all, fields(stencils = stencils.len(), parallel = self.config.parallel))]
    pub fn generate(&self, stencils: Vec<ViewStencil>, class_type: &ClassType) -> BatchReport {
        self.run(stencils.into_iter().map(Ok).collect(), class_type)
    }

    /// Resolves a manifest with `catalog`, then generates it with this generator's settings.
    ///
    /// A declaration that does not resolve is reported in its own slot;
    /// the other declarations are still generated.
    #[tracing::instrument(skip_all, fields(stencils = manifest.stencils.len(), parallel = self.config.parallel))]
    pub fn generate_manifest(
        &self,
        manifest: &Manifest,
        catalog: &TraitCatalog,
        class_type: &ClassType,
    ) -> BatchReport {
        let entries = manifest.resolve(catalog);
        for error in entries.iter().filter_map(|e| e.as_ref().err()) {
            warn!(error = %error, "stencil declaration rejected");
        }
        self.run(entries, class_type)
    }

    fn run(&self, entries: Vec<Result<ViewStencil>>, class_type: &ClassType) -> BatchReport {
        let outcomes: Vec<Result<GeneratedSource>> = if self.config.parallel {
            entries
                .into_par_iter()
                .map(|entry| entry.and_then(|stencil| self.generate_one(stencil, class_type)))
                .collect()
        } else {
            entries
                .into_iter()
                .map(|entry| entry.and_then(|stencil| self.generate_one(stencil, class_type)))
                .collect()
        };

        let report = BatchReport { outcomes };
        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "generation batch finished"
        );
        report
    }
}

fn relative_path(package: &str, simple_name: &str) -> PathBuf {
    let mut path: PathBuf = package.split('.').filter(|s| !s.is_empty()).collect();
    path.push(format!("{}.java", simple_name));
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{ClickTrait, TintTrait};
    use std::sync::Arc;

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path("com.example.views", "ForgeButton"),
            PathBuf::from("com/example/views/ForgeButton.java")
        );
        assert_eq!(relative_path("", "ForgeButton"), PathBuf::from("ForgeButton.java"));
    }

    #[test]
    fn test_generate_one() {
        let stencil = ViewStencil::builder("ButtonStencil", "android.widget.Button")
            .package("com.example")
            .with_trait(Arc::new(ClickTrait))
            .build()
            .expect("stencil");
        let source = Generator::default()
            .generate_one(stencil, &ClassType::new("com.example.R"))
            .expect("generate");

        assert_eq!(source.stencil, "ButtonStencil");
        assert_eq!(source.source_type, "com.example.ForgeButton");
        assert!(source.text.contains("public class ForgeButton extends android.widget.Button {"));
    }

    #[test]
    fn test_sequential_batch_reports_each_stencil() {
        let good = ViewStencil::builder("Good", "android.widget.Button")
            .with_trait(Arc::new(ClickTrait))
            .build()
            .expect("good");
        let bad = ViewStencil::builder("Bad", "android.widget.ImageView")
            .with_trait(Arc::new(TintTrait))
            .build()
            .expect("bad");

        let generator = Generator::new(GeneratorConfig::builder().parallel(false).build());
        let report = generator.generate(vec![bad, good], &ClassType::new("com.example.R"));

        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_success());
        assert!(report.outcomes()[0].is_err());
        assert!(report.outcomes()[1].is_ok());
        assert_eq!(report.failures().next().and_then(ForgeError::stencil), Some("Bad"));
        assert!(report.into_result().is_err());
    }
}
