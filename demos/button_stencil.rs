//! Generates a small set of view classes and prints them.
//!
//! Run with `RUST_LOG=viewforge=debug` to see each trait being applied.
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};
use viewforge::traits::{ClickTrait, TintTrait, TypedTagTrait, VisibilityTrait};
use viewforge::{ClassType, Generator, GeneratorConfig, ViewStencil};

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("viewforge=info"));
    fmt().with_env_filter(filter).with_target(false).init();

    let class_type = ClassType::new("com.example.R")
        .with_resource("attr", "buttonStyle")
        .with_resource("styleable", TintTrait::STYLEABLE)
        .with_resource("styleable", TintTrait::TINT_INDEX);

    let stencils = vec![
        ViewStencil::builder("ButtonStencil", "android.widget.Button")
            .package("com.example.views")
            .default_style_attr("buttonStyle")
            .with_trait(Arc::new(ClickTrait))
            .with_trait(Arc::new(VisibilityTrait))
            .build()?,
        ViewStencil::builder("ImageStencil", "android.widget.ImageView")
            .package("com.example.views")
            .constructor_count(2)
            .with_trait(Arc::new(TintTrait))
            .with_trait(Arc::new(TypedTagTrait::new("java.lang.Long")))
            .build()?,
    ];

    let generator = Generator::new(GeneratorConfig::builder().parallel(true).build());
    for source in generator.generate(stencils, &class_type).into_result()? {
        println!("// ---- {}", source.relative_path.display());
        println!("{}", source.text);
    }
    Ok(())
}
