/// Builtin traits covering the common view behaviours: clicks, visibility,
/// attach events, typed tags and styled tint.
use super::{Trait, TraitId};
use crate::error::TraitError;
use crate::model::{
    ClassType, CodeBlock, FieldSpec, InitMethod, MethodSpec, Modifier, OutputType, Param,
};

const OBSERVABLE: &str = "io.reactivex.Observable";
const RX_VIEW: &str = "com.jakewharton.rxbinding2.view.RxView";
const VIEW: &str = "android.view.View";

/// Exposes a `clicks()` observable and makes the view clickable.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClickTrait;

impl Trait for ClickTrait {
    fn id(&self) -> TraitId {
        TraitId::new("ClickTrait")
    }

    fn generate_for(
        &self,
        output: &mut OutputType,
        init: &mut InitMethod,
        _class_type: &ClassType,
        _source_type: &str,
    ) -> Result<(), TraitError> {
        output.add_method(
            MethodSpec::new("clicks")
                .modifiers(&[Modifier::Public])
                .returns(format!("{}<java.lang.Object>", OBSERVABLE))
                .body(CodeBlock::statement(format!("return {}.clicks(this)", RX_VIEW))),
        );
        init.add_statement("setClickable(true)");
        Ok(())
    }
}

/// Adds chainable `show()`/`hide()` helpers and `isVisible()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct VisibilityTrait;

impl VisibilityTrait {
    fn setter(name: &str, visibility: &str, source_type: &str) -> MethodSpec {
        let mut body = CodeBlock::new();
        body.add_statement(format!("setVisibility({}.{})", VIEW, visibility))
            .add_statement("return this");
        MethodSpec::new(name)
            .modifiers(&[Modifier::Public])
            .returns(source_type)
            .body(body)
    }
}

impl Trait for VisibilityTrait {
    fn id(&self) -> TraitId {
        TraitId::new("VisibilityTrait")
    }

    fn generate_for(
        &self,
        output: &mut OutputType,
        init: &mut InitMethod,
        _class_type: &ClassType,
        source_type: &str,
    ) -> Result<(), TraitError> {
        output
            .add_method(Self::setter("show", "VISIBLE", source_type))
            .add_method(Self::setter("hide", "GONE", source_type))
            .add_method(
                MethodSpec::new("isVisible")
                    .modifiers(&[Modifier::Public])
                    .returns("boolean")
                    .body(CodeBlock::statement(format!(
                        "return getVisibility() == {}.VISIBLE",
                        VIEW
                    ))),
            );
        init.add_statement(format!("setVisibility({}.VISIBLE)", VIEW));
        Ok(())
    }
}

/// Exposes an `attachEvents()` observable.
#[derive(Debug, Default, Clone, Copy)]
pub struct AttachTrait;

impl Trait for AttachTrait {
    fn id(&self) -> TraitId {
        TraitId::new("AttachTrait")
    }

    fn generate_for(
        &self,
        output: &mut OutputType,
        _init: &mut InitMethod,
        _class_type: &ClassType,
        _source_type: &str,
    ) -> Result<(), TraitError> {
        output.add_method(
            MethodSpec::new("attachEvents")
                .modifiers(&[Modifier::Public])
                .returns(format!(
                    "{}<com.jakewharton.rxbinding2.view.ViewAttachEvent>",
                    OBSERVABLE
                ))
                .body(CodeBlock::statement(format!(
                    "return {}.attachEvents(this)",
                    RX_VIEW
                ))),
        );
        Ok(())
    }
}

/// Stores a tag of type `T` alongside the view, with accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedTagTrait {
    ty: String,
}

impl TypedTagTrait {
    pub const NAME: &'static str = "TypedTagTrait";

    pub fn new(ty: impl Into<String>) -> Self {
        Self { ty: ty.into() }
    }

    /// Builds the trait from a reference like `TypedTagTrait<java.lang.String>`.
    pub fn from_id(id: &TraitId) -> Result<Self, TraitError> {
        match id.generics() {
            [ty] => Ok(Self::new(ty.clone())),
            other => Err(TraitError::message(format!(
                "{} takes exactly one type parameter, got {}",
                Self::NAME,
                other.len()
            ))),
        }
    }
}

impl Trait for TypedTagTrait {
    fn id(&self) -> TraitId {
        TraitId::with_generics(Self::NAME, [self.ty.clone()])
    }

    fn generate_for(
        &self,
        output: &mut OutputType,
        _init: &mut InitMethod,
        _class_type: &ClassType,
        _source_type: &str,
    ) -> Result<(), TraitError> {
        if self.ty.trim().is_empty() {
            return Err(TraitError::message("typed tag needs a non-empty type"));
        }

        output
            .add_field(FieldSpec::new(&self.ty, "typedTag").modifiers(&[Modifier::Private]))
            .add_method(
                MethodSpec::new("setTypedTag")
                    .modifiers(&[Modifier::Public])
                    .param(Param::new(&self.ty, "typedTag"))
                    .body(CodeBlock::statement("this.typedTag = typedTag")),
            )
            .add_method(
                MethodSpec::new("getTypedTag")
                    .modifiers(&[Modifier::Public])
                    .returns(&self.ty)
                    .body(CodeBlock::statement("return typedTag")),
            );
        Ok(())
    }
}

/// Reads the `forgeTint` styled attribute into a `ColorStateList` field.
#[derive(Debug, Default, Clone, Copy)]
pub struct TintTrait;

impl TintTrait {
    pub const STYLEABLE: &'static str = "ForgeTint";
    pub const TINT_INDEX: &'static str = "ForgeTint_forgeTint";
}

impl Trait for TintTrait {
    fn id(&self) -> TraitId {
        TraitId::new("TintTrait")
    }

    fn generate_for(
        &self,
        output: &mut OutputType,
        init: &mut InitMethod,
        class_type: &ClassType,
        _source_type: &str,
    ) -> Result<(), TraitError> {
        let styleable = class_type.require("styleable", Self::STYLEABLE)?;
        let tint_index = class_type.require("styleable", Self::TINT_INDEX)?;
        let color_state_list = "android.content.res.ColorStateList";

        output
            .add_field(FieldSpec::new(color_state_list, "tint").modifiers(&[Modifier::Private]))
            .add_method(
                MethodSpec::new("getTint")
                    .modifiers(&[Modifier::Public])
                    .returns(color_state_list)
                    .body(CodeBlock::statement("return tint")),
            );

        init.begin_control_flow("if (attrs != null)")
            .add_statement(format!(
                "android.content.res.TypedArray a = context.obtainStyledAttributes(attrs, {}, defStyleAttr, 0)",
                styleable
            ))
            .begin_control_flow("try")
            .add_statement(format!("tint = a.getColorStateList({})", tint_index))
            .next_control_flow("finally")
            .add_statement("a.recycle()")
            .end_control_flow()
            .end_control_flow();
        Ok(())
    }
}
