/// The composition engine: applies a stencil's traits, in order, to one
/// shared output type and initializer.
use crate::collision::CollisionResolver;
use crate::error::{ForgeError, Result, TraitError};
use crate::model::{
    is_identifier, ClassType, ConstructorSpec, Contribution, InitMethod, Member, MethodSpec,
    Modifier, Origin, OutputType, Param, ATTRIBUTE_SET_TYPE, CONTEXT_TYPE, INIT_METHOD_NAME,
    NULLABLE_ANNOTATION,
};
use crate::stencil::ViewStencil;
use crate::traits::TraitId;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Lifecycle of one composition run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Traits registered, nothing applied yet.
    Pending,
    /// Applying traits; `next` is the index of the next trait to run.
    Composing { next: usize },
    /// Every trait applied.
    Composed,
    /// A trait (or the stencil) failed; remaining traits were skipped.
    Failed,
}

impl EngineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, EngineState::Composed | EngineState::Failed)
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineState::Pending => write!(f, "pending"),
            EngineState::Composing { next } => write!(f, "composing (next trait {})", next),
            EngineState::Composed => write!(f, "composed"),
            EngineState::Failed => write!(f, "failed"),
        }
    }
}

/// A fully composed and collision-checked class, ready to be rendered.
#[derive(Debug, Clone)]
pub struct ComposedClass {
    pub stencil: String,
    pub package: String,
    pub simple_name: String,
    pub source_type: String,
    pub base_class: String,
    pub interfaces: Vec<String>,
    pub constructors: Vec<ConstructorSpec>,
    pub init: InitMethod,
    pub members: Vec<Contribution>,
    /// Traits in the order they were applied.
    pub applied: Vec<TraitId>,
}

/// Drives one stencil from [`EngineState::Pending`] to a terminal state.
#[derive(Debug)]
pub struct CompositionEngine<'a> {
    stencil: ViewStencil,
    class_type: &'a ClassType,
    source_type: String,
    output: OutputType,
    init: InitMethod,
    constructors: Vec<ConstructorSpec>,
    applied: Vec<TraitId>,
    state: EngineState,
}

impl<'a> CompositionEngine<'a> {
    pub fn new(stencil: ViewStencil, class_type: &'a ClassType) -> Self {
        let output = OutputType::new(
            stencil.package(),
            stencil.class_name(),
            stencil.extended_type(),
        );
        Self {
            source_type: stencil.source_type(),
            stencil,
            class_type,
            output,
            init: InitMethod::new(),
            constructors: Vec::new(),
            applied: Vec::new(),
            state: EngineState::Pending,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn stencil(&self) -> &ViewStencil {
        &self.stencil
    }

    pub fn output(&self) -> &OutputType {
        &self.output
    }

    pub fn init(&self) -> &InitMethod {
        &self.init
    }

    /// Performs one step: the stencil's own setup on the first call, then
    /// one trait per call. Returns the state after the step.
    pub fn apply_next(&mut self) -> Result<EngineState> {
        let next = match self.state {
            EngineState::Pending => {
                if let Err(source) = self.prepare() {
                    return Err(self.fail(Origin::Stencil, source));
                }
                0
            }
            EngineState::Composing { next } => next,
            EngineState::Composed | EngineState::Failed => {
                return Err(ForgeError::InvalidState {
                    stencil: self.stencil.name().to_string(),
                    state: self.state.to_string(),
                });
            }
        };

        if let Some(t) = self.stencil.traits().get(next).map(Arc::clone) {
            let id = t.id();
            let origin = Origin::Trait(id.clone());

            self.output.set_origin(origin.clone());
            self.init.set_origin(origin.clone());
            let members_before = self.output.members().len();
            let depth_before = self.init.body().depth();
            let unmatched_before = self.init.body().unmatched_closes();

            let result = t
                .generate_for(
                    &mut self.output,
                    &mut self.init,
                    self.class_type,
                    &self.source_type,
                )
                .and_then(|()| {
                    self.check_contribution(members_before, depth_before, unmatched_before)
                });

            self.output.set_origin(Origin::Stencil);
            self.init.set_origin(Origin::Stencil);

            if let Err(source) = result {
                return Err(self.fail(origin, source));
            }

            debug!(
                stencil = self.stencil.name(),
                trait_id = %id,
                index = next,
                "applied trait"
            );
            self.applied.push(id);
            self.state = EngineState::Composing { next: next + 1 };
        } else {
            self.state = EngineState::Composing { next };
        }

        if let EngineState::Composing { next } = self.state
            && next >= self.stencil.traits().len()
        {
            self.state = EngineState::Composed;
        }

        Ok(self.state)
    }

    /// Runs every remaining step and resolves the merged members.
    #[tracing::instrument(skip_all, fields(stencil = %self.stencil.name()))]
    pub fn compose(mut self) -> Result<ComposedClass> {
        while !self.state.is_terminal() {
            self.apply_next()?;
        }
        self.finish()
    }

    /// Validates the merged members of a composed engine.
    pub fn finish(self) -> Result<ComposedClass> {
        if self.state != EngineState::Composed {
            return Err(ForgeError::InvalidState {
                stencil: self.stencil.name().to_string(),
                state: self.state.to_string(),
            });
        }

        let mut init_method = MethodSpec::new(INIT_METHOD_NAME)
            .modifiers(&[Modifier::Private])
            .body(self.init.body().clone());
        for param in self.init.params() {
            init_method = init_method.param(param.clone());
        }
        let reserved = [Contribution {
            member: Member::Method(init_method),
            origin: Origin::Stencil,
        }];

        let package = self.output.package().to_string();
        let simple_name = self.output.simple_name().to_string();
        let base_class = self.output.base_class().to_string();
        let (interfaces, contributions) = self.output.into_parts();

        let resolution =
            CollisionResolver::new(self.stencil.name()).resolve(contributions, &reserved)?;

        debug!(
            stencil = self.stencil.name(),
            members = resolution.members.len(),
            duplicates = resolution.duplicates,
            "composition resolved"
        );

        Ok(ComposedClass {
            stencil: self.stencil.name().to_string(),
            package,
            simple_name,
            source_type: self.source_type,
            base_class,
            interfaces,
            constructors: self.constructors,
            init: self.init,
            members: resolution.members,
            applied: self.applied,
        })
    }

    /// Stencil-level fragments: interfaces and the constructor plan.
    fn prepare(&mut self) -> std::result::Result<(), TraitError> {
        let default_style = match self.stencil.default_style_attr() {
            Some(attr) => Some(self.class_type.require("attr", attr)?),
            None => None,
        };

        for interface in self.stencil.interfaces() {
            self.output.add_interface(interface.clone());
        }

        self.constructors = plan_constructors(self.stencil.constructor_count(), default_style);
        self.state = EngineState::Composing { next: 0 };
        Ok(())
    }

    fn check_contribution(
        &self,
        members_before: usize,
        depth_before: usize,
        unmatched_before: usize,
    ) -> std::result::Result<(), TraitError> {
        for contribution in &self.output.members()[members_before..] {
            let name = contribution.member.name();
            if !is_identifier(name) {
                return Err(TraitError::invalid_identifier(name));
            }
            if let Member::Method(method) = &contribution.member {
                if !method.body.is_balanced() {
                    return Err(TraitError::message(format!(
                        "method '{}' has unbalanced control flow",
                        name
                    )));
                }
                if let Some(param) = method.params.iter().find(|p| !is_identifier(&p.name)) {
                    return Err(TraitError::invalid_identifier(&param.name));
                }
            }
        }

        let body = self.init.body();
        if body.depth() != depth_before || body.unmatched_closes() != unmatched_before {
            return Err(TraitError::unbalanced_control_flow(
                depth_before,
                body.depth(),
            ));
        }
        Ok(())
    }

    fn fail(&mut self, origin: Origin, source: TraitError) -> ForgeError {
        self.state = EngineState::Failed;
        warn!(
            stencil = self.stencil.name(),
            origin = %origin,
            error = %source,
            "stencil generation failed"
        );
        ForgeError::generation_error(self.stencil.name(), origin, source)
    }
}

/// Android view constructors: `(Context)`, `(Context, AttributeSet)` and
/// `(Context, AttributeSet, int)`, each followed by a call to `init`.
fn plan_constructors(count: u8, default_style: Option<String>) -> Vec<ConstructorSpec> {
    let style = default_style.clone().unwrap_or_else(|| "0".to_string());
    let context = Param::new(CONTEXT_TYPE, "context");
    let attrs = Param::new(ATTRIBUTE_SET_TYPE, "attrs").annotated(NULLABLE_ANNOTATION);
    let def_style_attr = Param::new("int", "defStyleAttr");

    let mut constructors = Vec::new();
    for arity in 1..=count.min(3) {
        let spec = match arity {
            1 => ConstructorSpec {
                params: vec![context.clone()],
                super_args: vec!["context".into()],
                init_args: vec!["context".into(), "null".into(), style.clone()],
            },
            2 => {
                let mut super_args = vec!["context".to_string(), "attrs".to_string()];
                if let Some(style) = &default_style {
                    super_args.push(style.clone());
                }
                ConstructorSpec {
                    params: vec![context.clone(), attrs.clone()],
                    super_args,
                    init_args: vec!["context".into(), "attrs".into(), style.clone()],
                }
            }
            _ => ConstructorSpec {
                params: vec![context.clone(), attrs.clone(), def_style_attr.clone()],
                super_args: vec!["context".into(), "attrs".into(), "defStyleAttr".into()],
                init_args: vec!["context".into(), "attrs".into(), "defStyleAttr".into()],
            },
        };
        constructors.push(spec);
    }
    constructors
}

/// Composes a single stencil against `class_type`.
pub fn compose(stencil: ViewStencil, class_type: &ClassType) -> Result<ComposedClass> {
    CompositionEngine::new(stencil, class_type).compose()
}
