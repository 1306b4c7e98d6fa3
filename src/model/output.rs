use super::members::{CodeBlock, CodeLine, FieldSpec, Member, MemberKind, MethodSpec, Param};
use crate::traits::TraitId;
use std::fmt;

pub const INIT_METHOD_NAME: &str = "init";
pub const CONTEXT_TYPE: &str = "android.content.Context";
pub const ATTRIBUTE_SET_TYPE: &str = "android.util.AttributeSet";
pub const NULLABLE_ANNOTATION: &str = "androidx.annotation.Nullable";

/// Who contributed a member or statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Origin {
    /// The stencil itself (constructors, the reserved init method).
    Stencil,
    Trait(TraitId),
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Stencil => write!(f, "stencil"),
            Origin::Trait(id) => write!(f, "trait {}", id),
        }
    }
}

/// A member together with the origin that added it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    pub member: Member,
    pub origin: Origin,
}

/// The class under construction.
///
/// Traits may only append to it. The engine stamps every appended member with
/// the origin of the trait currently running.
#[derive(Debug, Clone)]
pub struct OutputType {
    package: String,
    simple_name: String,
    base_class: String,
    interfaces: Vec<String>,
    members: Vec<Contribution>,
    current: Origin,
}

impl OutputType {
    pub fn new(
        package: impl Into<String>,
        simple_name: impl Into<String>,
        base_class: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            simple_name: simple_name.into(),
            base_class: base_class.into(),
            interfaces: Vec::new(),
            members: Vec::new(),
            current: Origin::Stencil,
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    pub fn base_class(&self) -> &str {
        &self.base_class
    }

    /// `package.SimpleName`, or just the simple name in the default package.
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.simple_name.clone()
        } else {
            format!("{}.{}", self.package, self.simple_name)
        }
    }

    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    pub fn members(&self) -> &[Contribution] {
        &self.members
    }

    pub fn add_field(&mut self, field: FieldSpec) -> &mut Self {
        self.push(Member::Field(field))
    }

    pub fn add_method(&mut self, method: MethodSpec) -> &mut Self {
        self.push(Member::Method(method))
    }

    /// Adds an implemented interface; repeated interfaces are kept once.
    pub fn add_interface(&mut self, interface: impl Into<String>) -> &mut Self {
        let interface = interface.into();
        if !self.interfaces.contains(&interface) {
            self.interfaces.push(interface);
        }
        self
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.has_member(MemberKind::Field, name)
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.has_member(MemberKind::Method, name)
    }

    fn has_member(&self, kind: MemberKind, name: &str) -> bool {
        self.members
            .iter()
            .any(|c| c.member.kind() == kind && c.member.name() == name)
    }

    pub(crate) fn set_origin(&mut self, origin: Origin) {
        self.current = origin;
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<Contribution>) {
        (self.interfaces, self.members)
    }

    fn push(&mut self, member: Member) -> &mut Self {
        self.members.push(Contribution {
            member,
            origin: self.current.clone(),
        });
        self
    }
}

/// The generated `init(Context, AttributeSet, int)` body.
///
/// Statement order is append order; every line keeps its origin.
#[derive(Debug, Clone)]
pub struct InitMethod {
    params: Vec<Param>,
    body: CodeBlock,
    origins: Vec<Origin>,
    current: Origin,
}

impl Default for InitMethod {
    fn default() -> Self {
        Self::new()
    }
}

impl InitMethod {
    pub fn new() -> Self {
        Self {
            params: vec![
                Param::new(CONTEXT_TYPE, "context"),
                Param::new(ATTRIBUTE_SET_TYPE, "attrs").annotated(NULLABLE_ANNOTATION),
                Param::new("int", "defStyleAttr"),
            ],
            body: CodeBlock::new(),
            origins: Vec::new(),
            current: Origin::Stencil,
        }
    }

    pub fn name(&self) -> &str {
        INIT_METHOD_NAME
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn body(&self) -> &CodeBlock {
        &self.body
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Lines paired with their origin, in append order.
    pub fn statements(&self) -> impl Iterator<Item = (&CodeLine, &Origin)> {
        self.body.lines().iter().zip(self.origins.iter())
    }

    pub fn add_statement(&mut self, code: impl Into<String>) -> &mut Self {
        self.body.add_statement(code);
        self.stamp()
    }

    pub fn add_line(&mut self, code: impl Into<String>) -> &mut Self {
        self.body.add_line(code);
        self.stamp()
    }

    pub fn begin_control_flow(&mut self, header: impl Into<String>) -> &mut Self {
        self.body.begin_control_flow(header);
        self.stamp()
    }

    pub fn next_control_flow(&mut self, header: impl Into<String>) -> &mut Self {
        self.body.next_control_flow(header);
        self.stamp()
    }

    pub fn end_control_flow(&mut self) -> &mut Self {
        self.body.end_control_flow();
        self.stamp()
    }

    pub(crate) fn set_origin(&mut self, origin: Origin) {
        self.current = origin;
    }

    fn stamp(&mut self) -> &mut Self {
        while self.origins.len() < self.body.len() {
            self.origins.push(self.current.clone());
        }
        self
    }
}
