use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    static ref IDENTIFIER_RE: Regex = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("regex");
}

const RESERVED_WORDS: &[&str] = &[
    "abstract", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface",
    "long", "native", "new", "package", "private", "protected", "public", "return", "short",
    "static", "super", "switch", "synchronized", "this", "throw", "throws", "try", "void",
    "volatile", "while", "true", "false", "null",
];

/// Returns true if `name` can be used as a member or parameter name in the emitted source.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER_RE.is_match(name) && !RESERVED_WORDS.contains(&name)
}

/// Declaration modifiers, rendered in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Synchronized,
}

impl Modifier {
    pub fn keyword(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Synchronized => "synchronized",
        }
    }
}

fn modifier_prefix(modifiers: &[Modifier]) -> String {
    let mut prefix = String::new();
    for modifier in modifiers {
        prefix.push_str(modifier.keyword());
        prefix.push(' ');
    }
    prefix
}

/// A single formal parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub ty: String,
    pub name: String,
    pub annotations: Vec<String>,
}

impl Param {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
            annotations: Vec::new(),
        }
    }

    pub fn annotated(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    /// Renders `@Ann Type name`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for annotation in &self.annotations {
            out.push('@');
            out.push_str(annotation);
            out.push(' ');
        }
        out.push_str(&self.ty);
        out.push(' ');
        out.push_str(&self.name);
        out
    }
}

/// One line of generated code together with its nesting depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeLine {
    pub depth: usize,
    pub text: String,
}

/// An ordered body of statements with nested control flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBlock {
    lines: Vec<CodeLine>,
    depth: usize,
    unmatched_closes: usize,
}

impl CodeBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a block holding a single statement.
    pub fn statement(code: impl Into<String>) -> Self {
        let mut block = Self::new();
        block.add_statement(code);
        block
    }

    /// Appends `code;` at the current depth.
    pub fn add_statement(&mut self, code: impl Into<String>) -> &mut Self {
        let mut text = code.into();
        text.push(';');
        self.push(text)
    }

    /// Appends a raw line at the current depth.
    pub fn add_line(&mut self, code: impl Into<String>) -> &mut Self {
        self.push(code.into())
    }

    /// Opens `header {` and nests the following lines.
    pub fn begin_control_flow(&mut self, header: impl Into<String>) -> &mut Self {
        let header = header.into();
        self.push(format!("{} {{", header));
        self.depth += 1;
        self
    }

    /// Closes the current block and opens `} header {` at the same depth.
    pub fn next_control_flow(&mut self, header: impl Into<String>) -> &mut Self {
        let header = header.into();
        self.close();
        self.push(format!("}} {} {{", header));
        self.depth += 1;
        self
    }

    /// Closes the innermost open block.
    pub fn end_control_flow(&mut self) -> &mut Self {
        self.close();
        self.push("}".to_string())
    }

    pub fn lines(&self) -> &[CodeLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of blocks currently open.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of closes issued with no block open.
    pub fn unmatched_closes(&self) -> usize {
        self.unmatched_closes
    }

    /// True when every opened block was closed and nothing else was.
    pub fn is_balanced(&self) -> bool {
        self.depth == 0 && self.unmatched_closes == 0
    }

    fn close(&mut self) {
        if self.depth == 0 {
            self.unmatched_closes += 1;
        } else {
            self.depth -= 1;
        }
    }

    fn push(&mut self, text: String) -> &mut Self {
        self.lines.push(CodeLine {
            depth: self.depth,
            text,
        });
        self
    }
}

/// A field declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub ty: String,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<String>,
    pub initializer: Option<String>,
}

impl FieldSpec {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            modifiers: Vec::new(),
            annotations: Vec::new(),
            initializer: None,
        }
    }

    pub fn modifiers(mut self, modifiers: &[Modifier]) -> Self {
        self.modifiers = modifiers.to_vec();
        self
    }

    pub fn annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    pub fn initializer(mut self, initializer: impl Into<String>) -> Self {
        self.initializer = Some(initializer.into());
        self
    }

    /// `private final int count`
    pub fn signature(&self) -> String {
        format!("{}{} {}", modifier_prefix(&self.modifiers), self.ty, self.name)
    }
}

/// A method declaration with its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpec {
    pub name: String,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<String>,
    pub return_type: Option<String>,
    pub params: Vec<Param>,
    pub body: CodeBlock,
    pub doc: Option<String>,
}

impl MethodSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: Vec::new(),
            annotations: Vec::new(),
            return_type: None,
            params: Vec::new(),
            body: CodeBlock::new(),
            doc: None,
        }
    }

    pub fn modifiers(mut self, modifiers: &[Modifier]) -> Self {
        self.modifiers = modifiers.to_vec();
        self
    }

    pub fn annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.return_type = Some(ty.into());
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn body(mut self, body: CodeBlock) -> Self {
        self.body = body;
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Return type, or `void`.
    pub fn return_type_or_void(&self) -> &str {
        self.return_type.as_deref().unwrap_or("void")
    }

    /// `public void setTag(java.lang.String)`; parameter names are not part of it.
    pub fn signature(&self) -> String {
        let types: Vec<&str> = self.params.iter().map(|p| p.ty.as_str()).collect();
        format!(
            "{}{} {}({})",
            modifier_prefix(&self.modifiers),
            self.return_type_or_void(),
            self.name,
            types.join(", ")
        )
    }

    /// `setTag(java.lang.String)`: the part of the signature overloads must differ in.
    pub fn overload_key(&self) -> String {
        let types: Vec<&str> = self.params.iter().map(|p| p.ty.as_str()).collect();
        format!("{}({})", self.name, types.join(", "))
    }
}

/// A constructor planned for the generated class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorSpec {
    pub params: Vec<Param>,
    pub super_args: Vec<String>,
    pub init_args: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MemberKind {
    Field,
    Method,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKind::Field => write!(f, "field"),
            MemberKind::Method => write!(f, "method"),
        }
    }
}

/// A member contributed to the output type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Field(FieldSpec),
    Method(MethodSpec),
}

impl Member {
    pub fn name(&self) -> &str {
        match self {
            Member::Field(field) => &field.name,
            Member::Method(method) => &method.name,
        }
    }

    pub fn kind(&self) -> MemberKind {
        match self {
            Member::Field(_) => MemberKind::Field,
            Member::Method(_) => MemberKind::Method,
        }
    }

    pub fn signature(&self) -> String {
        match self {
            Member::Field(field) => field.signature(),
            Member::Method(method) => method.signature(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("clicks"));
        assert!(is_identifier("_tag$1"));
        assert!(!is_identifier("1tag"));
        assert!(!is_identifier("set-tag"));
        assert!(!is_identifier("class"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_code_block_control_flow() {
        let mut block = CodeBlock::new();
        block
            .begin_control_flow("if (attrs != null)")
            .add_statement("a()")
            .next_control_flow("else")
            .add_statement("b()")
            .end_control_flow();

        let rendered: Vec<(usize, &str)> = block
            .lines()
            .iter()
            .map(|line| (line.depth, line.text.as_str()))
            .collect();
        assert_eq!(
            rendered,
            vec![
                (0, "if (attrs != null) {"),
                (1, "a();"),
                (0, "} else {"),
                (1, "b();"),
                (0, "}"),
            ]
        );
        assert!(block.is_balanced());
    }

    #[test]
    fn test_code_block_unbalanced() {
        let mut open = CodeBlock::new();
        open.begin_control_flow("try");
        assert_eq!(open.depth(), 1);
        assert!(!open.is_balanced());

        let mut stray = CodeBlock::new();
        stray.end_control_flow();
        assert_eq!(stray.unmatched_closes(), 1);
        assert!(!stray.is_balanced());
    }

    #[test]
    fn test_signatures_ignore_param_names() {
        let a = MethodSpec::new("setTypedTag")
            .modifiers(&[Modifier::Public])
            .param(Param::new("java.lang.String", "tag"));
        let b = MethodSpec::new("setTypedTag")
            .modifiers(&[Modifier::Public])
            .param(Param::new("java.lang.String", "value"));
        assert_eq!(a.signature(), b.signature());
        assert_eq!(a.signature(), "public void setTypedTag(java.lang.String)");

        let field = FieldSpec::new("int", "count").modifiers(&[Modifier::Private, Modifier::Final]);
        assert_eq!(field.signature(), "private final int count");
    }

    #[test]
    fn test_overload_key_ignores_return_type_and_modifiers() {
        let a = MethodSpec::new("bind")
            .modifiers(&[Modifier::Public])
            .param(Param::new("int", "id"));
        let b = MethodSpec::new("bind")
            .modifiers(&[Modifier::Private])
            .returns("int")
            .param(Param::new("int", "other"));
        assert_ne!(a.signature(), b.signature());
        assert_eq!(a.overload_key(), b.overload_key());
        assert_eq!(a.overload_key(), "bind(int)");
    }

    #[test]
    fn test_param_render() {
        let param = Param::new("android.util.AttributeSet", "attrs").annotated("Nullable");
        assert_eq!(param.render(), "@Nullable android.util.AttributeSet attrs");
    }
}
