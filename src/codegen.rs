use crate::compose::ComposedClass;
use crate::model::{
    CodeBlock, ConstructorSpec, Contribution, FieldSpec, InitMethod, Member, MethodSpec, Origin,
    Param,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_HEADER: &str = "Generated code. Do not modify!";

/// Configuration options for source output formatting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerConfig {
    /// Number of spaces per indentation level
    pub indent_size: usize,
    /// Comment placed at the top of every file (one `//` line per text line)
    pub header: Option<String>,
    /// Whether to separate members with a blank line
    pub blank_line_between_members: bool,
    /// Whether to prefix each member with a `// from <origin>` comment
    pub annotate_origins: bool,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            indent_size: 4,
            header: Some(DEFAULT_HEADER.to_string()),
            blank_line_between_members: true,
            annotate_origins: false,
        }
    }
}

impl AssemblerConfig {
    pub fn builder() -> AssemblerConfigBuilder {
        AssemblerConfigBuilder::new()
    }
}

/// Builder pattern for AssemblerConfig
#[derive(Debug, Default)]
pub struct AssemblerConfigBuilder {
    config: AssemblerConfig,
}

impl AssemblerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation width
    pub fn with_indent_size(mut self, size: usize) -> Self {
        self.config.indent_size = size;
        self
    }

    /// Set the file header comment, or `None` for no header
    pub fn with_header(mut self, header: Option<&str>) -> Self {
        self.config.header = header.map(str::to_string);
        self
    }

    /// Enable or disable blank lines between members
    pub fn with_blank_lines(mut self, enabled: bool) -> Self {
        self.config.blank_line_between_members = enabled;
        self
    }

    /// Enable or disable origin comments
    pub fn with_origin_comments(mut self, enabled: bool) -> Self {
        self.config.annotate_origins = enabled;
        self
    }

    pub fn build(self) -> AssemblerConfig {
        self.config
    }
}

/// Line-oriented writer with indentation tracking.
#[derive(Debug)]
pub struct SourceWriter {
    buffer: String,
    indent_level: usize,
    indent_size: usize,
}

impl SourceWriter {
    pub fn new(indent_size: usize) -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
            indent_size,
        }
    }

    /// Writes one indented line. Empty lines carry no trailing whitespace.
    pub fn line(&mut self, text: &str) {
        if !text.is_empty() {
            let spaces = " ".repeat(self.indent_level * self.indent_size);
            self.buffer.push_str(&spaces);
            self.buffer.push_str(text);
        }
        self.buffer.push('\n');
    }

    pub fn blank(&mut self) {
        self.buffer.push('\n');
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// Writes a code block, nesting each line by its depth.
    pub fn code(&mut self, block: &CodeBlock) {
        for line in block.lines() {
            for _ in 0..line.depth {
                self.indent();
            }
            self.line(&line.text);
            for _ in 0..line.depth {
                self.dedent();
            }
        }
    }

    pub fn get_output(&self) -> &str {
        &self.buffer
    }

    pub fn take_output(&mut self) -> String {
        self.indent_level = 0;
        std::mem::take(&mut self.buffer)
    }
}

/// Renders composed classes to source text.
///
/// Output is a pure function of the composed class and the configuration:
/// every collection is rendered in its stored order.
#[derive(Debug, Clone, Default)]
pub struct SourceAssembler {
    config: AssemblerConfig,
}

impl SourceAssembler {
    pub fn new(config: AssemblerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    pub fn assemble(&self, class: &ComposedClass) -> String {
        let mut writer = SourceWriter::new(self.config.indent_size);

        if let Some(header) = &self.config.header {
            for line in header.lines() {
                writer.line(format!("// {}", line).trim_end());
            }
            writer.blank();
        }

        if !class.package.is_empty() {
            writer.line(&format!("package {};", class.package));
            writer.blank();
        }

        let mut declaration = format!(
            "public class {} extends {}",
            class.simple_name, class.base_class
        );
        if !class.interfaces.is_empty() {
            declaration.push_str(" implements ");
            declaration.push_str(&class.interfaces.join(", "));
        }
        declaration.push_str(" {");
        writer.line(&declaration);
        writer.indent();

        let mut first = true;
        let mut separate = |writer: &mut SourceWriter| {
            if !first && self.config.blank_line_between_members {
                writer.blank();
            }
            first = false;
        };

        for contribution in &class.members {
            if let Member::Field(field) = &contribution.member {
                separate(&mut writer);
                self.origin_comment(&mut writer, &contribution.origin);
                self.field(&mut writer, field);
            }
        }

        let calls_init = !class.init.is_empty();
        for constructor in &class.constructors {
            separate(&mut writer);
            self.constructor(&mut writer, &class.simple_name, constructor, calls_init);
        }

        if calls_init {
            separate(&mut writer);
            self.init_method(&mut writer, &class.init);
        }

        for Contribution { member, origin } in &class.members {
            if let Member::Method(method) = member {
                separate(&mut writer);
                self.origin_comment(&mut writer, origin);
                self.method(&mut writer, method);
            }
        }

        writer.dedent();
        writer.line("}");
        writer.take_output()
    }

    fn origin_comment(&self, writer: &mut SourceWriter, origin: &Origin) {
        if self.config.annotate_origins {
            writer.line(&format!("// from {}", origin));
        }
    }

    fn field(&self, writer: &mut SourceWriter, field: &FieldSpec) {
        for annotation in &field.annotations {
            writer.line(&format!("@{}", annotation));
        }
        let mut text = field.signature();
        if let Some(initializer) = &field.initializer {
            text.push_str(" = ");
            text.push_str(initializer);
        }
        text.push(';');
        writer.line(&text);
    }

    fn constructor(
        &self,
        writer: &mut SourceWriter,
        simple_name: &str,
        constructor: &ConstructorSpec,
        calls_init: bool,
    ) {
        writer.line(&format!(
            "public {}({}) {{",
            simple_name,
            render_params(&constructor.params)
        ));
        writer.indent();
        writer.line(&format!("super({});", constructor.super_args.join(", ")));
        if calls_init {
            writer.line(&format!("init({});", constructor.init_args.join(", ")));
        }
        writer.dedent();
        writer.line("}");
    }

    fn init_method(&self, writer: &mut SourceWriter, init: &InitMethod) {
        writer.line(&format!(
            "private void {}({}) {{",
            init.name(),
            render_params(init.params())
        ));
        writer.indent();
        writer.code(init.body());
        writer.dedent();
        writer.line("}");
    }

    fn method(&self, writer: &mut SourceWriter, method: &MethodSpec) {
        if let Some(doc) = &method.doc {
            writer.line("/**");
            for line in doc.lines() {
                writer.line(format!(" * {}", line).trim_end());
            }
            writer.line(" */");
        }
        for annotation in &method.annotations {
            writer.line(&format!("@{}", annotation));
        }

        let mut header = String::new();
        for modifier in &method.modifiers {
            header.push_str(modifier.keyword());
            header.push(' ');
        }
        header.push_str(&format!(
            "{} {}({}) {{",
            method.return_type_or_void(),
            method.name,
            render_params(&method.params)
        ));
        writer.line(&header);
        writer.indent();
        writer.code(&method.body);
        writer.dedent();
        writer.line("}");
    }
}

fn render_params(params: &[Param]) -> String {
    params
        .iter()
        .map(Param::render)
        .collect::<Vec<_>>()
        .join(", ")
}
