/// Fragment model shared by traits, the composition engine and the assembler.
pub mod class_type;
pub mod members;
pub mod output;

pub use class_type::ClassType;
pub use members::{
    is_identifier, CodeBlock, CodeLine, ConstructorSpec, FieldSpec, Member, MemberKind,
    MethodSpec, Modifier, Param,
};
pub use output::{
    Contribution, InitMethod, Origin, OutputType, ATTRIBUTE_SET_TYPE, CONTEXT_TYPE,
    INIT_METHOD_NAME, NULLABLE_ANNOTATION,
};
