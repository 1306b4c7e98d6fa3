use nom::bytes::complete::{take_while, take_while1};
use nom::character::complete::{char, multispace0};
use nom::combinator::{all_consuming, opt, recognize};
use nom::multi::separated_list1;
use nom::sequence::{delimited, pair};
use nom::IResult;
use std::fmt;
use std::str::FromStr;

use crate::error::{ForgeError, Result};

/// Identity of a trait: its declared name plus generic parameterization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TraitId {
    name: String,
    generics: Vec<String>,
}

impl TraitId {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generics: Vec::new(),
        }
    }

    pub fn with_generics<I, S>(name: impl Into<String>, generics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            generics: generics.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn generics(&self) -> &[String] {
        &self.generics
    }

    /// Parses a reference such as `TypedTagTrait<java.util.List<String>>`.
    pub fn parse(input: &str) -> Result<Self> {
        match all_consuming(delimited(multispace0, type_ref, multispace0))(input) {
            Ok((_, parsed)) => Ok(Self {
                name: parsed.name.to_string(),
                generics: parsed.args.iter().map(TypeRef::render).collect(),
            }),
            Err(_) => Err(ForgeError::config_error(format!(
                "invalid trait reference '{}'",
                input
            ))),
        }
    }
}

impl fmt::Display for TraitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.generics.is_empty() {
            write!(f, "<{}>", self.generics.join(", "))?;
        }
        Ok(())
    }
}

impl FromStr for TraitId {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[derive(Debug)]
struct TypeRef<'a> {
    name: &'a str,
    args: Vec<TypeRef<'a>>,
}

impl TypeRef<'_> {
    fn render(&self) -> String {
        if self.args.is_empty() {
            self.name.to_string()
        } else {
            let args: Vec<String> = self.args.iter().map(TypeRef::render).collect();
            format!("{}<{}>", self.name, args.join(", "))
        }
    }
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_alphabetic() || c == '_' || c == '$'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$'),
    ))(input)
}

fn qualified_name(input: &str) -> IResult<&str, &str> {
    recognize(separated_list1(char('.'), identifier))(input)
}

fn type_args(input: &str) -> IResult<&str, Vec<TypeRef<'_>>> {
    delimited(
        pair(char('<'), multispace0),
        separated_list1(delimited(multispace0, char(','), multispace0), type_ref),
        pair(multispace0, char('>')),
    )(input)
}

fn type_ref(input: &str) -> IResult<&str, TypeRef<'_>> {
    let (input, name) = qualified_name(input)?;
    let (input, args) = opt(type_args)(input)?;
    Ok((
        input,
        TypeRef {
            name,
            args: args.unwrap_or_default(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_name() {
        let id = TraitId::parse("ClickTrait").expect("should parse");
        assert_eq!(id, TraitId::new("ClickTrait"));
        assert!(id.generics().is_empty());
    }

    #[test]
    fn test_parse_generics() {
        let id: TraitId = " TypedTagTrait< java.lang.String > ".parse().expect("should parse");
        assert_eq!(id.name(), "TypedTagTrait");
        assert_eq!(id.generics(), &["java.lang.String".to_string()]);
        assert_eq!(id.to_string(), "TypedTagTrait<java.lang.String>");
    }

    #[test]
    fn test_parse_nested_generics() {
        let id = TraitId::parse("Pair<java.util.List<String>,Integer>").expect("should parse");
        assert_eq!(
            id.generics(),
            &["java.util.List<String>".to_string(), "Integer".to_string()]
        );
        assert_eq!(id.to_string(), "Pair<java.util.List<String>, Integer>");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "1Trait", "Trait<", "Trait<>", "Trait<A,>", "Trait extra", "a..b"] {
            assert!(TraitId::parse(bad).is_err(), "expected '{}' to be rejected", bad);
        }
    }

    #[test]
    fn test_identity_includes_generics() {
        let a = TraitId::with_generics("TypedTagTrait", ["String"]);
        let b = TraitId::with_generics("TypedTagTrait", ["Integer"]);
        assert_ne!(a, b);
        assert_ne!(a, TraitId::new("TypedTagTrait"));
    }
}
