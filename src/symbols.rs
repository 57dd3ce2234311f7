use serde::{Deserialize, Serialize};

/// Declared visibility of a function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Internal,
    Protected,
    Private,
}

/// Where a file came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    #[default]
    Kotlin,
    Java,
    Synthetic,
    Binary,
}

impl Origin {
    /// First-party source, as opposed to compiler-synthesized or class-file symbols
    pub fn is_source(self) -> bool {
        matches!(self, Origin::Kotlin | Origin::Java)
    }
}

/// A source file and the declarations directly inside it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub origin: Origin,
    #[serde(default)]
    pub functions: Vec<FunctionDecl>,
    /// Top-level classes, annotation classes included
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
}

impl SourceFile {
    pub fn file_name(&self) -> &str {
        self.path.rsplit(['/', '\\']).next().unwrap_or(&self.path)
    }

    /// File name without its `.kt` / `.java` extension
    pub fn base_name(&self) -> &str {
        let name = self.file_name();
        name.strip_suffix(".kt")
            .or_else(|| name.strip_suffix(".java"))
            .unwrap_or(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    /// Filled from the containing file when left empty
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Compiler-generated, never written by the user
    #[serde(default)]
    pub synthetic: bool,
    /// False when the host could not fully resolve the declaration
    #[serde(default = "default_true")]
    pub valid: bool,
}

fn default_true() -> bool {
    true
}

impl FunctionDecl {
    pub fn qualified_name(&self) -> String {
        qualify(&self.package, &self.name)
    }

    pub fn is_private(&self) -> bool {
        self.visibility == Visibility::Private
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|annotation| annotation.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// Class declaration, as far as annotation processing cares about it.
///
/// For annotation classes `defaults` holds the declared default value of each
/// parameter that has one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDecl {
    /// Qualified name; `None` for local and anonymous declarations
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub defaults: Vec<Argument>,
}

impl ClassDecl {
    pub fn default_for(&self, argument: &str) -> Option<&Value> {
        self.defaults
            .iter()
            .find(|arg| arg.name.as_deref() == Some(argument))
            .map(|arg| &arg.value)
    }
}

/// An annotation use site. `name` is the qualified name of its type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    /// `None` for positional arguments the host could not name
    #[serde(default)]
    pub name: Option<String>,
    pub value: Value,
}

/// Literal value of an annotation argument.
///
/// Equality is structural all the way down, so a list of nested annotations
/// compares equal to another only if every element and every nested argument
/// does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    String(String),
    Type(TypeRef),
    Enum { ty: TypeRef, entry: String },
    List(Vec<Value>),
    Annotation(Annotation),
    /// Numbers, booleans, chars: rendered verbatim
    Literal(String),
}

/// A type reference. An empty `name` marks a type the host failed to resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: String,
    /// `None` entries are star projections
    #[serde(default)]
    pub arguments: Vec<Option<TypeRef>>,
    #[serde(default)]
    pub nullable: bool,
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            nullable: false,
        }
    }

    /// True when this type and all of its type arguments resolved
    pub fn is_resolved(&self) -> bool {
        !self.name.is_empty() && self.arguments.iter().flatten().all(TypeRef::is_resolved)
    }
}

pub fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

/// Package part of a qualified name, empty for root-package names
pub fn package_of(qualified: &str) -> &str {
    qualified.rsplit_once('.').map(|(package, _)| package).unwrap_or("")
}

pub fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", package, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> SourceFile {
        SourceFile {
            path: path.to_string(),
            package: String::new(),
            origin: Origin::Kotlin,
            functions: Vec::new(),
            classes: Vec::new(),
        }
    }

    #[test]
    fn test_base_name_strips_source_extension() {
        assert_eq!(file("src/main/kotlin/Sample.kt").base_name(), "Sample");
        assert_eq!(file("src/main/java/Legacy.java").base_name(), "Legacy");
        assert_eq!(file("C:\\work\\Win.kt").base_name(), "Win");
        assert_eq!(file("Script.kts").base_name(), "Script.kts");
    }

    #[test]
    fn test_unresolved_type_argument_makes_type_unresolved() {
        let mut list = TypeRef::new("kotlin.collections.List");
        assert!(list.is_resolved());
        list.arguments.push(Some(TypeRef::new("")));
        assert!(!list.is_resolved());
    }

    #[test]
    fn test_nested_values_compare_structurally() {
        let nested = |x: &str| {
            Value::List(vec![Value::Annotation(Annotation {
                name: "a.Device".to_string(),
                arguments: vec![Argument {
                    name: Some("spec".to_string()),
                    value: Value::String(x.to_string()),
                }],
            })])
        };
        assert_eq!(nested("phone"), nested("phone"));
        assert_ne!(nested("phone"), nested("tablet"));
        assert_ne!(Value::String("1".into()), Value::Literal("1".into()));
    }

    #[test]
    fn test_value_json_shape() {
        let value: Value =
            serde_json::from_str(r#"{"type": {"name": "com.example.FooProvider"}}"#).unwrap();
        assert_eq!(value, Value::Type(TypeRef::new("com.example.FooProvider")));

        let value: Value =
            serde_json::from_str(r#"{"enum": {"ty": {"name": "a.Mode"}, "entry": "DARK"}}"#).unwrap();
        assert!(matches!(value, Value::Enum { ref entry, .. } if entry == "DARK"));
    }

    #[test]
    fn test_qualify() {
        assert_eq!(qualify("", "Sample"), "Sample");
        assert_eq!(qualify("com.example", "Sample"), "com.example.Sample");
        assert_eq!(package_of("com.example.Sample"), "com.example");
        assert_eq!(package_of("Sample"), "");
    }
}
