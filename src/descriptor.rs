use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Member access level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Visibility {
    /// Display marker. Chosen so that byte order puts public before
    /// protected before private.
    pub fn marker(self) -> &'static str {
        match self {
            Visibility::Public => "  +",
            Visibility::Protected => " #",
            Visibility::Private => "-",
        }
    }
}

/// Build the map key for a member, e.g. `"  + speak"` or `"-::count"`.
pub fn format_signature(visibility: Visibility, is_static: bool, name: &str) -> String {
    let separator = if is_static { "::" } else { " " };
    format!("{}{}{}", visibility.marker(), separator, name)
}

/// Value of a class constant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConstantValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// Initializer that is not a plain literal, kept as source text
    Expression { expr: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberInfo {
    /// Canonical name of the class that declares the member
    pub owner: String,
    /// Raw doc comment, empty when there is none
    pub comment: String,
}

/// Classification flags, one per predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClassFlags {
    pub is_abstract: bool,
    pub is_cloneable: bool,
    pub is_final: bool,
    pub is_instantiable: bool,
    pub is_interface: bool,
    pub is_internal: bool,
    pub is_iterable: bool,
    pub is_trait: bool,
    pub is_user_defined: bool,
}

/// Snapshot of one class. Built once, then shared read-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDescriptor {
    pub name: String,
    pub extends: String,
    pub implements: Vec<String>,
    pub traits: Vec<String>,
    pub constants: BTreeMap<String, ConstantValue>,
    pub properties: BTreeMap<String, MemberInfo>,
    pub methods: BTreeMap<String, MemberInfo>,
    #[serde(flatten)]
    pub flags: ClassFlags,
    pub path: Option<PathBuf>,
}
