use super::member_info::MemberInfo;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
    /// Mixin factory: a function returning `class extends Base { ... }`
    Mixin,
}

/// A class-like declaration as written in one source file.
///
/// References (`extends`, `mixins`, `implements`) are kept as written and
/// resolved later against the enclosing `scope`.
#[derive(Debug, Clone)]
pub struct ClassInfo {
    /// Qualified name, e.g. `Zoo.Animal`
    pub name: String,
    /// Enclosing namespaces, outermost first
    pub scope: Vec<String>,
    pub kind: ClassKind,
    pub comment: Option<String>,
    pub extends: Option<String>,
    /// Applied mixins, outermost call first
    pub mixins: Vec<String>,
    /// `implements` for classes, `extends` for interfaces
    pub implements: Vec<String>,
    pub members: Vec<MemberInfo>,
    pub is_abstract: bool,
    /// Declared with `declare` or read from a `.d.ts` file
    pub is_ambient: bool,
    pub source_file: PathBuf,
}

impl ClassInfo {
    pub fn member(&self, name: &str, is_static: bool) -> Option<&MemberInfo> {
        self.members
            .iter()
            .find(|m| m.name == name && m.is_static == is_static)
    }
}
