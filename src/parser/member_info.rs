use crate::descriptor::{ConstantValue, Visibility};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// Fields, parameter properties, accessors and property signatures
    Property,
    /// Methods, method signatures and the constructor
    Method,
}

#[derive(Debug, Clone)]
pub struct MemberInfo {
    pub name: String,
    pub kind: MemberKind,
    pub visibility: Visibility,
    pub is_static: bool,
    pub comment: Option<String>,
    /// Initializer of a `static readonly` field
    pub constant: Option<ConstantValue>,
}
