use crate::descriptor::{ClassDescriptor, ClassFlags, ConstantValue, MemberInfo};
use std::collections::BTreeMap;

/// Plain-text tree of a descriptor, members in signature order.
pub fn render_text(info: &ClassDescriptor) -> String {
    let mut out = String::new();

    let kind = if info.flags.is_interface {
        "interface"
    } else if info.flags.is_trait {
        "mixin"
    } else {
        "class"
    };
    out.push_str(&format!("{} {}", kind, info.name));
    if !info.extends.is_empty() {
        out.push_str(&format!(" extends {}", info.extends));
    }
    out.push('\n');

    push_list(&mut out, "implements", &info.implements);
    push_list(&mut out, "traits", &info.traits);
    out.push_str(&format!("  flags: {}\n", flag_names(&info.flags).join(", ")));
    match &info.path {
        Some(path) => out.push_str(&format!("  path: {}\n", path.display())),
        None => out.push_str("  path: (internal)\n"),
    }

    if !info.constants.is_empty() {
        out.push_str("  constants:\n");
        for (name, value) in &info.constants {
            out.push_str(&format!("    {} = {}\n", name, format_constant(value)));
        }
    }
    push_members(&mut out, "properties", &info.properties);
    push_members(&mut out, "methods", &info.methods);

    out
}

fn push_list(out: &mut String, label: &str, items: &[String]) {
    if !items.is_empty() {
        out.push_str(&format!("  {}: {}\n", label, items.join(", ")));
    }
}

fn push_members(out: &mut String, label: &str, members: &BTreeMap<String, MemberInfo>) {
    if members.is_empty() {
        return;
    }
    out.push_str(&format!("  {}:\n", label));
    for (signature, member) in members {
        out.push_str(&format!("    {}  <{}>\n", signature, member.owner));
    }
}

fn format_constant(value: &ConstantValue) -> String {
    match value {
        ConstantValue::Null => "null".to_string(),
        ConstantValue::Bool(b) => b.to_string(),
        ConstantValue::Number(n) => n.to_string(),
        ConstantValue::String(s) => format!("{:?}", s),
        ConstantValue::Expression { expr } => expr.clone(),
    }
}

fn flag_names(flags: &ClassFlags) -> Vec<&'static str> {
    [
        (flags.is_abstract, "abstract"),
        (flags.is_cloneable, "cloneable"),
        (flags.is_final, "final"),
        (flags.is_instantiable, "instantiable"),
        (flags.is_interface, "interface"),
        (flags.is_internal, "internal"),
        (flags.is_iterable, "iterable"),
        (flags.is_trait, "trait"),
        (flags.is_user_defined, "user-defined"),
    ]
    .into_iter()
    .filter_map(|(set, name)| set.then_some(name))
    .collect()
}
