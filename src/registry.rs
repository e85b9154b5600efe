use crate::descriptor::{ConstantValue, Visibility};
use crate::error::InspectError;
use crate::parser::{is_final, ClassInfo, ClassKind, MemberInfo, MemberKind, TsParser};
use crate::provider::{ClassMetadataProvider, MemberMeta};
use anyhow::Result;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Interfaces that make a concrete class iterable.
const ITERATION_INTERFACES: &[&str] = &["Iterable", "IterableIterator", "Iterator"];

/// Every class-like declaration found in a set of TypeScript sources, indexed
/// by qualified name. Serves as the metadata provider for the inspector.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    classes: Vec<ClassInfo>,
    /// Map from qualified name to position in `classes`
    index: HashMap<String, usize>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from parsed declarations. The first declaration of a name wins.
    pub fn from_classes(classes: Vec<ClassInfo>) -> Self {
        let mut registry = Self::new();
        for class in classes {
            registry.register(class);
        }
        registry
    }

    /// Parse in-memory `(path, source)` pairs. Any parse error is returned.
    pub fn from_sources<'a>(sources: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let parser = TsParser::new();
        let mut classes = Vec::new();
        for (path, source) in sources {
            classes.extend(parser.parse_source(Path::new(path), source.to_string())?);
        }
        Ok(Self::from_classes(classes))
    }

    /// Parse files in parallel. Files that fail to read or parse are skipped.
    pub fn load(files: &[PathBuf]) -> Self {
        let parsed: Vec<Vec<ClassInfo>> = files
            .par_iter()
            .map(|path| {
                // Create parser per-thread since SourceMap isn't Sync
                let parser = TsParser::new();
                match parser.parse_file(path) {
                    Ok(classes) => {
                        debug!(path = %path.display(), classes = classes.len(), "parsed source");
                        classes
                    }
                    Err(e) => {
                        warn!("Skipping {}: {:#}", path.display(), e);
                        Vec::new()
                    }
                }
            })
            .collect();

        Self::from_classes(parsed.into_iter().flatten().collect())
    }

    pub fn register(&mut self, class: ClassInfo) {
        if let Some(&existing) = self.index.get(&class.name) {
            warn!(
                "Duplicate declaration of {} in {}, keeping the one from {}",
                class.name,
                class.source_file.display(),
                self.classes[existing].source_file.display()
            );
            return;
        }
        self.index.insert(class.name.clone(), self.classes.len());
        self.classes.push(class);
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Resolve a reference written inside `from`, innermost namespace first.
    fn lookup(&self, from: usize, reference: &str) -> Option<usize> {
        let scope = &self.classes[from].scope;
        (0..=scope.len()).rev().find_map(|depth| {
            let candidate = if depth == 0 {
                reference.to_string()
            } else {
                format!("{}.{}", scope[..depth].join("."), reference)
            };
            self.index.get(&candidate).copied()
        })
    }

    /// Canonical name for a reference, or the reference as written if unknown.
    fn canonical(&self, from: usize, reference: &str) -> (String, Option<usize>) {
        match self.lookup(from, reference) {
            Some(idx) => (self.classes[idx].name.clone(), Some(idx)),
            None => (reference.to_string(), None),
        }
    }

    fn parent_of(&self, idx: usize) -> Option<usize> {
        let class = &self.classes[idx];
        if class.kind != ClassKind::Class {
            return None;
        }
        let parent = self.lookup(idx, class.extends.as_deref()?);
        if parent.is_none() {
            debug!("{}: parent {:?} is not in the registry", class.name, class.extends);
        }
        parent
    }

    /// The class followed by its resolved ancestors, nearest first.
    fn ancestry(&self, idx: usize) -> Vec<usize> {
        let mut chain = vec![idx];
        let mut current = idx;
        while let Some(parent) = self.parent_of(current) {
            if chain.contains(&parent) {
                warn!("Inheritance cycle through {}", self.classes[parent].name);
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Mixins applied at one level, outermost first, including nested applications.
    fn mixins_of(&self, idx: usize) -> Vec<usize> {
        let mut found = Vec::new();
        self.collect_mixins(idx, &mut found);
        found
    }

    fn collect_mixins(&self, idx: usize, found: &mut Vec<usize>) {
        for reference in &self.classes[idx].mixins {
            if let Some(mixin) = self.lookup(idx, reference) {
                if self.classes[mixin].kind == ClassKind::Mixin && !found.contains(&mixin) {
                    found.push(mixin);
                    self.collect_mixins(mixin, found);
                }
            }
        }
    }

    /// Each ancestry level paired with the declarations contributing to it.
    fn levels(&self, idx: usize) -> Vec<(usize, Vec<usize>)> {
        self.ancestry(idx)
            .into_iter()
            .map(|level| {
                let mut sources = vec![level];
                sources.extend(self.mixins_of(level));
                (level, sources)
            })
            .collect()
    }

    /// Implemented interfaces with their extended interfaces, depth first.
    fn interfaces(&self, idx: usize) -> Vec<(String, Option<usize>)> {
        let mut found = Vec::new();
        let mut seen = HashSet::new();
        for (_, sources) in self.levels(idx) {
            for source in sources {
                for reference in &self.classes[source].implements {
                    self.collect_interface(source, reference, &mut seen, &mut found);
                }
            }
        }
        found
    }

    fn collect_interface(
        &self,
        from: usize,
        reference: &str,
        seen: &mut HashSet<String>,
        found: &mut Vec<(String, Option<usize>)>,
    ) {
        let (name, resolved) = self.canonical(from, reference);
        if !seen.insert(name.clone()) {
            return;
        }
        found.push((name, resolved));
        if let Some(iface) = resolved {
            for extended in &self.classes[iface].implements {
                self.collect_interface(iface, extended, seen, found);
            }
        }
    }

    /// Visible members of one kind, nearest declaration first.
    fn members(&self, idx: usize, kind: MemberKind) -> Vec<MemberMeta> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut add = |owner: &str, member: &MemberInfo| {
            if member.kind == kind && seen.insert((member.name.clone(), member.is_static)) {
                out.push(MemberMeta {
                    name: member.name.clone(),
                    visibility: member.visibility,
                    is_static: member.is_static,
                    declaring_class: owner.to_string(),
                    doc_comment: member.comment.clone(),
                });
            }
        };

        for (level, sources) in self.levels(idx) {
            // Mixin members belong to the class that applies them
            let owner = &self.classes[level].name;
            for source in sources {
                for member in &self.classes[source].members {
                    add(owner.as_str(), member);
                }
            }
        }
        for (name, resolved) in self.interfaces(idx) {
            if let Some(iface) = resolved {
                for member in &self.classes[iface].members {
                    add(name.as_str(), member);
                }
            }
        }
        out
    }

    fn find_member(&self, idx: usize, name: &str, kind: MemberKind) -> Option<&MemberInfo> {
        self.levels(idx).into_iter().find_map(|(_, sources)| {
            sources.into_iter().find_map(|source| {
                self.classes[source]
                    .member(name, false)
                    .filter(|m| m.kind == kind)
            })
        })
    }

    fn is_concrete(&self, idx: usize) -> bool {
        let class = &self.classes[idx];
        class.kind == ClassKind::Class && !class.is_abstract
    }
}

impl ClassMetadataProvider for SourceRegistry {
    type Handle = usize;

    fn resolve(&self, name: &str) -> Result<usize, InspectError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| InspectError::not_found(name))
    }

    fn name(&self, class: usize) -> String {
        self.classes[class].name.clone()
    }

    fn parent(&self, class: usize) -> Option<String> {
        let info = &self.classes[class];
        if info.kind != ClassKind::Class {
            return None;
        }
        let reference = info.extends.as_deref()?;
        Some(self.canonical(class, reference).0)
    }

    fn interface_names(&self, class: usize) -> Vec<String> {
        self.interfaces(class).into_iter().map(|(name, _)| name).collect()
    }

    fn trait_names(&self, class: usize) -> Vec<String> {
        self.classes[class]
            .mixins
            .iter()
            .map(|reference| self.canonical(class, reference).0)
            .collect()
    }

    fn constants(&self, class: usize) -> Vec<(String, ConstantValue)> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for (_, sources) in self.levels(class) {
            for source in sources {
                for member in &self.classes[source].members {
                    if let Some(value) = &member.constant {
                        if seen.insert(member.name.clone()) {
                            out.push((member.name.clone(), value.clone()));
                        }
                    }
                }
            }
        }
        out
    }

    fn properties(&self, class: usize) -> Vec<MemberMeta> {
        self.members(class, MemberKind::Property)
    }

    fn methods(&self, class: usize) -> Vec<MemberMeta> {
        self.members(class, MemberKind::Method)
    }

    fn is_abstract(&self, class: usize) -> bool {
        self.classes[class].is_abstract
    }

    fn is_cloneable(&self, class: usize) -> bool {
        self.is_concrete(class)
            && self
                .find_member(class, "clone", MemberKind::Method)
                .map_or(true, |m| m.visibility == Visibility::Public)
    }

    fn is_final(&self, class: usize) -> bool {
        self.classes[class].comment.as_deref().map_or(false, is_final)
    }

    fn is_instantiable(&self, class: usize) -> bool {
        self.is_concrete(class)
            && self
                .find_member(class, "constructor", MemberKind::Method)
                .map_or(true, |m| m.visibility == Visibility::Public)
    }

    fn is_interface(&self, class: usize) -> bool {
        self.classes[class].kind == ClassKind::Interface
    }

    fn is_internal(&self, class: usize) -> bool {
        self.classes[class].is_ambient
    }

    fn is_iterable(&self, class: usize) -> bool {
        if !self.is_concrete(class) {
            return false;
        }
        self.find_member(class, "[Symbol.iterator]", MemberKind::Method).is_some()
            || self.interfaces(class).iter().any(|(name, _)| {
                let short = name.rsplit('.').next().unwrap_or(name);
                ITERATION_INTERFACES.contains(&short)
            })
    }

    fn is_trait(&self, class: usize) -> bool {
        self.classes[class].kind == ClassKind::Mixin
    }

    fn is_user_defined(&self, class: usize) -> bool {
        !self.classes[class].is_ambient
    }

    fn file_name(&self, class: usize) -> Option<PathBuf> {
        let info = &self.classes[class];
        (!info.is_ambient).then(|| info.source_file.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(sources: &[(&str, &str)]) -> SourceRegistry {
        SourceRegistry::from_sources(sources.iter().copied()).unwrap()
    }

    fn handle(registry: &SourceRegistry, name: &str) -> usize {
        registry.resolve(name).unwrap()
    }

    fn member_names(members: &[MemberMeta]) -> Vec<(&str, &str)> {
        members
            .iter()
            .map(|m| (m.name.as_str(), m.declaring_class.as_str()))
            .collect()
    }

    #[test]
    fn test_resolve_unknown_class() {
        let reg = registry(&[("a.ts", "export class A {}")]);
        let err = reg.resolve("B").unwrap_err();
        assert_eq!(err.name(), "B");
    }

    #[test]
    fn test_parent_and_inherited_members() {
        let reg = registry(&[(
            "zoo.ts",
            r#"
export class Animal {
    protected _name: string;
    speak(): string { return ""; }
    move(): void {}
}
export class Dog extends Animal {
    speak(): string { return "woof"; }
}
"#,
        )]);
        let dog = handle(&reg, "Dog");

        assert_eq!(reg.parent(dog), Some("Animal".to_string()));
        assert_eq!(reg.parent(handle(&reg, "Animal")), None);
        assert_eq!(
            member_names(&reg.methods(dog)),
            vec![("speak", "Dog"), ("move", "Animal")]
        );
        assert_eq!(member_names(&reg.properties(dog)), vec![("_name", "Animal")]);
    }

    #[test]
    fn test_unknown_parent_reported_as_written() {
        let reg = registry(&[("a.ts", "export class Widget extends External.Base { run() {} }")]);
        let widget = handle(&reg, "Widget");

        assert_eq!(reg.parent(widget), Some("External.Base".to_string()));
        assert_eq!(reg.methods(widget).len(), 1);
    }

    #[test]
    fn test_namespace_scoped_lookup() {
        let reg = registry(&[(
            "zoo.ts",
            r#"
export class Animal {}
export namespace Zoo {
    export class Animal {}
    export class Cat extends Animal {}
}
export class Stray extends Animal {}
"#,
        )]);

        assert_eq!(reg.parent(handle(&reg, "Zoo.Cat")), Some("Zoo.Animal".to_string()));
        assert_eq!(reg.parent(handle(&reg, "Stray")), Some("Animal".to_string()));
    }

    #[test]
    fn test_interfaces_transitive_without_duplicates() {
        let reg = registry(&[(
            "shapes.ts",
            r#"
interface Named { name: string; }
interface Sized extends Named { size(): number; }
interface Drawable {}
class Base implements Named {}
class Box extends Base implements Sized, Drawable {}
"#,
        )]);
        let b = handle(&reg, "Box");

        assert_eq!(reg.interface_names(b), vec!["Sized", "Named", "Drawable"]);
        assert_eq!(reg.interface_names(handle(&reg, "Sized")), vec!["Named"]);
        assert_eq!(reg.parent(handle(&reg, "Sized")), None);

        // Interface-only members surface with the interface as owner
        assert_eq!(member_names(&reg.methods(b)), vec![("size", "Sized")]);
        assert_eq!(member_names(&reg.properties(b)), vec![("name", "Named")]);
    }

    #[test]
    fn test_mixins_as_traits() {
        let reg = registry(&[(
            "post.ts",
            r#"
type Ctor = new (...args: any[]) => {};
export function Timestamped<T extends Ctor>(Base: T) {
    return class extends Base {
        static readonly EPOCH = 0;
        createdAt = 0;
    };
}
export class Entity { id = 0; }
export class Post extends Timestamped(Entity) {}
"#,
        )]);
        let post = handle(&reg, "Post");

        assert_eq!(reg.trait_names(post), vec!["Timestamped"]);
        assert_eq!(reg.parent(post), Some("Entity".to_string()));
        assert_eq!(
            member_names(&reg.properties(post)),
            vec![("EPOCH", "Post"), ("createdAt", "Post"), ("id", "Entity")]
        );
        assert_eq!(reg.constants(post), vec![("EPOCH".to_string(), ConstantValue::Number(0.0))]);

        let mixin = handle(&reg, "Timestamped");
        assert!(reg.is_trait(mixin));
        assert!(!reg.is_instantiable(mixin));
        assert_eq!(reg.parent(mixin), None);
    }

    #[test]
    fn test_constants_inherited_once() {
        let reg = registry(&[(
            "c.ts",
            r#"
class A { static readonly X = 1; static readonly Y = "a"; }
class B extends A { static readonly X = 2; static readonly Z = true; }
"#,
        )]);
        let constants = reg.constants(handle(&reg, "B"));

        assert_eq!(
            constants,
            vec![
                ("X".to_string(), ConstantValue::Number(2.0)),
                ("Z".to_string(), ConstantValue::Bool(true)),
                ("Y".to_string(), ConstantValue::String("a".into())),
            ]
        );
    }

    #[test]
    fn test_classification_flags() {
        let reg = registry(&[(
            "flags.ts",
            r#"
abstract class Shape {}
/** @sealed */
class Singleton { private constructor() {} }
class Locked { protected clone(): Locked { return this; } }
class Range implements Iterable<number> {}
class Bag { *[Symbol.iterator]() {} }
class Sub extends Bag {}
interface Walker {}
"#,
        )]);
        let flag = |name: &str, f: fn(&SourceRegistry, usize) -> bool| f(&reg, handle(&reg, name));

        assert!(flag("Shape", SourceRegistry::is_abstract));
        assert!(!flag("Shape", SourceRegistry::is_instantiable));
        assert!(!flag("Shape", SourceRegistry::is_cloneable));

        assert!(flag("Singleton", SourceRegistry::is_final));
        assert!(!flag("Singleton", SourceRegistry::is_instantiable));
        assert!(flag("Singleton", SourceRegistry::is_cloneable));

        assert!(flag("Locked", SourceRegistry::is_instantiable));
        assert!(!flag("Locked", SourceRegistry::is_cloneable));
        assert!(!flag("Locked", SourceRegistry::is_final));

        assert!(flag("Range", SourceRegistry::is_iterable));
        assert!(flag("Bag", SourceRegistry::is_iterable));
        assert!(flag("Sub", SourceRegistry::is_iterable));
        assert!(!flag("Locked", SourceRegistry::is_iterable));

        assert!(flag("Walker", SourceRegistry::is_interface));
        assert!(flag("Walker", SourceRegistry::is_abstract));
        assert!(!flag("Walker", SourceRegistry::is_instantiable));
        assert!(flag("Walker", SourceRegistry::is_user_defined));
    }

    #[test]
    fn test_ambient_classes_have_no_path() {
        let reg = registry(&[
            ("lib.d.ts", "export class Buffer {}"),
            ("app.ts", "declare class Global {}\nexport class App {}"),
        ]);

        for name in ["Buffer", "Global"] {
            let class = handle(&reg, name);
            assert!(reg.is_internal(class));
            assert!(!reg.is_user_defined(class));
            assert_eq!(reg.file_name(class), None);
        }
        assert_eq!(reg.file_name(handle(&reg, "App")), Some(PathBuf::from("app.ts")));
    }

    #[test]
    fn test_duplicate_declaration_keeps_first() {
        let reg = registry(&[
            ("first.ts", "export class Thing { a = 1; }"),
            ("second.ts", "export class Thing { b = 2; }"),
        ]);

        assert_eq!(reg.len(), 1);
        assert_eq!(reg.file_name(handle(&reg, "Thing")), Some(PathBuf::from("first.ts")));
    }

    #[test]
    fn test_inheritance_cycle_terminates() {
        let reg = registry(&[("cycle.ts", "class A extends B { a() {} }\nclass B extends A { b() {} }")]);
        let methods = reg.methods(handle(&reg, "A"));
        assert_eq!(member_names(&methods), vec![("a", "A"), ("b", "B")]);
    }

    #[test]
    fn test_load_skips_unparseable_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let good = dir.path().join("good.ts");
        let bad = dir.path().join("bad.ts");
        std::fs::write(&good, "export class Good {}").unwrap();
        std::fs::write(&bad, "export class {").unwrap();

        let reg = SourceRegistry::load(&[bad, good.clone()]);

        assert_eq!(reg.len(), 1);
        assert_eq!(reg.file_name(handle(&reg, "Good")), Some(good));
    }
}
