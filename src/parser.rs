mod class_info;
mod jsdoc;
mod member_info;

pub use class_info::{ClassInfo, ClassKind};
pub use jsdoc::is_final;
pub use member_info::{MemberInfo, MemberKind};

use crate::descriptor::{ConstantValue, Visibility};
use anyhow::Result;
use std::path::Path;
use swc_common::comments::{Comments, SingleThreadedComments};
use swc_common::{sync::Lrc, BytePos, FileName, SourceMap, SourceMapper, Span, Spanned};
use swc_ecma_ast::*;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

pub struct TsParser {
    source_map: Lrc<SourceMap>,
}

impl TsParser {
    pub fn new() -> Self {
        Self {
            source_map: Default::default(),
        }
    }

    pub fn parse_file(&self, path: &Path) -> Result<Vec<ClassInfo>> {
        let content = std::fs::read_to_string(path)?;
        self.parse_source(path, content)
    }

    /// Extract every class, interface and mixin factory from `content`.
    /// `path` is recorded as the source file and decides `.tsx`/`.d.ts` syntax.
    pub fn parse_source(&self, path: &Path, content: String) -> Result<Vec<ClassInfo>> {
        let is_declaration = is_declaration_file(path);
        let fm = self
            .source_map
            .new_source_file(FileName::Real(path.to_path_buf()).into(), content);
        let comments = SingleThreadedComments::default();

        let mut parser = Parser::new(
            Syntax::Typescript(TsSyntax {
                tsx: path.extension().map_or(false, |ext| ext == "tsx"),
                decorators: true,
                dts: is_declaration,
                ..Default::default()
            }),
            StringInput::from(&*fm),
            Some(&comments),
        );

        let module = parser
            .parse_module()
            .map_err(|e| anyhow::anyhow!("Parse error in {}: {:?}", path.display(), e))?;

        let mut extractor = Extractor {
            source_map: &self.source_map,
            comments: &comments,
            path,
            classes: Vec::new(),
        };
        extractor.visit_items(&module.body, &[], is_declaration);

        Ok(extractor.classes)
    }
}

impl Default for TsParser {
    fn default() -> Self {
        Self::new()
    }
}

pub fn is_declaration_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map_or(false, |n| n.ends_with(".d.ts"))
}

struct Extractor<'a> {
    source_map: &'a SourceMap,
    comments: &'a SingleThreadedComments,
    path: &'a Path,
    classes: Vec<ClassInfo>,
}

impl Extractor<'_> {
    fn visit_items(&mut self, items: &[ModuleItem], scope: &[String], ambient: bool) {
        for item in items {
            match item {
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                    self.visit_decl(&export.decl, Some(export.span.lo), scope, ambient);
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => {
                    self.visit_default_decl(&export.decl, export.span.lo, scope, ambient);
                }
                ModuleItem::Stmt(Stmt::Decl(decl)) => {
                    self.visit_decl(decl, None, scope, ambient);
                }
                _ => {}
            }
        }
    }

    fn visit_decl(&mut self, decl: &Decl, outer: Option<BytePos>, scope: &[String], ambient: bool) {
        match decl {
            Decl::Class(class_decl) => {
                let doc = self.doc_before(outer, class_decl.class.span.lo);
                self.push_class(
                    &class_decl.ident.sym,
                    &class_decl.class,
                    ClassKind::Class,
                    doc,
                    scope,
                    ambient || class_decl.declare,
                );
            }
            Decl::TsInterface(iface) => {
                self.push_interface(iface, outer, scope, ambient || iface.declare);
            }
            Decl::TsModule(module) => self.visit_module(module, scope, ambient),
            Decl::Fn(fn_decl) => {
                if let Some(class) = mixin_body(&fn_decl.function) {
                    let doc = self.doc_before(outer, fn_decl.function.span.lo);
                    self.push_class(&fn_decl.ident.sym, class, ClassKind::Mixin, doc, scope, ambient);
                }
            }
            Decl::Var(var) => {
                for declarator in &var.decls {
                    let (Pat::Ident(binding), Some(init)) = (&declarator.name, &declarator.init) else {
                        continue;
                    };
                    if let Some(class) = mixin_expr(init) {
                        let doc = self.doc_before(outer, var.span.lo);
                        self.push_class(&binding.id.sym, class, ClassKind::Mixin, doc, scope, ambient);
                    }
                }
            }
            _ => {}
        }
    }

    fn visit_default_decl(&mut self, decl: &DefaultDecl, outer: BytePos, scope: &[String], ambient: bool) {
        match decl {
            DefaultDecl::Class(class_expr) => {
                // Anonymous default classes cannot be looked up by name
                if let Some(ident) = &class_expr.ident {
                    let doc = self.doc_before(Some(outer), class_expr.class.span.lo);
                    self.push_class(&ident.sym, &class_expr.class, ClassKind::Class, doc, scope, ambient);
                }
            }
            DefaultDecl::TsInterfaceDecl(iface) => {
                self.push_interface(iface, Some(outer), scope, ambient);
            }
            DefaultDecl::Fn(fn_expr) => {
                if let (Some(ident), Some(class)) = (&fn_expr.ident, mixin_body(&fn_expr.function)) {
                    let doc = self.doc_before(Some(outer), fn_expr.function.span.lo);
                    self.push_class(&ident.sym, class, ClassKind::Mixin, doc, scope, ambient);
                }
            }
        }
    }

    fn visit_module(&mut self, module: &TsModuleDecl, scope: &[String], ambient: bool) {
        let mut inner = scope.to_vec();
        // `declare module "pkg"` and `declare global` add no qualifier
        if let TsModuleName::Ident(ident) = &module.id {
            if !module.global {
                inner.push(ident.sym.to_string());
            }
        }
        if let Some(body) = &module.body {
            self.visit_namespace_body(body, inner, ambient || module.declare);
        }
    }

    fn visit_namespace_body(&mut self, body: &TsNamespaceBody, scope: Vec<String>, ambient: bool) {
        match body {
            TsNamespaceBody::TsModuleBlock(block) => self.visit_items(&block.body, &scope, ambient),
            TsNamespaceBody::TsNamespaceDecl(ns) => {
                let mut scope = scope;
                scope.push(ns.id.sym.to_string());
                self.visit_namespace_body(&ns.body, scope, ambient || ns.declare);
            }
        }
    }

    fn push_class(
        &mut self,
        name: &str,
        class: &Class,
        kind: ClassKind,
        comment: Option<String>,
        scope: &[String],
        ambient: bool,
    ) {
        let (extends, mixins) = match &class.super_class {
            Some(super_class) => split_heritage(super_class),
            None => (None, Vec::new()),
        };
        // A mixin's base is its constructor parameter, not a class
        let extends = if kind == ClassKind::Mixin { None } else { extends };

        let implements = class
            .implements
            .iter()
            .filter_map(|clause| qualified_name(&clause.expr))
            .collect();

        let mut members = Vec::new();
        for member in &class.body {
            self.extract_class_member(member, &mut members);
        }

        self.classes.push(ClassInfo {
            name: qualify(scope, name),
            scope: scope.to_vec(),
            kind,
            comment,
            extends,
            mixins,
            implements,
            members,
            is_abstract: class.is_abstract,
            is_ambient: ambient,
            source_file: self.path.to_path_buf(),
        });
    }

    fn push_interface(
        &mut self,
        iface: &TsInterfaceDecl,
        outer: Option<BytePos>,
        scope: &[String],
        ambient: bool,
    ) {
        let comment = self.doc_before(outer, iface.span.lo);
        let implements = iface
            .extends
            .iter()
            .filter_map(|clause| qualified_name(&clause.expr))
            .collect();

        let mut members = Vec::new();
        for element in &iface.body.body {
            let (key, computed, kind, span) = match element {
                TsTypeElement::TsPropertySignature(p) => {
                    (&p.key, p.computed, MemberKind::Property, p.span)
                }
                TsTypeElement::TsMethodSignature(m) => {
                    (&m.key, m.computed, MemberKind::Method, m.span)
                }
                TsTypeElement::TsGetterSignature(g) => {
                    (&g.key, g.computed, MemberKind::Property, g.span)
                }
                TsTypeElement::TsSetterSignature(s) => {
                    (&s.key, s.computed, MemberKind::Property, s.span)
                }
                _ => continue,
            };
            let name = self.expr_key(key, computed);
            push_member(
                &mut members,
                self.member(&name, kind, Visibility::Public, false, span),
            );
        }

        self.classes.push(ClassInfo {
            name: qualify(scope, &iface.id.sym),
            scope: scope.to_vec(),
            kind: ClassKind::Interface,
            comment,
            extends: None,
            mixins: Vec::new(),
            implements,
            members,
            is_abstract: true,
            is_ambient: ambient,
            source_file: self.path.to_path_buf(),
        });
    }

    fn extract_class_member(&self, member: &ClassMember, out: &mut Vec<MemberInfo>) {
        match member {
            ClassMember::Constructor(ctor) => {
                push_member(
                    out,
                    self.member(
                        "constructor",
                        MemberKind::Method,
                        visibility(ctor.accessibility),
                        false,
                        ctor.span,
                    ),
                );
                // `constructor(private name: string)` declares a property
                for param in &ctor.params {
                    if let ParamOrTsParamProp::TsParamProp(prop) = param {
                        if let Some(name) = param_prop_name(prop) {
                            push_member(
                                out,
                                self.member(
                                    &name,
                                    MemberKind::Property,
                                    visibility(prop.accessibility),
                                    false,
                                    prop.span,
                                ),
                            );
                        }
                    }
                }
            }
            ClassMember::Method(method) => {
                let kind = match method.kind {
                    MethodKind::Method => MemberKind::Method,
                    MethodKind::Getter | MethodKind::Setter => MemberKind::Property,
                };
                push_member(
                    out,
                    self.member(
                        &self.prop_name(&method.key),
                        kind,
                        visibility(method.accessibility),
                        method.is_static,
                        method.span,
                    ),
                );
            }
            ClassMember::PrivateMethod(method) => {
                let kind = match method.kind {
                    MethodKind::Method => MemberKind::Method,
                    MethodKind::Getter | MethodKind::Setter => MemberKind::Property,
                };
                push_member(
                    out,
                    self.member(
                        &format!("#{}", method.key.name),
                        kind,
                        Visibility::Private,
                        method.is_static,
                        method.span,
                    ),
                );
            }
            ClassMember::ClassProp(prop) => {
                let mut info = self.member(
                    &self.prop_name(&prop.key),
                    MemberKind::Property,
                    visibility(prop.accessibility),
                    prop.is_static,
                    prop.span,
                );
                if prop.is_static && prop.readonly {
                    info.constant = prop.value.as_deref().map(|v| self.constant_value(v));
                }
                push_member(out, info);
            }
            ClassMember::PrivateProp(prop) => {
                let mut info = self.member(
                    &format!("#{}", prop.key.name),
                    MemberKind::Property,
                    Visibility::Private,
                    prop.is_static,
                    prop.span,
                );
                if prop.is_static && prop.readonly {
                    info.constant = prop.value.as_deref().map(|v| self.constant_value(v));
                }
                push_member(out, info);
            }
            _ => {}
        }
    }

    fn member(
        &self,
        name: &str,
        kind: MemberKind,
        visibility: Visibility,
        is_static: bool,
        span: Span,
    ) -> MemberInfo {
        MemberInfo {
            name: name.to_string(),
            kind,
            visibility,
            is_static,
            comment: self.doc_at(span.lo),
            constant: None,
        }
    }

    fn doc_at(&self, pos: BytePos) -> Option<String> {
        // Line comments between the doc block and the declaration are skipped
        self.comments
            .get_leading(pos)?
            .iter()
            .rev()
            .find_map(jsdoc::doc_text)
    }

    /// Doc comment ahead of `export` if there is one, else ahead of the declaration.
    fn doc_before(&self, outer: Option<BytePos>, inner: BytePos) -> Option<String> {
        outer
            .into_iter()
            .chain(std::iter::once(inner))
            .find_map(|pos| self.doc_at(pos))
    }

    fn prop_name(&self, key: &PropName) -> String {
        match key {
            PropName::Ident(ident) => ident.sym.to_string(),
            PropName::Str(s) => str_value(s),
            PropName::Num(n) => n.value.to_string(),
            PropName::Computed(computed) => format!(
                "[{}]",
                qualified_name(&computed.expr).unwrap_or_else(|| self.snippet(computed.expr.span()))
            ),
            PropName::BigInt(b) => self.snippet(b.span),
        }
    }

    fn expr_key(&self, key: &Expr, computed: bool) -> String {
        match key {
            Expr::Ident(ident) if !computed => ident.sym.to_string(),
            Expr::Lit(Lit::Str(s)) if !computed => str_value(s),
            Expr::Lit(Lit::Num(n)) if !computed => n.value.to_string(),
            _ => {
                let inner = qualified_name(key).unwrap_or_else(|| self.snippet(key.span()));
                if computed {
                    format!("[{}]", inner)
                } else {
                    inner
                }
            }
        }
    }

    fn constant_value(&self, expr: &Expr) -> ConstantValue {
        match expr {
            Expr::Lit(Lit::Str(s)) => ConstantValue::String(str_value(s)),
            Expr::Lit(Lit::Num(n)) => ConstantValue::Number(n.value),
            Expr::Lit(Lit::Bool(b)) => ConstantValue::Bool(b.value),
            Expr::Lit(Lit::Null(_)) => ConstantValue::Null,
            Expr::Unary(unary) if unary.op == UnaryOp::Minus => match &*unary.arg {
                Expr::Lit(Lit::Num(n)) => ConstantValue::Number(-n.value),
                _ => self.expression(expr),
            },
            Expr::Paren(paren) => self.constant_value(&paren.expr),
            // `as const` and friends do not change the value
            Expr::TsAs(as_expr) => self.constant_value(&as_expr.expr),
            Expr::TsConstAssertion(assertion) => self.constant_value(&assertion.expr),
            _ => self.expression(expr),
        }
    }

    fn expression(&self, expr: &Expr) -> ConstantValue {
        ConstantValue::Expression {
            expr: self.snippet(expr.span()),
        }
    }

    fn snippet(&self, span: Span) -> String {
        self.source_map.span_to_snippet(span).unwrap_or_default()
    }
}

/// Getter/setter pairs and overload signatures collapse to the first declaration.
fn push_member(out: &mut Vec<MemberInfo>, member: MemberInfo) {
    let exists = out
        .iter()
        .any(|m| m.name == member.name && m.is_static == member.is_static && m.kind == member.kind);
    if !exists {
        out.push(member);
    }
}

fn visibility(accessibility: Option<Accessibility>) -> Visibility {
    match accessibility {
        Some(Accessibility::Protected) => Visibility::Protected,
        Some(Accessibility::Private) => Visibility::Private,
        _ => Visibility::Public,
    }
}

fn qualify(scope: &[String], name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope.join("."), name)
    }
}

/// Cooked value of a string literal; lone surrogates become U+FFFD.
fn str_value(s: &Str) -> String {
    match s.value.as_str() {
        Some(value) => value.to_string(),
        None => s.value.to_string_lossy().to_string(),
    }
}

fn param_prop_name(prop: &TsParamProp) -> Option<String> {
    match &prop.param {
        TsParamPropParam::Ident(binding) => Some(binding.id.sym.to_string()),
        TsParamPropParam::Assign(assign) => match &*assign.left {
            Pat::Ident(binding) => Some(binding.id.sym.to_string()),
            _ => None,
        },
    }
}

/// Dotted name of an identifier or member chain, e.g. `Zoo.Animal`.
fn qualified_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::Member(member) => match &member.prop {
            MemberProp::Ident(prop) => Some(format!("{}.{}", qualified_name(&member.obj)?, prop.sym)),
            _ => None,
        },
        Expr::Paren(paren) => qualified_name(&paren.expr),
        _ => None,
    }
}

/// Split `A(B(Base))` into the base `Base` and the mixins `[A, B]`.
fn split_heritage(expr: &Expr) -> (Option<String>, Vec<String>) {
    match expr {
        Expr::Call(call) => {
            let mixin = match &call.callee {
                Callee::Expr(callee) => qualified_name(callee),
                _ => None,
            };
            let Some(mixin) = mixin else {
                return (None, Vec::new());
            };
            let (base, mut mixins) = call
                .args
                .first()
                .map(|arg| split_heritage(&arg.expr))
                .unwrap_or_default();
            mixins.insert(0, mixin);
            (base, mixins)
        }
        Expr::Paren(paren) => split_heritage(&paren.expr),
        _ => (qualified_name(expr), Vec::new()),
    }
}

fn class_expr(expr: &Expr) -> Option<&Class> {
    match expr {
        Expr::Class(class) => Some(&*class.class),
        Expr::Paren(paren) => class_expr(&paren.expr),
        _ => None,
    }
}

fn returned_class(stmts: &[Stmt]) -> Option<&Class> {
    stmts.iter().find_map(|stmt| match stmt {
        Stmt::Return(ReturnStmt { arg: Some(arg), .. }) => class_expr(arg),
        _ => None,
    })
}

fn mixin_body(function: &Function) -> Option<&Class> {
    returned_class(&function.body.as_ref()?.stmts)
}

fn mixin_expr(expr: &Expr) -> Option<&Class> {
    match expr {
        Expr::Arrow(arrow) => match &*arrow.body {
            BlockStmtOrExpr::Expr(body) => class_expr(body),
            BlockStmtOrExpr::BlockStmt(block) => returned_class(&block.stmts),
        },
        Expr::Fn(fn_expr) => mixin_body(&fn_expr.function),
        Expr::Paren(paren) => mixin_expr(&paren.expr),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(path: &str, code: &str) -> Vec<ClassInfo> {
        TsParser::new()
            .parse_source(Path::new(path), code.to_string())
            .unwrap()
    }

    #[test]
    fn test_parse_members_and_visibility() {
        let ts_code = r#"
export class Animal {
    /** The display name. */
    protected _name: string;
    private static count = 0;
    public speak(): string { return ""; }
    get label(): string { return this._name; }
    set label(v: string) { this._name = v; }
    #secret = 1;
}
"#;
        let classes = parse("animal.ts", ts_code);

        assert_eq!(classes.len(), 1);
        let animal = &classes[0];
        assert_eq!(animal.name, "Animal");
        assert_eq!(animal.kind, ClassKind::Class);
        assert_eq!(animal.members.len(), 5);

        let name = animal.member("_name", false).unwrap();
        assert_eq!(name.visibility, Visibility::Protected);
        assert_eq!(name.comment.as_deref(), Some("/** The display name. */"));

        let count = animal.member("count", true).unwrap();
        assert_eq!(count.visibility, Visibility::Private);
        assert!(count.constant.is_none());

        let speak = animal.member("speak", false).unwrap();
        assert_eq!(speak.kind, MemberKind::Method);
        assert_eq!(speak.visibility, Visibility::Public);
        assert!(speak.comment.is_none());

        assert_eq!(animal.member("label", false).unwrap().kind, MemberKind::Property);
        assert_eq!(animal.member("#secret", false).unwrap().visibility, Visibility::Private);
    }

    #[test]
    fn test_parse_class_doc_and_heritage() {
        let ts_code = r#"
interface Named {}

/**
 * A dog.
 * @final
 */
export class Dog extends Animal implements Named, Zoo.Resident {}
"#;
        let classes = parse("dog.ts", ts_code);

        assert_eq!(classes.len(), 2);
        let dog = &classes[1];
        assert_eq!(dog.extends.as_deref(), Some("Animal"));
        assert_eq!(dog.implements, vec!["Named", "Zoo.Resident"]);
        assert!(is_final(dog.comment.as_deref().unwrap()));
        assert_eq!(dog.source_file, Path::new("dog.ts"));
    }

    #[test]
    fn test_parse_constructor_parameter_properties() {
        let ts_code = r#"
export class Point {
    protected constructor(public readonly x: number, private y = 0, z: number) {}
}
"#;
        let classes = parse("point.ts", ts_code);
        let point = &classes[0];

        let ctor = point.member("constructor", false).unwrap();
        assert_eq!(ctor.visibility, Visibility::Protected);
        assert_eq!(ctor.kind, MemberKind::Method);

        let x = point.member("x", false).unwrap();
        assert_eq!(x.visibility, Visibility::Public);
        assert_eq!(point.member("y", false).unwrap().visibility, Visibility::Private);
        assert!(point.member("z", false).is_none());
    }

    #[test]
    fn test_parse_static_readonly_constants() {
        let ts_code = r#"
export class Limits {
    static readonly MAX = 10;
    static readonly MIN = -1;
    static readonly NAME = "limits";
    static readonly ON = true;
    static readonly NONE = null;
    static readonly DERIVED = Limits.MAX * 2;
    readonly instanceOnly = 3;
}
"#;
        let classes = parse("limits.ts", ts_code);
        let limits = &classes[0];
        let constant = |name: &str| limits.member(name, true).and_then(|m| m.constant.clone());

        assert_eq!(constant("MAX"), Some(ConstantValue::Number(10.0)));
        assert_eq!(constant("MIN"), Some(ConstantValue::Number(-1.0)));
        assert_eq!(constant("NAME"), Some(ConstantValue::String("limits".into())));
        assert_eq!(constant("ON"), Some(ConstantValue::Bool(true)));
        assert_eq!(constant("NONE"), Some(ConstantValue::Null));
        assert_eq!(
            constant("DERIVED"),
            Some(ConstantValue::Expression {
                expr: "Limits.MAX * 2".into()
            })
        );
        assert!(limits.member("instanceOnly", false).unwrap().constant.is_none());
    }

    #[test]
    fn test_parse_quoted_strings_keep_their_quotes() {
        let ts_code = r#"
export class Quotes {
    static readonly QUOTE = 'say "hi"';
    static readonly ONLY_QUOTE = '"';
    static readonly BACKSLASH = "a\\b";
    static readonly ESCAPED = "tab\there";
    "my-key": number;
    'say "x"'(): void {}
}

export interface Keyed {
    '"quoted"': string;
}
"#;
        let classes = parse("quotes.ts", ts_code);
        let quotes = &classes[0];
        let constant = |name: &str| quotes.member(name, true).and_then(|m| m.constant.clone());

        assert_eq!(constant("QUOTE"), Some(ConstantValue::String("say \"hi\"".into())));
        assert_eq!(constant("ONLY_QUOTE"), Some(ConstantValue::String("\"".into())));
        assert_eq!(constant("BACKSLASH"), Some(ConstantValue::String("a\\b".into())));
        assert_eq!(constant("ESCAPED"), Some(ConstantValue::String("tab\there".into())));

        assert_eq!(quotes.member("my-key", false).unwrap().kind, MemberKind::Property);
        assert_eq!(quotes.member("say \"x\"", false).unwrap().kind, MemberKind::Method);
        assert!(classes[1].member("\"quoted\"", false).is_some());
    }

    #[test]
    fn test_parse_doc_comment_before_line_comment() {
        let ts_code = r#"
export class Notes {
    /** Doc for z. */
    // note
    z = 1;

    // plain line comment only
    w = 2;
}
"#;
        let classes = parse("notes.ts", ts_code);
        let notes = &classes[0];

        assert_eq!(
            notes.member("z", false).unwrap().comment.as_deref(),
            Some("/** Doc for z. */")
        );
        assert_eq!(notes.member("w", false).unwrap().comment, None);
    }

    #[test]
    fn test_parse_interfaces() {
        let ts_code = r#"
export interface Shape extends Named, Sized {
    readonly area: number;
    draw(): void;
    [Symbol.iterator](): Iterator<number>;
}
"#;
        let classes = parse("shape.ts", ts_code);
        let shape = &classes[0];

        assert_eq!(shape.kind, ClassKind::Interface);
        assert!(shape.is_abstract);
        assert_eq!(shape.implements, vec!["Named", "Sized"]);
        assert_eq!(shape.member("area", false).unwrap().kind, MemberKind::Property);
        assert_eq!(shape.member("draw", false).unwrap().kind, MemberKind::Method);
        assert!(shape.member("[Symbol.iterator]", false).is_some());
    }

    #[test]
    fn test_parse_namespaces_and_ambient_declarations() {
        let ts_code = r#"
export namespace Zoo.Park {
    export class Keeper {}
}
declare class Host {}
export default class Main extends Zoo.Park.Keeper {}
"#;
        let classes = parse("zoo.ts", ts_code);
        let names: Vec<_> = classes.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, vec!["Zoo.Park.Keeper", "Host", "Main"]);
        assert_eq!(classes[0].scope, vec!["Zoo", "Park"]);
        assert!(!classes[0].is_ambient);
        assert!(classes[1].is_ambient);
        assert_eq!(classes[2].extends.as_deref(), Some("Zoo.Park.Keeper"));
    }

    #[test]
    fn test_parse_declaration_file_is_ambient() {
        let classes = parse("lib.d.ts", "export class Buffer { length: number; }");
        assert!(classes[0].is_ambient);
    }

    #[test]
    fn test_parse_mixins() {
        let ts_code = r#"
type Ctor = new (...args: any[]) => {};

/** Adds a timestamp. */
export function Timestamped<T extends Ctor>(Base: T) {
    return class extends Base {
        createdAt = Date.now();
    };
}

export const Tagged = <T extends Ctor>(Base: T) =>
    class extends Base {
        protected tag(): string { return ""; }
    };

export class Post extends Tagged(Timestamped(Entity)) {}
"#;
        let classes = parse("mixins.ts", ts_code);

        assert_eq!(classes.len(), 3);
        let timestamped = &classes[0];
        assert_eq!(timestamped.name, "Timestamped");
        assert_eq!(timestamped.kind, ClassKind::Mixin);
        assert!(timestamped.extends.is_none());
        assert_eq!(timestamped.comment.as_deref(), Some("/** Adds a timestamp. */"));
        assert!(timestamped.member("createdAt", false).is_some());

        assert_eq!(classes[1].kind, ClassKind::Mixin);
        assert!(classes[1].member("tag", false).is_some());

        let post = &classes[2];
        assert_eq!(post.extends.as_deref(), Some("Entity"));
        assert_eq!(post.mixins, vec!["Tagged", "Timestamped"]);
    }

    #[test]
    fn test_parse_file_from_disk() {
        let ts_code = "export abstract class Base { abstract run(): void; }";
        let mut file = NamedTempFile::with_suffix(".ts").unwrap();
        file.write_all(ts_code.as_bytes()).unwrap();

        let classes = TsParser::new().parse_file(file.path()).unwrap();

        assert_eq!(classes.len(), 1);
        assert!(classes[0].is_abstract);
        assert_eq!(classes[0].source_file, file.path());
    }

    #[test]
    fn test_parse_error() {
        let result = TsParser::new().parse_source(Path::new("bad.ts"), "class {".to_string());
        assert!(result.is_err());
    }
}
