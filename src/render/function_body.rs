//! Reshape a compiled ES module into a function body.
//!
//! The caller evaluates the body with the JSX runtime (and provider, if any)
//! as its first argument, e.g. `new Function(code)(runtime)`, and receives
//! `{ default: MDXContent, ...exports }` back.
//!
//! The module is parsed with SWC so only real top-level import and export
//! items are rewritten; everything else is printed back unchanged.

use serde_json::Value;
use std::collections::HashSet;
use swc_core::common::{sync::Lrc, FileName, SourceMap, SyntaxContext, DUMMY_SP};
use swc_core::ecma::ast::{
    ClassDecl, ClassExpr, Decl, DefaultDecl, EsVersion, ExportSpecifier, Expr, FnDecl, FnExpr,
    Ident, ImportDecl, ImportSpecifier, ModuleDecl, ModuleExportName, ModuleItem, NamedExport,
    ObjectPatProp, Pat, Script, Stmt, VarDecl, VarDeclKind, VarDeclarator,
};
use swc_core::ecma::codegen::{text_writer::JsWriter, Config, Emitter};
use swc_core::ecma::parser::{parse_file_as_module, EsSyntax, Syntax};

/// Binding for an anonymous `export default <expression>`
const DEFAULT_BINDING: &str = "_exportDefault";

/// Rewrite `module` so it can run as a function body.
///
/// Imports from `runtime_sources` become destructuring of `arguments[0]`;
/// any other import, or a re-export, cannot be expressed and is rejected.
pub fn into_function_body(
    module: &str,
    runtime_sources: &HashSet<String>,
) -> Result<String, String> {
    let cm: Lrc<SourceMap> = Default::default();
    let file = cm.new_source_file(FileName::Anon.into(), module.to_string());

    let mut errors = Vec::new();
    let parsed = parse_file_as_module(
        &file,
        Syntax::Es(EsSyntax::default()),
        EsVersion::Es2022,
        None,
        &mut errors,
    )
    .map_err(|e| format!("cannot parse compiled module: {}", e.kind().msg()))?;
    if let Some(e) = errors.first() {
        return Err(format!("cannot parse compiled module: {}", e.kind().msg()));
    }

    let mut body = FunctionBody::default();
    for item in parsed.body {
        match item {
            ModuleItem::Stmt(stmt) => body.statements.push(stmt),
            ModuleItem::ModuleDecl(decl) => body.module_decl(decl, runtime_sources)?,
        }
    }
    body.print(cm)
}

#[derive(Default)]
struct FunctionBody {
    /// Destructuring of `arguments[0]`, one line per import
    arguments: Vec<String>,
    statements: Vec<Stmt>,
    /// `(exported key, local binding)` in source order
    exports: Vec<(String, String)>,
    default_export: Option<String>,
}

impl FunctionBody {
    fn module_decl(
        &mut self,
        decl: ModuleDecl,
        runtime_sources: &HashSet<String>,
    ) -> Result<(), String> {
        match decl {
            ModuleDecl::Import(import) => self.import(import, runtime_sources),
            ModuleDecl::ExportDecl(export) => {
                for name in declared_names(&export.decl)? {
                    self.exports.push((name.clone(), name));
                }
                self.statements.push(Stmt::Decl(export.decl));
                Ok(())
            }
            ModuleDecl::ExportDefaultDecl(export) => self.default_decl(export.decl),
            ModuleDecl::ExportDefaultExpr(export) => {
                match *export.expr {
                    Expr::Ident(ident) => self.default_export = Some(ident.sym.to_string()),
                    expr => {
                        self.statements
                            .push(const_decl(DEFAULT_BINDING, Box::new(expr)));
                        self.default_export = Some(DEFAULT_BINDING.to_string());
                    }
                }
                Ok(())
            }
            ModuleDecl::ExportNamed(export) => self.export_list(export),
            ModuleDecl::ExportAll(export) => Err(format!(
                "cannot re-export `{}` in a function body",
                &*export.src.value
            )),
            _ => Err("unsupported module declaration in a function body".to_string()),
        }
    }

    fn import(
        &mut self,
        import: ImportDecl,
        runtime_sources: &HashSet<String>,
    ) -> Result<(), String> {
        let source = &*import.src.value;
        if !runtime_sources.contains(source) {
            return Err(format!(
                "cannot import `{}` in a function body; only the JSX runtime is passed in",
                source
            ));
        }

        let mut fields = Vec::new();
        for specifier in import.specifiers {
            match specifier {
                ImportSpecifier::Namespace(namespace) => self
                    .arguments
                    .push(format!("const {} = arguments[0];", namespace.local.sym)),
                ImportSpecifier::Default(default) => {
                    fields.push(format!("default: {}", default.local.sym))
                }
                ImportSpecifier::Named(named) => match named.imported {
                    Some(imported) => {
                        fields.push(format!("{}: {}", property_key(&imported), named.local.sym))
                    }
                    None => fields.push(named.local.sym.to_string()),
                },
            }
        }
        if !fields.is_empty() {
            self.arguments
                .push(format!("const {{ {} }} = arguments[0];", fields.join(", ")));
        }
        Ok(())
    }

    fn default_decl(&mut self, decl: DefaultDecl) -> Result<(), String> {
        let (name, stmt) = match decl {
            DefaultDecl::Fn(FnExpr {
                ident: Some(ident),
                function,
            }) => (
                ident.sym.to_string(),
                Stmt::Decl(Decl::Fn(FnDecl {
                    ident,
                    declare: false,
                    function,
                })),
            ),
            DefaultDecl::Class(ClassExpr {
                ident: Some(ident),
                class,
            }) => (
                ident.sym.to_string(),
                Stmt::Decl(Decl::Class(ClassDecl {
                    ident,
                    declare: false,
                    class,
                })),
            ),
            DefaultDecl::Fn(expr) => (
                DEFAULT_BINDING.to_string(),
                const_decl(DEFAULT_BINDING, Box::new(Expr::Fn(expr))),
            ),
            DefaultDecl::Class(expr) => (
                DEFAULT_BINDING.to_string(),
                const_decl(DEFAULT_BINDING, Box::new(Expr::Class(expr))),
            ),
            DefaultDecl::TsInterfaceDecl(_) => {
                return Err("unsupported default export in a function body".to_string())
            }
        };
        self.statements.push(stmt);
        self.default_export = Some(name);
        Ok(())
    }

    fn export_list(&mut self, export: NamedExport) -> Result<(), String> {
        if let Some(src) = &export.src {
            return Err(format!(
                "cannot re-export `{}` in a function body",
                &*src.value
            ));
        }

        for specifier in export.specifiers {
            let ExportSpecifier::Named(named) = specifier else {
                return Err("unsupported export specifier in a function body".to_string());
            };
            let local = match named.orig {
                ModuleExportName::Ident(ident) => ident.sym.to_string(),
                ModuleExportName::Str(s) => {
                    return Err(format!("cannot export `{}` without a source", &*s.value))
                }
            };
            let exported = named.exported.map(|name| export_name(&name));
            match exported.as_deref() {
                Some("default") => self.default_export = Some(local),
                Some(key) => self.exports.push((property_key_str(key), local)),
                None => self.exports.push((local.clone(), local)),
            }
        }
        Ok(())
    }

    /// Print the argument bindings, the statements, then the returned exports
    fn print(self, cm: Lrc<SourceMap>) -> Result<String, String> {
        let default_export = self.default_export.ok_or("module has no default export")?;

        let script = Script {
            span: DUMMY_SP,
            body: self.statements,
            shebang: None,
        };
        let mut buf = Vec::new();
        {
            let mut emitter = Emitter {
                cfg: Config::default(),
                cm: cm.clone(),
                comments: None,
                wr: JsWriter::new(cm, "\n", &mut buf, None),
            };
            emitter
                .emit_script(&script)
                .map_err(|e| format!("cannot print function body: {}", e))?;
        }

        let mut body = String::new();
        for line in &self.arguments {
            body.push_str(line);
            body.push('\n');
        }
        body.push_str(&String::from_utf8_lossy(&buf));
        if !body.is_empty() && !body.ends_with('\n') {
            body.push('\n');
        }

        body.push_str("return {\n");
        for (key, local) in &self.exports {
            if key == local {
                body.push_str(&format!("    {},\n", local));
            } else {
                body.push_str(&format!("    {}: {},\n", key, local));
            }
        }
        body.push_str(&format!("    default: {}\n}};\n", default_export));

        Ok(body)
    }
}

/// Every binding an exported declaration introduces
fn declared_names(decl: &Decl) -> Result<Vec<String>, String> {
    let mut names = Vec::new();
    match decl {
        Decl::Fn(f) => names.push(f.ident.sym.to_string()),
        Decl::Class(c) => names.push(c.ident.sym.to_string()),
        Decl::Var(var) => {
            for declarator in &var.decls {
                collect_bindings(&declarator.name, &mut names);
            }
        }
        _ => return Err("unsupported export declaration in a function body".to_string()),
    }
    Ok(names)
}

fn collect_bindings(pat: &Pat, names: &mut Vec<String>) {
    match pat {
        Pat::Ident(binding) => names.push(binding.id.sym.to_string()),
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                collect_bindings(elem, names);
            }
        }
        Pat::Rest(rest) => collect_bindings(&rest.arg, names),
        Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    ObjectPatProp::KeyValue(kv) => collect_bindings(&kv.value, names),
                    ObjectPatProp::Assign(assign) => names.push(assign.key.id.sym.to_string()),
                    ObjectPatProp::Rest(rest) => collect_bindings(&rest.arg, names),
                }
            }
        }
        Pat::Assign(assign) => collect_bindings(&assign.left, names),
        _ => {}
    }
}

fn const_decl(name: &str, init: Box<Expr>) -> Stmt {
    Stmt::Decl(Decl::Var(Box::new(VarDecl {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        kind: VarDeclKind::Const,
        declare: false,
        decls: vec![VarDeclarator {
            span: DUMMY_SP,
            name: Pat::Ident(Ident::new_no_ctxt(name.into(), DUMMY_SP).into()),
            init: Some(init),
            definite: false,
        }],
    })))
}

fn export_name(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::Ident(ident) => ident.sym.to_string(),
        ModuleExportName::Str(s) => s.value.to_string(),
    }
}

/// Object key for a module export name, quoted when it is not an identifier
fn property_key(name: &ModuleExportName) -> String {
    property_key_str(&export_name(name))
}

fn property_key_str(name: &str) -> String {
    let mut chars = name.chars();
    let is_ident = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$');
    if is_ident {
        name.to_string()
    } else {
        Value::from(name).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn react() -> HashSet<String> {
        ["react/jsx-runtime".to_string()].into_iter().collect()
    }

    const MODULE: &str = r#"import { jsx as _jsx, jsxs as _jsxs } from "react/jsx-runtime";
function _createMdxContent(props) {
    return _jsx("p", {
        children: "Hello"
    });
}
export default function MDXContent(props = {}) {
    return _createMdxContent(props);
}
"#;

    #[test]
    fn test_runtime_import_becomes_argument() {
        let body = into_function_body(MODULE, &react()).unwrap();
        assert!(body.starts_with("const { jsx: _jsx, jsxs: _jsxs } = arguments[0];\n"));
        assert!(body.contains("\nfunction MDXContent(props = {}) {\n"));
        assert!(!body.contains("import "));
        assert!(!body.contains("export "));
        assert!(body.ends_with("return {\n    default: MDXContent\n};\n"));
    }

    #[test]
    fn test_separate_default_export_statement() {
        let module = "import { jsx as _jsx } from \"react/jsx-runtime\";\nfunction MDXContent() {\n    return null;\n}\nexport default MDXContent;\n";
        let body = into_function_body(module, &react()).unwrap();
        assert!(!body.contains("export default"));
        assert!(body.ends_with("return {\n    default: MDXContent\n};\n"));
    }

    #[test]
    fn test_author_exports_are_returned() {
        let module = format!(
            "{}export const meta = {{\n    draft: true\n}};\nexport function helper() {{}}\nconst local = 1;\nexport {{ local as alias }};\n",
            MODULE
        );
        let body = into_function_body(&module, &react()).unwrap();
        assert!(body.contains("\nconst meta = {\n"));
        assert!(body.contains("\nfunction helper() {}\n"));
        assert!(body.contains("    meta,\n    helper,\n    alias: local,\n    default: MDXContent\n"));
    }

    #[test]
    fn test_every_declarator_is_returned() {
        let module = format!("{}export const a = 1, b = 2;\n", MODULE);
        let body = into_function_body(&module, &react()).unwrap();
        assert!(body.contains("    a,\n    b,\n    default: MDXContent\n"));
    }

    #[test]
    fn test_destructured_bindings_are_returned() {
        let module = format!(
            "{}export const {{ c, d: renamed, ...rest }} = {{ c: 1, d: 2 }};\nexport let [first, , third = 3] = [];\n",
            MODULE
        );
        let body = into_function_body(&module, &react()).unwrap();
        assert!(body.contains(
            "    c,\n    renamed,\n    rest,\n    first,\n    third,\n    default: MDXContent\n"
        ));
    }

    #[test]
    fn test_template_literal_lines_are_untouched() {
        let module = format!(
            "export const snippet = `\nexport const secret = 1\nimport x from \"y\"\n`;\n{}",
            MODULE
        );
        let body = into_function_body(&module, &react()).unwrap();
        assert!(body.contains("`\nexport const secret = 1\nimport x from \"y\"\n`"));
        assert!(body.contains("    snippet,\n    default: MDXContent\n"));
        assert!(!body.contains("secret,"));
    }

    #[test]
    fn test_default_and_namespace_imports() {
        let sources: HashSet<String> = ["react".to_string(), "@mdx-js/react".to_string()]
            .into_iter()
            .collect();
        let module = "import React from \"react\";\nimport * as provider from \"@mdx-js/react\";\nexport default function MDXContent() {}\n";
        let body = into_function_body(module, &sources).unwrap();
        assert!(body.starts_with("const { default: React } = arguments[0];\nconst provider = arguments[0];\n"));
    }

    #[test]
    fn test_anonymous_default_export() {
        let body = into_function_body("export default () => null;\n", &react()).unwrap();
        assert!(body.starts_with("const _exportDefault = "));
        assert!(body.ends_with("    default: _exportDefault\n};\n"));
    }

    #[test]
    fn test_foreign_import_is_rejected() {
        let module = format!("import Chart from \"./chart.js\";\n{}", MODULE);
        let err = into_function_body(&module, &react()).unwrap_err();
        assert!(err.contains("./chart.js"));
    }

    #[test]
    fn test_reexport_is_rejected() {
        let module = format!("{}export {{ a }} from \"./a.js\";\n", MODULE);
        assert!(into_function_body(&module, &react()).is_err());
        let module = format!("{}export * from \"./b.js\";\n", MODULE);
        assert!(into_function_body(&module, &react()).is_err());
    }

    #[test]
    fn test_missing_default_export() {
        let err = into_function_body("const a = 1;\n", &react()).unwrap_err();
        assert!(err.contains("default export"));
    }

    #[test]
    fn test_unparseable_module() {
        let err = into_function_body("export const = ;\n", &react()).unwrap_err();
        assert!(err.starts_with("cannot parse compiled module"));
    }
}
