//! TypeScript Declaration Classifier
//!
//! Recursive-visit classification of Angular-style TypeScript sources.
//! Annotated classes are categorized by decorator precedence
//! (Component > Directive > Injectable > Pipe > NgModule, with Injectable
//! sub-classified by the capabilities the class implements); non-annotated
//! interfaces, enums, type aliases and exported constants are categorized
//! structurally. Anything unrecognized is omitted.

use tree_sitter::{Node, Parser as TsParser};

use super::Classifier;
use crate::types::{Category, Declaration, DocsmithError, Result};

/// Route-guard capabilities that turn an `@Injectable` class into a guard.
const GUARD_CAPABILITIES: &[&str] = &[
    "CanActivate",
    "CanActivateChild",
    "CanDeactivate",
    "CanLoad",
];

pub struct TypeScriptClassifier;

impl TypeScriptClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TypeScriptClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for TypeScriptClassifier {
    fn classify(&self, source_text: &str) -> Result<Vec<Declaration>> {
        let mut parser = TsParser::new();
        parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .map_err(|e| DocsmithError::Parse {
                message: format!("Failed to set TypeScript language: {e}"),
                path: String::new(),
            })?;

        let tree = parser
            .parse(source_text, None)
            .ok_or_else(|| DocsmithError::Parse {
                message: "Failed to parse TypeScript source".to_string(),
                path: String::new(),
            })?;

        let mut declarations = Vec::new();
        visit(tree.root_node(), source_text, &mut declarations);
        Ok(declarations)
    }
}

fn visit(node: Node, source: &str, out: &mut Vec<Declaration>) {
    match node.kind() {
        "class_declaration" => {
            if let Some(declaration) = classify_class(node, source) {
                out.push(declaration);
            }
        }
        "interface_declaration" => out.push(structural(node, source, Category::Interface)),
        "enum_declaration" => out.push(structural(node, source, Category::Enum)),
        "type_alias_declaration" => out.push(structural(node, source, Category::TypeAlias)),
        "export_statement" => collect_exported_constants(node, source, out),
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        visit(child, source, out);
    }
}

/// Extract text content from a tree-sitter node.
/// Returns empty string if extraction fails.
#[inline]
fn node_text<'a>(node: Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Declaration for a structurally recognized shape (interface, enum, type
/// alias): the node's own span, no annotation involved.
fn structural(node: Node, source: &str, category: Category) -> Declaration {
    Declaration {
        name: node
            .child_by_field_name("name")
            .map(|n| node_text(n, source).to_string()),
        category,
        source_text: node_text(node, source).to_string(),
        relative_path: None,
        template_reference: None,
    }
}

/// Classify one class declaration by its decorators. Returns `None` for
/// classes without a recognized annotation.
fn classify_class(node: Node, source: &str) -> Option<Declaration> {
    let decorators = collect_decorators(node);
    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(n, source).to_string());

    // Precedence is fixed; the order decorators appear in the source is
    // irrelevant.
    let mut template_reference = None;
    let category = if let Some(dec) = find_decorator(&decorators, source, "Component") {
        template_reference = find_pair_string(*dec, source, "templateUrl");
        Category::Component
    } else if find_decorator(&decorators, source, "Directive").is_some() {
        Category::Directive
    } else if find_decorator(&decorators, source, "Injectable").is_some() {
        classify_injectable(node, source)
    } else if find_decorator(&decorators, source, "Pipe").is_some() {
        Category::Pipe
    } else if find_decorator(&decorators, source, "NgModule").is_some() {
        Category::Module
    } else {
        return None;
    };

    // The span covers the decorators too, wherever the grammar attached
    // them (to the class itself or to an enclosing export statement).
    let span_start = decorators
        .iter()
        .map(|d| d.start_byte())
        .chain(std::iter::once(node.start_byte()))
        .min()
        .unwrap_or(node.start_byte());
    let source_text = source.get(span_start..node.end_byte())?.to_string();

    Some(Declaration {
        name,
        category,
        source_text,
        relative_path: None,
        template_reference,
    })
}

/// Sub-classify an `@Injectable` class by the capabilities it implements.
fn classify_injectable(node: Node, source: &str) -> Category {
    let implemented = implemented_types(node, source);
    // Generic arguments (e.g. `CanDeactivate<T>`, `Resolve<Data>`) are
    // ignored when matching the capability name.
    let bases: Vec<&str> = implemented
        .into_iter()
        .map(|t| t.split('<').next().unwrap_or(t).trim())
        .collect();

    if bases.contains(&"HttpInterceptor") {
        Category::Interceptor
    } else if bases.iter().any(|b| GUARD_CAPABILITIES.contains(b)) {
        Category::Guard
    } else if bases.contains(&"Resolve") {
        Category::Resolver
    } else {
        Category::Service
    }
}

/// Texts of the types named in the class's `implements` clause.
fn implemented_types<'a>(node: Node, source: &'a str) -> Vec<&'a str> {
    let mut types = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() != "class_heritage" {
            continue;
        }
        let mut heritage_cursor = child.walk();
        for clause in child.named_children(&mut heritage_cursor) {
            if clause.kind() != "implements_clause" {
                continue;
            }
            let mut clause_cursor = clause.walk();
            for ty in clause.named_children(&mut clause_cursor) {
                types.push(node_text(ty, source));
            }
        }
    }
    types
}

/// Decorators of a class, wherever the grammar attached them: children of
/// the class node, or of the enclosing export statement when the decorator
/// precedes the `export` keyword.
fn collect_decorators(node: Node) -> Vec<Node> {
    let mut decorators = Vec::new();

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "decorator" {
            decorators.push(child);
        }
    }

    if let Some(parent) = node.parent()
        && parent.kind() == "export_statement"
    {
        let mut parent_cursor = parent.walk();
        for child in parent.named_children(&mut parent_cursor) {
            if child.kind() == "decorator" {
                decorators.push(child);
            }
        }
    }

    decorators
}

fn find_decorator<'d, 't>(
    decorators: &'d [Node<'t>],
    source: &str,
    name: &str,
) -> Option<&'d Node<'t>> {
    decorators.iter().find(|d| decorator_name(**d, source) == name)
}

/// Identifier a decorator invokes: `@Component({...})` -> "Component",
/// `@Injectable()` -> "Injectable", bare `@Sealed` -> "Sealed".
fn decorator_name<'a>(dec: Node, source: &'a str) -> &'a str {
    let Some(inner) = dec.named_child(0) else {
        return "";
    };
    match inner.kind() {
        "call_expression" => inner
            .child_by_field_name("function")
            .map(|f| node_text(f, source))
            .unwrap_or(""),
        _ => node_text(inner, source),
    }
}

/// Find the string value of an object property named `key` anywhere inside
/// `node` (used for `templateUrl` in the `@Component` argument object).
fn find_pair_string(node: Node, source: &str, key: &str) -> Option<String> {
    if node.kind() == "pair"
        && let Some(k) = node.child_by_field_name("key")
        && node_text(k, source) == key
        && let Some(v) = node.child_by_field_name("value")
        && v.kind() == "string"
    {
        let raw = node_text(v, source);
        return Some(
            raw.trim_matches(|c| c == '"' || c == '\'' || c == '`')
                .to_string(),
        );
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if let Some(found) = find_pair_string(child, source, key) {
            return Some(found);
        }
    }
    None
}

/// One Declaration per bound name in an exported `const` statement.
fn collect_exported_constants(node: Node, source: &str, out: &mut Vec<Declaration>) {
    let Some(decl) = node.child_by_field_name("declaration") else {
        return;
    };
    if decl.kind() != "lexical_declaration" {
        return;
    }
    let is_const = decl.child(0).map(|c| c.kind() == "const").unwrap_or(false);
    if !is_const {
        return;
    }

    let mut cursor = decl.walk();
    for declarator in decl.named_children(&mut cursor) {
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        let name = declarator
            .child_by_field_name("name")
            .map(|n| node_text(n, source).to_string());
        out.push(Declaration {
            name,
            category: Category::Constant,
            source_text: node_text(declarator, source).to_string(),
            relative_path: None,
            template_reference: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(source: &str) -> Vec<Declaration> {
        TypeScriptClassifier::new().classify(source).unwrap()
    }

    #[test]
    fn test_component_with_template_url() {
        let source = r#"
@Component({
  selector: 'app-upload',
  templateUrl: './upload.component.html',
  styleUrls: ['./upload.component.scss'],
})
export class UploadComponent {}
"#;
        let decls = classify(source);
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].category, Category::Component);
        assert_eq!(decls[0].name.as_deref(), Some("UploadComponent"));
        assert_eq!(
            decls[0].template_reference.as_deref(),
            Some("./upload.component.html")
        );
        assert!(decls[0].source_text.starts_with("@Component"));
        assert!(decls[0].source_text.ends_with("{}"));
    }

    #[test]
    fn test_component_without_template_url() {
        let source = r#"
@Component({ selector: 'x', template: '<p></p>' })
export class InlineComponent {}
"#;
        let decls = classify(source);
        assert_eq!(decls[0].category, Category::Component);
        assert_eq!(decls[0].template_reference, None);
    }

    #[test]
    fn test_injectable_defaults_to_service() {
        let source = r#"
@Injectable({ providedIn: 'root' })
export class DataService {}
"#;
        let decls = classify(source);
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].category, Category::Service);
    }

    #[test]
    fn test_injectable_interceptor() {
        let source = r#"
@Injectable()
export class AuthInterceptor implements HttpInterceptor {
  intercept(req: HttpRequest<any>, next: HttpHandler) {}
}
"#;
        let decls = classify(source);
        assert_eq!(decls[0].category, Category::Interceptor);
    }

    #[test]
    fn test_injectable_guard_capabilities() {
        for capability in ["CanActivate", "CanActivateChild", "CanLoad"] {
            let source = format!(
                "@Injectable()\nexport class TheGuard implements {capability} {{}}\n"
            );
            let decls = classify(&source);
            assert_eq!(decls[0].category, Category::Guard, "for {capability}");
        }
    }

    #[test]
    fn test_injectable_generic_deactivate_guard() {
        let source = r#"
@Injectable()
export class LeaveGuard implements CanDeactivate<FormComponent> {}
"#;
        let decls = classify(source);
        assert_eq!(decls[0].category, Category::Guard);
    }

    #[test]
    fn test_injectable_resolver() {
        let source = r#"
@Injectable()
export class UserResolver implements Resolve<User> {
  resolve(route: ActivatedRouteSnapshot) {}
}
"#;
        let decls = classify(source);
        assert_eq!(decls[0].category, Category::Resolver);
    }

    #[test]
    fn test_guard_beats_service_regardless_of_other_interfaces() {
        let source = r#"
@Injectable()
export class MixedGuard implements OnDestroy, CanActivate {}
"#;
        let decls = classify(source);
        assert_eq!(decls[0].category, Category::Guard);
    }

    #[test]
    fn test_component_beats_injectable_precedence() {
        let source = r#"
@Injectable()
@Component({ selector: 'x' })
export class Both {}
"#;
        let decls = classify(source);
        assert_eq!(decls[0].category, Category::Component);

        // Same signals, opposite order in the text.
        let source = r#"
@Component({ selector: 'x' })
@Injectable()
export class Both {}
"#;
        let decls = classify(source);
        assert_eq!(decls[0].category, Category::Component);
    }

    #[test]
    fn test_directive_pipe_and_module() {
        let source = r#"
@Directive({ selector: '[appHighlight]' })
export class HighlightDirective {}

@Pipe({ name: 'keys' })
export class KeysPipe implements PipeTransform {}

@NgModule({ imports: [] })
export class AppModule {}
"#;
        let decls = classify(source);
        let categories: Vec<Category> = decls.iter().map(|d| d.category).collect();
        assert_eq!(
            categories,
            vec![Category::Directive, Category::Pipe, Category::Module]
        );
    }

    #[test]
    fn test_unannotated_class_is_omitted() {
        let source = "export class Helper { run() {} }";
        assert!(classify(source).is_empty());
    }

    #[test]
    fn test_structural_declarations() {
        let source = r#"
export interface TreeNode {
  name: string;
}

enum Color { Red, Green }

export type Result = string | null;
"#;
        let decls = classify(source);
        let categories: Vec<Category> = decls.iter().map(|d| d.category).collect();
        assert_eq!(
            categories,
            vec![Category::Interface, Category::Enum, Category::TypeAlias]
        );
        assert_eq!(decls[0].name.as_deref(), Some("TreeNode"));
        assert_eq!(decls[1].name.as_deref(), Some("Color"));
        assert_eq!(decls[2].name.as_deref(), Some("Result"));
    }

    #[test]
    fn test_exported_const_one_declaration_per_binding() {
        let source = "export const A = 1, B = 'two';\nconst internal = 3;";
        let decls = classify(source);
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].name.as_deref(), Some("A"));
        assert_eq!(decls[1].name.as_deref(), Some("B"));
        assert!(decls.iter().all(|d| d.category == Category::Constant));
        assert!(decls[0].source_text.contains("A = 1"));
    }

    #[test]
    fn test_exported_let_is_not_a_constant() {
        let source = "export let counter = 0;";
        assert!(classify(source).is_empty());
    }

    #[test]
    fn test_multiple_declarations_in_one_file() {
        let source = r#"
export interface Options { flag: boolean; }

@Component({ selector: 'app-a', templateUrl: './a.html' })
export class AComponent {}

@Injectable()
export class AService {}
"#;
        let decls = classify(source);
        let categories: Vec<Category> = decls.iter().map(|d| d.category).collect();
        assert_eq!(
            categories,
            vec![Category::Interface, Category::Component, Category::Service]
        );
        // Each span covers only its own declaration.
        assert!(!decls[1].source_text.contains("interface Options"));
        assert!(!decls[1].source_text.contains("AService"));
    }

    #[test]
    fn test_malformed_input_is_not_fatal() {
        let source = "export class {{{ @Component\ninterface Ok { a: string; }";
        // Must not error; whatever parses structurally is returned.
        let decls = TypeScriptClassifier::new().classify(source).unwrap();
        assert!(decls.iter().all(|d| d.category != Category::Component));
    }

    #[test]
    fn test_empty_source() {
        assert!(classify("").is_empty());
    }
}
