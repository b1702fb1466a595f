//! Prints a [`Schema`] back to SDL.
//!
//! Used to persist edits such as changed descriptions. Output is normalized:
//! two-space indentation, one definition per block, block strings for
//! multi-line descriptions. Comments and formatting of the original document
//! are not preserved.

use schemascope_core::schema::{Field, FieldKind, NodeKind, OperationRoots, Schema, SchemaNode};

/// Renders `text` as a double-quoted SDL string.
pub(crate) fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            '\u{08}' => quoted.push_str("\\b"),
            '\u{0C}' => quoted.push_str("\\f"),
            c if c.is_control() => {
                quoted.push_str(&format!("\\u{:04X}", c as u32));
            }
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Returns true if `text` reads back unchanged from a block string.
///
/// Block string values are dedented by their common indentation and lose
/// leading and trailing blank lines, so such text is quoted instead.
fn fits_block_string(text: &str) -> bool {
    let lines: Vec<&str> = text.split('\n').collect();
    let is_blank = |line: &str| line.trim_matches([' ', '\t']).is_empty();
    lines.len() > 1
        && !text
            .chars()
            .any(|c| c.is_control() && c != '\n' && c != '\t')
        && lines
            .iter()
            .all(|line| !line.starts_with([' ', '\t']))
        && lines.first().is_some_and(|line| !is_blank(line))
        && lines.last().is_some_and(|line| !is_blank(line))
}

fn write_description(out: &mut String, description: Option<&str>, indent: &str) {
    let Some(description) = description else {
        return;
    };
    if fits_block_string(description) {
        out.push_str(indent);
        out.push_str("\"\"\"\n");
        for line in description.replace("\"\"\"", "\\\"\"\"").lines() {
            if !line.is_empty() {
                out.push_str(indent);
                out.push_str(line);
            }
            out.push('\n');
        }
        out.push_str(indent);
        out.push_str("\"\"\"\n");
    } else {
        out.push_str(indent);
        out.push_str(&quote(description));
        out.push('\n');
    }
}

fn write_directives(out: &mut String, directives: &[String]) {
    for directive in directives {
        out.push(' ');
        out.push_str(directive);
    }
}

fn write_input_value(out: &mut String, value: &Field) {
    out.push_str(value.name());
    if let Some(ty) = value.ty() {
        out.push_str(&format!(": {ty}"));
    }
    if let Some(default) = value.default_value() {
        out.push_str(&format!(" = {default}"));
    }
    write_directives(out, value.directives());
}

fn write_arguments(out: &mut String, arguments: &[Field]) {
    if arguments.is_empty() {
        return;
    }
    let documented = arguments.iter().any(|a| a.description().is_some());
    out.push('(');
    if documented {
        out.push('\n');
        for argument in arguments {
            write_description(out, argument.description(), "    ");
            out.push_str("    ");
            write_input_value(out, argument);
            out.push('\n');
        }
        out.push_str("  ");
    } else {
        for (i, argument) in arguments.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            write_input_value(out, argument);
        }
    }
    out.push(')');
}

fn write_field(out: &mut String, field: &Field) {
    write_description(out, field.description(), "  ");
    out.push_str("  ");
    match field.kind() {
        FieldKind::Field => {
            out.push_str(field.name());
            write_arguments(out, field.arguments());
            if let Some(ty) = field.ty() {
                out.push_str(&format!(": {ty}"));
            }
            write_directives(out, field.directives());
        }
        FieldKind::InputValue => write_input_value(out, field),
        FieldKind::EnumValue | FieldKind::UnionMember => {
            out.push_str(field.name());
            write_directives(out, field.directives());
        }
    }
    out.push('\n');
}

fn write_node(out: &mut String, node: &SchemaNode) {
    write_description(out, node.description(), "");

    if node.kind() == NodeKind::Directive {
        out.push_str(&format!("directive {}", node.name()));
        write_arguments(out, node.fields());
        if node.is_repeatable() {
            out.push_str(" repeatable");
        }
        out.push_str(&format!(" on {}\n", node.locations().join(" | ")));
        return;
    }

    out.push_str(&format!("{} {}", node.kind().keyword(), node.name()));
    if !node.interfaces().is_empty() {
        let names: Vec<String> = node.interfaces().iter().map(|i| i.to_string()).collect();
        out.push_str(&format!(" implements {}", names.join(" & ")));
    }
    write_directives(out, node.directives());

    match node.kind() {
        NodeKind::Union => {
            let members: Vec<&str> = node.fields().iter().map(Field::name).collect();
            if !members.is_empty() {
                out.push_str(&format!(" = {}", members.join(" | ")));
            }
            out.push('\n');
        }
        NodeKind::Scalar => out.push('\n'),
        _ if node.fields().is_empty() => out.push('\n'),
        _ => {
            out.push_str(" {\n");
            for field in node.fields() {
                write_field(out, field);
            }
            out.push_str("}\n");
        }
    }
}

/// Returns true if the schema definition carries a description or directives,
/// or if the roots differ from the `Query`/`Mutation`/`Subscription` naming
/// convention and must be spelled out in a `schema` block.
fn needs_schema_block(schema: &Schema, roots: OperationRoots) -> bool {
    if schema.description().is_some() || !schema.directives().is_empty() {
        return true;
    }
    let conventional = |root: Option<_>, name: &str| match root {
        Some(id) => id == name,
        None => !schema
            .node_by_name(name.into())
            .is_some_and(|n| n.kind() == NodeKind::Object),
    };
    !(conventional(roots.query, "Query")
        && conventional(roots.mutation, "Mutation")
        && conventional(roots.subscription, "Subscription"))
}

/// Prints a schema as an SDL document.
///
/// # Example
///
/// ```
/// # use schemascope_parser::{parse, print_schema, ParseConfig};
/// let schema = parse("type User { name: String }", &ParseConfig::schema()).unwrap();
/// assert_eq!(print_schema(&schema), "type User {\n  name: String\n}\n");
/// ```
pub fn print_schema(schema: &Schema) -> String {
    let mut out = String::new();
    let roots = schema.operations();

    if needs_schema_block(schema, roots) {
        write_description(&mut out, schema.description(), "");
        out.push_str("schema");
        write_directives(&mut out, schema.directives());
        out.push_str(" {\n");
        for (operation, root) in [
            ("query", roots.query),
            ("mutation", roots.mutation),
            ("subscription", roots.subscription),
        ] {
            if let Some(root) = root {
                out.push_str(&format!("  {operation}: {root}\n"));
            }
        }
        out.push_str("}\n");
    }

    for node in schema.nodes() {
        if !out.is_empty() {
            out.push('\n');
        }
        write_node(&mut out, node);
    }
    out
}
