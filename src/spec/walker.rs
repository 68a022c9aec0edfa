// src/spec/walker.rs

//! Semantic walk over a syntax-error-free parse tree.
//!
//! All walk state (the field path stack, the model under construction and
//! the accumulated errors) lives in a [`WalkContext`] owned by one
//! [`walk`] call.

use std::collections::{BTreeMap, HashSet};

use tracing::trace;

use crate::diagnostics::{Diagnostic, Diagnostics, SourceLocation, Span};
use crate::spec::normalize::{clean_text, condense_list_type};
use crate::spec::syntax::{FieldBlock, FieldItem, MetadataItem, ObjectDecl, SpecSyntax};
use crate::spec::{CheckWithLocation, FieldSpec, ObjectDef, ObjectProperty, Specification};
use crate::types::is_builtin_type_name;

struct WalkContext<'a> {
    file: &'a str,
    path_stack: Vec<String>,
    fields: Vec<FieldSpec>,
    seen_fields: HashSet<String>,
    errors: Diagnostics,
}

/// Extract a [`Specification`] from `syntax`.
///
/// Returns `None` only when the tree lacks its file declaration, which the
/// grammar should have rejected; that case is reported as an internal error.
pub fn walk(syntax: SpecSyntax, file: &str) -> (Option<Specification>, Diagnostics) {
    let mut ctx = WalkContext {
        file,
        path_stack: Vec::new(),
        fields: Vec::new(),
        seen_fields: HashSet::new(),
        errors: Diagnostics::new(),
    };

    let Some(file_decl) = syntax.file else {
        ctx.errors.push(Diagnostic::internal(
            "parse tree has no file declaration but no syntax error was reported",
            Some(SourceLocation::top_of_file(file)),
        ));
        return (None, ctx.errors);
    };

    let mut imports = BTreeMap::new();
    let mut import_locations = BTreeMap::new();
    for item in &syntax.imports {
        imports.insert(item.alias.text.clone(), clean_text(&item.path.text));
        import_locations.insert(item.alias.text.clone(), item.path.span);
    }

    let objects = ctx.objects(&syntax.objects);

    for block in &syntax.fields {
        ctx.enter_field(block);
    }

    let spec = Specification {
        source: file.to_string(),
        file: clean_text(&file_decl.path.text),
        file_location: file_decl.path.span,
        file_format: file_decl.format.text.clone(),
        file_format_location: file_decl.format.span,
        imports,
        import_locations,
        objects,
        fields: ctx.fields,
    };

    (Some(spec), ctx.errors)
}

impl<'a> WalkContext<'a> {
    fn error(&mut self, message: String, span: Span) {
        self.errors
            .push(Diagnostic::semantic(message, SourceLocation::new(self.file, span)));
    }

    fn objects(&mut self, decls: &[ObjectDecl]) -> Vec<ObjectDef> {
        let mut objects: Vec<ObjectDef> = Vec::new();

        for decl in decls {
            if is_builtin_type_name(&decl.name.text) {
                self.error(
                    format!("object type {} shadows a built-in type", decl.name.text),
                    decl.name.span,
                );
                continue;
            }
            if objects.iter().any(|o| o.name == decl.name.text) {
                self.error(format!("duplicate object type {}", decl.name.text), decl.name.span);
                continue;
            }

            let mut properties: Vec<ObjectProperty> = Vec::new();
            for prop in &decl.properties {
                if properties.iter().any(|p| p.name == prop.name.text) {
                    self.error(
                        format!(
                            "duplicate property {} in object type {}",
                            prop.name.text, decl.name.text
                        ),
                        prop.name.span,
                    );
                    continue;
                }
                properties.push(ObjectProperty {
                    name: prop.name.text.clone(),
                    type_name: condense_list_type(&prop.ty.text),
                    optional: prop.optional,
                    location: prop.name.span,
                });
            }

            objects.push(ObjectDef {
                name: decl.name.text.clone(),
                name_location: decl.name.span,
                properties,
            });
        }

        objects
    }

    fn enter_field(&mut self, block: &FieldBlock) {
        let field_name = match self.path_stack.last() {
            Some(parent) => format!("{parent}.{}", block.name),
            None => block.name.clone(),
        };
        self.path_stack.push(field_name.clone());

        let field = self.field_spec(&field_name, block);
        trace!(field = %field.field, checks = field.checks.len(), "extracted field");

        if self.seen_fields.insert(field_name.clone()) {
            self.fields.push(field);
        } else {
            self.error(format!("duplicate field {field_name}"), block.name_span);
        }

        for item in &block.items {
            if let FieldItem::Field(child) = item {
                self.enter_field(child);
            }
        }

        self.path_stack.pop();
    }

    fn field_spec(&mut self, field_name: &str, block: &FieldBlock) -> FieldSpec {
        let mut field = FieldSpec::new(field_name, block.name_span);

        let mut found_type = false;
        let mut found_optional = false;
        let mut found_default = false;
        let mut found_notes = false;

        for item in &block.items {
            match item {
                FieldItem::Metadata(MetadataItem::Type(ty)) => {
                    if found_type {
                        self.error(format!("duplicate type metadata for field {field_name}"), ty.span);
                        continue;
                    }
                    found_type = true;
                    field.field_type = condense_list_type(&ty.text);
                    field.field_type_location = ty.span;
                }
                FieldItem::Metadata(MetadataItem::Optional(tok)) => {
                    if found_optional {
                        self.error(
                            format!("duplicate optional metadata for field {field_name}"),
                            tok.span,
                        );
                        continue;
                    }
                    found_optional = true;
                    match tok.text.parse::<bool>() {
                        Ok(optional) => field.optional = optional,
                        Err(_) => self.errors.push(Diagnostic::internal(
                            format!(
                                "optional must be a bool, found {}; the grammar should have rejected it",
                                tok.text
                            ),
                            Some(SourceLocation::new(self.file, tok.span)),
                        )),
                    }
                    field.optional_location = tok.span;
                }
                FieldItem::Metadata(MetadataItem::Default(tok)) => {
                    if found_default {
                        self.error(
                            format!("duplicate default metadata for field {field_name}"),
                            tok.span,
                        );
                        continue;
                    }
                    found_default = true;
                    field.default = Some(clean_text(&tok.text));
                    field.default_location = tok.span;
                }
                FieldItem::Metadata(MetadataItem::Notes(tok)) => {
                    if found_notes {
                        self.error(
                            format!("duplicate notes metadata for field {field_name}"),
                            tok.span,
                        );
                        continue;
                    }
                    found_notes = true;
                    field.notes = Some(clean_text(&tok.text));
                    field.notes_location = tok.span;
                }
                FieldItem::Check(check) => field.checks.push(CheckWithLocation {
                    check: check.text.clone(),
                    location: check.span,
                }),
                FieldItem::Field(_) => {}
            }
        }

        if !found_type {
            self.error(format!("missing type metadata for field {field_name}"), block.name_span);
        }

        field
    }
}
