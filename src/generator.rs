//! Schema to source transform.
//!
//! `Generator::generate` is a pure function of the schema and the options it
//! was built with: no I/O, no retained state, byte-identical output for an
//! unchanged schema. Validation runs to completion before any template is
//! rendered, so a rejected schema never produces a partial artifact.

use crate::artifact::{tidy, Artifact};
use crate::backend::{Backend, BUILTIN_TEMPLATES};
use crate::error::{EmissionError, GenerateError, SchemaError};
use crate::schema::{Schema, ValueKind};
use serde::Serialize;
use std::path::Path;
use tera::{Context as TeraContext, Tera};
use tracing::{debug, info};

/// Size of the text buffer `ToText` serializes into.
pub const DEFAULT_TEXT_CEILING: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub text_ceiling: usize,
    pub emit_header: bool,
    /// Licence or ownership text placed in a comment block at the top.
    pub banner: Option<String>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            text_ceiling: DEFAULT_TEXT_CEILING,
            emit_header: false,
            banner: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct FieldContext<'a> {
    name: &'a str,
    type_name: String,
    kind: ValueKind,
    default: Option<String>,
}

#[derive(Debug, Serialize)]
struct EntityContext<'a> {
    banner: String,
    entity: &'a str,
    ns: Option<&'a str>,
    qualified: String,
    header: String,
    capacity: usize,
    text_ceiling: usize,
    missing_key_contract: &'static str,
    fields: Vec<FieldContext<'a>>,
}

pub struct Generator {
    backend: Box<dyn Backend>,
    tera: Tera,
    options: GeneratorOptions,
}

fn builtin_tera() -> Result<Tera, EmissionError> {
    let mut tera = Tera::default();
    tera.add_raw_templates(BUILTIN_TEMPLATES.to_vec())
        .map_err(EmissionError::Templates)?;
    tera.autoescape_on(vec![]); // we're not rendering HTML
    Ok(tera)
}

impl Generator {
    pub fn new(backend: Box<dyn Backend>, options: GeneratorOptions) -> Result<Self, EmissionError> {
        Ok(Self {
            backend,
            tera: builtin_tera()?,
            options,
        })
    }

    /// Like `new`, but templates found under `dir` replace the built-in ones
    /// of the same name (e.g. `dir/arduinojson/source.cpp.tera`).
    pub fn with_template_dir(
        backend: Box<dyn Backend>,
        options: GeneratorOptions,
        dir: &Path,
    ) -> Result<Self, EmissionError> {
        let pattern = format!("{}/**/*.tera", dir.display());
        let mut tera = Tera::new(&pattern).map_err(EmissionError::Templates)?;
        tera.extend(&builtin_tera()?).map_err(EmissionError::Templates)?;
        tera.autoescape_on(vec![]);
        info!("Tera template environment loaded (pattern: {pattern})");
        Ok(Self {
            backend,
            tera,
            options,
        })
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// Validates `schema` against the backend and renders every output file.
    pub fn generate(&self, schema: &Schema) -> Result<Artifact, GenerateError> {
        let context = self.build_context(schema)?;
        let stem = file_stem(schema);

        let mut tera_context = TeraContext::new();
        tera_context.insert("entity", &context.entity);
        tera_context.insert("banner", &context.banner);
        tera_context.insert("ns", &context.ns);
        tera_context.insert("qualified", &context.qualified);
        tera_context.insert("header", &context.header);
        tera_context.insert("capacity", &context.capacity);
        tera_context.insert("text_ceiling", &context.text_ceiling);
        tera_context.insert("missing_key_contract", &context.missing_key_contract);
        tera_context.insert("fields", &context.fields);

        let mut artifact = Artifact::default();
        for output in self
            .backend
            .outputs(&stem, &context.header, self.options.emit_header)
        {
            let rendered = self
                .tera
                .render(output.template, &tera_context)
                .map_err(|source| EmissionError::Render {
                    template: output.template.to_string(),
                    source,
                })?;
            artifact.upsert(&output.path, tidy(&rendered));
        }

        info!(
            "Generated {} file(s) for {} ({} fields, backend {})",
            artifact.files.len(),
            schema.entity,
            schema.fields.len(),
            self.backend.name()
        );
        Ok(artifact)
    }

    fn build_context<'a>(&self, schema: &'a Schema) -> Result<EntityContext<'a>, SchemaError> {
        schema.validate()?;
        let backend = self.backend.as_ref();
        if backend.is_reserved(&schema.entity) {
            return Err(SchemaError::ReservedWord {
                name: schema.entity.clone(),
                backend: backend.name(),
            });
        }

        let mut fields = Vec::with_capacity(schema.fields.len());
        for field in &schema.fields {
            if backend.is_reserved(&field.name) {
                return Err(SchemaError::ReservedWord {
                    name: field.name.clone(),
                    backend: backend.name(),
                });
            }
            let unknown = || SchemaError::UnknownType {
                field: field.name.clone(),
                type_name: field.type_name.clone(),
                backend: backend.name(),
            };
            let kind = field.kind().ok_or_else(unknown)?;
            let type_name = backend.resolve_type(field).ok_or_else(unknown)?;
            let default = match field.default.as_deref() {
                None => None,
                Some(expr) => Some(backend.default_expr(field, kind, expr).ok_or_else(|| {
                    SchemaError::UnevaluableDefault {
                        field: field.name.clone(),
                        expr: expr.to_string(),
                    }
                })?),
            };

            match &field.default {
                Some(d) => debug!("Code for {}={}", field.name, d),
                None => debug!("Code for {}", field.name),
            }
            fields.push(FieldContext {
                name: &field.name,
                type_name,
                kind,
                default,
            });
        }

        let qualified = match &schema.namespace {
            Some(ns) => format!("{}::{}", ns, schema.entity),
            None => schema.entity.clone(),
        };
        let header = schema
            .header
            .clone()
            .unwrap_or_else(|| format!("{}.h", file_stem(schema)));

        Ok(EntityContext {
            banner: banner_block(self.options.banner.as_deref()),
            entity: &schema.entity,
            ns: schema.namespace.as_deref(),
            qualified,
            header,
            capacity: schema.capacity(),
            text_ceiling: self.options.text_ceiling,
            missing_key_contract: backend.missing_key_contract(),
            fields,
        })
    }
}

/// Output file stem: the declaring header's stem, else the entity name.
fn file_stem(schema: &Schema) -> String {
    schema
        .header
        .as_deref()
        .and_then(|h| Path::new(h).file_stem())
        .and_then(|s| s.to_str())
        .map_or_else(|| schema.entity.clone(), str::to_string)
}

fn banner_block(text: Option<&str>) -> String {
    let Some(text) = text.map(str::trim_end).filter(|t| !t.is_empty()) else {
        return String::new();
    };
    let mut block = String::from("/*\n");
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            block.push_str(" *\n");
        } else {
            block.push_str(" * ");
            block.push_str(line);
            block.push('\n');
        }
    }
    block.push_str(" */\n\n");
    block
}
