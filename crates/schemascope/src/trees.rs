//! The schema being explored and its optional library.

use std::sync::atomic::{AtomicU64, Ordering};

use log::info;

use schemascope_core::{
    identifier::Id,
    schema::{Schema, SchemaError, SchemaNode},
};

static GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// The current schema plus an optional library schema.
///
/// The full node collection is the schema's nodes followed by the library's.
/// Every mutation bumps [`revision`](Self::revision) and draws a new
/// [`generation`](Self::generation). Generations are unique within the
/// process, so two different trees never share one.
#[derive(Debug, Clone)]
pub struct SchemaTrees {
    schema: Schema,
    library: Option<Schema>,
    revision: u64,
    generation: u64,
}

impl SchemaTrees {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            library: None,
            revision: 0,
            generation: next_generation(),
        }
    }

    /// Attaches a library schema (builder style).
    pub fn with_library(mut self, library: Schema) -> Self {
        self.library = Some(library);
        self.revision += 1;
        self.generation = next_generation();
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn library(&self) -> Option<&Schema> {
        self.library.as_ref()
    }

    /// Number of changes made to these trees.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Process-unique stamp of the current content.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// All nodes, schema first.
    pub fn nodes(&self) -> Vec<&SchemaNode> {
        let library = self.library.iter().flat_map(|library| library.nodes());
        self.schema.nodes().iter().chain(library).collect()
    }

    /// Looks a node up by identifier in both trees.
    pub fn node(&self, id: Id) -> Option<&SchemaNode> {
        self.schema
            .node(id)
            .or_else(|| self.library.as_ref().and_then(|library| library.node(id)))
    }

    /// Looks a node up by name, preferring the schema over the library.
    pub fn node_by_name(&self, name: Id) -> Option<&SchemaNode> {
        self.schema
            .node_by_name(name)
            .or_else(|| self.library.as_ref().and_then(|library| library.node_by_name(name)))
    }

    /// Returns true if the library defines a node named `name`.
    pub fn is_library_name(&self, name: Id) -> bool {
        self.library
            .as_ref()
            .is_some_and(|library| library.contains_name(name))
    }

    /// Commits a new description for schema node `id`.
    ///
    /// Library nodes are read-only.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownNode`] if the schema has no node `id`.
    pub fn set_description(&mut self, id: Id, description: &str) -> Result<(), SchemaError> {
        self.schema.set_description(id, description)?;
        self.revision += 1;
        self.generation = next_generation();
        info!(node:% = id, revision = self.revision; "Description updated");
        Ok(())
    }
}
