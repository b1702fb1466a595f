//! Link records between the cards of a relation sequence.

use std::collections::HashMap;

use log::debug;

use schemascope_core::{geometry::Bounds, identifier::Id, schema::SchemaNode};

use super::{ElementRegistry, FieldFilters, RelationOptions, RelationSequence};

/// A node together with the bounds of its rendered card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelationEntry<'a> {
    node: &'a SchemaNode,
    bounds: Bounds,
}

impl<'a> RelationEntry<'a> {
    pub fn new(node: &'a SchemaNode, bounds: Bounds) -> Self {
        Self { node, bounds }
    }

    pub fn node(&self) -> &'a SchemaNode {
        self.node
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// The card an entry points at, and the position of that entry among the
/// visible entries of its own card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelationEndpoint<'a> {
    entry: RelationEntry<'a>,
    index: usize,
}

impl<'a> RelationEndpoint<'a> {
    pub fn entry(&self) -> RelationEntry<'a> {
        self.entry
    }

    /// Row of the referencing entry; lines fan out by this index.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// All lines ending at one card.
///
/// `to` is the card owning the entries, `from` lists one endpoint per visible
/// entry whose type is on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationLink<'a> {
    to: RelationEntry<'a>,
    from: Vec<RelationEndpoint<'a>>,
    from_len: usize,
}

impl<'a> RelationLink<'a> {
    pub fn to(&self) -> RelationEntry<'a> {
        self.to
    }

    pub fn from(&self) -> &[RelationEndpoint<'a>] {
        &self.from
    }

    /// Number of entries of the `to` node, visible or not.
    pub fn source_count(&self) -> usize {
        self.from_len
    }
}

/// Resolves the links of `sequence` against the registered bounds.
///
/// Returns `None` while the registry gate is closed. Entries whose type is not
/// a node of the sequence, or whose node has no bounds, are skipped; a card
/// left without any resolvable entry produces no link. Entries typed as their
/// own node only produce an endpoint when self loops are enabled.
pub fn resolve_links<'a>(
    sequence: &'a RelationSequence,
    registry: &ElementRegistry,
    filters: &FieldFilters,
    options: RelationOptions,
) -> Option<Vec<RelationLink<'a>>> {
    if !registry.is_ready() {
        return None;
    }

    let nodes = sequence.nodes();
    let mut by_name: HashMap<Id, &SchemaNode> = HashMap::with_capacity(nodes.len());
    for node in nodes {
        by_name.entry(node.name()).or_insert(node);
    }

    let mut links = Vec::new();
    for node in nodes {
        let Some(bounds) = registry.bounds(node.id()) else {
            continue;
        };

        let from: Vec<RelationEndpoint<'a>> = filters
            .visible_fields(node)
            .enumerate()
            .filter_map(|(index, field)| {
                let target = *by_name.get(&field.type_name()?)?;
                if target.id() == node.id() && !options.self_loops() {
                    return None;
                }
                let bounds = registry.bounds(target.id())?;
                Some(RelationEndpoint {
                    entry: RelationEntry::new(target, bounds),
                    index,
                })
            })
            .collect();

        if from.is_empty() {
            continue;
        }

        links.push(RelationLink {
            to: RelationEntry::new(node, bounds),
            from,
            from_len: node.fields().len(),
        });
    }

    debug!(links = links.len(); "Relation links resolved");
    Some(links)
}
