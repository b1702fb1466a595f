//! Schemascope Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Schemascope
//! crates. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Schema**: The GraphQL schema node model ([`schema`] module)
//! - **Text**: Text measurement for node cards ([`text`] module)

pub mod color;
pub mod geometry;
pub mod identifier;
pub mod schema;
pub mod text;
