//! Trestle Core Types and Definitions
//!
//! This crate provides the foundational types for Trestle railroad diagrams.
//! It includes:
//!
//! - **Identifiers**: String-interned production names ([`identifier::Id`])
//! - **Colors**: CSS color handling for diagram styling ([`color::Color`])
//! - **Geometry**: Points, sizes and insets used by diagram layout ([`geometry`] module)
//! - **Grammar**: Symbols, rule expressions and the immutable [`grammar::Grammar`]
//! - **Diagram**: The backend-independent [`diagram::DiagramNode`] tree
//! - **Errors**: Construction-time [`error::GrammarError`]

pub mod color;
pub mod diagram;
pub mod error;
pub mod geometry;
pub mod grammar;
pub mod identifier;
