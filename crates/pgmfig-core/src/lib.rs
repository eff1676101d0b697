//! pgmfig Core Types and Definitions
//!
//! This crate provides the foundational types for drawing probabilistic
//! graphical model diagrams. It includes:
//!
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Markup**: The inline math markup used by node labels ([`markup`] module)
//! - **Draw**: Drawables for node glyphs, arrows, plates and labels ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod markup;
