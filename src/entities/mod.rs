//! Record types held by the record store
//!
//! - [`ComponentRecord`] - a sourced part and its supply attributes
//! - [`ClientRecord`] / [`ClientOverride`] - per-client run rate and shadowed values
//! - [`CriticalMaterial`] / [`ComponentMaterialLink`] - upstream (tier 2) materials
//! - [`Bom`] - the lines and dependencies scored together

pub mod bom;
pub mod client;
pub mod component;
pub mod material;

pub use bom::{Bom, BomError, BomLine, DependencyEdge};
pub use client::{ClientOverride, ClientRecord};
pub use component::{
    AllocationStatus, BufferStock, Category, ComponentRecord, EolStatus, FabStage,
    FinancialRating, NodeTier, NodeTierBounds, ProductionPlant, TechnologyNode,
};
pub use material::{ComponentMaterialLink, CriticalMaterial, Criticality, Substitutability};
