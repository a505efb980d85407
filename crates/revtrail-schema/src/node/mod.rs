pub mod audit;
pub mod collection;
pub mod column;
pub mod entity;
pub mod identifier;
pub mod join;
pub mod model;
pub mod property;
pub mod value;

pub use audit::{AuditOptions, AuditTableOverride, EntityAuditOptions, JoinTableOverride};
pub use collection::{Collection, CollectionElement};
pub use column::{column_names, Column, Selectable};
pub use entity::{Discriminator, Entity};
pub use identifier::{IdProperty, IdShape};
pub use join::SecondaryJoin;
pub use model::MappingModel;
pub use property::Property;
pub use value::{BasicValue, Component, ManyToOne, OneToOne, PropertyValue};
