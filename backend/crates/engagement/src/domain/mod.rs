//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (ViewEvent, LikeEdge, ProfileStats and operation outcomes)
//! - Domain value objects (Username, DedupWindow)
//! - Domain services (dedup decision, visitor resolution)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
