//! Presentation Layer
//!
//! HTTP handlers, DTOs, visitor extraction and the router.

pub mod dto;
pub mod handlers;
pub mod router;
pub mod visitor;
