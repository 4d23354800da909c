//! Shared Kernel
//!
//! Vocabulary shared by every backend crate:
//! - The unified error type returned across HTTP boundaries
//! - Typed UUID identifiers for profiles and visitors
//!
//! Only things whose meaning is stable across domains belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
