//! Infrastructure layer: registry implementation and wire DTOs.

pub mod dto;
pub mod repository;
