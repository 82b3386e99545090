//! Use-case services over the repository contract.
//!
//! # Responsibility
//! - Orchestrate multi-repository flows (seat accounting).
//! - Stay storage-agnostic: services only see `dyn Repository<T>`.

pub mod booking_service;

pub use booking_service::{BookingService, BookingServiceError, ServiceResult};
