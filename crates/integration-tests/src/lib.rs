//! Integration tests for Seedling.
//!
//! # Test Categories
//!
//! - `region_resolution` - End-to-end region resolution table
//! - `variant_selection` - Cross-region variant selection and fallback
//! - `cart_pricing` - Region-aware cart pricing
//! - `payment_lifecycle` - Payment/order status mapping and loyalty accrual
//!
//! These tests exercise behavior through the crates' public APIs without
//! requiring a live database or payment provider; database-backed flows
//! are covered by the repository layers' runtime-bound queries against a
//! locally migrated `PostgreSQL` in staging.

#![cfg_attr(not(test), forbid(unsafe_code))]
