//! Tests for refresh token repositories

mod memory_tests;
