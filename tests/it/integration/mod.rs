//! Integration tests for tabula.
//!
//! These tests verify the interaction between multiple components
//! and test complete workflows end-to-end.

mod server_paging_tests;
