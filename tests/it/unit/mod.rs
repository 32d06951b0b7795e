//! Unit tests for tabula.

mod columns_tests;
mod export_tests;
mod snapshot_tests;
