//! # Table Detection
//!
//! Locates table regions inside a [`Grid`](crate::grid::Grid) and turns them
//! into normalized records: the scanner partitions non-empty cells into
//! candidate blocks, the header classifier decides which leading rows and
//! columns are headers, and the assembler emits viable
//! [`TableRecord`](assembler::TableRecord)s.

pub mod assembler;
pub mod header;
pub mod scanner;
