//! # Libris Architecture
//!
//! Libris keeps the records of a small library: students, authors, books with
//! individually tracked copies, and the loan/return history. Everything lives
//! in flat comma-delimited files that are rewritten in full after each change.
//!
//! The heart of it is **circulation**: lending copies, taking them back,
//! charging late-return penalties, and the reports that join loan history
//! against current copy state.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs)                               │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns the store and the loaded Library                    │
//! │  - Parses raw input into validated value types              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Borrow, return, reports, catalog/directory editors       │
//! │  - Validates everything before mutating anything            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - DataStore trait: load_all + full-overwrite saves         │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Circulation Rules
//!
//! - A copy is either on the shelf or held by exactly one student.
//! - Borrowing takes the first on-shelf copy and needs a positive balance.
//! - A return more than [`model::LATE_THRESHOLD_DAYS`] days after its loan
//!   costs [`model::LATE_PENALTY_POINTS`] points, floored at zero.
//! - Loans and returns are paired by [`commands::history::pair_loans`], the
//!   same way for return processing and every report.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each operation
//! - [`store`]: Storage abstraction, file codec and implementations
//! - [`model`]: Entities, value types and the `Library` aggregate
//! - [`date`]: `DD-MM-YYYY` dates and day arithmetic
//! - [`config`]: Configuration management
//! - [`logging`]: Logger bootstrap for the binary
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod date;
pub mod error;
pub mod logging;
pub mod model;
pub mod store;
