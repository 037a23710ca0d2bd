//! Tools and Utilities Module
//!
//! This module contains various tools and utilities for testing
//! and operating the transfer engine.
//!
//! ## Available Tools
//! - `call_client`: Located in src/bin/call_client.rs (binary); invokes a
//!   published method against a running engine and prints the result
//!
//! Note: Tools are implemented as binaries in src/bin/ for standalone
//! execution. This module serves as a placeholder for shared tool
//! utilities.
