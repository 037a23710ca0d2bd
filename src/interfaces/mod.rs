/// Interfaces Layer - External Entry Points
///
/// This layer contains all external interfaces to the system:
/// CLI, observability HTTP, the call protocol over TCP.
///
/// ## Modules
/// - `cli`: Command-line interface (main.rs logic)
/// - `tools`: Utility tools (call client, etc.)

pub mod cli;
pub mod tools;
