//! One module per subcommand.  Each exposes a single `execute`
//! function taking the parsed CLI plus its own arguments.

pub mod add;
#[cfg(feature = "audit-log")]
pub mod audit_cmd;
pub mod completions;
pub mod delete;
pub mod generate;
pub mod list;
pub mod register;
pub mod show;
pub mod update;
