//! The tools collection — record model and REST resource.

pub mod model;
pub mod routes;

pub use model::{NewTool, Tool, ToolPatch};
pub use routes::{ToolState, tool_routes};
