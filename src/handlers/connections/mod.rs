// handlers/connections/mod.rs - Ad account connections
//
// GET    /api/connections?userId=<uuid>   list, newest first
// DELETE /api/connections?id=<uuid>       delete (query form)
// DELETE /api/connections/:id             delete (path form)
// POST   /api/connections/:id             {"action": "sync"}

pub mod action;
pub mod delete;
pub mod list;

pub use action::action;
pub use delete::{delete_by_path, delete_by_query};
pub use list::list;
