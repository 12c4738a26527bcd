//! Protocol Module
//!
//! The operation contract callers use to drive the store.
//!
//! ## Protocol Format (JSON lines)
//!
//! One JSON object per line in each direction.
//!
//! ### Request Format
//! ```text
//! {"op":"create_category","name":"Snacks","order":5}
//! {"op":"update_item","id":3,"patch":{"checked":true}}
//! {"op":"delete_category","id":4}
//! ```
//!
//! ### Operations
//! - list_categories:  categories with nested items
//! - create_category / update_category / delete_category
//! - create_item / update_item / delete_item
//! - get_category / get_item / list_items / stats
//!
//! ### Response Format
//! ```text
//! {"status":"ok","payload":{...}}
//! {"status":"not_found","message":"item 7"}
//! {"status":"invalid","message":"name must not be empty"}
//! ```

mod codec;
mod command;
mod response;

pub use codec::{decode_command, decode_response, encode_command, encode_response, read_command, write_response};
pub use command::Command;
pub use response::{Response, Status};
