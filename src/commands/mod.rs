//! Command-line actions on top of a configured client.
//!
//! - `call` - Issue an API call and print the body
//! - `token` - Manage the stored access token
//! - `lang` - Show or switch the interface language

pub mod call;
pub mod lang;
pub mod token;

pub use call::{Call, build_form, call, parse_json_object, parse_key_value};
