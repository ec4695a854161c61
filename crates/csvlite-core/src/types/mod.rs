//! Value and table model for csvlite.
//! Tagged cells, column-aligned tables, SQL column types, the foreign-key map.

pub mod foreign_keys;
pub mod sql_type;
pub mod table;
pub mod value;

pub use foreign_keys::{ForeignKeyMap, LookupTarget};
pub use rustc_hash::{FxHashMap, FxHashSet};
pub use sql_type::{infer_sql_type, SqlType};
pub use table::{Column, Table};
pub use value::Value;
