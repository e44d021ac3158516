//! Parameterized SQL statement builder for a Postgres-flavored dialect.
//!
//! Statements are assembled from composable, immutable descriptor
//! values and compiled into a final SQL string plus a map from
//! generated `@tag` placeholders to bound values. The crate never
//! executes anything; the `(text, bindings)` pair is handed to an
//! external driver.
//!
//! ```
//! use pg_builder::{Column, Select, Table, Where};
//!
//! let users = Table::new("users");
//! let (sql, binds) = Select::new()
//!     .from(&users)
//!     .column(Column::name(&users, "id"))
//!     .where_clause(Where::eq(&users, "id", 1))
//!     .limit(10)
//!     .compile()
//!     .unwrap();
//!
//! assert!(sql.starts_with("SELECT "));
//! assert_eq!(binds.len(), 2);
//! ```

pub mod error;
pub mod expr;
pub mod macros;
pub mod scope;
pub mod stmt;
pub mod table;
pub mod token;
pub mod value;

pub use error::Error;
pub use expr::Generate;
pub use expr::column::Column;
pub use expr::join::On;
pub use expr::order::{Group, Order};
pub use expr::predicate::Where;
pub use scope::{BindMap, Scope};
pub use stmt::delete::Delete;
pub use stmt::insert::Insert;
pub use stmt::select::Select;
pub use stmt::update::Update;
pub use table::Table;
pub use token::{RandomTokens, SeqTokens, TOKEN_LEN, TokenSource};
pub use value::Value;
