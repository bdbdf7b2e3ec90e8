//! Screen implementations. Each screen is a top-level Component
//! wrapping one of the `rosterly-core` view controllers.

pub mod detail;
pub mod form;
pub mod list;

pub use detail::DetailScreen;
pub use form::FormScreen;
pub use list::ListScreen;
