//! Placement: which sidebar applies to the page being viewed.
//!
//! [`resolve_sidebar`] scans the snapshot in declaration order.
//! [`PlacementIndex`] answers the same question from a reverse index built
//! once per snapshot, for sites with many sidebars or assignments.

mod index;
mod model;
mod resolver;

pub use index::PlacementIndex;
pub use model::ViewedPage;
pub use resolver::resolve_sidebar;
