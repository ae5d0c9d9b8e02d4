#[allow(clippy::module_inception)]
mod catalog;
mod faculty;
mod group;

pub use catalog::Catalog;
pub use faculty::Faculty;
pub use group::Group;
