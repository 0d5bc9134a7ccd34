pub mod commit;
pub mod sort;
pub mod window;

pub use commit::CommitRecord;
pub use sort::SortOrder;
