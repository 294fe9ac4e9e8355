pub mod bucket;
pub mod copy;
pub mod sorter;
