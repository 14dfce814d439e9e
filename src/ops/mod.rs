pub mod editor;
pub mod entry_ops;
pub mod ids;
pub mod session;
pub mod tree;
