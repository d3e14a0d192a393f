pub mod net;
pub mod tree;
pub mod viz;
