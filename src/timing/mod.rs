pub(crate) mod grid;
pub(crate) mod group;
pub(crate) mod timeline;
