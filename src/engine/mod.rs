pub(crate) mod position;
pub(crate) mod settings;
pub(crate) mod snapshot;
