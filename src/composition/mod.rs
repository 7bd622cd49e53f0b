pub(crate) mod doc;
pub(crate) mod drag;
pub(crate) mod model;
pub(crate) mod store;
