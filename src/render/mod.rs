pub(crate) mod compositor;
pub(crate) mod pipeline;
pub(crate) mod preview;
pub(crate) mod surface;
