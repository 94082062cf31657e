pub(crate) mod drag;
pub(crate) mod file;
pub(crate) mod geometry;
pub(crate) mod model;
pub(crate) mod presets;
pub(crate) mod session;
