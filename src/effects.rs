pub(crate) mod composite;
pub(crate) mod generative;
pub(crate) mod grain;
pub(crate) mod tint;
