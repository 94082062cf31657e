pub(crate) mod decode;
pub(crate) mod ink;
pub(crate) mod sample;
