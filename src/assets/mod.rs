pub(crate) mod decode;
pub(crate) mod provider;
pub(crate) mod slots;
pub(crate) mod texture;
