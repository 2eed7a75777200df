pub(crate) mod blend;
pub(crate) mod fit;
pub(crate) mod frame;
pub(crate) mod renderer;
pub(crate) mod warp;
