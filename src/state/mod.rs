pub(crate) mod controller;
pub(crate) mod input;
pub(crate) mod render_state;
