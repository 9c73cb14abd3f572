pub(crate) mod context2d;
pub(crate) mod events;
pub(crate) mod offscreen;
