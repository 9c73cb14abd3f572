pub(crate) mod backing;
pub(crate) mod device;
pub(crate) mod program;
pub(crate) mod software;
