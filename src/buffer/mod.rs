pub(crate) mod rgba;
