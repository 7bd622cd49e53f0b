pub(crate) mod ambient;
