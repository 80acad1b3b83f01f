pub(crate) mod paths;

pub(crate) use paths::expand_patterns;
