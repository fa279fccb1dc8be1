pub(crate) mod format;
pub(crate) mod hsv;
pub(crate) mod transform;
