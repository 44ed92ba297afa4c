//! Archive adapters.

mod zip_packager;

pub use zip_packager::ZipPackager;
