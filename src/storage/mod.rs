pub mod media;

pub use media::{AssetKind, AssetUpload, MediaStorage};
