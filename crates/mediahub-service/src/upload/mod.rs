//! Upload coordination: validate, store, then point the owner's field at the
//! new object.

pub mod coordinator;
pub mod naming;
pub mod types;

pub use coordinator::UploadCoordinator;
pub use naming::generate_object_name;
pub use types::{AssetReference, OrphanedAsset, UploadError, UploadFile, UploadReceipt};
