//! Page cropping
//!
//! The crop core: fixed margin geometry and the batch-wise crop routine.

mod cropper;
mod margins;

pub use cropper::{crop_document, CropError, CropSummary};
pub use margins::{CropMargins, CropRect};
