//! Encoding many independent images.
//!
//! Each encode owns its own tables and buffers, so images can be encoded
//! concurrently with no coordination. Results come back in input order;
//! one failing image does not affect the others.

use crate::{EncodeOptions, encode};
use oxipix_core::error::Result;
use oxipix_core::pixel::PixelBuffer;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Encode every image with the same options, one after another.
pub fn encode_batch(images: &[PixelBuffer], options: &EncodeOptions) -> Vec<Result<Vec<u8>>> {
    images.iter().map(|image| encode(image, options)).collect()
}

/// Encode every image with the same options on the rayon thread pool.
///
/// Output is identical to [`encode_batch`].
#[cfg(feature = "parallel")]
pub fn encode_batch_parallel(
    images: &[PixelBuffer],
    options: &EncodeOptions,
) -> Vec<Result<Vec<u8>>> {
    log::debug!(
        "batch: {} {} images on {} threads",
        images.len(),
        options.format(),
        rayon::current_num_threads()
    );
    images.par_iter().map(|image| encode(image, options)).collect()
}
