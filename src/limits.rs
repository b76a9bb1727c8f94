//! Optional resource limits for decoding untrusted input.

use crate::error::PnmError;
use crate::header::PnmHeader;

/// Caps checked after header parsing, before any pixel data is touched.
///
/// All fields default to `None` (unlimited).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    /// Cap on total decoded samples (X·Y·Z), bounding the output allocation.
    pub max_samples: Option<u64>,
}

impl Limits {
    pub(crate) fn check(&self, header: &PnmHeader, samples: usize) -> Result<(), PnmError> {
        if let Some(max) = self.max_width {
            if header.width > max {
                return Err(PnmError::LimitExceeded(format!(
                    "width {} exceeds limit {max}",
                    header.width
                )));
            }
        }
        if let Some(max) = self.max_height {
            if header.height > max {
                return Err(PnmError::LimitExceeded(format!(
                    "height {} exceeds limit {max}",
                    header.height
                )));
            }
        }
        if let Some(max) = self.max_samples {
            if samples as u64 > max {
                return Err(PnmError::LimitExceeded(format!(
                    "sample count {samples} exceeds limit {max}"
                )));
            }
        }
        Ok(())
    }
}
