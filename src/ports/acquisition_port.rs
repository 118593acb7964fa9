//! Raw export acquisition port trait.

use crate::domain::asset::Asset;
use crate::domain::error::CryptochartError;
use crate::domain::normalizer::RawExport;

/// Produces an unprocessed tabular export of an asset's price history.
///
/// Implementations may block for as long as the upstream source takes; there
/// is no timeout or cancellation at this seam.
pub trait AcquisitionPort {
    fn acquire(&self, asset: &Asset) -> Result<RawExport, CryptochartError>;
}
