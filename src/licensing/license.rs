use crate::licensing::error::{LicensingError, LicensingResult};
use crate::licensing::types::IssuedLicense;

/// Parse a license file into an issued license.
///
/// Only deserializes; the license is not checked against the key or the
/// licensing service.
pub fn parse_license(license: &[u8]) -> LicensingResult<IssuedLicense> {
    serde_json::from_slice(license).map_err(|e| LicensingError::decode("failed to parse license", e))
}
