//! Response envelope for list and report endpoints.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// Single entities are returned bare; collections and engine reports are
/// wrapped so the envelope can grow without breaking clients.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
