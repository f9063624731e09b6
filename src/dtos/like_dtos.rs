use serde::{Deserialize, Serialize};

/// Body of a successful like. The owner and photo are taken from the caller
/// and the route, so nothing is echoed back.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CreatedLikeDto {}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LikeExistsDto {
    pub exists: bool,
}
