use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(JsonSchema, Serialize, Deserialize, Clone, utoipa::ToSchema)]
#[schema(title = "EVM Address")]
/// Used to represent an EVM address. This is a string of length 42 with a `0x` prefix. Non-checksummed addresses are also supported.
pub struct AddressDef(pub String);

#[derive(JsonSchema, Serialize, Deserialize, Clone, utoipa::ToSchema)]
#[schema(title = "Bytes")]
/// Used to represent "bytes". This is a 0x prefixed hex string.
pub struct BytesDef(pub String);

#[derive(JsonSchema, Serialize, Deserialize, Clone, utoipa::ToSchema)]
#[schema(title = "Bytes32")]
/// A 32 byte value, encoded as a 0x prefixed hex string of length 66.
pub struct B256Def(pub String);

#[derive(JsonSchema, Serialize, Deserialize, Clone, utoipa::ToSchema)]
#[schema(title = "U256")]
/// Used to represent a 256-bit unsigned integer, as a decimal or 0x prefixed hex string.
pub struct U256Def(pub String);
