//! Sentinel string values.

use tomlkv_store::KeyHandle;

/// A string value standing in for "no value at all".
const NULL_INDICATOR: &str = "@NULL";

/// Prefix marking a base64-encoded binary payload; decoding happens in a
/// later processing stage, the reader leaves the text as-is.
const BASE64_PREFIX: &str = "@BASE64";

/// Handle the sentinel string forms. Returns `true` when the value needed
/// special treatment and the regular string metadata must not be assigned.
pub(crate) fn handle_special_string(translated: &str, key: &KeyHandle) -> bool {
    if translated == NULL_INDICATOR {
        key.borrow_mut().set_binary(Vec::new());
        true
    } else {
        translated.starts_with(BASE64_PREFIX)
    }
}
