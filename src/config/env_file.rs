// ABOUTME: Key=value env file loading for the optional .armtest.env file.
// ABOUTME: Reads pairs through dotenvy without touching the process environment.

use std::collections::HashMap;
use std::path::Path;

/// Read key=value pairs from an env file.
///
/// A missing file yields an empty map. A file that exists but cannot be
/// read or parsed yields `Err` so the caller can downgrade it to a
/// warning and keep resolving from the remaining sources.
pub fn load(path: &Path) -> Result<HashMap<String, String>, dotenvy::Error> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let mut values = HashMap::new();
    for item in dotenvy::from_path_iter(path)? {
        let (key, value) = item?;
        values.insert(key, value);
    }
    Ok(values)
}
