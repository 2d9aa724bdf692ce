pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Structured input from `--input`, falling back to piped stdin.
/// `None` means the command should build its input from flags.
pub fn load<T: DeserializeOwned>(path: Option<&str>) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_document(path)?));
    }
    stdin::read_stdin()
}
