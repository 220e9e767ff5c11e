pub mod search;
pub mod state;
pub mod users;

use serde::Serialize;

/// Pretty JSON on stdout; logs go to stderr
fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
