use anyhow::{Context, anyhow};

use pt_booking::stub::auth::hash_password;

fn main() -> anyhow::Result<()> {
    let password = std::env::args()
        .nth(1)
        .context("Usage: hashpass <password>")?;
    let phc = hash_password(&password).map_err(|e| anyhow!(e))?;
    println!("{phc}");
    Ok(())
}
