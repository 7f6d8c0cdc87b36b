use super::Session;
use anyhow::Result;

pub async fn run(session: &Session) -> Result<()> {
    if session.client().is_authenticated().await? {
        println!("✅ Logged in to {}", session.client().endpoints().base_url());
    } else {
        anyhow::bail!("Session was not accepted by {}", session.client().endpoints().base_url());
    }
    Ok(())
}
