use super::Session;
use anyhow::{Context, Result};

pub async fn list(session: &Session) -> Result<()> {
    let subjects = session
        .client()
        .list_subjects()
        .await
        .context("Failed to list subjects")?;
    for subject in subjects {
        println!("{:>5}  {}", subject.id, subject.name);
    }
    Ok(())
}

pub async fn add(session: &mut Session, name: &str) -> Result<()> {
    session
        .client_mut()
        .add_subject(name)
        .await
        .with_context(|| format!("Failed to add subject '{}'", name))?;
    println!("✅ Added subject '{}'", name);
    Ok(())
}

pub async fn delete(session: &mut Session, id: &str) -> Result<()> {
    session
        .client_mut()
        .delete_subject(id)
        .await
        .with_context(|| format!("Failed to delete subject {}", id))?;
    println!("✅ Deleted subject {}", id);
    Ok(())
}
