use crate::config::Config;
use crate::db::Store;
use crate::models::user::NewUser;

pub async fn cmd_create_user(config: &Config, user: NewUser) -> anyhow::Result<()> {
    if user.username.trim().is_empty() || user.password.is_empty() {
        anyhow::bail!("Username and password are required");
    }

    let store = Store::new(&config.general.database_path).await?;

    if store
        .get_user_by_username(&user.username.trim().to_lowercase())
        .await?
        .is_some()
    {
        println!("User '{}' already exists.", user.username);
        return Ok(());
    }

    let created = store.create_user(&user, &config.security).await?;
    println!(
        "✓ Created {} '{}' (ID: {})",
        created.role, created.username, created.id
    );

    Ok(())
}

pub async fn cmd_unlock_user(config: &Config, username: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    if store.unlock_user(username).await? {
        println!("✓ Unlocked: {username}");
    } else {
        println!("User '{username}' not found.");
    }

    Ok(())
}
