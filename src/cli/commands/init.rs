use crate::config::Config;

pub fn cmd_init() -> anyhow::Result<()> {
    if Config::create_default_if_missing()? {
        println!("✓ Created config.toml with default settings.");
        println!("Set security.jwt_secret (or JWT_SECRET) before starting the server.");
    } else {
        println!("config.toml already exists, leaving it untouched.");
    }

    Ok(())
}
