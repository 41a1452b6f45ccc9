//! `studymate onboard`: First-time setup.

use studymate_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = AppConfig::config_path();

    println!("StudyMate — First-Time Setup");
    println!("============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("  Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("\n  Config already exists at: {}", config_path.display());
        println!("  Edit it manually or delete it and re-run onboard.\n");
        return Ok(());
    }

    std::fs::write(&config_path, starter_config())?;
    println!("  Created config.toml at: {}", config_path.display());
    println!("\n  Next steps:");
    println!("    1. Export OPENAI_API_KEY (or add api_key to the config file)");
    println!("    2. Fill in [profile] with your subjects, level and goals");
    println!("    3. Run: studymate chat\n");

    Ok(())
}

/// The default config with a commented profile example appended.
fn starter_config() -> String {
    let mut text = AppConfig::default_toml();
    text.push_str(concat!(
        "\n",
        "# Example learner profile:\n",
        "# [profile]\n",
        "# subjects = [\"algebra\", \"biology\"]\n",
        "# level = \"beginner\"\n",
        "# goals = [\"pass the midterm\"]\n",
    ));
    text
}
