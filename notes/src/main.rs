use anyhow::Result;
use notes::App;
use notes_auth::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new()?;
    settings.validate().map_err(anyhow::Error::msg)?;

    // Logging is initialized in App::run() so the shell keeps stdout
    App::new(settings).run().await?;

    Ok(())
}
